//! # Variable Resolver
//!
//! Rewrites every `Declaration` and `Variable` node's `name` field in place
//! from its source spelling to a globally unique symbol, and rejects
//! duplicate declarations, undeclared references, and invalid assignment
//! targets along the way.
//!
//! ## Scoping
//!
//! A scope is a map from source name to `(unique_name, declared_in_this_block)`.
//! Entering a nested block (`Compound`, or the shared scope of a `For`'s
//! init/cond/post/body) clones the enclosing scope with every entry's
//! current-block flag cleared, so a name declared in an outer block may be
//! shadowed but not redeclared, while a name already bound in *this* block
//! is a duplicate. The clone is cheap relative to correctness here: there is
//! no lifetime-threading alternative that stays this simple in a recursive
//! walk.


use std::collections::HashMap;

use crate::error::CompileError;
use crate::parser::ast::{BlockItem, Declaration, Expr, ForInit, Program, Statement};

#[derive(Clone)]
struct Binding {
    unique_name: String,
    from_current_block: bool,
}

#[derive(Clone, Default)]
struct Scope {
    bindings: HashMap<String, Binding>,
}

impl Scope {
    fn nested(&self) -> Scope {
        let bindings = self
            .bindings
            .iter()
            .map(|(name, binding)| {
                (
                    name.clone(),
                    Binding {
                        unique_name: binding.unique_name.clone(),
                        from_current_block: false,
                    },
                )
            })
            .collect();
        Scope { bindings }
    }
}

struct Resolver {
    counter: usize,
}

/// Resolve every variable in `program`, rewriting declarations and
/// references in place.
pub fn resolve(program: &mut Program) -> Result<(), CompileError> {
    let mut resolver = Resolver { counter: 0 };
    for function in &mut program.functions {
        let mut scope = Scope::default();
        resolver.resolve_block_items(&mut function.body.items, &mut scope)?;
    }
    Ok(())
}

impl Resolver {
    fn fresh_name(&mut self, source: &str) -> String {
        let n = self.counter;
        self.counter += 1;
        format!("var.{source}.renamed.{n}")
    }

    fn resolve_block_items(
        &mut self,
        items: &mut [BlockItem],
        scope: &mut Scope,
    ) -> Result<(), CompileError> {
        for item in items {
            match item {
                BlockItem::Declaration(decl) => self.resolve_declaration(decl, scope)?,
                BlockItem::Statement(stmt) => self.resolve_statement(stmt, scope)?,
            }
        }
        Ok(())
    }

    fn resolve_declaration(
        &mut self,
        decl: &mut Declaration,
        scope: &mut Scope,
    ) -> Result<(), CompileError> {
        if scope
            .bindings
            .get(&decl.name)
            .is_some_and(|b| b.from_current_block)
        {
            return Err(CompileError::variable_resolution(
                decl.line,
                format!("redeclaration of variable '{}'", decl.name),
            ));
        }

        let unique_name = self.fresh_name(&decl.name);
        scope.bindings.insert(
            decl.name.clone(),
            Binding {
                unique_name: unique_name.clone(),
                from_current_block: true,
            },
        );
        decl.name = unique_name;

        if let Some(init) = &mut decl.init {
            self.resolve_expr(init, scope)?;
        }
        Ok(())
    }

    fn resolve_statement(
        &mut self,
        stmt: &mut Statement,
        scope: &mut Scope,
    ) -> Result<(), CompileError> {
        match stmt {
            Statement::Return { expr, .. } | Statement::Expression { expr, .. } => {
                self.resolve_expr(expr, scope)
            }
            Statement::If {
                cond,
                then_branch,
                else_branch,
                ..
            } => {
                self.resolve_expr(cond, scope)?;
                self.resolve_statement(then_branch, scope)?;
                if let Some(else_branch) = else_branch {
                    self.resolve_statement(else_branch, scope)?;
                }
                Ok(())
            }
            Statement::Compound { block, .. } => {
                let mut inner = scope.nested();
                self.resolve_block_items(&mut block.items, &mut inner)
            }
            Statement::While { cond, body, .. } | Statement::DoWhile { cond, body, .. } => {
                self.resolve_expr(cond, scope)?;
                self.resolve_statement(body, scope)
            }
            Statement::For {
                init,
                cond,
                post,
                body,
                ..
            } => {
                let mut inner = scope.nested();
                match init {
                    ForInit::Declaration(decl) => self.resolve_declaration(decl, &mut inner)?,
                    ForInit::Expr(expr) => self.resolve_expr(expr, &mut inner)?,
                    ForInit::None => {}
                }
                if let Some(cond) = cond {
                    self.resolve_expr(cond, &mut inner)?;
                }
                if let Some(post) = post {
                    self.resolve_expr(post, &mut inner)?;
                }
                self.resolve_statement(body, &mut inner)
            }
            Statement::Break { .. } | Statement::Continue { .. } | Statement::Null { .. } => {
                Ok(())
            }
        }
    }

    fn resolve_expr(&mut self, expr: &mut Expr, scope: &Scope) -> Result<(), CompileError> {
        match expr {
            Expr::NumLiteral { .. } => Ok(()),
            Expr::Variable { name, line } => {
                match scope.bindings.get(name) {
                    Some(binding) => {
                        *name = binding.unique_name.clone();
                        Ok(())
                    }
                    None => Err(CompileError::variable_resolution(
                        *line,
                        format!("use of undeclared variable '{name}'"),
                    )),
                }
            }
            Expr::Unary { operand, .. } => self.resolve_expr(operand, scope),
            Expr::Binary { left, right, .. } => {
                self.resolve_expr(left, scope)?;
                self.resolve_expr(right, scope)
            }
            Expr::Assignment {
                lvalue,
                rvalue,
                line,
            } => {
                if !matches!(lvalue.as_ref(), Expr::Variable { .. }) {
                    return Err(CompileError::variable_resolution(
                        *line,
                        "left side of assignment is not a variable",
                    ));
                }
                self.resolve_expr(lvalue, scope)?;
                self.resolve_expr(rvalue, scope)
            }
            Expr::Conditional {
                cond,
                then_expr,
                else_expr,
                ..
            } => {
                self.resolve_expr(cond, scope)?;
                self.resolve_expr(then_expr, scope)?;
                self.resolve_expr(else_expr, scope)
            }
        }
    }
}
