//! # Loop Labeler
//!
//! Walks the AST carrying the label of the innermost enclosing loop,
//! assigning a fresh label to every loop and binding every `break`/
//! `continue` to the loop it belongs to. Runs after variable resolution, so
//! it only ever sees well-formed variable references.
//!
//! After this pass every `While`/`DoWhile`/`For` node's `label` field is
//! `Some`, and so is every `Break`/`Continue` that the parser accepted —
//! one with no enclosing loop is rejected here, not earlier, since the
//! grammar alone can't tell a bound use from a stray one.

#[cfg(test)]
mod tests;

use crate::error::CompileError;
use crate::parser::ast::{BlockItem, Program, Statement};

struct Labeler {
    counter: usize,
}

/// Label every loop and bind every `break`/`continue` in `program`.
pub fn label(program: &mut Program) -> Result<(), CompileError> {
    let mut labeler = Labeler { counter: 0 };
    for function in &mut program.functions {
        labeler.label_block_items(&mut function.body.items, None)?;
    }
    Ok(())
}

impl Labeler {
    fn fresh_label(&mut self) -> String {
        let n = self.counter;
        self.counter += 1;
        format!("loop_{n}")
    }

    fn label_block_items(
        &mut self,
        items: &mut [BlockItem],
        current_loop: Option<&str>,
    ) -> Result<(), CompileError> {
        for item in items {
            if let BlockItem::Statement(stmt) = item {
                self.label_statement(stmt, current_loop)?;
            }
        }
        Ok(())
    }

    fn label_statement(
        &mut self,
        stmt: &mut Statement,
        current_loop: Option<&str>,
    ) -> Result<(), CompileError> {
        match stmt {
            Statement::If {
                then_branch,
                else_branch,
                ..
            } => {
                self.label_statement(then_branch, current_loop)?;
                if let Some(else_branch) = else_branch {
                    self.label_statement(else_branch, current_loop)?;
                }
                Ok(())
            }
            Statement::Compound { block, .. } => {
                self.label_block_items(&mut block.items, current_loop)
            }
            Statement::While { body, label, .. } | Statement::DoWhile { body, label, .. } => {
                let fresh = self.fresh_label();
                *label = Some(fresh.clone());
                self.label_statement(body, Some(&fresh))
            }
            Statement::For { body, label, .. } => {
                let fresh = self.fresh_label();
                *label = Some(fresh.clone());
                self.label_statement(body, Some(&fresh))
            }
            Statement::Break { label, line } => match current_loop {
                Some(active) => {
                    *label = Some(active.to_string());
                    Ok(())
                }
                None => Err(CompileError::loop_labeling(
                    *line,
                    "'break' outside of any loop",
                )),
            },
            Statement::Continue { label, line } => match current_loop {
                Some(active) => {
                    *label = Some(active.to_string());
                    Ok(())
                }
                None => Err(CompileError::loop_labeling(
                    *line,
                    "'continue' outside of any loop",
                )),
            },
            Statement::Return { .. } | Statement::Expression { .. } | Statement::Null { .. } => {
                Ok(())
            }
        }
    }
}
