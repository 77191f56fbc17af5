//! # TAC Generator
//!
//! Lowers a resolved, loop-labeled AST to three-address code by post-order
//! expression evaluation and by desugaring control flow (short-circuit
//! `&&`/`||`, the ternary operator, and all four loop forms) into labels and
//! conditional jumps.
//!
//! Runs after [`crate::resolver`] and [`crate::loop_labeler`], so every
//! `Variable` already carries its unique symbol and every loop/`break`/
//! `continue` already carries its label.


pub mod ast;

use crate::error::CompileError;
use crate::parser::ast as past;
use ast::{Function, Instruction, Program, Value};

struct Generator {
    temp_counter: usize,
    label_counter: usize,
    instructions: Vec<Instruction>,
}

/// Lower `program` to three-address code.
pub fn generate(program: &past::Program) -> Result<Program, CompileError> {
    let mut functions = Vec::with_capacity(program.functions.len());
    for function in &program.functions {
        let mut gen = Generator {
            temp_counter: 0,
            label_counter: 0,
            instructions: Vec::new(),
        };
        gen.lower_block_items(&function.body.items)?;
        functions.push(Function {
            name: function.name.clone(),
            body: gen.instructions,
        });
    }
    Ok(Program { functions })
}

impl Generator {
    fn fresh_temp(&mut self) -> Value {
        let n = self.temp_counter;
        self.temp_counter += 1;
        Value::Variable(format!("temp.v{n}"))
    }

    fn fresh_label(&mut self, prefix: &str) -> String {
        let n = self.label_counter;
        self.label_counter += 1;
        format!("{prefix}_{n}")
    }

    fn emit(&mut self, instr: Instruction) {
        self.instructions.push(instr);
    }

    fn lower_block_items(&mut self, items: &[past::BlockItem]) -> Result<(), CompileError> {
        for item in items {
            match item {
                past::BlockItem::Declaration(decl) => self.lower_declaration(decl)?,
                past::BlockItem::Statement(stmt) => self.lower_statement(stmt)?,
            }
        }
        Ok(())
    }

    fn lower_declaration(&mut self, decl: &past::Declaration) -> Result<(), CompileError> {
        if let Some(init) = &decl.init {
            let value = self.lower_expr(init)?;
            self.emit(Instruction::Copy {
                src: value,
                dst: Value::Variable(decl.name.clone()),
            });
        }
        Ok(())
    }

    fn lower_statement(&mut self, stmt: &past::Statement) -> Result<(), CompileError> {
        match stmt {
            past::Statement::Return { expr, .. } => {
                let value = self.lower_expr(expr)?;
                self.emit(Instruction::Return(value));
                Ok(())
            }
            past::Statement::Expression { expr, .. } => {
                self.lower_expr(expr)?;
                Ok(())
            }
            past::Statement::If {
                cond,
                then_branch,
                else_branch,
                ..
            } => self.lower_if(cond, then_branch, else_branch.as_deref()),
            past::Statement::Compound { block, .. } => self.lower_block_items(&block.items),
            past::Statement::While {
                cond, body, label, ..
            } => self.lower_while(cond, body, label),
            past::Statement::DoWhile {
                cond, body, label, ..
            } => self.lower_do_while(cond, body, label),
            past::Statement::For {
                init,
                cond,
                post,
                body,
                label,
                ..
            } => self.lower_for(init, cond.as_ref(), post.as_ref(), body, label),
            past::Statement::Break { label, .. } => {
                let label = label.as_ref().expect("loop labeler binds every break");
                self.emit(Instruction::Jump(format!("{label}_break")));
                Ok(())
            }
            past::Statement::Continue { label, .. } => {
                let label = label.as_ref().expect("loop labeler binds every continue");
                self.emit(Instruction::Jump(format!("{label}_continue")));
                Ok(())
            }
            past::Statement::Null { .. } => Ok(()),
        }
    }

    fn lower_if(
        &mut self,
        cond: &past::Expr,
        then_branch: &past::Statement,
        else_branch: Option<&past::Statement>,
    ) -> Result<(), CompileError> {
        let cond_value = self.lower_expr(cond)?;
        match else_branch {
            None => {
                let end_label = self.fresh_label("end");
                self.emit(Instruction::JumpIfZero {
                    cond: cond_value,
                    target: end_label.clone(),
                });
                self.lower_statement(then_branch)?;
                self.emit(Instruction::Label(end_label));
            }
            Some(else_branch) => {
                let else_label = self.fresh_label("else");
                let end_label = self.fresh_label("end");
                self.emit(Instruction::JumpIfZero {
                    cond: cond_value,
                    target: else_label.clone(),
                });
                self.lower_statement(then_branch)?;
                self.emit(Instruction::Jump(end_label.clone()));
                self.emit(Instruction::Label(else_label));
                self.lower_statement(else_branch)?;
                self.emit(Instruction::Label(end_label));
            }
        }
        Ok(())
    }

    fn lower_while(
        &mut self,
        cond: &past::Expr,
        body: &past::Statement,
        label: &Option<String>,
    ) -> Result<(), CompileError> {
        let label = label.as_ref().expect("loop labeler labels every while");
        let continue_label = format!("{label}_continue");
        let break_label = format!("{label}_break");

        self.emit(Instruction::Label(continue_label.clone()));
        let cond_value = self.lower_expr(cond)?;
        self.emit(Instruction::JumpIfZero {
            cond: cond_value,
            target: break_label.clone(),
        });
        self.lower_statement(body)?;
        self.emit(Instruction::Jump(continue_label));
        self.emit(Instruction::Label(break_label));
        Ok(())
    }

    fn lower_do_while(
        &mut self,
        cond: &past::Expr,
        body: &past::Statement,
        label: &Option<String>,
    ) -> Result<(), CompileError> {
        let label = label.as_ref().expect("loop labeler labels every do-while");
        let start_label = format!("{label}_start");
        let continue_label = format!("{label}_continue");
        let break_label = format!("{label}_break");

        self.emit(Instruction::Label(start_label.clone()));
        self.lower_statement(body)?;
        self.emit(Instruction::Label(continue_label));
        let cond_value = self.lower_expr(cond)?;
        self.emit(Instruction::JumpIfNotZero {
            cond: cond_value,
            target: start_label,
        });
        self.emit(Instruction::Label(break_label));
        Ok(())
    }

    fn lower_for(
        &mut self,
        init: &past::ForInit,
        cond: Option<&past::Expr>,
        post: Option<&past::Expr>,
        body: &past::Statement,
        label: &Option<String>,
    ) -> Result<(), CompileError> {
        let label = label.as_ref().expect("loop labeler labels every for");
        let start_label = format!("{label}_start");
        let continue_label = format!("{label}_continue");
        let break_label = format!("{label}_break");

        match init {
            past::ForInit::Declaration(decl) => self.lower_declaration(decl)?,
            past::ForInit::Expr(expr) => {
                self.lower_expr(expr)?;
            }
            past::ForInit::None => {}
        }

        self.emit(Instruction::Label(start_label.clone()));
        if let Some(cond) = cond {
            let cond_value = self.lower_expr(cond)?;
            self.emit(Instruction::JumpIfZero {
                cond: cond_value,
                target: break_label.clone(),
            });
        }
        self.lower_statement(body)?;
        self.emit(Instruction::Label(continue_label));
        if let Some(post) = post {
            self.lower_expr(post)?;
        }
        self.emit(Instruction::Jump(start_label));
        self.emit(Instruction::Label(break_label));
        Ok(())
    }

    fn lower_expr(&mut self, expr: &past::Expr) -> Result<Value, CompileError> {
        match expr {
            past::Expr::NumLiteral { value, .. } => Ok(Value::Constant(*value)),
            past::Expr::Variable { name, .. } => Ok(Value::Variable(name.clone())),
            past::Expr::Unary { op, operand, .. } => {
                let src = self.lower_expr(operand)?;
                let dst = self.fresh_temp();
                self.emit(Instruction::Unary {
                    op: *op,
                    src,
                    dst: dst.clone(),
                });
                Ok(dst)
            }
            past::Expr::Binary {
                op, left, right, ..
            } if op.is_short_circuit() => self.lower_short_circuit(*op, left, right),
            past::Expr::Binary {
                op, left, right, ..
            } => {
                let src1 = self.lower_expr(left)?;
                let src2 = self.lower_expr(right)?;
                let dst = self.fresh_temp();
                self.emit(Instruction::Binary {
                    op: *op,
                    src1,
                    src2,
                    dst: dst.clone(),
                });
                Ok(dst)
            }
            past::Expr::Assignment { lvalue, rvalue, .. } => {
                let past::Expr::Variable { name, .. } = lvalue.as_ref() else {
                    return Err(CompileError::codegen(
                        "assignment target is not a variable after resolution",
                    ));
                };
                let value = self.lower_expr(rvalue)?;
                let dst = Value::Variable(name.clone());
                self.emit(Instruction::Copy {
                    src: value,
                    dst: dst.clone(),
                });
                Ok(dst)
            }
            past::Expr::Conditional {
                cond,
                then_expr,
                else_expr,
                ..
            } => self.lower_conditional(cond, then_expr, else_expr),
        }
    }

    fn lower_short_circuit(
        &mut self,
        op: past::BinaryOp,
        left: &past::Expr,
        right: &past::Expr,
    ) -> Result<Value, CompileError> {
        let result = self.fresh_temp();
        let end_label = self.fresh_label("end");

        if op == past::BinaryOp::And {
            let false_label = self.fresh_label("false");
            let left_value = self.lower_expr(left)?;
            self.emit(Instruction::JumpIfZero {
                cond: left_value,
                target: false_label.clone(),
            });
            let right_value = self.lower_expr(right)?;
            self.emit(Instruction::JumpIfZero {
                cond: right_value,
                target: false_label.clone(),
            });
            self.emit(Instruction::Copy {
                src: Value::Constant(1),
                dst: result.clone(),
            });
            self.emit(Instruction::Jump(end_label.clone()));
            self.emit(Instruction::Label(false_label));
            self.emit(Instruction::Copy {
                src: Value::Constant(0),
                dst: result.clone(),
            });
            self.emit(Instruction::Label(end_label));
        } else {
            let true_label = self.fresh_label("true");
            let left_value = self.lower_expr(left)?;
            self.emit(Instruction::JumpIfNotZero {
                cond: left_value,
                target: true_label.clone(),
            });
            let right_value = self.lower_expr(right)?;
            self.emit(Instruction::JumpIfNotZero {
                cond: right_value,
                target: true_label.clone(),
            });
            self.emit(Instruction::Copy {
                src: Value::Constant(0),
                dst: result.clone(),
            });
            self.emit(Instruction::Jump(end_label.clone()));
            self.emit(Instruction::Label(true_label));
            self.emit(Instruction::Copy {
                src: Value::Constant(1),
                dst: result.clone(),
            });
            self.emit(Instruction::Label(end_label));
        }

        Ok(result)
    }

    fn lower_conditional(
        &mut self,
        cond: &past::Expr,
        then_expr: &past::Expr,
        else_expr: &past::Expr,
    ) -> Result<Value, CompileError> {
        let result = self.fresh_temp();
        let else_label = self.fresh_label("else");
        let end_label = self.fresh_label("end");

        let cond_value = self.lower_expr(cond)?;
        self.emit(Instruction::JumpIfZero {
            cond: cond_value,
            target: else_label.clone(),
        });
        let then_value = self.lower_expr(then_expr)?;
        self.emit(Instruction::Copy {
            src: then_value,
            dst: result.clone(),
        });
        self.emit(Instruction::Jump(end_label.clone()));
        self.emit(Instruction::Label(else_label));
        let else_value = self.lower_expr(else_expr)?;
        self.emit(Instruction::Copy {
            src: else_value,
            dst: result.clone(),
        });
        self.emit(Instruction::Label(end_label));

        Ok(result)
    }
}
