//! # Codegen Pass A — instruction selection
//!
//! Lowers TAC to the asm tree, one TAC instruction at a time. Every TAC
//! `Variable` becomes a `Pseudo` operand; `Pseudo` assignment to real stack
//! slots is pass B's job, not this one's.

use crate::error::CompileError;
use crate::parser::ast::{BinaryOp as AstBinaryOp, UnaryOp as AstUnaryOp};
use crate::tacky::ast as tac;

use super::ast::{BinaryOp, ConditionCode, Function, Instruction, Operand, Program, Register, UnaryOp};

pub fn select(program: &tac::Program) -> Result<Program, CompileError> {
    let functions = program
        .functions
        .iter()
        .map(select_function)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Program { functions })
}

fn select_function(function: &tac::Function) -> Result<Function, CompileError> {
    let mut body = Vec::new();
    for instr in &function.body {
        select_instruction(instr, &mut body)?;
    }
    Ok(Function {
        name: function.name.clone(),
        body,
    })
}

fn operand(value: &tac::Value) -> Operand {
    match value {
        tac::Value::Constant(n) => Operand::Imm(*n),
        tac::Value::Variable(name) => Operand::Pseudo(name.clone()),
    }
}

fn condition_code(op: AstBinaryOp) -> ConditionCode {
    match op {
        AstBinaryOp::Equal => ConditionCode::E,
        AstBinaryOp::NotEqual => ConditionCode::NE,
        AstBinaryOp::Less => ConditionCode::L,
        AstBinaryOp::LessEqual => ConditionCode::LE,
        AstBinaryOp::Greater => ConditionCode::G,
        AstBinaryOp::GreaterEqual => ConditionCode::GE,
        other => unreachable!("{other:?} is not a relational operator"),
    }
}

fn select_instruction(
    instr: &tac::Instruction,
    out: &mut Vec<Instruction>,
) -> Result<(), CompileError> {
    match instr {
        tac::Instruction::Return(value) => {
            out.push(Instruction::Mov {
                src: operand(value),
                dst: Operand::Reg(Register::Ax),
            });
            out.push(Instruction::Ret);
        }
        tac::Instruction::Unary { op, src, dst } => select_unary(*op, src, dst, out),
        tac::Instruction::Binary {
            op,
            src1,
            src2,
            dst,
        } => select_binary(*op, src1, src2, dst, out),
        tac::Instruction::Copy { src, dst } => {
            out.push(Instruction::Mov {
                src: operand(src),
                dst: operand(dst),
            });
        }
        tac::Instruction::Jump(label) => out.push(Instruction::Jmp(label.clone())),
        tac::Instruction::JumpIfZero { cond, target } => {
            out.push(Instruction::Cmp {
                a: Operand::Imm(0),
                b: operand(cond),
            });
            out.push(Instruction::JmpCC {
                cond: ConditionCode::E,
                label: target.clone(),
            });
        }
        tac::Instruction::JumpIfNotZero { cond, target } => {
            out.push(Instruction::Cmp {
                a: Operand::Imm(0),
                b: operand(cond),
            });
            out.push(Instruction::JmpCC {
                cond: ConditionCode::NE,
                label: target.clone(),
            });
        }
        tac::Instruction::Label(name) => out.push(Instruction::Label(name.clone())),
    }
    Ok(())
}

fn select_unary(
    op: AstUnaryOp,
    src: &tac::Value,
    dst: &tac::Value,
    out: &mut Vec<Instruction>,
) {
    match op {
        AstUnaryOp::Complement => {
            out.push(Instruction::Mov {
                src: operand(src),
                dst: operand(dst),
            });
            out.push(Instruction::UnaryOp {
                op: UnaryOp::Not,
                operand: operand(dst),
            });
        }
        AstUnaryOp::Negate => {
            out.push(Instruction::Mov {
                src: operand(src),
                dst: operand(dst),
            });
            out.push(Instruction::UnaryOp {
                op: UnaryOp::Neg,
                operand: operand(dst),
            });
        }
        AstUnaryOp::Not => {
            out.push(Instruction::Cmp {
                a: Operand::Imm(0),
                b: operand(src),
            });
            out.push(Instruction::Mov {
                src: Operand::Imm(0),
                dst: operand(dst),
            });
            out.push(Instruction::SetCC {
                cond: ConditionCode::E,
                operand: operand(dst),
            });
        }
    }
}

fn select_binary(
    op: AstBinaryOp,
    src1: &tac::Value,
    src2: &tac::Value,
    dst: &tac::Value,
    out: &mut Vec<Instruction>,
) {
    match op {
        AstBinaryOp::Add | AstBinaryOp::Subtract | AstBinaryOp::Multiply => {
            let asm_op = match op {
                AstBinaryOp::Add => BinaryOp::Add,
                AstBinaryOp::Subtract => BinaryOp::Sub,
                AstBinaryOp::Multiply => BinaryOp::Mult,
                _ => unreachable!(),
            };
            out.push(Instruction::Mov {
                src: operand(src1),
                dst: operand(dst),
            });
            out.push(Instruction::BinaryOp {
                op: asm_op,
                src: operand(src2),
                dst: operand(dst),
            });
        }
        AstBinaryOp::Divide | AstBinaryOp::Remainder => {
            out.push(Instruction::Mov {
                src: operand(src1),
                dst: Operand::Reg(Register::Ax),
            });
            out.push(Instruction::Cdq);
            out.push(Instruction::Idiv(operand(src2)));
            let result_reg = if op == AstBinaryOp::Divide {
                Register::Ax
            } else {
                Register::Dx
            };
            out.push(Instruction::Mov {
                src: Operand::Reg(result_reg),
                dst: operand(dst),
            });
        }
        AstBinaryOp::And | AstBinaryOp::Or => {
            unreachable!("short-circuit operators are desugared by the TAC generator")
        }
        relational => {
            // Reversed so the condition code reads naturally with respect
            // to `src1 rel src2`.
            out.push(Instruction::Cmp {
                a: operand(src2),
                b: operand(src1),
            });
            out.push(Instruction::Mov {
                src: Operand::Imm(0),
                dst: operand(dst),
            });
            out.push(Instruction::SetCC {
                cond: condition_code(relational),
                operand: operand(dst),
            });
        }
    }
}
