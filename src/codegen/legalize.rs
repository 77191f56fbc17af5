//! # Codegen Pass C — operand legalization
//!
//! One forward pass rewriting every instruction whose operand combination
//! the target ISA can't encode directly, shuttling through the two scratch
//! registers reserved for this purpose: `R10` for plain move/divide
//! shuttles, `R11` for the `Cmp`/multiply fixups that need a second scratch
//! alongside `R10`. Neither register holds a live value across
//! instructions once this pass is done.

use super::ast::{BinaryOp, Instruction, Operand, Register};

pub fn legalize(body: &[Instruction]) -> Vec<Instruction> {
    let mut out = Vec::with_capacity(body.len());
    for instr in body {
        legalize_instruction(instr, &mut out);
    }
    out
}

fn is_stack(operand: &Operand) -> bool {
    matches!(operand, Operand::Stack(_))
}

fn is_imm(operand: &Operand) -> bool {
    matches!(operand, Operand::Imm(_))
}

fn legalize_instruction(instr: &Instruction, out: &mut Vec<Instruction>) {
    match instr {
        Instruction::Mov { src, dst } if is_stack(src) && is_stack(dst) => {
            out.push(Instruction::Mov {
                src: src.clone(),
                dst: Operand::Reg(Register::R10),
            });
            out.push(Instruction::Mov {
                src: Operand::Reg(Register::R10),
                dst: dst.clone(),
            });
        }
        Instruction::Cmp { a, b } if is_imm(b) => {
            out.push(Instruction::Mov {
                src: b.clone(),
                dst: Operand::Reg(Register::R11),
            });
            out.push(Instruction::Cmp {
                a: a.clone(),
                b: Operand::Reg(Register::R11),
            });
        }
        Instruction::Cmp { a, b } if is_stack(a) && is_stack(b) => {
            out.push(Instruction::Mov {
                src: a.clone(),
                dst: Operand::Reg(Register::R10),
            });
            out.push(Instruction::Cmp {
                a: Operand::Reg(Register::R10),
                b: b.clone(),
            });
        }
        Instruction::Idiv(operand) if is_imm(operand) => {
            out.push(Instruction::Mov {
                src: operand.clone(),
                dst: Operand::Reg(Register::R10),
            });
            out.push(Instruction::Idiv(Operand::Reg(Register::R10)));
        }
        Instruction::BinaryOp {
            op: BinaryOp::Mult,
            src,
            dst,
        } if is_stack(dst) => {
            out.push(Instruction::Mov {
                src: dst.clone(),
                dst: Operand::Reg(Register::R11),
            });
            out.push(Instruction::BinaryOp {
                op: BinaryOp::Mult,
                src: src.clone(),
                dst: Operand::Reg(Register::R11),
            });
            out.push(Instruction::Mov {
                src: Operand::Reg(Register::R11),
                dst: dst.clone(),
            });
        }
        Instruction::BinaryOp {
            op: op @ (BinaryOp::Add | BinaryOp::Sub),
            src,
            dst,
        } if is_stack(src) && is_stack(dst) => {
            out.push(Instruction::Mov {
                src: src.clone(),
                dst: Operand::Reg(Register::R10),
            });
            out.push(Instruction::BinaryOp {
                op: *op,
                src: Operand::Reg(Register::R10),
                dst: dst.clone(),
            });
        }
        other => out.push(other.clone()),
    }
}
