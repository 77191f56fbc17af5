//! # Codegen Pass B — pseudoregister rewrite
//!
//! First-fit assignment of each distinct `Pseudo` symbol to a 4-byte stack
//! slot, at successively decreasing offsets from the frame base (`-4`,
//! `-8`, …). Prepends `AllocateStack` sized to the deepest slot used, if
//! any `Pseudo` was seen at all.

use std::collections::HashMap;

use super::ast::{Function, Instruction, Operand, Program};

pub fn assign_stack_slots(program: &Program) -> Program {
    Program {
        functions: program.functions.iter().map(assign_function).collect(),
    }
}

fn assign_function(function: &Function) -> Function {
    let mut slots: HashMap<String, i32> = HashMap::new();
    let mut next_offset: i32 = 0;

    let mut body: Vec<Instruction> = function
        .body
        .iter()
        .map(|instr| rewrite_instruction(instr, &mut slots, &mut next_offset))
        .collect();

    if next_offset != 0 {
        body.insert(0, Instruction::AllocateStack(-next_offset));
    }

    Function {
        name: function.name.clone(),
        body,
    }
}

fn assign_slot(name: &str, slots: &mut HashMap<String, i32>, next_offset: &mut i32) -> i32 {
    if let Some(offset) = slots.get(name) {
        return *offset;
    }
    *next_offset -= 4;
    slots.insert(name.to_string(), *next_offset);
    *next_offset
}

fn rewrite_operand(operand: &Operand, slots: &mut HashMap<String, i32>, next_offset: &mut i32) -> Operand {
    match operand {
        Operand::Pseudo(name) => Operand::Stack(assign_slot(name, slots, next_offset)),
        other => other.clone(),
    }
}

fn rewrite_instruction(
    instr: &Instruction,
    slots: &mut HashMap<String, i32>,
    next_offset: &mut i32,
) -> Instruction {
    match instr {
        Instruction::Mov { src, dst } => Instruction::Mov {
            src: rewrite_operand(src, slots, next_offset),
            dst: rewrite_operand(dst, slots, next_offset),
        },
        Instruction::UnaryOp { op, operand } => Instruction::UnaryOp {
            op: *op,
            operand: rewrite_operand(operand, slots, next_offset),
        },
        Instruction::BinaryOp { op, src, dst } => Instruction::BinaryOp {
            op: *op,
            src: rewrite_operand(src, slots, next_offset),
            dst: rewrite_operand(dst, slots, next_offset),
        },
        Instruction::Cmp { a, b } => Instruction::Cmp {
            a: rewrite_operand(a, slots, next_offset),
            b: rewrite_operand(b, slots, next_offset),
        },
        Instruction::Idiv(operand) => Instruction::Idiv(rewrite_operand(operand, slots, next_offset)),
        Instruction::SetCC { cond, operand } => Instruction::SetCC {
            cond: *cond,
            operand: rewrite_operand(operand, slots, next_offset),
        },
        Instruction::Cdq
        | Instruction::Jmp(_)
        | Instruction::JmpCC { .. }
        | Instruction::Label(_)
        | Instruction::AllocateStack(_)
        | Instruction::Ret => instr.clone(),
    }
}
