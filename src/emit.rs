//! # Emitter
//!
//! Serializes the final, legalized asm tree to AT&T-syntax text. Purely
//! mechanical: every decision about what to emit was already made by
//! codegen; this module only knows how to print the result.


use std::fmt::Write as _;

use crate::codegen::ast::{
    BinaryOp, ConditionCode, Function, Instruction, Operand, Program, Register, UnaryOp,
};
use crate::error::CompileError;

pub fn emit(program: &Program) -> Result<String, CompileError> {
    let mut out = String::new();
    for function in &program.functions {
        emit_function(function, &mut out)?;
    }
    Ok(out)
}

fn emit_function(function: &Function, out: &mut String) -> Result<(), CompileError> {
    writeln!(out, "\t.globl {}", function.name).map_err(emission_err)?;
    writeln!(out, "{}:", function.name).map_err(emission_err)?;
    writeln!(out, "\tpushq %rbp").map_err(emission_err)?;
    writeln!(out, "\tmovq %rsp, %rbp").map_err(emission_err)?;

    for instr in &function.body {
        emit_instruction(instr, out)?;
    }
    Ok(())
}

fn emission_err(e: std::fmt::Error) -> CompileError {
    CompileError::emission(e.to_string())
}

fn emit_instruction(instr: &Instruction, out: &mut String) -> Result<(), CompileError> {
    match instr {
        Instruction::Mov { src, dst } => {
            writeln!(out, "\tmovl {}, {}", render(src), render(dst)).map_err(emission_err)
        }
        Instruction::UnaryOp { op, operand } => {
            writeln!(out, "\t{} {}", unary_mnemonic(*op), render(operand)).map_err(emission_err)
        }
        Instruction::BinaryOp { op, src, dst } => writeln!(
            out,
            "\t{} {}, {}",
            binary_mnemonic(*op),
            render(src),
            render(dst)
        )
        .map_err(emission_err),
        Instruction::Cmp { a, b } => {
            writeln!(out, "\tcmpl {}, {}", render(a), render(b)).map_err(emission_err)
        }
        Instruction::Idiv(operand) => {
            writeln!(out, "\tidivl {}", render(operand)).map_err(emission_err)
        }
        Instruction::Cdq => writeln!(out, "\tcdq").map_err(emission_err),
        Instruction::Jmp(label) => writeln!(out, "\tjmp .L{label}").map_err(emission_err),
        Instruction::JmpCC { cond, label } => {
            writeln!(out, "\tj{} .L{label}", cc_suffix(*cond)).map_err(emission_err)
        }
        Instruction::SetCC { cond, operand } => writeln!(
            out,
            "\tset{} {}",
            cc_suffix(*cond),
            render_byte(operand)
        )
        .map_err(emission_err),
        Instruction::Label(name) => writeln!(out, ".L{name}:").map_err(emission_err),
        Instruction::AllocateStack(bytes) => {
            writeln!(out, "\tsubq ${bytes}, %rsp").map_err(emission_err)
        }
        Instruction::Ret => {
            writeln!(out, "\tmovq %rbp, %rsp").map_err(emission_err)?;
            writeln!(out, "\tpopq %rbp").map_err(emission_err)?;
            writeln!(out, "\tret").map_err(emission_err)
        }
    }
}

fn render(operand: &Operand) -> String {
    match operand {
        Operand::Imm(n) => format!("${n}"),
        Operand::Reg(reg) => format!("%{}", reg_name(*reg)),
        Operand::Stack(offset) => format!("{offset}(%rbp)"),
        Operand::Pseudo(name) => {
            unreachable!("pseudo operand '{name}' reached the emitter; codegen pass B is buggy")
        }
    }
}

/// One-byte sub-register rendering, used only for `SetCC` destinations.
fn render_byte(operand: &Operand) -> String {
    match operand {
        Operand::Reg(reg) => format!("%{}", reg_byte_name(*reg)),
        Operand::Stack(offset) => format!("{offset}(%rbp)"),
        other => render(other),
    }
}

fn reg_name(reg: Register) -> &'static str {
    match reg {
        Register::Ax => "eax",
        Register::Dx => "edx",
        Register::R10 => "r10d",
        Register::R11 => "r11d",
    }
}

fn reg_byte_name(reg: Register) -> &'static str {
    match reg {
        Register::Ax => "al",
        Register::Dx => "dl",
        Register::R10 => "r10b",
        Register::R11 => "r11b",
    }
}

fn unary_mnemonic(op: UnaryOp) -> &'static str {
    match op {
        UnaryOp::Not => "notl",
        UnaryOp::Neg => "negl",
    }
}

fn binary_mnemonic(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::Add => "addl",
        BinaryOp::Sub => "subl",
        BinaryOp::Mult => "imull",
    }
}

fn cc_suffix(cond: ConditionCode) -> &'static str {
    match cond {
        ConditionCode::E => "e",
        ConditionCode::NE => "ne",
        ConditionCode::L => "l",
        ConditionCode::LE => "le",
        ConditionCode::G => "g",
        ConditionCode::GE => "ge",
    }
}
