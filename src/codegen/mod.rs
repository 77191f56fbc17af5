//! # Codegen
//!
//! Three passes turning TAC into a legal x86-64 asm tree: instruction
//! selection ([`select`]), pseudoregister-to-stack assignment ([`stack`]),
//! and operand legalization ([`legalize`]). Unlike the TAC generator these
//! passes build a fresh tree rather than mutate in place — each is a pure
//! function from one tree shape to the next, which keeps the legalization
//! rules in [`legalize`] testable in isolation from instruction selection.

pub mod ast;
pub mod legalize;
pub mod select;
pub mod stack;

#[cfg(test)]
mod tests;

use tracing::debug;

use crate::error::CompileError;
use crate::tacky::ast as tac;
use ast::{Function, Program};

/// Run all three codegen passes over lowered TAC.
pub fn generate(program: &tac::Program) -> Result<Program, CompileError> {
    let selected = {
        let _span = tracing::debug_span!("codegen_select").entered();
        let selected = select::select(program)?;
        debug!(functions = selected.functions.len(), "instructions selected");
        selected
    };
    let stack_assigned = {
        let _span = tracing::debug_span!("codegen_stack").entered();
        let assigned = stack::assign_stack_slots(&selected);
        debug!(functions = assigned.functions.len(), "stack slots assigned");
        assigned
    };
    let functions = {
        let _span = tracing::debug_span!("codegen_legalize").entered();
        stack_assigned
            .functions
            .into_iter()
            .map(|f| Function {
                name: f.name,
                body: legalize::legalize(&f.body),
            })
            .collect()
    };
    Ok(Program { functions })
}
