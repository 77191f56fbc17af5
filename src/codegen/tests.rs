use crate::lexer::tokenize;
use crate::loop_labeler;
use crate::parser::parse;
use crate::resolver;
use crate::tacky;

use super::ast::{BinaryOp, ConditionCode, Instruction, Operand, Register};
use super::{legalize::legalize, select::select, stack::assign_stack_slots};

fn full_pipeline(src: &str) -> Vec<Instruction> {
    let wrapped = format!("int main(void) {{ {src} }}");
    let tokens = tokenize(&wrapped).unwrap();
    let mut program = parse(&tokens).unwrap();
    resolver::resolve(&mut program).unwrap();
    loop_labeler::label(&mut program).unwrap();
    let tac = tacky::generate(&program).unwrap();
    let asm = super::generate(&tac).unwrap();
    asm.functions.into_iter().next().unwrap().body
}

#[test]
fn return_constant_moves_into_ax() {
    let body = full_pipeline("return 2;");
    assert_eq!(
        body,
        vec![
            Instruction::Mov {
                src: Operand::Imm(2),
                dst: Operand::Reg(Register::Ax),
            },
            Instruction::Ret,
        ]
    );
}

#[test]
fn three_distinct_locals_get_three_stack_slots_and_one_allocation() {
    let body = full_pipeline("int a = 1; int b = a + 2; return b;");
    assert!(matches!(body[0], Instruction::AllocateStack(12)));
    let stack_offsets: Vec<i32> = body
        .iter()
        .flat_map(|i| match i {
            Instruction::Mov { src, dst } => vec![src, dst],
            Instruction::BinaryOp { src, dst, .. } => vec![src, dst],
            _ => vec![],
        })
        .filter_map(|op| match op {
            Operand::Stack(n) => Some(*n),
            _ => None,
        })
        .collect();
    assert!(stack_offsets.contains(&-4));
    assert!(stack_offsets.contains(&-8));
    assert!(stack_offsets.contains(&-12));
}

#[test]
fn division_shuttles_immediate_divisor_through_r10() {
    let body = full_pipeline("return 10 / 3;");
    let idiv_pos = body
        .iter()
        .position(|i| matches!(i, Instruction::Idiv(Operand::Reg(Register::R10))))
        .expect("expected Idiv(R10) after legalization");
    assert!(matches!(
        body[idiv_pos - 1],
        Instruction::Mov {
            dst: Operand::Reg(Register::R10),
            ..
        }
    ));
}

#[test]
fn no_pseudo_operand_survives_pass_b() {
    let wrapped = "int main(void) { int a = 1; return a; }".to_string();
    let tokens = tokenize(&wrapped).unwrap();
    let mut program = parse(&tokens).unwrap();
    resolver::resolve(&mut program).unwrap();
    loop_labeler::label(&mut program).unwrap();
    let tac = tacky::generate(&program).unwrap();
    let selected = select(&tac).unwrap();
    let stack_assigned = assign_stack_slots(&selected);
    for function in &stack_assigned.functions {
        for instr in &function.body {
            let operands = match instr {
                Instruction::Mov { src, dst } => vec![src, dst],
                Instruction::UnaryOp { operand, .. } => vec![operand],
                Instruction::BinaryOp { src, dst, .. } => vec![src, dst],
                Instruction::Cmp { a, b } => vec![a, b],
                Instruction::Idiv(operand) => vec![operand],
                Instruction::SetCC { operand, .. } => vec![operand],
                _ => vec![],
            };
            for op in operands {
                assert!(!matches!(op, Operand::Pseudo(_)));
            }
        }
    }
}

// --- Legalization rules exercised in isolation, per §4.8. ---

#[test]
fn mov_stack_to_stack_is_split_through_r10() {
    let body = vec![Instruction::Mov {
        src: Operand::Stack(-4),
        dst: Operand::Stack(-8),
    }];
    let legal = legalize(&body);
    assert_eq!(
        legal,
        vec![
            Instruction::Mov {
                src: Operand::Stack(-4),
                dst: Operand::Reg(Register::R10),
            },
            Instruction::Mov {
                src: Operand::Reg(Register::R10),
                dst: Operand::Stack(-8),
            },
        ]
    );
}

#[test]
fn cmp_with_immediate_second_operand_shuttles_through_r11() {
    let body = vec![Instruction::Cmp {
        a: Operand::Stack(-4),
        b: Operand::Imm(5),
    }];
    let legal = legalize(&body);
    assert_eq!(
        legal,
        vec![
            Instruction::Mov {
                src: Operand::Imm(5),
                dst: Operand::Reg(Register::R11),
            },
            Instruction::Cmp {
                a: Operand::Stack(-4),
                b: Operand::Reg(Register::R11),
            },
        ]
    );
}

#[test]
fn cmp_stack_stack_shuttles_first_operand_through_r10() {
    let body = vec![Instruction::Cmp {
        a: Operand::Stack(-4),
        b: Operand::Stack(-8),
    }];
    let legal = legalize(&body);
    assert_eq!(
        legal,
        vec![
            Instruction::Mov {
                src: Operand::Stack(-4),
                dst: Operand::Reg(Register::R10),
            },
            Instruction::Cmp {
                a: Operand::Reg(Register::R10),
                b: Operand::Stack(-8),
            },
        ]
    );
}

#[test]
fn idiv_immediate_shuttles_through_r10() {
    let body = vec![Instruction::Idiv(Operand::Imm(3))];
    let legal = legalize(&body);
    assert_eq!(
        legal,
        vec![
            Instruction::Mov {
                src: Operand::Imm(3),
                dst: Operand::Reg(Register::R10),
            },
            Instruction::Idiv(Operand::Reg(Register::R10)),
        ]
    );
}

#[test]
fn multiply_with_stack_destination_shuttles_through_r11() {
    let body = vec![Instruction::BinaryOp {
        op: BinaryOp::Mult,
        src: Operand::Imm(2),
        dst: Operand::Stack(-4),
    }];
    let legal = legalize(&body);
    assert_eq!(
        legal,
        vec![
            Instruction::Mov {
                src: Operand::Stack(-4),
                dst: Operand::Reg(Register::R11),
            },
            Instruction::BinaryOp {
                op: BinaryOp::Mult,
                src: Operand::Imm(2),
                dst: Operand::Reg(Register::R11),
            },
            Instruction::Mov {
                src: Operand::Reg(Register::R11),
                dst: Operand::Stack(-4),
            },
        ]
    );
}

#[test]
fn additive_binary_op_stack_stack_shuttles_through_r10() {
    let body = vec![Instruction::BinaryOp {
        op: BinaryOp::Add,
        src: Operand::Stack(-4),
        dst: Operand::Stack(-8),
    }];
    let legal = legalize(&body);
    assert_eq!(
        legal,
        vec![
            Instruction::Mov {
                src: Operand::Stack(-4),
                dst: Operand::Reg(Register::R10),
            },
            Instruction::BinaryOp {
                op: BinaryOp::Add,
                src: Operand::Reg(Register::R10),
                dst: Operand::Stack(-8),
            },
        ]
    );
}

#[test]
fn additive_binary_op_with_immediate_source_passes_through() {
    let body = vec![Instruction::BinaryOp {
        op: BinaryOp::Add,
        src: Operand::Imm(1),
        dst: Operand::Stack(-4),
    }];
    assert_eq!(legalize(&body), body);
}

#[test]
fn relational_sets_the_matching_condition_code() {
    let body = full_pipeline("return 1 < 2;");
    assert!(body
        .iter()
        .any(|i| matches!(i, Instruction::SetCC { cond: ConditionCode::L, .. })));
}
