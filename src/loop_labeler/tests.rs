use crate::lexer::tokenize;
use crate::loop_labeler::label;
use crate::parser::ast::{BlockItem, Statement};
use crate::parser::parse;

fn label_body(src: &str) -> Vec<BlockItem> {
    let wrapped = format!("int main(void) {{ {src} }}");
    let tokens = tokenize(&wrapped).unwrap();
    let mut program = parse(&tokens).unwrap();
    label(&mut program).expect("labeling failed");
    program.functions.into_iter().next().unwrap().body.items
}

fn label_err(src: &str) -> crate::error::CompileError {
    let wrapped = format!("int main(void) {{ {src} }}");
    let tokens = tokenize(&wrapped).unwrap();
    let mut program = parse(&tokens).unwrap();
    label(&mut program).expect_err("expected a labeling error")
}

#[test]
fn while_loop_gets_a_label() {
    let items = label_body("while (1) { }");
    match &items[0] {
        BlockItem::Statement(Statement::While { label, .. }) => assert!(label.is_some()),
        other => panic!("expected While, got {other:?}"),
    }
}

#[test]
fn nested_loops_get_distinct_labels() {
    let items = label_body("while (1) { while (2) { } }");
    match &items[0] {
        BlockItem::Statement(Statement::While {
            label: outer_label,
            body,
            ..
        }) => match body.as_ref() {
            Statement::Compound { block, .. } => match &block.items[0] {
                BlockItem::Statement(Statement::While {
                    label: inner_label, ..
                }) => assert_ne!(outer_label, inner_label),
                other => panic!("expected inner While, got {other:?}"),
            },
            other => panic!("expected Compound body, got {other:?}"),
        },
        other => panic!("expected outer While, got {other:?}"),
    }
}

#[test]
fn break_binds_to_the_innermost_enclosing_loop() {
    let items = label_body("while (1) { while (2) { break; } }");
    match &items[0] {
        BlockItem::Statement(Statement::While { body, .. }) => match body.as_ref() {
            Statement::Compound { block, .. } => match &block.items[0] {
                BlockItem::Statement(Statement::While {
                    label: inner_label,
                    body: inner_body,
                    ..
                }) => match inner_body.as_ref() {
                    Statement::Compound { block, .. } => match &block.items[0] {
                        BlockItem::Statement(Statement::Break { label, .. }) => {
                            assert_eq!(label, inner_label);
                        }
                        other => panic!("expected Break, got {other:?}"),
                    },
                    other => panic!("expected Compound, got {other:?}"),
                },
                other => panic!("expected inner While, got {other:?}"),
            },
            other => panic!("expected Compound, got {other:?}"),
        },
        other => panic!("expected outer While, got {other:?}"),
    }
}

#[test]
fn continue_binds_to_a_for_loop() {
    let items = label_body("for (;;) { continue; }");
    match &items[0] {
        BlockItem::Statement(Statement::For {
            label: loop_label,
            body,
            ..
        }) => match body.as_ref() {
            Statement::Compound { block, .. } => match &block.items[0] {
                BlockItem::Statement(Statement::Continue { label, .. }) => {
                    assert_eq!(label, loop_label);
                }
                other => panic!("expected Continue, got {other:?}"),
            },
            other => panic!("expected Compound, got {other:?}"),
        },
        other => panic!("expected For, got {other:?}"),
    }
}

#[test]
fn break_outside_any_loop_is_an_error() {
    let err = label_err("break;");
    assert!(matches!(
        err,
        crate::error::CompileError::LoopLabeling { .. }
    ));
}

#[test]
fn continue_outside_any_loop_is_an_error() {
    let err = label_err("continue;");
    assert!(matches!(
        err,
        crate::error::CompileError::LoopLabeling { .. }
    ));
}

#[test]
fn break_inside_if_inside_loop_still_binds() {
    // `If` propagates the active label unchanged.
    let items = label_body("while (1) { if (1) break; }");
    match &items[0] {
        BlockItem::Statement(Statement::While { body, .. }) => match body.as_ref() {
            Statement::Compound { block, .. } => match &block.items[0] {
                BlockItem::Statement(Statement::If { then_branch, .. }) => {
                    assert!(matches!(
                        then_branch.as_ref(),
                        Statement::Break { label: Some(_), .. }
                    ));
                }
                other => panic!("expected If, got {other:?}"),
            },
            other => panic!("expected Compound, got {other:?}"),
        },
        other => panic!("expected While, got {other:?}"),
    }
}

#[test]
fn break_after_a_loop_ends_is_an_error() {
    let err = label_err("while (1) { } break;");
    assert!(matches!(
        err,
        crate::error::CompileError::LoopLabeling { .. }
    ));
}
