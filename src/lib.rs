//! # minic
//!
//! A whole-program ahead-of-time compiler for a small subset of C, lowering
//! a single translation unit to x86-64 assembly text.
//!
//! ## Pipeline
//!
//! Each pass is a tree-rewriting step; the driver (`src/main.rs`) wires them
//! together and owns all I/O.
//!
//! 1. [`lexer`] — source text → tokens.
//! 2. [`parser`] — tokens → AST (recursive-descent + Pratt expression
//!    parsing).
//! 3. [`resolver`] — AST → AST in place; assigns every declared variable a
//!    globally unique name and rewrites references.
//! 4. [`loop_labeler`] — AST → AST in place; labels every loop and binds
//!    `break`/`continue` to it.
//! 5. [`tacky`] — AST → three-address code, flattening expressions and
//!    desugaring control flow.
//! 6. [`codegen`] — TAC → x86-64 asm tree, in three passes (instruction
//!    selection, pseudoregister-to-stack assignment, legalization).
//! 7. [`emit`] — asm tree → AT&T-syntax text.
//!
//! ## Example
//!
//! ```rust,no_run
//! use minic::{codegen, emit, lexer, loop_labeler, parser, resolver, tacky};
//!
//! let source = std::fs::read_to_string("program.c").unwrap();
//! let tokens = lexer::tokenize(&source).unwrap();
//! let mut program = parser::parse(&tokens).unwrap();
//! resolver::resolve(&mut program).unwrap();
//! loop_labeler::label(&mut program).unwrap();
//! let tac = tacky::generate(&program).unwrap();
//! let asm = codegen::generate(&tac).unwrap();
//! let text = emit::emit(&asm).unwrap();
//! println!("{text}");
//! ```

pub mod codegen;
pub mod emit;
pub mod error;
pub mod lexer;
pub mod loop_labeler;
pub mod parser;
pub mod resolver;
pub mod tacky;
