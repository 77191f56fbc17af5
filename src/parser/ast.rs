//! # Abstract Syntax Tree (AST)
//!
//! Defines the data structures produced by the parser and rewritten in
//! place by the two semantic passes (variable resolution, loop labeling).
//!
//! ## Design Philosophy
//!
//! Every statement and expression node carries the 1-indexed source line it
//! started on, so a failure anywhere downstream (resolution, labeling,
//! codegen) can still point at a specific line without threading a
//! position separately through every pass.
//!
//! `Variable.name` and `Declaration.name` hold the *source* name until the
//! variable resolver runs, at which point they are rewritten in place to
//! hold the globally unique name. There is no separate `symbol` field:
//! holding one field that means "source name, then unique name" is the
//! same trick the resolver's renaming scheme already relies on (see
//! `crate::resolver`), and it avoids carrying two names once the pass has
//! run.

#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub functions: Vec<Function>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: String,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub items: Vec<BlockItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BlockItem {
    Declaration(Declaration),
    Statement(Statement),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub name: String,
    pub init: Option<Expr>,
    pub line: usize,
}

/// The init clause of a `for` loop: a declaration, a bare expression, or
/// nothing (`for (;;)`).
#[derive(Debug, Clone, PartialEq)]
pub enum ForInit {
    Declaration(Declaration),
    Expr(Expr),
    None,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Return {
        expr: Expr,
        line: usize,
    },
    Expression {
        expr: Expr,
        line: usize,
    },
    If {
        cond: Expr,
        then_branch: Box<Statement>,
        else_branch: Option<Box<Statement>>,
        line: usize,
    },
    Compound {
        block: Block,
        line: usize,
    },
    While {
        cond: Expr,
        body: Box<Statement>,
        /// Filled in by the loop labeler.
        label: Option<String>,
        line: usize,
    },
    DoWhile {
        cond: Expr,
        body: Box<Statement>,
        label: Option<String>,
        line: usize,
    },
    For {
        init: ForInit,
        cond: Option<Expr>,
        post: Option<Expr>,
        body: Box<Statement>,
        label: Option<String>,
        line: usize,
    },
    Break {
        /// Filled in by the loop labeler; absent (and rejected) if there is
        /// no enclosing loop.
        label: Option<String>,
        line: usize,
    },
    Continue {
        label: Option<String>,
        line: usize,
    },
    Null {
        line: usize,
    },
}

impl Statement {
    pub fn line(&self) -> usize {
        match self {
            Statement::Return { line, .. }
            | Statement::Expression { line, .. }
            | Statement::If { line, .. }
            | Statement::Compound { line, .. }
            | Statement::While { line, .. }
            | Statement::DoWhile { line, .. }
            | Statement::For { line, .. }
            | Statement::Break { line, .. }
            | Statement::Continue { line, .. }
            | Statement::Null { line } => *line,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Complement,
    Negate,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Remainder,
    And,
    Or,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
}

impl BinaryOp {
    /// Whether this operator short-circuits its right operand (`&&`, `||`).
    /// Everything else always evaluates both sides.
    pub fn is_short_circuit(self) -> bool {
        matches!(self, BinaryOp::And | BinaryOp::Or)
    }

    pub fn is_relational(self) -> bool {
        matches!(
            self,
            BinaryOp::Equal
                | BinaryOp::NotEqual
                | BinaryOp::Less
                | BinaryOp::LessEqual
                | BinaryOp::Greater
                | BinaryOp::GreaterEqual
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    NumLiteral {
        value: i32,
        line: usize,
    },
    Variable {
        name: String,
        line: usize,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
        line: usize,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
        line: usize,
    },
    Assignment {
        lvalue: Box<Expr>,
        rvalue: Box<Expr>,
        line: usize,
    },
    Conditional {
        cond: Box<Expr>,
        then_expr: Box<Expr>,
        else_expr: Box<Expr>,
        line: usize,
    },
}

impl Expr {
    pub fn line(&self) -> usize {
        match self {
            Expr::NumLiteral { line, .. }
            | Expr::Variable { line, .. }
            | Expr::Unary { line, .. }
            | Expr::Binary { line, .. }
            | Expr::Assignment { line, .. }
            | Expr::Conditional { line, .. } => *line,
        }
    }
}
