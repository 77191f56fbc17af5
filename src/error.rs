//! Crate-wide error type.
//!
//! Every pass returns `Result<_, CompileError>`. There is no diagnostics
//! accumulation: the first error encountered anywhere in the pipeline is
//! fatal and is the only one ever shown to the user.

/// A single compile-time failure, tagged with the pass that raised it.
///
/// Each variant carries the information needed to produce exactly one
/// diagnostic line; none of them carry enough to recover and keep going.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// The lexer found a byte sequence it doesn't recognize.
    Lex { line: usize, message: String },
    /// The parser found a token it didn't expect.
    Parse { line: usize, message: String },
    /// Variable resolution rejected a duplicate declaration, an undeclared
    /// reference, or an invalid assignment target.
    VariableResolution { line: usize, message: String },
    /// A `break` or `continue` appeared outside any loop.
    LoopLabeling { line: usize, message: String },
    /// Code generation hit a TAC construct it has no lowering rule for.
    /// Should never happen from a well-formed pipeline; indicates a bug in
    /// an earlier pass.
    Codegen { message: String },
    /// The emitter hit an asm construct it has no text rendering for. Same
    /// caveat as `Codegen`.
    Emission { message: String },
}

impl CompileError {
    pub fn lex(line: usize, message: impl Into<String>) -> Self {
        CompileError::Lex {
            line,
            message: message.into(),
        }
    }

    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        CompileError::Parse {
            line,
            message: message.into(),
        }
    }

    pub fn variable_resolution(line: usize, message: impl Into<String>) -> Self {
        CompileError::VariableResolution {
            line,
            message: message.into(),
        }
    }

    pub fn loop_labeling(line: usize, message: impl Into<String>) -> Self {
        CompileError::LoopLabeling {
            line,
            message: message.into(),
        }
    }

    pub fn codegen(message: impl Into<String>) -> Self {
        CompileError::Codegen {
            message: message.into(),
        }
    }

    pub fn emission(message: impl Into<String>) -> Self {
        CompileError::Emission {
            message: message.into(),
        }
    }

    /// The pass-level tag, used by the driver only for the process exit
    /// code (all fatal kinds currently share exit code 1, but distinct
    /// tags keep the door open for per-kind codes without touching call
    /// sites).
    pub fn kind_name(&self) -> &'static str {
        match self {
            CompileError::Lex { .. } => "lex",
            CompileError::Parse { .. } => "parse",
            CompileError::VariableResolution { .. } => "variable resolution",
            CompileError::LoopLabeling { .. } => "loop labeling",
            CompileError::Codegen { .. } => "codegen",
            CompileError::Emission { .. } => "emission",
        }
    }
}

impl std::fmt::Display for CompileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompileError::Lex { line, message } => write!(f, "{line}: error: {message}"),
            CompileError::Parse { line, message } => write!(f, "{line}: error: {message}"),
            CompileError::VariableResolution { line, message } => {
                write!(f, "{line}: error: {message}")
            }
            CompileError::LoopLabeling { line, message } => {
                write!(f, "{line}: error: {message}")
            }
            CompileError::Codegen { message } => write!(f, "error: {message}"),
            CompileError::Emission { message } => write!(f, "error: {message}"),
        }
    }
}

impl std::error::Error for CompileError {}
