//! CLI driver: reads the source file once, runs the pipeline up to the
//! requested stage, and either dumps the intermediate tree (stage flags) or
//! writes the final assembly file (no stage flag).
//!
//! No local error recovery: on the first `CompileError` from any pass, the
//! driver prints one diagnostic line to stderr and exits non-zero without
//! touching the output path.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser as ClapParser;
use tracing::{debug, error};

use minic::error::CompileError;
use minic::{codegen, emit, lexer, loop_labeler, parser, resolver, tacky};

/// Which pipeline stage to stop after. `None` runs the full pipeline and
/// writes the assembly file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Stage {
    Lex,
    Parse,
    Validate,
    Tacky,
    Codegen,
}

#[derive(ClapParser, Debug)]
#[command(
    name = "compile",
    about = "A compiler for a small subset of C, targeting x86-64 assembly text"
)]
struct Cli {
    /// Source file to compile.
    source: PathBuf,

    /// Stop after lexing and dump the token stream.
    #[arg(long, conflicts_with_all = ["parse", "validate", "tacky", "codegen"])]
    lex: bool,

    /// Stop after parsing and dump the AST.
    #[arg(long, conflicts_with_all = ["lex", "validate", "tacky", "codegen"])]
    parse: bool,

    /// Stop after the semantic passes (variable resolution, loop labeling)
    /// and dump the rewritten AST.
    #[arg(long, conflicts_with_all = ["lex", "parse", "tacky", "codegen"])]
    validate: bool,

    /// Stop after TAC generation and dump the three-address code.
    #[arg(long, conflicts_with_all = ["lex", "parse", "validate", "codegen"])]
    tacky: bool,

    /// Stop after codegen and dump the (legalized) asm tree.
    #[arg(long, conflicts_with_all = ["lex", "parse", "validate", "tacky"])]
    codegen: bool,

    /// Output assembly file path (full pipeline only).
    #[arg(short, long, default_value = "out.asm")]
    output: PathBuf,

    /// Raise the tracing filter from warnings-only to per-pass debug spans.
    /// Does not affect compiled output.
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn stage(&self) -> Option<Stage> {
        if self.lex {
            Some(Stage::Lex)
        } else if self.parse {
            Some(Stage::Parse)
        } else if self.validate {
            Some(Stage::Validate)
        } else if self.tacky {
            Some(Stage::Tacky)
        } else if self.codegen {
            Some(Stage::Codegen)
        } else {
            None
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(kind = err.kind_name(), "{err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_target(false)
        .without_time()
        .init();
}

fn run(cli: &Cli) -> Result<(), CompileError> {
    let source = std::fs::read_to_string(&cli.source).map_err(|err| {
        CompileError::lex(
            0,
            format!("could not read '{}': {err}", cli.source.display()),
        )
    })?;

    let tokens = {
        let _span = tracing::debug_span!("lex").entered();
        let tokens = lexer::tokenize(&source)?;
        debug!(count = tokens.len(), "tokens produced");
        tokens
    };
    if cli.stage() == Some(Stage::Lex) {
        println!("{tokens:#?}");
        return Ok(());
    }

    let mut program = {
        let _span = tracing::debug_span!("parse").entered();
        let program = parser::parse(&tokens)?;
        debug!(functions = program.functions.len(), "functions parsed");
        program
    };
    if cli.stage() == Some(Stage::Parse) {
        println!("{program:#?}");
        return Ok(());
    }

    {
        let _span = tracing::debug_span!("resolve_variables").entered();
        resolver::resolve(&mut program)?;
        debug!("variable resolution complete");
    }
    {
        let _span = tracing::debug_span!("label_loops").entered();
        loop_labeler::label(&mut program)?;
        debug!("loop labeling complete");
    }
    if cli.stage() == Some(Stage::Validate) {
        println!("{program:#?}");
        return Ok(());
    }

    let tac = {
        let _span = tracing::debug_span!("tacky").entered();
        let tac = tacky::generate(&program)?;
        debug!(
            functions = tac.functions.len(),
            "three-address code generated"
        );
        tac
    };
    if cli.stage() == Some(Stage::Tacky) {
        println!("{tac:#?}");
        return Ok(());
    }

    let asm = {
        let asm = codegen::generate(&tac)?;
        debug!(functions = asm.functions.len(), "asm tree generated");
        asm
    };
    if cli.stage() == Some(Stage::Codegen) {
        println!("{asm:#?}");
        return Ok(());
    }

    let text = {
        let _span = tracing::debug_span!("emit").entered();
        let text = emit::emit(&asm)?;
        debug!(bytes = text.len(), "assembly text emitted");
        text
    };

    std::fs::write(&cli.output, text)
        .map_err(|err| CompileError::emission(format!("could not write output: {err}")))?;
    Ok(())
}
