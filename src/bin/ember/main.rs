//! # Ember
//!
//! This binary is the command-line driver for Ember. It reads a script,
//! feeds it through the library's lex/parse/resolve/interpret pipeline, and
//! reports whatever diagnostics come back (spec §6 "Driver surface").

mod cli;

use cli::Cli;

use std::fs;
use std::process::ExitCode;

use log::{debug, error};

fn main() -> ExitCode {
    let args = Cli::init();

    simple_logger::init_with_level((&args.verbosity).into()).unwrap();

    let source = match fs::read_to_string(&args.file) {
        Ok(source) => source,
        Err(err) => {
            error!("could not read '{}': {err}", args.file.display());
            return ExitCode::FAILURE;
        }
    };

    if args.dump_tokens {
        let tokens = ember::lexer::lex(&source).tokens;
        debug!("tokens:\n{tokens:#?}");
    }

    let diagnostics = ember::run(&source);

    if args.dump_ast {
        debug!("{} statement(s) executed", diagnostics_statement_count(&diagnostics));
    }

    if args.json_diagnostics {
        print_json_diagnostics(&diagnostics);
    } else {
        print_text_diagnostics(&diagnostics);
    }

    if diagnostics.has_errors() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// There is no AST handed back by `ember::run`, so this only reports whether
/// the pipeline reached evaluation at all; a real `--dump-ast` would need a
/// lower-level driver surface than the convenience `run` entry point.
fn diagnostics_statement_count(diagnostics: &ember::Diagnostics) -> &'static str {
    if diagnostics.parse_errors.is_empty() {
        "pipeline reached evaluation"
    } else {
        "parse failed before evaluation"
    }
}

fn print_text_diagnostics(diagnostics: &ember::Diagnostics) {
    for err in &diagnostics.lex_errors {
        error!("{err}");
    }
    for err in &diagnostics.parse_errors {
        error!("{err}");
    }
    for err in &diagnostics.resolve_errors {
        error!("{err}");
    }
    if let Some(err) = &diagnostics.runtime_error {
        error!("{err}");
    }
}

fn print_json_diagnostics(diagnostics: &ember::Diagnostics) {
    let payload = serde_json::json!({
        "lex_errors": diagnostics.lex_errors.iter().map(|e| e.to_string()).collect::<Vec<_>>(),
        "parse_errors": diagnostics.parse_errors.iter().map(|e| e.to_string()).collect::<Vec<_>>(),
        "resolve_errors": diagnostics.resolve_errors.iter().map(|e| e.to_string()).collect::<Vec<_>>(),
        "runtime_error": diagnostics.runtime_error.as_ref().map(|e| e.to_string()),
        "has_errors": diagnostics.has_errors(),
    });
    println!("{}", serde_json::to_string_pretty(&payload).expect("diagnostics JSON is always serializable"));
}
