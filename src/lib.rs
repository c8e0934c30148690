//! Core of a tree-walking interpreter for a small dynamically-typed
//! scripting language: lexer → parser → resolver → evaluator (spec §1).
//!
//! This crate is library-first: the binary in `src/bin/ember.rs` is a thin
//! CLI shell over the phases exposed here, mirroring the separation the
//! teacher repo draws between its library crate and `src/bin/why/`.

pub mod ast;
pub mod builtins;
pub mod environment;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod resolver;
pub mod token;
pub mod value;

use environment::RuntimeError;
use lexer::LexError;
use parser::ParseError;
use resolver::ResolveError;

/// Aggregates every diagnostic a driver collects from a single run so a
/// caller can report them all without the library choosing a presentation
/// (spec §6 "Driver surface").
#[derive(Debug, Default)]
pub struct Diagnostics {
    pub lex_errors: Vec<LexError>,
    pub parse_errors: Vec<ParseError>,
    pub resolve_errors: Vec<ResolveError>,
    pub runtime_error: Option<RuntimeError>,
}

impl Diagnostics {
    pub fn has_errors(&self) -> bool {
        !self.lex_errors.is_empty()
            || !self.parse_errors.is_empty()
            || !self.resolve_errors.is_empty()
            || self.runtime_error.is_some()
    }
}

/// Runs the full pipeline over `source`: lex, parse, resolve, then evaluate
/// only if every prior phase is clean (spec §6). Returns the collected
/// diagnostics regardless of outcome so a caller can print everything found.
pub fn run(source: &str) -> Diagnostics {
    let mut diagnostics = Diagnostics::default();

    let lex_output = lexer::lex(source);
    diagnostics.lex_errors = lex_output.errors;
    if diagnostics.lex_errors.iter().any(|e| e.fatal) {
        return diagnostics;
    }

    let (statements, parse_errors) = parser::parse(lex_output.tokens);
    diagnostics.parse_errors = parse_errors;
    if !diagnostics.parse_errors.is_empty() {
        return diagnostics;
    }

    let (locals, resolve_errors) = resolver::resolve(&statements);
    diagnostics.resolve_errors = resolve_errors;
    if !diagnostics.resolve_errors.is_empty() {
        return diagnostics;
    }

    let mut interp = interpreter::Interpreter::new(locals);
    if let Err(err) = interp.interpret(&statements) {
        diagnostics.runtime_error = Some(err);
    }

    diagnostics
}

/// Like [`run`], but also hands back the interpreter so a caller (an
/// embedder, or a test) can inspect top-level bindings via
/// [`interpreter::Interpreter::global`] after the script has run.
pub fn run_with_interpreter(source: &str) -> (Diagnostics, interpreter::Interpreter) {
    let mut diagnostics = Diagnostics::default();

    let lex_output = lexer::lex(source);
    diagnostics.lex_errors = lex_output.errors;

    let (statements, parse_errors) = if diagnostics.lex_errors.iter().any(|e| e.fatal) {
        (Vec::new(), Vec::new())
    } else {
        parser::parse(lex_output.tokens)
    };
    diagnostics.parse_errors = parse_errors;

    let (locals, resolve_errors) = if diagnostics.parse_errors.is_empty() {
        resolver::resolve(&statements)
    } else {
        (resolver::Locals::new(), Vec::new())
    };
    diagnostics.resolve_errors = resolve_errors;

    let mut interp = interpreter::Interpreter::new(locals);
    if diagnostics.resolve_errors.is_empty() {
        if let Err(err) = interp.interpret(&statements) {
            diagnostics.runtime_error = Some(err);
        }
    }

    (diagnostics, interp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_program_reports_no_errors() {
        let diagnostics = run("print 1 + 1;");
        assert!(!diagnostics.has_errors());
    }

    #[test]
    fn parser_error_short_circuits_before_evaluation() {
        let diagnostics = run("!= 1;");
        assert!(diagnostics.has_errors());
        assert_eq!(diagnostics.parse_errors.len(), 1);
        assert!(diagnostics.runtime_error.is_none());
    }

    #[test]
    fn runtime_error_is_surfaced() {
        let diagnostics = run("print 1 / 0;");
        assert!(diagnostics.runtime_error.is_some());
    }
}
