//! Character stream → token stream (spec §4.1).
//!
//! Grounded in the teacher's hand-rolled `Lexer` (peekable `Chars`, running
//! `line`/`col` counters) generalised to emit the flat `Token` record spec.md
//! requires instead of the teacher's per-variant struct tokens.

use log::{debug, error};
use std::fmt::{self, Display};
use std::iter::Peekable;
use std::str::Chars;

use crate::token::{keyword, Literal, Token, TokenKind};

/// A lexer diagnostic. Unterminated strings are fatal; everything else is
/// reported and scanning continues (spec §4.1, §7.1).
#[derive(Debug, Clone, PartialEq)]
pub struct LexError {
    pub message: String,
    pub line: usize,
    pub column: i64,
    pub fatal: bool,
}

impl Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Error: {} at line {}, column {}",
            self.message, self.line, self.column
        )
    }
}

impl std::error::Error for LexError {}

/// The result of a full scan: every emitted token plus every diagnostic seen
/// along the way, in source order.
pub struct LexOutput {
    pub tokens: Vec<Token>,
    pub errors: Vec<LexError>,
}

struct Lexer<'a> {
    source: &'a str,
    chars: Peekable<Chars<'a>>,
    start: usize,
    current: usize,
    line: usize,
    tokens: Vec<Token>,
    errors: Vec<LexError>,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.chars().peekable(),
            start: 0,
            current: 0,
            line: 1,
            tokens: Vec::new(),
            errors: Vec::new(),
        }
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    fn advance(&mut self) -> char {
        let c = self.chars.next().expect("advance past end of source");
        self.current += c.len_utf8();
        c
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn peek_next(&self) -> Option<char> {
        self.source[self.current..].chars().nth(1)
    }

    fn matches(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn lexeme(&self) -> &'a str {
        &self.source[self.start..self.current]
    }

    fn push(&mut self, kind: TokenKind) {
        let lexeme = self.lexeme().to_owned();
        let column = self.start as i64;
        self.tokens.push(Token::new(kind, lexeme, self.line, column));
    }

    fn push_literal(&mut self, kind: TokenKind, literal: Literal) {
        let lexeme = self.lexeme().to_owned();
        let column = self.start as i64;
        self.tokens
            .push(Token::with_literal(kind, lexeme, literal, self.line, column));
    }

    fn error(&mut self, message: impl Into<String>, fatal: bool) {
        let message = message.into();
        let err = LexError {
            message: message.clone(),
            line: self.line,
            column: self.start as i64,
            fatal,
        };
        error!("{err}");
        self.errors.push(err);
    }

    fn scan_token(&mut self) {
        let c = self.advance();
        use TokenKind::*;
        match c {
            '(' => self.push(LeftParen),
            ')' => self.push(RightParen),
            '{' => self.push(LeftBrace),
            '}' => self.push(RightBrace),
            ',' => self.push(Comma),
            '.' => self.push(Dot),
            ';' => self.push(Semicolon),
            '?' => self.push(Question),
            ':' => self.push(Colon),
            '!' => {
                let kind = if self.matches('=') { BangEqual } else { Bang };
                self.push(kind);
            }
            '=' => {
                let kind = if self.matches('=') { EqualEqual } else { Equal };
                self.push(kind);
            }
            '<' => {
                let kind = if self.matches('=') { LessEqual } else { Less };
                self.push(kind);
            }
            '>' => {
                let kind = if self.matches('=') { GreaterEqual } else { Greater };
                self.push(kind);
            }
            '+' => {
                let kind = self.two_char_or(c, '+', PlusPlus, '=', PlusEqual, Plus);
                self.push(kind);
            }
            '-' => {
                let kind = self.two_char_or(c, '-', MinusMinus, '=', MinusEqual, Minus);
                self.push(kind);
            }
            '*' => {
                let kind = if self.matches('=') { StarEqual } else { Star };
                self.push(kind);
            }
            '/' => {
                if self.matches('/') {
                    while self.peek() != Some('\n') && !self.is_at_end() {
                        self.advance();
                    }
                } else if self.matches('=') {
                    self.push(SlashEqual);
                } else {
                    self.push(Slash);
                }
            }
            ' ' | '\t' | '\r' => {}
            '\n' => self.line += 1,
            '"' => self.string(),
            c if c.is_ascii_digit() => self.number(),
            c if is_identifier_start(c) => self.identifier(),
            other => self.error(format!("Unexpected character '{other}'"), false),
        }
    }

    /// Greedily match a two-character operator, otherwise fall back to the
    /// single-character one (spec §4.1).
    fn two_char_or(
        &mut self,
        _first: char,
        second_a: char,
        kind_a: TokenKind,
        second_b: char,
        kind_b: TokenKind,
        fallback: TokenKind,
    ) -> TokenKind {
        if self.matches(second_a) {
            kind_a
        } else if self.matches(second_b) {
            kind_b
        } else {
            fallback
        }
    }

    fn string(&mut self) {
        while self.peek() != Some('"') && !self.is_at_end() {
            if self.peek() == Some('\n') {
                self.line += 1;
            }
            self.advance();
        }

        if self.is_at_end() {
            self.error("Unterminated string", true);
            return;
        }

        // Consume the closing quote.
        self.advance();

        let inner = &self.source[self.start + 1..self.current - 1];
        self.push_literal(TokenKind::String, Literal::Str(inner.to_owned()));
    }

    fn number(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }

        let mut is_float = false;
        if self.peek() == Some('.') && self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
            is_float = true;
            self.advance();
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        let text = self.lexeme();
        if is_float {
            let value: f64 = text.parse().expect("lexer only feeds digits to parser");
            self.push_literal(TokenKind::Number, Literal::Number(value));
        } else {
            let value: i64 = text.parse().expect("lexer only feeds digits to parser");
            self.push_literal(TokenKind::Number, Literal::Integer(value));
        }
    }

    fn identifier(&mut self) {
        while self.peek().is_some_and(is_identifier_continue) {
            self.advance();
        }

        let text = self.lexeme();
        let kind = keyword(text).unwrap_or(TokenKind::Identifier);
        self.push(kind);
    }

    fn scan(mut self) -> LexOutput {
        while !self.is_at_end() {
            self.start = self.current;
            self.scan_token();
        }

        self.tokens.push(Token::eof(self.line));
        debug!(
            "lexed {} tokens ({} errors)",
            self.tokens.len(),
            self.errors.len()
        );

        LexOutput {
            tokens: self.tokens,
            errors: self.errors,
        }
    }
}

fn is_identifier_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_identifier_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Scan `source` into a token stream terminated by a single EOF token.
///
/// Non-fatal errors (bad characters) are collected and returned alongside the
/// tokens scanned around them; an unterminated string aborts scanning at that
/// point, so the returned token stream may be shorter than the source would
/// otherwise produce.
pub fn lex(source: &str) -> LexOutput {
    Lexer::new(source).scan()
}
