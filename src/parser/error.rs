use std::fmt::{self, Display};

/// One abandoned declaration's worth of diagnostic (spec §6, §7.2).
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
    pub line: usize,
    /// The lexeme the error was anchored to, or `"unexpected EOF"` when the
    /// current token was EOF.
    pub at: String,
}

impl Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Parser error on line {} at {}: {}",
            self.line, self.at, self.message
        )
    }
}

impl std::error::Error for ParseError {}
