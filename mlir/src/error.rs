use serde::Serialize;
use std::fmt;
use thiserror::Error;

// Token information without the token kind
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TokenInfo {
    pub text: String,
    pub row: usize,
    pub col: usize,
}

impl fmt::Display for TokenInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}` at {}:{}", self.text, self.row + 1, self.col + 1)
    }
}

/// Rejection of one statement by the grammar.
#[derive(Debug, Clone, Error, PartialEq, Serialize)]
pub enum ParseError {
    #[error("Unexpected end of input: expected {0}")]
    UnexpectedEOF(String),

    #[error("Unexpected token: expected {expected}, found {found}")]
    UnexpectedToken { expected: String, found: TokenInfo },

    #[error("Trailing input after operation: {0}")]
    TrailingInput(TokenInfo),

    #[error("Invalid result count: {0}")]
    InvalidResultCount(String),
}

impl ParseError {
    /// The `found` half of the diagnostic, when a token was involved
    pub fn found(&self) -> Option<&TokenInfo> {
        match self {
            ParseError::UnexpectedToken { found, .. } => Some(found),
            ParseError::TrailingInput(found) => Some(found),
            _ => None,
        }
    }
}
