use crate::error::{Level, PolyErrorExt};
use crate::lexer::Token;
use crate::location::LineLocation;

#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    level: Level,
    message: String,
    issuer: String,
    location: LineLocation,
}

impl ParseError {
    pub fn with(message: String, issuer: &str, location: LineLocation) -> Self {
        ParseError {
            level: Level::Error,
            message,
            issuer: issuer.to_string(),
            location,
        }
    }

    /// `expected <what>, got <found>` pointing at the offending token.
    pub fn expected(what: &str, found: &Token<'_>, issuer: &str) -> Self {
        ParseError::with(format!("expected {}, got {}", what, found), issuer, found.location)
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (at {})", self.message, self.location)
    }
}

impl std::error::Error for ParseError {}

impl PolyErrorExt for ParseError {
    fn level(&self) -> Level {
        self.level
    }

    fn message(&self) -> String {
        self.message.clone()
    }

    fn issuer(&self) -> String {
        self.issuer.clone()
    }

    fn location(&self) -> Option<LineLocation> {
        Some(self.location)
    }
}
