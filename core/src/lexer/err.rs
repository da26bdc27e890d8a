use crate::error::{Level, PolyErrorExt};
use crate::location::LineLocation;

#[derive(Debug, Clone, PartialEq)]
pub struct LexError {
    level: Level,
    message: String,
    tip: Option<String>,
    location: LineLocation,
}

impl LexError {
    pub fn new(message: String, location: LineLocation) -> Self {
        LexError {
            level: Level::Error,
            message,
            tip: None,
            location,
        }
    }

    pub fn with_tip(mut self, tip: &str) -> Self {
        self.tip = Some(tip.to_string());
        self
    }
}

impl std::fmt::Display for LexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (at {})", self.message, self.location)?;
        if let Some(tip) = &self.tip {
            write!(f, " tip: {}", tip)?;
        }
        Ok(())
    }
}

impl std::error::Error for LexError {}

impl PolyErrorExt for LexError {
    fn level(&self) -> Level {
        self.level
    }

    fn message(&self) -> String {
        self.message.clone()
    }

    fn issuer(&self) -> String {
        "poly.lexer".to_string()
    }

    fn location(&self) -> Option<LineLocation> {
        Some(self.location)
    }

    fn tip(&self) -> Option<String> {
        self.tip.clone()
    }
}
