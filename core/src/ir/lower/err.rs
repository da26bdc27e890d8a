use crate::error::{Level, PolyErrorExt};
use crate::location::LineLocation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoweringErrorKind {
    UnknownVariable,
    /// Also raised when a known function is called with the wrong number
    /// of arguments.
    UnknownFunction,
    InvalidBinaryOperator,
    SignatureMismatch,
    FunctionRedefinition,
    /// A statement kind that cannot appear where it was found, e.g. a bare
    /// `return` handed to the module-level lowering entry point.
    MisplacedStatement,
    Verification,
}

impl std::fmt::Display for LoweringErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            LoweringErrorKind::UnknownVariable => "unknown variable",
            LoweringErrorKind::UnknownFunction => "unknown function",
            LoweringErrorKind::InvalidBinaryOperator => "invalid binary operator",
            LoweringErrorKind::SignatureMismatch => "signature mismatch",
            LoweringErrorKind::FunctionRedefinition => "function redefinition",
            LoweringErrorKind::MisplacedStatement => "misplaced statement",
            LoweringErrorKind::Verification => "verification failed",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoweringError {
    pub kind: LoweringErrorKind,
    message: String,
    location: Option<LineLocation>,
}

impl LoweringError {
    pub fn new(kind: LoweringErrorKind, message: String, location: Option<LineLocation>) -> Self {
        LoweringError {
            kind,
            message,
            location,
        }
    }

    pub fn unknown_variable(name: &str, location: LineLocation) -> Self {
        LoweringError::new(
            LoweringErrorKind::UnknownVariable,
            format!("Unknown variable name '{}'", name),
            Some(location),
        )
    }

    pub fn unknown_function(name: &str, location: LineLocation) -> Self {
        LoweringError::new(
            LoweringErrorKind::UnknownFunction,
            format!("Unknown function referenced '{}'", name),
            Some(location),
        )
    }

    pub fn argument_count(name: &str, expected: usize, found: usize, location: LineLocation) -> Self {
        LoweringError::new(
            LoweringErrorKind::UnknownFunction,
            format!(
                "Incorrect number of arguments passed to '{}' (expected {}, got {})",
                name, expected, found
            ),
            Some(location),
        )
    }

    pub fn kind(&self) -> LoweringErrorKind {
        self.kind
    }
}

impl std::fmt::Display for LoweringError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.location {
            Some(loc) => write!(f, "{} (at {})", self.message, loc),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for LoweringError {}

impl PolyErrorExt for LoweringError {
    fn level(&self) -> Level {
        Level::Error
    }

    fn message(&self) -> String {
        self.message.clone()
    }

    fn issuer(&self) -> String {
        format!("poly.lowering ({})", self.kind)
    }

    fn location(&self) -> Option<LineLocation> {
        self.location
    }
}
