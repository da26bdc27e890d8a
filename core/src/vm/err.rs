use crate::error::{Level, PolyErrorExt};
use crate::location::LineLocation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VmErrorKind {
    UnknownFunction,
    ArityMismatch,
    /// Called a declared function that has neither a body nor a host
    /// implementation.
    NoBody,
    StackOverflow,
    /// The body is malformed in a way the verifier should have caught.
    InvalidBody,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VmError {
    pub kind: VmErrorKind,
    message: String,
}

impl VmError {
    pub fn new(kind: VmErrorKind, message: String) -> Self {
        VmError { kind, message }
    }

    pub fn kind(&self) -> VmErrorKind {
        self.kind
    }
}

impl std::fmt::Display for VmError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for VmError {}

impl PolyErrorExt for VmError {
    fn level(&self) -> Level {
        Level::Error
    }

    fn message(&self) -> String {
        self.message.clone()
    }

    fn issuer(&self) -> String {
        "poly.vm".to_string()
    }

    fn location(&self) -> Option<LineLocation> {
        None
    }

    fn tip(&self) -> Option<String> {
        match self.kind {
            VmErrorKind::NoBody => Some("Define the function with 'def' before calling it".to_string()),
            VmErrorKind::StackOverflow => Some("Check that the recursion has a base case".to_string()),
            _ => None,
        }
    }
}
