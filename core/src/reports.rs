// Diagnostics reporting for poly scripts.
// A `Report` is the serialisable form of any pipeline error, resolved
// against the script it came from so it can be printed or emitted as JSON.

use serde::Serialize;
use std::fmt;

use crate::error::{Level, PolyErrorExt};
use crate::location::Location;
use crate::script::Script;

/// Report structure containing message, severity, and location.
///
/// # Examples
/// ```
/// use poly_core::reports::Report;
/// use poly_core::lexer;
/// use poly_core::script::Script;
///
/// let script = Script::from_source("<stdin>", "1 $ 2");
/// let scanned = lexer::scan(&script.content);
/// let report = Report::from_error(&scanned.errors[0], &script);
/// assert_eq!(report.to_string(), "POLY | ERROR | <stdin>:1:3 | Unexpected character '$'");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub severity: Level,
    pub issuer: String,
    pub message: String,
    pub location: Option<Location>,
    /// Width of the offending span in bytes, at least 1.
    pub length: usize,
    pub tip: Option<String>,
    /// The source line the location points into.
    pub source_line: Option<String>,
}

impl Report {
    pub fn new(severity: Level, issuer: &str, message: &str) -> Self {
        Report {
            severity,
            issuer: issuer.to_string(),
            message: message.to_string(),
            location: None,
            length: 1,
            tip: None,
            source_line: None,
        }
    }

    pub fn from_error(error: &dyn PolyErrorExt, script: &Script) -> Self {
        let mut report = Report::new(error.level(), &error.issuer(), &error.message());
        if let Some(loc) = error.location() {
            report.location = Some(script.locate(&loc));
            report.length = loc.len().max(1);
            report.source_line = script.line_text(loc.line).map(|s| s.to_string());
        }
        report.tip = error.tip();
        report
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let location = match &self.location {
            Some(loc) => loc.to_string(),
            None => "unknown location".to_string(),
        };
        write!(f, "POLY | {} | {} | {}", self.severity, location, self.message)
    }
}
