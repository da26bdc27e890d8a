use std::path::PathBuf;

use crate::error::{Level, PolyErrorExt, boxed};
use crate::location::{LineLocation, Location};

/// A chunk of source text: a whole file or a single REPL line.
#[derive(Debug, Clone)]
pub struct Script {
    pub name: String,
    pub path: PathBuf,
    pub content: String,
}

impl Script {
    pub fn new(path: PathBuf) -> Result<Self, Box<dyn PolyErrorExt>> {
        let name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        let content = std::fs::read_to_string(&path).map_err(|err| {
            boxed(MissingScriptError {
                path: path.clone(),
                reason: err.to_string(),
            })
        })?;
        Ok(Script {
            name,
            path,
            content,
        })
    }

    /// Wraps in-memory text, e.g. one line typed at the prompt.
    pub fn from_source(name: &str, content: &str) -> Self {
        Script {
            name: name.to_string(),
            path: PathBuf::from(name),
            content: content.to_string(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }

    /// Resolves a token location to `file:line:column`.
    pub fn locate(&self, loc: &LineLocation) -> Location {
        let start = loc.start.min(self.content.len());
        let line_start = self.content[..start]
            .rfind('\n')
            .map(|idx| idx + 1)
            .unwrap_or(0);
        Location::new(self.name.clone(), loc.line, start - line_start + 1)
    }

    /// Returns the full text of the line a location points into.
    pub fn line_text(&self, line: usize) -> Option<&str> {
        self.content.lines().nth(line.checked_sub(1)?)
    }
}

impl std::fmt::Display for Script {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Script: {} at {:?}", self.name, self.path)
    }
}

#[derive(Debug, Clone)]
pub struct MissingScriptError {
    pub path: PathBuf,
    pub reason: String,
}

impl std::fmt::Display for MissingScriptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Missing script at {:?}: {}", self.path, self.reason)
    }
}

impl std::error::Error for MissingScriptError {}

impl PolyErrorExt for MissingScriptError {
    fn level(&self) -> Level {
        Level::Error
    }

    fn message(&self) -> String {
        format!("Missing script at {:?}: {}", self.path, self.reason)
    }

    fn issuer(&self) -> String {
        "poly.script".to_string()
    }

    fn location(&self) -> Option<LineLocation> {
        None
    }
}
