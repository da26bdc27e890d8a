/// cli/src/output.rs
/// Output utilities for the poly CLI
/// description: styled diagnostics, token tables and result printing.

use std::io::{self, Write};

use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL};
use console::Style;
use poly_core::error::Level;
use poly_core::lexer::Token;
use poly_core::reports::Report;

/// Styles for different output elements
pub struct FormatStyle {
    pub info: Style,
    pub warning: Style,
    pub error: Style,
    pub success: Style,
    pub dim: Style,
}

impl Default for FormatStyle {
    fn default() -> Self {
        FormatStyle {
            info: Style::new().cyan(),
            warning: Style::new().yellow().bold(),
            error: Style::new().red().bold(),
            success: Style::new().green().bold(),
            dim: Style::new().dim(),
        }
    }
}

impl FormatStyle {
    fn for_level(&self, level: Level) -> &Style {
        match level {
            Level::Critical | Level::Error => &self.error,
            Level::Warning => &self.warning,
            Level::Info => &self.info,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticFormat {
    Text,
    Json,
}

/// Printer that writes formatted diagnostics and results into any `Write`.
pub struct OutputHandler<T: Write> {
    out: T,
    formatting: FormatStyle,
    diagnostics: DiagnosticFormat,
}

impl<T: Write> OutputHandler<T> {
    pub fn new(out: T) -> Self {
        OutputHandler {
            out,
            formatting: FormatStyle::default(),
            diagnostics: DiagnosticFormat::Text,
        }
    }

    pub fn with_diagnostics(mut self, format: DiagnosticFormat) -> Self {
        self.diagnostics = format;
        self
    }

    /// Writes a report with the offending source line and a caret under the
    /// span, or the report as JSON.
    ///
    /// ```text
    /// [ERROR] Unknown variable name 'y'
    ///   --> <stdin>:1:5
    ///    |
    ///  1 | 1 + y
    ///    |     ^
    ///    = tip: ...
    /// ```
    pub fn report(&mut self, report: &Report) -> io::Result<()> {
        if self.diagnostics == DiagnosticFormat::Json {
            let json = report.to_json().map_err(io::Error::other)?;
            return writeln!(self.out, "{}", json);
        }

        let sev = self.formatting.for_level(report.severity);
        writeln!(
            self.out,
            "{} {}",
            sev.apply_to(format!("[{}]", report.severity)),
            Style::new().bold().apply_to(&report.message)
        )?;

        if let Some(loc) = &report.location {
            let gutter = loc.line.to_string().len();
            writeln!(self.out, "{}--> {}", " ".repeat(gutter + 1), loc)?;
            if let Some(line) = &report.source_line {
                let bar = self.formatting.dim.apply_to("|");
                writeln!(self.out, "{} {}", " ".repeat(gutter + 1), bar)?;
                writeln!(self.out, " {} {} {}", loc.line, bar, line)?;
                writeln!(
                    self.out,
                    "{} {} {}{}",
                    " ".repeat(gutter + 1),
                    bar,
                    " ".repeat(loc.column.saturating_sub(1)),
                    sev.apply_to("^".repeat(report.length))
                )?;
            }
        }

        if let Some(tip) = &report.tip {
            writeln!(self.out, "  = {} {}", self.formatting.info.apply_to("tip:"), tip)?;
        }
        Ok(())
    }

    pub fn value(&mut self, value: f64) -> io::Result<()> {
        writeln!(self.out, "{}", value)
    }

    pub fn success(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{}", self.formatting.success.apply_to(text))
    }

    /// Writes text verbatim.
    pub fn raw(&mut self, text: &str) -> io::Result<()> {
        write!(self.out, "{}", text)
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

/// Renders scanned tokens as a table: kind, value, line and byte span.
pub fn token_table(tokens: &[Token<'_>]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["#", "kind", "value", "line", "span"]);

    for (idx, token) in tokens.iter().enumerate() {
        let value = match (token.number(), token.text()) {
            (Some(n), _) => n.to_string(),
            (None, Some(text)) => text.to_string(),
            (None, None) => String::new(),
        };
        table.add_row(vec![
            idx.to_string(),
            format!("{:?}", token.kind),
            value,
            token.location.line.to_string(),
            format!("{}..{}", token.location.start, token.location.end),
        ]);
    }
    table
}
