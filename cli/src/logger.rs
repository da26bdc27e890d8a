/// cli/src/logger.rs
/// description: stderr backend for the `log` facade.

use console::Style;
use log::{Level, LevelFilter, Log, Metadata, Record};

struct CliLogger {
    level: LevelFilter,
}

impl Log for CliLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let style = match record.level() {
            Level::Error => Style::new().red().bold(),
            Level::Warn => Style::new().yellow(),
            Level::Info => Style::new().cyan(),
            Level::Debug => Style::new().blue(),
            Level::Trace => Style::new().dim(),
        };
        eprintln!(
            "{} {}",
            style.apply_to(format!("[{:<5}]", record.level())),
            record.args()
        );
    }

    fn flush(&self) {}
}

/// Maps the number of `-v` flags onto a level: warn, info, debug, trace.
pub fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

pub fn init(verbosity: u8) {
    let level = level_for(verbosity);
    // a logger may already be installed when embedded; keep the first one
    if log::set_boxed_logger(Box::new(CliLogger { level })).is_ok() {
        log::set_max_level(level);
    }
}
