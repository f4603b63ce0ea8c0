//! Line-oriented logger: `[LEVEL] message` on stdout, optionally teed to a file.

use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

use log::{Level, LevelFilter, Log, Metadata, Record};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use crate::error::CliError;

pub(crate) struct CliLogger {
    level: LevelFilter,
    file: Option<Mutex<File>>,
}

fn level_tag(level: Level) -> String {
    match level {
        Level::Error => "[ERROR]".if_supports_color(Stdout, |t| t.red()).to_string(),
        Level::Warn => "[WARN]".if_supports_color(Stdout, |t| t.yellow()).to_string(),
        Level::Info => "[INFO]".if_supports_color(Stdout, |t| t.green()).to_string(),
        Level::Debug | Level::Trace => "[DEBUG]".if_supports_color(Stdout, |t| t.dimmed()).to_string(),
    }
}

/// The rendered line for one record, colored when stdout supports it.
pub(crate) fn format_line(level: Level, message: &str) -> String {
    format!("{} {}", level_tag(level), message)
}

/// `line` with every ANSI escape removed.
pub(crate) fn plain(line: &str) -> String {
    String::from_utf8_lossy(&strip_ansi_escapes::strip(line.as_bytes())).into_owned()
}

impl CliLogger {
    pub(crate) fn new(quiet: bool, verbose: bool, logfile: Option<&Path>) -> Result<Self, CliError> {
        let level = if verbose {
            LevelFilter::Debug
        } else if quiet {
            LevelFilter::Warn
        } else {
            LevelFilter::Info
        };
        let file = logfile.map(File::create).transpose()?.map(Mutex::new);
        Ok(Self { level, file })
    }

    /// Install as the global logger.
    pub(crate) fn install(self) -> Result<(), CliError> {
        let level = self.level;
        log::set_boxed_logger(Box::new(self)).map_err(|e| CliError::logger(e.to_string()))?;
        log::set_max_level(level);
        Ok(())
    }
}

impl Log for CliLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format_line(record.level(), &record.args().to_string());
        println!("{line}");
        if let Some(mut file) = self.file.as_ref().and_then(|f| f.lock().ok()) {
            let _ = writeln!(file, "{}", plain(&line));
        }
    }

    fn flush(&self) {
        let _ = std::io::stdout().flush();
        if let Some(mut file) = self.file.as_ref().and_then(|f| f.lock().ok()) {
            let _ = file.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_line() {
        assert_eq!(plain(&format_line(Level::Warn, "Icon missing")), "[WARN] Icon missing");
        assert_eq!(plain(&format_line(Level::Trace, "x")), "[DEBUG] x");
    }

    #[test]
    fn test_strips_ansi() {
        assert_eq!(plain("\u{1b}[31m[ERROR]\u{1b}[39m boom"), "[ERROR] boom");
    }

    #[test]
    fn test_level_selection() {
        let quiet = CliLogger::new(true, false, None).unwrap();
        assert_eq!(quiet.level, LevelFilter::Warn);
        let verbose = CliLogger::new(true, true, None).unwrap();
        assert_eq!(verbose.level, LevelFilter::Debug);
        assert_eq!(CliLogger::new(false, false, None).unwrap().level, LevelFilter::Info);
    }
}
