//! Console reporting
//!
//! A leveled reporter in place of any global logging state: constructed once
//! per invocation and passed (by value, it is `Copy`) to whatever needs to
//! print. Levels mirror the CLI's `--log-level` choices; `exec` sits between
//! `info` and `warning` and carries command output.

pub mod events;

use crossterm::style::{Color, Stylize};
use is_terminal::IsTerminal;

/// Design tokens for console output
pub mod colors {
    use super::Color;

    pub const SUCCESS: Color = Color::Green;
    pub const ERROR: Color = Color::Red;
    pub const WARNING: Color = Color::Yellow;
    pub const INFO: Color = Color::Cyan;
    pub const DIM: Color = Color::DarkGrey;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Exec,
    Warning,
    Error,
}

impl LogLevel {
    /// Map a `--log-level` flag value; unrecognized values fall back to info
    pub fn from_flag(flag: &str) -> Self {
        match flag {
            "debug" => LogLevel::Debug,
            "exec" => LogLevel::Exec,
            "warning" => LogLevel::Warning,
            "error" => LogLevel::Error,
            _ => LogLevel::Info,
        }
    }
}

/// Leveled console reporter
#[derive(Debug, Clone, Copy)]
pub struct Reporter {
    level: LogLevel,
    /// NDJSON mode: suppress human-readable lines on stdout
    json: bool,
    color: bool,
}

impl Reporter {
    pub fn new(level: LogLevel, json: bool) -> Self {
        Self {
            level,
            json,
            color: std::io::stdout().is_terminal() && !json,
        }
    }

    fn enabled(&self, level: LogLevel) -> bool {
        !self.json && level >= self.level
    }

    fn paint(&self, label: &str, color: Color) -> String {
        let padded = format!("{:>8}", label);
        if self.color {
            format!("{}", padded.with(color))
        } else {
            padded
        }
    }

    pub fn debug(&self, message: &str) {
        if self.enabled(LogLevel::Debug) {
            println!("{}: {}", self.paint("debug", colors::DIM), message);
        }
    }

    pub fn info(&self, message: &str) {
        if self.enabled(LogLevel::Info) {
            println!("{}: {}", self.paint("info", colors::INFO), message);
        }
    }

    /// Command lines and their output
    pub fn exec(&self, message: &str) {
        if self.enabled(LogLevel::Exec) {
            println!("{}: {}", self.paint("exec", colors::SUCCESS), message);
        }
    }

    pub fn warn(&self, message: &str) {
        if self.enabled(LogLevel::Warning) {
            println!("{}: {}", self.paint("warning", colors::WARNING), message);
        }
    }

    pub fn error(&self, message: &str) {
        if self.enabled(LogLevel::Error) {
            eprintln!("{}: {}", self.paint("error", colors::ERROR), message);
        }
    }

    /// Terminal failures; always emitted, regardless of level or mode
    pub fn critical(&self, message: &str) {
        eprintln!("{}: {}", self.paint("critical", colors::ERROR), message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_order_from_debug_to_error() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Exec);
        assert!(LogLevel::Exec < LogLevel::Warning);
        assert!(LogLevel::Warning < LogLevel::Error);
    }

    #[test]
    fn flag_values_map_to_levels() {
        assert_eq!(LogLevel::from_flag("debug"), LogLevel::Debug);
        assert_eq!(LogLevel::from_flag("exec"), LogLevel::Exec);
        assert_eq!(LogLevel::from_flag("warning"), LogLevel::Warning);
        assert_eq!(LogLevel::from_flag("error"), LogLevel::Error);
        assert_eq!(LogLevel::from_flag("info"), LogLevel::Info);
        assert_eq!(LogLevel::from_flag("bogus"), LogLevel::Info);
    }

    #[test]
    fn json_mode_disables_leveled_output() {
        let reporter = Reporter::new(LogLevel::Debug, true);
        assert!(!reporter.enabled(LogLevel::Error));
    }

    #[test]
    fn levels_below_threshold_are_disabled() {
        let reporter = Reporter::new(LogLevel::Warning, false);
        assert!(!reporter.enabled(LogLevel::Info));
        assert!(reporter.enabled(LogLevel::Error));
    }
}
