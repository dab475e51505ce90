//! Provides the functions related to logging/printing messages to the console.

use std::fmt::Display;

use derive_new::new;
use formatting::Style;

use crate::source_file::{Location, SourceFile};

pub mod formatting;

/// Represents the severity of a log message to be printed to the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[allow(missing_docs)]
pub enum Severity {
    Error,
    Info,
    Warning,
}

/// Is a struct implementing [`Display`] that represents a log message to be displayed to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, new)]
pub struct Message<T> {
    /// The severity of the log message.
    pub severity: Severity,

    /// The message to be displayed.
    pub display: T,
}

impl<T: Display> Display for Message<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let log_header = Style::Bold.paint(match self.severity {
            Severity::Error => Style::Red.paint("[error]:"),
            Severity::Info => Style::Green.paint("[info]:"),
            Severity::Warning => Style::Yellow.paint("[warning]:"),
        });

        let message_part = Style::Bold.paint(&self.display);

        write!(f, "{log_header} {message_part}")
    }
}

fn get_digit(mut number: usize) -> usize {
    let mut digit = 0;

    while number > 0 {
        number /= 10;
        digit += 1;
    }

    digit
}

/// Structure implementing [`Display`] that prints a single line of the source code with a caret
/// under the given location.
#[derive(Debug, Clone, Copy, new)]
pub struct SourceLineDisplay<'a, T> {
    /// The source file the location points into.
    pub source_file: &'a SourceFile,

    /// The location to point at.
    pub location: Location,

    /// The help message to be displayed next to the caret.
    pub help_display: Option<T>,
}

impl<'a, T: Display> Display for SourceLineDisplay<'a, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let width = get_digit(self.location.line) + 1;
        let pipe = Style::Bold.paint(Style::Cyan.paint("┃"));

        writeln!(
            f,
            "{:width$}{} {}:{}",
            "",
            Style::Bold.paint(Style::Cyan.paint("-->")),
            self.source_file.full_path().display(),
            self.location,
        )?;
        writeln!(f, "{:width$}{pipe}", "")?;

        let Some(line) = self.source_file.get_line(self.location.line) else {
            return Ok(());
        };

        write!(
            f,
            "{}{:padding$}{pipe} ",
            Style::Bold.paint(Style::Cyan.paint(self.location.line)),
            "",
            padding = width - get_digit(self.location.line),
        )?;

        // tabs are expanded so the caret lines up
        for char in line.chars() {
            if char == '\t' {
                write!(f, "    ")?;
            } else {
                write!(f, "{char}")?;
            }
        }
        writeln!(f)?;

        write!(f, "{:width$}{pipe} ", "")?;
        for char in line.chars().take(self.location.column.saturating_sub(1)) {
            write!(f, "{}", if char == '\t' { "    " } else { " " })?;
        }
        write!(f, "{}", Style::Bold.paint(Style::Red.paint("^")))?;

        if let Some(help) = &self.help_display {
            write!(f, " {}: {help}", Style::Bold.paint("help"))?;
        }

        writeln!(f)
    }
}
