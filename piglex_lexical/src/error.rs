//! Contains the fatal errors that stop a scan and the diagnostics reported along the way.

use std::fmt::Display;

use derive_more::From;
use enum_as_inner::EnumAsInner;
use piglex_base::{
    log::{Message, Severity},
    source_file::Location,
};

use crate::frame::State;

/// A word in an action is neither a keyword nor a declared token or state name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UnclassifiedWord {
    /// The word as written in the source.
    pub word: String,

    /// Where the word starts.
    pub location: Location,
}

impl Display for UnclassifiedWord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            Message::new(
                Severity::Error,
                format!(
                    "`{}` is neither a keyword nor a declared token or state",
                    self.word
                )
            )
        )
    }
}

/// The first word of a directive line is not a known directive.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UnknownDirective {
    /// The first word of the directive line.
    pub verb: String,

    /// Where the `%` of the directive is.
    pub location: Location,
}

impl Display for UnknownDirective {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            Message::new(
                Severity::Warning,
                format!("unknown directive `%{}` is ignored", self.verb)
            )
        )
    }
}

/// A known directive is missing some of its arguments.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MalformedDirective {
    /// The directive line, without the `%`.
    pub line: String,

    /// What is wrong with the line.
    pub reason: String,

    /// Where the `%` of the directive is.
    pub location: Location,
}

impl Display for MalformedDirective {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            Message::new(
                Severity::Warning,
                format!("malformed directive `%{}`: {}", self.line, self.reason)
            )
        )
    }
}

/// Is an enumeration of the non-fatal problems reported while scanning. The scan goes on after
/// each of them.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, EnumAsInner, From)]
#[allow(missing_docs)]
pub enum Diagnostic {
    UnclassifiedWord(UnclassifiedWord),
    UnknownDirective(UnknownDirective),
    MalformedDirective(MalformedDirective),
}

impl Diagnostic {
    /// Gets the location the diagnostic points at.
    #[must_use]
    pub fn location(&self) -> Location {
        match self {
            Self::UnclassifiedWord(diagnostic) => diagnostic.location,
            Self::UnknownDirective(diagnostic) => diagnostic.location,
            Self::MalformedDirective(diagnostic) => diagnostic.location,
        }
    }

    /// Gets the severity of the diagnostic.
    #[must_use]
    pub fn severity(&self) -> Severity {
        match self {
            Self::UnclassifiedWord(..) => Severity::Error,
            Self::UnknownDirective(..) | Self::MalformedDirective(..) => Severity::Warning,
        }
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnclassifiedWord(diagnostic) => write!(f, "{diagnostic}"),
            Self::UnknownDirective(diagnostic) => write!(f, "{diagnostic}"),
            Self::MalformedDirective(diagnostic) => write!(f, "{diagnostic}"),
        }
    }
}

/// Is an enumeration of the errors that stop the scan.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The input ended inside a context that must be closed.
    #[error("unexpected end of input in {state} opened at {location}")]
    UnexpectedEndOfInput {
        /// The state the scanner was in.
        state: State,

        /// The text buffered by that state.
        text: String,

        /// Where the unclosed context was opened.
        location: Location,
    },

    /// A frame was popped while only the bottom frame was left.
    #[error("the frame stack underflowed while holding `{text}`")]
    StackUnderflow {
        /// The text of the bottom frame.
        text: String,
    },

    /// A frame was pushed on a full stack.
    #[error("the frame stack exceeded its maximum depth of {depth}")]
    StackOverflow {
        /// The maximum depth of the stack.
        depth: usize,
    },

    /// An unknown directive was found and unknown directives are rejected.
    #[error("unknown directive `%{verb}` at {location}")]
    UnknownDirective {
        /// The first word of the directive line.
        verb: String,

        /// Where the `%` of the directive is.
        location: Location,
    },

    /// The scanner was stepped after a fatal error.
    #[error("the scan was stopped earlier while holding `{text}`")]
    Halted {
        /// The text of the last partial token.
        text: String,
    },

    /// The consumer stopped receiving before the scan was done.
    #[error("the token consumer hung up before the scan finished")]
    ConsumerDisconnected,
}

impl Error {
    /// Gets the location in the source the error points at, if any.
    #[must_use]
    pub fn location(&self) -> Option<Location> {
        match self {
            Self::UnexpectedEndOfInput { location, .. } | Self::UnknownDirective { location, .. } => {
                Some(*location)
            }
            Self::StackUnderflow { .. }
            | Self::StackOverflow { .. }
            | Self::Halted { .. }
            | Self::ConsumerDisconnected => None,
        }
    }
}
