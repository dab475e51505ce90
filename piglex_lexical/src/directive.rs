//! Contains the parsing of `%` directive lines.

use std::{collections::HashMap, str::FromStr};

use lazy_static::lazy_static;
use strum::IntoEnumIterator;
use strum_macros::EnumIter;
use thiserror::Error;

/// Is an enumeration of the directives a lex specification can use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter)]
pub enum DirectiveKind {
    /// `%lex`: the rules section starts on the next line.
    Lex,

    /// `%only <states>`: the following rules apply only in the listed states.
    Only,

    /// `%except <states>`: the following rules apply in every state but the listed ones.
    Except,

    /// `%include <files>`
    Include,

    /// `%output <files>`: where the generated lexer goes.
    Output,

    /// `%token <names>`: declares token names.
    Token,

    /// `%state <names>`: declares state names.
    State,

    /// `%alias <name> <target>`
    Alias,
}

/// Is an error that is returned when a string cannot be parsed into a [`DirectiveKind`] in
/// [`FromStr`] trait implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Error)]
#[error("invalid string representation of directive.")]
pub struct DirectiveParseError;

impl FromStr for DirectiveKind {
    type Err = DirectiveParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        lazy_static! {
            static ref STRING_DIRECTIVE_MAP: HashMap<&'static str, DirectiveKind> =
                DirectiveKind::iter()
                    .map(|directive| (directive.as_str(), directive))
                    .collect();
        }
        STRING_DIRECTIVE_MAP
            .get(s)
            .copied()
            .ok_or(DirectiveParseError)
    }
}

impl DirectiveKind {
    /// Gets the word that introduces the directive.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lex => "lex",
            Self::Only => "only",
            Self::Except => "except",
            Self::Include => "include",
            Self::Output => "output",
            Self::Token => "token",
            Self::State => "state",
            Self::Alias => "alias",
        }
    }
}

/// Represents a parsed directive line.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Directive {
    /// The line holds nothing but blanks.
    Empty,

    /// The line starts with a known directive.
    Known {
        /// The directive.
        kind: DirectiveKind,

        /// The whitespace separated words after the directive.
        arguments: Vec<String>,
    },

    /// The first word of the line is not a directive.
    Unknown {
        /// The first word of the line.
        verb: String,

        /// The whitespace separated words after the first one.
        arguments: Vec<String>,
    },
}

impl Directive {
    /// Parses a directive line given without its leading `%`.
    ///
    /// The line is split on whitespace and the first word selects the directive; the comparison
    /// is case-sensitive.
    #[must_use]
    pub fn parse(line: &str) -> Self {
        let mut words = line.split_whitespace().map(ToOwned::to_owned);

        let Some(verb) = words.next() else {
            return Self::Empty;
        };
        let arguments = words.collect();

        match DirectiveKind::from_str(&verb) {
            Ok(kind) => Self::Known { kind, arguments },
            Err(DirectiveParseError) => Self::Unknown { verb, arguments },
        }
    }
}

/// Splits the arguments of a `%token` or `%state` line into names.
///
/// Names may be separated by blanks, commas, or both; empty names are dropped.
#[must_use]
pub fn split_names(arguments: &[String]) -> Vec<String> {
    arguments
        .join(",")
        .replace(' ', "")
        .split(',')
        .filter(|name| !name.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}
