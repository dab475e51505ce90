//! Is a module containing the [`Token`] type and all of its related types.

use std::{collections::HashMap, fmt::Display, hash::Hash, str::FromStr};

use enum_as_inner::EnumAsInner;
use getset::{CopyGetters, Getters};
use lazy_static::lazy_static;
use strum::IntoEnumIterator;
use strum_macros::EnumIter;
use thiserror::Error;

/// The prefix put in front of the value of a [`TokenKind::Unclassified`] token.
pub const UNCLASSIFIED_MARKER: &str = "ERR: ";

/// Is an enumeration of the words reserved inside rule actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter)]
#[allow(missing_docs)]
pub enum KeywordKind {
    Return,
    State,
    Token,
    Len,
    Value,
    Error,
}

impl Display for KeywordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.write_str(self.as_str()) }
}

/// Is an error that is returned when a string cannot be parsed into a [`KeywordKind`] in
/// [`FromStr`] trait implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Error)]
#[error("invalid string representation of keyword.")]
pub struct KeywordParseError;

impl FromStr for KeywordKind {
    type Err = KeywordParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        lazy_static! {
            static ref STRING_KEYWORD_MAP: HashMap<&'static str, KeywordKind> = {
                let mut map = HashMap::new();

                for keyword in KeywordKind::iter() {
                    map.insert(keyword.as_str(), keyword);
                }

                map
            };
        }
        STRING_KEYWORD_MAP.get(s).copied().ok_or(KeywordParseError)
    }
}

impl KeywordKind {
    /// Gets the string representation of the keyword as a `&str`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Return => "return",
            Self::State => "state",
            Self::Token => "token",
            Self::Len => "len",
            Self::Value => "value",
            Self::Error => "error",
        }
    }
}

/// Is an enumeration of the kinds of [`Token`] the scanner emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, EnumAsInner)]
pub enum TokenKind {
    /// A bare character, or text that has not been classified yet.
    #[default]
    Raw,

    /// A whole `/* ... */` comment.
    CommentClosed,

    /// A whole `// ...` or `# ...` comment, without its line terminator.
    CommentLine,

    /// A `%` directive line, without the `%` and the line terminator.
    Instruction,

    /// The pattern of a lex rule.
    Regexp,

    /// The `{` opening an action block.
    BlockStart,

    /// The text pending before the `}` closing an action block, followed by the `}`.
    BlockEnd,

    /// A reserved word found in an action.
    Keyword(KeywordKind),

    /// A name declared with `%token`.
    UserToken,

    /// A name declared with `%state`, or the implicit initial state.
    UserState,

    /// A word in an action that matches nothing; its value starts with [`UNCLASSIFIED_MARKER`].
    Unclassified,

    /// The end of the input.
    Eof,
}

impl TokenKind {
    /// Gets the numeric code handed to the rule-table builder.
    ///
    /// Synthetic kinds are numbered from 256, with gaps left by the codes of events that are
    /// never emitted on their own (`//`, `/*`, `%` and the action body).
    /// [`TokenKind::Unclassified`] shares the code of the `error` keyword, and
    /// [`TokenKind::UserState`] carries the code of the user-state slot of the state table, `13`.
    #[must_use]
    pub fn code(self) -> u32 {
        match self {
            Self::Raw => 0,
            Self::UserState => 13,
            Self::CommentClosed => 258,
            Self::CommentLine => 260,
            Self::Instruction => 261,
            Self::Eof => 262,
            Self::Regexp => 263,
            Self::BlockStart => 264,
            Self::BlockEnd => 267,
            Self::Keyword(KeywordKind::Return) => 268,
            Self::Keyword(KeywordKind::State) => 269,
            Self::Keyword(KeywordKind::Token) => 270,
            Self::Keyword(KeywordKind::Len) => 271,
            Self::Keyword(KeywordKind::Value) => 272,
            Self::Keyword(KeywordKind::Error) | Self::Unclassified => 273,
            Self::UserToken => 274,
        }
    }
}

/// Represents a unit of the lex specification emitted by the scanner.
///
/// Frames also use a [`Token`] as the accumulator of the text they are reading; once emitted the
/// token is never modified again.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Getters, CopyGetters,
)]
pub struct Token {
    /// Gets the kind of the token.
    #[get_copy = "pub"]
    kind: TokenKind,

    /// Gets the single character the token stands for, if any.
    #[get_copy = "pub"]
    tag: Option<char>,

    /// Gets the text of the token.
    #[get = "pub"]
    value: String,
}

impl Token {
    /// Creates a token without a character tag.
    #[must_use]
    pub fn new(kind: TokenKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            tag: None,
            value: value.into(),
        }
    }

    /// Creates a token tagged with the character it stands for.
    #[must_use]
    pub fn tagged(kind: TokenKind, tag: char, value: impl Into<String>) -> Self {
        Self {
            kind,
            tag: Some(tag),
            value: value.into(),
        }
    }

    /// Creates a [`TokenKind::Raw`] token for a single bare character.
    #[must_use]
    pub fn raw_char(character: char) -> Self {
        Self::tagged(TokenKind::Raw, character, character.to_string())
    }

    /// Consumes the token and returns its text.
    #[must_use]
    pub fn into_value(self) -> String { self.value }

    pub(crate) fn push(&mut self, character: char) { self.value.push(character); }

    pub(crate) fn retag(mut self, kind: TokenKind, tag: Option<char>) -> Self {
        self.kind = kind;
        self.tag = tag;
        self
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}: {}]", self.kind.code(), self.value)
    }
}

#[cfg(test)]
mod tests;
