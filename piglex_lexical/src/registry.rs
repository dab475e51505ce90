//! Contains the [`Registry`] of the token and state names declared by a lex specification.

use std::str::FromStr;

use getset::Getters;

use crate::token::{KeywordKind, TokenKind};

/// The name of the state every lex specification starts in.
pub const INITIAL_STATE: &str = "_INIT";

/// Holds the names declared with `%token` and `%state` during one scan.
///
/// Both lists only grow and keep the declaration order; declaring a name twice keeps both
/// entries.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct Registry {
    /// Gets the declared token names.
    #[get = "pub"]
    tokens: Vec<String>,

    /// Gets the declared state names, starting with [`INITIAL_STATE`].
    #[get = "pub"]
    states: Vec<String>,
}

impl Registry {
    /// Creates a registry knowing only the initial state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tokens: Vec::new(),
            states: vec![INITIAL_STATE.to_string()],
        }
    }

    /// Appends the given names to the token names.
    pub fn declare_tokens(&mut self, names: impl IntoIterator<Item = String>) {
        self.tokens.extend(names);
    }

    /// Appends the given names to the state names.
    pub fn declare_states(&mut self, names: impl IntoIterator<Item = String>) {
        self.states.extend(names);
    }

    /// Forgets every declaration, for scanning the next source of a batch.
    pub fn reset(&mut self) { *self = Self::new(); }

    /// Classifies a word found in an action.
    ///
    /// The reserved keywords are looked up first, then the token names, then the state names; a
    /// word found nowhere is [`TokenKind::Unclassified`].
    #[must_use]
    pub fn classify(&self, word: &str) -> TokenKind {
        if let Ok(keyword) = KeywordKind::from_str(word) {
            TokenKind::Keyword(keyword)
        } else if self.tokens.iter().any(|name| name == word) {
            TokenKind::UserToken
        } else if self.states.iter().any(|name| name == word) {
            TokenKind::UserState
        } else {
            TokenKind::Unclassified
        }
    }
}

impl Default for Registry {
    fn default() -> Self { Self::new() }
}
