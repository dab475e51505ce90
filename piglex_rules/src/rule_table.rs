//! Contains the [`RuleTable`] and the [`RuleCollector`] that builds it one token at a time.

use std::{collections::BTreeMap, fmt::Display};

use getset::Getters;
use piglex_lexical::{
    directive::{split_names, Directive, DirectiveKind},
    registry::INITIAL_STATE,
    token::{Token, TokenKind},
};

/// Represents one line of the rules section: a pattern and the tokens of its action.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct Rule {
    /// The state the rule is active in.
    #[get = "pub"]
    state: String,

    /// The pattern, as written.
    #[get = "pub"]
    pattern: String,

    /// The tokens of the action; empty for a pattern without an action.
    #[get = "pub"]
    action: Vec<Token>,
}

impl Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.pattern)?;

        for (index, token) in self.action.iter().enumerate() {
            let separator = if index == 0 { '\t' } else { ' ' };
            write!(f, "{separator}{}", token.value())?;
        }

        Ok(())
    }
}

/// Holds the rules of a lex specification grouped by state, each group in source order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Getters)]
pub struct RuleTable {
    /// Gets the rules grouped by state name.
    #[get = "pub"]
    rules_by_state: BTreeMap<String, Vec<Rule>>,
}

impl RuleTable {
    /// Builds the table from a whole token stream.
    pub fn collect(tokens: impl IntoIterator<Item = Token>) -> Self {
        let mut collector = RuleCollector::new();

        for token in tokens {
            collector.receive(token);
        }

        collector.finish()
    }

    /// Gets the rules of the given state, in source order.
    #[must_use]
    pub fn rules_in(&self, state: &str) -> &[Rule] {
        self.rules_by_state.get(state).map_or(&[], Vec::as_slice)
    }

    /// Gets the number of rules over every state.
    #[must_use]
    pub fn len(&self) -> usize { self.rules_by_state.values().map(Vec::len).sum() }

    /// Checks if the table holds no rule.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.len() == 0 }

    fn insert(&mut self, rule: Rule) {
        self.rules_by_state
            .entry(rule.state.clone())
            .or_default()
            .push(rule);
    }
}

impl Display for RuleTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (state, rules) in &self.rules_by_state {
            writeln!(f, "<{state}>")?;

            for rule in rules {
                writeln!(f, "    {rule}")?;
            }
        }

        Ok(())
    }
}

/// Builds a [`RuleTable`] from tokens received in emission order.
///
/// A [`TokenKind::Regexp`] opens a rule; the tokens after it make up its action until the next
/// pattern, directive line, or end of input closes it.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct RuleCollector {
    table: RuleTable,

    /// Gets the state new rules are added to.
    #[get = "pub"]
    active_state: String,

    pending: Option<Rule>,
}

impl RuleCollector {
    /// Creates a collector adding rules to the initial state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            table: RuleTable::default(),
            active_state: INITIAL_STATE.to_string(),
            pending: None,
        }
    }

    /// Takes the next token of the stream.
    pub fn receive(&mut self, token: Token) {
        match token.kind() {
            TokenKind::CommentClosed | TokenKind::CommentLine => {}
            TokenKind::Regexp => {
                self.close_pending();
                self.pending = Some(Rule {
                    state: self.active_state.clone(),
                    pattern: token.into_value(),
                    action: Vec::new(),
                });
            }
            TokenKind::Instruction => {
                self.close_pending();
                self.apply(token.value());
            }
            TokenKind::Eof => self.close_pending(),
            TokenKind::Raw => tracing::trace!(%token, "skipping text outside of the rules"),
            TokenKind::BlockStart
            | TokenKind::BlockEnd
            | TokenKind::Keyword(..)
            | TokenKind::UserToken
            | TokenKind::UserState
            | TokenKind::Unclassified => {
                if let Some(rule) = self.pending.as_mut() {
                    rule.action.push(token);
                } else {
                    tracing::debug!(%token, "action token without a pattern");
                }
            }
        }
    }

    /// Closes the last rule and returns the table.
    #[must_use]
    pub fn finish(mut self) -> RuleTable {
        self.close_pending();
        self.table
    }

    fn close_pending(&mut self) {
        if let Some(rule) = self.pending.take() {
            tracing::trace!(state = %rule.state, pattern = %rule.pattern, "rule collected");
            self.table.insert(rule);
        }
    }

    fn apply(&mut self, line: &str) {
        match Directive::parse(line) {
            Directive::Known {
                kind: DirectiveKind::Lex,
                ..
            } => self.active_state = INITIAL_STATE.to_string(),
            Directive::Known {
                kind: DirectiveKind::Only,
                arguments,
            } => {
                if let Some(state) = split_names(&arguments).into_iter().next() {
                    tracing::debug!(%state, "collecting rules");
                    self.active_state = state;
                }
            }
            _ => {}
        }
    }
}

impl Default for RuleCollector {
    fn default() -> Self { Self::new() }
}
