//! Contains the scanner states and the stack of [`Frame`]s that nests them.

use std::fmt::Display;

use derive_new::new;
use piglex_base::source_file::Location;

use crate::{error::Error, token::Token};

/// Is an enumeration of the states of the scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum State {
    /// Top level of the source, before any `%lex`.
    Init,

    /// The scan reached the end of the input.
    Finished,

    /// The scan was stopped by a fatal error.
    Error,

    /// A `/` was read; waiting for the character that tells which comment it opens.
    Slash,

    /// A `*` was read inside a block comment.
    Star,

    /// Inside a `//` or `#` comment.
    LineComment,

    /// Inside a `/* ... */` comment.
    CComment,

    /// Inside a `%` directive line.
    Percent,

    /// Reading the pattern of a lex rule.
    LexRules,

    /// Reading the words of the action following a pattern.
    Action,

    /// Inside the `{ ... }` block of an action.
    ActionBlock,

    /// After the `}` of an action block, until the end of the line.
    ActionEnd,
}

impl State {
    /// Gets a human readable name of the state.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Init => "the top level",
            Self::Finished => "the finished state",
            Self::Error => "the error state",
            Self::Slash => "a slash",
            Self::Star => "a block comment",
            Self::LineComment => "a line comment",
            Self::CComment => "a block comment",
            Self::Percent => "a directive",
            Self::LexRules => "a rule pattern",
            Self::Action => "a rule action",
            Self::ActionBlock => "an action block",
            Self::ActionEnd => "the end of an action block",
        }
    }
}

impl Display for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.write_str(self.as_str()) }
}

/// Represents one nesting level of the scanner: its state and the token it is accumulating.
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct Frame {
    /// The state of this nesting level.
    pub state: State,

    /// The in-progress token.
    pub token: Token,

    /// Where the nesting level was opened.
    pub start: Location,
}

/// Is a stack of [`Frame`]s that is never empty.
///
/// The bottom frame can be replaced but never popped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameStack {
    bottom: Frame,
    nested: Vec<Frame>,
}

impl FrameStack {
    /// The largest number of frames the stack holds.
    pub const MAX_DEPTH: usize = 32;

    /// Creates a stack holding only the given bottom frame.
    #[must_use]
    pub fn new(bottom: Frame) -> Self {
        Self {
            bottom,
            nested: Vec::new(),
        }
    }

    /// Gets the number of frames in the stack.
    #[must_use]
    pub fn depth(&self) -> usize { self.nested.len() + 1 }

    /// Gets the topmost frame.
    #[must_use]
    pub fn top(&self) -> &Frame { self.nested.last().unwrap_or(&self.bottom) }

    /// Gets the topmost frame mutably.
    pub fn top_mut(&mut self) -> &mut Frame { self.nested.last_mut().unwrap_or(&mut self.bottom) }

    /// Pushes a new frame on top of the stack.
    ///
    /// # Errors
    /// - [`Error::StackOverflow`]: the stack already holds [`Self::MAX_DEPTH`] frames.
    pub fn push(&mut self, frame: Frame) -> Result<(), Error> {
        if self.depth() >= Self::MAX_DEPTH {
            return Err(Error::StackOverflow {
                depth: Self::MAX_DEPTH,
            });
        }

        tracing::trace!(state = ?frame.state, depth = self.depth() + 1, "push");
        self.nested.push(frame);
        Ok(())
    }

    /// Removes the topmost frame and returns it.
    ///
    /// # Errors
    /// - [`Error::StackUnderflow`]: only the bottom frame is left.
    pub fn pop(&mut self) -> Result<Frame, Error> {
        let frame = self.nested.pop().ok_or_else(|| Error::StackUnderflow {
            text: self.bottom.token.value().clone(),
        })?;

        tracing::trace!(state = ?frame.state, depth = self.depth(), "pop");
        Ok(frame)
    }

    /// Replaces the topmost frame with the given one and returns the replaced frame.
    pub fn replace(&mut self, frame: Frame) -> Frame {
        tracing::trace!(state = ?frame.state, depth = self.depth(), "replace");
        std::mem::replace(self.top_mut(), frame)
    }
}
