//! Contains the [`Cursor`], the character reader the scanner steps with.

use std::{iter::Peekable, str::Chars};

use piglex_base::source_file::Location;

/// Reads the characters of a source one at a time with a single character of lookahead, tracking
/// where the last character read sits.
///
/// The column is the horizontal position of the last character read, starting at 0. Reading a
/// `\n` makes the next character column 0 again. The first character of the source is column 0 as
/// well.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    chars: Peekable<Chars<'a>>,
    line: usize,
    column: usize,
    next_line: usize,
    next_column: usize,
}

impl<'a> Cursor<'a> {
    /// Creates a cursor positioned before the first character of `source`.
    #[must_use]
    pub fn new(source: &'a str) -> Self {
        Self {
            chars: source.chars().peekable(),
            line: 1,
            column: 0,
            next_line: 1,
            next_column: 0,
        }
    }

    /// Peeks at the next character without consuming it.
    pub fn peek(&mut self) -> Option<char> { self.chars.peek().copied() }

    /// Gets the column of the last character read (starts at 0).
    #[must_use]
    pub fn column(&self) -> usize { self.column }

    /// Gets the [`Location`] of the last character read.
    #[must_use]
    pub fn location(&self) -> Location {
        Location {
            line: self.line,
            column: self.column + 1,
        }
    }
}

impl<'a> Iterator for Cursor<'a> {
    type Item = char;

    fn next(&mut self) -> Option<Self::Item> {
        let character = self.chars.next()?;

        self.line = self.next_line;
        self.column = self.next_column;

        if character == '\n' {
            self.next_line += 1;
            self.next_column = 0;
        } else {
            self.next_column += 1;
        }

        Some(character)
    }
}
