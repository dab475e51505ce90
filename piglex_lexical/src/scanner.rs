//! Contains the [`Scanner`], the state machine that turns a lex specification into tokens.
//!
//! The scanner keeps a [`FrameStack`]. Each step reads one character and hands it to the state on
//! top of the stack. Comments and directive lines push a frame over whatever state was active, so
//! that state resumes exactly where it stopped once they close.

use std::fmt::Debug;

use piglex_base::{diagnostic::Handler, source_file::Location};

use crate::{
    channel::TokenSink,
    config::{Options, UnknownDirectivePolicy},
    cursor::Cursor,
    directive::{split_names, Directive, DirectiveKind},
    error::{Diagnostic, Error, MalformedDirective, UnclassifiedWord, UnknownDirective},
    frame::{Frame, FrameStack, State},
    registry::Registry,
    token::{Token, TokenKind, UNCLASSIFIED_MARKER},
};

/// Scans one lex specification.
///
/// The [`Registry`] is borrowed for the whole scan; `%token` and `%state` lines add to it and
/// action words are classified against it.
pub struct Scanner<'a, 'r> {
    cursor: Cursor<'a>,
    stack: FrameStack,
    registry: &'r mut Registry,
    handler: &'r dyn Handler<Diagnostic>,
    options: Options,
    word_start: Location,
}

impl<'a, 'r> Debug for Scanner<'a, 'r> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scanner")
            .field("cursor", &self.cursor)
            .field("stack", &self.stack)
            .field("registry", &self.registry)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl<'a, 'r> Scanner<'a, 'r> {
    /// Creates a scanner positioned at the start of `source`, in the [`State::Init`] state.
    pub fn new(
        source: &'a str,
        registry: &'r mut Registry,
        handler: &'r dyn Handler<Diagnostic>,
        options: Options,
    ) -> Self {
        let start = Location { line: 1, column: 1 };

        Self {
            cursor: Cursor::new(source),
            stack: FrameStack::new(Frame::new(State::Init, Token::default(), start)),
            registry,
            handler,
            options,
            word_start: start,
        }
    }

    /// Gets the state on top of the stack.
    #[must_use]
    pub fn state(&self) -> State { self.stack.top().state }

    /// Checks if the scan reached the end of the input.
    #[must_use]
    pub fn is_finished(&self) -> bool { self.state() == State::Finished }

    /// Scans the whole input, handing every token to `sink` in order.
    ///
    /// A clean scan ends with a [`TokenKind::Eof`] token.
    ///
    /// # Errors
    /// Any fatal [`Error`]; the scanner is left in [`State::Error`] and every later call fails
    /// with [`Error::Halted`].
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn run(&mut self, sink: &mut dyn TokenSink) -> Result<(), Error> {
        while !self.is_finished() {
            if let Err(error) = self.step(sink) {
                tracing::debug!(%error, "scan stopped");
                self.stack.top_mut().state = State::Error;
                return Err(error);
            }
        }

        Ok(())
    }

    fn step(&mut self, sink: &mut dyn TokenSink) -> Result<(), Error> {
        let state = self.state();

        match state {
            State::Finished => Ok(()),
            State::Error => Err(Error::Halted {
                text: self.stack.top().token.value().clone(),
            }),
            State::Slash => self.step_slash(sink),
            State::LineComment => self.step_line_comment(sink),
            State::CComment => self.step_c_comment(),
            State::Star => self.step_star(sink),
            State::Init
            | State::Percent
            | State::LexRules
            | State::Action
            | State::ActionBlock
            | State::ActionEnd => {
                let Some(character) = self.cursor.next() else {
                    return self.end_of_input(state, sink);
                };

                if self.enter_nested(character)? {
                    return Ok(());
                }

                self.accept(state, character, sink)
            }
        }
    }

    /// Opens a directive or a comment over the current state, if `character` starts one.
    fn enter_nested(&mut self, character: char) -> Result<bool, Error> {
        let (state, token) = match character {
            '%' if self.cursor.column() == 0 => {
                (State::Percent, Token::new(TokenKind::Instruction, ""))
            }
            '/' => (State::Slash, Token::tagged(TokenKind::Raw, '/', "/")),
            '#' => (State::LineComment, Token::new(TokenKind::CommentLine, "#")),
            _ => return Ok(false),
        };

        self.stack
            .push(Frame::new(state, token, self.cursor.location()))?;
        Ok(true)
    }

    /// Hands a character to the own logic of a state that is not a comment; the other states
    /// drop it.
    fn accept(
        &mut self,
        state: State,
        character: char,
        sink: &mut dyn TokenSink,
    ) -> Result<(), Error> {
        match state {
            State::Init => Self::accept_init(character, sink),
            State::Percent => self.accept_percent(character, sink),
            State::LexRules => self.accept_lex_rules(character, sink),
            State::Action => self.accept_action(character, sink),
            State::ActionBlock => self.accept_action_block(character, sink),
            State::ActionEnd => {
                self.accept_action_end(character);
                Ok(())
            }
            State::Finished
            | State::Error
            | State::Slash
            | State::Star
            | State::LineComment
            | State::CComment => {
                tracing::debug!(%state, %character, "state takes no plain characters");
                Ok(())
            }
        }
    }

    fn end_of_input(&mut self, state: State, sink: &mut dyn TokenSink) -> Result<(), Error> {
        match state {
            State::LexRules => {
                self.flush_pattern(None, sink)?;
                self.finish(sink)
            }
            State::Action => {
                self.classify(sink)?;
                self.finish(sink)
            }
            // the enclosing state sees the end of input on the next step
            State::Percent => self.complete_directive(sink),
            State::ActionBlock => Err(self.unexpected_end()),
            _ => self.finish(sink),
        }
    }

    fn finish(&mut self, sink: &mut dyn TokenSink) -> Result<(), Error> {
        sink.emit(Token::new(TokenKind::Eof, ""))?;

        self.stack.replace(Frame::new(
            State::Finished,
            Token::default(),
            self.cursor.location(),
        ));
        Ok(())
    }

    fn unexpected_end(&self) -> Error {
        let top = self.stack.top();

        Error::UnexpectedEndOfInput {
            state: top.state,
            text: top.token.value().clone(),
            location: top.start,
        }
    }

    fn accumulate(&mut self, character: char) {
        let top = self.stack.top_mut();

        if top.token.value().is_empty() {
            self.word_start = self.cursor.location();
        }
        top.token.push(character);
    }

    fn accept_init(character: char, sink: &mut dyn TokenSink) -> Result<(), Error> {
        match character {
            ' ' | '\t' | '\r' | '\n' => Ok(()),
            _ => sink.emit(Token::raw_char(character)),
        }
    }

    /// `/` was read: the next character tells a `//` comment, a `/*` comment, or a lone slash
    /// apart. A lone slash goes back to the enclosing state as a plain character and the
    /// character after it is left unread.
    fn step_slash(&mut self, sink: &mut dyn TokenSink) -> Result<(), Error> {
        let start = self.stack.top().start;

        match self.cursor.peek() {
            Some('/') => {
                self.cursor.next();
                self.stack.replace(Frame::new(
                    State::LineComment,
                    Token::new(TokenKind::CommentLine, "//"),
                    start,
                ));
            }
            Some('*') => {
                self.cursor.next();
                self.stack.replace(Frame::new(
                    State::CComment,
                    Token::new(TokenKind::CommentClosed, "/*"),
                    start,
                ));
            }
            _ => {
                self.stack.pop()?;
                let enclosing = self.state();
                self.accept(enclosing, '/', sink)?;
            }
        }

        Ok(())
    }

    /// The line terminator is left unread so the enclosing state still sees the end of the line.
    fn step_line_comment(&mut self, sink: &mut dyn TokenSink) -> Result<(), Error> {
        match self.cursor.peek() {
            None | Some('\n') => {
                let frame = self.stack.pop()?;
                sink.emit(frame.token)
            }
            Some(_) => {
                if let Some(character) = self.cursor.next().filter(|c| *c != '\r') {
                    self.stack.top_mut().token.push(character);
                }
                Ok(())
            }
        }
    }

    fn step_c_comment(&mut self) -> Result<(), Error> {
        let Some(character) = self.cursor.next() else {
            return Err(self.unexpected_end());
        };

        let top = self.stack.top_mut();
        top.token.push(character);

        if character == '*' {
            // the star frame carries the text until it knows whether the comment closes
            let token = std::mem::take(&mut top.token);
            let start = top.start;
            self.stack.push(Frame::new(State::Star, token, start))?;
        }

        Ok(())
    }

    fn step_star(&mut self, sink: &mut dyn TokenSink) -> Result<(), Error> {
        let Some(character) = self.cursor.next() else {
            return Err(self.unexpected_end());
        };

        match character {
            '/' => {
                let mut star = self.stack.pop()?;
                self.stack.pop()?;

                star.token.push('/');
                sink.emit(star.token)?;
            }
            '*' => self.stack.top_mut().token.push('*'),
            _ => {
                let mut star = self.stack.pop()?;
                star.token.push(character);
                self.stack.top_mut().token = star.token;
            }
        }

        Ok(())
    }

    fn accept_percent(&mut self, character: char, sink: &mut dyn TokenSink) -> Result<(), Error> {
        match character {
            '\r' => Ok(()),
            '\n' => self.complete_directive(sink),
            _ => {
                self.accumulate(character);
                Ok(())
            }
        }
    }

    /// Emits the directive line on top of the stack as an instruction and applies it.
    ///
    /// `%lex` replaces the enclosing state with the rules section; every other directive returns
    /// to the enclosing state.
    fn complete_directive(&mut self, sink: &mut dyn TokenSink) -> Result<(), Error> {
        let frame = self.stack.pop()?;
        let location = frame.start;
        let line = frame.token.value().clone();

        sink.emit(frame.token)?;

        match Directive::parse(&line) {
            Directive::Empty => {}
            Directive::Known { kind, arguments } => {
                self.apply_directive(kind, &arguments, &line, location);
            }
            Directive::Unknown { verb, .. } => match self.options.unknown_directives {
                UnknownDirectivePolicy::Ignore => {
                    tracing::debug!(%verb, "ignoring unknown directive");
                }
                UnknownDirectivePolicy::Warn => {
                    self.handler
                        .receive(Diagnostic::from(UnknownDirective { verb, location }));
                }
                UnknownDirectivePolicy::Error => {
                    return Err(Error::UnknownDirective { verb, location });
                }
            },
        }

        Ok(())
    }

    fn apply_directive(
        &mut self,
        kind: DirectiveKind,
        arguments: &[String],
        line: &str,
        location: Location,
    ) {
        match kind {
            DirectiveKind::Lex => {
                tracing::info!("rules section");
                self.stack.replace(Frame::new(
                    State::LexRules,
                    Token::new(TokenKind::Regexp, ""),
                    location,
                ));
            }
            DirectiveKind::Only => tracing::info!("only: {}", arguments.join(" ")),
            DirectiveKind::Except => tracing::info!("except: {}", arguments.join(" ")),
            DirectiveKind::Include => tracing::info!("include file: {}", arguments.join(", ")),
            DirectiveKind::Output => {
                tracing::info!("output file (lexer): {}", arguments.join(", "));
            }
            DirectiveKind::Token => {
                self.registry.declare_tokens(split_names(arguments));
                tracing::info!("token(s): {}", self.registry.tokens().join(", "));
            }
            DirectiveKind::State => {
                self.registry.declare_states(split_names(arguments));
                tracing::info!("state(s): {}", self.registry.states().join(", "));
            }
            DirectiveKind::Alias => {
                if let [name, target, ..] = arguments {
                    tracing::info!("alias: {name} for {target}");
                } else {
                    self.handler.receive(Diagnostic::from(MalformedDirective {
                        line: line.to_string(),
                        reason: "`alias` expects a name and a target".to_string(),
                        location,
                    }));
                }
            }
        }
    }

    fn accept_lex_rules(&mut self, character: char, sink: &mut dyn TokenSink) -> Result<(), Error> {
        let is_empty = self.stack.top().token.value().is_empty();

        match character {
            '\r' => {}
            ' ' | '\t' | '\n' if is_empty => {}
            '\t' | '\n' => {
                self.flush_pattern(Some(character), sink)?;
                self.stack.replace(Frame::new(
                    State::Action,
                    Token::default(),
                    self.cursor.location(),
                ));
            }
            _ => self.accumulate(character),
        }

        Ok(())
    }

    fn flush_pattern(
        &mut self,
        terminator: Option<char>,
        sink: &mut dyn TokenSink,
    ) -> Result<(), Error> {
        let top = self.stack.top_mut();

        if top.token.value().is_empty() {
            return Ok(());
        }

        let pattern = std::mem::replace(&mut top.token, Token::new(TokenKind::Regexp, ""));
        sink.emit(pattern.retag(TokenKind::Regexp, terminator))
    }

    fn accept_action(&mut self, character: char, sink: &mut dyn TokenSink) -> Result<(), Error> {
        match character {
            '\r' => {}
            ' ' | '\t' => self.classify(sink)?,
            '{' => {
                self.classify(sink)?;
                sink.emit(Token::tagged(TokenKind::BlockStart, '{', "{"))?;
                self.stack.replace(Frame::new(
                    State::ActionBlock,
                    Token::default(),
                    self.cursor.location(),
                ));
            }
            '\n' => {
                self.classify(sink)?;
                self.stack.replace(Frame::new(
                    State::LexRules,
                    Token::new(TokenKind::Regexp, ""),
                    self.cursor.location(),
                ));
            }
            _ => self.accumulate(character),
        }

        Ok(())
    }

    fn accept_action_block(
        &mut self,
        character: char,
        sink: &mut dyn TokenSink,
    ) -> Result<(), Error> {
        match character {
            '\r' => {}
            ' ' | '\t' | '\n' => self.classify(sink)?,
            '}' => {
                let mut pending = std::mem::take(&mut self.stack.top_mut().token);
                pending.push('}');
                sink.emit(pending.retag(TokenKind::BlockEnd, Some('}')))?;

                self.stack.replace(Frame::new(
                    State::ActionEnd,
                    Token::default(),
                    self.cursor.location(),
                ));
            }
            _ => self.accumulate(character),
        }

        Ok(())
    }

    fn accept_action_end(&mut self, character: char) {
        match character {
            ' ' | '\t' | '\r' => {}
            '\n' => {
                self.stack.replace(Frame::new(
                    State::LexRules,
                    Token::new(TokenKind::Regexp, ""),
                    self.cursor.location(),
                ));
            }
            _ => tracing::debug!(%character, "ignoring text after an action block"),
        }
    }

    /// Classifies the word accumulated on top of the stack and emits it; the accumulator is
    /// emptied in every case.
    fn classify(&mut self, sink: &mut dyn TokenSink) -> Result<(), Error> {
        let word = std::mem::take(&mut self.stack.top_mut().token).into_value();

        if word.is_empty() {
            return Ok(());
        }

        let token = match self.registry.classify(&word) {
            TokenKind::Unclassified => {
                let value = format!("{UNCLASSIFIED_MARKER}{word}");
                self.handler.receive(Diagnostic::from(UnclassifiedWord {
                    word,
                    location: self.word_start,
                }));
                Token::new(TokenKind::Unclassified, value)
            }
            kind => Token::new(kind, word),
        };

        sink.emit(token)
    }
}

/// Scans `source` to the end and collects the tokens.
///
/// # Errors
/// Any fatal [`Error`] stopping the scan.
pub fn tokenize(
    source: &str,
    registry: &mut Registry,
    handler: &dyn Handler<Diagnostic>,
    options: Options,
) -> Result<Vec<Token>, Error> {
    let mut tokens = Vec::new();
    Scanner::new(source, registry, handler, options).run(&mut tokens)?;
    Ok(tokens)
}

#[cfg(test)]
mod tests;
