//! Contains the hand-off of emitted tokens from the scanner to a consumer.
//!
//! The scanner writes into a [`TokenSink`]. Collecting into a [`Vec<Token>`] keeps everything on
//! one thread; [`channel`] builds an [`Emitter`]/[`TokenReceiver`] pair that lets a consumer on
//! another thread process tokens while the scan is still running.

use crossbeam::channel::{self as crossbeam_channel, Receiver, Sender};
use enum_as_inner::EnumAsInner;

use crate::{error::Error, scanner::Scanner, token::Token};

/// The capacity of the channel when none is chosen.
pub const DEFAULT_CAPACITY: usize = 1;

/// Represents the destination of the tokens emitted by the scanner.
pub trait TokenSink {
    /// Hands one token over to the sink.
    ///
    /// # Errors
    /// - [`Error::ConsumerDisconnected`]: the sink cannot take tokens anymore.
    fn emit(&mut self, token: Token) -> Result<(), Error>;
}

impl TokenSink for Vec<Token> {
    fn emit(&mut self, token: Token) -> Result<(), Error> {
        self.push(token);
        Ok(())
    }
}

/// Is an enumeration of the messages travelling through the channel.
#[derive(Debug, Clone, PartialEq, Eq, EnumAsInner)]
pub enum Event {
    /// A token emitted by the scanner.
    Token(Token),

    /// The scanner emitted its last token.
    Finished,
}

/// Is the sending half of the channel, owned by the scanner.
#[derive(Debug)]
pub struct Emitter {
    sender: Sender<Event>,
}

impl Emitter {
    /// Tells the consumer no token follows.
    ///
    /// The marker travels behind every token already sent, so the consumer sees it only after
    /// draining them.
    ///
    /// # Errors
    /// - [`Error::ConsumerDisconnected`]: the consumer hung up.
    pub fn finish(self) -> Result<(), Error> {
        self.sender
            .send(Event::Finished)
            .map_err(|_| Error::ConsumerDisconnected)
    }
}

impl TokenSink for Emitter {
    fn emit(&mut self, token: Token) -> Result<(), Error> {
        self.sender
            .send(Event::Token(token))
            .map_err(|_| Error::ConsumerDisconnected)
    }
}

/// Is the receiving half of the channel, iterating over the tokens in emission order.
///
/// The iteration ends at the [`Event::Finished`] marker, or when the [`Emitter`] is dropped
/// without finishing, after a fatal error.
#[derive(Debug)]
pub struct TokenReceiver {
    receiver: Receiver<Event>,
    finished: bool,
}

impl TokenReceiver {
    /// Checks if the [`Event::Finished`] marker has been received.
    ///
    /// Stays `false` when the producer stopped without finishing.
    #[must_use]
    pub fn is_finished(&self) -> bool { self.finished }
}

impl Iterator for TokenReceiver {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        match self.receiver.recv() {
            Ok(Event::Token(token)) => Some(token),
            Ok(Event::Finished) => {
                self.finished = true;
                None
            }
            Err(_) => None,
        }
    }
}

/// Creates a channel holding at most `capacity` tokens in flight.
///
/// A capacity of `0` makes every send wait until the consumer receives it.
#[must_use]
pub fn channel(capacity: usize) -> (Emitter, TokenReceiver) {
    let (sender, receiver) = crossbeam_channel::bounded(capacity);

    (
        Emitter { sender },
        TokenReceiver {
            receiver,
            finished: false,
        },
    )
}

/// Runs the scanner on the current thread while `consumer` receives the tokens on a scoped
/// thread.
///
/// Returns the result of the scan together with what the consumer returned. The consumer always
/// terminates: the channel is either finished or dropped once the scanner stops.
pub fn scan_concurrently<R, F>(
    scanner: &mut Scanner<'_, '_>,
    capacity: usize,
    consumer: F,
) -> (Result<(), Error>, R)
where
    F: FnOnce(TokenReceiver) -> R + Send,
    R: Send,
{
    let (mut emitter, receiver) = channel(capacity);

    std::thread::scope(|scope| {
        let handle = scope.spawn(move || consumer(receiver));

        let result = match scanner.run(&mut emitter) {
            Ok(()) => emitter.finish(),
            Err(error) => {
                drop(emitter);
                Err(error)
            }
        };

        match handle.join() {
            Ok(output) => (result, output),
            Err(panic) => std::panic::resume_unwind(panic),
        }
    })
}
