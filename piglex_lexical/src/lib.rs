//! This crate implements the front end of the lexer generator: it reads a lex specification and
//! turns it into an ordered stream of classified tokens.
//!
//! The [`scanner::Scanner`] is a state machine over a stack of frames. Every token it emits goes
//! to a [`channel::TokenSink`], which is either a plain vector or a channel feeding a consumer
//! running on another thread. Directive lines declare token and state names into a
//! [`registry::Registry`] owned by the caller.

#![deny(
    missing_debug_implementations,
    missing_copy_implementations,
    missing_docs,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    clippy::missing_errors_doc
)]
#![allow(clippy::missing_panics_doc, clippy::missing_const_for_fn)]

pub mod channel;
pub mod config;
pub mod cursor;
pub mod directive;
pub mod error;
pub mod frame;
pub mod registry;
pub mod scanner;
pub mod token;
