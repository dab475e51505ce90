//! This crate consumes the token stream of the scanner and groups it into lexer rules: a pattern
//! followed by the tokens of its action, keyed by the state the rule belongs to.

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

pub mod rule_table;
