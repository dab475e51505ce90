//! Contains the options that tune how a scan reacts to questionable input.

use strum_macros::{Display, EnumString};

/// Is an enumeration of the ways to handle a directive line whose first word is not a known
/// directive.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, EnumString, Display,
)]
#[strum(serialize_all = "lowercase")]
pub enum UnknownDirectivePolicy {
    /// The line is skipped without a word.
    #[default]
    Ignore,

    /// The line is skipped and a warning diagnostic is reported.
    Warn,

    /// The scan stops with an error.
    Error,
}

/// Represents the options of a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Options {
    /// What to do with unknown directives.
    pub unknown_directives: UnknownDirectivePolicy,
}
