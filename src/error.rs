/*!
Programmer-error reporting.

This is the first of the two error tiers described in the design: malformed
calls to the API itself (bad format parameters, bad literal syntax, a
non-interchange pack, a handler registered against a signal class it cannot
handle). These are never routed through [`crate::context::Context`]'s
signal dispatch -- they are mistakes in the *call*, not properties of an
arithmetic *result*.
*/

use thiserror::Error;

use crate::signal::SignalRaised;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProgrammerError {
    #[error("bad argument: {0}")]
    BadArgument(String),

    #[error("malformed literal: {0}")]
    Syntax(String),

    #[error("format is not an interchange format: {0}")]
    NotInterchange(String),
}

impl ProgrammerError {
    pub fn bad_argument(msg: impl Into<String>) -> Self {
        ProgrammerError::BadArgument(msg.into())
    }

    pub fn syntax(msg: impl Into<String>) -> Self {
        ProgrammerError::Syntax(msg.into())
    }

    pub fn not_interchange(msg: impl Into<String>) -> Self {
        ProgrammerError::NotInterchange(msg.into())
    }
}

/// Parsing a literal can fail two different ways: the text itself is
/// malformed ([`ProgrammerError::Syntax`]), or the text is well-formed but
/// the context's handler for some signal raised during conversion (e.g. a
/// `Raise`-registered `Overflow`) propagates an error instead of a value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error(transparent)]
    Syntax(#[from] ProgrammerError),
    #[error(transparent)]
    Signal(#[from] SignalRaised),
}
