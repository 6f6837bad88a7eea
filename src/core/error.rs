//! Error types for the rules engine.
//!
//! Two kinds of failure reach callers of player actions:
//! - [`Error::InvalidAction`] / [`Error::Insufficient`]: the rules forbid
//!   the attempted action right now.
//! - [`Error::Cancelled`]: a choice prompt was dismissed.
//!
//! Both abort the surrounding action macro, so no partial state survives.
//! Broken engine invariants are panics, not errors.

use thiserror::Error;

/// Errors raised by the transaction stack itself.
#[derive(Debug, Error)]
pub enum HistoryError {
    /// `end_macro` / `abort_macro` without a matching `begin_macro`.
    #[error("no macro is being built")]
    NoOpenMacro,

    /// Undo or redo attempted while a macro is open.
    #[error("cannot change history while a macro is being built")]
    Composing,

    /// `set_index` outside of `0..=len`.
    #[error("invalid history index {index} (there are {len} entries)")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of committed entries.
        len: usize,
    },

    /// A command failed while being undone or redone. History was cleared.
    #[error("replaying history failed, history cleared: {0}")]
    ReplayFailed(Box<Error>),
}

/// Engine error.
#[derive(Debug, Error)]
pub enum Error {
    /// The player attempted something the rules forbid right now.
    #[error("Invalid action: {0}")]
    InvalidAction(String),

    /// A choice prompt was dismissed.
    #[error("action cancelled")]
    Cancelled,

    /// Not enough of an effect is banked to pay for something.
    #[error("not enough {wanted} available")]
    Insufficient {
        /// Human readable description of the missing effect.
        wanted: String,
    },

    /// Misuse of the transaction stack or a failed replay.
    #[error(transparent)]
    History(#[from] HistoryError),
}

impl Error {
    /// Shorthand for [`Error::InvalidAction`].
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidAction(message.into())
    }

    /// Whether the surrounding action should be rolled back and reported
    /// to the player instead of treated as an engine failure.
    #[must_use]
    pub fn aborts_action(&self) -> bool {
        matches!(
            self,
            Self::InvalidAction(_) | Self::Cancelled | Self::Insufficient { .. }
        )
    }
}

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;
