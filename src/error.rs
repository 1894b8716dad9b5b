//! Error types for the turn context

use thiserror::Error;

use crate::aggregate::TurnMode;

/// Errors raised while building or finalizing a turn
#[derive(Error, Debug)]
pub enum TurnError {
    /// The platform sent persisted user storage that is not a valid envelope
    #[error("malformed user storage: {0}")]
    MalformedUserStorage(#[source] serde_json::Error),

    /// The platform sent a conversation token that is not a valid envelope
    #[error("malformed conversation token: {0}")]
    MalformedConversationToken(#[source] serde_json::Error),

    /// A fragment value matched none of the accepted response shapes
    #[error("unrecognized response fragment: {0}")]
    UnrecognizedFragment(String),

    /// `ask` and `close` were both used in the same turn
    #[error("turn already set to {current:?}, cannot switch to {requested:?}")]
    ConflictingMode {
        current: TurnMode,
        requested: TurnMode,
    },

    /// The response has been serialized and the turn no longer accepts output
    #[error("turn response already finalized")]
    AlreadyFinalized,

    /// More no-input prompts than the platform accepts
    #[error("too many no-input prompts: {given} (limit: {limit})")]
    TooManyNoInputPrompts { given: usize, limit: usize },

    /// Serializing an outbound envelope failed
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result alias used throughout the crate
pub type TurnResult<T> = Result<T, TurnError>;
