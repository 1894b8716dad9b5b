//! Turn context for voice-assistant conversations
//!
//! This crate holds the state of a single conversation turn while the
//! handler builds its reply. It provides:
//! - Ordered speech, card and suggestion accumulation via `ask`/`close`
//! - Reprompts for silent users, capped at the platform limit
//! - Device capability flags parsed from the inbound request
//! - Per-user storage that is only written back when it changed
//!
//! Transport and intent routing live outside this crate: it consumes a parsed
//! [`ConversationRequest`] and produces a [`ConversationResponse`].

pub mod aggregate;
pub mod config;
pub mod conversation;
pub mod error;
pub mod storage;
pub mod value_objects;

// Re-export main types
pub use aggregate::{TurnContext, TurnMode, User};

pub use config::{MAX_NO_INPUT_PROMPTS, OverflowPolicy, TurnConfig};

pub use conversation::{ConversationRequest, ConversationResponse, RichResponse};

pub use error::{TurnError, TurnResult};

pub use storage::StorageMap;

pub use value_objects::{
    AvailableSurfaces, BasicCard, Button, Capability, Fragment, Image, NoInputPrompt,
    OpenUrlAction, ResponseItem, SimpleResponse, Suggestion, Suggestions, SurfaceCapabilities,
};
