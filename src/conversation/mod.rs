//! Wire types exchanged with the assistant platform
//!
//! Field names follow the platform's camelCase JSON schema exactly.

pub mod request;
pub mod response;

pub use request::{
    CapabilityEntry, ConversationRequest, RequestConversation, RequestSurface, RequestUser,
};
pub use response::{ConversationResponse, RichResponse};
