//! Inbound turn request

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::SurfaceCapabilities;

/// The parts of an inbound request the turn context reads
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConversationRequest {
    #[serde(default)]
    pub user: RequestUser,
    #[serde(default)]
    pub conversation: RequestConversation,
    /// The device the user is talking to
    #[serde(default)]
    pub surface: RequestSurface,
    /// Other devices linked to the user
    #[serde(default)]
    pub available_surfaces: Vec<RequestSurface>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RequestUser {
    /// Serialized storage envelope, empty when nothing was persisted
    #[serde(default)]
    pub user_storage: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_seen: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RequestConversation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
    /// Serialized conversation data envelope from the previous turn
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_token: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RequestSurface {
    #[serde(default)]
    pub capabilities: Vec<CapabilityEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CapabilityEntry {
    pub name: String,
}

impl RequestSurface {
    /// Parse the advertised capability names
    pub fn capabilities(&self) -> SurfaceCapabilities {
        SurfaceCapabilities::from_names(self.capabilities.iter().map(|entry| entry.name.as_str()))
    }
}

impl ConversationRequest {
    /// Parse a request from its JSON body
    pub fn from_json(body: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(body)
    }
}
