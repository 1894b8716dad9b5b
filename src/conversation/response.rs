//! Outbound turn response

use serde::{Deserialize, Serialize};

use crate::value_objects::{ResponseItem, SimpleResponse, Suggestion};

/// The serialized reply of one turn
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ConversationResponse {
    /// Whether the microphone stays open after the reply
    pub expect_user_response: bool,
    pub rich_response: RichResponse,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub no_input_prompts: Vec<SimpleResponse>,
    /// `""` when user storage did not change this turn
    pub user_storage: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_token: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RichResponse {
    pub items: Vec<ResponseItem>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<Suggestion>,
}

impl ConversationResponse {
    /// Serialize to the JSON body sent to the platform
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
