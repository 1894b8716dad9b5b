//! Turn context aggregate - the reply being assembled for one turn
//!
//! A turn context lives for exactly one request. It tracks:
//! - Response fragments and suggestion chips in display order
//! - Whether the turn asks for more input or closes the conversation
//! - Reprompts for when the user stays silent
//! - Per-user storage, diffed against its turn-start snapshot on finalize

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::{OverflowPolicy, TurnConfig};
use crate::conversation::{ConversationRequest, ConversationResponse, RichResponse};
use crate::error::{TurnError, TurnResult};
use crate::storage::{self, StorageMap};
use crate::value_objects::{
    AvailableSurfaces, Fragment, NoInputPrompt, ResponseItem, Suggestion, SurfaceCapabilities,
};

/// How the turn ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnMode {
    /// Reply and keep listening
    Ask,
    /// Reply and end the conversation
    Close,
}

/// The user behind the turn
#[derive(Debug, Clone, Default, PartialEq)]
pub struct User {
    /// Storage persisted across conversations, mutable during the turn
    pub storage: StorageMap,
    /// When the user last interacted with the action
    pub last_seen: Option<DateTime<Utc>>,
    /// Locale reported by the device, e.g. `en-US`
    pub locale: Option<String>,
}

/// Turn context aggregate
#[derive(Debug, Clone)]
pub struct TurnContext {
    /// Identifier used to correlate log lines of one turn
    id: Uuid,

    /// When the turn context was created
    started_at: DateTime<Utc>,

    /// Limits applied while building the reply
    config: TurnConfig,

    /// Speech and cards in display order
    response_fragments: Vec<ResponseItem>,

    /// Suggestion chips in display order
    suggestions: Vec<Suggestion>,

    /// Reprompts, normalized only when the response is built
    no_input_prompts: Vec<NoInputPrompt>,

    /// Set by the first `ask` or `close`
    mode: Option<TurnMode>,

    /// Whether `response()` has run
    finalized: bool,

    /// Capabilities of the device the user is talking to
    device: SurfaceCapabilities,

    /// Capabilities of the user's other devices
    available_surfaces: AvailableSurfaces,

    /// Platform conversation identifier, when the request carried one
    conversation_id: Option<String>,

    /// The user behind the turn, including live storage
    user: User,

    /// Deep copy of `user.storage` as hydrated
    storage_snapshot: StorageMap,

    /// Conversation-scoped data carried in the conversation token
    data: StorageMap,

    /// Whether the inbound token carried any data
    data_hydrated: bool,
}

impl TurnContext {
    /// Create a turn context with the default configuration
    ///
    /// Without a request the turn starts empty: no capabilities, no storage.
    pub fn new(request: Option<&ConversationRequest>) -> TurnResult<Self> {
        Self::with_config(request, TurnConfig::default())
    }

    /// Create a turn context with an explicit configuration
    pub fn with_config(
        request: Option<&ConversationRequest>,
        config: TurnConfig,
    ) -> TurnResult<Self> {
        match request {
            Some(request) => Self::from_request(request, config),
            None => Self::from_request(&ConversationRequest::default(), config),
        }
    }

    fn from_request(request: &ConversationRequest, config: TurnConfig) -> TurnResult<Self> {
        let storage = storage::unwrap(&request.user.user_storage)
            .map_err(TurnError::MalformedUserStorage)?;

        let data = match &request.conversation.conversation_token {
            Some(token) => storage::unwrap(token).map_err(TurnError::MalformedConversationToken)?,
            None => StorageMap::new(),
        };

        let available_surfaces = AvailableSurfaces {
            surfaces: request
                .available_surfaces
                .iter()
                .map(|surface| surface.capabilities())
                .collect(),
        };

        let turn = Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            config,
            response_fragments: Vec::new(),
            suggestions: Vec::new(),
            no_input_prompts: Vec::new(),
            mode: None,
            finalized: false,
            device: request.surface.capabilities(),
            available_surfaces,
            conversation_id: request.conversation.conversation_id.clone(),
            user: User {
                storage: storage.clone(),
                last_seen: request.user.last_seen,
                locale: request.user.locale.clone(),
            },
            storage_snapshot: storage,
            data_hydrated: !data.is_empty(),
            data,
        };

        tracing::debug!(
            turn_id = %turn.id,
            conversation_id = ?turn.conversation_id,
            has_screen = turn.device.has_screen(),
            stored_keys = turn.storage_snapshot.len(),
            "turn context created"
        );

        Ok(turn)
    }

    /// Get the turn's ID
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn config(&self) -> &TurnConfig {
        &self.config
    }

    pub fn conversation_id(&self) -> Option<&str> {
        self.conversation_id.as_deref()
    }

    /// Capabilities of the current device
    pub fn device(&self) -> &SurfaceCapabilities {
        &self.device
    }

    /// Capabilities of the user's other devices
    pub fn available_surfaces(&self) -> &AvailableSurfaces {
        &self.available_surfaces
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    /// Mutable access to the user; storage changes are picked up by `response()`
    pub fn user_mut(&mut self) -> &mut User {
        &mut self.user
    }

    /// Conversation-scoped data
    pub fn data(&self) -> &StorageMap {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut StorageMap {
        &mut self.data
    }

    pub fn response_fragments(&self) -> &[ResponseItem] {
        &self.response_fragments
    }

    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    pub fn no_input_prompts(&self) -> &[NoInputPrompt] {
        &self.no_input_prompts
    }

    pub fn mode(&self) -> Option<TurnMode> {
        self.mode
    }

    /// Whether the reply keeps the microphone open
    pub fn expect_user_response(&self) -> bool {
        self.mode == Some(TurnMode::Ask)
    }

    /// Whether `ask` or `close` has been called
    pub fn responded(&self) -> bool {
        self.mode.is_some()
    }

    /// Whether the response has been serialized at least once
    pub fn finalized(&self) -> bool {
        self.finalized
    }

    /// Reply and keep listening
    pub fn ask<I>(&mut self, fragments: I) -> TurnResult<()>
    where
        I: IntoIterator,
        I::Item: Into<Fragment>,
    {
        self.respond(TurnMode::Ask, fragments)
    }

    /// Reply and end the conversation
    pub fn close<I>(&mut self, fragments: I) -> TurnResult<()>
    where
        I: IntoIterator,
        I::Item: Into<Fragment>,
    {
        self.respond(TurnMode::Close, fragments)
    }

    fn respond<I>(&mut self, requested: TurnMode, fragments: I) -> TurnResult<()>
    where
        I: IntoIterator,
        I::Item: Into<Fragment>,
    {
        self.ensure_open()?;

        if let Some(current) = self.mode {
            if current != requested {
                return Err(TurnError::ConflictingMode { current, requested });
            }
        }

        for fragment in fragments {
            match fragment.into() {
                Fragment::Speech(text) => self
                    .response_fragments
                    .push(ResponseItem::SimpleResponse(text.into())),
                Fragment::Simple(response) => self
                    .response_fragments
                    .push(ResponseItem::SimpleResponse(response)),
                Fragment::Card(card) => self.response_fragments.push(ResponseItem::BasicCard(card)),
                Fragment::Suggestions(suggestions) => self.suggestions.extend(suggestions.0),
            }
        }

        self.mode = Some(requested);
        Ok(())
    }

    /// Replace the reprompts played when the user says nothing
    pub fn set_no_input_prompts<I>(&mut self, prompts: I) -> TurnResult<()>
    where
        I: IntoIterator,
        I::Item: Into<NoInputPrompt>,
    {
        self.ensure_open()?;

        let mut prompts: Vec<NoInputPrompt> = prompts.into_iter().map(Into::into).collect();
        let limit = self.config.max_no_input_prompts;

        if prompts.len() > limit {
            match self.config.no_input_overflow {
                OverflowPolicy::Truncate => {
                    tracing::warn!(
                        turn_id = %self.id,
                        given = prompts.len(),
                        limit,
                        "dropping no-input prompts over the limit"
                    );
                    prompts.truncate(limit);
                }
                OverflowPolicy::Reject => {
                    return Err(TurnError::TooManyNoInputPrompts {
                        given: prompts.len(),
                        limit,
                    });
                }
            }
        }

        self.no_input_prompts = prompts;
        Ok(())
    }

    /// Serialize the turn into the outbound response
    ///
    /// Marks the turn finalized. Calling it again re-serializes the current
    /// state without appending anything.
    pub fn response(&mut self) -> TurnResult<ConversationResponse> {
        if self.expect_user_response() && self.response_fragments.is_empty() {
            tracing::warn!(turn_id = %self.id, "asking without any speech or card");
        }

        let user_storage = storage::diff(&self.storage_snapshot, &self.user.storage)?;

        let conversation_token = if self.data_hydrated || !self.data.is_empty() {
            Some(storage::wrap(&self.data)?)
        } else {
            None
        };

        let response = ConversationResponse {
            expect_user_response: self.expect_user_response(),
            rich_response: RichResponse {
                items: self.response_fragments.clone(),
                suggestions: self.suggestions.clone(),
            },
            no_input_prompts: self
                .no_input_prompts
                .iter()
                .map(NoInputPrompt::to_simple_response)
                .collect(),
            user_storage,
            conversation_token,
        };

        if self.finalized {
            tracing::debug!(turn_id = %self.id, "re-serializing finalized turn");
        }
        self.finalized = true;

        tracing::debug!(
            turn_id = %self.id,
            items = response.rich_response.items.len(),
            suggestions = response.rich_response.suggestions.len(),
            expect_user_response = response.expect_user_response,
            storage_changed = !response.user_storage.is_empty(),
            "turn response finalized"
        );

        Ok(response)
    }

    fn ensure_open(&self) -> TurnResult<()> {
        if self.finalized {
            return Err(TurnError::AlreadyFinalized);
        }
        Ok(())
    }
}
