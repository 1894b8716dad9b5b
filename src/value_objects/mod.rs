//! Value objects for the turn context

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

use crate::error::{TurnError, TurnResult};

/// Spoken text with optional on-screen text
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SimpleResponse {
    /// What the assistant says
    pub text_to_speech: String,
    /// What the assistant shows, when it differs from the speech
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_text: Option<String>,
}

impl SimpleResponse {
    /// Create a speech-only response
    pub fn new(text_to_speech: impl Into<String>) -> Self {
        Self {
            text_to_speech: text_to_speech.into(),
            display_text: None,
        }
    }

    /// Show different text on screen
    pub fn with_display_text(mut self, display_text: impl Into<String>) -> Self {
        self.display_text = Some(display_text.into());
        self
    }
}

impl From<String> for SimpleResponse {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

impl From<&str> for SimpleResponse {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

/// Image shown inside a card
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Image {
    pub url: String,
    pub accessibility_text: String,
}

impl Image {
    pub fn new(url: impl Into<String>, accessibility_text: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            accessibility_text: accessibility_text.into(),
        }
    }
}

/// Link target of a card button
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct OpenUrlAction {
    pub url: String,
}

/// Button attached to a card
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Button {
    pub title: String,
    pub open_url_action: OpenUrlAction,
}

impl Button {
    /// Create a button that opens a URL
    pub fn open_url(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            open_url_action: OpenUrlAction { url: url.into() },
        }
    }
}

/// Structured card with title, body, image and buttons
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BasicCard {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    /// Card body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatted_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<Image>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub buttons: Vec<Button>,
}

/// Keys that identify a card-shaped value
const CARD_KEYS: [&str; 5] = ["title", "subtitle", "formattedText", "image", "buttons"];

impl BasicCard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn formatted_text(mut self, text: impl Into<String>) -> Self {
        self.formatted_text = Some(text.into());
        self
    }

    pub fn image(mut self, image: Image) -> Self {
        self.image = Some(image);
        self
    }

    pub fn button(mut self, button: Button) -> Self {
        self.buttons.push(button);
        self
    }
}

/// A single suggestion chip
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Suggestion {
    pub title: String,
}

/// A group of suggestion chips passed to `ask`/`close` as one fragment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Suggestions(pub Vec<Suggestion>);

impl Suggestions {
    /// Create chips from their labels
    pub fn new<I, S>(titles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(
            titles
                .into_iter()
                .map(|title| Suggestion {
                    title: title.into(),
                })
                .collect(),
        )
    }

    fn from_json(values: &[Value]) -> TurnResult<Self> {
        values
            .iter()
            .map(|value| match value {
                Value::String(title) => Ok(Suggestion {
                    title: title.clone(),
                }),
                Value::Object(_) => serde_json::from_value(value.clone())
                    .map_err(|e| TurnError::UnrecognizedFragment(format!("suggestion: {e}"))),
                other => Err(TurnError::UnrecognizedFragment(format!(
                    "suggestion: {other}"
                ))),
            })
            .collect::<TurnResult<Vec<_>>>()
            .map(Self)
    }
}

/// An item of the outbound rich response, in display order
///
/// Serializes externally tagged, e.g. `{"simpleResponse": {...}}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ResponseItem {
    /// Speech, optionally with display text
    SimpleResponse(SimpleResponse),
    /// Structured card
    BasicCard(BasicCard),
}

/// Anything accepted by `ask` and `close`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    /// Raw text, spoken as is
    Speech(String),
    /// Speech with optional display text
    Simple(SimpleResponse),
    /// Structured card
    Card(BasicCard),
    /// Suggestion chips, routed to the suggestion list
    Suggestions(Suggestions),
}

impl Fragment {
    /// Recognize a fragment from an untyped JSON value
    ///
    /// Strings are speech. Objects are matched by shape: `textToSpeech` marks
    /// a simple response, `suggestions` a chip list, and any card field a
    /// basic card. Every other value is rejected.
    pub fn from_value(value: &Value) -> TurnResult<Self> {
        match value {
            Value::String(text) => Ok(Fragment::Speech(text.clone())),
            Value::Object(object) if object.contains_key("textToSpeech") => {
                serde_json::from_value(value.clone())
                    .map(Fragment::Simple)
                    .map_err(|e| TurnError::UnrecognizedFragment(format!("simple response: {e}")))
            }
            Value::Object(object) if object.contains_key("suggestions") => {
                match (object.len(), object.get("suggestions")) {
                    (1, Some(Value::Array(values))) => {
                        Suggestions::from_json(values).map(Fragment::Suggestions)
                    }
                    _ => Err(TurnError::UnrecognizedFragment(value.to_string())),
                }
            }
            Value::Object(object) if CARD_KEYS.iter().any(|key| object.contains_key(*key)) => {
                serde_json::from_value(value.clone())
                    .map(Fragment::Card)
                    .map_err(|e| TurnError::UnrecognizedFragment(format!("basic card: {e}")))
            }
            other => Err(TurnError::UnrecognizedFragment(other.to_string())),
        }
    }
}

impl From<&str> for Fragment {
    fn from(text: &str) -> Self {
        Fragment::Speech(text.to_string())
    }
}

impl From<String> for Fragment {
    fn from(text: String) -> Self {
        Fragment::Speech(text)
    }
}

impl From<SimpleResponse> for Fragment {
    fn from(response: SimpleResponse) -> Self {
        Fragment::Simple(response)
    }
}

impl From<BasicCard> for Fragment {
    fn from(card: BasicCard) -> Self {
        Fragment::Card(card)
    }
}

impl From<Suggestions> for Fragment {
    fn from(suggestions: Suggestions) -> Self {
        Fragment::Suggestions(suggestions)
    }
}

/// A reprompt played when the user says nothing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoInputPrompt {
    Text(String),
    Simple(SimpleResponse),
}

impl NoInputPrompt {
    /// Normalize to the speech-only wire shape
    pub fn to_simple_response(&self) -> SimpleResponse {
        match self {
            NoInputPrompt::Text(text) => SimpleResponse::new(text.clone()),
            NoInputPrompt::Simple(response) => SimpleResponse::new(response.text_to_speech.clone()),
        }
    }
}

impl From<&str> for NoInputPrompt {
    fn from(text: &str) -> Self {
        NoInputPrompt::Text(text.to_string())
    }
}

impl From<String> for NoInputPrompt {
    fn from(text: String) -> Self {
        NoInputPrompt::Text(text)
    }
}

impl From<SimpleResponse> for NoInputPrompt {
    fn from(response: SimpleResponse) -> Self {
        NoInputPrompt::Simple(response)
    }
}

/// Surface features advertised by the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Capability {
    /// The device has a screen
    ScreenOutput,
    /// The device can play audio
    AudioOutput,
    /// The device can open web links
    WebBrowser,
    /// The device can play long-form media
    MediaResponseAudio,
}

impl Capability {
    /// All known capabilities
    pub const ALL: [Capability; 4] = [
        Capability::ScreenOutput,
        Capability::AudioOutput,
        Capability::WebBrowser,
        Capability::MediaResponseAudio,
    ];

    /// Wire name of the capability
    pub fn name(self) -> &'static str {
        match self {
            Capability::ScreenOutput => "actions.capability.SCREEN_OUTPUT",
            Capability::AudioOutput => "actions.capability.AUDIO_OUTPUT",
            Capability::WebBrowser => "actions.capability.WEB_BROWSER",
            Capability::MediaResponseAudio => "actions.capability.MEDIA_RESPONSE_AUDIO",
        }
    }

    /// Look up a capability by wire name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|capability| capability.name() == name)
    }
}

/// Capability set of one surface
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SurfaceCapabilities {
    capabilities: BTreeSet<Capability>,
}

impl SurfaceCapabilities {
    /// Build from wire names; unknown names are skipped
    pub fn from_names<'a, I>(names: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let capabilities = names
            .into_iter()
            .filter_map(|name| {
                let capability = Capability::from_name(name);
                if capability.is_none() {
                    tracing::debug!(name, "ignoring unknown surface capability");
                }
                capability
            })
            .collect();

        Self { capabilities }
    }

    pub fn has(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }

    /// Whether the current device can show cards
    pub fn has_screen(&self) -> bool {
        self.has(Capability::ScreenOutput)
    }

    pub fn has_audio(&self) -> bool {
        self.has(Capability::AudioOutput)
    }

    pub fn has_web_browser(&self) -> bool {
        self.has(Capability::WebBrowser)
    }

    pub fn has_media_response_audio(&self) -> bool {
        self.has(Capability::MediaResponseAudio)
    }

    pub fn iter(&self) -> impl Iterator<Item = Capability> + '_ {
        self.capabilities.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.capabilities.is_empty()
    }
}

/// Other surfaces the user owns, e.g. a phone next to a speaker
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AvailableSurfaces {
    pub surfaces: Vec<SurfaceCapabilities>,
}

impl AvailableSurfaces {
    /// Whether any other surface offers the capability
    pub fn has(&self, capability: Capability) -> bool {
        self.surfaces.iter().any(|surface| surface.has(capability))
    }
}
