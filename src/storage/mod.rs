//! Persisted state envelopes and the user storage differ
//!
//! The platform stores user storage and conversation data as opaque strings.
//! Both are written as a `{"data": {...}}` envelope. User storage is only sent
//! back when it changed during the turn, so unchanged state is never rewritten.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::TurnResult;

/// Key/value mapping held in an envelope
pub type StorageMap = Map<String, Value>;

#[derive(Debug, Serialize)]
struct EnvelopeRef<'a> {
    data: &'a StorageMap,
}

/// Serialize a mapping inside the envelope
///
/// Keys come out sorted, so equal mappings always produce equal strings.
pub fn wrap(data: &StorageMap) -> TurnResult<String> {
    Ok(serde_json::to_string(&EnvelopeRef { data })?)
}

/// Parse an envelope string back into its mapping
///
/// An empty string, or an envelope without `data`, is an empty mapping. The
/// envelope must be a JSON object and `data` must be an object.
pub fn unwrap(serialized: &str) -> Result<StorageMap, serde_json::Error> {
    if serialized.trim().is_empty() {
        return Ok(StorageMap::new());
    }

    let mut envelope: StorageMap = serde_json::from_str(serialized)?;
    match envelope.remove("data") {
        Some(data) => serde_json::from_value(data),
        None => Ok(StorageMap::new()),
    }
}

/// Compute the outbound user storage field
///
/// Returns `""` when `current` is structurally equal to `original`, otherwise
/// the serialized envelope of `current`.
pub fn diff(original: &StorageMap, current: &StorageMap) -> TurnResult<String> {
    if original == current {
        return Ok(String::new());
    }

    wrap(current)
}
