//! Tests for user storage hydration and diffing

use serde_json::json;
use turn_context::{ConversationRequest, StorageMap, TurnContext, storage};

fn map(value: serde_json::Value) -> StorageMap {
    match value {
        serde_json::Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

fn turn_with_storage(user_storage: &str) -> TurnContext {
    let request: ConversationRequest = serde_json::from_value(json!({
        "user": { "userStorage": user_storage }
    }))
    .unwrap();

    TurnContext::new(Some(&request)).unwrap()
}

#[test]
fn test_diff_equal_maps_is_empty() {
    let original = map(json!({ "a": "1", "nested": { "b": [1, 2] } }));
    let current = original.clone();

    assert_eq!(storage::diff(&original, &current).unwrap(), "");
    assert_eq!(storage::diff(&StorageMap::new(), &StorageMap::new()).unwrap(), "");
}

#[test]
fn test_diff_changed_map_is_wrapped() {
    let original = map(json!({ "a": "1" }));
    let current = map(json!({ "a": "2" }));

    assert_eq!(
        storage::diff(&original, &current).unwrap(),
        r#"{"data":{"a":"2"}}"#
    );
}

#[test]
fn test_diff_cleared_map_is_written() {
    let original = map(json!({ "a": "1" }));

    assert_eq!(
        storage::diff(&original, &StorageMap::new()).unwrap(),
        r#"{"data":{}}"#
    );
}

#[test]
fn test_wrap_sorts_keys() {
    let data = map(json!({ "zebra": 1, "apple": 2, "mango": { "b": 1, "a": 2 } }));

    assert_eq!(
        storage::wrap(&data).unwrap(),
        r#"{"data":{"apple":2,"mango":{"a":2,"b":1},"zebra":1}}"#
    );
}

#[test]
fn test_unwrap_round_trip() {
    let data = map(json!({
        "count": 3,
        "name": "Ada",
        "flags": [true, false],
        "profile": { "colors": ["red"], "score": 1.5 },
        "missing": null
    }));

    let serialized = storage::wrap(&data).unwrap();

    assert_eq!(storage::unwrap(&serialized).unwrap(), data);
}

#[test]
fn test_unwrap_empty_input() {
    assert!(storage::unwrap("").unwrap().is_empty());
    assert!(storage::unwrap("   ").unwrap().is_empty());
    assert!(storage::unwrap("{}").unwrap().is_empty());
}

#[test]
fn test_unwrap_rejects_malformed_input() {
    assert!(storage::unwrap("{").is_err());
    assert!(storage::unwrap("[]").is_err());
    assert!(storage::unwrap(r#""data""#).is_err());
    assert!(storage::unwrap(r#"{"data":"x"}"#).is_err());
}

#[test]
fn test_hydrated_storage_unchanged() {
    let mut turn = turn_with_storage(r#"{"data":{"a":"1"}}"#);

    assert_eq!(turn.user().storage.get("a"), Some(&json!("1")));

    turn.ask(["hi"]).unwrap();
    let response = turn.response().unwrap();

    assert_eq!(response.user_storage, "");
}

#[test]
fn test_hydrated_storage_changed() {
    let mut turn = turn_with_storage(r#"{"data":{"a":"1"}}"#);

    turn.user_mut().storage.insert("a".to_string(), json!("2"));
    turn.ask(["hi"]).unwrap();
    let response = turn.response().unwrap();

    assert_eq!(response.user_storage, r#"{"data":{"a":"2"}}"#);
}

#[test]
fn test_storage_set_back_to_original_is_unchanged() {
    let mut turn = turn_with_storage(r#"{"data":{"a":"1"}}"#);

    turn.user_mut().storage.insert("a".to_string(), json!("2"));
    turn.user_mut().storage.insert("a".to_string(), json!("1"));
    let response = turn.response().unwrap();

    assert_eq!(response.user_storage, "");
}

#[test]
fn test_deep_mutation_is_detected() {
    let mut turn = turn_with_storage(r#"{"data":{"profile":{"prefs":{"volume":3}}}}"#);

    let volume = turn
        .user_mut()
        .storage
        .get_mut("profile")
        .and_then(|profile| profile.get_mut("prefs"))
        .and_then(|prefs| prefs.get_mut("volume"))
        .unwrap();
    *volume = json!(7);

    let response = turn.response().unwrap();

    assert_eq!(
        response.user_storage,
        r#"{"data":{"profile":{"prefs":{"volume":7}}}}"#
    );
}

#[test]
fn test_new_storage_without_request() {
    let mut turn = TurnContext::new(None).unwrap();

    let untouched = turn.response().unwrap();
    assert_eq!(untouched.user_storage, "");

    let mut turn_with_write = TurnContext::new(None).unwrap();
    turn_with_write
        .user_mut()
        .storage
        .insert("visits".to_string(), json!(1));
    let written = turn_with_write.response().unwrap();
    assert_eq!(written.user_storage, r#"{"data":{"visits":1}}"#);
}

#[test]
fn test_storage_mutation_between_responses() {
    let mut turn = turn_with_storage(r#"{"data":{"a":"1"}}"#);
    turn.ask(["hi"]).unwrap();

    assert_eq!(turn.response().unwrap().user_storage, "");

    turn.user_mut().storage.remove("a");
    assert_eq!(turn.response().unwrap().user_storage, r#"{"data":{}}"#);
}

#[test]
fn test_conversation_data_round_trip() {
    let request: ConversationRequest = serde_json::from_value(json!({
        "conversation": {
            "conversationId": "c1",
            "conversationToken": r#"{"data":{"step":1}}"#
        }
    }))
    .unwrap();
    let mut turn = TurnContext::new(Some(&request)).unwrap();

    assert_eq!(turn.data().get("step"), Some(&json!(1)));

    turn.data_mut().insert("step".to_string(), json!(2));
    turn.ask(["next"]).unwrap();
    let response = turn.response().unwrap();

    assert_eq!(
        response.conversation_token.as_deref(),
        Some(r#"{"data":{"step":2}}"#)
    );
}

#[test]
fn test_conversation_token_omitted_without_data() {
    let mut turn = TurnContext::new(None).unwrap();
    turn.ask(["hi"]).unwrap();

    let response = turn.response().unwrap();

    assert_eq!(response.conversation_token, None);
}

#[test]
fn test_cleared_conversation_data_is_written() {
    let request: ConversationRequest = serde_json::from_value(json!({
        "conversation": { "conversationToken": r#"{"data":{"step":1}}"# }
    }))
    .unwrap();
    let mut turn = TurnContext::new(Some(&request)).unwrap();

    turn.data_mut().clear();
    let response = turn.response().unwrap();

    assert_eq!(response.conversation_token.as_deref(), Some(r#"{"data":{}}"#));
}
