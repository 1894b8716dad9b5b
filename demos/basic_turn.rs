//! Basic Turn Example
//!
//! This example demonstrates how to:
//! - Build a turn context from an inbound request body
//! - Shape the reply for the current device
//! - Update per-user storage
//! - Serialize the response for the platform

use anyhow::Context;
use serde_json::json;
use turn_context::{BasicCard, ConversationRequest, Fragment, Image, Suggestions, TurnContext};

const REQUEST: &str = r#"{
    "user": { "userStorage": "{\"data\":{\"favoriteColor\":\"blue\"}}" },
    "conversation": { "conversationId": "demo-1" },
    "surface": {
        "capabilities": [
            { "name": "actions.capability.SCREEN_OUTPUT" },
            { "name": "actions.capability.AUDIO_OUTPUT" }
        ]
    }
}"#;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    println!("=== Turn Context Example ===\n");

    // Step 1: Parse the request and open the turn
    println!("1. Opening turn...");
    let request = ConversationRequest::from_json(REQUEST).context("parsing request body")?;
    let mut turn = TurnContext::new(Some(&request)).context("building turn context")?;
    println!("   Turn {} has screen: {}\n", turn.id(), turn.device().has_screen());

    // Step 2: Read and update user storage
    println!("2. Updating user storage...");
    let color = turn
        .user()
        .storage
        .get("favoriteColor")
        .and_then(|color| color.as_str())
        .unwrap_or("unknown")
        .to_string();
    turn.user_mut()
        .storage
        .insert("lastColorAsked".to_string(), json!(color));
    println!("   Favorite color is {color}\n");

    // Step 3: Build the reply
    println!("3. Asking the user...");
    let mut fragments = vec![Fragment::from(format!(
        "Your favorite color is {color}. Want to change it?"
    ))];
    if turn.device().has_screen() {
        fragments.push(
            BasicCard::new()
                .title("Favorite color")
                .formatted_text(color.clone())
                .image(Image::new("https://example.com/swatch.png", "Color swatch"))
                .into(),
        );
        fragments.push(Suggestions::new(["Yes", "No"]).into());
    }
    turn.ask(fragments)?;
    turn.set_no_input_prompts(["Should I change your color?", "Say yes or no."])?;

    // Step 4: Serialize
    println!("4. Serializing response...");
    let response = turn.response()?;
    println!("{}", serde_json::to_string_pretty(&response)?);

    println!("\n=== Example completed successfully! ===");
    Ok(())
}
