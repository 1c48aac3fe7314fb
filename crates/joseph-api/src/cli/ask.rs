//! `joseph ask`: one persisted exchange from the command line.

use anyhow::Result;
use console::style;
use uuid::Uuid;

use joseph_types::chat::{ChatRequest, ReplyOutcome};

use crate::state::AppState;

/// Send one message, creating a conversation unless `conversation_id` is given.
///
/// # Examples
///
/// ```bash
/// joseph ask --topic pricing-strategy "Should I raise prices 5%?"
/// joseph ask --conversation <id> "And for wholesale?"
/// ```
pub async fn ask(
    state: &AppState,
    topic: Option<String>,
    conversation_id: Option<Uuid>,
    message: String,
    json: bool,
    quiet: bool,
) -> Result<()> {
    let request = ChatRequest {
        conversation_id,
        topic,
        content: message,
        current_data: None,
    };

    let exchange = state.chat_service.send_message(request).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&exchange)?);
        return Ok(());
    }

    if quiet {
        println!("{}", exchange.assistant_turn.text);
        return Ok(());
    }

    println!();
    println!("  {}", style("Joseph").magenta().bold());
    println!("  {}", exchange.assistant_turn.text);
    println!();

    if let ReplyOutcome::Fallback { reason } = &exchange.outcome {
        println!(
            "  {} fallback reply ({})",
            style("!").yellow().bold(),
            style(reason).dim()
        );
    }
    println!(
        "  {} {}",
        style("conversation").dim(),
        style(exchange.conversation.id).cyan()
    );
    println!();

    Ok(())
}
