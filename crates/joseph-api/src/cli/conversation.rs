//! Conversation browsing commands: list and history.

use anyhow::{Result, bail};
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use uuid::Uuid;

use joseph_types::chat::TurnRole;
use joseph_types::topic::Topic;

use crate::state::AppState;

const TITLE_WIDTH: usize = 40;

/// List conversations, most recent activity first.
///
/// # Examples
///
/// ```bash
/// joseph conversations
/// joseph conversations --topic pricing-strategy --limit 5 --json
/// ```
pub async fn list_conversations(
    state: &AppState,
    topic: Option<&str>,
    limit: i64,
    json: bool,
) -> Result<()> {
    let topic = match topic {
        Some(token) => match Topic::parse(token) {
            Some(t) => Some(t),
            None => bail!("Unknown topic '{token}'. Run `joseph topics` for the list."),
        },
        None => None,
    };

    let conversations = state
        .chat_service
        .list_conversations(topic, Some(limit), None)
        .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&conversations)?);
        return Ok(());
    }

    if conversations.is_empty() {
        println!();
        println!(
            "  {} No conversations yet. Start one with: {}",
            style("i").blue().bold(),
            style("joseph ask --topic general \"...\"").yellow()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("ID").fg(Color::White),
        Cell::new("Topic").fg(Color::White),
        Cell::new("Title").fg(Color::White),
        Cell::new("Last activity").fg(Color::White),
    ]);

    for conversation in &conversations {
        table.add_row(vec![
            Cell::new(conversation.id).fg(Color::DarkGrey),
            Cell::new(conversation.topic.as_str()).fg(Color::Cyan),
            Cell::new(truncate(
                conversation.title.as_deref().unwrap_or("(untitled)"),
                TITLE_WIDTH,
            )),
            Cell::new(conversation.updated_at.format("%Y-%m-%d %H:%M").to_string()),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    println!(
        "  {} conversation{}",
        style(conversations.len()).bold(),
        if conversations.len() == 1 { "" } else { "s" }
    );
    println!();

    Ok(())
}

/// Print every turn of a conversation, oldest first.
pub async fn show_history(state: &AppState, conversation_id: Uuid, json: bool) -> Result<()> {
    let conversation = state.chat_service.get_conversation(&conversation_id).await?;
    let turns = state.chat_service.list_turns(&conversation_id).await?;

    if json {
        let out = serde_json::json!({
            "conversation": conversation,
            "turns": turns,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} {}",
        style(conversation.topic.display_name()).cyan().bold(),
        style(conversation.title.as_deref().unwrap_or("")).dim()
    );
    println!();

    for turn in &turns {
        let label = match turn.role {
            TurnRole::User => style("You").green().bold(),
            TurnRole::Assistant => style("Joseph").magenta().bold(),
        };
        println!(
            "  {} {}",
            label,
            style(turn.created_at.format("%H:%M:%S").to_string()).dim()
        );
        println!("  {}", turn.text);
        println!();
    }

    if turns.is_empty() {
        println!("  {} No turns yet.", style("i").blue().bold());
        println!();
    }

    Ok(())
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() > width {
        let head: String = text.chars().take(width.saturating_sub(3)).collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("Prévisions économiques", 10), "Prévisi...");
    }
}
