//! `joseph topics`: print the closed topic set.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use joseph_types::topic::{Topic, TopicInfo};

pub fn list_topics(json: bool) -> Result<()> {
    let topics: Vec<TopicInfo> = Topic::ALL.into_iter().map(TopicInfo::from).collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&topics)?);
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Token").fg(Color::White),
        Cell::new("Name").fg(Color::White),
        Cell::new("Description").fg(Color::White),
    ]);

    for topic in &topics {
        table.add_row(vec![
            Cell::new(&topic.id).fg(Color::Cyan),
            Cell::new(&topic.name).fg(Color::White),
            Cell::new(&topic.description).fg(Color::DarkGrey),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    println!(
        "  {} Unknown tokens fall back to {}",
        style("i").blue().bold(),
        style(Topic::General.as_str()).yellow()
    );
    println!();

    Ok(())
}
