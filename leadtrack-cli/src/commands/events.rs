//! Event log listing

use anyhow::{Context, Result};
use clap::Args;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets::UTF8_FULL_CONDENSED};
use leadtrack_core::{EventParams, JsonLinesSink, SentEvent};

/// Events arguments
#[derive(Args, Debug)]
pub struct EventsArgs {
    /// Only show the most recent N events
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Print raw JSON lines instead of a table
    #[arg(long)]
    pub json: bool,
}

/// Run events command
pub fn run(args: EventsArgs) -> Result<()> {
    let path = leadtrack_paths::event_log_file();
    let events = JsonLinesSink::read_all(&path)
        .with_context(|| format!("failed to read event log {}", path.display()))?;
    let events = most_recent(events, args.limit);

    if events.is_empty() {
        println!("No events logged.");
        println!();
        println!("Run `leadtrack visit <url>` with a measurement id configured.");
        return Ok(());
    }

    if args.json {
        for event in &events {
            println!("{}", serde_json::to_string(event)?);
        }
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("#").fg(Color::Cyan),
        Cell::new("Sent").fg(Color::Cyan),
        Cell::new("Event").fg(Color::Cyan),
        Cell::new("Params").fg(Color::Cyan),
    ]);

    for event in events {
        table.add_row(vec![
            Cell::new(event.seq),
            Cell::new(event.sent_at.format("%Y-%m-%d %H:%M:%S")),
            Cell::new(&event.name),
            Cell::new(format_params(&event.params)),
        ]);
    }

    println!("{table}");
    Ok(())
}

fn most_recent(mut events: Vec<SentEvent>, limit: Option<usize>) -> Vec<SentEvent> {
    if let Some(limit) = limit
        && events.len() > limit
    {
        events.drain(..events.len() - limit);
    }
    events
}

fn format_params(params: &EventParams) -> String {
    params
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("\n")
}
