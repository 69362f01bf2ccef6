mod cli;
mod extractors;
mod filter;
mod parse;
mod views;

use crate::parse::fetch_action_items;
use crate::views::ViewData;
use anyhow::Result;
use chrono::{Local, NaiveDate};
use clap::Parser;
use cli::{Cli, Encoding};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Logs go to stderr, stdout is reserved for the data
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("grassroots=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut args = Cli::parse();
    // Views are validated before we fetch anything
    let Some(views) = args.parse_views()? else {
        return Ok(());
    };
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());

    // A failed fetch leaves us with no actions, which every view can handle
    let normalized = fetch_action_items(&args.source, today);
    info!(
        "loaded {} actions ({} malformed rows, {} past events) for {today}",
        normalized.items.len(),
        normalized.dropped_rows,
        normalized.past_events
    );

    let final_data = FinalData {
        meta: Meta {
            reference_date: today,
            source: args.source.clone(),
            actions: normalized.items.len(),
            dropped_rows: normalized.dropped_rows,
            past_events: normalized.past_events,
        },
        views: views
            .into_iter()
            .map(|named| {
                let data = named.view.evaluate(&normalized.items, today);
                (named.name, data)
            })
            .collect(),
    };

    if args.encoding == Encoding::Bincode {
        let bytes = bincode::serialize(&final_data)?;
        std::io::stdout().write_all(&bytes)?;
        std::io::stdout().flush()?;
    } else {
        println!("{}", serde_json::to_string(&final_data)?);
    }

    Ok(())
}

/// The final data we stream to the caller.
#[derive(Serialize)]
struct FinalData {
    meta: Meta,
    /// The data for each view, by its name.
    views: BTreeMap<String, ViewData>,
}

/// Details about the inventory the views were computed from.
#[derive(Serialize)]
struct Meta {
    /// The date actions were considered past relative to.
    reference_date: NaiveDate,
    source: String,
    /// The number of actions available to the views.
    actions: usize,
    dropped_rows: usize,
    past_events: usize,
}
