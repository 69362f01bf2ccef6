mod action_item;
mod csv;
mod date;
mod fetch;

use action_item::{row_to_action_item, RowOutcome};
use chrono::NaiveDate;
use csv::parse_csv_line;
use fetch::get_raw_csv;
use tracing::{debug, error, info};

pub use action_item::ActionItem;
pub use fetch::DEFAULT_SOURCE;

/// The action items parsed from an inventory, along with counts of the rows that didn't make it.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Normalized {
    pub items: Vec<ActionItem>,
    /// Rows that had too few columns to be an action.
    pub dropped_rows: usize,
    /// Rows whose date had already passed.
    pub past_events: usize,
}

/// Normalises the full text of an inventory CSV to a list of action items, relative to the given
/// reference date. The header line is skipped, as are blank lines, rows without enough columns,
/// and actions that have already happened.
pub fn normalize_action_items(csv_text: &str, today: NaiveDate) -> Normalized {
    let mut normalized = Normalized::default();
    for line in csv_text.split('\n').skip(1) {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match row_to_action_item(parse_csv_line(line), today) {
            RowOutcome::Kept(item) => normalized.items.push(item),
            RowOutcome::Malformed => normalized.dropped_rows += 1,
            RowOutcome::Past => normalized.past_events += 1,
        }
    }

    debug!(
        kept = normalized.items.len(),
        dropped_rows = normalized.dropped_rows,
        past_events = normalized.past_events,
        "normalised action inventory"
    );
    normalized
}

/// Fetches and normalises the action inventory at the given source. If anything goes wrong
/// fetching it, this logs the error and gives back an empty collection: having no actions is a
/// perfectly valid state for callers.
pub fn fetch_action_items(source: &str, today: NaiveDate) -> Normalized {
    match get_raw_csv(source) {
        Ok(text) => {
            info!("fetched action inventory from {source}");
            normalize_action_items(&text, today)
        }
        Err(err) => {
            error!("error fetching action inventory: {err:#}");
            Normalized::default()
        }
    }
}
