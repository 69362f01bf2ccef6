use crate::parse::ActionItem;
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

/// The hourly slots volunteers can mark themselves available for, with their start and end hours
/// on a 24-hour clock.
pub const TIME_SLOTS: [(&str, u32, u32); 15] = [
    ("7-8 AM", 7, 8),
    ("8-9 AM", 8, 9),
    ("9-10 AM", 9, 10),
    ("10-11 AM", 10, 11),
    ("11-12 AM", 11, 12),
    ("12-1 PM", 12, 13),
    ("1-2 PM", 13, 14),
    ("2-3 PM", 14, 15),
    ("3-4 PM", 15, 16),
    ("4-5 PM", 16, 17),
    ("5-6 PM", 17, 18),
    ("6-7 PM", 18, 19),
    ("7-8 PM", 19, 20),
    ("8-9 PM", 20, 21),
    ("9-10 PM", 21, 22),
];

/// A range of hours like `9:00 AM - 12:00 PM` or `1-3pm`. Only the end needs a meridiem.
static TIME_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d{1,2}):?(\d{0,2})\s*(AM|PM)?\s*-\s*(\d{1,2}):?(?:\d{0,2})\s*(AM|PM)")
        .unwrap()
});

/// A range of hours found in an action's free-text time, on a 24-hour clock.
#[derive(Debug, PartialEq, Eq)]
pub struct TimeRange {
    pub start: u32,
    /// Minutes past the start hour. The end's minutes are never needed.
    pub start_minute: u32,
    pub end: u32,
}

/// Finds the first range of hours in the given text, if there is one.
///
/// A start without its own meridiem shares the end's, unless that would put it after the end
/// (e.g. `11-1 PM`), in which case it takes the other one.
pub fn parse_time_range(time: &str) -> Option<TimeRange> {
    let caps = TIME_RANGE.captures(time)?;
    // All of these are guaranteed digits by the regex, and at most two of them
    let start_hour: u32 = caps[1].parse().unwrap_or_default();
    let start_minute: u32 = caps[2].parse().unwrap_or_default();
    let end_hour: u32 = caps[4].parse().unwrap_or_default();
    let end = to_24h(end_hour, &caps[5]);
    let start = match caps.get(3) {
        Some(meridiem) => to_24h(start_hour, meridiem.as_str()),
        None => {
            let shared = to_24h(start_hour, &caps[5]);
            if shared <= end {
                shared
            } else {
                to_24h(start_hour, flip(&caps[5]))
            }
        }
    };

    Some(TimeRange {
        start,
        start_minute,
        end,
    })
}

/// An action along with the availability slots it takes up.
#[derive(Serialize, Debug, PartialEq, Eq)]
pub struct ActionSlots {
    pub title: String,
    pub display_date: String,
    /// The original free-text time of the action.
    pub time: String,
    pub slots: Vec<&'static str>,
}
impl ActionSlots {
    pub fn from_action_item(item: &ActionItem) -> Self {
        Self {
            title: item.title.clone(),
            display_date: item.display_date.clone(),
            time: item.time.clone(),
            slots: time_slots_for(&item.time),
        }
    }
}

/// Works out which availability slots an action's free-text time covers.
///
/// Times written as a range cover every slot that fits entirely inside that range. Otherwise, a
/// time that spells out a single slot (e.g. `9 to 10 am`) covers just that one. Undetermined
/// times cover nothing.
pub fn time_slots_for(time: &str) -> Vec<&'static str> {
    let time = time.trim();
    if time.is_empty() || time == "TBD" || time == "To be determined" {
        return Vec::new();
    }

    if let Some(TimeRange { start, end, .. }) = parse_time_range(time) {
        return TIME_SLOTS
            .iter()
            .filter(|(_, slot_start, slot_end)| *slot_start >= start && *slot_end <= end)
            .map(|(label, _, _)| *label)
            .collect();
    }

    let lower = time.to_lowercase();
    TIME_SLOTS
        .iter()
        .find(|(label, _, _)| lower.contains(&spelled_out(label)))
        .map(|(label, _, _)| vec![*label])
        .unwrap_or_default()
}

/// Converts an hour on a 12-hour clock to a 24-hour one.
fn to_24h(hour: u32, meridiem: &str) -> u32 {
    match (meridiem.to_uppercase().as_str(), hour) {
        ("PM", h) if h != 12 => h + 12,
        ("AM", 12) => 0,
        (_, h) => h,
    }
}

fn flip(meridiem: &str) -> &'static str {
    if meridiem.eq_ignore_ascii_case("PM") {
        "AM"
    } else {
        "PM"
    }
}

/// Spells out a slot label the way people sometimes write it, `9-10 AM` becoming `9 to 10 am`.
fn spelled_out(label: &str) -> String {
    label
        .to_lowercase()
        .replacen('-', " to ", 1)
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '_')
        .collect()
}
