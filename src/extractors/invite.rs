use super::slots::parse_time_range;
use crate::parse::ActionItem;
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

/// The first time of day mentioned in some text, like `9`, `9:30`, or `6 PM`.
static START_TIME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d{1,2}):?(\d{0,2})\s*(AM|PM)?").unwrap());

/// The details a volunteer gives when signing up for an action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Contact {
    pub name: String,
    pub email: String,
    pub motivation: String,
}

/// A Google Calendar invite for a volunteer to attend an action.
#[derive(Serialize, Debug, PartialEq, Eq)]
pub struct Invite {
    /// The title of the action this invite is for.
    pub title: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// A link that opens a pre-filled event in Google Calendar.
    pub url: String,
}
impl Invite {
    /// Creates an invite for the given action. Actions without a parsed date will be put on the
    /// given fallback date, and actions without a recognisable time will start at 9 AM. Invites
    /// always last an hour.
    pub fn from_action_item(item: &ActionItem, contact: &Contact, fallback_date: NaiveDate) -> Self {
        let date = item.parsed_date.unwrap_or(fallback_date);
        let start = date.and_time(NaiveTime::MIN) + start_offset(&item.time);
        let end = start + Duration::hours(1);

        let title = if item.title.is_empty() {
            "Climate Action Event"
        } else {
            item.title.as_str()
        };
        let details = format!(
            "You've signed up for this climate action event!\n\nMotivation: {}\n\nContact: {} ({})",
            contact.motivation, contact.name, contact.email
        );
        let url = format!(
            "https://calendar.google.com/calendar/render?action=TEMPLATE&text={}&dates={}/{}&details={}&location={}&add={}",
            urlencoding::encode(title),
            calendar_timestamp(start),
            calendar_timestamp(end),
            urlencoding::encode(&details),
            urlencoding::encode(&item.location),
            urlencoding::encode(&contact.email),
        );

        Self {
            title: item.title.clone(),
            start,
            end,
            url,
        }
    }
}

/// Works out how long after midnight an action starts from its free-text time. Ranges start where
/// the slot matcher says they do, so `9-10 PM` starts at 21:00. Hours and minutes past the end of
/// the day roll over into the next one.
fn start_offset(time: &str) -> Duration {
    if let Some(range) = parse_time_range(time) {
        return Duration::hours(range.start.into()) + Duration::minutes(range.start_minute.into());
    }

    let Some(caps) = START_TIME.captures(time) else {
        return Duration::hours(9);
    };
    let mut hour: i64 = caps[1].parse().unwrap_or_default();
    let minute: i64 = caps[2].parse().unwrap_or_default();
    match caps.get(3).map(|m| m.as_str().to_uppercase()).as_deref() {
        Some("PM") if hour != 12 => hour += 12,
        Some("AM") if hour == 12 => hour = 0,
        _ => {}
    }

    Duration::hours(hour) + Duration::minutes(minute)
}

/// Formats a datetime the way Google Calendar expects it in links (e.g. `20250615T090000`).
fn calendar_timestamp(dt: NaiveDateTime) -> String {
    dt.format("%Y%m%dT%H%M%S").to_string()
}
