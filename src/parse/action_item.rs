use super::date::{display_date, parse_day_first};
use chrono::NaiveDate;
use serde::Serialize;

/// The minimum number of columns a row needs to become an action item: title, date, time, effort,
/// time category, location, and link. Anything after those is an interest tag.
pub const MIN_FIELDS: usize = 7;

/// A single community action from the inventory.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct ActionItem {
    /// The title of the action. There's no ID, so this is the closest thing to an identity the
    /// action has.
    pub title: String,
    /// The date exactly as it was written in the inventory.
    pub raw_date: String,
    /// A human-readable date: either the long form of the parsed date, or the raw text if it
    /// couldn't be parsed (e.g. `TBD`).
    pub display_date: String,
    /// The date of the action, if it was written as `D/M/YYYY`.
    pub parsed_date: Option<NaiveDate>,
    /// When the action takes place during the day, as free text (e.g. `9-10 AM`).
    pub time: String,
    /// How the action is done (e.g. `Individual`, `Collective`).
    pub effort_category: String,
    /// How long the action takes (e.g. `Hours`, `Days`).
    pub time_category: String,
    pub location: String,
    /// An external link for the action, which may be empty.
    pub link: String,
    /// The interests this action relates to, joined by `", "`.
    pub interest_tags: String,
}
impl ActionItem {
    /// Gets the individual interest tags of this action.
    pub fn interests(&self) -> impl Iterator<Item = &str> {
        self.interest_tags.split(',').map(str::trim)
    }
}

/// Why a row didn't make it into the collection.
#[derive(Debug, PartialEq, Eq)]
pub enum RowOutcome {
    Kept(ActionItem),
    /// The row had fewer than [`MIN_FIELDS`] columns.
    Malformed,
    /// The row's date is before the reference date.
    Past,
}

/// Converts the fields of a single row into an action item, relative to the given reference date
/// (anything with a parsed date before this is in the past and won't be kept).
pub fn row_to_action_item(fields: Vec<String>, today: NaiveDate) -> RowOutcome {
    if fields.len() < MIN_FIELDS {
        return RowOutcome::Malformed;
    }

    let mut fields = fields.into_iter();
    // We know we have at least the core fields, so these defaults never actually get used
    let mut next = || fields.next().unwrap_or_default();

    let title = strip_wrapping_quotes(&next());
    let raw_date = strip_wrapping_quotes(&next());
    let parsed_date = parse_day_first(&raw_date);
    if parsed_date.is_some_and(|d| d < today) {
        return RowOutcome::Past;
    }

    let item = ActionItem {
        title,
        display_date: parsed_date.map_or_else(|| raw_date.clone(), display_date),
        raw_date,
        parsed_date,
        time: next(),
        effort_category: next(),
        time_category: next(),
        location: next(),
        link: next(),
        interest_tags: fields
            .filter(|tag| !tag.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
            .trim()
            .to_string(),
    };
    RowOutcome::Kept(item)
}

/// Strips a single leading and a single trailing quote, if present.
fn strip_wrapping_quotes(s: &str) -> String {
    let s = s.strip_prefix('"').unwrap_or(s);
    s.strip_suffix('"').unwrap_or(s).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(fields: &[&str]) -> Vec<String> {
        fields.iter().map(|s| s.to_string()).collect()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    #[test]
    fn test_full_row() {
        let outcome = row_to_action_item(
            row(&[
                "River Cleanup",
                "20/6/2025",
                "9:00 AM - 12:00 PM",
                "Collective",
                "Hours",
                "Victoria Park",
                "https://example.org",
                "Waterways",
                "",
                "Social",
            ]),
            today(),
        );
        assert_eq!(
            outcome,
            RowOutcome::Kept(ActionItem {
                title: "River Cleanup".to_string(),
                raw_date: "20/6/2025".to_string(),
                display_date: "June 20, 2025".to_string(),
                parsed_date: NaiveDate::from_ymd_opt(2025, 6, 20),
                time: "9:00 AM - 12:00 PM".to_string(),
                effort_category: "Collective".to_string(),
                time_category: "Hours".to_string(),
                location: "Victoria Park".to_string(),
                link: "https://example.org".to_string(),
                interest_tags: "Waterways, Social".to_string(),
            })
        );
    }

    #[test]
    fn test_short_row() {
        assert_eq!(
            row_to_action_item(row(&["a", "b", "c", "d", "e", "f"]), today()),
            RowOutcome::Malformed
        );
    }

    #[test]
    fn test_past_and_today() {
        let past = row(&["Old", "14/6/2025", "", "", "", "", ""]);
        assert_eq!(row_to_action_item(past, today()), RowOutcome::Past);

        // Today itself is not in the past
        let current = row(&["Now", "15/6/2025", "", "", "", "", ""]);
        assert!(matches!(
            row_to_action_item(current, today()),
            RowOutcome::Kept(_)
        ));
    }

    #[test]
    fn test_unparsed_date_kept() {
        let RowOutcome::Kept(item) =
            row_to_action_item(row(&["Later", "TBD", "", "", "", "", ""]), today())
        else {
            panic!("undated action should be kept");
        };
        assert_eq!(item.display_date, "TBD");
        assert_eq!(item.parsed_date, None);
        assert_eq!(item.link, "");
        assert_eq!(item.interest_tags, "");
    }

    #[test]
    fn test_wrapping_quotes_stripped() {
        let RowOutcome::Kept(item) = row_to_action_item(
            row(&["\"Quoted\"", "\"TBD\"", "\"x\"", "", "", "", ""]),
            today(),
        ) else {
            panic!("row should be kept");
        };
        assert_eq!(item.title, "Quoted");
        assert_eq!(item.raw_date, "TBD");
        // Only the title and date are stripped
        assert_eq!(item.time, "\"x\"");
        assert_eq!(strip_wrapping_quotes("\"\"a\"\""), "\"a\"");
    }

    #[test]
    fn test_interests_split() {
        let item = ActionItem {
            title: String::new(),
            raw_date: String::new(),
            display_date: String::new(),
            parsed_date: None,
            time: String::new(),
            effort_category: String::new(),
            time_category: String::new(),
            location: String::new(),
            link: String::new(),
            interest_tags: "Food, Policy,Urban Planning".to_string(),
        };
        assert_eq!(
            item.interests().collect::<Vec<_>>(),
            vec!["Food", "Policy", "Urban Planning"]
        );
    }
}
