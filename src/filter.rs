use crate::parse::ActionItem;
use anyhow::{bail, Result};

/// The wildcard value for the time and effort criteria.
pub const ANY: &str = "Any";

/// Filters the given actions down to those matching all three criteria, keeping their order.
///
/// The time and effort criteria match their categories exactly (case included), unless they're
/// [`ANY`]. An action matches the interests if no interests are given, or if it has at least one
/// of them.
pub fn filter_actions(
    actions: &[ActionItem],
    time: &str,
    effort: &str,
    interests: &[String],
) -> Vec<ActionItem> {
    actions
        .iter()
        .filter(|action| time == ANY || action.time_category == time)
        .filter(|action| effort == ANY || action.effort_category == effort)
        .filter(|action| {
            interests.is_empty()
                || action
                    .interests()
                    .any(|tag| interests.iter().any(|i| i == tag))
        })
        .cloned()
        .collect()
}

/// The sets of values users can pick from for each criterion. These only guide validation of
/// criteria, actions themselves may use whatever categories they like.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterOptions {
    pub time: Vec<String>,
    pub effort: Vec<String>,
    pub interests: Vec<String>,
}
impl FilterOptions {
    /// Checks the given criteria are all among these options.
    pub fn validate(&self, time: &str, effort: &str, interests: &[String]) -> Result<()> {
        if !self.time.iter().any(|t| t == time) {
            bail!(
                "unknown time '{time}', expected one of: {}",
                self.time.join(", ")
            );
        }
        if !self.effort.iter().any(|e| e == effort) {
            bail!(
                "unknown effort '{effort}', expected one of: {}",
                self.effort.join(", ")
            );
        }
        if let Some(interest) = interests.iter().find(|i| !self.interests.contains(*i)) {
            bail!(
                "unknown interest '{interest}', expected any of: {}",
                self.interests.join(", ")
            );
        }

        Ok(())
    }
}
impl Default for FilterOptions {
    fn default() -> Self {
        let owned =
            |opts: &[&str]| -> Vec<String> { opts.iter().map(|s| s.to_string()).collect() };
        Self {
            time: owned(&[ANY, "Minutes", "Hours", "Days", "Weeks"]),
            effort: owned(&[ANY, "Individual", "Collective", "Both"]),
            interests: owned(&[
                "Biodiversity",
                "Hackathon",
                "Networking",
                "Social",
                "Education",
                "Business",
                "Waste Management",
                "Gardening",
                "Food",
                "Urban Planning",
                "Transportation",
                "Waterways",
                "Policy",
                "Technology",
            ]),
        }
    }
}
