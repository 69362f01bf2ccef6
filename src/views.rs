use crate::{
    extractors::{ActionSlots, Contact, Invite},
    filter::{filter_actions, FilterOptions, ANY},
    parse::ActionItem,
};
use anyhow::{bail, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// A single "view" over the actions. Every view picks out some of the actions and presents them in
/// a particular way (e.g. as a plain list, or as the availability slots they need).
#[derive(Deserialize, Subcommand, Clone, Debug)]
#[serde(rename_all = "snake_case")]
#[serde(tag = "type")]
#[command(rename_all = "snake_case")]
pub enum View {
    /// The actions matching a set of criteria, in the order they appear in the inventory.
    Actions(ActionsFilter),
    /// The hourly availability slots each action matching a set of criteria takes up. This is what
    /// the sign-up form uses to pre-select a volunteer's availability.
    Slots(SlotsFilter),
    /// A Google Calendar invite for a volunteer signing up to a single action, found by its title.
    Invite(InviteFilter),
}
impl View {
    /// Checks the criteria in this view against the given option sets, so a typo in a category
    /// doesn't silently produce an empty view.
    pub fn validate(&self, options: &FilterOptions) -> Result<()> {
        match &self {
            Self::Actions(filter) | Self::Slots(SlotsFilter { filter }) => filter.validate(options),
            Self::Invite(InviteFilter { title, email, .. }) => {
                if title.trim().is_empty() {
                    bail!("invites need the title of an action");
                }
                if !email.contains('@') {
                    bail!("`{email}` is not a valid email address");
                }
                Ok(())
            }
        }
    }

    /// Produces the data for this view from the full list of actions. The reference date is used
    /// for anything that needs a date but doesn't have one.
    pub fn evaluate(&self, actions: &[ActionItem], today: NaiveDate) -> ViewData {
        match &self {
            Self::Actions(filter) => ViewData::Actions(filter.apply(actions)),
            Self::Slots(SlotsFilter { filter }) => ViewData::Slots(
                filter
                    .apply(actions)
                    .iter()
                    .map(ActionSlots::from_action_item)
                    .collect(),
            ),
            Self::Invite(InviteFilter {
                title,
                name,
                email,
                motivation,
            }) => {
                let contact = Contact {
                    name: name.clone(),
                    email: email.clone(),
                    motivation: motivation.clone(),
                };
                let invite = actions
                    .iter()
                    .find(|a| a.title == *title)
                    .map(|item| Invite::from_action_item(item, &contact, today));
                if invite.is_none() {
                    warn!("no action titled `{title}` to create an invite for");
                }
                ViewData::Invite(invite)
            }
        }
    }
}

/// The data produced by a single view, tagged with the type of the view that produced it.
#[derive(Serialize, Debug)]
#[serde(rename_all = "snake_case")]
#[serde(tag = "type", content = "data")]
pub enum ViewData {
    Actions(Vec<ActionItem>),
    Slots(Vec<ActionSlots>),
    /// There might be no action with the requested title (e.g. if it's already happened).
    Invite(Option<Invite>),
}

#[derive(Parser, Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ActionsFilter {
    /// How long the actions should take (e.g. `Hours`), matched exactly. `Any` matches
    /// everything.
    #[arg(short, long, default_value = ANY)]
    #[serde(default = "any")]
    pub time: String,
    /// How the actions are done (e.g. `Individual`, `Collective`), matched exactly. `Any` matches
    /// everything.
    #[arg(short, long, default_value = ANY)]
    #[serde(default = "any")]
    pub effort: String,
    /// An interest the actions should relate to. If this is given more than once, actions relating
    /// to any one of them will be shown. If it's not given at all, actions won't be filtered by
    /// their interests.
    #[arg(short, long = "interest")]
    #[serde(default)]
    pub interests: Vec<String>,
}
impl ActionsFilter {
    pub fn validate(&self, options: &FilterOptions) -> Result<()> {
        options.validate(&self.time, &self.effort, &self.interests)
    }

    pub fn apply(&self, actions: &[ActionItem]) -> Vec<ActionItem> {
        filter_actions(actions, &self.time, &self.effort, &self.interests)
    }
}
impl Default for ActionsFilter {
    fn default() -> Self {
        Self {
            time: any(),
            effort: any(),
            interests: Vec::new(),
        }
    }
}

#[derive(Parser, Debug, Clone, Deserialize)]
pub struct SlotsFilter {
    #[command(flatten)]
    #[serde(flatten)]
    filter: ActionsFilter,
}

#[derive(Parser, Debug, Clone, Deserialize)]
pub struct InviteFilter {
    /// The exact title of the action to sign up for.
    #[arg(short, long)]
    title: String,
    /// The name of the volunteer.
    #[arg(short, long)]
    name: String,
    /// The volunteer's email address, which will be added as a guest on the invite.
    #[arg(short, long)]
    email: String,
    /// Why the volunteer wants to take part.
    #[arg(short, long, default_value = "")]
    #[serde(default)]
    motivation: String,
}

fn any() -> String {
    ANY.to_string()
}
