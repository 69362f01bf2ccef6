mod invite;
mod slots;

pub use invite::{Contact, Invite};
pub use slots::ActionSlots;
