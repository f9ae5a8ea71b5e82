//! Boundary data types: user ids, profiles and swipes.
//!
//! Everything arriving from outside the engine is normalized here, at
//! deserialization time. Ids become [`UserId`], profile documents become
//! [`Profile`], and swipe histories become [`SwipeEvent`] lists.

pub mod id;
pub mod profile;
pub mod swipe;

#[cfg(test)]
mod tests;

pub use id::UserId;
pub use profile::{BioEntry, Education, Entries, EntryText, Experience, Location, Profile, Project};
pub use swipe::{SwipeDecision, SwipeEvent, SwipeRecord};
