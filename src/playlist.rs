//! Playlist ownership and the active-index rules.
//!
//! [`Tracker`] keeps `current` pointing at the same track (or at nothing)
//! across appends, deletions and navigation, and drives the coordinator
//! when the active track changes.

mod model;
mod tracker;

pub use model::Playlist;
pub use tracker::Tracker;

#[cfg(test)]
mod tests;
