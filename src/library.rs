//! Playlist entries and the file/metadata resolver.
//!
//! `TrackRef` is what the playlist stores; `metadata` turns a path into one
//! (falling back to the file name when tags are unreadable) and `scan`
//! expands directories into audio files.

mod metadata;
mod model;
mod scan;

pub use metadata::{describe, read_tags};
pub use model::TrackRef;
pub use scan::expand_paths;

#[cfg(test)]
mod tests;
