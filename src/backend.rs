//! Media backend: the contract the player drives and its `rodio` implementation.
//!
//! The `rodio` backend runs on its own audio thread. Commands travel over a
//! channel, status is published through a shared handle for the synchronous
//! queries, and notifications are posted back as [`SourceEvent`]s.

mod detached;
mod player;
mod sink;
mod thread;
mod types;

pub use detached::DetachedBackend;
pub use player::RodioBackend;
pub use types::*;

#[cfg(test)]
mod tests;
