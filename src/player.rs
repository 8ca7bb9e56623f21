//! Playback coordinator: transport state, volume/mute bookkeeping, the
//! duration/position cache and the load generation that scopes duration polls.

mod coordinator;
mod format;
mod model;

pub use coordinator::Coordinator;
pub use format::{VolumeIcon, format_secs};
pub use model::{PlaybackState, TransportSnapshot};

#[cfg(test)]
pub(crate) mod testing;
