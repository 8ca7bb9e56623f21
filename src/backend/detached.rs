use super::types::{BackendState, MediaBackend};

/// Stand-in used when no output device could be opened.
///
/// Commands are dropped and every query fails, so the player stays stopped.
#[derive(Debug, Default)]
pub struct DetachedBackend;

impl MediaBackend for DetachedBackend {
    fn set_source(&mut self, _uri: &str) {}

    fn source_serial(&self) -> u64 {
        0
    }

    fn set_state(&mut self, _state: BackendState) {}

    fn state(&self) -> BackendState {
        BackendState::Stopped
    }

    fn set_volume(&mut self, _volume: f64) {}

    fn query_duration(&self) -> Option<u64> {
        None
    }

    fn query_position(&self) -> Option<u64> {
        None
    }

    fn seek(&mut self, _flushing: bool, _position_ns: u64) {}
}
