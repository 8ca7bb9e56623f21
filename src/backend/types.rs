//! Backend-facing types: the media backend contract, its states and the
//! notifications it posts back onto the event loop.

use std::time::Duration;

pub const NANOS_PER_SEC: u64 = 1_000_000_000;

/// Pipeline state of the media backend.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum BackendState {
    /// Nothing loaded or fully reset; the source is flushed.
    #[default]
    Stopped,
    Paused,
    Playing,
}

/// Asynchronous notifications from the backend.
///
/// These are posted onto the event loop's channel and handled like any
/// other event; the backend never calls into the player directly.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendEvent {
    /// The current source played to its end.
    EndOfStream,
    /// Playback failed. `debug` carries detail for the log only.
    Error {
        message: String,
        debug: Option<String>,
    },
    /// A state change requested earlier has completed.
    AsyncDone,
    /// The duration of the current source became known or changed.
    DurationChanged,
    /// Tags were read from the current source.
    TagUpdated { title: Option<String> },
}

/// A [`BackendEvent`] tagged with the serial of the source it concerns.
///
/// The serial is the one [`MediaBackend::source_serial`] reported right
/// after the matching `set_source`; events for older sources are stale.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceEvent {
    pub serial: u64,
    pub event: BackendEvent,
}

/// The opaque media engine.
///
/// Commands are fire-and-forget; queries are synchronous but must not
/// block. Times are in nanoseconds.
pub trait MediaBackend {
    fn set_source(&mut self, uri: &str);
    /// Serial of the latest `set_source`, `0` before the first one.
    fn source_serial(&self) -> u64;
    fn set_state(&mut self, state: BackendState);
    fn state(&self) -> BackendState;
    fn set_volume(&mut self, volume: f64);
    /// `None` while the duration is not known yet.
    fn query_duration(&self) -> Option<u64>;
    fn query_position(&self) -> Option<u64>;
    fn seek(&mut self, flushing: bool, position_ns: u64);
}

impl<B: MediaBackend + ?Sized> MediaBackend for Box<B> {
    fn set_source(&mut self, uri: &str) {
        (**self).set_source(uri)
    }
    fn source_serial(&self) -> u64 {
        (**self).source_serial()
    }
    fn set_state(&mut self, state: BackendState) {
        (**self).set_state(state)
    }
    fn state(&self) -> BackendState {
        (**self).state()
    }
    fn set_volume(&mut self, volume: f64) {
        (**self).set_volume(volume)
    }
    fn query_duration(&self) -> Option<u64> {
        (**self).query_duration()
    }
    fn query_position(&self) -> Option<u64> {
        (**self).query_position()
    }
    fn seek(&mut self, flushing: bool, position_ns: u64) {
        (**self).seek(flushing, position_ns)
    }
}

pub fn nanos_to_secs(ns: u64) -> f64 {
    ns as f64 / NANOS_PER_SEC as f64
}

pub fn secs_to_nanos(secs: f64) -> u64 {
    (secs.max(0.0) * NANOS_PER_SEC as f64).round() as u64
}

pub fn duration_to_nanos(d: Duration) -> u64 {
    d.as_nanos().min(u64::MAX as u128) as u64
}
