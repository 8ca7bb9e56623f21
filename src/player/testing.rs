//! Recording backend for tests.

use std::cell::RefCell;
use std::rc::Rc;

use crate::backend::{BackendEvent, BackendState, MediaBackend, SourceEvent};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    SetSource(String),
    SetState(BackendState),
    SetVolume(f64),
    Seek { flushing: bool, position_ns: u64 },
}

#[derive(Debug, Default)]
pub struct FakeState {
    pub calls: Vec<Call>,
    pub state: BackendState,
    pub duration: Option<u64>,
    pub position: Option<u64>,
    pub serial: u64,
}

/// Shared view of a [`FakeBackend`] that stays with the test.
#[derive(Debug, Clone, Default)]
pub struct Recorder(Rc<RefCell<FakeState>>);

impl Recorder {
    pub fn calls(&self) -> Vec<Call> {
        self.0.borrow().calls.clone()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().calls.clear();
    }

    pub fn sources(&self) -> Vec<String> {
        self.0
            .borrow()
            .calls
            .iter()
            .filter_map(|c| match c {
                Call::SetSource(uri) => Some(uri.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn last_volume(&self) -> Option<f64> {
        self.0.borrow().calls.iter().rev().find_map(|c| match c {
            Call::SetVolume(v) => Some(*v),
            _ => None,
        })
    }

    pub fn state(&self) -> BackendState {
        self.0.borrow().state
    }

    pub fn set_duration(&self, ns: Option<u64>) {
        self.0.borrow_mut().duration = ns;
    }

    pub fn set_position(&self, ns: Option<u64>) {
        self.0.borrow_mut().position = ns;
    }

    /// Tag `event` as coming from the source loaded last.
    pub fn current(&self, event: BackendEvent) -> SourceEvent {
        SourceEvent {
            serial: self.0.borrow().serial,
            event,
        }
    }

    /// Tag `event` as coming from the source loaded before the last one.
    pub fn previous(&self, event: BackendEvent) -> SourceEvent {
        SourceEvent {
            serial: self.0.borrow().serial.saturating_sub(1),
            event,
        }
    }
}

#[derive(Debug)]
pub struct FakeBackend(Rc<RefCell<FakeState>>);

impl FakeBackend {
    pub fn new() -> (Self, Recorder) {
        let recorder = Recorder::default();
        (Self(recorder.0.clone()), recorder)
    }
}

impl MediaBackend for FakeBackend {
    fn set_source(&mut self, uri: &str) {
        let mut s = self.0.borrow_mut();
        s.calls.push(Call::SetSource(uri.to_string()));
        s.serial += 1;
        // A new source has no known duration until the test says so.
        s.duration = None;
        s.position = Some(0);
    }

    fn source_serial(&self) -> u64 {
        self.0.borrow().serial
    }

    fn set_state(&mut self, state: BackendState) {
        let mut s = self.0.borrow_mut();
        s.calls.push(Call::SetState(state));
        s.state = state;
    }

    fn state(&self) -> BackendState {
        self.0.borrow().state
    }

    fn set_volume(&mut self, volume: f64) {
        self.0.borrow_mut().calls.push(Call::SetVolume(volume));
    }

    fn query_duration(&self) -> Option<u64> {
        self.0.borrow().duration
    }

    fn query_position(&self) -> Option<u64> {
        self.0.borrow().position
    }

    fn seek(&mut self, flushing: bool, position_ns: u64) {
        self.0.borrow_mut().calls.push(Call::Seek {
            flushing,
            position_ns,
        });
    }
}
