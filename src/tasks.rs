//! Deferred work the core asks the event loop to run later.
//!
//! Handlers never sleep or spawn; they queue a [`Task`] here and the loop
//! runs it when it is due. Timer tasks answer with a [`TimerFlow`] to say
//! whether they want to run again.

use std::time::Duration;

/// Retry interval for the duration query after a track load.
pub const DURATION_POLL_INTERVAL: Duration = Duration::from_millis(100);
/// Cadence of the position refresh.
pub const POSITION_TICK_INTERVAL: Duration = Duration::from_millis(200);

/// Whether a timer callback wants to be rescheduled.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TimerFlow {
    Continue,
    Break,
}

/// A duration query scoped to one track load.
///
/// Carries the load generation it was issued for so a poll that outlives
/// its load is discarded instead of applied to the next track.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DurationPoll {
    pub generation: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Task {
    /// Activate a playlist index (autoplay).
    Activate(usize),
    PollDuration(DurationPoll),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scheduled {
    pub task: Task,
    /// `None` runs on the next idle pass.
    pub delay: Option<Duration>,
}

/// Tasks queued since the loop last collected them.
#[derive(Debug, Default)]
pub struct Tasks {
    queue: Vec<Scheduled>,
}

impl Tasks {
    pub fn idle(&mut self, task: Task) {
        self.queue.push(Scheduled { task, delay: None });
    }

    pub fn after(&mut self, delay: Duration, task: Task) {
        self.queue.push(Scheduled {
            task,
            delay: Some(delay),
        });
    }

    pub fn drain(&mut self) -> Vec<Scheduled> {
        std::mem::take(&mut self.queue)
    }

    #[cfg(test)]
    pub fn pending(&self) -> &[Scheduled] {
        &self.queue
    }
}
