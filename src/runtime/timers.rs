//! Timer wheel for the tasks the session schedules.
//!
//! Idle tasks run on the next pass before any timeout. A task answering
//! [`TimerFlow::Continue`] is re-armed with the same interval.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::tasks::{Scheduled, Task, TimerFlow};

#[derive(Debug)]
struct Timeout {
    task: Task,
    interval: Duration,
    due: Instant,
}

#[derive(Debug, Default)]
pub struct Timers {
    idle: VecDeque<Task>,
    timeouts: Vec<Timeout>,
}

impl Timers {
    pub fn schedule(&mut self, scheduled: Scheduled, now: Instant) {
        match scheduled.delay {
            None => self.idle.push_back(scheduled.task),
            Some(interval) => self.timeouts.push(Timeout {
                task: scheduled.task,
                interval,
                due: now + interval,
            }),
        }
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.idle.is_empty() && self.timeouts.is_empty()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.idle.len() + self.timeouts.len()
    }

    /// Run idle tasks, then every timeout due at `now`, in due order.
    pub fn run_due(&mut self, now: Instant, mut run: impl FnMut(Task) -> TimerFlow) {
        for task in std::mem::take(&mut self.idle) {
            if run(task.clone()) == TimerFlow::Continue {
                self.idle.push_back(task);
            }
        }

        let (mut due, pending): (Vec<Timeout>, Vec<Timeout>) =
            std::mem::take(&mut self.timeouts)
                .into_iter()
                .partition(|t| t.due <= now);
        self.timeouts = pending;
        due.sort_by_key(|t| t.due);

        for mut timeout in due {
            if run(timeout.task.clone()) == TimerFlow::Continue {
                timeout.due = now + timeout.interval;
                self.timeouts.push(timeout);
            }
        }
    }
}
