use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::{Scheduler, Task, TaskHandle};
use crate::clock::FixedClock;

/// Scheduler driven by an explicit virtual timeline.
///
/// Nothing runs until [`advance`](Self::advance) moves time forward. Tasks
/// due within the advanced window run in due order (ties in scheduling
/// order), and may schedule further tasks which run in the same call if
/// they also fall inside the window. When built with a [`FixedClock`] the
/// clock is moved to each task's due time before the task runs, so
/// timestamps taken inside a task match the virtual timeline.
pub struct ManualScheduler {
    clock: Option<Arc<FixedClock>>,
    state: Mutex<ManualState>,
}

#[derive(Default)]
struct ManualState {
    elapsed: Duration,
    seq: u64,
    queue: Vec<Scheduled>,
}

struct Scheduled {
    due: Duration,
    seq: u64,
    handle: TaskHandle,
    task: Task,
}

impl ManualScheduler {
    /// A scheduler with its own timeline and no clock attached.
    pub fn new() -> Self {
        Self {
            clock: None,
            state: Mutex::new(ManualState::default()),
        }
    }

    /// A scheduler that moves `clock` along with its timeline.
    pub fn with_clock(clock: Arc<FixedClock>) -> Self {
        Self {
            clock: Some(clock),
            state: Mutex::new(ManualState::default()),
        }
    }

    /// Virtual time elapsed since creation.
    pub fn elapsed(&self) -> Duration {
        self.lock().elapsed
    }

    /// Number of tasks still waiting to run.
    pub fn pending(&self) -> usize {
        self.lock()
            .queue
            .iter()
            .filter(|s| s.handle.is_pending())
            .count()
    }

    /// Move time forward by `by`, running every task that falls due.
    ///
    /// Returns the number of tasks that ran.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.elapsed() + by;
        let mut ran = 0;

        while let Some((step, scheduled)) = self.pop_due(target) {
            self.move_clock(step);
            if scheduled.handle.run(scheduled.task) {
                ran += 1;
            }
        }

        let step = {
            let mut state = self.lock();
            let step = target.saturating_sub(state.elapsed);
            state.elapsed = target;
            step
        };
        self.move_clock(step);
        ran
    }

    /// Keep advancing to the next due task until nothing is queued.
    pub fn run_until_idle(&self) -> usize {
        let mut ran = 0;
        loop {
            let next = {
                let state = self.lock();
                state
                    .queue
                    .iter()
                    .map(|s| s.due)
                    .min()
                    .map(|due| due.saturating_sub(state.elapsed))
            };
            match next {
                Some(wait) => ran += self.advance(wait),
                None => return ran,
            }
        }
    }

    fn pop_due(&self, target: Duration) -> Option<(Duration, Scheduled)> {
        let mut state = self.lock();
        let pos = state
            .queue
            .iter()
            .enumerate()
            .filter(|(_, s)| s.due <= target)
            .min_by_key(|(_, s)| (s.due, s.seq))
            .map(|(pos, _)| pos)?;
        let scheduled = state.queue.remove(pos);
        let step = scheduled.due.saturating_sub(state.elapsed);
        state.elapsed = state.elapsed.max(scheduled.due);
        Some((step, scheduled))
    }

    fn move_clock(&self, step: Duration) {
        if let Some(clock) = &self.clock {
            if !step.is_zero() {
                clock.advance(step);
            }
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ManualState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for ManualScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, task: Task) -> TaskHandle {
        let handle = TaskHandle::new();
        let mut state = self.lock();
        state.seq += 1;
        let scheduled = Scheduled {
            due: state.elapsed + delay,
            seq: state.seq,
            handle: handle.clone(),
            task,
        };
        tracing::trace!(task = handle.id(), ?delay, "Task scheduled");
        state.queue.push(scheduled);
        handle
    }
}

impl std::fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("ManualScheduler")
            .field("elapsed", &state.elapsed)
            .field("queued", &state.queue.len())
            .finish()
    }
}
