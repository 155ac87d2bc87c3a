//! Delayed tasks standing in for network latency.
//!
//! Every simulated round-trip (counterparty reply, agreement
//! acknowledgement, payment processing) is scheduled through a
//! [`Scheduler`]. Scheduling returns a [`TaskHandle`]; owners keep their
//! handles and cancel them when the view that started them closes.
//!
//! Two implementations are provided:
//!
//! * [`ManualScheduler`] keeps a virtual timeline that only moves when
//!   [`ManualScheduler::advance`] is called. Tests use it.
//! * [`TokioScheduler`] sleeps on a tokio runtime.

mod manual;
mod runtime;

use std::fmt::Debug;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

pub use manual::ManualScheduler;
pub use runtime::TokioScheduler;

/// Work to run once the delay elapses.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Runs tasks after a delay.
pub trait Scheduler: Send + Sync + Debug {
    /// Run `task` once `delay` has elapsed, unless the returned handle is
    /// cancelled first.
    fn schedule(&self, delay: Duration, task: Task) -> TaskHandle;
}

static NEXT_TASK_ID: AtomicU64 = AtomicU64::new(1);

/// Cancellation handle for a scheduled task.
///
/// Clones share state; cancelling any clone cancels the task.
#[derive(Debug, Clone)]
pub struct TaskHandle {
    id: u64,
    state: Arc<HandleState>,
}

#[derive(Debug, Default)]
struct HandleState {
    cancelled: AtomicBool,
    finished: AtomicBool,
}

impl TaskHandle {
    pub(crate) fn new() -> Self {
        Self {
            id: NEXT_TASK_ID.fetch_add(1, Ordering::Relaxed),
            state: Arc::new(HandleState::default()),
        }
    }

    /// Unique identifier of the scheduled task.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Prevent the task from running. No effect once it has run.
    pub fn cancel(&self) {
        if !self.is_finished() {
            self.state.cancelled.store(true, Ordering::SeqCst);
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.state.cancelled.load(Ordering::SeqCst)
    }

    /// Whether the task has run to completion.
    pub fn is_finished(&self) -> bool {
        self.state.finished.load(Ordering::SeqCst)
    }

    /// Neither run nor cancelled yet.
    pub fn is_pending(&self) -> bool {
        !self.is_cancelled() && !self.is_finished()
    }

    /// Run the task unless cancelled, then mark the handle finished.
    pub(crate) fn run(&self, task: Task) -> bool {
        if self.is_cancelled() {
            tracing::trace!(task = self.id, "Skipping cancelled task");
            return false;
        }
        task();
        self.state.finished.store(true, Ordering::SeqCst);
        true
    }
}
