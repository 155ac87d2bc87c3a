use std::time::Duration;

use tokio::runtime::Handle;

use super::{Scheduler, Task, TaskHandle};

/// Scheduler that sleeps on a tokio runtime.
///
/// Each scheduled task becomes a spawned future that sleeps for the delay
/// and then runs the task unless its handle was cancelled meanwhile.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    runtime: Handle,
}

impl TokioScheduler {
    pub fn new(runtime: Handle) -> Self {
        Self { runtime }
    }

    /// Scheduler on the runtime of the calling context, if inside one.
    pub fn current() -> Option<Self> {
        Handle::try_current().ok().map(Self::new)
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, task: Task) -> TaskHandle {
        let handle = TaskHandle::new();
        let runner = handle.clone();
        self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            runner.run(task);
        });
        handle
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn runs_after_delay() {
        let scheduler = TokioScheduler::current().expect("inside a runtime");
        let counter = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&counter);
        let handle = scheduler.schedule(
            Duration::from_millis(1500),
            Box::new(move || {
                c.fetch_add(1, Ordering::SeqCst);
            }),
        );

        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 0);
        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert!(handle.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_before_due() {
        let scheduler = TokioScheduler::current().expect("inside a runtime");
        let counter = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&counter);
        let handle = scheduler.schedule(
            Duration::from_millis(1500),
            Box::new(move || {
                c.fetch_add(1, Ordering::SeqCst);
            }),
        );
        handle.cancel();

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 0);
        assert!(handle.is_cancelled());
    }

    #[test]
    fn no_scheduler_outside_a_runtime() {
        assert!(TokioScheduler::current().is_none());
    }
}
