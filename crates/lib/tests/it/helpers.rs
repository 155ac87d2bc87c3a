use std::sync::Arc;

use dealsdive::{
    FixedClock, Marketplace, Settings,
    conversation::{EchoReplies, ReplyStrategy},
    flow::FlowController,
    scheduler::ManualScheduler,
};

/// A marketplace on virtual time: the clock only moves when the scheduler
/// is advanced.
pub struct TestContext {
    pub clock: Arc<FixedClock>,
    pub scheduler: Arc<ManualScheduler>,
    pub marketplace: Arc<Marketplace>,
}

impl TestContext {
    pub fn new() -> Self {
        let clock = Arc::new(FixedClock::default());
        let scheduler = Arc::new(ManualScheduler::with_clock(Arc::clone(&clock)));
        let marketplace =
            Arc::new(Marketplace::with_fixtures(clock.as_ref()).expect("bundled fixtures load"));
        Self {
            clock,
            scheduler,
            marketplace,
        }
    }

    /// Flow controller with echo replies and the given settings.
    pub fn flow_with(&self, settings: Settings) -> FlowController {
        FlowController::with_replies(
            Arc::clone(&self.marketplace),
            self.clock.clone(),
            self.scheduler.clone(),
            echo(),
            settings,
        )
    }

    /// Flow controller with echo replies and default timings.
    pub fn flow(&self) -> FlowController {
        self.flow_with(Settings::default())
    }
}

pub fn echo() -> Arc<dyn ReplyStrategy> {
    Arc::new(EchoReplies::new())
}
