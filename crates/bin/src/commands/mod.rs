//! Subcommand implementations.

pub mod agreement;
pub mod chat;
pub mod contacts;
pub mod open;
pub mod search;

use std::sync::Arc;

use dealsdive::{
    Marketplace, Settings, SystemClock,
    flow::FlowController,
    scheduler::TokioScheduler,
};
use tokio::runtime::Handle;

/// Flow controller over the bundled marketplace, on wall-clock time.
///
/// Timed steps run on the command's tokio runtime.
pub fn flow(settings: Settings) -> dealsdive::Result<FlowController> {
    let clock = Arc::new(SystemClock);
    let marketplace = Arc::new(Marketplace::with_fixtures(clock.as_ref())?);
    let scheduler = Arc::new(TokioScheduler::new(Handle::current()));
    Ok(FlowController::new(marketplace, clock, scheduler, settings))
}
