/*! Integration tests for DealsDive.
 *
 * This test suite is organized as a single integration test binary
 * following the pattern described by matklad in
 * https://matklad.github.io/2021/02/27/delete-cargo-integration-tests.html
 *
 * The module structure mirrors the main library structure:
 * - marketplace: Loading mock data and browsing the catalog through search
 * - conversation: Messaging with simulated replies, on both schedulers
 * - flow: Walking negotiate → agreement → payment through routes and sessions
 * - config: Loading settings from disk and applying them to the flows
 */

use tracing_subscriber::EnvFilter;

#[ctor::ctor]
fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("dealsdive=info".parse().unwrap()),
        )
        .with_test_writer()
        .try_init();
}

mod config;
mod conversation;
mod flow;
mod helpers;
mod marketplace;
