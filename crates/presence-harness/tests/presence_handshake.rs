//! End-to-end run of the presence handshake scenario over loopback engines.
//!
//! Two peers, each on its own tokio task, walk the literal scripted
//! exchange None → Away → Busy → None through an in-memory engine pair.

use std::time::Duration;

use presence_core::ScenarioConfig;
use presence_harness::scenarios::presence_handshake;
use presence_harness::{loopback_pair, Orchestrator};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[tokio::test]
async fn handshake_completes_on_both_sides() {
    init_tracing();

    let (alice_engine, bob_engine) = loopback_pair();
    let orchestrator = Orchestrator::new(ScenarioConfig::quick());

    let result = orchestrator
        .run(
            alice_engine,
            bob_engine,
            presence_handshake(),
            presence_handshake(),
        )
        .await;

    assert!(result.is_ok(), "scenario failed: {:?}", result.err());
}

#[tokio::test]
async fn handshake_converges_well_under_the_timeout() {
    init_tracing();

    // A handful of 10ms ticks should be enough for the four-step exchange;
    // anything close to the timeout means the loops are not making progress.
    let (alice_engine, bob_engine) = loopback_pair();
    let orchestrator = Orchestrator::new(ScenarioConfig::quick());

    let started = std::time::Instant::now();
    let result = orchestrator
        .run(
            alice_engine,
            bob_engine,
            presence_handshake(),
            presence_handshake(),
        )
        .await;
    let elapsed = started.elapsed();

    assert!(result.is_ok(), "scenario failed: {:?}", result.err());
    assert!(
        elapsed < Duration::from_secs(2),
        "handshake took {elapsed:?}"
    );
}
