//! Dual-peer orchestrator
//!
//! Constructs the Alice and Bob scripts, binds them to two client
//! capability instances that are peers of each other, starts both peer
//! runners on independent tokio tasks, and waits for mutual completion
//! under the scenario timeout. The first failure observed on either side
//! cancels the surviving peer and becomes the scenario outcome.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{timeout, Duration, Instant};
use tracing::{info, warn};

use presence_core::{PeerFailure, PeerRole, PresenceClient, ScenarioConfig};

use crate::runner::PeerRunner;
use crate::script::{ClientScript, ScriptHandlers};

/// Backstop past the runners' own deadline, for an engine whose `iterate`
/// wedges and never returns to the loop.
const JOIN_GRACE: Duration = Duration::from_millis(250);

/// Runs one complete scripted exchange between two peers.
pub struct Orchestrator {
    config: ScenarioConfig,
}

impl Orchestrator {
    /// Create an orchestrator with an explicit configuration.
    pub fn new(config: ScenarioConfig) -> Self {
        Self { config }
    }

    /// Run a scenario: both scripts against their respective clients.
    ///
    /// The two clients must already be friends of each other; relationship
    /// bootstrap is the engine's responsibility and a precondition here.
    /// Returns `Ok(())` iff both scripts reached `finish` with no assertion
    /// failures; otherwise the first failure, carrying its role and cause.
    pub async fn run<A, B>(
        &self,
        alice_client: A,
        bob_client: B,
        alice_handlers: ScriptHandlers,
        bob_handlers: ScriptHandlers,
    ) -> Result<(), PeerFailure>
    where
        A: PresenceClient + 'static,
        B: PresenceClient + 'static,
    {
        let alice_script = ClientScript::new(PeerRole::Alice, alice_handlers);
        let bob_script = ClientScript::new(PeerRole::Bob, bob_handlers);
        let alice_done = alice_script.completion_flag();
        let bob_done = bob_script.completion_flag();

        let (cancel_tx, cancel_rx) = watch::channel(false);
        let deadline = Instant::now() + self.config.timeout;

        info!(timeout = ?self.config.timeout, "starting dual-peer scenario");
        let mut alice = tokio::spawn(
            PeerRunner::new(alice_client, alice_script, cancel_rx.clone()).run(deadline),
        );
        let mut bob =
            tokio::spawn(PeerRunner::new(bob_client, bob_script, cancel_rx).run(deadline));

        let supervise = Self::supervise(&mut alice, &mut bob, &cancel_tx);
        let outcome = match timeout(self.config.timeout + JOIN_GRACE, supervise).await {
            Ok(first_failure) => first_failure,
            Err(_elapsed) => {
                // Neither runner returned in time; tear both down and
                // attribute the timeout to the first peer still unfinished.
                let _ = cancel_tx.send(true);
                alice.abort();
                bob.abort();
                let role = if !alice_done.load(Ordering::Acquire) {
                    PeerRole::Alice
                } else {
                    PeerRole::Bob
                };
                Some(PeerFailure::Timeout { role })
            }
        };

        match outcome {
            None => {
                debug_assert!(Self::finished(&alice_done) && Self::finished(&bob_done));
                info!("scenario passed, both scripts finished");
                Ok(())
            }
            Some(failure) => {
                warn!(role = %failure.role(), error = %failure, "scenario failed");
                Err(failure)
            }
        }
    }

    /// Wait for both runner tasks, cancelling the survivor as soon as one
    /// fails. Returns the first failure observed, if any.
    async fn supervise(
        alice: &mut JoinHandle<Result<(), PeerFailure>>,
        bob: &mut JoinHandle<Result<(), PeerFailure>>,
        cancel_tx: &watch::Sender<bool>,
    ) -> Option<PeerFailure> {
        let mut first_failure: Option<PeerFailure> = None;
        let mut alice_joined = false;
        let mut bob_joined = false;

        while !(alice_joined && bob_joined) {
            let (role, joined) = tokio::select! {
                joined = &mut *alice, if !alice_joined => {
                    alice_joined = true;
                    (PeerRole::Alice, joined)
                }
                joined = &mut *bob, if !bob_joined => {
                    bob_joined = true;
                    (PeerRole::Bob, joined)
                }
            };

            let failure = match joined {
                Ok(Ok(())) => None,
                Ok(Err(failure)) => Some(failure),
                Err(join_error) => Some(PeerFailure::Aborted {
                    role,
                    reason: join_error.to_string(),
                }),
            };
            if let Some(failure) = failure {
                if first_failure.is_none() {
                    // Stop the other peer within one iteration interval.
                    let _ = cancel_tx.send(true);
                    first_failure = Some(failure);
                }
            }
        }
        first_failure
    }

    fn finished(flag: &Arc<AtomicBool>) -> bool {
        flag.load(Ordering::Acquire)
    }
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self::new(ScenarioConfig::default())
    }
}
