//! Peer runner
//!
//! Drives one peer's iterate loop on its own execution context: drain the
//! deferred task queue, call `iterate`, sleep for the engine's advisory
//! interval, repeat — until the script's completion flag is set, the
//! deadline elapses, or the orchestrator cancels the run. The sleep is the
//! only suspension point and it is interruptible, so a failure on the other
//! peer stops this loop within one iteration interval.

use tokio::sync::watch;
use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};

use presence_core::{PeerFailure, PresenceClient};

use crate::script::ClientScript;

/// Drives one peer until completion, failure, deadline, or cancellation.
pub struct PeerRunner<C: PresenceClient> {
    client: C,
    script: ClientScript,
    cancel: watch::Receiver<bool>,
}

impl<C: PresenceClient> PeerRunner<C> {
    /// Bind a client capability to its script and a cancellation signal.
    pub fn new(client: C, script: ClientScript, cancel: watch::Receiver<bool>) -> Self {
        Self {
            client,
            script,
            cancel,
        }
    }

    /// Run the iterate loop until the script finishes or `deadline` passes.
    ///
    /// Cancellation returns `Ok(())`: the orchestrator only cancels once it
    /// already holds the failure it will report. Any script or engine error
    /// terminates the loop immediately, tagged with the peer role.
    pub async fn run(mut self, deadline: Instant) -> Result<(), PeerFailure> {
        let role = self.script.role();
        info!(%role, "peer runner starting");

        loop {
            if *self.cancel.borrow() {
                debug!(%role, "peer runner cancelled");
                return Ok(());
            }
            let now = Instant::now();
            if now >= deadline {
                warn!(%role, "deadline elapsed before the script finished");
                return Err(PeerFailure::Timeout { role });
            }

            self.script
                .drain_tasks(&mut self.client)
                .map_err(|source| PeerFailure::Engine { role, source })?;

            self.client
                .iterate(&mut self.script)
                .map_err(|source| PeerFailure::Engine { role, source })?;

            if let Some(source) = self.script.take_failure() {
                warn!(%role, error = %source, "scripted assertion violated");
                return Err(PeerFailure::Assertion { role, source });
            }
            if self.script.is_finished() {
                // A script may enqueue one last mutation in the same
                // callback that calls finish (Alice's final go(None) does).
                // Flush it so the counterpart still observes the change,
                // then stop without calling iterate again.
                self.script
                    .drain_tasks(&mut self.client)
                    .map_err(|source| PeerFailure::Engine { role, source })?;
                info!(%role, "peer runner done, script finished");
                return Ok(());
            }

            let interval = self.client.iteration_interval().min(deadline - now);
            tokio::select! {
                _ = sleep(interval) => {}
                changed = self.cancel.changed() => {
                    // A closed channel means the orchestrator is gone; stop
                    // either way and let it report whatever it holds.
                    if changed.is_err() || *self.cancel.borrow() {
                        debug!(%role, "peer runner cancelled during sleep");
                        return Ok(());
                    }
                }
            }
        }
    }
}
