//! Loopback engine
//!
//! A deterministic in-memory implementation of the client capability for
//! conformance tests, standing in for a real protocol engine. Two engines
//! created as a pair are friends of each other from the start: each inbox
//! is seeded with the friend-added, connectivity, and initial presence
//! snapshot events a real engine delivers once the handshake completes.
//!
//! Delivery is eventual, not synchronous: `set_self_status` pushes an event
//! into the peer's inbox, and the peer observes it on its own next
//! `iterate`, mirroring the timing guarantees the harness is specified
//! against.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use presence_core::{
    EngineError, EngineEvent, FriendIndex, PresenceClient, PresenceEvents, PresenceStatus,
};

type Inbox = Arc<Mutex<VecDeque<EngineEvent>>>;

/// The single friend index a loopback pair knows about.
const LOOPBACK_FRIEND: FriendIndex = FriendIndex::new(0);

/// In-memory protocol client wired to at most one counterpart.
pub struct LoopbackEngine {
    self_status: PresenceStatus,
    interval: Duration,
    inbox: Inbox,
    /// `None` for a disconnected engine: status changes go nowhere.
    peer_inbox: Option<Inbox>,
    fail_next_set_status: bool,
}

/// Create two engines that are friends of each other, each seeded with the
/// handshake-time events: friend added, connected, and the counterpart's
/// initial `None` presence snapshot.
pub fn loopback_pair() -> (LoopbackEngine, LoopbackEngine) {
    let first: Inbox = Arc::new(Mutex::new(seed_events()));
    let second: Inbox = Arc::new(Mutex::new(seed_events()));
    (
        LoopbackEngine::wired(first.clone(), Some(second.clone())),
        LoopbackEngine::wired(second, Some(first)),
    )
}

fn seed_events() -> VecDeque<EngineEvent> {
    VecDeque::from([
        EngineEvent::FriendAdded {
            friend: LOOPBACK_FRIEND,
        },
        EngineEvent::ConnectivityChanged {
            friend: LOOPBACK_FRIEND,
            connected: true,
        },
        EngineEvent::PresenceChanged {
            friend: LOOPBACK_FRIEND,
            status: PresenceStatus::None,
        },
    ])
}

impl LoopbackEngine {
    fn wired(inbox: Inbox, peer_inbox: Option<Inbox>) -> Self {
        Self {
            self_status: PresenceStatus::None,
            interval: Duration::from_millis(10),
            inbox,
            peer_inbox,
            fail_next_set_status: false,
        }
    }

    /// An engine that never delivers any event and drops status changes.
    /// Peers driven by it can only ever time out.
    pub fn silent() -> Self {
        Self::wired(Arc::new(Mutex::new(VecDeque::new())), None)
    }

    /// Override the advisory iteration interval.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Queue an arbitrary event for delivery on this engine's next
    /// `iterate`, ahead of anything a counterpart sends later. Lets tests
    /// exercise deliveries a well-behaved counterpart would never produce.
    pub fn inject_event(&self, event: EngineEvent) {
        self.inbox
            .lock()
            .expect("loopback inbox poisoned")
            .push_back(event);
    }

    /// Make the next `set_self_status` call report an engine fault.
    pub fn fail_next_set_status(&mut self) {
        self.fail_next_set_status = true;
    }

    /// The status this engine last accepted for itself.
    pub fn self_status(&self) -> PresenceStatus {
        self.self_status
    }
}

impl PresenceClient for LoopbackEngine {
    fn iterate(&mut self, events: &mut dyn PresenceEvents) -> Result<(), EngineError> {
        let batch: Vec<EngineEvent> = {
            let mut inbox = self.inbox.lock().map_err(|_| EngineError::IterationFailed {
                reason: "event inbox poisoned".to_string(),
            })?;
            inbox.drain(..).collect()
        };
        for event in batch {
            event.dispatch(events);
        }
        Ok(())
    }

    fn iteration_interval(&self) -> Duration {
        self.interval
    }

    fn set_self_status(&mut self, status: PresenceStatus) -> Result<(), EngineError> {
        if self.fail_next_set_status {
            self.fail_next_set_status = false;
            return Err(EngineError::StatusChangeRejected {
                status,
                reason: "injected fault".to_string(),
            });
        }
        self.self_status = status;
        if let Some(peer_inbox) = &self.peer_inbox {
            peer_inbox
                .lock()
                .map_err(|_| EngineError::StatusChangeRejected {
                    status,
                    reason: "peer inbox poisoned".to_string(),
                })?
                .push_back(EngineEvent::PresenceChanged {
                    friend: LOOPBACK_FRIEND,
                    status,
                });
        }
        Ok(())
    }
}
