//! Protocol client capability contract
//!
//! The harness does not implement the peer-to-peer engine; it consumes one
//! through the [`PresenceClient`] trait defined here. The contract mirrors
//! what real engines provide: a non-blocking `iterate` step that dispatches
//! pending events synchronously on the calling thread, an advisory iteration
//! interval, and mutators for local state whose effects reach the connected
//! counterpart eventually rather than synchronously.

use core::time::Duration;

use crate::errors::EngineError;
use crate::types::{FriendIndex, PresenceStatus};

// ----------------------------------------------------------------------------
// Event Surface
// ----------------------------------------------------------------------------

/// Callback surface invoked by [`PresenceClient::iterate`].
///
/// All methods are called synchronously on the thread that called `iterate`,
/// in the order the engine generated the events. Implementations must not
/// mutate the engine re-entrantly from inside a callback; deferred work
/// belongs on the owning peer's task queue instead.
pub trait PresenceEvents {
    /// A friend relationship was established.
    fn on_friend_added(&mut self, friend: FriendIndex);

    /// A friend's connectivity changed.
    fn on_connectivity_changed(&mut self, friend: FriendIndex, connected: bool);

    /// A friend's self-reported presence changed.
    fn on_presence_changed(&mut self, friend: FriendIndex, status: PresenceStatus);
}

/// One engine-generated event, as an explicit value.
///
/// Engines deliver events through [`PresenceEvents`]; this enum exists so
/// in-memory engines and tests can queue, inspect, and inject the same
/// events the callback surface carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineEvent {
    /// A friend relationship was established.
    FriendAdded { friend: FriendIndex },
    /// A friend's connectivity changed.
    ConnectivityChanged { friend: FriendIndex, connected: bool },
    /// A friend's self-reported presence changed.
    PresenceChanged {
        friend: FriendIndex,
        status: PresenceStatus,
    },
}

impl EngineEvent {
    /// Deliver this event to a callback surface.
    pub fn dispatch(self, events: &mut dyn PresenceEvents) {
        match self {
            EngineEvent::FriendAdded { friend } => events.on_friend_added(friend),
            EngineEvent::ConnectivityChanged { friend, connected } => {
                events.on_connectivity_changed(friend, connected)
            }
            EngineEvent::PresenceChanged { friend, status } => {
                events.on_presence_changed(friend, status)
            }
        }
    }
}

// ----------------------------------------------------------------------------
// Client Capability
// ----------------------------------------------------------------------------

/// Capability surface of one protocol client instance.
///
/// Guarantees the harness depends on:
///
/// - `iterate` is non-blocking, safe to call repeatedly on a fixed cadence,
///   and dispatches at most the events the engine actually generated, in
///   generation order, before returning;
/// - callbacks fire on the thread that called `iterate`;
/// - `set_self_status` takes effect eventually, once connectivity to the
///   counterpart is established — delivery is not synchronous with the
///   mutation.
pub trait PresenceClient: Send {
    /// Process one batch of pending protocol events, dispatching zero or
    /// more callbacks before returning.
    fn iterate(&mut self, events: &mut dyn PresenceEvents) -> Result<(), EngineError>;

    /// Advisory sleep duration between `iterate` calls.
    fn iteration_interval(&self) -> Duration;

    /// Mutate the local presence status. The connected counterpart will
    /// eventually observe a presence-changed event for it.
    fn set_self_status(&mut self, status: PresenceStatus) -> Result<(), EngineError>;
}
