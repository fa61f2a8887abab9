//! Client script
//!
//! A [`ClientScript`] binds one peer role to a pluggable record of event
//! handlers and owns everything the script needs across callbacks: the
//! deferred task queue, the completion flag, the last self-status memory,
//! and the first recorded assertion failure.
//!
//! Scenarios supply concrete closures per event kind rather than
//! subclassing; the handlers receive a [`ScriptCtx`] exposing `go` and
//! `finish` so they can advance the script without touching the engine
//! re-entrantly.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use presence_core::{
    EngineError, FriendIndex, PeerRole, PresenceClient, PresenceEvents, PresenceStatus,
    ScriptError, SelfStatus,
};
use tracing::debug;

// ----------------------------------------------------------------------------
// Script Context
// ----------------------------------------------------------------------------

/// State a scripted handler may read and advance.
pub struct ScriptCtx {
    role: PeerRole,
    last_self_status: SelfStatus,
    queue: crate::TaskQueue,
    done: Arc<AtomicBool>,
}

impl ScriptCtx {
    fn new(role: PeerRole) -> Self {
        Self {
            role,
            last_self_status: SelfStatus::Unset,
            queue: crate::TaskQueue::new(),
            done: Arc::new(AtomicBool::new(false)),
        }
    }

    /// The role this script is running as.
    pub fn role(&self) -> PeerRole {
        self.role
    }

    /// The last presence value this script set for itself, if any.
    pub fn last_self_status(&self) -> SelfStatus {
        self.last_self_status
    }

    /// Record `status` as the script's own presence and enqueue the engine
    /// mutation as a deferred task, so it executes on the owning peer's
    /// next tick rather than inline inside the callback.
    pub fn go(&mut self, status: PresenceStatus) {
        debug!(role = %self.role, %status, "script advancing self status");
        self.last_self_status = SelfStatus::Set(status);
        self.queue
            .enqueue(Box::new(move |client| client.set_self_status(status)));
    }

    /// Mark the script complete. Idempotent: the completion flag only ever
    /// transitions false to true.
    pub fn finish(&mut self) {
        debug!(role = %self.role, "script finished");
        self.done.store(true, Ordering::Release);
    }

    /// Whether the script has finished.
    pub fn is_finished(&self) -> bool {
        self.done.load(Ordering::Acquire)
    }
}

// ----------------------------------------------------------------------------
// Handler Record
// ----------------------------------------------------------------------------

/// Handler for connectivity-changed events.
pub type ConnectivityHandler =
    Box<dyn FnMut(&mut ScriptCtx, FriendIndex, bool) -> Result<(), ScriptError> + Send>;

/// Handler for presence-changed events.
pub type PresenceHandler =
    Box<dyn FnMut(&mut ScriptCtx, FriendIndex, PresenceStatus) -> Result<(), ScriptError> + Send>;

/// One closure per event kind, supplied by the scenario under test.
pub struct ScriptHandlers {
    pub on_connectivity_changed: ConnectivityHandler,
    pub on_presence_changed: PresenceHandler,
}

impl ScriptHandlers {
    /// Handlers that accept every event without asserting anything.
    pub fn ignore_all() -> Self {
        Self {
            on_connectivity_changed: Box::new(|_, _, _| Ok(())),
            on_presence_changed: Box::new(|_, _, _| Ok(())),
        }
    }
}

// ----------------------------------------------------------------------------
// Client Script
// ----------------------------------------------------------------------------

/// Stateful callback handler bound to one peer role.
///
/// Implements [`PresenceEvents`] so the engine's `iterate` dispatches
/// directly into the scripted handlers. The first handler error is recorded
/// and all further events are ignored; the peer runner picks the failure up
/// at the loop boundary. Events arriving after `finish` are ignored as well.
pub struct ClientScript {
    ctx: ScriptCtx,
    handlers: ScriptHandlers,
    failure: Option<ScriptError>,
}

impl ClientScript {
    /// Create a script for `role` with the given scenario handlers.
    pub fn new(role: PeerRole, handlers: ScriptHandlers) -> Self {
        Self {
            ctx: ScriptCtx::new(role),
            handlers,
            failure: None,
        }
    }

    /// The role this script is running as.
    pub fn role(&self) -> PeerRole {
        self.ctx.role
    }

    /// A clone of the completion flag, for observation from another thread.
    /// The flag is stored with release ordering and must be read with
    /// acquire ordering.
    pub fn completion_flag(&self) -> Arc<AtomicBool> {
        self.ctx.done.clone()
    }

    /// Whether the script has finished.
    pub fn is_finished(&self) -> bool {
        self.ctx.is_finished()
    }

    /// Take the first recorded assertion failure, if any.
    pub fn take_failure(&mut self) -> Option<ScriptError> {
        self.failure.take()
    }

    /// Drain and execute the deferred tasks queued by earlier callbacks.
    /// Called once per tick by the peer runner, before the next `iterate`.
    pub fn drain_tasks(&mut self, client: &mut dyn PresenceClient) -> Result<(), EngineError> {
        self.ctx.queue.drain_and_run(client)
    }

    fn accepting_events(&self) -> bool {
        self.failure.is_none() && !self.ctx.is_finished()
    }
}

impl PresenceEvents for ClientScript {
    fn on_friend_added(&mut self, friend: FriendIndex) {
        // Friendship bootstrap is a precondition, not a scripted step.
        debug!(role = %self.ctx.role, %friend, "friend added");
    }

    fn on_connectivity_changed(&mut self, friend: FriendIndex, connected: bool) {
        if !self.accepting_events() {
            return;
        }
        debug!(role = %self.ctx.role, %friend, connected, "connectivity changed");
        if let Err(error) = (self.handlers.on_connectivity_changed)(&mut self.ctx, friend, connected)
        {
            self.failure = Some(error);
        }
    }

    fn on_presence_changed(&mut self, friend: FriendIndex, status: PresenceStatus) {
        if !self.accepting_events() {
            return;
        }
        debug!(role = %self.ctx.role, %friend, %status, "presence changed");
        if let Err(error) = (self.handlers.on_presence_changed)(&mut self.ctx, friend, status) {
            self.failure = Some(error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::Ordering;

    fn counting_handlers(seen: Arc<AtomicBool>) -> ScriptHandlers {
        ScriptHandlers {
            on_connectivity_changed: Box::new(|_, _, _| Ok(())),
            on_presence_changed: Box::new(move |_, _, _| {
                seen.store(true, Ordering::SeqCst);
                Ok(())
            }),
        }
    }

    #[test]
    fn finish_is_idempotent() {
        let mut script = ClientScript::new(PeerRole::Alice, ScriptHandlers::ignore_all());
        script.ctx.finish();
        assert!(script.is_finished());
        script.ctx.finish();
        assert!(script.is_finished());
    }

    #[test]
    fn go_records_status_and_defers_the_mutation() {
        let mut script = ClientScript::new(PeerRole::Alice, ScriptHandlers::ignore_all());
        script.ctx.go(PresenceStatus::Away);
        assert_eq!(
            script.ctx.last_self_status(),
            SelfStatus::Set(PresenceStatus::Away)
        );
        // The mutation waits on the queue for the next tick.
        assert_eq!(script.ctx.queue.len(), 1);
    }

    #[test]
    fn events_after_finish_are_ignored() {
        let seen = Arc::new(AtomicBool::new(false));
        let mut script = ClientScript::new(PeerRole::Bob, counting_handlers(seen.clone()));
        script.ctx.finish();
        script.on_presence_changed(FriendIndex::new(0), PresenceStatus::Busy);
        assert!(!seen.load(Ordering::SeqCst));
    }

    #[test]
    fn first_failure_sticks_and_silences_later_events() {
        let handlers = ScriptHandlers {
            on_connectivity_changed: Box::new(|_, _, _| Ok(())),
            on_presence_changed: Box::new(|_, _, actual| {
                Err(ScriptError::UnexpectedPresence {
                    expected: PresenceStatus::None,
                    actual,
                })
            }),
        };
        let mut script = ClientScript::new(PeerRole::Alice, handlers);
        script.on_presence_changed(FriendIndex::new(0), PresenceStatus::Away);
        script.on_presence_changed(FriendIndex::new(0), PresenceStatus::Busy);

        match script.take_failure() {
            Some(ScriptError::UnexpectedPresence { actual, .. }) => {
                // Only the first divergence is recorded.
                assert_eq!(actual, PresenceStatus::Away);
            }
            other => panic!("expected presence violation, got {other:?}"),
        }
        assert!(script.take_failure().is_none());
    }
}
