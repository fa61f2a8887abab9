//! Presence handshake scenario
//!
//! Both peers start at presence `None` with their own status unset. The
//! scripted exchange is:
//!
//! 1. Alice sees the initial `None` snapshot and goes away.
//! 2. Bob either sees the initial `None` (ignored) or Alice's `Away`, then
//!    goes busy.
//! 3. Alice, having gone away, sees Bob's `Busy`, returns to `None`, and
//!    finishes.
//! 4. Bob, having gone busy, sees Alice's `None` and finishes.
//!
//! Every delivered event must carry friend index 0; anything else fails
//! the scenario immediately.

use presence_core::{FriendIndex, PeerRole, PresenceStatus, ScriptError, SelfStatus};

use crate::script::ScriptHandlers;

/// The single friend both scripts expect every event to reference.
pub const HANDSHAKE_FRIEND: FriendIndex = FriendIndex::new(0);

/// Handlers for one side of the presence handshake. Both roles share the
/// same record; the branch taken depends on the script's role and its
/// last self-status.
pub fn presence_handshake() -> ScriptHandlers {
    ScriptHandlers {
        on_connectivity_changed: Box::new(|_ctx, friend, _connected| expect_friend(friend)),
        on_presence_changed: Box::new(|ctx, friend, status| {
            expect_friend(friend)?;
            match (ctx.role(), ctx.last_self_status()) {
                (PeerRole::Alice, SelfStatus::Unset) => {
                    // Both start out with None; on connecting, this status
                    // is sent. Alice reacts by going away.
                    expect_status(PresenceStatus::None, status)?;
                    ctx.go(PresenceStatus::Away);
                }
                (PeerRole::Bob, SelfStatus::Unset) => {
                    if status == PresenceStatus::None {
                        // The initial snapshot; nothing to react to yet.
                        return Ok(());
                    }
                    // Not the initial None, so it must be Alice's Away.
                    expect_status(PresenceStatus::Away, status)?;
                    ctx.go(PresenceStatus::Busy);
                }
                (PeerRole::Alice, SelfStatus::Set(PresenceStatus::Away)) => {
                    // Bob received the away notification and went busy.
                    expect_status(PresenceStatus::Busy, status)?;
                    ctx.go(PresenceStatus::None);
                    ctx.finish();
                }
                (PeerRole::Bob, SelfStatus::Set(PresenceStatus::Busy)) => {
                    // Alice went back to None; that's all for Bob.
                    expect_status(PresenceStatus::None, status)?;
                    ctx.finish();
                }
                (_, state) => return Err(ScriptError::UnexpectedState { status, state }),
            }
            Ok(())
        }),
    }
}

fn expect_friend(actual: FriendIndex) -> Result<(), ScriptError> {
    if actual == HANDSHAKE_FRIEND {
        Ok(())
    } else {
        Err(ScriptError::UnexpectedFriend {
            expected: HANDSHAKE_FRIEND,
            actual,
        })
    }
}

fn expect_status(expected: PresenceStatus, actual: PresenceStatus) -> Result<(), ScriptError> {
    if actual == expected {
        Ok(())
    } else {
        Err(ScriptError::UnexpectedPresence { expected, actual })
    }
}
