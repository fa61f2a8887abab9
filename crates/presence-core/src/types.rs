//! Core types for the presence protocol harness
//!
//! This module defines the fundamental types used throughout the harness,
//! using newtype patterns for semantic validation and type safety.

use core::fmt;
use serde::{Deserialize, Serialize};

// ----------------------------------------------------------------------------
// Presence Status
// ----------------------------------------------------------------------------

/// A peer's self-reported availability.
///
/// The set is closed and carries no ordering semantics; transitions are
/// driven by scripts, not by the protocol engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PresenceStatus {
    /// Available (the initial status of every peer).
    None,
    /// Away from keyboard.
    Away,
    /// Do not disturb.
    Busy,
}

impl fmt::Display for PresenceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PresenceStatus::None => write!(f, "none"),
            PresenceStatus::Away => write!(f, "away"),
            PresenceStatus::Busy => write!(f, "busy"),
        }
    }
}

// ----------------------------------------------------------------------------
// Peer Role
// ----------------------------------------------------------------------------

/// Identifies which script instance is running.
///
/// Used only to select branch logic in scenario assertions; the role is not
/// part of the wire protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PeerRole {
    Alice,
    Bob,
}

impl fmt::Display for PeerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeerRole::Alice => write!(f, "alice"),
            PeerRole::Bob => write!(f, "bob"),
        }
    }
}

// ----------------------------------------------------------------------------
// Friend Index
// ----------------------------------------------------------------------------

/// Handle identifying a remote peer within one local client's friend list.
///
/// Assigned by the external protocol engine when the friend relationship is
/// established and stable for its lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FriendIndex(u32);

impl FriendIndex {
    /// Create a new friend index.
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Get the raw index value.
    pub fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for FriendIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ----------------------------------------------------------------------------
// Self Status Memory
// ----------------------------------------------------------------------------

/// The last presence value a script set for itself, if any.
///
/// Scripts use this to disambiguate the asymmetric handshake: a `None`
/// observed while still `Unset` is the handshake-time snapshot, not a
/// reaction to anything the script did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelfStatus {
    /// The script has not yet set its own status.
    Unset,
    /// The script last set its own status to this value.
    Set(PresenceStatus),
}

impl SelfStatus {
    /// Whether the script has not yet set its own status.
    pub fn is_unset(self) -> bool {
        matches!(self, SelfStatus::Unset)
    }
}

impl fmt::Display for SelfStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelfStatus::Unset => write!(f, "unset"),
            SelfStatus::Set(status) => write!(f, "set({status})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presence_status_identity_comparison() {
        assert_eq!(PresenceStatus::Away, PresenceStatus::Away);
        assert_ne!(PresenceStatus::Away, PresenceStatus::Busy);
    }

    #[test]
    fn friend_index_round_trip() {
        let index = FriendIndex::new(7);
        assert_eq!(index.value(), 7);
        assert_eq!(index.to_string(), "7");
    }

    #[test]
    fn self_status_display() {
        assert_eq!(SelfStatus::Unset.to_string(), "unset");
        assert_eq!(
            SelfStatus::Set(PresenceStatus::Busy).to_string(),
            "set(busy)"
        );
        assert!(SelfStatus::Unset.is_unset());
        assert!(!SelfStatus::Set(PresenceStatus::None).is_unset());
    }
}
