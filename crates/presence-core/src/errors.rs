//! Error types for the presence conformance harness
//!
//! This module contains all error types used throughout the workspace:
//! engine faults surfaced by the client capability, scripted assertion
//! violations, and the per-peer failures the orchestrator reports as the
//! scenario outcome.

use crate::types::{FriendIndex, PeerRole, PresenceStatus, SelfStatus};

// ----------------------------------------------------------------------------
// Engine Errors
// ----------------------------------------------------------------------------

/// Internal fault signalled by the external protocol client capability.
///
/// The harness propagates these unchanged — no masking, no retries. The
/// scripted protocol is expected to succeed deterministically given a
/// correctly functioning engine, so any engine fault is a genuine bug
/// signal.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("engine rejected status change to {status}: {reason}")]
    StatusChangeRejected {
        status: PresenceStatus,
        reason: String,
    },
    #[error("engine iteration failed: {reason}")]
    IterationFailed { reason: String },
    #[error("engine shut down: {reason}")]
    Shutdown { reason: String },
}

// ----------------------------------------------------------------------------
// Script Errors
// ----------------------------------------------------------------------------

/// An observed value diverged from the scripted expectation.
///
/// Fatal to the owning peer's loop; surfaced as the scenario's failure
/// cause, never retried.
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("expected presence {expected}, got {actual}")]
    UnexpectedPresence {
        expected: PresenceStatus,
        actual: PresenceStatus,
    },
    #[error("expected friend index {expected}, got {actual}")]
    UnexpectedFriend {
        expected: FriendIndex,
        actual: FriendIndex,
    },
    #[error("presence {status} arrived in unexpected script state {state}")]
    UnexpectedState {
        status: PresenceStatus,
        state: SelfStatus,
    },
}

// ----------------------------------------------------------------------------
// Peer Failures
// ----------------------------------------------------------------------------

/// Failure of one peer's loop, tagged with the peer role.
///
/// This is the scenario's exit contract: the orchestrator re-raises the
/// first of these observed on either side as the overall test outcome.
#[derive(Debug, thiserror::Error)]
pub enum PeerFailure {
    /// A scripted assertion was violated on this peer.
    #[error("{role}: assertion violated: {source}")]
    Assertion {
        role: PeerRole,
        #[source]
        source: ScriptError,
    },
    /// The peer's completion flag never became true within the deadline.
    /// Reported distinctly from assertion violations so callers can tell
    /// "protocol never converged" from "protocol produced wrong values".
    #[error("{role}: scenario deadline elapsed before the script finished")]
    Timeout { role: PeerRole },
    /// The external engine signalled an internal fault on this peer.
    #[error("{role}: engine failure: {source}")]
    Engine {
        role: PeerRole,
        #[source]
        source: EngineError,
    },
    /// The peer's task stopped without producing an outcome (panic or
    /// runtime-level abort).
    #[error("{role}: peer task aborted: {reason}")]
    Aborted { role: PeerRole, reason: String },
}

impl PeerFailure {
    /// The role of the failing peer.
    pub fn role(&self) -> PeerRole {
        match self {
            PeerFailure::Assertion { role, .. }
            | PeerFailure::Timeout { role }
            | PeerFailure::Engine { role, .. }
            | PeerFailure::Aborted { role, .. } => *role,
        }
    }

    /// Whether this failure is a timeout rather than a wrong-value failure.
    pub fn is_timeout(&self) -> bool {
        matches!(self, PeerFailure::Timeout { .. })
    }
}
