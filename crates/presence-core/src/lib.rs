//! Presence Core
//!
//! Data model and external contracts for the dual-peer presence conformance
//! harness. This crate defines the closed set of presence values, the peer
//! roles used by scripted scenarios, the capability trait through which the
//! harness drives a protocol engine, and the error types shared across the
//! workspace. It contains no runtime machinery; the harness itself lives in
//! `presence-harness`.

pub mod client;
pub mod config;
pub mod errors;
pub mod types;

pub use client::{EngineEvent, PresenceClient, PresenceEvents};
pub use config::ScenarioConfig;
pub use errors::{EngineError, PeerFailure, ScriptError};
pub use types::{FriendIndex, PeerRole, PresenceStatus, SelfStatus};
