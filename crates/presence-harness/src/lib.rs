//! Presence Harness
//!
//! Drives two protocol client instances ("Alice" and "Bob") through scripted
//! presence transitions and asserts that status-change notifications reach
//! the counterpart in the correct order with the correct values.
//!
//! Each peer runs on its own sequential execution context: a [`PeerRunner`]
//! repeatedly drains the peer's deferred task queue, calls the engine's
//! `iterate`, and sleeps for the engine's advisory interval. Scripted
//! callbacks never mutate the engine re-entrantly; they enqueue deferred
//! tasks that execute on the owning peer's next tick. The [`Orchestrator`]
//! starts both runners, waits for mutual completion under a finite timeout,
//! and re-raises the first failure observed on either side as the scenario
//! outcome.

pub mod loopback;
pub mod orchestrator;
pub mod runner;
pub mod scenarios;
pub mod script;
pub mod tasks;

pub use loopback::{loopback_pair, LoopbackEngine};
pub use orchestrator::Orchestrator;
pub use runner::PeerRunner;
pub use script::{ClientScript, ScriptCtx, ScriptHandlers};
pub use tasks::{DeferredTask, TaskQueue};
