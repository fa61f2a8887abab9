//! Scripted scenarios
//!
//! One module per scripted exchange. A scenario is a pair of handler
//! records the orchestrator binds to the Alice and Bob scripts.

pub mod presence_handshake;

pub use presence_handshake::presence_handshake;
