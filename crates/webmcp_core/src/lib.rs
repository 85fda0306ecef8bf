//! webmcp-kit Core Types
//!
//! Pure types shared by the tool pipeline, the hosts, and the devtools
//! harness. Nothing in this crate performs I/O.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod content;
pub mod interaction;

// Re-exports
pub use content::{ContentBlock, ExecutionResult};
pub use interaction::{
    AutoBroker, CallbackBroker, InteractionBroker, InteractionKind, InteractionRequest,
    InteractionResult, SharedBroker,
};
