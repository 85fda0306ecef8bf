//! webmcp-kit Tool Pipeline
//!
//! Tool contracts with build-time schema conversion, validating and
//! error-trapping execution, response normalization, an observable
//! registry, and a host adapter that falls back to that registry when no
//! native host is attached.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapter;
pub mod context;
pub mod contract;
pub mod error;
pub mod host;
pub mod normalize;
pub mod registry;
pub mod schema;
pub mod validate;

pub use adapter::{HostAdapter, HostKind};
pub use contract::{
    EXECUTION_PREFIX, ToolAnnotations, ToolBuilder, ToolContract, ToolDescriptor, define_tool,
};
pub use error::{BuildError, HostError, HostResult};
pub use host::{SubstituteHost, ToolHost, ToolsChangedCallback};
pub use normalize::{ToolReturn, normalize};
pub use registry::{ObservableRegistry, Subscription};
pub use schema::{FieldSchema, FieldType, InputSchema};
pub use validate::{FieldViolation, InputValidator, VALIDATION_PREFIX, ValidationFailure};

pub use webmcp_core::{
    AutoBroker, CallbackBroker, ContentBlock, ExecutionResult, InteractionBroker, InteractionKind,
    InteractionRequest, InteractionResult, SharedBroker,
};
