//! Errors raised by tool plumbing.
//!
//! Application failures inside a handler never appear here: they are
//! reported as error-flagged results. These types cover definition-time
//! mistakes and host plumbing faults only.


/// Error from building a tool contract. Always fatal to the definer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    /// Tool name is empty or contains whitespace
    #[error("Invalid tool name: {name:?}")]
    InvalidName {
        /// The rejected name
        name: String,
    },
    /// Schema description could not be converted
    #[error("Schema conversion failed for {tool}: {reason}")]
    SchemaConversion {
        /// Tool being defined
        tool: String,
        /// Converter message
        reason: String,
    },
    /// Converted schema does not compile as JSON Schema
    #[error("Invalid input schema for {tool}: {reason}")]
    InvalidSchema {
        /// Tool being defined
        tool: String,
        /// Compiler message
        reason: String,
    },
    /// Handler was never supplied
    #[error("Tool {tool} has no handler")]
    MissingHandler {
        /// Tool being defined
        tool: String,
    },
}

/// Error from a host operation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    /// No tool with this name is registered on the active host
    #[error("Tool not found: {name}")]
    NotFound {
        /// Requested name
        name: String,
    },
    /// Serialized arguments are not valid JSON
    #[error("Invalid arguments for {name}: {reason}")]
    InvalidArguments {
        /// Requested name
        name: String,
        /// Parser message
        reason: String,
    },
    /// The native host failed the operation
    #[error("Native host error: {reason}")]
    Native {
        /// Host message
        reason: String,
    },
}

/// Host result type
pub type HostResult<T> = Result<T, HostError>;
