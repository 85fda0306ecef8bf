//! Demo tool set registered at startup.
//!
//! One tool per interesting path through the pipeline: plain text, schema
//! validation, confirmation, selection, free-text input and JSON output.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::json;
use std::sync::{Arc, Mutex, PoisonError};
use webmcp_tool::{
    BuildError, HostAdapter, HostError, InteractionRequest, SharedBroker,
    ToolAnnotations, ToolBuilder, ToolContract, ToolReturn, define_tool,
};

const SIZES: [&str; 3] = ["small", "medium", "large"];

#[derive(Debug, Deserialize, JsonSchema)]
struct EchoInput {
    /// Text to send back
    message: String,
    /// Shout it
    #[serde(default)]
    uppercase: bool,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct CountInput {
    /// How far to count
    #[schemars(range(min = 1, max = 100))]
    count: u32,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct ConfirmInput {
    /// What is about to happen
    action: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct PickSizeInput {}

#[derive(Debug, Deserialize, JsonSchema)]
struct NoteInput {
    /// Note text; asked for when omitted
    note: Option<String>,
}

/// Failure setting up the demo tools
#[derive(Debug, thiserror::Error)]
pub enum DemoError {
    /// A contract failed to build
    #[error(transparent)]
    Build(#[from] BuildError),
    /// The host refused a registration
    #[error(transparent)]
    Host(#[from] HostError),
}

/// Build every demo tool
///
/// # Errors
///
/// Returns error if a contract fails to build
pub fn demo_tools() -> Result<Vec<ToolContract>, BuildError> {
    let notes: Arc<Mutex<Vec<String>>> = Arc::default();
    Ok(vec![
        echo()?,
        count()?,
        confirm_action()?,
        pick_size()?,
        remember_note(notes)?,
    ])
}

/// Register the demo tools on `adapter`'s active host
///
/// # Errors
///
/// Returns error if a contract fails to build or the host rejects it
pub fn register_demo_tools(adapter: &HostAdapter) -> Result<usize, DemoError> {
    let tools = demo_tools()?;
    let count = tools.len();
    for tool in tools {
        adapter.register(tool)?;
    }
    tracing::info!(count, "demo tools registered");
    Ok(count)
}

fn echo() -> Result<ToolContract, BuildError> {
    ToolBuilder::new("echo", "Send a message back")
        .annotations(ToolAnnotations::new().with_read_only_hint(true))
        .handler(|input: EchoInput, _broker: SharedBroker| async move {
            let message = if input.uppercase {
                input.message.to_uppercase()
            } else {
                input.message
            };
            Ok(message)
        })
        .build()
}

fn count() -> Result<ToolContract, BuildError> {
    define_tool(
        "count",
        "Count from one to n",
        |input: CountInput, _broker: SharedBroker| async move {
            let numbers: Vec<String> = (1..=input.count).map(|n| n.to_string()).collect();
            Ok(format!("Count: {}", numbers.join(", ")))
        },
    )
}

fn confirm_action() -> Result<ToolContract, BuildError> {
    ToolBuilder::new("confirm_action", "Ask before doing something drastic")
        .annotations(
            ToolAnnotations::new()
                .with_destructive_hint(true)
                .with_confirmation_hint(true),
        )
        .handler(|input: ConfirmInput, broker: SharedBroker| async move {
            let answer = broker
                .request_interaction(InteractionRequest::confirmation(format!(
                    "Really {}?",
                    input.action
                )))
                .await;
            if answer.confirmed {
                Ok(format!("Confirmed: {}", input.action))
            } else {
                Ok(format!("Cancelled: {}", input.action))
            }
        })
        .build()
}

fn pick_size() -> Result<ToolContract, BuildError> {
    define_tool(
        "pick_size",
        "Ask which size to use",
        |_input: PickSizeInput, broker: SharedBroker| async move {
            let answer = broker
                .request_interaction(InteractionRequest::selection("Which size?", SIZES))
                .await;
            let output = if answer.confirmed {
                // Accepted without a pick means no human chose; take the middle one.
                let size = answer.selection.unwrap_or_else(|| SIZES[1].to_string());
                ToolReturn::Value(json!({ "size": size }))
            } else {
                ToolReturn::from("Cancelled: no size selected")
            };
            Ok(output)
        },
    )
}

fn remember_note(notes: Arc<Mutex<Vec<String>>>) -> Result<ToolContract, BuildError> {
    define_tool(
        "remember_note",
        "Store a note and list everything remembered so far",
        move |input: NoteInput, broker: SharedBroker| {
            let notes = Arc::clone(&notes);
            async move {
                let note = match input.note.filter(|n| !n.trim().is_empty()) {
                    Some(note) => Some(note),
                    None => {
                        let answer = broker
                            .request_interaction(InteractionRequest::input("Note to remember"))
                            .await;
                        answer.value.filter(|v| answer.confirmed && !v.is_empty())
                    }
                };
                let output = match note {
                    Some(note) => {
                        let mut notes = notes.lock().unwrap_or_else(PoisonError::into_inner);
                        notes.push(note);
                        ToolReturn::Value(json!({ "notes": notes.as_slice() }))
                    }
                    None => ToolReturn::from("Cancelled: no note given"),
                };
                Ok(output)
            }
        },
    )
}
