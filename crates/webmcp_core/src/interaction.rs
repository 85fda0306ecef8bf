//! Mid-execution requests for a human decision.
//!
//! A handler calls [`InteractionBroker::request_interaction`] and awaits the
//! answer. The call suspends only the calling handler. There is no timeout:
//! a request nobody answers leaves that invocation suspended.

use async_trait::async_trait;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;

/// Prompt shown when a request carries none.
pub const DEFAULT_PROMPT: &str = "Confirm action?";

/// Kind of answer a handler is asking for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionKind {
    /// Accept or decline
    #[default]
    Confirmation,
    /// Free text
    Input,
    /// One of a list of choices
    Selection,
}

/// A request for human input
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionRequest {
    /// Question shown to the human
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    /// Requested answer kind; `None` means unspecified
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<InteractionKind>,
    /// Offered choices, required for selections
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<String>,
}

impl InteractionRequest {
    /// Ask for a yes/no confirmation.
    #[must_use]
    pub fn confirmation(prompt: impl Into<String>) -> Self {
        Self {
            prompt: Some(prompt.into()),
            kind: Some(InteractionKind::Confirmation),
            choices: Vec::new(),
        }
    }

    /// Ask for free text.
    #[must_use]
    pub fn input(prompt: impl Into<String>) -> Self {
        Self {
            prompt: Some(prompt.into()),
            kind: Some(InteractionKind::Input),
            choices: Vec::new(),
        }
    }

    /// Ask the human to pick one of `choices`.
    #[must_use]
    pub fn selection<I, S>(prompt: impl Into<String>, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prompt: Some(prompt.into()),
            kind: Some(InteractionKind::Selection),
            choices: choices.into_iter().map(Into::into).collect(),
        }
    }

    /// The prompt, or [`DEFAULT_PROMPT`].
    #[must_use]
    pub fn prompt_or_default(&self) -> &str {
        self.prompt.as_deref().unwrap_or(DEFAULT_PROMPT)
    }

    /// The kind, defaulting to confirmation.
    #[must_use]
    pub fn kind_or_default(&self) -> InteractionKind {
        self.kind.unwrap_or_default()
    }
}

/// The answer to an [`InteractionRequest`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionResult {
    /// Whether the human accepted (confirmation, selection) or did not cancel (input)
    #[serde(default)]
    pub confirmed: bool,
    /// Free-text answer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Chosen entry for selections
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection: Option<String>,
}

impl InteractionResult {
    /// An accepted answer with no payload.
    #[must_use]
    pub fn confirmed() -> Self {
        Self {
            confirmed: true,
            ..Self::default()
        }
    }

    /// A declined or cancelled answer.
    #[must_use]
    pub fn declined() -> Self {
        Self::default()
    }

    /// Enforce that a selection names one of the request's choices.
    ///
    /// Any other selection turns the whole answer into a decline.
    #[must_use]
    pub fn checked_against(self, request: &InteractionRequest) -> Self {
        match &self.selection {
            Some(chosen) if !request.choices.iter().any(|c| c == chosen) => Self::declined(),
            _ => self,
        }
    }
}

/// Mediates a handler's request for human input
#[async_trait]
pub trait InteractionBroker: Send + Sync {
    /// Resolve one request. Suspends the caller until answered.
    async fn request_interaction(&self, request: InteractionRequest) -> InteractionResult;
}

/// Shared broker handle passed into handlers
pub type SharedBroker = Arc<dyn InteractionBroker>;

/// Broker used when no human is attached.
///
/// Confirmations are accepted, text input is declined with no value, and
/// every other kind is accepted without a selection.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoBroker;

impl AutoBroker {
    /// Shared handle to the automated broker
    #[must_use]
    pub fn shared() -> SharedBroker {
        Arc::new(Self)
    }
}

#[async_trait]
impl InteractionBroker for AutoBroker {
    async fn request_interaction(&self, request: InteractionRequest) -> InteractionResult {
        match request.kind {
            Some(InteractionKind::Input) => InteractionResult::declined(),
            _ => InteractionResult::confirmed(),
        }
    }
}

type InteractionCallback =
    dyn Fn(InteractionRequest) -> BoxFuture<'static, InteractionResult> + Send + Sync;

/// Broker that delegates every request to a caller-supplied async closure
pub struct CallbackBroker {
    callback: Box<InteractionCallback>,
}

impl CallbackBroker {
    /// Wrap `callback`
    pub fn new<F, Fut>(callback: F) -> Self
    where
        F: Fn(InteractionRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = InteractionResult> + Send + 'static,
    {
        Self {
            callback: Box::new(move |request| Box::pin(callback(request))),
        }
    }
}

impl std::fmt::Debug for CallbackBroker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackBroker").finish_non_exhaustive()
    }
}

#[async_trait]
impl InteractionBroker for CallbackBroker {
    async fn request_interaction(&self, request: InteractionRequest) -> InteractionResult {
        let answer = (self.callback)(request.clone()).await;
        answer.checked_against(&request)
    }
}

/// Map an accept/decline answer.
#[must_use]
pub fn interpret_confirmation(accepted: bool) -> InteractionResult {
    InteractionResult {
        confirmed: accepted,
        ..InteractionResult::default()
    }
}

/// Map a free-text answer; `None` means the human cancelled.
#[must_use]
pub fn interpret_input(answer: Option<String>) -> InteractionResult {
    InteractionResult {
        confirmed: answer.is_some(),
        value: answer,
        selection: None,
    }
}

/// Map a 1-based position typed by the human onto `choices`.
///
/// Cancel, unparsable text, and out-of-range positions all decline.
#[must_use]
pub fn interpret_selection(choices: &[String], answer: Option<&str>) -> InteractionResult {
    let Some(answer) = answer else {
        return InteractionResult::declined();
    };
    let chosen = answer
        .trim()
        .parse::<usize>()
        .ok()
        .and_then(|position| position.checked_sub(1))
        .and_then(|index| choices.get(index));
    match chosen {
        Some(choice) => InteractionResult {
            confirmed: true,
            value: None,
            selection: Some(choice.clone()),
        },
        None => InteractionResult::declined(),
    }
}

/// Numbered listing of `choices`, one per line.
#[must_use]
pub fn numbered_choices(choices: &[String]) -> String {
    choices
        .iter()
        .enumerate()
        .map(|(i, choice)| format!("{}. {}", i + 1, choice))
        .collect::<Vec<_>>()
        .join("\n")
}
