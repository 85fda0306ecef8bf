//! Tool contracts and the validating, error-trapping execution wrapper.

use crate::error::{BuildError, HostResult};
use crate::normalize::{ToolReturn, normalize};
use crate::schema::InputSchema;
use crate::validate::{InputValidator, ValidationFailure, ROOT_PATH, validate_name};
use futures::FutureExt;
use futures::future::BoxFuture;
use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::any::Any;
use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use webmcp_core::{AutoBroker, ExecutionResult, SharedBroker};

/// Prefix of every handler failure message
pub const EXECUTION_PREFIX: &str = "Execution error";

const READ_ONLY_HINT: &str = "readOnlyHint";
const DESTRUCTIVE_HINT: &str = "destructiveHint";
const CONFIRMATION_HINT: &str = "confirmationHint";

/// Open map of hints attached to a tool
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToolAnnotations(IndexMap<String, Value>);

impl ToolAnnotations {
    /// No hints
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an arbitrary hint
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Mark the tool as not modifying external state
    #[must_use]
    pub fn with_read_only_hint(self, hint: bool) -> Self {
        self.with(READ_ONLY_HINT, hint)
    }

    /// Mark the tool as possibly destructive
    #[must_use]
    pub fn with_destructive_hint(self, hint: bool) -> Self {
        self.with(DESTRUCTIVE_HINT, hint)
    }

    /// Recommend human confirmation
    #[must_use]
    pub fn with_confirmation_hint(self, hint: bool) -> Self {
        self.with(CONFIRMATION_HINT, hint)
    }

    /// `readOnlyHint`, when set to a boolean
    #[must_use]
    pub fn read_only_hint(&self) -> Option<bool> {
        self.get(READ_ONLY_HINT).and_then(Value::as_bool)
    }

    /// `destructiveHint`, when set to a boolean
    #[must_use]
    pub fn destructive_hint(&self) -> Option<bool> {
        self.get(DESTRUCTIVE_HINT).and_then(Value::as_bool)
    }

    /// `confirmationHint`, when set to a boolean
    #[must_use]
    pub fn confirmation_hint(&self) -> Option<bool> {
        self.get(CONFIRMATION_HINT).and_then(Value::as_bool)
    }

    /// Raw hint lookup
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// True when no hints are set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Hints in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

/// Serializable boundary shape of a contract
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor {
    /// Unique name
    pub name: String,
    /// What the tool does
    pub description: String,
    /// Converted JSON Schema
    pub input_schema: Value,
    /// Hints, omitted when empty
    #[serde(default, skip_serializing_if = "ToolAnnotations::is_empty")]
    pub annotations: ToolAnnotations,
}

type HandlerFuture = BoxFuture<'static, anyhow::Result<ToolReturn>>;
type ErasedHandler =
    dyn Fn(Value, SharedBroker) -> Result<HandlerFuture, ValidationFailure> + Send + Sync;

struct ContractInner {
    name: String,
    description: String,
    input_schema: InputSchema,
    annotations: ToolAnnotations,
    validator: InputValidator,
    handler: Box<ErasedHandler>,
}

/// Immutable definition of a callable tool.
///
/// Cheap to clone; clones share the same compiled schema and handler.
#[derive(Clone)]
pub struct ToolContract {
    inner: Arc<ContractInner>,
}

impl ToolContract {
    /// Start defining a tool
    #[must_use]
    pub fn builder(name: impl Into<String>, description: impl Into<String>) -> ToolBuilder {
        ToolBuilder::new(name, description)
    }

    /// Unique name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// What the tool does
    #[must_use]
    pub fn description(&self) -> &str {
        &self.inner.description
    }

    /// Schema converted at build time
    #[must_use]
    pub fn input_schema(&self) -> &InputSchema {
        &self.inner.input_schema
    }

    /// Attached hints
    #[must_use]
    pub fn annotations(&self) -> &ToolAnnotations {
        &self.inner.annotations
    }

    /// Boundary shape for listing
    #[must_use]
    pub fn to_descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: self.inner.name.clone(),
            description: self.inner.description.clone(),
            input_schema: self.inner.input_schema.as_value().clone(),
            annotations: self.inner.annotations.clone(),
        }
    }

    /// Validate, run, and normalize one invocation.
    ///
    /// Never fails: validation errors, handler errors, and handler panics
    /// all come back as error-flagged results.
    pub async fn invoke(&self, raw_input: Value, broker: SharedBroker) -> ExecutionResult {
        let inner = &self.inner;
        if let Err(failure) = inner.validator.validate(&raw_input) {
            tracing::debug!(tool = %inner.name, %failure, "input rejected");
            return ExecutionResult::error(failure.to_string());
        }

        let started = std::panic::catch_unwind(AssertUnwindSafe(|| {
            (inner.handler)(raw_input, broker)
        }));
        let future = match started {
            Ok(Ok(future)) => future,
            Ok(Err(failure)) => return ExecutionResult::error(failure.to_string()),
            Err(payload) => return execution_error(&panic_message(payload.as_ref())),
        };

        match AssertUnwindSafe(future).catch_unwind().await {
            Ok(Ok(output)) => normalize(output),
            Ok(Err(err)) => {
                tracing::debug!(tool = %inner.name, error = %err, "handler failed");
                execution_error(&err.to_string())
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                tracing::warn!(tool = %inner.name, %message, "handler panicked");
                execution_error(&message)
            }
        }
    }

    /// Invoke with the automated broker
    pub async fn execute(&self, raw_input: Value) -> ExecutionResult {
        self.invoke(raw_input, AutoBroker::shared()).await
    }

    /// Register on the process-wide host
    ///
    /// # Errors
    ///
    /// Returns error if the native host rejects the tool
    pub fn register(&self) -> HostResult<()> {
        crate::context::global().register(self.clone())
    }

    /// Remove from the process-wide host
    ///
    /// # Errors
    ///
    /// Returns error if the native host rejects the removal
    pub fn unregister(&self) -> HostResult<()> {
        crate::context::global().unregister(self.name())
    }
}

impl fmt::Debug for ToolContract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolContract")
            .field("name", &self.inner.name)
            .field("description", &self.inner.description)
            .field("annotations", &self.inner.annotations)
            .finish_non_exhaustive()
    }
}

fn execution_error(message: &str) -> ExecutionResult {
    ExecutionResult::error(format!("{EXECUTION_PREFIX}: {message}"))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "handler panicked".to_string()
    }
}

enum SchemaSource {
    Derived(fn(&str) -> Result<InputSchema, BuildError>),
    Raw(Value),
}

/// Builder for [`ToolContract`]
pub struct ToolBuilder {
    name: String,
    description: String,
    annotations: ToolAnnotations,
    schema: Option<SchemaSource>,
    handler: Option<Box<ErasedHandler>>,
}

impl ToolBuilder {
    /// Start with a name and description
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            annotations: ToolAnnotations::new(),
            schema: None,
            handler: None,
        }
    }

    /// Attach hints
    #[must_use]
    pub fn annotations(mut self, annotations: ToolAnnotations) -> Self {
        self.annotations = annotations;
        self
    }

    /// Use a hand-written schema instead of the derived one
    #[must_use]
    pub fn input_schema(mut self, schema: Value) -> Self {
        self.schema = Some(SchemaSource::Raw(schema));
        self
    }

    /// Typed handler; the input schema is derived from `I`.
    ///
    /// Input that passes the schema but fails to deserialize into `I` is
    /// reported as a validation error.
    #[must_use]
    pub fn handler<I, F, Fut, R>(mut self, handler: F) -> Self
    where
        I: DeserializeOwned + JsonSchema + Send + 'static,
        F: Fn(I, SharedBroker) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<R>> + Send + 'static,
        R: Into<ToolReturn> + 'static,
    {
        if !matches!(self.schema, Some(SchemaSource::Raw(_))) {
            self.schema = Some(SchemaSource::Derived(InputSchema::for_type::<I>));
        }
        self.handler = Some(Box::new(
            move |raw: Value, broker: SharedBroker| -> Result<HandlerFuture, ValidationFailure> {
                let input: I = serde_json::from_value(raw)
                    .map_err(|e| ValidationFailure::single(ROOT_PATH, e.to_string()))?;
                let fut = handler(input, broker);
                Ok(async move { fut.await.map(Into::into) }.boxed())
            },
        ));
        self
    }

    /// Untyped handler receiving the validated JSON value
    #[must_use]
    pub fn raw_handler<F, Fut, R>(mut self, handler: F) -> Self
    where
        F: Fn(Value, SharedBroker) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<R>> + Send + 'static,
        R: Into<ToolReturn> + 'static,
    {
        self.handler = Some(Box::new(
            move |raw: Value, broker: SharedBroker| -> Result<HandlerFuture, ValidationFailure> {
                let fut = handler(raw, broker);
                Ok(async move { fut.await.map(Into::into) }.boxed())
            },
        ));
        self
    }

    /// Convert the schema and compile the validator.
    ///
    /// # Errors
    ///
    /// Returns error if the name is invalid, the handler is missing, or the
    /// schema cannot be converted or compiled
    pub fn build(self) -> Result<ToolContract, BuildError> {
        validate_name(&self.name)?;
        let handler = self.handler.ok_or_else(|| BuildError::MissingHandler {
            tool: self.name.clone(),
        })?;
        let input_schema = match self.schema {
            Some(SchemaSource::Derived(derive)) => derive(&self.name)?,
            Some(SchemaSource::Raw(value)) => InputSchema::from_value(&self.name, value)?,
            None => InputSchema::empty_object(),
        };
        let validator = InputValidator::compile(&self.name, &input_schema)?;
        tracing::debug!(tool = %self.name, "tool contract built");
        Ok(ToolContract {
            inner: Arc::new(ContractInner {
                name: self.name,
                description: self.description,
                input_schema,
                annotations: self.annotations,
                validator,
                handler,
            }),
        })
    }
}

/// Define a typed tool in one call.
///
/// # Errors
///
/// Returns error if the contract cannot be built
pub fn define_tool<I, F, Fut, R>(
    name: impl Into<String>,
    description: impl Into<String>,
    handler: F,
) -> Result<ToolContract, BuildError>
where
    I: DeserializeOwned + JsonSchema + Send + 'static,
    F: Fn(I, SharedBroker) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<R>> + Send + 'static,
    R: Into<ToolReturn> + 'static,
{
    ToolBuilder::new(name, description).handler(handler).build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use webmcp_core::{
        CallbackBroker, ContentBlock, InteractionRequest, InteractionResult,
    };

    #[derive(Deserialize, JsonSchema)]
    struct CountInput {
        #[schemars(range(min = 1))]
        count: i64,
    }

    fn count_tool() -> ToolContract {
        define_tool("count", "Count things", |input: CountInput, _broker| async move {
            Ok(format!("Count: {}", input.count))
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_count_rejects_zero() {
        let result = count_tool().execute(json!({"count": 0})).await;
        assert!(result.is_error());
        let text = result.first_text().unwrap();
        assert!(text.starts_with("Validation error: "));
        assert!(text.contains("count"));
    }

    #[tokio::test]
    async fn test_count_accepts_three() {
        let result = count_tool().execute(json!({"count": 3})).await;
        assert_eq!(result.content, vec![ContentBlock::text("Count: 3")]);
        assert!(result.is_error.is_none());
    }

    #[tokio::test]
    async fn test_handler_error_is_trapped() {
        let tool = ToolContract::builder("fail", "Always fails")
            .raw_handler(|_input, _broker| async { Err::<String, _>(anyhow::anyhow!("disk on fire")) })
            .build()
            .unwrap();
        let result = tool.execute(json!({})).await;
        assert!(result.is_error());
        assert_eq!(result.first_text(), Some("Execution error: disk on fire"));
    }

    #[tokio::test]
    async fn test_handler_panic_is_trapped() {
        let tool = ToolContract::builder("panic", "Panics")
            .raw_handler(|_input, _broker| async {
                if true {
                    panic!("bad state");
                }
                Ok("unreachable")
            })
            .build()
            .unwrap();
        let result = tool.execute(json!({})).await;
        assert!(result.is_error());
        assert_eq!(result.first_text(), Some("Execution error: bad state"));
    }

    #[tokio::test]
    async fn test_shaped_return_passes_through() {
        let shaped = ExecutionResult::from_blocks(vec![
            ContentBlock::text("a"),
            ContentBlock::resource("https://example.com", None),
        ]);
        let expected = shaped.clone();
        let tool = ToolContract::builder("shaped", "Returns blocks")
            .raw_handler(move |_input, _broker| {
                let shaped = shaped.clone();
                async move { Ok(shaped) }
            })
            .build()
            .unwrap();
        assert_eq!(tool.execute(json!({})).await, expected);
    }

    #[tokio::test]
    async fn test_validation_skips_handler() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let tool = ToolContract::builder("guarded", "Counts calls")
            .handler(move |_input: CountInput, _broker| {
                seen.fetch_add(1, Ordering::SeqCst);
                async { Ok("ran") }
            })
            .build()
            .unwrap();
        let _ = tool.execute(json!({"count": "many"})).await;
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        let _ = tool.execute(json!({"count": 2})).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_default_broker_confirms() {
        let tool = ToolContract::builder("confirm", "Asks first")
            .raw_handler(|_input, broker: SharedBroker| async move {
                let answer = broker
                    .request_interaction(InteractionRequest::confirmation("Proceed?"))
                    .await;
                Ok(if answer.confirmed { "done" } else { "cancelled" })
            })
            .build()
            .unwrap();
        assert_eq!(tool.execute(json!({})).await.first_text(), Some("done"));
    }

    #[tokio::test]
    async fn test_declined_interaction_is_not_error() {
        let tool = ToolContract::builder("confirm", "Asks first")
            .raw_handler(|_input, broker: SharedBroker| async move {
                let answer = broker
                    .request_interaction(InteractionRequest::confirmation("Proceed?"))
                    .await;
                Ok(if answer.confirmed { "done" } else { "cancelled" })
            })
            .build()
            .unwrap();
        let broker: SharedBroker =
            Arc::new(CallbackBroker::new(|_| async { InteractionResult::declined() }));
        let result = tool.invoke(json!({}), broker).await;
        assert!(!result.is_error());
        assert_eq!(result.first_text(), Some("cancelled"));
    }

    #[test]
    fn test_invalid_name_fails_build() {
        let err = ToolContract::builder("has space", "x")
            .raw_handler(|_v, _b| async { Ok("x") })
            .build()
            .unwrap_err();
        assert!(matches!(err, BuildError::InvalidName { .. }));
    }

    #[test]
    fn test_missing_handler_fails_build() {
        let err = ToolContract::builder("nothing", "x").build().unwrap_err();
        assert!(matches!(err, BuildError::MissingHandler { .. }));
    }

    #[test]
    fn test_bad_raw_schema_fails_build() {
        let err = ToolContract::builder("bad", "x")
            .input_schema(json!({"type": "object", "properties": {"a": {"type": 5}}}))
            .raw_handler(|_v, _b| async { Ok("x") })
            .build()
            .unwrap_err();
        assert!(matches!(err, BuildError::InvalidSchema { .. }));
    }

    #[test]
    fn test_descriptor_shape() {
        let tool = ToolContract::builder("remove", "Remove an item")
            .annotations(ToolAnnotations::new().with_destructive_hint(true))
            .input_schema(json!({"type": "object", "properties": {"id": {"type": "string"}}}))
            .raw_handler(|_v, _b| async { Ok("removed") })
            .build()
            .unwrap();
        let value = serde_json::to_value(tool.to_descriptor()).unwrap();
        assert_eq!(
            value,
            json!({
                "name": "remove",
                "description": "Remove an item",
                "inputSchema": {"type": "object", "properties": {"id": {"type": "string"}}},
                "annotations": {"destructiveHint": true}
            })
        );
        assert_eq!(tool.annotations().destructive_hint(), Some(true));
        assert_eq!(tool.annotations().read_only_hint(), None);
    }

    #[test]
    fn test_descriptor_omits_empty_annotations() {
        let value = serde_json::to_value(count_tool().to_descriptor()).unwrap();
        assert!(value.get("annotations").is_none());
    }

    #[test]
    fn test_schema_converted_once() {
        let tool = count_tool();
        let clone = tool.clone();
        assert!(std::ptr::eq(tool.input_schema(), clone.input_schema()));
    }
}
