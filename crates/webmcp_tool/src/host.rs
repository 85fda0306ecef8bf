//! Host strategy: the surface every tool host exposes.
//!
//! A native host is supplied by the embedding environment. The substitute
//! host serves the same surface from an [`ObservableRegistry`].

use crate::contract::ToolContract;
use crate::error::{HostError, HostResult};
use crate::registry::ObservableRegistry;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use webmcp_core::{ExecutionResult, SharedBroker};

/// Callback fired whenever a host's tool set changes
pub type ToolsChangedCallback = Arc<dyn Fn() + Send + Sync>;

/// Uniform host surface
#[async_trait]
pub trait ToolHost: Send + Sync {
    /// Replace every tool at once
    ///
    /// # Errors
    ///
    /// Returns error if the host rejects the tool set
    fn provide_context(&self, tools: Vec<ToolContract>) -> HostResult<()>;

    /// Remove every tool
    ///
    /// # Errors
    ///
    /// Returns error if the host rejects the operation
    fn clear_context(&self) -> HostResult<()>;

    /// Add or replace one tool
    ///
    /// # Errors
    ///
    /// Returns error if the host rejects the tool
    fn register_tool(&self, tool: ToolContract) -> HostResult<()>;

    /// Remove one tool by name
    ///
    /// # Errors
    ///
    /// Returns error if the host rejects the operation
    fn unregister_tool(&self, name: &str) -> HostResult<()>;

    /// All tools in host order
    fn list_tools(&self) -> Vec<ToolContract>;

    /// One tool by name
    fn get_tool(&self, name: &str) -> Option<ToolContract> {
        self.list_tools().into_iter().find(|t| t.name() == name)
    }

    /// Run a tool with JSON-serialized arguments.
    ///
    /// # Errors
    ///
    /// Returns error if the tool is unknown or the arguments are not JSON
    async fn execute_tool(
        &self,
        name: &str,
        input_args: &str,
        broker: SharedBroker,
    ) -> HostResult<ExecutionResult>;

    /// Register a callback for tool-set changes. There is no removal.
    fn on_tools_changed(&self, callback: ToolsChangedCallback);
}

/// Parse serialized arguments for `name`
///
/// # Errors
///
/// Returns error if `input_args` is not JSON
pub fn parse_arguments(name: &str, input_args: &str) -> HostResult<Value> {
    serde_json::from_str(input_args).map_err(|e| HostError::InvalidArguments {
        name: name.to_string(),
        reason: e.to_string(),
    })
}

/// In-process stand-in host backed by an [`ObservableRegistry`]
#[derive(Debug, Clone)]
pub struct SubstituteHost {
    registry: Arc<ObservableRegistry>,
}

impl SubstituteHost {
    /// Serve tools from `registry`
    #[must_use]
    pub fn new(registry: Arc<ObservableRegistry>) -> Self {
        Self { registry }
    }

    /// The backing registry
    #[must_use]
    pub fn registry(&self) -> &Arc<ObservableRegistry> {
        &self.registry
    }
}

impl Default for SubstituteHost {
    fn default() -> Self {
        Self::new(Arc::new(ObservableRegistry::new()))
    }
}

#[async_trait]
impl ToolHost for SubstituteHost {
    fn provide_context(&self, tools: Vec<ToolContract>) -> HostResult<()> {
        self.registry.replace_all(tools);
        Ok(())
    }

    fn clear_context(&self) -> HostResult<()> {
        self.registry.clear();
        Ok(())
    }

    fn register_tool(&self, tool: ToolContract) -> HostResult<()> {
        self.registry.register(tool);
        Ok(())
    }

    fn unregister_tool(&self, name: &str) -> HostResult<()> {
        self.registry.unregister(name);
        Ok(())
    }

    fn list_tools(&self) -> Vec<ToolContract> {
        self.registry.list_all()
    }

    fn get_tool(&self, name: &str) -> Option<ToolContract> {
        self.registry.get(name)
    }

    async fn execute_tool(
        &self,
        name: &str,
        input_args: &str,
        broker: SharedBroker,
    ) -> HostResult<ExecutionResult> {
        let tool = self.registry.get(name).ok_or_else(|| HostError::NotFound {
            name: name.to_string(),
        })?;
        let input = parse_arguments(name, input_args)?;
        Ok(tool.invoke(input, broker).await)
    }

    fn on_tools_changed(&self, callback: ToolsChangedCallback) {
        // Host callbacks have no removal, so the subscription is never cancelled.
        let _subscription = self.registry.subscribe(move |_| callback());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use webmcp_core::AutoBroker;

    fn echo_tool() -> ToolContract {
        ToolContract::builder("echo", "Echo the message")
            .input_schema(serde_json::json!({
                "type": "object",
                "properties": {"message": {"type": "string"}},
                "required": ["message"]
            }))
            .raw_handler(|input: Value, _broker| async move {
                Ok(input["message"].as_str().unwrap_or_default().to_string())
            })
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_execute_serialized_args() {
        let host = SubstituteHost::default();
        host.register_tool(echo_tool()).unwrap();
        let result = host
            .execute_tool("echo", r#"{"message": "hi"}"#, AutoBroker::shared())
            .await
            .unwrap();
        assert_eq!(result.first_text(), Some("hi"));
    }

    #[tokio::test]
    async fn test_execute_unknown_tool() {
        let host = SubstituteHost::default();
        let err = host
            .execute_tool("missing", "{}", AutoBroker::shared())
            .await
            .unwrap_err();
        assert_eq!(err, HostError::NotFound { name: "missing".into() });
    }

    #[tokio::test]
    async fn test_execute_malformed_args() {
        let host = SubstituteHost::default();
        host.register_tool(echo_tool()).unwrap();
        let err = host
            .execute_tool("echo", "{not json", AutoBroker::shared())
            .await
            .unwrap_err();
        assert!(matches!(err, HostError::InvalidArguments { .. }));
    }

    #[tokio::test]
    async fn test_invalid_input_is_result_not_error() {
        let host = SubstituteHost::default();
        host.register_tool(echo_tool()).unwrap();
        let result = host
            .execute_tool("echo", "{}", AutoBroker::shared())
            .await
            .unwrap();
        assert!(result.is_error());
        assert!(result.first_text().unwrap().contains("message"));
    }

    #[test]
    fn test_context_operations() {
        let host = SubstituteHost::default();
        host.register_tool(echo_tool()).unwrap();
        host.provide_context(vec![]).unwrap();
        assert!(host.list_tools().is_empty());
        host.provide_context(vec![echo_tool()]).unwrap();
        assert!(host.get_tool("echo").is_some());
        host.clear_context().unwrap();
        assert!(host.get_tool("echo").is_none());
    }

    #[test]
    fn test_tools_changed_callback() {
        let host = SubstituteHost::default();
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fired);
        host.on_tools_changed(Arc::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));
        host.register_tool(echo_tool()).unwrap();
        host.unregister_tool("echo").unwrap();
        assert_eq!(fired.load(Ordering::SeqCst), 2);
    }
}
