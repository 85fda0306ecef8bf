//! Host adapter: routes every operation to the native host when one is
//! attached, else to the substitute registry.
//!
//! The choice is made per call. Attaching or detaching a native host
//! mid-session takes effect on the next operation.

use crate::contract::ToolContract;
use crate::error::{HostError, HostResult};
use crate::host::{SubstituteHost, ToolHost};
use crate::registry::{ListenerSet, ObservableRegistry, Subscription};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use webmcp_core::{ExecutionResult, SharedBroker};

/// Which backing serves the adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostKind {
    /// Externally provided host
    Native,
    /// In-process registry
    Substitute,
}

impl HostKind {
    /// Lowercase label
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Native => "native",
            Self::Substitute => "substitute",
        }
    }
}

impl std::fmt::Display for HostKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Callback fired when the active tool set changes
pub type ChangeListener = dyn Fn(HostKind) + Send + Sync;

type NativeSlot = Arc<RwLock<Option<Arc<dyn ToolHost>>>>;

/// Uniform tool surface over a native or substitute host
pub struct HostAdapter {
    substitute: Arc<SubstituteHost>,
    native: NativeSlot,
    /// Bumped on every attach/detach so stale native callbacks go quiet
    native_generation: Arc<AtomicU64>,
    listeners: Arc<ListenerSet<ChangeListener>>,
}

impl HostAdapter {
    /// Adapter with a fresh substitute registry and no native host
    #[must_use]
    pub fn new() -> Self {
        Self::with_registry(Arc::new(ObservableRegistry::new()))
    }

    /// Adapter over an existing registry
    #[must_use]
    pub fn with_registry(registry: Arc<ObservableRegistry>) -> Self {
        let native: NativeSlot = Arc::new(RwLock::new(None));
        let listeners: Arc<ListenerSet<ChangeListener>> = ListenerSet::new();

        let slot = Arc::clone(&native);
        let fan_out = Arc::clone(&listeners);
        let _forward = registry.subscribe(move |_| {
            let native_active = slot.read().unwrap_or_else(PoisonError::into_inner).is_some();
            if !native_active {
                emit(&fan_out, HostKind::Substitute);
            }
        });

        Self {
            substitute: Arc::new(SubstituteHost::new(registry)),
            native,
            native_generation: Arc::new(AtomicU64::new(0)),
            listeners,
        }
    }

    /// True when a native host is attached. No side effects.
    #[must_use]
    pub fn is_native_host_available(&self) -> bool {
        self.read_native().is_some()
    }

    /// Kind of host the next operation will use
    #[must_use]
    pub fn host_kind(&self) -> HostKind {
        if self.is_native_host_available() {
            HostKind::Native
        } else {
            HostKind::Substitute
        }
    }

    /// Route subsequent operations to `host`
    pub fn attach_native(&self, host: Arc<dyn ToolHost>) {
        let generation = self.native_generation.fetch_add(1, Ordering::SeqCst) + 1;
        let current = Arc::clone(&self.native_generation);
        let fan_out = Arc::clone(&self.listeners);
        host.on_tools_changed(Arc::new(move || {
            if current.load(Ordering::SeqCst) == generation {
                emit(&fan_out, HostKind::Native);
            }
        }));
        *self.native.write().unwrap_or_else(PoisonError::into_inner) = Some(host);
        tracing::info!("native host attached");
        emit(&self.listeners, HostKind::Native);
    }

    /// Fall back to the substitute host
    pub fn detach_native(&self) {
        self.native_generation.fetch_add(1, Ordering::SeqCst);
        let previous = self
            .native
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if previous.is_some() {
            tracing::info!("native host detached");
            emit(&self.listeners, HostKind::Substitute);
        }
    }

    /// The substitute registry, whichever host is active
    #[must_use]
    pub fn registry(&self) -> &Arc<ObservableRegistry> {
        self.substitute.registry()
    }

    /// Tools of the active host
    #[must_use]
    pub fn list(&self) -> Vec<ToolContract> {
        self.active().list_tools()
    }

    /// One tool of the active host
    #[must_use]
    pub fn get(&self, name: &str) -> Option<ToolContract> {
        self.active().get_tool(name)
    }

    /// Register on the active host
    ///
    /// # Errors
    ///
    /// Returns error if the native host rejects the tool
    pub fn register(&self, tool: ToolContract) -> HostResult<()> {
        let name = tool.name().to_string();
        self.active().register_tool(tool).inspect_err(|err| {
            tracing::warn!(tool = %name, error = %err, "register failed");
        })
    }

    /// Unregister from the active host
    ///
    /// # Errors
    ///
    /// Returns error if the native host rejects the removal
    pub fn unregister(&self, name: &str) -> HostResult<()> {
        self.active().unregister_tool(name).inspect_err(|err| {
            tracing::warn!(tool = %name, error = %err, "unregister failed");
        })
    }

    /// Replace the active host's tool set
    ///
    /// # Errors
    ///
    /// Returns error if the native host rejects the tool set
    pub fn provide_context(&self, tools: Vec<ToolContract>) -> HostResult<()> {
        self.active().provide_context(tools)
    }

    /// Empty the active host
    ///
    /// # Errors
    ///
    /// Returns error if the native host rejects the operation
    pub fn clear_context(&self) -> HostResult<()> {
        self.active().clear_context()
    }

    /// Invoke by name through the active host's serialized testing surface.
    ///
    /// Application failures come back as error-flagged results. Only
    /// plumbing faults (unknown tool, native host failure) are errors.
    ///
    /// # Errors
    ///
    /// Returns error if the tool is unknown or the host fails
    pub async fn invoke(
        &self,
        name: &str,
        input: &Value,
        broker: SharedBroker,
    ) -> HostResult<ExecutionResult> {
        let serialized = serde_json::to_string(input).map_err(|e| HostError::InvalidArguments {
            name: name.to_string(),
            reason: e.to_string(),
        })?;
        self.execute_serialized(name, &serialized, broker).await
    }

    /// Invoke with arguments already serialized as JSON
    ///
    /// # Errors
    ///
    /// Returns error if the tool is unknown, the arguments are not JSON, or
    /// the host fails
    pub async fn execute_serialized(
        &self,
        name: &str,
        input_args: &str,
        broker: SharedBroker,
    ) -> HostResult<ExecutionResult> {
        let host = self.active();
        host.execute_tool(name, input_args, broker).await
    }

    /// Listen for tool-set changes on whichever host is active
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(HostKind) + Send + Sync + 'static,
    {
        self.listeners.add(Arc::new(listener))
    }

    /// Detach any native host and empty the substitute registry.
    ///
    /// Subscribers stay subscribed.
    pub fn reset(&self) {
        self.detach_native();
        self.substitute.registry().clear();
    }

    fn read_native(&self) -> Option<Arc<dyn ToolHost>> {
        self.native
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn active(&self) -> Arc<dyn ToolHost> {
        match self.read_native() {
            Some(native) => native,
            None => {
                tracing::debug!("native host unavailable, using substitute");
                Arc::clone(&self.substitute) as Arc<dyn ToolHost>
            }
        }
    }
}

impl Default for HostAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for HostAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostAdapter")
            .field("host_kind", &self.host_kind())
            .field("registry", self.substitute.registry())
            .finish()
    }
}

fn emit(listeners: &ListenerSet<ChangeListener>, kind: HostKind) {
    for listener in listeners.snapshot() {
        listener(kind);
    }
}
