//! Observable in-memory tool registry.
//!
//! Backs the substitute host. Every mutation notifies all current
//! listeners exactly once with the post-mutation tool list.
//!
//! Mutating the registry from inside a listener is not supported; the
//! outcome of doing so is unspecified.

use crate::contract::ToolContract;
use indexmap::IndexMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Weak};

/// Callback receiving the tool list after every mutation
pub type Listener = dyn Fn(&[ToolContract]) + Send + Sync;

/// Id-keyed set of callbacks shared with the [`Subscription`]s it hands out
pub(crate) struct ListenerSet<F: ?Sized> {
    entries: Mutex<IndexMap<u64, Arc<F>>>,
    next_id: AtomicU64,
}

impl<F: ?Sized + Send + Sync + 'static> ListenerSet<F> {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            entries: Mutex::new(IndexMap::new()),
            next_id: AtomicU64::new(0),
        })
    }

    pub(crate) fn add(self: &Arc<Self>, listener: Arc<F>) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        lock(&self.entries).insert(id, listener);
        let set: Weak<dyn Detach> = Arc::downgrade(self) as Weak<dyn Detach>;
        Subscription { id, set }
    }

    /// Current listeners, cloned so callbacks run without the lock held
    pub(crate) fn snapshot(&self) -> Vec<Arc<F>> {
        lock(&self.entries).values().cloned().collect()
    }

    pub(crate) fn len(&self) -> usize {
        lock(&self.entries).len()
    }
}

trait Detach: Send + Sync {
    fn detach(&self, id: u64);
}

impl<F: ?Sized + Send + Sync> Detach for ListenerSet<F> {
    fn detach(&self, id: u64) {
        lock(&self.entries).shift_remove(&id);
    }
}

/// Handle returned by `subscribe`.
///
/// Dropping the handle keeps the listener subscribed; call
/// [`Subscription::unsubscribe`] to remove it.
#[derive(Clone)]
pub struct Subscription {
    id: u64,
    set: Weak<dyn Detach>,
}

impl Subscription {
    /// Remove exactly this listener. Repeated calls are no-ops.
    pub fn unsubscribe(&self) {
        if let Some(set) = self.set.upgrade() {
            set.detach(self.id);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

/// Tool store keyed by name, in insertion order
pub struct ObservableRegistry {
    tools: Mutex<IndexMap<String, ToolContract>>,
    listeners: Arc<ListenerSet<Listener>>,
}

impl ObservableRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self {
            tools: Mutex::new(IndexMap::new()),
            listeners: ListenerSet::new(),
        }
    }

    /// Insert or replace by name. A replaced tool keeps its position.
    pub fn register(&self, tool: ToolContract) {
        tracing::debug!(tool = %tool.name(), "registry register");
        lock(&self.tools).insert(tool.name().to_string(), tool);
        self.notify();
    }

    /// Remove by name; absent names still notify.
    pub fn unregister(&self, name: &str) {
        tracing::debug!(tool = %name, "registry unregister");
        lock(&self.tools).shift_remove(name);
        self.notify();
    }

    /// Swap the whole tool set. Later duplicates win.
    pub fn replace_all(&self, tools: impl IntoIterator<Item = ToolContract>) {
        {
            let mut entries = lock(&self.tools);
            entries.clear();
            for tool in tools {
                entries.insert(tool.name().to_string(), tool);
            }
            tracing::debug!(count = entries.len(), "registry replace_all");
        }
        self.notify();
    }

    /// Remove every tool
    pub fn clear(&self) {
        tracing::debug!("registry clear");
        lock(&self.tools).clear();
        self.notify();
    }

    /// Look up a tool by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<ToolContract> {
        lock(&self.tools).get(name).cloned()
    }

    /// Snapshot of all tools in insertion order
    #[must_use]
    pub fn list_all(&self) -> Vec<ToolContract> {
        lock(&self.tools).values().cloned().collect()
    }

    /// Names of all tools in insertion order
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        lock(&self.tools).keys().cloned().collect()
    }

    /// Check if a tool is registered
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        lock(&self.tools).contains_key(name)
    }

    /// Number of registered tools
    #[must_use]
    pub fn count(&self) -> usize {
        lock(&self.tools).len()
    }

    /// Check if registry is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Add a listener
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&[ToolContract]) + Send + Sync + 'static,
    {
        self.listeners.add(Arc::new(listener))
    }

    /// Number of current listeners
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn notify(&self) {
        let snapshot = self.list_all();
        for listener in self.listeners.snapshot() {
            listener(snapshot.as_slice());
        }
    }
}

impl Default for ObservableRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ObservableRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObservableRegistry")
            .field("tools", &self.names())
            .field("listeners", &self.listener_count())
            .finish()
    }
}

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}
