//! Process-wide host context.
//!
//! [`global`] lazily creates one [`HostAdapter`] on first access and hands
//! out the same instance afterwards. [`reset`] returns it to the empty,
//! substitute-backed state; tests call it between cases. Code that wants
//! isolation constructs its own [`HostAdapter`] instead.

use crate::adapter::HostAdapter;
use std::sync::{Arc, OnceLock};

static GLOBAL: OnceLock<Arc<HostAdapter>> = OnceLock::new();

/// The process-wide adapter. Clone the `Arc` to share it with a harness.
pub fn global() -> &'static Arc<HostAdapter> {
    GLOBAL.get_or_init(|| Arc::new(HostAdapter::new()))
}

/// Detach any native host and clear the substitute registry.
///
/// Does nothing if the context was never created.
pub fn reset() {
    if let Some(adapter) = GLOBAL.get() {
        adapter.reset();
    }
}
