//! Harness state machine.
//!
//! Pure state and transitions, no rendering. The tool list is never stored:
//! every snapshot re-reads it from the host adapter, and so does the host
//! kind. Renderers consume [`HarnessSnapshot`]s and feed user intents back
//! through the transition methods.
//!
//! Submission is split in two so a UI loop can keep drawing while a tool
//! runs: [`Harness::begin_submit`] marks the harness busy and hands out a
//! [`Submission`], and [`Harness::complete`] records its outcome.

use crate::form::FormState;
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};
use webmcp_tool::{ExecutionResult, HostAdapter, HostKind, SharedBroker, ToolContract};

/// Where the harness is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HarnessState {
    /// No tool selected; the tool list is shown
    Listing,
    /// A tool is selected and its form is editable
    Detail,
    /// An invocation is in flight; the form is disabled
    Executing,
    /// A tool is selected and its last outcome is shown
    DetailWithResult,
}

/// Outcome of the last completed invocation
#[derive(Debug, Clone, PartialEq)]
pub struct LastResult {
    /// What the tool returned
    pub result: ExecutionResult,
    /// Wall-clock time from submit to completion
    pub elapsed_ms: u64,
}

/// One in-flight invocation handed out by [`Harness::begin_submit`]
#[derive(Debug, Clone)]
pub struct Submission {
    /// Tool being invoked
    pub tool: String,
    /// Raw input collected from the form
    pub input: Value,
    started: Instant,
    generation: u64,
}

impl Submission {
    /// Time since the submission began
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Run the invocation through `adapter`.
    ///
    /// Plumbing failures such as an unknown tool are folded into an
    /// error-flagged result so the harness always has an outcome to show.
    pub async fn run(&self, adapter: &HostAdapter, broker: SharedBroker) -> ExecutionResult {
        match adapter.invoke(&self.tool, &self.input, broker).await {
            Ok(result) => result,
            Err(err) => {
                tracing::warn!(tool = %self.tool, error = %err, "invocation failed in host");
                ExecutionResult::error(err.to_string())
            }
        }
    }
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone)]
pub struct HarnessSnapshot {
    /// Current state
    pub state: HarnessState,
    /// Live tool list from the active host
    pub tools: Vec<ToolContract>,
    /// Selected tool, if it still exists
    pub selected: Option<ToolContract>,
    /// Last completed outcome for the selected tool
    pub last_result: Option<LastResult>,
    /// Whether an invocation is in flight
    pub is_executing: bool,
    /// Whether the body is hidden
    pub minimized: bool,
    /// Host serving the tool list
    pub host_kind: HostKind,
}

/// Interactive harness over a host adapter
#[derive(Debug)]
pub struct Harness {
    adapter: Arc<HostAdapter>,
    selected: Option<String>,
    last_result: Option<LastResult>,
    is_executing: bool,
    minimized: bool,
    /// Bumped whenever the selection changes so late results can be dropped
    generation: u64,
}

impl Harness {
    /// Create a harness in the listing state
    #[must_use]
    pub fn new(adapter: Arc<HostAdapter>) -> Self {
        tracing::info!(host = %adapter.host_kind(), "harness started");
        Self {
            adapter,
            selected: None,
            last_result: None,
            is_executing: false,
            minimized: false,
            generation: 0,
        }
    }

    /// The adapter this harness drives
    #[must_use]
    pub fn adapter(&self) -> &Arc<HostAdapter> {
        &self.adapter
    }

    /// Current state
    #[must_use]
    pub fn state(&self) -> HarnessState {
        self.state_with(self.selected_tool_name().is_some())
    }

    fn state_with(&self, has_selection: bool) -> HarnessState {
        match (has_selection, self.is_executing, &self.last_result) {
            (false, _, _) => HarnessState::Listing,
            (true, true, _) => HarnessState::Executing,
            (true, false, Some(_)) => HarnessState::DetailWithResult,
            (true, false, None) => HarnessState::Detail,
        }
    }

    /// Name of the selected tool.
    ///
    /// A selection whose tool has left the live set reads as no selection,
    /// whether or not [`Harness::on_tools_changed`] has run yet.
    #[must_use]
    pub fn selected_tool_name(&self) -> Option<&str> {
        self.selected
            .as_deref()
            .filter(|name| self.adapter.get(name).is_some())
    }

    /// Last completed outcome for the live selection
    #[must_use]
    pub fn last_result(&self) -> Option<&LastResult> {
        self.selected_tool_name()
            .and(self.last_result.as_ref())
    }

    /// Whether an invocation is in flight
    #[must_use]
    pub fn is_executing(&self) -> bool {
        self.is_executing
    }

    /// Whether the body is hidden
    #[must_use]
    pub fn is_minimized(&self) -> bool {
        self.minimized
    }

    /// Live tool list
    #[must_use]
    pub fn tools(&self) -> Vec<ToolContract> {
        self.adapter.list()
    }

    /// Host kind as of now
    #[must_use]
    pub fn host_kind(&self) -> HostKind {
        self.adapter.host_kind()
    }

    /// Re-read the host and build a frame's worth of state.
    #[must_use]
    pub fn snapshot(&self) -> HarnessSnapshot {
        let tools = self.adapter.list();
        let selected = self
            .selected
            .as_deref()
            .and_then(|name| tools.iter().find(|t| t.name() == name).cloned());
        let last_result = selected.as_ref().and(self.last_result.clone());
        HarnessSnapshot {
            state: self.state_with(selected.is_some()),
            tools,
            selected,
            last_result,
            is_executing: self.is_executing,
            minimized: self.minimized,
            host_kind: self.adapter.host_kind(),
        }
    }

    /// Select `name` if it exists in the live set; otherwise nothing changes.
    ///
    /// Returns the selected tool.
    pub fn select_tool(&mut self, name: &str) -> Option<ToolContract> {
        let tool = self.adapter.get(name)?;
        self.selected = Some(name.to_string());
        self.last_result = None;
        self.generation += 1;
        tracing::debug!(tool = %name, "tool selected");
        Some(tool)
    }

    /// Return to the listing, clearing selection and result
    pub fn back(&mut self) {
        self.clear_selection();
    }

    /// Hide or show the body; selection and result are kept
    pub fn toggle_minimized(&mut self) {
        self.minimized = !self.minimized;
    }

    /// Reconcile with the live tool set after a change signal.
    ///
    /// Returns `true` when the selected tool vanished and the harness fell
    /// back to the listing.
    pub fn on_tools_changed(&mut self) -> bool {
        let Some(name) = self.selected.as_deref() else {
            return false;
        };
        if self.adapter.get(name).is_some() {
            return false;
        }
        tracing::info!(tool = %name, "selected tool removed");
        self.clear_selection();
        true
    }

    /// Start an invocation of the selected tool with the form's values.
    ///
    /// Returns `None` when no tool is selected or one is already running.
    pub fn begin_submit(&mut self, form: &FormState) -> Option<Submission> {
        self.begin_submit_value(form.collect())
    }

    /// [`Harness::begin_submit`] with an already-collected input
    pub fn begin_submit_value(&mut self, input: Value) -> Option<Submission> {
        if self.is_executing {
            return None;
        }
        self.on_tools_changed();
        let tool = self.selected.clone()?;
        self.is_executing = true;
        tracing::debug!(tool = %tool, "submit");
        Some(Submission {
            tool,
            input,
            started: Instant::now(),
            generation: self.generation,
        })
    }

    /// Record the outcome of `submission`.
    ///
    /// Always clears the executing flag. The result is kept only if the
    /// harness still shows the tool it was submitted for; returns whether it
    /// was kept.
    pub fn complete(&mut self, submission: Submission, result: ExecutionResult) -> bool {
        self.is_executing = false;
        let current = submission.generation == self.generation
            && self.selected_tool_name() == Some(submission.tool.as_str());
        if !current {
            tracing::debug!(tool = %submission.tool, "dropping late result");
            return false;
        }
        let elapsed_ms = u64::try_from(submission.elapsed().as_millis()).unwrap_or(u64::MAX);
        self.last_result = Some(LastResult { result, elapsed_ms });
        true
    }

    /// Submit, run, and complete in one call.
    ///
    /// Returns `None` if the submission was refused.
    pub async fn submit(&mut self, form: &FormState, broker: SharedBroker) -> Option<LastResult> {
        let submission = self.begin_submit(form)?;
        let adapter = Arc::clone(&self.adapter);
        let result = submission.run(&adapter, broker).await;
        self.complete(submission, result);
        self.last_result.clone()
    }

    fn clear_selection(&mut self) {
        self.selected = None;
        self.last_result = None;
        self.generation += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;
    use webmcp_tool::{AutoBroker, ToolBuilder, define_tool};

    #[derive(Deserialize, schemars::JsonSchema)]
    struct CountInput {
        #[schemars(range(min = 1))]
        count: i64,
    }

    fn count_tool() -> ToolContract {
        define_tool("count", "Count to n", |input: CountInput, _broker| async move {
            Ok(format!("Count: {}", input.count))
        })
        .unwrap()
    }

    fn plain_tool(name: &str) -> ToolContract {
        ToolBuilder::new(name, "plain")
            .raw_handler(|_input, _broker| async { Ok("ok") })
            .build()
            .unwrap()
    }

    fn harness_with(tools: Vec<ToolContract>) -> Harness {
        let adapter = Arc::new(HostAdapter::new());
        adapter.provide_context(tools).unwrap();
        Harness::new(adapter)
    }

    #[test]
    fn test_starts_listing() {
        let harness = harness_with(vec![count_tool()]);
        assert_eq!(harness.state(), HarnessState::Listing);
        let snapshot = harness.snapshot();
        assert_eq!(snapshot.tools.len(), 1);
        assert_eq!(snapshot.host_kind, HostKind::Substitute);
        assert!(snapshot.selected.is_none());
    }

    #[test]
    fn test_select_missing_tool_is_noop() {
        let mut harness = harness_with(vec![count_tool()]);
        assert!(harness.select_tool("nope").is_none());
        assert_eq!(harness.state(), HarnessState::Listing);
    }

    #[test]
    fn test_select_then_back() {
        let mut harness = harness_with(vec![count_tool()]);
        harness.select_tool("count").unwrap();
        assert_eq!(harness.state(), HarnessState::Detail);
        harness.back();
        assert_eq!(harness.state(), HarnessState::Listing);
        assert!(harness.selected_tool_name().is_none());
    }

    #[tokio::test]
    async fn test_submit_records_result() {
        let mut harness = harness_with(vec![count_tool()]);
        let tool = harness.select_tool("count").unwrap();
        let mut form = FormState::for_tool(&tool);
        form.set_field_text("count", "3");
        let last = harness.submit(&form, AutoBroker::shared()).await.unwrap();
        assert_eq!(last.result, ExecutionResult::text("Count: 3"));
        assert_eq!(harness.state(), HarnessState::DetailWithResult);
        assert!(!harness.is_executing());
    }

    #[tokio::test]
    async fn test_submit_invalid_input_shows_error() {
        let mut harness = harness_with(vec![count_tool()]);
        let tool = harness.select_tool("count").unwrap();
        let mut form = FormState::for_tool(&tool);
        form.set_field_text("count", "0");
        let last = harness.submit(&form, AutoBroker::shared()).await.unwrap();
        assert!(last.result.is_error());
        assert!(last.result.first_text().unwrap().contains("count"));
    }

    #[test]
    fn test_reentrant_submit_is_ignored() {
        let mut harness = harness_with(vec![count_tool()]);
        harness.select_tool("count").unwrap();
        let first = harness.begin_submit_value(json!({"count": 1}));
        assert!(first.is_some());
        assert_eq!(harness.state(), HarnessState::Executing);
        assert!(harness.begin_submit_value(json!({"count": 2})).is_none());
    }

    #[test]
    fn test_submit_without_selection_is_ignored() {
        let mut harness = harness_with(vec![count_tool()]);
        assert!(harness.begin_submit_value(json!({})).is_none());
        assert!(!harness.is_executing());
    }

    #[test]
    fn test_removed_tool_forces_listing() {
        let mut harness = harness_with(vec![count_tool(), plain_tool("other")]);
        harness.select_tool("count").unwrap();
        let submission = harness.begin_submit_value(json!({"count": 1})).unwrap();
        harness.complete(submission, ExecutionResult::text("done"));
        assert_eq!(harness.state(), HarnessState::DetailWithResult);

        harness.adapter().unregister("count").unwrap();
        assert!(harness.on_tools_changed());
        assert_eq!(harness.state(), HarnessState::Listing);
        assert!(harness.last_result().is_none());
    }

    #[test]
    fn test_removed_tool_reads_as_listing_before_reconcile() {
        let mut harness = harness_with(vec![count_tool()]);
        harness.select_tool("count").unwrap();
        let submission = harness.begin_submit_value(json!({"count": 1})).unwrap();
        harness.complete(submission, ExecutionResult::text("done"));

        harness.adapter().unregister("count").unwrap();
        assert_eq!(harness.state(), HarnessState::Listing);
        assert!(harness.selected_tool_name().is_none());
        assert!(harness.last_result().is_none());

        let snapshot = harness.snapshot();
        assert_eq!(snapshot.state, HarnessState::Listing);
        assert!(snapshot.selected.is_none());
        assert!(snapshot.last_result.is_none());

        assert!(harness.begin_submit_value(json!({"count": 1})).is_none());
        assert!(!harness.is_executing());
    }

    #[test]
    fn test_replace_all_excluding_selected_forces_listing() {
        let mut harness = harness_with(vec![count_tool()]);
        harness.select_tool("count").unwrap();
        harness
            .adapter()
            .provide_context(vec![plain_tool("other")])
            .unwrap();
        assert!(harness.on_tools_changed());
        assert!(harness.selected_tool_name().is_none());
    }

    #[test]
    fn test_unrelated_change_keeps_selection() {
        let mut harness = harness_with(vec![count_tool()]);
        harness.select_tool("count").unwrap();
        harness.adapter().register(plain_tool("other")).unwrap();
        assert!(!harness.on_tools_changed());
        assert_eq!(harness.selected_tool_name(), Some("count"));
    }

    #[test]
    fn test_late_result_is_dropped() {
        let mut harness = harness_with(vec![count_tool()]);
        harness.select_tool("count").unwrap();
        let submission = harness.begin_submit_value(json!({"count": 1})).unwrap();
        harness.back();
        assert!(!harness.complete(submission, ExecutionResult::text("late")));
        assert!(!harness.is_executing());
        assert!(harness.last_result().is_none());
    }

    #[test]
    fn test_reselect_drops_result_from_previous_visit() {
        let mut harness = harness_with(vec![count_tool()]);
        harness.select_tool("count").unwrap();
        let submission = harness.begin_submit_value(json!({"count": 1})).unwrap();
        harness.back();
        harness.select_tool("count").unwrap();
        assert!(!harness.complete(submission, ExecutionResult::text("stale")));
        assert_eq!(harness.state(), HarnessState::Detail);
    }

    #[test]
    fn test_minimize_keeps_state() {
        let mut harness = harness_with(vec![count_tool()]);
        harness.select_tool("count").unwrap();
        harness.toggle_minimized();
        assert!(harness.is_minimized());
        assert_eq!(harness.selected_tool_name(), Some("count"));
        harness.toggle_minimized();
        assert!(!harness.snapshot().minimized);
    }

    #[tokio::test]
    async fn test_unknown_tool_folds_into_error_result() {
        let adapter = Arc::new(HostAdapter::new());
        let mut harness = Harness::new(Arc::clone(&adapter));
        adapter.register(plain_tool("gone")).unwrap();
        harness.select_tool("gone").unwrap();
        let submission = harness.begin_submit_value(json!({})).unwrap();
        adapter.unregister("gone").unwrap();
        let result = submission.run(&adapter, AutoBroker::shared()).await;
        assert!(result.is_error());
        assert!(result.first_text().unwrap().contains("gone"));
    }
}
