//! Interactive terminal harness.
//!
//! The loop multiplexes four sources: key presses from a reader thread,
//! tool-set change signals from the host adapter, interaction requests
//! from running handlers, and finished invocations. Tool calls run on
//! spawned tasks so the screen keeps redrawing while they are in flight.

use crate::broker::{PendingInteraction, TerminalBroker};
use crate::config::DevtoolsConfig;
use crate::form::FormState;
use crate::harness::{Harness, HarnessSnapshot, HarnessState, Submission};
use crate::input::{InputEvent, InputHandler, InputMode};
use crate::layout::Layout;
use crate::renderer::{Renderer, StdoutTerminal, create_terminal};
use crate::view::{DetailView, HeaderView, HelpView, ModalView, ResultView, ToolListView, View};
use crossterm::event::KeyEvent;
use ratatui::{
    Frame,
    crossterm::{
        execute,
        terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
    },
};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::mpsc;
use webmcp_tool::{
    AutoBroker, ExecutionResult, HostAdapter, InteractionKind, SharedBroker, Subscription,
};

/// A finished invocation coming back from its task
#[derive(Debug)]
pub struct Completion {
    submission: Submission,
    result: ExecutionResult,
}

/// Interaction prompt currently on screen
#[derive(Debug)]
struct Modal {
    pending: PendingInteraction,
    buffer: String,
}

impl Modal {
    fn kind(&self) -> InteractionKind {
        self.pending.request.kind_or_default()
    }

    fn height(&self) -> u16 {
        let choices = u16::try_from(self.pending.request.choices.len()).unwrap_or(u16::MAX);
        match self.kind() {
            InteractionKind::Confirmation => 5,
            InteractionKind::Input => 6,
            InteractionKind::Selection => choices.saturating_add(9),
        }
    }
}

/// Receiving ends drained by the run loop
#[derive(Debug)]
struct Inbox {
    pending: mpsc::UnboundedReceiver<PendingInteraction>,
    done: mpsc::UnboundedReceiver<Completion>,
    changes: mpsc::UnboundedReceiver<()>,
}

/// TUI application state
pub struct TuiApp {
    harness: Harness,
    form: FormState,
    /// Navigate or Edit; prompts override this while open
    mode: InputMode,
    /// Highlighted row in the tool list
    cursor: usize,
    modal: Option<Modal>,
    queued: VecDeque<PendingInteraction>,
    /// Invocation in flight, kept for the elapsed counter
    running: Option<Submission>,
    show_help: bool,
    status: String,
    input: InputHandler,
    renderer: Renderer,
    layout: Layout,
    config: DevtoolsConfig,
    broker: SharedBroker,
    done_tx: mpsc::UnboundedSender<Completion>,
    inbox: Option<Inbox>,
    subscription: Subscription,
    should_quit: bool,
}

impl TuiApp {
    /// Create an app over `adapter`.
    ///
    /// With `interactive` set, handler prompts open a modal; otherwise they
    /// are answered by the automated broker.
    #[must_use]
    pub fn new(adapter: Arc<HostAdapter>, config: DevtoolsConfig) -> Self {
        let (pending_broker, pending) = TerminalBroker::channel();
        let broker: SharedBroker = if config.interactive {
            Arc::new(pending_broker)
        } else {
            AutoBroker::shared()
        };
        let (done_tx, done) = mpsc::unbounded_channel();
        let (changes_tx, changes) = mpsc::unbounded_channel();
        let subscription = adapter.subscribe(move |_kind| {
            if changes_tx.send(()).is_err() {
                tracing::debug!("tool change arrived after the ui closed");
            }
        });

        let mut harness = Harness::new(adapter);
        if config.start_minimized {
            harness.toggle_minimized();
        }

        Self {
            harness,
            form: FormState::default(),
            mode: InputMode::Navigate,
            cursor: 0,
            modal: None,
            queued: VecDeque::new(),
            running: None,
            show_help: false,
            status: "Ready".to_string(),
            input: InputHandler::new().with_timeout(config.tick_rate()),
            renderer: Renderer::new(config.render.clone()),
            layout: Layout::new(),
            config,
            broker,
            done_tx,
            inbox: Some(Inbox {
                pending,
                done,
                changes,
            }),
            subscription,
            should_quit: false,
        }
    }

    /// The harness state machine
    #[must_use]
    pub fn harness(&self) -> &Harness {
        &self.harness
    }

    /// The form of the selected tool
    #[must_use]
    pub fn form(&self) -> &FormState {
        &self.form
    }

    /// Current status message
    #[must_use]
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Whether the app asked to exit
    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Run the TUI until the user quits
    ///
    /// # Errors
    ///
    /// Returns error if terminal setup, input or drawing fails
    pub async fn run(mut self) -> Result<(), TuiError> {
        enable_raw_mode().map_err(|e| TuiError::Terminal(e.to_string()))?;
        execute!(std::io::stdout(), EnterAlternateScreen)
            .map_err(|e| TuiError::Terminal(e.to_string()))?;
        let mut terminal = create_terminal().map_err(|e| TuiError::Terminal(e.to_string()))?;

        let result = self.run_inner(&mut terminal).await;

        disable_raw_mode().map_err(|e| TuiError::Terminal(e.to_string()))?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .map_err(|e| TuiError::Terminal(e.to_string()))?;
        terminal
            .show_cursor()
            .map_err(|e| TuiError::Terminal(e.to_string()))?;
        self.subscription.unsubscribe();

        result
    }

    async fn run_inner(&mut self, terminal: &mut StdoutTerminal) -> Result<(), TuiError> {
        let Some(Inbox {
            mut pending,
            mut done,
            mut changes,
        }) = self.inbox.take()
        else {
            return Err(TuiError::Terminal("app already ran".to_string()));
        };
        let mut keys = spawn_key_reader(self.input.clone());
        let mut ticker = tokio::time::interval(self.config.tick_rate());
        tracing::info!("tui started");

        loop {
            terminal
                .draw(|f| self.draw(f))
                .map_err(|e| TuiError::Render(e.to_string()))?;
            self.renderer.tick();

            tokio::select! {
                key = keys.recv() => match key {
                    Some(key) => self.handle_key(key),
                    None => return Err(TuiError::Input("terminal input closed".to_string())),
                },
                Some(()) = changes.recv() => self.on_tools_changed(),
                Some(request) = pending.recv() => self.on_interaction(request),
                Some(completion) = done.recv() => self.on_completion(completion),
                _ = ticker.tick() => {}
            }

            if self.should_quit {
                tracing::info!(frames = self.renderer.frame_count(), "tui stopped");
                return Ok(());
            }
        }
    }

    /// Decode and apply a key press
    pub fn handle_key(&mut self, key: KeyEvent) {
        let event = self.input.map_key(key, self.input_mode());
        self.handle_event(event);
    }

    /// Apply a decoded intent
    pub fn handle_event(&mut self, event: InputEvent) {
        if event == InputEvent::Quit {
            self.should_quit = true;
            return;
        }
        if self.modal.is_some() {
            self.handle_modal_event(event);
            return;
        }
        if self.show_help {
            self.show_help = false;
            return;
        }
        match event {
            InputEvent::Help => self.show_help = true,
            InputEvent::Minimize => self.harness.toggle_minimized(),
            _ if self.harness.is_minimized() => {}
            _ => match self.harness.state() {
                HarnessState::Listing => self.handle_listing_event(event),
                HarnessState::Executing => {
                    if event == InputEvent::Back {
                        self.back();
                    }
                }
                HarnessState::Detail | HarnessState::DetailWithResult => {
                    self.handle_detail_event(event);
                }
            },
        }
    }

    /// Reconcile with a tool-set change signal
    pub fn on_tools_changed(&mut self) {
        if self.harness.on_tools_changed() {
            self.form = FormState::default();
            self.mode = InputMode::Navigate;
            self.status = "Selected tool was removed".to_string();
        }
        let count = self.harness.tools().len();
        self.cursor = self.cursor.min(count.saturating_sub(1));
    }

    /// Queue a handler's prompt; the first one opens immediately
    pub fn on_interaction(&mut self, pending: PendingInteraction) {
        tracing::debug!(kind = ?pending.request.kind_or_default(), "interaction requested");
        self.queued.push_back(pending);
        self.open_next_modal();
    }

    /// Record a finished invocation
    pub fn on_completion(&mut self, completion: Completion) {
        let Completion { submission, result } = completion;
        self.running = None;
        let tool = submission.tool.clone();
        self.status = if self.harness.complete(submission, result) {
            let ms = self.harness.last_result().map_or(0, |r| r.elapsed_ms);
            format!("{tool} finished in {ms} ms")
        } else {
            format!("Result for {tool} discarded")
        };
    }

    fn input_mode(&self) -> InputMode {
        match &self.modal {
            Some(modal) if modal.kind() == InteractionKind::Confirmation => InputMode::Confirm,
            Some(_) => InputMode::Edit,
            None => self.mode,
        }
    }

    fn handle_listing_event(&mut self, event: InputEvent) {
        let tools = self.harness.tools();
        match event {
            InputEvent::Down if self.cursor + 1 < tools.len() => self.cursor += 1,
            InputEvent::Up => self.cursor = self.cursor.saturating_sub(1),
            InputEvent::Select => {
                if let Some(name) = tools.get(self.cursor).map(|t| t.name().to_string()) {
                    self.select(&name);
                }
            }
            _ => {}
        }
    }

    fn handle_detail_event(&mut self, event: InputEvent) {
        if self.mode == InputMode::Edit {
            match event {
                InputEvent::Char(c) => self.form.push_char(c),
                InputEvent::Backspace => self.form.pop_char(),
                InputEvent::Select | InputEvent::Back => self.mode = InputMode::Navigate,
                InputEvent::NextField => {
                    self.mode = InputMode::Navigate;
                    self.form.focus_next();
                }
                _ => {}
            }
            return;
        }
        match event {
            InputEvent::Down | InputEvent::NextField => self.form.focus_next(),
            InputEvent::Up | InputEvent::PrevField => self.form.focus_prev(),
            InputEvent::Toggle => self.form.cycle(),
            InputEvent::Select => {
                if self.form.focused().is_some_and(|f| f.control.is_textual()) {
                    self.mode = InputMode::Edit;
                } else {
                    self.submit();
                }
            }
            InputEvent::Submit => self.submit(),
            InputEvent::Back => self.back(),
            _ => {}
        }
    }

    fn handle_modal_event(&mut self, event: InputEvent) {
        let Some(modal) = self.modal.as_mut() else {
            return;
        };
        match event {
            InputEvent::Char(c) => {
                modal.buffer.push(c);
                return;
            }
            InputEvent::Backspace => {
                modal.buffer.pop();
                return;
            }
            _ => {}
        }
        let Some(Modal { pending, buffer }) = self.modal.take() else {
            return;
        };
        match (event, pending.request.kind_or_default()) {
            (InputEvent::Accept, _) => pending.confirm(true),
            (InputEvent::Decline, _) => pending.confirm(false),
            (InputEvent::Back, _) => pending.cancel(),
            (InputEvent::Select, InteractionKind::Input) => pending.input(Some(buffer)),
            (InputEvent::Select, InteractionKind::Selection) => pending.select(Some(&buffer)),
            (_, _) => {
                self.modal = Some(Modal { pending, buffer });
                return;
            }
        }
        self.open_next_modal();
    }

    fn open_next_modal(&mut self) {
        if self.modal.is_none() {
            if let Some(pending) = self.queued.pop_front() {
                self.modal = Some(Modal {
                    pending,
                    buffer: String::new(),
                });
            }
        }
    }

    fn select(&mut self, name: &str) {
        if let Some(tool) = self.harness.select_tool(name) {
            self.form = FormState::for_tool(&tool);
            self.mode = InputMode::Navigate;
            self.status = format!("Selected {name}");
        }
    }

    fn back(&mut self) {
        self.harness.back();
        self.form = FormState::default();
        self.mode = InputMode::Navigate;
        self.status = "Ready".to_string();
    }

    fn submit(&mut self) {
        let Some(submission) = self.harness.begin_submit(&self.form) else {
            return;
        };
        self.status = format!("Executing {}", submission.tool);
        self.running = Some(submission.clone());

        let adapter = Arc::clone(self.harness.adapter());
        let broker = Arc::clone(&self.broker);
        let done = self.done_tx.clone();
        tokio::spawn(async move {
            let result = submission.run(&adapter, broker).await;
            if done.send(Completion { submission, result }).is_err() {
                tracing::debug!("completion arrived after the ui closed");
            }
        });
    }

    /// Draw one frame
    pub fn draw(&self, f: &mut Frame) {
        let snapshot = self.harness.snapshot();
        let layout = self.layout.calculate(f.area(), snapshot.minimized);

        HeaderView {
            tool_count: snapshot.tools.len(),
            host_kind: snapshot.host_kind,
            minimized: snapshot.minimized,
        }
        .render(f, layout.header_area, &self.renderer);

        if !snapshot.minimized {
            self.draw_body(f, layout.main_area, &snapshot);
            let status = format!(
                " {} | {} | ? for help",
                state_label(snapshot.state),
                self.status
            );
            self.renderer.render_status(f, layout.status_area, &status);
        }

        if self.show_help {
            let area = self.layout.centered(f.area(), 70, HelpView::height());
            HelpView.render(f, area, &self.renderer);
        }
        if let Some(modal) = &self.modal {
            let area = self.layout.centered(f.area(), 60, modal.height());
            ModalView {
                request: &modal.pending.request,
                buffer: &modal.buffer,
            }
            .render(f, area, &self.renderer);
        }
    }

    fn draw_body(&self, f: &mut Frame, area: ratatui::layout::Rect, snapshot: &HarnessSnapshot) {
        let Some(tool) = &snapshot.selected else {
            ToolListView {
                tools: &snapshot.tools,
                cursor: self.cursor,
                active: None,
            }
            .render(f, area, &self.renderer);
            return;
        };

        let split = self.layout.calculate_split(area);
        ToolListView {
            tools: &snapshot.tools,
            cursor: usize::MAX,
            active: Some(tool.name()),
        }
        .render(f, split.sidebar_area, &self.renderer);

        let detail = self.layout.calculate_detail(split.main_area);
        DetailView {
            tool,
            form: &self.form,
            editing: self.mode == InputMode::Edit,
            executing: snapshot.is_executing,
        }
        .render(f, detail.form_area, &self.renderer);

        let running_ms = self
            .running
            .as_ref()
            .filter(|s| snapshot.is_executing && s.tool == tool.name())
            .map(|s| u64::try_from(s.elapsed().as_millis()).unwrap_or(u64::MAX));
        ResultView {
            last: snapshot.last_result.as_ref(),
            running_ms,
        }
        .render(f, detail.result_area, &self.renderer);
    }
}

impl std::fmt::Debug for TuiApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TuiApp")
            .field("state", &self.harness.state())
            .field("mode", &self.mode)
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

fn state_label(state: HarnessState) -> &'static str {
    match state {
        HarnessState::Listing => "Tools",
        HarnessState::Detail => "Detail",
        HarnessState::Executing => "Executing",
        HarnessState::DetailWithResult => "Result",
    }
}

/// Blocking crossterm reads on their own thread, forwarded to the loop.
///
/// The thread exits once the receiver is gone or input fails.
fn spawn_key_reader(input: InputHandler) -> mpsc::UnboundedReceiver<KeyEvent> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        loop {
            match input.read_key() {
                Ok(Some(key)) => {
                    if tx.send(key).is_err() {
                        break;
                    }
                }
                Ok(None) if tx.is_closed() => break,
                Ok(None) => {}
                Err(err) => {
                    tracing::warn!(error = %err, "terminal input failed");
                    break;
                }
            }
        }
    });
    rx
}

/// TUI errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum TuiError {
    /// Terminal setup or teardown failed
    #[error("terminal error: {0}")]
    Terminal(String),
    /// Reading keys failed
    #[error("input error: {0}")]
    Input(String),
    /// Drawing a frame failed
    #[error("render error: {0}")]
    Render(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo::register_demo_tools;
    use crate::view::tests::rows;
    use ratatui::{Terminal, backend::TestBackend};
    use serde_json::json;
    use webmcp_tool::ToolContract;

    fn app(interactive: bool) -> TuiApp {
        let adapter = Arc::new(HostAdapter::new());
        register_demo_tools(&adapter).unwrap();
        let config = DevtoolsConfig {
            interactive,
            ..DevtoolsConfig::default()
        };
        TuiApp::new(adapter, config)
    }

    fn screen(app: &TuiApp) -> Vec<String> {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| app.draw(f)).unwrap();
        rows(terminal.backend())
    }

    fn contains(rows: &[String], needle: &str) -> bool {
        rows.iter().any(|r| r.contains(needle))
    }

    fn type_text(app: &mut TuiApp, text: &str) {
        for c in text.chars() {
            app.handle_event(InputEvent::Char(c));
        }
    }

    async fn next_completion(app: &mut TuiApp) -> Completion {
        app.inbox.as_mut().unwrap().done.recv().await.unwrap()
    }

    #[test]
    fn test_listing_screen() {
        let app = app(false);
        let rows = screen(&app);
        assert!(contains(&rows, "5 tools"));
        assert!(contains(&rows, "[substitute]"));
        assert!(contains(&rows, "confirm_action"));
        assert!(contains(&rows, "Tools | Ready"));
    }

    #[test]
    fn test_empty_registry_screen() {
        let app = TuiApp::new(Arc::new(HostAdapter::new()), DevtoolsConfig::default());
        assert!(contains(&screen(&app), "No tools registered"));
    }

    #[test]
    fn test_select_and_back() {
        let mut app = app(false);
        app.handle_event(InputEvent::Down);
        app.handle_event(InputEvent::Select);
        assert_eq!(app.harness().selected_tool_name(), Some("count"));
        assert_eq!(app.form().fields().len(), 1);
        assert!(contains(&screen(&app), "count*"));

        app.handle_event(InputEvent::Back);
        assert_eq!(app.harness().state(), HarnessState::Listing);
        assert!(app.form().is_empty());
    }

    #[tokio::test]
    async fn test_edit_and_submit() {
        let mut app = app(false);
        app.handle_event(InputEvent::Down);
        app.handle_event(InputEvent::Select);
        app.handle_event(InputEvent::Select);
        assert_eq!(app.input_mode(), InputMode::Edit);
        type_text(&mut app, "3");
        app.handle_event(InputEvent::Select);
        assert_eq!(app.input_mode(), InputMode::Navigate);

        app.handle_event(InputEvent::Submit);
        assert_eq!(app.harness().state(), HarnessState::Executing);
        assert!(contains(&screen(&app), "Executing"));

        let completion = next_completion(&mut app).await;
        app.on_completion(completion);
        assert_eq!(app.harness().state(), HarnessState::DetailWithResult);
        let rows = screen(&app);
        assert!(contains(&rows, "Success"));
        assert!(contains(&rows, "Count: 1, 2, 3"));
    }

    #[tokio::test]
    async fn test_validation_error_shown() {
        let mut app = app(false);
        app.handle_event(InputEvent::Down);
        app.handle_event(InputEvent::Select);
        app.handle_event(InputEvent::Submit);
        let completion = next_completion(&mut app).await;
        app.on_completion(completion);
        let rows = screen(&app);
        assert!(contains(&rows, "Error"));
        assert!(contains(&rows, "Validation error"));
    }

    #[tokio::test]
    async fn test_confirmation_modal_round_trip() {
        let mut app = app(true);
        app.handle_event(InputEvent::Down);
        app.handle_event(InputEvent::Down);
        app.handle_event(InputEvent::Select);
        assert_eq!(app.harness().selected_tool_name(), Some("confirm_action"));
        app.handle_event(InputEvent::Select);
        type_text(&mut app, "reboot");
        app.handle_event(InputEvent::Select);
        app.handle_event(InputEvent::Submit);

        let pending = app.inbox.as_mut().unwrap().pending.recv().await.unwrap();
        app.on_interaction(pending);
        assert_eq!(app.input_mode(), InputMode::Confirm);
        assert!(contains(&screen(&app), "Really reboot?"));

        app.handle_event(InputEvent::Accept);
        assert!(app.modal.is_none());
        let completion = next_completion(&mut app).await;
        app.on_completion(completion);
        assert!(contains(&screen(&app), "Confirmed: reboot"));
    }

    #[tokio::test]
    async fn test_selection_modal_typed_answer() {
        let mut app = app(true);
        for _ in 0..3 {
            app.handle_event(InputEvent::Down);
        }
        app.handle_event(InputEvent::Select);
        assert_eq!(app.harness().selected_tool_name(), Some("pick_size"));
        app.handle_event(InputEvent::Select);

        let pending = app.inbox.as_mut().unwrap().pending.recv().await.unwrap();
        app.on_interaction(pending);
        assert_eq!(app.input_mode(), InputMode::Edit);
        assert!(contains(&screen(&app), "3. large"));
        type_text(&mut app, "3");
        app.handle_event(InputEvent::Select);

        let completion = next_completion(&mut app).await;
        app.on_completion(completion);
        assert!(contains(&screen(&app), "large"));
        assert!(!app.harness().last_result().unwrap().result.is_error());
    }

    #[tokio::test]
    async fn test_late_result_dropped_after_back() {
        let mut app = app(false);
        app.handle_event(InputEvent::Select);
        app.handle_event(InputEvent::Submit);
        app.handle_event(InputEvent::Back);
        assert_eq!(app.harness().state(), HarnessState::Listing);

        let completion = next_completion(&mut app).await;
        app.on_completion(completion);
        assert!(!app.harness().is_executing());
        assert!(app.harness().last_result().is_none());
        assert!(app.status().contains("discarded"));
    }

    #[test]
    fn test_removed_tool_returns_to_listing() {
        let mut app = app(false);
        app.handle_event(InputEvent::Select);
        assert_eq!(app.harness().selected_tool_name(), Some("echo"));

        app.harness().adapter().unregister("echo").unwrap();
        app.on_tools_changed();
        assert_eq!(app.harness().state(), HarnessState::Listing);
        assert_eq!(app.status(), "Selected tool was removed");
    }

    #[test]
    fn test_change_signal_reaches_inbox() {
        let mut app = app(false);
        let extra = ToolContract::builder("extra", "Added later")
            .raw_handler(|_input, _broker| async { Ok(json!({"ok": true})) })
            .build()
            .unwrap();
        app.harness().adapter().register(extra).unwrap();
        assert!(app.inbox.as_mut().unwrap().changes.try_recv().is_ok());
        app.on_tools_changed();
        assert!(contains(&screen(&app), "6 tools"));
    }

    #[tokio::test]
    async fn test_modal_height_saturates_on_huge_choice_list() {
        use webmcp_tool::{InteractionBroker, InteractionRequest};

        let (broker, mut pending) = TerminalBroker::channel();
        let choices: Vec<String> = (0..70_000).map(|i| i.to_string()).collect();
        let asking = tokio::spawn(async move {
            broker
                .request_interaction(InteractionRequest::selection("Pick", choices))
                .await
        });

        let modal = Modal {
            pending: pending.recv().await.unwrap(),
            buffer: String::new(),
        };
        assert_eq!(modal.height(), u16::MAX);
        modal.pending.cancel();
        assert!(!asking.await.unwrap().confirmed);
    }

    #[test]
    fn test_minimize_hides_body() {
        let mut app = app(false);
        app.handle_event(InputEvent::Minimize);
        let rows = screen(&app);
        assert!(contains(&rows, "minimized"));
        assert!(!contains(&rows, "confirm_action"));

        app.handle_event(InputEvent::Down);
        app.handle_event(InputEvent::Minimize);
        assert_eq!(app.cursor, 0);
    }

    #[test]
    fn test_help_overlay_and_quit() {
        let mut app = app(false);
        app.handle_event(InputEvent::Help);
        assert!(contains(&screen(&app), "this help"));
        app.handle_event(InputEvent::Down);
        assert!(!app.show_help);
        assert_eq!(app.cursor, 0);

        app.handle_event(InputEvent::Quit);
        assert!(app.should_quit());
    }
}
