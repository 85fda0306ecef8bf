//! Human-attached interaction brokers.
//!
//! [`TerminalBroker`] forwards requests to the TUI, which answers through a
//! modal. [`ConsoleBroker`] asks on a line-based reader and writer, stdin
//! and stdout by default. Both suspend only the calling handler.

use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::{Mutex, mpsc, oneshot};
use webmcp_core::interaction::{
    interpret_confirmation, interpret_input, interpret_selection, numbered_choices,
};
use webmcp_core::{InteractionBroker, InteractionKind, InteractionRequest, InteractionResult};

/// A request waiting for the TUI to answer
#[derive(Debug)]
pub struct PendingInteraction {
    /// What the handler asked
    pub request: InteractionRequest,
    reply: oneshot::Sender<InteractionResult>,
}

impl PendingInteraction {
    /// Answer an accept/decline prompt
    pub fn confirm(self, accepted: bool) {
        self.answer(interpret_confirmation(accepted));
    }

    /// Answer a text prompt; `None` cancels
    pub fn input(self, answer: Option<String>) {
        self.answer(interpret_input(answer));
    }

    /// Answer a selection with the typed 1-based position; `None` cancels
    pub fn select(self, answer: Option<&str>) {
        let result = interpret_selection(&self.request.choices, answer);
        self.answer(result);
    }

    /// Cancel whatever was asked
    pub fn cancel(self) {
        self.answer(InteractionResult::declined());
    }

    fn answer(self, result: InteractionResult) {
        let result = result.checked_against(&self.request);
        if self.reply.send(result).is_err() {
            tracing::debug!("interaction answered after the handler went away");
        }
    }
}

/// Broker that routes requests to the terminal UI
#[derive(Debug, Clone)]
pub struct TerminalBroker {
    requests: mpsc::UnboundedSender<PendingInteraction>,
}

impl TerminalBroker {
    /// Broker plus the receiving end the UI loop polls
    #[must_use]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<PendingInteraction>) {
        let (requests, receiver) = mpsc::unbounded_channel();
        (Self { requests }, receiver)
    }
}

#[async_trait]
impl InteractionBroker for TerminalBroker {
    async fn request_interaction(&self, request: InteractionRequest) -> InteractionResult {
        let (reply, answer) = oneshot::channel();
        if self.requests.send(PendingInteraction { request, reply }).is_err() {
            tracing::warn!("terminal closed, declining interaction");
            return InteractionResult::declined();
        }
        answer.await.unwrap_or_else(|_| {
            tracing::warn!("interaction dropped without an answer");
            InteractionResult::declined()
        })
    }
}

struct ConsoleIo<R, W> {
    reader: R,
    writer: W,
}

/// Line-based broker for non-TUI use.
///
/// End of input counts as cancel.
pub struct ConsoleBroker<R, W> {
    io: Mutex<ConsoleIo<R, W>>,
}

impl ConsoleBroker<BufReader<tokio::io::Stdin>, tokio::io::Stdout> {
    /// Broker over the process's stdin and stdout
    #[must_use]
    pub fn stdio() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
    }
}

impl<R, W> ConsoleBroker<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    /// Broker over an arbitrary reader and writer
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            io: Mutex::new(ConsoleIo { reader, writer }),
        }
    }

    /// Give back the reader and writer
    pub fn into_inner(self) -> (R, W) {
        let io = self.io.into_inner();
        (io.reader, io.writer)
    }

    async fn ask(&self, prompt: &str) -> Option<String> {
        let mut io = self.io.lock().await;
        let io = &mut *io;
        if let Err(err) = async {
            io.writer.write_all(prompt.as_bytes()).await?;
            io.writer.flush().await
        }
        .await
        {
            tracing::warn!(error = %err, "could not write prompt");
            return None;
        }
        let mut line = String::new();
        match io.reader.read_line(&mut line).await {
            Ok(0) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
            Err(err) => {
                tracing::warn!(error = %err, "could not read answer");
                None
            }
        }
    }
}

impl<R, W> std::fmt::Debug for ConsoleBroker<R, W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleBroker").finish_non_exhaustive()
    }
}

#[async_trait]
impl<R, W> InteractionBroker for ConsoleBroker<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn request_interaction(&self, request: InteractionRequest) -> InteractionResult {
        let prompt = request.prompt_or_default();
        match request.kind_or_default() {
            InteractionKind::Confirmation => {
                let answer = self.ask(&format!("{prompt} [y/N]: ")).await;
                let accepted = answer
                    .as_deref()
                    .map(|a| matches!(a.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
                    .unwrap_or(false);
                interpret_confirmation(accepted)
            }
            InteractionKind::Input => interpret_input(self.ask(&format!("{prompt}: ")).await),
            InteractionKind::Selection => {
                let listing = numbered_choices(&request.choices);
                let answer = self
                    .ask(&format!("{prompt}\n\n{listing}\n\nEnter number: "))
                    .await;
                interpret_selection(&request.choices, answer.as_deref())
            }
        }
    }
}
