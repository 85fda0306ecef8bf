//! Views over harness snapshots.
//!
//! Views borrow what they show and draw it; they hold no state of their own.

use crate::form::{Control, FormState};
use crate::harness::LastResult;
use crate::renderer::Renderer;
use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Clear, List, ListItem, Paragraph, Wrap},
};
use webmcp_core::interaction::numbered_choices;
use webmcp_tool::{HostKind, InteractionKind, InteractionRequest, ToolContract};

/// Something that draws into an area
pub trait View {
    /// Render the view
    fn render(&self, f: &mut Frame, area: Rect, renderer: &Renderer);
}

/// Title line with the tool count and serving host
#[derive(Debug, Clone, Copy)]
pub struct HeaderView {
    /// Tools on the active host
    pub tool_count: usize,
    /// Host serving the list
    pub host_kind: HostKind,
    /// Whether the body is hidden
    pub minimized: bool,
}

impl View for HeaderView {
    fn render(&self, f: &mut Frame, area: Rect, renderer: &Renderer) {
        let plural = if self.tool_count == 1 { "" } else { "s" };
        let mut spans = vec![
            Span::styled("webmcp devtools", renderer.bold(Default::default())),
            Span::raw(format!("  {} tool{plural}", self.tool_count)),
            Span::styled(format!("  [{}]", self.host_kind), renderer.dim()),
        ];
        if self.minimized {
            spans.push(Span::styled("  (minimized, m to expand)", renderer.dim()));
        }
        f.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

/// Registered tools, one per row
#[derive(Debug, Clone, Copy)]
pub struct ToolListView<'a> {
    /// Live tool list
    pub tools: &'a [ToolContract],
    /// Highlighted row
    pub cursor: usize,
    /// Name of the selected tool, marked in the list
    pub active: Option<&'a str>,
}

impl View for ToolListView<'_> {
    fn render(&self, f: &mut Frame, area: Rect, renderer: &Renderer) {
        let block = renderer.block("Tools");
        if self.tools.is_empty() {
            let empty = Paragraph::new(vec![
                Line::from("No tools registered"),
                Line::from(Span::styled(
                    "Register a tool to see it here",
                    renderer.dim(),
                )),
            ])
            .block(block)
            .wrap(Wrap { trim: false });
            f.render_widget(empty, area);
            return;
        }

        let items: Vec<ListItem> = self
            .tools
            .iter()
            .enumerate()
            .map(|(i, tool)| {
                let marker = if self.active == Some(tool.name()) { "> " } else { "  " };
                let line = Line::from(vec![
                    Span::raw(format!("{marker}{}", tool.name())),
                    Span::styled(format!("  {}", tool.description()), renderer.dim()),
                ]);
                let item = ListItem::new(line);
                if i == self.cursor {
                    item.style(renderer.highlight())
                } else {
                    item
                }
            })
            .collect();

        f.render_widget(List::new(items).block(block), area);
    }
}

/// Selected tool's description, annotations and form
#[derive(Debug, Clone, Copy)]
pub struct DetailView<'a> {
    /// Selected tool
    pub tool: &'a ToolContract,
    /// Its form
    pub form: &'a FormState,
    /// Focused field is being typed into
    pub editing: bool,
    /// Form is disabled while a call is in flight
    pub executing: bool,
}

impl View for DetailView<'_> {
    fn render(&self, f: &mut Frame, area: Rect, renderer: &Renderer) {
        let mut lines = vec![Line::from(self.tool.description().to_string())];

        let annotations = self.tool.annotations();
        if !annotations.is_empty() {
            let hints: Vec<String> = annotations
                .iter()
                .map(|(key, value)| format!("{key}: {value}"))
                .collect();
            lines.push(Line::from(Span::styled(hints.join("  "), renderer.dim())));
        }
        lines.push(Line::from(""));

        if self.form.is_empty() {
            lines.push(Line::from(Span::styled("No input fields", renderer.dim())));
        }
        for (i, field) in self.form.fields().iter().enumerate() {
            let focused = i == self.form.focus() && !self.executing;
            let required = if field.schema.required { "*" } else { "" };
            lines.push(Line::from(vec![
                Span::styled(
                    format!("{}{required}", field.schema.name),
                    renderer.bold(Default::default()),
                ),
                Span::styled(format!(" ({})", field.control.kind_label()), renderer.dim()),
            ]));

            let mut shown = field.control.display();
            if focused && self.editing {
                shown.push('_');
            }
            if let Control::Choice { options, .. } = &field.control {
                shown = format!("{shown}  <{} options, space to cycle>", options.len());
            }
            let value = Span::raw(format!("  {shown}"));
            lines.push(if focused {
                Line::from(value).style(renderer.highlight())
            } else {
                Line::from(value)
            });

            if let Some(description) = &field.schema.description {
                lines.push(Line::from(Span::styled(
                    format!("  {description}"),
                    renderer.dim(),
                )));
            }
        }

        lines.push(Line::from(""));
        lines.push(if self.executing {
            Line::from(Span::styled("Executing...", renderer.busy()))
        } else {
            Line::from(Span::styled("[s] Execute", renderer.bold(Default::default())))
        });

        let paragraph = Paragraph::new(lines)
            .block(renderer.block(self.tool.name()))
            .wrap(Wrap { trim: false });
        f.render_widget(paragraph, area);
    }
}

/// Last outcome, or the in-flight indicator
#[derive(Debug, Clone, Copy)]
pub struct ResultView<'a> {
    /// Last completed outcome
    pub last: Option<&'a LastResult>,
    /// Milliseconds since submit while a call is in flight
    pub running_ms: Option<u64>,
}

impl View for ResultView<'_> {
    fn render(&self, f: &mut Frame, area: Rect, renderer: &Renderer) {
        let lines = match (self.running_ms, self.last) {
            (Some(ms), _) => vec![Line::from(Span::styled(
                format!("Executing... {ms} ms"),
                renderer.busy(),
            ))],
            (None, Some(last)) => {
                let is_error = last.result.is_error();
                let status = if is_error { "Error" } else { "Success" };
                let mut lines = vec![Line::from(vec![
                    Span::styled(status, renderer.outcome(is_error)),
                    Span::styled(format!("  {} ms", last.elapsed_ms), renderer.dim()),
                ])];
                lines.extend(
                    last.result
                        .to_display_text()
                        .lines()
                        .map(|l| Line::from(l.to_string())),
                );
                lines
            }
            (None, None) => vec![Line::from(Span::styled(
                "No result yet",
                renderer.dim(),
            ))],
        };
        let paragraph = Paragraph::new(lines)
            .block(renderer.block("Result"))
            .wrap(Wrap { trim: false });
        f.render_widget(paragraph, area);
    }
}

/// Prompt for a pending interaction, drawn over everything else
#[derive(Debug, Clone, Copy)]
pub struct ModalView<'a> {
    /// What the handler asked
    pub request: &'a InteractionRequest,
    /// Text typed so far
    pub buffer: &'a str,
}

impl View for ModalView<'_> {
    fn render(&self, f: &mut Frame, area: Rect, renderer: &Renderer) {
        let kind = self.request.kind_or_default();
        let title = match kind {
            InteractionKind::Confirmation => "Confirm",
            InteractionKind::Input => "Input",
            InteractionKind::Selection => "Select",
        };
        let mut lines = vec![
            Line::from(self.request.prompt_or_default().to_string()),
            Line::from(""),
        ];
        match kind {
            InteractionKind::Confirmation => {
                lines.push(Line::from("[y] Yes   [n] No"));
            }
            InteractionKind::Input | InteractionKind::Selection => {
                if kind == InteractionKind::Selection {
                    lines.extend(
                        numbered_choices(&self.request.choices)
                            .lines()
                            .map(|l| Line::from(l.to_string())),
                    );
                    lines.push(Line::from(""));
                    lines.push(Line::from("Enter number:"));
                }
                lines.push(Line::from(Span::styled(
                    format!("> {}_", self.buffer),
                    renderer.highlight(),
                )));
                lines.push(Line::from(Span::styled(
                    "Enter to submit, Esc to cancel",
                    renderer.dim(),
                )));
            }
        }
        f.render_widget(Clear, area);
        let paragraph = Paragraph::new(lines)
            .block(renderer.block(title))
            .wrap(Wrap { trim: false });
        f.render_widget(paragraph, area);
    }
}

/// Key reference overlay
#[derive(Debug, Clone, Copy, Default)]
pub struct HelpView;

impl HelpView {
    const LINES: [&'static str; 13] = [
        "j/k, arrows  move",
        "Enter        select tool / edit field / finish edit",
        "Tab          next field",
        "Shift-Tab    previous field",
        "Space        toggle or cycle choice",
        "s            execute",
        "Esc          back to the list",
        "Backspace    back (list) / delete (editing)",
        "m            minimize",
        "?            this help",
        "q, Ctrl-C    quit",
        "",
        "Prompts: y/n to confirm, type and Enter otherwise",
    ];

    /// Rows the overlay needs including borders
    #[must_use]
    pub fn height() -> u16 {
        Self::LINES.len() as u16 + 2
    }
}

impl View for HelpView {
    fn render(&self, f: &mut Frame, area: Rect, renderer: &Renderer) {
        let lines: Vec<Line> = Self::LINES.iter().map(|l| Line::from(*l)).collect();
        f.render_widget(Clear, area);
        f.render_widget(Paragraph::new(lines).block(renderer.block("Help")), area);
    }
}
