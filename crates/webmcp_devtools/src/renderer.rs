//! Styling and frame helpers shared by the views.

use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
};
use serde::{Deserialize, Serialize};
use std::io;

/// Renderer for TUI frames
#[derive(Debug, Clone)]
pub struct Renderer {
    config: RenderConfig,
    frame_count: usize,
}

impl Renderer {
    /// Create a new renderer
    #[must_use]
    pub fn new(config: RenderConfig) -> Self {
        Self {
            config,
            frame_count: 0,
        }
    }

    /// Get the configuration
    #[must_use]
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Bordered block with a title
    #[must_use]
    pub fn block<'a>(&self, title: impl Into<String>) -> Block<'a> {
        Block::default()
            .title(format!(" {} ", title.into()))
            .borders(Borders::ALL)
            .border_type(self.config.border_type())
            .border_style(self.config.border_style())
    }

    /// Style of the highlighted row or field
    #[must_use]
    pub fn highlight(&self) -> Style {
        let style = if self.config.enable_colors {
            Style::default().bg(Color::Blue)
        } else {
            Style::default().add_modifier(Modifier::REVERSED)
        };
        self.bold(style)
    }

    /// Style for secondary text such as descriptions
    #[must_use]
    pub fn dim(&self) -> Style {
        if self.config.enable_colors {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        }
    }

    /// Style for outcome text
    #[must_use]
    pub fn outcome(&self, is_error: bool) -> Style {
        if !self.config.enable_colors {
            return self.bold(Style::default());
        }
        let color = if is_error { Color::Red } else { Color::Green };
        self.bold(Style::default().fg(color))
    }

    /// Style for in-progress markers
    #[must_use]
    pub fn busy(&self) -> Style {
        if !self.config.enable_colors {
            return Style::default();
        }
        Style::default().fg(Color::Yellow)
    }

    /// Apply bold when enabled
    #[must_use]
    pub fn bold(&self, style: Style) -> Style {
        if self.config.enable_bold {
            style.add_modifier(Modifier::BOLD)
        } else {
            style
        }
    }

    /// Render a status message
    pub fn render_status(&self, f: &mut Frame, area: Rect, message: &str) {
        let style = self.bold(Style::default().fg(self.config.status_color()));
        let paragraph = Paragraph::new(message.to_string())
            .style(style)
            .wrap(Wrap { trim: false });
        f.render_widget(paragraph, area);
    }

    /// Increment frame counter
    pub fn tick(&mut self) {
        self.frame_count += 1;
    }

    /// Get frame count
    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.frame_count
    }
}

/// Render configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Border style
    pub border_style: BorderStyle,
    /// Status color
    pub status_color: StatusColor,
    /// Enable colors
    pub enable_colors: bool,
    /// Enable bold text
    pub enable_bold: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            border_style: BorderStyle::default(),
            status_color: StatusColor::default(),
            enable_colors: true,
            enable_bold: true,
        }
    }
}

impl RenderConfig {
    /// Create a minimal config (no colors, no bold)
    #[must_use]
    pub fn minimal() -> Self {
        Self {
            border_style: BorderStyle::Plain,
            status_color: StatusColor::White,
            enable_colors: false,
            enable_bold: false,
        }
    }

    /// Create a high-contrast config
    #[must_use]
    pub fn high_contrast() -> Self {
        Self {
            border_style: BorderStyle::Double,
            status_color: StatusColor::Yellow,
            enable_colors: true,
            enable_bold: true,
        }
    }

    /// Border line set
    #[must_use]
    pub fn border_type(&self) -> BorderType {
        match self.border_style {
            BorderStyle::Plain => BorderType::Plain,
            BorderStyle::Rounded => BorderType::Rounded,
            BorderStyle::Double => BorderType::Double,
            BorderStyle::Thick => BorderType::Thick,
        }
    }

    /// Border color and weight
    #[must_use]
    pub fn border_style(&self) -> Style {
        if !self.enable_colors {
            return Style::default();
        }
        let color = match self.border_style {
            BorderStyle::Plain => Color::White,
            BorderStyle::Rounded => Color::Cyan,
            BorderStyle::Double => Color::Blue,
            BorderStyle::Thick => Color::Green,
        };
        Style::default().fg(color)
    }

    /// Get the status color
    #[must_use]
    pub fn status_color(&self) -> Color {
        if !self.enable_colors {
            return Color::White;
        }

        match self.status_color {
            StatusColor::White => Color::White,
            StatusColor::Cyan => Color::Cyan,
            StatusColor::Yellow => Color::Yellow,
            StatusColor::Green => Color::Green,
            StatusColor::Magenta => Color::Magenta,
        }
    }
}

/// Border style
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BorderStyle {
    /// Plain borders
    Plain,
    /// Rounded borders
    #[default]
    Rounded,
    /// Double borders
    Double,
    /// Thick borders
    Thick,
}

/// Status color
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusColor {
    /// White
    White,
    /// Cyan
    #[default]
    Cyan,
    /// Yellow
    Yellow,
    /// Green
    Green,
    /// Magenta
    Magenta,
}

/// Render-related errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    /// IO error
    #[error("IO error: {0}")]
    Io(String),
    /// Frame could not be drawn
    #[error("draw failed: {0}")]
    Draw(String),
}

impl From<io::Error> for RenderError {
    fn from(err: io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Terminal over stdout
pub type StdoutTerminal = Terminal<CrosstermBackend<io::Stdout>>;

/// Create a new terminal
///
/// # Errors
///
/// Returns error if terminal creation fails
pub fn create_terminal() -> Result<StdoutTerminal, RenderError> {
    let backend = CrosstermBackend::new(io::stdout());
    Terminal::new(backend).map_err(|e| RenderError::Io(e.to_string()))
}
