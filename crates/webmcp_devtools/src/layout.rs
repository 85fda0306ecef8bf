//! Screen areas for the harness.

use ratatui::layout::Rect;

/// Layout manager for calculating screen areas
#[derive(Debug, Clone)]
pub struct Layout {
    /// Header height
    header_height: u16,
    /// Status bar height
    status_height: u16,
    /// Tool list share of the width in detail mode (0-100)
    sidebar_percent: u16,
    /// Result panel height in detail mode
    result_height: u16,
}

impl Layout {
    /// Create a new layout
    #[must_use]
    pub fn new() -> Self {
        Self {
            header_height: 1,
            status_height: 1,
            sidebar_percent: 30,
            result_height: 8,
        }
    }

    /// Set the tool list share of the width
    #[must_use]
    pub fn with_sidebar_percent(mut self, percent: u16) -> Self {
        self.sidebar_percent = percent.min(100);
        self
    }

    /// Set the result panel height
    #[must_use]
    pub fn with_result_height(mut self, height: u16) -> Self {
        self.result_height = height;
        self
    }

    /// Split the screen into header, body and status bar.
    ///
    /// A minimized harness keeps only the header.
    #[must_use]
    pub fn calculate(&self, size: Rect, minimized: bool) -> CalculatedLayout {
        let header_height = self.header_height.min(size.height);
        let header_area = Rect {
            height: header_height,
            ..size
        };
        if minimized {
            let empty = Rect {
                y: size.y + header_height,
                height: 0,
                ..size
            };
            return CalculatedLayout {
                header_area,
                main_area: empty,
                status_area: empty,
            };
        }

        let rest = size.height.saturating_sub(header_height);
        let status_height = self.status_height.min(rest);
        let main_height = rest.saturating_sub(status_height);

        CalculatedLayout {
            header_area,
            main_area: Rect {
                x: size.x,
                y: size.y + header_height,
                width: size.width,
                height: main_height,
            },
            status_area: Rect {
                x: size.x,
                y: size.y + header_height + main_height,
                width: size.width,
                height: status_height,
            },
        }
    }

    /// Split horizontally into tool list and detail
    #[must_use]
    pub fn calculate_split(&self, area: Rect) -> SplitLayout {
        let sidebar_width = percent_of(area.width, self.sidebar_percent);

        SplitLayout {
            sidebar_area: Rect {
                width: sidebar_width,
                ..area
            },
            main_area: Rect {
                x: area.x + sidebar_width,
                width: area.width.saturating_sub(sidebar_width),
                ..area
            },
        }
    }

    /// Split the detail pane into form and result panel.
    ///
    /// The form keeps at least half the height.
    #[must_use]
    pub fn calculate_detail(&self, area: Rect) -> DetailLayout {
        let result_height = self.result_height.min(area.height / 2);
        let form_height = area.height.saturating_sub(result_height);

        DetailLayout {
            form_area: Rect {
                height: form_height,
                ..area
            },
            result_area: Rect {
                y: area.y + form_height,
                height: result_height,
                ..area
            },
        }
    }

    /// Box centered in `area` for overlays
    #[must_use]
    pub fn centered(&self, area: Rect, width_percent: u16, height: u16) -> Rect {
        let width = percent_of(area.width, width_percent);
        let height = height.min(area.height);
        Rect {
            x: area.x + (area.width - width) / 2,
            y: area.y + (area.height - height) / 2,
            width,
            height,
        }
    }
}

fn percent_of(total: u16, percent: u16) -> u16 {
    (u32::from(total) * u32::from(percent.min(100)) / 100) as u16
}

impl Default for Layout {
    fn default() -> Self {
        Self::new()
    }
}

/// Header, body and status areas
#[derive(Debug, Clone, Copy)]
pub struct CalculatedLayout {
    /// Title line with tool count and host kind
    pub header_area: Rect,
    /// Main content area
    pub main_area: Rect,
    /// Status bar area
    pub status_area: Rect,
}

/// Tool list beside the selected tool
#[derive(Debug, Clone, Copy)]
pub struct SplitLayout {
    /// Tool list area
    pub sidebar_area: Rect,
    /// Detail area
    pub main_area: Rect,
}

/// Form above the result panel
#[derive(Debug, Clone, Copy)]
pub struct DetailLayout {
    /// Form fields
    pub form_area: Rect,
    /// Last outcome
    pub result_area: Rect,
}
