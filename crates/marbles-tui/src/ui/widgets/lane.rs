//! Marble lane widget.
//!
//! Draws one timeline on a single row, using the same column mapping as the
//! text diagrams so mouse columns translate back to times exactly.

use crate::diagram;
use crate::ui::theme::Styles;
use marbles_engine::Timeline;
use ratatui::{buffer::Buffer, layout::Rect, style::Style, widgets::Widget};

const BASELINE: &str = "─";

/// One timeline drawn as marbles over a baseline.
#[derive(Debug, Clone)]
pub struct Lane<'a> {
    timeline: &'a Timeline<String>,
    selected: Option<usize>,
    marble_style: Style,
}

impl<'a> Lane<'a> {
    /// Create a lane for a source timeline.
    pub fn new(timeline: &'a Timeline<String>) -> Self {
        Self {
            timeline,
            selected: None,
            marble_style: Styles::marble(),
        }
    }

    /// Highlight the event at this position.
    #[must_use]
    pub fn selected(mut self, index: Option<usize>) -> Self {
        self.selected = index;
        self
    }

    /// Draw marbles in the result color.
    #[must_use]
    pub fn result(mut self) -> Self {
        self.marble_style = Styles::result_marble();
        self
    }
}

impl Widget for Lane<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        for x in area.x..area.x.saturating_add(area.width) {
            buf[(x, area.y)]
                .set_symbol(BASELINE)
                .set_style(Styles::baseline());
        }

        let width = usize::from(area.width);
        for placement in diagram::place(self.timeline, width) {
            let style = if self.selected == Some(placement.index) {
                Styles::selected()
            } else if placement.label == diagram::FAILED && placement.terminal {
                Styles::failed()
            } else if placement.terminal {
                Styles::finished()
            } else {
                self.marble_style
            };
            let Ok(offset) = u16::try_from(placement.column) else {
                continue;
            };
            buf.set_stringn(
                area.x + offset,
                area.y,
                &placement.label,
                width - placement.column,
                style,
            );
        }
    }
}
