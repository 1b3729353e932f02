//! Operator list widget.

use crate::ui::theme::Styles;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// Bordered list of operator names with one selected.
#[derive(Debug, Clone)]
pub struct OperatorList<'a> {
    names: Vec<&'a str>,
    selected: usize,
    focused: bool,
}

impl<'a> OperatorList<'a> {
    /// Create a list.
    pub fn new(names: Vec<&'a str>, selected: usize) -> Self {
        Self {
            names,
            selected,
            focused: false,
        }
    }

    /// Draw with the active border.
    #[must_use]
    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    /// Index of the operator drawn on a terminal row, if any.
    pub fn row_at(area: Rect, len: usize, selected: usize, row: u16) -> Option<usize> {
        let inner = Self::block(false).inner(area);
        if row < inner.y || row >= inner.y.saturating_add(inner.height) {
            return None;
        }
        let index = scroll_offset(selected, inner.height) + usize::from(row - inner.y);
        (index < len).then_some(index)
    }

    fn block(focused: bool) -> Block<'static> {
        Block::default()
            .title(" Operators ")
            .title_style(Styles::title())
            .borders(Borders::ALL)
            .border_style(if focused {
                Styles::border_active()
            } else {
                Styles::border()
            })
            .style(Styles::default())
    }
}

/// First visible row so the selection stays on screen.
fn scroll_offset(selected: usize, height: u16) -> usize {
    let height = usize::from(height).max(1);
    (selected + 1).saturating_sub(height)
}

impl Widget for OperatorList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Self::block(self.focused);
        let inner = block.inner(area);
        block.render(area, buf);

        let offset = scroll_offset(self.selected, inner.height);
        let lines: Vec<Line> = self
            .names
            .iter()
            .enumerate()
            .skip(offset)
            .map(|(index, name)| {
                if index == self.selected {
                    Line::from(Span::styled(format!("> {name}"), Styles::highlight()))
                } else {
                    Line::from(Span::styled(format!("  {name}"), Styles::default()))
                }
            })
            .collect();
        Paragraph::new(lines).render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::buffer_to_string;

    #[test]
    fn test_render_marks_selection() {
        let area = Rect::new(0, 0, 20, 5);
        let mut buf = Buffer::empty(area);
        OperatorList::new(vec!["map", "filter", "zip"], 1).render(area, &mut buf);

        let text = buffer_to_string(&buf);
        assert!(text.contains("│  map"));
        assert!(text.contains("│> filter"));
        assert!(text.contains("│  zip"));
    }

    #[test]
    fn test_row_at() {
        let area = Rect::new(0, 0, 20, 5);
        assert_eq!(OperatorList::row_at(area, 3, 0, 0), None);
        assert_eq!(OperatorList::row_at(area, 3, 0, 1), Some(0));
        assert_eq!(OperatorList::row_at(area, 3, 0, 3), Some(2));
        assert_eq!(OperatorList::row_at(area, 3, 0, 4), None);
    }

    #[test]
    fn test_scroll_offset_keeps_selection_visible() {
        assert_eq!(scroll_offset(0, 3), 0);
        assert_eq!(scroll_offset(2, 3), 0);
        assert_eq!(scroll_offset(5, 3), 3);
    }
}
