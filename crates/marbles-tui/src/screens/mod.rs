//! Screen definitions for the marbles TUI.

pub mod diagram;

use crate::app::App;
use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};

/// Trait for screens that can be rendered.
pub trait Screen {
    /// Render the screen to the buffer.
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer);
}

/// Render the help overlay.
pub fn render_help_overlay(area: Rect, buf: &mut Buffer) {
    use crate::ui::centered_fixed;
    use crate::ui::theme::Styles;
    use ratatui::widgets::{Block, Borders, Clear, Paragraph};

    let help_text = r"
  Operators
    j/k or Up/Down    Select operator
    Tab / Enter       Edit the source lanes

  Lanes
    j/k or Up/Down    Select lane
    h/l or Left/Right Select marble
    H/L or </>        Move marble in time
    Mouse drag        Move marble in time
    r                 Reset demo
    Esc / Tab         Back to operators

    q                 Quit
    ?                 Toggle this help

  [Press any key to close]
";

    let width = 52.min(area.width.saturating_sub(4));
    let height = 21.min(area.height.saturating_sub(2));
    let overlay_area = centered_fixed(width, height, area);

    Clear.render(overlay_area, buf);

    let block = Block::default()
        .title(" Help ")
        .title_style(Styles::title())
        .borders(Borders::ALL)
        .border_style(Styles::border_active())
        .style(Styles::default());

    Paragraph::new(help_text)
        .block(block)
        .style(Styles::default())
        .render(overlay_area, buf);
}
