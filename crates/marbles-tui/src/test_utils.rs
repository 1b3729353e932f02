//! Test utilities for marbles-tui rendering and interaction tests.
//!
//! This module provides helper functions for creating test terminals,
//! rendering screens, and converting buffers to strings for assertions.

use crate::app::App;
use crate::screens::Screen as ScreenTrait;
use marbles_engine::{Catalog, Config};
use ratatui::{backend::TestBackend, buffer::Buffer, layout::Rect, Terminal};

/// Default terminal width for tests.
pub const TEST_WIDTH: u16 = 80;

/// Default terminal height for tests.
pub const TEST_HEIGHT: u16 = 24;

/// Create a test terminal with the default dimensions (80x24).
pub fn create_test_terminal() -> Terminal<TestBackend> {
    let backend = TestBackend::new(TEST_WIDTH, TEST_HEIGHT);
    Terminal::new(backend).expect("Failed to create test terminal")
}

/// Create a test app over the built-in catalog, showing `map`.
pub fn create_test_app() -> App {
    App::new(Catalog::builtin(), &Config::default()).expect("built-in catalog starts")
}

/// Create a test app showing the demo of a given operator.
pub fn create_test_app_with_demo(operator: &str) -> App {
    let config = Config {
        initial_operator: Some(operator.to_string()),
        ..Config::default()
    };
    let app = App::new(Catalog::builtin(), &config).expect("built-in catalog starts");
    assert_eq!(app.current_demo().map(|demo| demo.name()), Some(operator));
    app
}

/// Convert a buffer to a string representation.
///
/// Trailing whitespace is trimmed from each line.
pub fn buffer_to_string(buffer: &Buffer) -> String {
    let area = buffer.area;
    let mut result = String::new();

    for y in area.y..area.y + area.height {
        for x in area.x..area.x + area.width {
            if let Some(cell) = buffer.cell((x, y)) {
                result.push_str(cell.symbol());
            }
        }
        while result.ends_with(' ') {
            result.pop();
        }
        result.push('\n');
    }

    if result.ends_with('\n') {
        result.pop();
    }

    result
}

/// Render a screen to a buffer and return it as a string.
pub fn render_screen_to_string<S: ScreenTrait>(screen: &S, app: &App) -> String {
    let area = Rect::new(0, 0, TEST_WIDTH, TEST_HEIGHT);
    let mut buffer = Buffer::empty(area);
    screen.render(app, area, &mut buffer);
    buffer_to_string(&buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screens::{diagram::DiagramScreen, render_help_overlay};

    #[test]
    fn test_create_test_terminal() {
        let terminal = create_test_terminal();
        let size = terminal.size().unwrap();
        assert_eq!(size.width, TEST_WIDTH);
        assert_eq!(size.height, TEST_HEIGHT);
    }

    #[test]
    fn test_create_test_app_with_demo() {
        let app = create_test_app_with_demo("flatMap");
        assert_eq!(app.session.sources().len(), 2);
    }

    #[test]
    fn test_buffer_to_string() {
        let area = Rect::new(0, 0, 10, 3);
        let mut buffer = Buffer::empty(area);
        buffer.set_string(0, 0, "Hello", ratatui::style::Style::default());
        buffer.set_string(0, 1, "World", ratatui::style::Style::default());

        assert_eq!(buffer_to_string(&buffer), "Hello\nWorld\n");
    }

    #[test]
    fn test_draw_with_help_overlay() {
        let mut terminal = create_test_terminal();
        let app = create_test_app();
        terminal
            .draw(|frame| {
                let area = frame.area();
                DiagramScreen.render(&app, area, frame.buffer_mut());
                render_help_overlay(area, frame.buffer_mut());
            })
            .unwrap();

        let text = buffer_to_string(terminal.backend().buffer());
        assert!(text.contains(" Help "));
        assert!(text.contains("Move marble in time"));
    }
}
