//! marbles-tui: Terminal UI for marble diagrams
//!
//! This crate provides the interactive layer over `marbles-engine`, including:
//! - Operator list and one marble lane per source and result
//! - Keyboard and mouse editing of event times
//! - Plain-text diagram rendering shared with the CLI

mod app;
pub mod diagram;
mod event;
mod screens;
#[cfg(test)]
pub mod test_utils;
mod ui;

use screens::Screen as ScreenTrait;

pub use app::{App, AppError, Focus};
pub use event::{Action, Event, EventHandler};
pub use marbles_engine;

use crossterm::{
    cursor::Show as ShowCursor,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use marbles_engine::{Catalog, Config};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use std::io::{self, stdout};

/// RAII guard for terminal state restoration.
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(stdout(), DisableMouseCapture, LeaveAlternateScreen, ShowCursor);
    }
}

/// Run the TUI application.
///
/// This is the main entry point for the TUI. It sets up the terminal,
/// runs the event loop, and restores the terminal on exit.
pub fn run_tui(catalog: Catalog, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let mut app = App::new(catalog, config)?;

    // Setup terminal with RAII guard for cleanup
    enable_raw_mode()?;
    let _guard = TerminalGuard;

    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // 4 Hz tick rate = 250ms
    let events = EventHandler::new(250);

    let result = run_loop(&mut terminal, &mut app, events);

    // Restore cursor before guard drops
    terminal.show_cursor()?;

    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: EventHandler,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| {
            let area = frame.area();
            let buf = frame.buffer_mut();
            screens::diagram::DiagramScreen.render(app, area, buf);
            if app.show_help {
                screens::render_help_overlay(area, buf);
            }
        })?;

        match events.next()? {
            Event::Key(key) => app.handle_action(event::key_to_action(key)),
            Event::Mouse(mouse) => {
                let size = terminal.size()?;
                app.handle_mouse(mouse, Rect::new(0, 0, size.width, size.height));
            }
            Event::Tick => app.tick(),
            // Terminal will handle resize automatically
            Event::Resize(_, _) => {}
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Get the TUI version.
pub fn tui_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
