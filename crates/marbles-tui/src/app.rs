//! Application state and update logic for the marbles TUI.

use crate::diagram;
use crate::event::Action;
use crate::screens::diagram::DiagramLayout;
use crate::ui::contains;
use crate::ui::widgets::OperatorList;
use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use marbles_engine::{
    BindError, Catalog, Config, Demo, DemoSession, GraphError, TimedEvent, Timeline,
};
use ratatui::layout::Rect;
use std::cell::Cell;
use std::rc::Rc;
use tracing::debug;

/// Ticks a notification stays in the status bar.
const NOTIFICATION_TICKS: u32 = 8;

/// Which pane receives navigation keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Operators,
    Lanes,
}

/// Errors that prevent the UI from starting a demo.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("no operator demos to show")]
    EmptyCatalog,

    #[error(transparent)]
    Bind(#[from] BindError),

    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// Main application state.
#[derive(Debug)]
pub struct App {
    /// Whether the app should quit.
    pub should_quit: bool,

    /// Whether to show help overlay.
    pub show_help: bool,

    /// Pane receiving navigation keys.
    pub focus: Focus,

    /// Every demo that can be shown.
    pub catalog: Catalog,

    /// Position of the shown demo in the catalog.
    pub selected_demo: usize,

    /// Live graph of the shown demo.
    pub session: DemoSession,

    /// Source lane under the cursor.
    pub selected_lane: usize,

    /// Event under the cursor, by position in the selected lane.
    pub selected_event: usize,

    /// Time step for keyboard moves.
    pub nudge_step: f64,

    /// Transient message for the status bar.
    pub notification: Option<String>,

    notification_ttl: u32,

    /// Result recomputations published since the demo was loaded.
    updates: Rc<Cell<usize>>,

    /// Lane whose marble follows the mouse.
    dragging: Option<usize>,
}

impl App {
    /// Create a new app instance.
    pub fn new(catalog: Catalog, config: &Config) -> Result<Self, AppError> {
        let selected_demo = config
            .initial_operator
            .as_deref()
            .and_then(|name| catalog.position(name))
            .unwrap_or(0);
        let updates = Rc::new(Cell::new(0));
        let session = start_session(&catalog, selected_demo, &updates)?;

        Ok(Self {
            should_quit: false,
            show_help: false,
            focus: Focus::default(),
            catalog,
            selected_demo,
            session,
            selected_lane: 0,
            selected_event: 0,
            nudge_step: config.nudge_step,
            notification: None,
            notification_ttl: 0,
            updates,
            dragging: None,
        })
    }

    /// The demo being shown.
    pub fn current_demo(&self) -> Option<&Demo> {
        self.catalog.get(self.selected_demo)
    }

    /// Result recomputations since the demo was loaded.
    pub fn updates(&self) -> usize {
        self.updates.get()
    }

    /// Show a transient message in the status bar.
    pub fn notify(&mut self, message: impl Into<String>) {
        self.notification = Some(message.into());
        self.notification_ttl = NOTIFICATION_TICKS;
    }

    /// Advance timers.
    pub fn tick(&mut self) {
        if self.notification_ttl > 0 {
            self.notification_ttl -= 1;
            if self.notification_ttl == 0 {
                self.notification = None;
            }
        }
    }

    /// Handle an action.
    pub fn handle_action(&mut self, action: Action) {
        // Global actions
        match action {
            Action::Quit => {
                if self.show_help {
                    self.show_help = false;
                } else {
                    self.should_quit = true;
                }
                return;
            }
            Action::Help => {
                self.show_help = !self.show_help;
                return;
            }
            _ => {}
        }

        // If help is showing, any key closes it
        if self.show_help {
            self.show_help = false;
            return;
        }

        match self.focus {
            Focus::Operators => self.handle_operators_action(action),
            Focus::Lanes => self.handle_lanes_action(action),
        }
    }

    fn handle_operators_action(&mut self, action: Action) {
        match action {
            Action::Up => {
                if self.selected_demo > 0 {
                    self.select_demo(self.selected_demo - 1);
                }
            }
            Action::Down => {
                if self.selected_demo + 1 < self.catalog.len() {
                    self.select_demo(self.selected_demo + 1);
                }
            }
            Action::Select | Action::ToggleFocus | Action::Right => {
                self.focus = Focus::Lanes;
                self.clamp_selection();
            }
            Action::Reset => self.reset(),
            _ => {}
        }
    }

    fn handle_lanes_action(&mut self, action: Action) {
        match action {
            Action::Back | Action::ToggleFocus => {
                self.focus = Focus::Operators;
                self.dragging = None;
            }
            Action::Up => {
                if self.selected_lane > 0 {
                    self.selected_lane -= 1;
                    self.clamp_selection();
                }
            }
            Action::Down => {
                if self.selected_lane + 1 < self.session.sources().len() {
                    self.selected_lane += 1;
                    self.clamp_selection();
                }
            }
            Action::Left => {
                self.selected_event = self.selected_event.saturating_sub(1);
            }
            Action::Right => {
                if self.selected_event + 1 < self.lane_len() {
                    self.selected_event += 1;
                }
            }
            Action::NudgeLeft => self.nudge(-self.nudge_step),
            Action::NudgeRight => self.nudge(self.nudge_step),
            Action::Reset => self.reset(),
            _ => {}
        }
    }

    /// Show the demo at a catalog position, starting from its seeds.
    pub fn select_demo(&mut self, index: usize) {
        match start_session(&self.catalog, index, &self.updates) {
            Ok(session) => {
                self.session = session;
                self.selected_demo = index;
                self.selected_lane = 0;
                self.selected_event = 0;
                self.dragging = None;
                debug!(operator = self.session_name(), "loaded demo");
            }
            Err(err) => self.notify(err.to_string()),
        }
    }

    /// Restore the seeds of the shown demo.
    pub fn reset(&mut self) {
        let lane = self.selected_lane;
        self.select_demo(self.selected_demo);
        self.selected_lane = lane.min(self.session.sources().len().saturating_sub(1));
        self.notify("Reset");
    }

    /// Timeline of the selected source lane.
    pub fn selected_timeline(&self) -> Option<&Timeline<String>> {
        self.session.source_timeline(self.selected_lane)
    }

    /// Time of the event under the cursor.
    pub fn selected_time(&self) -> Option<f64> {
        self.selected_timeline()?
            .events()
            .get(self.selected_event)
            .map(TimedEvent::time)
    }

    /// Move the event under the cursor, keeping the cursor on it.
    pub fn move_selected(&mut self, time: f64) {
        let Some(id) = self
            .selected_timeline()
            .and_then(|timeline| timeline.events().get(self.selected_event))
            .map(TimedEvent::id)
        else {
            return;
        };
        if !self.session.move_event(self.selected_lane, id, time) {
            return;
        }
        match self
            .selected_timeline()
            .and_then(|timeline| timeline.events().iter().position(|event| event.id() == id))
        {
            Some(position) => self.selected_event = position,
            None => self.clamp_selection(),
        }
    }

    fn nudge(&mut self, delta: f64) {
        if let Some(time) = self.selected_time() {
            self.move_selected(time + delta);
        }
    }

    /// Handle a mouse event against the screen area it was reported in.
    pub fn handle_mouse(&mut self, mouse: MouseEvent, area: Rect) {
        let layout = DiagramLayout::new(area, self.session.sources().len());
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => self.press(&layout, mouse.column, mouse.row),
            MouseEventKind::Drag(MouseButton::Left) => {
                let Some(lane) = self.dragging.and_then(|index| layout.sources.get(index)) else {
                    return;
                };
                let width = usize::from(lane.lane.width);
                let time = diagram::column_to_time(lane_column(lane.lane, mouse.column), width);
                self.move_selected(time);
            }
            MouseEventKind::Up(MouseButton::Left) => self.dragging = None,
            MouseEventKind::ScrollUp => self.handle_action(Action::Up),
            MouseEventKind::ScrollDown => self.handle_action(Action::Down),
            _ => {}
        }
    }

    fn press(&mut self, layout: &DiagramLayout, column: u16, row: u16) {
        if contains(layout.list, column, row) {
            self.focus = Focus::Operators;
            if let Some(index) =
                OperatorList::row_at(layout.list, self.catalog.len(), self.selected_demo, row)
            {
                if index != self.selected_demo {
                    self.select_demo(index);
                }
            }
            return;
        }

        let Some((index, lane)) = layout
            .sources
            .iter()
            .enumerate()
            .find(|(_, lane)| contains(lane.block, column, row))
        else {
            return;
        };
        self.focus = Focus::Lanes;
        self.selected_lane = index;
        let width = usize::from(lane.lane.width);
        let nearest = self.selected_timeline().and_then(|timeline| {
            let placements = diagram::place(timeline, width);
            diagram::nearest(&placements, lane_column(lane.lane, column)).map(|p| p.index)
        });
        match nearest {
            Some(event) => {
                self.selected_event = event;
                self.dragging = Some(index);
            }
            None => self.clamp_selection(),
        }
    }

    fn lane_len(&self) -> usize {
        self.selected_timeline().map_or(0, Timeline::len)
    }

    fn clamp_selection(&mut self) {
        self.selected_event = self.selected_event.min(self.lane_len().saturating_sub(1));
    }

    fn session_name(&self) -> &'static str {
        self.current_demo().map_or("", Demo::name)
    }
}

/// Column inside a lane, clamped to its width.
fn lane_column(lane: Rect, column: u16) -> usize {
    usize::from(column.saturating_sub(lane.x)).min(usize::from(lane.width).saturating_sub(1))
}

/// Instantiate a demo and count the recomputations of its result.
fn start_session(
    catalog: &Catalog,
    index: usize,
    updates: &Rc<Cell<usize>>,
) -> Result<DemoSession, AppError> {
    let demo = catalog.get(index).ok_or(AppError::EmptyCatalog)?;
    let mut session = demo.instantiate()?;
    let result = session.result();
    let counter = Rc::clone(updates);
    session
        .graph_mut()
        .subscribe(result, move |_| counter.set(counter.get() + 1))?;
    updates.set(0);
    Ok(session)
}
