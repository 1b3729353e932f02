//! Diagram screen - operator list on the left, marble lanes on the right.
//!
//! Each source gets its own editable lane, followed by the operator
//! description and the read-only result lane.

use crate::app::{App, Focus};
use crate::screens::Screen;
use crate::ui::main_layout;
use crate::ui::theme::Styles;
use crate::ui::widgets::{KeyHint, Lane, OperatorList, StatusBar};
use marbles_engine::Demo;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    widgets::{Block, Borders, Padding, Paragraph, Widget, Wrap},
};

/// Width of the operator list column.
const LIST_WIDTH: u16 = 24;

/// A bordered lane and the single row its marbles are drawn on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaneArea {
    pub block: Rect,
    pub lane: Rect,
}

/// Where every part of the diagram screen goes.
///
/// Shared by rendering and mouse hit-testing so both agree on columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramLayout {
    pub list: Rect,
    pub detail: Rect,
    pub sources: Vec<LaneArea>,
    pub description: Rect,
    pub result: LaneArea,
    pub status: Rect,
}

impl DiagramLayout {
    /// Compute the layout for a demo with `source_count` sources.
    pub fn new(area: Rect, source_count: usize) -> Self {
        let (main_area, status) = main_layout(area);
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(LIST_WIDTH), Constraint::Min(20)])
            .split(main_area);
        let detail = columns[1];

        let mut constraints = vec![Constraint::Length(3); source_count];
        constraints.extend([
            Constraint::Length(2), // description
            Constraint::Length(3), // result
            Constraint::Min(0),
        ]);
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(detail_block("").inner(detail));

        let lane_area = |block: Rect| LaneArea {
            block,
            lane: lane_block(String::new(), false).inner(block),
        };

        Self {
            list: columns[0],
            detail,
            sources: rows[..source_count].iter().copied().map(lane_area).collect(),
            description: rows[source_count],
            result: lane_area(rows[source_count + 1]),
            status,
        }
    }
}

fn detail_block(title: &str) -> Block<'static> {
    Block::default()
        .title(format!(" {title} "))
        .title_style(Styles::title())
        .borders(Borders::ALL)
        .border_style(Styles::border())
        .style(Styles::default())
}

fn lane_block(title: String, active: bool) -> Block<'static> {
    Block::default()
        .title(title)
        .title_style(if active { Styles::highlight() } else { Styles::dim() })
        .borders(Borders::ALL)
        .border_style(if active {
            Styles::border_active()
        } else {
            Styles::border()
        })
        .padding(Padding::horizontal(1))
        .style(Styles::default())
}

/// The main screen.
pub struct DiagramScreen;

impl Screen for DiagramScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        let session = &app.session;
        let layout = DiagramLayout::new(area, session.sources().len());
        let demo = app.current_demo();

        let names = app.catalog.demos().iter().map(Demo::name).collect();
        OperatorList::new(names, app.selected_demo)
            .focused(app.focus == Focus::Operators)
            .render(layout.list, buf);

        detail_block(demo.map_or("", Demo::name)).render(layout.detail, buf);

        for (index, lane) in layout.sources.iter().enumerate() {
            let active = app.focus == Focus::Lanes && app.selected_lane == index;
            lane_block(format!(" Source {} ", index + 1), active).render(lane.block, buf);
            if let Some(timeline) = session.source_timeline(index) {
                Lane::new(timeline)
                    .selected(active.then_some(app.selected_event))
                    .render(lane.lane, buf);
            }
        }

        Paragraph::new(demo.map_or("", Demo::description))
            .style(Styles::dim())
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(layout.description, buf);

        lane_block(" Result ".to_string(), false).render(layout.result.block, buf);
        if let Some(timeline) = session.result_timeline() {
            Lane::new(timeline).result().render(layout.result.lane, buf);
        }

        let hints = match app.focus {
            Focus::Operators => vec![
                KeyHint::new("j/k", "Operator"),
                KeyHint::new("Tab", "Edit"),
                KeyHint::new("?", "Help"),
                KeyHint::new("q", "Quit"),
            ],
            Focus::Lanes => vec![
                KeyHint::new("h/l", "Marble"),
                KeyHint::new("H/L", "Move"),
                KeyHint::new("r", "Reset"),
                KeyHint::new("Tab", "Operators"),
            ],
        };
        let updates = format!("{} updates", app.updates());
        let right = app.notification.as_deref().unwrap_or(&updates);
        StatusBar::new(demo.map_or("marbles", Demo::name))
            .hints(hints)
            .right(right)
            .render(layout.status, buf);
    }
}
