//! Plain-text marble diagrams.
//!
//! A lane is `width` columns wide. An event at time `t` is placed at column
//! `round(t * (width - 1))`, so time 0 is the first column and time 1 the
//! last. Output events show their value, `Finished` shows `|` and `Failed`
//! shows `X`, over a `-` baseline.

use marbles_engine::{DemoSession, EventKind, Timeline};
use std::fmt::Display;
use unicode_width::UnicodeWidthStr;

/// Baseline character of a text lane.
pub const BASELINE: char = '-';

/// Label of a `Finished` event.
pub const FINISHED: &str = "|";

/// Label of a `Failed` event.
pub const FAILED: &str = "X";

/// Where one event of a timeline lands on a lane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    /// Position of the event in its timeline.
    pub index: usize,
    /// First column of the label.
    pub column: usize,
    /// Text drawn for the event.
    pub label: String,
    /// Whether the event is `Finished` or `Failed`.
    pub terminal: bool,
}

/// Column of a time on a lane of `width` columns.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn time_to_column(time: f64, width: usize) -> usize {
    if width == 0 {
        return 0;
    }
    let time = if time.is_nan() { 0.0 } else { time.clamp(0.0, 1.0) };
    let last = width - 1;
    ((time * last as f64).round() as usize).min(last)
}

/// Time of a column on a lane of `width` columns.
#[allow(clippy::cast_precision_loss)]
pub fn column_to_time(column: usize, width: usize) -> f64 {
    if width <= 1 {
        return 0.0;
    }
    (column as f64 / (width - 1) as f64).clamp(0.0, 1.0)
}

/// Label shown for an event.
pub fn event_label<T: Display>(kind: &EventKind<T>) -> String {
    match kind {
        EventKind::Output(value) => value.to_string(),
        EventKind::Finished => FINISHED.to_string(),
        EventKind::Failed => FAILED.to_string(),
    }
}

/// Lay out every event of a timeline on a lane.
///
/// Labels that would run past the right edge are shifted left so they stay
/// whole.
pub fn place<T: Display>(timeline: &Timeline<T>, width: usize) -> Vec<Placement> {
    timeline
        .events()
        .iter()
        .enumerate()
        .map(|(index, event)| {
            let label = event_label(event.kind());
            let anchor = time_to_column(event.time(), width);
            let column = anchor.min(width.saturating_sub(label.width()));
            Placement {
                index,
                column,
                label,
                terminal: event.is_terminal(),
            }
        })
        .collect()
}

/// Placement whose label is closest to a column.
pub fn nearest(placements: &[Placement], column: usize) -> Option<&Placement> {
    placements.iter().min_by_key(|placement| {
        let end = placement.column + placement.label.width().saturating_sub(1);
        if column < placement.column {
            placement.column - column
        } else {
            column.saturating_sub(end)
        }
    })
}

/// Render a timeline as a single text lane.
pub fn render_lane<T: Display>(timeline: &Timeline<T>, width: usize) -> String {
    let mut lane = vec![BASELINE; width];
    for placement in place(timeline, width) {
        for (offset, ch) in placement.label.chars().enumerate() {
            if let Some(cell) = lane.get_mut(placement.column + offset) {
                *cell = ch;
            }
        }
    }
    lane.into_iter().collect()
}

/// Render every source of a demo session and its result, one lane per line.
pub fn render_session(session: &DemoSession, width: usize) -> String {
    let mut rows: Vec<(String, &Timeline<String>)> = (0..session.sources().len())
        .filter_map(|index| {
            session
                .source_timeline(index)
                .map(|timeline| (format!("source {}", index + 1), timeline))
        })
        .collect();
    if let Some(result) = session.result_timeline() {
        rows.push(("result".to_string(), result));
    }

    let label_width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    rows.into_iter()
        .map(|(label, timeline)| {
            format!("{label:<label_width$} {}", render_lane(timeline, width))
        })
        .collect::<Vec<_>>()
        .join("\n")
}
