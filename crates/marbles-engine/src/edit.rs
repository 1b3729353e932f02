//! Time editing rule for dragging a marble along its timeline.
//!
//! Moving an event interacts with the terminal event:
//! - pulling the terminal event earlier drags every later event back to it
//! - pushing an event onto or past the terminal event nudges the terminal to
//!   just after the moved event
//!
//! Everything here is pure so the rule can be tested in isolation.

use crate::event::{EventId, TimedEvent};
use crate::timeline::sort_by_time;

/// Gap left between a moved event and a terminal event it was pushed past.
pub const EPSILON: f64 = 0.000_000_1;

/// Lower bound of the editable time domain.
pub const MIN_TIME: f64 = 0.0;

/// Upper bound of the editable time domain.
pub const MAX_TIME: f64 = 1.0;

/// Clamp a requested time into the editable domain.
///
/// Returns `None` for NaN, which has no meaningful position.
pub fn clamp_time(time: f64) -> Option<f64> {
    if time.is_nan() {
        None
    } else {
        Some(time.clamp(MIN_TIME, MAX_TIME))
    }
}

/// Move the event `id` to `new_time` and adjust the events around it.
///
/// `new_time` is used as given; callers clamp it first. Returns `None` if no
/// event has the given id. The result is sorted but not truncated.
pub fn apply_move<T: Clone>(
    events: &[TimedEvent<T>],
    id: EventId,
    new_time: f64,
) -> Option<Vec<TimedEvent<T>>> {
    let moved = events.iter().find(|event| event.id() == id)?;
    let moved_is_terminal = moved.is_terminal();

    let mut result: Vec<TimedEvent<T>> = events
        .iter()
        .filter(|event| event.id() != id)
        .cloned()
        .chain(std::iter::once(moved.with_time(new_time)))
        .map(|event| adjust(event, moved_is_terminal, new_time))
        .collect();

    sort_by_time(&mut result);
    Some(result)
}

/// Apply the terminal interaction rule to a single event.
///
/// An output landing on the terminal's own time also pushes the terminal, so
/// the output is never ordered after it and cut off.
fn adjust<T: Clone>(event: TimedEvent<T>, moved_is_terminal: bool, new_time: f64) -> TimedEvent<T> {
    if moved_is_terminal {
        if new_time < event.time() {
            event.with_time(new_time)
        } else {
            event
        }
    } else if event.is_terminal() && new_time >= event.time() {
        event.with_time(new_time + EPSILON)
    } else {
        event
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn times<T>(events: &[TimedEvent<T>]) -> Vec<f64> {
        events.iter().map(TimedEvent::time).collect()
    }

    fn seed() -> Vec<TimedEvent<&'static str>> {
        vec![
            TimedEvent::output(0.25, "1"),
            TimedEvent::output(0.5, "2"),
            TimedEvent::output(0.75, "3"),
            TimedEvent::finished(1.0),
        ]
    }

    #[test]
    fn test_clamp_time() {
        assert_eq!(clamp_time(-0.5), Some(0.0));
        assert_eq!(clamp_time(1.5), Some(1.0));
        assert_eq!(clamp_time(0.3), Some(0.3));
        assert_eq!(clamp_time(f64::NAN), None);
    }

    #[test]
    fn test_move_output_reorders() {
        let events = seed();
        let id = events[0].id();
        let moved = apply_move(&events, id, 0.6).unwrap();

        assert_eq!(times(&moved), vec![0.5, 0.6, 0.75, 1.0]);
        assert_eq!(moved[1].id(), id);
        assert_eq!(moved[1].value(), Some(&"1"));
    }

    #[test]
    fn test_move_unknown_id() {
        let events = seed();
        let stranger = TimedEvent::output(0.1, "x");
        assert!(apply_move(&events, stranger.id(), 0.5).is_none());
    }

    #[test]
    fn test_terminal_pulled_earlier_drags_later_events() {
        let events = seed();
        let terminal = events[3].id();
        let moved = apply_move(&events, terminal, 0.4).unwrap();

        assert_eq!(times(&moved), vec![0.25, 0.4, 0.4, 0.4]);
        // The terminal was re-appended, so the stable sort keeps it last.
        assert!(moved[3].is_terminal());
        assert_eq!(moved[1].value(), Some(&"2"));
        assert_eq!(moved[2].value(), Some(&"3"));
    }

    #[test]
    fn test_output_pushed_past_terminal_nudges_it() {
        let events = vec![
            TimedEvent::output(0.2, "a"),
            TimedEvent::output(0.4, "b"),
            TimedEvent::finished(0.6),
        ];
        let id = events[0].id();
        let moved = apply_move(&events, id, 0.9).unwrap();

        assert_eq!(moved.len(), 3);
        assert_eq!(moved[1].value(), Some(&"a"));
        assert!(moved[2].is_terminal());
        assert!((moved[2].time() - (0.9 + EPSILON)).abs() < 1e-12);
    }

    #[test]
    fn test_output_onto_terminal_time_nudges_it() {
        let events = vec![
            TimedEvent::output(0.2, "a"),
            TimedEvent::output(0.4, "b"),
            TimedEvent::finished(0.6),
        ];
        let id = events[0].id();
        let moved = apply_move(&events, id, 0.6).unwrap();

        assert_eq!(moved.len(), 3);
        assert_eq!(moved[1].id(), id);
        assert!((moved[1].time() - 0.6).abs() < 1e-12);
        assert!(moved[2].is_terminal());
        assert!((moved[2].time() - (0.6 + EPSILON)).abs() < 1e-12);
    }

    #[test]
    fn test_output_to_upper_bound_stays_before_terminal() {
        let events = seed();
        let id = events[2].id();
        let moved = apply_move(&events, id, MAX_TIME).unwrap();

        assert_eq!(moved[2].id(), id);
        assert!(moved[3].is_terminal());
        assert!(moved[3].time() > MAX_TIME);
    }

    #[test]
    fn test_terminal_moved_onto_output_time() {
        let events = seed();
        let terminal = events[3].id();
        let moved = apply_move(&events, terminal, 0.75).unwrap();

        assert_eq!(times(&moved), vec![0.25, 0.5, 0.75, 0.75]);
        assert_eq!(moved[2].value(), Some(&"3"));
        assert!(moved[3].is_terminal());
    }

    #[test]
    fn test_terminal_moved_later_keeps_outputs() {
        let events = vec![
            TimedEvent::output(0.2, "a"),
            TimedEvent::finished(0.5),
        ];
        let terminal = events[1].id();
        let moved = apply_move(&events, terminal, 0.8).unwrap();

        assert_eq!(times(&moved), vec![0.2, 0.8]);
        assert!(moved[1].is_terminal());
    }

    #[test]
    fn test_move_keeps_kind_and_id() {
        let events = seed();
        let original = events[2].clone();
        let moved = apply_move(&events, original.id(), 0.1).unwrap();
        let found = moved.iter().find(|e| e.id() == original.id()).unwrap();
        assert_eq!(found.kind(), original.kind());
        assert!((found.time() - 0.1).abs() < f64::EPSILON);
    }

    #[test]
    fn test_input_not_mutated() {
        let events = seed();
        let before = events.clone();
        let _ = apply_move(&events, events[3].id(), 0.1);
        assert_eq!(events, before);
    }
}
