//! Pure stream operators over finite timelines.
//!
//! Every operator takes snapshots of its sources and recomputes the whole
//! output from scratch. Inputs are never modified, outputs are normalized and
//! every output event gets a fresh id.
//!
//! Two-source operators let the first source govern completion: the output
//! terminal is the first source's terminal event, or a synthetic `Finished`
//! at [`DEFAULT_END`] when the first source has none.

use crate::event::{EventKind, TimedEvent};
use crate::timeline::Timeline;
use std::iter;

/// Time used for synthesized terminal events when a source has none.
pub const DEFAULT_END: f64 = 1.0;

/// Apply `transform` to every output value. Terminal events pass through.
pub fn map<T, U>(source: &Timeline<T>, transform: impl Fn(&T) -> U) -> Timeline<U> {
    source
        .events()
        .iter()
        .map(|event| event.map_value(&transform))
        .collect()
}

/// Keep output events whose value satisfies `predicate`, and the terminal.
pub fn filter<T: Clone>(source: &Timeline<T>, predicate: impl Fn(&T) -> bool) -> Timeline<T> {
    source
        .events()
        .iter()
        .filter(|event| event.value().map_or(true, &predicate))
        .map(TimedEvent::derive)
        .collect()
}

/// Keep the first `count` output events and finish at the last kept one.
///
/// With nothing kept the output finishes at [`DEFAULT_END`].
pub fn prefix<T: Clone>(source: &Timeline<T>, count: usize) -> Timeline<T> {
    let kept: Vec<TimedEvent<T>> = source.outputs().take(count).map(TimedEvent::derive).collect();
    let end = kept.last().map_or(DEFAULT_END, TimedEvent::time);
    kept.into_iter()
        .chain(iter::once(TimedEvent::finished(end)))
        .collect()
}

/// Drop output events equal to the last retained output.
pub fn remove_duplicates<T: Clone + PartialEq>(source: &Timeline<T>) -> Timeline<T> {
    let mut last: Option<&T> = None;
    let mut kept = Vec::with_capacity(source.len());

    for event in source {
        match event.value() {
            Some(value) if last == Some(value) => {}
            Some(value) => {
                last = Some(value);
                kept.push(event.derive());
            }
            None => kept.push(event.derive()),
        }
    }

    Timeline::normalized(kept)
}

/// Pair the latest value of each source whenever either source emits.
///
/// Nothing is emitted until both sources have produced a value.
pub fn combine_latest<A: Clone, B: Clone>(
    first: &Timeline<A>,
    second: &Timeline<B>,
) -> Timeline<(A, B)> {
    let mut arrivals: Vec<(f64, Arrival<'_, A, B>)> = values(first)
        .map(|(time, value)| (time, Arrival::First(value)))
        .chain(values(second).map(|(time, value)| (time, Arrival::Second(value))))
        .collect();
    // Stable: on equal times the first source is seen first.
    arrivals.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut latest_first = None;
    let mut latest_second = None;
    let mut events = Vec::with_capacity(arrivals.len() + 1);

    for (time, arrival) in arrivals {
        match arrival {
            Arrival::First(value) => latest_first = Some(value),
            Arrival::Second(value) => latest_second = Some(value),
        }
        if let (Some(a), Some(b)) = (latest_first, latest_second) {
            events.push(TimedEvent::output(time, (a.clone(), b.clone())));
        }
    }

    events.push(governing_terminal(first));
    Timeline::normalized(events)
}

/// Interleave the outputs of both sources.
pub fn merge<T: Clone>(first: &Timeline<T>, second: &Timeline<T>) -> Timeline<T> {
    first
        .outputs()
        .chain(second.outputs())
        .map(TimedEvent::derive)
        .chain(iter::once(governing_terminal(first)))
        .collect()
}

/// Pair the k-th output of each source at the later of the two times.
///
/// If the second source terminates strictly before the first, the output
/// finishes at the later of the last pair (or [`DEFAULT_END`] without pairs)
/// and the second source's terminal time. Otherwise the first source's
/// terminal is used.
pub fn zip<A: Clone, B: Clone>(first: &Timeline<A>, second: &Timeline<B>) -> Timeline<(A, B)> {
    let mut events: Vec<TimedEvent<(A, B)>> = values(first)
        .zip(values(second))
        .map(|((t1, a), (t2, b))| TimedEvent::output(t1.max(t2), (a.clone(), b.clone())))
        .collect();

    let first_end = end_time(first);
    let second_end = end_time(second);
    let terminal = if second_end < first_end {
        let last_pair = events.last().map_or(DEFAULT_END, TimedEvent::time);
        TimedEvent::finished(last_pair.max(second_end))
    } else {
        governing_terminal(first)
    };

    events.push(terminal);
    Timeline::normalized(events)
}

/// Replay the whole second source after every output of the first.
///
/// An outer value at `t` and an inner value at `s` produce a pair at `t + s`.
pub fn flat_map<A: Clone, B: Clone>(
    outer: &Timeline<A>,
    inner: &Timeline<B>,
) -> Timeline<(A, B)> {
    values(outer)
        .flat_map(|(t, a)| {
            values(inner).map(move |(s, b)| TimedEvent::output(t + s, (a.clone(), b.clone())))
        })
        .chain(iter::once(governing_terminal(outer)))
        .collect()
}

/// Like [`flat_map`], but each outer value cancels inner output scheduled at
/// or after its own time.
pub fn switch_to_latest<A: Clone, B: Clone>(
    outer: &Timeline<A>,
    inner: &Timeline<B>,
) -> Timeline<(A, B)> {
    let mut scheduled: Vec<TimedEvent<(A, B)>> = Vec::new();

    for (t, a) in values(outer) {
        scheduled.retain(|event| event.time() < t);
        scheduled.extend(
            values(inner).map(|(s, b)| TimedEvent::output(t + s, (a.clone(), b.clone()))),
        );
    }

    scheduled.push(governing_terminal(outer));
    Timeline::normalized(scheduled)
}

/// For each output of the first source, emit the second source's most recent
/// earlier value. Outputs with no earlier value are dropped.
///
/// The first source's terminal passes through; the second's is ignored.
pub fn with_latest_from<A, B: Clone>(first: &Timeline<A>, second: &Timeline<B>) -> Timeline<B> {
    first
        .events()
        .iter()
        .filter_map(|event| match event.kind() {
            EventKind::Output(_) => values(second)
                .filter(|(s, _)| *s < event.time())
                .last()
                .map(|(_, b)| TimedEvent::output(event.time(), b.clone())),
            EventKind::Finished | EventKind::Failed => event.cast_terminal(),
        })
        .collect()
}

/// Which source a merged arrival came from.
enum Arrival<'a, A, B> {
    First(&'a A),
    Second(&'a B),
}

/// Output values of a timeline with their times.
fn values<T>(timeline: &Timeline<T>) -> impl Iterator<Item = (f64, &T)> + Clone {
    timeline
        .events()
        .iter()
        .filter_map(|event| event.value().map(|value| (event.time(), value)))
}

/// Time of the terminal event, or [`DEFAULT_END`] for an open timeline.
fn end_time<T>(timeline: &Timeline<T>) -> f64 {
    timeline.terminal().map_or(DEFAULT_END, TimedEvent::time)
}

/// Terminal event of the governing source, re-typed for the output.
fn governing_terminal<T, U>(source: &Timeline<T>) -> TimedEvent<U> {
    source
        .terminal()
        .and_then(TimedEvent::cast_terminal)
        .unwrap_or_else(|| TimedEvent::finished(DEFAULT_END))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timeline<T>(events: Vec<TimedEvent<T>>) -> Timeline<T> {
        Timeline::normalized(events)
    }

    fn shape<T: std::fmt::Debug>(timeline: &Timeline<T>) -> Vec<String> {
        timeline
            .events()
            .iter()
            .map(|event| match event.kind() {
                EventKind::Output(value) => format!("{value:?}@{:.2}", event.time()),
                EventKind::Finished => format!("|@{:.2}", event.time()),
                EventKind::Failed => format!("X@{:.2}", event.time()),
            })
            .collect()
    }

    fn letters() -> Timeline<char> {
        timeline(vec![
            TimedEvent::output(0.1, 'a'),
            TimedEvent::output(0.4, 'b'),
            TimedEvent::finished(0.9),
        ])
    }

    fn numbers() -> Timeline<i32> {
        timeline(vec![
            TimedEvent::output(0.2, 1),
            TimedEvent::output(0.5, 2),
            TimedEvent::finished(1.0),
        ])
    }

    #[test]
    fn test_map_changes_type() {
        let output = map(&numbers(), |n| format!("#{n}"));
        assert_eq!(shape(&output), vec!["\"#1\"@0.20", "\"#2\"@0.50", "|@1.00"]);
    }

    #[test]
    fn test_map_keeps_failure() {
        let source = timeline(vec![TimedEvent::output(0.2, 1), TimedEvent::failed(0.6)]);
        let output = map(&source, |n| n + 1);
        assert_eq!(shape(&output), vec!["2@0.20", "X@0.60"]);
    }

    #[test]
    fn test_output_ids_are_fresh() {
        let source = numbers();
        let output = filter(&source, |_| true);
        for (before, after) in source.events().iter().zip(output.events()) {
            assert_ne!(before.id(), after.id());
        }
    }

    #[test]
    fn test_filter_keeps_terminal() {
        let output = filter(&numbers(), |n| *n > 5);
        assert_eq!(shape(&output), vec!["|@1.00"]);
    }

    #[test]
    fn test_prefix_ignores_source_terminal() {
        let output = prefix(&letters(), 5);
        assert_eq!(shape(&output), vec!["'a'@0.10", "'b'@0.40", "|@0.40"]);
    }

    #[test]
    fn test_prefix_zero() {
        let output = prefix(&letters(), 0);
        assert_eq!(shape(&output), vec!["|@1.00"]);
    }

    #[test]
    fn test_remove_duplicates_compares_retained() {
        let source = timeline(vec![
            TimedEvent::output(0.1, 1),
            TimedEvent::output(0.2, 1),
            TimedEvent::output(0.3, 2),
            TimedEvent::output(0.4, 1),
            TimedEvent::output(0.5, 1),
            TimedEvent::finished(0.6),
        ]);
        let once = remove_duplicates(&source);
        assert_eq!(shape(&once), vec!["1@0.10", "2@0.30", "1@0.40", "|@0.60"]);

        let twice = remove_duplicates(&once);
        assert_eq!(shape(&twice), shape(&once));
    }

    #[test]
    fn test_combine_latest_waits_for_both() {
        let output = combine_latest(&numbers(), &letters());
        assert_eq!(
            shape(&output),
            vec!["(1, 'a')@0.20", "(1, 'b')@0.40", "(2, 'b')@0.50", "|@1.00"]
        );
    }

    #[test]
    fn test_combine_latest_tie_prefers_first_source() {
        let first = timeline(vec![TimedEvent::output(0.3, 1), TimedEvent::finished(1.0)]);
        let second = timeline(vec![
            TimedEvent::output(0.1, 'a'),
            TimedEvent::output(0.3, 'b'),
            TimedEvent::finished(1.0),
        ]);
        let output = combine_latest(&first, &second);
        assert_eq!(
            shape(&output),
            vec!["(1, 'a')@0.30", "(1, 'b')@0.30", "|@1.00"]
        );
    }

    #[test]
    fn test_merge_uses_first_terminal() {
        let first = timeline(vec![TimedEvent::output(0.1, 1), TimedEvent::finished(0.5)]);
        let second = timeline(vec![
            TimedEvent::output(0.3, 2),
            TimedEvent::output(0.7, 3),
            TimedEvent::finished(0.8),
        ]);
        let output = merge(&first, &second);
        assert_eq!(shape(&output), vec!["1@0.10", "2@0.30", "|@0.50"]);
    }

    #[test]
    fn test_merge_open_first_source() {
        let first = timeline(vec![TimedEvent::output(0.1, 1)]);
        let second = timeline(vec![TimedEvent::failed(0.2)]);
        let output = merge(&first, &second);
        assert_eq!(shape(&output), vec!["1@0.10", "|@1.00"]);
    }

    #[test]
    fn test_zip_second_finishes_first() {
        let first = timeline(vec![
            TimedEvent::output(0.1, 1),
            TimedEvent::output(0.3, 2),
            TimedEvent::finished(0.9),
        ]);
        let second = timeline(vec![TimedEvent::output(0.2, 'a'), TimedEvent::finished(0.25)]);
        let output = zip(&first, &second);
        assert_eq!(shape(&output), vec!["(1, 'a')@0.20", "|@0.25"]);
    }

    #[test]
    fn test_zip_second_finishes_first_without_pairs() {
        let first = timeline(vec![TimedEvent::output(0.1, 1), TimedEvent::finished(0.9)]);
        let second = timeline(vec![TimedEvent::<char>::failed(0.2)]);
        let output = zip(&first, &second);
        assert_eq!(shape(&output), vec!["|@1.00"]);
    }

    #[test]
    fn test_flat_map_offsets_inner() {
        let outer = timeline(vec![
            TimedEvent::output(0.1, 1),
            TimedEvent::output(0.5, 2),
            TimedEvent::finished(1.0),
        ]);
        let inner = timeline(vec![
            TimedEvent::output(0.1, 'a'),
            TimedEvent::output(0.2, 'b'),
            TimedEvent::finished(0.3),
        ]);
        let output = flat_map(&outer, &inner);
        assert_eq!(
            shape(&output),
            vec![
                "(1, 'a')@0.20",
                "(1, 'b')@0.30",
                "(2, 'a')@0.60",
                "(2, 'b')@0.70",
                "|@1.00"
            ]
        );
    }

    #[test]
    fn test_switch_to_latest_cancels_overlap() {
        let outer = timeline(vec![
            TimedEvent::output(0.1, 1),
            TimedEvent::output(0.25, 2),
            TimedEvent::finished(1.0),
        ]);
        let inner = timeline(vec![
            TimedEvent::output(0.1, 'a'),
            TimedEvent::output(0.2, 'b'),
            TimedEvent::finished(0.3),
        ]);
        let output = switch_to_latest(&outer, &inner);
        assert_eq!(
            shape(&output),
            vec!["(1, 'a')@0.20", "(2, 'a')@0.35", "(2, 'b')@0.45", "|@1.00"]
        );
    }

    #[test]
    fn test_with_latest_from_strictly_earlier() {
        let first = timeline(vec![
            TimedEvent::output(0.2, 1),
            TimedEvent::output(0.4, 2),
            TimedEvent::finished(0.9),
        ]);
        let second = timeline(vec![
            TimedEvent::output(0.2, 'a'),
            TimedEvent::output(0.3, 'b'),
            TimedEvent::finished(0.35),
        ]);
        let output = with_latest_from(&first, &second);
        assert_eq!(shape(&output), vec!["'b'@0.40", "|@0.90"]);
    }

    #[test]
    fn test_with_latest_from_open_first_source() {
        let first = timeline(vec![TimedEvent::output(0.5, 1)]);
        let second = timeline(vec![TimedEvent::output(0.1, 'a')]);
        let output = with_latest_from(&first, &second);
        assert_eq!(shape(&output), vec!["'a'@0.50"]);
        assert!(output.terminal().is_none());
    }

    #[test]
    fn test_empty_inputs_are_tolerated() {
        let empty = Timeline::<i32>::empty();
        assert_eq!(shape(&map(&empty, |n| *n)), Vec::<String>::new());
        assert_eq!(shape(&prefix(&empty, 3)), vec!["|@1.00"]);
        assert_eq!(shape(&merge(&empty, &empty)), vec!["|@1.00"]);
        assert_eq!(shape(&zip(&empty, &empty)), vec!["|@1.00"]);
        assert_eq!(shape(&flat_map(&empty, &empty)), vec!["|@1.00"]);
        assert_eq!(shape(&switch_to_latest(&empty, &empty)), vec!["|@1.00"]);
        assert_eq!(shape(&combine_latest(&empty, &empty)), vec!["|@1.00"]);
        assert!(with_latest_from(&empty, &empty).is_empty());
    }

    #[test]
    fn test_inputs_untouched() {
        let first = numbers();
        let second = letters();
        let (first_before, second_before) = (first.clone(), second.clone());
        let _ = combine_latest(&first, &second);
        let _ = zip(&first, &second);
        let _ = switch_to_latest(&first, &second);
        assert_eq!(first, first_before);
        assert_eq!(second, second_before);
    }
}
