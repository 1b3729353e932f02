//! Timeline snapshots and normalization.
//!
//! A [`Timeline`] is always normalized:
//! - events are sorted by ascending time, ties keep their relative order
//! - nothing is retained after the first terminal event

use crate::event::{EventId, TimedEvent};
use serde::{Deserialize, Serialize};

/// A normalized, immutable sequence of timed events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<TimedEvent<T>>", into = "Vec<TimedEvent<T>>")]
#[serde(bound(
    serialize = "T: Serialize + Clone",
    deserialize = "T: Deserialize<'de>"
))]
pub struct Timeline<T> {
    events: Vec<TimedEvent<T>>,
}

impl<T> Timeline<T> {
    /// An empty timeline.
    pub fn empty() -> Self {
        Self { events: Vec::new() }
    }

    /// Build a timeline from arbitrary events, normalizing them.
    pub fn normalized(events: impl IntoIterator<Item = TimedEvent<T>>) -> Self {
        Self {
            events: normalize(events.into_iter().collect()),
        }
    }

    /// All events in time order.
    pub fn events(&self) -> &[TimedEvent<T>] {
        &self.events
    }

    /// Number of events, terminal included.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Check if the timeline has no events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// The terminal event, if the timeline has one.
    ///
    /// Normalization guarantees it is the last event.
    pub fn terminal(&self) -> Option<&TimedEvent<T>> {
        self.events.last().filter(|event| event.is_terminal())
    }

    /// Non-terminal events in time order.
    pub fn outputs(&self) -> impl Iterator<Item = &TimedEvent<T>> {
        self.events.iter().filter(|event| !event.is_terminal())
    }

    /// Find an event by id.
    pub fn find(&self, id: EventId) -> Option<&TimedEvent<T>> {
        self.events.iter().find(|event| event.id() == id)
    }

    /// Check the sort and single-terminal invariants.
    pub fn is_well_formed(&self) -> bool {
        let sorted = self
            .events
            .windows(2)
            .all(|pair| pair[0].time() <= pair[1].time());
        let terminals = self.events.iter().filter(|e| e.is_terminal()).count();
        let terminal_last = terminals == 0 || self.terminal().is_some();
        sorted && terminals <= 1 && terminal_last
    }

    /// Take the events out of the timeline.
    pub fn into_events(self) -> Vec<TimedEvent<T>> {
        self.events
    }
}

impl<T> Default for Timeline<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> From<Vec<TimedEvent<T>>> for Timeline<T> {
    fn from(events: Vec<TimedEvent<T>>) -> Self {
        Self::normalized(events)
    }
}

impl<T> From<Timeline<T>> for Vec<TimedEvent<T>> {
    fn from(timeline: Timeline<T>) -> Self {
        timeline.events
    }
}

impl<T> FromIterator<TimedEvent<T>> for Timeline<T> {
    fn from_iter<I: IntoIterator<Item = TimedEvent<T>>>(iter: I) -> Self {
        Self::normalized(iter)
    }
}

impl<'a, T> IntoIterator for &'a Timeline<T> {
    type Item = &'a TimedEvent<T>;
    type IntoIter = std::slice::Iter<'a, TimedEvent<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

/// Stable sort by time, then drop everything after the first terminal event.
pub fn normalize<T>(mut events: Vec<TimedEvent<T>>) -> Vec<TimedEvent<T>> {
    sort_by_time(&mut events);
    if let Some(end) = events.iter().position(TimedEvent::is_terminal) {
        events.truncate(end + 1);
    }
    events
}

/// Stable sort by ascending time.
///
/// Uses the IEEE total order so malformed times never panic; NaN sorts last.
pub fn sort_by_time<T>(events: &mut [TimedEvent<T>]) {
    events.sort_by(|a, b| a.time().total_cmp(&b.time()));
}
