//! Mutable storage for a single source timeline.

use crate::edit::{apply_move, clamp_time};
use crate::event::{EventId, TimedEvent};
use crate::timeline::Timeline;
use tracing::{debug, trace};

/// Owns the events of one editable stream.
///
/// The stored timeline is re-normalized after every mutation, so
/// [`TimelineStore::snapshot`] is always sorted and ends at its terminal event.
#[derive(Debug, Clone)]
pub struct TimelineStore<T> {
    timeline: Timeline<T>,
}

impl<T: Clone> TimelineStore<T> {
    /// Create a store from seed events.
    pub fn new(events: impl IntoIterator<Item = TimedEvent<T>>) -> Self {
        Self {
            timeline: Timeline::normalized(events),
        }
    }

    /// Current normalized timeline.
    pub fn snapshot(&self) -> &Timeline<T> {
        &self.timeline
    }

    /// Move an event to a new time.
    ///
    /// The time is clamped to `[0, 1]`. Returns `false` without touching the
    /// timeline if the id is unknown or the time is NaN.
    pub fn move_event(&mut self, id: EventId, new_time: f64) -> bool {
        let Some(time) = clamp_time(new_time) else {
            trace!(%id, "ignoring move to NaN time");
            return false;
        };

        let Some(events) = apply_move(self.timeline.events(), id, time) else {
            trace!(%id, "ignoring move of unknown event");
            return false;
        };

        self.timeline = Timeline::normalized(events);
        debug!(%id, time, events = self.timeline.len(), "moved event");
        true
    }

    /// Replace every event in the store.
    pub fn replace_all(&mut self, events: impl IntoIterator<Item = TimedEvent<T>>) {
        self.timeline = Timeline::normalized(events);
        debug!(events = self.timeline.len(), "replaced timeline");
    }
}
