//! Timed event types.
//!
//! A marble diagram is made of events placed on a normalized time axis:
//! - Output events carry a value
//! - Finished marks successful completion
//! - Failed marks termination with an error
//!
//! Events are immutable. Changing the time of an event produces a new event
//! with the same [`EventId`] and [`EventKind`].

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use uuid::Uuid;

/// Opaque, stable identity of an event.
///
/// Ids are random and never reused. They carry no ordering meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(Uuid);

impl EventId {
    /// Generate a fresh id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What an event represents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind<T> {
    /// A value emitted by the stream.
    Output(T),
    /// Successful completion.
    Finished,
    /// Termination with an error.
    Failed,
}

impl<T> EventKind<T> {
    /// Whether this kind ends a timeline.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finished | Self::Failed)
    }

    /// Get the payload of an output kind.
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Output(value) => Some(value),
            Self::Finished | Self::Failed => None,
        }
    }

    /// Short lowercase label used in logs and JSON.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Output(_) => "output",
            Self::Finished => "finished",
            Self::Failed => "failed",
        }
    }
}

/// An event placed on a timeline.
#[derive(Debug, Clone, PartialEq)]
pub struct TimedEvent<T> {
    time: f64,
    kind: EventKind<T>,
    id: EventId,
}

impl<T> TimedEvent<T> {
    /// Create an event with a fresh id.
    pub fn new(time: f64, kind: EventKind<T>) -> Self {
        Self {
            time,
            kind,
            id: EventId::new(),
        }
    }

    /// Create an event with an explicit id.
    pub fn with_id(time: f64, kind: EventKind<T>, id: EventId) -> Self {
        Self { time, kind, id }
    }

    /// Create an output event.
    pub fn output(time: f64, value: T) -> Self {
        Self::new(time, EventKind::Output(value))
    }

    /// Create a completion event.
    pub fn finished(time: f64) -> Self {
        Self::new(time, EventKind::Finished)
    }

    /// Create a failure event.
    pub fn failed(time: f64) -> Self {
        Self::new(time, EventKind::Failed)
    }

    /// Position on the time axis.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Event kind.
    pub fn kind(&self) -> &EventKind<T> {
        &self.kind
    }

    /// Stable identity.
    pub fn id(&self) -> EventId {
        self.id
    }

    /// Check if this event completes or fails the timeline.
    pub fn is_terminal(&self) -> bool {
        self.kind.is_terminal()
    }

    /// Get the output value, if this is an output event.
    pub fn value(&self) -> Option<&T> {
        self.kind.value()
    }

    /// Same event at another time. Id and kind are preserved.
    #[must_use]
    pub fn with_time(&self, time: f64) -> Self
    where
        T: Clone,
    {
        Self {
            time,
            kind: self.kind.clone(),
            id: self.id,
        }
    }

    /// Copy of this event with a fresh identity.
    #[must_use]
    pub fn derive(&self) -> Self
    where
        T: Clone,
    {
        Self::new(self.time, self.kind.clone())
    }

    /// Transform the payload. The result is a new event with a fresh id.
    pub fn map_value<U>(&self, transform: impl FnOnce(&T) -> U) -> TimedEvent<U> {
        let kind = match &self.kind {
            EventKind::Output(value) => EventKind::Output(transform(value)),
            EventKind::Finished => EventKind::Finished,
            EventKind::Failed => EventKind::Failed,
        };
        TimedEvent::new(self.time, kind)
    }

    /// Re-type a terminal event for a timeline of another payload type.
    ///
    /// Returns `None` for output events.
    pub fn cast_terminal<U>(&self) -> Option<TimedEvent<U>> {
        match self.kind {
            EventKind::Output(_) => None,
            EventKind::Finished => Some(TimedEvent::finished(self.time)),
            EventKind::Failed => Some(TimedEvent::failed(self.time)),
        }
    }
}

impl<T: fmt::Display> fmt::Display for TimedEvent<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            EventKind::Output(value) => write!(f, "{value}@{}", self.time),
            EventKind::Finished => write!(f, "finished@{}", self.time),
            EventKind::Failed => write!(f, "failed@{}", self.time),
        }
    }
}

/// Wire tag for the event kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
enum KindTag {
    Output,
    Finished,
    Failed,
}

#[derive(Serialize)]
struct EventRef<'a, T> {
    time: f64,
    kind: KindTag,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<&'a T>,
    id: EventId,
}

#[derive(Deserialize)]
struct EventRepr<T> {
    time: f64,
    kind: KindTag,
    #[serde(default = "Option::default")]
    value: Option<T>,
    #[serde(default)]
    id: EventId,
}

// Flat JSON form: {"time":0.25,"kind":"output","value":"1","id":"..."}.
impl<T: Serialize> Serialize for TimedEvent<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let kind = match self.kind {
            EventKind::Output(_) => KindTag::Output,
            EventKind::Finished => KindTag::Finished,
            EventKind::Failed => KindTag::Failed,
        };
        EventRef {
            time: self.time,
            kind,
            value: self.value(),
            id: self.id,
        }
        .serialize(serializer)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for TimedEvent<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let repr = EventRepr::<T>::deserialize(deserializer)?;
        let kind = match (repr.kind, repr.value) {
            (KindTag::Output, Some(value)) => EventKind::Output(value),
            (KindTag::Output, None) => {
                return Err(serde::de::Error::custom("output event requires a value"))
            }
            (KindTag::Finished, _) => EventKind::Finished,
            (KindTag::Failed, _) => EventKind::Failed,
        };
        Ok(Self::with_id(repr.time, kind, repr.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_event() {
        let event = TimedEvent::output(0.25, "1".to_string());
        assert!(!event.is_terminal());
        assert_eq!(event.value().map(String::as_str), Some("1"));
        assert_eq!(event.kind().label(), "output");
    }

    #[test]
    fn test_terminal_events() {
        let finished = TimedEvent::<String>::finished(1.0);
        let failed = TimedEvent::<String>::failed(0.5);
        assert!(finished.is_terminal());
        assert!(failed.is_terminal());
        assert_eq!(finished.value(), None);
        assert_eq!(failed.kind(), &EventKind::Failed);
    }

    #[test]
    fn test_with_time_keeps_identity() {
        let event = TimedEvent::output(0.25, 7);
        let moved = event.with_time(0.6);
        assert_eq!(moved.id(), event.id());
        assert_eq!(moved.kind(), event.kind());
        assert!((moved.time() - 0.6).abs() < f64::EPSILON);
        assert_ne!(moved, event);
    }

    #[test]
    fn test_structural_equality() {
        let event = TimedEvent::output(0.25, 7);
        let same = TimedEvent::with_id(0.25, EventKind::Output(7), event.id());
        let other_id = TimedEvent::output(0.25, 7);
        assert_eq!(event, same);
        assert_ne!(event, other_id);
    }

    #[test]
    fn test_derive_regenerates_id() {
        let event = TimedEvent::output(0.3, 'a');
        let derived = event.derive();
        assert_ne!(derived.id(), event.id());
        assert_eq!(derived.kind(), event.kind());
    }

    #[test]
    fn test_map_value() {
        let event = TimedEvent::output(0.5, 21);
        let mapped = event.map_value(|v| v * 2);
        assert_eq!(mapped.value(), Some(&42));
        assert!((mapped.time() - 0.5).abs() < f64::EPSILON);

        let finished = TimedEvent::<i32>::finished(1.0).map_value(|v| v * 2);
        assert!(finished.is_terminal());
    }

    #[test]
    fn test_cast_terminal() {
        let failed = TimedEvent::<i32>::failed(0.4);
        let cast: TimedEvent<String> = failed.cast_terminal().unwrap();
        assert_eq!(cast.kind(), &EventKind::Failed);
        assert!(TimedEvent::output(0.1, 1).cast_terminal::<String>().is_none());
    }

    #[test]
    fn test_json_shape() {
        let event = TimedEvent::output(0.25, "1".to_string());
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["kind"], "output");
        assert_eq!(json["value"], "1");
        assert_eq!(json["time"], 0.25);

        let finished = serde_json::to_value(TimedEvent::<String>::finished(1.0)).unwrap();
        assert_eq!(finished["kind"], "finished");
        assert!(finished.get("value").is_none());
    }

    #[test]
    fn test_json_parse_without_id() {
        let event: TimedEvent<String> =
            serde_json::from_str(r#"{"time":0.5,"kind":"output","value":"A"}"#).unwrap();
        assert_eq!(event.value().map(String::as_str), Some("A"));

        let failed: TimedEvent<String> =
            serde_json::from_str(r#"{"time":0.7,"kind":"failed"}"#).unwrap();
        assert!(failed.is_terminal());
    }

    #[test]
    fn test_json_output_requires_value() {
        let result: Result<TimedEvent<String>, _> =
            serde_json::from_str(r#"{"time":0.5,"kind":"output"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(TimedEvent::output(0.5, "A").to_string(), "A@0.5");
        assert_eq!(TimedEvent::<&str>::finished(1.0).to_string(), "finished@1");
    }
}
