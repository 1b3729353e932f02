//! Change notification for timelines.
//!
//! Callbacks are plain boxed closures kept in registration order. Publishing
//! is synchronous: every callback has returned before `publish` does.

use crate::timeline::Timeline;
use std::fmt;

/// Identifier of a registered callback, unique within one registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

/// Callback invoked with each newly published timeline.
pub type Callback<T> = Box<dyn FnMut(&Timeline<T>)>;

/// Registry of timeline observers.
pub struct Subscribers<T> {
    callbacks: Vec<(SubscriptionId, Callback<T>)>,
    next_id: u64,
}

impl<T> Subscribers<T> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            callbacks: Vec::new(),
            next_id: 1,
        }
    }

    /// Register a callback.
    pub fn subscribe(&mut self, callback: impl FnMut(&Timeline<T>) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.callbacks.push((id, Box::new(callback)));
        id
    }

    /// Remove a callback. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.callbacks.len();
        self.callbacks.retain(|(existing, _)| *existing != id);
        self.callbacks.len() != before
    }

    /// Deliver a timeline to every callback, in registration order.
    pub fn publish(&mut self, timeline: &Timeline<T>) {
        for (_, callback) in &mut self.callbacks {
            callback(timeline);
        }
    }

    /// Number of registered callbacks.
    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    /// Check if no callbacks are registered.
    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }
}

impl<T> Default for Subscribers<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Subscribers<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscribers")
            .field("count", &self.callbacks.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::TimedEvent;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_publish_in_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut subscribers = Subscribers::<i32>::new();

        let first = Rc::clone(&log);
        subscribers.subscribe(move |_| first.borrow_mut().push("first"));
        let second = Rc::clone(&log);
        subscribers.subscribe(move |_| second.borrow_mut().push("second"));

        subscribers.publish(&Timeline::empty());
        assert_eq!(*log.borrow(), vec!["first", "second"]);
    }

    #[test]
    fn test_callback_receives_timeline() {
        let seen = Rc::new(RefCell::new(0));
        let mut subscribers = Subscribers::new();

        let sink = Rc::clone(&seen);
        subscribers.subscribe(move |timeline: &Timeline<i32>| *sink.borrow_mut() = timeline.len());

        subscribers.publish(&Timeline::normalized(vec![
            TimedEvent::output(0.1, 1),
            TimedEvent::finished(1.0),
        ]));
        assert_eq!(*seen.borrow(), 2);
    }

    #[test]
    fn test_unsubscribe() {
        let count = Rc::new(RefCell::new(0));
        let mut subscribers = Subscribers::<i32>::new();

        let sink = Rc::clone(&count);
        let id = subscribers.subscribe(move |_| *sink.borrow_mut() += 1);

        subscribers.publish(&Timeline::empty());
        assert!(subscribers.unsubscribe(id));
        assert!(!subscribers.unsubscribe(id));
        subscribers.publish(&Timeline::empty());

        assert_eq!(*count.borrow(), 1);
        assert!(subscribers.is_empty());
    }
}
