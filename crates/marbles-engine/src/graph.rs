//! Reactive binding of operators to source timelines.
//!
//! A [`MarbleGraph`] owns every source store and every derived timeline.
//! Handles are indices into the graph. A derived node can only be bound to
//! nodes that already exist, so creation order is a valid dependency order.
//!
//! Editing a source recomputes each dependent node exactly once, in creation
//! order, and only then notifies subscribers: first the edited source, then
//! the recomputed nodes in the same order. Subscribers never observe a
//! partially updated graph.

use crate::event::{EventId, TimedEvent};
use crate::observe::{Subscribers, SubscriptionId};
use crate::registry::{self, OperatorSpec};
use crate::store::TimelineStore;
use crate::timeline::Timeline;
use std::fmt;
use tracing::{debug, trace, warn};

/// Handle to a timeline owned by a [`MarbleGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeHandle(usize);

impl NodeHandle {
    /// Position of the node in creation order.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A registered observer, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription {
    node: NodeHandle,
    id: SubscriptionId,
}

impl Subscription {
    /// The observed timeline.
    pub fn node(&self) -> NodeHandle {
        self.node
    }
}

/// Errors raised when binding an operator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindError {
    /// No operator with this name is registered.
    #[error("unknown operator: {0}")]
    UnknownOperator(String),

    /// Wrong number of source timelines for the operator.
    #[error("operator {operator} takes {expected} source(s), got {actual}")]
    ArityMismatch {
        operator: String,
        expected: usize,
        actual: usize,
    },

    /// A source handle does not belong to this graph.
    #[error("unknown timeline: {0}")]
    UnknownHandle(NodeHandle),
}

/// Errors raised when addressing a timeline in the graph.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// The handle does not belong to this graph.
    #[error("unknown timeline: {0}")]
    UnknownHandle(NodeHandle),

    /// Derived timelines are read-only.
    #[error("timeline {0} is derived and cannot be edited")]
    NotASource(NodeHandle),
}

#[derive(Debug)]
enum NodeKind<T: 'static> {
    Source(TimelineStore<T>),
    Derived {
        spec: OperatorSpec<T>,
        inputs: Vec<NodeHandle>,
        timeline: Timeline<T>,
    },
}

impl<T: Clone> NodeKind<T> {
    fn timeline(&self) -> &Timeline<T> {
        match self {
            Self::Source(store) => store.snapshot(),
            Self::Derived { timeline, .. } => timeline,
        }
    }
}

#[derive(Debug)]
struct Node<T: 'static> {
    kind: NodeKind<T>,
    subscribers: Subscribers<T>,
}

/// Source stores and the operators derived from them.
#[derive(Debug)]
pub struct MarbleGraph<T: 'static> {
    nodes: Vec<Node<T>>,
}

impl<T: Clone + 'static> MarbleGraph<T> {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Number of timelines in the graph.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the graph has no timelines.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Add an editable source timeline.
    pub fn create_source(&mut self, events: impl IntoIterator<Item = TimedEvent<T>>) -> NodeHandle {
        let handle = NodeHandle(self.nodes.len());
        self.nodes.push(Node {
            kind: NodeKind::Source(TimelineStore::new(events)),
            subscribers: Subscribers::new(),
        });
        debug!(node = %handle, "created source timeline");
        handle
    }

    /// Bind an operator to existing timelines, producing a derived timeline.
    pub fn bind(
        &mut self,
        spec: &OperatorSpec<T>,
        inputs: &[NodeHandle],
    ) -> Result<NodeHandle, BindError> {
        if inputs.len() != spec.arity() {
            return Err(BindError::ArityMismatch {
                operator: spec.name.to_string(),
                expected: spec.arity(),
                actual: inputs.len(),
            });
        }
        if let Some(unknown) = inputs.iter().find(|input| input.0 >= self.nodes.len()) {
            return Err(BindError::UnknownHandle(*unknown));
        }

        let timeline = {
            let sources: Vec<&Timeline<T>> = inputs
                .iter()
                .map(|input| self.nodes[input.0].kind.timeline())
                .collect();
            spec.apply(&sources)?
        };

        let handle = NodeHandle(self.nodes.len());
        self.nodes.push(Node {
            kind: NodeKind::Derived {
                spec: *spec,
                inputs: inputs.to_vec(),
                timeline,
            },
            subscribers: Subscribers::new(),
        });
        debug!(node = %handle, operator = spec.name, "bound operator");
        Ok(handle)
    }

    /// Current normalized timeline of any node.
    pub fn snapshot(&self, handle: NodeHandle) -> Result<&Timeline<T>, GraphError> {
        self.node(handle).map(|node| node.kind.timeline())
    }

    /// Operator behind a derived node; `None` for sources.
    pub fn operator(&self, handle: NodeHandle) -> Result<Option<&OperatorSpec<T>>, GraphError> {
        Ok(match &self.node(handle)?.kind {
            NodeKind::Source(_) => None,
            NodeKind::Derived { spec, .. } => Some(spec),
        })
    }

    /// Name of the operator behind a derived node.
    pub fn operator_name(&self, handle: NodeHandle) -> Result<Option<&'static str>, GraphError> {
        Ok(self.operator(handle)?.map(|spec| spec.name))
    }

    /// Inputs of a derived node; empty for sources.
    pub fn inputs(&self, handle: NodeHandle) -> Result<&[NodeHandle], GraphError> {
        let inputs: &[NodeHandle] = match &self.node(handle)?.kind {
            NodeKind::Source(_) => &[],
            NodeKind::Derived { inputs, .. } => inputs,
        };
        Ok(inputs)
    }

    /// Check if a node is an editable source.
    pub fn is_source(&self, handle: NodeHandle) -> bool {
        matches!(
            self.nodes.get(handle.0).map(|node| &node.kind),
            Some(NodeKind::Source(_))
        )
    }

    /// Move an event of a source timeline and propagate the change.
    ///
    /// Returns `Ok(false)` and notifies nobody when the id is unknown.
    pub fn move_event(
        &mut self,
        handle: NodeHandle,
        id: EventId,
        new_time: f64,
    ) -> Result<bool, GraphError> {
        if !self.source_mut(handle)?.move_event(id, new_time) {
            return Ok(false);
        }
        self.propagate(handle);
        Ok(true)
    }

    /// Replace every event of a source timeline and propagate the change.
    pub fn replace_events(
        &mut self,
        handle: NodeHandle,
        events: impl IntoIterator<Item = TimedEvent<T>>,
    ) -> Result<(), GraphError> {
        self.source_mut(handle)?.replace_all(events);
        self.propagate(handle);
        Ok(())
    }

    /// Observe a timeline. The callback runs once per change.
    pub fn subscribe(
        &mut self,
        handle: NodeHandle,
        callback: impl FnMut(&Timeline<T>) + 'static,
    ) -> Result<Subscription, GraphError> {
        let node = self
            .nodes
            .get_mut(handle.0)
            .ok_or(GraphError::UnknownHandle(handle))?;
        let id = node.subscribers.subscribe(callback);
        Ok(Subscription { node: handle, id })
    }

    /// Stop observing. Returns `false` if the subscription was already gone.
    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        self.nodes
            .get_mut(subscription.node.0)
            .is_some_and(|node| node.subscribers.unsubscribe(subscription.id))
    }

    fn node(&self, handle: NodeHandle) -> Result<&Node<T>, GraphError> {
        self.nodes
            .get(handle.0)
            .ok_or(GraphError::UnknownHandle(handle))
    }

    fn source_mut(&mut self, handle: NodeHandle) -> Result<&mut TimelineStore<T>, GraphError> {
        let node = self
            .nodes
            .get_mut(handle.0)
            .ok_or(GraphError::UnknownHandle(handle))?;
        match &mut node.kind {
            NodeKind::Source(store) => Ok(store),
            NodeKind::Derived { .. } => Err(GraphError::NotASource(handle)),
        }
    }

    /// Recompute everything downstream of `changed`, then notify.
    fn propagate(&mut self, changed: NodeHandle) {
        let mut dirty = vec![false; self.nodes.len()];
        dirty[changed.0] = true;
        let mut updated = vec![changed];

        for index in changed.0 + 1..self.nodes.len() {
            let NodeKind::Derived { spec, inputs, .. } = &self.nodes[index].kind else {
                continue;
            };
            if !inputs.iter().any(|input| dirty[input.0]) {
                continue;
            }

            let sources: Vec<&Timeline<T>> = inputs
                .iter()
                .map(|input| self.nodes[input.0].kind.timeline())
                .collect();
            let output = match spec.apply(&sources) {
                Ok(output) => output,
                Err(err) => {
                    warn!(node = index, %err, "skipping recomputation");
                    continue;
                }
            };

            if let NodeKind::Derived { timeline, .. } = &mut self.nodes[index].kind {
                *timeline = output;
            }
            dirty[index] = true;
            updated.push(NodeHandle(index));
        }

        trace!(source = %changed, recomputed = updated.len() - 1, "propagated change");

        for handle in updated {
            let Node { kind, subscribers } = &mut self.nodes[handle.0];
            subscribers.publish(kind.timeline());
        }
    }
}

impl<T: Clone + 'static> Default for MarbleGraph<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl MarbleGraph<String> {
    /// Bind a registered operator by name.
    pub fn bind_operator(
        &mut self,
        name: &str,
        inputs: &[NodeHandle],
    ) -> Result<NodeHandle, BindError> {
        let spec =
            registry::lookup(name).ok_or_else(|| BindError::UnknownOperator(name.to_string()))?;
        self.bind(spec, inputs)
    }
}
