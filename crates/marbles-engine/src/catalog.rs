//! Demo catalog: seed timelines for every registered operator.
//!
//! The catalog is built once at startup, either from the built-in seeds or
//! from a [`Config`] whose demos replace the built-in seeds of the same
//! operator. A [`Demo`] is instantiated into a [`DemoSession`], which owns the
//! graph the UI edits.

use crate::config::{Config, DemoConfig};
use crate::event::{EventId, TimedEvent};
use crate::graph::{BindError, MarbleGraph, NodeHandle};
use crate::registry::{self, OperatorSpec};
use crate::timeline::Timeline;
use tracing::{debug, warn};

/// Seed timelines for one operator.
#[derive(Debug, Clone)]
pub struct Demo {
    /// The demonstrated operator.
    pub operator: &'static OperatorSpec<String>,
    /// One event list per operator source.
    pub sources: Vec<Vec<TimedEvent<String>>>,
}

impl Demo {
    /// Create a demo, checking the number of sources against the operator.
    pub fn new(
        operator: &'static OperatorSpec<String>,
        sources: Vec<Vec<TimedEvent<String>>>,
    ) -> Result<Self, CatalogError> {
        if sources.len() != operator.arity() {
            return Err(CatalogError::InvalidDemo(BindError::ArityMismatch {
                operator: operator.name.to_string(),
                expected: operator.arity(),
                actual: sources.len(),
            }));
        }
        Ok(Self { operator, sources })
    }

    /// Operator name.
    pub fn name(&self) -> &'static str {
        self.operator.name
    }

    /// Operator description.
    pub fn description(&self) -> &'static str {
        self.operator.description
    }

    /// Build a fresh graph with one source per seed list and the operator
    /// bound over them.
    pub fn instantiate(&self) -> Result<DemoSession, BindError> {
        let mut graph = MarbleGraph::new();
        let sources: Vec<NodeHandle> = self
            .sources
            .iter()
            .map(|events| graph.create_source(events.iter().cloned()))
            .collect();
        let result = graph.bind(self.operator, &sources)?;
        Ok(DemoSession {
            graph,
            sources,
            result,
        })
    }
}

/// A live demo: editable sources and the derived result.
#[derive(Debug)]
pub struct DemoSession {
    graph: MarbleGraph<String>,
    sources: Vec<NodeHandle>,
    result: NodeHandle,
}

impl DemoSession {
    /// The underlying graph.
    pub fn graph(&self) -> &MarbleGraph<String> {
        &self.graph
    }

    /// Mutable access, e.g. to subscribe.
    pub fn graph_mut(&mut self) -> &mut MarbleGraph<String> {
        &mut self.graph
    }

    /// Source handles, in operator order.
    pub fn sources(&self) -> &[NodeHandle] {
        &self.sources
    }

    /// Handle of the derived result.
    pub fn result(&self) -> NodeHandle {
        self.result
    }

    /// Snapshot of the source at `index`.
    pub fn source_timeline(&self, index: usize) -> Option<&Timeline<String>> {
        let handle = *self.sources.get(index)?;
        self.graph.snapshot(handle).ok()
    }

    /// Snapshot of the derived result.
    pub fn result_timeline(&self) -> Option<&Timeline<String>> {
        self.graph.snapshot(self.result).ok()
    }

    /// Move an event of a source by id.
    ///
    /// Returns `false` when the source index or the id is unknown.
    pub fn move_event(&mut self, source_index: usize, id: EventId, time: f64) -> bool {
        let Some(&handle) = self.sources.get(source_index) else {
            return false;
        };
        self.graph.move_event(handle, id, time).unwrap_or(false)
    }

    /// Move the `event_index`-th event (in current time order) of a source.
    ///
    /// Out-of-range indices are a no-op.
    pub fn move_source_event(&mut self, source_index: usize, event_index: usize, time: f64) -> bool {
        let Some(id) = self
            .source_timeline(source_index)
            .and_then(|timeline| timeline.events().get(event_index))
            .map(TimedEvent::id)
        else {
            return false;
        };
        self.move_event(source_index, id, time)
    }
}

/// Errors raised when building a catalog.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    /// A demo names an unregistered operator or has the wrong source count.
    #[error("invalid demo: {0}")]
    InvalidDemo(#[from] BindError),
}

/// Ordered set of demos, one per operator.
#[derive(Debug, Clone)]
pub struct Catalog {
    demos: Vec<Demo>,
}

impl Catalog {
    /// The built-in demos, in display order.
    pub fn builtin() -> Self {
        let demos = registry::operators()
            .iter()
            .map(|operator| Demo {
                operator,
                sources: builtin_seeds(operator.name),
            })
            .collect();
        Self { demos }
    }

    /// The built-in demos with seeds replaced by the config's demos.
    pub fn from_config(config: &Config) -> Result<Self, CatalogError> {
        let mut catalog = Self::builtin();
        for entry in &config.demos {
            let Some(operator) = registry::lookup(&entry.operator) else {
                warn!(operator = %entry.operator, "config names an unknown operator");
                return Err(BindError::UnknownOperator(entry.operator.clone()).into());
            };
            let demo = Demo::new(operator, entry.sources.clone()).inspect_err(|err| {
                warn!(operator = %entry.operator, error = %err, "rejected config demo");
            })?;
            if let Some(slot) = catalog
                .demos
                .iter_mut()
                .find(|existing| existing.name() == demo.name())
            {
                debug!(operator = demo.name(), "overriding built-in seeds");
                *slot = demo;
            }
        }
        Ok(catalog)
    }

    /// Configuration listing the seeds of every demo, ready to be edited.
    pub fn to_config(&self) -> Config {
        Config {
            demos: self
                .demos
                .iter()
                .map(|demo| DemoConfig {
                    operator: demo.name().to_string(),
                    sources: demo.sources.clone(),
                })
                .collect(),
            ..Config::default()
        }
    }

    /// All demos, in display order.
    pub fn demos(&self) -> &[Demo] {
        &self.demos
    }

    /// Demo at a display position.
    pub fn get(&self, index: usize) -> Option<&Demo> {
        self.demos.get(index)
    }

    /// Demo by operator name.
    pub fn find(&self, name: &str) -> Option<&Demo> {
        self.demos.iter().find(|demo| demo.name() == name)
    }

    /// Display position of an operator.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.demos.iter().position(|demo| demo.name() == name)
    }

    /// Number of demos.
    pub fn len(&self) -> usize {
        self.demos.len()
    }

    /// Check if the catalog has no demos.
    pub fn is_empty(&self) -> bool {
        self.demos.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn out(time: f64, value: &str) -> TimedEvent<String> {
    TimedEvent::output(time, value.to_string())
}

fn outputs(seeds: &[(f64, &str)], end: f64) -> Vec<TimedEvent<String>> {
    seeds
        .iter()
        .map(|&(time, value)| out(time, value))
        .chain(std::iter::once(TimedEvent::finished(end)))
        .collect()
}

fn builtin_seeds(operator: &str) -> Vec<Vec<TimedEvent<String>>> {
    let numbers = || outputs(&[(0.2, "1"), (0.35, "2"), (0.5, "3"), (0.65, "4"), (0.8, "5")], 1.0);
    let inner = || outputs(&[(0.05, "A"), (0.15, "B"), (0.25, "C")], 0.35);
    let outer = || outputs(&[(0.02, "1"), (0.35, "2"), (0.7, "3")], 1.0);
    let letters = || outputs(&[(0.1, "A"), (0.4, "B"), (0.7, "C")], 0.8);

    match operator {
        "map" => vec![outputs(&[(0.25, "1"), (0.5, "2"), (0.75, "3")], 1.0)],
        "filter" | "prefix" => vec![numbers()],
        "removeDuplicates" => vec![outputs(
            &[
                (0.1, "1"),
                (0.25, "2"),
                (0.4, "2"),
                (0.55, "3"),
                (0.7, "2"),
                (0.85, "5"),
            ],
            1.0,
        )],
        "merge" => vec![
            letters(),
            outputs(&[(0.25, "D"), (0.55, "E"), (0.85, "F")], 1.0),
        ],
        "zip" => vec![
            letters(),
            outputs(&[(0.25, "D"), (0.55, "E"), (0.85, "F")], 0.9),
        ],
        "flatMap" | "switchToLatest" => vec![outer(), inner()],
        "combineLatest" => vec![
            outputs(&[(0.25, "1"), (0.5, "2"), (0.7, "3")], 1.0),
            outputs(&[(0.1, "A"), (0.4, "B"), (0.8, "C")], 1.0),
        ],
        "withLatestFrom" => vec![
            outputs(&[(0.25, "1"), (0.5, "2"), (0.8, "3")], 1.0),
            outputs(&[(0.3, "A"), (0.4, "B"), (0.6, "C")], 0.7),
        ],
        _ => Vec::new(),
    }
}
