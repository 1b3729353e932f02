//! marbles-engine: Event-stream transformation engine for marble diagrams
//!
//! This crate provides the core of marbles, including:
//! - Timed events and normalized timelines
//! - The time-edit rule and editable timeline stores
//! - Pure operator functions (map, filter, zip, combineLatest, ...)
//! - A reactive graph that recomputes derived timelines on every edit
//! - The demo catalog and its JSON configuration

pub mod catalog;
pub mod config;
pub mod edit;
pub mod event;
pub mod graph;
pub mod observe;
pub mod operators;
pub mod registry;
pub mod store;
pub mod timeline;

// Re-export commonly used types
pub use catalog::{Catalog, CatalogError, Demo, DemoSession};
pub use config::{Config, ConfigError, DemoConfig, CONFIG_FILE};
pub use edit::{apply_move, clamp_time, EPSILON};
pub use event::{EventId, EventKind, TimedEvent};
pub use graph::{BindError, GraphError, MarbleGraph, NodeHandle, Subscription};
pub use observe::{Subscribers, SubscriptionId};
pub use registry::{lookup, operators, OperatorSpec, Transform};
pub use store::TimelineStore;
pub use timeline::Timeline;

/// Returns the engine version.
pub fn engine_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
