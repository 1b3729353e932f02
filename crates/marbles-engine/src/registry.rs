//! Named operator definitions.
//!
//! The registry is a fixed table built at compile time. Each entry pairs a
//! Combine-style name and description with a transform over string-valued
//! timelines, which is what the demo catalog and the UI work with.

use crate::graph::BindError;
use crate::operators as ops;
use crate::timeline::Timeline;
use std::fmt;

/// Number of values kept by the `prefix` demo.
pub const PREFIX_COUNT: usize = 3;

/// The function behind an operator, by number of sources.
pub enum Transform<T: 'static> {
    /// One source timeline.
    Unary(fn(&Timeline<T>) -> Timeline<T>),
    /// Two source timelines, order significant.
    Binary(fn(&Timeline<T>, &Timeline<T>) -> Timeline<T>),
}

impl<T> Clone for Transform<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Transform<T> {}

impl<T> fmt::Debug for Transform<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unary(_) => f.write_str("Unary"),
            Self::Binary(_) => f.write_str("Binary"),
        }
    }
}

/// An operator that can be bound to source timelines.
pub struct OperatorSpec<T: 'static> {
    /// Operator name, e.g. `combineLatest`.
    pub name: &'static str,
    /// Human-readable expression the operator demonstrates.
    pub description: &'static str,
    /// Output derivation.
    pub transform: Transform<T>,
}

impl<T> OperatorSpec<T> {
    /// Number of source timelines the operator takes.
    pub fn arity(&self) -> usize {
        match self.transform {
            Transform::Unary(_) => 1,
            Transform::Binary(_) => 2,
        }
    }

    /// Compute the output for the given source snapshots.
    pub fn apply(&self, sources: &[&Timeline<T>]) -> Result<Timeline<T>, BindError> {
        match (self.transform, sources) {
            (Transform::Unary(f), [source]) => Ok(f(source)),
            (Transform::Binary(f), [first, second]) => Ok(f(first, second)),
            _ => Err(BindError::ArityMismatch {
                operator: self.name.to_string(),
                expected: self.arity(),
                actual: sources.len(),
            }),
        }
    }
}

impl<T> Clone for OperatorSpec<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for OperatorSpec<T> {}

impl<T> fmt::Debug for OperatorSpec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperatorSpec")
            .field("name", &self.name)
            .field("arity", &self.arity())
            .finish_non_exhaustive()
    }
}

static OPERATORS: [OperatorSpec<String>; 10] = [
    OperatorSpec {
        name: "map",
        description: "publisher1.map { $0 * 2 }",
        transform: Transform::Unary(double),
    },
    OperatorSpec {
        name: "filter",
        description: "publisher1.filter { $0.isMultiple(of: 2) }",
        transform: Transform::Unary(even),
    },
    OperatorSpec {
        name: "removeDuplicates",
        description: "publisher1.removeDuplicates()",
        transform: Transform::Unary(ops::remove_duplicates),
    },
    OperatorSpec {
        name: "prefix",
        description: "publisher1.prefix(3)",
        transform: Transform::Unary(first_values),
    },
    OperatorSpec {
        name: "merge",
        description: "publisher1.merge(with: publisher2)",
        transform: Transform::Binary(ops::merge),
    },
    OperatorSpec {
        name: "zip",
        description: "publisher1.zip(publisher2)",
        transform: Transform::Binary(zip),
    },
    OperatorSpec {
        name: "flatMap",
        description: "publisher1.flatMap { value1 in publisher2.map { (value1, $0) } }",
        transform: Transform::Binary(flat_map),
    },
    OperatorSpec {
        name: "switchToLatest",
        description: "publisher1.map { value1 in publisher2.map { (value1, $0) } }.switchToLatest()",
        transform: Transform::Binary(switch_to_latest),
    },
    OperatorSpec {
        name: "combineLatest",
        description: "publisher1.combineLatest(publisher2)",
        transform: Transform::Binary(combine_latest),
    },
    OperatorSpec {
        name: "withLatestFrom",
        description: "publisher1.withLatestFrom(publisher2)",
        transform: Transform::Binary(ops::with_latest_from),
    },
];

/// All registered operators, in display order.
pub fn operators() -> &'static [OperatorSpec<String>] {
    &OPERATORS
}

/// Find an operator by exact name.
pub fn lookup(name: &str) -> Option<&'static OperatorSpec<String>> {
    OPERATORS.iter().find(|spec| spec.name == name)
}

/// Parse a marble label as an integer, the way the demos read values.
fn parse_number(value: &str) -> Option<i64> {
    value.trim().parse().ok()
}

/// Format a pair the way pairing operators label their marbles.
fn pair_label((first, second): &(String, String)) -> String {
    format!("({first},{second})")
}

fn double(source: &Timeline<String>) -> Timeline<String> {
    ops::map(source, |value| {
        (parse_number(value).unwrap_or(0) * 2).to_string()
    })
}

fn even(source: &Timeline<String>) -> Timeline<String> {
    ops::filter(source, |value| {
        parse_number(value).is_some_and(|n| n % 2 == 0)
    })
}

fn first_values(source: &Timeline<String>) -> Timeline<String> {
    ops::prefix(source, PREFIX_COUNT)
}

fn zip(first: &Timeline<String>, second: &Timeline<String>) -> Timeline<String> {
    ops::map(&ops::zip(first, second), pair_label)
}

fn flat_map(outer: &Timeline<String>, inner: &Timeline<String>) -> Timeline<String> {
    ops::map(&ops::flat_map(outer, inner), pair_label)
}

fn switch_to_latest(outer: &Timeline<String>, inner: &Timeline<String>) -> Timeline<String> {
    ops::map(&ops::switch_to_latest(outer, inner), pair_label)
}

fn combine_latest(first: &Timeline<String>, second: &Timeline<String>) -> Timeline<String> {
    ops::map(&ops::combine_latest(first, second), pair_label)
}
