//! Circuit model: problem definitions, WIRE metrics and the solver network.
//!
//! A [`Problem`] is the author-facing description (components, givens and a
//! series/parallel [`CircuitNode`] tree). [`Network::build`] validates it and
//! flattens the tree into an arena the solver works on.

mod graph;
mod problem;
mod types;
mod validate;

pub use graph::{NetNode, Network, NodeKind};
pub use problem::{Behavior, CircuitNode, Component, Problem, Source, TargetMetric};
pub use types::*;
pub use validate::validate_problem;

/// Label of the root node in solutions and diagnostics.
pub const TOTALS_LABEL: &str = "totals";
