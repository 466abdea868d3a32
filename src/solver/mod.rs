//! WIRE constraint-propagation solver.
//!
//! This module turns a partially specified [`Network`](crate::circuit::Network)
//! into a fully resolved metrics table.
//!
//! ## Method
//!
//! Every node of the series/parallel tree carries four slots (W, I, R, E)
//! that start unknown except for the givens. Two families of rules fill
//! them in:
//!
//! - **Local identities** relate the four metrics of one node (Ohm's law and
//!   the power formulas).
//! - **Structural rules** relate a group to its children: a series group
//!   shares its current and sums voltages, resistances and powers; a
//!   parallel group shares its voltage and sums currents, conductances and
//!   powers. Each additive rule also runs backward when exactly one child is
//!   unknown.
//!
//! The fixed-point driver sweeps both rule families over the whole tree
//! until a pass changes nothing. Rules only ever fill an unknown slot, and
//! compare against a slot that is already known, so the sweep terminates
//! and over-specified problems surface as
//! [`WireError::ConflictingGivens`](crate::WireError::ConflictingGivens).

mod driver;
mod engine;
mod identity;
mod solution;
mod structural;
mod workspace;

pub use driver::{FixedPointDriver, PassReport};
pub use engine::{solve, Requirement, Solver, SolverConfig};
pub use identity::resolve_node;
pub use solution::{NamedMetrics, Solution};
pub use structural::propagate;
pub use workspace::{agrees, MetricTable, Workspace};

/// Default relative tolerance for comparing two derivations of one field.
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

/// Absolute floor added to the relative tolerance, so values near zero compare sanely.
pub const ABSOLUTE_TOLERANCE: f64 = 1e-12;
