//! # WIRE Core
//!
//! A W.I.R.E. (watts, current, resistance, EMF) solver for DC circuits built
//! from series and parallel groups of resistors and fixed-voltage devices.
//!
//! This library provides:
//! - A small text format for stating a circuit problem with partial facts
//! - A series/parallel network model with per-node metric slots
//! - A constraint-propagation solver that fills every slot it can
//! - Worksheet and JSON rendering of the result
//!
//! ## Architecture
//!
//! - [`dsl`] - Parser for the problem description language
//! - [`circuit`] - Problem types, validation and the network arena
//! - [`solver`] - Local identities, structural rules and the fixed-point driver
//! - [`report`] - Worksheet and JSON output
//!
//! ## Usage
//!
//! ### Native CLI
//!
//! ```bash
//! wire led_resistor.wire --format json
//! ```
//!
//! ### Library
//!
//! ```
//! use wire_core::circuit::{CircuitNode, Component, Problem, Source};
//!
//! let problem = Problem::new(
//!     Source::new("VS", 12.0),
//!     vec![Component::resistor("R1", 100.0), Component::resistor("R2", 200.0)],
//!     CircuitNode::series(vec![CircuitNode::leaf("R1"), CircuitNode::leaf("R2")]),
//! );
//! let solution = wire_core::solve(&problem).unwrap();
//! assert_eq!(solution.totals.resistance, Some(300.0));
//! ```
//!
//! ### WASM
//!
//! ```javascript
//! import { WasmWireSolver } from 'wire_core';
//!
//! const solver = new WasmWireSolver(problemText);
//! const solution = JSON.parse(solver.solve());
//! ```

pub mod circuit;
pub mod dsl;
pub mod error;
pub mod report;
pub mod solver;

// Re-export main types for convenience
pub use circuit::{Metric, Problem, WireMetrics};
pub use error::{Result, WireError};
pub use solver::{solve, Solution, Solver, SolverConfig};

// WASM bindings
#[cfg(feature = "wasm")]
mod wasm;

#[cfg(feature = "wasm")]
pub use wasm::WasmWireSolver;
