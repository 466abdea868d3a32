//! WASM bindings for WIRE Core.
//!
//! This module provides JavaScript-friendly bindings for worksheet and
//! tutoring front ends running in a browser.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { WasmWireSolver } from 'wire_core';
//!
//! await init();
//!
//! const problem = `
//!   .source VS 12
//!   R1 100
//!   R2 200
//!   .tree series(R1, R2)
//!   .target R2 voltage
//! `;
//!
//! const solver = new WasmWireSolver(problem);
//! const solution = JSON.parse(solver.solve());
//! const answer = solver.target_value(); // 8
//! ```

use wasm_bindgen::prelude::*;

use crate::circuit::{Metric, Problem};
use crate::dsl;
use crate::solver::{Requirement, Solution, Solver, SolverConfig};

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// WASM-compatible WIRE solver.
///
/// Holds one problem; `solve` caches the solution so the lookup methods
/// can be called repeatedly.
#[wasm_bindgen]
pub struct WasmWireSolver {
    problem: Problem,
    solver: Solver,
    solution: Option<Solution>,
}

impl WasmWireSolver {
    fn from_problem(problem: Problem, config: SolverConfig) -> Self {
        Self {
            problem,
            solver: Solver::with_config(config),
            solution: None,
        }
    }
}

#[wasm_bindgen]
impl WasmWireSolver {
    /// Create a solver from problem text in the WIRE DSL.
    #[wasm_bindgen(constructor)]
    pub fn new(problem_text: &str) -> Result<WasmWireSolver, JsValue> {
        let problem = dsl::parse_problem(problem_text).map_err(js_error)?;
        Ok(Self::from_problem(problem, SolverConfig::new()))
    }

    /// Create a solver from a JSON problem.
    #[wasm_bindgen]
    pub fn from_json(problem_json: &str) -> Result<WasmWireSolver, JsValue> {
        let problem = Problem::from_json(problem_json).map_err(js_error)?;
        Ok(Self::from_problem(problem, SolverConfig::new()))
    }

    /// Create a solver with a custom tolerance, optionally requiring only the target.
    #[wasm_bindgen]
    pub fn with_config(problem_text: &str, tolerance: f64, target_only: bool) -> Result<WasmWireSolver, JsValue> {
        let problem = dsl::parse_problem(problem_text).map_err(js_error)?;
        let requirement = if target_only {
            Requirement::Target
        } else {
            Requirement::Complete
        };
        let config = SolverConfig::new()
            .with_tolerance(tolerance)
            .with_requirement(requirement);
        Ok(Self::from_problem(problem, config))
    }

    /// Solve the problem, returning the solution as JSON.
    #[wasm_bindgen]
    pub fn solve(&mut self) -> Result<String, JsValue> {
        let solution = self.solver.solve(&self.problem).map_err(js_error)?;
        let json = solution.to_json().map_err(js_error)?;
        self.solution = Some(solution);
        Ok(json)
    }

    /// Look up one solved value by node (component id, source id or `totals`)
    /// and metric name.
    ///
    /// Returns `undefined` before `solve`, for unknown names, or for
    /// unresolved values.
    #[wasm_bindgen]
    pub fn metric(&self, node: &str, metric: &str) -> Option<f64> {
        let metric = metric.parse::<Metric>().ok()?;
        self.solution
            .as_ref()?
            .metrics_for(node)
            .and_then(|m| m.get(metric))
    }

    /// The value of the problem's target after `solve`.
    #[wasm_bindgen]
    pub fn target_value(&self) -> Option<f64> {
        self.solution.as_ref()?.target_value()
    }
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
