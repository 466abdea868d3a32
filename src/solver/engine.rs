//! Main solver interface.

use crate::circuit::{Metric, Network, NodeId, Problem};
use crate::error::{Result, WireError};

use super::driver::FixedPointDriver;
use super::solution::Solution;
use super::DEFAULT_TOLERANCE;

/// Which fields must be known for a solve to succeed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Requirement {
    /// Every metric of every node.
    #[default]
    Complete,
    /// Only the problem's target; problems without a target need everything.
    Target,
}

/// Configuration for the solver.
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Relative tolerance when two derivations of one field meet.
    pub tolerance: f64,
    /// Fields that must resolve.
    pub requirement: Requirement,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            requirement: Requirement::Complete,
        }
    }
}

impl SolverConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the relative tolerance.
    ///
    /// Problems whose givens are rounded (e.g. a measured 33.3 mA) may need
    /// a looser tolerance such as 1e-3 to avoid spurious conflicts.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set which fields must resolve.
    pub fn with_requirement(mut self, requirement: Requirement) -> Self {
        self.requirement = requirement;
        self
    }
}

/// The WIRE solver.
#[derive(Debug, Clone, Default)]
pub struct Solver {
    config: SolverConfig,
}

impl Solver {
    /// Create a solver with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a solver with custom configuration.
    pub fn with_config(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Validate, build and solve a problem.
    pub fn solve(&self, problem: &Problem) -> Result<Solution> {
        let network = Network::build(problem)?;
        self.solve_network(&network)
    }

    /// Solve an already-built network.
    pub fn solve_network(&self, network: &Network) -> Result<Solution> {
        let driver = FixedPointDriver::with_tolerance(self.config.tolerance);
        let mut table = driver.seed(network)?;
        let report = driver.run(network, &mut table)?;

        let required = self.required_slots(network)?;
        driver.check(network, &table, &required)?;

        tracing::info!(
            passes = report.passes,
            nodes = network.len(),
            assignments = report.assignments,
            "network resolved"
        );

        Ok(Solution::project(network, &table, report))
    }

    fn required_slots(&self, network: &Network) -> Result<Vec<(NodeId, Metric)>> {
        match (self.config.requirement, network.target()) {
            (Requirement::Target, Some(target)) => {
                let node = network
                    .find(&target.node)
                    .ok_or_else(|| WireError::UnknownComponent {
                        id: target.node.clone(),
                    })?;
                Ok(vec![(node, target.metric)])
            }
            _ => Ok(FixedPointDriver::all_slots(network)),
        }
    }
}

/// Solve a problem with the default configuration.
pub fn solve(problem: &Problem) -> Result<Solution> {
    Solver::new().solve(problem)
}
