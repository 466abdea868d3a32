//! Fixed-point iteration over the identity and structural rules.

use crate::circuit::{Metric, Network, NodeId};
use crate::error::{Result, WireError};

use super::identity::resolve_node;
use super::structural::propagate;
use super::workspace::{MetricTable, Workspace};
use super::DEFAULT_TOLERANCE;

/// Outcome of a driver run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PassReport {
    /// Full passes over the network, including the final quiet one
    pub passes: usize,
    /// Fields moved from unknown to known
    pub assignments: usize,
}

/// Drives the local and structural rules to a fixed point.
pub struct FixedPointDriver {
    /// Relative tolerance for comparing two derivations of one field
    pub tolerance: f64,
}

impl Default for FixedPointDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl FixedPointDriver {
    /// Create a driver with the default tolerance.
    pub fn new() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
        }
    }

    /// Create a driver with a custom tolerance.
    pub fn with_tolerance(tolerance: f64) -> Self {
        Self { tolerance }
    }

    /// Build the initial table: component givens on their leaves, then the
    /// source givens and the totals override on the root.
    pub fn seed(&self, network: &Network) -> Result<MetricTable> {
        let mut table = MetricTable::new(network);
        let mut ws = Workspace::new(network, &mut table, self.tolerance);

        for ((_, leaf), givens) in network.component_ids().iter().zip(network.component_givens()) {
            ws.assign_all(*leaf, givens)?;
        }

        let root = network.root();
        ws.assign_all(root, &network.source().givens)?;
        if let Some(totals) = network.totals_override() {
            // A field given twice must agree; neither source wins
            ws.assign_all(root, totals)?;
        }

        Ok(table)
    }

    /// Run passes until nothing changes.
    ///
    /// Every pass visits nodes children-first, applying the identities to
    /// each node and the group rules to each composite. Fields only ever go
    /// from unknown to known, so a table with `n` nodes settles within
    /// `4n + 1` passes.
    pub fn run(&self, network: &Network, table: &mut MetricTable) -> Result<PassReport> {
        let max_passes = 4 * network.len() + 1;
        let mut ws = Workspace::new(network, table, self.tolerance);
        let mut passes = 0;

        loop {
            passes += 1;
            let before = ws.assignments();
            let mut changed = false;

            for index in 0..network.len() {
                let node = NodeId(index);
                changed |= resolve_node(&mut ws, node)?;
                if network.node(node).is_composite() {
                    changed |= propagate(&mut ws, node)?;
                }
            }

            tracing::debug!(
                pass = passes,
                assignments = ws.assignments() - before,
                "fixed-point pass"
            );

            if !changed || passes >= max_passes {
                break;
            }
        }

        Ok(PassReport {
            passes,
            assignments: ws.assignments(),
        })
    }

    /// Report the first unknown field among `required` slots.
    pub fn check(&self, network: &Network, table: &MetricTable, required: &[(NodeId, Metric)]) -> Result<()> {
        match required.iter().find(|(node, metric)| table.value(*node, *metric).is_none()) {
            Some((node, metric)) => Err(WireError::UnderDetermined {
                node: network.node(*node).label.clone(),
                metric: *metric,
            }),
            None => Ok(()),
        }
    }

    /// Every slot of every node, root first, each node in W, I, R, E order.
    pub fn all_slots(network: &Network) -> Vec<(NodeId, Metric)> {
        network
            .pre_order()
            .into_iter()
            .flat_map(|node| Metric::ALL.into_iter().map(move |m| (node, m)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::{CircuitNode, Component, Problem, Source, WireMetrics};
    use approx::assert_relative_eq;

    fn run(problem: &Problem) -> Result<(Network, MetricTable, PassReport)> {
        let network = Network::build(problem)?;
        let driver = FixedPointDriver::new();
        let mut table = driver.seed(&network)?;
        let report = driver.run(&network, &mut table)?;
        Ok((network, table, report))
    }

    #[test]
    fn test_series_resolves() {
        let problem = Problem::new(
            Source::new("VS", 24.0),
            vec![
                Component::resistor("R1", 150.0),
                Component::resistor("R2", 200.0),
                Component::resistor("R3", 250.0),
            ],
            CircuitNode::series(vec![
                CircuitNode::leaf("R1"),
                CircuitNode::leaf("R2"),
                CircuitNode::leaf("R3"),
            ]),
        );
        let (net, table, report) = run(&problem).unwrap();
        assert_eq!(table.unknown_count(), 0);
        assert!(report.passes >= 2);
        assert_relative_eq!(table.value(net.root(), Metric::Current).unwrap(), 0.04, max_relative = 1e-12);
    }

    #[test]
    fn test_rerun_is_idempotent() {
        let problem = Problem::new(
            Source::new("VS", 12.0),
            vec![Component::resistor("R1", 4.0), Component::resistor("R2", 12.0)],
            CircuitNode::parallel(vec![CircuitNode::leaf("R1"), CircuitNode::leaf("R2")]),
        );
        let (net, mut table, _) = run(&problem).unwrap();
        let snapshot = table.clone();

        let again = FixedPointDriver::new().run(&net, &mut table).unwrap();
        assert_eq!(again.assignments, 0);
        assert_eq!(again.passes, 1);
        assert_eq!(table, snapshot);
    }

    #[test]
    fn test_source_and_override_must_agree() {
        let problem = Problem::new(
            Source::new("VS", 24.0),
            vec![Component::resistor("R1", 100.0)],
            CircuitNode::leaf("R1"),
        )
        .with_totals(WireMetrics::new().with_voltage(12.0));
        let err = run(&problem).unwrap_err();
        assert!(matches!(
            err,
            WireError::ConflictingGivens { metric: Metric::Voltage, first, second, .. }
                if first == 24.0 && second == 12.0
        ));
    }

    #[test]
    fn test_inconsistent_total_current() {
        // 24 V across 300 Ω is 80 mA, not 100 mA
        let problem = Problem::new(
            Source::new("VS", 24.0),
            vec![Component::resistor("R1", 100.0), Component::resistor("R2", 200.0)],
            CircuitNode::series(vec![CircuitNode::leaf("R1"), CircuitNode::leaf("R2")]),
        )
        .with_totals(WireMetrics::new().with_current(0.1));
        assert!(matches!(run(&problem), Err(WireError::ConflictingGivens { .. })));
    }

    #[test]
    fn test_stall_names_first_unknown() {
        let problem = Problem::new(
            Source::new("VS", 24.0),
            vec![Component::unknown_resistor("R1"), Component::unknown_resistor("R2")],
            CircuitNode::series(vec![CircuitNode::leaf("R1"), CircuitNode::leaf("R2")]),
        );
        let (net, table, report) = run(&problem).unwrap();
        assert_eq!(report.assignments, 0);

        let err = FixedPointDriver::new()
            .check(&net, &table, &FixedPointDriver::all_slots(&net))
            .unwrap_err();
        match err {
            WireError::UnderDetermined { node, metric } => {
                assert_eq!(node, "totals");
                assert_eq!(metric, Metric::Watts);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
