//! Structural propagator: series/parallel rules between a group and its children.
//!
//! | Group    | Shared  | Additive        | Reciprocal-additive |
//! |----------|---------|-----------------|---------------------|
//! | Series   | current | voltage, R, W   | -                   |
//! | Parallel | voltage | current, W      | resistance          |
//!
//! Additive quantities fire forward (all children known, group = Σ) and
//! backward (group and all but one child known, remaining child =
//! group − Σ others). Resistance in a parallel group does the same on
//! conductances.

use crate::circuit::{Metric, NodeId, NodeKind};
use crate::error::{Result, WireError};

use super::workspace::{agrees, Workspace};

/// Apply the group rules of `node`. Leaves are left untouched.
pub fn propagate(ws: &mut Workspace<'_>, node: NodeId) -> Result<bool> {
    let network = ws.network;
    let group = network.node(node);
    let children = group.children.as_slice();

    let mut changed = false;
    match group.kind {
        NodeKind::Leaf { .. } => {}
        NodeKind::Series => {
            changed |= shared(ws, node, children, Metric::Current)?;
            changed |= additive(ws, node, children, Metric::Voltage)?;
            changed |= additive(ws, node, children, Metric::Resistance)?;
            changed |= additive(ws, node, children, Metric::Watts)?;
        }
        NodeKind::Parallel => {
            changed |= shared(ws, node, children, Metric::Voltage)?;
            changed |= additive(ws, node, children, Metric::Current)?;
            changed |= reciprocal(ws, node, children, Metric::Resistance)?;
            changed |= additive(ws, node, children, Metric::Watts)?;
        }
    }
    Ok(changed)
}

/// The group and every child carry the same value.
fn shared(ws: &mut Workspace<'_>, node: NodeId, children: &[NodeId], metric: Metric) -> Result<bool> {
    let known = std::iter::once(node)
        .chain(children.iter().copied())
        .find_map(|id| ws.value(id, metric));
    let Some(value) = known else {
        return Ok(false);
    };

    let mut changed = ws.assign(node, metric, value)?;
    for &child in children {
        changed |= ws.assign(child, metric, value)?;
    }
    Ok(changed)
}

/// The group value is the sum of the children's values.
fn additive(ws: &mut Workspace<'_>, node: NodeId, children: &[NodeId], metric: Metric) -> Result<bool> {
    let mut unknown = None;
    let mut unknown_count = 0;
    let mut known_sum = 0.0;
    for &child in children {
        match ws.value(child, metric) {
            Some(v) => known_sum += v,
            None => {
                unknown = Some(child);
                unknown_count += 1;
            }
        }
    }

    match (unknown_count, unknown, ws.value(node, metric)) {
        (0, _, _) => ws.assign(node, metric, known_sum),
        (1, Some(child), Some(total)) => {
            let remainder = total - known_sum;
            if metric == Metric::Resistance && remainder < 0.0 {
                // More resistance in the known children than in the whole group
                if !agrees(total, known_sum, ws.tolerance()) {
                    return Err(WireError::conflict(ws.label(node), metric, total, known_sum));
                }
                return ws.assign(child, metric, 0.0);
            }
            ws.assign(child, metric, remainder)
        }
        _ => Ok(false),
    }
}

/// The group's reciprocal is the sum of the children's reciprocals.
fn reciprocal(ws: &mut Workspace<'_>, node: NodeId, children: &[NodeId], metric: Metric) -> Result<bool> {
    let mut unknown = None;
    let mut unknown_count = 0;
    let mut known_sum = 0.0;
    for &child in children {
        match ws.value(child, metric) {
            Some(v) if v == 0.0 => return Err(WireError::division_by_zero(ws.label(node), metric)),
            Some(v) => known_sum += 1.0 / v,
            None => {
                unknown = Some(child);
                unknown_count += 1;
            }
        }
    }

    match (unknown_count, unknown, ws.value(node, metric)) {
        (0, _, _) => ws.assign(node, metric, 1.0 / known_sum),
        (1, Some(child), Some(total)) => {
            if total == 0.0 {
                return Err(WireError::division_by_zero(ws.label(node), metric));
            }
            let group = 1.0 / total;
            let remainder = group - known_sum;
            if agrees(group, known_sum, ws.tolerance()) {
                // Nothing left for the last branch: an open circuit
                return Err(WireError::division_by_zero(ws.label(child), metric));
            }
            if remainder < 0.0 {
                return Err(WireError::conflict(ws.label(node), metric, total, 1.0 / known_sum));
            }
            ws.assign(child, metric, 1.0 / remainder)
        }
        _ => Ok(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::{CircuitNode, Component, Network, Problem, Source, WireMetrics};
    use crate::solver::MetricTable;
    use approx::assert_relative_eq;

    fn network(components: Vec<Component>, tree: CircuitNode) -> Network {
        Network::build(&Problem::new(Source::unknown("VS"), components, tree)).unwrap()
    }

    fn seed(ws: &mut Workspace<'_>, net: &Network) {
        for ((_, leaf), givens) in net.component_ids().iter().zip(net.component_givens()) {
            ws.assign_all(*leaf, givens).unwrap();
        }
    }

    #[test]
    fn test_series_sums_and_shares_current() {
        let net = network(
            vec![
                Component::resistor("R1", 150.0).with_givens(WireMetrics::new().with_resistance(150.0).with_voltage(6.0)),
                Component::resistor("R2", 250.0).with_givens(WireMetrics::new().with_resistance(250.0).with_voltage(10.0)),
            ],
            CircuitNode::series(vec![CircuitNode::leaf("R1"), CircuitNode::leaf("R2")]),
        );
        let mut table = MetricTable::new(&net);
        let mut ws = Workspace::new(&net, &mut table, 1e-6);
        seed(&mut ws, &net);
        ws.assign(net.root(), Metric::Current, 0.04).unwrap();

        assert!(propagate(&mut ws, net.root()).unwrap());
        let r2 = net.leaf("R2").unwrap();
        assert_eq!(ws.value(r2, Metric::Current), Some(0.04));
        assert_relative_eq!(ws.value(net.root(), Metric::Voltage).unwrap(), 16.0, max_relative = 1e-12);
        assert_relative_eq!(ws.value(net.root(), Metric::Resistance).unwrap(), 400.0, max_relative = 1e-12);
    }

    #[test]
    fn test_series_backward_kvl() {
        let net = network(
            vec![Component::resistor("R1", 330.0), Component::unknown_resistor("R2")],
            CircuitNode::series(vec![CircuitNode::leaf("R1"), CircuitNode::leaf("R2")]),
        );
        let mut table = MetricTable::new(&net);
        let mut ws = Workspace::new(&net, &mut table, 1e-6);
        seed(&mut ws, &net);
        ws.assign(net.root(), Metric::Resistance, 600.0).unwrap();

        propagate(&mut ws, net.root()).unwrap();
        let r2 = net.leaf("R2").unwrap();
        assert_relative_eq!(ws.value(r2, Metric::Resistance).unwrap(), 270.0, max_relative = 1e-12);
    }

    #[test]
    fn test_series_negative_remainder_conflicts() {
        let net = network(
            vec![Component::resistor("R1", 330.0), Component::unknown_resistor("R2")],
            CircuitNode::series(vec![CircuitNode::leaf("R1"), CircuitNode::leaf("R2")]),
        );
        let mut table = MetricTable::new(&net);
        let mut ws = Workspace::new(&net, &mut table, 1e-6);
        seed(&mut ws, &net);
        ws.assign(net.root(), Metric::Resistance, 300.0).unwrap();
        assert!(matches!(
            propagate(&mut ws, net.root()),
            Err(WireError::ConflictingGivens { .. })
        ));
    }

    #[test]
    fn test_parallel_conductance() {
        let net = network(
            vec![Component::resistor("R1", 100.0), Component::resistor("R2", 200.0)],
            CircuitNode::parallel(vec![CircuitNode::leaf("R1"), CircuitNode::leaf("R2")]),
        );
        let mut table = MetricTable::new(&net);
        let mut ws = Workspace::new(&net, &mut table, 1e-6);
        seed(&mut ws, &net);
        ws.assign(net.root(), Metric::Voltage, 24.0).unwrap();

        propagate(&mut ws, net.root()).unwrap();
        assert_relative_eq!(
            ws.value(net.root(), Metric::Resistance).unwrap(),
            200.0 / 3.0,
            max_relative = 1e-12
        );
        assert_eq!(ws.value(net.leaf("R1").unwrap(), Metric::Voltage), Some(24.0));
    }

    #[test]
    fn test_parallel_backward_conductance() {
        let net = network(
            vec![Component::resistor("R1", 100.0), Component::unknown_resistor("R2")],
            CircuitNode::parallel(vec![CircuitNode::leaf("R1"), CircuitNode::leaf("R2")]),
        );
        let mut table = MetricTable::new(&net);
        let mut ws = Workspace::new(&net, &mut table, 1e-6);
        seed(&mut ws, &net);
        ws.assign(net.root(), Metric::Resistance, 200.0 / 3.0).unwrap();

        propagate(&mut ws, net.root()).unwrap();
        assert_relative_eq!(
            ws.value(net.leaf("R2").unwrap(), Metric::Resistance).unwrap(),
            200.0,
            max_relative = 1e-9
        );
    }

    #[test]
    fn test_parallel_short_is_division_by_zero() {
        let net = network(
            vec![Component::resistor("R1", 0.0), Component::resistor("R2", 200.0)],
            CircuitNode::parallel(vec![CircuitNode::leaf("R1"), CircuitNode::leaf("R2")]),
        );
        let mut table = MetricTable::new(&net);
        let mut ws = Workspace::new(&net, &mut table, 1e-6);
        seed(&mut ws, &net);
        assert!(matches!(
            propagate(&mut ws, net.root()),
            Err(WireError::DivisionByZero { .. })
        ));
    }

    #[test]
    fn test_parallel_mismatched_fixed_voltage_conflicts() {
        let net = network(
            vec![Component::fixed_voltage("LED1", 2.0), Component::resistor("R1", 100.0)],
            CircuitNode::parallel(vec![CircuitNode::leaf("LED1"), CircuitNode::leaf("R1")]),
        );
        let mut table = MetricTable::new(&net);
        let mut ws = Workspace::new(&net, &mut table, 1e-6);
        seed(&mut ws, &net);
        ws.assign(net.root(), Metric::Voltage, 9.0).unwrap();
        assert!(matches!(
            propagate(&mut ws, net.root()),
            Err(WireError::ConflictingGivens { metric: Metric::Voltage, .. })
        ));
    }
}
