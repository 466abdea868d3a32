//! Local identity resolver: Ohm's law and the power identities on one node.
//!
//! Each identity derives one metric from two others of the same node:
//!
//! | Output | Formula     | Ohmic only |
//! |--------|-------------|------------|
//! | E      | I · R       | yes        |
//! | I      | E / R       | yes        |
//! | R      | E / I       | no         |
//! | W      | E · I       | no         |
//! | I      | W / E       | no         |
//! | E      | W / I       | no         |
//! | R      | E² / W      | yes        |
//! | R      | W / I²      | yes        |
//! | I      | √(W / R)    | yes        |
//! | E      | √(W · R)    | yes        |
//!
//! A fixed-voltage leaf skips the Ohmic rows, so its voltage is never
//! defined through a resistance; `R = E / I` still reports its apparent
//! resistance once the current is known.

use crate::circuit::{Metric, NodeId};
use crate::error::{Result, WireError};

use super::workspace::Workspace;

/// How an identity combines its two inputs `a` and `b`.
#[derive(Debug, Clone, Copy)]
enum Op {
    /// a · b
    Product,
    /// a / b
    Quotient,
    /// a² / b
    SquareOver,
    /// a / b²
    OverSquare,
    /// √(a / b)
    RootQuotient,
    /// √(a · b)
    RootProduct,
}

impl Op {
    /// Evaluate; `None` when the denominator is zero.
    fn eval(self, a: f64, b: f64) -> Option<f64> {
        match self {
            Op::Product => Some(a * b),
            Op::RootProduct => Some((a * b).max(0.0).sqrt()),
            _ if b == 0.0 => None,
            Op::Quotient => Some(a / b),
            Op::SquareOver => Some(a * a / b),
            Op::OverSquare => Some(a / (b * b)),
            Op::RootQuotient => Some((a / b).max(0.0).sqrt()),
        }
    }
}

struct Identity {
    output: Metric,
    inputs: (Metric, Metric),
    op: Op,
    ohmic_only: bool,
}

const fn identity(output: Metric, a: Metric, b: Metric, op: Op, ohmic_only: bool) -> Identity {
    Identity {
        output,
        inputs: (a, b),
        op,
        ohmic_only,
    }
}

use crate::circuit::Metric::{Current as I, Resistance as R, Voltage as E, Watts as W};

const IDENTITIES: [Identity; 10] = [
    identity(E, I, R, Op::Product, true),
    identity(I, E, R, Op::Quotient, true),
    identity(R, E, I, Op::Quotient, false),
    identity(W, E, I, Op::Product, false),
    identity(I, W, E, Op::Quotient, false),
    identity(E, W, I, Op::Quotient, false),
    identity(R, E, W, Op::SquareOver, true),
    identity(R, W, I, Op::OverSquare, true),
    identity(I, W, R, Op::RootQuotient, true),
    identity(E, W, R, Op::RootProduct, true),
];

/// Apply the identities to `node` until none fires.
///
/// Returns whether any field was filled in. Identities whose output is
/// already known are evaluated as a consistency check.
pub fn resolve_node(ws: &mut Workspace<'_>, node: NodeId) -> Result<bool> {
    let ohmic = ws.network.node(node).is_ohmic();
    let mut changed = false;

    loop {
        let mut fired = false;
        for rule in IDENTITIES.iter().filter(|r| ohmic || !r.ohmic_only) {
            let (Some(a), Some(b)) = (ws.value(node, rule.inputs.0), ws.value(node, rule.inputs.1)) else {
                continue;
            };
            let output_known = ws.value(node, rule.output).is_some();
            match rule.op.eval(a, b) {
                Some(value) => fired |= ws.assign(node, rule.output, value)?,
                // Nothing to check against a known output
                None if output_known => {}
                None => return Err(WireError::division_by_zero(ws.label(node), rule.output)),
            }
        }
        if !fired {
            break;
        }
        changed = true;
    }

    Ok(changed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::{CircuitNode, Component, Network, Problem, Source, WireMetrics};
    use crate::solver::MetricTable;
    use approx::assert_relative_eq;

    fn single(component: Component) -> Network {
        let id = component.id.clone();
        let problem = Problem::new(Source::unknown("VS"), vec![component], CircuitNode::leaf(id));
        Network::build(&problem).unwrap()
    }

    fn resolve(net: &Network, givens: WireMetrics) -> Result<WireMetrics> {
        let mut table = MetricTable::new(net);
        let mut ws = Workspace::new(net, &mut table, 1e-6);
        ws.assign_all(net.root(), &givens)?;
        resolve_node(&mut ws, net.root())?;
        Ok(*table.get(net.root()))
    }

    #[test]
    fn test_voltage_and_resistance() {
        let net = single(Component::unknown_resistor("R1"));
        let m = resolve(&net, WireMetrics::new().with_voltage(24.0).with_resistance(600.0)).unwrap();
        assert_relative_eq!(m.current.unwrap(), 0.04, max_relative = 1e-12);
        assert_relative_eq!(m.watts.unwrap(), 0.96, max_relative = 1e-12);
        assert!(m.is_complete());
    }

    #[test]
    fn test_recovers_resistance_from_voltage_and_current() {
        let net = single(Component::unknown_resistor("R2"));
        let m = resolve(&net, WireMetrics::new().with_voltage(8.1).with_current(0.03)).unwrap();
        assert_relative_eq!(m.resistance.unwrap(), 270.0, max_relative = 1e-12);
    }

    #[test]
    fn test_power_and_resistance() {
        let net = single(Component::unknown_resistor("R1"));
        let m = resolve(&net, WireMetrics::new().with_watts(0.25).with_resistance(100.0)).unwrap();
        assert_relative_eq!(m.current.unwrap(), 0.05, max_relative = 1e-12);
        assert_relative_eq!(m.voltage.unwrap(), 5.0, max_relative = 1e-12);
    }

    #[test]
    fn test_power_and_current() {
        let net = single(Component::unknown_resistor("R1"));
        let m = resolve(&net, WireMetrics::new().with_watts(2.0).with_current(0.5)).unwrap();
        assert_relative_eq!(m.voltage.unwrap(), 4.0, max_relative = 1e-12);
        assert_relative_eq!(m.resistance.unwrap(), 8.0, max_relative = 1e-12);
    }

    #[test]
    fn test_single_fact_stays_partial() {
        let net = single(Component::unknown_resistor("R1"));
        let m = resolve(&net, WireMetrics::new().with_voltage(12.0)).unwrap();
        assert_eq!(m.known_count(), 1);
    }

    #[test]
    fn test_zero_resistance_is_division_by_zero() {
        let net = single(Component::unknown_resistor("R1"));
        let err = resolve(&net, WireMetrics::new().with_voltage(5.0).with_resistance(0.0)).unwrap_err();
        assert!(matches!(
            err,
            WireError::DivisionByZero { ref node, metric: Metric::Current } if node == "R1"
        ));
    }

    #[test]
    fn test_inconsistent_givens_conflict() {
        let net = single(Component::unknown_resistor("R1"));
        let err = resolve(
            &net,
            WireMetrics::new()
                .with_voltage(10.0)
                .with_current(1.0)
                .with_resistance(20.0),
        )
        .unwrap_err();
        assert!(matches!(err, WireError::ConflictingGivens { .. }));
    }

    #[test]
    fn test_fixed_voltage_leaf() {
        let net = single(Component::fixed_voltage("LED1", 2.0));
        // Voltage plus resistance does not define a current for an LED
        let m = resolve(&net, WireMetrics::new().with_voltage(2.0).with_resistance(100.0)).unwrap();
        assert!(m.current.is_none());

        // Once current is known the apparent resistance and power follow
        let m = resolve(&net, WireMetrics::new().with_voltage(2.0).with_current(0.02)).unwrap();
        assert_relative_eq!(m.resistance.unwrap(), 100.0, max_relative = 1e-12);
        assert_relative_eq!(m.watts.unwrap(), 0.04, max_relative = 1e-12);
    }
}
