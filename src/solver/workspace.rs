//! Metric table and the single write path every rule goes through.

use crate::circuit::{Metric, Network, NodeId, WireMetrics};
use crate::error::{Result, WireError};

use super::ABSOLUTE_TOLERANCE;

/// Per-node metrics, indexed like [`Network::nodes`].
#[derive(Debug, Clone, PartialEq)]
pub struct MetricTable {
    metrics: Vec<WireMetrics>,
}

impl MetricTable {
    /// An all-unknown table for `network`.
    pub fn new(network: &Network) -> Self {
        Self {
            metrics: vec![WireMetrics::default(); network.len()],
        }
    }

    pub fn get(&self, node: NodeId) -> &WireMetrics {
        &self.metrics[node.0]
    }

    pub fn value(&self, node: NodeId, metric: Metric) -> Option<f64> {
        self.metrics[node.0].get(metric)
    }

    pub fn as_slice(&self) -> &[WireMetrics] {
        &self.metrics
    }

    /// Number of unknown (node, metric) slots.
    pub fn unknown_count(&self) -> usize {
        self.metrics.iter().map(|m| 4 - m.known_count()).sum()
    }
}

/// Check two values for agreement within a relative tolerance.
pub fn agrees(a: f64, b: f64, tolerance: f64) -> bool {
    (a - b).abs() <= tolerance * a.abs().max(b.abs()) + ABSOLUTE_TOLERANCE
}

/// Mutable solving state shared by the identity and structural rules.
pub struct Workspace<'a> {
    pub network: &'a Network,
    pub table: &'a mut MetricTable,
    tolerance: f64,
    assignments: usize,
}

impl<'a> Workspace<'a> {
    pub fn new(network: &'a Network, table: &'a mut MetricTable, tolerance: f64) -> Self {
        Self {
            network,
            table,
            tolerance,
            assignments: 0,
        }
    }

    pub fn value(&self, node: NodeId, metric: Metric) -> Option<f64> {
        self.table.value(node, metric)
    }

    pub fn label(&self, node: NodeId) -> &str {
        &self.network.node(node).label
    }

    /// Relative tolerance used when two derivations meet.
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Number of fields moved from unknown to known so far.
    pub fn assignments(&self) -> usize {
        self.assignments
    }

    /// Record a derived value.
    ///
    /// An unknown field is filled in and `Ok(true)` returned. A known field
    /// is left untouched: `Ok(false)` if the values agree, otherwise
    /// [`WireError::ConflictingGivens`] naming both.
    pub fn assign(&mut self, node: NodeId, metric: Metric, value: f64) -> Result<bool> {
        if !value.is_finite() {
            return Err(WireError::division_by_zero(self.label(node), metric));
        }
        match self.table.metrics[node.0].get(metric) {
            Some(existing) => {
                if agrees(existing, value, self.tolerance) {
                    Ok(false)
                } else {
                    Err(WireError::conflict(self.label(node), metric, existing, value))
                }
            }
            None => {
                *self.table.metrics[node.0].slot_mut(metric) = Some(value);
                self.assignments += 1;
                tracing::trace!(node = %self.label(node), %metric, value, "assigned");
                Ok(true)
            }
        }
    }

    /// Record every known field of `givens` on `node`.
    pub fn assign_all(&mut self, node: NodeId, givens: &WireMetrics) -> Result<bool> {
        let mut changed = false;
        for (metric, value) in givens.known() {
            changed |= self.assign(node, metric, value)?;
        }
        Ok(changed)
    }
}
