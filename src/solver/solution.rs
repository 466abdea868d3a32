//! Result projection: the public metrics table built from a solved network.

use serde::{Deserialize, Serialize};

use crate::circuit::{Network, TargetMetric, WireMetrics, TOTALS_LABEL};

use super::driver::PassReport;
use super::workspace::MetricTable;

/// Metrics of one named node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedMetrics {
    pub id: String,
    #[serde(flatten)]
    pub metrics: WireMetrics,
}

/// The solver's answer for one problem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    /// One record per component in the tree, in problem order
    pub components: Vec<NamedMetrics>,
    /// The EMF supply; equal to the totals
    pub source: NamedMetrics,
    /// The root node
    pub totals: WireMetrics,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<TargetMetric>,
    /// Fixed-point passes used
    pub passes: usize,
}

impl Solution {
    /// Extract the public records from a solved table.
    pub fn project(network: &Network, table: &MetricTable, report: PassReport) -> Self {
        let components = network
            .component_ids()
            .iter()
            .map(|(id, leaf)| NamedMetrics {
                id: id.clone(),
                metrics: *table.get(*leaf),
            })
            .collect();

        let totals = *table.get(network.root());

        Solution {
            components,
            source: NamedMetrics {
                id: network.source().id.clone(),
                metrics: totals,
            },
            totals,
            target: network.target().cloned(),
            passes: report.passes,
        }
    }

    /// Metrics of a component by id.
    pub fn component(&self, id: &str) -> Option<&WireMetrics> {
        self.components
            .iter()
            .find(|c| c.id == id)
            .map(|c| &c.metrics)
    }

    /// Metrics of a component id, the source id, or `totals`.
    pub fn metrics_for(&self, node: &str) -> Option<&WireMetrics> {
        if node == TOTALS_LABEL {
            Some(&self.totals)
        } else if node == self.source.id {
            Some(&self.source.metrics)
        } else {
            self.component(node)
        }
    }

    /// The value a target descriptor points at.
    pub fn value(&self, target: &TargetMetric) -> Option<f64> {
        self.metrics_for(&target.node)
            .and_then(|m| m.get(target.metric))
    }

    /// The value of the problem's own target, if it has one.
    pub fn target_value(&self) -> Option<f64> {
        self.target.as_ref().and_then(|t| self.value(t))
    }

    /// Whether every record has all four metrics.
    pub fn is_complete(&self) -> bool {
        self.totals.is_complete() && self.components.iter().all(|c| c.metrics.is_complete())
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
