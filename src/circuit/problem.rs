//! Problem definitions: components, the series/parallel tree, and givens.
//!
//! A [`Problem`] is what a problem catalog hands to the solver. It is plain,
//! immutable data and (de)serializes with serde so problems can be shipped
//! as JSON as well as in the text format of [`crate::dsl`].

use serde::{Deserialize, Serialize};

use super::types::{Metric, WireMetrics};
use super::TOTALS_LABEL;
use crate::dsl::ProblemAst;
use crate::error::{Result, WireError};

/// How a leaf relates its voltage to its current.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Behavior {
    /// Ohmic element; resistance is the defining quantity.
    #[default]
    Resistor,
    /// Fixed forward-voltage drop (LED approximation); voltage is the
    /// defining quantity and does not depend on current.
    FixedVoltage,
}

impl Behavior {
    /// Whether Ohm's law may be used to define voltage or current.
    pub fn is_ohmic(&self) -> bool {
        matches!(self, Behavior::Resistor)
    }

    /// The quantity a bare value in a component line stands for.
    pub fn defining_metric(&self) -> Metric {
        match self {
            Behavior::Resistor => Metric::Resistance,
            Behavior::FixedVoltage => Metric::Voltage,
        }
    }

    /// Infer a behavior from a component name prefix.
    pub fn from_prefix(name: &str) -> Option<Self> {
        let upper = name.to_ascii_uppercase();
        if upper.starts_with("LED") || upper.starts_with('D') {
            Some(Behavior::FixedVoltage)
        } else if upper.starts_with('R') {
            Some(Behavior::Resistor)
        } else {
            None
        }
    }

    /// Parse an explicit kind keyword.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.to_ascii_lowercase().as_str() {
            "resistor" | "res" => Some(Behavior::Resistor),
            "led" | "fixed" | "diode" => Some(Behavior::FixedVoltage),
            _ => None,
        }
    }
}

/// A leaf electrical element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    /// Identifier, unique within a problem
    pub id: String,
    /// Resistor or fixed-voltage device
    #[serde(default)]
    pub behavior: Behavior,
    /// Facts supplied by the problem author
    #[serde(default)]
    pub givens: WireMetrics,
}

impl Component {
    /// A resistor with a known resistance.
    pub fn resistor(id: impl Into<String>, ohms: f64) -> Self {
        Self {
            id: id.into(),
            behavior: Behavior::Resistor,
            givens: WireMetrics::new().with_resistance(ohms),
        }
    }

    /// A resistor whose resistance is withheld.
    pub fn unknown_resistor(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            behavior: Behavior::Resistor,
            givens: WireMetrics::new(),
        }
    }

    /// A fixed-voltage device (e.g. an LED) with the given forward voltage.
    pub fn fixed_voltage(id: impl Into<String>, volts: f64) -> Self {
        Self {
            id: id.into(),
            behavior: Behavior::FixedVoltage,
            givens: WireMetrics::new().with_voltage(volts),
        }
    }

    /// Replace the givens.
    pub fn with_givens(mut self, givens: WireMetrics) -> Self {
        self.givens = givens;
        self
    }
}

/// The EMF supply driving the whole tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub id: String,
    #[serde(default)]
    pub givens: WireMetrics,
}

impl Source {
    /// A source with a known voltage.
    pub fn new(id: impl Into<String>, volts: f64) -> Self {
        Self {
            id: id.into(),
            givens: WireMetrics::new().with_voltage(volts),
        }
    }

    /// A source with no givens of its own.
    pub fn unknown(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            givens: WireMetrics::new(),
        }
    }
}

/// A node of the series/parallel tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CircuitNode {
    /// Reference to a component by id
    Component { id: String },
    /// Children share one current
    Series { children: Vec<CircuitNode> },
    /// Children share one voltage
    Parallel { children: Vec<CircuitNode> },
}

impl CircuitNode {
    pub fn leaf(id: impl Into<String>) -> Self {
        CircuitNode::Component { id: id.into() }
    }

    pub fn series(children: Vec<CircuitNode>) -> Self {
        CircuitNode::Series { children }
    }

    pub fn parallel(children: Vec<CircuitNode>) -> Self {
        CircuitNode::Parallel { children }
    }

    /// Children of a composite node (empty for a leaf).
    pub fn children(&self) -> &[CircuitNode] {
        match self {
            CircuitNode::Component { .. } => &[],
            CircuitNode::Series { children } | CircuitNode::Parallel { children } => children,
        }
    }
}

/// Names the quantity an exercise asks for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetMetric {
    /// A component id, the source id, or `totals`
    pub node: String,
    pub metric: Metric,
}

impl TargetMetric {
    pub fn new(node: impl Into<String>, metric: Metric) -> Self {
        Self {
            node: node.into(),
            metric,
        }
    }

    /// A target on the root node.
    pub fn totals(metric: Metric) -> Self {
        Self::new(TOTALS_LABEL, metric)
    }
}

/// A complete exercise definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Problem {
    pub source: Source,
    pub components: Vec<Component>,
    pub tree: CircuitNode,
    /// Measured facts attached to the root
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub totals: Option<WireMetrics>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<TargetMetric>,
}

impl Problem {
    /// Create a problem with no totals override and no target.
    pub fn new(source: Source, components: Vec<Component>, tree: CircuitNode) -> Self {
        Self {
            source,
            components,
            tree,
            totals: None,
            target: None,
        }
    }

    /// Attach a totals override.
    pub fn with_totals(mut self, totals: WireMetrics) -> Self {
        self.totals = Some(totals);
        self
    }

    /// Attach a target descriptor.
    pub fn with_target(mut self, target: TargetMetric) -> Self {
        self.target = Some(target);
        self
    }

    /// Look up a component by id.
    pub fn component(&self, id: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.id == id)
    }

    /// Read a problem from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Build a problem from a parsed text definition.
    pub fn from_ast(ast: ProblemAst) -> Result<Self> {
        let source = ast.source.ok_or(WireError::MissingSource)?;
        let tree = ast.tree.ok_or(WireError::MissingTree)?;
        if source.name == TOTALS_LABEL {
            return Err(WireError::parse(
                source.line,
                format!("'{}' is reserved and cannot name the source", TOTALS_LABEL),
            ));
        }

        let mut components: Vec<Component> = Vec::with_capacity(ast.components.len());
        for decl in ast.components {
            let taken = decl.name == source.name
                || decl.name == TOTALS_LABEL
                || components.iter().any(|c| c.id == decl.name);
            if taken {
                return Err(WireError::DuplicateComponent {
                    id: decl.name,
                    line: Some(decl.line),
                });
            }
            components.push(Component {
                id: decl.name,
                behavior: decl.behavior,
                givens: decl.givens,
            });
        }

        Ok(Problem {
            source: Source {
                id: source.name,
                givens: source.givens,
            },
            components,
            tree,
            totals: ast.totals,
            target: ast.target,
        })
    }
}
