//! Network structure: the series/parallel tree flattened into an arena.

use std::collections::HashMap;

use super::problem::{Behavior, CircuitNode, Problem, Source, TargetMetric};
use super::types::{NodeId, WireMetrics};
use super::validate::{child_path, validate_problem};
use super::TOTALS_LABEL;
use crate::error::Result;

/// What a network node is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// A component; `component` indexes [`Network::component_ids`]
    Leaf { component: usize, behavior: Behavior },
    /// Children share one current
    Series,
    /// Children share one voltage
    Parallel,
}

/// A node of the flattened tree.
#[derive(Debug, Clone)]
pub struct NetNode {
    pub kind: NodeKind,
    /// Component id for leaves, `totals` for the root, a child path otherwise
    pub label: String,
    pub children: Vec<NodeId>,
}

impl NetNode {
    /// Leaves only use Ohm's law when they are resistors; composites always do.
    pub fn is_ohmic(&self) -> bool {
        match self.kind {
            NodeKind::Leaf { behavior, .. } => behavior.is_ohmic(),
            NodeKind::Series | NodeKind::Parallel => true,
        }
    }

    pub fn is_composite(&self) -> bool {
        !matches!(self.kind, NodeKind::Leaf { .. })
    }
}

/// A validated circuit ready for solving.
///
/// Nodes are stored in post-order: every child precedes its parent and the
/// root is last. The network owns copies of everything it needs, so one
/// `Network` can be solved any number of times without touching the
/// [`Problem`] it came from.
#[derive(Debug, Clone)]
pub struct Network {
    nodes: Vec<NetNode>,
    root: NodeId,
    /// Referenced component ids in problem order, with their leaf
    component_ids: Vec<(String, NodeId)>,
    /// Givens of each entry of `component_ids`
    component_givens: Vec<WireMetrics>,
    leaf_by_id: HashMap<String, NodeId>,
    source: Source,
    totals: Option<WireMetrics>,
    target: Option<TargetMetric>,
}

impl Network {
    /// Validate a problem and build its network.
    pub fn build(problem: &Problem) -> Result<Self> {
        validate_problem(problem)?;

        // Referenced components, in problem order
        let mut referenced = Vec::new();
        collect_leaf_ids(&problem.tree, &mut referenced);
        let component_ids_in_order: Vec<&str> = problem
            .components
            .iter()
            .map(|c| c.id.as_str())
            .filter(|id| referenced.contains(id))
            .collect();
        let slot_of: HashMap<&str, usize> = component_ids_in_order
            .iter()
            .enumerate()
            .map(|(i, id)| (*id, i))
            .collect();

        let mut builder = Builder {
            problem,
            slot_of: &slot_of,
            nodes: Vec::new(),
            leaves: vec![NodeId(0); component_ids_in_order.len()],
        };
        let root = builder.push(&problem.tree, TOTALS_LABEL.to_string());
        let Builder { nodes, leaves, .. } = builder;

        let mut component_ids = Vec::with_capacity(leaves.len());
        let mut component_givens = Vec::with_capacity(leaves.len());
        let mut leaf_by_id = HashMap::new();
        for (id, leaf) in component_ids_in_order.iter().zip(&leaves) {
            component_ids.push((id.to_string(), *leaf));
            leaf_by_id.insert(id.to_string(), *leaf);
            let givens = problem
                .component(id)
                .map(|c| c.givens)
                .unwrap_or_default();
            component_givens.push(givens);
        }

        Ok(Network {
            nodes,
            root,
            component_ids,
            component_givens,
            leaf_by_id,
            source: problem.source.clone(),
            totals: problem.totals,
            target: problem.target.clone(),
        })
    }

    /// All nodes in post-order.
    pub fn nodes(&self) -> &[NetNode] {
        &self.nodes
    }

    pub fn node(&self, id: NodeId) -> &NetNode {
        &self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The root node (the circuit as a whole).
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Node ids from root to leaves, parents before children, in child order.
    pub fn pre_order(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.node(id).children.iter().rev().copied());
        }
        order
    }

    /// Referenced components in problem order, with their leaf nodes.
    pub fn component_ids(&self) -> &[(String, NodeId)] {
        &self.component_ids
    }

    /// Givens of the components, aligned with [`Network::component_ids`].
    pub fn component_givens(&self) -> &[WireMetrics] {
        &self.component_givens
    }

    /// Leaf node of a component.
    pub fn leaf(&self, component_id: &str) -> Option<NodeId> {
        self.leaf_by_id.get(component_id).copied()
    }

    /// Resolve a node name: a component id, the source id, or `totals`.
    pub fn find(&self, name: &str) -> Option<NodeId> {
        if name == TOTALS_LABEL || name == self.source.id {
            Some(self.root)
        } else {
            self.leaf(name)
        }
    }

    pub fn source(&self) -> &Source {
        &self.source
    }

    /// Measured facts attached to the root, if any.
    pub fn totals_override(&self) -> Option<&WireMetrics> {
        self.totals.as_ref()
    }

    pub fn target(&self) -> Option<&TargetMetric> {
        self.target.as_ref()
    }
}

struct Builder<'a> {
    problem: &'a Problem,
    slot_of: &'a HashMap<&'a str, usize>,
    nodes: Vec<NetNode>,
    leaves: Vec<NodeId>,
}

impl Builder<'_> {
    /// Push `tree` and its descendants in post-order; returns its id.
    fn push(&mut self, tree: &CircuitNode, label: String) -> NodeId {
        let (kind, children) = match tree {
            CircuitNode::Component { id } => {
                // Validation guarantees the id is listed and referenced
                let component = self.slot_of.get(id.as_str()).copied().unwrap_or_default();
                let behavior = self
                    .problem
                    .component(id)
                    .map(|c| c.behavior)
                    .unwrap_or_default();
                (NodeKind::Leaf { component, behavior }, Vec::new())
            }
            CircuitNode::Series { children } | CircuitNode::Parallel { children } => {
                let ids = children
                    .iter()
                    .enumerate()
                    .map(|(i, child)| self.push(child, child_path(&label, i)))
                    .collect();
                let kind = if matches!(tree, CircuitNode::Series { .. }) {
                    NodeKind::Series
                } else {
                    NodeKind::Parallel
                };
                (kind, ids)
            }
        };

        let id = NodeId(self.nodes.len());
        if let NodeKind::Leaf { component, .. } = kind {
            self.leaves[component] = id;
        }
        let label = match tree {
            CircuitNode::Component { id } => id.clone(),
            _ => label,
        };
        self.nodes.push(NetNode {
            kind,
            label,
            children,
        });
        id
    }
}

fn collect_leaf_ids<'a>(tree: &'a CircuitNode, out: &mut Vec<&'a str>) {
    match tree {
        CircuitNode::Component { id } => out.push(id),
        _ => {
            for child in tree.children() {
                collect_leaf_ids(child, out);
            }
        }
    }
}
