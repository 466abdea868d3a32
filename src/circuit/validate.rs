//! Problem validation.

use std::collections::HashSet;

use crate::error::{Result, WireError};

use super::problem::{CircuitNode, Problem};
use super::TOTALS_LABEL;

/// Validate a problem before building its network.
///
/// Checks:
/// - Component ids are unique and do not collide with the source or `totals`
/// - Every leaf references a listed component, and no component twice
/// - Every series/parallel group has at least one child
/// - The target, if any, names a node that will exist
pub fn validate_problem(problem: &Problem) -> Result<()> {
    let mut ids = HashSet::new();
    for component in &problem.components {
        if component.id == problem.source.id
            || component.id == TOTALS_LABEL
            || !ids.insert(component.id.as_str())
        {
            return Err(WireError::DuplicateComponent {
                id: component.id.clone(),
                line: None,
            });
        }
    }

    let mut referenced = HashSet::new();
    check_node(&problem.tree, TOTALS_LABEL, &ids, &mut referenced)?;

    for component in &problem.components {
        if !referenced.contains(component.id.as_str()) {
            tracing::warn!(
                "Component '{}' is not part of the circuit tree and will not be solved",
                component.id
            );
        }
    }

    if let Some(target) = &problem.target {
        let known = target.node == TOTALS_LABEL
            || target.node == problem.source.id
            || referenced.contains(target.node.as_str());
        if !known {
            return Err(WireError::UnknownComponent {
                id: target.node.clone(),
            });
        }
    }

    Ok(())
}

fn check_node<'a>(
    node: &'a CircuitNode,
    path: &str,
    ids: &HashSet<&str>,
    referenced: &mut HashSet<&'a str>,
) -> Result<()> {
    match node {
        CircuitNode::Component { id } => {
            if !ids.contains(id.as_str()) {
                return Err(WireError::UnknownComponent { id: id.clone() });
            }
            if !referenced.insert(id.as_str()) {
                return Err(WireError::DuplicateReference { id: id.clone() });
            }
            Ok(())
        }
        CircuitNode::Series { children } | CircuitNode::Parallel { children } => {
            if children.is_empty() {
                let kind = if matches!(node, CircuitNode::Series { .. }) {
                    "series"
                } else {
                    "parallel"
                };
                return Err(WireError::EmptyGroup {
                    kind,
                    path: path.to_string(),
                });
            }
            for (i, child) in children.iter().enumerate() {
                check_node(child, &child_path(path, i), ids, referenced)?;
            }
            Ok(())
        }
    }
}

/// Label of the `index`-th child (0-based) of a composite labeled `parent`.
pub(crate) fn child_path(parent: &str, index: usize) -> String {
    format!("{}/{}", parent, index + 1)
}
