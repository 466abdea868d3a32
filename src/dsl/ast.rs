//! Abstract Syntax Tree types for the problem DSL.

use crate::circuit::{Behavior, CircuitNode, TargetMetric, WireMetrics};

/// Complete AST representation of a parsed problem.
#[derive(Debug, Clone, Default)]
pub struct ProblemAst {
    /// The `.source` line
    pub source: Option<SourceDecl>,
    /// Component lines, in file order
    pub components: Vec<ComponentDecl>,
    /// The `.tree` expression
    pub tree: Option<CircuitNode>,
    /// Merged `.totals` facts
    pub totals: Option<WireMetrics>,
    /// The `.target` line
    pub target: Option<TargetMetric>,
}

impl ProblemAst {
    /// Create a new empty problem AST.
    pub fn new() -> Self {
        Self::default()
    }
}

/// A `.source` declaration.
#[derive(Debug, Clone)]
pub struct SourceDecl {
    pub name: String,
    pub givens: WireMetrics,
    /// Source line number for error reporting
    pub line: usize,
}

/// A component declaration.
#[derive(Debug, Clone)]
pub struct ComponentDecl {
    pub name: String,
    pub behavior: Behavior,
    pub givens: WireMetrics,
    /// Source line number for error reporting
    pub line: usize,
}
