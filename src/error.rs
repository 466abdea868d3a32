//! Error types for the WIRE solver.
//!
//! This module provides a unified error type [`WireError`] that covers
//! all error conditions that can occur while reading a problem definition,
//! building the circuit tree, and solving it.

use thiserror::Error;

use crate::circuit::Metric;

/// Result type alias using [`WireError`].
pub type Result<T> = std::result::Result<T, WireError>;

/// Unified error type for all WIRE operations.
#[derive(Error, Debug)]
pub enum WireError {
    // ============ Problem Format Errors ============
    /// Error during lexical analysis
    #[error("Lexer error at line {line}, column {column}: {message}")]
    LexerError {
        line: usize,
        column: usize,
        message: String,
    },

    /// Error during parsing
    #[error("Parse error at line {line}: {message}")]
    ParseError { line: usize, message: String },

    /// Invalid component definition
    #[error("Invalid component '{name}' at line {line}: {message}")]
    InvalidComponent {
        name: String,
        line: usize,
        message: String,
    },

    /// Component name with no recognizable kind
    #[error("Unknown component type '{name}' at line {line} (use an R, LED or D prefix, or a kind keyword)")]
    UnknownComponentType { name: String, line: usize },

    /// Duplicate component id; `line` is known for problems read from text
    #[error("Duplicate component id '{id}'{}", at_line(.line))]
    DuplicateComponent { id: String, line: Option<usize> },

    /// Missing source definition
    #[error("Problem has no source (use '.source <name> [voltage]')")]
    MissingSource,

    /// Missing circuit tree
    #[error("Problem has no circuit tree (use '.tree <expression>')")]
    MissingTree,

    // ============ Tree Construction Errors ============
    /// Leaf references a component that is not in the component list
    #[error("Malformed tree: leaf references unknown component '{id}'")]
    UnknownComponent { id: String },

    /// Series or parallel group with no children
    #[error("Malformed tree: {kind} group at '{path}' has no children")]
    EmptyGroup { kind: &'static str, path: String },

    /// The same component appears in more than one leaf
    #[error("Malformed tree: component '{id}' is referenced more than once")]
    DuplicateReference { id: String },

    // ============ Solver Errors ============
    /// An identity or structural rule would divide by a known zero
    #[error("Division by zero while deriving {metric} of '{node}'")]
    DivisionByZero { node: String, metric: Metric },

    /// Two independent derivations of the same field disagree
    #[error("Conflicting givens for {metric} of '{node}': {first} vs {second}")]
    ConflictingGivens {
        node: String,
        metric: Metric,
        first: f64,
        second: f64,
    },

    /// Fixed point reached with a required field still unknown
    #[error("Could not resolve {metric} of '{node}': the givens do not determine it")]
    UnderDetermined { node: String, metric: Metric },

    // ============ I/O Errors ============
    /// Error reading a problem file
    #[error("Failed to read problem file '{path}': {source}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Malformed JSON problem or failure to encode a solution
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn at_line(line: &Option<usize>) -> String {
    line.map(|l| format!(" at line {}", l)).unwrap_or_default()
}

/// Coarse error category, for callers that present errors to a learner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The problem text or JSON could not be read
    Format,
    /// Dangling reference, empty group, or duplicate use of a component
    MalformedTree,
    DivisionByZero,
    ConflictingGivens,
    UnderDetermined,
    Io,
}

impl WireError {
    /// Create a lexer error
    pub fn lexer(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self::LexerError {
            line,
            column,
            message: message.into(),
        }
    }

    /// Create a parse error
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::ParseError {
            line,
            message: message.into(),
        }
    }

    /// Create an invalid component error
    pub fn invalid_component(name: impl Into<String>, line: usize, message: impl Into<String>) -> Self {
        Self::InvalidComponent {
            name: name.into(),
            line,
            message: message.into(),
        }
    }

    /// Create a division-by-zero error
    pub fn division_by_zero(node: impl Into<String>, metric: Metric) -> Self {
        Self::DivisionByZero {
            node: node.into(),
            metric,
        }
    }

    /// Create a conflicting-givens error
    pub fn conflict(node: impl Into<String>, metric: Metric, first: f64, second: f64) -> Self {
        Self::ConflictingGivens {
            node: node.into(),
            metric,
            first,
            second,
        }
    }

    /// Category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::LexerError { .. }
            | Self::ParseError { .. }
            | Self::InvalidComponent { .. }
            | Self::UnknownComponentType { .. }
            | Self::DuplicateComponent { .. }
            | Self::MissingSource
            | Self::MissingTree
            | Self::Json(_) => ErrorKind::Format,
            Self::UnknownComponent { .. } | Self::EmptyGroup { .. } | Self::DuplicateReference { .. } => {
                ErrorKind::MalformedTree
            }
            Self::DivisionByZero { .. } => ErrorKind::DivisionByZero,
            Self::ConflictingGivens { .. } => ErrorKind::ConflictingGivens,
            Self::UnderDetermined { .. } => ErrorKind::UnderDetermined,
            Self::FileReadError { .. } => ErrorKind::Io,
        }
    }
}
