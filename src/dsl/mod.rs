//! DSL (Domain Specific Language) parser for WIRE problems.
//!
//! A problem is written as a short, line-oriented text file: one line per
//! component with whatever facts are known about it, a source, the shape of
//! the circuit as a series/parallel expression, and optionally the quantity
//! being asked for.
//!
//! # Grammar Overview
//!
//! ```text
//! problem     = { line }
//! line        = comment | directive | component | empty
//! comment     = ('#' | ';') { any_char }
//! directive   = source | tree | totals | target
//! source      = ".source" name [value] { param }
//! tree        = ".tree" expr
//! totals      = ".totals" param { param }
//! target      = ".target" name metric
//! component   = name [kind] [value] { param }
//!
//! expr        = name | ("series" | "parallel") '(' expr { [','] expr } ')'
//! kind        = "resistor" | "res" | "led" | "fixed" | "diode"
//! param       = metric '=' value
//! metric      = "w" | "i" | "r" | "e" | "v" | "watts" | "current" | ...
//! value       = number [magnitude] [unit]
//! magnitude   = 'p' | 'n' | 'u' | 'm' | 'k' | 'M' | 'G'
//! unit        = 'V' | 'A' | 'W' | 'Ω' | "ohm" | "ohms"
//! ```
//!
//! Without a kind keyword the name prefix decides: `R...` is a resistor,
//! `LED...` and `D...` hold a fixed voltage. A bare value is the defining
//! metric of the component (resistance, or voltage for a fixed-voltage
//! part); for `.source` it is the supply voltage. A group expression may
//! span lines.
//!
//! # Example
//!
//! ```text
//! # Indicator LED with a series resistor
//! .source VS 9V
//! .target R1 resistance
//! .totals i=20mA
//!
//! R1
//! LED1 2.0V
//!
//! .tree series(R1, LED1)
//! ```

mod ast;
mod lexer;
mod parser;

pub use ast::*;
pub use lexer::{parse_value, Lexer, Token, TokenKind};
pub use parser::Parser;

use std::path::Path;

use crate::circuit::Problem;
use crate::error::{Result, WireError};

/// Parse a problem DSL string into an AST.
pub fn parse(input: &str) -> Result<ProblemAst> {
    let lexer = Lexer::new(input);
    let mut parser = Parser::new(lexer)?;
    parser.parse()
}

/// Parse a problem DSL string into a [`Problem`].
pub fn parse_problem(input: &str) -> Result<Problem> {
    Problem::from_ast(parse(input)?)
}

/// Load a problem file.
///
/// Files ending in `.json` are read as the JSON problem shape, anything
/// else as problem DSL.
pub fn load_file(path: &Path) -> Result<Problem> {
    let content = std::fs::read_to_string(path).map_err(|e| WireError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        Problem::from_json(&content)
    } else {
        parse_problem(&content)
    }
}
