//! Parser for the problem DSL.

use super::ast::*;
use super::lexer::{parse_value, Lexer, Token, TokenKind};
use crate::circuit::{Behavior, CircuitNode, Metric, TargetMetric, WireMetrics};
use crate::error::{Result, WireError};

/// Parser for problem DSL.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
}

impl<'a> Parser<'a> {
    /// Create a new parser with the given lexer.
    pub fn new(mut lexer: Lexer<'a>) -> Result<Self> {
        let current = lexer.next_token()?;
        Ok(Self { lexer, current })
    }

    /// Parse the entire problem description.
    pub fn parse(&mut self) -> Result<ProblemAst> {
        let mut ast = ProblemAst::new();

        while self.current.kind != TokenKind::Eof {
            match self.current.kind {
                TokenKind::Newline => {
                    self.advance()?;
                    continue;
                }
                TokenKind::Directive => self.parse_directive(&mut ast)?,
                TokenKind::Identifier => {
                    let component = self.parse_component()?;
                    ast.components.push(component);
                }
                _ => {
                    return Err(WireError::parse(
                        self.current.line,
                        format!("unexpected token: {:?}", self.current.text),
                    ));
                }
            }
            self.end_of_line()?;
        }

        Ok(ast)
    }

    fn advance(&mut self) -> Result<()> {
        self.current = self.lexer.next_token()?;
        Ok(())
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token> {
        if self.current.kind == kind {
            let tok = self.current.clone();
            self.advance()?;
            Ok(tok)
        } else {
            Err(WireError::parse(
                self.current.line,
                format!("expected {:?}, got {:?}", kind, self.current.kind),
            ))
        }
    }

    fn end_of_line(&mut self) -> Result<()> {
        match self.current.kind {
            TokenKind::Newline => self.advance(),
            TokenKind::Eof => Ok(()),
            _ => Err(WireError::parse(
                self.current.line,
                format!("unexpected {:?} at end of line", self.current.text),
            )),
        }
    }

    fn parse_directive(&mut self, ast: &mut ProblemAst) -> Result<()> {
        let directive = self.current.text.clone();
        let line = self.current.line;
        self.advance()?;

        match directive.to_lowercase().as_str() {
            ".source" => {
                if ast.source.is_some() {
                    return Err(WireError::parse(line, "duplicate .source directive"));
                }
                let name = self.expect(TokenKind::Identifier)?.text;
                let givens = self.parse_givens(&name, line, Some(Metric::Voltage))?;
                ast.source = Some(SourceDecl { name, givens, line });
            }
            ".tree" => {
                if ast.tree.is_some() {
                    return Err(WireError::parse(line, "duplicate .tree directive"));
                }
                ast.tree = Some(self.parse_tree()?);
            }
            ".totals" => {
                let givens = self.parse_givens("totals", line, None)?;
                let totals = ast.totals.get_or_insert_with(WireMetrics::new);
                for (metric, value) in givens.known() {
                    set_given(totals, metric, value, "totals", line)?;
                }
            }
            ".target" => {
                if ast.target.is_some() {
                    return Err(WireError::parse(line, "duplicate .target directive"));
                }
                let node = self.expect(TokenKind::Identifier)?.text;
                let metric = self
                    .expect(TokenKind::Identifier)?
                    .text
                    .parse::<Metric>()
                    .map_err(|e| WireError::parse(line, e))?;
                ast.target = Some(TargetMetric::new(node, metric));
            }
            _ => {
                return Err(WireError::parse(
                    line,
                    format!("unknown directive: {}", directive),
                ));
            }
        }

        Ok(())
    }

    fn parse_component(&mut self) -> Result<ComponentDecl> {
        let name = self.current.text.clone();
        let line = self.current.line;
        self.advance()?;

        // An explicit kind keyword wins over the name prefix
        let keyword = if self.current.kind == TokenKind::Identifier {
            Behavior::from_keyword(&self.current.text)
        } else {
            None
        };
        let behavior = match keyword {
            Some(behavior) => {
                self.advance()?;
                behavior
            }
            None => Behavior::from_prefix(&name).ok_or_else(|| WireError::UnknownComponentType {
                name: name.clone(),
                line,
            })?,
        };

        let givens = self.parse_givens(&name, line, Some(behavior.defining_metric()))?;

        Ok(ComponentDecl {
            name,
            behavior,
            givens,
            line,
        })
    }

    /// Parse `[value] {metric=value}` up to the end of the line.
    ///
    /// A bare value is only accepted when `positional` names its metric.
    fn parse_givens(&mut self, name: &str, line: usize, positional: Option<Metric>) -> Result<WireMetrics> {
        let mut givens = WireMetrics::new();
        let mut positional = positional;

        while self.current.kind != TokenKind::Newline && self.current.kind != TokenKind::Eof {
            match self.current.kind {
                TokenKind::Number => {
                    let text = self.current.text.clone();
                    self.advance()?;
                    let metric = positional.take().ok_or_else(|| {
                        WireError::invalid_component(name, line, format!("unexpected value '{}'", text))
                    })?;
                    set_given(&mut givens, metric, number(&text, name, line)?, name, line)?;
                }
                TokenKind::Identifier => {
                    let key = self.current.text.clone();
                    self.advance()?;
                    let metric = key
                        .parse::<Metric>()
                        .map_err(|e| WireError::invalid_component(name, line, e))?;
                    self.expect(TokenKind::Equals)?;
                    let text = self.expect(TokenKind::Number)?.text;
                    set_given(&mut givens, metric, number(&text, name, line)?, name, line)?;
                }
                _ => {
                    return Err(WireError::parse(
                        line,
                        format!("unexpected token: {:?}", self.current.text),
                    ));
                }
            }
        }

        Ok(givens)
    }

    /// Parse `name` or `series(...)` / `parallel(...)`, possibly across lines.
    fn parse_tree(&mut self) -> Result<CircuitNode> {
        let head = self.expect(TokenKind::Identifier)?;
        if self.current.kind != TokenKind::OpenParen {
            return Ok(CircuitNode::leaf(head.text));
        }

        let series = match head.text.to_ascii_lowercase().as_str() {
            "series" => true,
            "parallel" => false,
            _ => {
                return Err(WireError::parse(
                    head.line,
                    format!("unknown group '{}' (expected series or parallel)", head.text),
                ));
            }
        };
        self.advance()?;

        let mut children = Vec::new();
        loop {
            match self.current.kind {
                TokenKind::Newline | TokenKind::Comma => self.advance()?,
                TokenKind::CloseParen => {
                    self.advance()?;
                    break;
                }
                TokenKind::Eof => {
                    return Err(WireError::parse(
                        head.line,
                        format!("unclosed '{}(' group", head.text),
                    ));
                }
                _ => children.push(self.parse_tree()?),
            }
        }

        Ok(if series {
            CircuitNode::series(children)
        } else {
            CircuitNode::parallel(children)
        })
    }
}

fn number(text: &str, name: &str, line: usize) -> Result<f64> {
    parse_value(text)
        .ok_or_else(|| WireError::invalid_component(name, line, format!("invalid number '{}'", text)))
}

fn set_given(givens: &mut WireMetrics, metric: Metric, value: f64, name: &str, line: usize) -> Result<()> {
    if givens.is_known(metric) {
        return Err(WireError::invalid_component(
            name,
            line,
            format!("{} is given more than once", metric),
        ));
    }
    *givens.slot_mut(metric) = Some(value);
    Ok(())
}
