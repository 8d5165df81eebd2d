//! Recursive-descent parser producing an expression AST.
//!
//! One function per precedence level, each delegating to the next-tighter
//! level for its operands. All binary levels are left-associative: every
//! successive match wraps the node built so far as the new left child.
//!
//! Two rewrites happen here rather than in later stages:
//! - `a > b` parses as `Lt(b, a)` and `a >= b` as `Le(b, a)`, so the code
//!   generator only ever sees four comparison kinds;
//! - unary `-x` parses as `Sub(Num(0), x)` and unary `+x` is the identity.

use crate::error::{CompileError, CompileResult};
use crate::tokenizer::{Token, TokenKind, describe_token, token_text};

/// Binary operators surviving into the AST. `Gt`/`Ge` are absent on purpose;
/// the parser swaps operands and reuses `Lt`/`Le`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
  Add,
  Sub,
  Mul,
  Div,
  Eq,
  Ne,
  Lt,
  Le,
}

/// Expression tree. Every `Binary` node owns exactly two children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AstNode {
  Num {
    value: i64,
  },
  Binary {
    op: BinaryOp,
    lhs: Box<AstNode>,
    rhs: Box<AstNode>,
  },
}

impl AstNode {
  pub fn number(value: i64) -> Self {
    Self::Num { value }
  }

  pub fn binary(op: BinaryOp, lhs: AstNode, rhs: AstNode) -> Self {
    Self::Binary {
      op,
      lhs: Box::new(lhs),
      rhs: Box::new(rhs),
    }
  }
}

/// Parse one complete expression; the whole token stream must be consumed.
pub fn parse(tokens: Vec<Token>, source: &str) -> CompileResult<AstNode> {
  let mut stream = TokenStream::new(tokens, source);

  if stream.is_eof() {
    return Err(CompileError::parse_at(source, 0, "expression is empty"));
  }

  let node = parse_expr(&mut stream)?;

  if !stream.is_eof() {
    let token = stream.current();
    let got = describe_token(token, source);
    return Err(CompileError::parse_at(
      source,
      token.loc,
      format!("unexpected token \"{got}\""),
    ));
  }

  Ok(node)
}

fn parse_expr(stream: &mut TokenStream) -> CompileResult<AstNode> {
  parse_equality(stream)
}

fn parse_equality(stream: &mut TokenStream) -> CompileResult<AstNode> {
  let mut node = parse_relational(stream)?;

  loop {
    if stream.consume("==") {
      let rhs = parse_relational(stream)?;
      node = AstNode::binary(BinaryOp::Eq, node, rhs);
    } else if stream.consume("!=") {
      let rhs = parse_relational(stream)?;
      node = AstNode::binary(BinaryOp::Ne, node, rhs);
    } else {
      return Ok(node);
    }
  }
}

fn parse_relational(stream: &mut TokenStream) -> CompileResult<AstNode> {
  let mut node = parse_additive(stream)?;

  loop {
    if stream.consume("<") {
      let rhs = parse_additive(stream)?;
      node = AstNode::binary(BinaryOp::Lt, node, rhs);
    } else if stream.consume("<=") {
      let rhs = parse_additive(stream)?;
      node = AstNode::binary(BinaryOp::Le, node, rhs);
    } else if stream.consume(">") {
      // a > b  ==  b < a; operands still parse in source order.
      let rhs = parse_additive(stream)?;
      node = AstNode::binary(BinaryOp::Lt, rhs, node);
    } else if stream.consume(">=") {
      let rhs = parse_additive(stream)?;
      node = AstNode::binary(BinaryOp::Le, rhs, node);
    } else {
      return Ok(node);
    }
  }
}

fn parse_additive(stream: &mut TokenStream) -> CompileResult<AstNode> {
  let mut node = parse_multiplicative(stream)?;

  loop {
    if stream.consume("+") {
      let rhs = parse_multiplicative(stream)?;
      node = AstNode::binary(BinaryOp::Add, node, rhs);
    } else if stream.consume("-") {
      let rhs = parse_multiplicative(stream)?;
      node = AstNode::binary(BinaryOp::Sub, node, rhs);
    } else {
      return Ok(node);
    }
  }
}

fn parse_multiplicative(stream: &mut TokenStream) -> CompileResult<AstNode> {
  let mut node = parse_unary(stream)?;

  loop {
    if stream.consume("*") {
      let rhs = parse_unary(stream)?;
      node = AstNode::binary(BinaryOp::Mul, node, rhs);
    } else if stream.consume("/") {
      let rhs = parse_unary(stream)?;
      node = AstNode::binary(BinaryOp::Div, node, rhs);
    } else {
      return Ok(node);
    }
  }
}

fn parse_unary(stream: &mut TokenStream) -> CompileResult<AstNode> {
  if stream.consume("+") {
    return parse_unary(stream);
  }

  if stream.consume("-") {
    let operand = parse_unary(stream)?;
    return Ok(AstNode::binary(BinaryOp::Sub, AstNode::number(0), operand));
  }

  parse_primary(stream)
}

fn parse_primary(stream: &mut TokenStream) -> CompileResult<AstNode> {
  if stream.consume("(") {
    let node = parse_expr(stream)?;
    stream.expect(")")?;
    return Ok(node);
  }

  let value = stream.expect_number()?;
  Ok(AstNode::number(value))
}

/// Forward-only cursor over the token vector. Owned by the parser; there is
/// no shared "current token" state anywhere else.
struct TokenStream<'a> {
  tokens: Vec<Token>,
  source: &'a str,
  pos: usize,
}

impl<'a> TokenStream<'a> {
  fn new(tokens: Vec<Token>, source: &'a str) -> Self {
    Self {
      tokens,
      source,
      pos: 0,
    }
  }

  /// The tokenizer always appends an `Eof` token, so the cursor never runs
  /// past the end of the vector.
  fn current(&self) -> &Token {
    &self.tokens[self.pos.min(self.tokens.len() - 1)]
  }

  /// Consume the current token if it is exactly the given operator.
  fn consume(&mut self, op: &str) -> bool {
    let token = self.current();
    if token.kind == TokenKind::Operator
      && token.len == op.len()
      && token_text(token, self.source) == op
    {
      self.pos += 1;
      return true;
    }
    false
  }

  /// Consume the given operator or fail, naming what was expected.
  fn expect(&mut self, op: &str) -> CompileResult<()> {
    if self.consume(op) {
      return Ok(());
    }
    let token = self.current();
    let got = describe_token(token, self.source);
    Err(CompileError::parse_at(
      self.source,
      token.loc,
      format!("expected \"{op}\", but got \"{got}\""),
    ))
  }

  /// Consume the current token as an integer literal.
  fn expect_number(&mut self) -> CompileResult<i64> {
    let token = self.current();
    if token.kind == TokenKind::Number {
      let value = token.value.ok_or_else(|| {
        CompileError::parse_at(
          self.source,
          token.loc,
          "internal error: numeric token missing value",
        )
      })?;
      self.pos += 1;
      return Ok(value);
    }

    let got = describe_token(token, self.source);
    Err(CompileError::parse_at(
      self.source,
      token.loc,
      format!("expected a number, but got \"{got}\""),
    ))
  }

  fn is_eof(&self) -> bool {
    self.current().kind == TokenKind::Eof
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::tokenizer::tokenize;

  fn parse_str(source: &str) -> CompileResult<AstNode> {
    parse(tokenize(source)?, source)
  }

  fn num(value: i64) -> AstNode {
    AstNode::number(value)
  }

  #[test]
  fn multiplication_binds_tighter_than_addition() {
    let node = parse_str("1+2*3").unwrap();
    let expected = AstNode::binary(
      BinaryOp::Add,
      num(1),
      AstNode::binary(BinaryOp::Mul, num(2), num(3)),
    );
    assert_eq!(node, expected);
  }

  #[test]
  fn parentheses_override_precedence() {
    let node = parse_str("(1+2)*3").unwrap();
    let expected = AstNode::binary(
      BinaryOp::Mul,
      AstNode::binary(BinaryOp::Add, num(1), num(2)),
      num(3),
    );
    assert_eq!(node, expected);
  }

  #[test]
  fn subtraction_is_left_associative() {
    let node = parse_str("8-4-2").unwrap();
    let expected = AstNode::binary(
      BinaryOp::Sub,
      AstNode::binary(BinaryOp::Sub, num(8), num(4)),
      num(2),
    );
    assert_eq!(node, expected);
  }

  #[test]
  fn unary_minus_desugars_to_zero_minus_operand() {
    let node = parse_str("-3").unwrap();
    assert_eq!(node, AstNode::binary(BinaryOp::Sub, num(0), num(3)));
  }

  #[test]
  fn unary_plus_is_the_identity() {
    assert_eq!(parse_str("+7").unwrap(), num(7));
    assert_eq!(parse_str("+-7").unwrap(), parse_str("-7").unwrap());
  }

  #[test]
  fn greater_than_swaps_into_less_than() {
    let node = parse_str("2>1").unwrap();
    assert_eq!(node, AstNode::binary(BinaryOp::Lt, num(1), num(2)));

    let node = parse_str("2>=1").unwrap();
    assert_eq!(node, AstNode::binary(BinaryOp::Le, num(1), num(2)));
  }

  #[test]
  fn comparisons_bind_looser_than_arithmetic() {
    let node = parse_str("1+1==2").unwrap();
    let expected = AstNode::binary(
      BinaryOp::Eq,
      AstNode::binary(BinaryOp::Add, num(1), num(1)),
      num(2),
    );
    assert_eq!(node, expected);
  }

  #[test]
  fn dangling_operator_is_an_error() {
    let err = parse_str("1+").unwrap_err();
    assert!(err.to_string().contains("expected a number"));
  }

  #[test]
  fn operator_in_operand_position_is_an_error() {
    let err = parse_str("1+*2").unwrap_err();
    assert!(err.to_string().contains("expected a number, but got \"*\""));
  }

  #[test]
  fn unmatched_parenthesis_is_an_error() {
    let err = parse_str("(1+2").unwrap_err();
    assert!(err.to_string().contains("expected \")\""));
  }

  #[test]
  fn trailing_tokens_are_an_error() {
    let err = parse_str("1 2").unwrap_err();
    assert!(err.to_string().contains("unexpected token \"2\""));
  }

  #[test]
  fn empty_expression_is_an_error() {
    let err = parse_str("").unwrap_err();
    assert!(err.to_string().contains("expression is empty"));
  }
}
