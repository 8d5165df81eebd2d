//! Lexical analysis: turns the raw input string into a vector of tokens.
//!
//! The tokenizer knows nothing about precedence or grammar – it only
//! classifies substrings. Two-character operators are tried before their
//! single-character prefixes, so `<=` never lexes as `<` followed by a
//! stray `=`.

use crate::error::{CompileError, CompileResult};

/// Kinds of tokens recognised by the front-end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
  Operator,
  Number,
  Eof,
}

/// One lexical unit. The token does not store its text; later stages slice
/// the source via `loc`/`len`, which keeps multi-character operator matching
/// and diagnostics anchored to exact byte offsets.
#[derive(Debug, Clone)]
pub struct Token {
  pub kind: TokenKind,
  pub value: Option<i64>,
  pub loc: usize,
  pub len: usize,
}

impl Token {
  fn operator(loc: usize, len: usize) -> Self {
    Self {
      kind: TokenKind::Operator,
      value: None,
      loc,
      len,
    }
  }

  fn number(loc: usize, len: usize, value: i64) -> Self {
    Self {
      kind: TokenKind::Number,
      value: Some(value),
      loc,
      len,
    }
  }

  fn eof(loc: usize) -> Self {
    Self {
      kind: TokenKind::Eof,
      value: None,
      loc,
      len: 0,
    }
  }
}

/// Two-character operators, matched before any single-character operator.
const WIDE_OPERATORS: [&str; 4] = ["==", "!=", "<=", ">="];

fn is_operator_byte(c: u8) -> bool {
  matches!(c, b'+' | b'-' | b'*' | b'/' | b'(' | b')' | b'<' | b'>')
}

/// Lex the input into a flat vector of tokens terminated by an `Eof` marker.
///
/// Numeric literals are parsed as `i64`; a literal outside that range is a
/// lexical error rather than a silently wrapped value.
pub fn tokenize(input: &str) -> CompileResult<Vec<Token>> {
  let mut tokens = Vec::new();
  let bytes = input.as_bytes();
  let mut i = 0;

  while i < bytes.len() {
    let c = bytes[i];

    if c.is_ascii_whitespace() {
      i += 1;
      continue;
    }

    if let Some(op) = WIDE_OPERATORS
      .into_iter()
      .find(|op| input[i..].starts_with(op))
    {
      tokens.push(Token::operator(i, op.len()));
      i += op.len();
      continue;
    }

    if is_operator_byte(c) {
      tokens.push(Token::operator(i, 1));
      i += 1;
      continue;
    }

    if c.is_ascii_digit() {
      let start = i;
      while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
      }
      let value = input[start..i]
        .parse::<i64>()
        .map_err(|err| CompileError::lex_at(input, start, format!("invalid number: {err}")))?;
      tokens.push(Token::number(start, i - start, value));
      continue;
    }

    let invalid_char = input[i..].chars().next().unwrap_or('\0');
    return Err(CompileError::lex_at(
      input,
      i,
      format!("invalid token: '{invalid_char}'"),
    ));
  }

  tokens.push(Token::eof(input.len()));
  Ok(tokens)
}

/// Return the slice from the source that produced this token.
pub fn token_text<'a>(token: &Token, source: &'a str) -> &'a str {
  &source[token.loc..token.loc + token.len]
}

/// Human-friendly description used in diagnostics.
pub fn describe_token(token: &Token, source: &str) -> String {
  match token.kind {
    TokenKind::Eof => "EOF".to_string(),
    _ => token_text(token, source).to_string(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn texts<'a>(source: &'a str) -> Vec<&'a str> {
    tokenize(source)
      .unwrap()
      .iter()
      .map(|token| token_text(token, source))
      .collect()
  }

  #[test]
  fn lexes_numbers_and_operators() {
    let tokens = tokenize("12+34").unwrap();
    assert_eq!(tokens.len(), 4);
    assert_eq!(tokens[0].kind, TokenKind::Number);
    assert_eq!(tokens[0].value, Some(12));
    assert_eq!(tokens[1].kind, TokenKind::Operator);
    assert_eq!(tokens[2].value, Some(34));
    assert_eq!(tokens[3].kind, TokenKind::Eof);
  }

  #[test]
  fn wide_operators_win_over_their_prefix() {
    assert_eq!(texts("1<=2"), vec!["1", "<=", "2", ""]);
    assert_eq!(texts("1<2"), vec!["1", "<", "2", ""]);
    assert_eq!(texts("1==2!=3>=4"), vec!["1", "==", "2", "!=", "3", ">=", "4", ""]);
  }

  #[test]
  fn whitespace_is_skipped_and_offsets_are_preserved() {
    let tokens = tokenize(" 1 + 2 ").unwrap();
    assert_eq!(tokens[0].loc, 1);
    assert_eq!(tokens[1].loc, 3);
    assert_eq!(tokens[2].loc, 5);
    assert_eq!(tokens[3].kind, TokenKind::Eof);
    assert_eq!(tokens[3].loc, 7);
  }

  #[test]
  fn rejects_unknown_characters() {
    let err = tokenize("1+a").unwrap_err();
    assert!(err.to_string().contains("invalid token: 'a'"));
  }

  #[test]
  fn rejects_numbers_outside_i64() {
    let err = tokenize("99999999999999999999").unwrap_err();
    assert!(err.to_string().contains("invalid number"));
  }

  #[test]
  fn empty_input_yields_only_eof() {
    let tokens = tokenize("").unwrap();
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::Eof);
  }
}
