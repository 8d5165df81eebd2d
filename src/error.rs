//! Shared error types used across the compilation pipeline.
//!
//! Lexer and parser failures render a caret diagnostic: the quoted source
//! line followed by a marker aligned under the offending byte. The pipeline
//! never recovers from an error – every failure aborts compilation and is
//! propagated to the caller, which decides how to surface it.

use snafu::Snafu;

pub type CompileResult<T> = Result<T, CompileError>;

#[derive(Debug, Snafu)]
pub enum CompileError {
  /// The caller passed the wrong number of arguments.
  #[snafu(display("usage: {program} <expr>"))]
  Usage { program: String },

  /// The tokenizer hit a character it cannot classify, or a numeric
  /// literal outside the `i64` range.
  #[snafu(display("{expr_line}\n{marker} {message}"))]
  Lex {
    expr_line: String,
    marker: String,
    message: String,
  },

  /// The parser found something other than the token it needed.
  #[snafu(display("{expr_line}\n{marker} {message}"))]
  Parse {
    expr_line: String,
    marker: String,
    message: String,
  },

  /// The generated program would be meaningless to run.
  #[snafu(display("runtime error: {message}"))]
  Runtime { message: String },
}

/// Quote the source and build a caret marker pointing at byte offset `loc`.
fn caret(expr: &str, loc: usize) -> (String, String) {
  let expr_line = format!("'{expr}'");
  let safe_loc = loc.min(expr.len());
  let char_offset = expr[..safe_loc].chars().count() + 1; // account for opening quote
  let marker = format!("{}^", " ".repeat(char_offset));
  (expr_line, marker)
}

impl CompileError {
  /// A lexical error anchored at a byte offset in the source.
  pub fn lex_at(expr: &str, loc: usize, message: impl Into<String>) -> Self {
    let (expr_line, marker) = caret(expr, loc);
    Self::Lex {
      expr_line,
      marker,
      message: message.into(),
    }
  }

  /// A syntax error anchored at a byte offset in the source.
  pub fn parse_at(expr: &str, loc: usize, message: impl Into<String>) -> Self {
    let (expr_line, marker) = caret(expr, loc);
    Self::Parse {
      expr_line,
      marker,
      message: message.into(),
    }
  }

  pub fn runtime(message: impl Into<String>) -> Self {
    Self::Runtime {
      message: message.into(),
    }
  }
}
