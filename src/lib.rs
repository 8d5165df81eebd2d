//! Crate root: wires together the compilation pipeline.
//!
//! Data flows strictly left to right and each stage is independent of the
//! ones after it:
//! - `tokenizer` performs lexical analysis and produces a flat token stream.
//! - `parser` owns all syntactic knowledge and returns the expression AST.
//! - `codegen` lowers the AST into x86-64 AT&T assembly.
//! - `error` centralises the failure types shared by the other modules.

pub mod error;
pub mod parser;
pub mod tokenizer;

mod codegen;

pub use error::{CompileError, CompileResult};

/// Compile a source expression into AT&T assembly.
pub fn generate_assembly(expr: &str) -> CompileResult<String> {
  let tokens = tokenizer::tokenize(expr)?;
  let node = parser::parse(tokens, expr)?;
  codegen::generate(&node)
}
