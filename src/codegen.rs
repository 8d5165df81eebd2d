//! Code generation: lower the AST into AT&T x86-64 assembly.
//!
//! The emitter is a stack machine: a post-order walk pushes each operand,
//! then every binary node pops the right operand into `%rdi` and the left
//! into `%rax`, combines them, and pushes the result. When the walk is done
//! exactly one value is left on the stack; it is popped into `%rax` and
//! returned from `main`. There is no folding or rewriting of any kind – the
//! output mirrors the tree structure one to one.

use crate::error::{CompileError, CompileResult};
use crate::parser::{AstNode, BinaryOp};

/// Emit a complete assembly listing for the expression.
pub fn generate(node: &AstNode) -> CompileResult<String> {
  let mut asm = String::new();
  asm.push_str(".global main\n");
  asm.push_str("main:\n");

  emit_expr(node, &mut asm)?;

  asm.push_str("    pop %rax\n");
  asm.push_str("    ret\n");
  Ok(asm)
}

fn emit_expr(node: &AstNode, asm: &mut String) -> CompileResult<()> {
  match node {
    AstNode::Num { value } => {
      asm.push_str(&format!("    mov ${value}, %rax\n"));
      asm.push_str("    push %rax\n");
    }
    AstNode::Binary { op, lhs, rhs } => {
      if *op == BinaryOp::Div && matches!(rhs.as_ref(), AstNode::Num { value: 0 }) {
        return Err(CompileError::runtime("division by zero"));
      }

      emit_expr(lhs, asm)?;
      emit_expr(rhs, asm)?;
      asm.push_str("    pop %rdi\n");
      asm.push_str("    pop %rax\n");
      match op {
        BinaryOp::Add => asm.push_str("    add %rdi, %rax\n"),
        BinaryOp::Sub => asm.push_str("    sub %rdi, %rax\n"),
        BinaryOp::Mul => asm.push_str("    imul %rdi, %rax\n"),
        BinaryOp::Div => {
          asm.push_str("    cqo\n");
          asm.push_str("    idiv %rdi\n");
        }
        BinaryOp::Eq => emit_compare(asm, "sete"),
        BinaryOp::Ne => emit_compare(asm, "setne"),
        BinaryOp::Lt => emit_compare(asm, "setl"),
        BinaryOp::Le => emit_compare(asm, "setle"),
      }
      asm.push_str("    push %rax\n");
    }
  }
  Ok(())
}

/// Compare `%rax` (left) against `%rdi` (right) and widen the flag to 1/0.
fn emit_compare(asm: &mut String, set_insn: &str) {
  asm.push_str("    cmp %rdi, %rax\n");
  asm.push_str(&format!("    {set_insn} %al\n"));
  asm.push_str("    movzbl %al, %eax\n");
}
