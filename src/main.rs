use std::env;
use std::process;

use exprcc::{CompileError, generate_assembly};

fn main() {
  let args: Vec<String> = env::args().collect();
  if args.len() != 2 {
    let program = args.first().map(String::as_str).unwrap_or("exprcc");
    eprintln!(
      "{}",
      CompileError::Usage {
        program: program.to_string(),
      }
    );
    process::exit(1);
  }

  match generate_assembly(&args[1]) {
    Ok(asm) => print!("{asm}"),
    Err(err) => {
      eprintln!("{err}");
      process::exit(1);
    }
  }
}
