//! Pretty-printing for MIR
//!
//! Provides a human-readable listing of whole bodies for debugging and golden
//! tests. Single nodes render through `Display`.

use crate::block::{BasicBlock, BasicBlockId};
use crate::body::FunctionBody;
use std::fmt::Write;

/// Trait for pretty-printing MIR constructs
pub trait PrettyPrint {
    fn pretty_print(&self) -> String;
}

impl PrettyPrint for FunctionBody {
    fn pretty_print(&self) -> String {
        let mut output = String::new();

        let args: Vec<String> = self
            .arguments
            .iter()
            .enumerate()
            .map(|(i, ty)| format!("arg{}: {}", i, ty))
            .collect();
        writeln!(output, "fn({}) -> {} {{", args.join(", "), self.return_ty).unwrap();

        for (i, ty) in self.variables.iter().enumerate() {
            writeln!(output, "  let var{}: {};", i, ty).unwrap();
        }
        for (i, ty) in self.temporaries.iter().enumerate() {
            writeln!(output, "  let tmp{}: {};", i, ty).unwrap();
        }

        for (id, block) in self.iter_blocks() {
            output.push_str(&block.pretty_print_indented(id, 2));
        }

        writeln!(output, "}}").unwrap();
        output
    }
}

impl BasicBlock {
    fn pretty_print_indented(&self, id: BasicBlockId, indent: usize) -> String {
        let mut output = String::new();
        let prefix = " ".repeat(indent);

        writeln!(output, "{}{}: {{", prefix, id).unwrap();
        for statement in &self.statements {
            writeln!(output, "{}  {}", prefix, statement).unwrap();
        }
        writeln!(output, "{}  {}", prefix, self.terminator).unwrap();
        writeln!(output, "{}}}", prefix).unwrap();

        output
    }
}
