//! Human-readable report of a finished run.
//!
//! ```text
//! stack: [
//! 	1
//! 	2
//! ]
//! registers: {
//! 	a: 1
//! }
//! ----------------------------------------
//! Info: 1
//! ```
//!
//! The final state is shown only when the run recorded no errors; otherwise
//! each error is printed as `Error: <message>`. The stack is listed bottom to
//! top. Print logs always follow the separator.

use crate::virtual_machine::vm::ExecutionResult;
use std::fmt;

pub const SEPARATOR: &str = "----------------------------------------";

pub struct Trace<'a> {
    result: &'a ExecutionResult,
}

impl<'a> Trace<'a> {
    pub fn new(result: &'a ExecutionResult) -> Self {
        Self { result }
    }

    fn write_state(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "stack: [")?;
        for value in &self.result.stack {
            writeln!(f, "\t{value}")?;
        }
        writeln!(f, "]")?;
        writeln!(f, "registers: {{")?;
        for (name, value) in self.result.registers.iter() {
            writeln!(f, "\t{name}: {value}")?;
        }
        writeln!(f, "}}")
    }
}

impl fmt::Display for Trace<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let output = &self.result.output;
        if output.should_compile() {
            self.write_state(f)?;
        } else {
            for error in output.errors() {
                writeln!(f, "Error: {error}")?;
            }
        }

        writeln!(f, "{SEPARATOR}")?;
        for log in output.logs() {
            writeln!(f, "Info: {log}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::virtual_machine::table::InstructionTable;
    use crate::virtual_machine::vm::{ExecConfig, run_program};
    use std::sync::Arc;

    fn render(source: &str) -> String {
        let result = run_program(
            Arc::new(InstructionTable::standard()),
            ExecConfig::default(),
            source,
        );
        result.trace().to_string()
    }

    #[test]
    fn compiled_trace_shows_state_then_logs() {
        let trace = render("mov m1, 5\nmov m2, 6\npush 1\npush m2\nprint m1\nprint 7");
        let expected = "stack: [\n\t1\n\t6\n]\nregisters: {\n\tm1: 5\n\tm2: 6\n}\n\
                        ----------------------------------------\nInfo: 5\nInfo: 7\n";
        assert_eq!(trace, expected);
    }

    #[test]
    fn failed_trace_shows_errors_instead_of_state() {
        let trace = render("mov a, 1\nprint a\nfoo a\nmov a, a, a");
        let expected = "Error: Unknown instruction \"foo\"\n\
                        Error: No matching operand pattern for \"mov\" with operands [\"a\", \"a\", \"a\"] (register, register, register)\n\
                        ----------------------------------------\nInfo: 1\n";
        assert_eq!(trace, expected);
    }

    #[test]
    fn empty_program_trace() {
        let trace = render("");
        assert_eq!(
            trace,
            "stack: [\n]\nregisters: {\n}\n----------------------------------------\n"
        );
    }
}
