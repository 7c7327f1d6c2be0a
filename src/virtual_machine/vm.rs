//! Execution context and dispatch loop.
//!
//! A program runs as a single pass over its lines. Each line is tokenized, its
//! operands classified into a signature, and the matching handler from the
//! [`InstructionTable`] is invoked. Errors never stop the run: they are
//! recorded in the [`OutputStream`] and execution moves to the next line, so
//! one pass reports every error in the program.
//!
//! Handlers validate their inputs before touching state, so a failed
//! instruction leaves registers and stack unchanged. Arithmetic wraps on
//! overflow.

mod context;
mod output;
mod registers;

pub use context::{ExecConfig, RegisterReadPolicy, ZERO_REGISTERS_ENV};
pub use output::OutputStream;
pub use registers::Registers;

use crate::virtual_machine::errors::VMError;
use crate::virtual_machine::operand::OperandSignature;
use crate::virtual_machine::parser::{SourceLine, parse_number, program_lines, tokenize_line};
use crate::virtual_machine::table::{InstructionTable, LookupMiss};
use crate::virtual_machine::trace::Trace;
use crate::warn;
use std::sync::Arc;

/// Registers, stack and output of one program run.
pub struct ExecutionContext {
    table: Arc<InstructionTable>,
    config: ExecConfig,
    registers: Registers,
    /// Bottom of the stack at index 0.
    stack: Vec<i64>,
    output: OutputStream,
}

impl ExecutionContext {
    pub fn new(table: Arc<InstructionTable>, config: ExecConfig) -> Self {
        Self {
            table,
            config,
            registers: Registers::new(),
            stack: Vec::new(),
            output: OutputStream::new(),
        }
    }

    /// Executes every non-blank line of `source` in order.
    ///
    /// Failed lines are recorded in the error stream.
    pub fn run(&mut self, source: &str) {
        for (line_no, line) in program_lines(source) {
            if let Err(err) = self.execute_line(line) {
                warn!("line {line_no}: {err}");
                self.output.error(err.to_string());
            }
        }
    }

    /// Tokenizes and dispatches a single line.
    ///
    /// The error is returned to the caller, not recorded; [`run`](Self::run)
    /// does the recording.
    pub fn execute_line(&mut self, line: &str) -> Result<(), VMError> {
        let SourceLine { mnemonic, operands } = tokenize_line(line);
        if mnemonic.is_empty() {
            return Ok(());
        }

        let signature = OperandSignature::of(&operands);
        let table = Arc::clone(&self.table);
        let handler = table
            .lookup(mnemonic, &signature)
            .map_err(|miss| match miss {
                LookupMiss::UnknownMnemonic => VMError::UnknownInstruction(mnemonic.to_string()),
                LookupMiss::UnmatchedSignature => VMError::UnmatchedSignature {
                    mnemonic: mnemonic.to_string(),
                    operands: operands.iter().map(|op| op.to_string()).collect(),
                    signature,
                },
            })?;

        handler(self, &operands)
    }

    pub fn registers(&self) -> &Registers {
        &self.registers
    }

    /// Returns the value of `name`, or `None` if it was never written.
    pub fn register(&self, name: &str) -> Option<i64> {
        self.registers.get(name)
    }

    /// Stack contents, bottom first.
    pub fn stack(&self) -> &[i64] {
        &self.stack
    }

    pub fn output(&self) -> &OutputStream {
        &self.output
    }

    pub fn output_mut(&mut self) -> &mut OutputStream {
        &mut self.output
    }

    /// Reads a register under the configured policy.
    pub fn read_register(&self, name: &str) -> Result<i64, VMError> {
        self.registers.read(name, self.config.register_reads)
    }

    pub fn write_register(&mut self, name: &str, value: i64) {
        self.registers.set(name, value);
    }

    pub fn push(&mut self, value: i64) {
        self.stack.push(value);
    }

    /// Pops the top of the stack; `dst` names the register for the error message.
    pub fn pop(&mut self, dst: &str) -> Result<i64, VMError> {
        self.stack
            .pop()
            .ok_or_else(|| VMError::StackUnderflow(dst.to_string()))
    }

    /// Consumes the context into its final state.
    pub fn finish(self) -> ExecutionResult {
        ExecutionResult {
            stack: self.stack,
            registers: self.registers,
            output: self.output,
        }
    }

    // ==================== Handlers ====================

    pub(crate) fn exec_mov_imm(&mut self, operands: &[&str]) -> Result<(), VMError> {
        let [dst, imm] = expect_operands("mov", operands)?;
        let value = parse_number(imm)?;
        self.write_register(dst, value);
        Ok(())
    }

    pub(crate) fn exec_mov_reg(&mut self, operands: &[&str]) -> Result<(), VMError> {
        let [dst, src] = expect_operands("mov", operands)?;
        let value = self.read_register(src)?;
        self.write_register(dst, value);
        Ok(())
    }

    pub(crate) fn exec_push_imm(&mut self, operands: &[&str]) -> Result<(), VMError> {
        let [imm] = expect_operands("push", operands)?;
        let value = parse_number(imm)?;
        self.push(value);
        Ok(())
    }

    pub(crate) fn exec_push_reg(&mut self, operands: &[&str]) -> Result<(), VMError> {
        let [src] = expect_operands("push", operands)?;
        let value = self.read_register(src)?;
        self.push(value);
        Ok(())
    }

    pub(crate) fn exec_pop(&mut self, operands: &[&str]) -> Result<(), VMError> {
        let [dst] = expect_operands("pop", operands)?;
        let value = self.pop(dst)?;
        self.write_register(dst, value);
        Ok(())
    }

    pub(crate) fn exec_add_imm(&mut self, operands: &[&str]) -> Result<(), VMError> {
        let [dst, imm] = expect_operands("add", operands)?;
        let rhs = parse_number(imm)?;
        self.apply(dst, rhs, i64::wrapping_add)
    }

    pub(crate) fn exec_add_reg(&mut self, operands: &[&str]) -> Result<(), VMError> {
        let [dst, src] = expect_operands("add", operands)?;
        let rhs = self.read_register(src)?;
        self.apply(dst, rhs, i64::wrapping_add)
    }

    pub(crate) fn exec_sub_imm(&mut self, operands: &[&str]) -> Result<(), VMError> {
        let [dst, imm] = expect_operands("sub", operands)?;
        let rhs = parse_number(imm)?;
        self.apply(dst, rhs, i64::wrapping_sub)
    }

    pub(crate) fn exec_sub_reg(&mut self, operands: &[&str]) -> Result<(), VMError> {
        let [dst, src] = expect_operands("sub", operands)?;
        let rhs = self.read_register(src)?;
        self.apply(dst, rhs, i64::wrapping_sub)
    }

    pub(crate) fn exec_print_reg(&mut self, operands: &[&str]) -> Result<(), VMError> {
        let [src] = expect_operands("print", operands)?;
        let value = self.read_register(src)?;
        self.output.log(value.to_string());
        Ok(())
    }

    pub(crate) fn exec_print_imm(&mut self, operands: &[&str]) -> Result<(), VMError> {
        let [imm] = expect_operands("print", operands)?;
        self.output.log(imm);
        Ok(())
    }

    /// dst = op(dst, rhs)
    fn apply(&mut self, dst: &str, rhs: i64, op: fn(i64, i64) -> i64) -> Result<(), VMError> {
        let lhs = self.read_register(dst)?;
        self.write_register(dst, op(lhs, rhs));
        Ok(())
    }
}

/// Checks the operand count a handler expects.
fn expect_operands<'a, const N: usize>(
    instruction: &'static str,
    operands: &[&'a str],
) -> Result<[&'a str; N], VMError> {
    operands.try_into().map_err(|_| VMError::ArityMismatch {
        instruction,
        expected: N,
        actual: operands.len(),
    })
}

/// Final machine state after a run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExecutionResult {
    /// Bottom of the stack at index 0.
    pub stack: Vec<i64>,
    pub registers: Registers,
    pub output: OutputStream,
}

impl ExecutionResult {
    pub fn should_compile(&self) -> bool {
        self.output.should_compile()
    }

    pub fn register(&self, name: &str) -> Option<i64> {
        self.registers.get(name)
    }

    /// Renders the report printed after a run.
    pub fn trace(&self) -> Trace<'_> {
        Trace::new(self)
    }
}

/// Runs `source` in a fresh context and returns its final state.
pub fn run_program(
    table: Arc<InstructionTable>,
    config: ExecConfig,
    source: &str,
) -> ExecutionResult {
    let mut ctx = ExecutionContext::new(table, config);
    ctx.run(source);
    ctx.finish()
}
