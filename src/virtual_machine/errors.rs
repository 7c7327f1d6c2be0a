use crate::virtual_machine::operand::OperandSignature;
use regvm_derive::Error;

/// Errors recorded while interpreting a program or building an instruction table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VMError {
    /// Mnemonic not present in the instruction table.
    #[error("Unknown instruction \"{0}\"")]
    UnknownInstruction(String),
    /// Mnemonic is known but none of its handlers accepts these operand types.
    #[error("No matching operand pattern for \"{mnemonic}\" with operands {operands:?} {signature}")]
    UnmatchedSignature {
        mnemonic: String,
        operands: Vec<String>,
        signature: OperandSignature,
    },
    /// Register read before any write under the strict read policy.
    #[error("Uninitialized register \"{0}\"")]
    UninitializedRegister(String),
    /// `pop` on an empty stack.
    #[error("Stack underflow: cannot pop into \"{0}\" from an empty stack")]
    StackUnderflow(String),
    /// Digit-only operand that does not fit in a 64-bit signed integer.
    #[error("Invalid number \"{0}\": out of range for a 64-bit integer")]
    InvalidNumber(String),
    /// Handler invoked with the wrong number of operands.
    #[error("Instruction \"{instruction}\" expects {expected} operands, got {actual}")]
    ArityMismatch {
        instruction: &'static str,
        expected: usize,
        actual: usize,
    },
    /// Same mnemonic and signature registered twice.
    #[error("Duplicate handler for \"{mnemonic}\" with signature {signature}")]
    DuplicateSignature {
        mnemonic: String,
        signature: OperandSignature,
    },
    /// Program source could not be read.
    #[error("io error reading {path}: {message}")]
    IoError { path: String, message: String },
}
