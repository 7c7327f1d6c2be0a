//! Register machine interpreter.
//!
//! Runs small line-oriented assembly programs against named integer registers
//! and an integer stack, dispatching each line on its mnemonic and operand types.

pub mod utils;
pub mod virtual_machine;
