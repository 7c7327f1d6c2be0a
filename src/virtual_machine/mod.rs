//! Line-oriented register machine.
//!
//! Programs are plain text, one instruction per line, interpreted in a single
//! pass with no control flow.
//!
//! # Architecture
//!
//! - **Registers**: named `i64` cells created on first write
//! - **Stack**: an `i64` stack, listed bottom to top in traces
//! - **Dispatch**: each line's mnemonic and operand signature select a handler
//!   from an [`table::InstructionTable`]
//! - **Errors**: recorded per line; a run never stops early
//!
//! # Modules
//!
//! - [`errors`]: Execution and table error types
//! - [`isa`]: Baseline instruction variants
//! - [`operand`]: Operand classification and signatures
//! - [`parser`]: Line tokenizer and program source helpers
//! - [`table`]: Mnemonic and signature to handler registry
//! - [`trace`]: Final report rendering
//! - [`vm`]: Execution context, dispatch loop and handlers

pub mod errors;
pub mod isa;
#[cfg(test)]
mod isa_static_check;
pub mod operand;
pub mod parser;
pub mod table;
pub mod trace;
pub mod vm;
