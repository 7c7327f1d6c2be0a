//! Instruction table: mnemonic and operand signature to handler.
//!
//! The table is built once and then shared read-only, usually behind an
//! [`Arc`](std::sync::Arc), by every [`ExecutionContext`] that runs a program.
//! Tests build their own tables to run alternate instruction sets.

use crate::virtual_machine::errors::VMError;
use crate::virtual_machine::isa::Instruction;
use crate::virtual_machine::operand::OperandSignature;
use crate::virtual_machine::vm::ExecutionContext;
use std::collections::HashMap;
use std::fmt;

/// Executes one instruction variant.
///
/// Receives the raw operand tokens; their types already match the signature
/// the handler was registered under.
pub type Handler = fn(&mut ExecutionContext, &[&str]) -> Result<(), VMError>;

/// Why a lookup found no handler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LookupMiss {
    /// No variant is registered under the mnemonic.
    UnknownMnemonic,
    /// The mnemonic exists but no variant takes this exact signature.
    UnmatchedSignature,
}

#[derive(Clone, Default)]
pub struct InstructionTable {
    entries: HashMap<String, Vec<(OperandSignature, Handler)>>,
}

impl InstructionTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a table holding every [`Instruction`] variant.
    pub fn standard() -> Self {
        let mut table = Self::new();
        for instr in Instruction::ALL {
            table.insert(instr.mnemonic().to_string(), instr.signature(), instr.handler());
        }
        table
    }

    /// Binds `handler` to `mnemonic` with the given operand signature.
    ///
    /// Returns [`VMError::DuplicateSignature`] if the pair is already bound.
    pub fn register(
        &mut self,
        mnemonic: impl Into<String>,
        signature: OperandSignature,
        handler: Handler,
    ) -> Result<(), VMError> {
        let mnemonic = mnemonic.into();
        if self
            .entries
            .get(&mnemonic)
            .is_some_and(|variants| variants.iter().any(|(sig, _)| *sig == signature))
        {
            return Err(VMError::DuplicateSignature {
                mnemonic,
                signature,
            });
        }
        self.insert(mnemonic, signature, handler);
        Ok(())
    }

    fn insert(&mut self, mnemonic: String, signature: OperandSignature, handler: Handler) {
        self.entries
            .entry(mnemonic)
            .or_default()
            .push((signature, handler));
    }

    /// Finds the handler for an exact mnemonic and signature match.
    pub fn lookup(
        &self,
        mnemonic: &str,
        signature: &OperandSignature,
    ) -> Result<Handler, LookupMiss> {
        let variants = self
            .entries
            .get(mnemonic)
            .ok_or(LookupMiss::UnknownMnemonic)?;
        variants
            .iter()
            .find(|(sig, _)| sig == signature)
            .map(|(_, handler)| *handler)
            .ok_or(LookupMiss::UnmatchedSignature)
    }

    pub fn contains(&self, mnemonic: &str) -> bool {
        self.entries.contains_key(mnemonic)
    }

    /// Registered mnemonics, sorted.
    pub fn mnemonics(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Signatures accepted by `mnemonic`, in registration order.
    pub fn signatures(&self, mnemonic: &str) -> Vec<&OperandSignature> {
        self.entries
            .get(mnemonic)
            .map(|variants| variants.iter().map(|(sig, _)| sig).collect())
            .unwrap_or_default()
    }
}

impl fmt::Debug for InstructionTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for name in self.mnemonics() {
            map.entry(&name, &self.signatures(name));
        }
        map.finish()
    }
}
