//! Instruction Set Architecture (ISA) definitions.
//!
//! The [`for_each_instruction!`](crate::for_each_instruction) macro holds the
//! canonical list of instruction variants and invokes a callback macro for code
//! generation, so the variant list is written once and reused by every module
//! that needs it.
//!
//! Each variant is one mnemonic paired with one operand signature. A mnemonic
//! such as `mov` therefore appears once per accepted signature.
//!
//! This module generates the [`Instruction`] enum with its mnemonic, signature
//! and handler. [`InstructionTable::standard`](super::table::InstructionTable::standard)
//! registers every variant.

use crate::virtual_machine::errors::VMError;
use crate::virtual_machine::operand::{OperandSignature, TokenType};
use crate::virtual_machine::table::Handler;
use crate::virtual_machine::vm::ExecutionContext;

/// Invokes a callback macro with the complete instruction variant list.
#[macro_export]
macro_rules! for_each_instruction {
    ($callback:ident) => {
        $callback! {
            // =========================
            // Moves
            // =========================
            /// mov rd, imm ; rd = imm
            MovImm, "mov" => [Register, Number], exec_mov_imm,
            /// mov rd, rs ; rd = rs
            MovReg, "mov" => [Register, Register], exec_mov_reg,
            // =========================
            // Stack
            // =========================
            /// push imm ; stack <- imm
            PushImm, "push" => [Number], exec_push_imm,
            /// push rs ; stack <- rs
            PushReg, "push" => [Register], exec_push_reg,
            /// pop rd ; rd <- stack
            Pop, "pop" => [Register], exec_pop,
            // =========================
            // Integer arithmetic
            // =========================
            /// add rd, imm ; rd = rd + imm
            AddImm, "add" => [Register, Number], exec_add_imm,
            /// add rd, rs ; rd = rd + rs
            AddReg, "add" => [Register, Register], exec_add_reg,
            /// sub rd, imm ; rd = rd - imm
            SubImm, "sub" => [Register, Number], exec_sub_imm,
            /// sub rd, rs ; rd = rd - rs
            SubReg, "sub" => [Register, Register], exec_sub_reg,
            // =========================
            // Output
            // =========================
            /// print rs ; log rs
            PrintReg, "print" => [Register], exec_print_reg,
            /// print imm ; log the literal imm
            PrintImm, "print" => [Number], exec_print_imm,
        }
    };
}

#[macro_export]
macro_rules! define_instructions {
    (
        $(
            $(#[$doc:meta])*
            $name:ident, $mnemonic:literal => [ $( $kind:ident ),* $(,)? ], $handler:ident
        ),* $(,)?
    ) => {
        #[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
        pub enum Instruction {
            $(
                $(#[$doc])*
                $name,
            )*
        }

        impl Instruction {
            /// Every instruction variant, in declaration order.
            pub const ALL: &'static [Instruction] = &[ $( Instruction::$name ),* ];

            /// Returns the assembly mnemonic for this instruction.
            pub const fn mnemonic(&self) -> &'static str {
                match self {
                    $( Instruction::$name => $mnemonic, )*
                }
            }

            /// Returns the operand types this variant accepts, in order.
            pub const fn operand_types(&self) -> &'static [TokenType] {
                match self {
                    $( Instruction::$name => &[ $( TokenType::$kind ),* ], )*
                }
            }

            pub fn signature(&self) -> OperandSignature {
                OperandSignature::from(self.operand_types())
            }

            /// Returns the function that executes this variant.
            pub fn handler(&self) -> Handler {
                match self {
                    $( Instruction::$name => ExecutionContext::$handler, )*
                }
            }
        }
    };
}

for_each_instruction!(define_instructions);

impl Instruction {
    /// Runs this variant against `ctx` with already-classified operands.
    pub fn execute(&self, ctx: &mut ExecutionContext, operands: &[&str]) -> Result<(), VMError> {
        (self.handler())(ctx, operands)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mov_has_two_variants() {
        let movs: Vec<_> = Instruction::ALL
            .iter()
            .filter(|i| i.mnemonic() == "mov")
            .collect();
        assert_eq!(movs.len(), 2);
        assert_eq!(
            Instruction::MovImm.operand_types(),
            &[TokenType::Register, TokenType::Number]
        );
        assert_eq!(
            Instruction::MovReg.operand_types(),
            &[TokenType::Register, TokenType::Register]
        );
    }

    #[test]
    fn signature_matches_operand_types() {
        for instr in Instruction::ALL {
            assert_eq!(instr.signature().types(), instr.operand_types());
        }
    }

    #[test]
    fn pop_only_accepts_register() {
        assert_eq!(Instruction::Pop.signature().to_string(), "(register)");
    }
}
