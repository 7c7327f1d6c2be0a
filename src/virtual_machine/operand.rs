//! Operand classification and signatures.

use std::fmt;

/// Syntactic category of an operand token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenType {
    /// One or more decimal digits.
    Number,
    /// An ASCII letter followed by ASCII letters or digits.
    Register,
    /// Anything else, including the empty string.
    Unknown,
}

impl TokenType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            TokenType::Number => "number",
            TokenType::Register => "register",
            TokenType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifies a raw operand token. Total: every token maps to exactly one type.
pub fn classify(token: &str) -> TokenType {
    let mut chars = token.chars();
    match chars.next() {
        None => TokenType::Unknown,
        Some(c) if c.is_ascii_digit() => {
            if chars.all(|c| c.is_ascii_digit()) {
                TokenType::Number
            } else {
                TokenType::Unknown
            }
        }
        Some(c) if c.is_ascii_alphabetic() => {
            if chars.all(|c| c.is_ascii_alphanumeric()) {
                TokenType::Register
            } else {
                TokenType::Unknown
            }
        }
        Some(_) => TokenType::Unknown,
    }
}

/// Ordered operand types of one handler variant.
///
/// Equality is element-wise, so `(register, number)` and `(number, register)`
/// are different signatures.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct OperandSignature(Vec<TokenType>);

impl OperandSignature {
    pub fn new(types: impl Into<Vec<TokenType>>) -> Self {
        Self(types.into())
    }

    /// Classifies every operand in order.
    pub fn of<S: AsRef<str>>(operands: &[S]) -> Self {
        Self(operands.iter().map(|op| classify(op.as_ref())).collect())
    }

    pub fn types(&self) -> &[TokenType] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&[TokenType]> for OperandSignature {
    fn from(types: &[TokenType]) -> Self {
        Self(types.to_vec())
    }
}

impl fmt::Display for OperandSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, ty) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{ty}")?;
        }
        f.write_str(")")
    }
}
