use crate::virtual_machine::errors::VMError;
use crate::virtual_machine::vm::context::RegisterReadPolicy;
use indexmap::IndexMap;

/// Named integer registers.
///
/// A register exists once it has been written. Iteration follows the order in
/// which registers were first written.
#[derive(Clone, Debug, Default)]
pub struct Registers {
    values: IndexMap<String, i64>,
}

// Two register files are equal only if they were also written in the same order.
impl PartialEq for Registers {
    fn eq(&self, other: &Self) -> bool {
        self.values.iter().eq(other.values.iter())
    }
}

impl Eq for Registers {}

impl Registers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value of `name`, or `None` if it was never written.
    pub fn get(&self, name: &str) -> Option<i64> {
        self.values.get(name).copied()
    }

    /// Reads `name` under the given policy.
    ///
    /// Returns [`VMError::UninitializedRegister`] for an unwritten register
    /// when the policy is [`RegisterReadPolicy::Strict`].
    pub(crate) fn read(&self, name: &str, policy: RegisterReadPolicy) -> Result<i64, VMError> {
        match (self.get(name), policy) {
            (Some(v), _) => Ok(v),
            (None, RegisterReadPolicy::ZeroDefault) => Ok(0),
            (None, RegisterReadPolicy::Strict) => {
                Err(VMError::UninitializedRegister(name.to_string()))
            }
        }
    }

    /// Stores `value` into `name`, creating the register on first write.
    pub fn set(&mut self, name: &str, value: i64) {
        match self.values.get_mut(name) {
            Some(slot) => *slot = value,
            None => {
                self.values.insert(name.to_string(), value);
            }
        }
    }

    /// Iterates `(name, value)` pairs in first-write order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.values.iter().map(|(name, v)| (name.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
