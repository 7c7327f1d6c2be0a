use std::env;

/// Environment variable that switches register reads to [`RegisterReadPolicy::ZeroDefault`].
pub const ZERO_REGISTERS_ENV: &str = "REGVM_ZERO_REGISTERS";

/// How a read of a never-written register behaves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RegisterReadPolicy {
    /// The read fails with `UninitializedRegister` and the instruction has no effect.
    #[default]
    Strict,
    /// The register reads as zero. It is still absent until written.
    ZeroDefault,
}

/// Execution settings passed to an [`ExecutionContext`](super::ExecutionContext).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExecConfig {
    pub register_reads: RegisterReadPolicy,
}

impl ExecConfig {
    /// Default settings, overridden by `REGVM_ZERO_REGISTERS`.
    ///
    /// Any value other than empty, `0` or `false` enables zero-default reads.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(value) = env::var(ZERO_REGISTERS_ENV)
            && is_truthy(&value)
        {
            config.register_reads = RegisterReadPolicy::ZeroDefault;
        }
        config
    }

    pub fn with_register_reads(mut self, policy: RegisterReadPolicy) -> Self {
        self.register_reads = policy;
        self
    }
}

fn is_truthy(value: &str) -> bool {
    let value = value.trim();
    !(value.is_empty() || value == "0" || value.eq_ignore_ascii_case("false"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_strict() {
        assert_eq!(
            ExecConfig::default().register_reads,
            RegisterReadPolicy::Strict
        );
    }

    #[test]
    fn builder_sets_policy() {
        let config = ExecConfig::default().with_register_reads(RegisterReadPolicy::ZeroDefault);
        assert_eq!(config.register_reads, RegisterReadPolicy::ZeroDefault);
    }

    #[test]
    fn truthy_values() {
        assert!(is_truthy("1"));
        assert!(is_truthy("yes"));
        assert!(is_truthy(" true "));
        assert!(!is_truthy(""));
        assert!(!is_truthy("0"));
        assert!(!is_truthy("FALSE"));
    }
}
