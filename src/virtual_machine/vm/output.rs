/// Informational logs and errors collected during a run.
///
/// Both sequences are append-only.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OutputStream {
    logs: Vec<String>,
    errors: Vec<String>,
}

impl OutputStream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&mut self, message: impl Into<String>) {
        self.logs.push(message.into());
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    /// True iff no error has been recorded.
    pub fn should_compile(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn logs(&self) -> &[String] {
        &self.logs
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_stream_compiles() {
        assert!(OutputStream::new().should_compile());
    }

    #[test]
    fn single_error_blocks_compile() {
        let mut out = OutputStream::new();
        out.log("1");
        assert!(out.should_compile());
        out.error("boom");
        assert!(!out.should_compile());
    }

    #[test]
    fn streams_are_independent_and_ordered() {
        let mut out = OutputStream::new();
        out.log("a");
        out.error("x");
        out.log("b");
        out.error("y");
        assert_eq!(out.logs(), ["a", "b"]);
        assert_eq!(out.errors(), ["x", "y"]);
    }
}
