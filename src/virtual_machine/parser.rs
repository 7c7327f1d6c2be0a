//! Line tokenizer for program source.
//!
//! # Syntax
//!
//! ```text
//! MNEMONIC operand1, operand2, ...
//! ```
//!
//! - The mnemonic is the first whitespace-delimited word of the line
//! - Operands are separated by commas and trimmed
//! - Commas inside a double-quoted substring stay part of the operand
//! - A final unmatched `"` is plain text and does not open a quoted region
//! - Blank lines are skipped

use crate::virtual_machine::errors::VMError;
use std::fs;
use std::path::Path;

const QUOTE: u8 = b'"';
const SEPARATOR: u8 = b',';

/// One tokenized source line, borrowing from the program text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceLine<'a> {
    pub mnemonic: &'a str,
    pub operands: Vec<&'a str>,
}

/// Splits a line into its mnemonic and trimmed operand tokens.
pub fn tokenize_line(line: &str) -> SourceLine<'_> {
    let line = line.trim();
    let (mnemonic, rest) = match line.split_once(char::is_whitespace) {
        Some((mnemonic, rest)) => (mnemonic, rest.trim()),
        None => (line, ""),
    };

    SourceLine {
        mnemonic,
        operands: split_operands(rest),
    }
}

/// Comma split that respects quoted regions.
fn split_operands(text: &str) -> Vec<&str> {
    if text.is_empty() {
        return Vec::new();
    }

    // only paired quotes open and close regions
    let quotes = text.bytes().filter(|&b| b == QUOTE).count();
    let mut paired_quotes = quotes - quotes % 2;

    let mut out = Vec::with_capacity(4);
    let mut in_str = false;
    let mut start = 0;

    for (i, b) in text.bytes().enumerate() {
        match b {
            QUOTE if paired_quotes > 0 => {
                in_str = !in_str;
                paired_quotes -= 1;
            }
            SEPARATOR if !in_str => {
                out.push(text[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    out.push(text[start..].trim());

    out
}

/// Parses a Number operand.
///
/// Returns [`VMError::InvalidNumber`] if the digits overflow an i64.
pub(crate) fn parse_number(tok: &str) -> Result<i64, VMError> {
    tok.parse::<i64>()
        .map_err(|_| VMError::InvalidNumber(tok.to_string()))
}

/// Yields `(line_number, line)` for every non-blank line. Line numbers are 1-based.
pub fn program_lines(source: &str) -> impl Iterator<Item = (usize, &str)> {
    source
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| (idx + 1, line))
}

/// Reads a program from disk.
pub fn read_program<P: AsRef<Path>>(path: P) -> Result<String, VMError> {
    let path_ref = path.as_ref();
    fs::read_to_string(path_ref).map_err(|e| VMError::IoError {
        path: path_ref.display().to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::virtual_machine::operand::{TokenType, classify};

    #[test]
    fn tokenize_mov() {
        let line = tokenize_line("mov m1, 5");
        assert_eq!(line.mnemonic, "mov");
        assert_eq!(line.operands, vec!["m1", "5"]);
        let types: Vec<_> = line.operands.iter().map(|op| classify(op)).collect();
        assert_eq!(types, vec![TokenType::Register, TokenType::Number]);
    }

    #[test]
    fn tokenize_no_operands() {
        let line = tokenize_line("halt");
        assert_eq!(line.mnemonic, "halt");
        assert!(line.operands.is_empty());

        let line = tokenize_line("   halt   ");
        assert_eq!(line.mnemonic, "halt");
        assert!(line.operands.is_empty());
    }

    #[test]
    fn tokenize_quoted_comma_is_preserved() {
        let line = tokenize_line(r#"print "a,b""#);
        assert_eq!(line.mnemonic, "print");
        assert_eq!(line.operands, vec![r#""a,b""#]);
    }

    #[test]
    fn tokenize_quoted_and_plain_operands() {
        let line = tokenize_line(r#"emit "x, y", r1 ,  "z""#);
        assert_eq!(line.operands, vec![r#""x, y""#, "r1", r#""z""#]);
    }

    #[test]
    fn tokenize_unbalanced_quote_is_plain_text() {
        let line = tokenize_line(r#"print "a,b"#);
        assert_eq!(line.operands, vec![r#""a"#, "b"]);

        let line = tokenize_line(r#"print "a,b", "c,d"#);
        assert_eq!(line.operands, vec![r#""a,b""#, r#""c"#, "d"]);
    }

    #[test]
    fn tokenize_empty_operands() {
        let line = tokenize_line("mov a,,5");
        assert_eq!(line.operands, vec!["a", "", "5"]);

        let line = tokenize_line("push 1,");
        assert_eq!(line.operands, vec!["1", ""]);
    }

    #[test]
    fn tokenize_tab_separated_mnemonic() {
        let line = tokenize_line("add\ta, b");
        assert_eq!(line.mnemonic, "add");
        assert_eq!(line.operands, vec!["a", "b"]);
    }

    #[test]
    fn tokenize_spaces_inside_operand_are_kept() {
        let line = tokenize_line("mov a b, 1");
        assert_eq!(line.operands, vec!["a b", "1"]);
    }

    #[test]
    fn parse_number_valid() {
        assert_eq!(parse_number("0").unwrap(), 0);
        assert_eq!(parse_number("007").unwrap(), 7);
        assert_eq!(parse_number("9223372036854775807").unwrap(), i64::MAX);
    }

    #[test]
    fn parse_number_overflow() {
        assert_eq!(
            parse_number("9223372036854775808"),
            Err(VMError::InvalidNumber("9223372036854775808".to_string()))
        );
    }

    #[test]
    fn program_lines_skip_blanks_and_keep_numbers() {
        let source = "\nmov a, 1\n   \n\tpush a\n\n";
        let lines: Vec<_> = program_lines(source).collect();
        assert_eq!(lines, vec![(2, "mov a, 1"), (4, "\tpush a")]);
    }

    #[test]
    fn read_program_missing_file() {
        let err = read_program("/definitely/not/here.asm").unwrap_err();
        assert!(matches!(err, VMError::IoError { ref path, .. } if path.contains("here.asm")));
    }
}
