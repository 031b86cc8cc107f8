//! Converts parsed programs back to their canonical clause text, one clause
//! per line. `encode` followed by `decode` yields an equivalent program.

use crate::types::{ParseError, Program};

/// Serializes a program into canonical clause form.
///
/// The accepting clause comes first with its states sorted for deterministic
/// output, followed by one instruction clause per line in declaration order.
pub fn encode(program: &Program) -> String {
    let mut accepting: Vec<&str> = program.accepting.iter().map(String::as_str).collect();
    accepting.sort_unstable();

    let mut out = format!("{{{}}}", accepting.join(","));
    for instruction in &program.instructions {
        out.push_str(".\n");
        out.push_str(&instruction.to_string());
    }
    out
}

/// Parses canonical (or any valid) program text back into a [`Program`].
pub fn decode(text: &str) -> Result<Program, ParseError> {
    crate::parser::parse(text)
}
