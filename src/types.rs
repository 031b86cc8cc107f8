//! Core data structures for the MTU machine language: instructions, programs,
//! result-field sentinels, step outcomes, and the error types shared by the
//! parser and the execution engine.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

use crate::Rule;

/// The blank symbol occupying every tape cell that was never written.
pub const BLANK_SYMBOL: &str = "B";
/// The reserved literal denoting "leave unchanged" in result fields.
pub const SAME_TOKEN: &str = "SAME";
/// The state every machine starts in after a reset.
pub const INITIAL_STATE: &str = "00";
/// The number of top-level fields an instruction clause must produce.
pub const INSTRUCTION_FIELDS: usize = 5;

/// A head movement executed after an instruction's write/state update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Move {
    /// Advance the pointer one cell to the right.
    Right,
    /// Move the pointer one cell to the left.
    Left,
    /// Leave the pointer where it is.
    NoMove,
}

impl Move {
    /// Maps a move-operator token to a `Move`. Supports `>`, `<` and `!`.
    pub fn from_symbol(symbol: &str) -> Option<Move> {
        match symbol {
            ">" => Some(Move::Right),
            "<" => Some(Move::Left),
            "!" => Some(Move::NoMove),
            _ => None,
        }
    }

    /// The operator token for this move, as it appears in program text.
    pub fn symbol(&self) -> &'static str {
        match self {
            Move::Right => ">",
            Move::Left => "<",
            Move::NoMove => "!",
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A result field of an instruction: either the `SAME` sentinel, leaving the
/// current state/symbol untouched, or an ordered list of labels.
///
/// The sentinel may also appear *inside* a list, meaning "leave unchanged
/// when this index is selected"; such elements are stored as `None` so that a
/// real label spelled like the sentinel token cannot collide with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResultField {
    /// The whole field is the sentinel; nothing is updated.
    Unchanged,
    /// An ordered list of labels, `None` entries being element-wise sentinels.
    Values(Vec<Option<String>>),
}

impl ResultField {
    /// The arity used by the engine's dispatch: 0 for `Unchanged`, otherwise
    /// the list length.
    pub fn arity(&self) -> usize {
        match self {
            ResultField::Unchanged => 0,
            ResultField::Values(values) => values.len(),
        }
    }

    /// The single label of an arity-1 field, if it carries one.
    pub fn single(&self) -> Option<&str> {
        match self {
            ResultField::Values(values) if values.len() == 1 => values[0].as_deref(),
            _ => None,
        }
    }

    /// The label at `index`, or `None` for out-of-range indices and
    /// element-wise sentinels.
    pub fn select(&self, index: usize) -> Option<&str> {
        match self {
            ResultField::Unchanged => None,
            ResultField::Values(values) => values.get(index).and_then(|v| v.as_deref()),
        }
    }

    pub fn is_unchanged(&self) -> bool {
        matches!(self, ResultField::Unchanged)
    }
}

impl fmt::Display for ResultField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultField::Unchanged => f.write_str(SAME_TOKEN),
            ResultField::Values(values) if values.len() == 1 => {
                f.write_str(values[0].as_deref().unwrap_or(SAME_TOKEN))
            }
            ResultField::Values(values) => {
                let labels: Vec<&str> = values
                    .iter()
                    .map(|v| v.as_deref().unwrap_or(SAME_TOKEN))
                    .collect();
                write!(f, "{{{}}}", labels.join(","))
            }
        }
    }
}

/// One parsed transition rule.
///
/// Built by the parser, owned by a [`Program`] and never mutated afterwards.
/// The arity invariant (a result list longer than one label must match
/// `guard_symbols` in length) is enforced by the analyzer at parse time and
/// re-checked by the engine's dispatch at apply time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instruction {
    /// The state label the machine must currently be in.
    pub guard_state: String,
    /// The symbols this instruction fires on; always at least one.
    pub guard_symbols: Vec<String>,
    /// The state(s) to transition to.
    pub result_states: ResultField,
    /// The symbol(s) to write.
    pub result_symbols: ResultField,
    /// Head movement performed after the update.
    pub movement: Move,
    /// Marks a `W`-prefixed "while" rule (apply-and-retest, at most one
    /// application per external step).
    pub repeat: bool,
}

impl Instruction {
    /// Whether this instruction fires for the given state and read symbol.
    pub fn matches(&self, state: &str, symbol: &str) -> bool {
        self.guard_state == state && self.guard_symbols.iter().any(|s| s == symbol)
    }

    /// The position of `symbol` within the guard symbols, used by the indexed
    /// dispatch cases.
    pub fn symbol_index(&self, symbol: &str) -> Option<usize> {
        self.guard_symbols.iter().position(|s| s == symbol)
    }
}

impl fmt::Display for Instruction {
    /// Renders the canonical clause form, e.g. `W(00,{01,02},{a,b},SAME,>)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.repeat {
            f.write_str("W")?;
        }
        write!(
            f,
            "({},{},{},{},{})",
            self.guard_state,
            self.result_states,
            format_labels(&self.guard_symbols),
            self.result_symbols,
            self.movement
        )
    }
}

/// Formats a guard-symbol list: bare for a single label, braced otherwise.
fn format_labels(labels: &[String]) -> String {
    match labels {
        [single] => single.clone(),
        _ => format!("{{{}}}", labels.join(",")),
    }
}

/// A parsed MTU program: an ordered instruction list (order is significant,
/// first match wins) plus the set of accepting-state labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    /// States in which the machine halts and accepts.
    pub accepting: HashSet<String>,
    /// Transition rules in declaration order.
    pub instructions: Vec<Instruction>,
}

impl Program {
    pub fn is_accepting(&self, state: &str) -> bool {
        self.accepting.contains(state)
    }
}

/// The outcome of a single external `step()` call.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// The machine is in an accepting state. Carries the instruction that
    /// produced it, or `None` when the machine was already accepting.
    Accepted(Option<Instruction>),
    /// One instruction was applied and the machine keeps running.
    Stepped(Instruction),
    /// A repeat instruction's guard failed its re-check. Unreachable under
    /// the first-match scan; preserved for the documented step contract.
    SteppedWhileSkip(Instruction),
    /// No instruction matches the current state and symbol; the machine
    /// stalls. This is a defined halting outcome, not an error.
    NoMatch,
    /// A runtime failure; the machine refuses further steps until reset.
    Error(RuntimeError),
}

/// Errors raised while loading a program. Fatal to that load attempt only; a
/// previously loaded program remains usable.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// Malformed clause structure, including unbalanced brackets.
    #[error("syntax error: {0}")]
    Syntax(Box<pest::error::Error<Rule>>),
    /// An instruction clause produced the wrong number of top-level fields.
    #[error("instruction has {found} fields, expected {expected}")]
    FieldCount { expected: usize, found: usize },
    /// A field that must be a single label was a bracketed list.
    #[error("{0} must be a single label, not a list")]
    ExpectedLabel(&'static str),
    /// The fifth field is not one of the move operators `>`, `<`, `!`.
    #[error("unknown move operator: {0:?}")]
    UnknownMove(String),
    /// The program parsed but violates a structural invariant.
    #[error("program validation error: {0}")]
    Validation(String),
    /// The program file could not be read.
    #[error("file error: {0}")]
    File(String),
}

/// Errors raised while stepping the machine. Recorded on the engine and
/// surfaced as [`Step::Error`]; cleared by an explicit reset.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    #[error("no program loaded")]
    NoProgram,
    /// Result arities inconsistent with the guard-symbol count, discovered by
    /// the dispatch at apply time.
    #[error(
        "malformed instruction: result arities (states: {states}, symbols: {symbols}) \
         do not fit {guards} guard symbols"
    )]
    MalformedInstruction {
        states: usize,
        symbols: usize,
        guards: usize,
    },
    /// The read symbol vanished from the guard between match and apply.
    #[error("read symbol {symbol:?} not found in guard symbols {guards:?}")]
    SymbolNotInGuard {
        symbol: String,
        guards: Vec<String>,
    },
    #[error("pointer {pointer} outside tape of length {len}")]
    PointerOutOfBounds { pointer: usize, len: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_instruction() -> Instruction {
        Instruction {
            guard_state: "00".into(),
            guard_symbols: vec!["a".into(), "b".into()],
            result_states: ResultField::Values(vec![Some("01".into()), Some("02".into())]),
            result_symbols: ResultField::Unchanged,
            movement: Move::Right,
            repeat: false,
        }
    }

    #[test]
    fn test_move_serialization() {
        let right = Move::Right;
        let json = serde_json::to_string(&right).unwrap();
        assert_eq!(json, "\"Right\"");

        let deserialized: Move = serde_json::from_str(&json).unwrap();
        assert_eq!(right, deserialized);
    }

    #[test]
    fn test_instruction_serde_round_trip() {
        let instruction = sample_instruction();
        let json = serde_json::to_string(&instruction).unwrap();
        let deserialized: Instruction = serde_json::from_str(&json).unwrap();
        assert_eq!(instruction, deserialized);
    }

    #[test]
    fn test_instruction_display() {
        let instruction = sample_instruction();
        assert_eq!(instruction.to_string(), "(00,{01,02},{a,b},SAME,>)");
    }

    #[test]
    fn test_repeat_instruction_display() {
        let instruction = Instruction {
            guard_state: "00".into(),
            guard_symbols: vec!["x".into()],
            result_states: ResultField::Unchanged,
            result_symbols: ResultField::Values(vec![Some("X".into())]),
            movement: Move::Right,
            repeat: true,
        };
        assert_eq!(instruction.to_string(), "W(00,SAME,x,X,>)");
    }

    #[test]
    fn test_element_wise_sentinel_display() {
        let field = ResultField::Values(vec![Some("1".into()), None]);
        assert_eq!(field.to_string(), "{1,SAME}");
    }

    #[test]
    fn test_result_field_arity_and_selection() {
        assert_eq!(ResultField::Unchanged.arity(), 0);
        assert_eq!(ResultField::Unchanged.single(), None);
        assert_eq!(ResultField::Unchanged.select(0), None);

        let single = ResultField::Values(vec![Some("01".into())]);
        assert_eq!(single.arity(), 1);
        assert_eq!(single.single(), Some("01"));

        let many = ResultField::Values(vec![Some("01".into()), None]);
        assert_eq!(many.arity(), 2);
        assert_eq!(many.single(), None);
        assert_eq!(many.select(0), Some("01"));
        assert_eq!(many.select(1), None);
        assert_eq!(many.select(5), None);
    }

    #[test]
    fn test_instruction_matching() {
        let instruction = sample_instruction();
        assert!(instruction.matches("00", "a"));
        assert!(instruction.matches("00", "b"));
        assert!(!instruction.matches("00", "c"));
        assert!(!instruction.matches("01", "a"));
        assert_eq!(instruction.symbol_index("b"), Some(1));
        assert_eq!(instruction.symbol_index("c"), None);
    }

    #[test]
    fn test_error_display() {
        let error = ParseError::FieldCount {
            expected: 5,
            found: 3,
        };
        assert_eq!(error.to_string(), "instruction has 3 fields, expected 5");

        let error = RuntimeError::MalformedInstruction {
            states: 3,
            symbols: 0,
            guards: 2,
        };
        let message = error.to_string();
        assert!(message.contains("malformed instruction"));
        assert!(message.contains("states: 3"));
    }
}
