//! Core library for the MTU machine language: a single-tape Turing-machine
//! variant driven by a compact clause-based instruction format. It includes
//! modules for parsing program text, stepping machines one instruction at a
//! time, validating programs, re-serializing them, and managing a set of
//! embedded example programs.

pub mod analyzer;
pub mod encoder;
pub mod loader;
pub mod machine;
pub mod parser;
pub mod programs;
pub mod tape;
pub mod types;

/// Re-exports the `Rule` enum from the parser module, used by the `pest` grammar.
pub use crate::parser::Rule;
/// Re-exports the analysis entry points from the analyzer module.
pub use analyzer::{analyze, warnings, AnalysisError, Warning};
/// Re-exports the canonical serialization functions from the encoder module.
pub use encoder::{decode, encode};
/// Re-exports the `ProgramLoader` struct from the loader module.
pub use loader::ProgramLoader;
/// Re-exports the `Machine` struct from the machine module.
pub use machine::Machine;
/// Re-exports the `parse` function from the parser module.
pub use parser::parse;
/// Re-exports `ProgramInfo`, `ProgramManager`, and `PROGRAMS` from the programs module.
pub use programs::{ProgramInfo, ProgramManager, PROGRAMS};
/// Re-exports the `Tape` struct from the tape module.
pub use tape::Tape;
/// Re-exports the data model and error types from the types module.
pub use types::{
    Instruction, Move, ParseError, Program, ResultField, RuntimeError, Step, BLANK_SYMBOL,
    INITIAL_STATE, SAME_TOKEN,
};
