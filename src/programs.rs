//! A registry of embedded example programs, compiled into the library and
//! parsed lazily behind a lock.

use crate::types::{ParseError, Program};

use std::sync::RwLock;

/// Embedded example programs: display name plus source text.
pub const PROGRAM_TEXTS: [(&str, &str); 3] = [
    ("Bit flipper", include_str!("../programs/bit-flipper.mtu")),
    ("Even a-counter", include_str!("../programs/even-a.mtu")),
    ("Uppercase marker", include_str!("../programs/uppercase.mtu")),
];

lazy_static::lazy_static! {
    /// Parsed embedded programs, in the order of [`PROGRAM_TEXTS`].
    pub static ref PROGRAMS: RwLock<Vec<Program>> = RwLock::new(Vec::new());
}

pub struct ProgramManager;

impl ProgramManager {
    /// Parses the embedded programs into the registry. Safe to call more than
    /// once; the registry is rebuilt each time.
    pub fn load() -> Result<(), ParseError> {
        let mut programs = Vec::new();

        for (name, text) in PROGRAM_TEXTS {
            match crate::parser::parse(text) {
                Ok(program) => programs.push(program),
                Err(e) => eprintln!("Failed to parse embedded program {name}: {e}"),
            }
        }

        if let Ok(mut write_guard) = PROGRAMS.write() {
            *write_guard = programs;
        } else {
            return Err(ParseError::File(
                "Failed to acquire write lock".to_string(),
            ));
        }

        Ok(())
    }

    /// The number of available embedded programs.
    pub fn get_program_count() -> usize {
        let _ = Self::load();

        PROGRAMS.read().map(|programs| programs.len()).unwrap_or(0)
    }

    /// Returns an embedded program by its index.
    pub fn get_program_by_index(index: usize) -> Result<Program, ParseError> {
        let _ = Self::load();

        PROGRAMS
            .read()
            .map_err(|_| ParseError::File("Failed to acquire read lock".to_string()))?
            .get(index)
            .cloned()
            .ok_or_else(|| {
                ParseError::Validation(format!("Program index {} out of range", index))
            })
    }

    /// Returns an embedded program by its display name.
    pub fn get_program_by_name(name: &str) -> Result<Program, ParseError> {
        let index = PROGRAM_TEXTS
            .iter()
            .position(|(program_name, _)| *program_name == name)
            .ok_or_else(|| ParseError::Validation(format!("Program '{}' not found", name)))?;

        Self::get_program_by_index(index)
    }

    /// Lists the display names of all embedded programs.
    pub fn list_program_names() -> Vec<&'static str> {
        PROGRAM_TEXTS.iter().map(|(name, _)| *name).collect()
    }

    /// The original source text of an embedded program.
    pub fn get_program_text_by_index(index: usize) -> Result<&'static str, ParseError> {
        PROGRAM_TEXTS
            .get(index)
            .map(|(_, text)| *text)
            .ok_or_else(|| {
                ParseError::Validation(format!("Program text index {} out of range", index))
            })
    }

    /// Summary information about an embedded program.
    pub fn get_program_info(index: usize) -> Result<ProgramInfo, ParseError> {
        let program = Self::get_program_by_index(index)?;

        Ok(ProgramInfo {
            index,
            name: PROGRAM_TEXTS[index].0,
            accepting_count: program.accepting.len(),
            instruction_count: program.instructions.len(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct ProgramInfo {
    pub index: usize,
    pub name: &'static str,
    pub accepting_count: usize,
    pub instruction_count: usize,
}
