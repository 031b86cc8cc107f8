//! Loading MTU programs from the filesystem: single `.mtu` files, raw string
//! content, or every program file in a directory.

use crate::parser::parse;
use crate::types::{ParseError, Program};
use std::fs;
use std::path::{Path, PathBuf};

/// File extension recognized when scanning directories for programs.
const PROGRAM_EXTENSION: &str = "mtu";

/// Utility for loading MTU programs from files and directories.
pub struct ProgramLoader;

impl ProgramLoader {
    /// Loads a single program from the given file path.
    ///
    /// # Errors
    ///
    /// * [`ParseError::File`] if the file cannot be read.
    /// * Any parse error if the content is not a valid program.
    pub fn load_program(path: &Path) -> Result<Program, ParseError> {
        let content = fs::read_to_string(path)
            .map_err(|e| ParseError::File(format!("cannot read {}: {}", path.display(), e)))?;

        parse(&content)
    }

    /// Loads a program from raw string content, e.g. user input.
    pub fn load_program_from_string(content: &str) -> Result<Program, ParseError> {
        parse(content)
    }

    /// Loads every `.mtu` file in `directory`, skipping subdirectories and
    /// files with other extensions. Each entry is reported individually so a
    /// broken program does not hide the valid ones.
    pub fn load_programs(directory: &Path) -> Vec<Result<(PathBuf, Program), ParseError>> {
        let entries = match fs::read_dir(directory) {
            Ok(entries) => entries,
            Err(e) => {
                return vec![Err(ParseError::File(format!(
                    "cannot scan {}: {}",
                    directory.display(),
                    e
                )))]
            }
        };

        let mut results = Vec::new();
        for entry in entries {
            let path = match entry {
                Ok(entry) => entry.path(),
                Err(e) => {
                    results.push(Err(ParseError::File(format!("unreadable entry: {e}"))));
                    continue;
                }
            };

            if path.is_dir() || path.extension().is_none_or(|ext| ext != PROGRAM_EXTENSION) {
                continue;
            }

            results.push(
                Self::load_program(&path)
                    .map(|program| (path.clone(), program))
                    .map_err(|e| ParseError::File(format!("{}: {}", path.display(), e))),
            );
        }

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_load_valid_program() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("test.mtu");

        let mut file = File::create(&file_path).unwrap();
        file.write_all(b"{01}.\n(00,01,B,B,>)").unwrap();

        let program = ProgramLoader::load_program(&file_path).unwrap();
        assert!(program.is_accepting("01"));
        assert_eq!(program.instructions.len(), 1);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let result = ProgramLoader::load_program(&dir.path().join("absent.mtu"));
        assert!(matches!(result, Err(ParseError::File(_))));
    }

    #[test]
    fn test_load_invalid_program() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("invalid.mtu");

        let mut file = File::create(&file_path).unwrap();
        file.write_all(b"This is not a valid program").unwrap();

        assert!(ProgramLoader::load_program(&file_path).is_err());
    }

    #[test]
    fn test_load_programs_from_directory() {
        let dir = tempdir().unwrap();

        let mut valid = File::create(dir.path().join("valid.mtu")).unwrap();
        valid.write_all(b"{01}.(00,01,B,B,>)").unwrap();

        let mut invalid = File::create(dir.path().join("invalid.mtu")).unwrap();
        invalid.write_all(b"not a program").unwrap();

        let mut ignored = File::create(dir.path().join("ignored.txt")).unwrap();
        ignored.write_all(b"skipped").unwrap();

        let results = ProgramLoader::load_programs(dir.path());
        assert_eq!(results.len(), 2);

        let successes = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(successes, 1);
    }

    #[test]
    fn test_load_programs_from_missing_directory() {
        let dir = tempdir().unwrap();
        let results = ProgramLoader::load_programs(&dir.path().join("nope"));
        assert_eq!(results.len(), 1);
        assert!(results[0].is_err());
    }
}
