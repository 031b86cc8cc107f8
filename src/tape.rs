//! The machine tape: a logically bi-infinite symbol sequence represented as a
//! growable cell vector plus a pointer. Cells outside the current bounds read
//! as the blank symbol, and moving past either end grows the vector lazily,
//! so the pointer index never goes negative.

use crate::types::{Move, BLANK_SYMBOL};
use std::fmt;

/// A single tape with its read/write pointer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tape {
    cells: Vec<String>,
    pointer: usize,
}

fn blank() -> String {
    BLANK_SYMBOL.to_string()
}

impl Tape {
    /// Builds a tape from raw input text, one cell per character.
    ///
    /// A blank boundary cell is guaranteed at both ends, and the pointer
    /// starts at index 1. Empty input yields three blank cells.
    pub fn new(input: &str) -> Self {
        let mut cells: Vec<String> = input.chars().map(|c| c.to_string()).collect();

        if cells.first().map(String::as_str) != Some(BLANK_SYMBOL) {
            cells.insert(0, blank());
        }
        if cells.len() == 1 || cells.last().map(String::as_str) != Some(BLANK_SYMBOL) {
            cells.push(blank());
        }
        if input.is_empty() && cells.len() < 3 {
            cells = vec![blank(), blank(), blank()];
        }

        Self { cells, pointer: 1 }
    }

    /// Builds a tape directly from cells and a pointer, without boundary
    /// blanks. Intended for tests and tools.
    pub fn with_cells(cells: Vec<String>, pointer: usize) -> Self {
        Self { cells, pointer }
    }

    /// The symbol under the pointer. Out-of-bounds reads cannot occur under
    /// the growth rules but are defined to yield the blank symbol.
    pub fn read(&self) -> &str {
        match self.cells.get(self.pointer) {
            Some(symbol) => symbol,
            None => BLANK_SYMBOL,
        }
    }

    /// Overwrites the cell under the pointer, growing the tape rightward with
    /// blanks until the pointer is addressable.
    pub fn write(&mut self, symbol: &str) {
        while self.pointer >= self.cells.len() {
            self.cells.push(blank());
        }
        self.cells[self.pointer] = symbol.to_string();
    }

    /// Advances the pointer, appending a blank when it passes the right end.
    pub fn move_right(&mut self) {
        self.pointer += 1;
        if self.pointer >= self.cells.len() {
            self.cells.push(blank());
        }
    }

    /// Moves the pointer left. At index 0 the tape grows leftward instead: a
    /// blank is prepended and the pointer stays at the new leftmost cell.
    pub fn move_left(&mut self) {
        if self.pointer == 0 {
            self.cells.insert(0, blank());
        } else {
            self.pointer -= 1;
        }
    }

    /// Executes a head movement.
    pub fn apply(&mut self, movement: Move) {
        match movement {
            Move::Right => self.move_right(),
            Move::Left => self.move_left(),
            Move::NoMove => {}
        }
    }

    pub fn cells(&self) -> &[String] {
        &self.cells
    }

    pub fn pointer(&self) -> usize {
        self.pointer
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Whether the pointer addresses an existing cell.
    pub fn in_bounds(&self) -> bool {
        self.pointer < self.cells.len()
    }
}

impl fmt::Display for Tape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for cell in &self.cells {
            f.write_str(cell)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(symbols: &[&str]) -> Vec<String> {
        symbols.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_new_from_input() {
        let tape = Tape::new("abc");
        assert_eq!(tape.cells(), cells(&["B", "a", "b", "c", "B"]));
        assert_eq!(tape.pointer(), 1);
        assert_eq!(tape.read(), "a");
    }

    #[test]
    fn test_new_from_empty_input() {
        let tape = Tape::new("");
        assert_eq!(tape.cells(), cells(&["B", "B", "B"]));
        assert_eq!(tape.pointer(), 1);
        assert_eq!(tape.read(), "B");
    }

    #[test]
    fn test_new_input_with_existing_boundaries() {
        let tape = Tape::new("BaB");
        assert_eq!(tape.cells(), cells(&["B", "a", "B"]));
        assert_eq!(tape.pointer(), 1);
    }

    #[test]
    fn test_move_right_grows_tape() {
        let k = 5;
        let mut tape = Tape::with_cells(cells(&["a"]), 0);
        for _ in 0..k {
            tape.move_right();
        }
        assert_eq!(tape.pointer(), k);
        assert!(tape.len() >= k + 1);
        assert_eq!(tape.cells()[0], "a");
        assert_eq!(tape.read(), "B");
    }

    #[test]
    fn test_move_left_grows_tape_and_shifts_content() {
        let k = 4;
        let mut tape = Tape::with_cells(cells(&["a"]), 0);
        for _ in 0..k {
            tape.move_left();
        }
        assert_eq!(tape.pointer(), 0);
        assert!(tape.len() >= k + 1);
        // Original content shifted right by k, left-padded with blanks.
        assert_eq!(tape.cells()[k], "a");
        for i in 0..k {
            assert_eq!(tape.cells()[i], "B");
        }
    }

    #[test]
    fn test_move_left_within_bounds() {
        let mut tape = Tape::with_cells(cells(&["a", "b"]), 1);
        tape.move_left();
        assert_eq!(tape.pointer(), 0);
        assert_eq!(tape.len(), 2);
    }

    #[test]
    fn test_write_grows_rightward() {
        let mut tape = Tape::with_cells(cells(&["a"]), 3);
        tape.write("x");
        assert_eq!(tape.cells(), cells(&["a", "B", "B", "x"]));
    }

    #[test]
    fn test_out_of_bounds_read_is_blank() {
        let tape = Tape::with_cells(cells(&["a"]), 7);
        assert!(!tape.in_bounds());
        assert_eq!(tape.read(), "B");
    }

    #[test]
    fn test_no_move_is_identity() {
        let mut tape = Tape::new("ab");
        let before = tape.clone();
        tape.apply(Move::NoMove);
        assert_eq!(tape, before);
    }

    #[test]
    fn test_display_concatenates_cells() {
        let tape = Tape::new("ab");
        assert_eq!(tape.to_string(), "BabB");
    }
}
