//! The `Machine` struct: owns the loaded program, the tape and the current
//! state, and advances the machine one instruction application per external
//! `step()` call.
//!
//! The machine is single-threaded and non-suspending; `step()` runs to
//! completion and never blocks. After a runtime error it refuses further
//! steps until an explicit [`Machine::reset`].

use crate::parser::parse;
use crate::tape::Tape;
use crate::types::{
    Instruction, ParseError, Program, RuntimeError, Step, INITIAL_STATE,
};

/// A single-tape MTU machine.
pub struct Machine {
    program: Option<Program>,
    tape: Tape,
    state: String,
    input: String,
    step_count: usize,
    last_instruction: Option<Instruction>,
    error: Option<RuntimeError>,
}

impl Machine {
    /// Creates a machine with no program loaded and an empty input tape.
    pub fn new() -> Self {
        Self {
            program: None,
            tape: Tape::new(""),
            state: INITIAL_STATE.to_string(),
            input: String::new(),
            step_count: 0,
            last_instruction: None,
            error: None,
        }
    }

    /// Parses `text` and installs the resulting program.
    ///
    /// The replacement is atomic: on a parse failure the previously loaded
    /// program and the machine state are left untouched. The caller is
    /// expected to [`reset`](Self::reset) after a successful load.
    pub fn load(&mut self, text: &str) -> Result<(), ParseError> {
        let program = parse(text)?;
        self.load_program(program);
        Ok(())
    }

    /// Installs an already-parsed program, clearing any recorded error.
    pub fn load_program(&mut self, program: Program) {
        self.program = Some(program);
        self.last_instruction = None;
        self.error = None;
    }

    /// Stores the raw input string used to build the tape on the next reset.
    pub fn set_input(&mut self, input: &str) {
        self.input = input.to_string();
    }

    /// Rebuilds the tape from the stored input and returns the machine to the
    /// initial state. Idempotent: two consecutive resets are equivalent to
    /// one.
    pub fn reset(&mut self) {
        self.tape = Tape::new(&self.input);
        self.state = INITIAL_STATE.to_string();
        self.step_count = 0;
        self.last_instruction = None;
        self.error = None;
    }

    /// Advances the machine by at most one instruction application.
    ///
    /// Returns [`Step::Accepted`] without executing anything when the machine
    /// is already in an accepting state, [`Step::NoMatch`] when no
    /// instruction fires for the current state and symbol (a defined halting
    /// outcome), and otherwise applies the first matching instruction in
    /// declaration order. Repeat instructions are applied at most once per
    /// call; looping is the caller's responsibility.
    pub fn step(&mut self) -> Step {
        if let Some(error) = &self.error {
            return Step::Error(error.clone());
        }

        let Some(program) = &self.program else {
            return Step::Error(RuntimeError::NoProgram);
        };

        if program.is_accepting(&self.state) {
            return Step::Accepted(None);
        }

        if !self.tape.in_bounds() {
            return self.fail(RuntimeError::PointerOutOfBounds {
                pointer: self.tape.pointer(),
                len: self.tape.len(),
            });
        }

        let Some(instruction) = self.matched().cloned() else {
            return Step::NoMatch;
        };

        if instruction.repeat && !instruction.matches(&self.state, self.tape.read()) {
            // Unreachable: the scan above just confirmed this guard. Kept to
            // preserve the documented contract for repeat instructions.
            self.last_instruction = Some(instruction.clone());
            return Step::SteppedWhileSkip(instruction);
        }

        if let Err(error) = self.apply(&instruction) {
            return self.fail(error);
        }

        self.last_instruction = Some(instruction.clone());
        self.step_count += 1;

        let accepted = self
            .program
            .as_ref()
            .is_some_and(|p| p.is_accepting(&self.state));
        if accepted {
            Step::Accepted(Some(instruction))
        } else {
            Step::Stepped(instruction)
        }
    }

    /// First instruction matching the current state and read symbol, in
    /// declaration order. Later matches are unreachable by design.
    fn matched(&self) -> Option<&Instruction> {
        let program = self.program.as_ref()?;
        let symbol = self.tape.read();
        program
            .instructions
            .iter()
            .find(|i| i.matches(&self.state, symbol))
    }

    /// Applies one instruction: case dispatch selected purely from the result
    /// arities, then the head movement.
    ///
    /// All arity and guard-membership checks happen before any mutation, so a
    /// failing apply leaves the machine untouched.
    fn apply(&mut self, instruction: &Instruction) -> Result<(), RuntimeError> {
        let n = instruction.guard_symbols.len();
        let q = instruction.result_states.arity();
        let z = instruction.result_symbols.arity();

        if q <= 1 && z <= 1 {
            if let Some(symbol) = instruction.result_symbols.single() {
                self.tape.write(symbol);
            }
            if let Some(state) = instruction.result_states.single() {
                self.state = state.to_string();
            }
        } else if q <= 1 && z > 1 && z == n {
            let index = self.read_index(instruction)?;
            if let Some(symbol) = instruction.result_symbols.select(index) {
                self.tape.write(symbol);
            }
            if let Some(state) = instruction.result_states.single() {
                self.state = state.to_string();
            }
        } else if q > 1 && z <= 1 && q == n {
            let index = self.read_index(instruction)?;
            if let Some(state) = instruction.result_states.select(index) {
                self.state = state.to_string();
            }
            if let Some(symbol) = instruction.result_symbols.single() {
                self.tape.write(symbol);
            }
        } else if q > 1 && z > 1 && q == n && z == n {
            let index = self.read_index(instruction)?;
            if let Some(state) = instruction.result_states.select(index) {
                self.state = state.to_string();
            }
            if let Some(symbol) = instruction.result_symbols.select(index) {
                self.tape.write(symbol);
            }
        } else {
            return Err(RuntimeError::MalformedInstruction {
                states: q,
                symbols: z,
                guards: n,
            });
        }

        self.tape.apply(instruction.movement);

        Ok(())
    }

    /// Index of the read symbol within the instruction's guard symbols.
    fn read_index(&self, instruction: &Instruction) -> Result<usize, RuntimeError> {
        let symbol = self.tape.read();
        instruction
            .symbol_index(symbol)
            .ok_or_else(|| RuntimeError::SymbolNotInGuard {
                symbol: symbol.to_string(),
                guards: instruction.guard_symbols.clone(),
            })
    }

    /// Records a runtime error; the machine refuses further steps until reset.
    fn fail(&mut self, error: RuntimeError) -> Step {
        self.error = Some(error.clone());
        Step::Error(error)
    }

    /// The current state label.
    pub fn state(&self) -> &str {
        &self.state
    }

    /// The loaded program, if any.
    pub fn program(&self) -> Option<&Program> {
        self.program.as_ref()
    }

    /// The accepting-state labels of the loaded program.
    pub fn accepting_states(&self) -> Option<&std::collections::HashSet<String>> {
        self.program.as_ref().map(|p| &p.accepting)
    }

    /// The tape, including its pointer.
    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    /// Number of successful instruction applications since the last reset.
    pub fn step_count(&self) -> usize {
        self.step_count
    }

    /// The instruction applied by the most recent step, for display.
    pub fn last_instruction(&self) -> Option<&Instruction> {
        self.last_instruction.as_ref()
    }

    /// The recorded runtime error, if the machine is in the error state.
    pub fn last_error(&self) -> Option<&RuntimeError> {
        self.error.as_ref()
    }
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}
