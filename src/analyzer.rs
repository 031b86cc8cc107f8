//! Static checks over parsed programs: hard invariants enforced at load time,
//! plus non-fatal diagnostics for suspicious but legal constructs.

use crate::types::{Instruction, ParseError, Program, ResultField, INITIAL_STATE};
use std::collections::HashSet;

/// A hard invariant violation found while analyzing a program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    /// A result list longer than one label whose length does not match the
    /// guard-symbol count, making indexed dispatch impossible.
    ArityMismatch {
        index: usize,
        field: &'static str,
        arity: usize,
        guards: usize,
    },
    /// An instruction guarding on an empty symbol list can never fire.
    EmptyGuardSymbols { index: usize },
}

impl From<AnalysisError> for ParseError {
    fn from(error: AnalysisError) -> Self {
        match error {
            AnalysisError::ArityMismatch {
                index,
                field,
                arity,
                guards,
            } => ParseError::Validation(format!(
                "instruction {index}: {field} lists {arity} labels but the guard has {guards} symbols"
            )),
            AnalysisError::EmptyGuardSymbols { index } => ParseError::Validation(format!(
                "instruction {index}: guard symbols must not be empty"
            )),
        }
    }
}

/// A non-fatal diagnostic. Shadowed instructions are legal (first match wins)
/// but dead; unreachable accepting states usually indicate a typo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// Every symbol this instruction guards on is already covered by earlier
    /// instructions with the same guard state.
    Shadowed { index: usize },
    /// An accepting state that no instruction's result states can produce.
    UnreachableAccepting(String),
}

/// Validates the hard invariants of a parsed program.
///
/// Called by the parser on every successful parse; also usable directly on
/// programs built in code.
pub fn analyze(program: &Program) -> Result<(), ParseError> {
    for (index, instruction) in program.instructions.iter().enumerate() {
        check_guard_symbols(index, instruction)?;
        check_arity(index, "result states", &instruction.result_states, instruction)?;
        check_arity(index, "result symbols", &instruction.result_symbols, instruction)?;
    }
    Ok(())
}

fn check_guard_symbols(index: usize, instruction: &Instruction) -> Result<(), AnalysisError> {
    if instruction.guard_symbols.is_empty() {
        return Err(AnalysisError::EmptyGuardSymbols { index });
    }
    Ok(())
}

fn check_arity(
    index: usize,
    field: &'static str,
    value: &ResultField,
    instruction: &Instruction,
) -> Result<(), AnalysisError> {
    let arity = value.arity();
    let guards = instruction.guard_symbols.len();
    if arity > 1 && arity != guards {
        return Err(AnalysisError::ArityMismatch {
            index,
            field,
            arity,
            guards,
        });
    }
    Ok(())
}

/// Collects non-fatal diagnostics for a program.
pub fn warnings(program: &Program) -> Vec<Warning> {
    let mut warnings = Vec::new();
    find_shadowed(program, &mut warnings);
    find_unreachable_accepting(program, &mut warnings);
    warnings
}

/// Flags instructions whose every guard symbol is covered by earlier
/// instructions with the same guard state.
fn find_shadowed(program: &Program, out: &mut Vec<Warning>) {
    for (index, instruction) in program.instructions.iter().enumerate() {
        let covered: HashSet<&str> = program.instructions[..index]
            .iter()
            .filter(|earlier| earlier.guard_state == instruction.guard_state)
            .flat_map(|earlier| earlier.guard_symbols.iter().map(String::as_str))
            .collect();

        let shadowed = instruction
            .guard_symbols
            .iter()
            .all(|symbol| covered.contains(symbol.as_str()));
        if shadowed && !instruction.guard_symbols.is_empty() {
            out.push(Warning::Shadowed { index });
        }
    }
}

/// Flags accepting states that no instruction can transition into. The
/// initial state is always reachable.
fn find_unreachable_accepting(program: &Program, out: &mut Vec<Warning>) {
    let mut producible: HashSet<&str> = HashSet::from([INITIAL_STATE]);
    for instruction in &program.instructions {
        if let ResultField::Values(values) = &instruction.result_states {
            producible.extend(values.iter().flatten().map(String::as_str));
        }
    }

    let mut unreachable: Vec<&String> = program
        .accepting
        .iter()
        .filter(|state| !producible.contains(state.as_str()))
        .collect();
    unreachable.sort();

    for state in unreachable {
        out.push(Warning::UnreachableAccepting(state.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use crate::types::Move;

    fn instruction(state: &str, symbols: &[&str], states: ResultField) -> Instruction {
        Instruction {
            guard_state: state.into(),
            guard_symbols: symbols.iter().map(|s| s.to_string()).collect(),
            result_states: states,
            result_symbols: ResultField::Unchanged,
            movement: Move::Right,
            repeat: false,
        }
    }

    #[test]
    fn test_analyze_accepts_consistent_arities() {
        let program = parse("{99}.(00,{01,02},{a,b},{x,y},>).(00,03,c,SAME,<)").unwrap();
        assert!(analyze(&program).is_ok());
    }

    #[test]
    fn test_analyze_rejects_state_arity_mismatch() {
        let program = Program {
            accepting: HashSet::new(),
            instructions: vec![instruction(
                "00",
                &["a", "b"],
                ResultField::Values(vec![Some("1".into()), Some("2".into()), Some("3".into())]),
            )],
        };

        let error = analyze(&program).unwrap_err();
        let ParseError::Validation(message) = error else {
            panic!("expected validation error");
        };
        assert!(message.contains("result states"));
        assert!(message.contains("3 labels"));
    }

    #[test]
    fn test_analyze_rejects_empty_guard() {
        let program = Program {
            accepting: HashSet::new(),
            instructions: vec![instruction("00", &[], ResultField::Unchanged)],
        };
        assert!(analyze(&program).is_err());
    }

    #[test]
    fn test_shadowed_instruction_is_a_warning_not_an_error() {
        // Identical guards: legal, first match wins, second is dead.
        let program = parse("{01}.(00,01,a,x,>).(00,02,a,y,>)").unwrap();

        assert!(analyze(&program).is_ok());
        assert_eq!(warnings(&program), vec![Warning::Shadowed { index: 1 }]);
    }

    #[test]
    fn test_partial_overlap_is_not_shadowed() {
        let program = parse("{01}.(00,01,a,x,>).(00,02,{a,b},y,>)").unwrap();
        assert!(warnings(&program).is_empty());
    }

    #[test]
    fn test_shadowing_across_states_is_independent() {
        let program = parse("{02}.(00,01,a,x,>).(01,02,a,y,>)").unwrap();
        assert!(warnings(&program).is_empty());
    }

    #[test]
    fn test_unreachable_accepting_state() {
        let program = parse("{98,99}.(00,99,B,SAME,!)").unwrap();
        assert_eq!(
            warnings(&program),
            vec![Warning::UnreachableAccepting("98".into())]
        );
    }

    #[test]
    fn test_initial_state_counts_as_reachable() {
        let program = parse("{00}.(01,02,a,SAME,>)").unwrap();
        assert!(warnings(&program).is_empty());
    }
}
