//! Parser for MTU program text, built on the `pest` crate. The grammar lives
//! in `grammar.pest`; this module turns the parse tree into a [`Program`].
//!
//! Whitespace and newlines are insignificant everywhere in the format, so the
//! entire input is stripped of whitespace before parsing.

use crate::{
    analyzer::analyze,
    types::{
        Instruction, Move, ParseError, Program, ResultField, INSTRUCTION_FIELDS, SAME_TOKEN,
    },
};
use pest::{iterators::Pair, Parser as PestParser};
use pest_derive::Parser as PestParser;
use std::collections::HashSet;

/// Derives a `PestParser` for the MTU grammar defined in `grammar.pest`.
#[derive(PestParser)]
#[grammar = "grammar.pest"]
pub struct MtuParser;

/// A top-level instruction field as produced by the tokenizer: a bare label
/// or a bracketed label sequence.
enum Field {
    Label(String),
    List(Vec<String>),
}

/// Parses MTU program text into a [`Program`].
///
/// This is the main entry point for loading programs. The input is stripped
/// of all whitespace, parsed into clauses, converted into instructions, and
/// finally validated by the analyzer.
///
/// # Errors
///
/// * [`ParseError::Syntax`] for malformed clauses or unbalanced brackets.
/// * [`ParseError::FieldCount`] when an instruction clause does not produce
///   exactly five top-level fields.
/// * [`ParseError::UnknownMove`] / [`ParseError::ExpectedLabel`] for invalid
///   individual fields.
/// * [`ParseError::Validation`] when the parsed program violates the arity
///   invariant or has an empty guard-symbol list.
pub fn parse(input: &str) -> Result<Program, ParseError> {
    let stripped: String = input.chars().filter(|c| !c.is_whitespace()).collect();

    let root = MtuParser::parse(Rule::program, &stripped)
        .map_err(|e| ParseError::Syntax(Box::new(e)))?
        .next()
        .unwrap();

    let program = parse_program(root)?;

    analyze(&program)?;

    Ok(program)
}

/// Walks the clause list of a `Rule::program` pair.
fn parse_program(pair: Pair<Rule>) -> Result<Program, ParseError> {
    let mut accepting = HashSet::new();
    let mut instructions = Vec::new();

    for p in pair.into_inner() {
        match p.as_rule() {
            Rule::accepting => accepting = parse_accepting(p),
            Rule::instruction => instructions.push(parse_instruction(p)?),
            _ => {} // EOI
        }
    }

    Ok(Program {
        accepting,
        instructions,
    })
}

/// Collects the accepting-state labels from clause 0.
fn parse_accepting(pair: Pair<Rule>) -> HashSet<String> {
    pair.into_inner()
        .filter(|p| p.as_rule() == Rule::label)
        .map(|p| p.as_str().to_string())
        .collect()
}

/// Converts one instruction clause into an [`Instruction`].
///
/// The five fields arrive in fixed order: guard state, result states, guard
/// symbols, result symbols, move operator.
fn parse_instruction(pair: Pair<Rule>) -> Result<Instruction, ParseError> {
    let mut repeat = false;
    let mut fields = Vec::new();

    for p in pair.into_inner() {
        match p.as_rule() {
            Rule::repeat_marker => repeat = true,
            Rule::field => fields.push(parse_field(p)),
            _ => {}
        }
    }

    if fields.len() != INSTRUCTION_FIELDS {
        return Err(ParseError::FieldCount {
            expected: INSTRUCTION_FIELDS,
            found: fields.len(),
        });
    }

    let mut fields = fields.into_iter();

    let guard_state = match fields.next().unwrap() {
        Field::Label(label) => label,
        Field::List(_) => return Err(ParseError::ExpectedLabel("guard state")),
    };

    let result_states = parse_result_field(fields.next().unwrap());

    // The guard is always a sequence; a bare label is wrapped.
    let guard_symbols = match fields.next().unwrap() {
        Field::Label(label) => vec![label],
        Field::List(labels) => labels,
    };

    let result_symbols = parse_result_field(fields.next().unwrap());

    let movement = match fields.next().unwrap() {
        Field::Label(label) => {
            Move::from_symbol(&label).ok_or(ParseError::UnknownMove(label.clone()))?
        }
        Field::List(_) => return Err(ParseError::ExpectedLabel("move operator")),
    };

    Ok(Instruction {
        guard_state,
        guard_symbols,
        result_states,
        result_symbols,
        movement,
        repeat,
    })
}

/// Extracts a top-level field: a bare label or a flattened bracketed list.
fn parse_field(pair: Pair<Rule>) -> Field {
    let inner = pair.into_inner().next().unwrap();
    if inner.as_rule() == Rule::list {
        Field::List(flatten_list(inner))
    } else {
        Field::Label(inner.as_str().to_string())
    }
}

/// Flattens a (possibly nested) bracketed list into its label sequence.
fn flatten_list(pair: Pair<Rule>) -> Vec<String> {
    let mut labels = Vec::new();
    collect_labels(pair, &mut labels);
    labels
}

fn collect_labels(pair: Pair<Rule>, out: &mut Vec<String>) {
    if pair.as_rule() == Rule::label {
        out.push(pair.as_str().to_string());
    } else {
        for p in pair.into_inner() {
            collect_labels(p, out);
        }
    }
}

/// Interprets the `SAME` sentinel for result fields, both for the whole field
/// and element-wise inside a list.
fn parse_result_field(field: Field) -> ResultField {
    match field {
        Field::Label(label) if label == SAME_TOKEN => ResultField::Unchanged,
        Field::Label(label) => ResultField::Values(vec![Some(label)]),
        Field::List(labels) => ResultField::Values(
            labels
                .into_iter()
                .map(|label| if label == SAME_TOKEN { None } else { Some(label) })
                .collect(),
        ),
    }
}
