//! This module provides the checks that every `TuringMachine` must pass when it is built,
//! no matter whether it comes from the parser, from JSON, from hand-written code or from
//! the translator. It also offers a non-fatal reachability lint used by the front end.

use crate::identifier::is_identifier;
use crate::machine::TuringMachine;
use crate::types::{is_halting_state, TuringMachineError, BLANK, INITIAL_STATE};
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Represents the invariant violations that can be found in a machine.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum AnalysisError {
    /// The machine declares no tapes.
    NoTapes,
    /// The input alphabet has no letters.
    EmptyInputAlphabet,
    /// The blank letter was listed in the input alphabet.
    BlankInInputAlphabet,
    /// The same letter was listed twice in the input alphabet.
    DuplicateInputLetter(String),
    /// A state or letter that does not follow the identifier grammar.
    InvalidIdentifier(String),
    /// A transition leaving the accepting or the rejecting state.
    HaltingSourceState(String),
    /// A transition whose letter or move lists do not match the number of tapes.
    TapeCountMismatch {
        state: String,
        expected: usize,
        found: usize,
    },
}

impl From<AnalysisError> for TuringMachineError {
    /// Converts an `AnalysisError` into a `TuringMachineError::InvalidMachine`.
    fn from(error: AnalysisError) -> Self {
        let message = match error {
            AnalysisError::NoTapes => "The number of tapes must be positive".to_string(),
            AnalysisError::EmptyInputAlphabet => "The input alphabet is empty".to_string(),
            AnalysisError::BlankInInputAlphabet => format!(
                "The blank letter \"{BLANK}\" is not allowed in the input alphabet"
            ),
            AnalysisError::DuplicateInputLetter(letter) => {
                format!("Letter \"{letter}\" repeated in the input alphabet")
            }
            AnalysisError::InvalidIdentifier(ident) => format!("Invalid identifier \"{ident}\""),
            AnalysisError::HaltingSourceState(state) => {
                format!("No transition can start in the \"{state}\" state")
            }
            AnalysisError::TapeCountMismatch {
                state,
                expected,
                found,
            } => format!(
                "Transition from state \"{state}\" lists {found} entries for {expected} tape(s)"
            ),
        };
        TuringMachineError::InvalidMachine(message)
    }
}

/// Checks a machine against every invariant of the automaton model.
///
/// The checks run in a fixed order and the first violation found is returned.
pub fn analyze(machine: &TuringMachine) -> Result<(), TuringMachineError> {
    let checks: [fn(&TuringMachine) -> Result<(), AnalysisError>; 3] =
        [check_tapes, check_input_alphabet, check_transitions];

    match checks.iter().find_map(|check| check(machine).err()) {
        Some(error) => Err(error.into()),
        None => Ok(()),
    }
}

fn check_tapes(machine: &TuringMachine) -> Result<(), AnalysisError> {
    if machine.num_tapes() == 0 {
        return Err(AnalysisError::NoTapes);
    }
    Ok(())
}

/// Checks that the input alphabet is non-empty, blank-free and duplicate-free,
/// and that it only holds valid identifiers.
fn check_input_alphabet(machine: &TuringMachine) -> Result<(), AnalysisError> {
    let alphabet = machine.input_alphabet();
    if alphabet.is_empty() {
        return Err(AnalysisError::EmptyInputAlphabet);
    }

    let mut seen = HashSet::new();
    for letter in alphabet {
        check_identifier(letter)?;
        if letter == BLANK {
            return Err(AnalysisError::BlankInInputAlphabet);
        }
        if !seen.insert(letter.as_str()) {
            return Err(AnalysisError::DuplicateInputLetter(letter.clone()));
        }
    }

    Ok(())
}

/// Checks every transition for valid identifiers, consistent tape counts and a
/// non-halting source state.
fn check_transitions(machine: &TuringMachine) -> Result<(), AnalysisError> {
    let expected = machine.num_tapes();

    for (key, transition) in machine.transitions() {
        check_identifier(&key.state)?;
        if is_halting_state(&key.state) {
            return Err(AnalysisError::HaltingSourceState(key.state.clone()));
        }
        check_identifier(&transition.next_state)?;

        for found in [
            key.read.len(),
            transition.write.len(),
            transition.directions.len(),
        ] {
            if found != expected {
                return Err(AnalysisError::TapeCountMismatch {
                    state: key.state.clone(),
                    expected,
                    found,
                });
            }
        }

        for letter in key.read.iter().chain(&transition.write) {
            check_identifier(letter)?;
        }
    }

    Ok(())
}

fn check_identifier(ident: &str) -> Result<(), AnalysisError> {
    if is_identifier(ident) {
        Ok(())
    } else {
        Err(AnalysisError::InvalidIdentifier(ident.to_string()))
    }
}

/// Returns the non-halting states that cannot be reached from the initial state,
/// in sorted order.
///
/// A state is reachable when some chain of transitions leads to it from
/// `(start)`, whatever letters those transitions read.
pub fn unreachable_states(machine: &TuringMachine) -> Vec<String> {
    let mut successors: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for (key, transition) in machine.transitions() {
        successors
            .entry(key.state.as_str())
            .or_default()
            .insert(transition.next_state.as_str());
    }

    let mut visited = HashSet::new();
    let mut queue = vec![INITIAL_STATE];

    while let Some(state) = queue.pop() {
        if !visited.insert(state) {
            continue;
        }

        if let Some(next_states) = successors.get(state) {
            queue.extend(next_states.iter().copied().filter(|next| !visited.contains(next)));
        }
    }

    machine
        .set_of_states()
        .into_iter()
        .filter(|state| !is_halting_state(state) && !visited.contains(state.as_str()))
        .collect()
}
