//! This module defines the `TuringMachine` struct, the immutable automaton model shared by
//! the parser, the serializer and the translator. It holds the number of tapes, the input
//! alphabet and the transition table, and derives the working alphabet and the state set.

use crate::analyzer::analyze;
use crate::types::{
    Direction, Transition, TransitionKey, Transitions, TuringMachineError, ACCEPTING_STATE,
    BLANK, INITIAL_STATE, REJECTING_STATE,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Represents a deterministic multi-tape Turing Machine description.
///
/// A machine is validated once when it is built and never changes afterwards.
/// Use [`TuringMachine::new`] to build one by hand, [`crate::parse`] to read one
/// from text, or [`crate::translate`] to derive one from another machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "MachineDescription", into = "MachineDescription")]
pub struct TuringMachine {
    num_tapes: usize,
    input_alphabet: Vec<String>,
    transitions: Transitions,
}

impl TuringMachine {
    /// Creates a new `TuringMachine`, checking every invariant of the model.
    ///
    /// # Arguments
    ///
    /// * `num_tapes` - The number of tapes, at least one.
    /// * `input_alphabet` - The letters an input word may use, without the blank.
    /// * `transitions` - The transition table.
    ///
    /// # Returns
    ///
    /// * `Ok(TuringMachine)` if the description is well formed.
    /// * `Err(TuringMachineError::InvalidMachine)` describing the first violated invariant.
    pub fn new(
        num_tapes: usize,
        input_alphabet: Vec<String>,
        transitions: Transitions,
    ) -> Result<Self, TuringMachineError> {
        let machine = Self {
            num_tapes,
            input_alphabet,
            transitions,
        };
        analyze(&machine)?;
        Ok(machine)
    }

    /// Returns the number of tapes.
    pub fn num_tapes(&self) -> usize {
        self.num_tapes
    }

    /// Returns the input alphabet in declaration order.
    pub fn input_alphabet(&self) -> &[String] {
        &self.input_alphabet
    }

    /// Returns the transition table.
    pub fn transitions(&self) -> &Transitions {
        &self.transitions
    }

    /// Finds the transition taken in `state` when `read` lies under the heads.
    pub fn transition<S: AsRef<str>>(&self, state: &str, read: &[S]) -> Option<&Transition> {
        self.transitions.get(&TransitionKey::new(state, read))
    }

    /// Returns every letter the machine can meet on its tapes, sorted.
    ///
    /// This is the input alphabet, the blank, and every letter read or written
    /// by some transition.
    pub fn working_alphabet(&self) -> Vec<String> {
        let mut letters: BTreeSet<&str> = self.input_alphabet.iter().map(String::as_str).collect();
        letters.insert(BLANK);
        for (key, transition) in &self.transitions {
            letters.extend(key.read.iter().map(String::as_str));
            letters.extend(transition.write.iter().map(String::as_str));
        }
        letters.into_iter().map(str::to_string).collect()
    }

    /// Returns every state of the machine, sorted.
    ///
    /// The initial, accepting and rejecting states are always included, together
    /// with every state that appears on either side of a transition.
    pub fn set_of_states(&self) -> Vec<String> {
        let mut states: BTreeSet<&str> =
            BTreeSet::from([INITIAL_STATE, ACCEPTING_STATE, REJECTING_STATE]);
        for (key, transition) in &self.transitions {
            states.insert(&key.state);
            states.insert(&transition.next_state);
        }
        states.into_iter().map(str::to_string).collect()
    }

    /// Splits a whitespace-separated input word into letters of the input alphabet.
    ///
    /// An empty word is valid and yields no letters.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<String>)` with the letters in order.
    /// * `Err(TuringMachineError::InvalidInput)` naming the first letter outside the input alphabet.
    pub fn parse_input(&self, word: &str) -> Result<Vec<String>, TuringMachineError> {
        word.split_whitespace()
            .map(|letter| {
                if self.input_alphabet.iter().any(|known| known == letter) {
                    Ok(letter.to_string())
                } else {
                    Err(TuringMachineError::InvalidInput(format!(
                        "\"{letter}\" is not in the input alphabet"
                    )))
                }
            })
            .collect()
    }
}

/// A single row of the transition table in the JSON form of a machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRule {
    pub state: String,
    pub read: Vec<String>,
    pub next_state: String,
    pub write: Vec<String>,
    pub directions: Vec<Direction>,
}

/// The serde representation of a machine: JSON objects cannot be keyed by
/// compound transition keys, so the table is stored as a list of rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MachineDescription {
    pub num_tapes: usize,
    pub input_alphabet: Vec<String>,
    pub transitions: Vec<TransitionRule>,
}

impl From<TuringMachine> for MachineDescription {
    fn from(machine: TuringMachine) -> Self {
        let transitions = machine
            .transitions
            .into_iter()
            .map(|(key, transition)| TransitionRule {
                state: key.state,
                read: key.read,
                next_state: transition.next_state,
                write: transition.write,
                directions: transition.directions,
            })
            .collect();

        Self {
            num_tapes: machine.num_tapes,
            input_alphabet: machine.input_alphabet,
            transitions,
        }
    }
}

impl TryFrom<MachineDescription> for TuringMachine {
    type Error = TuringMachineError;

    fn try_from(description: MachineDescription) -> Result<Self, Self::Error> {
        let mut transitions = Transitions::new();
        for rule in description.transitions {
            let key = TransitionKey {
                state: rule.state,
                read: rule.read,
            };
            if transitions.contains_key(&key) {
                return Err(TuringMachineError::InvalidMachine(format!(
                    "The machine is not deterministic: state \"{}\" reading {:?} is defined twice",
                    key.state, key.read
                )));
            }
            transitions.insert(
                key,
                Transition {
                    next_state: rule.next_state,
                    write: rule.write,
                    directions: rule.directions,
                },
            );
        }

        TuringMachine::new(
            description.num_tapes,
            description.input_alphabet,
            transitions,
        )
    }
}
