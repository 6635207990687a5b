//! This module defines the core data structures and types shared by the parser, the
//! automaton model and the translator: reserved tokens of the description format,
//! head moves, transition keys and values, and the crate-wide error type.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

use crate::Rule;

/// The blank letter. It fills every tape cell that was never written.
pub const BLANK: &str = "_";
/// The state every machine starts in.
pub const INITIAL_STATE: &str = "(start)";
/// The state in which a machine accepts its input.
pub const ACCEPTING_STATE: &str = "(accept)";
/// The state in which a machine rejects its input.
pub const REJECTING_STATE: &str = "(reject)";

/// The symbol of a head move to the left.
pub const HEAD_LEFT: char = '<';
/// The symbol of a head move to the right.
pub const HEAD_RIGHT: char = '>';
/// The symbol of a head that keeps its position.
pub const HEAD_STAY: char = '-';

/// Keyword opening the first line of a description.
pub const NUM_TAPES_KEYWORD: &str = "num-tapes:";
/// Keyword opening the second line of a description.
pub const INPUT_ALPHABET_KEYWORD: &str = "input-alphabet:";

/// Returns `true` for the accepting and the rejecting state.
pub fn is_halting_state(state: &str) -> bool {
    state == ACCEPTING_STATE || state == REJECTING_STATE
}

/// Represents the possible directions a Turing Machine head can move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    /// Move the head one position to the left.
    Left,
    /// Move the head one position to the right.
    Right,
    /// Keep the head in the same position.
    Stay,
}

impl Direction {
    /// Returns the character used for this move in machine descriptions.
    pub fn symbol(self) -> char {
        match self {
            Direction::Left => HEAD_LEFT,
            Direction::Right => HEAD_RIGHT,
            Direction::Stay => HEAD_STAY,
        }
    }

    /// Parses a move character, returning `None` for anything but `<`, `>` and `-`.
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            HEAD_LEFT => Some(Direction::Left),
            HEAD_RIGHT => Some(Direction::Right),
            HEAD_STAY => Some(Direction::Stay),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// The left-hand side of a transition: the current state and the letter under each head.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TransitionKey {
    /// The state the machine is in.
    pub state: String,
    /// One letter per tape, read under the heads.
    pub read: Vec<String>,
}

impl TransitionKey {
    pub fn new<S: AsRef<str>>(state: &str, read: &[S]) -> Self {
        Self {
            state: state.to_string(),
            read: read.iter().map(|letter| letter.as_ref().to_string()).collect(),
        }
    }
}

/// The right-hand side of a transition.
///
/// A transition defines what the machine does once it is in a certain state
/// and reads specific letters from its tapes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    /// The next state the machine transitions to.
    pub next_state: String,
    /// A letter to be written on each tape.
    pub write: Vec<String>,
    /// A direction for each tape's head to move after writing.
    pub directions: Vec<Direction>,
}

/// A deterministic transition table. Keys are unique and iterate in a stable order.
pub type Transitions = BTreeMap<TransitionKey, Transition>;

/// Represents various errors that can occur while reading, validating or translating machines.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TuringMachineError {
    /// A malformed machine description, reported with its 1-based line number.
    #[error("Syntax error in line {line}: {message}")]
    Syntax { line: usize, message: String },
    /// The tokenizer grammar rejected the input.
    #[error("Description parsing error: {0}")]
    ParseError(#[from] Box<pest::error::Error<Rule>>),
    /// A machine violating the automaton model invariants.
    #[error("Invalid machine: {0}")]
    InvalidMachine(String),
    /// An input word that cannot be written on the first tape.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// The translator only accepts machines with a specific number of tapes.
    #[error("Only {expected}-tape machines can be translated, this one has {found} tape(s)")]
    UnsupportedTapeCount { expected: usize, found: usize },
    /// Indicates an error related to file system operations.
    #[error("File error: {0}")]
    FileError(String),
    /// A machine that could not be encoded to or decoded from JSON.
    #[error("Format error: {0}")]
    FormatError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_serialization() {
        let left = Direction::Left;
        let right = Direction::Right;

        let left_json = serde_json::to_string(&left).unwrap();
        let right_json = serde_json::to_string(&right).unwrap();

        assert_eq!(left_json, "\"Left\"");
        assert_eq!(right_json, "\"Right\"");

        let left_deserialized: Direction = serde_json::from_str(&left_json).unwrap();
        let right_deserialized: Direction = serde_json::from_str(&right_json).unwrap();

        assert_eq!(left, left_deserialized);
        assert_eq!(right, right_deserialized);
    }

    #[test]
    fn test_direction_symbols() {
        for direction in [Direction::Left, Direction::Right, Direction::Stay] {
            assert_eq!(Direction::from_symbol(direction.symbol()), Some(direction));
        }
        assert_eq!(Direction::from_symbol('L'), None);
        assert_eq!(Direction::Stay.to_string(), "-");
    }

    #[test]
    fn test_halting_states() {
        assert!(is_halting_state(ACCEPTING_STATE));
        assert!(is_halting_state(REJECTING_STATE));
        assert!(!is_halting_state(INITIAL_STATE));
        assert!(!is_halting_state("accept"));
    }

    #[test]
    fn test_transition_key_ordering() {
        let a = TransitionKey::new("(start)", &["a", "_"]);
        let b = TransitionKey::new("(start)", &["b", "_"]);

        assert!(a < b);
        assert_eq!(a, TransitionKey::new("(start)", &["a".to_string(), "_".to_string()]));
    }

    #[test]
    fn test_error_display() {
        let error = TuringMachineError::Syntax {
            line: 3,
            message: "Identifier expected".to_string(),
        };
        assert_eq!(error.to_string(), "Syntax error in line 3: Identifier expected");

        let error = TuringMachineError::UnsupportedTapeCount {
            expected: 2,
            found: 3,
        };
        assert!(error.to_string().contains("2-tape"));
        assert!(error.to_string().contains('3'));
    }
}
