//! This module renders a `TuringMachine` back into text, either in the description
//! format read by [`crate::parse`] or as a JSON document.

use crate::machine::TuringMachine;
use crate::types::{TuringMachineError, INPUT_ALPHABET_KEYWORD, NUM_TAPES_KEYWORD};
use std::fmt;

/// The output formats a machine can be rendered in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Format {
    /// The line-oriented description format.
    #[default]
    Text,
    /// A pretty-printed JSON document.
    Json,
}

impl fmt::Display for TuringMachine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{NUM_TAPES_KEYWORD} {}", self.num_tapes())?;

        write!(f, "{INPUT_ALPHABET_KEYWORD}")?;
        for letter in self.input_alphabet() {
            write!(f, " {letter}")?;
        }
        writeln!(f)?;

        for (key, transition) in self.transitions() {
            write!(f, "{}", key.state)?;
            for letter in &key.read {
                write!(f, " {letter}")?;
            }
            write!(f, " {}", transition.next_state)?;
            for letter in &transition.write {
                write!(f, " {letter}")?;
            }
            for direction in &transition.directions {
                write!(f, " {direction}")?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

/// Serializes a machine into the description format, one transition per line
/// in key order.
pub fn serialize(machine: &TuringMachine) -> String {
    machine.to_string()
}

/// Renders a machine in the requested format.
///
/// # Returns
///
/// * `Ok(String)` holding the rendered machine.
/// * `Err(TuringMachineError::FormatError)` if JSON encoding fails.
pub fn render(machine: &TuringMachine, format: Format) -> Result<String, TuringMachineError> {
    match format {
        Format::Text => Ok(serialize(machine)),
        Format::Json => serde_json::to_string_pretty(machine)
            .map(|mut json| {
                json.push('\n');
                json
            })
            .map_err(|e| TuringMachineError::FormatError(e.to_string())),
    }
}
