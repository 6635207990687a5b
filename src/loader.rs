//! This module provides the `MachineLoader` struct, responsible for loading machine
//! descriptions from files and strings.

use crate::machine::TuringMachine;
use crate::parser::parse;
use crate::types::TuringMachineError;
use std::fs;
use std::path::Path;

/// `MachineLoader` is a utility struct for loading machine descriptions.
///
/// Files ending in `.json` are read as the JSON form of a machine; any other
/// file is read as a text description.
pub struct MachineLoader;

impl MachineLoader {
    /// Loads a machine from the specified file path.
    ///
    /// # Arguments
    ///
    /// * `path` - A reference to the `Path` of the description to load.
    ///
    /// # Returns
    ///
    /// * `Ok(TuringMachine)` if the file is successfully read and parsed.
    /// * `Err(TuringMachineError::FileError)` if the file cannot be read.
    /// * `Err(TuringMachineError::Syntax)` if a text description is malformed.
    /// * `Err(TuringMachineError::FormatError)` if a JSON description is malformed.
    pub fn load_machine(path: &Path) -> Result<TuringMachine, TuringMachineError> {
        let content = fs::read_to_string(path).map_err(|e| {
            TuringMachineError::FileError(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        if path.extension().is_some_and(|ext| ext == "json") {
            Self::load_machine_from_json(&content)
        } else {
            Self::load_machine_from_string(&content)
        }
    }

    /// Loads a machine from a text description.
    pub fn load_machine_from_string(content: &str) -> Result<TuringMachine, TuringMachineError> {
        parse(content)
    }

    /// Loads a machine from its JSON form. The machine is validated like a parsed one.
    pub fn load_machine_from_json(content: &str) -> Result<TuringMachine, TuringMachineError> {
        serde_json::from_str(content).map_err(|e| TuringMachineError::FormatError(e.to_string()))
    }
}
