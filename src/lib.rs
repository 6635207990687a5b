//! This crate translates deterministic two-tape Turing machines into equivalent
//! one-tape machines. It includes modules for parsing and serializing machine
//! descriptions, validating the automaton model, and generating the one-tape
//! transition table.

pub mod analyzer;
pub mod encoding;
pub mod identifier;
pub mod loader;
pub mod machine;
pub mod parser;
pub mod serializer;
pub mod translator;
pub mod types;

/// Re-exports the `Rule` enum from the parser module, used by the `pest` grammar.
pub use crate::parser::Rule;
/// Re-exports the model checks and the reachability lint from the analyzer module.
pub use analyzer::{analyze, unreachable_states, AnalysisError};
/// Re-exports the `TapeEncoding` struct from the encoding module.
pub use encoding::TapeEncoding;
/// Re-exports the `MachineLoader` struct from the loader module.
pub use loader::MachineLoader;
/// Re-exports the `TuringMachine` struct from the machine module.
pub use machine::TuringMachine;
/// Re-exports the `parse` function from the parser module.
pub use parser::parse;
/// Re-exports the text and JSON renderers from the serializer module.
pub use serializer::{render, serialize, Format};
/// Re-exports the `translate` function from the translator module.
pub use translator::translate;
/// Re-exports the machine model types and the crate error from the types module.
pub use types::{
    Direction, Transition, TransitionKey, Transitions, TuringMachineError, ACCEPTING_STATE,
    BLANK, INITIAL_STATE, REJECTING_STATE,
};
