//! The symbols a one-tape simulation writes besides the letters of the simulated machine.
//!
//! Both simulated tapes share one physical tape laid out as
//! `tape 1, separator, tape 2, tape end`, with the cell under each simulated head
//! holding a marked letter. All of these symbols are built to be deeper than any
//! letter of the simulated machine, so they can never be confused with one.

use crate::identifier::{is_identifier, nesting_depth, wrap};
use crate::machine::TuringMachine;
use crate::types::BLANK;

const SEPARATOR_TAG: &str = "separator";
const TAPE_END_TAG: &str = "tape-end";

/// The fresh symbols used to encode two tapes on one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TapeEncoding {
    depth: usize,
    separator: String,
    tape_end: String,
}

impl TapeEncoding {
    /// Builds the encoding for letters drawn from `alphabet`. The blank is always included.
    pub fn new<S: AsRef<str>>(alphabet: &[S]) -> Self {
        let depth = alphabet
            .iter()
            .map(|letter| nesting_depth(letter.as_ref()))
            .chain([nesting_depth(BLANK)])
            .max()
            .unwrap_or_default();

        Self {
            depth,
            separator: sentinel(SEPARATOR_TAG, depth),
            tape_end: sentinel(TAPE_END_TAG, depth),
        }
    }

    /// Builds the encoding for the working alphabet of `machine`.
    pub fn for_machine(machine: &TuringMachine) -> Self {
        Self::new(&machine.working_alphabet())
    }

    /// The greatest nesting depth of a letter of the simulated machine.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The symbol between the encodings of tape 1 and tape 2.
    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// The symbol right after the last cell of tape 2.
    pub fn tape_end(&self) -> &str {
        &self.tape_end
    }

    /// Returns the form of `letter` written under a simulated head.
    pub fn marked(&self, letter: &str) -> String {
        wrap(letter, self.depth + 1)
    }

    /// Recovers the letter from its marked form, or `None` if `symbol` is not a
    /// marked letter of this encoding.
    pub fn unmark<'a>(&self, symbol: &'a str) -> Option<&'a str> {
        let parens = self.depth + 1;
        let bytes = symbol.as_bytes();
        if bytes.len() < 2 * parens
            || !bytes[..parens].iter().all(|&c| c == b'(')
            || !bytes[bytes.len() - parens..].iter().all(|&c| c == b')')
        {
            return None;
        }

        let letter = &symbol[parens..symbol.len() - parens];
        (is_identifier(letter) && nesting_depth(letter) <= self.depth).then_some(letter)
    }
}

/// `(tag` + `tag` wrapped past the letter depth + `)`. Its content is two identifiers,
/// so it never has the shape of a marked letter.
fn sentinel(tag: &str, depth: usize) -> String {
    format!("({tag}{})", wrap(tag, depth + 1))
}
