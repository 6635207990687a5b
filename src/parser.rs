//! This module provides the parser for machine descriptions, utilizing the `pest` crate.
//! The grammar in `grammar.pest` splits the input into lines of tokens; the functions
//! below give those tokens their meaning and build a validated `TuringMachine`.
//!
//! A description looks like this:
//!
//! ```text
//! num-tapes: 2
//! input-alphabet: a b
//! (start) a _ (start) a a > >   # state, letters read, next state, letters written, moves
//! ```

use crate::{
    identifier::is_identifier,
    machine::TuringMachine,
    types::{
        is_halting_state, Direction, Transition, TransitionKey, Transitions, TuringMachineError,
        BLANK, HEAD_LEFT, HEAD_RIGHT, HEAD_STAY, INPUT_ALPHABET_KEYWORD, NUM_TAPES_KEYWORD,
    },
};
use pest::Parser as PestParser;
use pest_derive::Parser as PestParser;
use std::collections::HashSet;
use std::iter::Peekable;
use tracing::debug;

/// Derives a `PestParser` for the description grammar defined in `grammar.pest`.
#[derive(PestParser)]
#[grammar = "grammar.pest"]
pub struct DescriptionParser;

/// Parses the given description into a `TuringMachine`.
///
/// This is the main entry point for reading machine descriptions. The whole
/// input must be well formed: the first error aborts the parse and no partial
/// machine is returned.
///
/// # Arguments
///
/// * `input` - A string slice containing the machine description.
///
/// # Returns
///
/// * `Ok(TuringMachine)` if the input is successfully parsed and validated.
/// * `Err(TuringMachineError::Syntax)` naming the offending line otherwise.
pub fn parse(input: &str) -> Result<TuringMachine, TuringMachineError> {
    let mut lines = read_lines(input)?;

    let mut header = lines.next_line(NUM_TAPES_KEYWORD)?;
    header.keyword(NUM_TAPES_KEYWORD)?;
    let num_tapes = header.positive_integer()?;
    header.finish()?;

    let mut alphabet_line = lines.next_line(INPUT_ALPHABET_KEYWORD)?;
    alphabet_line.keyword(INPUT_ALPHABET_KEYWORD)?;
    let input_alphabet = parse_input_alphabet(alphabet_line)?;

    let mut transitions = Transitions::new();
    for line in lines.remaining {
        parse_transition(line, num_tapes, &mut transitions)?;
    }

    debug!(
        num_tapes,
        letters = input_alphabet.len(),
        transitions = transitions.len(),
        "parsed machine description"
    );

    TuringMachine::new(num_tapes, input_alphabet, transitions)
}

/// Splits the input into its non-empty lines using the pest grammar.
fn read_lines(input: &str) -> Result<Lines<'_>, TuringMachineError> {
    let pairs = DescriptionParser::parse(Rule::file, input)
        .map_err(|e| TuringMachineError::ParseError(e.into()))?;

    let mut lines = Vec::new();
    let mut eof_line = 1;

    for pair in pairs.flat_map(|file| file.into_inner()) {
        let number = pair.as_span().start_pos().line_col().0;
        match pair.as_rule() {
            Rule::line => {
                let tokens: Vec<&str> = pair.into_inner().map(|token| token.as_str()).collect();
                // Empty and comment-only lines are skipped
                if !tokens.is_empty() {
                    lines.push(Line {
                        number,
                        tokens: tokens.into_iter().peekable(),
                    });
                }
            }
            Rule::EOI => eof_line = number,
            _ => {}
        }
    }

    Ok(Lines {
        remaining: lines.into_iter(),
        eof_line,
    })
}

/// Reads the letters following `input-alphabet:`.
fn parse_input_alphabet(mut line: Line<'_>) -> Result<Vec<String>, TuringMachineError> {
    let mut letters = Vec::new();
    let mut seen = HashSet::new();

    while line.has_token() {
        let letter = line.identifier()?;
        if letter == BLANK {
            return Err(line.error(format!(
                "The blank letter \"{BLANK}\" is not allowed in the input alphabet"
            )));
        }
        if !seen.insert(letter.clone()) {
            return Err(line.error(format!(
                "Letter \"{letter}\" repeated in the input alphabet"
            )));
        }
        letters.push(letter);
    }

    if letters.is_empty() {
        return Err(line.error("Identifier expected"));
    }

    Ok(letters)
}

/// Parses a transition line `state letters state letters moves` into `transitions`.
///
/// A second transition for an already defined `(state, letters)` pair makes the
/// machine non-deterministic and is rejected.
fn parse_transition(
    mut line: Line<'_>,
    num_tapes: usize,
    transitions: &mut Transitions,
) -> Result<(), TuringMachineError> {
    let state = line.identifier()?;
    if is_halting_state(&state) {
        return Err(line.error(format!(
            "No transition can start in the \"{state}\" state"
        )));
    }

    let read = line.identifiers(num_tapes)?;
    let key = TransitionKey { state, read };
    if transitions.contains_key(&key) {
        return Err(line.error("The machine is not deterministic"));
    }

    let next_state = line.identifier()?;
    let write = line.identifiers(num_tapes)?;
    let directions = (0..num_tapes)
        .map(|_| line.direction())
        .collect::<Result<Vec<_>, _>>()?;
    line.finish()?;

    transitions.insert(
        key,
        Transition {
            next_state,
            write,
            directions,
        },
    );

    Ok(())
}

/// The non-empty lines of a description, in order.
struct Lines<'i> {
    remaining: std::vec::IntoIter<Line<'i>>,
    eof_line: usize,
}

impl<'i> Lines<'i> {
    /// Takes the next line, which must start with `keyword`.
    fn next_line(&mut self, keyword: &str) -> Result<Line<'i>, TuringMachineError> {
        self.remaining.next().ok_or_else(|| TuringMachineError::Syntax {
            line: self.eof_line,
            message: format!("\"{keyword}\" expected"),
        })
    }
}

/// The tokens of one line, consumed from left to right.
struct Line<'i> {
    number: usize,
    tokens: Peekable<std::vec::IntoIter<&'i str>>,
}

impl<'i> Line<'i> {
    /// Creates a `TuringMachineError::Syntax` pointing at this line.
    fn error(&self, message: impl Into<String>) -> TuringMachineError {
        TuringMachineError::Syntax {
            line: self.number,
            message: message.into(),
        }
    }

    fn has_token(&mut self) -> bool {
        self.tokens.peek().is_some()
    }

    fn keyword(&mut self, keyword: &str) -> Result<(), TuringMachineError> {
        match self.tokens.next() {
            Some(token) if token == keyword => Ok(()),
            _ => Err(self.error(format!("\"{keyword}\" expected"))),
        }
    }

    fn positive_integer(&mut self) -> Result<usize, TuringMachineError> {
        self.tokens
            .next()
            .and_then(|token| token.parse::<usize>().ok())
            .filter(|&value| value > 0)
            .ok_or_else(|| {
                self.error(format!(
                    "Positive integer expected after \"{NUM_TAPES_KEYWORD}\""
                ))
            })
    }

    fn identifier(&mut self) -> Result<String, TuringMachineError> {
        let Some(token) = self.tokens.next() else {
            return Err(self.error("Identifier expected"));
        };
        if !is_identifier(token) {
            return Err(self.error(format!("Invalid identifier \"{token}\"")));
        }
        Ok(token.to_string())
    }

    fn identifiers(&mut self, count: usize) -> Result<Vec<String>, TuringMachineError> {
        (0..count).map(|_| self.identifier()).collect()
    }

    fn direction(&mut self) -> Result<Direction, TuringMachineError> {
        let mut chars = self.tokens.next().unwrap_or_default().chars();
        match (chars.next().and_then(Direction::from_symbol), chars.next()) {
            (Some(direction), None) => Ok(direction),
            _ => Err(self.error(format!(
                "Move direction expected, which should be {HEAD_LEFT}, {HEAD_RIGHT}, or {HEAD_STAY}"
            ))),
        }
    }

    /// Ensures every token of the line has been consumed.
    fn finish(mut self) -> Result<(), TuringMachineError> {
        if self.has_token() {
            return Err(self.error("Too many tokens in a line"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ACCEPTING_STATE, INITIAL_STATE};

    fn syntax_error(input: &str) -> (usize, String) {
        match parse(input) {
            Err(TuringMachineError::Syntax { line, message }) => (line, message),
            other => panic!("Expected a syntax error, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_simple_machine() {
        let input = "\
num-tapes: 2
input-alphabet: a b
(start) a _ (start) a a > >
(start) b _ (start) b b > >
(start) _ _ (accept) _ _ - -
";

        let machine = parse(input).unwrap();
        assert_eq!(machine.num_tapes(), 2);
        assert_eq!(machine.input_alphabet(), &["a".to_string(), "b".to_string()]);
        assert_eq!(machine.transitions().len(), 3);

        let transition = machine.transition(INITIAL_STATE, &["b", BLANK]).unwrap();
        assert_eq!(
            transition,
            &Transition {
                next_state: INITIAL_STATE.into(),
                write: vec!["b".into(), "b".into()],
                directions: vec![Direction::Right, Direction::Right],
            }
        );

        let transition = machine.transition(INITIAL_STATE, &[BLANK, BLANK]).unwrap();
        assert_eq!(transition.next_state, ACCEPTING_STATE);
        assert_eq!(transition.directions, vec![Direction::Stay, Direction::Stay]);
    }

    #[test]
    fn test_parse_comments_and_blank_lines() {
        let input = "
# A one-tape machine accepting words that start with a
num-tapes:\t1   # tapes

input-alphabet: a b#c is not a letter

(start) a (accept) a -
  (start)\tb (reject) b <   # trailing comment
";

        let machine = parse(input).unwrap();
        assert_eq!(machine.num_tapes(), 1);
        assert_eq!(machine.input_alphabet(), &["a".to_string(), "b".to_string()]);
        assert_eq!(machine.transitions().len(), 2);
        assert_eq!(
            machine.transition(INITIAL_STATE, &["b"]).unwrap().directions,
            vec![Direction::Left]
        );
    }

    #[test]
    fn test_parse_nested_identifiers() {
        let input = "\
num-tapes: 1
input-alphabet: (a) ((b)c) x-1
((q)(1)) (a) (q2) () >
";

        let machine = parse(input).unwrap();
        assert!(machine.transition("((q)(1))", &["(a)"]).is_some());
        assert!(machine.working_alphabet().contains(&"()".to_string()));
    }

    #[test]
    fn test_parse_without_trailing_newline() {
        let machine = parse("num-tapes: 1\ninput-alphabet: a\n(start) a (accept) a -").unwrap();
        assert_eq!(machine.transitions().len(), 1);
    }

    #[test]
    fn test_parse_crlf_line_endings() {
        let machine = parse("num-tapes: 1\r\ninput-alphabet: a\r\n(start) a (accept) a -\r\n")
            .unwrap();
        assert!(machine.transition(INITIAL_STATE, &["a"]).is_some());
    }

    #[test]
    fn test_parse_zero_tapes() {
        assert_eq!(
            syntax_error("num-tapes: 0\ninput-alphabet: a\n"),
            (
                1,
                "Positive integer expected after \"num-tapes:\"".to_string()
            )
        );
    }

    #[test]
    fn test_parse_bad_tape_counts() {
        for header in ["num-tapes:", "num-tapes: two", "num-tapes: -1", "num-tapes: 1.5"] {
            let (line, message) = syntax_error(&format!("{header}\ninput-alphabet: a\n"));
            assert_eq!(line, 1);
            assert!(message.starts_with("Positive integer expected"), "{header}");
        }
    }

    #[test]
    fn test_parse_missing_header() {
        assert_eq!(
            syntax_error("input-alphabet: a\n"),
            (1, "\"num-tapes:\" expected".to_string())
        );
        assert_eq!(
            syntax_error(""),
            (1, "\"num-tapes:\" expected".to_string())
        );
    }

    #[test]
    fn test_parse_missing_alphabet() {
        assert_eq!(
            syntax_error("num-tapes: 1\n\n"),
            (3, "\"input-alphabet:\" expected".to_string())
        );
        assert_eq!(
            syntax_error("num-tapes: 1\n(start) a (accept) a -\n"),
            (2, "\"input-alphabet:\" expected".to_string())
        );
    }

    #[test]
    fn test_parse_extra_header_tokens() {
        assert_eq!(
            syntax_error("num-tapes: 1 2\ninput-alphabet: a\n"),
            (1, "Too many tokens in a line".to_string())
        );
    }

    #[test]
    fn test_parse_empty_alphabet() {
        assert_eq!(
            syntax_error("num-tapes: 1\ninput-alphabet:   # nothing\n"),
            (2, "Identifier expected".to_string())
        );
    }

    #[test]
    fn test_parse_blank_in_alphabet() {
        let (line, message) = syntax_error("num-tapes: 1\ninput-alphabet: a _\n");
        assert_eq!(line, 2);
        assert!(message.contains("blank letter \"_\""));
    }

    #[test]
    fn test_parse_repeated_letter() {
        assert_eq!(
            syntax_error("num-tapes: 1\ninput-alphabet: a b a\n"),
            (2, "Letter \"a\" repeated in the input alphabet".to_string())
        );
    }

    #[test]
    fn test_parse_invalid_identifier() {
        assert_eq!(
            syntax_error("num-tapes: 1\ninput-alphabet: a (b\n"),
            (2, "Invalid identifier \"(b\"".to_string())
        );
        assert_eq!(
            syntax_error("num-tapes: 1\ninput-alphabet: a\n(start) a q.1 a -\n"),
            (3, "Invalid identifier \"q.1\"".to_string())
        );
    }

    #[test]
    fn test_parse_short_transition() {
        // 2 * N + 3 tokens are required; this line has one fewer.
        let input = "num-tapes: 2\ninput-alphabet: a\n\n(start) a _ (accept) a _ >\n";
        let (line, message) = syntax_error(input);
        assert_eq!(line, 4);
        assert!(message.starts_with("Move direction expected"));

        let input = "num-tapes: 2\ninput-alphabet: a\n(start) a\n";
        assert_eq!(syntax_error(input), (3, "Identifier expected".to_string()));
    }

    #[test]
    fn test_parse_long_transition() {
        let input = "num-tapes: 1\ninput-alphabet: a\n(start) a (accept) a - -\n";
        assert_eq!(
            syntax_error(input),
            (3, "Too many tokens in a line".to_string())
        );
    }

    #[test]
    fn test_parse_invalid_direction() {
        for direction in ["R", "<<", "x"] {
            let input = format!("num-tapes: 1\ninput-alphabet: a\n(start) a (accept) a {direction}\n");
            let (line, message) = syntax_error(&input);
            assert_eq!(line, 3);
            assert_eq!(
                message,
                "Move direction expected, which should be <, >, or -"
            );
        }
    }

    #[test]
    fn test_parse_transition_from_halting_state() {
        let input = "num-tapes: 1\ninput-alphabet: a\n(reject) a (start) a -\n";
        assert_eq!(
            syntax_error(input),
            (
                3,
                "No transition can start in the \"(reject)\" state".to_string()
            )
        );
    }

    #[test]
    fn test_parse_non_deterministic_machine() {
        let input = "\
num-tapes: 2
input-alphabet: a
(start) a _ (start) a a > >
# same key, different action
(start) a _ (accept) a a - -
";
        assert_eq!(
            syntax_error(input),
            (5, "The machine is not deterministic".to_string())
        );
    }

    #[test]
    fn test_parse_error_display() {
        let error = parse("num-tapes: 0\n").unwrap_err();
        assert_eq!(
            error.to_string(),
            "Syntax error in line 1: Positive integer expected after \"num-tapes:\""
        );
    }
}
