//! A reference stepper for running machines in tests.
//!
//! Tapes are infinite to the right only: a head moving left from the first cell
//! stays where it is, and unvisited cells hold the blank.

#![allow(dead_code)]

use tm_translator::{
    Direction, TapeEncoding, TuringMachine, ACCEPTING_STATE, BLANK, INITIAL_STATE,
    REJECTING_STATE,
};

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Accepted,
    Rejected,
    /// No transition is defined for the current state and letters.
    Stuck,
    /// The step limit was reached before the machine halted.
    OutOfSteps,
}

/// The configuration a run ended in.
#[derive(Debug, Clone)]
pub struct Run {
    pub outcome: Outcome,
    pub state: String,
    pub tapes: Vec<Vec<String>>,
    pub heads: Vec<usize>,
    pub steps: usize,
}

pub fn letters(word: &str) -> Vec<String> {
    word.split_whitespace().map(str::to_string).collect()
}

/// Runs `machine` on `input` for at most `max_steps` steps.
pub fn run(machine: &TuringMachine, input: &[String], max_steps: usize) -> Run {
    let num_tapes = machine.num_tapes();
    let mut tapes = vec![Vec::new(); num_tapes];
    tapes[0] = input.to_vec();
    let mut heads = vec![0; num_tapes];
    let mut state = INITIAL_STATE.to_string();
    let mut steps = 0;

    let outcome = loop {
        if state == ACCEPTING_STATE {
            break Outcome::Accepted;
        }
        if state == REJECTING_STATE {
            break Outcome::Rejected;
        }
        if steps == max_steps {
            break Outcome::OutOfSteps;
        }

        let read: Vec<String> = tapes
            .iter()
            .zip(&heads)
            .map(|(tape, &head)| tape.get(head).cloned().unwrap_or_else(|| BLANK.to_string()))
            .collect();
        let Some(transition) = machine.transition(&state, read.as_slice()) else {
            break Outcome::Stuck;
        };

        for (tape_index, tape) in tapes.iter_mut().enumerate() {
            let head = &mut heads[tape_index];
            if tape.len() <= *head {
                tape.resize(*head + 1, BLANK.to_string());
            }
            tape[*head] = transition.write[tape_index].clone();
            *head = match transition.directions[tape_index] {
                Direction::Left => head.saturating_sub(1),
                Direction::Right => *head + 1,
                Direction::Stay => *head,
            };
        }

        state = transition.next_state.clone();
        steps += 1;
    };

    Run {
        outcome,
        state,
        tapes,
        heads,
        steps,
    }
}

/// Drops the blanks after the last written letter.
pub fn trimmed(tape: &[String]) -> Vec<String> {
    let len = tape
        .iter()
        .rposition(|letter| letter != BLANK)
        .map_or(0, |last| last + 1);
    tape[..len].to_vec()
}

/// Reads the two simulated tapes and head positions back from a one-tape run.
///
/// Panics if the tape does not have the shape `tape 1, separator, tape 2, tape end`
/// with one marked cell per simulated tape and only blanks after the tape end.
pub fn decode(encoding: &TapeEncoding, tape: &[String]) -> (Vec<Vec<String>>, Vec<usize>) {
    let separator = tape
        .iter()
        .position(|cell| cell == encoding.separator())
        .expect("the tape has a separator");
    let end = tape
        .iter()
        .position(|cell| cell == encoding.tape_end())
        .expect("the tape has a tape end");
    assert!(separator < end, "the separator comes before the tape end");
    assert!(
        tape[end + 1..].iter().all(|cell| cell == BLANK),
        "only blanks follow the tape end: {:?}",
        &tape[end + 1..]
    );

    let mut tapes = Vec::new();
    let mut heads = Vec::new();
    for segment in [&tape[..separator], &tape[separator + 1..end]] {
        let mut head = None;
        let mut cells = Vec::new();
        for (index, cell) in segment.iter().enumerate() {
            match encoding.unmark(cell) {
                Some(letter) => {
                    assert!(head.is_none(), "one marked cell per tape: {segment:?}");
                    head = Some(index);
                    cells.push(letter.to_string());
                }
                None => cells.push(cell.clone()),
            }
        }
        tapes.push(cells);
        heads.push(head.expect("every tape has a marked cell"));
    }

    (tapes, heads)
}
