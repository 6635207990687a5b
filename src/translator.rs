//! This module translates a two-tape machine into a one-tape machine that accepts
//! exactly the same words.
//!
//! The one-tape machine keeps both tapes on its single tape as
//! `tape 1, separator, tape 2, tape end`, with the cell under each simulated head
//! replaced by its marked form (see [`TapeEncoding`]). Every step of the source
//! machine is simulated by a small group of states:
//!
//! 1. walk left to the head of tape 1 and remember its letter,
//! 2. walk right to the head of tape 2 and pick the source transition,
//! 3. walk back to tape 1, write and move its head,
//! 4. walk forward to tape 2, write and move its head, then start over.
//!
//! Tape 1 grows by shifting tape 2 one cell to the right; tape 2 grows by pushing
//! the tape end. The generated table is built symbolically from the source table
//! and the working alphabet, and the machine is never run.

use crate::encoding::TapeEncoding;
use crate::identifier::compound;
use crate::machine::TuringMachine;
use crate::types::{
    is_halting_state, Direction, Transition, TransitionKey, Transitions, TuringMachineError,
    BLANK, INITIAL_STATE,
};
use std::collections::btree_map::Entry;
use tracing::debug;

/// The number of tapes a translatable machine must have.
pub const SOURCE_TAPES: usize = 2;

/// What a generated state is doing. The tag becomes the last part of the state's name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    InitTape1,
    InitTape2,
    InitTapeEnd,
    InitSeekSeparator,
    InitRewind,
    FindHead1,
    FindHead2,
    SeekHead1,
    SeekHead2,
    MarkLeft1,
    CheckRight1,
    ShiftScan,
    ShiftEnd,
    ShiftBack,
    ShiftPick,
    ShiftCarry,
    ShiftOpen,
    MarkLeft2,
    Bounce2,
    CheckRight2,
    GrowEnd2,
    GrowBack2,
}

impl Role {
    fn tag(self) -> &'static str {
        match self {
            Role::InitTape1 => "init-tape-1",
            Role::InitTape2 => "init-tape-2",
            Role::InitTapeEnd => "init-tape-end",
            Role::InitSeekSeparator => "init-seek-separator",
            Role::InitRewind => "init-rewind",
            Role::FindHead1 => "find-head-1",
            Role::FindHead2 => "find-head-2",
            Role::SeekHead1 => "seek-head-1",
            Role::SeekHead2 => "seek-head-2",
            Role::MarkLeft1 => "mark-left-1",
            Role::CheckRight1 => "check-right-1",
            Role::ShiftScan => "shift-scan",
            Role::ShiftEnd => "shift-end",
            Role::ShiftBack => "shift-back",
            Role::ShiftPick => "shift-pick",
            Role::ShiftCarry => "shift-carry",
            Role::ShiftOpen => "shift-open",
            Role::MarkLeft2 => "mark-left-2",
            Role::Bounce2 => "bounce-2",
            Role::CheckRight2 => "check-right-2",
            Role::GrowEnd2 => "grow-end-2",
            Role::GrowBack2 => "grow-back-2",
        }
    }
}

/// Names a generated state. Different roles or parts always give different names,
/// and no name equals a source state or one of the reserved states.
fn name(role: Role, parts: &[&str]) -> String {
    let mut parts = parts.to_vec();
    parts.push(role.tag());
    compound(&parts)
}

/// Accumulates the one-tape transition table.
#[derive(Debug, Default)]
struct TableBuilder {
    transitions: Transitions,
}

impl TableBuilder {
    fn add(&mut self, state: &str, read: &str, next_state: &str, write: &str, direction: Direction) {
        let transition = Transition {
            next_state: next_state.to_string(),
            write: vec![write.to_string()],
            directions: vec![direction],
        };

        match self.transitions.entry(TransitionKey::new(state, &[read])) {
            Entry::Vacant(entry) => {
                entry.insert(transition);
            }
            Entry::Occupied(entry) => {
                assert_eq!(entry.get(), &transition, "conflicting rule for {state} on {read}");
            }
        }
    }

    /// Adds a transition that leaves the cell unchanged.
    fn keep(&mut self, state: &str, read: &str, next_state: &str, direction: Direction) {
        self.add(state, read, next_state, read, direction);
    }

    fn finish(self) -> Transitions {
        self.transitions
    }
}

/// Translates a two-tape machine into an equivalent one-tape machine.
///
/// The result has the same input alphabet, accepts and rejects the same words,
/// and gets stuck wherever the source machine has no transition to take.
///
/// # Returns
///
/// * `Ok(TuringMachine)` with a single tape.
/// * `Err(TuringMachineError::UnsupportedTapeCount)` if `machine` does not have two tapes.
pub fn translate(machine: &TuringMachine) -> Result<TuringMachine, TuringMachineError> {
    if machine.num_tapes() != SOURCE_TAPES {
        return Err(TuringMachineError::UnsupportedTapeCount {
            expected: SOURCE_TAPES,
            found: machine.num_tapes(),
        });
    }

    let translator = Translator::new(machine);
    let mut table = TableBuilder::default();

    translator.emit_initialization(&mut table);
    for state in machine.set_of_states() {
        if !is_halting_state(&state) {
            translator.emit_state_module(&mut table, &state);
        }
    }

    let translated = TuringMachine::new(1, machine.input_alphabet().to_vec(), table.finish())?;

    debug!(
        source_states = machine.set_of_states().len(),
        source_transitions = machine.transitions().len(),
        states = translated.set_of_states().len(),
        transitions = translated.transitions().len(),
        "translated machine"
    );

    Ok(translated)
}

struct Translator<'m> {
    machine: &'m TuringMachine,
    encoding: TapeEncoding,
    letters: Vec<String>,
}

impl<'m> Translator<'m> {
    fn new(machine: &'m TuringMachine) -> Self {
        let letters = machine.working_alphabet();
        Self {
            machine,
            encoding: TapeEncoding::new(&letters),
            letters,
        }
    }

    fn marked(&self, letter: &str) -> String {
        self.encoding.marked(letter)
    }

    /// Every symbol a cell of a simulated tape can hold: plain and marked letters.
    fn cells(&self) -> Vec<String> {
        self.letters
            .iter()
            .cloned()
            .chain(self.letters.iter().map(|letter| self.marked(letter)))
            .collect()
    }

    /// Turns the input word `w` into `marked(w1) w2 .. wn SEP marked(_) END` and
    /// parks the head on the first cell in the module of the initial state.
    fn emit_initialization(&self, table: &mut TableBuilder) {
        let init_tape_1 = name(Role::InitTape1, &[]);
        let init_tape_2 = name(Role::InitTape2, &[]);
        let init_tape_end = name(Role::InitTapeEnd, &[]);
        let init_seek = name(Role::InitSeekSeparator, &[]);
        let init_rewind = name(Role::InitRewind, &[]);
        let start = name(Role::FindHead1, &[INITIAL_STATE]);

        let separator = self.encoding.separator();
        let tape_end = self.encoding.tape_end();
        let marked_blank = self.marked(BLANK);

        let input = self.machine.input_alphabet();
        let first_letters: Vec<&str> = input.iter().map(String::as_str).chain([BLANK]).collect();

        for &letter in &first_letters {
            table.add(
                INITIAL_STATE,
                letter,
                &init_tape_1,
                &self.marked(letter),
                Direction::Right,
            );
            table.keep(&init_rewind, &self.marked(letter), &start, Direction::Stay);
        }
        for letter in input {
            table.keep(&init_tape_1, letter, &init_tape_1, Direction::Right);
            table.keep(&init_rewind, letter, &init_rewind, Direction::Left);
        }

        table.add(&init_tape_1, BLANK, &init_tape_2, separator, Direction::Right);
        table.add(&init_tape_2, BLANK, &init_tape_end, &marked_blank, Direction::Right);
        table.add(&init_tape_end, BLANK, &init_seek, tape_end, Direction::Left);
        table.keep(&init_seek, &marked_blank, &init_seek, Direction::Left);
        table.keep(&init_seek, separator, &init_rewind, Direction::Left);
    }

    /// Emits the states simulating one step taken from `state`.
    fn emit_state_module(&self, table: &mut TableBuilder, state: &str) {
        let separator = self.encoding.separator();
        let find_head_1 = name(Role::FindHead1, &[state]);

        table.keep(&find_head_1, separator, &find_head_1, Direction::Left);

        for a in &self.letters {
            let find_head_2 = name(Role::FindHead2, &[state, a.as_str()]);

            table.keep(&find_head_1, a, &find_head_1, Direction::Left);
            table.keep(&find_head_1, &self.marked(a), &find_head_2, Direction::Right);
            table.keep(&find_head_2, separator, &find_head_2, Direction::Right);

            for b in &self.letters {
                table.keep(&find_head_2, b, &find_head_2, Direction::Right);

                // Without a transition the machine is stuck on the head of tape 2.
                if let Some(transition) = self.machine.transition(state, &[a, b]) {
                    let parts = [state, a.as_str(), b.as_str()];
                    let seek_head_1 = name(Role::SeekHead1, &parts);
                    table.keep(&find_head_2, &self.marked(b), &seek_head_1, Direction::Left);
                    self.emit_step(table, &parts, transition);
                }
            }
        }
    }

    /// Emits the states applying `transition`, read as `[state, a, b]` in `parts`.
    fn emit_step(&self, table: &mut TableBuilder, parts: &[&str; 3], transition: &Transition) {
        let separator = self.encoding.separator();
        let seek_head_1 = name(Role::SeekHead1, parts);
        let seek_head_2 = name(Role::SeekHead2, parts);

        table.keep(&seek_head_1, separator, &seek_head_1, Direction::Left);
        table.keep(&seek_head_2, separator, &seek_head_2, Direction::Right);
        for letter in &self.letters {
            table.keep(&seek_head_1, letter, &seek_head_1, Direction::Left);
            table.keep(&seek_head_2, letter, &seek_head_2, Direction::Right);
        }

        self.emit_tape_1_move(table, parts, transition, &seek_head_1, &seek_head_2);
        self.emit_tape_2_move(table, parts, transition, &seek_head_2);
    }

    /// Writes on tape 1 and moves its head, ending on the cell right of the new head
    /// in `seek_head_2`.
    fn emit_tape_1_move(
        &self,
        table: &mut TableBuilder,
        parts: &[&str; 3],
        transition: &Transition,
        seek_head_1: &str,
        seek_head_2: &str,
    ) {
        let head = self.marked(parts[1]);
        let write = &transition.write[0];

        match transition.directions[0] {
            Direction::Stay => {
                table.add(seek_head_1, &head, seek_head_2, &self.marked(write), Direction::Right);
            }
            Direction::Left => {
                // At the left end the head stays, so the cell just written gets marked.
                let mark = name(Role::MarkLeft1, parts);
                table.add(seek_head_1, &head, &mark, write, Direction::Left);
                for letter in &self.letters {
                    table.add(&mark, letter, seek_head_2, &self.marked(letter), Direction::Right);
                }
            }
            Direction::Right => {
                let check = name(Role::CheckRight1, parts);
                table.add(seek_head_1, &head, &check, write, Direction::Right);
                for letter in &self.letters {
                    table.add(&check, letter, seek_head_2, &self.marked(letter), Direction::Right);
                }
                table.keep(
                    &check,
                    self.encoding.separator(),
                    &name(Role::ShiftScan, parts),
                    Direction::Right,
                );
                self.emit_shift(table, parts, seek_head_2);
            }
        }
    }

    /// Moves the separator and all of tape 2 one cell right, starting from the cell
    /// after the separator, and marks the blank cell opened at the end of tape 1.
    fn emit_shift(&self, table: &mut TableBuilder, parts: &[&str; 3], seek_head_2: &str) {
        let separator = self.encoding.separator();
        let tape_end = self.encoding.tape_end();
        let scan = name(Role::ShiftScan, parts);
        let end = name(Role::ShiftEnd, parts);
        let back = name(Role::ShiftBack, parts);
        let pick = name(Role::ShiftPick, parts);
        let open = name(Role::ShiftOpen, parts);

        let cells = self.cells();
        for cell in &cells {
            table.keep(&scan, cell, &scan, Direction::Right);
        }
        table.add(&scan, tape_end, &end, BLANK, Direction::Right);
        table.add(&end, BLANK, &back, tape_end, Direction::Left);
        table.keep(&back, BLANK, &pick, Direction::Left);

        for cell in cells.iter().map(String::as_str).chain([separator]) {
            let carry = name(Role::ShiftCarry, &[parts[0], parts[1], parts[2], cell]);
            table.add(&pick, cell, &carry, BLANK, Direction::Right);
            if cell == separator {
                table.add(&carry, BLANK, &open, separator, Direction::Left);
            } else {
                table.add(&carry, BLANK, &back, cell, Direction::Left);
            }
        }

        table.add(&open, BLANK, seek_head_2, &self.marked(BLANK), Direction::Right);
    }

    /// Writes on tape 2, moves its head and enters the next simulated state while
    /// stepping left, or halts.
    fn emit_tape_2_move(
        &self,
        table: &mut TableBuilder,
        parts: &[&str; 3],
        transition: &Transition,
        seek_head_2: &str,
    ) {
        let next = if is_halting_state(&transition.next_state) {
            transition.next_state.clone()
        } else {
            name(Role::FindHead1, &[transition.next_state.as_str()])
        };
        let head = self.marked(parts[2]);
        let write = &transition.write[1];

        match transition.directions[1] {
            Direction::Stay => {
                table.add(seek_head_2, &head, &next, &self.marked(write), Direction::Left);
            }
            Direction::Left => {
                let mark = name(Role::MarkLeft2, parts);
                let bounce = name(Role::Bounce2, parts);
                table.add(seek_head_2, &head, &mark, write, Direction::Left);
                for letter in &self.letters {
                    table.add(&mark, letter, &next, &self.marked(letter), Direction::Left);
                    table.add(&bounce, letter, &next, &self.marked(letter), Direction::Left);
                }
                // Tape 2 starts right after the separator; bounce back onto its first cell.
                table.keep(&mark, self.encoding.separator(), &bounce, Direction::Right);
            }
            Direction::Right => {
                let check = name(Role::CheckRight2, parts);
                let grow_end = name(Role::GrowEnd2, parts);
                let grow_back = name(Role::GrowBack2, parts);
                let marked_blank = self.marked(BLANK);
                let tape_end = self.encoding.tape_end();

                table.add(seek_head_2, &head, &check, write, Direction::Right);
                for letter in &self.letters {
                    table.add(&check, letter, &next, &self.marked(letter), Direction::Left);
                }
                table.add(&check, tape_end, &grow_end, &marked_blank, Direction::Right);
                table.add(&grow_end, BLANK, &grow_back, tape_end, Direction::Left);
                table.keep(&grow_back, &marked_blank, &next, Direction::Left);
            }
        }
    }
}
