//! Pieces shared by the backends that keep the tape in module-level globals.

use crate::ast::{Bit, Instruction};

use super::{BackendKind, writer::CodeWriter};

pub(crate) const GLOBALS: &str = "global tape, head, program_continue";

const PRELUDE: &str = r#"import sys

TAPE_LENGTH = 1000
HEAD_START = 30
DISPLAY_WIDTH = 61

tape = [0] * TAPE_LENGTH
head = HEAD_START
program_continue = True


def read_range(ordinal):
    start = int(input('Start of range %d: ' % ordinal))
    length = int(input('Length of range %d: ' % ordinal))
    for position in range(max(start, 0), min(start + length, TAPE_LENGTH)):
        tape[position] = 1


def show_tape(title):
    print(title)
    print(''.join(str(cell) for cell in tape[:DISPLAY_WIDTH]))
    print(' ' * head + 'X')


def pause():
    show_tape('Pause:')
    input('Press Enter to continue...')

"#;

const MAIN: &str = r#"def main():
    read_range(1)
    read_range(2)
    show_tape('Initial state:')
    run_program()
    show_tape('Final state:')
    print('Program finished.')

"#;

/// Emits the header comment, the runtime helpers and the opening of
/// `run_program`.
pub(crate) fn begin(writer: &mut CodeWriter, backend: BackendKind) {
    writer.comment(format!("Translated from MTdV by mtdv (backend: {backend})."));
    writer.snippet(PRELUDE);
    writer.blank();
    writer.open("def run_program():");
    writer.declare(GLOBALS);
}

/// Closes `run_program` and emits `main` with the entry point guard.
pub(crate) fn end(writer: &mut CodeWriter, recursion_limit: Option<usize>) {
    writer.close();
    writer.blank();
    writer.blank();
    writer.snippet(MAIN);
    writer.blank();
    writer.open("if __name__ == '__main__':");
    if let Some(limit) = recursion_limit {
        writer.line(format!("sys.setrecursionlimit({limit})"));
    }
    writer.line("main()");
    writer.close();
}

/// Only the first `Init` in emission order resets the tape.
#[derive(Debug, Default)]
pub(crate) struct InitTracker {
    initialized: bool,
}

impl InitTracker {
    pub(crate) fn first(&mut self) -> bool {
        !std::mem::replace(&mut self.initialized, true)
    }
}

pub(crate) fn leaf(writer: &mut CodeWriter, instruction: Instruction, init: &mut InitTracker) {
    match instruction {
        Instruction::Init if init.first() => {
            writer.line("tape = [0] * TAPE_LENGTH");
            writer.line("head = HEAD_START");
        }
        Instruction::Init => writer.comment("init: tape already initialized"),
        Instruction::Pause => writer.line("pause()"),
        Instruction::MoveLeft => {
            writer.open("if head > 0:");
            writer.line("head -= 1");
            writer.close();
        }
        Instruction::MoveRight => {
            writer.open("if head < TAPE_LENGTH - 1:");
            writer.line("head += 1");
            writer.close();
        }
        Instruction::WriteZero => write(writer, Bit::Zero),
        Instruction::WriteOne => write(writer, Bit::One),
    }
}

fn write(writer: &mut CodeWriter, bit: Bit) {
    writer.open("if 0 <= head < TAPE_LENGTH:");
    writer.line(format!("tape[head] = {bit}"));
    writer.close();
}

pub(crate) fn conditional_header(condition: Bit) -> String {
    format!("if 0 <= head < TAPE_LENGTH and tape[head] == {condition}:")
}

pub(crate) fn halt(writer: &mut CodeWriter) {
    writer.line("program_continue = False");
    writer.line("return");
}
