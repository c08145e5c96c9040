use crate::ast::{Instruction, Node};

use super::{
    Backend, BackendKind, GenerateError, GeneratorConfig, imperative::InitTracker,
    recursive::RECURSION_LIMIT, writer::CodeWriter,
};

/// Runtime with no assignments and no mutation. The state is the tuple
/// `(tape, head, instructions, running)` and every primitive returns a new
/// one.
const RUNTIME: &str = r#"import sys


def tape_length():
    return 1000


def head_start():
    return 30


def display_width():
    return 61


def blank_tape(length):
    return (0,) * length


def make_state(tape, head, instructions, running):
    return (tape, head, instructions, running)


def tape_of(state):
    return state[0]


def head_of(state):
    return state[1]


def instructions_of(state):
    return state[2]


def is_running(state):
    return state[3]


def with_instructions(state, instructions):
    return make_state(tape_of(state), head_of(state), instructions, is_running(state))


def resume(state, instructions):
    return with_instructions(state, instructions)


def initialize(state):
    return make_state(blank_tape(tape_length()), head_start(), instructions_of(state), is_running(state))


def move_left(state):
    return make_state(tape_of(state), head_of(state) - 1 if head_of(state) > 0 else head_of(state), instructions_of(state), is_running(state))


def move_right(state):
    return make_state(tape_of(state), head_of(state) + 1 if head_of(state) < tape_length() - 1 else head_of(state), instructions_of(state), is_running(state))


def write(state, bit):
    return make_state(tape_of(state)[:head_of(state)] + (bit,) + tape_of(state)[head_of(state) + 1:], head_of(state), instructions_of(state), is_running(state)) if 0 <= head_of(state) < tape_length() else state


def halt(state):
    return make_state(tape_of(state), head_of(state), instructions_of(state), False)


def matches(state, bit):
    return 0 <= head_of(state) < tape_length() and tape_of(state)[head_of(state)] == bit


def show_state(state, title):
    return (print(title), print(''.join(map(str, tape_of(state)[:display_width()]))), print(' ' * head_of(state) + 'X'), state)[-1]


def pause(state):
    return (show_state(state, 'Pause:'), input('Press Enter to continue...'), state)[-1]


def run_block(state, block):
    return resume(run(with_instructions(state, block)), instructions_of(state))


def run_loop(state, body):
    return state if len(body) == 0 or not is_running(state) else run_loop(run_block(state, body), body)


def dispatch(instruction, state):
    if instruction[0] == 'init':
        return initialize(state)
    if instruction[0] == 'nop':
        return state
    if instruction[0] == 'pause':
        return pause(state)
    if instruction[0] == 'move_left':
        return move_left(state)
    if instruction[0] == 'move_right':
        return move_right(state)
    if instruction[0] == 'write':
        return write(state, instruction[1])
    if instruction[0] == 'halt':
        return halt(state)
    if instruction[0] == 'if':
        return run_block(state, instruction[2]) if matches(state, instruction[1]) else state
    if instruction[0] == 'loop':
        return run_loop(state, instruction[1])
    raise ValueError('unknown instruction: %r' % (instruction,))


def step(state):
    return dispatch(instructions_of(state)[0], with_instructions(state, instructions_of(state)[1:]))


def run(state):
    return state if not is_running(state) or len(instructions_of(state)) == 0 else run(step(state))


def read_int(prompt):
    return int(input(prompt))


def fill_span(tape, start, stop):
    return tape[:start] + (1,) * (stop - start) + tape[stop:] if start < stop else tape


def fill_range(tape, start, length):
    return fill_span(tape, max(start, 0), min(start + length, tape_length()))


def read_range(tape, ordinal):
    return fill_range(tape, read_int('Start of range %d: ' % ordinal), read_int('Length of range %d: ' % ordinal))


def finish(state):
    return (show_state(state, 'Final state:'), print('Program finished.'), state)[-1]


def main():
    return finish(run(show_state(make_state(read_range(read_range(blank_tape(tape_length()), 1), 2), head_start(), program(), True), 'Initial state:')))

"#;

/// Instructions are data: the program is a nested tuple literal walked by
/// `run`, and sequencing is function composition over the state.
#[derive(Debug, Clone, Copy, Default)]
pub struct PureStateThreading;

impl Backend for PureStateThreading {
    fn kind(&self) -> BackendKind {
        BackendKind::PureStateThreading
    }

    fn generate(
        &self,
        program: &[Node],
        config: &GeneratorConfig,
    ) -> Result<Vec<String>, GenerateError> {
        let mut writer = CodeWriter::new(config);
        let mut init = InitTracker::default();

        writer.comment(format!(
            "Translated from MTdV by mtdv (backend: {}).",
            self.kind()
        ));
        writer.snippet(RUNTIME);
        writer.blank();
        writer.open("def program():");
        writer.line("return (");
        self.literal(&mut writer, &mut init, program, 1)?;
        writer.line(")");
        writer.close();
        writer.blank();
        writer.blank();
        writer.open("if __name__ == '__main__':");
        writer.line(format!("sys.setrecursionlimit({RECURSION_LIMIT})"));
        writer.line("main()");
        writer.close();

        Ok(writer.finish())
    }
}

impl PureStateThreading {
    /// Emits one tuple element per node, `level` levels deeper than the
    /// enclosing `return (`.
    fn literal(
        &self,
        writer: &mut CodeWriter,
        init: &mut InitTracker,
        nodes: &[Node],
        level: usize,
    ) -> Result<(), GenerateError> {
        let indent = "    ".repeat(level);

        for node in nodes {
            match node {
                Node::Leaf(instruction) => {
                    let element = match instruction {
                        Instruction::Init if init.first() => "('init',)".to_string(),
                        Instruction::Init => "('nop',)".to_string(),
                        Instruction::Pause => "('pause',)".to_string(),
                        Instruction::MoveLeft => "('move_left',)".to_string(),
                        Instruction::MoveRight => "('move_right',)".to_string(),
                        Instruction::WriteZero => "('write', 0)".to_string(),
                        Instruction::WriteOne => "('write', 1)".to_string(),
                    };
                    writer.snippet(&format!("{indent}{element},"));
                }
                Node::Halt => writer.snippet(&format!("{indent}('halt',),")),
                Node::Conditional { condition, body } if body.is_empty() => {
                    writer.snippet(&format!("{indent}('if', {condition}, ()),"));
                }
                Node::Conditional { condition, body } => {
                    writer.snippet(&format!("{indent}('if', {condition}, ("));
                    self.literal(writer, init, body, level + 1)?;
                    writer.snippet(&format!("{indent})),"));
                }
                Node::Loop { body } if body.is_empty() => {
                    writer.snippet(&format!("{indent}('loop', ()),"));
                }
                Node::Loop { body } => {
                    writer.snippet(&format!("{indent}('loop', ("));
                    self.literal(writer, init, body, level + 1)?;
                    writer.snippet(&format!("{indent})),"));
                }
                Node::EndOfProgram => {
                    return Err(GenerateError::UnsupportedNode {
                        backend: self.kind(),
                        node: node.clone(),
                    });
                }
            }
        }

        Ok(())
    }
}
