pub mod error;

use std::ptr;

use itertools::Itertools;

use crate::ast::{Bit, Instruction, Node};
use crate::codegen::reachable;
use error::RunError;

pub const TAPE_LENGTH: usize = 1000;
pub const HEAD_START: usize = 30;
pub const DISPLAY_WIDTH: usize = 61;
pub const DEFAULT_MAX_STEPS: usize = 1_000_000;

/// Called on every executed `P`.
pub trait PauseHandler {
    fn pause(&mut self, machine: &Machine);
}

impl<F> PauseHandler for F
where
    F: FnMut(&Machine),
{
    fn pause(&mut self, machine: &Machine) {
        self(machine)
    }
}

/// Tape, head and continuation flag. Every operation consumes the machine
/// and returns the next state.
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct Machine {
    tape: Vec<Bit>,
    head: usize,
    running: bool,
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
enum Frame<'a> {
    Block { nodes: &'a [Node], pc: usize },
    Loop { body: &'a [Node] },
}

impl Machine {
    pub fn new() -> Self {
        Self {
            tape: vec![Bit::Zero; TAPE_LENGTH],
            head: HEAD_START,
            running: true,
        }
    }

    /// A fresh machine with `1`s written over each `(start, length)` range,
    /// clamped to the tape.
    pub fn with_ranges(ranges: &[(i64, i64)]) -> Self {
        let mut machine = Self::new();
        for &(start, length) in ranges {
            let from = start.clamp(0, TAPE_LENGTH as i64) as usize;
            let to = start
                .saturating_add(length)
                .clamp(0, TAPE_LENGTH as i64) as usize;
            if from < to {
                machine.tape[from..to].fill(Bit::One);
            }
        }
        machine
    }

    pub fn tape(&self) -> &[Bit] {
        &self.tape
    }

    pub fn head(&self) -> usize {
        self.head
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn read(&self) -> Option<Bit> {
        self.tape.get(self.head).copied()
    }

    pub fn init(self) -> Self {
        Self {
            tape: vec![Bit::Zero; TAPE_LENGTH],
            head: HEAD_START,
            ..self
        }
    }

    pub fn move_left(self) -> Self {
        Self {
            head: self.head.saturating_sub(1),
            ..self
        }
    }

    pub fn move_right(self) -> Self {
        Self {
            head: (self.head + 1).min(TAPE_LENGTH - 1),
            ..self
        }
    }

    pub fn write(mut self, bit: Bit) -> Self {
        if let Some(cell) = self.tape.get_mut(self.head) {
            *cell = bit;
        }
        self
    }

    pub fn halt(self) -> Self {
        Self {
            running: false,
            ..self
        }
    }

    /// The first cells of the tape and a marker under the head.
    pub fn display(&self) -> [String; 2] {
        [
            self.tape.iter().take(DISPLAY_WIDTH).join(""),
            format!("{}X", " ".repeat(self.head)),
        ]
    }

    /// Executes `program` until it runs out of nodes or halts.
    ///
    /// Each executed node and each loop iteration costs one step; running
    /// past `max_steps` fails instead of looping forever.
    pub fn run<P: PauseHandler>(
        mut self,
        program: &[Node],
        pause: &mut P,
        max_steps: usize,
    ) -> Result<Machine, RunError> {
        let program = reachable(program);
        let first_init = first_init(program);
        let mut frames = vec![Frame::Block {
            nodes: program,
            pc: 0,
        }];
        let mut steps = 0usize;

        while self.running {
            let Some(frame) = frames.last_mut() else {
                break;
            };

            let node = match frame {
                Frame::Block { nodes, pc } => {
                    let current = *nodes;
                    match current.get(*pc) {
                        Some(node) => {
                            *pc += 1;
                            node
                        }
                        None => {
                            frames.pop();
                            continue;
                        }
                    }
                }
                Frame::Loop { body } => {
                    let body = *body;
                    steps += 1;
                    if steps > max_steps {
                        return Err(RunError::StepLimitExceeded(max_steps));
                    }
                    frames.push(Frame::Block {
                        nodes: body,
                        pc: 0,
                    });
                    continue;
                }
            };

            steps += 1;
            if steps > max_steps {
                return Err(RunError::StepLimitExceeded(max_steps));
            }

            match node {
                Node::Leaf(Instruction::Init) => {
                    if first_init.is_some_and(|init| ptr::eq(init, node)) {
                        self = self.init();
                    }
                }
                Node::Leaf(Instruction::Pause) => pause.pause(&self),
                Node::Leaf(Instruction::MoveLeft) => self = self.move_left(),
                Node::Leaf(Instruction::MoveRight) => self = self.move_right(),
                Node::Leaf(Instruction::WriteZero) => self = self.write(Bit::Zero),
                Node::Leaf(Instruction::WriteOne) => self = self.write(Bit::One),
                Node::Halt => self = self.halt(),
                Node::Conditional { condition, body } => {
                    if self.read() == Some(*condition) && !body.is_empty() {
                        frames.push(Frame::Block {
                            nodes: body.as_slice(),
                            pc: 0,
                        });
                    }
                }
                Node::Loop { body } => {
                    if !body.is_empty() {
                        frames.push(Frame::Loop {
                            body: body.as_slice(),
                        });
                    }
                }
                Node::EndOfProgram => return Err(RunError::UnsupportedNode(node.clone())),
            }
        }

        log::debug!("machine stopped after {steps} step(s) at head {}", self.head);
        Ok(self)
    }
}

/// The `Init` node that resets the tape: the first one in source order.
fn first_init(program: &[Node]) -> Option<&Node> {
    let mut pending = vec![program.iter()];

    while let Some(siblings) = pending.last_mut() {
        match siblings.next() {
            None => {
                pending.pop();
            }
            Some(node @ Node::Leaf(Instruction::Init)) => return Some(node),
            Some(node) => {
                if let Some(body) = node.body() {
                    pending.push(body.iter());
                }
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;
    use rstest::rstest;

    fn run(source: &str, machine: Machine) -> Result<Machine, RunError> {
        let program = parse(&[source]).unwrap();
        machine.run(&program, &mut |_: &Machine| {}, DEFAULT_MAX_STEPS)
    }

    #[test]
    fn test_straight_line_program() {
        let machine = run("I G G 1 D D D 0 fin #", Machine::new()).unwrap();

        assert_eq!(machine.tape()[28], Bit::One);
        assert_eq!(machine.tape()[31], Bit::Zero);
        assert_eq!(machine.head(), 31);
        assert!(!machine.is_running());
    }

    #[rstest]
    #[case::left_at_zero(Machine { head: 0, ..Machine::new() }, Machine::move_left as fn(Machine) -> Machine, 0)]
    #[case::right_at_end(Machine { head: TAPE_LENGTH - 1, ..Machine::new() }, Machine::move_right as fn(Machine) -> Machine, TAPE_LENGTH - 1)]
    #[case::left(Machine::new(), Machine::move_left as fn(Machine) -> Machine, HEAD_START - 1)]
    #[case::right(Machine::new(), Machine::move_right as fn(Machine) -> Machine, HEAD_START + 1)]
    fn test_moves_are_clamped(
        #[case] machine: Machine,
        #[case] step: fn(Machine) -> Machine,
        #[case] expected: usize,
    ) {
        assert_eq!(step(machine).head(), expected);
    }

    #[rstest]
    #[case::one_cell("si(1) 0 } #", vec![(HEAD_START as i64, 1)], Bit::Zero)]
    #[case::zero_cell("si(1) 0 } #", vec![], Bit::Zero)]
    #[case::skipped("si(0) 1 } #", vec![(HEAD_START as i64, 1)], Bit::One)]
    #[case::taken("si(0) 1 } #", vec![], Bit::One)]
    fn test_conditional(
        #[case] source: &str,
        #[case] ranges: Vec<(i64, i64)>,
        #[case] expected: Bit,
    ) {
        let machine = run(source, Machine::with_ranges(&ranges)).unwrap();
        assert_eq!(machine.read(), Some(expected));
    }

    #[test]
    fn test_loop_runs_until_halt() {
        let machine = run(
            "boucle si(0) fin } D } #",
            Machine::with_ranges(&[(30, 5)]),
        )
        .unwrap();

        assert_eq!(machine.head(), 35);
        assert!(!machine.is_running());
    }

    #[test]
    fn test_halt_stops_the_whole_program() {
        let machine = run("boucle boucle fin } D } D #", Machine::new()).unwrap();

        assert_eq!(machine.head(), HEAD_START);
    }

    #[test]
    fn test_empty_loop_is_a_no_op() {
        let machine = run("boucle } D #", Machine::new()).unwrap();

        assert_eq!(machine.head(), HEAD_START + 1);
        assert!(machine.is_running());
    }

    #[test]
    fn test_only_first_init_resets() {
        let machine = run("I 1 D I 1 #", Machine::new()).unwrap();

        assert_eq!(machine.tape()[HEAD_START], Bit::One);
        assert_eq!(machine.tape()[HEAD_START + 1], Bit::One);
        assert_eq!(machine.head(), HEAD_START + 1);
    }

    #[test]
    fn test_init_clears_ranges() {
        let machine = run("I #", Machine::with_ranges(&[(0, 10)])).unwrap();

        assert!(machine.tape().iter().all(|bit| *bit == Bit::Zero));
    }

    #[test]
    fn test_step_limit() {
        let program = parse(&["boucle D } #"]).unwrap();

        assert_eq!(
            Machine::new().run(&program, &mut |_: &Machine| {}, 100),
            Err(RunError::StepLimitExceeded(100))
        );
    }

    #[test]
    fn test_pause_handler_sees_state() {
        let program = parse(&["D P D P #"]).unwrap();
        let mut heads = Vec::new();
        Machine::new()
            .run(
                &program,
                &mut |machine: &Machine| heads.push(machine.head()),
                DEFAULT_MAX_STEPS,
            )
            .unwrap();

        assert_eq!(heads, vec![HEAD_START + 1, HEAD_START + 2]);
    }

    #[rstest]
    #[case::inside(vec![(2, 3)], vec![2, 3, 4])]
    #[case::negative_start(vec![(-2, 4)], vec![0, 1])]
    #[case::past_end(vec![(998, 10)], vec![998, 999])]
    #[case::empty(vec![(5, 0)], vec![])]
    #[case::two_ranges(vec![(1, 1), (3, 1)], vec![1, 3])]
    fn test_with_ranges(#[case] ranges: Vec<(i64, i64)>, #[case] expected: Vec<usize>) {
        let machine = Machine::with_ranges(&ranges);
        let ones = machine
            .tape()
            .iter()
            .positions(|bit| *bit == Bit::One)
            .collect::<Vec<_>>();

        assert_eq!(ones, expected);
    }

    #[test]
    fn test_display() {
        let [cells, marker] = Machine::with_ranges(&[(0, 2)]).display();

        assert_eq!(cells.len(), DISPLAY_WIDTH);
        assert!(cells.starts_with("110"));
        assert_eq!(marker, format!("{}X", " ".repeat(HEAD_START)));
    }
}
