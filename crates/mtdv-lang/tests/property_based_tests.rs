//! Property-based tests for the MTdV pipeline.
use itertools::Itertools;
use mtdv_lang::{
    BackendKind, Bit, Instruction, Machine, Node, ParseError, RunError, TAPE_LENGTH, Token,
    TokenKind, assign_depths, generate, parse,
};
use proptest::prelude::*;

mod strategies {
    use super::*;

    const ALL_INSTRUCTIONS: [Instruction; 6] = [
        Instruction::Init,
        Instruction::Pause,
        Instruction::MoveLeft,
        Instruction::MoveRight,
        Instruction::WriteZero,
        Instruction::WriteOne,
    ];

    pub fn bit() -> impl Strategy<Value = Bit> {
        prop_oneof![Just(Bit::Zero), Just(Bit::One)]
    }

    /// Nodes as the builder produces them, without `EndOfProgram`.
    pub fn node(instructions: Vec<Instruction>) -> impl Strategy<Value = Node> {
        let leaf = prop_oneof![
            4 => prop::sample::select(instructions).prop_map(Node::Leaf),
            1 => Just(Node::Halt),
        ];

        leaf.prop_recursive(4, 48, 6, |inner| {
            prop_oneof![
                (bit(), prop::collection::vec(inner.clone(), 0..6))
                    .prop_map(|(condition, body)| Node::Conditional { condition, body }),
                prop::collection::vec(inner, 0..6).prop_map(|body| Node::Loop { body }),
            ]
        })
    }

    pub fn program() -> impl Strategy<Value = Vec<Node>> {
        prop::collection::vec(node(ALL_INSTRUCTIONS.to_vec()), 0..12)
    }

    /// Pause is left out so the machine never needs a handler that blocks.
    pub fn runnable_program() -> impl Strategy<Value = Vec<Node>> {
        let instructions = ALL_INSTRUCTIONS
            .into_iter()
            .filter(|instruction| *instruction != Instruction::Pause)
            .collect::<Vec<_>>();
        prop::collection::vec(node(instructions), 0..12)
    }

    pub fn token_kind() -> impl Strategy<Value = TokenKind> {
        prop::sample::select(vec![
            TokenKind::EndMarker,
            TokenKind::BlockClose,
            TokenKind::BlockClose,
            TokenKind::Init,
            TokenKind::MoveRight,
            TokenKind::Halt,
            TokenKind::LoopOpen,
            TokenKind::IfZeroOpen,
            TokenKind::IfOneOpen,
        ])
    }
}

fn contains(node: &Node, instruction: Instruction) -> bool {
    match node {
        Node::Leaf(leaf) => *leaf == instruction,
        Node::Conditional { body, .. } | Node::Loop { body } => {
            body.iter().any(|child| contains(child, instruction))
        }
        Node::Halt | Node::EndOfProgram => false,
    }
}

fn source(program: &[Node]) -> String {
    program.iter().map(|node| node.to_string()).chain(["#".to_string()]).join(" ")
}

/// Mirrors the depth rules on a plain counter.
fn expected_depth_result(kinds: &[TokenKind]) -> Result<(), ParseError> {
    let mut depth = 0usize;

    for (i, kind) in kinds.iter().enumerate() {
        let token = Token::new(i + 1, *kind);
        match kind {
            TokenKind::LoopOpen | TokenKind::IfZeroOpen | TokenKind::IfOneOpen => depth += 1,
            TokenKind::BlockClose if depth == 0 => return Err(ParseError::UnbalancedBlock(token)),
            TokenKind::BlockClose => depth -= 1,
            TokenKind::EndMarker if depth > 0 => {
                return Err(ParseError::EndMarkerInsideBlock(token, depth));
            }
            TokenKind::EndMarker => return Ok(()),
            _ => {}
        }
    }

    Err(ParseError::UnterminatedProgram(depth))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Formatting a tree as source and parsing it again gives the same tree
    #[test]
    fn tree_survives_source_formatting(program in strategies::program()) {
        let parsed = parse(&[source(&program)]).unwrap();
        let mut expected = program.clone();
        expected.push(Node::EndOfProgram);

        prop_assert_eq!(parsed, expected);
    }

    /// Depth assignment agrees with a simple counter, including every error
    #[test]
    fn depth_assignment_matches_counter(kinds in prop::collection::vec(strategies::token_kind(), 0..40)) {
        let tokens = kinds
            .iter()
            .enumerate()
            .map(|(i, kind)| Token::new(i + 1, *kind))
            .collect::<Vec<_>>();

        prop_assert_eq!(assign_depths(&tokens).map(|_| ()), expected_depth_result(&kinds));
    }

    /// A closing brace is emitted one level above its block's content
    #[test]
    fn depths_mirror_nesting(program in strategies::program()) {
        let tokens = mtdv_lang::tokenize(&source(&program)).unwrap();
        let annotated = assign_depths(&tokens).unwrap();
        let mut depth = 0usize;

        for token in annotated {
            match token.token.kind {
                TokenKind::LoopOpen | TokenKind::IfZeroOpen | TokenKind::IfOneOpen => {
                    prop_assert_eq!(token.depth, depth);
                    depth += 1;
                }
                TokenKind::BlockClose => {
                    depth -= 1;
                    prop_assert_eq!(token.depth, depth);
                }
                _ => prop_assert_eq!(token.depth, depth),
            }
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// The tape is allocated at most once, and only when the program has an Init
    #[test]
    fn init_is_emitted_once(program in strategies::program()) {
        let has_init = program.iter().any(|node| contains(node, Instruction::Init));

        for backend in [
            BackendKind::StructuredLoop,
            BackendKind::StepMachine,
            BackendKind::RecursiveProcedure,
        ] {
            let lines = generate(&program, backend).unwrap();
            let allocations = lines
                .iter()
                .filter(|line| line.trim() == "tape = [0] * TAPE_LENGTH")
                .count();
            prop_assert_eq!(allocations, usize::from(has_init));
        }

        let lines = generate(&program, BackendKind::PureStateThreading).unwrap();
        let inits = lines
            .iter()
            .filter(|line| line.trim() == "('init',),")
            .count();
        prop_assert_eq!(inits, usize::from(has_init));
    }

    /// The pure backend never assigns or mutates
    #[test]
    fn pure_backend_has_no_assignments(program in strategies::program()) {
        let lines = generate(&program, BackendKind::PureStateThreading).unwrap();

        for line in &lines {
            prop_assert!(!line.contains(" = "), "assignment in `{}`", line);
            prop_assert!(!line.contains("+="), "assignment in `{}`", line);
            prop_assert!(!line.contains("-="), "assignment in `{}`", line);
        }
    }

    /// The head never leaves the tape and the machine either stops or runs out of steps
    #[test]
    fn machine_stays_on_tape(
        program in strategies::runnable_program(),
        start in -50i64..1050,
        length in 0i64..100,
    ) {
        match Machine::with_ranges(&[(start, length)]).run(&program, &mut |_: &Machine| {}, 5_000) {
            Ok(machine) => {
                prop_assert!(machine.head() < TAPE_LENGTH);
                prop_assert_eq!(machine.tape().len(), TAPE_LENGTH);
            }
            Err(error) => prop_assert_eq!(error, RunError::StepLimitExceeded(5_000)),
        }
    }
}
