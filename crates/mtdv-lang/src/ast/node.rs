use std::fmt::{self, Display, Formatter};

use itertools::Itertools;

use crate::TokenKind;

#[derive(PartialEq, Eq, Debug, Clone, Copy, Hash, Default)]
pub enum Bit {
    #[default]
    Zero,
    One,
}

impl Bit {
    pub fn value(&self) -> u8 {
        match self {
            Bit::Zero => 0,
            Bit::One => 1,
        }
    }
}

impl Display for Bit {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}", self.value())
    }
}

/// Primitive tape instructions.
#[derive(PartialEq, Eq, Debug, Clone, Copy, Hash)]
pub enum Instruction {
    Init,
    Pause,
    MoveLeft,
    MoveRight,
    WriteZero,
    WriteOne,
}

impl Instruction {
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Init => Some(Instruction::Init),
            TokenKind::Pause => Some(Instruction::Pause),
            TokenKind::MoveLeft => Some(Instruction::MoveLeft),
            TokenKind::MoveRight => Some(Instruction::MoveRight),
            TokenKind::WriteZero => Some(Instruction::WriteZero),
            TokenKind::WriteOne => Some(Instruction::WriteOne),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Instruction::Init => "I",
            Instruction::Pause => "P",
            Instruction::MoveLeft => "G",
            Instruction::MoveRight => "D",
            Instruction::WriteZero => "0",
            Instruction::WriteOne => "1",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Instruction::Init => "init",
            Instruction::Pause => "pause",
            Instruction::MoveLeft => "move left",
            Instruction::MoveRight => "move right",
            Instruction::WriteZero => "write 0",
            Instruction::WriteOne => "write 1",
        }
    }
}

#[derive(PartialEq, Eq, Debug, Clone)]
pub enum Node {
    Leaf(Instruction),
    Halt,
    Conditional { condition: Bit, body: Vec<Node> },
    Loop { body: Vec<Node> },
    EndOfProgram,
}

impl Node {
    pub fn body(&self) -> Option<&[Node]> {
        match self {
            Node::Conditional { body, .. } | Node::Loop { body } => Some(body),
            _ => None,
        }
    }

    /// One-line description used in generated comments.
    pub fn summary(&self) -> String {
        match self {
            Node::Leaf(instruction) => instruction.name().to_string(),
            Node::Halt => "halt".to_string(),
            Node::Conditional { condition, body } => {
                format!("if the head reads {condition} ({} node(s))", body.len())
            }
            Node::Loop { body } => format!("loop ({} node(s))", body.len()),
            Node::EndOfProgram => "end of program".to_string(),
        }
    }

    pub(crate) fn label(&self) -> String {
        match self {
            Node::Leaf(instruction) => format!("{instruction:?}"),
            Node::Halt => "Halt".to_string(),
            Node::Conditional { condition, .. } => format!("If({condition})"),
            Node::Loop { .. } => "Loop".to_string(),
            Node::EndOfProgram => "EndOfProgram".to_string(),
        }
    }
}

/// Formats the node back into MTdV source.
impl Display for Node {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        match self {
            Node::Leaf(instruction) => write!(f, "{}", instruction.symbol()),
            Node::Halt => write!(f, "fin"),
            Node::Conditional { condition, body } if body.is_empty() => {
                write!(f, "si({condition}) }}")
            }
            Node::Conditional { condition, body } => {
                write!(f, "si({condition}) {} }}", body.iter().join(" "))
            }
            Node::Loop { body } if body.is_empty() => write!(f, "boucle }}"),
            Node::Loop { body } => write!(f, "boucle {} }}", body.iter().join(" ")),
            Node::EndOfProgram => write!(f, "#"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::leaf(Node::Leaf(Instruction::WriteOne), "1")]
    #[case::halt(Node::Halt, "fin")]
    #[case::empty_conditional(Node::Conditional { condition: Bit::One, body: vec![] }, "si(1) }")]
    #[case::nested(
        Node::Loop {
            body: vec![
                Node::Conditional { condition: Bit::Zero, body: vec![Node::Leaf(Instruction::MoveRight)] },
                Node::Halt,
            ],
        },
        "boucle si(0) D } fin }"
    )]
    #[case::empty_loop(Node::Loop { body: vec![] }, "boucle }")]
    #[case::end(Node::EndOfProgram, "#")]
    fn test_display(#[case] node: Node, #[case] expected: &str) {
        assert_eq!(node.to_string(), expected);
    }

    #[rstest]
    #[case::init(TokenKind::Init, Some(Instruction::Init))]
    #[case::write_zero(TokenKind::WriteZero, Some(Instruction::WriteZero))]
    #[case::halt(TokenKind::Halt, None)]
    #[case::opener(TokenKind::LoopOpen, None)]
    fn test_from_token(#[case] kind: TokenKind, #[case] expected: Option<Instruction>) {
        assert_eq!(Instruction::from_token(kind), expected);
    }

    #[test]
    fn test_summary() {
        let node = Node::Conditional {
            condition: Bit::One,
            body: vec![Node::Halt, Node::Halt],
        };
        assert_eq!(node.summary(), "if the head reads 1 (2 node(s))");
    }
}
