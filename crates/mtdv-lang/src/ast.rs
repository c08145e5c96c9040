pub mod builder;
pub mod error;
pub mod node;

pub use builder::build_tree;
pub use node::{Bit, Instruction, Node};

pub type Program = Vec<Node>;

const TREE_INDENT: &str = "  ";

/// Renders the instruction tree one node per line, children indented below
/// their block.
pub fn render_tree(program: &[Node]) -> Vec<String> {
    let mut lines = Vec::new();
    let mut pending = vec![(0usize, program.iter())];

    while let Some((depth, siblings)) = pending.last_mut() {
        let depth = *depth;
        let Some(node) = siblings.next() else {
            pending.pop();
            continue;
        };

        lines.push(format!("{}{}", TREE_INDENT.repeat(depth), node.label()));
        if let Some(body) = node.body() {
            pending.push((depth + 1, body.iter()));
        }
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_tree() {
        let program = vec![
            Node::Leaf(Instruction::Init),
            Node::Loop {
                body: vec![
                    Node::Conditional {
                        condition: Bit::Zero,
                        body: vec![Node::Leaf(Instruction::MoveRight)],
                    },
                    Node::Halt,
                ],
            },
            Node::Conditional {
                condition: Bit::One,
                body: vec![],
            },
            Node::EndOfProgram,
        ];

        assert_eq!(
            render_tree(&program),
            vec![
                "Init",
                "Loop",
                "  If(0)",
                "    MoveRight",
                "  Halt",
                "If(1)",
                "EndOfProgram",
            ]
        );
    }

    #[test]
    fn test_render_empty_tree() {
        assert!(render_tree(&[]).is_empty());
    }
}
