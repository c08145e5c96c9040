use crate::{DepthToken, TokenKind};

use super::{
    Program,
    error::StructuralError,
    node::{Bit, Instruction, Node},
};

#[derive(Debug, Clone, Copy)]
enum BlockKind {
    Loop,
    Conditional(Bit),
}

#[derive(Debug)]
struct Frame {
    depth: usize,
    kind: BlockKind,
    body: Vec<Node>,
}

impl Frame {
    fn into_node(self) -> Node {
        match self.kind {
            BlockKind::Loop => Node::Loop { body: self.body },
            BlockKind::Conditional(condition) => Node::Conditional {
                condition,
                body: self.body,
            },
        }
    }
}

/// Open containers, innermost last. The root body sits below every frame at
/// depth 0 and can never be popped.
#[derive(Debug, Default)]
struct FrameStack {
    root: Vec<Node>,
    frames: Vec<Frame>,
}

impl FrameStack {
    fn depth(&self) -> usize {
        self.frames.last().map_or(0, |frame| frame.depth)
    }

    fn body(&mut self) -> &mut Vec<Node> {
        match self.frames.last_mut() {
            Some(frame) => &mut frame.body,
            None => &mut self.root,
        }
    }

    fn open(&mut self, depth: usize, kind: BlockKind) {
        self.frames.push(Frame {
            depth: depth + 1,
            kind,
            body: Vec::new(),
        });
    }

    fn close(&mut self, index: usize) -> Result<(), StructuralError> {
        let frame = self
            .frames
            .pop()
            .ok_or(StructuralError::StackUnderflow { index })?;
        let node = frame.into_node();
        self.body().push(node);
        Ok(())
    }

    fn finish(self) -> Result<Program, StructuralError> {
        if self.frames.is_empty() {
            Ok(self.root)
        } else {
            Err(StructuralError::UnclosedBlocks(self.frames.len()))
        }
    }
}

/// Builds the instruction tree from depth-annotated tokens.
///
/// Every token must belong to the innermost open block; a depth that
/// disagrees with the frame stack is reported rather than repaired.
pub fn build_tree(tokens: &[DepthToken]) -> Result<Program, StructuralError> {
    let mut stack = FrameStack::default();

    for DepthToken { token, depth } in tokens.iter().copied() {
        if token.kind == TokenKind::BlockClose && stack.frames.is_empty() {
            return Err(StructuralError::StackUnderflow { index: token.index });
        }

        let found = match token.kind {
            TokenKind::BlockClose => depth + 1,
            _ => depth,
        };
        if stack.depth() != found {
            return Err(StructuralError::DepthMismatch {
                index: token.index,
                expected: stack.depth(),
                found,
            });
        }

        match token.kind {
            TokenKind::LoopOpen => stack.open(depth, BlockKind::Loop),
            TokenKind::IfZeroOpen => stack.open(depth, BlockKind::Conditional(Bit::Zero)),
            TokenKind::IfOneOpen => stack.open(depth, BlockKind::Conditional(Bit::One)),
            TokenKind::BlockClose => stack.close(token.index)?,
            TokenKind::Halt => stack.body().push(Node::Halt),
            TokenKind::EndMarker => {
                stack.root.push(Node::EndOfProgram);
                break;
            }
            TokenKind::Init => stack.body().push(Node::Leaf(Instruction::Init)),
            TokenKind::Pause => stack.body().push(Node::Leaf(Instruction::Pause)),
            TokenKind::MoveLeft => stack.body().push(Node::Leaf(Instruction::MoveLeft)),
            TokenKind::MoveRight => stack.body().push(Node::Leaf(Instruction::MoveRight)),
            TokenKind::WriteZero => stack.body().push(Node::Leaf(Instruction::WriteZero)),
            TokenKind::WriteOne => stack.body().push(Node::Leaf(Instruction::WriteOne)),
        }
    }

    let program = stack.finish()?;
    log::debug!("built tree with {} top-level node(s)", program.len());
    Ok(program)
}
