use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum StructuralError {
    #[error("Token {index} is at depth {found} but the innermost open block is at depth {expected}")]
    DepthMismatch {
        index: usize,
        expected: usize,
        found: usize,
    },
    #[error("Token {index} closes a block but no block is open")]
    StackUnderflow { index: usize },
    #[error("{0} block(s) are still open at the end of the program")]
    UnclosedBlocks(usize),
}
