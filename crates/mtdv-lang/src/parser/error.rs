use thiserror::Error;

use crate::Token;

#[derive(Error, Debug, PartialEq)]
pub enum ParseError {
    #[error(
        "Unbalanced block: `{token}` at token {index} has no matching opener",
        token = .0,
        index = .0.index
    )]
    UnbalancedBlock(Token),
    #[error(
        "Unbalanced block: end marker `#` at token {index} is inside {depth} open block(s)",
        index = .0.index,
        depth = .1
    )]
    EndMarkerInsideBlock(Token, usize),
    #[error("Unterminated program: input ended at depth {0} without an end marker `#`")]
    UnterminatedProgram(usize),
}
