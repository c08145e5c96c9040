pub mod error;

use std::fmt::{self, Display, Formatter};

use crate::{Token, TokenKind};
use error::ParseError;

/// A token together with the nesting depth at which it was read.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub struct DepthToken {
    pub token: Token,
    pub depth: usize,
}

impl DepthToken {
    pub fn new(token: Token, depth: usize) -> Self {
        Self { token, depth }
    }
}

impl Display for DepthToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{:>4} {:>3} {}", self.token.index, self.depth, self.token)
    }
}

/// Annotates every token with its nesting depth and checks block balance.
///
/// Openers are emitted at the current depth and then increase it; a closing
/// brace decreases the depth first and is emitted at the new depth. The end
/// marker is only accepted at depth 0, and everything after it is ignored.
pub fn assign_depths(tokens: &[Token]) -> Result<Vec<DepthToken>, ParseError> {
    let mut depth = 0usize;
    let mut annotated = Vec::with_capacity(tokens.len());

    for (position, token) in tokens.iter().enumerate() {
        match token.kind {
            TokenKind::LoopOpen | TokenKind::IfZeroOpen | TokenKind::IfOneOpen => {
                annotated.push(DepthToken::new(*token, depth));
                depth += 1;
            }
            TokenKind::BlockClose => {
                depth = depth
                    .checked_sub(1)
                    .ok_or(ParseError::UnbalancedBlock(*token))?;
                annotated.push(DepthToken::new(*token, depth));
            }
            TokenKind::EndMarker if depth > 0 => {
                return Err(ParseError::EndMarkerInsideBlock(*token, depth));
            }
            TokenKind::EndMarker => {
                annotated.push(DepthToken::new(*token, depth));
                let ignored = tokens.len() - position - 1;
                if ignored > 0 {
                    log::debug!("ignoring {ignored} token(s) after the end marker");
                }
                return Ok(annotated);
            }
            _ => annotated.push(DepthToken::new(*token, depth)),
        }
    }

    Err(ParseError::UnterminatedProgram(depth))
}
