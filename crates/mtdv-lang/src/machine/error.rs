use thiserror::Error;

use crate::ast::Node;

#[derive(Error, Debug, PartialEq)]
pub enum RunError {
    #[error("Step limit of {0} exceeded; the program may not terminate")]
    StepLimitExceeded(usize),
    #[error("Cannot execute `{0}` inside a block")]
    UnsupportedNode(Node),
}
