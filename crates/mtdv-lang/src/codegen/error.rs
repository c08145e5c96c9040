use thiserror::Error;

use crate::ast::Node;

use super::BackendKind;

#[derive(Error, Debug, PartialEq)]
pub enum GenerateError {
    #[error("The {backend} backend cannot render `{node}` inside a block")]
    UnsupportedNode { backend: BackendKind, node: Node },
    #[error(
        "Unknown backend `{0}`, expected one of: structured-loop, step-machine, recursive-procedure, pure-state-threading"
    )]
    UnknownBackend(String),
    #[error("Indent width must be at least 1, got {0}")]
    InvalidIndentWidth(usize),
}
