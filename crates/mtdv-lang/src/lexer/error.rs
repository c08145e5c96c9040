use thiserror::Error;

#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub struct Position {
    pub line: u32,
    pub column: usize,
}

impl Default for Position {
    fn default() -> Self {
        Position { line: 1, column: 1 }
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum LexerError {
    #[error("Unexpected character at offset {offset} (line {}, column {}): `{excerpt}`", position.line, position.column)]
    UnexpectedCharacter {
        offset: usize,
        position: Position,
        /// Up to 40 characters of the unread input.
        excerpt: String,
    },
}
