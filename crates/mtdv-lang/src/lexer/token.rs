use std::fmt::{self, Display, Formatter};

#[derive(PartialEq, Eq, PartialOrd, Ord, Debug, Clone, Copy, Hash)]
pub struct Token {
    /// 1-based position of the token in the stream.
    pub index: usize,
    pub kind: TokenKind,
}

#[derive(PartialEq, Eq, PartialOrd, Ord, Debug, Clone, Copy, Hash)]
pub enum TokenKind {
    EndMarker,
    BlockClose,
    Init,
    Pause,
    MoveLeft,
    MoveRight,
    WriteZero,
    WriteOne,
    Halt,
    LoopOpen,
    IfZeroOpen,
    IfOneOpen,
}

impl Token {
    pub fn new(index: usize, kind: TokenKind) -> Self {
        Self { index, kind }
    }
}

impl TokenKind {
    pub fn opens_block(&self) -> bool {
        matches!(
            self,
            TokenKind::LoopOpen | TokenKind::IfZeroOpen | TokenKind::IfOneOpen
        )
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            TokenKind::EndMarker => "#",
            TokenKind::BlockClose => "}",
            TokenKind::Init => "I",
            TokenKind::Pause => "P",
            TokenKind::MoveLeft => "G",
            TokenKind::MoveRight => "D",
            TokenKind::WriteZero => "0",
            TokenKind::WriteOne => "1",
            TokenKind::Halt => "fin",
            TokenKind::LoopOpen => "boucle",
            TokenKind::IfZeroOpen => "si(0)",
            TokenKind::IfOneOpen => "si(1)",
        }
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}", self.kind)
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}", self.symbol())
    }
}
