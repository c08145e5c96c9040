use miette::{Diagnostic, SourceOffset, SourceSpan};

use crate::{
    ast::error::StructuralError, codegen::GenerateError, lexer::error::LexerError,
    machine::error::RunError, parser::error::ParseError,
};

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum InnerError {
    #[error(transparent)]
    Lexer(#[from] LexerError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Structure(#[from] StructuralError),
    #[error(transparent)]
    Generate(#[from] GenerateError),
    #[error(transparent)]
    Run(#[from] RunError),
}

/// Represents a high-level error with diagnostic information for the user.
#[derive(PartialEq, Debug, thiserror::Error)]
#[error("{cause}")]
pub struct Error {
    /// The underlying cause of the error.
    pub cause: InnerError,
    /// The program text the error refers to.
    pub source_code: String,
    /// The location in the source code, when the stage that failed knows it.
    pub location: Option<SourceSpan>,
}

impl Error {
    pub fn from_error(source_code: impl Into<String>, cause: impl Into<InnerError>) -> Self {
        let source_code = source_code.into();
        let cause = cause.into();

        let location = match &cause {
            InnerError::Lexer(LexerError::UnexpectedCharacter { offset, .. }) => {
                Some(SourceSpan::new(SourceOffset::from(*offset), 1))
            }
            InnerError::Parse(ParseError::UnterminatedProgram(_)) => Some(SourceSpan::new(
                SourceOffset::from(source_code.trim_end().len()),
                0,
            )),
            InnerError::Parse(_)
            | InnerError::Structure(_)
            | InnerError::Generate(_)
            | InnerError::Run(_) => None,
        };

        Self {
            cause,
            source_code,
            location,
        }
    }
}

impl Diagnostic for Error {
    fn code<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        let c = match &self.cause {
            InnerError::Lexer(LexerError::UnexpectedCharacter { .. }) => {
                "LexerError::UnexpectedCharacter"
            }
            InnerError::Parse(ParseError::UnbalancedBlock(_)) => "ParseError::UnbalancedBlock",
            InnerError::Parse(ParseError::EndMarkerInsideBlock(_, _)) => {
                "ParseError::EndMarkerInsideBlock"
            }
            InnerError::Parse(ParseError::UnterminatedProgram(_)) => {
                "ParseError::UnterminatedProgram"
            }
            InnerError::Structure(StructuralError::DepthMismatch { .. }) => {
                "StructuralError::DepthMismatch"
            }
            InnerError::Structure(StructuralError::StackUnderflow { .. }) => {
                "StructuralError::StackUnderflow"
            }
            InnerError::Structure(StructuralError::UnclosedBlocks(_)) => {
                "StructuralError::UnclosedBlocks"
            }
            InnerError::Generate(GenerateError::UnsupportedNode { .. }) => {
                "GenerateError::UnsupportedNode"
            }
            InnerError::Generate(GenerateError::UnknownBackend(_)) => {
                "GenerateError::UnknownBackend"
            }
            InnerError::Generate(GenerateError::InvalidIndentWidth(_)) => {
                "GenerateError::InvalidIndentWidth"
            }
            InnerError::Run(RunError::StepLimitExceeded(_)) => "RunError::StepLimitExceeded",
            InnerError::Run(RunError::UnsupportedNode(_)) => "RunError::UnsupportedNode",
        };
        Some(Box::new(c))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        let msg = match &self.cause {
            InnerError::Lexer(LexerError::UnexpectedCharacter { .. }) => Some(
                "Valid symbols are I P G D 0 1 fin boucle si(0) si(1) } and #; comments start with %."
                    .to_string(),
            ),
            InnerError::Parse(ParseError::UnbalancedBlock(_)) => {
                Some("Remove the extra `}` or add the missing `boucle`/`si(..)` opener.".to_string())
            }
            InnerError::Parse(ParseError::EndMarkerInsideBlock(_, depth)) => Some(format!(
                "Close the {depth} open block(s) with `}}` before the end marker `#`."
            )),
            InnerError::Parse(ParseError::UnterminatedProgram(0)) => {
                Some("Add the end marker `#` after the last instruction.".to_string())
            }
            InnerError::Parse(ParseError::UnterminatedProgram(depth)) => Some(format!(
                "Close the {depth} open block(s) with `}}` and end the program with `#`."
            )),
            InnerError::Structure(_) => Some(
                "The block structure became inconsistent. Please report this if it persists."
                    .to_string(),
            ),
            InnerError::Generate(GenerateError::UnsupportedNode { .. }) => Some(
                "The end marker may only appear in the top-level instruction sequence.".to_string(),
            ),
            InnerError::Generate(GenerateError::UnknownBackend(_)) => None,
            InnerError::Generate(GenerateError::InvalidIndentWidth(_)) => {
                Some("Use an indent width of 1 or more.".to_string())
            }
            InnerError::Run(RunError::StepLimitExceeded(_)) => Some(
                "Raise the step limit or make sure every loop reaches `fin`.".to_string(),
            ),
            InnerError::Run(RunError::UnsupportedNode(_)) => Some(
                "The end marker may only appear in the top-level instruction sequence.".to_string(),
            ),
        };
        msg.map(|m| Box::new(m) as Box<dyn std::fmt::Display>)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = miette::LabeledSpan> + '_>> {
        self.location.map(|location| {
            Box::new(std::iter::once(miette::LabeledSpan::new_with_span(
                Some(format!("{}", self.cause)),
                location,
            ))) as Box<dyn Iterator<Item = miette::LabeledSpan>>
        })
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        self.location.map(|_| &self.source_code as &dyn miette::SourceCode)
    }
}
