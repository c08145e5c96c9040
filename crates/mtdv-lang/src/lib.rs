//! `mtdv-lang` provides the lexer, nesting parser, tree builder and code
//! generators for MTdV, a tiny language driving a read/write head over a
//! 1000-cell tape.
//!
//! ## Examples
//!
//! ```rust
//! use mtdv_lang::{BackendKind, GeneratorConfig, Machine, Node};
//!
//! let lines = ["I G G 1", "D D D 0 fin", "#"];
//!
//! // Parse into the instruction tree
//! let program = mtdv_lang::parse(&lines).unwrap();
//! assert_eq!(program.last(), Some(&Node::EndOfProgram));
//!
//! // Translate into Python
//! let python = mtdv_lang::translate(&lines, BackendKind::StructuredLoop, &GeneratorConfig::default()).unwrap();
//! assert!(python.iter().any(|line| line == "def main():"));
//!
//! // Or run it directly
//! let machine = Machine::new().run(&program, &mut |_: &Machine| {}, 1_000).unwrap();
//! assert_eq!(machine.head(), 31);
//! ```
mod ast;
mod codegen;
mod error;
mod lexer;
mod machine;
mod parser;

use error::InnerError;

pub use ast::error::StructuralError;
pub use ast::{Bit, Instruction, Node, Program, build_tree, render_tree};
pub use codegen::{
    Backend, BackendKind, GenerateError, GeneratorConfig, PureStateThreading, RecursiveProcedure,
    StepMachine, StructuredLoop, generate, generate_with_config, reachable,
};
pub use error::Error;
pub use lexer::error::{LexerError, Position};
pub use lexer::token::{Token, TokenKind};
pub use lexer::tokenize;
pub use machine::error::RunError;
pub use machine::{
    DEFAULT_MAX_STEPS, DISPLAY_WIDTH, HEAD_START, Machine, PauseHandler, TAPE_LENGTH,
};
pub use parser::error::ParseError;
pub use parser::{DepthToken, assign_depths};

/// Joins source lines into the text the lexer reads.
pub fn source_text<S: AsRef<str>>(lines: &[S]) -> String {
    lines.iter().map(|line| line.as_ref()).collect::<Vec<_>>().join("\n")
}

pub fn tokenize_lines<S: AsRef<str>>(lines: &[S]) -> Result<Vec<Token>, Error> {
    let code = source_text(lines);
    tokenize(&code).map_err(|e| Error::from_error(code.as_str(), e))
}

/// Tokenizes the lines and annotates every token with its nesting depth.
pub fn depth_tokens<S: AsRef<str>>(lines: &[S]) -> Result<Vec<DepthToken>, Error> {
    let code = source_text(lines);
    depth_tokens_of(&code)
}

/// Parses the lines into the instruction tree.
pub fn parse<S: AsRef<str>>(lines: &[S]) -> Result<Program, Error> {
    let code = source_text(lines);
    let tokens = depth_tokens_of(&code)?;
    build_tree(&tokens).map_err(|e| Error::from_error(code.as_str(), e))
}

/// Parses the lines and renders them with one backend. Nothing is produced
/// unless every stage succeeds.
pub fn translate<S: AsRef<str>>(
    lines: &[S],
    backend: BackendKind,
    config: &GeneratorConfig,
) -> Result<Vec<String>, Error> {
    let program = parse(lines)?;
    generate_with_config(&program, backend, config)
        .map_err(|e| Error::from_error(source_text(lines), e))
}

fn depth_tokens_of(code: &str) -> Result<Vec<DepthToken>, Error> {
    let tokens = tokenize(code).map_err(|e| Error::from_error(code, e))?;
    log::debug!("{} token(s)", tokens.len());
    assign_depths(&tokens).map_err(|e| Error::from_error(code, InnerError::from(e)))
}
