pub mod error;
mod imperative;
mod pure_state;
mod recursive;
mod step_machine;
mod structured;
mod writer;

use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

use crate::ast::Node;
pub use error::GenerateError;
pub use pure_state::PureStateThreading;
pub use recursive::RecursiveProcedure;
pub use step_machine::StepMachine;
pub use structured::StructuredLoop;

/// Emission strategy for loops and sequencing in the generated program.
#[derive(PartialEq, Eq, Debug, Clone, Copy, Hash, Default)]
pub enum BackendKind {
    #[default]
    StructuredLoop,
    StepMachine,
    RecursiveProcedure,
    PureStateThreading,
}

impl BackendKind {
    pub const ALL: [BackendKind; 4] = [
        BackendKind::StructuredLoop,
        BackendKind::StepMachine,
        BackendKind::RecursiveProcedure,
        BackendKind::PureStateThreading,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            BackendKind::StructuredLoop => "structured-loop",
            BackendKind::StepMachine => "step-machine",
            BackendKind::RecursiveProcedure => "recursive-procedure",
            BackendKind::PureStateThreading => "pure-state-threading",
        }
    }

    pub fn backend(&self) -> &'static dyn Backend {
        match self {
            BackendKind::StructuredLoop => &StructuredLoop,
            BackendKind::StepMachine => &StepMachine,
            BackendKind::RecursiveProcedure => &RecursiveProcedure,
            BackendKind::PureStateThreading => &PureStateThreading,
        }
    }
}

impl Display for BackendKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}", self.name())
    }
}

impl FromStr for BackendKind {
    type Err = GenerateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BackendKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| GenerateError::UnknownBackend(s.to_string()))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GeneratorConfig {
    /// Spaces per indentation level; must be at least 1.
    pub indent_width: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self { indent_width: 4 }
    }
}

/// A code generation strategy. Backends borrow the tree and never modify it.
pub trait Backend {
    fn kind(&self) -> BackendKind;

    /// Renders `program`, which must not contain `EndOfProgram`.
    fn generate(
        &self,
        program: &[Node],
        config: &GeneratorConfig,
    ) -> Result<Vec<String>, GenerateError>;
}

pub fn generate(program: &[Node], backend: BackendKind) -> Result<Vec<String>, GenerateError> {
    generate_with_config(program, backend, &GeneratorConfig::default())
}

pub fn generate_with_config(
    program: &[Node],
    backend: BackendKind,
    config: &GeneratorConfig,
) -> Result<Vec<String>, GenerateError> {
    if config.indent_width == 0 {
        return Err(GenerateError::InvalidIndentWidth(config.indent_width));
    }

    let nodes = reachable(program);
    log::debug!(
        "generating {} of {} top-level node(s) with the {backend} backend",
        nodes.len(),
        program.len()
    );

    let lines = backend.backend().generate(nodes, config)?;
    log::trace!("generated {} line(s)", lines.len());
    Ok(lines)
}

/// The top-level nodes before the first `EndOfProgram`.
pub fn reachable(program: &[Node]) -> &[Node] {
    let end = program
        .iter()
        .position(|node| matches!(node, Node::EndOfProgram))
        .unwrap_or(program.len());
    &program[..end]
}
