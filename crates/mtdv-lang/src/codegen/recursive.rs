use crate::ast::Node;

use super::{
    Backend, BackendKind, GenerateError, GeneratorConfig,
    imperative::{self, InitTracker},
    writer::CodeWriter,
};

pub(crate) const RECURSION_LIMIT: usize = 100_000;

/// Every loop becomes a uniquely named procedure that runs its body once and
/// calls itself again while the program is still running.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecursiveProcedure;

#[derive(Debug, Default)]
struct Emission {
    init: InitTracker,
    procedures: usize,
}

impl Backend for RecursiveProcedure {
    fn kind(&self) -> BackendKind {
        BackendKind::RecursiveProcedure
    }

    fn generate(
        &self,
        program: &[Node],
        config: &GeneratorConfig,
    ) -> Result<Vec<String>, GenerateError> {
        let mut writer = CodeWriter::new(config);
        let mut emission = Emission::default();

        imperative::begin(&mut writer, self.kind());
        self.block(&mut writer, &mut emission, program)?;
        imperative::end(&mut writer, Some(RECURSION_LIMIT));

        Ok(writer.finish())
    }
}

impl RecursiveProcedure {
    fn block(
        &self,
        writer: &mut CodeWriter,
        emission: &mut Emission,
        nodes: &[Node],
    ) -> Result<(), GenerateError> {
        for node in nodes {
            match node {
                Node::Leaf(instruction) => {
                    imperative::leaf(writer, *instruction, &mut emission.init)
                }
                Node::Halt => imperative::halt(writer),
                Node::Conditional { condition, body } => {
                    writer.open(imperative::conditional_header(*condition));
                    self.block(writer, emission, body)?;
                    writer.close();
                }
                Node::Loop { body } if body.is_empty() => writer.comment("empty loop"),
                Node::Loop { body } => {
                    emission.procedures += 1;
                    let name = format!("loop_{}", emission.procedures);

                    writer.open(format!("def {name}():"));
                    writer.declare(imperative::GLOBALS);
                    self.block(writer, emission, body)?;
                    writer.open("if program_continue:");
                    writer.line(format!("{name}()"));
                    writer.close();
                    writer.close();

                    writer.line(format!("{name}()"));
                    writer.open("if not program_continue:");
                    writer.line("return");
                    writer.close();
                }
                Node::EndOfProgram => {
                    return Err(GenerateError::UnsupportedNode {
                        backend: self.kind(),
                        node: node.clone(),
                    });
                }
            }
        }

        Ok(())
    }
}
