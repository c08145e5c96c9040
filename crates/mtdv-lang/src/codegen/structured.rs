use crate::ast::Node;

use super::{
    Backend, BackendKind, GenerateError, GeneratorConfig,
    imperative::{self, InitTracker},
    writer::CodeWriter,
};

/// Loops become `while program_continue:` blocks inside a single
/// `run_program` routine.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuredLoop;

impl Backend for StructuredLoop {
    fn kind(&self) -> BackendKind {
        BackendKind::StructuredLoop
    }

    fn generate(
        &self,
        program: &[Node],
        config: &GeneratorConfig,
    ) -> Result<Vec<String>, GenerateError> {
        let mut writer = CodeWriter::new(config);
        let mut init = InitTracker::default();

        imperative::begin(&mut writer, self.kind());
        self.block(&mut writer, &mut init, program)?;
        imperative::end(&mut writer, None);

        Ok(writer.finish())
    }
}

impl StructuredLoop {
    fn block(
        &self,
        writer: &mut CodeWriter,
        init: &mut InitTracker,
        nodes: &[Node],
    ) -> Result<(), GenerateError> {
        for node in nodes {
            match node {
                Node::Leaf(instruction) => imperative::leaf(writer, *instruction, init),
                Node::Halt => imperative::halt(writer),
                Node::Conditional { condition, body } => {
                    writer.open(imperative::conditional_header(*condition));
                    self.block(writer, init, body)?;
                    writer.close();
                }
                Node::Loop { body } if body.is_empty() => writer.comment("empty loop"),
                Node::Loop { body } => {
                    writer.open("while program_continue:");
                    self.block(writer, init, body)?;
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
