use crate::ast::Node;

use super::{
    Backend, BackendKind, GenerateError, GeneratorConfig,
    imperative::{self, InitTracker},
    writer::CodeWriter,
};

pub(crate) const UNROLL_WARNING: &str =
    "WARNING: loop unrolled once; the step machine cannot repeat a loop body";

/// Top-level nodes become numbered steps driven by a dispatcher loop over a
/// step counter. Nested blocks are inlined into their step.
#[derive(Debug, Clone, Copy, Default)]
pub struct StepMachine;

impl Backend for StepMachine {
    fn kind(&self) -> BackendKind {
        BackendKind::StepMachine
    }

    fn generate(
        &self,
        program: &[Node],
        config: &GeneratorConfig,
    ) -> Result<Vec<String>, GenerateError> {
        let mut writer = CodeWriter::new(config);
        let mut init = InitTracker::default();

        imperative::begin(&mut writer, self.kind());

        if !program.is_empty() {
            writer.line("step = 0");
            writer.open(format!(
                "while program_continue and step < {}:",
                program.len()
            ));

            for (step, node) in program.iter().enumerate() {
                let keyword = if step == 0 { "if" } else { "elif" };
                writer.open(format!("{keyword} step == {step}:"));
                writer.comment(format!("step {step}: {}", node.summary()));
                self.inline(&mut writer, &mut init, node)?;
                writer.line(format!("step = {}", step + 1));
                writer.close();
            }

            writer.close();
        }

        imperative::end(&mut writer, None);
        Ok(writer.finish())
    }
}

impl StepMachine {
    fn inline(
        &self,
        writer: &mut CodeWriter,
        init: &mut InitTracker,
        node: &Node,
    ) -> Result<(), GenerateError> {
        match node {
            Node::Leaf(instruction) => imperative::leaf(writer, *instruction, init),
            Node::Halt => imperative::halt(writer),
            Node::Conditional { condition, body } => {
                writer.open(imperative::conditional_header(*condition));
                for child in body {
                    self.inline(writer, init, child)?;
                }
                writer.close();
            }
            Node::Loop { body } if body.is_empty() => writer.comment("empty loop"),
            Node::Loop { body } => {
                writer.comment(UNROLL_WARNING);
                for child in body {
                    self.inline(writer, init, child)?;
                }
            }
            Node::EndOfProgram => {
                return Err(GenerateError::UnsupportedNode {
                    backend: self.kind(),
                    node: node.clone(),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Bit, Instruction};

    fn run_program(lines: &[String]) -> Vec<&str> {
        let start = lines
            .iter()
            .position(|line| line == "def run_program():")
            .unwrap();
        lines[start + 2..]
            .iter()
            .take_while(|line| !line.is_empty())
            .map(|line| line.as_str())
            .collect()
    }

    #[test]
    fn test_steps() {
        let program = vec![
            Node::Leaf(Instruction::MoveLeft),
            Node::Conditional {
                condition: Bit::One,
                body: vec![Node::Halt],
            },
        ];
        let lines = StepMachine
            .generate(&program, &GeneratorConfig::default())
            .unwrap();

        assert_eq!(
            run_program(&lines),
            vec![
                "    step = 0",
                "    while program_continue and step < 2:",
                "        if step == 0:",
                "            # step 0: move left",
                "            if head > 0:",
                "                head -= 1",
                "            step = 1",
                "        elif step == 1:",
                "            # step 1: if the head reads 1 (1 node(s))",
                "            if 0 <= head < TAPE_LENGTH and tape[head] == 1:",
                "                program_continue = False",
                "                return",
                "            step = 2",
            ]
        );
    }

    #[test]
    fn test_loop_is_unrolled_with_warning() {
        let program = vec![Node::Loop {
            body: vec![Node::Leaf(Instruction::Pause)],
        }];
        let lines = StepMachine
            .generate(&program, &GeneratorConfig::default())
            .unwrap();

        assert!(lines.iter().any(|line| line.trim() == format!("# {UNROLL_WARNING}")));
        assert_eq!(
            lines.iter().filter(|line| line.trim() == "pause()").count(),
            1
        );
    }

    #[test]
    fn test_empty_program_is_a_no_op() {
        let lines = StepMachine
            .generate(&[], &GeneratorConfig::default())
            .unwrap();

        assert_eq!(run_program(&lines), vec!["    pass"]);
    }
}
