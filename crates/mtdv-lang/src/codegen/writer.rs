use super::GeneratorConfig;

/// Width of one indentation level in the built-in Python snippets.
const SNIPPET_INDENT: usize = 4;

/// Line-oriented Python emitter that tracks indentation and empty blocks.
#[derive(Clone, Debug)]
pub(crate) struct CodeWriter {
    indent_width: usize,
    level: usize,
    lines: Vec<String>,
    statements: usize,
    blocks: Vec<usize>,
}

impl CodeWriter {
    pub(crate) fn new(config: &GeneratorConfig) -> Self {
        Self {
            indent_width: config.indent_width,
            level: 0,
            lines: Vec::new(),
            statements: 0,
            blocks: Vec::new(),
        }
    }

    /// Appends a statement at the current level.
    pub(crate) fn line(&mut self, code: impl AsRef<str>) {
        self.push(self.level, code.as_ref());
        self.statements += 1;
    }

    /// Comments do not count as statements, so a block holding only
    /// comments still gets a `pass`.
    pub(crate) fn comment(&mut self, text: impl AsRef<str>) {
        self.push(self.level, &format!("# {}", text.as_ref()));
    }

    /// Appends a declaration such as `global`, which on its own does not
    /// make a block non-empty.
    pub(crate) fn declare(&mut self, code: impl AsRef<str>) {
        self.push(self.level, code.as_ref());
    }

    pub(crate) fn blank(&mut self) {
        self.lines.push(String::new());
    }

    pub(crate) fn open(&mut self, header: impl AsRef<str>) {
        self.line(header);
        self.blocks.push(self.statements);
        self.level += 1;
    }

    pub(crate) fn close(&mut self) {
        if let Some(start) = self.blocks.pop() {
            if self.statements == start {
                self.line("pass");
            }
            self.level = self.level.saturating_sub(1);
        }
    }

    /// Appends a fixed snippet written with 4-space indentation, re-indented
    /// relative to the current level.
    pub(crate) fn snippet(&mut self, code: &str) {
        for line in code.lines() {
            let trimmed = line.trim_start_matches(' ');
            if trimmed.is_empty() {
                self.blank();
                continue;
            }

            let depth = (line.len() - trimmed.len()) / SNIPPET_INDENT;
            self.push(self.level + depth, trimmed);
            self.statements += 1;
        }
    }

    pub(crate) fn finish(mut self) -> Vec<String> {
        while !self.blocks.is_empty() {
            self.close();
        }
        self.lines
    }

    fn push(&mut self, level: usize, code: &str) {
        self.lines
            .push(format!("{}{}", " ".repeat(level * self.indent_width), code));
    }
}
