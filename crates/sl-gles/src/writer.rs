use std::fmt;

const INDENT: &str = "    ";

/// Append-only text builder for generated source.
///
/// Lines are either written whole with [`CodeWriter::write_line`] or assembled with
/// [`CodeWriter::begin_line`], any number of [`CodeWriter::write`] calls and a closing
/// [`CodeWriter::end_line`].
#[derive(Debug, Default)]
pub struct CodeWriter {
    buffer: String,
}

impl CodeWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    pub fn begin_line(&mut self, indent: usize) {
        for _ in 0..indent {
            self.buffer.push_str(INDENT);
        }
    }

    pub fn end_line(&mut self, suffix: &str) {
        self.buffer.push_str(suffix);
        self.buffer.push('\n');
    }

    /// Writes a complete line. Empty lines carry no indentation.
    pub fn write_line(&mut self, indent: usize, line: &str) {
        if !line.is_empty() {
            self.begin_line(indent);
        }
        self.end_line(line);
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    pub fn into_string(self) -> String {
        self.buffer
    }
}

impl fmt::Write for CodeWriter {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.buffer.push_str(s);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt::Write as _;

    #[test]
    fn assembles_indented_lines() {
        let mut w = CodeWriter::new();
        w.write_line(0, "void f() {");
        w.begin_line(1);
        let _ = write!(w, "x = {};", 1);
        w.end_line("");
        w.write_line(1, "");
        w.write_line(0, "}");
        assert_eq!(w.as_str(), "void f() {\n    x = 1;\n\n}\n");
    }
}
