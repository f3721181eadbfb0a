//! C++ code emitter: an indentation-aware string builder for generated sources.

use std::fmt::Write;

/// A buffer for building C++ source text with consistent indentation.
#[derive(Debug)]
pub struct CppEmitter {
    buffer: String,
    indent_level: usize,
    indent_str: &'static str,
}

impl Default for CppEmitter {
    fn default() -> Self {
        Self::new()
    }
}

impl CppEmitter {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            indent_level: 0,
            indent_str: "    ",
        }
    }

    pub fn finish(self) -> String {
        self.buffer
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    /// Write a line with current indentation. Empty lines carry no trailing whitespace.
    pub fn line(&mut self, s: &str) {
        if !s.is_empty() {
            self.write_indent();
            self.buffer.push_str(s);
        }
        self.buffer.push('\n');
    }

    /// Write a formatted line with current indentation.
    pub fn linef(&mut self, args: std::fmt::Arguments<'_>) {
        self.write_indent();
        let _ = self.buffer.write_fmt(args);
        self.buffer.push('\n');
    }

    pub fn blank_line(&mut self) {
        self.buffer.push('\n');
    }

    /// Blank line unless the buffer is empty or already ends in one.
    pub fn separate(&mut self) {
        if !self.buffer.is_empty() && !self.buffer.ends_with("\n\n") {
            self.blank_line();
        }
    }

    pub fn write_indent(&mut self) {
        for _ in 0..self.indent_level {
            self.buffer.push_str(self.indent_str);
        }
    }

    pub fn indent(&mut self) {
        self.indent_level += 1;
    }

    pub fn dedent(&mut self) {
        if self.indent_level > 0 {
            self.indent_level -= 1;
        }
    }

    /// `header {` ... `}`
    pub fn block<F>(&mut self, header: &str, f: F)
    where
        F: FnOnce(&mut Self),
    {
        self.line(&format!("{header} {{"));
        self.indent();
        f(self);
        self.dedent();
        self.line("}");
    }

    /// `header {` ... `};`, as class and enum definitions need.
    pub fn type_block<F>(&mut self, header: &str, f: F)
    where
        F: FnOnce(&mut Self),
    {
        self.line(&format!("{header} {{"));
        self.indent();
        f(self);
        self.dedent();
        self.line("};");
    }

    /// An access label (`public:`) one level out from the members it introduces.
    pub fn label(&mut self, label: &str) {
        self.dedent();
        self.line(&format!("{label}:"));
        self.indent();
    }

    /// One `//` comment line per text line.
    pub fn comment(&mut self, text: &str) {
        for line in text.lines() {
            if line.is_empty() {
                self.line("//");
            } else {
                self.line(&format!("// {line}"));
            }
        }
    }

    /// Open one `namespace` block per path segment; [`Self::close_namespaces`] closes them.
    pub fn open_namespaces(&mut self, segments: &[String]) {
        for segment in segments {
            self.line(&format!("namespace {segment} {{"));
        }
        if !segments.is_empty() {
            self.blank_line();
        }
    }

    pub fn close_namespaces(&mut self, segments: &[String]) {
        if segments.is_empty() {
            return;
        }
        self.separate();
        for segment in segments.iter().rev() {
            self.line(&format!("}} // namespace {segment}"));
        }
    }
}
