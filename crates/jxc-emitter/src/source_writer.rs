//! Output sink with line/column tracking.
//!
//! Columns are counted in UTF-16 code units, the unit source map consumers
//! use for generated positions.

use jxc_common::Position;
use jxc_common::limits::OUTPUT_BUFFER_INITIAL_CAPACITY;

/// Append-only text buffer with a position cursor and indentation.
#[derive(Debug)]
pub struct SourceWriter {
    output: String,
    line: u32,
    column: u32,
    indent_level: u32,
    indent_width: u32,
    /// Indentation is written lazily, on the first text of a line.
    at_line_start: bool,
}

impl SourceWriter {
    pub fn new(indent_width: u32) -> Self {
        Self {
            output: String::with_capacity(OUTPUT_BUFFER_INITIAL_CAPACITY),
            line: 0,
            column: 0,
            indent_level: 0,
            indent_width,
            at_line_start: true,
        }
    }

    /// Position the next written character will occupy.
    pub fn position(&self) -> Position {
        if self.at_line_start {
            Position::new(self.line, self.indent_level * self.indent_width)
        } else {
            Position::new(self.line, self.column)
        }
    }

    pub fn write(&mut self, text: &str) {
        for (i, segment) in text.split('\n').enumerate() {
            if i > 0 {
                self.write_line();
            }
            if segment.is_empty() {
                continue;
            }
            self.flush_indent();
            self.output.push_str(segment);
            self.column += segment.encode_utf16().count() as u32;
        }
    }

    pub fn write_char(&mut self, ch: char) {
        if ch == '\n' {
            self.write_line();
            return;
        }
        self.flush_indent();
        self.output.push(ch);
        self.column += ch.len_utf16() as u32;
    }

    pub fn write_space(&mut self) {
        self.write_char(' ');
    }

    /// End the current line.
    pub fn write_line(&mut self) {
        self.output.push('\n');
        self.line += 1;
        self.column = 0;
        self.at_line_start = true;
    }

    /// End the current line unless nothing has been written on it yet.
    pub fn ensure_line_start(&mut self) {
        if !self.at_line_start {
            self.write_line();
        }
    }

    pub fn increase_indent(&mut self) {
        self.indent_level += 1;
    }

    pub fn decrease_indent(&mut self) {
        self.indent_level = self.indent_level.saturating_sub(1);
    }

    pub fn is_empty(&self) -> bool {
        self.output.is_empty()
    }

    pub fn text(&self) -> &str {
        &self.output
    }

    pub fn into_text(self) -> String {
        self.output
    }

    fn flush_indent(&mut self) {
        if !self.at_line_start {
            return;
        }
        self.at_line_start = false;
        let width = self.indent_level * self.indent_width;
        for _ in 0..width {
            self.output.push(' ');
        }
        self.column = width;
    }
}

#[cfg(test)]
#[path = "../tests/source_writer.rs"]
mod tests;
