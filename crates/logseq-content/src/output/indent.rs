use std::io::{self, Write};

/// Line-prefixing writer used by the Markdown emitter.
///
/// The current indentation is a stack of pushed segments such as `"> "` or
/// `"  "`. It is split into a structural part (everything up to the last
/// non-whitespace byte) and trailing whitespace. The structural part is
/// stamped at the start of every line, even an empty one; the trailing
/// whitespace only when the line gets content.
pub struct IndentWriter<W: Write> {
    out: W,
    current_indent: Vec<u8>,
    indent_lengths: Vec<usize>,
    trailing_space_index: usize,
    did_write: Vec<bool>,
    last_was_line_break: bool,
}

impl<W: Write> IndentWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            current_indent: Vec::new(),
            indent_lengths: Vec::new(),
            trailing_space_index: 0,
            did_write: vec![false],
            last_was_line_break: true,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn indentation_level(&self) -> usize {
        self.indent_lengths.len()
    }

    /// Whether the last write ended a line (or nothing was written yet).
    pub fn at_line_start(&self) -> bool {
        self.last_was_line_break
    }

    pub fn push_indentation(&mut self, segment: &str) {
        self.indent_lengths.push(self.current_indent.len());
        self.current_indent.extend_from_slice(segment.as_bytes());
        self.update_trailing_space_index();
        self.did_write.push(false);
    }

    /// Removes the most recent segment and returns it.
    ///
    /// Whether anything was written under the segment is carried up to the
    /// enclosing level.
    pub fn pop_indentation(&mut self) -> String {
        let Some(last) = self.indent_lengths.pop() else {
            return String::new();
        };
        let segment = self.current_indent.split_off(last);
        self.update_trailing_space_index();

        if self.did_write.len() > 1
            && self.did_write.pop() == Some(true)
            && let Some(parent) = self.did_write.last_mut()
        {
            *parent = true;
        }

        String::from_utf8_lossy(&segment).into_owned()
    }

    fn update_trailing_space_index(&mut self) {
        self.trailing_space_index = self
            .current_indent
            .iter()
            .rposition(|&b| b != b' ' && b != b'\t')
            .map_or(0, |i| i + 1);
    }

    pub fn has_written_at_current_indent(&self) -> bool {
        self.did_write.last().copied().unwrap_or(false)
    }

    pub fn write_str(&mut self, value: &str) -> io::Result<()> {
        if value.is_empty() {
            return Ok(());
        }
        if let Some(flag) = self.did_write.last_mut() {
            *flag = true;
        }

        let bytes = value.as_bytes();
        let mut last_write = 0;
        for (i, c) in value.char_indices() {
            if self.last_was_line_break {
                let end = self.trailing_space_index;
                self.out.write_all(&self.current_indent[..end])?;
            }

            if c == '\n' {
                self.out.write_all(&bytes[last_write..=i])?;
                self.last_was_line_break = true;
                last_write = i + 1;
            } else {
                if self.last_was_line_break {
                    let start = self.trailing_space_index;
                    self.out.write_all(&self.current_indent[start..])?;
                }
                self.last_was_line_break = false;
            }
        }

        if last_write < bytes.len() {
            self.out.write_all(&bytes[last_write..])?;
        }
        Ok(())
    }

    /// Writes straight to the sink, bypassing indentation and line tracking.
    ///
    /// Used to stamp a container marker when a container opens mid-line,
    /// e.g. a blockquote that is the first thing in a list item.
    pub fn write_unindented(&mut self, value: &str) -> io::Result<()> {
        self.out.write_all(value.as_bytes())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn output(w: IndentWriter<Vec<u8>>) -> String {
        String::from_utf8(w.into_inner()).unwrap()
    }

    #[test]
    fn plain_writes_pass_through() {
        let mut w = IndentWriter::new(Vec::new());
        w.write_str("a\nb").unwrap();
        assert_eq!(output(w), "a\nb");
    }

    #[test]
    fn indentation_applies_after_line_breaks() {
        // Given a list continuation indent pushed after the bullet
        let mut w = IndentWriter::new(Vec::new());
        w.write_str("- ").unwrap();
        w.push_indentation("  ");

        // When a multi-line value is written
        w.write_str("first\nsecond").unwrap();
        w.pop_indentation();

        // Then only continuation lines are indented
        assert_eq!(output(w), "- first\n  second");
    }

    #[test]
    fn blank_lines_keep_structural_prefix_only() {
        let mut w = IndentWriter::new(Vec::new());
        w.push_indentation("> ");
        w.write_str("a\n\nb").unwrap();
        assert_eq!(output(w), "> a\n>\n> b");
    }

    #[test]
    fn nested_segments_split_at_last_marker() {
        let mut w = IndentWriter::new(Vec::new());
        w.push_indentation("  ");
        w.push_indentation("> ");
        w.write_str("x\n\ny").unwrap();
        assert_eq!(output(w), "  > x\n  >\n  > y");
    }

    #[test]
    fn did_write_propagates_on_pop() {
        let mut w = IndentWriter::new(Vec::new());
        assert!(!w.has_written_at_current_indent());

        w.push_indentation("  ");
        assert!(!w.has_written_at_current_indent());
        w.write_str("x").unwrap();
        assert!(w.has_written_at_current_indent());

        assert_eq!(w.pop_indentation(), "  ");
        assert!(w.has_written_at_current_indent());
        assert_eq!(w.indentation_level(), 0);
    }

    #[test]
    fn empty_write_does_not_mark_level() {
        let mut w = IndentWriter::new(Vec::new());
        w.write_str("").unwrap();
        assert!(!w.has_written_at_current_indent());
    }
}
