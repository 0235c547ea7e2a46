/// Tab stops are every four columns.
const TAB_STOP: usize = 4;

/// Position within one physical line while container prefixes and block
/// markers are consumed.
///
/// Offsets are bytes; columns expand tabs. A tab can be consumed partially
/// when only some of its columns belong to a prefix, in which case
/// [`Line::rest`] yields the remaining columns as spaces.
#[derive(Debug, Clone)]
pub struct Line<'a> {
    text: &'a str,
    pub offset: usize,
    pub column: usize,
    pub partially_consumed_tab: bool,
    pub next_nonspace: usize,
    pub next_nonspace_column: usize,
    /// Columns between the current position and the next non-space.
    pub indent: usize,
    /// Nothing but whitespace from the current position on.
    pub blank: bool,
}

impl<'a> Line<'a> {
    /// Wraps a raw line; a trailing line ending is dropped.
    pub fn new(raw: &'a str) -> Self {
        let text = raw.strip_suffix('\n').unwrap_or(raw);
        let text = text.strip_suffix('\r').unwrap_or(text);
        let mut line = Self {
            text,
            offset: 0,
            column: 0,
            partially_consumed_tab: false,
            next_nonspace: 0,
            next_nonspace_column: 0,
            indent: 0,
            blank: false,
        };
        line.find_next_nonspace();
        line
    }

    pub fn find_next_nonspace(&mut self) {
        let b = self.text.as_bytes();
        let mut i = self.offset;
        let mut columns = self.column;
        while let Some(&c) = b.get(i) {
            match c {
                b' ' => columns += 1,
                b'\t' => columns += TAB_STOP - columns % TAB_STOP,
                _ => break,
            }
            i += 1;
        }
        self.blank = i >= b.len();
        self.next_nonspace = i;
        self.next_nonspace_column = columns;
        self.indent = columns - self.column;
    }

    /// Indentation deep enough for an indented code block.
    pub fn is_indented(&self) -> bool {
        self.indent >= TAB_STOP
    }

    pub fn advance_next_nonspace(&mut self) {
        self.offset = self.next_nonspace;
        self.column = self.next_nonspace_column;
        self.partially_consumed_tab = false;
    }

    /// Advances by `count` bytes, or by `count` columns when `columns` is
    /// set, which may leave a tab partially consumed.
    pub fn advance_offset(&mut self, mut count: usize, columns: bool) {
        let b = self.text.as_bytes();
        while count > 0 {
            let Some(&c) = b.get(self.offset) else {
                break;
            };
            if c == b'\t' {
                let to_tab = TAB_STOP - self.column % TAB_STOP;
                if columns {
                    self.partially_consumed_tab = to_tab > count;
                    let advance = to_tab.min(count);
                    self.column += advance;
                    if !self.partially_consumed_tab {
                        self.offset += 1;
                    }
                    count -= advance;
                } else {
                    self.partially_consumed_tab = false;
                    self.column += to_tab;
                    self.offset += 1;
                    count -= 1;
                }
            } else {
                self.partially_consumed_tab = false;
                self.offset += 1;
                self.column += 1;
                count -= 1;
            }
        }
    }

    /// Moves back to a position saved earlier on the same line.
    pub fn reset_to(&mut self, offset: usize, column: usize) {
        self.offset = offset;
        self.column = column;
        self.partially_consumed_tab = false;
    }

    pub fn advance_to_end(&mut self) {
        self.offset = self.text.len();
        self.partially_consumed_tab = false;
    }

    /// Byte at the current offset.
    pub fn peek(&self) -> Option<u8> {
        self.text.as_bytes().get(self.offset).copied()
    }

    /// The line from its next non-space character on.
    pub fn from_next_nonspace(&self) -> &'a str {
        &self.text[self.next_nonspace..]
    }

    /// The unconsumed part of the line.
    pub fn rest(&self) -> String {
        if self.partially_consumed_tab {
            let spaces = TAB_STOP - self.column % TAB_STOP;
            format!("{}{}", " ".repeat(spaces), &self.text[self.offset + 1..])
        } else {
            self.text[self.offset..].to_string()
        }
    }
}
