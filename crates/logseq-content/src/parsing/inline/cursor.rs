/// A cursor for character-by-character inline parsing.
///
/// Positions are byte offsets into the inline content of one block; they
/// double as the source spans used to decide whether adjacent text nodes
/// can be merged.
#[derive(Clone)]
pub struct Cursor<'a> {
    /// The string being parsed.
    pub s: &'a str,
    /// Current byte index into `s`.
    pub i: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(s: &'a str) -> Self {
        Self { s, i: 0 }
    }

    pub fn pos(&self) -> usize {
        self.i
    }

    pub fn eof(&self) -> bool {
        self.i >= self.s.len()
    }

    /// Peeks at the current byte without advancing.
    pub fn peek(&self) -> Option<u8> {
        self.s.as_bytes().get(self.i).copied()
    }

    /// Peeks `n` bytes ahead of the current position.
    pub fn peek_at(&self, n: usize) -> Option<u8> {
        self.s.as_bytes().get(self.i + n).copied()
    }

    pub fn peek_char(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// The character just before the cursor, if any.
    pub fn prev_char(&self) -> Option<char> {
        self.s[..self.i].chars().next_back()
    }

    /// Checks if the remaining input starts with the given byte pattern.
    pub fn starts_with(&self, pat: &[u8]) -> bool {
        self.s.as_bytes()[self.i..].starts_with(pat)
    }

    pub fn rest(&self) -> &'a str {
        &self.s[self.i..]
    }

    /// Remaining input up to, not including, the next line feed.
    pub fn rest_of_line(&self) -> &'a str {
        let rest = self.rest();
        rest.split('\n').next().unwrap_or(rest)
    }

    /// Advances over one character, returning it.
    pub fn bump_char(&mut self) -> Option<char> {
        let c = self.peek_char()?;
        self.i += c.len_utf8();
        Some(c)
    }

    /// Advances by `n` bytes.
    pub fn bump_n(&mut self, n: usize) {
        self.i += n;
    }

    /// Length of the run of `byte` starting at the cursor.
    pub fn run_length(&self, byte: u8) -> usize {
        self.s.as_bytes()[self.i..]
            .iter()
            .take_while(|&&b| b == byte)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_basics() {
        let mut cur = Cursor::new("hello");
        assert_eq!(cur.pos(), 0);
        assert!(!cur.eof());
        assert_eq!(cur.peek(), Some(b'h'));
        assert_eq!(cur.bump_char(), Some('h'));
        assert_eq!(cur.pos(), 1);
        assert_eq!(cur.prev_char(), Some('h'));
    }

    #[test]
    fn bump_char_steps_over_multibyte() {
        let mut cur = Cursor::new("åb");
        assert_eq!(cur.bump_char(), Some('å'));
        assert_eq!(cur.pos(), 2);
        assert_eq!(cur.peek_char(), Some('b'));
        assert_eq!(cur.prev_char(), Some('å'));
    }

    #[test]
    fn rest_of_line_stops_at_newline() {
        let mut cur = Cursor::new("ab\ncd");
        assert_eq!(cur.rest_of_line(), "ab");
        cur.bump_n(3);
        assert_eq!(cur.rest_of_line(), "cd");
    }

    #[test]
    fn starts_with_at_eof() {
        let mut cur = Cursor::new("ab");
        cur.bump_n(2);
        assert!(cur.eof());
        assert!(cur.starts_with(b""));
        assert!(!cur.starts_with(b"a"));
        assert_eq!(cur.peek(), None);
        assert_eq!(cur.bump_char(), None);
    }

    #[test]
    fn run_length_counts_repeats() {
        let mut cur = Cursor::new("x***y");
        cur.bump_n(1);
        assert_eq!(cur.run_length(b'*'), 3);
        assert_eq!(cur.peek_at(3), Some(b'y'));
    }
}
