/// Backslash escapes: a backslash before ASCII punctuation makes that
/// character literal; before a line break it forces a hard break.
pub struct Escape;

impl Escape {
    pub const BACKSLASH: u8 = b'\\';

    pub fn is_escapable(b: u8) -> bool {
        b.is_ascii_punctuation()
    }

    /// Removes the backslash from every escaped punctuation character.
    pub fn unescape(s: &str) -> String {
        let b = s.as_bytes();
        let mut out = String::with_capacity(s.len());
        let mut last = 0;
        let mut i = 0;
        while i + 1 < b.len() {
            if b[i] == Self::BACKSLASH && Self::is_escapable(b[i + 1]) {
                out.push_str(&s[last..i]);
                last = i + 1;
                i += 2;
            } else {
                i += 1;
            }
        }
        out.push_str(&s[last..]);
        out
    }
}
