use super::Escape;

/// Inline link and image syntax: `[text](destination 'title')` and
/// `![alt](source "title")`.
///
/// The bracketed text is handled by the bracket stack in the parser; this
/// type owns the delimiters and the part after the closing bracket.
pub struct Link;

/// Destination and title following a link's closing bracket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkTail {
    pub destination: String,
    pub title: String,
    /// Bytes consumed, starting at the opening parenthesis.
    pub len: usize,
}

impl Link {
    pub const OPEN: u8 = b'[';
    pub const IMAGE: &'static [u8; 2] = b"![";
    pub const CLOSE: u8 = b']';

    /// Scans `(destination title)` at the start of `s`. The tail may span
    /// lines; the destination may not.
    pub fn scan_tail(s: &str) -> Option<LinkTail> {
        let b = s.as_bytes();
        if b.first() != Some(&b'(') {
            return None;
        }
        let mut i = skip_whitespace(b, 1);

        let (destination, after) = scan_destination(s, i)?;
        i = after;

        let before_title = i;
        i = skip_whitespace(b, i);
        let mut title = String::new();
        if i > before_title
            && let Some((t, after)) = scan_title(s, i)
        {
            title = t;
            i = skip_whitespace(b, after);
        }

        if b.get(i) != Some(&b')') {
            return None;
        }
        Some(LinkTail {
            destination,
            title,
            len: i + 1,
        })
    }
}

fn skip_whitespace(b: &[u8], mut i: usize) -> usize {
    while i < b.len() && matches!(b[i], b' ' | b'\t' | b'\n') {
        i += 1;
    }
    i
}

fn scan_destination(s: &str, start: usize) -> Option<(String, usize)> {
    let b = s.as_bytes();
    if b.get(start) == Some(&b'<') {
        let mut i = start + 1;
        while i < b.len() {
            match b[i] {
                b'>' => return Some((Escape::unescape(&s[start + 1..i]), i + 1)),
                b'<' | b'\n' => return None,
                Escape::BACKSLASH if i + 1 < b.len() && Escape::is_escapable(b[i + 1]) => i += 2,
                _ => i += 1,
            }
        }
        return None;
    }

    let mut depth = 0usize;
    let mut i = start;
    while i < b.len() {
        match b[i] {
            Escape::BACKSLASH if i + 1 < b.len() && Escape::is_escapable(b[i + 1]) => {
                i += 2;
                continue;
            }
            b'(' => depth += 1,
            b')' if depth == 0 => break,
            b')' => depth -= 1,
            c if c <= b' ' || c == 0x7f => break,
            _ => {}
        }
        i += 1;
    }
    if depth != 0 {
        return None;
    }
    Some((Escape::unescape(&s[start..i]), i))
}

fn scan_title(s: &str, start: usize) -> Option<(String, usize)> {
    let b = s.as_bytes();
    let close = match b.get(start)? {
        b'"' => b'"',
        b'\'' => b'\'',
        b'(' => b')',
        _ => return None,
    };
    let mut i = start + 1;
    while i < b.len() {
        match b[i] {
            Escape::BACKSLASH if i + 1 < b.len() && Escape::is_escapable(b[i + 1]) => i += 2,
            c if c == close => return Some((Escape::unescape(&s[start + 1..i]), i + 1)),
            b'(' if close == b')' => return None,
            _ => i += 1,
        }
    }
    None
}
