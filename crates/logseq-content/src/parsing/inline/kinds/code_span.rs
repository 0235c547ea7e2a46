/// Code span inline type with owned delimiter constant.
///
/// Code spans are raw zones: no other inline parsing occurs inside them and
/// they are the only inline construct allowed to cross a line break.
pub struct CodeSpan;

impl CodeSpan {
    /// The backtick character that delimits code spans.
    pub const TICK: u8 = b'`';

    /// Scans a code span at the start of `s`.
    ///
    /// The opening backtick run must be closed by a run of exactly the same
    /// length. One space is stripped from each side when both sides have one
    /// and the content is not only spaces. Line breaks are kept.
    ///
    /// Returns the content and the number of bytes consumed.
    pub fn scan(s: &str) -> Option<(String, usize)> {
        let bytes = s.as_bytes();
        let open = run_at(bytes, 0);
        if open == 0 {
            return None;
        }

        let mut i = open;
        while i < bytes.len() {
            if bytes[i] == Self::TICK {
                let run = run_at(bytes, i);
                if run == open {
                    let content = &s[open..i];
                    return Some((strip_padding(content).to_string(), i + run));
                }
                i += run;
            } else {
                i += 1;
            }
        }
        None
    }
}

fn run_at(bytes: &[u8], start: usize) -> usize {
    bytes[start..]
        .iter()
        .take_while(|&&b| b == CodeSpan::TICK)
        .count()
}

fn strip_padding(content: &str) -> &str {
    let padded = content.len() >= 2 && content.starts_with(' ') && content.ends_with(' ');
    if padded && !content.bytes().all(|b| b == b' ') {
        &content[1..content.len() - 1]
    } else {
        content
    }
}
