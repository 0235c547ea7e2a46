/// Wiki-style page link: `[[Page name]]`.
///
/// The link ends at the first `]]` that is not preceded by a backslash, so a
/// lone `]` is allowed inside. Backslashes are removed from the target.
pub struct PageLink;

impl PageLink {
    pub const OPEN: &'static [u8; 2] = b"[[";
    pub const CLOSE: &'static [u8; 2] = b"]]";

    /// Scans a page link at the start of `line`, returning the target and
    /// the number of bytes consumed.
    pub fn scan(line: &str) -> Option<(String, usize)> {
        if !line.as_bytes().starts_with(Self::OPEN) {
            return None;
        }
        let (target, len) = Self::scan_target(&line[2..])?;
        Some((target, len + 2))
    }

    /// Scans the part after `[[`: the target up to and including the
    /// closing `]]`. Shared with the extended hashtag form.
    pub fn scan_target(s: &str) -> Option<(String, usize)> {
        let b = s.as_bytes();
        let mut i = 0;
        while i + 1 < b.len() {
            if b[i..].starts_with(Self::CLOSE) && (i == 0 || b[i - 1] != b'\\') {
                let target = s[..i].replace('\\', "");
                if target.is_empty() {
                    return None;
                }
                return Some((target, i + 2));
            }
            i += 1;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("[[This is a link]] and text", "This is a link", 18)]
    #[case("[[This is ]a link]]", "This is ]a link", 19)]
    #[case("[[This is \\]]a link]]", "This is ]]a link", 21)]
    fn scans_page_links(#[case] input: &str, #[case] target: &str, #[case] len: usize) {
        assert_eq!(PageLink::scan(input), Some((target.to_string(), len)));
    }

    #[rstest]
    #[case("[[unterminated")]
    #[case("[[]]")]
    #[case("[single]")]
    fn rejects_non_links(#[case] input: &str) {
        assert_eq!(PageLink::scan(input), None);
    }
}
