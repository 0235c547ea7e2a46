use super::PageLink;

/// Hashtag page reference: `#tag` or `#[[tag with spaces]]`.
pub struct Hashtag;

impl Hashtag {
    pub const HASH: u8 = b'#';

    /// Scans a hashtag at the start of `line`, returning the target page and
    /// the number of bytes consumed.
    ///
    /// The short form runs to the next Unicode whitespace. The extended form
    /// follows page link rules; when it is not terminated the whole thing is
    /// not a tag.
    pub fn scan(line: &str) -> Option<(String, usize)> {
        let rest = line.strip_prefix(char::from(Self::HASH))?;
        if let Some(inner) = rest.strip_prefix("[[") {
            let (target, len) = PageLink::scan_target(inner)?;
            return Some((target, 3 + len));
        }

        let len = rest.find(char::is_whitespace).unwrap_or(rest.len());
        if len == 0 {
            return None;
        }
        Some((rest[..len].to_string(), 1 + len))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("#tag followed by text", "tag", 4)]
    #[case("#tag", "tag", 4)]
    #[case("#[[tag with spaces]] and more", "tag with spaces", 20)]
    #[case("#tåg\u{3000}next", "tåg", 5)]
    fn scans_tags(#[case] input: &str, #[case] target: &str, #[case] len: usize) {
        assert_eq!(Hashtag::scan(input), Some((target.to_string(), len)));
    }

    #[rstest]
    #[case("#[[tag with spaces")]
    #[case("# heading")]
    #[case("#")]
    fn rejects_non_tags(#[case] input: &str) {
        assert_eq!(Hashtag::scan(input), None);
    }
}
