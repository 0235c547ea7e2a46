/// A line of three or more `-`, `*` or `_`, optionally separated by spaces.
pub struct ThematicBreak;

impl ThematicBreak {
    pub const MARKERS: [u8; 3] = [b'-', b'*', b'_'];
    pub const MIN_LEN: usize = 3;

    pub fn matches(rest: &str) -> bool {
        let mut marks = rest.bytes().filter(|&b| b != b' ' && b != b'\t');
        let Some(first) = marks.next() else {
            return false;
        };
        if !Self::MARKERS.contains(&first) {
            return false;
        }
        let mut count = 1;
        for b in marks {
            if b != first {
                return false;
            }
            count += 1;
        }
        count >= Self::MIN_LEN
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("---", true)]
    #[case("* * *", true)]
    #[case("___ ", true)]
    #[case("--", false)]
    #[case("-*-", false)]
    #[case("--- a", false)]
    #[case("", false)]
    fn recognises_breaks(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(ThematicBreak::matches(input), expected);
    }
}
