/// A list item marker found at the start of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListMarker {
    pub ordered: bool,
    /// Bullet character, or the delimiter after the number of an ordered item.
    pub ch: u8,
    pub start: u32,
    /// Marker length in bytes, digits included.
    pub len: usize,
}

impl ListMarker {
    pub const BULLETS: [u8; 3] = [b'-', b'*', b'+'];
    pub const DELIMITERS: [u8; 2] = [b'.', b')'];
    pub const MAX_DIGITS: usize = 9;

    /// Scans the marker at the start of `rest`.
    ///
    /// A marker must be followed by whitespace or the end of the line. When
    /// it would interrupt a paragraph the item must have content, and an
    /// ordered item must start at 1.
    pub fn scan(rest: &str, interrupts_paragraph: bool) -> Option<Self> {
        let b = rest.as_bytes();
        let first = *b.first()?;
        let marker = if Self::BULLETS.contains(&first) {
            ListMarker {
                ordered: false,
                ch: first,
                start: 1,
                len: 1,
            }
        } else {
            let digits = b.iter().take_while(|c| c.is_ascii_digit()).count();
            if digits == 0 || digits > Self::MAX_DIGITS {
                return None;
            }
            let ch = *b.get(digits)?;
            if !Self::DELIMITERS.contains(&ch) {
                return None;
            }
            let start = rest[..digits].parse().ok()?;
            if interrupts_paragraph && start != 1 {
                return None;
            }
            ListMarker {
                ordered: true,
                ch,
                start,
                len: digits + 1,
            }
        };

        if !matches!(b.get(marker.len), None | Some(b' ' | b'\t')) {
            return None;
        }
        if interrupts_paragraph && rest[marker.len..].trim().is_empty() {
            return None;
        }
        Some(marker)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scans_bullets() {
        let marker = ListMarker::scan("- item", false).unwrap();
        assert!(!marker.ordered);
        assert_eq!((marker.ch, marker.len), (b'-', 1));
        assert!(ListMarker::scan("*", false).is_some());
    }

    #[test]
    fn scans_ordered_markers() {
        let marker = ListMarker::scan("12) item", false).unwrap();
        assert!(marker.ordered);
        assert_eq!((marker.ch, marker.start, marker.len), (b')', 12, 3));
    }

    #[test]
    fn needs_whitespace_after_marker() {
        assert_eq!(ListMarker::scan("-item", false), None);
        assert_eq!(ListMarker::scan("1.item", false), None);
        assert_eq!(ListMarker::scan("1234567890. item", false), None);
    }

    #[test]
    fn interrupting_a_paragraph_is_restricted() {
        assert_eq!(ListMarker::scan("-", true), None);
        assert_eq!(ListMarker::scan("2. item", true), None);
        assert!(ListMarker::scan("1. item", true).is_some());
        assert!(ListMarker::scan("* Item 1", true).is_some());
    }
}
