/// Block reference: `((64a1c7e2-...))`.
pub struct BlockRef;

impl BlockRef {
    pub const OPEN: &'static [u8; 2] = b"((";
    pub const CLOSE: &'static [u8; 2] = b"))";

    /// Characters allowed in a block id.
    pub fn is_id_char(b: u8) -> bool {
        b.is_ascii_digit() || (b'a'..=b'f').contains(&b) || b == b'-'
    }

    /// Scans a block reference at the start of `line`, returning the id and
    /// the number of bytes consumed.
    pub fn scan(line: &str) -> Option<(String, usize)> {
        let b = line.as_bytes();
        if !b.starts_with(Self::OPEN) {
            return None;
        }
        let len = b[2..].iter().take_while(|&&c| Self::is_id_char(c)).count();
        let close = 2 + len;
        if len == 0 || !b[close..].starts_with(Self::CLOSE) {
            return None;
        }
        Some((line[2..close].to_string(), close + 2))
    }
}
