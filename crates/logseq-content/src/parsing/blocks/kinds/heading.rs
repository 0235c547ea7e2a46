/// ATX heading: one to six `#` followed by a space or the end of the line.
pub struct AtxHeading;

impl AtxHeading {
    pub const HASH: u8 = b'#';
    pub const MAX_LEVEL: usize = 6;

    /// Returns the level and the inline content of the heading at the start
    /// of `rest`, with any closing `#` sequence removed.
    pub fn open(rest: &str) -> Option<(u8, String)> {
        let level = rest.bytes().take_while(|&b| b == Self::HASH).count();
        if level == 0 || level > Self::MAX_LEVEL {
            return None;
        }
        if !matches!(rest.as_bytes().get(level), None | Some(b' ' | b'\t')) {
            return None;
        }

        let content = rest[level..].trim_matches([' ', '\t']);
        let content = match content.trim_end_matches('#') {
            "" => "",
            body if body.len() == content.len() => content,
            body if body.ends_with([' ', '\t']) => body.trim_end_matches([' ', '\t']),
            _ => content,
        };
        let level = u8::try_from(level).ok()?;
        Some((level, content.to_string()))
    }
}
