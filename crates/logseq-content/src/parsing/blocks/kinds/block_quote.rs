/// Blockquote block type with owned delimiter constant.
///
/// All blockquote syntax knowledge lives here, not scattered in the
/// builder's continuation code.
pub struct BlockQuote;

impl BlockQuote {
    /// The blockquote prefix character.
    pub const PREFIX: u8 = b'>';

    /// Whether `rest`, taken at the first non-space character, opens or
    /// continues a blockquote.
    pub fn starts(rest: &str) -> bool {
        rest.as_bytes().first() == Some(&Self::PREFIX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_prefix() {
        assert!(BlockQuote::starts("> hello"));
        assert!(BlockQuote::starts(">hello"));
    }

    #[test]
    fn no_quote() {
        assert!(!BlockQuote::starts("hello > there"));
        assert!(!BlockQuote::starts(""));
    }
}
