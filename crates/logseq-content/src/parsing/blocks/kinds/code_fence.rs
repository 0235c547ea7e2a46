use crate::parsing::inline::kinds::Escape;

/// An opening code fence: the fence character, its run length and the
/// info string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fence {
    pub ch: u8,
    pub len: usize,
    pub info: String,
}

pub struct CodeFence;

impl CodeFence {
    pub const BACKTICK: u8 = b'`';
    pub const TILDE: u8 = b'~';
    pub const MIN_LEN: usize = 3;

    /// Recognises an opening fence at the start of `rest`.
    ///
    /// A backtick fence may not carry a backtick in its info string, which
    /// keeps ```` ```code``` ```` an inline code span.
    pub fn open(rest: &str) -> Option<Fence> {
        let ch = *rest.as_bytes().first()?;
        if ch != Self::BACKTICK && ch != Self::TILDE {
            return None;
        }
        let len = rest.bytes().take_while(|&b| b == ch).count();
        if len < Self::MIN_LEN {
            return None;
        }
        let info = &rest[len..];
        if ch == Self::BACKTICK && info.contains('`') {
            return None;
        }
        Some(Fence {
            ch,
            len,
            info: Escape::unescape(info.trim()),
        })
    }

    /// Whether `rest` closes `fence`: at least as many fence characters and
    /// nothing after them but whitespace.
    pub fn closes(fence: &Fence, rest: &str) -> bool {
        let len = rest.bytes().take_while(|&b| b == fence.ch).count();
        len >= fence.len && rest[len..].trim().is_empty()
    }
}
