use std::sync::LazyLock;

use regex::Regex;

use crate::parsing::inline::kinds::RawHtml;

/// HTML blocks, told apart by the seven CommonMark start conditions.
///
/// Conditions 1 to 5 end at a line holding their closing marker; 6 and 7
/// end at a blank line.
pub struct HtmlBlock;

static RAW_TEXT_START: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^<(?:script|pre|textarea|style)(?:\s|>|$)").expect("valid regex")
});

static RAW_TEXT_END: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)</(?:script|pre|textarea|style)>").expect("valid regex")
});

static BLOCK_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^</?(?:address|article|aside|base|basefont|blockquote|body|caption|center|col|colgroup|dd|details|dialog|dir|div|dl|dt|fieldset|figcaption|figure|footer|form|frame|frameset|h[1-6]|head|header|hr|html|iframe|legend|li|link|main|menu|menuitem|nav|noframes|ol|optgroup|option|p|param|search|section|summary|table|tbody|td|tfoot|th|thead|title|tr|track|ul)(?:\s|/?>|$)",
    )
    .expect("valid regex")
});

impl HtmlBlock {
    pub const OPEN: u8 = b'<';

    /// The start condition matched by `rest`, if any. Condition 7 (a lone
    /// complete tag) cannot interrupt a paragraph.
    pub fn start(rest: &str, interrupts_paragraph: bool) -> Option<u8> {
        if rest.as_bytes().first() != Some(&Self::OPEN) {
            return None;
        }
        if RAW_TEXT_START.is_match(rest) {
            Some(1)
        } else if rest.starts_with("<!--") {
            Some(2)
        } else if rest.starts_with("<?") {
            Some(3)
        } else if rest.starts_with("<![CDATA[") {
            Some(5)
        } else if rest.starts_with("<!") && rest[2..].starts_with(|c: char| c.is_ascii_alphabetic()) {
            Some(4)
        } else if BLOCK_TAG.is_match(rest) {
            Some(6)
        } else if !interrupts_paragraph && Self::is_lone_tag(rest) {
            Some(7)
        } else {
            None
        }
    }

    /// Whether `line` holds the end marker of `condition`.
    pub fn ends(condition: u8, line: &str) -> bool {
        match condition {
            1 => RAW_TEXT_END.is_match(line),
            2 => line.contains("-->"),
            3 => line.contains("?>"),
            4 => line.contains('>'),
            5 => line.contains("]]>"),
            _ => false,
        }
    }

    pub fn ends_at_blank(condition: u8) -> bool {
        condition >= 6
    }

    fn is_lone_tag(rest: &str) -> bool {
        let is_tag = rest[1..].starts_with(|c: char| c.is_ascii_alphabetic() || c == '/');
        is_tag && RawHtml::scan(rest).is_some_and(|len| rest[len..].trim().is_empty())
    }
}
