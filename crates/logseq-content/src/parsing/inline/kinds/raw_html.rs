use std::sync::LazyLock;

use regex::Regex;

/// Inline raw HTML: open and closing tags, comments, processing
/// instructions, declarations and CDATA sections. May span lines.
pub struct RawHtml;

static HTML_TAG: LazyLock<Regex> = LazyLock::new(|| {
    let tag_name = r"[A-Za-z][A-Za-z0-9-]*";
    let attribute_name = r"[a-zA-Z_:][a-zA-Z0-9_.:-]*";
    let attribute_value = r#"(?:[^"'=<>`\x00-\x20]+|'[^']*'|"[^"]*")"#;
    let attribute = format!(r"(?:\s+{attribute_name}(?:\s*=\s*{attribute_value})?)");
    let open_tag = format!(r"<{tag_name}{attribute}*\s*/?>");
    let close_tag = format!(r"</{tag_name}\s*>");
    let comment = r"<!-->|<!--->|<!--[\s\S]*?-->";
    let instruction = r"<\?[\s\S]*?\?>";
    let declaration = r"<![A-Za-z]+[^>]*>";
    let cdata = r"<!\[CDATA\[[\s\S]*?\]\]>";
    Regex::new(&format!(
        "^(?:{open_tag}|{close_tag}|{comment}|{instruction}|{declaration}|{cdata})"
    ))
    .expect("valid regex")
});

impl RawHtml {
    pub const OPEN: u8 = b'<';

    /// Length of the raw HTML construct at the start of `s`.
    pub fn scan(s: &str) -> Option<usize> {
        HTML_TAG.find(s).map(|m| m.end())
    }
}
