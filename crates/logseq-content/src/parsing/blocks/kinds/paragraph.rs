/// Paragraphs have no delimiters: they are the default leaf block when no
/// other block opener matches. Their lines are joined and handed to the
/// inline parser.
pub struct Paragraph;

impl Paragraph {
    /// Inline content of a paragraph's collected lines.
    pub fn content(lines: &[String]) -> String {
        lines.join("\n").trim().to_string()
    }
}

/// Indented code: content lines are kept after four columns of indentation.
pub struct IndentedCode;

impl IndentedCode {
    pub const INDENT: usize = 4;

    /// Code of an indented block; trailing blank lines are not part of it.
    pub fn content(lines: &[String]) -> String {
        let end = lines
            .iter()
            .rposition(|l| !l.trim().is_empty())
            .map_or(0, |i| i + 1);
        lines[..end].join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(all: &[&str]) -> Vec<String> {
        all.iter().map(|l| l.to_string()).collect()
    }

    #[test]
    fn paragraph_content_is_trimmed() {
        assert_eq!(Paragraph::content(&lines(&["Basic  ", "content  "])), "Basic  \ncontent");
    }

    #[test]
    fn indented_code_drops_trailing_blank_lines() {
        assert_eq!(IndentedCode::content(&lines(&["a", "", "b", "", "  "])), "a\n\nb");
        assert_eq!(IndentedCode::content(&lines(&[""])), "");
    }
}
