use super::{Kind, NodeId, NodeKind, Tree};

impl Tree {
    /// Flattens the children of `id` into readable text.
    ///
    /// Text keeps its line breaks, hashtags keep their `#`, page links and
    /// code contribute their value. Nested block nodes are separated by a
    /// blank line and properties are skipped.
    pub fn plain_text(&self, id: NodeId) -> String {
        self.plain_text_of(self.children(id))
    }

    pub fn plain_text_of(&self, nodes: impl IntoIterator<Item = NodeId>) -> String {
        let mut out = String::new();
        for node in nodes {
            self.push_plain_text(node, &mut out);
        }
        out.trim().to_string()
    }

    fn push_plain_text(&self, id: NodeId, out: &mut String) {
        match self.kind(id) {
            NodeKind::Text { value, line_break } => {
                out.push_str(value);
                if line_break.is_some() {
                    out.push('\n');
                }
            }
            NodeKind::Hashtag { to } => {
                out.push('#');
                out.push_str(to);
            }
            NodeKind::PageLink { to } => out.push_str(to),
            NodeKind::CodeSpan { value } => out.push_str(value),
            NodeKind::CodeBlock { code, .. } => {
                if !out.is_empty() {
                    out.push_str("\n\n");
                }
                out.push_str(code);
            }
            NodeKind::Properties { .. } => {}
            kind if kind.kind().is_container() => {
                if kind.kind().is_block() && !out.is_empty() {
                    out.push_str("\n\n");
                }
                for child in self.children(id) {
                    self.push_plain_text(child, out);
                }
            }
            _ => {}
        }
    }

    /// Short preview for search results: the first paragraph, list,
    /// blockquote or code block among `nodes`.
    pub fn preview(&self, nodes: impl IntoIterator<Item = NodeId>) -> String {
        for node in nodes {
            match self.kind(node) {
                NodeKind::CodeBlock { code, .. } => return code.clone(),
                kind if matches!(kind.kind(), Kind::Paragraph | Kind::List | Kind::Blockquote) => {
                    return self.plain_text(node);
                }
                _ => {}
            }
        }
        String::new()
    }
}
