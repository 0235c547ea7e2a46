//! Detached subtree builders.
//!
//! ```
//! use logseq_content::nodes::build::{block, page_link, text};
//! use logseq_content::Tree;
//!
//! let mut tree = Tree::new();
//! let b = tree.insert(block([text("See "), page_link("Inbox")]));
//! tree.add_child(tree.root(), b);
//! ```

use super::{
    ListType, NodeId, NodeKind, PreviousLine, TaskStatus, Tree,
    kind::{Kind, LineBreak},
    list::list_kind,
};

/// A node plus its children, not yet placed in any tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    kind: NodeKind,
    children: Vec<Fragment>,
}

impl Fragment {
    pub fn new(kind: NodeKind, children: impl IntoIterator<Item = Fragment>) -> Self {
        Self {
            kind,
            children: children.into_iter().collect(),
        }
    }

    pub fn leaf(kind: NodeKind) -> Self {
        Self::new(kind, [])
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn children(&self) -> &[Fragment] {
        &self.children
    }

    /// Ends a text fragment with a soft line break.
    pub fn soft_break(self) -> Self {
        self.with_line_break(Some(LineBreak::Soft))
    }

    /// Ends a text fragment with a hard line break.
    pub fn hard_break(self) -> Self {
        self.with_line_break(Some(LineBreak::Hard))
    }

    pub fn with_line_break(mut self, brk: Option<LineBreak>) -> Self {
        if let NodeKind::Text { line_break, .. } = &mut self.kind {
            *line_break = brk;
        }
        self
    }

    /// Sets the previous-line hint on kinds that carry one.
    pub fn with_previous_line(mut self, hint: PreviousLine) -> Self {
        self.kind.set_previous_line(hint);
        self
    }

    /// Sets the title of a link or image.
    pub fn with_title(mut self, value: impl Into<String>) -> Self {
        match &mut self.kind {
            NodeKind::Link { title, .. } | NodeKind::Image { title, .. } => *title = value.into(),
            _ => {}
        }
        self
    }
}

impl Tree {
    /// Allocates `fragment` and its children, returning the detached top node.
    ///
    /// Children rejected by a child-type gate are dropped.
    pub fn insert(&mut self, fragment: Fragment) -> NodeId {
        let id = self.alloc(fragment.kind);
        for child in fragment.children {
            let child = self.insert(child);
            self.add_child(id, child);
        }
        id
    }
}

impl From<Fragment> for Tree {
    fn from(fragment: Fragment) -> Self {
        let mut tree = Tree::with_root(NodeKind::Block);
        let top = tree.insert(fragment);
        tree.set_root(top);
        tree
    }
}

/// Wraps runs of inline fragments into paragraphs, leaving blocks untouched.
pub fn auto_paragraphs(children: impl IntoIterator<Item = Fragment>) -> Vec<Fragment> {
    let mut out = Vec::new();
    let mut open: Option<Vec<Fragment>> = None;

    for child in children {
        if child.kind.kind().is_inline() {
            open.get_or_insert_with(Vec::new).push(child);
            continue;
        }
        if let Some(inline) = open.take() {
            out.push(paragraph(inline));
        }
        out.push(child);
    }
    if let Some(inline) = open {
        out.push(paragraph(inline));
    }
    out
}

pub fn text(value: impl Into<String>) -> Fragment {
    Fragment::leaf(NodeKind::text(value))
}

pub fn raw_text(value: impl Into<String>) -> Fragment {
    Fragment::leaf(NodeKind::RawText {
        value: value.into(),
    })
}

pub fn code_span(value: impl Into<String>) -> Fragment {
    Fragment::leaf(NodeKind::CodeSpan {
        value: value.into(),
    })
}

pub fn emphasis(children: impl IntoIterator<Item = Fragment>) -> Fragment {
    Fragment::new(NodeKind::Emphasis, children)
}

pub fn strong(children: impl IntoIterator<Item = Fragment>) -> Fragment {
    Fragment::new(NodeKind::Strong, children)
}

pub fn strikethrough(children: impl IntoIterator<Item = Fragment>) -> Fragment {
    Fragment::new(NodeKind::Strikethrough, children)
}

pub fn link(url: impl Into<String>, children: impl IntoIterator<Item = Fragment>) -> Fragment {
    Fragment::new(
        NodeKind::Link {
            url: url.into(),
            title: String::new(),
        },
        children,
    )
}

pub fn auto_link(url: impl Into<String>) -> Fragment {
    Fragment::leaf(NodeKind::AutoLink { url: url.into() })
}

pub fn page_link(to: impl Into<String>) -> Fragment {
    Fragment::leaf(NodeKind::PageLink { to: to.into() })
}

pub fn hashtag(to: impl Into<String>) -> Fragment {
    Fragment::leaf(NodeKind::Hashtag { to: to.into() })
}

pub fn block_ref(id: impl Into<String>) -> Fragment {
    Fragment::leaf(NodeKind::BlockRef { id: id.into() })
}

pub fn image(src: impl Into<String>, children: impl IntoIterator<Item = Fragment>) -> Fragment {
    Fragment::new(
        NodeKind::Image {
            src: src.into(),
            title: String::new(),
        },
        children,
    )
}

pub fn raw_html(html: impl Into<String>) -> Fragment {
    Fragment::leaf(NodeKind::RawHtml { html: html.into() })
}

pub fn macro_call<S: Into<String>>(
    name: impl Into<String>,
    arguments: impl IntoIterator<Item = S>,
) -> Fragment {
    Fragment::leaf(NodeKind::Macro {
        name: name.into(),
        arguments: arguments.into_iter().map(Into::into).collect(),
    })
}

pub fn query(query: impl Into<String>) -> Fragment {
    Fragment::leaf(NodeKind::Query {
        query: query.into(),
    })
}

pub fn page_embed(to: impl Into<String>) -> Fragment {
    Fragment::leaf(NodeKind::PageEmbed { to: to.into() })
}

pub fn block_embed(id: impl Into<String>) -> Fragment {
    Fragment::leaf(NodeKind::BlockEmbed { id: id.into() })
}

pub fn cloze(answer: impl Into<String>, cue: impl Into<String>) -> Fragment {
    Fragment::leaf(NodeKind::Cloze {
        answer: answer.into(),
        cue: cue.into(),
    })
}

pub fn task_marker(status: TaskStatus) -> Fragment {
    Fragment::leaf(NodeKind::TaskMarker { status })
}

pub fn paragraph(children: impl IntoIterator<Item = Fragment>) -> Fragment {
    Fragment::new(
        NodeKind::Paragraph {
            previous_line: PreviousLine::Automatic,
        },
        children,
    )
}

pub fn heading(level: u8, children: impl IntoIterator<Item = Fragment>) -> Fragment {
    Fragment::new(
        NodeKind::Heading {
            level: level.clamp(1, 6),
        },
        children,
    )
}

pub fn blockquote(children: impl IntoIterator<Item = Fragment>) -> Fragment {
    Fragment::new(
        NodeKind::Blockquote {
            previous_line: PreviousLine::Automatic,
        },
        children,
    )
}

/// A list for a source marker byte; see [`list_kind`] for the mapping.
pub fn list(marker: u8, items: impl IntoIterator<Item = Fragment>) -> Fragment {
    Fragment::new(list_kind(marker), items)
}

pub fn ordered_list(items: impl IntoIterator<Item = Fragment>) -> Fragment {
    Fragment::new(
        NodeKind::List {
            list_type: ListType::Ordered,
            marker: b'.',
            previous_line: PreviousLine::Automatic,
        },
        items,
    )
}

pub fn unordered_list(items: impl IntoIterator<Item = Fragment>) -> Fragment {
    Fragment::new(
        NodeKind::List {
            list_type: ListType::Unordered,
            marker: b'*',
            previous_line: PreviousLine::Automatic,
        },
        items,
    )
}

pub fn list_item(children: impl IntoIterator<Item = Fragment>) -> Fragment {
    Fragment::new(NodeKind::ListItem, auto_paragraphs(children))
}

pub fn code_block(language: impl Into<String>, code: impl Into<String>) -> Fragment {
    Fragment::leaf(NodeKind::CodeBlock {
        language: language.into(),
        code: code.into(),
        previous_line: PreviousLine::Automatic,
    })
}

pub fn thematic_break() -> Fragment {
    Fragment::leaf(NodeKind::ThematicBreak)
}

pub fn raw_html_block(html: impl Into<String>) -> Fragment {
    Fragment::leaf(NodeKind::RawHtmlBlock { html: html.into() })
}

pub fn properties(children: impl IntoIterator<Item = Fragment>) -> Fragment {
    Fragment::new(
        NodeKind::Properties {
            previous_line: PreviousLine::Automatic,
        },
        children,
    )
}

pub fn property(name: impl Into<String>, children: impl IntoIterator<Item = Fragment>) -> Fragment {
    Fragment::new(NodeKind::Property { name: name.into() }, children)
}

pub fn advanced_command(variant: impl Into<String>, value: impl Into<String>) -> Fragment {
    Fragment::leaf(NodeKind::AdvancedCommand {
        variant: variant.into(),
        value: value.into(),
    })
}

pub fn query_command(query: impl Into<String>) -> Fragment {
    Fragment::leaf(NodeKind::QueryCommand {
        query: query.into(),
    })
}

pub fn logbook(entries: impl IntoIterator<Item = Fragment>) -> Fragment {
    Fragment::new(
        NodeKind::Logbook {
            previous_line: PreviousLine::Automatic,
        },
        entries,
    )
}

pub fn logbook_entry(value: impl Into<String>) -> Fragment {
    Fragment::leaf(NodeKind::LogbookEntry {
        value: value.into(),
    })
}

/// An outline block; inline children are wrapped into paragraphs.
pub fn block(children: impl IntoIterator<Item = Fragment>) -> Fragment {
    Fragment::new(NodeKind::Block, auto_paragraphs(children))
}

impl Fragment {
    pub fn is(&self, kind: Kind) -> bool {
        self.kind.kind() == kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::debug;
    use pretty_assertions::assert_eq;

    #[test]
    fn block_wraps_inline_runs() {
        let tree = Tree::from(block([
            text("a"),
            page_link("b"),
            block([text("nested")]),
            text("c"),
        ]));

        let kinds: Vec<Kind> = tree.children(tree.root()).map(|c| tree.tag(c)).collect();
        assert_eq!(
            kinds,
            [Kind::Paragraph, Kind::Block, Kind::Paragraph],
            "inline runs become paragraphs around the nested block"
        );
    }

    #[test]
    fn insert_drops_gated_children() {
        let tree = Tree::from(properties([property("a", [text("x")]), text("stray")]));

        assert_eq!(tree.children(tree.root()).count(), 1);
    }

    #[test]
    fn from_fragment_builds_debuggable_tree() {
        let tree = Tree::from(paragraph([text("a").soft_break(), text("b")]));

        assert_eq!(
            debug(&tree, tree.root()),
            "Paragraph{\n  previousLineType='automatic'\n  children=[\n    Text{\n      value='a'\n      lineBreak='soft'\n    }\n    Text{\n      value='b'\n    }\n  ]\n}"
        );
    }
}
