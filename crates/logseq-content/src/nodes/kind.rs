use super::task::TaskStatus;

/// How a text node ends, if it ends a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineBreak {
    Soft,
    Hard,
}

/// Tells the writer how the source separated a block from the one before it.
///
/// `Automatic` lets the writer pick the separator; it is the default for
/// nodes built in code. Parsed nodes get `Blank` or `NonBlank` when there was
/// a previous sibling, and `Automatic` when they open their container.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PreviousLine {
    #[default]
    Automatic,
    Blank,
    NonBlank,
}

impl PreviousLine {
    pub fn as_str(self) -> &'static str {
        match self {
            PreviousLine::Automatic => "automatic",
            PreviousLine::Blank => "blank",
            PreviousLine::NonBlank => "non-blank",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListType {
    Ordered,
    Unordered,
}

/// Payload of a node in the tree.
///
/// Structure (parent, siblings, children) lives in the [`Tree`](super::Tree);
/// this enum only carries what is specific to each kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    // Inline
    Text {
        value: String,
        line_break: Option<LineBreak>,
    },
    /// Text written verbatim, without Markdown escaping.
    RawText {
        value: String,
    },
    CodeSpan {
        value: String,
    },
    Emphasis,
    Strong,
    Strikethrough,
    Link {
        url: String,
        title: String,
    },
    AutoLink {
        url: String,
    },
    PageLink {
        to: String,
    },
    Hashtag {
        to: String,
    },
    BlockRef {
        id: String,
    },
    Image {
        src: String,
        title: String,
    },
    RawHtml {
        html: String,
    },
    Macro {
        name: String,
        arguments: Vec<String>,
    },
    Query {
        query: String,
    },
    PageEmbed {
        to: String,
    },
    BlockEmbed {
        id: String,
    },
    Cloze {
        answer: String,
        cue: String,
    },
    TaskMarker {
        status: TaskStatus,
    },

    // Block
    Paragraph {
        previous_line: PreviousLine,
    },
    Heading {
        level: u8,
    },
    Blockquote {
        previous_line: PreviousLine,
    },
    List {
        list_type: ListType,
        marker: u8,
        previous_line: PreviousLine,
    },
    ListItem,
    CodeBlock {
        language: String,
        code: String,
        previous_line: PreviousLine,
    },
    ThematicBreak,
    RawHtmlBlock {
        html: String,
    },
    Properties {
        previous_line: PreviousLine,
    },
    Property {
        name: String,
    },
    AdvancedCommand {
        variant: String,
        value: String,
    },
    QueryCommand {
        query: String,
    },
    Logbook {
        previous_line: PreviousLine,
    },
    LogbookEntry {
        value: String,
    },
    /// An outline node: content followed by nested blocks.
    Block,
}

/// Fieldless tag for a [`NodeKind`], used for dispatch and child-type gates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Text,
    RawText,
    CodeSpan,
    Emphasis,
    Strong,
    Strikethrough,
    Link,
    AutoLink,
    PageLink,
    Hashtag,
    BlockRef,
    Image,
    RawHtml,
    Macro,
    Query,
    PageEmbed,
    BlockEmbed,
    Cloze,
    TaskMarker,
    Paragraph,
    Heading,
    Blockquote,
    List,
    ListItem,
    CodeBlock,
    ThematicBreak,
    RawHtmlBlock,
    Properties,
    Property,
    AdvancedCommand,
    QueryCommand,
    Logbook,
    LogbookEntry,
    Block,
}

/// The role set a kind belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Inline,
    Block,
    Property,
    LogbookEntry,
}

impl Kind {
    pub fn role(self) -> Role {
        match self {
            Kind::Text
            | Kind::RawText
            | Kind::CodeSpan
            | Kind::Emphasis
            | Kind::Strong
            | Kind::Strikethrough
            | Kind::Link
            | Kind::AutoLink
            | Kind::PageLink
            | Kind::Hashtag
            | Kind::BlockRef
            | Kind::Image
            | Kind::RawHtml
            | Kind::Macro
            | Kind::Query
            | Kind::PageEmbed
            | Kind::BlockEmbed
            | Kind::Cloze
            | Kind::TaskMarker => Role::Inline,
            Kind::Property => Role::Property,
            Kind::LogbookEntry => Role::LogbookEntry,
            _ => Role::Block,
        }
    }

    pub fn is_inline(self) -> bool {
        self.role() == Role::Inline
    }

    pub fn is_block(self) -> bool {
        self.role() == Role::Block
    }

    /// Child-type gate: whether a node of this kind may hold a `child` kind.
    pub fn accepts(self, child: Kind) -> bool {
        match self {
            Kind::Paragraph => child.is_inline() || child == Kind::Properties,
            Kind::Heading
            | Kind::Emphasis
            | Kind::Strong
            | Kind::Strikethrough
            | Kind::Link
            | Kind::Image
            | Kind::Property => child.is_inline(),
            Kind::Block | Kind::Blockquote | Kind::ListItem | Kind::List => child.is_block(),
            Kind::Properties => child == Kind::Property,
            Kind::Logbook => child == Kind::LogbookEntry,
            _ => false,
        }
    }

    /// Whether nodes of this kind can have children at all.
    pub fn is_container(self) -> bool {
        matches!(
            self,
            Kind::Paragraph
                | Kind::Heading
                | Kind::Emphasis
                | Kind::Strong
                | Kind::Strikethrough
                | Kind::Link
                | Kind::Image
                | Kind::Property
                | Kind::Block
                | Kind::Blockquote
                | Kind::ListItem
                | Kind::List
                | Kind::Properties
                | Kind::Logbook
        )
    }
}

impl NodeKind {
    pub fn kind(&self) -> Kind {
        match self {
            NodeKind::Text { .. } => Kind::Text,
            NodeKind::RawText { .. } => Kind::RawText,
            NodeKind::CodeSpan { .. } => Kind::CodeSpan,
            NodeKind::Emphasis => Kind::Emphasis,
            NodeKind::Strong => Kind::Strong,
            NodeKind::Strikethrough => Kind::Strikethrough,
            NodeKind::Link { .. } => Kind::Link,
            NodeKind::AutoLink { .. } => Kind::AutoLink,
            NodeKind::PageLink { .. } => Kind::PageLink,
            NodeKind::Hashtag { .. } => Kind::Hashtag,
            NodeKind::BlockRef { .. } => Kind::BlockRef,
            NodeKind::Image { .. } => Kind::Image,
            NodeKind::RawHtml { .. } => Kind::RawHtml,
            NodeKind::Macro { .. } => Kind::Macro,
            NodeKind::Query { .. } => Kind::Query,
            NodeKind::PageEmbed { .. } => Kind::PageEmbed,
            NodeKind::BlockEmbed { .. } => Kind::BlockEmbed,
            NodeKind::Cloze { .. } => Kind::Cloze,
            NodeKind::TaskMarker { .. } => Kind::TaskMarker,
            NodeKind::Paragraph { .. } => Kind::Paragraph,
            NodeKind::Heading { .. } => Kind::Heading,
            NodeKind::Blockquote { .. } => Kind::Blockquote,
            NodeKind::List { .. } => Kind::List,
            NodeKind::ListItem => Kind::ListItem,
            NodeKind::CodeBlock { .. } => Kind::CodeBlock,
            NodeKind::ThematicBreak => Kind::ThematicBreak,
            NodeKind::RawHtmlBlock { .. } => Kind::RawHtmlBlock,
            NodeKind::Properties { .. } => Kind::Properties,
            NodeKind::Property { .. } => Kind::Property,
            NodeKind::AdvancedCommand { .. } => Kind::AdvancedCommand,
            NodeKind::QueryCommand { .. } => Kind::QueryCommand,
            NodeKind::Logbook { .. } => Kind::Logbook,
            NodeKind::LogbookEntry { .. } => Kind::LogbookEntry,
            NodeKind::Block => Kind::Block,
        }
    }

    pub fn text(value: impl Into<String>) -> Self {
        NodeKind::Text {
            value: value.into(),
            line_break: None,
        }
    }

    /// The previous-line hint, for kinds that carry one.
    pub fn previous_line(&self) -> Option<PreviousLine> {
        match self {
            NodeKind::Paragraph { previous_line }
            | NodeKind::Blockquote { previous_line }
            | NodeKind::List { previous_line, .. }
            | NodeKind::CodeBlock { previous_line, .. }
            | NodeKind::Properties { previous_line }
            | NodeKind::Logbook { previous_line } => Some(*previous_line),
            _ => None,
        }
    }

    /// Sets the previous-line hint. Returns false for kinds without one.
    pub fn set_previous_line(&mut self, hint: PreviousLine) -> bool {
        match self {
            NodeKind::Paragraph { previous_line }
            | NodeKind::Blockquote { previous_line }
            | NodeKind::List { previous_line, .. }
            | NodeKind::CodeBlock { previous_line, .. }
            | NodeKind::Properties { previous_line }
            | NodeKind::Logbook { previous_line } => {
                *previous_line = hint;
                true
            }
            _ => false,
        }
    }

    /// The URL a link-like node points at.
    pub fn link_url(&self) -> Option<&str> {
        match self {
            NodeKind::Link { url, .. } | NodeKind::AutoLink { url } => Some(url),
            NodeKind::Image { src, .. } => Some(src),
            _ => None,
        }
    }

    /// The page a page reference (page link or hashtag) points at.
    pub fn page_target(&self) -> Option<&str> {
        match self {
            NodeKind::PageLink { to } | NodeKind::Hashtag { to } => Some(to),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Kind::Paragraph, Kind::Text, true)]
    #[case(Kind::Paragraph, Kind::Properties, true)]
    #[case(Kind::Paragraph, Kind::Paragraph, false)]
    #[case(Kind::Heading, Kind::Properties, false)]
    #[case(Kind::Emphasis, Kind::Strong, true)]
    #[case(Kind::Block, Kind::Block, true)]
    #[case(Kind::Block, Kind::Text, false)]
    #[case(Kind::Properties, Kind::Property, true)]
    #[case(Kind::Properties, Kind::Text, false)]
    #[case(Kind::Property, Kind::PageLink, true)]
    #[case(Kind::Logbook, Kind::LogbookEntry, true)]
    #[case(Kind::Logbook, Kind::Paragraph, false)]
    #[case(Kind::Text, Kind::Text, false)]
    #[case(Kind::CodeBlock, Kind::Text, false)]
    fn child_type_gates(#[case] parent: Kind, #[case] child: Kind, #[case] expected: bool) {
        assert_eq!(parent.accepts(child), expected);
    }

    #[test]
    fn previous_line_only_on_aware_kinds() {
        let mut heading = NodeKind::Heading { level: 1 };
        assert_eq!(heading.previous_line(), None);
        assert!(!heading.set_previous_line(PreviousLine::Blank));

        let mut paragraph = NodeKind::Paragraph {
            previous_line: PreviousLine::Automatic,
        };
        assert!(paragraph.set_previous_line(PreviousLine::Blank));
        assert_eq!(paragraph.previous_line(), Some(PreviousLine::Blank));
    }
}
