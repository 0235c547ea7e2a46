use crate::{
    nodes::{Kind, ListType, NodeId, NodeKind, PreviousLine, Tree},
    parsing::inline::parse_inline,
};

use super::{
    kinds::{
        AtxHeading, BeginEnd, BlockQuote, CodeFence, Fence, HtmlBlock, IndentedCode, ListMarker,
        Logbook, Paragraph, ThematicBreak,
    },
    line::Line,
};

/// List properties shared by a list and its items.
#[derive(Debug, Clone, Copy)]
struct ListData {
    ordered: bool,
    ch: u8,
    /// Column where the marker starts.
    marker_offset: usize,
    /// Columns from the marker to the item content.
    padding: usize,
}

impl ListData {
    fn continues(&self, other: &ListData) -> bool {
        self.ordered == other.ordered && self.ch == other.ch
    }

    fn content_column(&self) -> usize {
        self.marker_offset + self.padding
    }
}

/// Parser state of an open block. Leaf states collect raw lines that are
/// turned into node content when the block closes.
#[derive(Debug)]
enum State {
    Document,
    Blockquote,
    List(ListData),
    ListItem(ListData),
    Paragraph(Vec<String>),
    Heading,
    ThematicBreak,
    FencedCode {
        fence: Fence,
        offset: usize,
        lines: Vec<String>,
    },
    IndentedCode(Vec<String>),
    HtmlBlock {
        condition: u8,
        lines: Vec<String>,
    },
    Logbook {
        indent: usize,
        lines: Vec<String>,
    },
    BeginEnd {
        token: String,
        indent: usize,
        lines: Vec<String>,
    },
}

impl State {
    /// Leaves whose lines are taken verbatim, without looking for new blocks.
    fn takes_raw_lines(&self) -> bool {
        matches!(
            self,
            State::FencedCode { .. }
                | State::IndentedCode(_)
                | State::HtmlBlock { .. }
                | State::Logbook { .. }
                | State::BeginEnd { .. }
        )
    }

    fn can_contain(&self, kind: Kind) -> bool {
        match self {
            State::Document | State::Blockquote | State::ListItem(_) => kind != Kind::ListItem,
            State::List(_) => kind == Kind::ListItem,
            _ => false,
        }
    }

    fn lines_mut(&mut self) -> Option<&mut Vec<String>> {
        match self {
            State::Paragraph(lines)
            | State::FencedCode { lines, .. }
            | State::IndentedCode(lines)
            | State::HtmlBlock { lines, .. }
            | State::Logbook { lines, .. }
            | State::BeginEnd { lines, .. } => Some(lines),
            _ => None,
        }
    }
}

#[derive(Debug)]
struct OpenBlock {
    node: NodeId,
    state: State,
}

enum Continuation {
    Matched,
    Unmatched,
    /// The line closed the block and has nothing left for other blocks.
    Consumed,
}

enum Start {
    Container,
    Leaf,
    /// A leaf whose opening line carries no content of its own.
    Opener,
}

/// Line-by-line block parser.
///
/// Keeps the stack of open blocks. Each line first walks the stack to see
/// which blocks it continues, then looks for new block starts, then adds
/// what remains to the innermost block. Nodes are attached to the tree as
/// soon as their block opens; leaf content is filled in on close. Inline
/// content is parsed once all lines are in.
pub struct BlockBuilder {
    tree: Tree,
    open: Vec<OpenBlock>,
    last_matched: usize,
    all_closed: bool,
    previous_blank: bool,
    inline: Vec<(NodeId, String)>,
}

impl BlockBuilder {
    pub fn new() -> Self {
        let tree = Tree::new();
        let root = tree.root();
        Self {
            tree,
            open: vec![OpenBlock {
                node: root,
                state: State::Document,
            }],
            last_matched: 0,
            all_closed: true,
            previous_blank: false,
            inline: Vec::new(),
        }
    }

    pub fn push(&mut self, raw: &str) {
        let mut line = Line::new(raw);

        let mut matched = 0;
        for i in 1..self.open.len() {
            line.find_next_nonspace();
            match self.continues(i, &mut line) {
                Continuation::Matched => matched = i,
                Continuation::Unmatched => break,
                Continuation::Consumed => {
                    self.previous_blank = false;
                    return;
                }
            }
        }
        self.last_matched = matched;
        self.all_closed = matched == self.top();

        let mut container = matched;
        let mut leaf = self.open[container].state.takes_raw_lines();
        while !leaf {
            line.find_next_nonspace();
            match self.try_start(&mut line, container) {
                Some(Start::Container) => container = self.top(),
                Some(Start::Leaf) => {
                    container = self.top();
                    leaf = true;
                }
                Some(Start::Opener) => {
                    self.previous_blank = false;
                    return;
                }
                None => {
                    line.advance_next_nonspace();
                    break;
                }
            }
        }

        let lazy = !self.all_closed
            && !line.blank
            && matches!(self.open[self.top()].state, State::Paragraph(_));
        if lazy {
            self.add_line(&line);
        } else {
            self.close_unmatched();
            self.add_remainder(&line);
        }
        self.previous_blank = line.blank;
    }

    /// Closes every open block, parses inline content and returns the tree.
    pub fn finish(mut self) -> Tree {
        while self.open.len() > 1 {
            self.close_top();
        }
        for (node, content) in std::mem::take(&mut self.inline) {
            if self.tree.parent(node).is_some() {
                parse_inline(&mut self.tree, node, &content);
            }
        }
        self.tree
    }

    fn top(&self) -> usize {
        self.open.len() - 1
    }

    fn continues(&mut self, i: usize, line: &mut Line) -> Continuation {
        let node = self.open[i].node;
        let mut close = false;
        let result = match &self.open[i].state {
            State::Document | State::List(_) => Continuation::Matched,
            State::Blockquote => {
                if !line.is_indented() && BlockQuote::starts(line.from_next_nonspace()) {
                    consume_quote_marker(line);
                    Continuation::Matched
                } else {
                    Continuation::Unmatched
                }
            }
            State::ListItem(data) => {
                if line.blank {
                    if self.tree.has_children(node) {
                        line.advance_next_nonspace();
                        Continuation::Matched
                    } else {
                        Continuation::Unmatched
                    }
                } else if line.indent >= data.content_column() {
                    line.advance_offset(data.content_column(), true);
                    Continuation::Matched
                } else {
                    Continuation::Unmatched
                }
            }
            State::Paragraph(_) => {
                if line.blank {
                    Continuation::Unmatched
                } else {
                    Continuation::Matched
                }
            }
            State::Heading | State::ThematicBreak => Continuation::Unmatched,
            State::FencedCode { fence, offset, .. } => {
                if line.indent < IndentedCode::INDENT
                    && CodeFence::closes(fence, line.from_next_nonspace())
                {
                    close = true;
                    Continuation::Consumed
                } else {
                    strip_indent(line, *offset);
                    Continuation::Matched
                }
            }
            State::IndentedCode(_) => {
                if line.is_indented() {
                    line.advance_offset(IndentedCode::INDENT, true);
                    Continuation::Matched
                } else if line.blank {
                    line.advance_next_nonspace();
                    Continuation::Matched
                } else {
                    Continuation::Unmatched
                }
            }
            State::HtmlBlock { condition, .. } => {
                if line.blank && HtmlBlock::ends_at_blank(*condition) {
                    Continuation::Unmatched
                } else {
                    Continuation::Matched
                }
            }
            State::Logbook { indent, .. } => {
                if Logbook::closes(line.from_next_nonspace()) {
                    close = true;
                    Continuation::Consumed
                } else {
                    strip_indent(line, *indent);
                    Continuation::Matched
                }
            }
            State::BeginEnd { token, indent, .. } => {
                if BeginEnd::closes(token, line.from_next_nonspace()) {
                    close = true;
                    Continuation::Consumed
                } else {
                    strip_indent(line, *indent);
                    Continuation::Matched
                }
            }
        };
        if close {
            self.close_top();
        }
        result
    }

    fn try_start(&mut self, line: &mut Line, container: usize) -> Option<Start> {
        let interrupts_paragraph = matches!(self.open[container].state, State::Paragraph(_));
        let rest = line.from_next_nonspace();

        if !line.is_indented() {
            if BlockQuote::starts(rest) {
                consume_quote_marker(line);
                self.close_unmatched();
                self.open_block(
                    NodeKind::Blockquote {
                        previous_line: PreviousLine::Automatic,
                    },
                    State::Blockquote,
                );
                return Some(Start::Container);
            }

            if let Some((level, content)) = AtxHeading::open(rest) {
                line.advance_to_end();
                self.close_unmatched();
                let node = self.open_block(NodeKind::Heading { level }, State::Heading);
                if !content.is_empty() {
                    self.inline.push((node, content));
                }
                return Some(Start::Leaf);
            }

            if let Some(fence) = CodeFence::open(rest) {
                let offset = line.indent;
                line.advance_to_end();
                self.close_unmatched();
                self.open_block(
                    NodeKind::CodeBlock {
                        language: fence.info.clone(),
                        code: String::new(),
                        previous_line: PreviousLine::Automatic,
                    },
                    State::FencedCode {
                        fence,
                        offset,
                        lines: Vec::new(),
                    },
                );
                return Some(Start::Opener);
            }

            if Logbook::opens(rest) {
                let indent = line.indent;
                line.advance_to_end();
                self.close_unmatched();
                self.open_block(
                    NodeKind::Logbook {
                        previous_line: PreviousLine::Automatic,
                    },
                    State::Logbook {
                        indent,
                        lines: Vec::new(),
                    },
                );
                return Some(Start::Opener);
            }

            if let Some(token) = BeginEnd::open(rest) {
                let indent = line.indent;
                line.advance_to_end();
                self.close_unmatched();
                self.open_block(
                    BeginEnd::node(&token, String::new()),
                    State::BeginEnd {
                        token,
                        indent,
                        lines: Vec::new(),
                    },
                );
                return Some(Start::Opener);
            }

            if let Some(condition) = HtmlBlock::start(rest, interrupts_paragraph) {
                self.close_unmatched();
                self.open_block(
                    NodeKind::RawHtmlBlock {
                        html: String::new(),
                    },
                    State::HtmlBlock {
                        condition,
                        lines: Vec::new(),
                    },
                );
                return Some(Start::Leaf);
            }

            if ThematicBreak::matches(rest) {
                line.advance_to_end();
                self.close_unmatched();
                self.open_block(NodeKind::ThematicBreak, State::ThematicBreak);
                return Some(Start::Leaf);
            }
        }

        let in_list = matches!(self.open[container].state, State::List(_));
        if (!line.is_indented() || in_list)
            && let Some(data) = parse_list_marker(line, interrupts_paragraph)
        {
            self.close_unmatched();
            let continues_list =
                matches!(&self.open[self.top()].state, State::List(list) if list.continues(&data));
            if !continues_list {
                let list_type = if data.ordered {
                    ListType::Ordered
                } else {
                    ListType::Unordered
                };
                let kind = NodeKind::List {
                    list_type,
                    marker: data.ch,
                    previous_line: PreviousLine::Automatic,
                };
                self.open_block(kind, State::List(data));
            }
            self.open_block(NodeKind::ListItem, State::ListItem(data));
            return Some(Start::Container);
        }

        let after_paragraph = matches!(self.open[self.top()].state, State::Paragraph(_));
        if line.is_indented() && !line.blank && !after_paragraph {
            line.advance_offset(IndentedCode::INDENT, true);
            self.close_unmatched();
            self.open_block(
                NodeKind::CodeBlock {
                    language: String::new(),
                    code: String::new(),
                    previous_line: PreviousLine::Automatic,
                },
                State::IndentedCode(Vec::new()),
            );
            return Some(Start::Leaf);
        }

        None
    }

    /// Handles what is left of a line once containers and starts are done.
    fn add_remainder(&mut self, line: &Line) {
        let top = self.top();
        match &self.open[top].state {
            State::HtmlBlock { condition, .. } => {
                let ends = HtmlBlock::ends(*condition, &line.rest());
                self.add_line(line);
                if ends {
                    self.close_top();
                }
            }
            state if state.takes_raw_lines() => self.add_line(line),
            State::Paragraph(_) => self.add_line(line),
            State::Heading | State::ThematicBreak => {}
            _ => {
                if !line.blank {
                    self.open_block(
                        NodeKind::Paragraph {
                            previous_line: PreviousLine::Automatic,
                        },
                        State::Paragraph(Vec::new()),
                    );
                    self.add_line(line);
                }
            }
        }
    }

    fn add_line(&mut self, line: &Line) {
        let top = self.top();
        if let Some(lines) = self.open[top].state.lines_mut() {
            lines.push(line.rest());
        }
    }

    /// Opens a block below the innermost block that can hold it, closing
    /// leaves on the way.
    fn open_block(&mut self, mut kind: NodeKind, state: State) -> NodeId {
        while self.open.len() > 1 && !self.open[self.top()].state.can_contain(kind.kind()) {
            self.close_top();
        }
        let parent = self.open[self.top()].node;
        kind.set_previous_line(self.previous_line(parent));
        let node = self.tree.alloc(kind);
        self.tree.add_child(parent, node);
        self.open.push(OpenBlock { node, state });
        node
    }

    fn previous_line(&self, parent: NodeId) -> PreviousLine {
        if !self.tree.has_children(parent) {
            PreviousLine::Automatic
        } else if self.previous_blank {
            PreviousLine::Blank
        } else {
            PreviousLine::NonBlank
        }
    }

    fn close_unmatched(&mut self) {
        if self.all_closed {
            return;
        }
        while self.top() > self.last_matched {
            self.close_top();
        }
        self.all_closed = true;
    }

    fn close_top(&mut self) {
        let Some(OpenBlock { node, state }) = self.open.pop() else {
            return;
        };
        match state {
            State::Paragraph(lines) => {
                let content = Paragraph::content(&lines);
                if content.is_empty() {
                    self.tree.remove_self(node);
                } else {
                    self.inline.push((node, content));
                }
            }
            State::FencedCode { lines, .. } => self.set_code(node, lines.join("\n")),
            State::IndentedCode(lines) => self.set_code(node, IndentedCode::content(&lines)),
            State::HtmlBlock { lines, .. } => {
                if let NodeKind::RawHtmlBlock { html } = self.tree.kind_mut(node) {
                    *html = lines.join("\n");
                }
            }
            State::Logbook { lines, .. } => {
                for value in lines {
                    let entry = self.tree.alloc(NodeKind::LogbookEntry { value });
                    self.tree.add_child(node, entry);
                }
            }
            State::BeginEnd { token, lines, .. } => {
                let value: String = lines.iter().map(|l| format!("{l}\n")).collect();
                *self.tree.kind_mut(node) = BeginEnd::node(&token, value);
            }
            State::Document
            | State::Blockquote
            | State::List(_)
            | State::ListItem(_)
            | State::Heading
            | State::ThematicBreak => {}
        }
    }

    fn set_code(&mut self, node: NodeId, value: String) {
        if let NodeKind::CodeBlock { code, .. } = self.tree.kind_mut(node) {
            *code = value;
        }
    }
}

impl Default for BlockBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Consumes `>` and one optional following space.
fn consume_quote_marker(line: &mut Line) {
    line.advance_next_nonspace();
    line.advance_offset(1, false);
    if matches!(line.peek(), Some(b' ' | b'\t')) {
        line.advance_offset(1, true);
    }
}

/// Consumes up to `columns` spaces of indentation.
fn strip_indent(line: &mut Line, columns: usize) {
    let mut left = columns;
    while left > 0 && matches!(line.peek(), Some(b' ' | b'\t')) {
        line.advance_offset(1, true);
        left -= 1;
    }
}

/// Consumes a list marker and the spaces after it, working out the item's
/// content column.
fn parse_list_marker(line: &mut Line, interrupts_paragraph: bool) -> Option<ListData> {
    if line.is_indented() {
        return None;
    }
    let marker = ListMarker::scan(line.from_next_nonspace(), interrupts_paragraph)?;
    let marker_offset = line.indent;

    line.advance_next_nonspace();
    line.advance_offset(marker.len, true);
    let (start_offset, start_column) = (line.offset, line.column);
    loop {
        line.advance_offset(1, true);
        let more = matches!(line.peek(), Some(b' ' | b'\t'));
        if line.column - start_column >= 5 || !more {
            break;
        }
    }

    let blank_item = line.peek().is_none();
    let spaces = line.column - start_column;
    let padding = if spaces >= 5 || spaces < 1 || blank_item {
        line.reset_to(start_offset, start_column);
        if matches!(line.peek(), Some(b' ' | b'\t')) {
            line.advance_offset(1, true);
        }
        marker.len + 1
    } else {
        marker.len + spaces
    };

    Some(ListData {
        ordered: marker.ordered,
        ch: marker.ch,
        marker_offset,
        padding,
    })
}
