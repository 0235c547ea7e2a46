use std::collections::HashMap;

use crate::{
    nodes::{LineBreak, NodeId, NodeKind, Tree},
    parsing::rope::Span,
};

use super::{
    cursor::Cursor,
    kinds::{
        AutoLink, BlockRef, CodeSpan, Escape, Hashtag, Link, Macro, PageLink, RawHtml,
        bare_url_extent,
    },
};

/// Parses inline content and appends the resulting nodes to `parent`.
///
/// Text nodes are built straight into the tree. Emphasis, strong and
/// strikethrough are resolved afterwards with a delimiter stack, links and
/// images with a bracket stack, both following the CommonMark algorithm.
/// Finally text nodes that are contiguous in the source are merged.
///
/// # Raw Zone Precedence
/// Code spans are checked first and suppress all other parsing inside them.
/// Extended constructs (macros, block refs, page links, hashtags and bare
/// URLs) never cross a line break.
pub fn parse_inline(tree: &mut Tree, parent: NodeId, content: &str) {
    let mut parser = InlineParser {
        tree,
        parent,
        cur: Cursor::new(content),
        text_start: 0,
        spans: HashMap::new(),
        delimiters: Vec::new(),
        brackets: Vec::new(),
    };
    parser.run();
}

/// An emphasis or strikethrough run waiting for a partner.
#[derive(Debug, Clone, Copy)]
struct Delimiter {
    /// Text node holding the run.
    node: NodeId,
    ch: u8,
    /// Characters not yet used by a match.
    len: usize,
    orig_len: usize,
    can_open: bool,
    can_close: bool,
}

/// An opening `[` or `![` waiting for its `]`.
#[derive(Debug, Clone, Copy)]
struct Bracket {
    node: NodeId,
    image: bool,
    active: bool,
}

struct InlineParser<'a, 't> {
    tree: &'t mut Tree,
    parent: NodeId,
    cur: Cursor<'a>,
    /// Start of literal text not yet flushed into a node.
    text_start: usize,
    /// Source spans of text nodes, used to merge neighbours.
    spans: HashMap<NodeId, Span>,
    delimiters: Vec<Delimiter>,
    brackets: Vec<Bracket>,
}

impl InlineParser<'_, '_> {
    fn run(&mut self) {
        while let Some(b) = self.cur.peek() {
            let handled = match b {
                Escape::BACKSLASH => self.try_parse_escape(),
                b'\n' => {
                    self.parse_line_break();
                    true
                }
                CodeSpan::TICK => {
                    self.parse_code_span();
                    true
                }
                b'{' => self.try_parse_macro(),
                b'(' => self.try_parse_block_ref(),
                Link::OPEN => {
                    self.parse_open_bracket();
                    true
                }
                b'!' => self.try_parse_image_open(),
                Link::CLOSE => {
                    self.parse_close_bracket();
                    true
                }
                Hashtag::HASH => self.try_parse_hashtag(),
                AutoLink::OPEN => self.try_parse_angle(),
                b'*' | b'_' | b'~' => {
                    self.parse_delimiter_run(b);
                    true
                }
                b'h' | b'f' => self.try_linkify(),
                _ => false,
            };
            if !handled {
                self.cur.bump_char();
            }
        }

        self.flush_text(self.cur.pos());
        self.process_emphasis(None);
        merge_texts(self.tree, self.parent, &self.spans);
    }

    /// Turns pending literal text up to `end` into a text node.
    fn flush_text(&mut self, end: usize) -> Option<NodeId> {
        let start = self.text_start;
        self.text_start = end.max(start);
        if end <= start {
            return None;
        }
        Some(self.append_text(&self.cur.s[start..end], Span { start, end }))
    }

    fn append_text(&mut self, value: &str, span: Span) -> NodeId {
        let node = self.tree.alloc(NodeKind::text(value));
        self.tree.add_child(self.parent, node);
        self.spans.insert(node, span);
        node
    }

    /// Appends a node covering `start..end` and moves the cursor past it.
    fn push_node(&mut self, kind: NodeKind, start: usize, end: usize) -> NodeId {
        self.flush_text(start);
        let node = match kind {
            NodeKind::Text { value, .. } => self.append_text(&value, Span { start, end }),
            kind => {
                let node = self.tree.alloc(kind);
                self.tree.add_child(self.parent, node);
                node
            }
        };
        self.cur.bump_n(end - self.cur.pos());
        self.text_start = end;
        node
    }

    fn try_parse_escape(&mut self) -> bool {
        let start = self.cur.pos();
        match self.cur.peek_at(1) {
            Some(b'\n') => {
                self.end_line(start, LineBreak::Hard);
                self.cur.bump_n(2);
                self.skip_line_indent();
                true
            }
            Some(c) if Escape::is_escapable(c) => {
                let value = char::from(c).to_string();
                self.push_node(NodeKind::text(value), start, start + 2);
                true
            }
            _ => false,
        }
    }

    fn parse_line_break(&mut self) {
        let newline = self.cur.pos();
        let pending = &self.cur.s[self.text_start.min(newline)..newline];
        let spaces = pending.bytes().rev().take_while(|&b| b == b' ').count();
        let kept = pending.trim_end_matches([' ', '\t']).len();
        let brk = if spaces >= 2 {
            LineBreak::Hard
        } else {
            LineBreak::Soft
        };
        self.end_line(self.text_start + kept, brk);
        self.cur.bump_n(1);
        self.skip_line_indent();
    }

    /// Ends the current line at `end`, putting the break on the last text.
    fn end_line(&mut self, end: usize, brk: LineBreak) {
        let target = match self.flush_text(end) {
            Some(text) => text,
            None => match self.tree.last_child(self.parent) {
                Some(last) if self.can_carry_break(last) => last,
                _ => self.append_text("", Span { start: end, end }),
            },
        };
        if let NodeKind::Text { line_break, .. } = self.tree.kind_mut(target) {
            *line_break = Some(brk);
        }
    }

    /// Plain text without a break that is not a pending delimiter or bracket.
    fn can_carry_break(&self, node: NodeId) -> bool {
        matches!(self.tree.kind(node), NodeKind::Text { line_break: None, .. })
            && !self.delimiters.iter().any(|d| d.node == node)
            && !self.brackets.iter().any(|b| b.node == node)
    }

    fn skip_line_indent(&mut self) {
        while matches!(self.cur.peek(), Some(b' ' | b'\t')) {
            self.cur.bump_n(1);
        }
        self.text_start = self.cur.pos();
    }

    fn parse_code_span(&mut self) {
        let start = self.cur.pos();
        match CodeSpan::scan(self.cur.rest()) {
            Some((value, len)) => {
                self.push_node(NodeKind::CodeSpan { value }, start, start + len);
            }
            None => {
                let run = self.cur.run_length(CodeSpan::TICK);
                self.cur.bump_n(run);
            }
        }
    }

    fn try_parse_macro(&mut self) -> bool {
        if !self.cur.starts_with(Macro::OPEN) {
            return false;
        }
        let start = self.cur.pos();
        let Some((call, len)) = Macro::scan(self.cur.rest_of_line()) else {
            return false;
        };
        self.push_node(call.into_node(), start, start + len);
        true
    }

    fn try_parse_block_ref(&mut self) -> bool {
        if !self.cur.starts_with(BlockRef::OPEN) {
            return false;
        }
        let start = self.cur.pos();
        let Some((id, len)) = BlockRef::scan(self.cur.rest_of_line()) else {
            return false;
        };
        self.push_node(NodeKind::BlockRef { id }, start, start + len);
        true
    }

    fn parse_open_bracket(&mut self) {
        let start = self.cur.pos();
        if let Some((to, len)) = PageLink::scan(self.cur.rest_of_line()) {
            self.push_node(NodeKind::PageLink { to }, start, start + len);
            return;
        }
        let node = self.push_node(NodeKind::text("["), start, start + 1);
        self.brackets.push(Bracket {
            node,
            image: false,
            active: true,
        });
    }

    fn try_parse_image_open(&mut self) -> bool {
        if !self.cur.starts_with(Link::IMAGE) || PageLink::scan(&self.cur.rest_of_line()[1..]).is_some()
        {
            return false;
        }
        let start = self.cur.pos();
        let node = self.push_node(NodeKind::text("!["), start, start + 2);
        self.brackets.push(Bracket {
            node,
            image: true,
            active: true,
        });
        true
    }

    fn parse_close_bracket(&mut self) {
        let start = self.cur.pos();
        let tail = match self.brackets.last() {
            Some(bracket) if bracket.active => Link::scan_tail(&self.cur.s[start + 1..]),
            _ => None,
        };
        let (Some(bracket), Some(tail)) = (self.brackets.pop(), tail) else {
            self.cur.bump_n(1);
            return;
        };

        self.flush_text(start);
        let kind = if bracket.image {
            NodeKind::Image {
                src: tail.destination,
                title: tail.title,
            }
        } else {
            NodeKind::Link {
                url: tail.destination,
                title: tail.title,
            }
        };
        let link = self.tree.alloc(kind);
        let container = self.tree.parent(bracket.node).unwrap_or(self.parent);

        let mut inner = Vec::new();
        let mut next = self.tree.next_sibling(bracket.node);
        while let Some(node) = next {
            next = self.tree.next_sibling(node);
            inner.push(node);
        }
        self.tree.add_children(link, inner);
        self.tree.insert_child_after(container, link, bracket.node);

        self.process_emphasis(Some(bracket.node));
        self.tree.remove_self(bracket.node);
        self.spans.remove(&bracket.node);

        if !bracket.image {
            for earlier in self.brackets.iter_mut().filter(|b| !b.image) {
                earlier.active = false;
            }
        }

        let end = start + 1 + tail.len;
        self.cur.bump_n(end - start);
        self.text_start = end;
    }

    fn try_parse_hashtag(&mut self) -> bool {
        if !self.cur.prev_char().is_none_or(char::is_whitespace) {
            return false;
        }
        let start = self.cur.pos();
        let Some((to, len)) = Hashtag::scan(self.cur.rest_of_line()) else {
            return false;
        };
        self.push_node(NodeKind::Hashtag { to }, start, start + len);
        true
    }

    fn try_parse_angle(&mut self) -> bool {
        let start = self.cur.pos();
        if let Some((url, len)) = AutoLink::scan(self.cur.rest()) {
            self.push_node(NodeKind::AutoLink { url }, start, start + len);
            return true;
        }
        if let Some(len) = RawHtml::scan(self.cur.rest()) {
            let html = self.cur.s[start..start + len].to_string();
            self.push_node(NodeKind::RawHtml { html }, start, start + len);
            return true;
        }
        false
    }

    fn try_linkify(&mut self) -> bool {
        let at_boundary = self
            .cur
            .prev_char()
            .is_none_or(|c| c.is_whitespace() || matches!(c, '*' | '_' | '~' | '('));
        if !at_boundary || !AutoLink::starts_bare(self.cur.rest()) {
            return false;
        }
        let start = self.cur.pos();
        let Some(len) = bare_url_extent(self.cur.rest_of_line()) else {
            return false;
        };
        let url = self.cur.s[start..start + len].to_string();
        self.push_node(NodeKind::AutoLink { url }, start, start + len);
        true
    }

    fn parse_delimiter_run(&mut self, ch: u8) {
        let start = self.cur.pos();
        let run = self.cur.run_length(ch);
        let end = start + run;
        if ch == b'~' && run != 2 {
            self.cur.bump_n(run);
            return;
        }

        let before = self.cur.prev_char();
        let after = self.cur.s[end..].chars().next();
        let (can_open, can_close) = flanking(ch, before, after);
        let run_text = self.cur.s[start..end].to_string();
        let node = self.push_node(NodeKind::text(run_text), start, end);
        if can_open || can_close {
            self.delimiters.push(Delimiter {
                node,
                ch,
                len: run,
                orig_len: run,
                can_open,
                can_close,
            });
        }
    }

    /// Matches delimiter runs after `bottom` into emphasis, strong and
    /// strikethrough nodes, then drops them from the stack.
    fn process_emphasis(&mut self, bottom: Option<NodeId>) {
        let start = self
            .delimiters
            .iter()
            .position(|d| bottom.is_none_or(|b| d.node > b))
            .unwrap_or(self.delimiters.len());
        let mut openers_bottom: HashMap<(u8, bool, usize), NodeId> = HashMap::new();

        let mut closer = start;
        while closer < self.delimiters.len() {
            let d = self.delimiters[closer];
            if !d.can_close {
                closer += 1;
                continue;
            }

            let key = (d.ch, d.can_open, d.orig_len % 3);
            let limit = openers_bottom.get(&key).copied();
            let mut opener = None;
            let mut i = closer;
            while i > start {
                i -= 1;
                let o = self.delimiters[i];
                if limit.is_some_and(|l| o.node <= l) {
                    break;
                }
                if o.ch == d.ch && o.can_open {
                    let odd_match = (d.can_open || o.can_close)
                        && d.orig_len % 3 != 0
                        && (o.orig_len + d.orig_len) % 3 == 0;
                    if !odd_match || d.ch == b'~' {
                        opener = Some(i);
                        break;
                    }
                }
            }

            match opener {
                Some(o) => closer = self.match_delimiters(o, closer),
                None => {
                    if closer > start {
                        openers_bottom.insert(key, self.delimiters[closer - 1].node);
                    }
                    if d.can_open {
                        closer += 1;
                    } else {
                        self.delimiters.remove(closer);
                    }
                }
            }
        }

        self.delimiters.truncate(start);
    }

    /// Wraps the nodes between two matched delimiters. Returns the index of
    /// the next closer to look at.
    fn match_delimiters(&mut self, opener: usize, closer: usize) -> usize {
        let o = self.delimiters[opener];
        let c = self.delimiters[closer];
        let (used, kind) = match o.ch {
            b'~' => (2, NodeKind::Strikethrough),
            _ if o.len >= 2 && c.len >= 2 => (2, NodeKind::Strong),
            _ => (1, NodeKind::Emphasis),
        };

        self.shrink_run(o.node, used, false);
        self.shrink_run(c.node, used, true);
        self.delimiters[opener].len -= used;
        self.delimiters[closer].len -= used;

        let wrapper = self.tree.alloc(kind);
        let mut inner = Vec::new();
        let mut next = self.tree.next_sibling(o.node);
        while let Some(node) = next {
            if node == c.node {
                break;
            }
            next = self.tree.next_sibling(node);
            inner.push(node);
        }
        self.tree.add_children(wrapper, inner);
        if let Some(container) = self.tree.parent(o.node) {
            self.tree.insert_child_after(container, wrapper, o.node);
        }

        self.delimiters.drain(opener + 1..closer);
        let mut closer = opener + 1;
        if self.delimiters[opener].len == 0 {
            self.remove_run(opener);
            closer -= 1;
        }
        if self.delimiters[closer].len == 0 {
            self.remove_run(closer);
        }
        closer
    }

    fn shrink_run(&mut self, node: NodeId, by: usize, from_start: bool) {
        if let NodeKind::Text { value, .. } = self.tree.kind_mut(node) {
            if from_start {
                value.drain(..by);
            } else {
                value.truncate(value.len() - by);
            }
        }
        if let Some(span) = self.spans.get_mut(&node) {
            if from_start {
                span.start += by;
            } else {
                span.end -= by;
            }
        }
    }

    fn remove_run(&mut self, index: usize) {
        let d = self.delimiters.remove(index);
        self.tree.remove_self(d.node);
        self.spans.remove(&d.node);
    }
}

/// Whether a delimiter run can open and close emphasis, given the
/// characters around it.
fn flanking(ch: u8, before: Option<char>, after: Option<char>) -> (bool, bool) {
    let before_ws = before.is_none_or(char::is_whitespace);
    let after_ws = after.is_none_or(char::is_whitespace);
    let before_punct = before.is_some_and(is_punctuation);
    let after_punct = after.is_some_and(is_punctuation);

    let left = !after_ws && (!after_punct || before_ws || before_punct);
    let right = !before_ws && (!before_punct || after_ws || after_punct);
    if ch == b'_' {
        (left && (!right || before_punct), right && (!left || after_punct))
    } else {
        (left, right)
    }
}

fn is_punctuation(c: char) -> bool {
    c.is_ascii_punctuation() || (!c.is_ascii() && !c.is_alphanumeric() && !c.is_whitespace())
}

/// Merges text nodes whose source spans touch, keeping the later break.
fn merge_texts(tree: &mut Tree, parent: NodeId, spans: &HashMap<NodeId, Span>) {
    let children: Vec<NodeId> = tree.children(parent).collect();
    let mut previous: Option<(NodeId, Span)> = None;

    for child in children {
        let kind = tree.tag(child);
        if kind.is_container() {
            merge_texts(tree, child, spans);
            previous = None;
            continue;
        }

        let (Some(&span), NodeKind::Text { value, line_break }) = (spans.get(&child), tree.kind(child))
        else {
            previous = None;
            continue;
        };

        match previous {
            Some((prev, prev_span)) if prev_span.touches(span) => {
                let (value, line_break) = (value.clone(), *line_break);
                if let NodeKind::Text {
                    value: prev_value,
                    line_break: prev_break,
                } = tree.kind_mut(prev)
                {
                    prev_value.push_str(&value);
                    *prev_break = line_break;
                }
                tree.remove_self(child);
                previous = line_break.is_none().then_some((prev, prev_span.join(span)));
            }
            _ => previous = line_break.is_none().then_some((child, span)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        debug::debug,
        nodes::build::{
            Fragment, auto_link, block_ref, code_span, emphasis, hashtag, image, link, macro_call,
            page_embed, page_link, paragraph, query, raw_html, strikethrough, strong, text,
        },
    };
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn parsed(content: &str) -> String {
        let mut tree = Tree::from(paragraph([]));
        let root = tree.root();
        parse_inline(&mut tree, root, content);
        debug(&tree, root)
    }

    fn expected(children: impl IntoIterator<Item = Fragment>) -> String {
        let tree = Tree::from(paragraph(children));
        debug(&tree, tree.root())
    }

    #[rstest]
    #[case("This is some basic text", vec![text("This is some basic text")])]
    #[case(
        "This is some basic text with \\*escaped\\* characters",
        vec![text("This is some basic text with *escaped* characters")]
    )]
    #[case(
        "This is some basic text\nwith a soft line break",
        vec![text("This is some basic text").soft_break(), text("with a soft line break")]
    )]
    #[case("Basic  \ncontent", vec![text("Basic").hard_break(), text("content")])]
    #[case("Basic\\\ncontent", vec![text("Basic").hard_break(), text("content")])]
    #[case("a \\b", vec![text("a \\b")])]
    fn parses_text(#[case] input: &str, #[case] nodes: Vec<Fragment>) {
        assert_eq!(parsed(input), expected(nodes));
    }

    #[rstest]
    #[case(
        "This is *emphasized* text",
        vec![text("This is "), emphasis([text("emphasized")]), text(" text")]
    )]
    #[case(
        "This is **strong** text",
        vec![text("This is "), strong([text("strong")]), text(" text")]
    )]
    #[case(
        "This is ***strong and emphasized*** text",
        vec![
            text("This is "),
            emphasis([strong([text("strong and emphasized")])]),
            text(" text"),
        ]
    )]
    #[case(
        "*a **b** c*",
        vec![emphasis([text("a "), strong([text("b")]), text(" c")])]
    )]
    #[case("**a*", vec![text("*"), emphasis([text("a")])])]
    #[case("_a_", vec![emphasis([text("a")])])]
    #[case("snake_case_word", vec![text("snake_case_word")])]
    #[case("a * b", vec![text("a * b")])]
    #[case(
        "**Basic\ncontent**",
        vec![strong([text("Basic").soft_break(), text("content")])]
    )]
    #[case(
        "~~Bas~\\~ic~~ content",
        vec![strikethrough([text("Bas~~ic")]), text(" content")]
    )]
    #[case("~~~a~~~", vec![text("~~~a~~~")])]
    fn parses_formatting(#[case] input: &str, #[case] nodes: Vec<Fragment>) {
        assert_eq!(parsed(input), expected(nodes));
    }

    #[rstest]
    #[case("This is `code` text", vec![text("This is "), code_span("code"), text(" text")])]
    #[case("``co`de``", vec![code_span("co`de")])]
    #[case("`[[not a link]]`", vec![code_span("[[not a link]]")])]
    #[case("`unclosed code", vec![text("`unclosed code")])]
    #[case("`Basic  \ncontent`", vec![code_span("Basic  \ncontent")])]
    fn parses_code_spans(#[case] input: &str, #[case] nodes: Vec<Fragment>) {
        assert_eq!(parsed(input), expected(nodes));
    }

    #[rstest]
    #[case(
        "[This is a link](https://example.com)",
        vec![link("https://example.com", [text("This is a link")])]
    )]
    #[case(
        "[This is a link](https://example.com 'Title')",
        vec![link("https://example.com", [text("This is a link")]).with_title("Title")]
    )]
    #[case(
        "[*a*](b)",
        vec![link("b", [emphasis([text("a")])])]
    )]
    #[case(
        "[a [b](c)](d)",
        vec![text("[a "), link("c", [text("b")]), text("](d)")]
    )]
    #[case("[no destination]", vec![text("[no destination]")])]
    #[case(
        "![This is an image](https://example.com/image.png)",
        vec![image("https://example.com/image.png", [text("This is an image")])]
    )]
    #[case("<https://example.com>", vec![auto_link("https://example.com")])]
    #[case("https://example.com", vec![auto_link("https://example.com")])]
    #[case(
        "see https://example.com.",
        vec![text("see "), auto_link("https://example.com"), text(".")]
    )]
    #[case(
        "This is a <b>bold</b> word.",
        vec![
            text("This is a "),
            raw_html("<b>"),
            text("bold"),
            raw_html("</b>"),
            text(" word."),
        ]
    )]
    fn parses_links(#[case] input: &str, #[case] nodes: Vec<Fragment>) {
        assert_eq!(parsed(input), expected(nodes));
    }

    #[rstest]
    #[case(
        "[[This is a link]] and this is some text",
        vec![page_link("This is a link"), text(" and this is some text")]
    )]
    #[case(
        "[[This is \\]]a link]] and this is some text",
        vec![page_link("This is ]]a link"), text(" and this is some text")]
    )]
    #[case(
        "#tag followed by some text",
        vec![hashtag("tag"), text(" followed by some text")]
    )]
    #[case(
        "#[[tag with spaces]] and some other content",
        vec![hashtag("tag with spaces"), text(" and some other content")]
    )]
    #[case("#[[tag with spaces", vec![text("#[[tag with spaces")])]
    #[case("a#b", vec![text("a#b")])]
    #[case("((64a1-ff))", vec![block_ref("64a1-ff")])]
    #[case("{{query datalog}}", vec![query("datalog")])]
    #[case("{{embed [[Page]]}}", vec![page_embed("Page")])]
    #[case("{{poem red, blue}}", vec![macro_call("poem", ["red", "blue"])])]
    #[case("{{poem red blue", vec![text("{{poem red blue")])]
    #[case(
        "[[a]]\nb",
        vec![page_link("a"), text("").soft_break(), text("b")]
    )]
    #[case("![[a]]", vec![text("!"), page_link("a")])]
    fn parses_extensions(#[case] input: &str, #[case] nodes: Vec<Fragment>) {
        assert_eq!(parsed(input), expected(nodes));
    }

    #[test]
    fn link_title_may_span_lines() {
        assert_eq!(
            parsed("[This is a link](https://example.com 'Title\nwith newlines')"),
            expected([
                link("https://example.com", [text("This is a link")])
                    .with_title("Title\nwith newlines")
            ])
        );
    }
}
