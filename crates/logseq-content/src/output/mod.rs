//! Markdown emitter.
//!
//! Every node kind has a fixed emission form. Block-level nodes are
//! separated according to their previous-line hint, and container prefixes
//! (`> `, list continuations, nested outline bullets) are stamped by the
//! [`IndentWriter`] rather than by the node emitters themselves.
//!
//! A [`Writer`] may be fed several nodes in a row; separators between them
//! are decided the same way as between siblings.

mod indent;

use std::io::Write;

use crate::{
    error::EmitError,
    nodes::{Kind, LineBreak, ListType, NodeId, NodeKind, PreviousLine, Tree},
    parsing::bare_url_extent,
};

pub use indent::IndentWriter;

/// Writes `id` and its subtree to `out`.
pub fn write<W: Write>(tree: &Tree, id: NodeId, out: W) -> Result<(), EmitError> {
    let mut writer = Writer::new(out);
    writer.write(tree, id)?;
    writer.flush()
}

pub fn write_to_string(tree: &Tree, id: NodeId) -> Result<String, EmitError> {
    let mut writer = Writer::new(Vec::new());
    writer.write(tree, id)?;
    Ok(String::from_utf8(writer.into_inner())?)
}

pub struct Writer<W: Write> {
    out: IndentWriter<W>,
}

impl<W: Write> Writer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: IndentWriter::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }

    pub fn flush(&mut self) -> Result<(), EmitError> {
        Ok(self.out.flush()?)
    }

    pub fn write(&mut self, tree: &Tree, id: NodeId) -> Result<(), EmitError> {
        match tree.kind(id) {
            NodeKind::Text { value, line_break } => {
                let continued = line_break.is_none() && tree.next_sibling(id).is_some();
                self.raw(&escape_text(value, continued))?;
                match line_break {
                    Some(LineBreak::Soft) => self.raw("\n"),
                    Some(LineBreak::Hard) => self.raw("\\\n"),
                    None => Ok(()),
                }
            }
            NodeKind::RawText { value } => self.raw(value),
            NodeKind::CodeSpan { value } => self.write_code_span(value),
            NodeKind::Emphasis => self.write_wrapped(tree, id, "*"),
            NodeKind::Strong => self.write_wrapped(tree, id, "**"),
            NodeKind::Strikethrough => self.write_wrapped(tree, id, "~~"),
            NodeKind::Link { url, title } => {
                self.raw("[")?;
                self.write_children(tree, id)?;
                self.raw("](")?;
                self.write_destination(url, title)
            }
            NodeKind::AutoLink { url } => {
                if bare_url_extent(url) == Some(url.len()) {
                    self.raw(url)
                } else {
                    self.raw("<")?;
                    self.raw(url)?;
                    self.raw(">")
                }
            }
            NodeKind::PageLink { to } => {
                self.raw("[[")?;
                self.raw(&escape(to, |c| c == ']'))?;
                self.raw("]]")
            }
            NodeKind::Hashtag { to } => {
                self.raw("#")?;
                if to.chars().any(char::is_whitespace) {
                    self.raw("[[")?;
                    self.raw(&escape(to, |c| c == ']'))?;
                    self.raw("]]")
                } else {
                    self.raw(to)
                }
            }
            NodeKind::BlockRef { id: block } => {
                self.raw("((")?;
                self.raw(&escape(block, |c| c == ']'))?;
                self.raw("))")
            }
            NodeKind::Image { src, title } => {
                self.raw("![")?;
                self.write_children(tree, id)?;
                self.raw("](")?;
                self.write_destination(src, title)
            }
            NodeKind::RawHtml { html } => self.raw(html),
            NodeKind::Macro { name, arguments } => self.write_macro(name, arguments),
            NodeKind::Query { query } => self.write_macro("query", std::slice::from_ref(query)),
            NodeKind::PageEmbed { to } => self.write_macro("embed", &[format!("[[{to}]]")]),
            NodeKind::BlockEmbed { id: block } => {
                self.write_macro("embed", &[format!("(({block}))")])
            }
            NodeKind::Cloze { answer, cue } => {
                self.raw("{{cloze ")?;
                self.raw(answer)?;
                if !cue.is_empty() {
                    self.raw(" \\\\ ")?;
                    self.raw(cue)?;
                }
                self.raw("}}")
            }
            NodeKind::TaskMarker { status } => {
                self.raw(status.as_str())?;
                if tree.next_sibling(id).is_some() {
                    self.raw(" ")?;
                }
                Ok(())
            }
            NodeKind::Paragraph { .. } => {
                self.start_block(tree, id, "")?;
                self.write_children(tree, id)?;
                self.end_block();
                Ok(())
            }
            NodeKind::Heading { level } => {
                let hashes = "#".repeat(usize::from(*level));
                if tree.has_children(id) {
                    self.start_block(tree, id, &format!("{hashes} "))?;
                    self.write_children(tree, id)?;
                } else {
                    self.start_block(tree, id, "")?;
                    self.raw(&hashes)?;
                }
                self.end_block();
                Ok(())
            }
            NodeKind::Blockquote { .. } => {
                self.start_block(tree, id, "> ")?;
                self.write_children(tree, id)?;
                self.end_block();
                Ok(())
            }
            NodeKind::List {
                list_type, marker, ..
            } => self.write_list(tree, id, *list_type, *marker),
            NodeKind::CodeBlock { language, code, .. } => {
                self.start_block(tree, id, "")?;
                let fence = "`".repeat(longest_run(code, '`').max(2) + 1);
                self.raw(&fence)?;
                self.raw(language)?;
                self.raw("\n")?;
                self.raw(code)?;
                if !code.is_empty() && !code.ends_with('\n') {
                    self.raw("\n")?;
                }
                self.raw(&fence)?;
                self.end_block();
                Ok(())
            }
            NodeKind::ThematicBreak => {
                self.start_block(tree, id, "")?;
                self.raw("---")?;
                self.end_block();
                Ok(())
            }
            NodeKind::RawHtmlBlock { html } => {
                self.start_block(tree, id, "")?;
                self.raw(html)?;
                self.end_block();
                Ok(())
            }
            NodeKind::Properties { .. } => self.write_properties(tree, id),
            NodeKind::AdvancedCommand { variant, value } => {
                self.write_begin_end(tree, id, variant, value)
            }
            NodeKind::QueryCommand { query } => self.write_begin_end(tree, id, "QUERY", query),
            NodeKind::Logbook { .. } => {
                self.start_block(tree, id, "")?;
                self.raw(":LOGBOOK:\n")?;
                for entry in tree.children(id) {
                    if let NodeKind::LogbookEntry { value } = tree.kind(entry) {
                        self.raw(value)?;
                        self.raw("\n")?;
                    }
                }
                self.raw(":END:")?;
                self.end_block();
                Ok(())
            }
            NodeKind::Block => self.write_block(tree, id),
            NodeKind::ListItem | NodeKind::Property { .. } | NodeKind::LogbookEntry { .. } => {
                Err(EmitError::Detached(tree.tag(id)))
            }
        }
    }

    fn raw(&mut self, value: &str) -> Result<(), EmitError> {
        Ok(self.out.write_str(value)?)
    }

    fn write_children(&mut self, tree: &Tree, id: NodeId) -> Result<(), EmitError> {
        for child in tree.children(id) {
            self.write(tree, child)?;
        }
        Ok(())
    }

    /// Separates a block from whatever was written before it at this level,
    /// then pushes `marker` as indentation for the block's lines.
    fn start_block(&mut self, tree: &Tree, id: NodeId, marker: &str) -> Result<(), EmitError> {
        if self.out.has_written_at_current_indent() {
            self.raw(separator(tree, id))?;
        }
        self.out.push_indentation(marker);
        if !marker.is_empty() && !self.out.at_line_start() {
            self.out.write_unindented(marker)?;
        }
        Ok(())
    }

    fn end_block(&mut self) {
        self.out.pop_indentation();
    }

    fn write_wrapped(&mut self, tree: &Tree, id: NodeId, marker: &str) -> Result<(), EmitError> {
        let kind = tree.tag(id);
        if tree.previous_sibling(id).is_some_and(|p| tree.is(p, kind)) {
            self.raw(" ")?;
        }
        self.raw(marker)?;
        self.write_children(tree, id)?;
        self.raw(marker)
    }

    fn write_code_span(&mut self, value: &str) -> Result<(), EmitError> {
        let fence = "`".repeat(longest_run(value, '`') + 1);
        let trimmed = value.trim_matches(' ');
        let pad = value.starts_with('`')
            || value.ends_with('`')
            || (value.len() >= 2
                && value.starts_with(' ')
                && value.ends_with(' ')
                && !trimmed.is_empty());
        self.raw(&fence)?;
        if pad {
            self.raw(" ")?;
        }
        self.raw(value)?;
        if pad {
            self.raw(" ")?;
        }
        self.raw(&fence)
    }

    fn write_destination(&mut self, url: &str, title: &str) -> Result<(), EmitError> {
        if url.chars().any(char::is_whitespace) {
            self.raw("<")?;
            self.raw(&escape(url, |c| matches!(c, '<' | '>')))?;
            self.raw(">")?;
        } else {
            self.raw(&escape(url, |c| matches!(c, '(' | ')')))?;
        }
        if !title.is_empty() {
            self.raw(" '")?;
            self.raw(&escape(title, |c| matches!(c, '\'' | '"' | '\\' | ')')))?;
            self.raw("'")?;
        }
        self.raw(")")
    }

    fn write_macro(&mut self, name: &str, arguments: &[String]) -> Result<(), EmitError> {
        if name.is_empty() || name.chars().any(char::is_whitespace) {
            return Err(EmitError::MacroName(name.to_string()));
        }
        self.raw("{{")?;
        self.raw(name)?;
        for (i, argument) in arguments.iter().enumerate() {
            self.raw(if i == 0 { " " } else { ", " })?;
            if needs_quotes(argument) {
                self.raw("\"")?;
                self.raw(&escape(argument, |c| c == '"'))?;
                self.raw("\"")?;
            } else {
                self.raw(argument)?;
            }
        }
        self.raw("}}")
    }

    fn write_list(
        &mut self,
        tree: &Tree,
        id: NodeId,
        list_type: ListType,
        marker: u8,
    ) -> Result<(), EmitError> {
        self.start_block(tree, id, "")?;
        for (i, item) in tree.children(id).enumerate() {
            if !tree.is(item, Kind::ListItem) {
                return Err(EmitError::ListItemExpected(tree.tag(item)));
            }
            let bullet = match list_type {
                ListType::Ordered => format!("{}{}", i + 1, char::from(marker)),
                ListType::Unordered => char::from(marker).to_string(),
            };
            self.raw(&bullet)?;
            self.raw(" ")?;
            self.out.push_indentation(&" ".repeat(bullet.len() + 1));
            self.write_children(tree, item)?;
            if tree.next_sibling(item).is_some() {
                self.raw("\n")?;
            }
            self.out.pop_indentation();
        }
        self.end_block();
        Ok(())
    }

    fn write_block(&mut self, tree: &Tree, id: NodeId) -> Result<(), EmitError> {
        self.start_block(tree, id, "")?;
        for child in tree.content(id) {
            self.write(tree, child)?;
        }

        let mut blocks = tree.blocks(id).peekable();
        if blocks.peek().is_some() {
            self.start_block(tree, id, "")?;
            while let Some(child) = blocks.next() {
                self.raw("- ")?;
                self.out.push_indentation("  ");
                self.write(tree, child)?;
                if blocks.peek().is_some() {
                    self.raw("\n")?;
                }
                self.out.pop_indentation();
            }
            self.end_block();
        }

        self.end_block();
        Ok(())
    }

    fn write_properties(&mut self, tree: &Tree, id: NodeId) -> Result<(), EmitError> {
        let inline = tree
            .parent(id)
            .is_some_and(|p| tree.is(p, Kind::Paragraph));

        if inline {
            if self.out.has_written_at_current_indent() {
                self.raw("\n")?;
            }
        } else {
            self.start_block(tree, id, "")?;
        }

        for (i, property) in tree.children(id).enumerate() {
            let NodeKind::Property { name } = tree.kind(property) else {
                continue;
            };
            if i > 0 {
                self.raw("\n")?;
            }
            self.raw(name)?;
            self.raw(":: ")?;
            self.write_children(tree, property)?;
        }

        if inline {
            if tree.next_sibling(id).is_some() {
                self.raw("\n")?;
            }
        } else {
            self.end_block();
        }
        Ok(())
    }

    fn write_begin_end(
        &mut self,
        tree: &Tree,
        id: NodeId,
        variant: &str,
        value: &str,
    ) -> Result<(), EmitError> {
        self.start_block(tree, id, "")?;
        self.raw("#+BEGIN_")?;
        self.raw(variant)?;
        self.raw("\n")?;
        self.raw(value)?;
        if !self.out.at_line_start() {
            self.raw("\n")?;
        }
        self.raw("#+END_")?;
        self.raw(variant)?;
        self.end_block();
        Ok(())
    }
}

/// Newlines placed before a block that follows other output at its level.
fn separator(tree: &Tree, id: NodeId) -> &'static str {
    let kind = tree.kind(id);
    match kind.previous_line() {
        Some(PreviousLine::Blank) | None => "\n\n",
        Some(PreviousLine::NonBlank) => "\n",
        Some(PreviousLine::Automatic) => {
            let after_properties = tree
                .previous_sibling(id)
                .is_some_and(|p| tree.is(p, Kind::Properties));
            if after_properties && matches!(kind.kind(), Kind::Properties | Kind::Paragraph) {
                "\n"
            } else {
                "\n\n"
            }
        }
    }
}

fn escape(value: &str, needs_escape: impl Fn(char) -> bool) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if needs_escape(c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Escapes characters in plain text that would otherwise open Markdown
/// syntax: `*`, `_`, brackets, the second `~` of a `~~` pair, and a
/// backslash that would read as an escape.
/// Escapes `value` so it re-parses as text. `continued` tells whether more
/// inline output follows on the same line.
fn escape_text(value: &str, continued: bool) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    let mut previous = None;
    while let Some(c) = chars.next() {
        let needs_escape = match c {
            '*' | '_' | '[' | ']' => true,
            '~' => previous == Some('~'),
            '\\' => chars.peek().is_none_or(|n| n.is_ascii_punctuation()),
            // would start a hashtag
            '#' => {
                previous.is_none_or(char::is_whitespace)
                    && chars.peek().map_or(continued, |n| !n.is_whitespace())
            }
            _ => false,
        };
        if needs_escape {
            out.push('\\');
        }
        out.push(c);
        previous = Some(c);
    }
    out
}

fn longest_run(value: &str, needle: char) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for c in value.chars() {
        if c == needle {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}

fn needs_quotes(argument: &str) -> bool {
    argument.is_empty()
        || argument.contains(',')
        || argument.starts_with('"')
        || argument.trim() != argument
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::{
        TaskStatus,
        build::{
            Fragment, advanced_command, auto_link, block, block_embed, block_ref, blockquote,
            cloze, code_block, code_span, emphasis, hashtag, heading, image, link, list_item,
            logbook, logbook_entry, macro_call, ordered_list, page_embed, page_link, paragraph,
            properties, property, query, query_command, raw_html_block, strikethrough, strong,
            task_marker, text, thematic_break, unordered_list,
        },
    };
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn emit(fragment: Fragment) -> String {
        let tree = Tree::from(fragment);
        write_to_string(&tree, tree.root()).unwrap()
    }

    fn emit_all(fragments: impl IntoIterator<Item = Fragment>) -> String {
        let mut tree = Tree::new();
        let ids: Vec<NodeId> = fragments.into_iter().map(|f| tree.insert(f)).collect();
        let mut writer = Writer::new(Vec::new());
        for id in ids {
            writer.write(&tree, id).unwrap();
        }
        String::from_utf8(writer.into_inner()).unwrap()
    }

    #[rstest]
    #[case(text("abc"), "abc")]
    #[case(text("abc").soft_break(), "abc\n")]
    #[case(text("abc").hard_break(), "abc\\\n")]
    #[case(text("abc*"), "abc\\*")]
    #[case(text("[x]_y"), "\\[x\\]\\_y")]
    #[case(text("a~~b"), "a~\\~b")]
    #[case(text("abc\ndef"), "abc\ndef")]
    #[case(text("C:\\dir"), "C:\\dir")]
    #[case(text("#tag and a#b"), "\\#tag and a#b")]
    #[case(text("#[[open"), "\\#\\[\\[open")]
    #[case(text("trailing #"), "trailing #")]
    #[case(text("trailing\\"), "trailing\\\\")]
    fn writes_text(#[case] node: Fragment, #[case] expected: &str) {
        assert_eq!(emit(node), expected);
    }

    #[test]
    fn consecutive_writes_share_state() {
        assert_eq!(
            emit_all([text("abc").soft_break(), text("def")]),
            "abc\ndef"
        );
        assert_eq!(
            emit_all([paragraph([text("abc")]), heading(1, [text("def")])]),
            "abc\n\n# def"
        );
    }

    #[rstest]
    #[case(emphasis([text("abc"), text("def")]), "*abcdef*")]
    #[case(strong([text("abc")]), "**abc**")]
    #[case(strong([emphasis([text("abc")])]), "***abc***")]
    #[case(strikethrough([text("abc")]), "~~abc~~")]
    #[case(paragraph([strong([text("a")]), strong([text("b")])]), "**a** **b**")]
    #[case(code_span("abc"), "`abc`")]
    #[case(code_span("abc`def"), "``abc`def``")]
    #[case(code_span("abc``def"), "```abc``def```")]
    #[case(code_span("`"), "`` ` ``")]
    fn writes_formatting(#[case] node: Fragment, #[case] expected: &str) {
        assert_eq!(emit(node), expected);
    }

    #[rstest]
    #[case(link("https://example.com", [text("abc")]), "[abc](https://example.com)")]
    #[case(
        link("https://example.com", [text("abc")]).with_title("title)"),
        "[abc](https://example.com 'title\\)')"
    )]
    #[case(link("a(b)", [text("x")]), "[x](a\\(b\\))")]
    #[case(auto_link("https://example.com"), "https://example.com")]
    #[case(auto_link("www.example.com"), "<www.example.com>")]
    #[case(page_link("abc def"), "[[abc def]]")]
    #[case(page_link("a]b"), "[[a\\]b]]")]
    #[case(hashtag("abc"), "#abc")]
    #[case(hashtag("abc def"), "#[[abc def]]")]
    #[case(block_ref("64f1-aa"), "((64f1-aa))")]
    #[case(image("https://example.com", []), "![](https://example.com)")]
    #[case(
        image("https://example.com", [text("abc")]).with_title("title"),
        "![abc](https://example.com 'title')"
    )]
    fn writes_links(#[case] node: Fragment, #[case] expected: &str) {
        assert_eq!(emit(node), expected);
    }

    #[rstest]
    #[case(macro_call("poem", Vec::<String>::new()), "{{poem}}")]
    #[case(macro_call("poem", ["red", "blue"]), "{{poem red, blue}}")]
    #[case(macro_call("poem", ["red, blue"]), "{{poem \"red, blue\"}}")]
    #[case(macro_call("poem", ["\"quoted\""]), "{{poem \"\\\"quoted\\\"\"}}")]
    #[case(query("(todo now)"), "{{query (todo now)}}")]
    #[case(page_embed("Inbox"), "{{embed [[Inbox]]}}")]
    #[case(block_embed("64f1"), "{{embed ((64f1))}}")]
    #[case(cloze("answer", ""), "{{cloze answer}}")]
    #[case(cloze("answer", "hint"), "{{cloze answer \\\\ hint}}")]
    fn writes_macros(#[case] node: Fragment, #[case] expected: &str) {
        assert_eq!(emit(node), expected);
    }

    #[test]
    fn macro_name_with_whitespace_is_an_error() {
        let tree = Tree::from(macro_call("bad name", ["x"]));
        let err = write_to_string(&tree, tree.root()).unwrap_err();
        assert!(matches!(err, EmitError::MacroName(name) if name == "bad name"));
    }

    #[test]
    fn task_marker_is_followed_by_space_only_before_content() {
        assert_eq!(
            emit(paragraph([task_marker(TaskStatus::Todo), text("Task")])),
            "TODO Task"
        );
        assert_eq!(emit(paragraph([task_marker(TaskStatus::Done)])), "DONE");
    }

    #[rstest]
    #[case(heading(1, [text("abc"), text("def")]), "# abcdef")]
    #[case(heading(2, Vec::new()), "##")]
    #[case(heading(3, [link("https://example.com", [text("abc")])]), "### [abc](https://example.com)")]
    #[case(unordered_list([list_item([text("abc")]), list_item([text("def")])]), "* abc\n* def")]
    #[case(
        unordered_list([list_item([paragraph([text("abc")]), paragraph([text("def")])])]),
        "* abc\n\n  def"
    )]
    #[case(ordered_list([list_item([text("abc")]), list_item([text("def")])]), "1. abc\n2. def")]
    #[case(
        ordered_list([list_item([paragraph([text("abc")]), paragraph([text("def")])])]),
        "1. abc\n\n   def"
    )]
    #[case(
        unordered_list([list_item([ordered_list([list_item([text("abc")]), list_item([text("def")])])])]),
        "* 1. abc\n  2. def"
    )]
    #[case(blockquote([paragraph([text("abc")]), paragraph([text("def")])]), "> abc\n>\n> def")]
    #[case(unordered_list([list_item([blockquote([paragraph([text("abc")])])])]), "* > abc")]
    #[case(blockquote([thematic_break()]), "> ---")]
    #[case(code_block("", "package main"), "```\npackage main\n```")]
    #[case(code_block("go", "package main\n"), "```go\npackage main\n```")]
    #[case(code_block("md", "```\nx\n```\n"), "````md\n```\nx\n```\n````")]
    #[case(raw_html_block("<p>Testing</p>"), "<p>Testing</p>")]
    fn writes_blocks(#[case] node: Fragment, #[case] expected: &str) {
        assert_eq!(emit(node), expected);
    }

    #[test]
    fn blocks_are_separated_by_blank_lines_by_default() {
        assert_eq!(
            emit_all([paragraph([text("abc")]), paragraph([text("def")])]),
            "abc\n\ndef"
        );
        assert_eq!(
            emit_all([
                unordered_list([list_item([text("abc")])]),
                unordered_list([list_item([text("def")])]),
            ]),
            "* abc\n\n* def"
        );
        assert_eq!(
            emit_all([paragraph([text("abc")]), code_block("", "package main")]),
            "abc\n\n```\npackage main\n```"
        );
    }

    #[test]
    fn previous_line_hint_picks_separator() {
        let tree = Tree::from(block([
            paragraph([text("abc")]),
            code_block("", "x\n").with_previous_line(PreviousLine::NonBlank),
            paragraph([text("def")]).with_previous_line(PreviousLine::Blank),
        ]));

        assert_eq!(
            write_to_string(&tree, tree.root()).unwrap(),
            "abc\n```\nx\n```\n\ndef"
        );
    }

    #[rstest]
    #[case(block([paragraph([text("abc")])]), "abc")]
    #[case(
        block([block([text("abc")]), block([text("def")])]),
        "- abc\n- def"
    )]
    #[case(
        block([text("abc"), block([text("block 1")]), block([text("block 2")])]),
        "abc\n\n- block 1\n- block 2"
    )]
    #[case(
        block([text("abc"), block([text("block 1"), block([text("block 2")])])]),
        "abc\n\n- block 1\n\n  - block 2"
    )]
    #[case(
        block([paragraph([text("abc").soft_break(), text("def")]), block([text("block 1")])]),
        "abc\ndef\n\n- block 1"
    )]
    #[case(
        block([block([text("abc")]), block([text("def").soft_break(), text("continued")])]),
        "- abc\n- def\n  continued"
    )]
    #[case(block([block([heading(2, [text("Title")])])]), "- ## Title")]
    #[case(block([block([heading(1, Vec::new())])]), "- #")]
    fn writes_outline_blocks(#[case] node: Fragment, #[case] expected: &str) {
        assert_eq!(emit(node), expected);
    }

    #[rstest]
    #[case(properties([property("key", [text("value")])]), "key:: value")]
    #[case(
        paragraph([text("abc"), properties([property("key", [text("value")])])]),
        "abc\nkey:: value"
    )]
    #[case(
        paragraph([
            properties([
                property("key1", [text("value1")]),
                property("key2", [hashtag("value2")]),
            ]),
            text("abc"),
        ]),
        "key1:: value1\nkey2:: #value2\nabc"
    )]
    #[case(
        paragraph([text("abc"), properties([property("key", [text("value")])]), text("def")]),
        "abc\nkey:: value\ndef"
    )]
    #[case(
        block([properties([property("key", [text("value")])]), paragraph([text("Body")])]),
        "key:: value\nBody"
    )]
    fn writes_properties(#[case] node: Fragment, #[case] expected: &str) {
        assert_eq!(emit(node), expected);
    }

    #[rstest]
    #[case(advanced_command("ABC", "def"), "#+BEGIN_ABC\ndef\n#+END_ABC")]
    #[case(advanced_command("ABC", "def\n  ghi"), "#+BEGIN_ABC\ndef\n  ghi\n#+END_ABC")]
    #[case(advanced_command("QUOTE", "abc\n"), "#+BEGIN_QUOTE\nabc\n#+END_QUOTE")]
    #[case(query_command("abc\n"), "#+BEGIN_QUERY\nabc\n#+END_QUERY")]
    #[case(
        logbook([logbook_entry("CLOCK: [2024-01-01 Mon 10:00]")]),
        ":LOGBOOK:\nCLOCK: [2024-01-01 Mon 10:00]\n:END:"
    )]
    fn writes_raw_regions(#[case] node: Fragment, #[case] expected: &str) {
        assert_eq!(emit(node), expected);
    }

    #[test]
    fn list_rejects_foreign_children() {
        let mut tree = Tree::new();
        let list = tree.insert(unordered_list([]));
        let stray = tree.insert(paragraph([text("x")]));
        tree.add_child(list, stray);

        let err = write_to_string(&tree, list).unwrap_err();
        assert!(matches!(err, EmitError::ListItemExpected(Kind::Paragraph)));
    }
}
