//! Canonical multi-line dump of a subtree.
//!
//! Two trees are considered equal when their dumps are byte-equal; tests
//! compare trees this way instead of walking them field by field.

use crate::nodes::{LineBreak, ListType, NodeId, NodeKind, Tree};

/// Dumps `id` and everything below it.
pub fn debug(tree: &Tree, id: NodeId) -> String {
    let mut printer = Printer::default();
    printer.node(tree, id);
    printer.out
}

#[derive(Default)]
struct Printer {
    out: String,
    level: usize,
    did_write: Vec<bool>,
}

impl Printer {
    fn flag(&mut self, level: usize) -> &mut bool {
        if self.did_write.len() <= level {
            self.did_write.resize(level + 1, false);
        }
        &mut self.did_write[level]
    }

    fn indent(&mut self, level: usize) {
        for _ in 0..level {
            self.out.push_str("  ");
        }
    }

    fn start_type(&mut self, name: &str) {
        *self.flag(self.level) = true;
        self.out.push_str(name);
        self.out.push('{');
        self.level += 1;
        *self.flag(self.level) = false;
    }

    fn end_type(&mut self) {
        self.level -= 1;
        if *self.flag(self.level + 1) {
            self.indent(self.level);
        }
        self.out.push('}');
    }

    fn open_line(&mut self) {
        let flag = self.flag(self.level);
        if !*flag {
            *flag = true;
            self.out.push('\n');
        }
    }

    fn field(&mut self, name: &str, value: &str) {
        self.open_line();
        self.indent(self.level);
        self.out.push_str(name);
        self.out.push_str("='");
        self.out.push_str(value);
        self.out.push_str("'\n");
    }

    fn children(&mut self, tree: &Tree, id: NodeId) {
        self.open_line();
        self.indent(self.level);
        self.out.push_str("children=[");
        self.level += 1;
        *self.flag(self.level) = false;

        for child in tree.children(id) {
            self.out.push('\n');
            self.indent(self.level);
            self.node(tree, child);
        }

        if *self.flag(self.level) {
            self.out.push('\n');
            self.indent(self.level - 1);
        }
        self.out.push_str("]\n");
        self.level -= 1;
    }

    fn node(&mut self, tree: &Tree, id: NodeId) {
        let kind = tree.kind(id);
        match kind {
            NodeKind::Text { value, line_break } => {
                self.start_type("Text");
                self.field("value", value);
                match line_break {
                    Some(LineBreak::Hard) => self.field("lineBreak", "hard"),
                    Some(LineBreak::Soft) => self.field("lineBreak", "soft"),
                    None => {}
                }
            }
            NodeKind::RawText { value } => {
                self.start_type("RawText");
                self.field("value", value);
            }
            NodeKind::CodeSpan { value } => {
                self.start_type("Code");
                self.field("value", value);
            }
            NodeKind::Emphasis => self.start_type("Emphasis"),
            NodeKind::Strong => self.start_type("Strong"),
            NodeKind::Strikethrough => self.start_type("Strikethrough"),
            NodeKind::Link { url, title } => {
                self.start_type("Link");
                self.field("url", url);
                self.field("title", title);
            }
            NodeKind::AutoLink { url } => {
                self.start_type("AutoLink");
                self.field("url", url);
            }
            NodeKind::PageLink { to } => {
                self.start_type("PageLink");
                self.field("to", to);
            }
            NodeKind::Hashtag { to } => {
                self.start_type("TagLink");
                self.field("to", to);
            }
            NodeKind::BlockRef { id } => {
                self.start_type("BlockRef");
                self.field("id", id);
            }
            NodeKind::Image { src, title } => {
                self.start_type("Image");
                self.field("src", src);
                self.field("title", title);
            }
            NodeKind::RawHtml { html } => {
                self.start_type("RawHTML");
                self.field("HTML", html);
            }
            NodeKind::Macro { name, arguments } => {
                self.start_type("Macro");
                self.field("name", name);
                self.field("arguments", &arguments.join(", "));
            }
            NodeKind::Query { query } => {
                self.start_type("Query");
                self.field("query", query);
            }
            NodeKind::PageEmbed { to } => {
                self.start_type("PageEmbed");
                self.field("to", to);
            }
            NodeKind::BlockEmbed { id } => {
                self.start_type("BlockEmbed");
                self.field("id", id);
            }
            NodeKind::Cloze { answer, cue } => {
                self.start_type("Cloze");
                self.field("answer", answer);
                self.field("cue", cue);
            }
            NodeKind::TaskMarker { status } => {
                self.start_type("TaskMarker");
                self.field("status", status.as_str());
            }
            NodeKind::Paragraph { previous_line } => {
                self.start_type("Paragraph");
                self.field("previousLineType", previous_line.as_str());
            }
            NodeKind::Heading { level } => {
                self.start_type("Heading");
                self.field("Level", &level.to_string());
            }
            NodeKind::Blockquote { previous_line } => {
                self.start_type("Blockquote");
                self.field("previousLineType", previous_line.as_str());
            }
            NodeKind::List {
                list_type,
                marker,
                previous_line,
            } => {
                self.start_type("List");
                let list_type = match list_type {
                    ListType::Ordered => "ordered",
                    ListType::Unordered => "unordered",
                };
                self.field("type", list_type);
                self.field("marker", &char::from(*marker).to_string());
                self.field("previousLineType", previous_line.as_str());
            }
            NodeKind::ListItem => self.start_type("ListItem"),
            NodeKind::CodeBlock { language, code, .. } => {
                self.start_type("CodeBlock");
                self.field("language", language);
                self.field("code", code);
            }
            NodeKind::ThematicBreak => self.start_type("ThematicBreak"),
            NodeKind::RawHtmlBlock { html } => {
                self.start_type("RawHTMLBlock");
                self.field("HTML", html);
            }
            NodeKind::Properties { previous_line } => {
                self.start_type("Properties");
                self.field("previousLineType", previous_line.as_str());
            }
            NodeKind::Property { name } => {
                self.start_type("Property");
                self.field("Name", name);
            }
            NodeKind::AdvancedCommand { variant, value } => {
                self.start_type("AdvancedCommand");
                self.field("type", variant);
                self.field("value", value);
            }
            NodeKind::QueryCommand { query } => {
                self.start_type("QueryCommand");
                self.field("query", query);
            }
            NodeKind::Logbook { previous_line } => {
                self.start_type("TaskLogbook");
                self.field("previousLineType", previous_line.as_str());
            }
            NodeKind::LogbookEntry { value } => {
                self.start_type("LogbookEntryRaw");
                self.field("value", value);
            }
            NodeKind::Block => self.start_type("Block"),
        }

        if kind.kind().is_container() {
            self.children(tree, id);
        }
        self.end_type();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::build::{block, link, list, list_item, text, thematic_break};
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_block() {
        let tree = Tree::new();
        assert_eq!(debug(&tree, tree.root()), "Block{\n  children=[]\n}");
    }

    #[test]
    fn leaf_without_fields() {
        let tree = Tree::from(thematic_break());
        assert_eq!(debug(&tree, tree.root()), "ThematicBreak{}");
    }

    #[test]
    fn nested_containers() {
        let tree = Tree::from(block([list(
            b'*',
            [list_item([link("https://example.com", [text("x")])])],
        )]));

        insta::assert_snapshot!(debug(&tree, tree.root()), @r"
        Block{
          children=[
            List{
              type='unordered'
              marker='*'
              previousLineType='automatic'
              children=[
                ListItem{
                  children=[
                    Paragraph{
                      previousLineType='automatic'
                      children=[
                        Link{
                          url='https://example.com'
                          title=''
                          children=[
                            Text{
                              value='x'
                            }
                          ]
                        }
                      ]
                    }
                  ]
                }
              ]
            }
          ]
        }
        ");
    }
}
