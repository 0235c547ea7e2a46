//! Hoists `name:: value` lines out of paragraphs into Properties nodes.
//!
//! A property opener is a text node at the start of a line whose value
//! begins with `name::` and a single space. Its value runs to the end of
//! the line. Consecutive property lines share one Properties node; any
//! other content splits the paragraph around it.

use std::sync::LazyLock;

use regex::Regex;

use crate::nodes::{Kind, LineBreak, NodeId, NodeKind, PreviousLine, Tree};

static PROPERTY_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z0-9_-]+)::").expect("valid regex"));

enum Segment {
    Content(Vec<NodeId>),
    Properties(Vec<(String, Vec<NodeId>)>),
}

/// Rewrites every paragraph below `root` that contains property lines.
pub fn extract(tree: &mut Tree, root: NodeId) {
    let paragraphs: Vec<_> = tree
        .descendants(root)
        .filter(|&id| tree.is(id, Kind::Paragraph))
        .collect();
    for paragraph in paragraphs {
        if tree.parent(paragraph).is_some() {
            extract_paragraph(tree, paragraph);
        }
    }
}

fn extract_paragraph(tree: &mut Tree, paragraph: NodeId) {
    let segments = segment(tree, paragraph);
    if !segments
        .iter()
        .any(|s| matches!(s, Segment::Properties(_)))
    {
        return;
    }
    let Some(parent) = tree.parent(paragraph) else {
        return;
    };
    let hint = tree
        .kind(paragraph)
        .previous_line()
        .unwrap_or(PreviousLine::Automatic);

    let mut anchor = paragraph;
    for (i, segment) in segments.into_iter().enumerate() {
        let node = match segment {
            // Leading content stays where it is.
            Segment::Content(_) if i == 0 => continue,
            Segment::Content(nodes) => {
                let node = tree.alloc(NodeKind::Paragraph {
                    previous_line: PreviousLine::NonBlank,
                });
                tree.add_children(node, nodes);
                node
            }
            Segment::Properties(entries) => {
                let previous_line = if i == 0 { hint } else { PreviousLine::NonBlank };
                let node = tree.alloc(NodeKind::Properties { previous_line });
                for (name, values) in entries {
                    let property = tree.alloc(NodeKind::Property { name });
                    tree.add_children(property, values);
                    tree.add_child(node, property);
                }
                node
            }
        };
        tree.insert_child_after(parent, node, anchor);
        anchor = node;
    }

    if !tree.has_children(paragraph) {
        tree.remove_self(paragraph);
    }
}

/// Splits a paragraph's children into content runs and property runs.
/// Opener text is rewritten in place and empty text nodes are removed.
fn segment(tree: &mut Tree, paragraph: NodeId) -> Vec<Segment> {
    let children: Vec<_> = tree.children(paragraph).collect();
    let mut segments: Vec<Segment> = Vec::new();
    let mut value: Option<Vec<NodeId>> = None;
    let mut at_line_start = true;

    for child in children {
        if let Some(nodes) = value.as_mut() {
            match line_break(tree, child) {
                Some(brk) => {
                    clear_break(tree, child);
                    if is_empty_text(tree, child) {
                        tree.remove_self(child);
                    } else {
                        nodes.push(child);
                    }
                    if brk.is_some() {
                        finish_property(&mut segments, value.take());
                        at_line_start = true;
                    }
                }
                None => nodes.push(child),
            }
            continue;
        }

        if at_line_start && let Some(name) = opener(tree, child) {
            if let Some(Segment::Content(nodes)) = segments.last_mut()
                && let Some(&last) = nodes.last()
            {
                clear_break(tree, last);
                if is_empty_text(tree, last) {
                    tree.remove_self(last);
                    nodes.pop();
                }
                if nodes.is_empty() {
                    segments.pop();
                }
            }
            if !matches!(segments.last(), Some(Segment::Properties(_))) {
                segments.push(Segment::Properties(Vec::new()));
            }
            if let Some(Segment::Properties(entries)) = segments.last_mut() {
                entries.push((name, Vec::new()));
            }

            let ends_line = matches!(line_break(tree, child), Some(Some(_)));
            clear_break(tree, child);
            let mut nodes = Vec::new();
            if is_empty_text(tree, child) {
                tree.remove_self(child);
            } else {
                nodes.push(child);
            }
            if ends_line {
                finish_property(&mut segments, Some(nodes));
                at_line_start = true;
            } else {
                value = Some(nodes);
            }
            continue;
        }

        at_line_start = matches!(line_break(tree, child), Some(Some(_)));
        match segments.last_mut() {
            Some(Segment::Content(nodes)) => nodes.push(child),
            _ => segments.push(Segment::Content(vec![child])),
        }
    }
    finish_property(&mut segments, value);
    segments
}

/// Stores collected value nodes on the property opened last.
fn finish_property(segments: &mut [Segment], value: Option<Vec<NodeId>>) {
    let Some(nodes) = value else {
        return;
    };
    if let Some(Segment::Properties(entries)) = segments.last_mut()
        && let Some((_, values)) = entries.last_mut()
    {
        *values = nodes;
    }
}

/// Recognises a property opener and strips the name from the text node,
/// returning the property name.
fn opener(tree: &mut Tree, id: NodeId) -> Option<String> {
    let (name, rest, ends_line) = {
        let NodeKind::Text { value, line_break } = tree.kind(id) else {
            return None;
        };
        let captures = PROPERTY_NAME.captures(value)?;
        let end = captures.get(0)?.end();
        (
            captures[1].to_string(),
            value[end..].to_string(),
            line_break.is_some(),
        )
    };

    let rest = if let Some(rest) = rest.strip_prefix(' ') {
        rest.to_string()
    } else if !rest.is_empty() {
        return None;
    } else if ends_line {
        rest
    } else if let Some(next) = tree.next_sibling(id) {
        // The space may have ended up in the next text node.
        let NodeKind::Text { value: next, .. } = tree.kind_mut(next) else {
            return None;
        };
        let stripped = next.strip_prefix(' ')?.to_string();
        *next = stripped;
        rest
    } else {
        rest
    };

    if let NodeKind::Text { value, .. } = tree.kind_mut(id) {
        *value = rest;
    }
    Some(name)
}

/// `Some(break)` for text nodes, `None` for anything else.
fn line_break(tree: &Tree, id: NodeId) -> Option<Option<LineBreak>> {
    match tree.kind(id) {
        NodeKind::Text { line_break, .. } => Some(*line_break),
        _ => None,
    }
}

fn clear_break(tree: &mut Tree, id: NodeId) {
    if let NodeKind::Text { line_break, .. } = tree.kind_mut(id) {
        *line_break = None;
    }
}

fn is_empty_text(tree: &Tree, id: NodeId) -> bool {
    matches!(tree.kind(id), NodeKind::Text { value, .. } if value.is_empty())
}
