//! Outline reshaping: `-` lists become nested blocks.
//!
//! Logseq pages are outlines written as dash lists. After block and inline
//! parsing the document is a flat CommonMark tree; this pass walks it and
//! turns every item of a `-` list into a [`Block`](NodeKind::Block), keeping
//! anything else as block content.

use crate::{
    error::ParseError,
    nodes::{Kind, NodeId, NodeKind, TaskStatus, Tree},
};

/// Replaces the tree root with the outline built from it.
pub fn reshape(tree: &mut Tree) -> Result<(), ParseError> {
    let root = tree.root();
    let block = convert(tree, root)?;
    tree.set_root(block);
    Ok(())
}

/// Builds a block from the children of `source`, a document or list item.
fn convert(tree: &mut Tree, source: NodeId) -> Result<NodeId, ParseError> {
    let block = tree.alloc(NodeKind::Block);
    let mut has_parsed_block = false;

    let children: Vec<_> = tree.children(source).collect();
    for child in children {
        if matches!(tree.kind(child), NodeKind::List { marker: b'-', .. }) {
            let items: Vec<_> = tree.children(child).collect();
            for item in items {
                let nested = convert(tree, item)?;
                tree.add_child(block, nested);
            }
            has_parsed_block = true;
            continue;
        }

        normalise_lists(tree, child);
        let is_paragraph = tree.is(child, Kind::Paragraph);
        if is_paragraph && !tree.has_children(block) {
            convert_task_marker(tree, child);
        }

        if !has_parsed_block {
            tree.add_child(block, child);
            if is_paragraph {
                split_dash_blocks(tree, block, child);
            }
            continue;
        }

        // Content after an outline belongs to the last block, ahead of its
        // own nested blocks.
        let last = tree
            .last_child(block)
            .filter(|&last| tree.is(last, Kind::Block))
            .ok_or_else(|| ParseError::Internal("last node is not a block".into()))?;
        let anchor = tree
            .children(last)
            .take_while(|&c| !tree.is(c, Kind::Block))
            .last();
        match anchor {
            Some(anchor) => tree.insert_child_after(last, child, anchor),
            None => tree.prepend_child(last, child),
        };
    }

    Ok(block)
}

/// `-` lists that are not part of the outline are kept as `*` lists.
fn normalise_lists(tree: &mut Tree, node: NodeId) {
    let lists: Vec<_> = tree
        .descendants(node)
        .filter(|&id| matches!(tree.kind(id), NodeKind::List { marker: b'-', .. }))
        .collect();
    for list in lists {
        tree.set_list_marker(list, b'-');
    }
}

/// Moves a leading task keyword into a [`NodeKind::TaskMarker`].
fn convert_task_marker(tree: &mut Tree, paragraph: NodeId) {
    let Some(first) = tree.first_child(paragraph) else {
        return;
    };
    let NodeKind::Text { value, line_break } = tree.kind_mut(first) else {
        return;
    };
    let (keyword, rest) = value.split_once(' ').unwrap_or((value.as_str(), ""));
    let Some(status) = TaskStatus::from_keyword(keyword) else {
        return;
    };

    let rest = rest.to_string();
    let remove = rest.is_empty() && line_break.is_none();
    *value = rest;
    if remove {
        tree.remove_self(first);
    }
    let marker = tree.alloc(NodeKind::TaskMarker { status });
    tree.prepend_child(paragraph, marker);
}

/// A line holding a lone `-` has no item content, so the block parser sees
/// it as paragraph text. Each one starts an empty nested block.
fn split_dash_blocks(tree: &mut Tree, block: NodeId, paragraph: NodeId) {
    let children: Vec<_> = tree.children(paragraph).collect();
    let mut previous: Option<NodeId> = None;
    let mut previous_break = false;

    for child in children {
        match tree.kind(child) {
            NodeKind::Text { value, line_break } => {
                let ends_line = line_break.is_some();
                if value == "-" && previous_break {
                    tree.remove_self(child);
                    let nested = tree.alloc(NodeKind::Block);
                    tree.add_child(block, nested);
                    if let Some(previous) = previous
                        && let NodeKind::Text { line_break, .. } = tree.kind_mut(previous)
                    {
                        *line_break = None;
                    }
                }
                previous_break = ends_line;
            }
            _ => previous_break = false,
        }
        previous = Some(child);
    }
}
