use logseq_content::{NodeId, NodeKind, Tree};

/// Renders the blocks below `root` as bulleted, indented lines.
pub fn outline_lines(tree: &Tree, root: NodeId) -> Vec<String> {
    let mut lines = Vec::new();
    for block in tree.blocks(root) {
        push_block(tree, block, 0, &mut lines);
    }
    lines
}

fn push_block(tree: &Tree, block: NodeId, depth: usize, lines: &mut Vec<String>) {
    let indent = "  ".repeat(depth);
    let mut text = Vec::new();
    for node in tree.content(block) {
        push_content(tree, node, &mut text);
    }
    if let Some(status) = tree.task_status(block) {
        match text.first_mut() {
            Some(first) => *first = format!("{} {first}", status.as_str()),
            None => text.push(status.as_str().to_string()),
        }
    }

    let mut text = text.into_iter();
    lines.push(format!("{indent}• {}", text.next().unwrap_or_default()));
    lines.extend(text.map(|line| format!("{indent}  {line}")));

    for child in tree.blocks(block) {
        push_block(tree, child, depth + 1, lines);
    }
}

fn push_content(tree: &Tree, node: NodeId, out: &mut Vec<String>) {
    match tree.kind(node) {
        NodeKind::Properties { .. } => {
            for property in tree.children(node) {
                if let NodeKind::Property { name } = tree.kind(property) {
                    out.push(format!("{name}:: {}", tree.plain_text(property)));
                }
            }
        }
        NodeKind::Heading { level } => {
            out.push(format!(
                "{} {}",
                "#".repeat(usize::from(*level)),
                tree.plain_text(node)
            ));
        }
        NodeKind::CodeBlock { code, .. } => out.extend(code.lines().map(str::to_string)),
        NodeKind::ThematicBreak => out.push("---".to_string()),
        _ => out.extend(tree.plain_text(node).lines().map(str::to_string)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logseq_content::parse_string;
    use pretty_assertions::assert_eq;

    #[test]
    fn nested_blocks_are_indented() {
        let tree = parse_string("- Top [[Page]]\n  - Child #tag\n- TODO Second").unwrap();
        assert_eq!(
            outline_lines(&tree, tree.root()),
            vec!["• Top Page", "  • Child #tag", "• TODO Second"]
        );
    }

    #[test]
    fn properties_get_their_own_lines() {
        let tree = parse_string("- Title\n  type:: [[Book]]\n- Next").unwrap();
        assert_eq!(
            outline_lines(&tree, tree.root()),
            vec!["• Title", "  type:: Book", "• Next"]
        );
    }
}
