use super::{Kind, NodeId, NodeKind, PreviousLine, Tree};

/// Property that holds a block's stable identifier.
pub const ID_PROPERTY: &str = "id";

impl Tree {
    /// Direct children of an outline block that are not nested blocks.
    pub fn content(&self, block: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(block).filter(move |&c| !self.is(c, Kind::Block))
    }

    /// Nested outline blocks of a block.
    pub fn blocks(&self, block: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(block).filter(move |&c| self.is(c, Kind::Block))
    }

    /// The block's properties node, if it already has one.
    ///
    /// Block properties either lead the block or directly follow its first
    /// paragraph, which is where they sit under a bullet's title line.
    pub fn find_block_properties(&self, block: NodeId) -> Option<NodeId> {
        let first = self.first_child(block)?;
        match self.tag(first) {
            Kind::Properties => Some(first),
            Kind::Paragraph => self
                .next_sibling(first)
                .filter(|&c| self.is(c, Kind::Properties)),
            _ => None,
        }
    }

    /// The block's properties node, prepending an empty one when missing.
    pub fn block_properties(&mut self, block: NodeId) -> NodeId {
        if let Some(existing) = self.find_block_properties(block) {
            return existing;
        }
        let props = self.alloc(NodeKind::Properties {
            previous_line: PreviousLine::Automatic,
        });
        self.prepend_child(block, props);
        props
    }

    /// Stable id from the block's `id::` property.
    pub fn block_id(&self, block: NodeId) -> Option<String> {
        let props = self.find_block_properties(block)?;
        self.property(props, ID_PROPERTY)
            .find_map(|c| match self.kind(c) {
                NodeKind::Text { value, .. } if !value.is_empty() => Some(value.clone()),
                _ => None,
            })
    }

    /// Returns the block's id, assigning a random UUID when it has none.
    pub fn ensure_block_id(&mut self, block: NodeId) -> String {
        if let Some(id) = self.block_id(block) {
            return id;
        }
        let id = uuid::Uuid::new_v4().to_string();
        let props = self.block_properties(block);
        let value = self.alloc(NodeKind::text(id.clone()));
        self.set_property(props, ID_PROPERTY, [value]);
        id
    }

    pub fn property_node(&self, properties: NodeId, name: &str) -> Option<NodeId> {
        self.children(properties).find(|&c| {
            matches!(self.kind(c), NodeKind::Property { name: n } if n == name)
        })
    }

    /// Value nodes of a property; empty when the property is absent.
    pub fn property(&self, properties: NodeId, name: &str) -> impl Iterator<Item = NodeId> + '_ {
        let first = self
            .property_node(properties, name)
            .and_then(|p| self.first_child(p));
        std::iter::successors(first, move |&c| self.next_sibling(c))
    }

    /// Property value flattened to plain text.
    pub fn property_text(&self, properties: NodeId, name: &str) -> Option<String> {
        let node = self.property_node(properties, name)?;
        Some(self.plain_text(node))
    }

    /// Sets a property's value, appending the property if missing.
    pub fn set_property(
        &mut self,
        properties: NodeId,
        name: &str,
        value: impl IntoIterator<Item = NodeId>,
    ) -> NodeId {
        let node = match self.property_node(properties, name) {
            Some(node) => node,
            None => {
                let node = self.alloc(NodeKind::Property {
                    name: name.to_string(),
                });
                self.add_child(properties, node);
                node
            }
        };
        self.set_children(node, value);
        node
    }

    pub fn remove_property(&mut self, properties: NodeId, name: &str) -> bool {
        match self.property_node(properties, name) {
            Some(node) => self.remove_child(properties, node),
            None => false,
        }
    }

    /// Names of all properties, in order.
    pub fn property_names(&self, properties: NodeId) -> Vec<String> {
        self.children(properties)
            .filter_map(|c| match self.kind(c) {
                NodeKind::Property { name } => Some(name.clone()),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::build::{block, page_link, paragraph, properties, property, text};

    #[test]
    fn content_and_blocks_split_children() {
        let mut tree = Tree::new();
        let b = tree.insert(block([text("a"), block([text("b")]), block([text("c")])]));

        assert_eq!(tree.content(b).count(), 1);
        assert_eq!(tree.blocks(b).count(), 2);
    }

    #[test]
    fn properties_are_materialised_once() {
        // Given a block without properties
        let mut tree = Tree::new();
        let b = tree.insert(block([text("a")]));
        assert_eq!(tree.find_block_properties(b), None);

        // When properties are requested twice
        let first = tree.block_properties(b);
        let second = tree.block_properties(b);

        // Then a single node was prepended
        assert_eq!(first, second);
        assert_eq!(tree.first_child(b), Some(first));
        assert_eq!(tree.children(b).count(), 2);
    }

    #[test]
    fn properties_under_title_line_belong_to_block() {
        let mut tree = Tree::new();
        let b = tree.insert(block([
            paragraph([text("Title")]),
            properties([property("id", [text("abc")])]),
        ]));

        assert_eq!(tree.block_id(b).as_deref(), Some("abc"));
    }

    #[test]
    fn set_get_remove_property() {
        let mut tree = Tree::new();
        let props = tree.insert(properties([property("a", [text("1")])]));

        let value = tree.insert(page_link("Page"));
        tree.set_property(props, "b", [value]);
        let replaced = tree.insert(text("2"));
        tree.set_property(props, "a", [replaced]);

        assert_eq!(tree.property_names(props), ["a", "b"]);
        assert_eq!(tree.property_text(props, "a").as_deref(), Some("2"));
        assert_eq!(tree.property(props, "b").collect::<Vec<_>>(), [value]);

        assert!(tree.remove_property(props, "a"));
        assert!(!tree.remove_property(props, "a"));
        assert_eq!(tree.property_names(props), ["b"]);
    }

    #[test]
    fn block_id_comes_from_property() {
        let mut tree = Tree::new();
        let b = tree.insert(block([
            properties([property("id", [text("64a1-ff")])]),
            text("a"),
        ]));

        assert_eq!(tree.block_id(b).as_deref(), Some("64a1-ff"));
        assert_eq!(tree.ensure_block_id(b), "64a1-ff");
    }

    #[test]
    fn ensure_block_id_assigns_uuid() {
        let mut tree = Tree::new();
        let b = tree.insert(block([text("a")]));

        let id = tree.ensure_block_id(b);

        assert_eq!(id.len(), 36);
        assert_eq!(tree.block_id(b), Some(id));
    }
}
