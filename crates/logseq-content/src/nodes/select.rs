use super::{Kind, NodeId, NodeKind, Tree};

/// Predicate over a node's payload.
pub trait Predicate: Fn(&NodeKind) -> bool {}

impl<F: Fn(&NodeKind) -> bool> Predicate for F {}

pub fn is_of_kind(kind: Kind) -> impl Predicate + Copy {
    move |n: &NodeKind| n.kind() == kind
}

pub fn is_either(a: impl Predicate, b: impl Predicate) -> impl Predicate {
    move |n: &NodeKind| a(n) || b(n)
}

pub fn is_both(a: impl Predicate, b: impl Predicate) -> impl Predicate {
    move |n: &NodeKind| a(n) && b(n)
}

/// Page links and hashtags.
pub fn is_page_reference() -> impl Predicate + Copy {
    |n: &NodeKind| n.page_target().is_some()
}

/// Links, autolinks and images.
pub fn has_link_url() -> impl Predicate + Copy {
    |n: &NodeKind| n.link_url().is_some()
}

impl Tree {
    /// First direct child matching `predicate`.
    pub fn find(&self, parent: NodeId, predicate: impl Predicate) -> Option<NodeId> {
        self.children(parent).find(|&c| predicate(self.kind(c)))
    }

    /// First node below `parent`, in document order, matching `predicate`.
    pub fn find_deep(&self, parent: NodeId, predicate: impl Predicate) -> Option<NodeId> {
        self.descendants(parent).find(|&c| predicate(self.kind(c)))
    }

    pub fn filter<'t>(
        &'t self,
        parent: NodeId,
        predicate: impl Predicate + 't,
    ) -> impl Iterator<Item = NodeId> + 't {
        self.children(parent)
            .filter(move |&c| predicate(self.kind(c)))
    }

    pub fn filter_deep<'t>(
        &'t self,
        parent: NodeId,
        predicate: impl Predicate + 't,
    ) -> impl Iterator<Item = NodeId> + 't {
        self.descendants(parent)
            .filter(move |&c| predicate(self.kind(c)))
    }

    /// Targets of every page link and hashtag below `parent`.
    pub fn page_references(&self, parent: NodeId) -> Vec<&str> {
        self.descendants(parent)
            .filter_map(|c| self.kind(c).page_target())
            .collect()
    }

    /// URLs of every link, autolink and image below `parent`.
    pub fn link_urls(&self, parent: NodeId) -> Vec<&str> {
        self.descendants(parent)
            .filter_map(|c| self.kind(c).link_url())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::build::{
        auto_link, block, emphasis, hashtag, image, link, page_link, paragraph, text,
    };

    fn sample() -> Tree {
        Tree::from(block([
            paragraph([
                text("See "),
                page_link("Inbox"),
                emphasis([hashtag("later"), link("https://a.example", [text("a")])]),
            ]),
            block([paragraph([auto_link("https://b.example"), image("c.png", [])])]),
        ]))
    }

    #[test]
    fn find_stops_at_direct_children() {
        let tree = sample();
        let root = tree.root();

        assert_eq!(tree.find(root, is_of_kind(Kind::PageLink)), None);
        assert!(tree.find_deep(root, is_of_kind(Kind::PageLink)).is_some());
        assert_eq!(tree.filter(root, is_of_kind(Kind::Block)).count(), 1);
    }

    #[test]
    fn combined_predicates() {
        let tree = sample();
        let root = tree.root();

        let either = tree
            .filter_deep(root, is_either(is_of_kind(Kind::Emphasis), is_of_kind(Kind::Image)))
            .count();
        let both = tree
            .filter_deep(root, is_both(is_page_reference(), is_of_kind(Kind::Hashtag)))
            .count();

        assert_eq!(either, 2);
        assert_eq!(both, 1);
    }

    #[test]
    fn collects_references_and_links() {
        let tree = sample();

        assert_eq!(tree.page_references(tree.root()), ["Inbox", "later"]);
        assert_eq!(
            tree.link_urls(tree.root()),
            ["https://a.example", "https://b.example", "c.png"]
        );
    }
}
