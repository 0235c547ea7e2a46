//! Search predicates over pages and blocks.
//!
//! A [`Query`] only describes what to look for; index backends translate it
//! into their own query language.
//!
//! ```
//! use logseq_content::query::{self, Query};
//!
//! let q = Query::and([
//!     query::references("Projects"),
//!     Query::not(query::property_equals("status", "done")),
//! ]);
//! assert!(matches!(q, Query::And(ref clauses) if clauses.len() == 2));
//! ```

/// Field holding page and journal titles.
pub const TITLE: &str = "title";
/// Field holding the plain text of a block or page.
pub const CONTENT: &str = "content";
/// Field holding page references (links and tags).
pub const PAGES: &str = "pages";
/// Field holding link, autolink and image URLs.
pub const LINK: &str = "link";

/// Field holding the value of property `name`.
pub fn property_field(name: &str) -> String {
    format!("prop:{name}")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    /// Matches everything.
    All,
    /// Matches nothing.
    None,
    And(Vec<Query>),
    Or(Vec<Query>),
    Not(Box<Query>),
    /// Full-text match of `text` within `field`.
    FieldMatches { field: String, text: String },
    /// Exact value of `field`.
    FieldEquals { field: String, value: String },
    /// `field` references page `target`, as a tag when `tag` is set.
    FieldRefs {
        field: String,
        target: String,
        tag: bool,
    },
}

impl Query {
    pub fn and(clauses: impl IntoIterator<Item = Query>) -> Self {
        Query::And(clauses.into_iter().collect())
    }

    pub fn or(clauses: impl IntoIterator<Item = Query>) -> Self {
        Query::Or(clauses.into_iter().collect())
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(clause: Query) -> Self {
        Query::Not(Box::new(clause))
    }

    pub fn field_matches(field: impl Into<String>, text: impl Into<String>) -> Self {
        Query::FieldMatches {
            field: field.into(),
            text: text.into(),
        }
    }

    pub fn field_equals(field: impl Into<String>, value: impl Into<String>) -> Self {
        Query::FieldEquals {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn field_refs(field: impl Into<String>, target: impl Into<String>, tag: bool) -> Self {
        Query::FieldRefs {
            field: field.into(),
            target: target.into(),
            tag,
        }
    }
}

pub fn title_matches(text: impl Into<String>) -> Query {
    Query::field_matches(TITLE, text)
}

pub fn content_matches(text: impl Into<String>) -> Query {
    Query::field_matches(CONTENT, text)
}

pub fn property_matches(property: &str, text: impl Into<String>) -> Query {
    Query::field_matches(property_field(property), text)
}

pub fn property_equals(property: &str, value: impl Into<String>) -> Query {
    Query::field_equals(property_field(property), value)
}

/// Property `property` links to page `target`.
pub fn property_references(property: &str, target: impl Into<String>) -> Query {
    Query::field_refs(property_field(property), target, false)
}

/// Property `property` tags page `tag`.
pub fn property_references_tag(property: &str, tag: impl Into<String>) -> Query {
    Query::field_refs(property_field(property), tag, true)
}

/// Content links to `page` with a page link or a tag.
pub fn references(page: impl Into<String>) -> Query {
    Query::field_refs(PAGES, page, false)
}

/// Content tags `page` with `#page`.
pub fn references_tag(page: impl Into<String>) -> Query {
    Query::field_refs(PAGES, page, true)
}

pub fn links_to_url(url: impl Into<String>) -> Query {
    Query::field_equals(LINK, url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn property_builders_namespace_the_field() {
        assert_eq!(
            property_references_tag("type", "book"),
            Query::FieldRefs {
                field: "prop:type".into(),
                target: "book".into(),
                tag: true,
            }
        );
        assert_eq!(
            property_matches("author", "le guin"),
            Query::field_matches("prop:author", "le guin")
        );
    }

    #[test]
    fn references_use_the_pages_field() {
        assert_eq!(references("Inbox"), Query::field_refs(PAGES, "Inbox", false));
        assert_eq!(references_tag("Inbox"), Query::field_refs(PAGES, "Inbox", true));
        assert_eq!(
            links_to_url("https://example.com"),
            Query::field_equals(LINK, "https://example.com")
        );
    }

    #[test]
    fn combinators_collect_clauses() {
        let q = Query::or([title_matches("a"), Query::not(content_matches("b"))]);
        assert_eq!(
            q,
            Query::Or(vec![
                Query::field_matches(TITLE, "a"),
                Query::Not(Box::new(Query::field_matches(CONTENT, "b"))),
            ])
        );
    }
}
