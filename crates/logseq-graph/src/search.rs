//! Search requests and results.

use chrono::NaiveDate;
use logseq_content::{NodeId, Query};

use crate::{
    error::{GraphError, Result},
    page::{Page, PageKind},
};

#[derive(Debug, Clone, PartialEq)]
pub struct SearchOptions {
    pub query: Query,
    pub limit: usize,
    pub offset: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            query: Query::All,
            limit: 10,
            offset: 0,
        }
    }
}

impl SearchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Narrows the search: the new query is combined with any previous one.
    pub fn with_query(mut self, query: Query) -> Self {
        self.query = match self.query {
            Query::All => query,
            Query::And(mut clauses) => {
                clauses.push(query);
                Query::And(clauses)
            }
            previous => Query::and([previous, query]),
        };
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }
}

/// One page of hits together with the total number of matches.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResults<T> {
    pub count: usize,
    pub results: Vec<T>,
}

impl<T> SearchResults<T> {
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResult {
    pub(crate) subpath: String,
    pub kind: PageKind,
    pub title: String,
    pub date: Option<NaiveDate>,
}

impl PageResult {
    /// Path of the page relative to the graph root.
    pub fn subpath(&self) -> &str {
        &self.subpath
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockResult {
    pub page: PageResult,
    /// The block's `id::` property, if it has one.
    pub id: Option<String>,
    pub preview: String,
    /// Child indexes from the top of the page down to the block.
    pub location: Vec<usize>,
}

impl BlockResult {
    /// Finds the block in an opened copy of its page, by id first and then
    /// by position.
    pub fn locate(&self, page: &Page) -> Result<NodeId> {
        self.id
            .as_deref()
            .and_then(|id| page.find_block(id))
            .or_else(|| page.block_at(&self.location))
            .ok_or(GraphError::BlockNotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logseq_content::query::{content_matches, title_matches};

    #[test]
    fn defaults() {
        let options = SearchOptions::new();
        assert_eq!(options.query, Query::All);
        assert_eq!(options.limit, 10);
        assert_eq!(options.offset, 0);
    }

    #[test]
    fn queries_accumulate() {
        let options = SearchOptions::new()
            .with_query(title_matches("a"))
            .with_query(content_matches("b"))
            .with_query(content_matches("c"));
        assert_eq!(
            options.query,
            Query::and([title_matches("a"), content_matches("b"), content_matches("c")])
        );
    }
}
