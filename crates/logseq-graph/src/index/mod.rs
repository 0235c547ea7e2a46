//! SQLite full-text index over pages, journals and their blocks.
//!
//! Every page produces one page document plus one document per block at
//! any depth. Documents are rows of `documents`; their searchable text sits
//! in FTS5 tables keyed by the document id and their keyword values in
//! `terms`.

mod query;

use std::{
    path::Path,
    sync::{Arc, Mutex, MutexGuard},
    time::{SystemTime, UNIX_EPOCH},
};

use chrono::NaiveDate;
use logseq_content::{NodeId, NodeKind, Query, Tree, query::LINK, query::PAGES, query::property_field};
use rusqlite::{Connection, params, params_from_iter, types::Value};

use crate::{
    error::{GraphError, Result, io_at},
    page::{Page, PageKind},
    search::{BlockResult, PageResult, SearchResults},
};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS documents (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    key TEXT UNIQUE NOT NULL,
    kind TEXT NOT NULL,
    page TEXT NOT NULL,
    last_modified INTEGER,
    title TEXT,
    date TEXT,
    block_id TEXT,
    location TEXT,
    preview TEXT NOT NULL DEFAULT ''
);
CREATE INDEX IF NOT EXISTS documents_page ON documents(page);
CREATE VIRTUAL TABLE IF NOT EXISTS titles USING fts5(text);
CREATE VIRTUAL TABLE IF NOT EXISTS contents USING fts5(text);
CREATE VIRTUAL TABLE IF NOT EXISTS property_text USING fts5(doc UNINDEXED, field UNINDEXED, text);
CREATE TABLE IF NOT EXISTS terms (
    doc INTEGER NOT NULL,
    field TEXT NOT NULL,
    value TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS terms_field_value ON terms(field, value);
CREATE INDEX IF NOT EXISTS terms_doc ON terms(doc);
";

const PAGE_KINDS: &str = "d.kind IN ('page', 'journal')";

#[derive(Clone)]
pub struct Index {
    conn: Arc<Mutex<Connection>>,
}

impl Index {
    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    /// Opens or creates the index database at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_at(parent))?;
        }
        Self::with_connection(Connection::open(path)?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Index {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| GraphError::Poisoned("index"))
    }

    /// Modification time, in nanoseconds, recorded for an indexed page.
    pub fn last_modified(&self, subpath: &str) -> Result<Option<i64>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT d.last_modified FROM documents d WHERE d.key = ?1 AND {PAGE_KINDS}"
        ))?;
        let mut rows = stmt.query_map(params![subpath], |row| row.get::<_, Option<i64>>(0))?;
        Ok(rows.next().transpose()?.flatten())
    }

    /// Subpaths of every indexed page.
    pub fn subpaths(&self) -> Result<Vec<String>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT d.key FROM documents d WHERE {PAGE_KINDS} ORDER BY d.key"
        ))?;
        let keys = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(keys)
    }

    /// Replaces everything indexed for `subpath` with the content of `page`.
    pub fn index_page(&self, subpath: &str, page: &Page) -> Result<()> {
        let mut documents = vec![page_document(subpath, page)];
        let mut location = Vec::new();
        block_documents(page.tree(), page.root(), subpath, &mut location, &mut documents);

        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        delete_documents(&tx, subpath)?;
        for document in &documents {
            insert_document(&tx, document)?;
        }
        tx.commit()?;

        log::debug!("indexed {subpath} ({} documents)", documents.len());
        Ok(())
    }

    /// Removes a page and its blocks. Returns false when nothing was indexed.
    pub fn delete_page(&self, subpath: &str) -> Result<bool> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let deleted = delete_documents(&tx, subpath)?;
        tx.commit()?;
        Ok(deleted > 0)
    }

    /// Pages matching `query`: journals newest first, then pages by title.
    pub fn search_pages(
        &self,
        query: &Query,
        limit: usize,
        offset: usize,
    ) -> Result<SearchResults<PageResult>> {
        let filter = query::translate(query);
        let conn = self.lock()?;

        let count: i64 = conn.query_row(
            &format!(
                "SELECT COUNT(*) FROM documents d WHERE {PAGE_KINDS} AND ({})",
                filter.sql
            ),
            params_from_iter(filter.params.iter()),
            |row| row.get(0),
        )?;

        let mut stmt = conn.prepare(&format!(
            "SELECT d.key, d.kind, d.title, d.date FROM documents d
             WHERE {PAGE_KINDS} AND ({})
             ORDER BY d.date IS NULL, d.date DESC, d.title COLLATE NOCASE
             LIMIT ? OFFSET ?",
            filter.sql
        ))?;
        let params = paged(filter.params, limit, offset);
        let rows = stmt
            .query_map(params_from_iter(params.iter()), PageRow::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(SearchResults {
            count: usize::try_from(count).unwrap_or_default(),
            results: rows.into_iter().filter_map(PageRow::into_result).collect(),
        })
    }

    /// Blocks matching `query`, in page and outline order.
    pub fn search_blocks(
        &self,
        query: &Query,
        limit: usize,
        offset: usize,
    ) -> Result<SearchResults<BlockResult>> {
        let filter = query::translate(query);
        let conn = self.lock()?;

        let count: i64 = conn.query_row(
            &format!(
                "SELECT COUNT(*) FROM documents d WHERE d.kind = 'block' AND ({})",
                filter.sql
            ),
            params_from_iter(filter.params.iter()),
            |row| row.get(0),
        )?;

        let mut stmt = conn.prepare(&format!(
            "SELECT p.key, p.kind, p.title, p.date, d.block_id, d.location, d.preview
             FROM documents d JOIN documents p ON p.key = d.page
             WHERE d.kind = 'block' AND ({})
             ORDER BY d.id
             LIMIT ? OFFSET ?",
            filter.sql
        ))?;
        let params = paged(filter.params, limit, offset);
        let rows = stmt
            .query_map(params_from_iter(params.iter()), |row| {
                Ok((
                    PageRow::from_row(row)?,
                    row.get::<_, Option<String>>(4)?,
                    row.get::<_, Option<String>>(5)?,
                    row.get::<_, String>(6)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let results = rows
            .into_iter()
            .filter_map(|(page, id, location, preview)| {
                Some(BlockResult {
                    page: page.into_result()?,
                    id,
                    preview,
                    location: parse_location(location.as_deref().unwrap_or_default()),
                })
            })
            .collect();

        Ok(SearchResults {
            count: usize::try_from(count).unwrap_or_default(),
            results,
        })
    }
}

/// File modification time as stored in the index.
pub(crate) fn nanos(time: SystemTime) -> i64 {
    time.duration_since(UNIX_EPOCH)
        .map_or(0, |d| i64::try_from(d.as_nanos()).unwrap_or(i64::MAX))
}

fn paged(mut params: Vec<Value>, limit: usize, offset: usize) -> Vec<Value> {
    params.push(Value::Integer(i64::try_from(limit).unwrap_or(i64::MAX)));
    params.push(Value::Integer(i64::try_from(offset).unwrap_or(i64::MAX)));
    params
}

struct PageRow {
    key: String,
    kind: String,
    title: Option<String>,
    date: Option<String>,
}

impl PageRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(PageRow {
            key: row.get(0)?,
            kind: row.get(1)?,
            title: row.get(2)?,
            date: row.get(3)?,
        })
    }

    fn into_result(self) -> Option<PageResult> {
        let Some(kind) = PageKind::parse(&self.kind) else {
            log::warn!("skipping {} with unknown kind {:?}", self.key, self.kind);
            return None;
        };
        Some(PageResult {
            subpath: self.key,
            kind,
            title: self.title.unwrap_or_default(),
            date: self
                .date
                .and_then(|d| NaiveDate::parse_from_str(&d, "%Y-%m-%d").ok()),
        })
    }
}

/// A row of `documents` with the text and terms indexed for it.
#[derive(Debug, Default)]
struct Document {
    key: String,
    kind: &'static str,
    page: String,
    last_modified: Option<i64>,
    title: Option<String>,
    date: Option<String>,
    block_id: Option<String>,
    location: Option<String>,
    preview: String,
    content: String,
    property_text: Vec<(String, String)>,
    terms: Vec<(String, String)>,
}

impl Document {
    fn term(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.terms.push((field.into(), value.into()));
    }

    fn add_properties(&mut self, tree: &Tree, properties: NodeId) {
        for property in tree.children(properties) {
            let NodeKind::Property { name } = tree.kind(property) else {
                continue;
            };
            let field = property_field(name);
            self.add_refs(tree, tree.children(property), &field);
            let text = tree.plain_text(property);
            if !text.is_empty() {
                self.property_text.push((field.clone(), text.clone()));
                self.term(format!("{field}:value"), text);
            }
        }
    }

    /// Page links and tags in `nodes` and below, lowercased.
    fn add_refs(&mut self, tree: &Tree, nodes: impl IntoIterator<Item = NodeId>, field: &str) {
        for node in nodes {
            for n in std::iter::once(node).chain(tree.descendants(node)) {
                let kind = tree.kind(n);
                let Some(target) = kind.page_target() else {
                    continue;
                };
                let target = target.to_lowercase();
                if matches!(kind, NodeKind::Hashtag { .. }) {
                    self.term(format!("{field}:tag"), target.clone());
                }
                self.term(format!("{field}:ref"), target);
            }
        }
    }

    fn add_links(&mut self, tree: &Tree, nodes: impl IntoIterator<Item = NodeId>) {
        for node in nodes {
            for n in std::iter::once(node).chain(tree.descendants(node)) {
                if let Some(url) = tree.kind(n).link_url() {
                    self.term(LINK, url);
                }
            }
        }
    }
}

fn page_document(subpath: &str, page: &Page) -> Document {
    let tree = page.tree();
    let root = page.root();
    let mut doc = Document {
        key: subpath.to_string(),
        kind: page.kind().as_str(),
        page: subpath.to_string(),
        last_modified: Some(nanos(page.last_modified())),
        title: Some(page.title().to_string()),
        date: page.date().map(|d| d.format("%Y-%m-%d").to_string()),
        content: tree.plain_text(root),
        ..Document::default()
    };
    doc.term("type", page.kind().as_str());
    doc.term("title", page.title());

    if let Some(first) = tree.blocks(root).next() {
        doc.preview = tree.preview(tree.content(first));
        if let Some(properties) = tree.find_block_properties(first) {
            doc.add_properties(tree, properties);
        }
        doc.add_refs(tree, tree.content(first), PAGES);
    }
    doc.add_links(tree, tree.children(root));
    doc
}

fn block_documents(
    tree: &Tree,
    parent: NodeId,
    subpath: &str,
    location: &mut Vec<usize>,
    out: &mut Vec<Document>,
) {
    for (i, block) in tree.blocks(parent).enumerate() {
        location.push(i);
        out.push(block_document(tree, block, subpath, location));
        block_documents(tree, block, subpath, location, out);
        location.pop();
    }
}

fn block_document(tree: &Tree, block: NodeId, subpath: &str, location: &[usize]) -> Document {
    let mut key = subpath.to_string();
    for index in location.iter().rev() {
        key.push(':');
        key.push_str(&index.to_string());
    }

    let mut doc = Document {
        key,
        kind: "block",
        page: subpath.to_string(),
        block_id: tree.block_id(block),
        location: Some(format_location(location)),
        preview: tree.preview(tree.content(block)),
        content: tree.plain_text_of(tree.content(block)),
        ..Document::default()
    };
    doc.term("type", "block");
    if let Some(id) = doc.block_id.clone() {
        doc.term("id", id);
    }
    if let Some(properties) = tree.find_block_properties(block) {
        doc.add_properties(tree, properties);
    }
    doc.add_refs(tree, tree.content(block), PAGES);
    doc.add_links(tree, tree.content(block));
    doc
}

fn format_location(location: &[usize]) -> String {
    location
        .iter()
        .map(usize::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

fn parse_location(location: &str) -> Vec<usize> {
    location
        .split(',')
        .filter_map(|index| index.parse().ok())
        .collect()
}

fn insert_document(conn: &Connection, doc: &Document) -> Result<()> {
    conn.execute(
        "INSERT INTO documents (key, kind, page, last_modified, title, date, block_id, location, preview)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            doc.key,
            doc.kind,
            doc.page,
            doc.last_modified,
            doc.title,
            doc.date,
            doc.block_id,
            doc.location,
            doc.preview
        ],
    )?;
    let id = conn.last_insert_rowid();

    if let Some(title) = &doc.title {
        conn.execute(
            "INSERT INTO titles (rowid, text) VALUES (?1, ?2)",
            params![id, title],
        )?;
    }
    conn.execute(
        "INSERT INTO contents (rowid, text) VALUES (?1, ?2)",
        params![id, doc.content],
    )?;
    for (field, text) in &doc.property_text {
        conn.execute(
            "INSERT INTO property_text (doc, field, text) VALUES (?1, ?2, ?3)",
            params![id, field, text],
        )?;
    }
    for (field, value) in &doc.terms {
        conn.execute(
            "INSERT INTO terms (doc, field, value) VALUES (?1, ?2, ?3)",
            params![id, field, value],
        )?;
    }
    Ok(())
}

fn delete_documents(conn: &Connection, subpath: &str) -> Result<usize> {
    const OF_PAGE: &str = "(SELECT id FROM documents WHERE page = ?1)";
    conn.execute(
        &format!("DELETE FROM titles WHERE rowid IN {OF_PAGE}"),
        params![subpath],
    )?;
    conn.execute(
        &format!("DELETE FROM contents WHERE rowid IN {OF_PAGE}"),
        params![subpath],
    )?;
    conn.execute(
        &format!("DELETE FROM property_text WHERE doc IN {OF_PAGE}"),
        params![subpath],
    )?;
    conn.execute(
        &format!("DELETE FROM terms WHERE doc IN {OF_PAGE}"),
        params![subpath],
    )?;
    Ok(conn.execute("DELETE FROM documents WHERE page = ?1", params![subpath])?)
}
