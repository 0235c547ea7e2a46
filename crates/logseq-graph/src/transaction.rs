//! Batched page edits with a modification check on save.

use std::{
    collections::{HashMap, hash_map::Entry},
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use logseq_content::{
    Fragment, Kind, NodeId, NodeKind, PreviousLine, Tree,
    nodes::{
        build::{strong, text},
        select::is_of_kind,
    },
};

use crate::{
    dates::DateFormat,
    error::{GraphError, Result, io_at},
    graph::Graph,
    page::Page,
};

/// Pages opened for editing. Each page is loaded once; [`Transaction::save`]
/// writes all of them, refusing if any file changed on disk in the
/// meantime.
pub struct Transaction<'g> {
    graph: &'g Graph,
    pages: HashMap<PathBuf, Page>,
}

impl<'g> Transaction<'g> {
    pub(crate) fn new(graph: &'g Graph) -> Self {
        Transaction {
            graph,
            pages: HashMap::new(),
        }
    }

    pub fn open_page(&mut self, title: &str) -> Result<&mut Page> {
        let layout = &self.graph.layout;
        cached(&mut self.pages, layout.page_path(title), || {
            layout.open_page(title)
        })
    }

    pub fn open_journal(&mut self, date: NaiveDate) -> Result<&mut Page> {
        let layout = &self.graph.layout;
        cached(&mut self.pages, layout.journal_path(date), || {
            layout.open_journal(date)
        })
    }

    /// Adds a block to the journal of `at`'s day.
    ///
    /// With a block time format configured, the block is prefixed with the
    /// time in bold and placed after the last block stamped no later than
    /// `at`. Otherwise it goes after the last non-empty block. Returns the
    /// new block.
    pub fn add_journal_block(&mut self, at: NaiveDateTime, block: Fragment) -> Result<NodeId> {
        let time_format = self.graph.block_time.clone();
        let page = self.open_journal(at.date())?;
        let block = page.insert(block);

        let mut after = None;
        for existing in page.blocks() {
            let stamped = time_format
                .as_ref()
                .and_then(|format| block_time(page.tree(), existing, format));
            if stamped.is_some_and(|t| t > at.time()) {
                break;
            }
            if page.tree().has_children(existing) {
                after = Some(existing);
            }
        }

        if let Some(format) = &time_format {
            prefix_time(page.tree_mut(), block, &format.format_time(at.time()));
        }

        match after {
            Some(after) => page.insert_block_after(block, after),
            None => page.prepend_block(block),
        };
        Ok(block)
    }

    /// Writes every opened page. Nothing is written unless all pages are
    /// still as they were when opened.
    pub fn save(&mut self) -> Result<()> {
        for (path, page) in &self.pages {
            check_unchanged(path, page).inspect_err(|e| log::warn!("not saving: {e}"))?;
        }

        for (path, page) in &mut self.pages {
            let markdown = page.to_markdown()?;
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).map_err(io_at(parent))?;
            }
            fs::write(path, markdown).map_err(io_at(path))?;
            page.mark_saved()?;
            log::debug!("saved {}", path.display());

            if let (Some(index), Some(subpath)) = (&self.graph.index, self.graph.layout.subpath(path)) {
                index.index_page(&subpath, page)?;
            }
        }
        Ok(())
    }
}

fn cached(
    pages: &mut HashMap<PathBuf, Page>,
    path: PathBuf,
    open: impl FnOnce() -> Result<Page>,
) -> Result<&mut Page> {
    match pages.entry(path) {
        Entry::Occupied(entry) => Ok(entry.into_mut()),
        Entry::Vacant(entry) => Ok(entry.insert(open()?)),
    }
}

fn check_unchanged(path: &Path, page: &Page) -> Result<()> {
    let metadata = match fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            if page.is_new() {
                return Ok(());
            }
            return Err(GraphError::Vanished(path.to_path_buf()));
        }
        Err(e) => return Err(io_at(path)(e)),
    };

    if metadata.is_dir() {
        return Err(GraphError::NotAFile(path.to_path_buf()));
    }
    // A new page must not have been created by someone else.
    if page.is_new() {
        return Err(GraphError::Modified(path.to_path_buf()));
    }
    let modified = metadata.modified().map_err(io_at(path))?;
    if modified != page.last_modified() {
        return Err(GraphError::Modified(path.to_path_buf()));
    }
    Ok(())
}

/// Time stamped at the start of a block's first paragraph.
fn block_time(tree: &Tree, block: NodeId, format: &DateFormat) -> Option<NaiveTime> {
    let paragraph = tree.find_deep(block, is_of_kind(Kind::Paragraph))?;
    let first = tree.find_deep(paragraph, is_of_kind(Kind::Text))?;
    match tree.kind(first) {
        NodeKind::Text { value, .. } => format.parse_time(value),
        _ => None,
    }
}

/// Puts `**time** ` in front of the block's first paragraph, skipping
/// leading properties, or in a new paragraph when there is none.
fn prefix_time(tree: &mut Tree, block: NodeId, time: &str) {
    let mut first = tree.first_child(block);
    if first.is_some_and(|c| tree.is(c, Kind::Properties)) {
        first = first.and_then(|c| tree.next_sibling(c));
    }

    let stamp = tree.insert(strong([text(time)]));
    let space = tree.insert(text(" "));
    match first.filter(|&c| tree.is(c, Kind::Paragraph)) {
        Some(paragraph) => {
            tree.prepend_children(paragraph, [stamp, space]);
        }
        None => {
            let paragraph = tree.alloc(NodeKind::Paragraph {
                previous_line: PreviousLine::Automatic,
            });
            tree.add_children(paragraph, [stamp, space]);
            tree.prepend_child(block, paragraph);
        }
    }
}
