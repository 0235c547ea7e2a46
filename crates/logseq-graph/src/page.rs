//! A page or journal file loaded into an outline tree.

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    time::SystemTime,
};

use chrono::NaiveDate;
use logseq_content::{Fragment, NodeId, NodeKind, Tree, parse, write_to_string};

use crate::error::{GraphError, Result, io_at};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageKind {
    /// A named page under the pages directory.
    Dedicated,
    /// A daily page under the journals directory.
    Journal,
}

impl PageKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PageKind::Dedicated => "page",
            PageKind::Journal => "journal",
        }
    }

    pub fn parse(kind: &str) -> Option<Self> {
        match kind {
            "page" => Some(PageKind::Dedicated),
            "journal" => Some(PageKind::Journal),
            _ => None,
        }
    }
}

/// An opened page. Edits happen on [`Page::tree_mut`] and the page helpers;
/// nothing touches the disk until the page is saved through a transaction.
#[derive(Debug)]
pub struct Page {
    path: PathBuf,
    kind: PageKind,
    title: String,
    date: Option<NaiveDate>,
    last_modified: SystemTime,
    is_new: bool,
    tree: Tree,
}

impl Page {
    /// Loads the file at `path`, or starts a new page when it does not exist.
    /// New pages copy the outline of `template` when one is given.
    pub(crate) fn open_or_create(
        path: PathBuf,
        kind: PageKind,
        title: String,
        date: Option<NaiveDate>,
        template: Option<&Path>,
    ) -> Result<Self> {
        let (tree, last_modified, is_new) = match fs::metadata(&path) {
            Ok(metadata) => {
                if metadata.is_dir() {
                    return Err(GraphError::NotAFile(path));
                }
                let modified = metadata.modified().map_err(io_at(&path))?;
                (load_tree(&path)?, modified, false)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                let tree = match template {
                    Some(template) if template.exists() => load_tree(template)?,
                    Some(template) => {
                        log::warn!("journal template {} not found", template.display());
                        Tree::new()
                    }
                    None => Tree::new(),
                };
                (tree, SystemTime::now(), true)
            }
            Err(e) => return Err(io_at(&path)(e)),
        };

        Ok(Self {
            path,
            kind,
            title,
            date,
            last_modified,
            is_new,
            tree,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kind(&self) -> PageKind {
        self.kind
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// The journal date; `None` for dedicated pages.
    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    /// Modification time of the file when it was read.
    pub fn last_modified(&self) -> SystemTime {
        self.last_modified
    }

    /// True when the page was not loaded from disk.
    pub fn is_new(&self) -> bool {
        self.is_new
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut Tree {
        &mut self.tree
    }

    pub fn root(&self) -> NodeId {
        self.tree.root()
    }

    /// Top-level blocks in order.
    pub fn blocks(&self) -> Vec<NodeId> {
        self.tree.blocks(self.tree.root()).collect()
    }

    /// Page properties: those of the first block, which is created when the
    /// page is empty.
    pub fn properties(&mut self) -> NodeId {
        let root = self.tree.root();
        let existing = self.tree.blocks(root).next();
        let first = match existing {
            Some(first) => first,
            None => {
                let block = self.tree.alloc(NodeKind::Block);
                self.tree.add_child(root, block);
                block
            }
        };
        self.tree.block_properties(first)
    }

    /// Allocates `fragment` in this page's tree without attaching it.
    pub fn insert(&mut self, fragment: Fragment) -> NodeId {
        self.tree.insert(fragment)
    }

    pub fn add_block(&mut self, block: NodeId) -> bool {
        let root = self.tree.root();
        self.tree.add_child(root, block)
    }

    pub fn prepend_block(&mut self, block: NodeId) -> bool {
        let root = self.tree.root();
        self.tree.prepend_child(root, block)
    }

    pub fn insert_block_before(&mut self, block: NodeId, before: NodeId) -> bool {
        let root = self.tree.root();
        self.tree.insert_child_before(root, block, before)
    }

    pub fn insert_block_after(&mut self, block: NodeId, after: NodeId) -> bool {
        let root = self.tree.root();
        self.tree.insert_child_after(root, block, after)
    }

    pub fn remove_block(&mut self, block: NodeId) -> bool {
        let root = self.tree.root();
        self.tree.remove_child(root, block)
    }

    /// Finds a block anywhere on the page by its `id::` property.
    pub fn find_block(&self, id: &str) -> Option<NodeId> {
        let root = self.tree.root();
        self.tree
            .descendants(root)
            .filter(|&node| matches!(self.tree.kind(node), NodeKind::Block))
            .find(|&block| self.tree.block_id(block).as_deref() == Some(id))
    }

    /// Follows child indexes from the top level down.
    pub fn block_at(&self, location: &[usize]) -> Option<NodeId> {
        let mut current = self.tree.root();
        for &index in location {
            current = self.tree.blocks(current).nth(index)?;
        }
        (current != self.tree.root()).then_some(current)
    }

    pub fn to_markdown(&self) -> Result<String> {
        write_to_string(&self.tree, self.tree.root()).map_err(|source| GraphError::Emit {
            path: self.path.clone(),
            source,
        })
    }

    /// Records a successful write.
    pub(crate) fn mark_saved(&mut self) -> Result<()> {
        let metadata = fs::metadata(&self.path).map_err(io_at(&self.path))?;
        self.last_modified = metadata.modified().map_err(io_at(&self.path))?;
        self.is_new = false;
        Ok(())
    }
}

/// Parses a page file. Content before the first bullet is moved into a
/// leading block so the root only ever holds blocks.
fn load_tree(path: &Path) -> Result<Tree> {
    let data = fs::read(path).map_err(io_at(path))?;
    let mut tree = parse(&data).map_err(|source| GraphError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let root = tree.root();
    let content: Vec<_> = tree.content(root).collect();
    if !content.is_empty() {
        let first = tree.alloc(NodeKind::Block);
        tree.add_children(first, content);
        tree.prepend_child(root, first);
    }
    Ok(tree)
}
