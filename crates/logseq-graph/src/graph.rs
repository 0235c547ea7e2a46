use std::{
    collections::HashSet,
    ffi::OsStr,
    fs,
    path::{Component, Path, PathBuf},
    sync::{
        Arc, Mutex, Weak,
        atomic::{AtomicU64, Ordering},
        mpsc,
    },
    time::Duration,
};

use chrono::NaiveDate;
use logseq_config::GraphConfig;

use crate::{
    dates::DateFormat,
    error::{GraphError, Result, io_at},
    filenames::{filename_to_title, title_to_filename},
    index::{Index, nanos},
    page::{Page, PageKind},
    search::{BlockResult, PageResult, SearchOptions, SearchResults},
    transaction::Transaction,
    watcher::{Subscribers, WatchService, Watcher},
};

/// Where the search index lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexLocation {
    Memory,
    Path(PathBuf),
}

#[derive(Debug, Clone, Default)]
pub struct GraphOptions {
    /// Enables search. Without an index, searches fail with
    /// [`GraphError::IndexDisabled`].
    pub index: Option<IndexLocation>,
    /// Time pattern (for example `HH:mm`) prefixed to journal blocks added
    /// through [`Transaction::add_journal_block`].
    pub block_time_format: Option<String>,
}

impl GraphOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_index(mut self, location: IndexLocation) -> Self {
        self.index = Some(location);
        self
    }

    pub fn with_block_time_format(mut self, format: impl Into<String>) -> Self {
        self.block_time_format = Some(format.into());
        self
    }
}

/// Where pages and journals live inside a graph directory.
#[derive(Debug, Clone)]
pub(crate) struct Layout {
    dir: PathBuf,
    config: GraphConfig,
    journal_file: DateFormat,
    journal_title: DateFormat,
}

impl Layout {
    pub(crate) fn new(dir: PathBuf, config: GraphConfig) -> Result<Self> {
        Ok(Layout {
            journal_file: DateFormat::new(&config.journal_file_name_format)?,
            journal_title: DateFormat::new(&config.journal_page_title_format)?,
            dir,
            config,
        })
    }

    pub(crate) fn journals_dir(&self) -> PathBuf {
        self.dir.join(&self.config.journals_dir)
    }

    pub(crate) fn pages_dir(&self) -> PathBuf {
        self.dir.join(&self.config.pages_dir)
    }

    pub(crate) fn page_path(&self, title: &str) -> PathBuf {
        let name = title_to_filename(self.config.file_name_format, title);
        self.pages_dir().join(format!("{name}.md"))
    }

    pub(crate) fn journal_path(&self, date: NaiveDate) -> PathBuf {
        let name = self.journal_file.format_date(date);
        self.journals_dir().join(format!("{name}.md"))
    }

    pub(crate) fn journal_title(&self, date: NaiveDate) -> String {
        self.journal_title.format_date(date)
    }

    pub(crate) fn open_page(&self, title: &str) -> Result<Page> {
        Page::open_or_create(
            self.page_path(title),
            PageKind::Dedicated,
            title.to_string(),
            None,
            None,
        )
    }

    pub(crate) fn open_journal(&self, date: NaiveDate) -> Result<Page> {
        let template = self
            .config
            .journal_template
            .as_deref()
            .map(|title| self.page_path(title));
        Page::open_or_create(
            self.journal_path(date),
            PageKind::Journal,
            self.journal_title(date),
            Some(date),
            template.as_deref(),
        )
    }

    /// Path relative to the graph root, always `/`-separated.
    pub(crate) fn subpath(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.dir).ok()?;
        let parts: Option<Vec<&str>> = relative
            .components()
            .map(|c| match c {
                Component::Normal(part) => part.to_str(),
                _ => None,
            })
            .collect();
        Some(parts?.join("/"))
    }

    /// Identifies the page stored at `path`. Files outside the journals and
    /// pages directories, and journals whose name is not a date, are not
    /// pages.
    pub(crate) fn classify(&self, path: &Path) -> Option<PageResult> {
        if path.extension() != Some(OsStr::new("md")) {
            return None;
        }
        let stem = path.file_stem()?.to_str()?;
        let subpath = self.subpath(path)?;
        let parent = path.parent()?;

        if parent == self.journals_dir() {
            let Some(date) = self.journal_file.parse_date(stem) else {
                log::debug!(
                    "skipping {subpath}: name does not match {:?}",
                    self.journal_file.pattern()
                );
                return None;
            };
            Some(PageResult {
                subpath,
                kind: PageKind::Journal,
                title: self.journal_title(date),
                date: Some(date),
            })
        } else if parent == self.pages_dir() {
            Some(PageResult {
                subpath,
                kind: PageKind::Dedicated,
                title: filename_to_title(self.config.file_name_format, stem),
                date: None,
            })
        } else {
            log::debug!("skipping {subpath}: not directly in a page directory");
            None
        }
    }

    /// Loads an existing file for indexing.
    pub(crate) fn load(&self, page: &PageResult) -> Result<Page> {
        Page::open_or_create(
            self.dir.join(&page.subpath),
            page.kind,
            page.title.clone(),
            page.date,
            None,
        )
    }

    /// Every `.md` file below the journals and pages directories.
    fn markdown_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for dir in [self.journals_dir(), self.pages_dir()] {
            let pattern = format!("{}/**/*.md", glob::Pattern::escape(&dir.to_string_lossy()));
            for entry in glob::glob(&pattern)? {
                match entry {
                    Ok(path) if path.is_file() => files.push(path),
                    Ok(_) => {}
                    Err(e) => log::warn!("skipping {}: {}", e.path().display(), e.error()),
                }
            }
        }
        Ok(files)
    }
}

/// A Logseq graph: a directory of Markdown pages and journals.
///
/// ```no_run
/// use logseq_graph::{Graph, GraphOptions, IndexLocation, SearchOptions};
/// use logseq_content::query::title_matches;
///
/// let graph = Graph::open("notes", GraphOptions::new().with_index(IndexLocation::Memory))?;
/// let hits = graph.search_pages(&SearchOptions::new().with_query(title_matches("rust")))?;
/// for hit in hits.results {
///     println!("{}", hit.title);
/// }
/// # Ok::<(), logseq_graph::GraphError>(())
/// ```
pub struct Graph {
    pub(crate) layout: Layout,
    pub(crate) index: Option<Index>,
    pub(crate) block_time: Option<DateFormat>,
    subscribers: Subscribers,
    next_watcher: AtomicU64,
    service: Mutex<Weak<WatchService>>,
}

impl Graph {
    /// Opens the graph rooted at `dir`. With an index configured, every page
    /// whose modification time differs from the indexed one is re-indexed
    /// and pages that no longer exist are dropped from the index.
    pub fn open(dir: impl AsRef<Path>, options: GraphOptions) -> Result<Self> {
        let dir = dir.as_ref();
        let dir = fs::canonicalize(dir).map_err(io_at(dir))?;
        let config = GraphConfig::load(&dir)?;
        let layout = Layout::new(dir, config)?;
        let block_time = options
            .block_time_format
            .as_deref()
            .map(DateFormat::new)
            .transpose()?;
        let index = match &options.index {
            None => None,
            Some(IndexLocation::Memory) => Some(Index::open_in_memory()?),
            Some(IndexLocation::Path(path)) => Some(Index::open(path)?),
        };

        let graph = Graph {
            layout,
            index,
            block_time,
            subscribers: Arc::new(Mutex::new(Vec::new())),
            next_watcher: AtomicU64::new(0),
            service: Mutex::new(Weak::new()),
        };
        if let Some(index) = &graph.index {
            graph.sync(index)?;
        }
        Ok(graph)
    }

    pub fn dir(&self) -> &Path {
        &self.layout.dir
    }

    pub fn config(&self) -> &GraphConfig {
        &self.layout.config
    }

    /// Title of the journal page for `date`.
    pub fn journal_title(&self, date: NaiveDate) -> String {
        self.layout.journal_title(date)
    }

    /// Opens a page by title; the page is new if no file exists yet.
    pub fn open_page(&self, title: &str) -> Result<Page> {
        self.layout.open_page(title)
    }

    /// Opens the journal of `date`. New journals start from the journal
    /// template page when one is configured.
    pub fn open_journal(&self, date: NaiveDate) -> Result<Page> {
        self.layout.open_journal(date)
    }

    pub fn transaction(&self) -> Transaction<'_> {
        Transaction::new(self)
    }

    pub fn search_pages(&self, options: &SearchOptions) -> Result<SearchResults<PageResult>> {
        let index = self.index.as_ref().ok_or(GraphError::IndexDisabled)?;
        index.search_pages(&options.query, options.limit, options.offset)
    }

    pub fn search_blocks(&self, options: &SearchOptions) -> Result<SearchResults<BlockResult>> {
        let index = self.index.as_ref().ok_or(GraphError::IndexDisabled)?;
        index.search_blocks(&options.query, options.limit, options.offset)
    }

    /// Subscribes to changes made to the graph's files. The file watcher
    /// runs while at least one [`Watcher`] is alive.
    pub fn watch(&self) -> Result<Watcher> {
        let service = {
            let mut current = self
                .service
                .lock()
                .map_err(|_| GraphError::Poisoned("watcher"))?;
            match current.upgrade() {
                Some(service) => service,
                None => {
                    let service = Arc::new(WatchService::start(
                        self.layout.clone(),
                        self.index.clone(),
                        self.subscribers.clone(),
                        Duration::from_secs(1),
                    )?);
                    *current = Arc::downgrade(&service);
                    service
                }
            }
        };

        let (tx, rx) = mpsc::channel();
        let id = self.next_watcher.fetch_add(1, Ordering::Relaxed);
        self.subscribers
            .lock()
            .map_err(|_| GraphError::Poisoned("subscribers"))?
            .push((id, tx));
        Ok(Watcher::new(id, rx, self.subscribers.clone(), service))
    }

    fn sync(&self, index: &Index) -> Result<()> {
        let mut seen = HashSet::new();
        let mut updated = 0;

        for path in self.layout.markdown_files()? {
            let Some(found) = self.layout.classify(&path) else {
                continue;
            };
            let modified = fs::metadata(&path)
                .and_then(|m| m.modified())
                .map_err(io_at(&path))?;
            seen.insert(found.subpath.clone());
            if index.last_modified(&found.subpath)? == Some(nanos(modified)) {
                continue;
            }

            match self.layout.load(&found) {
                Ok(page) => {
                    index.index_page(&found.subpath, &page)?;
                    updated += 1;
                }
                Err(e) => log::warn!("not indexing {}: {e}", found.subpath),
            }
        }

        let mut removed = 0;
        for subpath in index.subpaths()? {
            if !seen.contains(&subpath) && index.delete_page(&subpath)? {
                removed += 1;
            }
        }

        log::info!(
            "index synced: {} pages, {updated} updated, {removed} removed",
            seen.len()
        );
        Ok(())
    }
}

impl PageResult {
    /// Opens the page this result refers to.
    pub fn open(&self, graph: &Graph) -> Result<Page> {
        match (self.kind, self.date) {
            (PageKind::Journal, Some(date)) => graph.open_journal(date),
            _ => graph.open_page(&self.title),
        }
    }
}
