use anyhow::Result;
use logseq_content::{
    Query,
    query::{content_matches, title_matches},
};
use logseq_graph::{Graph, PageResult, SearchOptions};
use ratatui::widgets::ListState;

use crate::outline::outline_lines;

/// Upper bound on listed pages.
const LIST_LIMIT: usize = 5000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Browse,
    /// Typing a search query.
    Search,
}

pub struct App {
    graph: Graph,
    pub entries: Vec<PageResult>,
    pub list_state: ListState,
    pub content: Vec<String>,
    pub mode: Mode,
    pub query: String,
    /// Title of the list panel, including hit counts for searches.
    pub list_title: String,
}

impl App {
    pub fn new(graph: Graph) -> Result<Self> {
        let mut app = Self {
            graph,
            entries: Vec::new(),
            list_state: ListState::default(),
            content: Vec::new(),
            mode: Mode::Browse,
            query: String::new(),
            list_title: String::new(),
        };
        app.show_all()?;
        Ok(app)
    }

    /// Lists every journal and page.
    pub fn show_all(&mut self) -> Result<()> {
        let results = self
            .graph
            .search_pages(&SearchOptions::new().with_limit(LIST_LIMIT))?;
        self.list_title = format!("Pages ({})", results.count);
        self.set_entries(results.results);
        Ok(())
    }

    /// Replaces the list with pages whose title or content match the query.
    pub fn run_search(&mut self) -> Result<()> {
        self.mode = Mode::Browse;
        if self.query.trim().is_empty() {
            return self.show_all();
        }
        let query = Query::or([
            title_matches(self.query.as_str()),
            content_matches(self.query.as_str()),
        ]);
        let results = self.graph.search_pages(
            &SearchOptions::new()
                .with_query(query)
                .with_limit(LIST_LIMIT),
        )?;
        log::debug!("search {:?}: {} hits", self.query, results.count);
        self.list_title = format!("Search: {} ({})", self.query, results.count);
        self.set_entries(results.results);
        Ok(())
    }

    pub fn start_search(&mut self) {
        self.mode = Mode::Search;
        self.query.clear();
    }

    pub fn cancel_search(&mut self) -> Result<()> {
        self.mode = Mode::Browse;
        self.query.clear();
        self.show_all()
    }

    fn set_entries(&mut self, entries: Vec<PageResult>) {
        self.entries = entries;
        self.list_state
            .select(if self.entries.is_empty() { None } else { Some(0) });
        self.update_content_for_selection();
    }

    pub fn next(&mut self) {
        if self.entries.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => (i + 1) % self.entries.len(),
            None => 0,
        };
        self.list_state.select(Some(i));
        self.update_content_for_selection();
    }

    pub fn previous(&mut self) {
        if self.entries.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(0) | None => self.entries.len() - 1,
            Some(i) => i - 1,
        };
        self.list_state.select(Some(i));
        self.update_content_for_selection();
    }

    fn update_content_for_selection(&mut self) {
        let Some(entry) = self
            .list_state
            .selected()
            .and_then(|i| self.entries.get(i))
        else {
            self.content.clear();
            return;
        };

        self.content = match entry.open(&self.graph) {
            Ok(page) => outline_lines(page.tree(), page.root()),
            Err(e) => vec![format!("Error opening page: {e}")],
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logseq_graph::{GraphOptions, IndexLocation};
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn app() -> (TempDir, App) {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("pages")).unwrap();
        fs::create_dir_all(dir.path().join("journals")).unwrap();
        fs::write(dir.path().join("pages/Alpha.md"), "- first\n  - nested").unwrap();
        fs::write(dir.path().join("pages/Beta.md"), "- mentions alpha").unwrap();
        fs::write(dir.path().join("journals/2024_01_01.md"), "- new year").unwrap();

        let graph = Graph::open(
            dir.path(),
            GraphOptions::new().with_index(IndexLocation::Memory),
        )
        .unwrap();
        (dir, App::new(graph).unwrap())
    }

    fn titles(app: &App) -> Vec<&str> {
        app.entries.iter().map(|e| e.title.as_str()).collect()
    }

    #[test]
    fn lists_journals_then_pages() {
        let (_dir, app) = app();
        assert_eq!(titles(&app), vec!["Jan 1st, 2024", "Alpha", "Beta"]);
        assert_eq!(app.list_title, "Pages (3)");
        assert_eq!(app.content, vec!["• new year"]);
    }

    #[test]
    fn selection_wraps_and_renders() {
        let (_dir, mut app) = app();
        app.next();
        assert_eq!(app.content, vec!["• first", "  • nested"]);
        app.previous();
        app.previous();
        assert_eq!(app.list_state.selected(), Some(2));
        assert_eq!(app.content, vec!["• mentions alpha"]);
    }

    #[test]
    fn search_replaces_the_list() {
        let (_dir, mut app) = app();
        app.start_search();
        assert_eq!(app.mode, Mode::Search);
        app.query.push_str("alpha");
        app.run_search().unwrap();

        assert_eq!(app.mode, Mode::Browse);
        assert_eq!(titles(&app), vec!["Alpha", "Beta"]);
        assert_eq!(app.list_title, "Search: alpha (2)");

        app.cancel_search().unwrap();
        assert_eq!(titles(&app).len(), 3);
    }
}
