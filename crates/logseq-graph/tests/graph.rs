use std::{
    fs,
    path::Path,
    time::{Duration, SystemTime},
};

use chrono::NaiveDate;
use logseq_content::{
    Query,
    nodes::build::{block, page_link, text},
    query::{content_matches, property_equals, references, title_matches},
};
use logseq_graph::{
    ChangeEvent, Graph, GraphError, GraphOptions, IndexLocation, PageKind, SearchOptions,
};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn write(root: &Path, subpath: &str, content: &str) {
    let path = root.join(subpath);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn sample_graph() -> TempDir {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "logseq/config.edn",
        r#"{:journal/page-title-format "yyyy-MM-dd" :default-templates {:journals ""}}"#,
    );
    write(
        dir.path(),
        "pages/Rust.md",
        "type:: language\n\n- Ownership and [[Borrowing]]\n- Traits",
    );
    write(dir.path(), "pages/Projects___Logseq.md", "- Parser in [[Rust]]");
    write(dir.path(), "journals/2024_03_05.md", "- Read about [[Rust]]");
    write(dir.path(), "journals/2024_03_04.md", "- Nothing much");
    write(dir.path(), "journals/notes.md", "- not a journal");
    dir
}

fn memory_index() -> GraphOptions {
    GraphOptions::new().with_index(IndexLocation::Memory)
}

fn titles(graph: &Graph, query: Query) -> Vec<String> {
    graph
        .search_pages(&SearchOptions::new().with_query(query))
        .unwrap()
        .results
        .into_iter()
        .map(|r| r.title)
        .collect()
}

#[test]
fn opening_indexes_every_page() {
    let dir = sample_graph();
    let graph = Graph::open(dir.path(), memory_index()).unwrap();

    assert_eq!(
        titles(&graph, Query::All),
        vec!["2024-03-05", "2024-03-04", "Projects/Logseq", "Rust"]
    );
    assert_eq!(titles(&graph, title_matches("logseq")), vec!["Projects/Logseq"]);
    assert_eq!(titles(&graph, property_equals("type", "language")), vec!["Rust"]);
    assert_eq!(
        titles(&graph, references("rust")),
        vec!["2024-03-05", "Projects/Logseq"]
    );
}

#[test]
fn search_needs_an_index() {
    let dir = sample_graph();
    let graph = Graph::open(dir.path(), GraphOptions::new()).unwrap();
    assert!(matches!(
        graph.search_pages(&SearchOptions::new()),
        Err(GraphError::IndexDisabled)
    ));
}

#[test]
fn block_hits_lead_back_to_their_block() {
    let dir = sample_graph();
    let graph = Graph::open(dir.path(), memory_index()).unwrap();

    let hits = graph
        .search_blocks(&SearchOptions::new().with_query(content_matches("traits")))
        .unwrap();
    assert_eq!(hits.count, 1);
    let hit = &hits.results[0];
    assert_eq!(hit.page.title, "Rust");

    let page = hit.page.open(&graph).unwrap();
    let found = hit.locate(&page).unwrap();
    assert_eq!(page.tree().plain_text(found), "Traits");
}

#[test]
fn results_are_paged() {
    let dir = sample_graph();
    let graph = Graph::open(dir.path(), memory_index()).unwrap();

    let options = SearchOptions::new().with_limit(2).with_offset(1);
    let page = graph.search_pages(&options).unwrap();
    assert_eq!(page.count, 4);
    let titles: Vec<_> = page.results.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["2024-03-04", "Projects/Logseq"]);
}

#[test]
fn reopening_syncs_a_persistent_index() {
    let dir = sample_graph();
    let db = TempDir::new().unwrap();
    let options = GraphOptions::new().with_index(IndexLocation::Path(db.path().join("index.db")));

    drop(Graph::open(dir.path(), options.clone()).unwrap());

    fs::remove_file(dir.path().join("pages/Projects___Logseq.md")).unwrap();
    let rust = dir.path().join("pages/Rust.md");
    fs::write(&rust, "- Lifetimes").unwrap();
    fs::File::options()
        .write(true)
        .open(&rust)
        .unwrap()
        .set_modified(SystemTime::now() + Duration::from_secs(60))
        .unwrap();

    let graph = Graph::open(dir.path(), options).unwrap();
    assert_eq!(titles(&graph, title_matches("logseq")), Vec::<String>::new());
    assert_eq!(titles(&graph, content_matches("lifetimes")), vec!["Rust"]);
    assert_eq!(titles(&graph, content_matches("traits")), Vec::<String>::new());
}

#[test]
fn saved_pages_are_searchable() {
    let dir = sample_graph();
    let graph = Graph::open(dir.path(), memory_index()).unwrap();

    let mut tx = graph.transaction();
    let page = tx.open_page("Go").unwrap();
    let b = page.insert(block([text("Compare with "), page_link("Rust")]));
    page.add_block(b);
    tx.save().unwrap();

    assert_eq!(
        fs::read_to_string(dir.path().join("pages/Go.md")).unwrap(),
        "- Compare with [[Rust]]"
    );
    assert_eq!(titles(&graph, title_matches("go")), vec!["Go"]);
    assert_eq!(
        titles(&graph, references("rust")),
        vec!["2024-03-05", "Go", "Projects/Logseq"]
    );
}

#[test]
fn journals_open_by_date() {
    let dir = sample_graph();
    let graph = Graph::open(dir.path(), GraphOptions::new()).unwrap();

    let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
    let journal = graph.open_journal(date).unwrap();
    assert_eq!(journal.kind(), PageKind::Journal);
    assert_eq!(journal.title(), "2024-03-05");
    assert_eq!(journal.date(), Some(date));
    assert!(!journal.is_new());

    let empty = graph
        .open_journal(NaiveDate::from_ymd_opt(2024, 3, 6).unwrap())
        .unwrap();
    assert!(empty.is_new());
}

#[test]
fn watchers_see_updates_and_deletions() {
    let dir = sample_graph();
    let graph = Graph::open(dir.path(), memory_index()).unwrap();
    let watcher = graph.watch().unwrap();

    write(dir.path(), "pages/Zig.md", "- comptime");
    let event = watcher.next_timeout(Duration::from_secs(10)).unwrap();
    let ChangeEvent::PageUpdated { page } = event else {
        panic!("expected an update, got {event:?}");
    };
    assert_eq!(page.title, "Zig");
    assert_eq!(titles(&graph, content_matches("comptime")), vec!["Zig"]);

    fs::remove_file(dir.path().join("pages/Zig.md")).unwrap();
    let event = watcher.next_timeout(Duration::from_secs(10)).unwrap();
    assert_eq!(
        event,
        ChangeEvent::PageDeleted {
            kind: PageKind::Dedicated,
            title: "Zig".to_string(),
            date: None,
        }
    );
    assert_eq!(titles(&graph, content_matches("comptime")), Vec::<String>::new());
}
