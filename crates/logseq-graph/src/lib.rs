//! A Logseq graph on disk: pages and journals as Markdown files, edited
//! through transactions, searched through an SQLite index and followed with
//! a file watcher.

pub mod dates;
pub mod error;
pub mod filenames;
mod graph;
mod index;
pub mod page;
pub mod search;
mod transaction;
mod watcher;

pub use dates::DateFormat;
pub use error::{GraphError, Result};
pub use graph::{Graph, GraphOptions, IndexLocation};
pub use page::{Page, PageKind};
pub use search::{BlockResult, PageResult, SearchOptions, SearchResults};
pub use transaction::Transaction;
pub use watcher::{ChangeEvent, Watcher};
