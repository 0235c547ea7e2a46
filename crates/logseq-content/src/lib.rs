//! Parser, writer and node tree for Logseq-flavoured Markdown pages.
//!
//! ```
//! use logseq_content::{parse_string, write_to_string};
//!
//! let source = "- TODO Call [[Alice]]\n\n  - about #project";
//! let tree = parse_string(source).unwrap();
//! assert_eq!(write_to_string(&tree, tree.root()).unwrap(), source);
//! ```

pub mod debug;
pub mod error;
pub mod nodes;
pub mod output;
pub mod parsing;
pub mod query;

pub use debug::debug;
pub use error::{EmitError, ParseError};
pub use nodes::{
    Kind, LineBreak, ListType, NodeId, NodeKind, PreviousLine, Role, TaskStatus, Tree,
    build::Fragment,
};
pub use output::{Writer, write, write_to_string};
pub use parsing::{parse, parse_string};
pub use query::Query;
