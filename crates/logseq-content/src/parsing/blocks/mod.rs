//! # Block Parsing
//!
//! Line-oriented block structure, in the container stack model of
//! CommonMark.
//!
//! ## Modules
//!
//! - **`line`**: `Line`, a column-aware cursor over one physical line
//! - **`kinds`**: block-specific types that own their markers (fences,
//!   quotes, list markers, logbooks, `#+BEGIN_` regions)
//! - **`builder`**: `BlockBuilder`, the open-block stack that turns lines
//!   into tree nodes
//!
//! ## Key Invariants
//!
//! - Nesting depth is unbounded (lists in blockquotes in lists, etc.)
//! - Fenced code, HTML blocks, logbooks and `#+BEGIN_` regions are raw
//!   zones: no block or inline parsing inside
//! - Each block records whether a blank line separated it from its previous
//!   sibling

pub mod builder;
pub mod kinds;
pub mod line;

pub use builder::BlockBuilder;
pub use line::Line;
