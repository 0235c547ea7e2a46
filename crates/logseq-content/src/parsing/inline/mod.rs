//! # Inline Parsing
//!
//! Cursor-based inline parsing that builds nodes directly into the tree.
//!
//! Inline parsing runs after block parsing, once per paragraph and heading,
//! over the block's joined content lines.
//!
//! ## Modules
//!
//! - **`kinds`**: scanners that own the syntax of each inline construct
//! - **`cursor`**: `Cursor` for character-by-character parsing with position tracking
//! - **`parser`**: `parse_inline()` with the delimiter and bracket stacks
//!
//! ## Raw Zone Precedence
//!
//! Code spans take precedence: `` `[[not a link]]` `` parses as a single CodeSpan,
//! not as text containing a page link.

pub mod cursor;
pub mod kinds;
pub mod parser;

pub use parser::parse_inline;
