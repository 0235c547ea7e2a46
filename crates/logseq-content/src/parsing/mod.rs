//! # Parsing
//!
//! Turns page source into an outline [`Tree`].
//!
//! Source goes through four passes:
//!
//! 1. **Blocks** (`blocks`): lines are fed to a [`BlockBuilder`] that keeps
//!    the stack of open containers and produces a CommonMark block tree.
//! 2. **Inline** (`inline`): paragraph and heading text is parsed into
//!    inline nodes, including page links, tags, block refs and macros.
//! 3. **Properties** (`properties`): `name:: value` lines are lifted out of
//!    paragraphs.
//! 4. **Outline** (`outline`): `-` lists are reshaped into nested blocks.
//!
//! Parsing never fails on odd syntax; anything not recognised stays text.

pub mod blocks;
pub mod inline;
pub mod outline;
pub mod properties;
pub mod rope;

use xi_rope::Rope;

use crate::{error::ParseError, nodes::Tree};
use blocks::BlockBuilder;
use rope::lines_with_spans;

pub use inline::kinds::bare_url_extent;

/// Parses UTF-8 page source.
pub fn parse(src: &[u8]) -> Result<Tree, ParseError> {
    parse_string(std::str::from_utf8(src)?)
}

pub fn parse_string(src: &str) -> Result<Tree, ParseError> {
    let rope = Rope::from(src);
    let mut builder = BlockBuilder::new();
    for line in lines_with_spans(&rope) {
        builder.push(&line.text);
    }

    let mut tree = builder.finish();
    let root = tree.root();
    properties::extract(&mut tree, root);
    outline::reshape(&mut tree)?;
    Ok(tree)
}
