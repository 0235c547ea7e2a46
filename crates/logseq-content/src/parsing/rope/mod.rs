//! Source text held as a rope, split into lines with byte spans.

pub mod lines;
pub mod span;

pub use lines::{LineRef, lines_with_spans};
pub use span::Span;
