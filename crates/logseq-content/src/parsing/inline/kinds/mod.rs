//! # Inline Kinds
//!
//! Inline-specific types that own their syntax delimiters and know how to
//! scan one construct at the start of a string.
//!
//! ## Types
//!
//! - **`CodeSpan`**: backtick runs; a raw zone that suppresses other parsing
//! - **`Macro`**: `{{name args}}`, specialised into query, embed and cloze
//! - **`BlockRef`**: `((id))`
//! - **`PageLink`**: `[[page]]`
//! - **`Hashtag`**: `#tag` and `#[[tag with spaces]]`
//! - **`Link`**: `[text](dest 'title')` tails for links and images
//! - **`AutoLink`**: `<url>`, `<email>` and bare URLs
//! - **`RawHtml`**: inline tags, comments and friends
//! - **`Escape`**: backslash escapes
//!
//! Scanners never look past the text they are given and never fail loudly:
//! `None` means "not this construct here", and the parser falls back to
//! literal text.

pub mod autolink;
pub mod block_ref;
pub mod code_span;
pub mod escape;
pub mod hashtag;
pub mod link;
pub mod macros;
pub mod page_link;
pub mod raw_html;

pub use autolink::{AutoLink, bare_url_extent};
pub use block_ref::BlockRef;
pub use code_span::CodeSpan;
pub use escape::Escape;
pub use hashtag::Hashtag;
pub use link::{Link, LinkTail};
pub use macros::{Macro, MacroCall};
pub use page_link::PageLink;
pub use raw_html::RawHtml;
