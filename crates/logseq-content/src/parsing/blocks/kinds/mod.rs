pub mod begin_end;
pub mod block_quote;
pub mod code_fence;
pub mod heading;
pub mod html_block;
pub mod list_marker;
pub mod logbook;
pub mod paragraph;
pub mod thematic_break;

pub use begin_end::BeginEnd;
pub use block_quote::BlockQuote;
pub use code_fence::{CodeFence, Fence};
pub use heading::AtxHeading;
pub use html_block::HtmlBlock;
pub use list_marker::ListMarker;
pub use logbook::Logbook;
pub use paragraph::{IndentedCode, Paragraph};
pub use thematic_break::ThematicBreak;
