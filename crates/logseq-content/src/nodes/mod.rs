//! Typed document tree.
//!
//! Nodes live in a [`Tree`] arena and are addressed by [`NodeId`]. Every
//! node carries a [`NodeKind`] payload; structure is held by the tree so
//! that edits never fight the borrow checker over parent links.
//!
//! Each kind belongs to a [`Role`]: inline, block, property or logbook
//! entry. Containers only accept children whose kind passes their gate
//! (see [`Kind::accepts`]); rejected edits are no-ops.

pub mod build;
pub mod kind;
pub mod list;
pub mod select;
pub mod task;

mod block;
mod text;
mod tree;

pub use block::ID_PROPERTY;
pub use kind::{Kind, LineBreak, ListType, NodeKind, PreviousLine, Role};
pub use task::TaskStatus;
pub use tree::{Children, Descendants, NodeId, Tree};
