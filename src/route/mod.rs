//! Route registration and dispatch.

mod group;
mod pattern;
mod router;
mod trie;

pub use group::{Route, RouterGroup};
pub use pattern::{Pattern, Segment};
pub use router::Router;
