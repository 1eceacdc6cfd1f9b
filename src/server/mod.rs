//! Listener lifecycle and the shared path map.

pub mod listener;
pub mod path_map;

pub use listener::Server;
pub use path_map::{PathMap, PathMapStore};
