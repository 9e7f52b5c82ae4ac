//! Request handler module
//!
//! Maps a parsed request onto the filesystem and decides the response.

pub mod fs;
pub mod resolver;

// Re-export main entry point
pub use fs::{FileSystem, LocalFs};
pub use resolver::resolve;
