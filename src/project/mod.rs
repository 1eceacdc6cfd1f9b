//! Collaborators that describe the project being previewed: the files it
//! contains, how to read them, and when they change.

pub mod file;
pub mod scan;
pub mod watch;

pub use file::{DiskFileReader, FileContents, FileEntry, FileReader, MemoryFileReader};
pub use scan::scan_directory;
pub use watch::DirectoryWatcher;
