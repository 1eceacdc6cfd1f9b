//! Webviewer - local project preview server
//!
//! Serves the files of a project directory over a minimal HTTP/1.0 subset on
//! 127.0.0.1, so a browser can preview a locally built site.

pub mod config;
pub mod http;
pub mod net;
pub mod project;
pub mod server;
