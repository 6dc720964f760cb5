//! webroot - static file server
//!
//! Serves files below a single web root over a hand-written HTTP/1.1 subset.

pub mod config;
pub mod http;
pub mod server;
