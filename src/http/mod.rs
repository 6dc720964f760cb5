//! HTTP protocol implementation.
//!
//! This module implements just enough HTTP/1.1 to serve static files: one
//! request line in, one response out, then the connection is closed.
//!
//! # Architecture
//!
//! The HTTP layer is organized into several submodules:
//!
//! - **`connection`**: Handles one accepted connection from request line to close
//! - **`parser`**: Finds and parses the request line in a byte buffer
//! - **`request`**: Request line representation
//! - **`resolver`**: Maps a request-target to a path confined to the web root
//! - **`mime`**: MIME type detection based on file extensions
//! - **`response`**: Response status line and headers
//! - **`writer`**: Writes 200 and 404 responses to the client
//!
//! # Connection Lifecycle
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← Wait for the request line
//!        └──────┬──────┘
//!               │ Line received (peer closed early → Closed)
//!               ▼
//!        ┌──────────────────┐
//!        │   Resolving      │ ← Target → path below web root,
//!        └──────┬───────────┘   directory → index.html
//!               │ Path ready (malformed → Closed)
//!               ▼
//!        ┌──────────────────┐
//!        │    Writing       │ ← 200 + file, or 404
//!        └──────┬───────────┘
//!               │ Response sent
//!               ▼
//!            Closed
//! ```
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use webroot::http::connection::{Connection, Site};
//! use tokio::net::TcpListener;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let listener = TcpListener::bind("127.0.0.1:2835").await?;
//!     let site = Arc::new(Site::new("./www"));
//!
//!     loop {
//!         let (socket, _addr) = listener.accept().await?;
//!         if let Err(e) = Connection::new(socket, site.clone()).run().await {
//!             eprintln!("Connection error: {}", e);
//!         }
//!     }
//! }
//! ```

pub mod connection;
pub mod mime;
pub mod parser;
pub mod request;
pub mod resolver;
pub mod response;
pub mod writer;
