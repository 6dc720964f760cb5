use bytes::BytesMut;
use std::net::SocketAddr;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::watch;
use tokio::time::timeout;

use crate::config::Config;
use crate::http::mime::ContentTypes;
use crate::http::parser::{ParseError, parse_partial_line, parse_request_line};
use crate::http::request::RequestLine;
use crate::http::resolver::resolve_target;
use crate::http::response::StatusCode;
use crate::http::writer::ResponseWriter;

/// Read-only settings shared by every connection.
#[derive(Debug, Clone)]
pub struct Site {
    /// Directory below which every served file resides
    pub root: PathBuf,
    /// Appended when the resolved path is a directory
    pub index_file: String,
    pub content_types: ContentTypes,
    /// Limit on waiting for the request line; `None` waits forever
    pub read_timeout: Option<Duration>,
    /// How long to drain unread input after the response
    pub linger: Duration,
}

impl Site {
    /// Default settings serving `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::from_config(&Config::default())
        }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self {
            root: cfg.static_files.root.clone(),
            index_file: cfg.static_files.index_file.clone(),
            content_types: ContentTypes::from_config(&cfg.static_files),
            read_timeout: cfg.server.read_timeout(),
            linger: cfg.server.linger(),
        }
    }

    /// Swaps a directory path for its index file. Only one level deep.
    pub async fn index_fallback(&self, path: PathBuf) -> PathBuf {
        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_dir() => path.join(&self.index_file),
            _ => path,
        }
    }
}

/// How a connection ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A full response was written
    Served {
        status: StatusCode,
        path: PathBuf,
        bytes: u64,
    },
    /// The request line was unusable; nothing was written
    Rejected(ParseError),
    /// The peer sent nothing, timed out, or the server shut down before a
    /// request line arrived; nothing was written
    Aborted,
}

enum Incoming {
    Line(RequestLine),
    Malformed(ParseError),
    Closed,
    TimedOut,
}

/// One request/response cycle on an accepted connection.
///
/// The connection reads a single request line, answers it and closes. It is
/// never reused for a second request.
pub struct Connection {
    stream: TcpStream,
    buffer: BytesMut,
    site: Arc<Site>,
    peer: Option<SocketAddr>,
    shutdown: Option<watch::Receiver<bool>>,
}

impl Connection {
    pub fn new(stream: TcpStream, site: Arc<Site>) -> Self {
        let peer = stream.peer_addr().ok();
        Self {
            stream,
            buffer: BytesMut::with_capacity(1024),
            site,
            peer,
            shutdown: None,
        }
    }

    /// Gives up waiting for the request line once `shutdown` becomes true.
    /// A response already being written always completes.
    pub fn with_shutdown(mut self, shutdown: watch::Receiver<bool>) -> Self {
        self.shutdown = Some(shutdown);
        self
    }

    /// Serves the request and closes the connection on every path, including
    /// errors.
    pub async fn run(mut self) -> anyhow::Result<Outcome> {
        let result = self.serve().await;
        self.close().await;
        result
    }

    async fn serve(&mut self) -> anyhow::Result<Outcome> {
        let mut shutdown = self.shutdown.take();
        let incoming = tokio::select! {
            incoming = self.read_with_timeout() => incoming?,
            _ = shutdown_requested(&mut shutdown) => {
                tracing::debug!(peer = ?self.peer, "Shutdown before request line");
                return Ok(Outcome::Aborted);
            }
        };

        let line = match incoming {
            Incoming::Line(line) => line,
            Incoming::Malformed(e) => {
                tracing::warn!(peer = ?self.peer, error = %e, "Malformed request");
                return Ok(Outcome::Rejected(e));
            }
            Incoming::Closed => {
                tracing::debug!(peer = ?self.peer, "Connection closed before request");
                return Ok(Outcome::Aborted);
            }
            Incoming::TimedOut => {
                tracing::warn!(peer = ?self.peer, "Timed out waiting for request line");
                return Ok(Outcome::Aborted);
            }
        };

        tracing::info!(peer = ?self.peer, request = %line, "* {}", line);

        let path = match resolve_target(&line.target, &self.site.root) {
            Ok(path) => path,
            Err(e) => {
                tracing::warn!(peer = ?self.peer, error = %e, request_target = %line.target, "Unresolvable request");
                return Ok(Outcome::Rejected(e));
            }
        };
        let path = self.site.index_fallback(path).await;

        let mut writer = ResponseWriter::new(&mut self.stream);
        let opened = match open_regular_file(&path).await {
            Ok(opened) => opened,
            Err(e) => {
                tracing::warn!(peer = ?self.peer, error = %e, path = %path.display(), "Cannot open file");
                None
            }
        };
        let status = match opened {
            Some((mut file, len)) => {
                let content_type = self.site.content_types.content_type(&path);
                writer.write_found(&mut file, content_type, len).await?;
                StatusCode::Ok
            }
            None => {
                writer.write_not_found().await?;
                StatusCode::NotFound
            }
        };

        let bytes = writer.bytes_written();
        tracing::info!(
            peer = ?self.peer,
            status = status.as_u16(),
            bytes,
            path = %path.display(),
            "Response sent"
        );

        Ok(Outcome::Served {
            status,
            path,
            bytes,
        })
    }

    async fn read_with_timeout(&mut self) -> anyhow::Result<Incoming> {
        match self.site.read_timeout {
            Some(limit) => match timeout(limit, self.read_request_line()).await {
                Ok(incoming) => incoming,
                Err(_) => Ok(Incoming::TimedOut),
            },
            None => self.read_request_line().await,
        }
    }

    async fn read_request_line(&mut self) -> anyhow::Result<Incoming> {
        loop {
            match parse_request_line(&self.buffer) {
                Ok((line, _consumed)) => return Ok(Incoming::Line(line)),
                Err(ParseError::Incomplete) => {
                    // Need more data → fall through to read
                }
                Err(e) => return Ok(Incoming::Malformed(e)),
            }

            self.buffer.reserve(1024);
            let n = self.stream.read_buf(&mut self.buffer).await?;

            if n == 0 {
                // Peer closed; use whatever arrived
                if self.buffer.is_empty() {
                    return Ok(Incoming::Closed);
                }
                return Ok(match parse_partial_line(&self.buffer) {
                    Ok(line) => Incoming::Line(line),
                    Err(e) => Incoming::Malformed(e),
                });
            }
        }
    }

    /// Sends FIN, then discards unread input until the peer closes or the
    /// linger period ends. Unread input at close turns the FIN into a reset.
    async fn close(&mut self) {
        if let Err(e) = self.stream.shutdown().await {
            tracing::debug!(peer = ?self.peer, error = %e, "Shutdown failed");
            return;
        }
        if self.site.linger.is_zero() {
            return;
        }

        let stream = &mut self.stream;
        let drain = async {
            let mut scratch = [0u8; 1024];
            while let Ok(n) = stream.read(&mut scratch).await {
                if n == 0 {
                    break;
                }
            }
        };
        let _ = timeout(self.site.linger, drain).await;
    }
}

/// Resolves once `shutdown` is true or its sender is gone; never without one.
async fn shutdown_requested(shutdown: &mut Option<watch::Receiver<bool>>) {
    match shutdown {
        Some(rx) => loop {
            if *rx.borrow_and_update() {
                return;
            }
            if rx.changed().await.is_err() {
                return;
            }
        },
        None => std::future::pending::<()>().await,
    }
}

/// Opens `path` if it names a regular file, returning the handle and its size.
///
/// A missing path is `Ok(None)`; any other failure is returned so it can be
/// logged before answering 404.
pub async fn open_regular_file(path: &Path) -> io::Result<Option<(File, u64)>> {
    let meta = match tokio::fs::metadata(path).await {
        Ok(meta) => meta,
        Err(e) if is_missing(&e) => return Ok(None),
        Err(e) => return Err(e),
    };
    if !meta.is_file() {
        return Ok(None);
    }

    let file = File::open(path).await?;
    let meta = file.metadata().await?;
    if !meta.is_file() {
        return Ok(None);
    }
    Ok(Some((file, meta.len())))
}

fn is_missing(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
    )
}
