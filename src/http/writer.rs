use anyhow::Context;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::http::response::{NOT_FOUND_BODY, Response};

/// Writes complete responses onto an output stream.
///
/// Each call emits one full response and flushes. Write errors are returned
/// with context so the caller can log them and drop the connection.
pub struct ResponseWriter<W> {
    output: W,
    written: u64,
}

impl<W> ResponseWriter<W>
where
    W: AsyncWrite + Unpin,
{
    pub fn new(output: W) -> Self {
        Self { output, written: 0 }
    }

    /// Sends a 200 head followed by exactly `content_length` bytes of `file`.
    ///
    /// Fails if `file` ends before `content_length` bytes; the body is never
    /// padded and nothing past `content_length` is sent.
    pub async fn write_found<R>(
        &mut self,
        file: &mut R,
        content_type: &str,
        content_length: u64,
    ) -> anyhow::Result<()>
    where
        R: AsyncRead + Unpin,
    {
        let head = Response::found(content_type, content_length).serialize();
        self.write_bytes(&head).await?;

        let mut body = file.take(content_length);
        let copied = tokio::io::copy(&mut body, &mut self.output)
            .await
            .context("failed to copy file to connection")?;
        self.written += copied;

        if copied != content_length {
            anyhow::bail!(
                "file ended after {} of {} declared bytes",
                copied,
                content_length
            );
        }

        self.flush().await
    }

    /// Sends the 404 response with its plain text body.
    pub async fn write_not_found(&mut self) -> anyhow::Result<()> {
        let head = Response::not_found().serialize();
        self.write_bytes(&head).await?;
        self.write_bytes(NOT_FOUND_BODY).await?;
        self.flush().await
    }

    /// Total bytes handed to the output so far.
    pub fn bytes_written(&self) -> u64 {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.output
    }

    async fn write_bytes(&mut self, bytes: &[u8]) -> anyhow::Result<()> {
        self.output
            .write_all(bytes)
            .await
            .context("failed to write response")?;
        self.written += bytes.len() as u64;
        Ok(())
    }

    async fn flush(&mut self) -> anyhow::Result<()> {
        self.output
            .flush()
            .await
            .context("failed to flush response")
    }
}
