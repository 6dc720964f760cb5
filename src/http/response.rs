use bytes::{BufMut, Bytes, BytesMut};

const HTTP_VERSION: &str = "HTTP/1.1";

/// Body sent with every 404.
pub const NOT_FOUND_BODY: &[u8] = b"File not found\n";

/// HTTP status codes the server sends.
///
/// - `Ok` (200): the file follows
/// - `NotFound` (404): no regular file at the resolved path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 404 Not Found
    NotFound,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use webroot::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::NotFound.as_u16(), 404);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::NotFound => 404,
        }
    }

    /// Returns the standard HTTP reason phrase for this status code.
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::NotFound => "Not Found",
        }
    }
}

/// Status line and headers of a response.
///
/// The body is streamed separately by the writer, so only its length is
/// recorded here. Headers keep the order they were added in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// The HTTP status code
    pub status: StatusCode,
    /// Headers in wire order
    pub headers: Vec<(String, String)>,
}

/// Builder for constructing response heads in a fluent style.
///
/// # Example
///
/// ```
/// # use webroot::http::response::{ResponseBuilder, StatusCode};
/// let head = ResponseBuilder::new(StatusCode::Ok)
///     .header("Content-Type", "text/css")
///     .content_length(12)
///     .build();
/// assert_eq!(head.header("Connection"), Some("close"));
/// ```
pub struct ResponseBuilder {
    status: StatusCode,
    headers: Vec<(String, String)>,
    content_length: u64,
}

impl ResponseBuilder {
    /// Creates a new response builder with the specified status code.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Vec::new(),
            content_length: 0,
        }
    }

    /// Adds or replaces a header, keeping its original position on replace.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();
        match self
            .headers
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(&key))
        {
            Some(existing) => existing.1 = value,
            None => self.headers.push((key, value)),
        }
        self
    }

    /// Byte length of the body that will follow the head.
    pub fn content_length(mut self, len: u64) -> Self {
        self.content_length = len;
        self
    }

    /// Builds the head.
    ///
    /// Appends `Content-Length` and `Connection: close` after the custom
    /// headers; the server never keeps a connection open.
    pub fn build(self) -> Response {
        let content_length = self.content_length;
        let builder = self
            .header("Content-Length", content_length.to_string())
            .header("Connection", "close");

        Response {
            status: builder.status,
            headers: builder.headers,
        }
    }
}

impl Response {
    /// Head of a 200 response carrying a file.
    pub fn found(content_type: &str, content_length: u64) -> Self {
        ResponseBuilder::new(StatusCode::Ok)
            .header("Content-Type", content_type)
            .content_length(content_length)
            .build()
    }

    /// Head of the 404 response; its body is `NOT_FOUND_BODY`.
    pub fn not_found() -> Self {
        ResponseBuilder::new(StatusCode::NotFound)
            .header("Content-Type", "text/plain")
            .content_length(NOT_FOUND_BODY.len() as u64)
            .build()
    }

    /// Retrieves a header value by name, ignoring case.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// Status line, headers and the blank separator line.
    pub fn serialize(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(128);

        buf.put_slice(HTTP_VERSION.as_bytes());
        buf.put_u8(b' ');
        buf.put_slice(self.status.as_u16().to_string().as_bytes());
        buf.put_u8(b' ');
        buf.put_slice(self.status.reason_phrase().as_bytes());
        buf.put_slice(b"\r\n");

        for (k, v) in &self.headers {
            buf.put_slice(k.as_bytes());
            buf.put_slice(b": ");
            buf.put_slice(v.as_bytes());
            buf.put_slice(b"\r\n");
        }

        buf.put_slice(b"\r\n");
        buf.freeze()
    }
}
