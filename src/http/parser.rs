use crate::http::request::RequestLine;
use std::fmt;

/// Longest request line accepted before the request is rejected
pub const MAX_REQUEST_LINE: usize = 8 * 1024;

/// Reasons a request cannot be turned into a file path.
///
/// Every variant except `Incomplete` means the request is malformed and the
/// connection is dropped without a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// No line terminator yet; read more
    Incomplete,
    /// The line exceeded `MAX_REQUEST_LINE`
    LineTooLong,
    /// Fewer than two tokens on the request line
    MissingTarget,
    /// The request-target is not a usable URI
    InvalidTarget,
    /// The percent-decoded path is not UTF-8
    InvalidEncoding,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            ParseError::Incomplete => "incomplete request line",
            ParseError::LineTooLong => "request line too long",
            ParseError::MissingTarget => "request line has no request-target",
            ParseError::InvalidTarget => "request-target is not a valid URI",
            ParseError::InvalidEncoding => "request path is not valid UTF-8",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for ParseError {}

/// Parses the request line at the start of `buf`.
///
/// Returns the line and the number of bytes it occupied including the
/// terminator. Returns `Incomplete` until a `\n` has arrived.
pub fn parse_request_line(buf: &[u8]) -> Result<(RequestLine, usize), ParseError> {
    let end = match find_line_end(buf) {
        Some(end) => end,
        None if buf.len() > MAX_REQUEST_LINE => return Err(ParseError::LineTooLong),
        None => return Err(ParseError::Incomplete),
    };
    if end > MAX_REQUEST_LINE {
        return Err(ParseError::LineTooLong);
    }

    let request = parse_line_bytes(&buf[..end])?;
    Ok((request, end + 1))
}

/// Parses a line that ended without a terminator because the peer closed.
pub fn parse_partial_line(buf: &[u8]) -> Result<RequestLine, ParseError> {
    if buf.len() > MAX_REQUEST_LINE {
        return Err(ParseError::LineTooLong);
    }
    parse_line_bytes(buf)
}

fn parse_line_bytes(line: &[u8]) -> Result<RequestLine, ParseError> {
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    let text = std::str::from_utf8(line).map_err(|_| ParseError::InvalidTarget)?;
    RequestLine::parse(text)
}

fn find_line_end(buf: &[u8]) -> Option<usize> {
    buf.iter().position(|&b| b == b'\n')
}
