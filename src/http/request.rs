use crate::http::parser::ParseError;
use std::fmt;

/// The first line of an HTTP request.
///
/// Only the request-target is ever used to pick a file. Method and version
/// are kept as given so they can be logged; they are not validated and every
/// method is served as a file fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLine {
    /// The HTTP method as sent (e.g. "GET")
    pub method: String,
    /// The request-target (e.g. "/index.html?x=1")
    pub target: String,
    /// HTTP version, empty when the client omitted it
    pub version: String,
}

impl RequestLine {
    /// Splits a request line on whitespace.
    ///
    /// At least two tokens are required; a missing version is tolerated.
    ///
    /// # Example
    ///
    /// ```
    /// # use webroot::http::request::RequestLine;
    /// let line = RequestLine::parse("GET /index.html HTTP/1.1").unwrap();
    /// assert_eq!(line.target, "/index.html");
    /// assert!(RequestLine::parse("GET").is_err());
    /// ```
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let mut parts = line.split_whitespace();

        let method = parts.next().ok_or(ParseError::MissingTarget)?;
        let target = parts.next().ok_or(ParseError::MissingTarget)?;
        let version = parts.next().unwrap_or("");

        Ok(Self {
            method: method.to_string(),
            target: target.to_string(),
            version: version.to_string(),
        })
    }
}

impl fmt::Display for RequestLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.version.is_empty() {
            write!(f, "{} {}", self.method, self.target)
        } else {
            write!(f, "{} {} {}", self.method, self.target, self.version)
        }
    }
}
