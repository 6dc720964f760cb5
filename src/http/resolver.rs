//! Request-target to filesystem path resolution.
//!
//! Resolution is purely lexical: it never touches the filesystem. The result
//! always starts with the web root and can never name anything above it,
//! whatever sequence of `.`, `..`, empty or percent-encoded segments the
//! client sends.

use crate::http::parser::ParseError;
use crate::http::request::RequestLine;
use percent_encoding::percent_decode_str;
use std::path::{Component, Path, PathBuf};
use url::Url;

/// Resolves the target of a raw request line below `web_root`.
///
/// # Example
///
/// ```
/// # use webroot::http::resolver::resolve;
/// # use std::path::Path;
/// let path = resolve("GET /../../file.html HTTP/1.1", Path::new("./www")).unwrap();
/// assert_eq!(path, Path::new("./www/file.html"));
/// ```
pub fn resolve(request_line: &str, web_root: &Path) -> Result<PathBuf, ParseError> {
    let line = RequestLine::parse(request_line)?;
    resolve_target(&line.target, web_root)
}

/// Resolves a bare request-target (`/dir/file.html?q=1`) below `web_root`.
pub fn resolve_target(target: &str, web_root: &Path) -> Result<PathBuf, ParseError> {
    let raw_path = target_path(target)?;
    let decoded = percent_decode_str(&raw_path)
        .decode_utf8()
        .map_err(|_| ParseError::InvalidEncoding)?;

    let mut clean: Vec<&str> = Vec::new();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                clean.pop();
            }
            other if is_plain_segment(other) => clean.push(other),
            _ => {}
        }
    }

    let mut path = web_root.to_path_buf();
    path.extend(clean);
    Ok(path)
}

/// Path component of the target, still percent-encoded.
fn target_path(target: &str) -> Result<String, ParseError> {
    if target.starts_with('/') {
        let end = target.find(['?', '#']).unwrap_or(target.len());
        return Ok(target[..end].to_string());
    }

    // absolute-form, asterisk-form and anything else relative to "/"
    let base = Url::parse("http://localhost/").map_err(|_| ParseError::InvalidTarget)?;
    let url = Url::options()
        .base_url(Some(&base))
        .parse(target)
        .map_err(|_| ParseError::InvalidTarget)?;
    Ok(url.path().to_string())
}

/// True when the platform reads `segment` as exactly one ordinary path
/// component. Rejects things like drive prefixes on Windows.
fn is_plain_segment(segment: &str) -> bool {
    let mut components = Path::new(segment).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}
