//! MIME type detection based on file extensions.

use crate::config::{DEFAULT_CONTENT_TYPE, StaticFilesConfig};
use std::collections::HashMap;
use std::path::Path;

/// Entries every table starts from.
const BUILTIN: &[(&str, &str)] = &[
    ("html", "text/html"),
    ("css", "text/css"),
    ("js", "text/javascript"),
    ("json", "application/json"),
    ("txt", "text/plain"),
    ("svg", "image/svg+xml"),
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("wasm", "application/wasm"),
];

/// Immutable extension to MIME type table with a default for everything else.
///
/// Extensions are matched exactly as they appear in the path; `INDEX.HTML`
/// does not match `html`.
#[derive(Debug, Clone)]
pub struct ContentTypes {
    table: HashMap<String, String>,
    default: String,
}

impl ContentTypes {
    /// The built-in table with `application/octet-stream` as the default.
    pub fn builtin() -> Self {
        Self {
            table: BUILTIN
                .iter()
                .map(|(ext, mime)| (ext.to_string(), mime.to_string()))
                .collect(),
            default: DEFAULT_CONTENT_TYPE.to_string(),
        }
    }

    /// The built-in table with configured entries and default applied.
    pub fn from_config(cfg: &StaticFilesConfig) -> Self {
        let mut types = Self::builtin().with_default(cfg.default_content_type.clone());
        for (ext, mime) in &cfg.content_types {
            types = types.with_entry(ext.trim_start_matches('.'), mime.clone());
        }
        types
    }

    pub fn with_entry(mut self, ext: impl Into<String>, mime: impl Into<String>) -> Self {
        self.table.insert(ext.into(), mime.into());
        self
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = default.into();
        self
    }

    pub fn default_type(&self) -> &str {
        &self.default
    }

    /// Content type for `path`, from the text after the last `.` of its final
    /// segment.
    pub fn content_type(&self, path: impl AsRef<Path>) -> &str {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| self.table.get(ext))
            .map(String::as_str)
            .unwrap_or(self.default.as_str())
    }
}

impl Default for ContentTypes {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Content type for `path` using the built-in table.
pub fn content_type(path: impl AsRef<Path>) -> String {
    ContentTypes::builtin().content_type(path).to_string()
}
