//! Fixtures shared by the integration tests

#![allow(dead_code)]

use std::path::{Path, PathBuf};

/// A web root under the temp dir, removed again when dropped.
pub struct WebRoot {
    path: PathBuf,
}

impl WebRoot {
    /// Creates a fresh web root with the files the tests expect.
    pub fn new(name: &str) -> Self {
        let path = std::env::temp_dir().join(format!("webroot-{}-{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&path);

        std::fs::create_dir_all(path.join("test/empty")).unwrap();
        std::fs::write(path.join("index.html"), "root index\n").unwrap();
        std::fs::write(path.join("test/index.html"), "index.html\n").unwrap();
        std::fs::write(path.join("test/page.html"), "page.html\n").unwrap();
        std::fs::write(path.join("test/styles.css"), "body {}\n").unwrap();
        std::fs::write(
            path.join("test/blob.bin"),
            (0..=255u8).cycle().take(70_000).collect::<Vec<u8>>(),
        )
        .unwrap();
        std::fs::write(path.join("test/my page.html"), "spaced\n").unwrap();

        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn join(&self, rel: &str) -> PathBuf {
        self.path.join(rel)
    }
}

impl Drop for WebRoot {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}
