use std::collections::BTreeMap;
use std::path::Path;
use webroot::config::StaticFilesConfig;
use webroot::http::mime::{ContentTypes, content_type};

#[test]
fn test_content_type_html() {
    assert_eq!(content_type("index.html"), "text/html");
}

#[test]
fn test_content_type_css() {
    assert_eq!(content_type("styles.css"), "text/css");
}

#[test]
fn test_content_type_unknown_extension_uses_default() {
    assert_eq!(content_type("favicon.ico"), "application/octet-stream");
    assert_eq!(content_type("README"), "application/octet-stream");
}

#[test]
fn test_content_type_uses_final_segment_of_path() {
    assert_eq!(content_type("./www/test/page.html"), "text/html");
    assert_eq!(content_type(Path::new("/srv/www/site.v2/app.js")), "text/javascript");
}

#[test]
fn test_content_type_is_case_sensitive() {
    assert_eq!(content_type("INDEX.HTML"), "application/octet-stream");
}

#[test]
fn test_custom_entry_and_default() {
    let types = ContentTypes::builtin()
        .with_entry("ico", "image/x-icon")
        .with_default("text/html");

    assert_eq!(types.content_type("favicon.ico"), "image/x-icon");
    assert_eq!(types.content_type("notes.unknown"), "text/html");
    assert_eq!(types.default_type(), "text/html");
}

#[test]
fn test_from_config_merges_over_builtin() {
    let mut content_types = BTreeMap::new();
    content_types.insert(".md".to_string(), "text/markdown".to_string());
    content_types.insert("css".to_string(), "text/x-css".to_string());

    let cfg = StaticFilesConfig {
        content_types,
        ..StaticFilesConfig::default()
    };
    let types = ContentTypes::from_config(&cfg);

    assert_eq!(types.content_type("readme.md"), "text/markdown");
    assert_eq!(types.content_type("site.css"), "text/x-css");
    assert_eq!(types.content_type("index.html"), "text/html");
    assert_eq!(types.content_type("favicon.ico"), "application/octet-stream");
}
