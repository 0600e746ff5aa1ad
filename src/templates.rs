//! Language boilerplate templates
//!
//! One plain-text resource per language tag, looked up as `<root>/<tag>.txt`
//! under the catalog's root directory. A missing resource is a recoverable,
//! typed failure so the caller can leave the buffer alone and show a warning.

use crate::error::{Error, Result};
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// Language menu entries: human label and catalog tag.
pub const BUILTIN_TEMPLATES: &[(&str, &str)] = &[
    ("Java", "java"),
    ("C", "c"),
    ("C++", "cpp"),
    ("HTML", "html"),
];

/// Directory searched when no override is configured.
pub const DEFAULT_TEMPLATE_DIR: &str = "templates";

/// Looks up boilerplate text by language tag.
#[derive(Debug, Clone)]
pub struct TemplateCatalog {
    root: PathBuf,
}

impl TemplateCatalog {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resource path for a language tag.
    pub fn template_path(&self, tag: &str) -> PathBuf {
        self.root.join(format!("{}.txt", tag))
    }

    /// Load the boilerplate for `tag`.
    ///
    /// The resource is read line by line and every line is re-terminated
    /// with a single `\n`, so CRLF input normalizes and non-empty boilerplate
    /// always ends in a newline. An empty resource loads as the empty string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TemplateNotFound`] when the resource is missing or
    /// unreadable.
    pub fn load(&self, tag: &str) -> Result<String> {
        let path = self.template_path(tag);
        let raw = fs::read_to_string(&path).map_err(|source| {
            warn!("template '{}' unavailable: {}", tag, source);
            Error::TemplateNotFound {
                tag: tag.to_string(),
                path: path.clone(),
            }
        })?;

        let mut text = String::with_capacity(raw.len() + 1);
        for line in raw.lines() {
            text.push_str(line);
            text.push('\n');
        }
        debug!("loaded template '{}' from {}", tag, path.display());
        Ok(text)
    }
}

impl Default for TemplateCatalog {
    fn default() -> Self {
        Self::new(DEFAULT_TEMPLATE_DIR)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn catalog_with(tag: &str, content: &str) -> (TempDir, TemplateCatalog) {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(format!("{}.txt", tag)), content).unwrap();
        let catalog = TemplateCatalog::new(dir.path());
        (dir, catalog)
    }

    #[test]
    fn test_template_path_naming() {
        let catalog = TemplateCatalog::new("/res");
        assert_eq!(catalog.template_path("cpp"), PathBuf::from("/res/cpp.txt"));
    }

    #[test]
    fn test_load_terminates_every_line_with_newline() {
        let (_dir, catalog) = catalog_with("java", "class Main {\n}");
        assert_eq!(catalog.load("java").unwrap(), "class Main {\n}\n");
    }

    #[test]
    fn test_load_normalizes_crlf() {
        let (_dir, catalog) = catalog_with("html", "<html>\r\n</html>\r\n");
        assert_eq!(catalog.load("html").unwrap(), "<html>\n</html>\n");
    }

    #[test]
    fn test_load_empty_resource_is_empty_string() {
        let (_dir, catalog) = catalog_with("c", "");
        assert_eq!(catalog.load("c").unwrap(), "");
    }

    #[test]
    fn test_load_missing_template_reports_not_found() {
        let dir = TempDir::new().unwrap();
        let catalog = TemplateCatalog::new(dir.path());
        let err = catalog.load("java").unwrap_err();
        assert!(matches!(
            err,
            Error::TemplateNotFound { tag, path }
                if tag == "java" && path.ends_with("java.txt")
        ));
    }

    #[test]
    fn test_builtin_table_has_unique_tags() {
        let mut tags: Vec<&str> = BUILTIN_TEMPLATES.iter().map(|(_, tag)| *tag).collect();
        tags.sort_unstable();
        tags.dedup();
        assert_eq!(tags.len(), BUILTIN_TEMPLATES.len());
    }
}
