//! Display formatting state
//!
//! Font family, font size, and word wrap for one window, plus the language
//! boilerplate catalog the Language menu draws from. Formatting never touches
//! the document session; the two meet only in the shell that owns both.

use crate::error::{Error, Result};
use crate::templates::TemplateCatalog;
use log::debug;

/// Family applied to fresh windows.
pub const DEFAULT_FONT_FAMILY: &str = "Arial";

/// Point size applied to fresh windows.
pub const DEFAULT_FONT_SIZE: u32 = 22;

/// Families offered in the Format menu.
pub const FONT_FAMILIES: &[&str] = &[
    "Arial",
    "Times New Roman",
    "Algerian",
    "Bahnschrift",
    "Agency FB",
];

/// Preset sizes offered in the Format menu.
pub const FONT_SIZE_PRESETS: &[u32] = &[
    8, 10, 12, 14, 16, 18, 20, 22, 24, 26, 28, 30, 32, 34, 36, 38, 40,
];

/// Descriptor the shell applies to the buffer's rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontSpec {
    pub family: String,
    pub size: u32,
}

/// Display formatting for one document window.
#[derive(Debug)]
pub struct FormattingState {
    /// Free-form family label, applied verbatim to the renderer.
    font_family: String,
    /// Always positive.
    font_size: u32,
    /// Soft-wrap long lines. Per window, never shared.
    word_wrap: bool,
    /// Where language boilerplate is loaded from.
    templates: TemplateCatalog,
}

impl FormattingState {
    /// Fresh state with the default font, wrap off, and the default catalog.
    pub fn new() -> Self {
        Self::with_templates(TemplateCatalog::default())
    }

    pub fn with_templates(templates: TemplateCatalog) -> Self {
        Self {
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            font_size: DEFAULT_FONT_SIZE,
            word_wrap: false,
            templates,
        }
    }

    /// Rebuild from persisted values. A non-positive stored size falls back
    /// to the default so the invariant holds no matter what was on disk.
    pub fn restore(family: &str, size: u32, word_wrap: bool, templates: TemplateCatalog) -> Self {
        Self {
            font_family: family.to_string(),
            font_size: if size > 0 { size } else { DEFAULT_FONT_SIZE },
            word_wrap,
            templates,
        }
    }

    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    pub fn font_size(&self) -> u32 {
        self.font_size
    }

    pub fn word_wrap(&self) -> bool {
        self.word_wrap
    }

    /// Current descriptor for the renderer.
    pub fn font_spec(&self) -> FontSpec {
        FontSpec {
            family: self.font_family.clone(),
            size: self.font_size,
        }
    }

    /// Replace the font family. The label is free-form, so this cannot fail.
    pub fn set_font(&mut self, family: &str) -> FontSpec {
        self.font_family = family.to_string();
        debug!("font family set to '{}'", family);
        self.font_spec()
    }

    /// Parse and apply a font size typed by the user.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSize`] for non-numeric or non-positive input;
    /// the current size stays as it was.
    pub fn set_font_size(&mut self, candidate: &str) -> Result<FontSpec> {
        let size = match candidate.trim().parse::<u32>() {
            Ok(n) if n > 0 => n,
            _ => {
                debug!("rejected font size input '{}'", candidate);
                return Err(Error::InvalidSize {
                    input: candidate.to_string(),
                });
            }
        };
        self.font_size = size;
        debug!("font size set to {}", size);
        Ok(self.font_spec())
    }

    /// Flip word wrap and return the new value.
    pub fn toggle_word_wrap(&mut self) -> bool {
        self.word_wrap = !self.word_wrap;
        debug!("word wrap toggled {}", self.wrap_label());
        self.word_wrap
    }

    /// Human-readable state of the wrap flag, for menu text.
    pub fn wrap_label(&self) -> &'static str {
        if self.word_wrap {
            "On"
        } else {
            "Off"
        }
    }

    /// Fetch the boilerplate for a language tag; the caller replaces the
    /// buffer wholesale on success and leaves it alone on failure.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TemplateNotFound`] when no resource exists for `tag`.
    pub fn load_template(&self, tag: &str) -> Result<String> {
        self.templates.load(tag)
    }
}

impl Default for FormattingState {
    fn default() -> Self {
        Self::new()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
