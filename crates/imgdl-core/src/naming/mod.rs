//! Filename policy: maps a title override (or a generated fallback), the
//! batch affixes and the source URL to a stored filename.
//!
//! A title whose sanitized form has no letter or digit (`""`, `"-"`, ...) is
//! treated like a missing title, so a stored file is never named only by
//! prefix/suffix/extension and dashes.

mod extension;
mod generated;
mod sanitize;

pub use extension::{extension_from_url, resolve_extension, DEFAULT_EXTENSION};
pub use generated::{generated_stem, FallbackNaming};
pub use sanitize::sanitize_title;

/// Base name and extension (with leading dot) of a stored image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileName {
    pub base: String,
    pub extension: String,
}

impl FileName {
    /// `<base><extension>`, the name written into the storage root.
    pub fn file_name(&self) -> String {
        format!("{}{}", self.base, self.extension)
    }
}

/// Batch-wide naming settings.
#[derive(Debug, Clone, Copy)]
pub struct NamingPolicy<'a> {
    pub prefix: &'a str,
    pub suffix: &'a str,
    pub fallback: FallbackNaming,
}

impl<'a> NamingPolicy<'a> {
    pub fn new(prefix: &'a str, suffix: &'a str) -> Self {
        Self {
            prefix,
            suffix,
            fallback: FallbackNaming::default(),
        }
    }

    pub fn with_fallback(mut self, fallback: FallbackNaming) -> Self {
        self.fallback = fallback;
        self
    }

    /// Derives the stored name. `content` is only read by content-hash
    /// fallback naming. Never fails.
    pub fn file_name(
        &self,
        title_override: Option<&str>,
        source_url: &str,
        target_extension: Option<&str>,
        content: &[u8],
    ) -> FileName {
        let stem = title_override
            .map(sanitize_title)
            .filter(|s| s.chars().any(|c| c.is_ascii_alphanumeric()))
            .unwrap_or_else(|| generated_stem(self.fallback, content));

        FileName {
            base: format!("{}{}{}", self.prefix, stem, self.suffix),
            extension: resolve_extension(source_url, target_extension),
        }
    }
}
