//! Extension derivation from the source URL path.

/// Used when neither a forced extension nor a URL extension is available.
pub const DEFAULT_EXTENSION: &str = ".jpg";

/// Returns the extension (with leading dot, case preserved) of the last path
/// segment of `url`. Query string and fragment are ignored.
///
/// Returns `None` for extension-less segments, dotfiles and a trailing dot.
pub fn extension_from_url(url: &str) -> Option<String> {
    let path = match url::Url::parse(url) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => url
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .to_string(),
    };
    let segment = path.rsplit('/').next()?;
    let dot = segment.rfind('.')?;
    if dot == 0 || dot + 1 == segment.len() {
        return None;
    }
    Some(segment[dot..].to_string())
}

/// Picks the stored extension: forced target, else URL extension, else `.jpg`.
pub fn resolve_extension(source_url: &str, target_extension: Option<&str>) -> String {
    target_extension
        .filter(|e| !e.is_empty())
        .map(str::to_string)
        .or_else(|| extension_from_url(source_url))
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string())
}
