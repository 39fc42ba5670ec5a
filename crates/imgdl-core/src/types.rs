//! Records flowing through the pipeline: inputs, batch options and outcomes.

use serde::{Deserialize, Serialize};

/// One unit of work: a URL plus an optional title used for naming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputRecord {
    pub url: String,
    pub title_override: Option<String>,
}

impl InputRecord {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title_override: None,
        }
    }

    pub fn with_title(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title_override: Some(title.into()),
        }
    }
}

/// Batch-wide flags controlling re-encoding and naming affixes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformOptions {
    pub convert_to_webp: bool,
    pub optimize: bool,
    #[serde(default)]
    pub prefix: String,
    #[serde(default)]
    pub suffix: String,
}

/// Per-item result. Serializes as `{"status": "success", "url", "file"}` or
/// `{"status": "error", "url", "error"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum OutcomeRecord {
    Success { url: String, file: String },
    #[serde(rename = "error")]
    Failure { url: String, error: String },
}

impl OutcomeRecord {
    pub fn success(url: impl Into<String>, file: impl Into<String>) -> Self {
        OutcomeRecord::Success {
            url: url.into(),
            file: file.into(),
        }
    }

    pub fn failure(url: impl Into<String>, error: impl Into<String>) -> Self {
        OutcomeRecord::Failure {
            url: url.into(),
            error: error.into(),
        }
    }

    pub fn url(&self) -> &str {
        match self {
            OutcomeRecord::Success { url, .. } | OutcomeRecord::Failure { url, .. } => url,
        }
    }

    pub fn file(&self) -> Option<&str> {
        match self {
            OutcomeRecord::Success { file, .. } => Some(file),
            OutcomeRecord::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            OutcomeRecord::Success { .. } => None,
            OutcomeRecord::Failure { error, .. } => Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, OutcomeRecord::Success { .. })
    }
}

/// Sent on the optional progress channel each time an item settles.
#[derive(Debug, Clone)]
pub struct BatchProgress {
    /// Input position of the item that just settled.
    pub index: usize,
    /// Number of items settled so far (including this one).
    pub settled: usize,
    pub total: usize,
    pub outcome: OutcomeRecord,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_serializes_without_error_field() {
        let o = OutcomeRecord::success("https://x/a.png", "a.png");
        let v = serde_json::to_value(&o).unwrap();
        assert_eq!(v["status"], "success");
        assert_eq!(v["url"], "https://x/a.png");
        assert_eq!(v["file"], "a.png");
        assert!(v.get("error").is_none());
    }

    #[test]
    fn failure_serializes_as_error_status() {
        let o = OutcomeRecord::failure("https://x/a.png", "HTTP 404");
        let v = serde_json::to_value(&o).unwrap();
        assert_eq!(v["status"], "error");
        assert_eq!(v["error"], "HTTP 404");
        assert!(v.get("file").is_none());
    }

    #[test]
    fn outcome_json_roundtrip() {
        let json = r#"{"status":"error","url":"u","error":"boom"}"#;
        let o: OutcomeRecord = serde_json::from_str(json).unwrap();
        assert_eq!(o, OutcomeRecord::failure("u", "boom"));
        assert!(!o.is_success());
        assert_eq!(o.file(), None);
    }

    #[test]
    fn transform_options_affixes_default_to_empty() {
        let o: TransformOptions =
            serde_json::from_str(r#"{"convert_to_webp":true,"optimize":false}"#).unwrap();
        assert!(o.convert_to_webp);
        assert_eq!(o.prefix, "");
        assert_eq!(o.suffix, "");
    }
}
