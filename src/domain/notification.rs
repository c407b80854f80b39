// User-facing feedback attached to mutating operations
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub severity: Severity,
}

impl Notification {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        severity: Severity,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity,
        }
    }

    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(title, description, Severity::Info)
    }

    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(title, description, Severity::Success)
    }

    pub fn warning(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(title, description, Severity::Warning)
    }
}
