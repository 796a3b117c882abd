use serde::{Deserialize, Serialize};

/// Severity of a flash notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Info,
    Warning,
    Error,
}

impl FlashLevel {
    /// CSS class suffix for the level.
    pub fn as_str(&self) -> &'static str {
        match self {
            FlashLevel::Success => "success",
            FlashLevel::Info => "info",
            FlashLevel::Warning => "warning",
            FlashLevel::Error => "error",
        }
    }
}

/// A one-shot notice shown on the next rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub level: FlashLevel,
    pub title: String,
    pub message: String,
}

impl Flash {
    pub fn new(level: FlashLevel, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            title: title.into(),
            message: message.into(),
        }
    }

    /// A success notice titled "Status".
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(FlashLevel::Success, "Status", message)
    }

    /// An error notice titled "Status".
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(FlashLevel::Error, "Status", message)
    }
}
