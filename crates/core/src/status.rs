//! Status line shown above a form

/// Shown when a request never reached the server
pub const NETWORK_ERROR: &str = "Network error. Please check your connection and try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    Error,
}

impl StatusKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusKind::Info => "info",
            StatusKind::Success => "success",
            StatusKind::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
}

impl StatusMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Info,
            text: text.into(),
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Error,
            text: text.into(),
        }
    }

    /// CSS classes of the status element
    pub fn class_name(&self) -> String {
        format!("status-message status-{}", self.kind.as_str())
    }

    pub fn is_error(&self) -> bool {
        self.kind == StatusKind::Error
    }
}
