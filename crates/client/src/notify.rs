//! Transient user-facing notifications.

use crate::api::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
}

/// One message shown once after an action completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub severity: Severity,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }

    /// Error notification for a failed call.
    ///
    /// The backend's own message is shown verbatim when it sent one;
    /// otherwise `fallback` is.
    pub fn from_api_error(err: &ApiError, fallback: &str) -> Self {
        match err.backend_detail() {
            Some(detail) => Self::error(detail),
            None => Self::error(fallback),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl core::fmt::Display for Notification {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.severity {
            Severity::Success => write!(f, "[ok] {}", self.message),
            Severity::Error => write!(f, "[error] {}", self.message),
        }
    }
}
