//! Client-side form validation. A form that fails here never reaches the
//! network.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("{field} {reason}")]
    Invalid { field: &'static str, reason: String },

    /// An action needs a prior selection (category, candidate, jury).
    #[error("select a {0} first")]
    NoSelection(&'static str),

    /// The selected id is not in the loaded list.
    #[error("unknown {kind} #{id}")]
    Unknown { kind: &'static str, id: i64 },
}

impl FormError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        FormError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Trimmed value of a mandatory text field.
pub fn required(field: &'static str, value: &str) -> Result<String, FormError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(FormError::Missing(field));
    }
    Ok(value.to_string())
}

/// Trimmed value of an optional text field; blank means absent.
pub fn optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
