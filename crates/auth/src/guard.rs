use crate::{Identity, Role};

/// Outcome of gating a navigation target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Render the requested content.
    Granted,
    /// No identity: send the user to the login page.
    RedirectToLogin,
    /// Authenticated but lacking the required role: send the user to the
    /// default authenticated landing page.
    RedirectToLanding,
}

impl Access {
    pub fn is_granted(&self) -> bool {
        matches!(self, Access::Granted)
    }
}

/// Gate a navigation target on the current identity.
///
/// - No IO
/// - No panics
/// - Pure: callers re-evaluate on every navigation and identity change.
pub fn guard(identity: Option<&Identity>, required: Option<Role>) -> Access {
    let Some(identity) = identity else {
        return Access::RedirectToLogin;
    };

    match required {
        Some(role) if identity.role != role => Access::RedirectToLanding,
        _ => Access::Granted,
    }
}
