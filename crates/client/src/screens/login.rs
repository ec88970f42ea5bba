use crate::api::ApiClient;
use crate::forms::{FormError, required};
use crate::notify::Notification;
use crate::routes::Route;

use super::{call_failed, form_rejected, heading, impl_notifications};

/// Credential form. On success the session is set and the user is sent to
/// the dashboard.
#[derive(Debug)]
pub struct LoginScreen {
    api: ApiClient,
    notice: Option<Notification>,
}

impl LoginScreen {
    pub fn new(api: ApiClient) -> Self {
        Self { api, notice: None }
    }

    /// Submit credentials. Returns where to navigate next on success.
    pub async fn submit(&mut self, email: &str, password: &str) -> Option<Route> {
        let email = match required("email", email) {
            Ok(email) => email,
            Err(err) => {
                self.notice = Some(form_rejected(&err));
                return None;
            }
        };
        if password.is_empty() {
            self.notice = Some(form_rejected(&FormError::Missing("password")));
            return None;
        }

        let response = match self.api.login(&email, password).await {
            Ok(response) => response,
            Err(err) => {
                self.notice = Some(call_failed(&err, "Authentication failed"));
                return None;
            }
        };

        match self.api.session().login(&response.access_token) {
            Ok(Some(identity)) => {
                self.notice = Some(Notification::success(format!("Welcome, {}", identity.name)));
            }
            Ok(None) => {
                self.notice = Some(Notification::success("Logged in"));
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to persist session token");
                self.notice = Some(Notification::error(format!("Could not store the session: {err}")));
                return None;
            }
        }
        Some(Route::Dashboard)
    }

    pub fn render(&self) -> String {
        let mut out = heading(Route::Login.title());
        match self.api.session().identity() {
            Some(identity) => {
                out.push_str(&format!("Logged in as {} <{}> ({})\n", identity.name, identity.email, identity.role));
            }
            None => out.push_str("Not logged in. Use `jury login --email <EMAIL>`.\n"),
        }
        out
    }
}

impl_notifications!(LoginScreen, Route::Login);
