//! Page screens.
//!
//! Each screen is an independent view-model: it loads its own lists through
//! the [`ApiClient`](crate::api::ApiClient), keeps its form state, and records
//! one transient [`Notification`] per action. A failed call leaves the
//! previously loaded state untouched. Nothing is shared between screens
//! except the session carried by the client.

pub mod candidates;
pub mod categories;
pub mod criteria;
pub mod dashboard;
pub mod final_scores;
pub mod login;
pub mod score_entry;
pub mod users;

pub use candidates::{CandidateForm, CandidatesScreen};
pub use categories::{Assignation, CategoriesScreen, CategoryForm};
pub use criteria::{CriteriaScreen, CriterionForm};
pub use dashboard::{AdminStats, DashboardScreen, DashboardView};
pub use final_scores::{FinalScoresScreen, RankedScore};
pub use login::LoginScreen;
pub use score_entry::{ScoreDraft, ScoreEntryScreen};
pub use users::{UserForm, UsersScreen};

use crate::api::ApiError;
use crate::forms::FormError;
use crate::notify::Notification;
use crate::routes::Route;

/// Behaviour shared by every screen.
pub trait Screen {
    fn route(&self) -> Route;

    /// Last recorded notification, if not yet taken.
    fn notification(&self) -> Option<&Notification>;

    /// Consume the notification; it is shown once.
    fn take_notification(&mut self) -> Option<Notification>;

    fn render(&self) -> String;
}

macro_rules! impl_notifications {
    ($t:ty, $route:expr) => {
        impl $crate::screens::Screen for $t {
            fn route(&self) -> $crate::routes::Route {
                $route
            }

            fn notification(&self) -> Option<&$crate::notify::Notification> {
                self.notice.as_ref()
            }

            fn take_notification(&mut self) -> Option<$crate::notify::Notification> {
                self.notice.take()
            }

            fn render(&self) -> String {
                <$t>::render(self)
            }
        }
    };
}
pub(crate) use impl_notifications;

/// Notification for a failed call, logged on the way.
pub(crate) fn call_failed(err: &ApiError, fallback: &str) -> Notification {
    tracing::warn!(error = %err, "{fallback}");
    Notification::from_api_error(err, fallback)
}

/// Notification for a form rejected before any request.
pub(crate) fn form_rejected(err: &FormError) -> Notification {
    tracing::debug!(error = %err, "form rejected");
    Notification::error(err.to_string())
}

/// Screen heading underlined to its width.
pub(crate) fn heading(title: &str) -> String {
    format!("{title}\n{}\n", "=".repeat(title.chars().count()))
}
