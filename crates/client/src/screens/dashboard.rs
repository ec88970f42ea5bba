use jury_auth::{Identity, Role};

use crate::api::ApiClient;
use crate::notify::Notification;
use crate::routes::Route;
use crate::types::FinalScore;

use super::{call_failed, heading, impl_notifications};

/// Statistics cards of the administrator dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct AdminStats {
    pub categories: usize,
    pub candidates: usize,
    pub juries: usize,
    /// Mean final note over every category's final scores; 0 when none.
    pub global_average: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DashboardView {
    Admin(AdminStats),
    Jury(Identity),
}

#[derive(Debug)]
pub struct DashboardScreen {
    api: ApiClient,
    view: Option<DashboardView>,
    notice: Option<Notification>,
}

impl DashboardScreen {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            view: None,
            notice: None,
        }
    }

    pub fn view(&self) -> Option<&DashboardView> {
        self.view.as_ref()
    }

    /// Build the view for the current identity. The jury view is local; the
    /// admin view loads statistics.
    pub async fn mount(&mut self) {
        let Some(identity) = self.api.session().identity() else {
            self.view = None;
            return;
        };

        match identity.role {
            Role::Jury => self.view = Some(DashboardView::Jury(identity)),
            Role::Admin => match self.load_stats().await {
                Ok(stats) => self.view = Some(DashboardView::Admin(stats)),
                Err(notice) => self.notice = Some(notice),
            },
        }
    }

    async fn load_stats(&self) -> Result<AdminStats, Notification> {
        let (categories, candidates, users) = tokio::try_join!(
            self.api.list_categories(),
            self.api.list_candidates(),
            self.api.list_users(),
        )
        .map_err(|err| call_failed(&err, "Failed to load the dashboard"))?;

        let mut scores: Vec<FinalScore> = Vec::new();
        for category in &categories {
            match self.api.final_scores(category.id).await {
                Ok(mut batch) => scores.append(&mut batch),
                Err(err) => {
                    tracing::debug!(category = %category.id, error = %err, "final scores unavailable; skipped");
                }
            }
        }

        Ok(AdminStats {
            categories: categories.len(),
            candidates: candidates.len(),
            juries: users.iter().filter(|u| u.role == Role::Jury).count(),
            global_average: mean(scores.iter().map(|s| s.final_note)),
        })
    }

    pub fn render(&self) -> String {
        match &self.view {
            None => heading(Route::Dashboard.title()),
            Some(DashboardView::Admin(stats)) => {
                let mut out = heading("Dashboard - Administrator");
                out.push_str(&format!("Categories      {}\n", stats.categories));
                out.push_str(&format!("Candidates      {}\n", stats.candidates));
                out.push_str(&format!("Juries          {}\n", stats.juries));
                out.push_str(&format!("Global average  {:.2}\n", stats.global_average));
                out.push_str("\nSee the final results: jury final-scores --category <ID>\n");
                out
            }
            Some(DashboardView::Jury(identity)) => {
                let mut out = heading(&format!("Welcome, {}", identity.name));
                out.push_str(&format!("Email: {}\n", identity.email));
                out.push_str(&format!("Role:  {}\n", identity.role));
                out.push_str("\nYou can start scoring the candidates of your categories:\n");
                out.push_str("  jury scores show --category <ID>\n");
                out
            }
        }
    }
}

impl_notifications!(DashboardScreen, Route::Dashboard);

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    if count == 0 { 0.0 } else { sum / count as f64 }
}
