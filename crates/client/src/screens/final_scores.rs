use jury_core::{CategoryId, find_by_id};

use crate::api::ApiClient;
use crate::forms::FormError;
use crate::notify::Notification;
use crate::render::{Table, or_dash};
use crate::routes::Route;
use crate::types::{Category, FinalScore};

use super::{call_failed, form_rejected, heading, impl_notifications};

/// One leaderboard line. Ranks start at 1.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedScore<'a> {
    pub rank: usize,
    pub score: &'a FinalScore,
}

#[derive(Debug)]
pub struct FinalScoresScreen {
    api: ApiClient,
    categories: Vec<Category>,
    selected: Option<CategoryId>,
    scores: Vec<FinalScore>,
    notice: Option<Notification>,
}

impl FinalScoresScreen {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            categories: Vec::new(),
            selected: None,
            scores: Vec::new(),
            notice: None,
        }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn selected_category(&self) -> Option<CategoryId> {
        self.selected
    }

    pub async fn mount(&mut self) {
        match self.api.list_categories().await {
            Ok(categories) => self.categories = categories,
            Err(err) => self.notice = Some(call_failed(&err, "Failed to load categories")),
        }
    }

    pub async fn select_category(&mut self, id: CategoryId) {
        if find_by_id(&self.categories, id).is_none() {
            self.notice = Some(form_rejected(&FormError::Unknown { kind: "category", id: id.get() }));
            return;
        }
        match self.api.final_scores(id).await {
            Ok(scores) => {
                self.selected = Some(id);
                self.scores = sort_by_final_note(scores);
            }
            Err(err) => self.notice = Some(call_failed(&err, "Failed to load the final scores")),
        }
    }

    pub fn leaderboard(&self) -> Vec<RankedScore<'_>> {
        self.scores
            .iter()
            .enumerate()
            .map(|(i, score)| RankedScore { rank: i + 1, score })
            .collect()
    }

    pub fn render(&self) -> String {
        let mut out = heading(Route::FinalScores.title());
        let selected = self.selected.and_then(|id| find_by_id(&self.categories, id));
        let Some(category) = selected else {
            let mut table = Table::new(["Id", "Category"]);
            for c in &self.categories {
                table.row([c.id.to_string(), c.name.clone()]);
            }
            out.push_str("Select a category with --category <ID>:\n");
            out.push_str(&table.render());
            return out;
        };

        out.push_str(&format!("Category: {}\n\n", category.name));
        if self.scores.is_empty() {
            out.push_str("No final scores yet.\n");
            return out;
        }
        let mut table = Table::new(["Rank", "Candidate", "Email", "Project", "Final note", "Juries"]);
        for line in self.leaderboard() {
            table.row([
                line.rank.to_string(),
                line.score.full_name(),
                or_dash(Some(line.score.email.as_str())).to_string(),
                or_dash(Some(line.score.project.as_str())).to_string(),
                format!("{:.2}", line.score.final_note),
                line.score.jury_count.to_string(),
            ]);
        }
        out.push_str(&table.render());
        out
    }
}

impl_notifications!(FinalScoresScreen, Route::FinalScores);

/// Descending by final note; the sort is stable so ties keep backend order.
fn sort_by_final_note(mut scores: Vec<FinalScore>) -> Vec<FinalScore> {
    scores.sort_by(|a, b| b.final_note.total_cmp(&a.final_note));
    scores
}
