//! Jury score entry: one draft `{note, comment}` per (candidate, criterion)
//! of the selected category, saved one at a time.

use std::collections::BTreeMap;

use jury_core::{CandidateId, CategoryId, CriterionId, find_by_id};

use crate::api::ApiClient;
use crate::forms::{FormError, optional};
use crate::notify::Notification;
use crate::render::Table;
use crate::routes::Route;
use crate::types::{CandidateSummary, Category, CriteriaScoreInput, Criterion, JuryScore};

use super::{call_failed, form_rejected, heading, impl_notifications};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreDraft {
    pub note: Option<f64>,
    pub comment: String,
}

type DraftKey = (CandidateId, CriterionId);

#[derive(Debug)]
pub struct ScoreEntryScreen {
    api: ApiClient,
    categories: Vec<Category>,
    selected: Option<CategoryId>,
    candidates: Vec<CandidateSummary>,
    criteria: Vec<Criterion>,
    drafts: BTreeMap<DraftKey, ScoreDraft>,
    jury_totals: Option<(CandidateId, Vec<JuryScore>)>,
    notice: Option<Notification>,
}

impl ScoreEntryScreen {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            categories: Vec::new(),
            selected: None,
            candidates: Vec::new(),
            criteria: Vec::new(),
            drafts: BTreeMap::new(),
            jury_totals: None,
            notice: None,
        }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn selected_category(&self) -> Option<CategoryId> {
        self.selected
    }

    pub fn candidates(&self) -> &[CandidateSummary] {
        &self.candidates
    }

    pub fn criteria(&self) -> &[Criterion] {
        &self.criteria
    }

    pub fn drafts(&self) -> &BTreeMap<DraftKey, ScoreDraft> {
        &self.drafts
    }

    pub fn draft(&self, candidate: CandidateId, criterion: CriterionId) -> Option<&ScoreDraft> {
        self.drafts.get(&(candidate, criterion))
    }

    /// Totals loaded by [`Self::load_jury_totals`], with the candidate they
    /// belong to.
    pub fn jury_totals(&self) -> Option<&(CandidateId, Vec<JuryScore>)> {
        self.jury_totals.as_ref()
    }

    pub async fn mount(&mut self) {
        match self.api.list_categories().await {
            Ok(categories) => self.categories = categories,
            Err(err) => self.notice = Some(call_failed(&err, "Failed to load categories")),
        }
    }

    /// Select a category and load its candidates and criteria together.
    pub async fn select_category(&mut self, id: CategoryId) {
        if find_by_id(&self.categories, id).is_none() {
            self.notice = Some(form_rejected(&FormError::Unknown { kind: "category", id: id.get() }));
            return;
        }

        let loaded = tokio::try_join!(
            self.api.category_candidates(id),
            self.api.criteria_by_category(id),
        );
        match loaded {
            Ok((candidates, criteria)) => {
                self.selected = Some(id);
                self.candidates = candidates;
                self.criteria = criteria;
                self.jury_totals = None;
            }
            Err(err) => self.notice = Some(call_failed(&err, "Failed to load the category")),
        }
    }

    pub fn set_note(&mut self, candidate: CandidateId, criterion: CriterionId, note: Option<f64>) {
        self.drafts.entry((candidate, criterion)).or_default().note = note;
    }

    pub fn set_comment(&mut self, candidate: CandidateId, criterion: CriterionId, comment: impl Into<String>) {
        self.drafts.entry((candidate, criterion)).or_default().comment = comment.into();
    }

    /// Submit the draft for `(candidate, criterion)`. Drafts are never
    /// modified by saving, whatever the outcome.
    pub async fn save(&mut self, candidate: CandidateId, criterion: CriterionId) {
        let input = match self.score_input(candidate, criterion) {
            Ok(input) => input,
            Err(notice) => {
                self.notice = Some(notice);
                return;
            }
        };

        match self.api.submit_criteria_score(&input).await {
            Ok(ack) if !ack.message.trim().is_empty() => {
                self.notice = Some(Notification::success(ack.message));
            }
            Ok(_) => self.notice = Some(Notification::success("Score saved")),
            Err(err) => self.notice = Some(call_failed(&err, "Failed to save the score")),
        }
    }

    fn score_input(&self, candidate: CandidateId, criterion: CriterionId) -> Result<CriteriaScoreInput, Notification> {
        let category_id = self
            .selected
            .ok_or_else(|| form_rejected(&FormError::NoSelection("category")))?;
        let identity = self
            .api
            .session()
            .identity()
            .ok_or_else(|| Notification::error("Not logged in"))?;
        let max_value = find_by_id(&self.criteria, criterion)
            .map(|c| c.max_value)
            .ok_or_else(|| form_rejected(&FormError::Unknown { kind: "criterion", id: criterion.get() }))?;
        let draft = self.drafts.get(&(candidate, criterion));
        let note = validate_note(draft.and_then(|d| d.note), max_value).map_err(|e| form_rejected(&e))?;

        Ok(CriteriaScoreInput {
            candidate_id: candidate,
            jury_id: identity.user_id,
            category_id,
            criterion_id: criterion,
            note,
            comment: optional(draft.map(|d| d.comment.as_str())),
        })
    }

    /// Load every jury member's total for `candidate` in the selected category.
    pub async fn load_jury_totals(&mut self, candidate: CandidateId) {
        let Some(category) = self.selected else {
            self.notice = Some(form_rejected(&FormError::NoSelection("category")));
            return;
        };
        match self.api.jury_scores(candidate, category).await {
            Ok(scores) => self.jury_totals = Some((candidate, scores)),
            Err(err) => self.notice = Some(call_failed(&err, "Failed to load the jury totals")),
        }
    }

    pub fn render(&self) -> String {
        let mut out = heading(Route::Scores.title());
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
        if self.candidates.is_empty() || self.criteria.is_empty() {
            out.push_str("Nothing to score yet.\n");
        } else {
            let mut table = Table::new(["Candidate", "Criterion", "Max", "Note", "Comment"]);
            for candidate in &self.candidates {
                for criterion in &self.criteria {
                    let draft = self.draft(candidate.id, criterion.id);
                    table.row([
                        format!("#{} {}", candidate.id, candidate.full_name()),
                        format!("#{} {}", criterion.id, criterion.name),
                        criterion.max_value.to_string(),
                        draft
                            .and_then(|d| d.note)
                            .map(|n| n.to_string())
                            .unwrap_or_else(|| "-".to_string()),
                        draft.map(|d| d.comment.clone()).unwrap_or_default(),
                    ]);
                }
            }
            out.push_str(&table.render());
        }

        if let Some((candidate, scores)) = &self.jury_totals {
            out.push_str(&format!("\nJury totals for candidate #{candidate}:\n"));
            let mut table = Table::new(["Jury", "Total"]);
            for s in scores {
                table.row([format!("#{}", s.jury_id), format!("{:.2}", s.total)]);
            }
            out.push_str(&table.render());
        }
        out
    }
}

impl_notifications!(ScoreEntryScreen, Route::Scores);

fn validate_note(note: Option<f64>, max_value: i64) -> Result<f64, FormError> {
    let note = note.ok_or(FormError::Missing("note"))?;
    let max = max_value as f64;
    if !note.is_finite() || note < 0.0 || note > max {
        return Err(FormError::invalid("note", format!("must be between 0 and {max_value}")));
    }
    Ok(note)
}
