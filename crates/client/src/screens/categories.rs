//! Category management: categories, and which candidates and jury members
//! are assigned to each.

use std::collections::BTreeMap;

use jury_auth::Role;
use jury_core::{CandidateId, CategoryId, UserId, find_by_id};

use crate::api::{ApiClient, ApiError};
use crate::forms::{FormError, optional, required};
use crate::notify::Notification;
use crate::render::{Table, or_dash};
use crate::routes::Route;
use crate::types::{Candidate, CandidateSummary, Category, JuryMember, NewCategory, User};

use super::{call_failed, form_rejected, heading, impl_notifications};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryForm {
    pub name: String,
    pub description: Option<String>,
}

impl CategoryForm {
    pub fn validate(&self) -> Result<NewCategory, FormError> {
        Ok(NewCategory {
            name: required("name", &self.name)?,
            description: optional(self.description.as_deref()),
        })
    }
}

/// Rosters of one category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assignation {
    pub candidates: Vec<CandidateSummary>,
    pub juries: Vec<JuryMember>,
}

#[derive(Debug)]
pub struct CategoriesScreen {
    api: ApiClient,
    categories: Vec<Category>,
    candidates: Vec<Candidate>,
    juries: Vec<User>,
    assignations: BTreeMap<CategoryId, Assignation>,
    selected_candidate: Option<CandidateId>,
    selected_jury: Option<UserId>,
    notice: Option<Notification>,
}

impl CategoriesScreen {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            categories: Vec::new(),
            candidates: Vec::new(),
            juries: Vec::new(),
            assignations: BTreeMap::new(),
            selected_candidate: None,
            selected_jury: None,
            notice: None,
        }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    /// Users whose role is jury.
    pub fn juries(&self) -> &[User] {
        &self.juries
    }

    pub fn assignation(&self, category: CategoryId) -> Option<&Assignation> {
        self.assignations.get(&category)
    }

    /// Load categories, candidates and jury users, then every category's
    /// rosters. A roster that fails to load is left out.
    pub async fn mount(&mut self) {
        let loaded = tokio::try_join!(
            self.api.list_categories(),
            self.api.list_candidates(),
            self.api.list_users(),
        );
        let (categories, candidates, users) = match loaded {
            Ok(lists) => lists,
            Err(err) => {
                self.notice = Some(call_failed(&err, "Failed to load categories"));
                return;
            }
        };

        self.categories = categories;
        self.candidates = candidates;
        self.juries = users.into_iter().filter(|u| u.role == Role::Jury).collect();

        self.assignations.clear();
        let ids: Vec<CategoryId> = self.categories.iter().map(|c| c.id).collect();
        for id in ids {
            match self.fetch_assignation(id).await {
                Ok(assignation) => {
                    self.assignations.insert(id, assignation);
                }
                Err(err) => {
                    tracing::warn!(category = %id, error = %err, "failed to load category rosters");
                }
            }
        }
    }

    pub fn select_candidate(&mut self, id: CandidateId) -> Result<(), FormError> {
        if find_by_id(&self.candidates, id).is_none() {
            return Err(FormError::Unknown { kind: "candidate", id: id.get() });
        }
        self.selected_candidate = Some(id);
        Ok(())
    }

    pub fn select_jury(&mut self, id: UserId) -> Result<(), FormError> {
        if find_by_id(&self.juries, id).is_none() {
            return Err(FormError::Unknown { kind: "jury", id: id.get() });
        }
        self.selected_jury = Some(id);
        Ok(())
    }

    pub async fn create_category(&mut self, form: &CategoryForm) {
        let category = match form.validate() {
            Ok(category) => category,
            Err(err) => {
                self.notice = Some(form_rejected(&err));
                return;
            }
        };

        match self.api.create_category(&category).await {
            Ok(created) => {
                self.notice = Some(Notification::success(format!("Category {} created", created.name)));
                self.refresh_categories().await;
                self.refresh_assignation(created.id).await;
            }
            Err(err) => self.notice = Some(call_failed(&err, "Failed to create the category")),
        }
    }

    pub async fn delete_category(&mut self, id: CategoryId) {
        match self.api.delete_category(id).await {
            Ok(()) => {
                self.notice = Some(Notification::success(format!("Category #{id} deleted")));
                self.assignations.remove(&id);
                self.refresh_categories().await;
            }
            Err(err) => self.notice = Some(call_failed(&err, "Failed to delete the category")),
        }
    }

    /// Assign the selected candidate to `category`.
    pub async fn add_candidate(&mut self, category: CategoryId) {
        let Some(candidate) = self.selected_candidate else {
            self.notice = Some(form_rejected(&FormError::NoSelection("candidate")));
            return;
        };
        let result = self.api.add_candidate_to_category(category, candidate).await;
        self.after_roster_change(category, result.map(|_| ()), "Candidate added", "Failed to add the candidate")
            .await;
    }

    /// Assign the selected jury member to `category`.
    pub async fn add_jury(&mut self, category: CategoryId) {
        let Some(jury) = self.selected_jury else {
            self.notice = Some(form_rejected(&FormError::NoSelection("jury")));
            return;
        };
        let result = self.api.add_jury_to_category(category, jury).await;
        self.after_roster_change(category, result.map(|_| ()), "Jury added", "Failed to add the jury")
            .await;
    }

    pub async fn remove_candidate(&mut self, category: CategoryId, candidate: CandidateId) {
        let result = self.api.remove_candidate_from_category(category, candidate).await;
        self.after_roster_change(
            category,
            result.map(|_| ()),
            "Candidate removed",
            "Failed to remove the candidate",
        )
        .await;
    }

    pub async fn remove_jury(&mut self, category: CategoryId, jury: UserId) {
        let result = self.api.remove_jury_from_category(category, jury).await;
        self.after_roster_change(category, result.map(|_| ()), "Jury removed", "Failed to remove the jury")
            .await;
    }

    async fn after_roster_change(
        &mut self,
        category: CategoryId,
        result: Result<(), ApiError>,
        success: &str,
        fallback: &str,
    ) {
        match result {
            Ok(()) => {
                self.notice = Some(Notification::success(success));
                self.refresh_assignation(category).await;
            }
            Err(err) => self.notice = Some(call_failed(&err, fallback)),
        }
    }

    async fn fetch_assignation(&self, category: CategoryId) -> Result<Assignation, ApiError> {
        let (candidates, juries) = tokio::try_join!(
            self.api.category_candidates(category),
            self.api.category_juries(category),
        )?;
        Ok(Assignation { candidates, juries })
    }

    /// Re-fetch one category's rosters; the others are left as they are.
    async fn refresh_assignation(&mut self, category: CategoryId) {
        match self.fetch_assignation(category).await {
            Ok(assignation) => {
                self.assignations.insert(category, assignation);
            }
            Err(err) => self.notice = Some(call_failed(&err, "Failed to reload the category")),
        }
    }

    async fn refresh_categories(&mut self) {
        match self.api.list_categories().await {
            Ok(categories) => self.categories = categories,
            Err(err) => self.notice = Some(call_failed(&err, "Failed to load categories")),
        }
    }

    pub fn render(&self) -> String {
        let mut out = heading(Route::Categories.title());
        if self.categories.is_empty() {
            out.push_str("No categories.\n");
            return out;
        }

        for category in &self.categories {
            out.push_str(&format!(
                "\n#{} {}  ({})\n",
                category.id,
                category.name,
                or_dash(category.description.as_deref())
            ));

            let Some(assignation) = self.assignations.get(&category.id) else {
                out.push_str("  rosters unavailable\n");
                continue;
            };

            let mut table = Table::new(["Kind", "Id", "Name", "Email"]);
            for c in &assignation.candidates {
                table.row(["candidate".to_string(), c.id.to_string(), c.full_name(), c.email.clone()]);
            }
            for j in &assignation.juries {
                table.row(["jury".to_string(), j.id.to_string(), j.name.clone(), j.email.clone()]);
            }
            if table.is_empty() {
                out.push_str("  nobody assigned\n");
            } else {
                for line in table.render().lines() {
                    out.push_str("  ");
                    out.push_str(line);
                    out.push('\n');
                }
            }
        }
        out
    }
}

impl_notifications!(CategoriesScreen, Route::Categories);
