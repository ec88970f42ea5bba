use jury_core::{CandidateId, find_by_id};

use crate::api::ApiClient;
use crate::forms::{FormError, optional, required};
use crate::notify::Notification;
use crate::render::{Table, date_only, or_dash};
use crate::routes::Route;
use crate::types::{Candidate, NewCandidate};

use super::{call_failed, form_rejected, heading, impl_notifications};

/// Raw input of the "new candidate" form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateForm {
    pub last_name: String,
    pub first_name: String,
    pub email: String,
    pub project: Option<String>,
    pub company: Option<String>,
}

impl CandidateForm {
    pub fn validate(&self) -> Result<NewCandidate, FormError> {
        Ok(NewCandidate {
            last_name: required("last name", &self.last_name)?,
            first_name: required("first name", &self.first_name)?,
            email: required("email", &self.email)?,
            project: optional(self.project.as_deref()),
            company: optional(self.company.as_deref()),
        })
    }
}

#[derive(Debug)]
pub struct CandidatesScreen {
    api: ApiClient,
    candidates: Vec<Candidate>,
    notice: Option<Notification>,
}

impl CandidatesScreen {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            candidates: Vec::new(),
            notice: None,
        }
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub async fn mount(&mut self) {
        self.refresh().await;
    }

    pub async fn create(&mut self, form: &CandidateForm) {
        let candidate = match form.validate() {
            Ok(candidate) => candidate,
            Err(err) => {
                self.notice = Some(form_rejected(&err));
                return;
            }
        };

        match self.api.create_candidate(&candidate).await {
            Ok(created) => {
                self.notice = Some(Notification::success(format!(
                    "Candidate {} added",
                    created.full_name()
                )));
                self.refresh().await;
            }
            Err(err) => self.notice = Some(call_failed(&err, "Failed to add the candidate")),
        }
    }

    pub async fn delete(&mut self, id: CandidateId) {
        let label = find_by_id(&self.candidates, id)
            .map(Candidate::full_name)
            .unwrap_or_else(|| format!("#{id}"));

        match self.api.delete_candidate(id).await {
            Ok(()) => {
                self.notice = Some(Notification::success(format!("Candidate {label} deleted")));
                self.refresh().await;
            }
            Err(err) => self.notice = Some(call_failed(&err, "Failed to delete the candidate")),
        }
    }

    async fn refresh(&mut self) {
        match self.api.list_candidates().await {
            Ok(candidates) => self.candidates = candidates,
            Err(err) => self.notice = Some(call_failed(&err, "Failed to load candidates")),
        }
    }

    pub fn render(&self) -> String {
        let mut out = heading(Route::Candidates.title());
        if self.candidates.is_empty() {
            out.push_str("No candidates.\n");
            return out;
        }

        let mut table = Table::new(["Id", "Last name", "First name", "Email", "Project", "Company", "Created"]);
        for c in &self.candidates {
            table.row([
                c.id.to_string(),
                c.last_name.clone(),
                c.first_name.clone(),
                c.email.clone(),
                or_dash(c.project.as_deref()).to_string(),
                or_dash(c.company.as_deref()).to_string(),
                date_only(c.created_at.as_deref()).to_string(),
            ]);
        }
        out.push_str(&table.render());
        out
    }
}

impl_notifications!(CandidatesScreen, Route::Candidates);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_requires_names_and_email() {
        let mut form = CandidateForm {
            last_name: "Diallo".to_string(),
            first_name: " ".to_string(),
            email: "a@b.c".to_string(),
            ..CandidateForm::default()
        };
        assert_eq!(form.validate(), Err(FormError::Missing("first name")));

        form.first_name = "Awa".to_string();
        form.company = Some("".to_string());
        let valid = form.validate().unwrap();
        assert_eq!(valid.first_name, "Awa");
        assert_eq!(valid.company, None);
    }
}
