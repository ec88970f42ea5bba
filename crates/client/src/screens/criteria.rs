use jury_core::{CategoryId, CriterionId, find_by_id};

use crate::api::ApiClient;
use crate::forms::{FormError, required};
use crate::notify::Notification;
use crate::render::Table;
use crate::routes::Route;
use crate::types::{Category, Criterion, NewCriterion};

use super::{call_failed, form_rejected, heading, impl_notifications};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CriterionForm {
    pub name: String,
    pub max_value: i64,
}

impl CriterionForm {
    pub fn validate(&self, category: Option<CategoryId>) -> Result<NewCriterion, FormError> {
        let category_id = category.ok_or(FormError::NoSelection("category"))?;
        let name = required("name", &self.name)?;
        if self.max_value <= 0 {
            return Err(FormError::invalid("max value", "must be greater than 0"));
        }
        Ok(NewCriterion {
            name,
            category_id,
            max_value: self.max_value,
        })
    }
}

/// Scoring criteria of one selected category.
#[derive(Debug)]
pub struct CriteriaScreen {
    api: ApiClient,
    categories: Vec<Category>,
    selected: Option<CategoryId>,
    criteria: Vec<Criterion>,
    notice: Option<Notification>,
}

impl CriteriaScreen {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            categories: Vec::new(),
            selected: None,
            criteria: Vec::new(),
            notice: None,
        }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn selected_category(&self) -> Option<CategoryId> {
        self.selected
    }

    pub fn criteria(&self) -> &[Criterion] {
        &self.criteria
    }

    pub async fn mount(&mut self) {
        match self.api.list_categories().await {
            Ok(categories) => self.categories = categories,
            Err(err) => self.notice = Some(call_failed(&err, "Failed to load categories")),
        }
    }

    /// Select a category and load its criteria.
    pub async fn select_category(&mut self, id: CategoryId) {
        if find_by_id(&self.categories, id).is_none() {
            self.notice = Some(form_rejected(&FormError::Unknown { kind: "category", id: id.get() }));
            return;
        }
        self.selected = Some(id);
        self.criteria.clear();
        self.refresh().await;
    }

    pub async fn create(&mut self, form: &CriterionForm) {
        let criterion = match form.validate(self.selected) {
            Ok(criterion) => criterion,
            Err(err) => {
                self.notice = Some(form_rejected(&err));
                return;
            }
        };

        match self.api.create_criterion(&criterion).await {
            Ok(created) => {
                self.notice = Some(Notification::success(format!("Criterion {} added", created.name)));
                self.refresh().await;
            }
            Err(err) => self.notice = Some(call_failed(&err, "Failed to add the criterion")),
        }
    }

    pub async fn delete(&mut self, id: CriterionId) {
        match self.api.delete_criterion(id).await {
            Ok(()) => {
                self.notice = Some(Notification::success("Criterion deleted"));
                self.refresh().await;
            }
            Err(err) => self.notice = Some(call_failed(&err, "Failed to delete the criterion")),
        }
    }

    async fn refresh(&mut self) {
        let Some(category) = self.selected else {
            return;
        };
        match self.api.criteria_by_category(category).await {
            Ok(criteria) => self.criteria = criteria,
            Err(err) => self.notice = Some(call_failed(&err, "Failed to load criteria")),
        }
    }

    pub fn render(&self) -> String {
        let mut out = heading(Route::Criteria.title());
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
        if self.criteria.is_empty() {
            out.push_str("No criteria.\n");
            return out;
        }
        let mut table = Table::new(["Id", "Name", "Max"]);
        for c in &self.criteria {
            table.row([c.id.to_string(), c.name.clone(), c.max_value.to_string()]);
        }
        out.push_str(&table.render());
        out
    }
}

impl_notifications!(CriteriaScreen, Route::Criteria);
