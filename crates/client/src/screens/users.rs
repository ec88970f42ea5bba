use jury_auth::Role;
use jury_core::{UserId, find_by_id};

use crate::api::ApiClient;
use crate::forms::{FormError, required};
use crate::notify::Notification;
use crate::render::{Table, date_only};
use crate::routes::Route;
use crate::types::{NewUser, User};

use super::{call_failed, form_rejected, heading, impl_notifications};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

impl Default for UserForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            password: String::new(),
            role: Role::Jury,
        }
    }
}

impl UserForm {
    pub fn validate(&self) -> Result<NewUser, FormError> {
        let name = required("name", &self.name)?;
        let email = required("email", &self.email)?;
        if self.password.is_empty() {
            return Err(FormError::Missing("password"));
        }
        Ok(NewUser {
            name,
            email,
            password: self.password.clone(),
            role: self.role,
        })
    }
}

#[derive(Debug)]
pub struct UsersScreen {
    api: ApiClient,
    users: Vec<User>,
    notice: Option<Notification>,
}

impl UsersScreen {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            users: Vec::new(),
            notice: None,
        }
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub async fn mount(&mut self) {
        self.refresh().await;
    }

    pub async fn create(&mut self, form: &UserForm) {
        let user = match form.validate() {
            Ok(user) => user,
            Err(err) => {
                self.notice = Some(form_rejected(&err));
                return;
            }
        };

        match self.api.create_user(&user).await {
            Ok(created) => {
                self.notice = Some(Notification::success(format!("User {} created", created.email)));
                self.refresh().await;
            }
            Err(err) => self.notice = Some(call_failed(&err, "Failed to create the user")),
        }
    }

    pub async fn delete(&mut self, id: UserId) {
        let label = find_by_id(&self.users, id)
            .map(|u| u.email.clone())
            .unwrap_or_else(|| format!("#{id}"));

        match self.api.delete_user(id).await {
            Ok(()) => {
                self.notice = Some(Notification::success(format!("User {label} deleted")));
                self.refresh().await;
            }
            Err(err) => self.notice = Some(call_failed(&err, "Failed to delete the user")),
        }
    }

    async fn refresh(&mut self) {
        match self.api.list_users().await {
            Ok(users) => self.users = users,
            Err(err) => self.notice = Some(call_failed(&err, "Failed to load users")),
        }
    }

    pub fn render(&self) -> String {
        let mut out = heading(Route::Users.title());
        if self.users.is_empty() {
            out.push_str("No users.\n");
            return out;
        }
        let mut table = Table::new(["Id", "Name", "Email", "Role", "Created"]);
        for u in &self.users {
            table.row([
                u.id.to_string(),
                u.name.clone(),
                u.email.clone(),
                u.role.to_string(),
                date_only(u.created_at.as_deref()).to_string(),
            ]);
        }
        out.push_str(&table.render());
        out
    }
}

impl_notifications!(UsersScreen, Route::Users);
