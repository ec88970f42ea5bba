//! Route table and navigation resolution.
//!
//! Every navigation goes through [`resolve`], which asks the pure
//! [`jury_auth::guard`] whether the current identity may see the route.

use jury_auth::{Access, Identity, Role, guard};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Dashboard,
    Candidates,
    Scores,
    FinalScores,
    Categories,
    Criteria,
    Users,
}

impl Route {
    pub const ALL: [Route; 8] = [
        Route::Login,
        Route::Dashboard,
        Route::Candidates,
        Route::Scores,
        Route::FinalScores,
        Route::Categories,
        Route::Criteria,
        Route::Users,
    ];

    /// Landing page for an authenticated user who was refused a route.
    pub const LANDING: Route = Route::Dashboard;

    pub const fn path(self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Dashboard => "/dashboard",
            Route::Candidates => "/candidats",
            Route::Scores => "/scores",
            Route::FinalScores => "/final-scores",
            Route::Categories => "/categories",
            Route::Criteria => "/criteres",
            Route::Users => "/users",
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            Route::Login => "Login",
            Route::Dashboard => "Dashboard",
            Route::Candidates => "Candidates",
            Route::Scores => "Score entry",
            Route::FinalScores => "Final scores",
            Route::Categories => "Categories",
            Route::Criteria => "Criteria",
            Route::Users => "Users",
        }
    }

    /// Route for a path. Unknown paths fall back to the login page.
    pub fn from_path(path: &str) -> Route {
        let path = path.trim();
        let normalized = match path.trim_end_matches('/') {
            "" => "/",
            p => p,
        };
        Route::ALL
            .into_iter()
            .find(|r| r.path() == normalized)
            .unwrap_or(Route::Login)
    }

    /// `None` for routes open to everyone (login) or to any authenticated
    /// user; guarded routes are distinguished by [`Route::is_public`].
    pub const fn required_role(self) -> Option<Role> {
        match self {
            Route::Scores => Some(Role::Jury),
            Route::FinalScores | Route::Categories | Route::Criteria | Route::Users => {
                Some(Role::Admin)
            }
            Route::Login | Route::Dashboard | Route::Candidates => None,
        }
    }

    /// Rendered without consulting the guard.
    pub const fn is_public(self) -> bool {
        matches!(self, Route::Login)
    }
}

impl core::fmt::Display for Route {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.path())
    }
}

/// Outcome of one navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Navigation {
    pub requested: Route,
    /// The route that is actually rendered.
    pub target: Route,
}

impl Navigation {
    pub fn redirected(&self) -> bool {
        self.requested != self.target
    }
}

/// Decide which route is rendered when `requested` is asked for.
pub fn resolve(requested: Route, identity: Option<&Identity>) -> Navigation {
    let target = if requested.is_public() {
        requested
    } else {
        match guard(identity, requested.required_role()) {
            Access::Granted => requested,
            Access::RedirectToLogin => Route::Login,
            Access::RedirectToLanding => Route::LANDING,
        }
    };

    if target != requested {
        tracing::debug!(from = %requested, to = %target, "navigation redirected");
    }
    Navigation { requested, target }
}
