//! Application context: the session and the API client, built once per
//! process and handed to every screen.

use std::sync::Arc;

use thiserror::Error;

use crate::api::{ApiClient, ApiError};
use crate::config::ClientConfig;
use crate::routes::{Navigation, Route, resolve};
use crate::screens::{
    CandidatesScreen, CategoriesScreen, CriteriaScreen, DashboardScreen, FinalScoresScreen,
    LoginScreen, Screen, ScoreEntryScreen, UsersScreen,
};
use crate::session::SessionStore;
use crate::storage::{FileTokenStorage, StorageError, TokenStorage};

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

#[derive(Debug, Clone)]
pub struct App {
    session: SessionStore,
    api: ApiClient,
}

impl App {
    /// Context backed by the token file named in `config`.
    pub fn open(config: ClientConfig) -> Result<Self, AppError> {
        let storage = Arc::new(FileTokenStorage::new(config.token_path.clone()));
        Self::with_storage(config, storage)
    }

    pub fn with_storage(config: ClientConfig, storage: Arc<dyn TokenStorage>) -> Result<Self, AppError> {
        let session = SessionStore::open(storage)?;
        let api = ApiClient::new(&config, session.clone())?;
        tracing::debug!(api_url = %config.api_url, "client ready");
        Ok(Self { session, api })
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Resolve `route` against the current identity.
    pub fn navigate(&self, route: Route) -> Navigation {
        resolve(route, self.session.identity().as_ref())
    }

    /// Build and mount the screen of `route`, without consulting the guard.
    pub async fn mount(&self, route: Route) -> Box<dyn Screen> {
        let api = self.api.clone();
        match route {
            Route::Login => Box::new(LoginScreen::new(api)),
            Route::Dashboard => {
                let mut screen = DashboardScreen::new(api);
                screen.mount().await;
                Box::new(screen)
            }
            Route::Candidates => {
                let mut screen = CandidatesScreen::new(api);
                screen.mount().await;
                Box::new(screen)
            }
            Route::Scores => {
                let mut screen = ScoreEntryScreen::new(api);
                screen.mount().await;
                Box::new(screen)
            }
            Route::FinalScores => {
                let mut screen = FinalScoresScreen::new(api);
                screen.mount().await;
                Box::new(screen)
            }
            Route::Categories => {
                let mut screen = CategoriesScreen::new(api);
                screen.mount().await;
                Box::new(screen)
            }
            Route::Criteria => {
                let mut screen = CriteriaScreen::new(api);
                screen.mount().await;
                Box::new(screen)
            }
            Route::Users => {
                let mut screen = UsersScreen::new(api);
                screen.mount().await;
                Box::new(screen)
            }
        }
    }

    /// Navigate to `route` and mount whatever the guard lets through.
    pub async fn open_route(&self, route: Route) -> (Navigation, Box<dyn Screen>) {
        let navigation = self.navigate(route);
        let screen = self.mount(navigation.target).await;
        (navigation, screen)
    }
}
