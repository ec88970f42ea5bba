//! In-process stub of the evaluation backend.
//!
//! Same routes and payload shapes as the real service, backed by in-memory
//! state that tests can inspect and tweak through [`TestServer::state`].

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use axum::extract::{Form, Path, Request, State};
use axum::http::{StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::Deserialize;
use serde_json::{Value, json};

use jury_auth::{Identity, Role};
use jury_client::types::{
    Candidate, CandidateSummary, Category, Criterion, FinalScore, JuryMember, JuryScore,
    NewCandidate, NewCategory, NewCriterion, NewUser, User,
};
use jury_client::{App, ClientConfig, MemoryTokenStorage};
use jury_core::{CandidateId, CategoryId, CriterionId, UserId};

pub const SECRET: &str = "stub-backend-secret";

pub const ADMIN_EMAIL: &str = "admin@example.org";
pub const ADMIN_PASSWORD: &str = "admin-pass";
pub const JURY_EMAIL: &str = "jury@example.org";
pub const JURY_PASSWORD: &str = "jury-pass";

#[derive(Debug, Clone)]
pub struct Account {
    pub email: String,
    pub password: String,
    pub token: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    pub candidates: Vec<i64>,
    pub juries: Vec<i64>,
}

/// One request as seen by the stub.
#[derive(Debug, Clone)]
pub struct Seen {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
}

#[derive(Debug, Default)]
pub struct StubState {
    pub categories: Vec<Category>,
    pub candidates: Vec<Candidate>,
    pub users: Vec<User>,
    pub criteria: Vec<Criterion>,
    pub rosters: BTreeMap<i64, Roster>,
    pub final_scores: BTreeMap<i64, Vec<FinalScore>>,
    pub jury_scores: Vec<JuryScore>,
    pub accounts: Vec<Account>,
    /// When set, score submissions fail with this detail.
    pub score_rejection: Option<String>,
    /// When set, `GET /users/` answers with a payload that breaks the schema.
    pub malformed_users: bool,
    pub submitted_scores: Vec<Value>,
    pub requests: Vec<Seen>,
    next_id: i64,
}

impl StubState {
    /// Three categories, three candidates, one admin and two jury members.
    ///
    /// Candidate 10 sits in categories 1 and 2. Category 3 has no final
    /// scores, so its leaderboard answers 404.
    pub fn seeded() -> Self {
        let mut state = StubState {
            next_id: 1000,
            ..StubState::default()
        };

        state.categories = vec![
            category(1, "Web"),
            category(2, "Mobile"),
            category(3, "Data"),
        ];
        state.candidates = vec![
            candidate(10, "Diallo", "Awa"),
            candidate(11, "Ba", "Moussa"),
            candidate(12, "Ndiaye", "Fatou"),
        ];
        state.users = vec![
            user(1, "Admin One", ADMIN_EMAIL, Role::Admin),
            user(2, "Jury One", JURY_EMAIL, Role::Jury),
            user(3, "Jury Two", "jury2@example.org", Role::Jury),
        ];
        state.criteria = vec![
            criterion(100, 1, "Innovation", 20),
            criterion(101, 1, "Design", 10),
            criterion(200, 2, "Usability", 20),
        ];
        state.rosters.insert(1, Roster { candidates: vec![10, 11], juries: vec![2] });
        state.rosters.insert(2, Roster { candidates: vec![10, 12], juries: vec![3] });
        state.rosters.insert(3, Roster::default());
        state.final_scores.insert(1, vec![final_score(10, "Diallo", 15.0), final_score(11, "Ba", 17.0)]);
        state.final_scores.insert(2, vec![final_score(12, "Ndiaye", 12.0)]);
        state.jury_scores = vec![JuryScore {
            id: 1,
            candidate_id: CandidateId::new(10),
            jury_id: UserId::new(2),
            category_id: CategoryId::new(1),
            total: 24.0,
        }];

        state.accounts = vec![
            Account {
                email: ADMIN_EMAIL.to_string(),
                password: ADMIN_PASSWORD.to_string(),
                token: mint(&identity(1, "Admin One", ADMIN_EMAIL, Role::Admin)),
            },
            Account {
                email: JURY_EMAIL.to_string(),
                password: JURY_PASSWORD.to_string(),
                token: mint(&identity(2, "Jury One", JURY_EMAIL, Role::Jury)),
            },
        ];
        state
    }

    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    /// Requests whose path starts with `prefix`.
    pub fn requests_to(&self, prefix: &str) -> Vec<Seen> {
        self.requests
            .iter()
            .filter(|r| r.path.starts_with(prefix))
            .cloned()
            .collect()
    }
}

pub type Shared = Arc<Mutex<StubState>>;

pub struct TestServer {
    pub base_url: String,
    pub state: Shared,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    pub async fn spawn() -> Self {
        Self::spawn_with(StubState::seeded()).await
    }

    pub async fn spawn_with(state: StubState) -> Self {
        jury_observability::init(jury_observability::LogFormat::Text);

        let state: Shared = Arc::new(Mutex::new(state));
        let app = router(state.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            state,
            handle,
        }
    }

    pub fn state(&self) -> MutexGuard<'_, StubState> {
        self.state.lock().unwrap()
    }

    /// Client context pointed at this server, with a process-local token store.
    pub fn app(&self) -> App {
        let base_url = self.base_url.clone();
        let config = ClientConfig::from_lookup(move |key| match key {
            "JURY_API_URL" => Some(base_url.clone()),
            "JURY_TOKEN_PATH" => Some("/nonexistent/jury/access_token".to_string()),
            "JURY_HTTP_TIMEOUT_SECS" => Some("5".to_string()),
            _ => None,
        })
        .unwrap();
        App::with_storage(config, Arc::new(MemoryTokenStorage::new())).unwrap()
    }

    /// Client context already holding the seeded account's token for `role`.
    pub fn app_as(&self, role: Role) -> App {
        let app = self.app();
        let email = match role {
            Role::Admin => ADMIN_EMAIL,
            Role::Jury => JURY_EMAIL,
        };
        let token = self
            .state()
            .accounts
            .iter()
            .find(|a| a.email == email)
            .map(|a| a.token.clone())
            .unwrap();
        app.session().login(&token).unwrap();
        app
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

pub fn identity(id: i64, name: &str, email: &str, role: Role) -> Identity {
    Identity {
        user_id: UserId::new(id),
        name: name.to_string(),
        email: email.to_string(),
        role,
        expires_at: Some(chrono::Utc::now() + chrono::Duration::minutes(30)),
    }
}

pub fn mint(identity: &Identity) -> String {
    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        identity,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .expect("failed to encode jwt")
}

fn category(id: i64, name: &str) -> Category {
    Category {
        id: CategoryId::new(id),
        name: name.to_string(),
        description: None,
    }
}

fn candidate(id: i64, last: &str, first: &str) -> Candidate {
    Candidate {
        id: CandidateId::new(id),
        last_name: last.to_string(),
        first_name: first.to_string(),
        email: format!("{}@example.org", first.to_lowercase()),
        project: None,
        company: None,
        created_at: Some("2024-05-01T10:00:00".to_string()),
    }
}

fn user(id: i64, name: &str, email: &str, role: Role) -> User {
    User {
        id: UserId::new(id),
        name: name.to_string(),
        email: email.to_string(),
        role,
        created_at: None,
    }
}

fn criterion(id: i64, category: i64, name: &str, max: i64) -> Criterion {
    Criterion {
        id: CriterionId::new(id),
        name: name.to_string(),
        category_id: CategoryId::new(category),
        max_value: max,
    }
}

fn final_score(candidate: i64, last: &str, note: f64) -> FinalScore {
    FinalScore {
        candidate_id: CandidateId::new(candidate),
        last_name: last.to_string(),
        first_name: String::new(),
        email: String::new(),
        project: String::new(),
        final_note: note,
        jury_count: 2,
    }
}

// -------------------------
// Routes
// -------------------------

fn router(state: Shared) -> Router {
    Router::new()
        .route("/auth/login", post(login))
        .route("/candidats/", get(list_candidates).post(create_candidate))
        .route("/candidats/:id", delete(delete_candidate))
        .route("/categories/", get(list_categories).post(create_category))
        .route("/categories/:id", delete(delete_category))
        .route("/categories/:id/candidats", get(category_candidates))
        .route("/categories/:id/jurys", get(category_juries))
        .route("/categories/:id/add_candidat/:cid", post(add_candidate))
        .route("/categories/:id/add_jury/:jid", post(add_jury))
        .route("/categories/:id/remove_candidat/:cid", delete(remove_candidate))
        .route("/categories/:id/remove_jury/:jid", delete(remove_jury))
        .route("/criteres/by_category/:id", get(criteria_by_category))
        .route("/criteres/", post(create_criterion))
        .route("/criteres/:id", delete(delete_criterion))
        .route("/users/", get(list_users).post(create_user))
        .route("/users/:id", delete(delete_user))
        .route("/scores/criteria-score", post(submit_score))
        .route("/scores/jury-scores/:candidate/:category", get(jury_scores))
        .route("/scores/final_scores/:category", get(final_scores))
        .layer(middleware::from_fn_with_state(state.clone(), require_bearer))
        .with_state(state)
}

/// `{"detail": ...}` error body, as the backend sends.
struct Reject(StatusCode, String);

impl IntoResponse for Reject {
    fn into_response(self) -> Response {
        (self.0, Json(json!({ "detail": self.1 }))).into_response()
    }
}

fn not_found(what: &str) -> Reject {
    Reject(StatusCode::NOT_FOUND, format!("{what} not found"))
}

async fn require_bearer(State(state): State<Shared>, req: Request, next: Next) -> Response {
    let authorization = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let path = req.uri().path().to_string();

    state.lock().unwrap().requests.push(Seen {
        method: req.method().to_string(),
        path: path.clone(),
        authorization: authorization.clone(),
    });

    let has_bearer = authorization
        .as_deref()
        .is_some_and(|a| a.starts_with("Bearer "));
    if path != "/auth/login" && !has_bearer {
        return Reject(StatusCode::UNAUTHORIZED, "Not authenticated".to_string()).into_response();
    }
    next.run(req).await
}

#[derive(Deserialize)]
struct LoginForm {
    username: String,
    password: String,
}

async fn login(State(state): State<Shared>, Form(form): Form<LoginForm>) -> Result<Json<Value>, Reject> {
    let state = state.lock().unwrap();
    state
        .accounts
        .iter()
        .find(|a| a.email == form.username && a.password == form.password)
        .map(|a| Json(json!({ "access_token": a.token, "token_type": "bearer" })))
        .ok_or_else(|| Reject(StatusCode::UNAUTHORIZED, "Incorrect email or password".to_string()))
}

async fn list_candidates(State(state): State<Shared>) -> Json<Vec<Candidate>> {
    Json(state.lock().unwrap().candidates.clone())
}

async fn create_candidate(State(state): State<Shared>, Json(input): Json<NewCandidate>) -> Result<Json<Candidate>, Reject> {
    let mut state = state.lock().unwrap();
    if state.candidates.iter().any(|c| c.email == input.email) {
        return Err(Reject(StatusCode::BAD_REQUEST, "Email already registered".to_string()));
    }
    let id = state.next_id();
    let created = Candidate {
        id: CandidateId::new(id),
        last_name: input.last_name,
        first_name: input.first_name,
        email: input.email,
        project: input.project,
        company: input.company,
        created_at: Some("2024-06-01T09:00:00".to_string()),
    };
    state.candidates.push(created.clone());
    Ok(Json(created))
}

async fn delete_candidate(State(state): State<Shared>, Path(id): Path<i64>) -> Result<Json<Value>, Reject> {
    let mut state = state.lock().unwrap();
    let before = state.candidates.len();
    state.candidates.retain(|c| c.id.get() != id);
    if state.candidates.len() == before {
        return Err(not_found("Candidate"));
    }
    Ok(Json(json!({ "message": "Candidate deleted" })))
}

async fn list_categories(State(state): State<Shared>) -> Json<Vec<Category>> {
    Json(state.lock().unwrap().categories.clone())
}

async fn create_category(State(state): State<Shared>, Json(input): Json<NewCategory>) -> Json<Category> {
    let mut state = state.lock().unwrap();
    let id = state.next_id();
    let created = Category {
        id: CategoryId::new(id),
        name: input.name,
        description: input.description,
    };
    state.categories.push(created.clone());
    state.rosters.insert(id, Roster::default());
    Json(created)
}

async fn delete_category(State(state): State<Shared>, Path(id): Path<i64>) -> Result<Json<Value>, Reject> {
    let mut state = state.lock().unwrap();
    let before = state.categories.len();
    state.categories.retain(|c| c.id.get() != id);
    if state.categories.len() == before {
        return Err(not_found("Category"));
    }
    state.rosters.remove(&id);
    Ok(Json(json!({ "message": "Category deleted" })))
}

async fn category_candidates(
    State(state): State<Shared>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<CandidateSummary>>, Reject> {
    let state = state.lock().unwrap();
    let roster = state.rosters.get(&id).ok_or_else(|| not_found("Category"))?;
    let listed = roster
        .candidates
        .iter()
        .filter_map(|cid| state.candidates.iter().find(|c| c.id.get() == *cid))
        .map(|c| CandidateSummary {
            id: c.id,
            last_name: c.last_name.clone(),
            first_name: c.first_name.clone(),
            email: c.email.clone(),
        })
        .collect();
    Ok(Json(listed))
}

async fn category_juries(
    State(state): State<Shared>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<JuryMember>>, Reject> {
    let state = state.lock().unwrap();
    let roster = state.rosters.get(&id).ok_or_else(|| not_found("Category"))?;
    let listed = roster
        .juries
        .iter()
        .filter_map(|jid| state.users.iter().find(|u| u.id.get() == *jid))
        .map(|u| JuryMember {
            id: u.id,
            name: u.name.clone(),
            email: u.email.clone(),
            role: Some(u.role),
        })
        .collect();
    Ok(Json(listed))
}

async fn add_candidate(
    State(state): State<Shared>,
    Path((id, cid)): Path<(i64, i64)>,
) -> Result<Json<Value>, Reject> {
    let mut state = state.lock().unwrap();
    let roster = state.rosters.get_mut(&id).ok_or_else(|| not_found("Category"))?;
    if roster.candidates.contains(&cid) {
        return Err(Reject(StatusCode::BAD_REQUEST, "Candidate already in category".to_string()));
    }
    roster.candidates.push(cid);
    Ok(Json(json!({ "message": "Candidate added to category" })))
}

async fn add_jury(
    State(state): State<Shared>,
    Path((id, jid)): Path<(i64, i64)>,
) -> Result<Json<Value>, Reject> {
    let mut state = state.lock().unwrap();
    let roster = state.rosters.get_mut(&id).ok_or_else(|| not_found("Category"))?;
    if roster.juries.contains(&jid) {
        return Err(Reject(StatusCode::BAD_REQUEST, "Jury already in category".to_string()));
    }
    roster.juries.push(jid);
    Ok(Json(json!({ "message": "Jury added to category" })))
}

async fn remove_candidate(
    State(state): State<Shared>,
    Path((id, cid)): Path<(i64, i64)>,
) -> Result<Json<Value>, Reject> {
    let mut state = state.lock().unwrap();
    let roster = state.rosters.get_mut(&id).ok_or_else(|| not_found("Category"))?;
    let before = roster.candidates.len();
    roster.candidates.retain(|c| *c != cid);
    if roster.candidates.len() == before {
        return Err(not_found("Candidate"));
    }
    Ok(Json(json!({ "message": "Candidate removed from category" })))
}

async fn remove_jury(
    State(state): State<Shared>,
    Path((id, jid)): Path<(i64, i64)>,
) -> Result<Json<Value>, Reject> {
    let mut state = state.lock().unwrap();
    let roster = state.rosters.get_mut(&id).ok_or_else(|| not_found("Category"))?;
    let before = roster.juries.len();
    roster.juries.retain(|j| *j != jid);
    if roster.juries.len() == before {
        return Err(not_found("Jury"));
    }
    Ok(Json(json!({ "message": "Jury removed from category" })))
}

async fn criteria_by_category(State(state): State<Shared>, Path(id): Path<i64>) -> Json<Vec<Criterion>> {
    let state = state.lock().unwrap();
    Json(
        state
            .criteria
            .iter()
            .filter(|c| c.category_id.get() == id)
            .cloned()
            .collect(),
    )
}

async fn create_criterion(State(state): State<Shared>, Json(input): Json<NewCriterion>) -> Json<Criterion> {
    let mut state = state.lock().unwrap();
    let id = state.next_id();
    let created = Criterion {
        id: CriterionId::new(id),
        name: input.name,
        category_id: input.category_id,
        max_value: input.max_value,
    };
    state.criteria.push(created.clone());
    Json(created)
}

async fn delete_criterion(State(state): State<Shared>, Path(id): Path<i64>) -> Result<Json<Value>, Reject> {
    let mut state = state.lock().unwrap();
    let before = state.criteria.len();
    state.criteria.retain(|c| c.id.get() != id);
    if state.criteria.len() == before {
        return Err(not_found("Criterion"));
    }
    Ok(Json(json!({ "message": "Criterion deleted" })))
}

async fn list_users(State(state): State<Shared>) -> Json<Value> {
    let state = state.lock().unwrap();
    if state.malformed_users {
        return Json(json!([{ "id": 1, "nom": "Root", "email": "root@example.org", "role": "root" }]));
    }
    Json(serde_json::to_value(&state.users).unwrap())
}

async fn create_user(State(state): State<Shared>, Json(input): Json<NewUser>) -> Result<Json<User>, Reject> {
    let mut state = state.lock().unwrap();
    if state.users.iter().any(|u| u.email == input.email) {
        return Err(Reject(StatusCode::BAD_REQUEST, "Email already registered".to_string()));
    }
    let id = state.next_id();
    let created = User {
        id: UserId::new(id),
        name: input.name,
        email: input.email,
        role: input.role,
        created_at: Some("2024-06-01T09:00:00".to_string()),
    };
    state.users.push(created.clone());
    Ok(Json(created))
}

async fn delete_user(State(state): State<Shared>, Path(id): Path<i64>) -> Result<Json<Value>, Reject> {
    let mut state = state.lock().unwrap();
    let before = state.users.len();
    state.users.retain(|u| u.id.get() != id);
    if state.users.len() == before {
        return Err(not_found("User"));
    }
    Ok(Json(json!({ "message": "User deleted" })))
}

async fn submit_score(State(state): State<Shared>, Json(body): Json<Value>) -> Result<Json<Value>, Reject> {
    let mut state = state.lock().unwrap();
    state.submitted_scores.push(body);
    if let Some(detail) = state.score_rejection.clone() {
        return Err(Reject(StatusCode::BAD_REQUEST, detail));
    }
    Ok(Json(json!({ "message": "Score created" })))
}

async fn jury_scores(
    State(state): State<Shared>,
    Path((candidate, category)): Path<(i64, i64)>,
) -> Json<Vec<JuryScore>> {
    let state = state.lock().unwrap();
    Json(
        state
            .jury_scores
            .iter()
            .filter(|s| s.candidate_id.get() == candidate && s.category_id.get() == category)
            .cloned()
            .collect(),
    )
}

async fn final_scores(
    State(state): State<Shared>,
    Path(category): Path<i64>,
) -> Result<Json<Vec<FinalScore>>, Reject> {
    let state = state.lock().unwrap();
    state
        .final_scores
        .get(&category)
        .cloned()
        .map(Json)
        .ok_or_else(|| not_found("Final scores"))
}
