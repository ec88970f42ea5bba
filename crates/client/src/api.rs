//! Typed client for the evaluation backend.
//!
//! A direct passthrough: the session token is attached as bearer credential,
//! responses are deserialised into the types of [`crate::types`], and any
//! non-success status is surfaced with the backend's own message. No retry,
//! no caching, no batching.

use reqwest::{Method, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use jury_core::{CandidateId, CategoryId, CriterionId, UserId};

use crate::config::ClientConfig;
use crate::session::SessionStore;
use crate::types::{
    Candidate, CandidateSummary, Category, CriteriaScoreInput, Criterion, FinalScore, JuryMember,
    JuryScore, LoginResponse, MessageResponse, NewCandidate, NewCategory, NewCriterion, NewUser,
    User,
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("http client setup failed: {0}")]
    Setup(String),

    #[error("network error: {0}")]
    Network(String),

    /// Non-success status. `detail` is the backend's own message, when the
    /// error body carried one.
    #[error("{}", backend_message(.status, .detail))]
    Backend { status: u16, detail: Option<String> },

    #[error("unexpected response payload: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Backend { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The message the backend put in its error body, if any.
    pub fn backend_detail(&self) -> Option<&str> {
        match self {
            ApiError::Backend { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}

fn backend_message(status: &u16, detail: &Option<String>) -> String {
    match detail {
        Some(detail) => detail.clone(),
        None => format!("request failed with status {status}"),
    }
}

/// Pull a human-readable message out of an error body.
///
/// Understands `{"detail": "..."}`, the validation shape
/// `{"detail": [{"msg": "..."}, ...]}` and `{"message": "..."}`.
pub fn extract_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;

    match value.get("detail") {
        Some(Value::String(s)) if !s.trim().is_empty() => return Some(s.clone()),
        Some(Value::Array(items)) => {
            let msgs: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect();
            if !msgs.is_empty() {
                return Some(msgs.join("; "));
            }
        }
        _ => {}
    }

    value
        .get("message")
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
}

/// Client for the evaluation REST API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: SessionStore,
}

impl ApiClient {
    pub fn new(config: &ClientConfig, session: SessionStore) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::Setup(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.api_url.clone(),
            session,
        })
    }

    /// Client with default transport settings against `base_url`.
    pub fn with_base_url(base_url: impl Into<String>, session: SessionStore) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
        }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    // -------------------------
    // Auth
    // -------------------------

    /// Exchange credentials for an access token (form-encoded, no bearer).
    ///
    /// This does not touch the session; callers hand the token to
    /// [`SessionStore::login`].
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let req = self
            .http
            .post(self.url("/auth/login"))
            .form(&[("username", email), ("password", password)]);
        let resp = self.dispatch(Method::POST, "/auth/login", req).await?;
        decode(resp).await
    }

    // -------------------------
    // Candidates
    // -------------------------

    pub async fn list_candidates(&self) -> Result<Vec<Candidate>, ApiError> {
        self.get("/candidats/").await
    }

    pub async fn create_candidate(&self, candidate: &NewCandidate) -> Result<Candidate, ApiError> {
        self.post("/candidats/", candidate).await
    }

    pub async fn delete_candidate(&self, id: CandidateId) -> Result<(), ApiError> {
        self.delete(&format!("/candidats/{id}")).await
    }

    // -------------------------
    // Categories
    // -------------------------

    pub async fn list_categories(&self) -> Result<Vec<Category>, ApiError> {
        self.get("/categories/").await
    }

    pub async fn create_category(&self, category: &NewCategory) -> Result<Category, ApiError> {
        self.post("/categories/", category).await
    }

    pub async fn delete_category(&self, id: CategoryId) -> Result<(), ApiError> {
        self.delete(&format!("/categories/{id}")).await
    }

    pub async fn category_candidates(
        &self,
        category: CategoryId,
    ) -> Result<Vec<CandidateSummary>, ApiError> {
        self.get(&format!("/categories/{category}/candidats")).await
    }

    pub async fn category_juries(&self, category: CategoryId) -> Result<Vec<JuryMember>, ApiError> {
        self.get(&format!("/categories/{category}/jurys")).await
    }

    pub async fn add_candidate_to_category(
        &self,
        category: CategoryId,
        candidate: CandidateId,
    ) -> Result<MessageResponse, ApiError> {
        self.send_ack(Method::POST, &format!("/categories/{category}/add_candidat/{candidate}"))
            .await
    }

    pub async fn add_jury_to_category(
        &self,
        category: CategoryId,
        jury: UserId,
    ) -> Result<MessageResponse, ApiError> {
        self.send_ack(Method::POST, &format!("/categories/{category}/add_jury/{jury}"))
            .await
    }

    pub async fn remove_candidate_from_category(
        &self,
        category: CategoryId,
        candidate: CandidateId,
    ) -> Result<MessageResponse, ApiError> {
        self.send_ack(
            Method::DELETE,
            &format!("/categories/{category}/remove_candidat/{candidate}"),
        )
        .await
    }

    pub async fn remove_jury_from_category(
        &self,
        category: CategoryId,
        jury: UserId,
    ) -> Result<MessageResponse, ApiError> {
        self.send_ack(Method::DELETE, &format!("/categories/{category}/remove_jury/{jury}"))
            .await
    }

    // -------------------------
    // Criteria
    // -------------------------

    pub async fn criteria_by_category(
        &self,
        category: CategoryId,
    ) -> Result<Vec<Criterion>, ApiError> {
        self.get(&format!("/criteres/by_category/{category}")).await
    }

    pub async fn create_criterion(&self, criterion: &NewCriterion) -> Result<Criterion, ApiError> {
        self.post("/criteres/", criterion).await
    }

    pub async fn delete_criterion(&self, id: CriterionId) -> Result<(), ApiError> {
        self.delete(&format!("/criteres/{id}")).await
    }

    // -------------------------
    // Users
    // -------------------------

    pub async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        self.get("/users/").await
    }

    pub async fn create_user(&self, user: &NewUser) -> Result<User, ApiError> {
        self.post("/users/", user).await
    }

    pub async fn delete_user(&self, id: UserId) -> Result<(), ApiError> {
        self.delete(&format!("/users/{id}")).await
    }

    // -------------------------
    // Scores
    // -------------------------

    /// Create or update one jury member's note on one criterion.
    pub async fn submit_criteria_score(
        &self,
        score: &CriteriaScoreInput,
    ) -> Result<MessageResponse, ApiError> {
        self.post("/scores/criteria-score", score).await
    }

    pub async fn jury_scores(
        &self,
        candidate: CandidateId,
        category: CategoryId,
    ) -> Result<Vec<JuryScore>, ApiError> {
        self.get(&format!("/scores/jury-scores/{candidate}/{category}"))
            .await
    }

    pub async fn final_scores(&self, category: CategoryId) -> Result<Vec<FinalScore>, ApiError> {
        self.get(&format!("/scores/final_scores/{category}")).await
    }

    // -------------------------
    // Plumbing
    // -------------------------

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Build a request with the current session token attached.
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let req = self.http.request(method, self.url(path));
        match self.session.token() {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn dispatch(
        &self,
        method: Method,
        path: &str,
        req: RequestBuilder,
    ) -> Result<Response, ApiError> {
        tracing::debug!(%method, path, "api request");

        let resp = req.send().await.map_err(|e| {
            tracing::warn!(%method, path, error = %e, "api request failed to complete");
            ApiError::Network(e.to_string())
        })?;

        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let body = resp.text().await.unwrap_or_default();
        let detail = extract_detail(&body);
        tracing::warn!(%method, path, status = status.as_u16(), detail = ?detail, "api request rejected");

        Err(ApiError::Backend {
            status: status.as_u16(),
            detail,
        })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let req = self.request(Method::GET, path);
        let resp = self.dispatch(Method::GET, path, req).await?;
        decode(resp).await
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let req = self.request(Method::POST, path).json(body);
        let resp = self.dispatch(Method::POST, path, req).await?;
        decode(resp).await
    }

    /// Body-less call answered by an optional `{ "message": ... }`.
    async fn send_ack(&self, method: Method, path: &str) -> Result<MessageResponse, ApiError> {
        let req = self.request(method.clone(), path);
        let resp = self.dispatch(method, path, req).await?;
        decode_optional(resp).await
    }

    async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let req = self.request(Method::DELETE, path);
        self.dispatch(Method::DELETE, path, req).await?;
        Ok(())
    }
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, ApiError> {
    let bytes = resp
        .bytes()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;

    serde_json::from_slice(&bytes).map_err(|e| {
        tracing::warn!(error = %e, "api response did not match the expected schema");
        ApiError::Decode(e.to_string())
    })
}

async fn decode_optional(resp: Response) -> Result<MessageResponse, ApiError> {
    let bytes = resp
        .bytes()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;

    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(MessageResponse {
            message: String::new(),
        });
    }

    serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_string_detail() {
        assert_eq!(
            extract_detail(r#"{"detail":"note invalide"}"#).as_deref(),
            Some("note invalide")
        );
    }

    #[test]
    fn joins_validation_messages() {
        let body = r#"{"detail":[{"loc":["body","email"],"msg":"value is not a valid email address"},{"msg":"field required"}]}"#;
        assert_eq!(
            extract_detail(body).as_deref(),
            Some("value is not a valid email address; field required")
        );
    }

    #[test]
    fn falls_back_to_message_then_nothing() {
        assert_eq!(
            extract_detail(r#"{"message":"boom"}"#).as_deref(),
            Some("boom")
        );
        assert_eq!(extract_detail(r#"{"detail":""}"#), None);
        assert_eq!(extract_detail("<html>502</html>"), None);
        assert_eq!(extract_detail(""), None);
    }

    #[test]
    fn backend_error_displays_detail_or_generic_text() {
        let with_detail = ApiError::Backend {
            status: 400,
            detail: Some("Email déjà utilisé".to_string()),
        };
        assert_eq!(with_detail.to_string(), "Email déjà utilisé");

        let without = ApiError::Backend {
            status: 500,
            detail: None,
        };
        assert_eq!(without.to_string(), "request failed with status 500");
        assert_eq!(without.backend_detail(), None);
    }
}
