use chrono::{DateTime, Utc};
use jsonwebtoken::{DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use jury_core::UserId;

use crate::Role;

/// Identity claims carried by the backend-issued access token.
///
/// The client never holds the signing secret, so these claims are *read*,
/// not verified: the backend re-verifies the token on every request and
/// remains the authority. The identity only drives what the client shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Subject identifier (the user's primary key).
    pub user_id: UserId,

    /// Display name.
    #[serde(rename = "nom")]
    pub name: String,

    pub email: String,

    pub role: Role,

    /// Expiration timestamp, when the token carries one.
    #[serde(
        rename = "exp",
        default,
        with = "chrono::serde::ts_seconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub expires_at: Option<DateTime<Utc>>,
}

impl Identity {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Whether the token's `exp` claim lies in the past.
    ///
    /// Tokens without `exp` never expire from the client's point of view.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|exp| now >= exp)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenDecodeError {
    #[error("token is empty")]
    Empty,

    #[error("malformed token: {0}")]
    Malformed(String),
}

/// Decode the identity claims of a bearer token without verifying its signature.
///
/// - No IO
/// - No panics
/// - Expiry is *not* enforced here; see [`Identity::is_expired`].
pub fn decode_identity(token: &str) -> Result<Identity, TokenDecodeError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(TokenDecodeError::Empty);
    }

    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    jsonwebtoken::decode::<Identity>(token, &DecodingKey::from_secret(&[]), &validation)
        .map(|data| data.claims)
        .map_err(|e| TokenDecodeError::Malformed(e.to_string()))
}
