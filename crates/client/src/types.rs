//! Request/response shapes of the evaluation backend.
//!
//! Field names are English on the Rust side; `serde` renames map them to the
//! backend's wire names. Deserialising into these types *is* the schema check:
//! a payload that does not fit is rejected instead of being passed through.

use serde::{Deserialize, Deserializer, Serialize};

use jury_auth::Role;
use jury_core::{CandidateId, CategoryId, CriterionId, Entity, UserId};

/// Successful `POST /auth/login` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
}

/// Generic `{ "message": ... }` acknowledgement, e.g. "Score created".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

// -------------------------
// Candidates
// -------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: CandidateId,
    #[serde(rename = "nom")]
    pub last_name: String,
    #[serde(rename = "prenom")]
    pub first_name: String,
    pub email: String,
    #[serde(rename = "projet", default)]
    pub project: Option<String>,
    #[serde(rename = "entreprise", default)]
    pub company: Option<String>,
    #[serde(rename = "date_creation", default)]
    pub created_at: Option<String>,
}

impl Candidate {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCandidate {
    #[serde(rename = "nom")]
    pub last_name: String,
    #[serde(rename = "prenom")]
    pub first_name: String,
    pub email: String,
    #[serde(rename = "projet", skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    #[serde(rename = "entreprise", skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
}

/// Candidate as listed in a category roster (`GET /categories/{id}/candidats`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateSummary {
    pub id: CandidateId,
    #[serde(rename = "nom")]
    pub last_name: String,
    #[serde(rename = "prenom")]
    pub first_name: String,
    pub email: String,
}

impl CandidateSummary {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

// -------------------------
// Categories
// -------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    #[serde(rename = "nom")]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCategory {
    #[serde(rename = "nom")]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Jury member as listed in a category roster (`GET /categories/{id}/jurys`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JuryMember {
    pub id: UserId,
    #[serde(rename = "nom")]
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: Option<Role>,
}

// -------------------------
// Criteria
// -------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Criterion {
    pub id: CriterionId,
    #[serde(rename = "nom")]
    pub name: String,
    #[serde(rename = "categorie_id")]
    pub category_id: CategoryId,
    #[serde(rename = "valeur_max")]
    pub max_value: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCriterion {
    #[serde(rename = "nom")]
    pub name: String,
    #[serde(rename = "categorie_id")]
    pub category_id: CategoryId,
    #[serde(rename = "valeur_max")]
    pub max_value: i64,
}

// -------------------------
// Users
// -------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    #[serde(rename = "nom")]
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(rename = "date_creation", default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    #[serde(rename = "nom")]
    pub name: String,
    pub email: String,
    #[serde(rename = "mot_de_passe")]
    pub password: String,
    pub role: Role,
}

// -------------------------
// Scores
// -------------------------

/// Body of `POST /scores/criteria-score` (creates or updates).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriteriaScoreInput {
    #[serde(rename = "candidat_id")]
    pub candidate_id: CandidateId,
    pub jury_id: UserId,
    #[serde(rename = "categorie_id")]
    pub category_id: CategoryId,
    #[serde(rename = "critere_id")]
    pub criterion_id: CriterionId,
    pub note: f64,
    #[serde(rename = "commentaire", skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// One jury member's total for a candidate in a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JuryScore {
    pub id: i64,
    #[serde(rename = "candidat_id")]
    pub candidate_id: CandidateId,
    pub jury_id: UserId,
    #[serde(rename = "categorie_id")]
    pub category_id: CategoryId,
    #[serde(rename = "note_totale", deserialize_with = "finite")]
    pub total: f64,
}

/// Backend-aggregated result of one candidate in a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalScore {
    #[serde(rename = "candidat_id")]
    pub candidate_id: CandidateId,
    #[serde(rename = "nom_candidat")]
    pub last_name: String,
    #[serde(rename = "prenom_candidat", default)]
    pub first_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(rename = "projet", default)]
    pub project: String,
    #[serde(rename = "note_finale", deserialize_with = "finite")]
    pub final_note: f64,
    #[serde(rename = "nb_jury")]
    pub jury_count: u32,
}

impl FinalScore {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

fn finite<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(serde::de::Error::custom("score must be a finite number"))
    }
}

macro_rules! impl_entity {
    ($t:ty, $id:ty) => {
        impl Entity for $t {
            type Id = $id;

            fn id(&self) -> $id {
                self.id
            }
        }
    };
}

impl_entity!(Candidate, CandidateId);
impl_entity!(CandidateSummary, CandidateId);
impl_entity!(Category, CategoryId);
impl_entity!(JuryMember, UserId);
impl_entity!(Criterion, CriterionId);
impl_entity!(User, UserId);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn final_score_reads_backend_shape() {
        let score: FinalScore = serde_json::from_value(json!({
            "candidat_id": 4,
            "nom_candidat": "Ndiaye",
            "prenom_candidat": "Fatou",
            "email": "fatou@example.org",
            "projet": "",
            "note_finale": 15.5,
            "nb_jury": 3
        }))
        .unwrap();

        assert_eq!(score.candidate_id, CandidateId::new(4));
        assert_eq!(score.full_name(), "Fatou Ndiaye");
        assert_eq!(score.jury_count, 3);
    }

    #[test]
    fn malformed_payloads_are_rejected() {
        let missing_note = json!({ "candidat_id": 4, "nom_candidat": "X", "nb_jury": 1 });
        assert!(serde_json::from_value::<FinalScore>(missing_note).is_err());

        let negative_count = json!({
            "candidat_id": 4, "nom_candidat": "X", "note_finale": 1.0, "nb_jury": -1
        });
        assert!(serde_json::from_value::<FinalScore>(negative_count).is_err());

        let bad_role = json!({ "id": 1, "nom": "A", "email": "a@b.c", "role": "root" });
        assert!(serde_json::from_value::<User>(bad_role).is_err());
    }

    #[test]
    fn score_input_uses_wire_names_and_omits_empty_comment() {
        let input = CriteriaScoreInput {
            candidate_id: CandidateId::new(1),
            jury_id: UserId::new(2),
            category_id: CategoryId::new(3),
            criterion_id: CriterionId::new(4),
            note: 12.0,
            comment: None,
        };
        let value = serde_json::to_value(&input).unwrap();

        assert_eq!(
            value,
            json!({
                "candidat_id": 1,
                "jury_id": 2,
                "categorie_id": 3,
                "critere_id": 4,
                "note": 12.0
            })
        );
    }

    #[test]
    fn new_user_serialises_password_under_backend_name() {
        let user = NewUser {
            name: "Jury One".to_string(),
            email: "j1@example.org".to_string(),
            password: "secret".to_string(),
            role: Role::Jury,
        };
        let value = serde_json::to_value(&user).unwrap();

        assert_eq!(value["mot_de_passe"], "secret");
        assert_eq!(value["role"], "jury");
        assert_eq!(value["nom"], "Jury One");
    }
}
