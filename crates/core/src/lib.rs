//! `jury-core`: foundation types shared by the jury evaluation client.
//!
//! Pure data: identifiers, the entity contract and the id parse error.
//! No IO, no transport.

pub mod entity;
pub mod error;
pub mod id;

pub use entity::{Entity, find_by_id};
pub use error::DomainError;
pub use id::{CandidateId, CategoryId, CriterionId, UserId};
