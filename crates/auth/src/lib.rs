//! `jury-auth`
//!
//! **Responsibility:** Identity and access rules of the client.
//!
//! - Read the identity out of a bearer token (no signature check)
//! - Gate a navigation target on that identity
//!
//! No IO. No HTTP or storage knowledge.

pub mod claims;
pub mod guard;
pub mod roles;

pub use claims::{Identity, TokenDecodeError, decode_identity};
pub use guard::{Access, guard};
pub use roles::{Role, UnknownRole};
