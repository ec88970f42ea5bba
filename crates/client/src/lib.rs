//! `jury-client`
//!
//! **Responsibility:** Terminal client of the jury evaluation backend.
//!
//! This crate provides:
//! - The session store (token persistence + decoded identity)
//! - A typed API client passing the session token as bearer credential
//! - Route resolution through the role guard
//! - One view-model per page screen, and the `jury` command line on top
//!
//! The client is a **thin shell** around the backend: it owns no data and
//! retries nothing.

pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod forms;
pub mod notify;
pub mod render;
pub mod routes;
pub mod screens;
pub mod session;
pub mod storage;
pub mod types;

pub use api::{ApiClient, ApiError};
pub use app::{App, AppError};
pub use config::{ClientConfig, ConfigError};
pub use forms::FormError;
pub use notify::{Notification, Severity};
pub use routes::{Navigation, Route};
pub use session::{Session, SessionStore};
pub use storage::{FileTokenStorage, MemoryTokenStorage, StorageError, TokenStorage};
