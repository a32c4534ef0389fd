//! # rolodex-store
//!
//! SQLite-backed storage for the Rolodex contacts API.
//!
//! The crate exposes a synchronous [`Database`] handle that wraps a
//! `rusqlite::Connection` and provides typed CRUD helpers for every domain
//! model.  Schema migrations run automatically before the handle is handed
//! out, so callers never see a half-initialized database.

pub mod contacts;
pub mod database;
pub mod migrations;
pub mod models;
pub mod sessions;
pub mod users;

mod error;

pub use database::Database;
pub use error::StoreError;
pub use models::*;
