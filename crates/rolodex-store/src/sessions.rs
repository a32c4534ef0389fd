//! Session (bearer token) persistence.

use chrono::Utc;
use rusqlite::params;
use uuid::Uuid;

use crate::database::Database;
use crate::error::{Result, StoreError};
use crate::models::Session;

impl Database {
    /// Record a newly issued token.  The caller hashes the raw token; only
    /// the hash is stored.
    pub fn create_session(&self, token_hash: &str, user_id: Uuid) -> Result<Session> {
        let now = Utc::now();

        self.conn().execute(
            "INSERT INTO sessions (token_hash, user_id, created_at)
             VALUES (?1, ?2, ?3)",
            params![token_hash, user_id.to_string(), now.to_rfc3339()],
        )?;

        Ok(Session {
            token_hash: token_hash.to_string(),
            user_id,
            created_at: now,
        })
    }

    /// Resolve a token hash to the user it authenticates.
    pub fn find_session_user(&self, token_hash: &str) -> Result<Uuid> {
        let user_id_str: String = self
            .conn()
            .query_row(
                "SELECT user_id FROM sessions WHERE token_hash = ?1",
                params![token_hash],
                |row| row.get(0),
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound,
                other => StoreError::Sqlite(other),
            })?;

        Ok(Uuid::parse_str(&user_id_str)?)
    }
}
