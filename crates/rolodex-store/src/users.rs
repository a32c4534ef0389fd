//! CRUD operations for [`User`] records.

use chrono::{DateTime, Utc};
use rusqlite::params;
use uuid::Uuid;

use crate::database::Database;
use crate::error::{Result, StoreError};
use crate::models::User;

impl Database {
    // ------------------------------------------------------------------
    // Create
    // ------------------------------------------------------------------

    /// Insert a new user.
    pub fn create_user(&self, user: &User) -> Result<()> {
        self.conn().execute(
            "INSERT INTO users (id, email, username, password_hash, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                user.id.to_string(),
                user.email,
                user.username,
                user.password_hash,
                user.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Read
    // ------------------------------------------------------------------

    /// Fetch a single user by UUID.
    pub fn get_user(&self, id: Uuid) -> Result<User> {
        self.conn()
            .query_row(
                "SELECT id, email, username, password_hash, created_at
                 FROM users
                 WHERE id = ?1",
                params![id.to_string()],
                row_to_user,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound,
                other => StoreError::Sqlite(other),
            })
    }

    /// Fetch a single user by email address (signin lookup).
    pub fn find_user_by_email(&self, email: &str) -> Result<User> {
        self.conn()
            .query_row(
                "SELECT id, email, username, password_hash, created_at
                 FROM users
                 WHERE email = ?1",
                params![email],
                row_to_user,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound,
                other => StoreError::Sqlite(other),
            })
    }

    /// List all users, in signup order.
    pub fn list_users(&self) -> Result<Vec<User>> {
        let mut stmt = self.conn().prepare(
            "SELECT id, email, username, password_hash, created_at
             FROM users
             ORDER BY created_at ASC",
        )?;

        let rows = stmt.query_map([], row_to_user)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(StoreError::Sqlite)
    }

    /// Whether a user with this email already exists (signup uniqueness).
    pub fn email_taken(&self, email: &str) -> Result<bool> {
        let count: i64 = self.conn().query_row(
            "SELECT COUNT(*) FROM users WHERE email = ?1",
            params![email],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Whether a user with this username already exists (signup uniqueness).
    pub fn username_taken(&self, username: &str) -> Result<bool> {
        let count: i64 = self.conn().query_row(
            "SELECT COUNT(*) FROM users WHERE username = ?1",
            params![username],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Map a `rusqlite::Row` to a [`User`].
fn row_to_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    let id_str: String = row.get(0)?;
    let email: String = row.get(1)?;
    let username: String = row.get(2)?;
    let password_hash: String = row.get(3)?;
    let created_str: String = row.get(4)?;

    let id = Uuid::parse_str(&id_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })?;

    let created_at: DateTime<Utc> = DateTime::parse_from_rfc3339(&created_str)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
        })?;

    Ok(User {
        id,
        email,
        username,
        password_hash,
        created_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_db(dir: &tempfile::TempDir) -> Database {
        Database::open_at(&dir.path().join("test.db")).unwrap()
    }

    fn sample_user(email: &str, username: &str) -> User {
        User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            username: username.to_string(),
            password_hash: "salt$hash".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn create_and_fetch_user() {
        let dir = tempfile::tempdir().unwrap();
        let db = open_db(&dir);

        let user = sample_user("a@example.com", "alice");
        db.create_user(&user).unwrap();

        let fetched = db.get_user(user.id).unwrap();
        assert_eq!(fetched.email, "a@example.com");
        assert_eq!(fetched.username, "alice");

        let by_email = db.find_user_by_email("a@example.com").unwrap();
        assert_eq!(by_email.id, user.id);
    }

    #[test]
    fn missing_user_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let db = open_db(&dir);

        assert!(matches!(
            db.get_user(Uuid::new_v4()),
            Err(StoreError::NotFound)
        ));
        assert!(matches!(
            db.find_user_by_email("nobody@example.com"),
            Err(StoreError::NotFound)
        ));
    }

    #[test]
    fn uniqueness_checks() {
        let dir = tempfile::tempdir().unwrap();
        let db = open_db(&dir);

        db.create_user(&sample_user("a@example.com", "alice"))
            .unwrap();

        assert!(db.email_taken("a@example.com").unwrap());
        assert!(!db.email_taken("b@example.com").unwrap());
        assert!(db.username_taken("alice").unwrap());
        assert!(!db.username_taken("bob").unwrap());
    }

    #[test]
    fn duplicate_email_is_rejected_by_schema() {
        let dir = tempfile::tempdir().unwrap();
        let db = open_db(&dir);

        db.create_user(&sample_user("a@example.com", "alice"))
            .unwrap();
        let dup = sample_user("a@example.com", "alice2");
        assert!(db.create_user(&dup).is_err());
    }

    #[test]
    fn list_users_in_signup_order() {
        let dir = tempfile::tempdir().unwrap();
        let db = open_db(&dir);

        let mut alice = sample_user("a@example.com", "alice");
        alice.created_at = Utc::now() - chrono::Duration::seconds(10);
        let bob = sample_user("b@example.com", "bob");

        db.create_user(&alice).unwrap();
        db.create_user(&bob).unwrap();

        let users = db.list_users().unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].username, "alice");
        assert_eq!(users[1].username, "bob");
    }
}
