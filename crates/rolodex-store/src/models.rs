//! Domain model structs persisted in the SQLite database.
//!
//! Every struct derives `Serialize` and `Deserialize` so it can be handed
//! directly to the HTTP layer as a JSON body.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

/// A registered account.  Created on signup; never mutated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    /// Unique user identifier.
    pub id: Uuid,
    /// Email address (unique across users).
    pub email: String,
    /// Display / login name (unique across users).
    pub username: String,
    /// Opaque salted credential hash.  Never serialized to API responses;
    /// the server layer strips it before replying.
    pub password_hash: String,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Contact
// ---------------------------------------------------------------------------

/// A contact-book entry, owned by exactly one user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Contact {
    /// Unique contact identifier.
    pub id: Uuid,
    /// The contact's full name.
    pub fullname: String,
    /// The contact's email address (not required to be unique).
    pub email: String,
    /// Telephone number, stored verbatim.
    pub telephone: String,
    /// Postal address, stored verbatim.
    pub address: String,
    /// Owning user.  Ownership never changes after creation.
    pub user_id: Uuid,
    /// Whether the owner has starred this contact.
    pub is_starred: bool,
    /// When the contact was created.
    pub created_at: DateTime<Utc>,
    /// Last time the contact's fields were overwritten.
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// An issued bearer token, stored by its hash.  Rows accumulate; there is
/// no expiry in this core.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    /// blake3 hex digest of the raw token handed to the client.
    pub token_hash: String,
    /// The user this token authenticates.
    pub user_id: Uuid,
    /// When the token was issued.
    pub created_at: DateTime<Utc>,
}

/// Input fields for creating or updating a contact.  Update overwrites all
/// four fields unconditionally; there is no partial update.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContactFields {
    pub fullname: String,
    pub email: String,
    pub telephone: String,
    pub address: String,
}
