//! CRUD and starring operations for [`Contact`] records.
//!
//! Every id-based operation goes through [`Database::owned_contact`], the
//! single authorization gate: a contact that does not exist and a contact
//! owned by someone else are indistinguishable to the caller (both are
//! `NotFound`).

use chrono::{DateTime, Utc};
use rusqlite::params;
use uuid::Uuid;

use crate::database::Database;
use crate::error::{Result, StoreError};
use crate::models::{Contact, ContactFields};

const CONTACT_COLUMNS: &str =
    "id, fullname, email, telephone, address, user_id, is_starred, created_at, updated_at";

impl Database {
    // ------------------------------------------------------------------
    // Create
    // ------------------------------------------------------------------

    /// Insert a new contact owned by `user_id` and return the stored record.
    pub fn create_contact(&self, user_id: Uuid, fields: &ContactFields) -> Result<Contact> {
        let now = Utc::now();
        let contact = Contact {
            id: Uuid::new_v4(),
            fullname: fields.fullname.clone(),
            email: fields.email.clone(),
            telephone: fields.telephone.clone(),
            address: fields.address.clone(),
            user_id,
            is_starred: false,
            created_at: now,
            updated_at: now,
        };

        self.conn().execute(
            "INSERT INTO contacts
                 (id, fullname, email, telephone, address, user_id, is_starred,
                  created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                contact.id.to_string(),
                contact.fullname,
                contact.email,
                contact.telephone,
                contact.address,
                contact.user_id.to_string(),
                contact.is_starred,
                contact.created_at.to_rfc3339(),
                contact.updated_at.to_rfc3339(),
            ],
        )?;

        Ok(contact)
    }

    // ------------------------------------------------------------------
    // Read
    // ------------------------------------------------------------------

    /// Fetch a contact by id, but only if `user_id` owns it.
    ///
    /// This is the ownership gate: show, update, destroy, and star all
    /// resolve their target through this single query.
    pub fn owned_contact(&self, user_id: Uuid, id: Uuid) -> Result<Contact> {
        let sql = format!(
            "SELECT {CONTACT_COLUMNS} FROM contacts WHERE id = ?1 AND user_id = ?2"
        );
        self.conn()
            .query_row(
                &sql,
                params![id.to_string(), user_id.to_string()],
                row_to_contact,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound,
                other => StoreError::Sqlite(other),
            })
    }

    /// List all contacts owned by `user_id`, in insertion order.
    pub fn list_contacts_for_user(&self, user_id: Uuid) -> Result<Vec<Contact>> {
        let sql = format!(
            "SELECT {CONTACT_COLUMNS} FROM contacts
             WHERE user_id = ?1
             ORDER BY created_at ASC"
        );
        let mut stmt = self.conn().prepare(&sql)?;

        let rows = stmt.query_map(params![user_id.to_string()], row_to_contact)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(StoreError::Sqlite)
    }

    /// List `user_id`'s starred contacts, in insertion order.
    pub fn list_starred_for_user(&self, user_id: Uuid) -> Result<Vec<Contact>> {
        let sql = format!(
            "SELECT {CONTACT_COLUMNS} FROM contacts
             WHERE user_id = ?1 AND is_starred = 1
             ORDER BY created_at ASC"
        );
        let mut stmt = self.conn().prepare(&sql)?;

        let rows = stmt.query_map(params![user_id.to_string()], row_to_contact)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(StoreError::Sqlite)
    }

    // ------------------------------------------------------------------
    // Update
    // ------------------------------------------------------------------

    /// Overwrite all four mutable fields of an owned contact.
    ///
    /// There is no partial update; the caller supplies every field.  Returns
    /// the updated record, or `NotFound` if the contact is missing or owned
    /// by another user.
    pub fn update_contact(
        &self,
        user_id: Uuid,
        id: Uuid,
        fields: &ContactFields,
    ) -> Result<Contact> {
        let mut contact = self.owned_contact(user_id, id)?;
        let now = Utc::now();

        self.conn().execute(
            "UPDATE contacts
             SET fullname = ?1, email = ?2, telephone = ?3, address = ?4,
                 updated_at = ?5
             WHERE id = ?6",
            params![
                fields.fullname,
                fields.email,
                fields.telephone,
                fields.address,
                now.to_rfc3339(),
                id.to_string(),
            ],
        )?;

        contact.fullname = fields.fullname.clone();
        contact.email = fields.email.clone();
        contact.telephone = fields.telephone.clone();
        contact.address = fields.address.clone();
        contact.updated_at = now;
        Ok(contact)
    }

    /// Set the starred flag on an owned contact.
    ///
    /// Starring an already-starred contact is a no-op (idempotent).
    pub fn star_contact(&self, user_id: Uuid, id: Uuid) -> Result<Contact> {
        let mut contact = self.owned_contact(user_id, id)?;

        self.conn().execute(
            "UPDATE contacts SET is_starred = 1 WHERE id = ?1",
            params![id.to_string()],
        )?;

        contact.is_starred = true;
        Ok(contact)
    }

    // ------------------------------------------------------------------
    // Delete
    // ------------------------------------------------------------------

    /// Delete an owned contact.  Returns `NotFound` if the contact is missing
    /// or owned by another user; the store is unchanged in that case.
    pub fn delete_contact(&self, user_id: Uuid, id: Uuid) -> Result<()> {
        let affected = self.conn().execute(
            "DELETE FROM contacts WHERE id = ?1 AND user_id = ?2",
            params![id.to_string(), user_id.to_string()],
        )?;
        if affected == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Map a `rusqlite::Row` to a [`Contact`].
fn row_to_contact(row: &rusqlite::Row<'_>) -> rusqlite::Result<Contact> {
    let id_str: String = row.get(0)?;
    let fullname: String = row.get(1)?;
    let email: String = row.get(2)?;
    let telephone: String = row.get(3)?;
    let address: String = row.get(4)?;
    let user_id_str: String = row.get(5)?;
    let is_starred: bool = row.get(6)?;
    let created_str: String = row.get(7)?;
    let updated_str: String = row.get(8)?;

    let id = Uuid::parse_str(&id_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })?;
    let user_id = Uuid::parse_str(&user_id_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(5, rusqlite::types::Type::Text, Box::new(e))
    })?;

    let created_at: DateTime<Utc> = DateTime::parse_from_rfc3339(&created_str)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(7, rusqlite::types::Type::Text, Box::new(e))
        })?;
    let updated_at: DateTime<Utc> = DateTime::parse_from_rfc3339(&updated_str)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(8, rusqlite::types::Type::Text, Box::new(e))
        })?;

    Ok(Contact {
        id,
        fullname,
        email,
        telephone,
        address,
        user_id,
        is_starred,
        created_at,
        updated_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::User;

    fn open_db(dir: &tempfile::TempDir) -> Database {
        Database::open_at(&dir.path().join("test.db")).unwrap()
    }

    fn make_user(db: &Database, email: &str, username: &str) -> Uuid {
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            username: username.to_string(),
            password_hash: "salt$hash".to_string(),
            created_at: Utc::now(),
        };
        db.create_user(&user).unwrap();
        user.id
    }

    fn fields(name: &str) -> ContactFields {
        ContactFields {
            fullname: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            telephone: "+15550100".to_string(),
            address: "1 Main St".to_string(),
        }
    }

    #[test]
    fn list_returns_only_own_contacts() {
        let dir = tempfile::tempdir().unwrap();
        let db = open_db(&dir);

        let alice = make_user(&db, "a@example.com", "alice");
        let bob = make_user(&db, "b@example.com", "bob");

        let c1 = db.create_contact(alice, &fields("Carol")).unwrap();
        let c2 = db.create_contact(alice, &fields("Dave")).unwrap();
        db.create_contact(bob, &fields("Eve")).unwrap();

        let listed = db.list_contacts_for_user(alice).unwrap();
        let ids: Vec<Uuid> = listed.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![c1.id, c2.id]);
    }

    #[test]
    fn ownership_gate_hides_foreign_contacts() {
        let dir = tempfile::tempdir().unwrap();
        let db = open_db(&dir);

        let alice = make_user(&db, "a@example.com", "alice");
        let bob = make_user(&db, "b@example.com", "bob");

        let contact = db.create_contact(alice, &fields("Carol")).unwrap();

        // Owner sees it, the other user does not.
        assert!(db.owned_contact(alice, contact.id).is_ok());
        assert!(matches!(
            db.owned_contact(bob, contact.id),
            Err(StoreError::NotFound)
        ));
        assert!(matches!(
            db.update_contact(bob, contact.id, &fields("Mallory")),
            Err(StoreError::NotFound)
        ));
        assert!(matches!(
            db.delete_contact(bob, contact.id),
            Err(StoreError::NotFound)
        ));

        // Still there and unchanged.
        let fetched = db.owned_contact(alice, contact.id).unwrap();
        assert_eq!(fetched.fullname, "Carol");
    }

    #[test]
    fn update_overwrites_all_fields() {
        let dir = tempfile::tempdir().unwrap();
        let db = open_db(&dir);

        let alice = make_user(&db, "a@example.com", "alice");
        let contact = db.create_contact(alice, &fields("Carol")).unwrap();

        let updated = db
            .update_contact(alice, contact.id, &fields("Caroline"))
            .unwrap();
        assert_eq!(updated.fullname, "Caroline");
        assert_eq!(updated.email, "caroline@example.com");
        assert!(updated.updated_at >= contact.updated_at);

        let fetched = db.owned_contact(alice, contact.id).unwrap();
        assert_eq!(fetched.fullname, "Caroline");
    }

    #[test]
    fn delete_missing_contact_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let db = open_db(&dir);

        let alice = make_user(&db, "a@example.com", "alice");
        db.create_contact(alice, &fields("Carol")).unwrap();

        assert!(matches!(
            db.delete_contact(alice, Uuid::new_v4()),
            Err(StoreError::NotFound)
        ));
        // Store unchanged.
        assert_eq!(db.list_contacts_for_user(alice).unwrap().len(), 1);
    }

    #[test]
    fn delete_removes_contact() {
        let dir = tempfile::tempdir().unwrap();
        let db = open_db(&dir);

        let alice = make_user(&db, "a@example.com", "alice");
        let contact = db.create_contact(alice, &fields("Carol")).unwrap();

        db.delete_contact(alice, contact.id).unwrap();
        assert!(db.list_contacts_for_user(alice).unwrap().is_empty());
    }

    #[test]
    fn starred_listing_filters_by_flag() {
        let dir = tempfile::tempdir().unwrap();
        let db = open_db(&dir);

        let alice = make_user(&db, "a@example.com", "alice");
        let starred = db.create_contact(alice, &fields("Carol")).unwrap();
        db.create_contact(alice, &fields("Dave")).unwrap();

        assert!(db.list_starred_for_user(alice).unwrap().is_empty());

        let after = db.star_contact(alice, starred.id).unwrap();
        assert!(after.is_starred);

        let listed = db.list_starred_for_user(alice).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, starred.id);

        // Starring again is idempotent.
        db.star_contact(alice, starred.id).unwrap();
        assert_eq!(db.list_starred_for_user(alice).unwrap().len(), 1);
    }
}
