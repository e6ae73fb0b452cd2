use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

use fundwell_types::Role;

use super::OptionalExt;
use crate::Database;
use crate::models::UserRow;

const USER_COLUMNS: &str = "id, username, password, picture, role, created_at";

impl Database {
    pub fn create_user(&self, username: &str, password_hash: &str, role: Role) -> Result<i64> {
        self.with_conn(|conn| insert_user(conn, username, password_hash, role))
    }

    /// Create a campaign creator and their pending approval request together.
    pub fn register_campaign_creator(
        &self,
        username: &str,
        password_hash: &str,
        identification_document: &[u8],
    ) -> Result<(i64, i64)> {
        self.with_tx(|tx| {
            let user_id = insert_user(tx, username, password_hash, Role::CampaignCreator)?;
            tx.execute(
                "INSERT INTO campaign_creator_requests (identification_document, campaign_creator_id)
                 VALUES (?1, ?2)",
                rusqlite::params![identification_document, user_id],
            )?;
            Ok((user_id, tx.last_insert_rowid()))
        })
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| {
            conn.query_row(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE username = ?1"),
                [username],
                UserRow::read,
            )
            .optional()
        })
    }

    pub fn get_user_by_id(&self, id: i64) -> Result<Option<UserRow>> {
        self.with_conn(|conn| {
            conn.query_row(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
                [id],
                UserRow::read,
            )
            .optional()
        })
    }

    /// Overwrite username and password; the picture is only replaced when given.
    pub fn update_user_profile(
        &self,
        id: i64,
        username: &str,
        password_hash: &str,
        picture: Option<&[u8]>,
    ) -> Result<bool> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE users
                 SET username = ?2, password = ?3, picture = COALESCE(?4, picture)
                 WHERE id = ?1",
                rusqlite::params![id, username, password_hash, picture],
            )?;
            Ok(changed == 1)
        })
    }

    /// Remove a user and everything that hangs off them, including the
    /// approval requests of campaigns they created.
    pub fn delete_user(&self, id: i64) -> Result<bool> {
        self.with_tx(|tx| {
            let request_ids: Vec<i64> = {
                let mut stmt =
                    tx.prepare("SELECT campaign_request_id FROM campaigns WHERE creator_id = ?1")?;
                let ids = stmt
                    .query_map([id], |row| row.get(0))?
                    .collect::<std::result::Result<_, _>>()?;
                ids
            };

            tx.execute("DELETE FROM campaigns WHERE creator_id = ?1", [id])?;
            for request_id in &request_ids {
                tx.execute("DELETE FROM campaign_requests WHERE id = ?1", [request_id])?;
            }

            let deleted = tx.execute("DELETE FROM users WHERE id = ?1", [id])?;
            if deleted == 1 {
                info!(
                    "Deleted user {} with {} campaign(s)",
                    id,
                    request_ids.len()
                );
            }
            Ok(deleted == 1)
        })
    }
}

fn insert_user(conn: &Connection, username: &str, password_hash: &str, role: Role) -> Result<i64> {
    conn.execute(
        "INSERT INTO users (username, password, role) VALUES (?1, ?2, ?3)",
        (username, password_hash, role.as_str()),
    )?;
    Ok(conn.last_insert_rowid())
}
