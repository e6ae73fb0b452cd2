use anyhow::Result;
use rusqlite::Row;

use fundwell_types::RequestStatus;

use super::OptionalExt;
use crate::Database;
use crate::models::{CreatorRequestRow, USER_PUBLIC_COLUMNS, UserPublicRow};

const REQUEST_COLUMNS: &str = "r.id, r.status, r.campaign_creator_id, r.created_at";

fn read_with_creator(row: &Row<'_>) -> rusqlite::Result<(CreatorRequestRow, UserPublicRow)> {
    Ok((CreatorRequestRow::read(row)?, UserPublicRow::read(row, 4)?))
}

impl Database {
    pub fn get_creator_request(&self, id: i64) -> Result<Option<(CreatorRequestRow, UserPublicRow)>> {
        self.with_conn(|conn| {
            conn.query_row(
                &format!(
                    "SELECT {REQUEST_COLUMNS}, {USER_PUBLIC_COLUMNS}
                     FROM campaign_creator_requests r
                     JOIN users u ON u.id = r.campaign_creator_id
                     WHERE r.id = ?1"
                ),
                [id],
                read_with_creator,
            )
            .optional()
        })
    }

    pub fn get_creator_request_for_user(&self, user_id: i64) -> Result<Option<CreatorRequestRow>> {
        self.with_conn(|conn| {
            conn.query_row(
                &format!(
                    "SELECT {REQUEST_COLUMNS}
                     FROM campaign_creator_requests r
                     WHERE r.campaign_creator_id = ?1"
                ),
                [user_id],
                CreatorRequestRow::read,
            )
            .optional()
        })
    }

    pub fn list_creator_requests(
        &self,
        status: RequestStatus,
    ) -> Result<Vec<(CreatorRequestRow, UserPublicRow)>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {REQUEST_COLUMNS}, {USER_PUBLIC_COLUMNS}
                 FROM campaign_creator_requests r
                 JOIN users u ON u.id = r.campaign_creator_id
                 WHERE r.status = ?1
                 ORDER BY r.created_at, r.id"
            ))?;

            let rows = stmt
                .query_map([status.as_str()], read_with_creator)?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    /// Returns false when no request has this id.
    pub fn set_creator_request_status(&self, id: i64, status: RequestStatus) -> Result<bool> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE campaign_creator_requests SET status = ?2 WHERE id = ?1",
                rusqlite::params![id, status.as_str()],
            )?;
            Ok(changed == 1)
        })
    }

    pub fn get_identification_document(&self, id: i64) -> Result<Option<Vec<u8>>> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT identification_document FROM campaign_creator_requests WHERE id = ?1",
                [id],
                |row| row.get(0),
            )
            .optional()
        })
    }

    pub fn delete_creator_request(&self, id: i64) -> Result<bool> {
        self.with_conn(|conn| {
            let deleted = conn.execute("DELETE FROM campaign_creator_requests WHERE id = ?1", [id])?;
            Ok(deleted == 1)
        })
    }
}
