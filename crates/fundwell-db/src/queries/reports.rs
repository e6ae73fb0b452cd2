use anyhow::Result;

use super::OptionalExt;
use crate::Database;
use crate::models::{
    CAMPAIGN_COLUMNS, CampaignRow, ReportDetailRow, ReportListRow, ReportRow, USER_PUBLIC_COLUMNS,
    UserPublicRow,
};

const REPORT_COLUMNS: &str = "p.id, p.description, p.campaign_id, p.reporter_id, p.created_at";

impl Database {
    pub fn insert_report(&self, description: &str, campaign_id: i64, reporter_id: i64) -> Result<ReportRow> {
        self.with_conn(|conn| {
            let row = conn.query_row(
                "INSERT INTO reports (description, campaign_id, reporter_id) VALUES (?1, ?2, ?3)
                 RETURNING id, description, campaign_id, reporter_id, created_at",
                rusqlite::params![description, campaign_id, reporter_id],
                ReportRow::read,
            )?;
            Ok(row)
        })
    }

    pub fn list_reports(&self) -> Result<Vec<ReportListRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {REPORT_COLUMNS}, c.title, {USER_PUBLIC_COLUMNS}
                 FROM reports p
                 LEFT JOIN campaigns c ON c.id = p.campaign_id
                 LEFT JOIN users u ON u.id = p.reporter_id
                 ORDER BY p.created_at, p.id"
            ))?;

            let rows = stmt
                .query_map([], |row| {
                    Ok(ReportListRow {
                        report: ReportRow::read(row)?,
                        campaign_title: row.get(5)?,
                        reporter: UserPublicRow::read_optional(row, 6)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    pub fn get_report(&self, id: i64) -> Result<Option<ReportDetailRow>> {
        self.with_conn(|conn| {
            // `u` is the reporter, `w` the campaign's creator.
            let creator_columns = USER_PUBLIC_COLUMNS.replace("u.", "w.");
            conn.query_row(
                &format!(
                    "SELECT {REPORT_COLUMNS}, {CAMPAIGN_COLUMNS}, {creator_columns}, {USER_PUBLIC_COLUMNS}
                     FROM reports p
                     LEFT JOIN campaigns c ON c.id = p.campaign_id
                     LEFT JOIN users w ON w.id = c.creator_id
                     LEFT JOIN users u ON u.id = p.reporter_id
                     WHERE p.id = ?1"
                ),
                [id],
                |row| {
                    let campaign = match row.get::<_, Option<i64>>(5)? {
                        Some(_) => Some(CampaignRow::read(row, 5)?),
                        None => None,
                    };
                    Ok(ReportDetailRow {
                        report: ReportRow::read(row)?,
                        campaign,
                        creator: UserPublicRow::read_optional(row, 16)?,
                        reporter: UserPublicRow::read_optional(row, 20)?,
                    })
                },
            )
            .optional()
        })
    }

    pub fn delete_report(&self, id: i64) -> Result<bool> {
        self.with_conn(|conn| {
            let deleted = conn.execute("DELETE FROM reports WHERE id = ?1", [id])?;
            Ok(deleted == 1)
        })
    }

    pub fn campaign_exists(&self, id: i64) -> Result<bool> {
        self.with_conn(|conn| {
            let found: Option<i64> = conn
                .query_row("SELECT id FROM campaigns WHERE id = ?1", [id], |row| row.get(0))
                .optional()?;
            Ok(found.is_some())
        })
    }

    pub fn user_exists(&self, id: i64) -> Result<bool> {
        self.with_conn(|conn| {
            let found: Option<i64> = conn
                .query_row("SELECT id FROM users WHERE id = ?1", [id], |row| row.get(0))
                .optional()?;
            Ok(found.is_some())
        })
    }
}
