use anyhow::Result;
use rusqlite::Row;
use tracing::info;

use fundwell_types::RequestStatus;
use fundwell_types::api::NewCampaign;

use super::OptionalExt;
use crate::Database;
use crate::models::{
    CAMPAIGN_COLUMNS, CampaignListRow, CampaignRow, Decision, OwnedCampaignRow,
    USER_PUBLIC_COLUMNS, UserPublicRow,
};

/// Date format of the `end_date` column.
pub const END_DATE_FORMAT: &str = "%Y-%m-%d";

fn list_select() -> String {
    format!(
        "SELECT {CAMPAIGN_COLUMNS}, {USER_PUBLIC_COLUMNS}, r.status
         FROM campaigns c
         JOIN users u ON u.id = c.creator_id
         JOIN campaign_requests r ON r.id = c.campaign_request_id"
    )
}

fn read_list_row(row: &Row<'_>) -> rusqlite::Result<CampaignListRow> {
    Ok(CampaignListRow {
        campaign: CampaignRow::read(row, 0)?,
        creator: UserPublicRow::read(row, 11)?,
        status: row.get(15)?,
    })
}

impl Database {
    /// Insert a pending campaign request and the campaign pointing at it.
    /// Returns `(campaign_id, campaign_request_id)`.
    pub fn create_campaign(&self, creator_id: i64, campaign: &NewCampaign) -> Result<(i64, i64)> {
        self.with_tx(|tx| {
            tx.execute(
                "INSERT INTO campaign_requests (status) VALUES (?1)",
                [RequestStatus::Pending.as_str()],
            )?;
            let request_id = tx.last_insert_rowid();

            tx.execute(
                "INSERT INTO campaigns
                    (title, description, media, goal_cents, end_date, iban, creator_id, campaign_request_id)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                rusqlite::params![
                    campaign.title,
                    campaign.description,
                    campaign.media,
                    campaign.goal.cents(),
                    campaign.end_date.format(END_DATE_FORMAT).to_string(),
                    campaign.iban,
                    creator_id,
                    request_id,
                ],
            )?;
            Ok((tx.last_insert_rowid(), request_id))
        })
    }

    pub fn list_campaigns(
        &self,
        status: RequestStatus,
        limit: u32,
        offset: u64,
    ) -> Result<Vec<CampaignListRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "{} WHERE r.status = ?1 ORDER BY c.id LIMIT ?2 OFFSET ?3",
                list_select()
            ))?;

            let rows = stmt
                .query_map(
                    rusqlite::params![status.as_str(), limit, offset as i64],
                    read_list_row,
                )?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    /// Counts exactly the rows `list_campaigns` pages through.
    pub fn count_campaigns(&self, status: RequestStatus) -> Result<u64> {
        self.with_conn(|conn| {
            let count: i64 = conn.query_row(
                "SELECT COUNT(*)
                 FROM campaigns c
                 JOIN users u ON u.id = c.creator_id
                 JOIN campaign_requests r ON r.id = c.campaign_request_id
                 WHERE r.status = ?1",
                [status.as_str()],
                |row| row.get(0),
            )?;
            Ok(count as u64)
        })
    }

    pub fn get_campaign(&self, id: i64) -> Result<Option<CampaignListRow>> {
        self.with_conn(|conn| {
            conn.query_row(
                &format!("{} WHERE c.id = ?1", list_select()),
                [id],
                read_list_row,
            )
            .optional()
        })
    }

    pub fn get_campaign_by_request(&self, campaign_request_id: i64) -> Result<Option<CampaignListRow>> {
        self.with_conn(|conn| {
            conn.query_row(
                &format!("{} WHERE c.campaign_request_id = ?1", list_select()),
                [campaign_request_id],
                read_list_row,
            )
            .optional()
        })
    }

    pub fn list_owned_campaigns(&self, creator_id: i64) -> Result<Vec<OwnedCampaignRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT c.id, c.title, c.goal_cents, COALESCE(SUM(d.value_cents), 0), r.status
                 FROM campaigns c
                 JOIN campaign_requests r ON r.id = c.campaign_request_id
                 LEFT JOIN donations d ON d.campaign_id = c.id
                 WHERE c.creator_id = ?1
                 GROUP BY c.id
                 ORDER BY c.id",
            )?;

            let rows = stmt
                .query_map([creator_id], |row| {
                    Ok(OwnedCampaignRow {
                        id: row.get(0)?,
                        title: row.get(1)?,
                        goal_cents: row.get(2)?,
                        total_cents: row.get(3)?,
                        status: row.get(4)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    /// Record an administrator decision: the request status and the
    /// campaign's validator change together or not at all.
    pub fn decide_campaign_request(
        &self,
        campaign_request_id: i64,
        status: RequestStatus,
        validator_id: i64,
    ) -> Result<Decision> {
        self.with_tx(|tx| {
            let request: Option<i64> = tx
                .query_row(
                    "SELECT id FROM campaign_requests WHERE id = ?1",
                    [campaign_request_id],
                    |row| row.get(0),
                )
                .optional()?;
            if request.is_none() {
                return Ok(Decision::MissingRequest);
            }

            let campaign: Option<i64> = tx
                .query_row(
                    "SELECT id FROM campaigns WHERE campaign_request_id = ?1",
                    [campaign_request_id],
                    |row| row.get(0),
                )
                .optional()?;
            let Some(campaign_id) = campaign else {
                return Ok(Decision::MissingCampaign);
            };

            tx.execute(
                "UPDATE campaigns SET validator_id = ?2 WHERE id = ?1",
                rusqlite::params![campaign_id, validator_id],
            )?;
            tx.execute(
                "UPDATE campaign_requests SET status = ?2 WHERE id = ?1",
                rusqlite::params![campaign_request_id, status.as_str()],
            )?;
            Ok(Decision::Applied)
        })
    }

    pub fn list_campaign_reviews(&self, status: RequestStatus) -> Result<Vec<CampaignListRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "{} WHERE r.status = ?1 ORDER BY r.created_at, r.id",
                list_select()
            ))?;

            let rows = stmt
                .query_map([status.as_str()], read_list_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    /// Delete a campaign and its paired request. Returns false when the
    /// campaign does not exist.
    pub fn delete_campaign(&self, id: i64) -> Result<bool> {
        self.with_tx(|tx| {
            let request_id: Option<i64> = tx
                .query_row(
                    "SELECT campaign_request_id FROM campaigns WHERE id = ?1",
                    [id],
                    |row| row.get(0),
                )
                .optional()?;
            let Some(request_id) = request_id else {
                return Ok(false);
            };

            tx.execute("DELETE FROM campaigns WHERE id = ?1", [id])?;
            tx.execute("DELETE FROM campaign_requests WHERE id = ?1", [request_id])?;
            info!("Deleted campaign {} and campaign request {}", id, request_id);
            Ok(true)
        })
    }
}
