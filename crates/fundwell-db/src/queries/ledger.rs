//! Append-only records attached to a campaign: donations and updates.

use anyhow::Result;

use crate::Database;
use crate::models::{CampaignUpdateRow, DonationRow, DonorAmountRow, USER_PUBLIC_COLUMNS, UserPublicRow};

impl Database {
    // -- Donations --

    pub fn insert_donation(&self, campaign_id: i64, donor_id: i64, value_cents: i64) -> Result<DonationRow> {
        self.with_conn(|conn| {
            let row = conn.query_row(
                "INSERT INTO donations (value_cents, campaign_id, donor_id) VALUES (?1, ?2, ?3)
                 RETURNING id, value_cents, campaign_id, donor_id, created_at",
                rusqlite::params![value_cents, campaign_id, donor_id],
                |row| {
                    Ok(DonationRow {
                        id: row.get(0)?,
                        value_cents: row.get(1)?,
                        campaign_id: row.get(2)?,
                        donor_id: row.get(3)?,
                        created_at: row.get(4)?,
                    })
                },
            )?;
            Ok(row)
        })
    }

    pub fn total_donated_cents(&self, campaign_id: i64) -> Result<i64> {
        self.with_conn(|conn| {
            let total = conn.query_row(
                "SELECT COALESCE(SUM(value_cents), 0) FROM donations WHERE campaign_id = ?1",
                [campaign_id],
                |row| row.get(0),
            )?;
            Ok(total)
        })
    }

    /// Donors ranked by what they gave in total; ties go to the earlier donor id.
    pub fn top_donors(&self, campaign_id: i64, limit: u32) -> Result<Vec<DonorAmountRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {USER_PUBLIC_COLUMNS}, SUM(d.value_cents) AS total
                 FROM donations d
                 JOIN users u ON u.id = d.donor_id
                 WHERE d.campaign_id = ?1
                 GROUP BY d.donor_id
                 ORDER BY total DESC, d.donor_id ASC
                 LIMIT ?2"
            ))?;

            let rows = stmt
                .query_map(rusqlite::params![campaign_id, limit], |row| {
                    Ok(DonorAmountRow {
                        donor: UserPublicRow::read(row, 0)?,
                        cents: row.get(4)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    /// The most recent donation of each distinct donor, newest first.
    pub fn latest_donors(&self, campaign_id: i64, limit: u32) -> Result<Vec<DonorAmountRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {USER_PUBLIC_COLUMNS}, d.value_cents
                 FROM donations d
                 JOIN users u ON u.id = d.donor_id
                 WHERE d.id IN (
                     SELECT MAX(id) FROM donations WHERE campaign_id = ?1 GROUP BY donor_id
                 )
                 ORDER BY d.id DESC
                 LIMIT ?2"
            ))?;

            let rows = stmt
                .query_map(rusqlite::params![campaign_id, limit], |row| {
                    Ok(DonorAmountRow {
                        donor: UserPublicRow::read(row, 0)?,
                        cents: row.get(4)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    // -- Campaign updates --

    pub fn insert_campaign_update(
        &self,
        campaign_id: i64,
        content: &str,
        media: Option<&[u8]>,
    ) -> Result<CampaignUpdateRow> {
        self.with_conn(|conn| {
            let row = conn.query_row(
                "INSERT INTO campaign_updates (content, media, campaign_id) VALUES (?1, ?2, ?3)
                 RETURNING id, content, media, campaign_id, created_at",
                rusqlite::params![content, media, campaign_id],
                CampaignUpdateRow::read,
            )?;
            Ok(row)
        })
    }

    /// Updates of a campaign in the order they were posted.
    pub fn campaign_updates(&self, campaign_id: i64) -> Result<Vec<CampaignUpdateRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, content, media, campaign_id, created_at
                 FROM campaign_updates
                 WHERE campaign_id = ?1
                 ORDER BY created_at, id",
            )?;

            let rows = stmt
                .query_map([campaign_id], CampaignUpdateRow::read)?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }
}
