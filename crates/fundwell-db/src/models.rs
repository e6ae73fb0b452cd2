//! Database row types. These map directly to SQLite rows and keep stored
//! strings (roles, statuses, timestamps) as they are on disk; typed
//! conversion happens in the workflow layer.

use rusqlite::Row;

/// Column list matching [`UserPublicRow::read`], for a `users` alias `u`.
pub(crate) const USER_PUBLIC_COLUMNS: &str = "u.id, u.username, u.role, u.picture";

/// Column list matching [`CampaignRow::read`], for a `campaigns` alias `c`.
pub(crate) const CAMPAIGN_COLUMNS: &str = "c.id, c.title, c.description, c.media, c.goal_cents, \
     c.end_date, c.iban, c.creator_id, c.validator_id, c.campaign_request_id, c.created_at";

pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub password: String,
    pub picture: Option<Vec<u8>>,
    pub role: String,
    pub created_at: String,
}

impl UserRow {
    pub(crate) fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            username: row.get(1)?,
            password: row.get(2)?,
            picture: row.get(3)?,
            role: row.get(4)?,
            created_at: row.get(5)?,
        })
    }
}

pub struct UserPublicRow {
    pub id: i64,
    pub username: String,
    pub role: String,
    pub picture: Option<Vec<u8>>,
}

impl UserPublicRow {
    pub(crate) fn read(row: &Row<'_>, at: usize) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(at)?,
            username: row.get(at + 1)?,
            role: row.get(at + 2)?,
            picture: row.get(at + 3)?,
        })
    }

    /// Read a LEFT JOINed user; `None` when the join found nothing.
    pub(crate) fn read_optional(row: &Row<'_>, at: usize) -> rusqlite::Result<Option<Self>> {
        match row.get::<_, Option<i64>>(at)? {
            Some(_) => Self::read(row, at).map(Some),
            None => Ok(None),
        }
    }
}

pub struct CreatorRequestRow {
    pub id: i64,
    pub status: String,
    pub campaign_creator_id: i64,
    pub created_at: String,
}

impl CreatorRequestRow {
    pub(crate) fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            status: row.get(1)?,
            campaign_creator_id: row.get(2)?,
            created_at: row.get(3)?,
        })
    }
}

pub struct CampaignRow {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub media: Option<Vec<u8>>,
    pub goal_cents: i64,
    pub end_date: String,
    pub iban: String,
    pub creator_id: i64,
    pub validator_id: Option<i64>,
    pub campaign_request_id: i64,
    pub created_at: String,
}

impl CampaignRow {
    pub(crate) fn read(row: &Row<'_>, at: usize) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(at)?,
            title: row.get(at + 1)?,
            description: row.get(at + 2)?,
            media: row.get(at + 3)?,
            goal_cents: row.get(at + 4)?,
            end_date: row.get(at + 5)?,
            iban: row.get(at + 6)?,
            creator_id: row.get(at + 7)?,
            validator_id: row.get(at + 8)?,
            campaign_request_id: row.get(at + 9)?,
            created_at: row.get(at + 10)?,
        })
    }
}

/// A campaign joined with its creator and its request status.
pub struct CampaignListRow {
    pub campaign: CampaignRow,
    pub creator: UserPublicRow,
    pub status: String,
}

pub struct OwnedCampaignRow {
    pub id: i64,
    pub title: String,
    pub goal_cents: i64,
    pub total_cents: i64,
    pub status: String,
}

pub struct DonationRow {
    pub id: i64,
    pub value_cents: i64,
    pub campaign_id: i64,
    pub donor_id: i64,
    pub created_at: String,
}

/// A donor and an amount: their total for top-donor lists, their most
/// recent donation for latest-donor lists.
pub struct DonorAmountRow {
    pub donor: UserPublicRow,
    pub cents: i64,
}

pub struct CampaignUpdateRow {
    pub id: i64,
    pub content: String,
    pub media: Option<Vec<u8>>,
    pub campaign_id: i64,
    pub created_at: String,
}

impl CampaignUpdateRow {
    pub(crate) fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            content: row.get(1)?,
            media: row.get(2)?,
            campaign_id: row.get(3)?,
            created_at: row.get(4)?,
        })
    }
}

pub struct ReportRow {
    pub id: i64,
    pub description: String,
    pub campaign_id: i64,
    pub reporter_id: i64,
    pub created_at: String,
}

impl ReportRow {
    pub(crate) fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            description: row.get(1)?,
            campaign_id: row.get(2)?,
            reporter_id: row.get(3)?,
            created_at: row.get(4)?,
        })
    }
}

/// A report with whatever its references still resolve to.
pub struct ReportListRow {
    pub report: ReportRow,
    pub campaign_title: Option<String>,
    pub reporter: Option<UserPublicRow>,
}

/// A report with its campaign, the campaign's creator and the reporter.
/// Each side is `None` when the referenced row no longer exists.
pub struct ReportDetailRow {
    pub report: ReportRow,
    pub campaign: Option<CampaignRow>,
    pub creator: Option<UserPublicRow>,
    pub reporter: Option<UserPublicRow>,
}

/// Result of an administrator decision on a campaign request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Applied,
    MissingRequest,
    /// The request exists but no campaign points at it. Nothing was written.
    MissingCampaign,
}
