pub mod campaigns;
pub mod creator_requests;
pub mod donations;
pub mod identity;
pub mod reports;
pub mod updates;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use tracing::warn;

use fundwell_db::models::{CampaignRow, UserPublicRow};
use fundwell_db::queries::END_DATE_FORMAT;
use fundwell_types::api::{CampaignSummary, UserPublic};
use fundwell_types::{Money, Principal, RequestStatus, Role};

use crate::error::{WorkflowError, WorkflowResult};

pub const CREATOR_ONLY: &str = "Login as a campaign creator to access this page.";
pub const ADMIN_ONLY: &str = "Login as an administrator to access this feature.";
pub const DONOR_ONLY: &str = "Login as a donor to access this feature.";
pub const ROOT_ONLY: &str = "You must be root to access this feature.";
pub const LOGIN_REQUIRED: &str = "Log in to access this page.";

/// Where the browser goes after a workflow step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Landing {
    Login,
    Campaigns,
    CreateCampaign,
    OwnedCampaigns,
    CampaignReviews,
    CreatorRequests,
    Reports,
}

impl Landing {
    pub fn path(&self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Campaigns => "/campaigns",
            Self::CreateCampaign => "/campaigns/create",
            Self::OwnedCampaigns => "/campaigns/owned",
            Self::CampaignReviews => "/requests/campaigns",
            Self::CreatorRequests => "/campaign_creators",
            Self::Reports => "/reports",
        }
    }
}

pub fn authorize(principal: Option<&Principal>, roles: &[Role]) -> bool {
    principal.is_some_and(|p| p.has_role(roles))
}

/// Gate an operation on `roles`, failing with `message` for everyone else.
pub fn require<'a>(
    principal: Option<&'a Principal>,
    roles: &[Role],
    message: &str,
) -> WorkflowResult<&'a Principal> {
    match principal {
        Some(p) if p.has_role(roles) => Ok(p),
        _ => Err(WorkflowError::unauthorized(message)),
    }
}

/// Parse a positive numeric identifier taken from a form field.
pub(crate) fn parse_id(raw: &str, field: &str) -> WorkflowResult<i64> {
    match raw.trim().parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(WorkflowError::validation(format!("Invalid {}.", field))),
    }
}

pub(crate) fn parse_status(raw: &str) -> WorkflowResult<RequestStatus> {
    raw.parse().map_err(|_| {
        WorkflowError::CorruptState(format!(
            "Stored status ({}) is not one of Pending, Approved, Rejected.",
            raw
        ))
    })
}

pub(crate) fn parse_role(raw: &str) -> WorkflowResult<Role> {
    raw.parse()
        .map_err(|_| WorkflowError::CorruptState(format!("Stored role ({}) is not a known role.", raw)))
}

/// SQLite stores timestamps as "YYYY-MM-DD HH:MM:SS" without timezone.
pub(crate) fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    raw.parse::<DateTime<Utc>>()
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc()))
        .unwrap_or_else(|e| {
            warn!("Corrupt timestamp '{}': {}", raw, e);
            DateTime::default()
        })
}

pub(crate) fn user_public(row: UserPublicRow) -> WorkflowResult<UserPublic> {
    Ok(UserPublic {
        id: row.id,
        role: parse_role(&row.role)?,
        username: row.username,
        picture: row.picture,
    })
}

pub(crate) fn campaign_summary(
    campaign: CampaignRow,
    creator: UserPublicRow,
) -> WorkflowResult<CampaignSummary> {
    let end_date = NaiveDate::parse_from_str(&campaign.end_date, END_DATE_FORMAT).map_err(|_| {
        WorkflowError::CorruptState(format!(
            "Campaign {} has an unreadable end date ({}).",
            campaign.id, campaign.end_date
        ))
    })?;

    Ok(CampaignSummary {
        id: campaign.id,
        title: campaign.title,
        description: campaign.description,
        goal: Money::from_cents(campaign.goal_cents),
        end_date,
        media: campaign.media,
        creator: user_public(creator)?,
    })
}
