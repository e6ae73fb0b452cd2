//! Campaign submission, the approval gate on public visibility, and
//! campaign removal.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, warn};

use fundwell_db::Database;
use fundwell_db::models::{CampaignListRow, Decision, DonorAmountRow};
use fundwell_db::queries::END_DATE_FORMAT;
use fundwell_types::api::{
    CampaignDetail, CampaignPage, CampaignReview, CampaignUpdateView, DonorContribution,
    NewCampaign, OwnedCampaign,
};
use fundwell_types::{Money, Principal, RequestStatus, Role};

use super::{
    ADMIN_ONLY, CREATOR_ONLY, LOGIN_REQUIRED, Landing, campaign_summary, parse_id, parse_status,
    parse_timestamp, require,
};
use crate::error::{WorkflowError, WorkflowResult};

/// Campaigns per public listing page.
pub const PAGE_SIZE: u32 = 6;

/// Length of the top-donor and latest-donor lists.
const DONOR_LIST_LEN: u32 = 5;

const MAX_IBAN_LEN: usize = 34;

/// Campaign form fields as submitted.
#[derive(Debug, Default, Clone)]
pub struct CampaignForm {
    pub title: String,
    pub description: String,
    pub goal: String,
    pub end_date: String,
    pub iban: String,
    pub media: Option<Vec<u8>>,
}

impl CampaignForm {
    fn validate(self) -> WorkflowResult<NewCampaign> {
        let title = self.title.trim();
        let description = self.description.trim();
        let iban = self.iban.trim();
        if title.is_empty() || description.is_empty() || iban.is_empty() {
            return Err(WorkflowError::validation("Title, description and IBAN are required."));
        }
        if iban.chars().count() > MAX_IBAN_LEN {
            return Err(WorkflowError::validation("IBAN cannot be longer than 34 characters."));
        }

        let goal = Money::parse_positive(&self.goal)
            .map_err(|e| WorkflowError::validation(format!("Goal: {}", e)))?;
        let end_date = NaiveDate::parse_from_str(self.end_date.trim(), END_DATE_FORMAT)
            .map_err(|_| WorkflowError::validation("End date must be a date (YYYY-MM-DD)."))?;

        Ok(NewCampaign {
            title: title.to_string(),
            description: description.to_string(),
            goal,
            end_date,
            iban: iban.to_string(),
            media: self.media.filter(|m| !m.is_empty()),
        })
    }
}

/// What happened to a delete request and where to send the actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Removal {
    pub deleted: bool,
    pub landing: Landing,
}

#[derive(Clone)]
pub struct CampaignService {
    db: Arc<Database>,
}

fn contribution(row: DonorAmountRow) -> DonorContribution {
    DonorContribution {
        id: row.donor.id,
        username: row.donor.username,
        picture: row.donor.picture,
        amount_donated: Money::from_cents(row.cents),
    }
}

fn review(row: CampaignListRow) -> WorkflowResult<CampaignReview> {
    Ok(CampaignReview {
        campaign_request_id: row.campaign.campaign_request_id,
        status: parse_status(&row.status)?,
        validator_id: row.campaign.validator_id,
        iban: row.campaign.iban.clone(),
        campaign: campaign_summary(row.campaign, row.creator)?,
    })
}

impl CampaignService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Submit a campaign. It stays invisible to the public until approved.
    pub fn create(&self, principal: Option<&Principal>, form: CampaignForm) -> WorkflowResult<i64> {
        let creator = require(principal, &[Role::CampaignCreator], CREATOR_ONLY)?;
        let campaign = form.validate()?;

        let (campaign_id, request_id) = self.db.create_campaign(creator.id, &campaign)?;
        info!(
            "{} submitted campaign {} (request {})",
            creator.username, campaign_id, request_id
        );
        Ok(campaign_id)
    }

    /// Approved campaigns, `PAGE_SIZE` at a time. `page` starts at 0.
    pub fn list_approved(&self, page: u32) -> WorkflowResult<CampaignPage> {
        let rows = self.db.list_campaigns(
            RequestStatus::Approved,
            PAGE_SIZE,
            u64::from(page) * u64::from(PAGE_SIZE),
        )?;
        let total = self.db.count_campaigns(RequestStatus::Approved)?;

        let campaigns = rows
            .into_iter()
            .map(|row| campaign_summary(row.campaign, row.creator))
            .collect::<WorkflowResult<Vec<_>>>()?;

        Ok(CampaignPage {
            campaigns,
            page,
            page_size: PAGE_SIZE,
            total,
            total_pages: total.div_ceil(u64::from(PAGE_SIZE)),
        })
    }

    /// Full campaign page. Campaigns that are not approved are only visible
    /// to administrators and to their creator.
    pub fn get(&self, principal: Option<&Principal>, id: i64) -> WorkflowResult<CampaignDetail> {
        let row = self
            .db
            .get_campaign(id)?
            .ok_or_else(|| WorkflowError::not_found("Campaign not found"))?;
        let status = parse_status(&row.status)?;

        let privileged = principal
            .is_some_and(|p| p.role.is_admin() || p.id == row.campaign.creator_id);
        if status != RequestStatus::Approved && !privileged {
            return Err(WorkflowError::not_found("Campaign not found"));
        }

        let total_donated = Money::from_cents(self.db.total_donated_cents(id)?);
        let updates = self
            .db
            .campaign_updates(id)?
            .into_iter()
            .map(|u| CampaignUpdateView {
                id: u.id,
                campaign_id: u.campaign_id,
                content: u.content,
                media: u.media,
                created_at: parse_timestamp(&u.created_at),
            })
            .collect();
        let top_donors = self
            .db
            .top_donors(id, DONOR_LIST_LEN)?
            .into_iter()
            .map(contribution)
            .collect();
        let latest_donors = self
            .db
            .latest_donors(id, DONOR_LIST_LEN)?
            .into_iter()
            .map(contribution)
            .collect();

        let iban = row.campaign.iban.clone();
        let validator_id = row.campaign.validator_id;
        Ok(CampaignDetail {
            summary: campaign_summary(row.campaign, row.creator)?,
            iban,
            status,
            validator_id,
            total_donated,
            updates,
            top_donors,
            latest_donors,
        })
    }

    /// The caller's own campaigns with what they raised so far.
    pub fn list_owned(&self, principal: Option<&Principal>) -> WorkflowResult<Vec<OwnedCampaign>> {
        let creator = require(principal, &[Role::CampaignCreator], CREATOR_ONLY)?;

        self.db
            .list_owned_campaigns(creator.id)?
            .into_iter()
            .map(|row| {
                Ok(OwnedCampaign {
                    status: parse_status(&row.status)?,
                    id: row.id,
                    title: row.title,
                    goal: Money::from_cents(row.goal_cents),
                    total_donated: Money::from_cents(row.total_cents),
                })
            })
            .collect()
    }

    /// Campaigns waiting for an administrator decision.
    pub fn list_pending_reviews(&self, principal: Option<&Principal>) -> WorkflowResult<Vec<CampaignReview>> {
        require(principal, Role::ADMINS, ADMIN_ONLY)?;

        self.db
            .list_campaign_reviews(RequestStatus::Pending)?
            .into_iter()
            .map(review)
            .collect()
    }

    pub fn get_review(
        &self,
        principal: Option<&Principal>,
        campaign_request_id: i64,
    ) -> WorkflowResult<Option<CampaignReview>> {
        require(principal, Role::ADMINS, ADMIN_ONLY)?;

        self.db
            .get_campaign_by_request(campaign_request_id)?
            .map(review)
            .transpose()
    }

    /// Approve or reject a campaign request, stamping the deciding
    /// administrator on the campaign. Both writes land together or not at all.
    pub fn approve_or_reject(
        &self,
        principal: Option<&Principal>,
        campaign_request_id: &str,
        status: &str,
    ) -> WorkflowResult<RequestStatus> {
        let admin = require(principal, Role::ADMINS, ADMIN_ONLY)?;

        let request_id = parse_id(campaign_request_id, "campaignRequestId")?;
        let status = RequestStatus::parse_decision(status)
            .map_err(|_| WorkflowError::validation("Invalid status value"))?;

        match self.db.decide_campaign_request(request_id, status, admin.id)? {
            Decision::Applied => {
                info!(
                    "{} set campaign request {} to {}",
                    admin.username, request_id, status
                );
                Ok(status)
            }
            Decision::MissingRequest => Err(WorkflowError::not_found("Campaign request not found")),
            Decision::MissingCampaign => {
                warn!("Campaign request {} has no campaign", request_id);
                Err(WorkflowError::IntegrityGap(
                    "Campaign request has no campaign".into(),
                ))
            }
        }
    }

    /// Delete a campaign with its request. Donors are turned away without
    /// effect; creators may only remove their own campaigns.
    pub fn delete(&self, principal: Option<&Principal>, id: i64) -> WorkflowResult<Removal> {
        let actor = principal.ok_or_else(|| WorkflowError::unauthorized(LOGIN_REQUIRED))?;

        let landing = match actor.role {
            Role::Donor => {
                return Ok(Removal {
                    deleted: false,
                    landing: Landing::Campaigns,
                });
            }
            Role::CampaignCreator => Landing::OwnedCampaigns,
            Role::Administrator | Role::RootAdministrator => Landing::Reports,
        };

        if actor.role == Role::CampaignCreator {
            let owned = self
                .db
                .get_campaign(id)?
                .is_some_and(|row| row.campaign.creator_id == actor.id);
            if !owned {
                warn!("{} tried to delete campaign {} they do not own", actor.username, id);
                return Ok(Removal {
                    deleted: false,
                    landing,
                });
            }
        }

        let deleted = self.db.delete_campaign(id)?;
        if deleted {
            info!("{} ({}) deleted campaign {}", actor.username, actor.role, id);
        }
        Ok(Removal { deleted, landing })
    }
}
