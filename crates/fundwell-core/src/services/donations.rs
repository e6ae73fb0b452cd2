use std::sync::Arc;

use tracing::info;

use fundwell_db::Database;
use fundwell_types::api::DonationView;
use fundwell_types::{Money, Principal, RequestStatus, Role};

use super::{DONOR_ONLY, parse_id, parse_status, parse_timestamp, require};
use crate::error::{WorkflowError, WorkflowResult};

#[derive(Clone)]
pub struct DonationService {
    db: Arc<Database>,
}

impl DonationService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Record a donation from the calling donor to an approved campaign.
    pub fn record(
        &self,
        principal: Option<&Principal>,
        campaign_id: &str,
        amount: &str,
    ) -> WorkflowResult<DonationView> {
        let donor = require(principal, &[Role::Donor], DONOR_ONLY)?;

        if campaign_id.trim().is_empty() || amount.trim().is_empty() {
            return Err(WorkflowError::validation("campaignId and amount are required."));
        }
        let campaign_id = parse_id(campaign_id, "campaignId")?;
        let value = Money::parse_positive(amount).map_err(|e| WorkflowError::validation(e.to_string()))?;

        // Money only moves toward campaigns the public can see.
        let approved = match self.db.get_campaign(campaign_id)? {
            Some(row) => parse_status(&row.status)? == RequestStatus::Approved,
            None => false,
        };
        if !approved {
            return Err(WorkflowError::not_found("Campaign not found."));
        }

        let row = self.db.insert_donation(campaign_id, donor.id, value.cents())?;
        info!("{} donated {} to campaign {}", donor.username, value, campaign_id);

        Ok(DonationView {
            id: row.id,
            campaign_id: row.campaign_id,
            donor_id: row.donor_id,
            value: Money::from_cents(row.value_cents),
            created_at: parse_timestamp(&row.created_at),
        })
    }
}
