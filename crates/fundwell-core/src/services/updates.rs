use std::sync::Arc;

use tracing::info;

use fundwell_db::Database;
use fundwell_types::api::CampaignUpdateView;

use super::{parse_id, parse_timestamp};
use crate::error::{WorkflowError, WorkflowResult};

#[derive(Clone)]
pub struct UpdateService {
    db: Arc<Database>,
}

impl UpdateService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Append a progress note to a campaign's feed. Not role-gated; the
    /// campaign only has to exist.
    pub fn append(
        &self,
        campaign_id: &str,
        content: &str,
        media: Option<Vec<u8>>,
    ) -> WorkflowResult<CampaignUpdateView> {
        if campaign_id.trim().is_empty() || content.trim().is_empty() {
            return Err(WorkflowError::validation("campaignId and content are required."));
        }
        let campaign_id = parse_id(campaign_id, "campaignId")?;
        if !self.db.campaign_exists(campaign_id)? {
            return Err(WorkflowError::not_found("Campaign not found."));
        }

        let media = media.filter(|m| !m.is_empty());
        let row = self
            .db
            .insert_campaign_update(campaign_id, content.trim(), media.as_deref())?;
        info!("Update {} posted to campaign {}", row.id, campaign_id);

        Ok(CampaignUpdateView {
            id: row.id,
            campaign_id: row.campaign_id,
            content: row.content,
            media: row.media,
            created_at: parse_timestamp(&row.created_at),
        })
    }
}
