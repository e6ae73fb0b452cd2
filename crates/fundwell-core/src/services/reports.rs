//! Abuse reports against campaigns and their administrator review.

use std::sync::Arc;

use tracing::{info, warn};

use fundwell_db::Database;
use fundwell_types::api::{ReportDetail, ReportSummary};
use fundwell_types::{Principal, Role};

use super::{ADMIN_ONLY, campaign_summary, parse_id, parse_timestamp, require, user_public};
use crate::error::{WorkflowError, WorkflowResult};

#[derive(Clone)]
pub struct ReportService {
    db: Arc<Database>,
}

impl ReportService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// File a report. The reporter is named in the form rather than taken
    /// from the session; both it and the campaign must exist.
    pub fn create(&self, description: &str, campaign_id: &str, reporter_id: &str) -> WorkflowResult<i64> {
        if description.trim().is_empty() || campaign_id.trim().is_empty() || reporter_id.trim().is_empty() {
            return Err(WorkflowError::validation(
                "description, campaignId and reporterId are required.",
            ));
        }
        let campaign_id = parse_id(campaign_id, "campaignId")?;
        let reporter_id = parse_id(reporter_id, "reporterId")?;

        if !self.db.campaign_exists(campaign_id)? {
            return Err(WorkflowError::not_found("Campaign not found."));
        }
        if !self.db.user_exists(reporter_id)? {
            return Err(WorkflowError::not_found("Reporter not found."));
        }

        let row = self.db.insert_report(description.trim(), campaign_id, reporter_id)?;
        info!("User {} reported campaign {} (report {})", reporter_id, campaign_id, row.id);
        Ok(row.id)
    }

    pub fn list(&self, principal: Option<&Principal>) -> WorkflowResult<Vec<ReportSummary>> {
        require(principal, Role::ADMINS, ADMIN_ONLY)?;

        self.db
            .list_reports()?
            .into_iter()
            .map(|row| {
                Ok(ReportSummary {
                    id: row.report.id,
                    description: row.report.description,
                    campaign_id: row.report.campaign_id,
                    campaign_title: row.campaign_title,
                    reporter: row.reporter.map(user_public).transpose()?,
                    created_at: parse_timestamp(&row.report.created_at),
                })
            })
            .collect()
    }

    /// A report with the campaign it targets resolved.
    pub fn get(&self, principal: Option<&Principal>, id: i64) -> WorkflowResult<ReportDetail> {
        require(principal, Role::ADMINS, ADMIN_ONLY)?;

        let row = self
            .db
            .get_report(id)?
            .ok_or_else(|| WorkflowError::not_found("Report not found"))?;

        let Some(campaign) = row.campaign else {
            warn!("Report {} points at missing campaign {}", id, row.report.campaign_id);
            return Err(WorkflowError::IntegrityGap("Campaign not found".into()));
        };
        let Some(creator) = row.creator else {
            warn!("Campaign {} has no creator", campaign.id);
            return Err(WorkflowError::IntegrityGap("Campaign Creator not found".into()));
        };

        Ok(ReportDetail {
            id: row.report.id,
            description: row.report.description,
            campaign: campaign_summary(campaign, creator)?,
            reporter: row.reporter.map(user_public).transpose()?,
            created_at: parse_timestamp(&row.report.created_at),
        })
    }

    pub fn delete(&self, principal: Option<&Principal>, id: i64) -> WorkflowResult<()> {
        let admin = require(principal, Role::ADMINS, ADMIN_ONLY)?;

        if !self.db.delete_report(id)? {
            return Err(WorkflowError::not_found("Report not found"));
        }
        info!("{} deleted report {}", admin.username, id);
        Ok(())
    }
}
