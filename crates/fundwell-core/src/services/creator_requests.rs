//! Administrator review of campaign creator applications.

use std::sync::Arc;

use tracing::info;

use fundwell_db::Database;
use fundwell_db::models::{CreatorRequestRow, UserPublicRow};
use fundwell_types::api::CreatorRequestView;
use fundwell_types::{Principal, RequestStatus, Role};

use super::{ADMIN_ONLY, parse_status, parse_timestamp, require, user_public};
use crate::error::{WorkflowError, WorkflowResult};

#[derive(Clone)]
pub struct CreatorRequestService {
    db: Arc<Database>,
}

fn view(request: CreatorRequestRow, creator: UserPublicRow) -> WorkflowResult<CreatorRequestView> {
    Ok(CreatorRequestView {
        id: request.id,
        status: parse_status(&request.status)?,
        campaign_creator: user_public(creator)?,
        created_at: parse_timestamp(&request.created_at),
    })
}

impl CreatorRequestService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub fn list_pending(&self, principal: Option<&Principal>) -> WorkflowResult<Vec<CreatorRequestView>> {
        require(principal, Role::ADMINS, ADMIN_ONLY)?;

        self.db
            .list_creator_requests(RequestStatus::Pending)?
            .into_iter()
            .map(|(request, creator)| view(request, creator))
            .collect()
    }

    /// A request awaiting review. Requests already decided read as absent.
    pub fn get(&self, principal: Option<&Principal>, id: i64) -> WorkflowResult<Option<CreatorRequestView>> {
        require(principal, Role::ADMINS, ADMIN_ONLY)?;

        let Some((request, creator)) = self.db.get_creator_request(id)? else {
            return Ok(None);
        };
        let request = view(request, creator)?;
        Ok((request.status == RequestStatus::Pending).then_some(request))
    }

    /// Record a decision. Any earlier decision is overwritten.
    pub fn set_status(&self, principal: Option<&Principal>, id: i64, status: &str) -> WorkflowResult<RequestStatus> {
        let admin = require(principal, Role::ADMINS, ADMIN_ONLY)?;

        let status = RequestStatus::parse_decision(status)
            .map_err(|_| WorkflowError::validation("Invalid status value"))?;

        if !self.db.set_creator_request_status(id, status)? {
            return Err(WorkflowError::not_found("Request not found"));
        }
        info!("{} set creator request {} to {}", admin.username, id, status);
        Ok(status)
    }

    /// The applicant's identification document (PDF bytes).
    pub fn document(&self, principal: Option<&Principal>, id: i64) -> WorkflowResult<Vec<u8>> {
        require(principal, Role::ADMINS, ADMIN_ONLY)?;

        self.db
            .get_identification_document(id)?
            .filter(|doc| !doc.is_empty())
            .ok_or_else(|| WorkflowError::not_found("Document not found"))
    }

    pub fn delete(&self, principal: Option<&Principal>, id: i64) -> WorkflowResult<bool> {
        let admin = require(principal, Role::ADMINS, ADMIN_ONLY)?;

        let deleted = self.db.delete_creator_request(id)?;
        if deleted {
            info!("{} deleted creator request {}", admin.username, id);
        }
        Ok(deleted)
    }
}
