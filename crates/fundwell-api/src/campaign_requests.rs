//! Administrator review of submitted campaigns.

use axum::{
    Form, Json,
    extract::{Path, State},
    response::Response,
};
use serde::Deserialize;

use fundwell_core::Landing;
use fundwell_types::api::CampaignReview;

use crate::auth::AppState;
use crate::blocking;
use crate::error::{ApiError, ApiResult, found};
use crate::session::Session;

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DecisionForm {
    pub campaign_request_id: String,
    pub status: String,
}

pub async fn list(State(state): State<AppState>, session: Session) -> ApiResult<Json<Vec<CampaignReview>>> {
    let campaigns = state.workflows.campaigns.clone();
    let reviews = blocking(move || campaigns.list_pending_reviews(session.principal())).await?;
    Ok(Json(reviews))
}

/// A missing request sends the administrator back to the list.
pub async fn detail(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i64>,
) -> ApiResult<Json<CampaignReview>> {
    let campaigns = state.workflows.campaigns.clone();
    blocking(move || campaigns.get_review(session.principal(), id))
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::redirect(Landing::CampaignReviews.path(), None))
}

pub async fn decide(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<DecisionForm>,
) -> ApiResult<Response> {
    let campaigns = state.workflows.campaigns.clone();
    blocking(move || {
        campaigns.approve_or_reject(session.principal(), &form.campaign_request_id, &form.status)
    })
    .await?;

    Ok(found(Landing::CampaignReviews.path()))
}
