use axum::{
    extract::{Multipart, State},
    response::Response,
};

use fundwell_core::Landing;

use crate::auth::AppState;
use crate::blocking;
use crate::error::{ApiError, ApiResult, found};
use crate::uploads::{FormData, UploadKind};

/// POST /campaigns/updates
pub async fn create(State(state): State<AppState>, multipart: Multipart) -> ApiResult<Response> {
    let mut form = FormData::read(multipart)
        .await
        .map_err(|e| ApiError::bad_request(e.to_string()))?;
    let media = form
        .file("media", UploadKind::Image)
        .map_err(|e| ApiError::bad_request(e.to_string()))?;
    let campaign_id = form.text("campaignId");
    let content = form.text("content");

    let updates = state.workflows.updates.clone();
    blocking(move || updates.append(&campaign_id, &content, media)).await?;

    Ok(found(Landing::Campaigns.path()))
}
