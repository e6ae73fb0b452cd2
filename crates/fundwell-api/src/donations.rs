use axum::{
    Form,
    extract::State,
    response::Response,
};
use serde::Deserialize;

use crate::auth::AppState;
use crate::blocking;
use crate::error::{ApiResult, found};
use crate::session::Session;

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DonationForm {
    pub campaign_id: String,
    pub amount: String,
}

/// POST /donations, then back to the campaign page.
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<DonationForm>,
) -> ApiResult<Response> {
    let donations = state.workflows.donations.clone();
    let donation = blocking(move || donations.record(session.principal(), &form.campaign_id, &form.amount)).await?;
    Ok(found(&format!("/campaigns/{}", donation.campaign_id)))
}
