use axum::{
    Form, Json,
    extract::{Path, State},
    response::Response,
};
use serde::Deserialize;

use fundwell_core::Landing;
use fundwell_types::api::{ReportDetail, ReportSummary};

use crate::auth::AppState;
use crate::blocking;
use crate::error::{ApiResult, found};
use crate::session::Session;

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReportForm {
    pub description: String,
    pub campaign_id: String,
    pub reporter_id: String,
}

pub async fn list(State(state): State<AppState>, session: Session) -> ApiResult<Json<Vec<ReportSummary>>> {
    let reports = state.workflows.reports.clone();
    let all = blocking(move || reports.list(session.principal())).await?;
    Ok(Json(all))
}

pub async fn detail(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i64>,
) -> ApiResult<Json<ReportDetail>> {
    let reports = state.workflows.reports.clone();
    let report = blocking(move || reports.get(session.principal(), id)).await?;
    Ok(Json(report))
}

/// POST /reports. Open to anyone; the reporter comes from the form.
pub async fn create(State(state): State<AppState>, Form(form): Form<ReportForm>) -> ApiResult<Response> {
    let reports = state.workflows.reports.clone();
    blocking(move || reports.create(&form.description, &form.campaign_id, &form.reporter_id)).await?;
    Ok(found(Landing::Campaigns.path()))
}

/// POST /reports/delete/{id} and DELETE /reports/{id}.
pub async fn delete(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i64>,
) -> ApiResult<Response> {
    let reports = state.workflows.reports.clone();
    blocking(move || reports.delete(session.principal(), id)).await?;
    Ok(found(Landing::Reports.path()))
}
