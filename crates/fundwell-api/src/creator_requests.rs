use axum::{
    Form, Json,
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use fundwell_core::Landing;
use fundwell_types::api::CreatorRequestView;

use crate::auth::AppState;
use crate::blocking;
use crate::error::{ApiError, ApiResult, WorkflowResultExt, found};
use crate::session::Session;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct StatusForm {
    pub status: String,
}

fn back_to_list() -> ApiError {
    ApiError::redirect(Landing::CreatorRequests.path(), None)
}

pub async fn list(State(state): State<AppState>, session: Session) -> ApiResult<Json<Vec<CreatorRequestView>>> {
    let requests = state.workflows.creator_requests.clone();
    let pending = blocking(move || requests.list_pending(session.principal())).await?;
    Ok(Json(pending))
}

/// Only pending requests are shown; anything else goes back to the list.
pub async fn detail(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i64>,
) -> ApiResult<Json<CreatorRequestView>> {
    let requests = state.workflows.creator_requests.clone();
    blocking(move || requests.get(session.principal(), id))
        .await?
        .map(Json)
        .ok_or_else(back_to_list)
}

pub async fn document(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i64>,
) -> ApiResult<Response> {
    let requests = state.workflows.creator_requests.clone();
    let pdf = blocking(move || requests.document(session.principal(), id))
        .await
        .or_quiet(Landing::CreatorRequests.path())?;

    Ok(([(header::CONTENT_TYPE, "application/pdf")], pdf).into_response())
}

pub async fn update_status(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i64>,
    Form(form): Form<StatusForm>,
) -> ApiResult<Response> {
    let requests = state.workflows.creator_requests.clone();
    blocking(move || requests.set_status(session.principal(), id, &form.status)).await?;
    Ok(found(Landing::CreatorRequests.path()))
}

/// DELETE /campaign_creators/{id}. Unknown ids redirect the same way.
pub async fn delete(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i64>,
) -> ApiResult<Response> {
    let requests = state.workflows.creator_requests.clone();
    blocking(move || requests.delete(session.principal(), id)).await?;
    Ok(found(Landing::CreatorRequests.path()))
}
