use axum::{
    Json,
    extract::{Multipart, Path, State, multipart::MultipartRejection},
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use serde_json::json;

use fundwell_core::services::campaigns::CampaignForm;
use fundwell_core::services::{CREATOR_ONLY, require};
use fundwell_core::Landing;
use fundwell_types::Role;
use fundwell_types::api::{CampaignDetail, CampaignPage, OwnedCampaign};

use crate::auth::AppState;
use crate::blocking;
use crate::error::{ApiError, ApiResult, WorkflowResultExt, found};
use crate::session::{Session, take_flash};
use crate::uploads::{FormData, UploadKind};

const CREATE_FORM: &str = "/campaigns/create";

/// GET /campaigns
pub async fn list(State(state): State<AppState>) -> ApiResult<Json<CampaignPage>> {
    list_page(State(state), Path(0)).await
}

/// GET /campaigns/page/{page}
pub async fn list_page(State(state): State<AppState>, Path(page): Path<u32>) -> ApiResult<Json<CampaignPage>> {
    let campaigns = state.workflows.campaigns.clone();
    let page = blocking(move || campaigns.list_approved(page)).await?;
    Ok(Json(page))
}

pub async fn detail(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i64>,
) -> ApiResult<Json<CampaignDetail>> {
    let campaigns = state.workflows.campaigns.clone();
    let detail = blocking(move || campaigns.get(session.principal(), id)).await?;
    Ok(Json(detail))
}

pub async fn owned(State(state): State<AppState>, session: Session) -> ApiResult<Json<Vec<OwnedCampaign>>> {
    let campaigns = state.workflows.campaigns.clone();
    let owned = blocking(move || campaigns.list_owned(session.principal())).await?;
    Ok(Json(owned))
}

pub async fn create_form(session: Session, jar: CookieJar) -> ApiResult<impl IntoResponse> {
    require(session.principal(), &[Role::CampaignCreator], CREATOR_ONLY)?;

    let (jar, message) = take_flash(jar);
    Ok((jar, Json(json!({ "message": message }))))
}

/// POST /campaigns/create. The role gate runs before the body is looked at,
/// so everyone but a campaign creator lands on the login page.
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Response> {
    require(session.principal(), &[Role::CampaignCreator], CREATOR_ONLY)?;

    let multipart = multipart.map_err(|e| ApiError::redirect(CREATE_FORM, Some(e.body_text())))?;
    let mut form = FormData::read(multipart)
        .await
        .map_err(|e| e.back_to(CREATE_FORM))?;
    let media = form
        .file("media", UploadKind::Image)
        .map_err(|e| e.back_to(CREATE_FORM))?;

    let fields = CampaignForm {
        title: form.text("title"),
        description: form.text("description"),
        goal: form.text("goal"),
        end_date: form.text("endDate"),
        iban: form.text("iban"),
        media,
    };

    let campaigns = state.workflows.campaigns.clone();
    blocking(move || campaigns.create(session.principal(), fields))
        .await
        .or_back(CREATE_FORM)?;

    Ok(found(Landing::Campaigns.path()))
}

/// GET /campaigns/{id}/delete. Where the actor lands depends on their role.
pub async fn delete(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i64>,
) -> ApiResult<Response> {
    let campaigns = state.workflows.campaigns.clone();
    let removal = blocking(move || campaigns.delete(session.principal(), id)).await?;
    Ok(found(removal.landing.path()))
}
