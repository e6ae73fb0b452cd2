use std::sync::Arc;

use axum::{
    Form, Json,
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use fundwell_core::services::identity::{LoginOutcome, ProfileChange, Registration};
use fundwell_core::services::{LOGIN_REQUIRED, ROOT_ONLY, require};
use fundwell_core::{Landing, WorkflowError, Workflows};
use fundwell_types::{Principal, Role};

use crate::blocking;
use crate::error::{ApiError, ApiResult, WorkflowResultExt, found};
use crate::session::{Session, clear_session, create_token, redirect_with_flash, session_cookie, take_flash};
use crate::uploads::{FormData, UploadKind};

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub workflows: Workflows,
    pub session_secret: String,
    pub session_ttl: chrono::Duration,
}

impl AppStateInner {
    fn issue_session(&self, jar: CookieJar, principal: &Principal) -> ApiResult<CookieJar> {
        let token = create_token(&self.session_secret, principal, self.session_ttl).map_err(|e| {
            ApiError::Status {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: e.to_string(),
            }
        })?;
        Ok(jar.add(session_cookie(token)))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AdminForm {
    pub username: String,
    pub password: String,
    pub password_confirmation: String,
}

/// GET /login, GET /register: the form plus any pending message.
pub async fn form_page(jar: CookieJar) -> impl IntoResponse {
    let (jar, message) = take_flash(jar);
    (jar, Json(json!({ "message": message })))
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> ApiResult<Response> {
    let identity = state.workflows.identity.clone();
    let outcome = blocking(move || identity.login(&form.username, &form.password)).await?;

    match outcome {
        LoginOutcome::Admitted { principal, landing } => {
            let jar = state.issue_session(jar, &principal)?;
            info!("{} logged in ({})", principal.username, principal.role);
            Ok((jar, found(landing.path())).into_response())
        }
        LoginOutcome::Blocked { message } => {
            warn!("Login blocked: {}", message);
            Ok(redirect_with_flash(clear_session(jar), Landing::Login.path(), &message))
        }
    }
}

pub async fn logout(jar: CookieJar) -> impl IntoResponse {
    (clear_session(jar), found(Landing::Login.path()))
}

/// POST /register. Multipart so campaign creators can attach their
/// identification document.
pub async fn register(State(state): State<AppState>, multipart: Multipart) -> ApiResult<Response> {
    let mut form = FormData::read(multipart)
        .await
        .map_err(|e| e.back_to("/register"))?;

    let identification_document = form
        .file("id_document", UploadKind::Document)
        .map_err(|e| e.back_to("/register"))?;

    let registration = Registration {
        username: form.text("username"),
        password: form.text("password"),
        password_confirmation: form.text("password_confirmation"),
        role: form.text("role"),
        identification_document,
    };

    let identity = state.workflows.identity.clone();
    blocking(move || identity.register(registration))
        .await
        .or_back("/register")?;

    Ok(found(Landing::Login.path()))
}

pub async fn admin_form(session: Session, jar: CookieJar) -> ApiResult<impl IntoResponse> {
    require(session.principal(), &[Role::RootAdministrator], ROOT_ONLY)?;

    let (jar, message) = take_flash(jar);
    Ok((jar, Json(json!({ "message": message }))))
}

pub async fn create_admin(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AdminForm>,
) -> ApiResult<Response> {
    let identity = state.workflows.identity.clone();
    let principal = session.0;
    blocking(move || {
        identity.create_administrator(
            principal.as_ref(),
            &form.username,
            &form.password,
            &form.password_confirmation,
        )
    })
    .await
    .or_back("/register/admin")?;

    Ok(redirect_with_flash(
        CookieJar::new(),
        "/register/admin",
        "Administrator created.",
    ))
}

pub async fn profile_page(
    State(state): State<AppState>,
    session: Session,
    jar: CookieJar,
) -> ApiResult<impl IntoResponse> {
    let identity = state.workflows.identity.clone();
    let principal = session.0;
    let user = blocking(move || identity.profile(principal.as_ref())).await?;

    let (jar, message) = take_flash(jar);
    Ok((jar, Json(json!({ "user": user, "message": message }))))
}

/// POST /profile always lands back on the profile page; problems travel as
/// the flash message.
pub async fn update_profile(
    State(state): State<AppState>,
    session: Session,
    jar: CookieJar,
    multipart: Multipart,
) -> ApiResult<Response> {
    let principal = session
        .0
        .ok_or_else(|| WorkflowError::unauthorized(LOGIN_REQUIRED))?;

    let mut form = FormData::read(multipart)
        .await
        .map_err(|e| e.back_to("/profile"))?;
    let picture = form
        .file("picture", UploadKind::Image)
        .map_err(|e| e.back_to("/profile"))?;

    let change = ProfileChange {
        username: form.text("new_username"),
        password: form.text("new_password"),
        password_confirmation: form.text("new_password_confirmation"),
        picture,
    };

    let identity = state.workflows.identity.clone();
    let updated = blocking(move || identity.update_profile(Some(&principal), change))
        .await
        .or_back("/profile")?;

    let jar = state.issue_session(jar, &updated)?;
    info!("{} updated their profile", updated.username);
    Ok((jar, found("/profile")).into_response())
}
