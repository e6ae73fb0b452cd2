use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use thiserror::Error;
use tracing::{debug, error};

use fundwell_core::WorkflowError;
use fundwell_types::api::ErrorBody;

use crate::session::redirect_with_flash;

pub type ApiResult<T> = Result<T, ApiError>;

/// How a failed request is answered. Browser flows get a `302` with an
/// optional flash message, API-style endpoints a JSON body.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("redirect to {to}")]
    Redirect { to: String, flash: Option<String> },

    #[error("{message}")]
    Status { status: StatusCode, message: String },
}

impl ApiError {
    pub fn redirect(to: impl Into<String>, flash: Option<String>) -> Self {
        Self::Redirect {
            to: to.into(),
            flash,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::Status {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<WorkflowError> for ApiError {
    fn from(err: WorkflowError) -> Self {
        let status = match &err {
            WorkflowError::Unauthorized(message) => {
                return Self::redirect("/login", Some(message.clone()));
            }
            WorkflowError::Validation(_) => StatusCode::BAD_REQUEST,
            WorkflowError::NotFound(_) | WorkflowError::IntegrityGap(_) => StatusCode::NOT_FOUND,
            WorkflowError::Conflict(_) => StatusCode::CONFLICT,
            WorkflowError::CorruptState(_) | WorkflowError::Persistence(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self::Status {
            status,
            message: err.to_string(),
        }
    }
}

/// Per-endpoint alternatives to the default mapping.
pub trait WorkflowResultExt<T> {
    /// Form endpoints: send input mistakes back to the form with a message.
    fn or_back(self, form: &str) -> ApiResult<T>;

    /// Admin review reads: a missing row is a silent redirect.
    fn or_quiet(self, to: &str) -> ApiResult<T>;
}

impl<T> WorkflowResultExt<T> for Result<T, WorkflowError> {
    fn or_back(self, form: &str) -> ApiResult<T> {
        self.map_err(|err| match err {
            WorkflowError::Validation(message) | WorkflowError::Conflict(message) => {
                ApiError::redirect(form, Some(message))
            }
            other => other.into(),
        })
    }

    fn or_quiet(self, to: &str) -> ApiResult<T> {
        self.map_err(|err| match err {
            WorkflowError::NotFound(_) => ApiError::redirect(to, None),
            other => other.into(),
        })
    }
}

/// `302 Found` to `to`.
pub fn found(to: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, to.to_string())]).into_response()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Redirect { to, flash } => match flash {
                Some(message) => redirect_with_flash(CookieJar::new(), &to, &message),
                None => found(&to),
            },
            Self::Status { status, message } => {
                if status.is_server_error() {
                    error!("{}", message);
                } else {
                    debug!(status = %status, "{}", message);
                }
                (status, Json(ErrorBody { error: message })).into_response()
            }
        }
    }
}
