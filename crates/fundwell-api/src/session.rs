//! Signed session cookie and one-shot flash messages.

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use fundwell_types::{Principal, Role};

use crate::auth::AppState;
use crate::blocking;
use crate::error::{ApiError, found};

pub const SESSION_COOKIE: &str = "fundwell_session";
pub const FLASH_COOKIE: &str = "fundwell_flash";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub username: String,
    pub role: Role,
    pub exp: usize,
}

pub fn create_token(secret: &str, principal: &Principal, ttl: chrono::Duration) -> anyhow::Result<String> {
    let expires_at = chrono::Utc::now()
        .checked_add_signed(ttl)
        .ok_or_else(|| anyhow::anyhow!("session lifetime out of range"))?;
    let claims = Claims {
        sub: principal.id,
        username: principal.username.clone(),
        role: principal.role,
        exp: expires_at.timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}

/// `None` for an expired, tampered or malformed token.
pub fn decode_token(secret: &str, token: &str) -> Option<Principal> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .ok()?;

    Some(Principal {
        id: data.claims.sub,
        username: data.claims.username,
        role: data.claims.role,
    })
}

pub fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

pub fn clear_session(jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build(SESSION_COOKIE).path("/"))
}

pub fn flash_cookie(message: &str) -> Cookie<'static> {
    Cookie::build((FLASH_COOKIE, URL_SAFE_NO_PAD.encode(message)))
        .path("/")
        .http_only(true)
        .build()
}

/// `302` to `to`, leaving `message` for the next page read.
pub fn redirect_with_flash(jar: CookieJar, to: &str, message: &str) -> Response {
    (jar.add(flash_cookie(message)), found(to)).into_response()
}

/// Read and clear the pending flash message.
pub fn take_flash(jar: CookieJar) -> (CookieJar, Option<String>) {
    let message = jar
        .get(FLASH_COOKIE)
        .and_then(|c| URL_SAFE_NO_PAD.decode(c.value()).ok())
        .and_then(|bytes| String::from_utf8(bytes).ok());

    match message {
        Some(message) => (jar.remove(Cookie::build(FLASH_COOKIE).path("/")), Some(message)),
        None => (jar, None),
    }
}

/// The acting user of a request, if its session cookie is valid and the
/// account behind it may still act in its role.
#[derive(Debug, Clone, Default)]
pub struct Session(pub Option<Principal>);

impl Session {
    pub fn principal(&self) -> Option<&Principal> {
        self.0.as_ref()
    }
}

impl FromRequestParts<AppState> for Session {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let Some(claimed) = jar
            .get(SESSION_COOKIE)
            .and_then(|cookie| decode_token(&state.session_secret, cookie.value()))
        else {
            return Ok(Self(None));
        };

        let identity = state.workflows.identity.clone();
        let principal = blocking(move || identity.resume(&claimed)).await?;
        Ok(Self(principal))
    }
}
