//! Admin session gate.
//!
//! The login endpoint compares submitted credentials against configured
//! constants and, on match, sets an HTTP-only session cookie holding the
//! configured token. The route gate redirects any admin request whose cookie
//! is missing or not exactly that token. No credential or token ever reaches
//! a client beyond the cookie itself.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{error::AppError, state::AppState};

pub const SESSION_COOKIE: &str = "admin_token";
pub const LOGIN_PATH: &str = "/admin/login";

const SESSION_HOURS: i64 = 8;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(body): Json<LoginRequest>,
) -> Result<(CookieJar, Json<Value>), AppError> {
    if body.email != state.config.admin_email || body.password != state.config.admin_password {
        return Err(AppError::Unauthorized);
    }

    let cookie = Cookie::build((SESSION_COOKIE, state.config.admin_token.clone()))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(time::Duration::hours(SESSION_HOURS))
        .build();

    Ok((jar.add(cookie), Json(json!({ "ok": true }))))
}

/// Route-prefix gate: anything but an exact token match is sent to the login
/// page.
pub async fn require_admin(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Response {
    match jar.get(SESSION_COOKIE) {
        Some(cookie) if cookie.value() == state.config.admin_token => next.run(request).await,
        _ => Redirect::temporary(LOGIN_PATH).into_response(),
    }
}
