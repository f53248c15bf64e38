//! Session gate in front of every admin route.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{debug, warn};

use crate::errors::JsonApiError;
use crate::nav::login_redirect;
use crate::state::AppState;

pub const AUTH_COOKIE: &str = "auth_token";

/// Token from `Authorization: Bearer` or, failing that, the auth cookie.
pub fn presented_token(headers: &HeaderMap, jar: &CookieJar) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string());
    bearer
        .or_else(|| jar.get(AUTH_COOKIE).map(|c| c.value().to_string()))
        .filter(|t| !t.is_empty())
}

/// Lets the request through with the `AdminSession` in its extensions.
/// Without a session, `/api` callers get 401 and pages redirect to login
/// carrying the requested path.
pub async fn require_admin(State(state): State<AppState>, jar: CookieJar, mut req: Request, next: Next) -> Response {
    let token = presented_token(req.headers(), &jar);
    match state.sessions.current(token.as_deref()).await {
        Some(session) => {
            debug!(email = %session.email, path = %req.uri().path(), "admin session ok");
            req.extensions_mut().insert(session);
            next.run(req).await
        }
        None => {
            let path = req.uri().path();
            if path.starts_with("/api") {
                warn!(%path, "api call without session");
                return JsonApiError::unauthorized().into_response();
            }
            let target = req.uri().path_and_query().map(|p| p.as_str()).unwrap_or(path);
            Redirect::to(&login_redirect(target)).into_response()
        }
    }
}
