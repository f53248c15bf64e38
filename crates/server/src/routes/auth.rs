//! Login and logout, as pages and as JSON.

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Form, Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use service::auth::domain::{AdminSession, IssuedSession, LoginInput, SessionKind};
use service::auth::errors::AuthError;
use tracing::{info, warn};

use super::forms::LoginForm;
use crate::errors::JsonApiError;
use crate::gate::{presented_token, AUTH_COOKIE};
use crate::nav::{sanitize_next, Route};
use crate::state::AppState;
use crate::views::login::{login_page, LOGIN_FAILED, MISSING_CREDENTIALS};
use crate::views::toast::Toast;

/// Browser-session cookie; the token itself carries the expiry.
fn session_cookie(token: String) -> Cookie<'static> {
    let mut cookie = Cookie::new(AUTH_COOKIE, token);
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_secure(false);
    cookie.set_same_site(SameSite::Lax);
    cookie
}

fn expired_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::from(AUTH_COOKIE);
    cookie.set_path("/");
    cookie
}

/// Store the issued token in the auth cookie.
fn remember(jar: CookieJar, issued: &IssuedSession) -> CookieJar {
    match &issued.token {
        Some(token) => jar.add(session_cookie(token.clone())),
        None => jar,
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginQuery {
    pub next: Option<String>,
    pub toast: Option<String>,
}

pub async fn login_form(
    State(state): State<AppState>,
    headers: HeaderMap,
    jar: CookieJar,
    Query(q): Query<LoginQuery>,
) -> Response {
    let next = sanitize_next(q.next.as_deref());
    let token = presented_token(&headers, &jar);
    if state.sessions.current(token.as_deref()).await.is_some() {
        return Redirect::to(&next).into_response();
    }
    let message = q.toast.as_deref().and_then(Toast::from_code).map(|t| t.message);
    Html(login_page(&next, "", message)).into_response()
}

pub async fn login_submit(State(state): State<AppState>, jar: CookieJar, Form(form): Form<LoginForm>) -> Response {
    let next = sanitize_next(form.next.as_deref());
    let input = LoginInput { email: form.email.trim().to_string(), password: form.password };
    if !input.is_complete() {
        return (StatusCode::UNPROCESSABLE_ENTITY, Html(login_page(&next, &input.email, Some(MISSING_CREDENTIALS)))).into_response();
    }
    let email = input.email.clone();
    match state.sessions.login(input).await {
        Ok(issued) => {
            info!(email = %issued.session.email, "admin logged in");
            let jar = remember(jar, &issued);
            (jar, Redirect::to(&next)).into_response()
        }
        Err(AuthError::Validation(_)) => {
            (StatusCode::UNPROCESSABLE_ENTITY, Html(login_page(&next, &email, Some(MISSING_CREDENTIALS)))).into_response()
        }
        Err(e) => {
            warn!(%email, error = %e, "login failed");
            let status = if matches!(e, AuthError::Unauthorized) { StatusCode::UNAUTHORIZED } else { StatusCode::INTERNAL_SERVER_ERROR };
            (status, Html(login_page(&next, &email, Some(LOGIN_FAILED)))).into_response()
        }
    }
}

pub async fn logout(State(state): State<AppState>, headers: HeaderMap, jar: CookieJar) -> Response {
    let token = presented_token(&headers, &jar);
    if let Err(e) = state.sessions.logout(token.as_deref()).await {
        warn!(error = %e, "logout failed");
    }
    let target = format!("{}?toast={}", Route::Login.path(), crate::views::toast::codes::LOGGED_OUT);
    (jar.remove(expired_cookie()), Redirect::to(&target)).into_response()
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionOutput {
    pub email: String,
    pub kind: SessionKind,
    pub since: chrono::DateTime<chrono::Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl SessionOutput {
    fn from_session(s: AdminSession, token: Option<String>) -> Self {
        Self { email: s.email, kind: s.kind, since: s.since, token }
    }
}

#[utoipa::path(post, path = "/api/auth/login", tag = "auth", request_body = crate::openapi::LoginRequest, responses((status = 200, description = "Logged In"), (status = 400, description = "Missing email or password"), (status = 401, description = "Unauthorized")))]
pub async fn api_login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(input): Json<LoginInput>,
) -> Result<(CookieJar, Json<SessionOutput>), JsonApiError> {
    if !input.is_complete() {
        return Err(JsonApiError::new(StatusCode::BAD_REQUEST, "Validation Error", Some(MISSING_CREDENTIALS.into())));
    }
    let issued = state.sessions.login(input).await?;
    let jar = remember(jar, &issued);
    Ok((jar, Json(SessionOutput::from_session(issued.session, issued.token))))
}

#[utoipa::path(post, path = "/api/auth/logout", tag = "auth", responses((status = 204, description = "Logged Out")))]
pub async fn api_logout(State(state): State<AppState>, headers: HeaderMap, jar: CookieJar) -> Result<(CookieJar, StatusCode), JsonApiError> {
    let token = presented_token(&headers, &jar);
    state.sessions.logout(token.as_deref()).await?;
    Ok((jar.remove(expired_cookie()), StatusCode::NO_CONTENT))
}

#[utoipa::path(get, path = "/api/auth/session", tag = "auth", responses((status = 200, description = "Active session"), (status = 401, description = "No session")))]
pub async fn api_session(State(state): State<AppState>, headers: HeaderMap, jar: CookieJar) -> Result<Json<SessionOutput>, JsonApiError> {
    let token = presented_token(&headers, &jar);
    state
        .sessions
        .current(token.as_deref())
        .await
        .map(|s| Json(SessionOutput::from_session(s, None)))
        .ok_or_else(JsonApiError::unauthorized)
}
