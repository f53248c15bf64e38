use axum::{
    extract::DefaultBodyLimit,
    middleware,
    response::Redirect,
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::{TraceLayer, DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, DefaultOnFailure},
};
use tracing::Level;
use utoipa::OpenApi;

use common::types::Health;

use crate::gate;
use crate::nav::DEFAULT_ADMIN_PATH;
use crate::openapi::ApiDoc;
use crate::state::AppState;

pub mod api;
pub mod auth;
pub mod catalog;
pub mod events;
pub mod forms;
pub mod services;
pub mod tools;

/// Multipart service forms carry several images.
const UPLOAD_BODY_LIMIT: usize = 64 * 1024 * 1024;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the full application router: public catalog, login, and the
/// session-gated admin pages and API.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let uploads = ServeDir::new(&state.uploads_dir);
    let uploads_path = state.public_uploads_path.clone();

    // Public routes (catalog, login, health)
    let public = Router::new()
        .route("/", get(catalog::index))
        .route("/catalog/:id", get(catalog::detail))
        .route("/login", get(auth::login_form).post(auth::login_submit))
        .route("/logout", get(auth::logout).post(auth::logout))
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi_json))
        .route("/api/public/services", get(api::public_services))
        .route("/api/public/services/:id", get(api::public_service))
        .route("/api/auth/login", post(auth::api_login))
        .route("/api/auth/logout", post(auth::api_logout))
        .route("/api/auth/session", get(auth::api_session));

    // Admin pages
    let pages = Router::new()
        .route("/admin", get(|| async { Redirect::to(DEFAULT_ADMIN_PATH) }))
        .route("/admin/services", get(services::list))
        .route("/admin/services/new", get(services::new_form).post(services::create))
        .route("/admin/services/:id/edit", get(services::edit_form).post(services::update))
        .route("/admin/services/:id/delete", get(services::delete_confirm).post(services::delete))
        .route("/admin/services/:id/visibility", post(services::toggle_visibility))
        .route("/admin/tools", get(tools::stock))
        .route("/admin/tools/new", get(tools::new_form).post(tools::create))
        .route("/admin/tools/:id/edit", get(tools::edit_form).post(tools::update))
        .route("/admin/tools/:id/delete", get(tools::delete_confirm).post(tools::delete))
        .route("/admin/tools/report", get(tools::report))
        .route("/admin/tools/export.csv", get(tools::export_csv))
        .route("/admin/tools/export.xlsx", get(tools::export_xlsx))
        .route("/admin/events", get(events::events));

    // Admin JSON API
    let admin_api = Router::new()
        .route("/api/admin/services", get(api::list_services).post(api::create_service))
        .route("/api/admin/services/summary", get(api::service_summary))
        .route(
            "/api/admin/services/:id",
            get(api::get_service).patch(api::update_service).delete(api::delete_service),
        )
        .route("/api/admin/services/:id/visibility", post(api::set_visibility))
        .route("/api/admin/tools", get(api::list_tools).post(api::create_tool))
        .route("/api/admin/tools/summary", get(api::stock_summary))
        .route(
            "/api/admin/tools/:id",
            get(api::get_tool).put(api::update_tool).delete(api::delete_tool),
        );

    let admin = pages
        .merge(admin_api)
        .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT))
        .route_layer(middleware::from_fn_with_state(state.clone(), gate::require_admin));

    // Compose
    public
        .merge(admin)
        .nest_service(&uploads_path, uploads)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // 每次请求创建 span，包含方法和路径等，日志级别为 INFO
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(
                    DefaultOnRequest::new()
                        .level(Level::DEBUG),
                )
                // 响应返回时打点，包含状态码与耗时
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                // 失败（5xx 等）时以 ERROR 记录
                .on_failure(
                    DefaultOnFailure::new()
                        .level(Level::ERROR),
                )
        )
}
