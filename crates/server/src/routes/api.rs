//! JSON API mirroring the admin pages, plus the public service listing.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use common::types::Page;
use serde::Deserialize;
use service::domain::{PublicService, Service, ServiceInput, ServicePatch, Tool, ToolInput};
use service::listing::search_services;
use service::pagination::Pagination;
use service::stats::{ServiceSummary, StockSummary};
use tracing::info;

use crate::errors::JsonApiError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageParams {
    /// 1-based page index
    pub page: Option<u32>,
    /// items per page (1..=100)
    pub per_page: Option<u32>,
}

impl PageParams {
    fn pagination(&self) -> Pagination {
        let d = Pagination::default();
        Pagination { page: self.page.unwrap_or(d.page), per_page: self.per_page.unwrap_or(d.per_page) }
    }

    fn page_of<T: Clone>(&self, items: &[T]) -> Page<T> {
        let p = self.pagination();
        let (idx, per) = p.normalize();
        Page { items: p.slice(items), page: idx as u32 + 1, per_page: per as u32, total: items.len() as u64 }
    }
}

#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ToolListParams {
    /// free-text search over name, description and location
    pub q: Option<String>,
    /// all | low | ok
    pub status: Option<String>,
    /// name | quantity | location
    pub sort: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ServiceListParams {
    /// case-insensitive search over name and description
    pub q: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct VisibilityInput {
    pub public: bool,
}

#[utoipa::path(get, path = "/api/public/services", tag = "public", params(PageParams), responses((status = 200, description = "Public services, newest first")))]
pub async fn public_services(State(state): State<AppState>, Query(p): Query<PageParams>) -> Result<Json<Page<PublicService>>, JsonApiError> {
    let list = state.catalog.list_public_services().await?;
    Ok(Json(p.page_of(&list)))
}

#[utoipa::path(get, path = "/api/public/services/{id}", tag = "public", responses((status = 200, description = "OK"), (status = 404, description = "Not Found")))]
pub async fn public_service(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<PublicService>, JsonApiError> {
    Ok(Json(state.catalog.public_service(&id).await?))
}

#[utoipa::path(get, path = "/api/admin/services", tag = "services", params(ServiceListParams), responses((status = 200, description = "OK"), (status = 401, description = "Unauthorized")))]
pub async fn list_services(State(state): State<AppState>, Query(p): Query<ServiceListParams>) -> Result<Json<Page<Service>>, JsonApiError> {
    let all = state.catalog.list_services().await?;
    let list = search_services(&all, p.q.as_deref().unwrap_or_default());
    let paging = PageParams { page: p.page, per_page: p.per_page };
    Ok(Json(paging.page_of(&list)))
}

#[utoipa::path(post, path = "/api/admin/services", tag = "services", request_body = crate::openapi::ServiceInputDoc, responses((status = 201, description = "Created"), (status = 400, description = "Validation Error")))]
pub async fn create_service(State(state): State<AppState>, Json(input): Json<ServiceInput>) -> Result<(StatusCode, Json<Service>), JsonApiError> {
    let created = state.catalog.create_service(input, Vec::new()).await?;
    info!(id = %created.id, "service created via api");
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(get, path = "/api/admin/services/{id}", tag = "services", responses((status = 200, description = "OK"), (status = 404, description = "Not Found")))]
pub async fn get_service(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Service>, JsonApiError> {
    Ok(Json(state.catalog.get_service(&id).await?))
}

#[utoipa::path(patch, path = "/api/admin/services/{id}", tag = "services", request_body = crate::openapi::ServicePatchDoc, responses((status = 200, description = "Updated"), (status = 404, description = "Not Found")))]
pub async fn update_service(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<ServicePatch>,
) -> Result<Json<Service>, JsonApiError> {
    Ok(Json(state.catalog.update_service(&id, patch, Vec::new()).await?))
}

#[utoipa::path(delete, path = "/api/admin/services/{id}", tag = "services", responses((status = 204, description = "Deleted (also when absent)")))]
pub async fn delete_service(State(state): State<AppState>, Path(id): Path<String>) -> Result<StatusCode, JsonApiError> {
    state.catalog.delete_service(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(post, path = "/api/admin/services/{id}/visibility", tag = "services", request_body = crate::openapi::VisibilityRequest, responses((status = 200, description = "Updated"), (status = 404, description = "Not Found")))]
pub async fn set_visibility(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<VisibilityInput>,
) -> Result<Json<Service>, JsonApiError> {
    Ok(Json(state.catalog.toggle_visibility(&id, input.public).await?))
}

#[utoipa::path(get, path = "/api/admin/services/summary", tag = "services", responses((status = 200, description = "Counts by visibility")))]
pub async fn service_summary(State(state): State<AppState>) -> Result<Json<ServiceSummary>, JsonApiError> {
    let list = state.catalog.list_services().await?;
    Ok(Json(ServiceSummary::from_services(&list)))
}

#[utoipa::path(get, path = "/api/admin/tools", tag = "tools", params(ToolListParams), responses((status = 200, description = "Filtered and sorted tools")))]
pub async fn list_tools(State(state): State<AppState>, Query(p): Query<ToolListParams>) -> Result<Json<Page<Tool>>, JsonApiError> {
    let query = service::listing::ToolQuery::from_params(p.q.as_deref(), p.status.as_deref(), p.sort.as_deref());
    let (visible, _total) = state.catalog.list_tools(&query).await?;
    let paging = PageParams { page: p.page, per_page: p.per_page };
    Ok(Json(paging.page_of(&visible)))
}

#[utoipa::path(post, path = "/api/admin/tools", tag = "tools", request_body = crate::openapi::ToolInputDoc, responses((status = 201, description = "Created"), (status = 400, description = "Validation Error")))]
pub async fn create_tool(State(state): State<AppState>, Json(input): Json<ToolInput>) -> Result<(StatusCode, Json<Tool>), JsonApiError> {
    Ok((StatusCode::CREATED, Json(state.catalog.create_tool(input).await?)))
}

#[utoipa::path(get, path = "/api/admin/tools/{id}", tag = "tools", responses((status = 200, description = "OK"), (status = 404, description = "Not Found")))]
pub async fn get_tool(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Tool>, JsonApiError> {
    Ok(Json(state.catalog.get_tool(&id).await?))
}

#[utoipa::path(put, path = "/api/admin/tools/{id}", tag = "tools", request_body = crate::openapi::ToolInputDoc, responses((status = 200, description = "Updated"), (status = 404, description = "Not Found")))]
pub async fn update_tool(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<ToolInput>,
) -> Result<Json<Tool>, JsonApiError> {
    Ok(Json(state.catalog.update_tool(&id, input).await?))
}

#[utoipa::path(delete, path = "/api/admin/tools/{id}", tag = "tools", responses((status = 204, description = "Deleted (also when absent)")))]
pub async fn delete_tool(State(state): State<AppState>, Path(id): Path<String>) -> Result<StatusCode, JsonApiError> {
    state.catalog.delete_tool(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(get, path = "/api/admin/tools/summary", tag = "tools", responses((status = 200, description = "Stock summary")))]
pub async fn stock_summary(State(state): State<AppState>) -> Result<Json<StockSummary>, JsonApiError> {
    Ok(Json(state.catalog.stock_summary().await?))
}
