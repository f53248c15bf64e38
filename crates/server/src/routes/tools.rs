//! Stock pages: tool list with search/filter/sort, forms, report and exports.

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use chrono::Local;
use serde::Deserialize;
use service::errors::ServiceError;
use service::export::{self, csv::tools_to_csv, xlsx::tools_to_xlsx};
use service::listing::{apply_tool_query, ToolQuery};
use service::stats::StockSummary;
use tracing::{error, info};

use super::forms::{ToolForm, MISSING_TOOL_NAME};
use super::services::ToastQuery;
use crate::nav::{with_toast, Route};
use crate::state::AppState;
use crate::views::confirm::confirm_delete;
use crate::views::layout::stock_page as page;
use crate::views::report::detailed_report;
use crate::views::toast::{codes, Toast};
use crate::views::tools::{stock_page, tool_form, ToolFormValues};

#[derive(Debug, Default, Deserialize)]
pub struct StockQuery {
    pub q: Option<String>,
    pub status: Option<String>,
    pub sort: Option<String>,
    pub toast: Option<String>,
}

impl StockQuery {
    pub fn criteria(&self) -> ToolQuery {
        ToolQuery::from_params(self.q.as_deref(), self.status.as_deref(), self.sort.as_deref())
    }
}

fn back_to_stock(code: &str) -> Response {
    Redirect::to(&with_toast(&Route::Stock.path(), code)).into_response()
}

fn not_found_or(e: &ServiceError, fallback: &'static str) -> &'static str {
    if matches!(e, ServiceError::NotFound(_)) { codes::NOT_FOUND } else { fallback }
}

pub async fn stock(State(state): State<AppState>, Query(q): Query<StockQuery>) -> Html<String> {
    let criteria = q.criteria();
    let toast = q.toast.as_deref().and_then(Toast::from_code);
    match state.catalog.all_tools().await {
        Ok(all) => {
            let visible = apply_tool_query(&all, &criteria);
            let summary = StockSummary::from_tools(&all);
            Html(page("Estoque", toast, stock_page(&summary, &criteria, &visible, all.len())))
        }
        Err(e) => {
            error!(error = %e, "failed to load tools");
            let toast = Some(Toast::error("Erro ao carregar ferramentas!"));
            Html(page("Estoque", toast, stock_page(&StockSummary::default(), &criteria, &[], 0)))
        }
    }
}

pub async fn new_form(Query(q): Query<ToastQuery>) -> Html<String> {
    let form = tool_form("Nova Ferramenta", &Route::ToolNew.path(), &ToolFormValues::default(), None);
    Html(page("Nova Ferramenta", q.toast(), form))
}

pub async fn create(State(state): State<AppState>, Form(form): Form<ToolForm>) -> Response {
    let action = Route::ToolNew.path();
    if !form.has_name() {
        let html = page("Nova Ferramenta", None, tool_form("Nova Ferramenta", &action, &form.values(), Some(MISSING_TOOL_NAME)));
        return (StatusCode::UNPROCESSABLE_ENTITY, Html(html)).into_response();
    }
    match state.catalog.create_tool(form.to_input()).await {
        Ok(_) => back_to_stock(codes::TOOL_CREATED),
        Err(e) => {
            error!(error = %e, "tool create failed");
            let toast = Toast::from_code(codes::TOOL_CREATE_FAILED);
            let html = page("Nova Ferramenta", toast, tool_form("Nova Ferramenta", &action, &form.values(), None));
            (StatusCode::BAD_REQUEST, Html(html)).into_response()
        }
    }
}

pub async fn edit_form(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.catalog.get_tool(&id).await {
        Ok(tool) => {
            let form = tool_form("Editar Ferramenta", &Route::ToolEdit(id).path(), &ToolFormValues::from(&tool), None);
            Html(page("Editar Ferramenta", None, form)).into_response()
        }
        Err(e) => back_to_stock(not_found_or(&e, codes::TOOL_UPDATE_FAILED)),
    }
}

pub async fn update(State(state): State<AppState>, Path(id): Path<String>, Form(form): Form<ToolForm>) -> Response {
    if !form.has_name() {
        let action = Route::ToolEdit(id).path();
        let html = page("Editar Ferramenta", None, tool_form("Editar Ferramenta", &action, &form.values(), Some(MISSING_TOOL_NAME)));
        return (StatusCode::UNPROCESSABLE_ENTITY, Html(html)).into_response();
    }
    match state.catalog.update_tool(&id, form.to_input()).await {
        Ok(_) => back_to_stock(codes::TOOL_UPDATED),
        Err(e) => {
            error!(%id, error = %e, "tool update failed");
            back_to_stock(not_found_or(&e, codes::TOOL_UPDATE_FAILED))
        }
    }
}

pub async fn delete_confirm(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.catalog.get_tool(&id).await {
        Ok(tool) => {
            let dialog = confirm_delete("a ferramenta", &tool.name, &Route::ToolDelete(id).path(), &Route::Stock.path());
            Html(page("Confirmar Exclusão", None, dialog)).into_response()
        }
        Err(e) => back_to_stock(not_found_or(&e, codes::TOOL_DELETE_FAILED)),
    }
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.catalog.delete_tool(&id).await {
        Ok(()) => back_to_stock(codes::TOOL_DELETED),
        Err(e) => {
            error!(%id, error = %e, "tool delete failed");
            back_to_stock(codes::TOOL_DELETE_FAILED)
        }
    }
}

pub async fn report(State(state): State<AppState>) -> Response {
    match state.catalog.all_tools().await {
        Ok(tools) => Html(page("Relatório Detalhado", None, detailed_report(&tools, Local::now().naive_local()))).into_response(),
        Err(e) => {
            error!(error = %e, "report failed");
            back_to_stock(codes::EXPORT_FAILED)
        }
    }
}

/// Export the tools currently visible with the given criteria.
async fn visible_tools(state: &AppState, q: &StockQuery) -> Result<Vec<service::domain::Tool>, ServiceError> {
    let all = state.catalog.all_tools().await?;
    Ok(apply_tool_query(&all, &q.criteria()))
}

fn attachment(content_type: &'static str, filename: String, body: Vec<u8>) -> Response {
    let disposition = format!("attachment; filename=\"{filename}\"");
    ([(header::CONTENT_TYPE, content_type.to_string()), (header::CONTENT_DISPOSITION, disposition)], body).into_response()
}

pub async fn export_csv(State(state): State<AppState>, Query(q): Query<StockQuery>) -> Response {
    match visible_tools(&state, &q).await {
        Ok(tools) => {
            info!(rows = tools.len(), "csv export");
            let filename = export::csv_filename(Local::now().date_naive());
            attachment(export::CSV_CONTENT_TYPE, filename, tools_to_csv(&tools).into_bytes())
        }
        Err(e) => {
            error!(error = %e, "csv export failed");
            back_to_stock(codes::EXPORT_FAILED)
        }
    }
}

pub async fn export_xlsx(State(state): State<AppState>, Query(q): Query<StockQuery>) -> Response {
    let now = Local::now();
    let result = match visible_tools(&state, &q).await {
        Ok(tools) => tools_to_xlsx(&tools, now.naive_local()).map(|bytes| (tools.len(), bytes)),
        Err(e) => Err(e),
    };
    match result {
        Ok((rows, bytes)) => {
            info!(rows, bytes = bytes.len(), "xlsx export");
            attachment(export::XLSX_CONTENT_TYPE, export::xlsx_filename(now.date_naive()), bytes)
        }
        Err(e) => {
            error!(error = %e, "xlsx export failed");
            back_to_stock(codes::EXPORT_FAILED)
        }
    }
}
