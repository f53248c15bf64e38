//! Admin pages for catalog services.

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use service::errors::ServiceError;
use service::listing::search_services;
use service::stats::ServiceSummary;
use tracing::{error, warn};

use super::forms::{ServiceForm, VisibilityForm, MISSING_SERVICE_NAME};
use crate::nav::{with_toast, Route};
use crate::state::AppState;
use crate::views::confirm::confirm_delete;
use crate::views::layout::admin_page;
use crate::views::services::{service_form, service_list, ServiceFormValues};
use crate::views::toast::{codes, Toast};

#[derive(Debug, Default, Deserialize)]
pub struct ToastQuery {
    pub toast: Option<String>,
}

impl ToastQuery {
    pub fn toast(&self) -> Option<Toast> {
        self.toast.as_deref().and_then(Toast::from_code)
    }
}

fn back_to_list(code: &str) -> Response {
    Redirect::to(&with_toast(&Route::ServiceList.path(), code)).into_response()
}

fn failure_code(e: &ServiceError, fallback: &'static str) -> &'static str {
    match e {
        ServiceError::NotFound(_) => codes::NOT_FOUND,
        ServiceError::Upload(_) => codes::UPLOAD_FAILED,
        _ => fallback,
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ServiceListQuery {
    pub q: Option<String>,
    pub toast: Option<String>,
}

pub async fn list(State(state): State<AppState>, Query(q): Query<ServiceListQuery>) -> Html<String> {
    let term = q.q.unwrap_or_default();
    let toast = q.toast.as_deref().and_then(Toast::from_code);
    match state.catalog.list_services().await {
        Ok(all) => {
            let services = search_services(&all, &term);
            let summary = ServiceSummary::from_services(&services);
            Html(admin_page("Serviços", toast, service_list(&services, summary, &term)))
        }
        Err(e) => {
            error!(error = %e, "failed to load services");
            let toast = Some(Toast::error("Erro ao carregar serviços!"));
            Html(admin_page("Serviços", toast, service_list(&[], ServiceSummary::default(), &term)))
        }
    }
}

pub async fn new_form(Query(q): Query<ToastQuery>) -> Html<String> {
    let form = service_form("Cadastrar Serviço", &Route::ServiceNew.path(), &ServiceFormValues::default(), None);
    Html(admin_page("Cadastrar Serviço", q.toast(), form))
}

pub async fn create(State(state): State<AppState>, multipart: Multipart) -> Response {
    let action = Route::ServiceNew.path();
    let form = match ServiceForm::read(multipart).await {
        Ok(form) => form,
        Err(e) => {
            warn!(error = %e, "unreadable service form");
            return back_to_list(codes::UPLOAD_FAILED);
        }
    };
    if !form.has_name() {
        let page = admin_page("Cadastrar Serviço", None, service_form("Cadastrar Serviço", &action, &form.values(Vec::new()), Some(MISSING_SERVICE_NAME)));
        return (StatusCode::UNPROCESSABLE_ENTITY, Html(page)).into_response();
    }
    let input = form.to_input();
    let values = form.values(Vec::new());
    match state.catalog.create_service(input, form.uploads).await {
        Ok(_) => back_to_list(codes::SERVICE_CREATED),
        Err(e) => {
            error!(error = %e, "service create failed");
            let toast = Toast::from_code(failure_code(&e, codes::SERVICE_SAVE_FAILED));
            let page = admin_page("Cadastrar Serviço", toast, service_form("Cadastrar Serviço", &action, &values, None));
            (StatusCode::BAD_REQUEST, Html(page)).into_response()
        }
    }
}

pub async fn edit_form(State(state): State<AppState>, Path(id): Path<String>, Query(q): Query<ToastQuery>) -> Response {
    match state.catalog.get_service(&id).await {
        Ok(svc) => {
            let form = service_form("Editar Serviço", &Route::ServiceEdit(id).path(), &ServiceFormValues::from(&svc), None);
            Html(admin_page("Editar Serviço", q.toast(), form)).into_response()
        }
        Err(e) => back_to_list(failure_code(&e, codes::SERVICE_SAVE_FAILED)),
    }
}

pub async fn update(State(state): State<AppState>, Path(id): Path<String>, multipart: Multipart) -> Response {
    let action = Route::ServiceEdit(id.clone()).path();
    let form = match ServiceForm::read(multipart).await {
        Ok(form) => form,
        Err(e) => {
            warn!(error = %e, "unreadable service form");
            return back_to_list(codes::UPLOAD_FAILED);
        }
    };
    if !form.has_name() {
        let images = state.catalog.get_service(&id).await.map(|s| s.images).unwrap_or_default();
        let page = admin_page("Editar Serviço", None, service_form("Editar Serviço", &action, &form.values(images), Some(MISSING_SERVICE_NAME)));
        return (StatusCode::UNPROCESSABLE_ENTITY, Html(page)).into_response();
    }
    let patch = form.to_patch();
    match state.catalog.update_service(&id, patch, form.uploads).await {
        Ok(_) => back_to_list(codes::SERVICE_UPDATED),
        Err(e) => {
            error!(%id, error = %e, "service update failed");
            back_to_list(failure_code(&e, codes::SERVICE_SAVE_FAILED))
        }
    }
}

pub async fn delete_confirm(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.catalog.get_service(&id).await {
        Ok(svc) => {
            let dialog = confirm_delete("o serviço", &svc.name, &Route::ServiceDelete(id).path(), &Route::ServiceList.path());
            Html(admin_page("Confirmar Exclusão", None, dialog)).into_response()
        }
        Err(e) => back_to_list(failure_code(&e, codes::SERVICE_DELETE_FAILED)),
    }
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.catalog.delete_service(&id).await {
        Ok(()) => back_to_list(codes::SERVICE_DELETED),
        Err(e) => {
            error!(%id, error = %e, "service delete failed");
            back_to_list(codes::SERVICE_DELETE_FAILED)
        }
    }
}

pub async fn toggle_visibility(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<VisibilityForm>,
) -> Response {
    let make_public = form.make_public();
    match state.catalog.toggle_visibility(&id, make_public).await {
        Ok(_) if make_public => back_to_list(codes::SERVICE_PUBLISHED),
        Ok(_) => back_to_list(codes::SERVICE_HIDDEN),
        Err(e) => {
            error!(%id, error = %e, "visibility toggle failed");
            back_to_list(failure_code(&e, codes::SERVICE_SAVE_FAILED))
        }
    }
}
