//! Public catalog pages; no session required.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;
use service::errors::ServiceError;
use tracing::{error, warn};

use crate::state::AppState;
use crate::views::catalog::{catalog_grid, service_detail};
use crate::views::gallery::Gallery;
use crate::views::html::el;
use crate::views::layout::public_page;

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let page = match state.catalog.list_public_services().await {
        Ok(list) => public_page("Catálogo", catalog_grid(Ok(&list[..]))),
        Err(e) => {
            error!(error = %e, "public catalog load failed");
            public_page("Catálogo", catalog_grid(Err(())))
        }
    };
    Html(page)
}

#[derive(Debug, Default, Deserialize)]
pub struct GalleryQuery {
    pub img: Option<usize>,
    pub view: Option<String>,
}

pub async fn detail(State(state): State<AppState>, Path(id): Path<String>, Query(q): Query<GalleryQuery>) -> Response {
    match state.catalog.public_service(&id).await {
        Ok(svc) => {
            let gallery = Gallery::from_query(svc.images.len(), q.img, q.view.as_deref());
            Html(public_page(&svc.name, service_detail(&svc, gallery))).into_response()
        }
        Err(ServiceError::NotFound(_)) => {
            warn!(%id, "public service not found");
            let body = el("p").class("note").text("Serviço não encontrado.").into();
            (StatusCode::NOT_FOUND, Html(public_page("Catálogo", body))).into_response()
        }
        Err(e) => {
            error!(%id, error = %e, "public service load failed");
            (StatusCode::INTERNAL_SERVER_ERROR, Html(public_page("Catálogo", catalog_grid(Err(()))))).into_response()
        }
    }
}
