use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use tower::ServiceExt;

use configs::AppConfig;
use service::auth::domain::LoginInput;
use service::auth::{LocalSessionProvider, SessionProvider};
use service::backend::Backend;
use service::catalog::repository::mock::{MockServiceRepository, MockToolRepository};
use service::catalog::CatalogService;
use service::domain::ServiceInput;
use service::changes::ChangeFeed;
use service::images::DataUrlImageSink;
use service::storage::LocalStorage;
use server::{routes, state::AppState};

const BOUNDARY: &str = "XtestBoundaryX";

struct Harness {
    router: Router,
    catalog: Arc<CatalogService>,
    services: Arc<MockServiceRepository>,
    sessions: Arc<LocalSessionProvider>,
    _dir: tempfile::TempDir,
}

async fn harness() -> anyhow::Result<Harness> {
    let dir = tempfile::tempdir()?;
    let storage = LocalStorage::open(dir.path().join("local_storage.json")).await?;
    let cfg = AppConfig::default();
    let sessions = Arc::new(LocalSessionProvider::new(
        storage,
        &cfg.auth.local_admin_email,
        &cfg.auth.local_admin_password,
    ));
    let services = Arc::new(MockServiceRepository::default());
    let catalog = CatalogService::new(
        services.clone(),
        Arc::new(MockToolRepository::default()),
        Arc::new(DataUrlImageSink),
        ChangeFeed::new(16),
    );
    let catalog = Arc::new(catalog);
    let state = AppState {
        catalog: catalog.clone(),
        sessions: sessions.clone(),
        backend: Backend::Local,
        uploads_dir: dir.path().join("uploads").to_string_lossy().to_string(),
        public_uploads_path: "/uploads".into(),
    };
    let router = routes::build_router(state, tower_http::cors::CorsLayer::very_permissive());
    Ok(Harness { router, catalog, services, sessions, _dir: dir })
}

/// Log the local admin in and return the session cookie header value.
async fn sign_in(h: &Harness) -> anyhow::Result<String> {
    let input = LoginInput { email: "admin@vipi.local".into(), password: "123456".into() };
    let issued = h.sessions.login(input).await?;
    let token = issued.token.ok_or_else(|| anyhow::anyhow!("no session token"))?;
    Ok(format!("auth_token={token}"))
}

fn multipart_body(fields: &[(&str, &str)]) -> String {
    let mut body = String::new();
    for (name, value) in fields {
        body.push_str(&format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        ));
    }
    // An untouched file input still sends an empty part.
    body.push_str(&format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"images\"; filename=\"\"\r\nContent-Type: application/octet-stream\r\n\r\n\r\n"
    ));
    body.push_str(&format!("--{BOUNDARY}--\r\n"));
    body
}

fn post_service(cookie: Option<&str>, fields: &[(&str, &str)]) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/admin/services/new")
        .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"));
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(multipart_body(fields))).expect("request")
}

async fn body_text(res: axum::response::Response) -> anyhow::Result<String> {
    let bytes = res.into_body().collect().await?.to_bytes();
    Ok(String::from_utf8(bytes.to_vec())?)
}

#[tokio::test]
async fn blank_service_name_never_reaches_backend() -> anyhow::Result<()> {
    let h = harness().await?;
    let cookie = sign_in(&h).await?;

    let res = h
        .router
        .clone()
        .oneshot(post_service(Some(&cookie), &[("name", "   "), ("description", "kept")]))
        .await?;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let html = body_text(res).await?;
    assert!(html.contains("Informe o nome do serviço."));
    assert!(html.contains("kept"));
    assert_eq!(h.services.calls(), 0);
    Ok(())
}

#[tokio::test]
async fn named_service_is_created_and_redirects_with_toast() -> anyhow::Result<()> {
    let h = harness().await?;
    let cookie = sign_in(&h).await?;

    let res = h
        .router
        .clone()
        .oneshot(post_service(Some(&cookie), &[("name", "Pintura"), ("cost", "150,50"), ("is_public", "on")]))
        .await?;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(res.headers()[header::LOCATION], "/admin/services?toast=service_created");
    assert_eq!(h.services.calls(), 1);
    Ok(())
}

#[tokio::test]
async fn backend_failure_re_renders_form_with_error_toast() -> anyhow::Result<()> {
    let h = harness().await?;
    let cookie = sign_in(&h).await?;
    h.services.fail_with("connection reset");

    let res = h.router.clone().oneshot(post_service(Some(&cookie), &[("name", "Pintura")])).await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let html = body_text(res).await?;
    assert!(html.contains("Erro ao salvar serviço!"));
    assert!(html.contains("Pintura"));
    Ok(())
}

#[tokio::test]
async fn signed_out_post_is_redirected_to_login() -> anyhow::Result<()> {
    let h = harness().await?;

    let res = h.router.clone().oneshot(post_service(None, &[("name", "Pintura")])).await?;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(res.headers()[header::LOCATION], "/login?next=%2Fadmin%2Fservices%2Fnew");
    assert_eq!(h.services.calls(), 0);
    Ok(())
}

#[tokio::test]
async fn other_clients_stay_out_while_admin_is_signed_in() -> anyhow::Result<()> {
    let h = harness().await?;
    sign_in(&h).await?;

    let res = h.router.clone().oneshot(post_service(None, &[("name", "Pintura")])).await?;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    let forged = h
        .router
        .clone()
        .oneshot(post_service(Some("auth_token=guessed"), &[("name", "Pintura")]))
        .await?;
    assert_eq!(forged.status(), StatusCode::SEE_OTHER);
    assert_eq!(h.services.calls(), 0);
    Ok(())
}

#[tokio::test]
async fn openapi_document_is_served() -> anyhow::Result<()> {
    let h = harness().await?;
    let req = Request::builder().uri("/api-docs/openapi.json").body(Body::empty())?;
    let res = h.router.clone().oneshot(req).await?;
    assert_eq!(res.status(), StatusCode::OK);
    let doc: serde_json::Value = serde_json::from_str(&body_text(res).await?)?;
    assert!(doc["paths"]["/api/admin/services"].is_object());
    Ok(())
}

fn get(cookie: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .expect("request")
}

#[tokio::test]
async fn search_term_narrows_service_list() -> anyhow::Result<()> {
    let h = harness().await?;
    let cookie = sign_in(&h).await?;
    for (name, description) in [("Pintura de parede", "Tinta acrílica"), ("Troca de fiação", "Quadro elétrico")] {
        let input = ServiceInput { name: name.into(), description: Some(description.into()), ..Default::default() };
        h.catalog.create_service(input, Vec::new()).await?;
    }

    let res = h.router.clone().oneshot(get(&cookie, "/admin/services?q=PINTURA")).await?;
    assert_eq!(res.status(), StatusCode::OK);
    let html = body_text(res).await?;
    assert!(html.contains("Pintura de parede"));
    assert!(!html.contains("Troca de fiação"));

    let res = h.router.clone().oneshot(get(&cookie, "/api/admin/services?q=el%C3%A9trico")).await?;
    let page: serde_json::Value = serde_json::from_str(&body_text(res).await?)?;
    assert_eq!(page["total"], 1);
    assert_eq!(page["items"][0]["name"], "Troca de fiação");

    let res = h.router.clone().oneshot(get(&cookie, "/api/admin/services")).await?;
    let page: serde_json::Value = serde_json::from_str(&body_text(res).await?)?;
    assert_eq!(page["total"], 2);
    Ok(())
}
