use std::net::SocketAddr;

use configs::AppConfig;
use reqwest::{redirect::Policy, StatusCode as HttpStatusCode};
use serde_json::json;
use tokio::net::TcpListener;

use server::startup;

struct TestApp {
    base_url: String,
    // Keeps the data directory alive for the lifetime of the server.
    _dir: tempfile::TempDir,
}

impl TestApp {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Boot the app on a random port with a fresh local backend.
async fn start_server() -> anyhow::Result<TestApp> {
    let dir = tempfile::tempdir()?;
    let root = dir.path().to_string_lossy().to_string();
    let mut cfg = AppConfig::default();
    cfg.storage.data_dir = root.clone();
    cfg.storage.local_file = format!("{root}/local_storage.json");
    cfg.storage.uploads_dir = format!("{root}/uploads");

    let state = startup::build_state(&cfg).await?;
    let app = startup::app(state);
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await { eprintln!("server error: {}", e); }
    });

    Ok(TestApp { base_url, _dir: dir })
}

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .redirect(Policy::none())
        .build()
        .expect("reqwest client")
}

fn location(res: &reqwest::Response) -> String {
    res.headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

async fn login(app: &TestApp, c: &reqwest::Client) -> anyhow::Result<()> {
    let res = c
        .post(app.url("/login"))
        .form(&[("email", "admin@vipi.local"), ("password", "123456"), ("next", "/admin/tools")])
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/admin/tools");
    Ok(())
}

#[tokio::test]
async fn e2e_public_health() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = client().get(app.url("/health")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body: serde_json::Value = res.json().await?;
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn e2e_gate_redirects_pages_and_rejects_api() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();

    let res = c.get(app.url("/admin/tools?status=low")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/login?next=%2Fadmin%2Ftools%3Fstatus%3Dlow");

    let res = c.get(app.url("/api/admin/tools")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::UNAUTHORIZED);

    let res = c.get(app.url("/api/auth/session")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn e2e_login_rejects_bad_credentials() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();

    let res = c.post(app.url("/login")).form(&[("email", ""), ("password", "")]).send().await?;
    assert_eq!(res.status(), HttpStatusCode::UNPROCESSABLE_ENTITY);
    assert!(res.text().await?.contains("Informe e-mail e senha."));

    let res = c
        .post(app.url("/login"))
        .form(&[("email", "admin@vipi.local"), ("password", "wrong")])
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::UNAUTHORIZED);

    let res = c.get(app.url("/admin/services")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::SEE_OTHER);
    Ok(())
}

#[tokio::test]
async fn e2e_tool_lifecycle_and_exports() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();
    login(&app, &c).await?;

    let res = c
        .post(app.url("/admin/tools/new"))
        .form(&[
            ("name", "Drill"),
            ("description", ""),
            ("quantity", "2"),
            ("min_quantity", "5"),
            ("location", "Shelf A"),
        ])
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/admin/tools?toast=tool_created");

    let page = c.get(app.url("/admin/tools?status=low")).send().await?.text().await?;
    assert!(page.contains("Drill"));
    assert!(page.contains("Estoque Baixo"));

    let tools: serde_json::Value = c.get(app.url("/api/admin/tools")).send().await?.json().await?;
    assert_eq!(tools["total"], 1);
    let id = tools["items"][0]["id"].as_str().unwrap_or_default().to_string();

    let res = c
        .put(app.url(&format!("/api/admin/tools/{id}")))
        .json(&json!({"name": "Drill", "quantity": 10, "min_quantity": 5, "location": "Shelf A"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);

    let summary: serde_json::Value = c.get(app.url("/api/admin/tools/summary")).send().await?.json().await?;
    assert_eq!(summary["low_stock"], 0);
    assert_eq!(summary["total_quantity"], 10);

    let res = c.get(app.url("/admin/tools/export.csv")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let disposition = res.headers()[reqwest::header::CONTENT_DISPOSITION].to_str()?.to_string();
    assert!(disposition.starts_with("attachment; filename=\"estoque-"));
    let csv = res.text().await?;
    assert!(csv.starts_with("Nome,Descrição,Quantidade,Mínimo,Localização,Status"));
    assert!(csv.contains("Drill,,10,5,Shelf A,Em Estoque"));

    let res = c.get(app.url("/admin/tools/export.xlsx")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let bytes = res.bytes().await?;
    assert!(bytes.starts_with(b"PK"));

    let res = c.post(app.url(&format!("/admin/tools/{id}/delete"))).send().await?;
    assert_eq!(location(&res), "/admin/tools?toast=tool_deleted");
    let tools: serde_json::Value = c.get(app.url("/api/admin/tools")).send().await?.json().await?;
    assert_eq!(tools["total"], 0);
    Ok(())
}

#[tokio::test]
async fn e2e_public_catalog_follows_visibility() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();
    login(&app, &c).await?;

    let res = c
        .post(app.url("/api/admin/services"))
        .json(&json!({"name": "Revisão elétrica", "description": "Quadro e tomadas", "is_public": false}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let created: serde_json::Value = res.json().await?;
    let id = created["id"].as_str().unwrap_or_default().to_string();

    let res = client().get(app.url(&format!("/catalog/{id}"))).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);

    let res = c
        .post(app.url(&format!("/admin/services/{id}/visibility")))
        .form(&[("public", "true")])
        .send()
        .await?;
    assert_eq!(location(&res), "/admin/services?toast=service_published");

    let anonymous = client();
    let page = anonymous.get(app.url("/")).send().await?.text().await?;
    assert!(page.contains("Revisão elétrica"));
    let res = anonymous.get(app.url(&format!("/catalog/{id}"))).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);

    let listed: serde_json::Value = anonymous.get(app.url("/api/public/services")).send().await?.json().await?;
    assert_eq!(listed["total"], 1);
    assert!(listed["items"][0].get("cost").is_none());
    Ok(())
}

#[tokio::test]
async fn e2e_admin_session_does_not_admit_other_clients() -> anyhow::Result<()> {
    let app = start_server().await?;
    let admin = client();
    login(&app, &admin).await?;
    assert_eq!(admin.get(app.url("/admin/tools")).send().await?.status(), HttpStatusCode::OK);

    let stranger = client();
    let res = stranger.get(app.url("/admin/tools")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/login?next=%2Fadmin%2Ftools");

    let res = stranger
        .post(app.url("/api/admin/tools"))
        .json(&json!({"name": "Serra", "quantity": 1, "min_quantity": 1}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::UNAUTHORIZED);

    // logging out without the admin cookie leaves the admin signed in
    stranger.get(app.url("/logout")).send().await?;
    assert_eq!(admin.get(app.url("/admin/tools")).send().await?.status(), HttpStatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn e2e_logout_closes_session() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();
    login(&app, &c).await?;

    let session: serde_json::Value = c.get(app.url("/api/auth/session")).send().await?.json().await?;
    assert_eq!(session["email"], "admin@vipi.local");

    let res = c.get(app.url("/logout")).send().await?;
    assert_eq!(location(&res), "/login?toast=logged_out");

    let res = c.get(app.url("/admin/services")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::SEE_OTHER);
    Ok(())
}
