//! Navigation surface: every admin and public page as a typed route.
//!
//! Paths are canonical; the legacy hash fragments of the old single-page
//! admin (`#/servicos`, `#/novo`, `#/editar/<id>`) parse to the same routes.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    ServiceList,
    ServiceNew,
    ServiceEdit(String),
    ServiceDelete(String),
    Stock,
    ToolNew,
    ToolEdit(String),
    ToolDelete(String),
    StockReport,
    ExportCsv,
    ExportXlsx,
    Catalog,
    CatalogDetail(String),
    Login,
    Logout,
}

pub const DEFAULT_ADMIN_PATH: &str = "/admin/services";

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::ServiceList => DEFAULT_ADMIN_PATH.to_string(),
            Route::ServiceNew => "/admin/services/new".to_string(),
            Route::ServiceEdit(id) => format!("/admin/services/{}/edit", urlencoding::encode(id)),
            Route::ServiceDelete(id) => format!("/admin/services/{}/delete", urlencoding::encode(id)),
            Route::Stock => "/admin/tools".to_string(),
            Route::ToolNew => "/admin/tools/new".to_string(),
            Route::ToolEdit(id) => format!("/admin/tools/{}/edit", urlencoding::encode(id)),
            Route::ToolDelete(id) => format!("/admin/tools/{}/delete", urlencoding::encode(id)),
            Route::StockReport => "/admin/tools/report".to_string(),
            Route::ExportCsv => "/admin/tools/export.csv".to_string(),
            Route::ExportXlsx => "/admin/tools/export.xlsx".to_string(),
            Route::Catalog => "/".to_string(),
            Route::CatalogDetail(id) => format!("/catalog/{}", urlencoding::encode(id)),
            Route::Login => "/login".to_string(),
            Route::Logout => "/logout".to_string(),
        }
    }

    pub fn is_admin(&self) -> bool {
        !matches!(self, Route::Catalog | Route::CatalogDetail(_) | Route::Login | Route::Logout)
    }

    /// Parse a path (`/admin/tools/3/edit`) or a legacy hash (`#/editar/3`,
    /// `/admin.html#/novo`). Query strings are ignored.
    pub fn parse(raw: &str) -> Option<Route> {
        if let Some((_, hash)) = raw.split_once('#') {
            return Self::parse_hash(hash);
        }
        let path = raw.split('?').next().unwrap_or_default();
        let segments: Vec<&str> = path.trim_matches('/').split('/').filter(|s| !s.is_empty()).collect();
        let decode = |s: &str| urlencoding::decode(s).map(|c| c.into_owned()).ok();
        let route = match segments.as_slice() {
            [] => Route::Catalog,
            ["catalog", id] => Route::CatalogDetail(decode(id)?),
            ["login"] => Route::Login,
            ["logout"] => Route::Logout,
            ["admin"] | ["admin", "services"] => Route::ServiceList,
            ["admin", "services", "new"] => Route::ServiceNew,
            ["admin", "services", id, "edit"] => Route::ServiceEdit(decode(id)?),
            ["admin", "services", id, "delete"] => Route::ServiceDelete(decode(id)?),
            ["admin", "tools"] => Route::Stock,
            ["admin", "tools", "new"] => Route::ToolNew,
            ["admin", "tools", "report"] => Route::StockReport,
            ["admin", "tools", "export.csv"] => Route::ExportCsv,
            ["admin", "tools", "export.xlsx"] => Route::ExportXlsx,
            ["admin", "tools", id, "edit"] => Route::ToolEdit(decode(id)?),
            ["admin", "tools", id, "delete"] => Route::ToolDelete(decode(id)?),
            _ => return None,
        };
        Some(route)
    }

    fn parse_hash(hash: &str) -> Option<Route> {
        let segments: Vec<&str> = hash.trim_matches('/').split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [] | ["servicos"] => Some(Route::ServiceList),
            ["novo"] => Some(Route::ServiceNew),
            ["editar", id] => Some(Route::ServiceEdit((*id).to_string())),
            ["estoque"] => Some(Route::Stock),
            _ => None,
        }
    }
}

/// Where to go after login. Only internal admin destinations are honored.
pub fn sanitize_next(next: Option<&str>) -> String {
    let Some(next) = next.map(str::trim).filter(|n| !n.is_empty()) else {
        return DEFAULT_ADMIN_PATH.to_string();
    };
    if next.starts_with('#') {
        return Route::parse(next).map(|r| r.path()).unwrap_or_else(|| DEFAULT_ADMIN_PATH.to_string());
    }
    let internal = next.starts_with("/admin")
        && !next.starts_with("//")
        && !next.contains("://")
        && !next.contains('\\');
    match Route::parse(next) {
        Some(route) if internal && route.is_admin() => next.to_string(),
        _ => DEFAULT_ADMIN_PATH.to_string(),
    }
}

/// Login page address that returns to `next` afterwards.
pub fn login_redirect(next: &str) -> String {
    format!("/login?next={}", urlencoding::encode(next))
}

/// `path` with a `toast` code appended.
pub fn with_toast(path: &str, code: &str) -> String {
    let sep = if path.contains('?') { '&' } else { '?' };
    format!("{path}{sep}toast={code}")
}
