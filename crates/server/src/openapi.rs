use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(utoipa::ToSchema)]
pub struct LoginRequest { pub email: String, pub password: String }

#[derive(utoipa::ToSchema)]
pub struct ServiceInputDoc {
    pub name: String,
    pub description: Option<String>,
    pub images: Option<Vec<String>>,
    pub image_url: Option<String>,
    pub execution_time_minutes: Option<u32>,
    pub cost: Option<f64>,
    pub is_public: bool,
    /// Plain text, or any JSON object or array
    pub annotation: Option<String>,
}

/// Absent fields are left unchanged; `null` clears an optional field.
#[derive(utoipa::ToSchema)]
pub struct ServicePatchDoc {
    pub name: Option<String>,
    pub description: Option<String>,
    pub images: Option<Vec<String>>,
    pub execution_time_minutes: Option<u32>,
    pub cost: Option<f64>,
    pub is_public: Option<bool>,
    pub annotation: Option<String>,
}

#[derive(utoipa::ToSchema)]
pub struct VisibilityRequest { pub public: bool }

#[derive(utoipa::ToSchema)]
pub struct ToolInputDoc {
    pub name: String,
    pub description: Option<String>,
    pub quantity: i64,
    pub min_quantity: i64,
    pub location: Option<String>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::api_login,
        crate::routes::auth::api_logout,
        crate::routes::auth::api_session,
        crate::routes::api::public_services,
        crate::routes::api::public_service,
        crate::routes::api::list_services,
        crate::routes::api::create_service,
        crate::routes::api::get_service,
        crate::routes::api::update_service,
        crate::routes::api::delete_service,
        crate::routes::api::set_visibility,
        crate::routes::api::service_summary,
        crate::routes::api::list_tools,
        crate::routes::api::create_tool,
        crate::routes::api::get_tool,
        crate::routes::api::update_tool,
        crate::routes::api::delete_tool,
        crate::routes::api::stock_summary,
    ),
    components(
        schemas(
            HealthResponse,
            LoginRequest,
            ServiceInputDoc,
            ServicePatchDoc,
            VisibilityRequest,
            ToolInputDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "public"),
        (name = "services"),
        (name = "tools")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_catalog_paths() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        assert!(paths.iter().any(|p| p.as_str() == "/api/public/services"));
        assert!(paths.iter().any(|p| p.as_str() == "/api/admin/tools/{id}"));
        assert!(paths.iter().any(|p| p.as_str() == "/api/auth/login"));
    }
}
