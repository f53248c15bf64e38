use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
    /// 以 JSON 格式输出日志
    #[serde(default)]
    pub json_logs: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 8080, worker_threads: Some(4), json_logs: false }
    }
}

/// Remote backend settings. An empty `url` means no remote backend is
/// configured and the local fallback store is used instead.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
    #[serde(default = "default_max_lifetime")]
    pub max_lifetime_secs: u64,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    #[serde(default)]
    pub sqlx_logging: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout(),
            idle_timeout_secs: default_idle_timeout(),
            max_lifetime_secs: default_max_lifetime(),
            acquire_timeout_secs: default_acquire_timeout(),
            sqlx_logging: false,
        }
    }
}

fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 2 }
fn default_connect_timeout() -> u64 { 30 }
fn default_idle_timeout() -> u64 { 600 }
fn default_max_lifetime() -> u64 { 3600 }
fn default_acquire_timeout() -> u64 { 30 }

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    /// Key-value file backing the local fallback store.
    #[serde(default = "default_local_file")]
    pub local_file: String,
    #[serde(default = "default_uploads_dir")]
    pub uploads_dir: String,
    /// URL prefix under which `uploads_dir` is served.
    #[serde(default = "default_public_uploads_path")]
    pub public_uploads_path: String,
}

fn default_data_dir() -> String { "data".into() }
fn default_local_file() -> String { "data/local_storage.json".into() }
fn default_uploads_dir() -> String { "data/uploads".into() }
fn default_public_uploads_path() -> String { "/uploads".into() }

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            local_file: default_local_file(),
            uploads_dir: default_uploads_dir(),
            public_uploads_path: default_public_uploads_path(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    #[serde(default = "default_session_hours")]
    pub session_hours: i64,
    #[serde(default = "default_local_admin_email")]
    pub local_admin_email: String,
    #[serde(default = "default_local_admin_password")]
    pub local_admin_password: String,
    /// Admin account created at startup in remote mode when missing.
    #[serde(default)]
    pub bootstrap_admin_email: Option<String>,
    #[serde(default)]
    pub bootstrap_admin_password: Option<String>,
}

fn default_jwt_secret() -> String { "dev-secret-change-me".into() }
fn default_session_hours() -> i64 { 12 }
fn default_local_admin_email() -> String { "admin@vipi.local".into() }
fn default_local_admin_password() -> String { "123456".into() }

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            session_hours: default_session_hours(),
            local_admin_email: default_local_admin_email(),
            local_admin_password: default_local_admin_password(),
            bootstrap_admin_email: None,
            bootstrap_admin_password: None,
        }
    }
}

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let cfg: AppConfig = toml::from_str(&content)?;
    Ok(cfg)
}

impl AppConfig {
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Like [`AppConfig::load_and_validate`], but a missing config file falls
    /// back to defaults plus environment overrides. Parse errors still fail.
    pub fn load_or_default() -> Result<Self> {
        let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        let mut cfg = if std::path::Path::new(&path).exists() {
            load_from_file(&path)?
        } else {
            AppConfig::default()
        };
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        // 归一化 server（支持环境变量覆盖 host/port）
        self.server.apply_env();
        self.server.normalize()?;
        // 归一化 database（支持从环境变量填充 URL）
        self.database.normalize_from_env();
        self.database.validate()?;
        self.auth.apply_env();
        self.auth.validate()?;
        Ok(())
    }

    /// True when a remote backend URL is configured.
    pub fn has_remote_backend(&self) -> bool {
        !self.database.url.trim().is_empty()
    }
}

impl ServerConfig {
    fn apply_env(&mut self) {
        if let Ok(host) = std::env::var("SERVER_HOST") {
            self.host = host;
        }
        if let Some(port) = std::env::var("SERVER_PORT").ok().and_then(|p| p.parse::<u16>().ok()) {
            self.port = port;
        }
        if let Some(w) = std::env::var("TOKIO_WORKER_THREADS").ok().and_then(|v| v.parse::<usize>().ok()) {
            self.worker_threads = Some(w);
        }
    }

    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port 必须在 1..=65535 范围内"));
        }
        if let Some(w) = self.worker_threads {
            if w == 0 { self.worker_threads = Some(4); }
        } else {
            self.worker_threads = Some(4);
        }
        Ok(())
    }
}

impl DatabaseConfig {
    pub fn normalize_from_env(&mut self) {
        // 若 TOML 中未提供 URL，则尝试从环境变量填充
        if self.url.trim().is_empty() {
            if let Ok(url) = std::env::var("DATABASE_URL") {
                self.url = url;
            }
        }
    }

    /// An empty URL is valid: it selects the local fallback store.
    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Ok(());
        }
        let lower = self.url.to_lowercase();
        if !(lower.starts_with("postgresql://") || lower.starts_with("postgres://")) {
            return Err(anyhow!("database.url 必须以 postgresql:// 或 postgres:// 开头"));
        }
        if self.min_connections == 0 {
            return Err(anyhow!("database.min_connections 必须 >= 1"));
        }
        if self.max_connections < self.min_connections {
            return Err(anyhow!("database.max_connections 必须 >= min_connections"));
        }
        if self.connect_timeout_secs == 0 || self.acquire_timeout_secs == 0 {
            return Err(anyhow!("database 超时配置必须为正整数秒"));
        }
        Ok(())
    }
}

impl AuthConfig {
    fn apply_env(&mut self) {
        if let Ok(secret) = std::env::var("JWT_SECRET") {
            if !secret.trim().is_empty() {
                self.jwt_secret = secret;
            }
        }
    }

    fn validate(&self) -> Result<()> {
        if self.jwt_secret.trim().is_empty() {
            return Err(anyhow!("auth.jwt_secret 不能为空"));
        }
        if self.session_hours <= 0 {
            return Err(anyhow!("auth.session_hours 必须为正整数"));
        }
        if self.local_admin_email.trim().is_empty() || self.local_admin_password.is_empty() {
            return Err(anyhow!("auth.local_admin_email / local_admin_password 不能为空"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_local_defaults() {
        let cfg: AppConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.storage.local_file, "data/local_storage.json");
        assert_eq!(cfg.auth.local_admin_email, "admin@vipi.local");
        assert!(!cfg.has_remote_backend());
    }

    #[test]
    fn database_url_must_be_postgres() {
        let mut db = DatabaseConfig::default();
        db.url = "mysql://localhost/db".into();
        assert!(db.validate().is_err());
        db.url = "postgres://u:p@localhost/vipi".into();
        assert!(db.validate().is_ok());
    }

    #[test]
    fn empty_database_url_is_accepted() {
        assert!(DatabaseConfig::default().validate().is_ok());
    }

    #[test]
    fn sections_parse_from_toml() {
        let raw = r#"
            [server]
            host = "0.0.0.0"
            port = 9000

            [storage]
            uploads_dir = "/tmp/up"

            [auth]
            session_hours = 2
            bootstrap_admin_email = "root@vipi.local"
        "#;
        let cfg: AppConfig = toml::from_str(raw).unwrap();
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.port, 9000);
        assert_eq!(cfg.storage.uploads_dir, "/tmp/up");
        assert_eq!(cfg.storage.public_uploads_path, "/uploads");
        assert_eq!(cfg.auth.session_hours, 2);
        assert_eq!(cfg.auth.bootstrap_admin_email.as_deref(), Some("root@vipi.local"));
    }
}
