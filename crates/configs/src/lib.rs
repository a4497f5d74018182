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
    pub auth: AuthSettings,
    #[serde(default)]
    pub uploads: UploadSettings,
    #[serde(default)]
    pub contact: ContactSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 8080, worker_threads: Some(4) }
    }
}

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
    #[serde(default = "default_true")]
    pub run_migrations: bool,
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
            run_migrations: true,
        }
    }
}

/// Token and lockout settings for the admin login flow.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    #[serde(default)]
    pub jwt_secret: String,
    #[serde(default = "default_access_ttl")]
    pub access_token_minutes: i64,
    #[serde(default = "default_refresh_ttl")]
    pub refresh_token_days: i64,
    #[serde(default = "default_max_failed_attempts")]
    pub max_failed_attempts: u32,
    #[serde(default = "default_lockout_minutes")]
    pub lockout_minutes: i64,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            access_token_minutes: default_access_ttl(),
            refresh_token_days: default_refresh_ttl(),
            max_failed_attempts: default_max_failed_attempts(),
            lockout_minutes: default_lockout_minutes(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadSettings {
    #[serde(default = "default_upload_dir")]
    pub dir: String,
    #[serde(default = "default_max_upload_bytes")]
    pub max_bytes: usize,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self { dir: default_upload_dir(), max_bytes: default_max_upload_bytes() }
    }
}

/// Outbound contact channel used by the click-tracking endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct ContactSettings {
    #[serde(default = "default_whatsapp_number")]
    pub whatsapp_number: String,
}

impl Default for ContactSettings {
    fn default() -> Self {
        Self { whatsapp_number: default_whatsapp_number() }
    }
}

fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 2 }
fn default_connect_timeout() -> u64 { 30 }
fn default_idle_timeout() -> u64 { 600 }
fn default_max_lifetime() -> u64 { 3600 }
fn default_acquire_timeout() -> u64 { 30 }
fn default_true() -> bool { true }
fn default_access_ttl() -> i64 { 15 }
fn default_refresh_ttl() -> i64 { 30 }
fn default_max_failed_attempts() -> u32 { 5 }
fn default_lockout_minutes() -> i64 { 15 }
fn default_upload_dir() -> String { "uploads".into() }
fn default_max_upload_bytes() -> usize { 10 * 1024 * 1024 }
fn default_whatsapp_number() -> String { "+254722669912".into() }

const DEV_JWT_SECRET: &str = "dev-secret-change-me";

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

/// Parse the file at `path`; `Ok(None)` only when the file does not exist.
pub fn load_optional(path: &str) -> Result<Option<AppConfig>> {
    match load_from_file(path) {
        Ok(cfg) => Ok(Some(cfg)),
        Err(e) if is_not_found(&e) => Ok(None),
        Err(e) => Err(e.context(format!("failed to load {path}"))),
    }
}

fn is_not_found(e: &anyhow::Error) -> bool {
    e.downcast_ref::<std::io::Error>()
        .map(|io| io.kind() == std::io::ErrorKind::NotFound)
        .unwrap_or(false)
}

impl AppConfig {
    /// Load `config.toml` (or `CONFIG_PATH`) when present, otherwise start
    /// from defaults; env overrides and validation apply either way.
    pub fn load() -> Result<Self> {
        let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        let mut cfg = load_optional(&path)?.unwrap_or_default();
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize_from_env();
        self.server.normalize()?;
        self.database.normalize_from_env();
        self.database.validate()?;
        self.auth.normalize_from_env();
        self.auth.validate()?;
        self.uploads.normalize_from_env();
        self.contact.normalize_from_env();
        self.contact.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize_from_env(&mut self) {
        if let Ok(host) = std::env::var("SERVER_HOST") {
            if !host.trim().is_empty() { self.host = host; }
        }
        if let Some(port) = std::env::var("SERVER_PORT").ok().and_then(|p| p.parse::<u16>().ok()) {
            self.port = port;
        }
        if self.worker_threads.is_none() {
            self.worker_threads = std::env::var("TOKIO_WORKER_THREADS").ok().and_then(|v| v.parse::<usize>().ok());
        }
    }

    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be within 1..=65535"));
        }
        match self.worker_threads {
            Some(w) if w > 0 => {}
            _ => self.worker_threads = Some(4),
        }
        Ok(())
    }
}

impl DatabaseConfig {
    pub fn normalize_from_env(&mut self) {
        // env wins only when TOML left the URL empty
        if self.url.trim().is_empty() {
            if let Ok(url) = std::env::var("DATABASE_URL") {
                self.url = url;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(anyhow!("database.url is empty; set it in config.toml or DATABASE_URL"));
        }
        let lower = self.url.to_lowercase();
        if !(lower.starts_with("postgresql://") || lower.starts_with("postgres://") || lower.starts_with("sqlite:")) {
            return Err(anyhow!("database.url must start with postgres://, postgresql:// or sqlite:"));
        }
        if self.min_connections == 0 {
            return Err(anyhow!("database.min_connections must be >= 1"));
        }
        if self.max_connections < self.min_connections {
            return Err(anyhow!("database.max_connections must be >= min_connections"));
        }
        if self.connect_timeout_secs == 0 || self.acquire_timeout_secs == 0 {
            return Err(anyhow!("database timeouts must be positive seconds"));
        }
        Ok(())
    }
}

impl AuthSettings {
    pub fn normalize_from_env(&mut self) {
        if self.jwt_secret.trim().is_empty() {
            self.jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| DEV_JWT_SECRET.to_string());
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.access_token_minutes <= 0 || self.refresh_token_days <= 0 {
            return Err(anyhow!("auth token lifetimes must be positive"));
        }
        if self.max_failed_attempts == 0 {
            return Err(anyhow!("auth.max_failed_attempts must be >= 1"));
        }
        if self.lockout_minutes <= 0 {
            return Err(anyhow!("auth.lockout_minutes must be positive"));
        }
        Ok(())
    }

    pub fn uses_dev_secret(&self) -> bool {
        self.jwt_secret == DEV_JWT_SECRET
    }
}

impl UploadSettings {
    pub fn normalize_from_env(&mut self) {
        if let Ok(dir) = std::env::var("UPLOAD_DIR") {
            if !dir.trim().is_empty() { self.dir = dir; }
        }
        if self.dir.trim().is_empty() {
            self.dir = default_upload_dir();
        }
    }
}

impl ContactSettings {
    pub fn normalize_from_env(&mut self) {
        if let Ok(number) = std::env::var("WHATSAPP_NUMBER") {
            if !number.trim().is_empty() { self.whatsapp_number = number; }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.whatsapp_number.chars().any(|c| c.is_ascii_digit()) {
            return Err(anyhow!("contact.whatsapp_number must contain digits"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_fills_section_defaults() {
        let cfg = parse(r#"
            [server]
            host = "0.0.0.0"
            port = 9000

            [database]
            url = "sqlite::memory:"
        "#).unwrap();
        assert_eq!(cfg.server.port, 9000);
        assert_eq!(cfg.database.max_connections, 10);
        assert!(cfg.database.run_migrations);
        assert_eq!(cfg.auth.max_failed_attempts, 5);
        assert_eq!(cfg.auth.lockout_minutes, 15);
        assert_eq!(cfg.auth.access_token_minutes, 15);
        assert_eq!(cfg.uploads.dir, "uploads");
    }

    #[test]
    fn database_validate_rejects_unknown_scheme() {
        let db = DatabaseConfig { url: "mysql://localhost/x".into(), ..DatabaseConfig::default() };
        assert!(db.validate().is_err());
        let db = DatabaseConfig { url: "postgres://u:p@localhost/shop".into(), ..DatabaseConfig::default() };
        assert!(db.validate().is_ok());
    }

    #[test]
    fn database_validate_checks_pool_bounds() {
        let db = DatabaseConfig { url: "sqlite::memory:".into(), min_connections: 5, max_connections: 2, ..DatabaseConfig::default() };
        assert!(db.validate().is_err());
    }

    #[test]
    fn server_normalize_replaces_zero_workers() {
        let mut s = ServerConfig { host: " ".into(), port: 8080, worker_threads: Some(0) };
        s.normalize().unwrap();
        assert_eq!(s.host, "127.0.0.1");
        assert_eq!(s.worker_threads, Some(4));
    }

    #[test]
    fn auth_validate_rejects_zero_attempts() {
        let a = AuthSettings { max_failed_attempts: 0, ..AuthSettings::default() };
        assert!(a.validate().is_err());
    }

    fn scratch_file(name: &str, content: &str) -> String {
        let path = std::env::temp_dir().join(format!("storefront-configs-{}-{name}", std::process::id()));
        std::fs::write(&path, content).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn missing_file_falls_back() {
        let path = std::env::temp_dir().join("storefront-configs-definitely-absent.toml");
        assert!(load_optional(path.to_str().unwrap()).unwrap().is_none());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let path = scratch_file("broken.toml", "[server]\nport = \"not-a-number\"\n[database\n");
        let err = load_optional(&path).unwrap_err();
        assert!(err.to_string().contains("failed to load"));
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn wrong_types_are_an_error() {
        let path = scratch_file("types.toml", "[server]\nhost = \"0.0.0.0\"\nport = \"eighty\"\n");
        assert!(load_optional(&path).is_err());
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn readable_file_is_parsed() {
        let path = scratch_file("ok.toml", "[server]\nhost = \"0.0.0.0\"\nport = 9100\n");
        let cfg = load_optional(&path).unwrap().unwrap();
        assert_eq!(cfg.server.port, 9100);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn contact_requires_digits() {
        let c = ContactSettings { whatsapp_number: "n/a".into() };
        assert!(c.validate().is_err());
        assert!(ContactSettings::default().validate().is_ok());
    }
}
