use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub auth: AuthSettings,
    #[serde(default)]
    pub notifications: NotificationSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
    /// Seed the in-memory repository with demonstration data.
    #[serde(default = "default_true")]
    pub seed_data: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 8080, worker_threads: Some(4), seed_data: true }
    }
}

/// Where entity services get their data from.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ApiMode {
    /// In-process repository, no network.
    #[default]
    Mock,
    /// REST API at `api.base_url`.
    Remote,
}

impl ApiMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "mock" => Some(ApiMode::Mock),
            "remote" => Some(ApiMode::Remote),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default)]
    pub mode: ApiMode,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self { mode: ApiMode::Mock, base_url: default_base_url(), timeout_secs: default_timeout() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    /// HS256 secret; without one the server issues and accepts opaque mock tokens.
    #[serde(default)]
    pub jwt_secret: Option<String>,
    #[serde(default = "default_session_path")]
    pub session_path: String,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self { jwt_secret: None, session_path: default_session_path() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NotificationSettings {
    #[serde(default = "default_notification_duration")]
    pub default_duration_ms: u64,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self { default_duration_ms: default_notification_duration() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { format: default_log_format() }
    }
}

fn default_true() -> bool { true }
fn default_base_url() -> String { "http://127.0.0.1:8080".into() }
fn default_timeout() -> u64 { 30 }
fn default_session_path() -> String { "data/session.json".into() }
fn default_notification_duration() -> u64 { 3000 }
fn default_log_format() -> String { "compact".into() }

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Load `config.toml` when present, otherwise start from defaults; env vars fill gaps either way.
    pub fn load_or_default() -> Result<Self> {
        let mut cfg = load_default().unwrap_or_default();
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.api.normalize_from_env();
        self.api.validate()?;
        self.auth.normalize_from_env();
        if self.notifications.default_duration_ms == 0 {
            return Err(anyhow!("notifications.default_duration_ms must be > 0"));
        }
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if let Ok(host) = std::env::var("SERVER_HOST") {
            if !host.trim().is_empty() { self.host = host; }
        }
        if let Some(port) = std::env::var("SERVER_PORT").ok().and_then(|p| p.parse::<u16>().ok()) {
            self.port = port;
        }
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be within 1..=65535"));
        }
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(4),
            Some(_) => {}
        }
        Ok(())
    }
}

impl ApiConfig {
    pub fn normalize_from_env(&mut self) {
        if let Ok(url) = std::env::var("API_BASE_URL") {
            if !url.trim().is_empty() { self.base_url = url; }
        }
        if let Some(mode) = std::env::var("API_MODE").ok().and_then(|m| ApiMode::parse(&m)) {
            self.mode = mode;
        }
        while self.base_url.ends_with('/') {
            self.base_url.pop();
        }
    }

    pub fn validate(&self) -> Result<()> {
        let lower = self.base_url.to_lowercase();
        if !(lower.starts_with("http://") || lower.starts_with("https://")) {
            return Err(anyhow!("api.base_url must start with http:// or https://"));
        }
        if self.timeout_secs == 0 {
            return Err(anyhow!("api.timeout_secs must be a positive number of seconds"));
        }
        Ok(())
    }
}

impl AuthSettings {
    pub fn normalize_from_env(&mut self) {
        if self.jwt_secret.is_none() {
            self.jwt_secret = std::env::var("JWT_SECRET").ok().filter(|s| !s.trim().is_empty());
        }
    }
}
