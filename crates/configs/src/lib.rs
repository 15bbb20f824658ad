use anyhow::anyhow;
use anyhow::Result;
use serde::Deserialize;

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
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 5000, worker_threads: None }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub root: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { root: "data/storage_root".into() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    pub keys_file: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self { keys_file: "data/api_keys.json".into() }
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
    /// Load config.toml if present, apply env overrides, then validate.
    /// Falls back to an all-default config when no file exists.
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default().unwrap_or_default();
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize_from_env()?;
        self.database.normalize_from_env();
        self.database.validate()?;
        self.storage.normalize_from_env();
        self.auth.normalize_from_env();
        Ok(())
    }
}

impl ServerConfig {
    fn normalize_from_env(&mut self) -> Result<()> {
        if let Ok(host) = std::env::var("WEB_SERVER_HOST") {
            self.host = host;
        }
        if let Ok(port) = std::env::var("WEB_SERVER_PORT") {
            self.port = port
                .parse::<u16>()
                .map_err(|_| anyhow!("WEB_SERVER_PORT must be a port number"))?;
        }
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        Ok(())
    }
}

impl DatabaseConfig {
    pub fn normalize_from_env(&mut self) {
        if let Ok(url) = std::env::var("DATABASE_URL") {
            self.url = url;
        }
        if self.url.trim().is_empty() {
            self.url = "sqlite://data/asset_server.sqlite3?mode=rwc".to_string();
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.url.to_lowercase().starts_with("sqlite:") {
            return Err(anyhow!("database.url must be a sqlite: URL"));
        }
        Ok(())
    }
}

impl StorageConfig {
    fn normalize_from_env(&mut self) {
        if let Ok(root) = std::env::var("STORAGE_ROOT") {
            self.root = root;
        }
    }
}

impl AuthConfig {
    fn normalize_from_env(&mut self) {
        if let Ok(path) = std::env::var("API_KEYS_FILE") {
            self.keys_file = path;
        }
    }
}
