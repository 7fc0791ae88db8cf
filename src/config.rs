use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub server: ServerConfig,

    pub providers: ProvidersConfig,

    pub cache: CacheConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub database_url: String,

    pub log_level: String,

    /// Number of tokio worker threads (default: 2)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,

    /// Maximum database connections (default: 5)
    pub max_db_connections: u32,

    /// Minimum database connections (default: 1)
    pub min_db_connections: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite:data/cityscout.db".to_string(),
            log_level: "info".to_string(),
            worker_threads: 2,
            max_db_connections: 5,
            min_db_connections: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,

    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            cors_allowed_origins: vec!["*".to_string()],
        }
    }
}

/// Provider credentials and endpoints. Keys are normally supplied through
/// the environment (see `apply_env_overrides`); base URLs default to the
/// real provider endpoints and exist mainly so tests can point a client
/// at a local mock.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    pub geocode_api_key: String,
    pub geocode_base_url: Option<String>,

    pub weather_api_key: String,
    pub weather_base_url: Option<String>,

    pub events_api_key: String,
    pub events_base_url: Option<String>,

    pub movie_api_key: String,
    pub movie_base_url: Option<String>,

    pub yelp_api_key: String,
    pub yelp_base_url: Option<String>,

    /// Request timeout in seconds for outbound provider calls (default: 30)
    pub request_timeout_seconds: u64,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            geocode_api_key: String::new(),
            geocode_base_url: None,
            weather_api_key: String::new(),
            weather_base_url: None,
            events_api_key: String::new(),
            events_base_url: None,
            movie_api_key: String::new(),
            movie_base_url: None,
            yelp_api_key: String::new(),
            yelp_base_url: None,
            request_timeout_seconds: 30,
        }
    }
}

/// How long cached provider rows stay fresh, per resource type. Locations
/// are permanent and have no TTL.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub weather_ttl_seconds: u64,

    pub events_ttl_seconds: u64,

    pub movies_ttl_seconds: u64,

    pub yelp_ttl_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            weather_ttl_seconds: 150,
            events_ttl_seconds: 1500,
            movies_ttl_seconds: 15000,
            yelp_ttl_seconds: 15000,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let paths = Self::config_paths();

        for path in &paths {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                return Self::load_from_path(path);
            }
        }

        info!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![];

        paths.push(PathBuf::from("config.toml"));

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("cityscout").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".cityscout").join("config.toml"));
        }

        paths
    }

    /// Deployment secrets and ports come from the environment and win
    /// over anything in the config file.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("DATABASE_URL") {
            self.general.database_url = v;
        }
        if let Ok(v) = std::env::var("PORT") {
            if let Ok(port) = v.parse() {
                self.server.port = port;
            }
        }
        if let Ok(v) = std::env::var("GEOCODE_API_KEY") {
            self.providers.geocode_api_key = v;
        }
        if let Ok(v) = std::env::var("WEATHER_API_KEY") {
            self.providers.weather_api_key = v;
        }
        if let Ok(v) = std::env::var("EVENTBRITE_API_KEY") {
            self.providers.events_api_key = v;
        }
        if let Ok(v) = std::env::var("MOVIE_API_KEY") {
            self.providers.movie_api_key = v;
        }
        if let Ok(v) = std::env::var("YELP_API_KEY") {
            self.providers.yelp_api_key = v;
        }
    }

    pub fn validate(&self) -> Result<()> {
        let keys = [
            ("GEOCODE_API_KEY", &self.providers.geocode_api_key),
            ("WEATHER_API_KEY", &self.providers.weather_api_key),
            ("EVENTBRITE_API_KEY", &self.providers.events_api_key),
            ("MOVIE_API_KEY", &self.providers.movie_api_key),
            ("YELP_API_KEY", &self.providers.yelp_api_key),
        ];

        for (name, value) in keys {
            if value.is_empty() {
                anyhow::bail!("{name} is not set (environment or [providers] config)");
            }
        }

        if self.general.max_db_connections == 0 {
            anyhow::bail!("max_db_connections must be > 0");
        }

        Ok(())
    }
}
