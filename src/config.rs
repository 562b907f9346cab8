use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub jwt: JwtConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub drive: DriveConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    #[serde(default = "default_jwt_secret")]
    pub secret: String,
    #[serde(default)]
    pub previous_secrets: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_local_path")]
    pub local_path: String,
}

/// Drive deletion tuning
#[derive(Debug, Clone, Deserialize)]
pub struct DriveConfig {
    /// How many reference checks a bulk deletion runs at once
    #[serde(default = "default_reference_check_concurrency")]
    pub reference_check_concurrency: usize,
    /// Keep deleting the rest of a bulk batch after one file fails
    #[serde(default = "default_continue_on_failure")]
    pub continue_on_failure: bool,
}

// Default values
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    1310
}

fn default_db_path() -> String {
    "data/driveguard.db".to_string()
}

fn default_jwt_secret() -> String {
    "your-super-secret-key-change-it".to_string()
}

fn default_local_path() -> String {
    "data/files".to_string()
}

fn default_reference_check_concurrency() -> usize {
    8
}

fn default_continue_on_failure() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: default_jwt_secret(),
            previous_secrets: Vec::new(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            local_path: default_local_path(),
        }
    }
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            reference_check_concurrency: default_reference_check_concurrency(),
            continue_on_failure: default_continue_on_failure(),
        }
    }
}

impl Config {
    /// Load configuration from file and environment variables
    pub fn load() -> anyhow::Result<Self> {
        let mut config = Self::load_from_file()?;
        config.apply_env_overrides();
        config.normalize();
        config.ensure_directories()?;
        config.ensure_jwt_secret()?;
        tracing::info!(
            "Drive config: reference_check_concurrency={}, continue_on_failure={}",
            config.drive.reference_check_concurrency,
            config.drive.continue_on_failure
        );
        Ok(config)
    }

    /// Ensure JWT secret is not the shipped default, persisting a generated one
    fn ensure_jwt_secret(&mut self) -> anyhow::Result<()> {
        if self.jwt.secret == default_jwt_secret() || self.jwt.secret.is_empty() {
            let secret_path = Path::new("data/.jwt_secret");

            if secret_path.exists() {
                let secret = fs::read_to_string(secret_path)?;
                self.jwt.secret = secret.trim().to_string();
                tracing::info!("Loaded persisted JWT secret from data/.jwt_secret");
            } else {
                let secret = uuid::Uuid::new_v4().to_string();

                if let Some(parent) = secret_path.parent() {
                    fs::create_dir_all(parent)?;
                }

                fs::write(secret_path, &secret)?;
                self.jwt.secret = secret;
                tracing::info!("Generated and persisted new JWT secret to data/.jwt_secret");
            }
        }
        Ok(())
    }

    /// Load configuration from config.toml
    fn load_from_file() -> anyhow::Result<Self> {
        let config_paths = ["config.toml", "data/config.toml"];

        for path in config_paths {
            if Path::new(path).exists() {
                let content = fs::read_to_string(path)?;
                let config = Self::from_toml(&content)?;
                tracing::info!("Loaded configuration from {}", path);
                return Ok(config);
            }
        }

        tracing::info!("No configuration file found, using defaults");
        Ok(Config::default())
    }

    fn from_toml(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply environment variable overrides
    /// Format: DG_CONF_<SECTION>_<KEY>
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = env::var("DG_CONF_SERVER_HOST") {
            self.server.host = val;
        }
        if let Ok(val) = env::var("DG_CONF_SERVER_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }

        if let Ok(val) = env::var("DG_CONF_DATABASE_PATH") {
            self.database.path = val;
        }

        if let Ok(val) = env::var("DG_CONF_JWT_SECRET") {
            self.jwt.secret = val;
        }
        if let Ok(val) = env::var("DG_CONF_JWT_PREVIOUS_SECRETS") {
            self.jwt.previous_secrets = val
                .split(',')
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(|s| s.to_string())
                .collect();
        }

        if let Ok(val) = env::var("DG_CONF_STORAGE_LOCAL_PATH") {
            self.storage.local_path = val;
        }

        if let Ok(val) = env::var("DG_CONF_DRIVE_REFERENCE_CHECK_CONCURRENCY") {
            if let Ok(n) = val.parse() {
                self.drive.reference_check_concurrency = n;
            }
        }
        if let Ok(val) = env::var("DG_CONF_DRIVE_CONTINUE_ON_FAILURE") {
            if let Ok(v) = val.parse() {
                self.drive.continue_on_failure = v;
            }
        }
    }

    fn normalize(&mut self) {
        if self.drive.reference_check_concurrency == 0 {
            self.drive.reference_check_concurrency = 1;
        }
    }

    /// Ensure required directories exist
    fn ensure_directories(&self) -> anyhow::Result<()> {
        if let Some(parent) = Path::new(&self.database.path).parent() {
            fs::create_dir_all(parent)?;
        }

        fs::create_dir_all(&self.storage.local_path)?;

        Ok(())
    }
}
