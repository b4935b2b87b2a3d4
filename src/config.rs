use std::env;
use std::path::PathBuf;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_USERS_FILE: &str = "users.json";
const DEFAULT_MONGO_URI: &str = "mongodb://localhost:27017";
const DEFAULT_MONGO_DB_NAME: &str = "mydatabase";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("PORT must be a number between 0 and 65535, got '{0}'")]
    InvalidPort(String),
    #[error("TLS_CERT_FILE and TLS_KEY_FILE must be provided together")]
    IncompleteTls,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageMode {
    Json,
    Mongo,
}

impl StorageMode {
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "mongo" | "mongodb" => StorageMode::Mongo,
            "json" => StorageMode::Json,
            other => {
                log::warn!("⚠️  Unknown STORAGE_MODE '{}', falling back to json", other);
                StorageMode::Json
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsConfig {
    pub cert_path: PathBuf,
    pub key_path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub storage_mode: StorageMode,
    pub users_file: PathBuf,
    pub mongo_uri: String,
    pub mongo_db_name: String,
    pub tls: Option<TlsConfig>,
}

impl Config {
    /// Reads the configuration from the process environment (after `.env`).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };

        let tls = match (lookup("TLS_CERT_FILE"), lookup("TLS_KEY_FILE")) {
            (Some(cert), Some(key)) => Some(TlsConfig {
                cert_path: cert.into(),
                key_path: key.into(),
            }),
            (None, None) => None,
            _ => return Err(ConfigError::IncompleteTls),
        };

        Ok(Self {
            host: get("HOST", DEFAULT_HOST),
            port,
            storage_mode: StorageMode::parse(&get("STORAGE_MODE", "json")),
            users_file: get("USERS_FILE", DEFAULT_USERS_FILE).into(),
            mongo_uri: get("MONGO_URI", DEFAULT_MONGO_URI),
            mongo_db_name: get("MONGO_DB_NAME", DEFAULT_MONGO_DB_NAME),
            tls,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
