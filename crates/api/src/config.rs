//! API configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Database (one of)
//! - `MONGO_URI` - Full MongoDB connection string
//! - `DB_USER` + `DB_PASS` - Atlas credentials, combined with `DB_CLUSTER_HOST`
//!
//! ## Optional
//! - `HOST` - Bind address (default: 0.0.0.0)
//! - `PORT` - Listen port (default: 5000)
//! - `DB_CLUSTER_HOST` - Atlas cluster host (default: cluster0.cvrlul4.mongodb.net)
//! - `DB_NAME` - Database name (default: nextshop)
//! - `IMAGE_MODE` - `upload` or `url` (default: upload)
//! - `UPLOAD_DIR` - Directory for uploaded images (default: uploads)
//! - `MAX_UPLOAD_BYTES` - Request body limit in bytes (default: 10485760)
//! - `LOG_FORMAT` - `text` or `json` (default: text)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use secrecy::SecretString;
use thiserror::Error;

const DEFAULT_CLUSTER_HOST: &str = "cluster0.cvrlul4.mongodb.net";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// How `POST /products` accepts an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageMode {
    /// Multipart file part, stored under the upload directory.
    #[default]
    Upload,
    /// Client-supplied URL, stored verbatim.
    Url,
}

impl FromStr for ImageMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "upload" => Ok(Self::Upload),
            "url" => Ok(Self::Url),
            other => Err(format!("expected 'upload' or 'url', got '{other}'")),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("expected 'text' or 'json', got '{other}'")),
        }
    }
}

/// MongoDB connection settings.
#[derive(Clone)]
pub struct DatabaseConfig {
    /// Connection string (contains credentials)
    pub uri: SecretString,
    /// Database holding the `products` collection
    pub name: String,
}

impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("uri", &"[REDACTED]")
            .field("name", &self.name)
            .finish()
    }
}

/// API application configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Document store settings
    pub database: DatabaseConfig,
    /// Image input policy for product creation
    pub image_mode: ImageMode,
    /// Where uploaded images are written and served from
    pub upload_dir: PathBuf,
    /// Maximum accepted request body size
    pub max_upload_bytes: usize,
    /// Log output format
    pub log_format: LogFormat,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = parse_env_or_default("HOST", "0.0.0.0")?;
        let port = parse_env_or_default("PORT", "5000")?;
        let database = DatabaseConfig::from_env()?;
        let image_mode = parse_env_or_default("IMAGE_MODE", "upload")?;
        let upload_dir = PathBuf::from(get_env_or_default("UPLOAD_DIR", "uploads"));
        let max_upload_bytes =
            parse_env_or_default("MAX_UPLOAD_BYTES", &DEFAULT_MAX_UPLOAD_BYTES.to_string())?;
        let log_format = parse_env_or_default("LOG_FORMAT", "text")?;

        Ok(Self {
            host,
            port,
            database,
            image_mode,
            upload_dir,
            max_upload_bytes,
            log_format,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl DatabaseConfig {
    /// Load database settings from environment variables.
    ///
    /// `MONGO_URI` wins when set; otherwise the URI is assembled from
    /// `DB_USER`, `DB_PASS` and the cluster host.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if neither form is configured.
    pub fn from_env() -> Result<Self, ConfigError> {
        let uri = match get_optional_env("MONGO_URI") {
            Some(uri) => uri,
            None => {
                let user = get_required_env("DB_USER")?;
                let pass = get_required_env("DB_PASS")?;
                let host = get_env_or_default("DB_CLUSTER_HOST", DEFAULT_CLUSTER_HOST);
                atlas_uri(&user, &pass, &host)
            }
        };

        Ok(Self {
            uri: SecretString::from(uri),
            name: get_env_or_default("DB_NAME", "nextshop"),
        })
    }
}

/// Build an Atlas SRV connection string with percent-encoded credentials.
fn atlas_uri(user: &str, pass: &str, host: &str) -> String {
    format!(
        "mongodb+srv://{}:{}@{host}/?retryWrites=true&w=majority&appName=Cluster0",
        urlencoding::encode(user),
        urlencoding::encode(pass),
    )
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable, treating blank values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Parse an environment variable, falling back to a default string.
fn parse_env_or_default<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}
