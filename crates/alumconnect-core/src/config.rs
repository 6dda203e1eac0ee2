//! AlumConnect configuration management
//!
//! Loads configuration from environment variables once at process start.
//! The resulting [`AppConfig`] is immutable and passed explicitly to the
//! token service, mailer, and upload handling instead of being read from
//! ambient process state.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Development fallback for signing secrets. Tokens issued with this value
/// must never reach production; `AppConfig::check_secrets` enforces it.
const DEV_SECRET: &str = "development-secret-change-in-production";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("{key} must be set")]
    MissingSecret { key: String },
}

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server configuration
    pub server: ServerConfig,

    /// Token issuance and verification settings
    pub auth: AuthConfig,

    /// Outbound mail transport settings
    pub mail: MailConfig,

    /// Profile-picture upload settings
    pub uploads: UploadConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables with development
    /// defaults for anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(host) = std::env::var("API_HOST") {
            config.server.host = host;
        }
        if let Ok(port) = std::env::var("API_PORT") {
            config.server.port = port.parse().map_err(|_| ConfigError::InvalidValue {
                key: "API_PORT".to_string(),
                value: port,
            })?;
        }
        if let Ok(url) = std::env::var("PUBLIC_BASE_URL") {
            config.server.public_base_url = url;
        }
        if let Ok(origins) = std::env::var("CORS_ORIGINS") {
            config.server.cors_origins = origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        if let Ok(secret) = std::env::var("ACCESS_TOKEN_SECRET") {
            config.auth.access_secret = secret;
        }
        if let Ok(secs) = std::env::var("ACCESS_TOKEN_EXPIRY_SECS") {
            config.auth.access_expiry_secs =
                secs.parse().map_err(|_| ConfigError::InvalidValue {
                    key: "ACCESS_TOKEN_EXPIRY_SECS".to_string(),
                    value: secs,
                })?;
        }
        if let Ok(secret) = std::env::var("REFRESH_TOKEN_SECRET") {
            config.auth.refresh_secret = secret;
        }
        if let Ok(secs) = std::env::var("REFRESH_TOKEN_EXPIRY_SECS") {
            config.auth.refresh_expiry_secs =
                secs.parse().map_err(|_| ConfigError::InvalidValue {
                    key: "REFRESH_TOKEN_EXPIRY_SECS".to_string(),
                    value: secs,
                })?;
        }
        if let Ok(issuer) = std::env::var("JWT_ISSUER") {
            config.auth.issuer = issuer;
        }

        if let Ok(url) = std::env::var("MAIL_API_URL") {
            config.mail.api_url = Some(url);
        }
        if let Ok(key) = std::env::var("MAIL_API_KEY") {
            config.mail.api_key = Some(key);
        }
        if let Ok(from) = std::env::var("MAIL_FROM") {
            config.mail.from_address = from;
        }

        if let Ok(dir) = std::env::var("UPLOAD_DIR") {
            config.uploads.dir = PathBuf::from(dir);
        }
        if let Ok(max) = std::env::var("UPLOAD_MAX_BYTES") {
            config.uploads.max_bytes = max.parse().map_err(|_| ConfigError::InvalidValue {
                key: "UPLOAD_MAX_BYTES".to_string(),
                value: max,
            })?;
        }

        if let Ok(level) = std::env::var("LOG_LEVEL") {
            config.logging.level = level;
        }

        Ok(config)
    }

    /// Check that no signing secret is still at its development default.
    ///
    /// Debug builds warn and continue; release builds refuse to start.
    pub fn check_secrets(&self) -> Result<(), ConfigError> {
        for (key, value) in [
            ("ACCESS_TOKEN_SECRET", self.auth.access_secret.as_str()),
            ("REFRESH_TOKEN_SECRET", self.auth.refresh_secret.as_str()),
        ] {
            if value == DEV_SECRET {
                if cfg!(debug_assertions) {
                    tracing::warn!("{} is unset, using development default", key);
                } else {
                    return Err(ConfigError::MissingSecret {
                        key: key.to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            auth: AuthConfig::default(),
            mail: MailConfig::default(),
            uploads: UploadConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Allowed CORS origins (credentials are sent, so wildcards are not usable)
    pub cors_origins: Vec<String>,

    /// Base URL used when building emailed verification/reset links
    pub public_base_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            cors_origins: vec!["http://localhost:5173".to_string()],
            public_base_url: "http://localhost:5000".to_string(),
        }
    }
}

/// Token issuance and verification settings
///
/// Access and refresh tokens are signed with distinct secrets so that a
/// leaked access secret cannot mint refresh tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret for access tokens
    pub access_secret: String,

    /// Access token lifetime in seconds (default: 900 = 15 minutes)
    pub access_expiry_secs: u64,

    /// HMAC secret for refresh tokens
    pub refresh_secret: String,

    /// Refresh token lifetime in seconds (default: 864000 = 10 days)
    pub refresh_expiry_secs: u64,

    /// Token issuer identifier
    pub issuer: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            access_secret: DEV_SECRET.to_string(),
            access_expiry_secs: 900,
            refresh_secret: DEV_SECRET.to_string(),
            refresh_expiry_secs: 10 * 24 * 3600,
            issuer: "alumconnect-api".to_string(),
        }
    }
}

/// Outbound mail transport settings
///
/// When `api_url` is unset the server falls back to a logging mailer,
/// which keeps development signups working without a mail account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    /// HTTP mail API endpoint
    pub api_url: Option<String>,

    /// Bearer credential for the mail API
    pub api_key: Option<String>,

    /// Sender address on outgoing mail
    pub from_address: String,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            api_url: None,
            api_key: None,
            from_address: "AlumConnect <no-reply@alumconnect.example>".to_string(),
        }
    }
}

/// Profile-picture upload settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Directory where uploaded files are written
    pub dir: PathBuf,

    /// Maximum accepted file size in bytes (default: 5 MB)
    pub max_bytes: usize,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("public/uploads"),
            max_bytes: 5 * 1024 * 1024,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default log level when RUST_LOG is unset
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "alumconnect_api=debug,tower_http=debug".to_string(),
        }
    }
}
