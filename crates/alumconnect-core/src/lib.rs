//! AlumConnect core - shared configuration and base types
//!
//! This crate holds what every part of the system needs at startup:
//! - Environment-loaded application configuration
//! - Configuration error types

pub mod config;

pub use config::{
    AppConfig, AuthConfig, ConfigError, LoggingConfig, MailConfig, ServerConfig, UploadConfig,
};
