//! Shared data model and configuration for the komentar comment scraper.

pub mod analysis;
pub mod app_config;
pub mod config;
pub mod records;
pub mod targets;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use records::{CommentRecord, Platform, TIMESTAMP_FORMAT};
pub use targets::{load_targets, TargetConfig, TargetKind, TargetsFile};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read targets file {path}: {source}")]
    TargetsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse targets file: {0}")]
    TargetsFileParse(#[source] serde_yaml::Error),

    #[error("targets validation failed: {0}")]
    Validation(String),
}
