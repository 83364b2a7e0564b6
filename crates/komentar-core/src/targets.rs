use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Which collector a batch target is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    Shopee,
    TiktokProduct,
    TiktokVideo,
}

impl std::fmt::Display for TargetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TargetKind::Shopee => write!(f, "shopee"),
            TargetKind::TiktokProduct => write!(f, "tiktok_product"),
            TargetKind::TiktokVideo => write!(f, "tiktok_video"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetConfig {
    pub kind: TargetKind,
    pub url: String,
    /// Shopee only: restrict to one star rating.
    #[serde(default)]
    pub stars: Option<u8>,
    /// Per-target override of the record cap.
    #[serde(default)]
    pub max_records: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct TargetsFile {
    pub targets: Vec<TargetConfig>,
}

/// Load and validate a batch targets file from YAML.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_targets(path: &Path) -> Result<TargetsFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::TargetsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_targets(&content)
}

/// Parse and validate targets YAML already in memory.
///
/// # Errors
///
/// Returns `ConfigError` if the YAML is malformed or fails validation.
pub fn parse_targets(content: &str) -> Result<TargetsFile, ConfigError> {
    let targets_file: TargetsFile =
        serde_yaml::from_str(content).map_err(ConfigError::TargetsFileParse)?;

    validate_targets(&targets_file)?;

    Ok(targets_file)
}

fn validate_targets(targets_file: &TargetsFile) -> Result<(), ConfigError> {
    if targets_file.targets.is_empty() {
        return Err(ConfigError::Validation(
            "targets list must not be empty".to_string(),
        ));
    }

    let mut seen_urls = HashSet::new();

    for target in &targets_file.targets {
        let url = target.url.trim();
        if url.is_empty() {
            return Err(ConfigError::Validation(format!(
                "{} target has an empty url",
                target.kind
            )));
        }

        if let Some(stars) = target.stars {
            if target.kind != TargetKind::Shopee {
                return Err(ConfigError::Validation(format!(
                    "target '{url}' sets stars but only shopee targets support a rating filter"
                )));
            }
            if !(1..=5).contains(&stars) {
                return Err(ConfigError::Validation(format!(
                    "target '{url}' has invalid stars {stars}; must be 1 to 5"
                )));
            }
        }

        if let Some(max) = target.max_records {
            if !(10..=1000).contains(&max) {
                return Err(ConfigError::Validation(format!(
                    "target '{url}' has invalid max_records {max}; must be 10 to 1000"
                )));
            }
        }

        if !seen_urls.insert(url.to_string()) {
            return Err(ConfigError::Validation(format!("duplicate target url: '{url}'")));
        }
    }

    Ok(())
}
