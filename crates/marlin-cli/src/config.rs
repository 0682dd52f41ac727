//! Locating and reading the TOML configuration of the CLI.

use std::{
    fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use thiserror::Error;

use marlin::{MarlinError, config::AppConfig};

const LOCAL_CONFIG: &str = "marlin/config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration: {0}")]
    Parse(String),

    #[error("Missing configuration file: {0}")]
    MissingFile(PathBuf),
}

impl From<ConfigError> for MarlinError {
    fn from(err: ConfigError) -> Self {
        MarlinError::Config(err.to_string())
    }
}

/// Where a configuration file was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Origin {
    Local,
    System,
}

impl Origin {
    fn as_str(self) -> &'static str {
        match self {
            Origin::Local => "local",
            Origin::System => "system",
        }
    }
}

/// Loads the configuration for one CLI run.
///
/// An explicit path must exist. Without one, the first existing file among
/// `marlin/config.toml` and the platform config directory is used, falling
/// back to the default configuration.
///
/// # Errors
///
/// Returns `MarlinError::Config` if the explicit file is missing or a file
/// found cannot be parsed, and `MarlinError::Io` if it cannot be read.
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, MarlinError> {
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading explicit configuration");
        return load_config_file(path);
    }

    let found = candidates()
        .into_iter()
        .find(|(_, path)| path.is_file());

    match found {
        Some((origin, path)) => {
            info!(origin = origin.as_str(), path = path.display().to_string(); "Loading configuration");
            load_config_file(&path)
        }
        None => {
            debug!("No configuration file found, using defaults");
            Ok(AppConfig::default())
        }
    }
}

fn candidates() -> Vec<(Origin, PathBuf)> {
    let mut candidates = vec![(Origin::Local, PathBuf::from(LOCAL_CONFIG))];
    match ProjectDirs::from("com", "marlin", "marlin") {
        Some(dirs) => candidates.push((Origin::System, dirs.config_dir().join("config.toml"))),
        None => debug!("Could not determine platform-specific config directory"),
    }
    candidates
}

fn load_config_file(path: &Path) -> Result<AppConfig, MarlinError> {
    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()).into());
    }

    let content = fs::read_to_string(path)?;
    parse_config(&content).map_err(Into::into)
}

fn parse_config(content: &str) -> Result<AppConfig, ConfigError> {
    toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config_partial() {
        let config = parse_config("[layout]\nmax_width = 12\n").unwrap();
        assert_eq!(config.layout().max_width(), 12);
        assert_eq!(config.parser().kind(), None);
    }

    #[test]
    fn test_parse_config_rejects_unknown_kind() {
        let err = parse_config("[parser]\nkind = \"gantt\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_explicit_file() {
        let err = load_config(Some("does/not/exist.toml")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Configuration error: Missing configuration file: does/not/exist.toml"
        );
    }

    #[test]
    fn test_local_candidate_comes_first() {
        let candidates = candidates();
        assert_eq!(candidates[0], (Origin::Local, PathBuf::from(LOCAL_CONFIG)));
    }
}
