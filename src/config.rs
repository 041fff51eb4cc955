use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const DATABASE_URL_ENV: &str = "STUDYBUILDER_DATABASE_URL";
pub const LOG_LEVEL_ENV: &str = "STUDYBUILDER_LOG_LEVEL";

/// Runtime settings
///
/// Precedence, lowest first: defaults, TOML file, environment, CLI flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path, `:memory:` or full `sqlite:` URL
    pub database_url: String,
    pub log_level: String,
    pub max_connections: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "studybuilder.db".to_string(),
            log_level: "info".to_string(),
            max_connections: 5,
        }
    }
}

impl Config {
    /// Load from an optional TOML file, then apply environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        Ok(config.with_env_overrides(|key| std::env::var(key).ok()))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup(DATABASE_URL_ENV) {
            self.database_url = url;
        }
        if let Some(level) = lookup(LOG_LEVEL_ENV) {
            self.log_level = level;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "database_url = \"trial.db\"").unwrap();
        writeln!(file, "max_connections = 2").unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.database_url, "trial.db");
        assert_eq!(config.max_connections, 2);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_invalid_file_is_reported() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max_connections = \"many\"").unwrap();

        let err = Config::from_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_environment_overrides_file() {
        let env: HashMap<&str, &str> =
            HashMap::from([(DATABASE_URL_ENV, ":memory:"), (LOG_LEVEL_ENV, "debug")]);

        let config = Config::default().with_env_overrides(|key| env.get(key).map(|v| v.to_string()));
        assert_eq!(config.database_url, ":memory:");
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.max_connections, 5);
    }
}
