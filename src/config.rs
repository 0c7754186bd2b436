// ⚙️ Configuration - database, lookup source, default behavior, migration policy
// Defaults → optional TOML file → environment overrides

use crate::facade::MigrationPolicy;
use crate::strategy::BehaviorKind;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Env var naming the TOML config file
pub const CONFIG_ENV: &str = "DESIGN_PATTERNS_CONFIG";

/// Env var overriding `data.database_path`
pub const DATABASE_ENV: &str = "DESIGN_PATTERNS_DATABASE";

// ============================================================================
// SECTIONS
// ============================================================================

/// Customer database settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// SQLite file. None = report customers to stdout instead of storing them
    pub database_path: Option<PathBuf>,

    /// Applied with PRAGMA on open (file databases only)
    pub journal_mode: String,

    /// Log every statement at debug level
    pub show_sql: bool,

    /// Create tables on open
    pub generate_ddl: bool,
}

impl Default for DataConfig {
    fn default() -> Self {
        DataConfig {
            database_path: None,
            journal_mode: "WAL".to_string(),
            show_sql: false,
            generate_ddl: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    /// CSV address table (cep,city,state). None = the shared CepApi stub
    pub directory: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyConfig {
    /// Behavior selected when the CLI starts a Context
    pub default_behavior: Option<BehaviorKind>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MigrationConfig {
    pub policy: MigrationPolicy,
}

// ============================================================================
// APP CONFIG
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub data: DataConfig,
    pub lookup: LookupConfig,
    pub strategy: StrategyConfig,
    pub migration: MigrationConfig,
}

impl AppConfig {
    /// Parse a TOML document; missing sections keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse config TOML")
    }

    /// Load config from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        Self::from_toml_str(&content)
    }

    /// Defaults, then the file named by DESIGN_PATTERNS_CONFIG, then env overrides
    pub fn load() -> Result<Self> {
        let mut config = match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_file(PathBuf::from(path))?,
            None => AppConfig::default(),
        };

        config.apply_env_overrides();
        Ok(config)
    }

    pub fn apply_env_overrides(&mut self) {
        if let Some(path) = std::env::var_os(DATABASE_ENV) {
            if !path.is_empty() {
                tracing::debug!(path = ?path, "database path overridden from environment");
                self.data.database_path = Some(PathBuf::from(path));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.data.database_path, None);
        assert_eq!(config.data.journal_mode, "WAL");
        assert!(config.data.generate_ddl);
        assert!(!config.data.show_sql);
        assert_eq!(config.lookup.directory, None);
        assert_eq!(config.strategy.default_behavior, None);
        assert_eq!(config.migration.policy, MigrationPolicy::Lenient);
    }

    #[test]
    fn test_empty_document_is_default() {
        assert_eq!(AppConfig::from_toml_str("").unwrap(), AppConfig::default());
    }

    #[test]
    fn test_partial_document() {
        let config = AppConfig::from_toml_str(
            r#"
            [data]
            database_path = "customers.db"
            show_sql = true

            [strategy]
            default_behavior = "defensive"

            [migration]
            policy = "strict"
            "#,
        )
        .unwrap();

        assert_eq!(config.data.database_path, Some(PathBuf::from("customers.db")));
        assert!(config.data.show_sql);
        assert_eq!(config.data.journal_mode, "WAL");
        assert_eq!(config.strategy.default_behavior, Some(BehaviorKind::Defensive));
        assert_eq!(config.migration.policy, MigrationPolicy::Strict);
    }

    #[test]
    fn test_unknown_behavior_is_rejected() {
        let result = AppConfig::from_toml_str("[strategy]\ndefault_behavior = \"sideways\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[lookup]").unwrap();
        writeln!(file, "directory = \"ceps.csv\"").unwrap();
        file.flush().unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.lookup.directory, Some(PathBuf::from("ceps.csv")));
    }

    #[test]
    fn test_from_missing_file_fails() {
        let err = AppConfig::from_file("/no/such/config.toml").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
