//! Optional TOML configuration file.
//!
//! ```toml
//! [database]
//! backend = "sqlite"
//! connection_string = "tax-history.db"
//!
//! [defaults]
//! regime = "old"
//! age_group = "<60"
//! currency = "INR"
//!
//! [logging]
//! level = "info"
//! file = "tax-estimator.log"
//! ```
//!
//! Every section and key is optional.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tax_core::db::DbConfig;
use tax_core::{AgeGroup, Currency, Regime};
use thiserror::Error;

/// File looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "tax-estimator.toml";

/// History database used when the config file does not name one.
pub const DEFAULT_DATABASE: &str = "tax-history.db";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    #[serde(deserialize_with = "database_section")]
    pub database: DbConfig,
    pub defaults: Defaults,
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DbConfig {
                backend: "sqlite".to_string(),
                connection_string: DEFAULT_DATABASE.to_string(),
            },
            defaults: Defaults::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// `[database]` as written in the file. Keys left out fall back to the
/// on-disk history store, not to [`DbConfig::default`].
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct DatabaseSection {
    backend: Option<String>,
    connection_string: Option<String>,
}

fn database_section<'de, D>(deserializer: D) -> Result<DbConfig, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let section = DatabaseSection::deserialize(deserializer)?;
    Ok(DbConfig {
        backend: section.backend.unwrap_or_else(|| "sqlite".to_string()),
        connection_string: section
            .connection_string
            .unwrap_or_else(|| DEFAULT_DATABASE.to_string()),
    })
}

/// Fallback form values, used when neither a flag nor a saved preference
/// supplies one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Defaults {
    pub regime: Regime,
    pub age_group: AgeGroup,
    pub currency: Currency,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Level or full `EnvFilter` directive.
    pub level: Option<String>,
    /// Append log records to this file as well as the console.
    pub file: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_toml_str(
        input: &str,
        path: &Path,
    ) -> Result<Self, ConfigError> {
        toml::from_str(input).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents, path)
    }

    /// Loads the configuration the binary runs with.
    ///
    /// An explicit path (from `--config` or `TAX_ESTIMATOR_CONFIG`) must
    /// exist. Otherwise [`DEFAULT_CONFIG_FILE`] in the working directory is
    /// used when present, and built-in defaults when not.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match locate(explicit) {
            Some(path) => Self::from_file(&path),
            None => Ok(Self::default()),
        }
    }
}

fn locate(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    let local = PathBuf::from(DEFAULT_CONFIG_FILE);
    local.is_file().then_some(local)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(input: &str) -> Result<AppConfig, ConfigError> {
        AppConfig::from_toml_str(input, Path::new("test.toml"))
    }

    #[test]
    fn empty_file_gives_defaults() {
        let config = parse("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.database.connection_string, DEFAULT_DATABASE);
    }

    #[test]
    fn full_file_parses() {
        let config = parse(
            r#"
[database]
backend = "sqlite"
connection_string = ":memory:"

[defaults]
regime = "new"
age_group = "60-80"
currency = "USD"

[logging]
level = "debug"
file = "tax.log"
"#,
        )
        .unwrap();

        assert_eq!(config.database.connection_string, ":memory:");
        assert_eq!(
            config.defaults,
            Defaults {
                regime: Regime::New,
                age_group: AgeGroup::SixtyTo80,
                currency: Currency::Usd,
            }
        );
        assert_eq!(config.logging.level.as_deref(), Some("debug"));
        assert_eq!(config.logging.file, Some(PathBuf::from("tax.log")));
    }

    #[test]
    fn database_without_connection_string_stays_on_disk() {
        let config = parse("[database]\nbackend = \"sqlite\"\n").unwrap();

        assert_eq!(config.database.backend, "sqlite");
        assert_eq!(config.database.connection_string, DEFAULT_DATABASE);
    }

    #[test]
    fn empty_database_section_keeps_builtins() {
        let config = parse("[database]\n").unwrap();
        assert_eq!(config.database, AppConfig::default().database);
    }

    #[test]
    fn unknown_database_key_is_rejected() {
        assert!(parse("[database]\npath = \"x.db\"\n").is_err());
    }

    #[test]
    fn partial_defaults_keep_builtins() {
        let config = parse("[defaults]\nage_group = \">80\"\n").unwrap();

        assert_eq!(config.defaults.regime, Regime::Old);
        assert_eq!(config.defaults.age_group, AgeGroup::Over80);
        assert_eq!(config.defaults.currency, Currency::Inr);
    }

    #[test]
    fn unknown_regime_is_rejected() {
        let err = parse("[defaults]\nregime = \"flat\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().starts_with("invalid config file 'test.toml'"));
    }

    #[test]
    fn unknown_key_is_rejected() {
        assert!(parse("[logging]\nverbosity = 3\n").is_err());
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let err = AppConfig::load(Some(Path::new("/nonexistent/tax-estimator.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn explicit_file_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[defaults]\ncurrency = \"EUR\"\n").unwrap();

        let config = AppConfig::load(Some(&path)).unwrap();

        assert_eq!(config.defaults.currency, Currency::Eur);
    }
}
