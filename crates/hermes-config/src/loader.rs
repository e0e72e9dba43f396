//! Layered configuration loader.
//!
//! Configuration is applied in layers, later layers overriding earlier ones:
//!
//! 1. built-in defaults;
//! 2. a TOML file;
//! 3. environment variables (optionally seeded from a `.env` file).

use std::env;
use std::fs;
use std::path::Path;

use crate::config::HermesConfig;
use crate::error::ConfigError;

/// Layered loader for [`HermesConfig`].
///
/// # Example
///
/// ```no_run
/// use hermes_config::ConfigLoader;
///
/// # fn main() -> Result<(), hermes_config::ConfigError> {
/// let config = ConfigLoader::new()
///     .with_file("hermes.toml")?
///     .with_env_prefix("HERMES")?
///     .load()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct ConfigLoader {
    config: HermesConfig,
}

impl ConfigLoader {
    /// Creates a loader seeded with the built-in defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: HermesConfig::default(),
        }
    }

    /// Overlays configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file is missing, unreadable or not
    /// valid TOML for [`HermesConfig`].
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::file_not_found(path));
        }
        let contents =
            fs::read_to_string(path).map_err(|e| ConfigError::read_error(path, e))?;
        self.config = toml::from_str(&contents)?;
        Ok(self)
    }

    /// Loads a `.env` file into the process environment, if one exists.
    ///
    /// Missing files are not an error; a malformed file is.
    pub fn with_dotenv(self) -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(_) => Ok(self),
            Err(error) if error.not_found() => Ok(self),
            Err(error) => Err(ConfigError::env_parse(".env", error.to_string())),
        }
    }

    /// Overlays configuration from `{prefix}_*` environment variables.
    ///
    /// Recognized variables (for prefix `HERMES`):
    ///
    /// | Variable                  | Overrides               | Format          |
    /// |---------------------------|-------------------------|-----------------|
    /// | `HERMES_LOCALES`          | `locale.locales`        | comma-separated |
    /// | `HERMES_DEFAULT_LOCALE`   | `locale.default_locale` | tag             |
    /// | `HERMES_SKIP_PREFIXES`    | `locale.skip_prefixes`  | comma-separated |
    /// | `HERMES_LOGIN_PATH`       | `session.login_path`    | path            |
    /// | `HERMES_PROTECTED_ROUTES` | `guard.protected`       | comma-separated |
    /// | `HERMES_LOG_LEVEL`        | `telemetry.level`       | filter string   |
    /// | `HERMES_LOG_JSON`         | `telemetry.json`        | `true`/`false`  |
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EnvParseError`] for values that fail to parse.
    pub fn with_env_prefix(mut self, prefix: &str) -> Result<Self, ConfigError> {
        if let Some(value) = read_env(prefix, "LOCALES") {
            self.config.locale.locales = split_list(&value);
        }
        if let Some(value) = read_env(prefix, "DEFAULT_LOCALE") {
            self.config.locale.default_locale = value;
        }
        if let Some(value) = read_env(prefix, "SKIP_PREFIXES") {
            self.config.locale.skip_prefixes = split_list(&value);
        }
        if let Some(value) = read_env(prefix, "LOGIN_PATH") {
            self.config.session.login_path = value;
        }
        if let Some(value) = read_env(prefix, "PROTECTED_ROUTES") {
            self.config.guard.protected = split_list(&value);
        }
        if let Some(value) = read_env(prefix, "LOG_LEVEL") {
            self.config.telemetry.level = value;
        }
        if let Some(value) = read_env(prefix, "LOG_JSON") {
            self.config.telemetry.json = value.parse().map_err(|_| {
                ConfigError::env_parse(
                    format!("{prefix}_LOG_JSON"),
                    format!("expected `true` or `false`, got `{value}`"),
                )
            })?;
        }
        Ok(self)
    }

    /// Finalizes the configuration, validating cross-field invariants.
    pub fn load(self) -> Result<HermesConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

fn read_env(prefix: &str, name: &str) -> Option<String> {
    env::var(format!("{prefix}_{name}")).ok()
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_load() {
        let config = ConfigLoader::new().load().unwrap();
        assert_eq!(config, HermesConfig::default());
    }

    #[test]
    fn file_overlay_replaces_sections() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[locale]
locales = ["en", "fr"]
default_locale = "fr"

[guard]
protected = ["/(en|fr)/admin"]
"#
        )
        .unwrap();

        let config = ConfigLoader::new()
            .with_file(file.path())
            .unwrap()
            .load()
            .unwrap();

        assert_eq!(config.locale.default_locale, "fr");
        assert_eq!(config.guard.protected, vec!["/(en|fr)/admin"]);
        // Untouched sections keep their defaults.
        assert_eq!(config.session.login_path, "/api/auth/login");
    }

    #[test]
    fn missing_file_is_an_error() {
        let result = ConfigLoader::new().with_file("/nonexistent/hermes.toml");
        assert!(matches!(result, Err(ConfigError::FileNotFound { .. })));
    }

    #[test]
    fn env_overlay_wins_over_defaults() {
        // Unique prefix per test: the environment is process-global.
        env::set_var("HERMES_T1_DEFAULT_LOCALE", "th");
        env::set_var("HERMES_T1_PROTECTED_ROUTES", "/(en|th)/admin, /(en|th)/billing");

        let config = ConfigLoader::new()
            .with_env_prefix("HERMES_T1")
            .unwrap()
            .load()
            .unwrap();

        assert_eq!(config.locale.default_locale, "th");
        assert_eq!(
            config.guard.protected,
            vec!["/(en|th)/admin", "/(en|th)/billing"]
        );

        env::remove_var("HERMES_T1_DEFAULT_LOCALE");
        env::remove_var("HERMES_T1_PROTECTED_ROUTES");
    }

    #[test]
    fn malformed_env_boolean_is_rejected() {
        env::set_var("HERMES_T2_LOG_JSON", "yes please");

        let result = ConfigLoader::new().with_env_prefix("HERMES_T2");
        assert!(matches!(result, Err(ConfigError::EnvParseError { .. })));

        env::remove_var("HERMES_T2_LOG_JSON");
    }

    #[test]
    fn invalid_overlay_fails_validation() {
        env::set_var("HERMES_T3_DEFAULT_LOCALE", "de");

        let result = ConfigLoader::new()
            .with_env_prefix("HERMES_T3")
            .unwrap()
            .load();
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));

        env::remove_var("HERMES_T3_DEFAULT_LOCALE");
    }
}
