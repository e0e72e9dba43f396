//! Typed configuration sections.
//!
//! Every section derives serde with full defaults, so an empty TOML file is
//! a valid configuration. The defaults mirror the reference deployment:
//! locales `en`/`th`/`ja` with `en` as fallback, auth routes under
//! `/api/auth`, and the dashboard as the only guarded route family.
//!
//! Matcher pattern strings (`guard.protected`) are deliberately NOT
//! validated here; they are compiled, and rejected, when the chain is
//! built, which keeps a single choke point for configuration errors.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Top-level Hermes configuration.
///
/// # Example
///
/// ```
/// use hermes_config::HermesConfig;
///
/// let config = HermesConfig::default();
/// assert_eq!(config.locale.default_locale, "en");
/// config.validate().unwrap();
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct HermesConfig {
    /// Locale stage settings.
    pub locale: LocaleConfig,
    /// Session stage settings.
    pub session: SessionConfig,
    /// Route guard settings.
    pub guard: GuardConfig,
    /// Logging settings.
    pub telemetry: TelemetryConfig,
}

impl HermesConfig {
    /// Validates cross-field invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] when the locale set is empty,
    /// the default locale is unsupported, or the login path is not absolute.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.locale.locales.is_empty() {
            return Err(ConfigError::validation("locale.locales must not be empty"));
        }
        if !self.locale.locales.contains(&self.locale.default_locale) {
            return Err(ConfigError::validation(format!(
                "locale.default_locale `{}` is not in locale.locales",
                self.locale.default_locale
            )));
        }
        if !self.session.login_path.starts_with('/') {
            return Err(ConfigError::validation(format!(
                "session.login_path `{}` must start with `/`",
                self.session.login_path
            )));
        }
        Ok(())
    }
}

/// Locale stage settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct LocaleConfig {
    /// Supported locale tags, in preference order.
    pub locales: Vec<String>,
    /// Fallback tag for requests nothing else decides.
    pub default_locale: String,
    /// Path prefixes that are never localized.
    pub skip_prefixes: Vec<String>,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            locales: vec!["en".to_string(), "th".to_string(), "ja".to_string()],
            default_locale: "en".to_string(),
            skip_prefixes: vec!["/auth".to_string(), "/api".to_string()],
        }
    }
}

/// Session stage settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// Where unauthenticated users are sent.
    pub login_path: String,
    /// Where sessions are terminated.
    pub logout_path: String,
    /// Identity provider callback route.
    pub callback_path: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            login_path: "/api/auth/login".to_string(),
            logout_path: "/api/auth/logout".to_string(),
            callback_path: "/api/auth/callback".to_string(),
        }
    }
}

/// Route guard settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct GuardConfig {
    /// Matcher patterns for routes that require an access token.
    ///
    /// All patterns on the guard stage must match for it to run (AND
    /// semantics); declare one guard entry per route family.
    pub protected: Vec<String>,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            protected: vec!["/(en|th)/dashboard".to_string()],
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct TelemetryConfig {
    /// Log level filter (e.g. `info`, `hermes=debug`).
    pub level: String,
    /// Emit JSON-formatted logs.
    pub json: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        HermesConfig::default().validate().unwrap();
    }

    #[test]
    fn empty_locale_set_is_rejected() {
        let mut config = HermesConfig::default();
        config.locale.locales.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn unsupported_default_locale_is_rejected() {
        let mut config = HermesConfig::default();
        config.locale.default_locale = "de".to_string();
        let error = config.validate().unwrap_err();
        assert!(error.to_string().contains("de"));
    }

    #[test]
    fn relative_login_path_is_rejected() {
        let mut config = HermesConfig::default();
        config.session.login_path = "api/auth/login".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn empty_toml_parses_to_defaults() {
        let config: HermesConfig = toml::from_str("").unwrap();
        assert_eq!(config, HermesConfig::default());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result: Result<HermesConfig, _> = toml::from_str("[locale]\nlocals = [\"en\"]\n");
        assert!(result.is_err());
    }

    #[test]
    fn toml_round_trip() {
        let config = HermesConfig::default();
        let text = toml::to_string(&config).unwrap();
        let parsed: HermesConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }
}
