//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/rsced/rsced.toml`
//! 3. Explicit config file (`--config`)
//! 4. Environment variables: `RSCED_*` prefix
//!
//! Command line flags are applied on top by the CLI layer.

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File, FileFormat};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;

/// Default CED web server.
pub const DEFAULT_SERVER: &str = "ced.acc.jlab.org";

/// Prefix of environment variable overrides.
pub const ENV_PREFIX: &str = "RSCED";

/// Unified configuration for rsced.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Host name of the CED web server (no scheme)
    pub server: String,
    /// Element database to query: "ced", "led", "ued"
    pub catalog: String,
    /// Workspace name (default: "OPS")
    pub workspace: String,
    /// Verify TLS certificates against the system trust store
    pub verify: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: DEFAULT_SERVER.into(),
            catalog: "ced".into(),
            workspace: "OPS".into(),
            verify: true,
        }
    }
}

/// Get the XDG config directory for rsced.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "rsced").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("rsced.toml"))
}

impl Settings {
    /// Base URL of the CED web server.
    pub fn base_url(&self) -> String {
        format!("https://{}", self.server)
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `explicit` - Optional config file which must exist when given
    pub fn load(explicit: Option<&Path>) -> Result<Self, ApplicationError> {
        let global = global_config_path().filter(|p| p.exists());
        Self::load_layers(global.as_deref(), explicit, ENV_PREFIX)
    }

    pub(crate) fn load_layers(
        global: Option<&Path>,
        explicit: Option<&Path>,
        env_prefix: &str,
    ) -> Result<Self, ApplicationError> {
        let defaults = Settings::default();
        let mut builder = Config::builder()
            .set_default("server", defaults.server)
            .map_err(config_err)?
            .set_default("catalog", defaults.catalog)
            .map_err(config_err)?
            .set_default("workspace", defaults.workspace)
            .map_err(config_err)?
            .set_default("verify", defaults.verify)
            .map_err(config_err)?;

        if let Some(path) = global {
            debug!("global config: {}", path.display());
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(false));
        }
        if let Some(path) = explicit {
            debug!("explicit config: {}", path.display());
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(true));
        }
        builder = builder.add_source(Environment::with_prefix(env_prefix).try_parsing(true));

        let config = builder.build().map_err(config_err)?;
        let settings: Self = config.try_deserialize().map_err(config_err)?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ApplicationError> {
        if self.server.trim().is_empty() {
            return Err(ApplicationError::Config {
                message: "server must not be empty".into(),
            });
        }
        if self.server.contains("://") {
            return Err(ApplicationError::Config {
                message: format!("server must be a host name without scheme: {}", self.server),
            });
        }
        Ok(())
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# rsced configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/rsced/rsced.toml
#   File:   rsced --config <file>
#   Env:    RSCED_* environment variables (e.g. RSCED_WORKSPACE=OPS)

# CED web server host
# server = "ced.acc.jlab.org"

# Element database: ced, led or ued
# catalog = "ced"

# Workspace to query
# workspace = "OPS"

# Verify TLS certificates against the system trust store
# verify = true
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn given_no_config_when_loading_layers_then_uses_defaults() {
        let settings =
            Settings::load_layers(None, None, "RSCED_UNIT_NO_CONFIG").expect("load defaults");
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.base_url(), "https://ced.acc.jlab.org");
    }

    #[test]
    fn given_explicit_file_when_loading_then_overrides_global() {
        let dir = TempDir::new().unwrap();
        let global = dir.path().join("global.toml");
        let explicit = dir.path().join("explicit.toml");
        fs::write(&global, "workspace = \"GLOBAL\"\ncatalog = \"led\"\n").unwrap();
        fs::write(&explicit, "workspace = \"EXPLICIT\"\n").unwrap();

        let settings = Settings::load_layers(
            Some(global.as_path()),
            Some(explicit.as_path()),
            "RSCED_UNIT_EXPLICIT",
        )
        .unwrap();

        assert_eq!(settings.workspace, "EXPLICIT");
        assert_eq!(settings.catalog, "led");
        assert_eq!(settings.server, DEFAULT_SERVER);
    }

    #[test]
    fn given_env_override_when_loading_then_env_wins() {
        let dir = TempDir::new().unwrap();
        let explicit = dir.path().join("explicit.toml");
        fs::write(&explicit, "workspace = \"FILE\"\nverify = true\n").unwrap();

        std::env::set_var("RSCED_UNIT_ENV_WORKSPACE", "FROM_ENV");
        std::env::set_var("RSCED_UNIT_ENV_VERIFY", "false");
        let settings =
            Settings::load_layers(None, Some(explicit.as_path()), "RSCED_UNIT_ENV").unwrap();
        std::env::remove_var("RSCED_UNIT_ENV_WORKSPACE");
        std::env::remove_var("RSCED_UNIT_ENV_VERIFY");

        assert_eq!(settings.workspace, "FROM_ENV");
        assert!(!settings.verify);
    }

    #[test]
    fn given_missing_explicit_file_when_loading_then_config_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.toml");
        let err = Settings::load_layers(None, Some(missing.as_path()), "RSCED_UNIT_MISSING")
            .unwrap_err();
        assert!(matches!(err, ApplicationError::Config { .. }));
    }

    #[test]
    fn given_server_with_scheme_when_loading_then_rejected() {
        let dir = TempDir::new().unwrap();
        let explicit = dir.path().join("bad.toml");
        fs::write(&explicit, "server = \"https://ced.acc.jlab.org\"\n").unwrap();
        let err = Settings::load_layers(None, Some(explicit.as_path()), "RSCED_UNIT_SCHEME")
            .unwrap_err();
        assert!(err.to_string().contains("without scheme"));
    }

    #[test]
    fn given_settings_when_to_toml_then_round_trips_fields() {
        let toml = Settings::default().to_toml().unwrap();
        assert!(toml.contains("server = \"ced.acc.jlab.org\""));
        assert!(toml.contains("workspace = \"OPS\""));
        assert!(toml.contains("verify = true"));
    }

    #[test]
    fn given_template_when_parsed_then_is_valid_toml() {
        let parsed: Settings = toml::from_str(&Settings::template()).unwrap();
        assert_eq!(parsed, Settings::default());
    }
}
