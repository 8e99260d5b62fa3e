//! Service Configuration
//!
//! Sources, lowest precedence first: built-in defaults, an optional config
//! file, then `CYCLE_LIFE_*` environment variables (`__` separates nesting,
//! e.g. `CYCLE_LIFE_MODEL__PREFERRED=/srv/ann_grid.onnx`).

use config::{Config, ConfigError, Environment, File};
use inference_engine::ModelSelection;
use serde::Deserialize;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "CYCLE_LIFE";

/// Top-level settings
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub model: ModelSelection,
    pub logging: LoggingSettings,
}

/// HTTP listener settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Socket address to bind
    pub bind: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8000".to_string(),
        }
    }
}

/// Log output settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Max level: trace, debug, info, warn or error
    pub level: String,
    /// Emit JSON lines instead of human readable output
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl Settings {
    /// Load settings, reading `path` when given (it must exist then)
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::with_name(path));
        }
        builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.server.bind, "0.0.0.0:8000");
        assert_eq!(settings.model.preferred.to_str(), Some("ann_grid.onnx"));
        assert_eq!(settings.model.fallback.to_str(), Some("ann_fixed.onnx"));
        assert_eq!(settings.logging.level, "info");
        assert!(!settings.logging.json);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[server]\nbind = \"127.0.0.1:9000\"\n\n[model]\npreferred = \"/srv/models/best.onnx\"\n"
        )
        .unwrap();

        let settings = Settings::load(file.path().to_str()).unwrap();
        assert_eq!(settings.server.bind, "127.0.0.1:9000");
        assert_eq!(settings.model.preferred.to_str(), Some("/srv/models/best.onnx"));
        // untouched sections keep their defaults
        assert_eq!(settings.model.fallback.to_str(), Some("ann_fixed.onnx"));
        assert_eq!(settings.logging.level, "info");
    }

    #[test]
    fn test_environment_overrides_defaults() {
        // no other test reads logging.json back
        std::env::set_var("CYCLE_LIFE_LOGGING__JSON", "true");
        let settings = Settings::load(None);
        std::env::remove_var("CYCLE_LIFE_LOGGING__JSON");

        let settings = settings.unwrap();
        assert!(settings.logging.json);
        assert_eq!(settings.logging.level, "info");
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        assert!(Settings::load(Some("/nonexistent/cycle-life.toml")).is_err());
    }
}
