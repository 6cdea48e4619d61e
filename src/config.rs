use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use strum_macros::Display;

use crate::internal::form::{FormField, PriceRule, ValidationRules};
use crate::internal::ui::keybindings::Command;

/// Which sync adapter the manager is composed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default, Display)]
pub enum BackendKind {
    /// CRUD against the pot server.
    #[default]
    Remote,
    /// In-memory only, lost on exit.
    Local,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct NetworkConfig {
    /// Base URL of the pot API, e.g. "http://127.0.0.1:5000/api/v1/".
    pub base_url: String,
    /// Per-request timeout.
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000/api/v1/".to_string(),
            timeout_secs: 10,
            user_agent: format!("pot-admin/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct ValidationConfig {
    pub price: PriceRule,
    /// Optional regex the image URL has to match.
    pub image_pattern: Option<String>,
    /// Overrides the required fields of the selected backend.
    pub required: Option<Vec<FormField>>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub module_levels: HashMap<String, String>,
    /// Directory for the rolling log file. Defaults to "logs".
    pub log_directory: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            module_levels: HashMap::new(),
            log_directory: None,
        }
    }
}

impl LoggingConfig {
    pub fn directory(&self) -> &str {
        self.log_directory.as_deref().unwrap_or("logs")
    }

    /// Filter string for `EnvFilter`, e.g. "info,reqwest=warn".
    pub fn filter_directive(&self) -> String {
        let mut filter_str = self.level.clone();
        let mut modules: Vec<_> = self.module_levels.iter().collect();
        modules.sort();
        for (module, level) in modules {
            filter_str.push_str(&format!(",{}={}", module, level));
        }
        filter_str
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub backend: BackendKind,
    pub network: NetworkConfig,
    pub validation: ValidationConfig,
    pub logging: LoggingConfig,
    /// Extra key bindings for the list view, e.g. `{"x": Delete}`.
    pub keybindings: Option<HashMap<String, Command>>,
}

impl AppConfig {
    pub fn load() -> Self {
        for path in Self::candidates() {
            if path.exists()
                && let Some(config) = Self::load_from(&path)
            {
                return config;
            }
        }

        tracing::info!("No config file found, using defaults");
        Self::default()
    }

    /// Parse a single config file. Returns `None` when it can't be read or parsed.
    pub fn load_from(path: &Path) -> Option<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                tracing::error!("Failed to read config at {}: {}", path.display(), e);
                return None;
            }
        };

        match ron::from_str::<AppConfig>(&content) {
            Ok(config) => {
                tracing::info!("Loaded config from {}", path.display());
                Some(config)
            }
            Err(e) => {
                tracing::error!("Failed to parse config at {}: {}", path.display(), e);
                None
            }
        }
    }

    fn candidates() -> Vec<PathBuf> {
        // 1. Current working directory
        let mut candidates = vec![PathBuf::from("config.ron")];

        // 2. Next to executable
        if let Ok(exe) = std::env::current_exe()
            && let Some(dir) = exe.parent()
        {
            candidates.push(dir.join("config.ron"));
        }

        // 3. Per-user config directory
        if let Some(dir) = dirs::config_dir() {
            candidates.push(dir.join("pot-admin").join("config.ron"));
        }

        candidates
    }

    /// Validation rules for the given backend, honoring config overrides.
    pub fn rules_for(&self, backend: BackendKind) -> ValidationRules {
        let required = match &self.validation.required {
            Some(fields) => fields.clone(),
            None => FormField::required_for(backend),
        };

        let image_pattern = self
            .validation
            .image_pattern
            .as_deref()
            .and_then(|pattern| match Regex::new(pattern) {
                Ok(re) => Some(re),
                Err(e) => {
                    tracing::error!("Ignoring invalid image_pattern '{}': {}", pattern, e);
                    None
                }
            });

        ValidationRules {
            required,
            price: self.validation.price,
            image_pattern,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_config() {
        let config: AppConfig = ron::from_str(
            r#"(
    backend: Local,
    network: (base_url: "http://10.0.0.2:5000/api/v1/"),
)"#,
        )
        .unwrap();

        assert_eq!(config.backend, BackendKind::Local);
        assert_eq!(config.network.base_url, "http://10.0.0.2:5000/api/v1/");
        // Unspecified fields fall back to defaults
        assert_eq!(config.network.timeout_secs, 10);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn rules_follow_backend_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.rules_for(BackendKind::Remote).required.len(), 5);
        assert_eq!(
            config.rules_for(BackendKind::Local).required,
            vec![FormField::Name, FormField::Category]
        );
    }

    #[test]
    fn invalid_image_pattern_is_dropped() {
        let config = AppConfig {
            validation: ValidationConfig {
                image_pattern: Some("([".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.rules_for(BackendKind::Remote).image_pattern.is_none());
    }

    #[test]
    fn filter_directive_includes_module_levels() {
        let mut logging = LoggingConfig::default();
        logging
            .module_levels
            .insert("reqwest".to_string(), "warn".to_string());
        assert_eq!(logging.filter_directive(), "info,reqwest=warn");
    }

    #[test]
    fn load_from_reads_file_and_rejects_garbage() {
        let dir = std::env::temp_dir();
        let good = dir.join("pot_admin_config_good.ron");
        let bad = dir.join("pot_admin_config_bad.ron");
        fs::write(&good, "(backend: Local)").unwrap();
        fs::write(&bad, "(backend: Sideways").unwrap();

        assert_eq!(AppConfig::load_from(&good).unwrap().backend, BackendKind::Local);
        assert!(AppConfig::load_from(&bad).is_none());
        assert!(AppConfig::load_from(&dir.join("pot_admin_missing.ron")).is_none());

        let _ = fs::remove_file(good);
        let _ = fs::remove_file(bad);
    }
}
