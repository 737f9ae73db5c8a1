use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub flow: FlowConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub paths: PathsConfig,
}

/// What the driver does when the host asks to go back from the first step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackAtRoot {
    /// End the flow as cancelled
    #[default]
    Cancel,
    /// Fail the flow with a navigation error
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowConfig {
    #[serde(default)]
    pub back_at_root: BackAtRoot,
    #[serde(default = "default_back_tooltip")]
    pub back_tooltip: String,
    #[serde(default = "default_forward_tooltip")]
    pub forward_tooltip: String,
}

fn default_back_tooltip() -> String {
    "Back".to_string()
}

fn default_forward_tooltip() -> String {
    "Forward".to_string()
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            back_at_root: BackAtRoot::default(),
            back_tooltip: default_back_tooltip(),
            forward_tooltip: default_forward_tooltip(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Redraw interval while waiting for input
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
    /// Character drawn in place of each character of a masked entry
    #[serde(default = "default_mask_char")]
    pub mask_char: char,
    /// Rows of a choice list visible at once
    #[serde(default = "default_max_visible_items")]
    pub max_visible_items: usize,
}

fn default_tick_rate() -> u64 {
    250
}

fn default_mask_char() -> char {
    '*'
}

fn default_max_visible_items() -> usize {
    12
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
            mask_char: default_mask_char(),
            max_visible_items: default_max_visible_items(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to log to file in TUI mode (false = stderr for debugging)
    #[serde(default = "default_log_to_file")]
    pub to_file: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_to_file() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            to_file: default_log_to_file(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory for logs and other runtime state
    #[serde(default = "default_state_path")]
    pub state: String,
}

fn default_state_path() -> String {
    dirs::state_dir()
        .or_else(dirs::data_local_dir)
        .map(|dir| dir.join("quickstep").to_string_lossy().to_string())
        .unwrap_or_else(|| ".quickstep".to_string())
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            state: default_state_path(),
        }
    }
}

impl Config {
    /// User-level config file, `~/.config/quickstep/config.toml`
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("quickstep").join("config.toml"))
    }

    pub fn load(config_path: Option<&str>) -> Result<Self> {
        // Start with embedded defaults so quickstep works without config files
        let defaults = Config::default();
        let defaults_json =
            serde_json::to_string(&defaults).context("Failed to serialize default config")?;

        let mut builder = config::Config::builder().add_source(config::File::from_str(
            &defaults_json,
            config::FileFormat::Json,
        ));

        if let Some(user_config) = Self::user_config_path() {
            if user_config.exists() {
                builder = builder.add_source(config::File::from(user_config));
            }
        }

        // Explicit config file (CLI override)
        if let Some(path) = config_path {
            builder = builder.add_source(config::File::with_name(path));
        }

        // Environment variables with QUICKSTEP_ prefix
        builder = builder.add_source(
            config::Environment::with_prefix("QUICKSTEP")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().context("Failed to load configuration")?;
        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let toml_str = self.to_toml()?;
        std::fs::write(path, toml_str).context("Failed to write config file")?;

        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config to TOML")
    }

    pub fn state_path(&self) -> PathBuf {
        let path = PathBuf::from(&self.paths.state);
        if path.is_absolute() {
            path
        } else {
            std::env::current_dir().unwrap_or_default().join(path)
        }
    }

    pub fn logs_path(&self) -> PathBuf {
        self.state_path().join("logs")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            flow: FlowConfig::default(),
            ui: UiConfig::default(),
            logging: LoggingConfig::default(),
            paths: PathsConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_flow_config_cancels_at_root() {
        let config = Config::default();
        assert_eq!(config.flow.back_at_root, BackAtRoot::Cancel);
        assert_eq!(config.flow.back_tooltip, "Back");
        assert_eq!(config.flow.forward_tooltip, "Forward");
    }

    #[test]
    fn test_load_explicit_file_overrides_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("quickstep.toml");
        std::fs::write(
            &path,
            "[flow]\nback_at_root = \"error\"\n\n[ui]\nmask_char = \"#\"\n",
        )
        .unwrap();

        let config = Config::load(Some(path.to_str().unwrap())).unwrap();
        assert_eq!(config.flow.back_at_root, BackAtRoot::Error);
        assert_eq!(config.ui.mask_char, '#');
        // untouched sections keep their defaults
        assert_eq!(config.ui.max_visible_items, 12);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_save_then_load_preserves_values() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.flow.forward_tooltip = "Next".to_string();
        config.paths.state = temp_dir.path().to_string_lossy().to_string();
        config.save_to(&path).unwrap();

        let loaded = Config::load(Some(path.to_str().unwrap())).unwrap();
        assert_eq!(loaded.flow.forward_tooltip, "Next");
        assert_eq!(loaded.paths.state, config.paths.state);
    }

    #[test]
    fn test_logs_path_is_under_state_path() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.paths.state = temp_dir.path().to_string_lossy().to_string();
        assert!(config.logs_path().starts_with(temp_dir.path()));
        assert!(config.logs_path().ends_with("logs"));
    }

    #[test]
    fn test_to_toml_contains_sections() {
        let toml_str = Config::default().to_toml().unwrap();
        assert!(toml_str.contains("[flow]"));
        assert!(toml_str.contains("back_at_root = \"cancel\""));
        assert!(toml_str.contains("[logging]"));
    }
}
