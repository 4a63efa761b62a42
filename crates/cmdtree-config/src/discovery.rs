use std::env;
use std::path::{Path, PathBuf};

use cmdtree_utils::error::ConfigError;
use tracing::debug;

use crate::DispatcherConfig;

/// Environment variable naming an explicit configuration file
pub const CONFIG_ENV_VAR: &str = "CMDTREE_CONFIG";

/// File names searched for, in order, in each directory during discovery
pub const CONFIG_FILE_NAMES: &[&str] = &["cmdtree.toml", ".cmdtree/config.toml"];

impl DispatcherConfig {
    /// Parse and validate configuration from TOML text.
    ///
    /// Missing sections and keys fall back to built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidFile`] for malformed TOML or unknown
    /// enum values, and [`ConfigError::InvalidValue`] for values that fail
    /// validation.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|e| ConfigError::InvalidFile(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from an explicit file path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotFound`] if the file does not exist, otherwise
    /// the errors of [`DispatcherConfig::from_toml_str`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.display().to_string(),
            });
        }
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        debug!(path = %path.display(), "Loaded dispatcher configuration");
        Self::from_toml_str(&content)
    }

    /// Discover configuration starting from the current directory.
    ///
    /// # Errors
    ///
    /// See [`DispatcherConfig::discover_from`].
    pub fn discover() -> Result<Self, ConfigError> {
        let cwd = env::current_dir().map_err(|e| ConfigError::ReadFailed {
            path: ".".to_string(),
            reason: e.to_string(),
        })?;
        Self::discover_from(&cwd)
    }

    /// Discover configuration starting from `start_dir`.
    ///
    /// Order:
    /// 1. The file named by `CMDTREE_CONFIG` (must exist)
    /// 2. The first of [`CONFIG_FILE_NAMES`] found walking upward from `start_dir`
    /// 3. Built-in defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the selected file cannot be read or is invalid.
    pub fn discover_from(start_dir: &Path) -> Result<Self, ConfigError> {
        if let Some(explicit) = env::var_os(CONFIG_ENV_VAR).filter(|v| !v.is_empty()) {
            return Self::load(Path::new(&explicit));
        }

        match find_config_file(start_dir) {
            Some(path) => Self::load(&path),
            None => {
                debug!(start = %start_dir.display(), "No configuration file found, using defaults");
                Ok(Self::default())
            }
        }
    }
}

fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    start_dir.ancestors().find_map(|dir| {
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|candidate| candidate.is_file())
    })
}
