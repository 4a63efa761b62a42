use cmdtree_utils::error::ConfigError;

use crate::DispatcherConfig;

fn require_non_empty(key: &str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: "must not be empty".to_string(),
        });
    }
    Ok(())
}

impl DispatcherConfig {
    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty("messages.no_permission", &self.messages.no_permission)?;
        require_non_empty("messages.internal_error", &self.messages.internal_error)?;
        require_non_empty("messages.unsupported_actor", &self.messages.unsupported_actor)?;
        require_non_empty("messages.unknown_command", &self.messages.unknown_command)?;

        if self.completion.max_suggestions == Some(0) {
            return Err(ConfigError::InvalidValue {
                key: "completion.max_suggestions".to_string(),
                value: "must be greater than 0".to_string(),
            });
        }

        if let Some(filter) = &self.logging.filter {
            require_non_empty("logging.filter", filter)?;
        }

        Ok(())
    }
}
