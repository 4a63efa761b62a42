use cmdtree_utils::error::ConfigError;

use crate::{DedupStrategy, DispatcherConfig};

impl DispatcherConfig {
    /// Create a builder for programmatic configuration.
    ///
    /// # Example
    ///
    /// ```rust
    /// use cmdtree_config::{DedupStrategy, DispatcherConfig};
    ///
    /// let config = DispatcherConfig::builder()
    ///     .no_permission_message("Access denied.")
    ///     .dedup(DedupStrategy::PerInstance)
    ///     .max_suggestions(20)
    ///     .build()
    ///     .expect("valid config");
    ///
    /// assert_eq!(config.completion.max_suggestions, Some(20));
    /// ```
    #[must_use]
    pub fn builder() -> DispatcherConfigBuilder {
        DispatcherConfigBuilder::new()
    }
}

/// Builder for [`DispatcherConfig`].
///
/// Unset values keep their built-in defaults.
#[derive(Debug, Clone, Default)]
pub struct DispatcherConfigBuilder {
    config: DispatcherConfig,
}

impl DispatcherConfigBuilder {
    /// Create a builder holding the built-in defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration, e.g. one loaded from a file.
    #[must_use]
    pub fn from_config(config: DispatcherConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn no_permission_message(mut self, message: impl Into<String>) -> Self {
        self.config.messages.no_permission = message.into();
        self
    }

    #[must_use]
    pub fn internal_error_message(mut self, message: impl Into<String>) -> Self {
        self.config.messages.internal_error = message.into();
        self
    }

    #[must_use]
    pub fn unsupported_actor_message(mut self, message: impl Into<String>) -> Self {
        self.config.messages.unsupported_actor = message.into();
        self
    }

    #[must_use]
    pub fn unknown_command_message(mut self, message: impl Into<String>) -> Self {
        self.config.messages.unknown_command = message.into();
        self
    }

    /// Set the completion deduplication strategy.
    #[must_use]
    pub fn dedup(mut self, strategy: DedupStrategy) -> Self {
        self.config.completion.dedup = strategy;
        self
    }

    /// Cap the number of suggestions returned by one completion request.
    ///
    /// Must be > 0.
    #[must_use]
    pub fn max_suggestions(mut self, max: usize) -> Self {
        self.config.completion.max_suggestions = Some(max);
        self
    }

    #[must_use]
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.config.logging.verbose = verbose;
        self
    }

    #[must_use]
    pub fn log_filter(mut self, filter: impl Into<String>) -> Self {
        self.config.logging.filter = Some(filter.into());
        self
    }

    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if any value fails validation.
    pub fn build(self) -> Result<DispatcherConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
