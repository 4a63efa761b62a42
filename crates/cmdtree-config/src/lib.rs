//! Dispatcher configuration for cmdtree
//!
//! Configuration is resolved with precedence: programmatic builder > config
//! file > built-in defaults. See [`DispatcherConfig::discover`] for file
//! discovery rules.

mod builder;
mod discovery;
mod model;
mod validation;

pub use builder::DispatcherConfigBuilder;
pub use discovery::{CONFIG_ENV_VAR, CONFIG_FILE_NAMES};
pub use model::{CompletionConfig, DedupStrategy, DispatcherConfig, LoggingConfig, Messages};
