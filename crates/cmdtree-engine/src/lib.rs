//! Command resolution, dispatch and completion
//!
//! - [`resolver`]: maps `(root, tokens)` to exactly one [`Resolution`]
//! - [`dispatcher`]: resolution, argument parsing, requirements, executor
//! - [`completion`]: token-wise suggestions mirroring the resolver's walk
//! - [`usage`]: the seam through which usage errors reach a help renderer

pub mod completion;
pub mod dispatcher;
pub mod outcome;
pub mod resolver;
pub mod usage;

pub use completion::complete;
pub use dispatcher::{Dispatcher, DispatcherBuilder};
pub use outcome::{DispatchOutcome, Resolution};
pub use resolver::resolve;
pub use usage::{PlainUsageRenderer, UsageRenderer};
