//! Logging and observability infrastructure for cmdtree
//!
//! The engine only emits `tracing` events; installing a subscriber is the
//! host's decision. [`init_tracing`] is the subscriber the demo shell uses.

use tracing::{Level, error, span};
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Default filter directive when not verbose
pub const DEFAULT_FILTER: &str = "cmdtree=info,warn";

/// Filter directive used with `verbose`
pub const VERBOSE_FILTER: &str = "cmdtree=debug,info";

/// Build the `EnvFilter` used by [`init_tracing`].
///
/// Precedence: `RUST_LOG` > explicit `filter` > verbosity default.
pub fn build_filter(verbose: bool, filter: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| match filter {
            Some(directives) => EnvFilter::try_new(directives),
            None if verbose => EnvFilter::try_new(VERBOSE_FILTER),
            None => EnvFilter::try_new(DEFAULT_FILTER),
        })
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize the tracing subscriber.
///
/// Verbose output includes targets and closes spans with timing; the default
/// format is compact and minimal.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_tracing(
    verbose: bool,
    filter: Option<&str>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let env_filter = build_filter(verbose, filter);

    if verbose {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_line_number(false)
                    .with_file(false)
                    .with_span_events(FmtSpan::CLOSE)
                    .compact(),
            )
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_line_number(false)
                    .with_file(false)
                    .compact(),
            )
            .try_init()?;
    }

    Ok(())
}

/// Create the span wrapping one dispatch of a root command.
pub fn dispatch_span(command: &str, actor: &str) -> tracing::Span {
    span!(
        Level::DEBUG,
        "dispatch",
        command = %command,
        actor = %actor,
    )
}

/// Create the span wrapping one completion request.
pub fn completion_span(command: &str, actor: &str, token_count: usize) -> tracing::Span {
    span!(
        Level::TRACE,
        "complete",
        command = %command,
        actor = %actor,
        token_count = token_count,
    )
}

/// Log an executor fault with full detail.
///
/// Only the log receives `detail`; the actor is shown a generic notice.
pub fn log_executor_fault(command: &str, actor: &str, detail: &str) {
    error!(
        command = %command,
        actor = %actor,
        error = %detail,
        "Command executor failed"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_filter_accepts_explicit_directives() {
        // Does not panic on a valid directive string.
        let _ = build_filter(false, Some("cmdtree=trace"));
        let _ = build_filter(true, None);
    }

    #[test]
    fn test_spans_can_be_entered_without_subscriber() {
        let span = dispatch_span("base", "console");
        let _guard = span.enter();
        log_executor_fault("base", "console", "boom");
    }
}
