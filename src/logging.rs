//! Logging configuration using tracing
//!
//! Structured diagnostics go to stderr and are filtered by RUST_LOG; the
//! interactive prompts and progress lines stay on stdout.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the tracing subscriber
///
/// Defaults to "warn" so a normal run only shows prompts and progress.
///
/// # Example RUST_LOG values
/// - `RUST_LOG=info` - Show each workflow stage
/// - `RUST_LOG=repoinit=debug` - Include HTTP and git details
/// - `RUST_LOG=repoinit=debug,reqwest=debug` - Also trace the HTTP client
///
/// # Errors
/// Returns an error if the subscriber has already been initialized
pub fn init() -> crate::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_line_number(true)
                .compact(),
        )
        .try_init()
        .map_err(|e| crate::RepoInitError::Other(format!("Failed to initialize tracing: {}", e)))?;

    Ok(())
}

/// Initialize logging for tests (no-op if already initialized)
pub fn init_test() {
    let _ = init();
}
