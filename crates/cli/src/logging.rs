use std::io::IsTerminal;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the stderr log subscriber.
///
/// The filter comes from `level` if given, else `RUST_LOG`, else `warn`.
/// Stdout stays reserved for step outcomes.
pub fn init_logging(level: Option<&str>) -> Result<(), String> {
    let filter = match level {
        Some(directives) => EnvFilter::try_new(directives)
            .map_err(|e| format!("invalid --log-level '{}': {}", directives, e))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .try_init()
        .map_err(|e| format!("could not install logger: {}", e))
}
