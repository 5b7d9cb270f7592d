use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize a tracing subscriber with default configuration.
///
/// Prints compact formatted logs to stdout, filtered by the `RUST_LOG`
/// environment variable with a default level of "info".
pub fn init() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let fmt_layer = fmt::layer().with_target(true).with_level(true).compact();

    let filter_layer = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::{debug, info};

    #[test]
    fn test_logging_init() {
        // Only one subscriber can install per process.
        let _ = init();

        info!("composition logging ready");
        debug!("debug messages pass through the env filter");
    }
}
