use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Installs the global subscriber. `filter` uses `EnvFilter` directive syntax;
/// an unparsable value falls back to `info`.
pub fn init_logging(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .compact();

    if tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        tracing::debug!("logging already initialised");
    }
}
