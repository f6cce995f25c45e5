//! Log output for the console.
//!
//! Pool notifications own stdout, so diagnostics go to stderr through a
//! `tracing_subscriber::fmt` layer. Verbosity follows `RUST_LOG` and defaults
//! to `warn`, which keeps an interactive session quiet.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub fn init_telemetry() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_thread_ids(true)
                .with_line_number(true)
                .with_target(false)
                .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
                .with_file(true)
                .compact(),
        )
        .try_init()?;

    Ok(())
}
