#![doc = include_str!("../README.md")]

mod cli;

use clap::Parser;
use cli::{
    config::{AppConfig, CliArgs},
    console::{print_events, stdin_lines},
    session,
    telemetry::init_telemetry,
};
use shoal::WorkerPool;
use tokio::{io::AsyncWriteExt, signal};

// Using mimalloc for cheap small allocations (payloads, events) across
// runtime threads.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = AppConfig::try_from(args)?;

    init_telemetry()?;
    log_startup_info(&config);

    let (pool, events) = WorkerPool::new(config.pool)?;
    let printer = tokio::spawn(print_events(events, tokio::io::stdout()));

    for _ in 0..config.initial_workers {
        pool.add_worker()?;
    }

    let mut out = tokio::io::stdout();
    let _exit = session::run(&pool, stdin_lines(), &mut out, interrupt_signal()).await?;

    #[cfg(feature = "tracing")]
    tracing::info!("Session ended ({_exit:?})");

    // Dropping the pool closes the event stream once the printer has caught
    // up with every notification.
    drop(pool);
    printer.await??;

    out.write_all(b"pool stopped, exiting.\n").await?;
    out.flush().await?;
    Ok(())
}

fn log_startup_info(_config: &AppConfig) {
    if cfg!(debug_assertions) {
        #[cfg(feature = "tracing")]
        tracing::info!("Starting worker pool with full config: {:#?}", _config);
    } else {
        #[cfg(feature = "tracing")]
        tracing::info!(
            "Starting worker pool with {} workers and a queue of {}",
            _config.initial_workers,
            _config.pool.queue_capacity()
        );
    }
}

async fn interrupt_signal() {
    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    tokio::select! {
        () = ctrl_c => {
            #[cfg(feature = "tracing")]
            tracing::info!("Received Ctrl+C signal");
        },
        () = terminate => {
            #[cfg(feature = "tracing")]
            tracing::info!("Received SIGTERM signal");
        },
    }
}
