use anyhow::Context;
use clap::Parser;
use shoal::{DEFAULT_QUEUE_CAPACITY, PoolConfig};

/// Runtime configuration for the `shoal` console.
///
/// Values are parsed from CLI arguments or environment variables (a `.env`
/// file in the working directory is honoured).
#[derive(Parser, Debug, Clone)]
#[command(
    name = "shoal",
    version,
    about = "Drive a resizable worker pool from the command line",
    long_about = "Reads one command per line from stdin:\n\n  \
        add           start a new worker\n  \
        remove <id>   stop the worker with the given id\n  \
        quit          shut the pool down and exit\n  \
        <anything>    submit the whole line as a job"
)]
pub struct CliArgs {
    /// Number of jobs the queue holds before `add_job` has to wait.
    ///
    /// Environment variable: `QUEUE_CAPACITY`
    #[arg(long, env = "QUEUE_CAPACITY", default_value_t = DEFAULT_QUEUE_CAPACITY)]
    pub queue_capacity: usize,

    /// Number of workers started before the first command is read.
    ///
    /// Environment variable: `INITIAL_WORKERS`
    #[arg(short = 'w', long = "workers", env = "INITIAL_WORKERS", default_value_t = 2)]
    pub initial_workers: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct AppConfig {
    pub pool: PoolConfig,
    pub initial_workers: usize,
}

impl TryFrom<CliArgs> for AppConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        let pool = PoolConfig::new(args.queue_capacity).context("invalid `QUEUE_CAPACITY`")?;

        Ok(Self {
            pool,
            initial_workers: args.initial_workers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliArgs {
        CliArgs::try_parse_from(std::iter::once("shoal").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn flags_override_defaults() {
        let config = AppConfig::try_from(parse(&["--queue-capacity", "3", "--workers", "0"])).unwrap();
        assert_eq!(config.pool.queue_capacity(), 3);
        assert_eq!(config.initial_workers, 0);
    }

    #[test]
    fn zero_capacity_is_refused() {
        let err = AppConfig::try_from(parse(&["--queue-capacity", "0"])).unwrap_err();
        assert!(err.to_string().contains("QUEUE_CAPACITY"));
    }

    #[test]
    fn negative_worker_count_does_not_parse() {
        assert!(CliArgs::try_parse_from(["shoal", "--workers", "-1"]).is_err());
    }
}
