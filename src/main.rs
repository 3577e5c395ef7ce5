//! Runs every orchestration scenario once, logging progress as it goes.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use futures_lite::future;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use async_orchestration::{config::Timings, ops, scenario};

/// Demonstrate sequencing, fan-out/fan-in, racing and cancellable delays
#[derive(Parser)]
#[command(name = "orchestrate")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    verbose: bool,

    /// TOML file with timings, in milliseconds
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Simulated work done by the first operation
    #[arg(long)]
    step_delay_ms: Option<u64>,

    /// Delay of the first racer
    #[arg(long)]
    race_a_ms: Option<u64>,

    /// Delay of the second racer
    #[arg(long)]
    race_b_ms: Option<u64>,

    /// How long the cancellable delay wants to wait
    #[arg(long)]
    delay_ms: Option<u64>,

    /// When the cancellable delay gives up
    #[arg(long)]
    timeout_ms: Option<u64>,
}

impl Cli {
    fn timings(&self) -> Result<Timings> {
        let mut timings = match &self.config {
            Some(path) => Timings::load(path)?,
            None => Timings::default(),
        };

        let overrides = [
            (self.step_delay_ms, &mut timings.step_delay_ms),
            (self.race_a_ms, &mut timings.race_a_ms),
            (self.race_b_ms, &mut timings.race_b_ms),
            (self.delay_ms, &mut timings.delay_ms),
            (self.timeout_ms, &mut timings.timeout_ms),
        ];
        for (value, field) in overrides {
            if let Some(value) = value {
                *field = value;
            }
        }
        Ok(timings)
    }
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(env_filter)
        .init();
}

async fn run(timings: &Timings) -> Result<()> {
    let work = timings.step_delay();

    // both calls are started together and joined before anything else runs.
    let (single, chained) = future::zip(ops::fetch_result(work), scenario::run(work)).await;
    println!("single operation: {}", single.context("single operation failed")?);
    println!("chained operations: {}", chained.context("chain failed")?);

    let results = scenario::run_all(work).await.context("fan-in failed")?;
    println!("fan-in results: {results:?}");

    let (winner, loser) = scenario::race_two(timings.race_a(), timings.race_b()).await;
    println!("race winner: {winner}");

    let outcome = scenario::delay(timings.delay(), timings.timeout()).await;
    println!("cancellable delay: {outcome}");

    // the race loser was left running; let it finish before the process exits.
    loser.join();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let timings = cli.timings()?;
    tracing::debug!(?timings, "starting");

    future::block_on(run(&timings))
}
