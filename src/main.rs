//! Command-line entry point for the harvest pipeline.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;

use sub_harvester::{HarvestConfig, Pipeline};

#[derive(Debug, Parser)]
#[command(
    name = "sub-harvester",
    about = "fetch, dedup, probe and rank proxy subscription configs"
)]
struct Cli {
    /// Newline-delimited list of source URLs.
    #[arg(long, default_value = "inputs.txt")]
    input: PathBuf,

    /// File the ranked config list is written to.
    #[arg(long, default_value = "output.txt")]
    output: PathBuf,

    /// Persisted list of sources that failed fetch.
    #[arg(long, default_value = "blacklist.txt")]
    blacklist: PathBuf,

    /// Probe each endpoint over TCP and rank by measured latency.
    #[arg(long)]
    validate: bool,

    /// Fragment stamped onto every emitted config.
    #[arg(long, default_value = "Amir")]
    tag: String,

    /// Seconds allowed per source fetch.
    #[arg(long, default_value_t = 10)]
    fetch_timeout: u64,

    /// Concurrent source fetches.
    #[arg(long, default_value_t = 10)]
    fetch_concurrency: usize,

    /// Seconds allowed per liveness probe.
    #[arg(long, default_value_t = 3)]
    probe_timeout: u64,

    /// Concurrent liveness probes.
    #[arg(long, default_value_t = 30)]
    probe_concurrency: usize,

    /// Maximum configs kept per source.
    #[arg(long, default_value_t = 100)]
    max_per_source: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = HarvestConfig::builder()
        .input_path(cli.input)
        .output_path(cli.output)
        .blacklist_path(cli.blacklist)
        .fetch_timeout(Duration::from_secs(cli.fetch_timeout))
        .fetch_concurrency(cli.fetch_concurrency)
        .probe_timeout(Duration::from_secs(cli.probe_timeout))
        .probe_concurrency(cli.probe_concurrency)
        .max_per_source(cli.max_per_source)
        .rename_tag(cli.tag)
        .validate(cli.validate)
        .build();

    let summary = Pipeline::new(config).run().await?;

    println!("Total collected: {}", summary.collected);
    println!("Unique: {}", summary.unique);
    println!("Final: {}", summary.emitted);
    println!("Done.");
    Ok(())
}
