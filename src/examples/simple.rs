//! Simple example of driving the harvest pipeline from code.

use std::time::Duration;

use sub_harvester::{HarvestConfig, Pipeline};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    println!("Harvesting subscription sources...");

    let config = HarvestConfig::builder()
        // newline-delimited source URLs, one subscription list per line
        .input_path("inputs.txt")
        .output_path("output.txt")
        .blacklist_path("blacklist.txt")
        .fetch_timeout(Duration::from_secs(10))
        // probe endpoints over TCP and rank reachable ones by latency
        .validate(true)
        .rename_tag("curated")
        .build();

    let summary = Pipeline::new(config).run().await?;

    println!("Collected: {}", summary.collected);
    println!("Unique: {}", summary.unique);
    println!("Emitted: {}", summary.emitted);

    Ok(())
}
