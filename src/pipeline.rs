//! The fetch → extract → dedup → probe → rank pipeline.

use std::cmp::Ordering;
use std::collections::HashSet;

use futures::{stream, StreamExt};
use log::{debug, info, warn};
use reqwest::Client;

use crate::config::HarvestConfig;
use crate::decode;
use crate::error::HarvestError;
use crate::extract;
use crate::fetch::{self, FetchOutcome};
use crate::line::{ConfigLine, ScoredConfig};
use crate::parse;
use crate::probe;
use crate::score;
use crate::store;

/// Counts reported after a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Config lines collected across all sources, duplicates included.
    pub collected: usize,
    /// Distinct canonical keys after dedup.
    pub unique: usize,
    /// Lines written to the output file.
    pub emitted: usize,
}

/// One-shot harvest pipeline. Build it with a [`HarvestConfig`] and call
/// [`Pipeline::run`]; every run starts from scratch — nothing but the
/// blacklist and the output file survives between runs.
pub struct Pipeline {
    config: HarvestConfig,
}

impl Pipeline {
    pub fn new(config: HarvestConfig) -> Self {
        Self { config }
    }

    /// Run the pipeline to completion and write the output file.
    ///
    /// The only fatal conditions are an unreadable source list and a failed
    /// write of the run's deliverables (output, blacklist). Per-source and
    /// per-config failures degrade to exclusion and a log line.
    pub async fn run(&self) -> Result<RunSummary, HarvestError> {
        let config = &self.config;

        let blacklist = store::read_blacklist(&config.blacklist_path).await;
        if !blacklist.is_empty() {
            info!("skipping {} blacklisted sources", blacklist.len());
        }
        let sources = store::read_sources(&config.input_path, &blacklist)
            .await
            .map_err(|source| HarvestError::SourceList {
                path: config.input_path.clone(),
                source,
            })?;
        info!("harvesting {} sources", sources.len());

        let client = Client::builder()
            .timeout(config.fetch_timeout)
            .build()
            .map_err(HarvestError::Client)?;
        let outcomes = fetch::fetch_all(&client, &sources, config.fetch_concurrency).await;
        let (collected, failed) = self.collect(outcomes);
        info!(
            "collected {} config lines, {} sources failed",
            collected.len(),
            failed.len()
        );

        store::append_blacklist(&config.blacklist_path, &blacklist, &failed)
            .await
            .map_err(|source| HarvestError::Blacklist {
                path: config.blacklist_path.clone(),
                source,
            })?;

        let collected_count = collected.len();
        let unique = dedup(collected);
        let unique_count = unique.len();
        info!("{unique_count} unique configs");

        let survivors = if config.validate {
            let live = self.check_liveness(unique).await;
            info!("{} configs passed liveness", live.len());
            live
        } else {
            unique
                .into_iter()
                .map(|line| {
                    let score = score::score(line.as_str(), None, false);
                    ScoredConfig {
                        line,
                        score,
                        latency: None,
                    }
                })
                .collect()
        };

        let ranked = rank(survivors);
        let output: Vec<String> = ranked
            .iter()
            .map(|scored| scored.line.retag(&config.rename_tag))
            .collect();
        store::write_output(&config.output_path, &output)
            .await
            .map_err(|source| HarvestError::Output {
                path: config.output_path.clone(),
                source,
            })?;

        Ok(RunSummary {
            collected: collected_count,
            unique: unique_count,
            emitted: output.len(),
        })
    }

    /// Decode and extract every successful payload in completion order;
    /// split out the failed source URLs for the blacklist.
    fn collect(&self, outcomes: Vec<FetchOutcome>) -> (Vec<ConfigLine>, Vec<String>) {
        let mut collected = Vec::new();
        let mut failed = Vec::new();
        for (url, outcome) in outcomes {
            match outcome {
                Ok(body) => {
                    let text = decode::decode_layers(&body);
                    let configs = extract::extract_configs(&text, self.config.max_per_source);
                    debug!("{url}: {} configs", configs.len());
                    collected.extend(configs);
                }
                Err(err) => {
                    warn!("failed source {url}: {err}");
                    failed.push(url);
                }
            }
        }
        (collected, failed)
    }

    /// Parse and probe every unique config concurrently, dropping lines
    /// with no usable address, raw-IP hosts, and unreachable endpoints.
    /// Survivors keep their dedup order regardless of probe completion
    /// order.
    async fn check_liveness(&self, unique: Vec<ConfigLine>) -> Vec<ScoredConfig> {
        let timeout = self.config.probe_timeout;
        let results: Vec<Option<(usize, ConfigLine, Option<f64>)>> =
            stream::iter(unique.into_iter().enumerate())
                .map(|(index, line)| async move {
                    let endpoint = match parse::parse_endpoint(&line) {
                        Ok(endpoint) => endpoint,
                        Err(err) => {
                            debug!("dropping config with no usable address: {err}");
                            return None;
                        }
                    };
                    if endpoint.is_ipv4_literal() {
                        debug!("dropping raw-ip endpoint {}:{}", endpoint.host, endpoint.port);
                        return None;
                    }
                    let result = probe::probe(&endpoint, timeout).await;
                    if !result.reachable {
                        debug!("unreachable endpoint {}:{}", endpoint.host, endpoint.port);
                        return None;
                    }
                    Some((index, line, result.latency))
                })
                .buffer_unordered(self.config.probe_concurrency.max(1))
                .collect()
                .await;

        let mut live: Vec<(usize, ConfigLine, Option<f64>)> =
            results.into_iter().flatten().collect();
        live.sort_by_key(|(index, ..)| *index);
        live.into_iter()
            .map(|(_, line, latency)| {
                let score = score::score(line.as_str(), latency, true);
                ScoredConfig {
                    line,
                    score,
                    latency,
                }
            })
            .collect()
    }
}

/// First-observed-wins dedup keyed by the fragment-stripped canonical key.
fn dedup(lines: Vec<ConfigLine>) -> Vec<ConfigLine> {
    let mut seen = HashSet::new();
    let mut unique = Vec::new();
    for line in lines {
        if seen.insert(line.canonical_key().to_string()) {
            unique.push(line);
        }
    }
    unique
}

/// Stable sort: score descending, ties broken by ascending latency when both
/// sides measured one. Equal-score entries without latency keep their
/// insertion order.
fn rank(mut survivors: Vec<ScoredConfig>) -> Vec<ScoredConfig> {
    survivors.sort_by(|a, b| {
        b.score.cmp(&a.score).then_with(|| match (a.latency, b.latency) {
            (Some(a_latency), Some(b_latency)) => a_latency
                .partial_cmp(&b_latency)
                .unwrap_or(Ordering::Equal),
            _ => Ordering::Equal,
        })
    });
    survivors
}
