//! Configuration for a harvest run.

use std::path::PathBuf;
use std::time::Duration;

/// Configuration for the harvest pipeline.
#[derive(Debug, Clone)]
pub struct HarvestConfig {
    /// Newline-delimited list of source URLs to fetch.
    pub input_path: PathBuf,
    /// File the ranked config list is written to (overwritten each run).
    pub output_path: PathBuf,
    /// Persisted list of sources that failed fetch; skipped on later runs.
    pub blacklist_path: PathBuf,
    /// Timeout for each source fetch.
    pub fetch_timeout: Duration,
    /// Number of source fetches in flight at once.
    pub fetch_concurrency: usize,
    /// Timeout for each TCP liveness probe.
    pub probe_timeout: Duration,
    /// Number of liveness probes in flight at once.
    pub probe_concurrency: usize,
    /// Maximum config lines kept per source.
    pub max_per_source: usize,
    /// Fragment stamped onto every emitted config line.
    pub rename_tag: String,
    /// Probe endpoints over TCP and rank by measured latency.
    pub validate: bool,
}

impl HarvestConfig {
    /// Create a new configuration builder.
    pub fn builder() -> HarvestConfigBuilder {
        HarvestConfigBuilder::new()
    }
}

/// Builder for `HarvestConfig`.
pub struct HarvestConfigBuilder {
    input_path: Option<PathBuf>,
    output_path: Option<PathBuf>,
    blacklist_path: Option<PathBuf>,
    fetch_timeout: Option<Duration>,
    fetch_concurrency: Option<usize>,
    probe_timeout: Option<Duration>,
    probe_concurrency: Option<usize>,
    max_per_source: Option<usize>,
    rename_tag: Option<String>,
    validate: Option<bool>,
}

impl HarvestConfigBuilder {
    /// Create a new builder with default values.
    pub fn new() -> Self {
        Self {
            input_path: None,
            output_path: None,
            blacklist_path: None,
            fetch_timeout: None,
            fetch_concurrency: None,
            probe_timeout: None,
            probe_concurrency: None,
            max_per_source: None,
            rename_tag: None,
            validate: None,
        }
    }

    /// Set the source list path.
    pub fn input_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.input_path = Some(path.into());
        self
    }

    /// Set the output file path.
    pub fn output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(path.into());
        self
    }

    /// Set the blacklist file path.
    pub fn blacklist_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.blacklist_path = Some(path.into());
        self
    }

    /// Set the per-source fetch timeout.
    pub fn fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = Some(timeout);
        self
    }

    /// Set the number of concurrent source fetches.
    pub fn fetch_concurrency(mut self, concurrency: usize) -> Self {
        self.fetch_concurrency = Some(concurrency);
        self
    }

    /// Set the per-endpoint probe timeout.
    pub fn probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = Some(timeout);
        self
    }

    /// Set the number of concurrent liveness probes.
    pub fn probe_concurrency(mut self, concurrency: usize) -> Self {
        self.probe_concurrency = Some(concurrency);
        self
    }

    /// Set the per-source config line cap.
    pub fn max_per_source(mut self, cap: usize) -> Self {
        self.max_per_source = Some(cap);
        self
    }

    /// Set the fragment stamped onto every emitted line.
    pub fn rename_tag(mut self, tag: impl Into<String>) -> Self {
        self.rename_tag = Some(tag.into());
        self
    }

    /// Enable or disable the TCP liveness phase.
    pub fn validate(mut self, validate: bool) -> Self {
        self.validate = Some(validate);
        self
    }

    /// Build the configuration.
    pub fn build(self) -> HarvestConfig {
        HarvestConfig {
            input_path: self.input_path.unwrap_or_else(|| PathBuf::from("inputs.txt")),
            output_path: self.output_path.unwrap_or_else(|| PathBuf::from("output.txt")),
            blacklist_path: self
                .blacklist_path
                .unwrap_or_else(|| PathBuf::from("blacklist.txt")),
            fetch_timeout: self.fetch_timeout.unwrap_or(Duration::from_secs(10)),
            fetch_concurrency: self.fetch_concurrency.unwrap_or(10),
            probe_timeout: self.probe_timeout.unwrap_or(Duration::from_secs(3)),
            probe_concurrency: self.probe_concurrency.unwrap_or(30),
            max_per_source: self.max_per_source.unwrap_or(100),
            rename_tag: self.rename_tag.unwrap_or_else(|| "Amir".to_string()),
            validate: self.validate.unwrap_or(false),
        }
    }
}

impl Default for HarvestConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
