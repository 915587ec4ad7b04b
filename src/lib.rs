//! # sub-harvester
//!
//! Aggregates proxy subscription configs published across many remote text
//! sources, deduplicates them, optionally probes endpoint liveness over raw
//! TCP, and emits a ranked, retagged list.
//!
//! The pipeline runs two bounded parallel phases — source fetching and
//! liveness probing — and a pure scoring/ranking pass in between reads of
//! the persisted source list, blacklist, and output file.

pub mod config;
pub mod decode;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod line;
pub mod parse;
pub mod pipeline;
pub mod probe;
pub mod score;
mod store;

pub use config::{HarvestConfig, HarvestConfigBuilder};
pub use error::{FetchError, HarvestError, ParseError};
pub use line::{ConfigLine, Scheme, ScoredConfig};
pub use parse::Endpoint;
pub use pipeline::{Pipeline, RunSummary};
pub use probe::Liveness;
