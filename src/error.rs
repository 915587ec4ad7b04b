//! Error types for the sub-harvester crate.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Fatal pipeline errors. Everything else degrades to "exclude this item".
#[derive(Debug, Error)]
pub enum HarvestError {
    /// The source list could not be read; there is nothing to do.
    #[error("failed to read source list {path:?}: {source}")]
    SourceList {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The blacklist could not be updated after the fetch phase.
    #[error("failed to update blacklist {path:?}: {source}")]
    Blacklist {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The output file could not be written.
    #[error("failed to write output {path:?}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The HTTP client could not be constructed.
    #[error("failed to build http client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Why a source produced no payload.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The server answered with something other than 200.
    #[error("unexpected status {0}")]
    Status(reqwest::StatusCode),
    /// Connection error, timeout, or a failed body read.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

/// Why no endpoint could be extracted from a config line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The vmess payload was not valid base64-wrapped JSON.
    #[error("vmess payload is not base64-encoded json")]
    VmessPayload,
    /// The authority carried no `host:port` separator.
    #[error("authority has no host:port separator")]
    MissingPort,
    /// The port substring did not parse as a u16.
    #[error("invalid port {0:?}")]
    InvalidPort(String),
    /// The host part was empty.
    #[error("empty host")]
    EmptyHost,
}
