// HEARTBEATS ERROR TYPES
// CONSTRUCTION AND LOGGING ARE THE ONLY FALLIBLE PATHS.
// REPORTS AND QUERIES NEVER FAIL ON A LIVE ENGINE.

use std::collections::TryReserveError;
use std::io;
use std::path::PathBuf;

/// Errors produced by the heartbeat engine, its log codec and its sinks.
#[derive(thiserror::Error, Debug)]
pub enum HeartbeatError {
    /// Window size must be strictly positive
    #[error("invalid window size: {0}")]
    InvalidWindowSize(i64),
    /// Window storage could not be reserved
    #[error("failed to allocate window buffer: {0}")]
    Allocation(#[from] TryReserveError),
    /// The sink rejected or only partially accepted a write
    #[error("failed to write heartbeat log: {0}")]
    Write(#[from] io::Error),
    /// Log descriptor is negative
    #[error("invalid file descriptor: {0}")]
    InvalidDescriptor(i32),
    /// Energy counter file could not be read
    #[error("failed to read energy counter {path}: {source}")]
    Energy {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Energy counter held something other than a non-negative integer
    #[error("malformed energy reading: {0:?}")]
    EnergyParse(String),
}

pub type Result<T> = std::result::Result<T, HeartbeatError>;
