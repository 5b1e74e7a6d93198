//! Error type shared by the library.
//!
//! The set operations themselves are total; only growth (when the caller asks
//! for a fallible visit) and configuration loading can fail.

use std::{collections::TryReserveError, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum VisitedError {
    /// The allocator refused to grow the stamp array.
    #[error("failed to grow visited set to {requested} slots")]
    Allocation {
        requested: usize,
        #[source]
        source: TryReserveError,
    },

    /// `node + growth_margin` does not fit in a `usize`.
    #[error("node id {node} is too large to be tracked")]
    CapacityOverflow { node: usize },

    #[error("invalid pool configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to read configuration file {}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration")]
    ConfigParse(#[from] toml::de::Error),
}

pub type Result<T, E = VisitedError> = std::result::Result<T, E>;
