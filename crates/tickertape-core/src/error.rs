use thiserror::Error;

use crate::metrics::NodeId;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Node not ready: {0}")]
    NodeNotReady(NodeId),

    #[error("Invalid width for {node}: {value}")]
    InvalidWidth { node: NodeId, value: f64 },

    #[error("Drive target is not a finite number: {0}")]
    NonFiniteTarget(f64),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Marquee controller has been disposed")]
    Disposed,

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Failures that a later natural re-measurement is expected to clear
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Error::NodeNotReady(_) | Error::InvalidWidth { .. } | Error::NonFiniteTarget(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
