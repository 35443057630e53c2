use thiserror::Error;

/// Error types
#[derive(Debug, Error)]
pub enum Error {
    #[error("atomic potential error: {0}")]
    AtomicPotentialError(String),

    #[error("integrator error: {0}")]
    IntegratorError(String),

    #[error("neighbor list error: {0}")]
    NeighborListError(String),

    #[error("lattice error: {0}")]
    LatticeError(String),

    #[error("group error: {0}")]
    GroupError(String),

    #[error("output error: {0}")]
    OutputError(String),

    #[error("context error: {0}")]
    ContextError(String),

    #[error("simulation error: {0}")]
    SimulationError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
