use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("a worker panicked: {0}")]
    WorkerPanicked(String),

    #[error("a worker's report channel closed before sending its report for this tick")]
    WorkerDisconnected,
}

pub type SimResult<T> = Result<T, SimError>;
