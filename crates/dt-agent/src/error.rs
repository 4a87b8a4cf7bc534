//! Errors for agent storage and the trip-chain sequencer.

use thiserror::Error;

use dt_core::AgentId;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("agent {0} not found in this worker's store")]
    NotFound(AgentId),

    #[error("trip chain for agent {0} is empty")]
    EmptyTripChain(AgentId),

    #[error("agent {0} has no active role")]
    NoActiveRole(AgentId),
}

pub type AgentResult<T> = Result<T, AgentError>;
