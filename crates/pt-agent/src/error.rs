use pt_core::AgentId;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AgentError {
    #[error("agent {0} is already registered on this tile")]
    DuplicateAgent(AgentId),

    #[error("agent {0} not found")]
    NotFound(AgentId),
}

pub type AgentResult<T> = Result<T, AgentError>;
