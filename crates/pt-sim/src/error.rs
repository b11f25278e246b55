use pt_agent::AgentError;
use pt_core::{CoreError, TileCoord};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum SimError {
    #[error("engine configuration error: {0}")]
    Config(#[from] CoreError),

    #[error("agent error: {0}")]
    Agent(#[from] AgentError),

    #[error("tile {0} has not been visited")]
    UnknownTile(TileCoord),

    #[error("no tile is active")]
    NoActiveTile,
}

pub type SimResult<T> = Result<T, SimError>;
