//! Error type shared by the whole crate.

use std::path::PathBuf;

/// Errors surfaced by configuration, the endgame database and the agent.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("unknown heuristic id {0}")]
    UnknownHeuristic(u8),

    #[error("invalid selector: {0}")]
    InvalidSelector(String),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("endgame database {path}: {source}")]
    Database {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("endgame table for {0} stones does not fit in memory")]
    TableTooLarge(u32),

    #[error("board mapping: {0}")]
    BoardMapping(String),

    #[error("no move to choose: the game is over")]
    GameOver,
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Error>;
