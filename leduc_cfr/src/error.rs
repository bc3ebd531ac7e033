use thiserror::Error;

#[derive(Error, Debug)]
pub enum LeducError {
    #[error("Invalid history: {0}")]
    InvalidHistory(String),

    #[error("Invalid action count: {0} (a decision point has 2 or 3 actions)")]
    InvalidActionCount(usize),

    #[error("Invalid card: {0}")]
    InvalidCard(char),

    #[error("Invalid action: {0}")]
    InvalidAction(char),

    #[error("Invalid info set: {0}")]
    InvalidInfoSet(String),

    #[error("Invalid deck: {0}")]
    InvalidDeck(String),

    #[error("Iteration count must be positive")]
    InvalidIterations,

    #[error("Strategy for {info_set:?} has {got} probabilities, expected {expected}")]
    StrategyLength {
        info_set: String,
        expected: usize,
        got: usize,
    },

    #[error("Invalid action weights for {info_set:?}: {reason}")]
    InvalidWeights {
        info_set: String,
        reason: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type LeducResult<T> = Result<T, LeducError>;
