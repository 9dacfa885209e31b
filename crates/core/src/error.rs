use thiserror::Error;

pub type PlannerResult<T> = Result<T, PlannerError>;

#[derive(Error, Debug)]
pub enum PlannerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Keyword input error: {0}")]
    Input(String),

    #[error("Budget error: {0}")]
    Budget(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}
