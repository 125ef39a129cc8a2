use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("account service error: {0}")]
    Account(#[from] reqwest::Error),
    #[error("unknown subscription tier `{label}`")]
    UnknownTier { label: String },
    #[error("feature catalog error: {0}")]
    Catalog(String),
    #[error("{0}")]
    Message(String),
}

pub type AppResult<T> = Result<T, AppError>;
