/// Application-level errors
///
/// Every variant is recoverable: the menu loop reports the message inline and
/// keeps running. No retries are performed anywhere.
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Missing configuration: {0}")]
    MissingConfig(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("External API error: {0}")]
    ExternalApi(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type AppResult<T> = Result<T, AppError>;
