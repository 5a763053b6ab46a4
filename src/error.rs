use thiserror::Error;

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),

    #[error("Scoring task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = AppError::InvalidInput("no candles".to_string());
        assert_eq!(err.to_string(), "Invalid input: no candles");

        let err = AppError::Config("bad".to_string());
        assert_eq!(err.to_string(), "Configuration error: bad");
    }

    #[test]
    fn test_serde_error_conversion() {
        let parse: std::result::Result<Vec<u8>, _> = serde_json::from_str("not json");
        let err: AppError = parse.unwrap_err().into();
        assert!(matches!(err, AppError::SerdeJson(_)));
    }
}
