use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid date key: {0}")]
    InvalidDate(String),
}
