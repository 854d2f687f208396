use kitchen_storage::StorageError;
use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// The stored value could not be read, so writing an edited default
    /// would replace it.
    #[error("stored {collection} could not be read; not overwriting it")]
    MalformedCollection { collection: &'static str },

    #[error("no production entry {index} on {date}")]
    EntryNotFound { date: String, index: usize },
}
