use crate::error::StorageError;

/// Synchronous string key-value persistence.
///
/// A `set` must be durable before it returns so that the next `get` of the
/// same key observes it.
pub trait KvBackend {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Returns whether a value was present.
    fn remove(&mut self, key: &str) -> Result<bool, StorageError>;

    fn keys(&self) -> Result<Vec<String>, StorageError>;
}
