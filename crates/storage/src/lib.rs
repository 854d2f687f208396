pub mod collection;
pub mod error;
pub mod record_store;
pub mod schema;
pub mod sqlite;
pub mod traits;

pub use collection::{Collection, DefaultReason, LoadSource, Loaded};
pub use error::StorageError;
pub use record_store::{RecordStore, Snapshot, StoreOptions};
pub use sqlite::SqliteKv;
pub use traits::*;
