use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use kitchen_core::model::{day_entries, normalize_date_key};
use kitchen_core::{ProductionLog, RawMaterial, Recipe, seed};

use crate::collection::{Collection, DefaultReason, Loaded};
use crate::error::StorageError;
use crate::sqlite::SqliteKv;
use crate::traits::KvBackend;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreOptions {
    /// Whether empty raw-material and recipe collections read back as the
    /// sample catalogue.
    pub seed_defaults: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            seed_defaults: true,
        }
    }
}

/// All persisted collections read at one point in time.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub raw_materials: Vec<RawMaterial>,
    pub recipes: Vec<Recipe>,
    pub production_log: ProductionLog,
}

/// Typed, whole-collection access over a [`KvBackend`].
///
/// Missing or unparsable stored values read back as the collection's default;
/// the returned [`Loaded`] says which happened. Backend failures are errors.
pub struct RecordStore<B: KvBackend = SqliteKv> {
    backend: B,
    options: StoreOptions,
}

impl RecordStore<SqliteKv> {
    pub fn open(path: impl AsRef<std::path::Path>, options: StoreOptions) -> Result<Self, StorageError> {
        Ok(Self::new(SqliteKv::open(path)?, options))
    }

    pub fn open_in_memory(options: StoreOptions) -> Result<Self, StorageError> {
        Ok(Self::new(SqliteKv::open_in_memory()?, options))
    }
}

impl<B: KvBackend> RecordStore<B> {
    pub fn new(backend: B, options: StoreOptions) -> Self {
        Self { backend, options }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn options(&self) -> StoreOptions {
        self.options
    }

    fn load_or<T: DeserializeOwned>(
        &self,
        collection: Collection,
        default: impl FnOnce() -> T,
    ) -> Result<Loaded<T>, StorageError> {
        if !collection.is_persisted() {
            return Err(StorageError::NotPersisted(collection.key()));
        }
        let Some(text) = self.backend.get(collection.key())? else {
            debug!(collection = collection.key(), "no stored value, using default");
            return Ok(Loaded::defaulted(default(), DefaultReason::Missing));
        };
        match serde_json::from_str(&text) {
            Ok(value) => {
                debug!(collection = collection.key(), bytes = text.len(), "loaded");
                Ok(Loaded::stored(value))
            }
            Err(e) => {
                warn!(collection = collection.key(), error = %e, "stored value is malformed, using default");
                Ok(Loaded::defaulted(default(), DefaultReason::Malformed))
            }
        }
    }

    fn save_value<T: Serialize + ?Sized>(
        &mut self,
        collection: Collection,
        value: &T,
    ) -> Result<(), StorageError> {
        if !collection.is_persisted() {
            return Err(StorageError::NotPersisted(collection.key()));
        }
        let text =
            serde_json::to_string(value).map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.backend.set(collection.key(), &text)?;
        debug!(collection = collection.key(), bytes = text.len(), "saved");
        Ok(())
    }

    pub fn load_raw_materials(&self) -> Result<Loaded<Vec<RawMaterial>>, StorageError> {
        let seeded = self.options.seed_defaults;
        self.load_or(Collection::RawMaterials, || {
            if seeded { seed::sample_raw_materials() } else { Vec::new() }
        })
    }

    pub fn save_raw_materials(&mut self, materials: &[RawMaterial]) -> Result<(), StorageError> {
        self.save_value(Collection::RawMaterials, materials)
    }

    pub fn load_recipes(&self) -> Result<Loaded<Vec<Recipe>>, StorageError> {
        let seeded = self.options.seed_defaults;
        self.load_or(Collection::Recipes, || {
            if seeded { seed::sample_recipes() } else { Vec::new() }
        })
    }

    pub fn save_recipes(&mut self, recipes: &[Recipe]) -> Result<(), StorageError> {
        self.save_value(Collection::Recipes, recipes)
    }

    /// Only a value that is not a JSON object counts as malformed. Date keys
    /// are zero-padded to `YYYY-MM-DD`; days whose keys pad to the same date
    /// are merged in key order, and keys that are not dates are kept as is.
    pub fn load_production_log(&self) -> Result<Loaded<ProductionLog>, StorageError> {
        let days = self.load_or(Collection::ProductionLog, Map::new)?;
        Ok(Loaded {
            value: production_log_from(days.value),
            source: days.source,
        })
    }

    pub fn save_production_log(&mut self, log: &ProductionLog) -> Result<(), StorageError> {
        self.save_value(Collection::ProductionLog, log)
    }

    /// Drops the stored value so the next load falls back to the default.
    pub fn clear(&mut self, collection: Collection) -> Result<bool, StorageError> {
        if !collection.is_persisted() {
            return Err(StorageError::NotPersisted(collection.key()));
        }
        let removed = self.backend.remove(collection.key())?;
        debug!(collection = collection.key(), removed, "cleared");
        Ok(removed)
    }

    pub fn snapshot(&self) -> Result<Snapshot, StorageError> {
        Ok(Snapshot {
            raw_materials: self.load_raw_materials()?.into_value(),
            recipes: self.load_recipes()?.into_value(),
            production_log: self.load_production_log()?.into_value(),
        })
    }
}

fn production_log_from(days: Map<String, Value>) -> ProductionLog {
    let mut log = ProductionLog::new();
    for (key, day) in days {
        let entries = day_entries(&day);
        let date = match normalize_date_key(&key) {
            Ok(date) => {
                if date != key {
                    debug!(stored = %key, date = %date, "padded production log date");
                }
                date
            }
            Err(e) => {
                warn!(key = %key, error = %e, "production log key is not a date, keeping it");
                key
            }
        };
        log.entry(date).or_default().extend(entries);
    }
    log
}
