pub mod config;
pub mod error;
pub mod logging;

pub use config::{ConfigError, KitchenConfig, LoggingConfig, StorageConfig};
pub use error::EngineError;

use chrono::NaiveDate;
use tracing::{info, warn};

use kitchen_core::{
    Catalog, DaySummary, EntryCost, MaterialUsage, ProductCost, ProductionEntry, ProductionLog,
    RangeSummary, RawMaterial, Recipe, ReportRow, aggregate, cost, report,
};
use kitchen_storage::{
    Collection, DefaultReason, LoadSource, Loaded, RecordStore, Snapshot, SqliteKv, StoreOptions,
};

const DATE_FORMAT: &str = "%Y-%m-%d";
const MONTH_FORMAT: &str = "%Y-%m";

/// Production log key for `date`.
pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// `YYYY-MM` prefix selecting every date in the month of `date`.
pub fn month_prefix(date: NaiveDate) -> String {
    date.format(MONTH_FORMAT).to_string()
}

/// The handle a front end holds: the record store plus the cost and
/// reporting rules evaluated over its current contents.
///
/// Every mutation reads the whole collection, edits it, and writes the whole
/// collection back before returning. A collection whose stored value could not
/// be parsed is never written; mutations on it fail until [`Kitchen::reset`].
pub struct Kitchen {
    store: RecordStore<SqliteKv>,
}

impl Kitchen {
    pub fn new(store: RecordStore<SqliteKv>) -> Self {
        Self { store }
    }

    pub fn open(config: &KitchenConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let store = RecordStore::open(&config.storage.path, config.storage.store_options())?;
        info!(path = %config.storage.path, "kitchen store opened");
        Ok(Self::new(store))
    }

    pub fn open_in_memory(options: StoreOptions) -> Result<Self, EngineError> {
        Ok(Self::new(RecordStore::open_in_memory(options)?))
    }

    pub fn store(&self) -> &RecordStore<SqliteKv> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut RecordStore<SqliteKv> {
        &mut self.store
    }

    pub fn snapshot(&self) -> Result<Snapshot, EngineError> {
        Ok(self.store.snapshot()?)
    }

    /// Discards whatever is stored for `collection`. Returns whether anything
    /// was there.
    pub fn reset(&mut self, collection: Collection) -> Result<bool, EngineError> {
        let removed = self.store.clear(collection)?;
        info!(collection = collection.key(), removed, "collection reset");
        Ok(removed)
    }

    fn editable<T>(collection: Collection, loaded: Loaded<T>) -> Result<T, EngineError> {
        if loaded.source == LoadSource::Defaulted(DefaultReason::Malformed) {
            warn!(collection = collection.key(), "stored value is malformed, refusing to overwrite");
            return Err(EngineError::MalformedCollection {
                collection: collection.key(),
            });
        }
        Ok(loaded.into_value())
    }

    fn editable_raw_materials(&self) -> Result<Vec<RawMaterial>, EngineError> {
        Self::editable(Collection::RawMaterials, self.store.load_raw_materials()?)
    }

    fn editable_recipes(&self) -> Result<Vec<Recipe>, EngineError> {
        Self::editable(Collection::Recipes, self.store.load_recipes()?)
    }

    fn editable_production_log(&self) -> Result<ProductionLog, EngineError> {
        Self::editable(Collection::ProductionLog, self.store.load_production_log()?)
    }

    // ========================================================================
    // Raw materials
    // ========================================================================

    pub fn raw_materials(&self) -> Result<Vec<RawMaterial>, EngineError> {
        Ok(self.store.load_raw_materials()?.into_value())
    }

    /// Replaces the material with the same sku in place, or appends it.
    pub fn upsert_raw_material(&mut self, material: RawMaterial) -> Result<(), EngineError> {
        let mut materials = self.editable_raw_materials()?;
        match materials.iter_mut().find(|m| m.sku == material.sku) {
            Some(existing) => *existing = material.clone(),
            None => materials.push(material.clone()),
        }
        self.store.save_raw_materials(&materials)?;
        info!(sku = %material.sku, "raw material saved");
        Ok(())
    }

    /// Returns whether a material with `sku` existed. Recipes that use it
    /// are left alone; their ingredient simply stops contributing cost.
    pub fn delete_raw_material(&mut self, sku: &str) -> Result<bool, EngineError> {
        let mut materials = self.editable_raw_materials()?;
        let before = materials.len();
        materials.retain(|m| m.sku != sku);
        if materials.len() == before {
            return Ok(false);
        }
        self.store.save_raw_materials(&materials)?;
        info!(sku, "raw material deleted");
        Ok(true)
    }

    // ========================================================================
    // Recipes
    // ========================================================================

    pub fn recipes(&self) -> Result<Vec<Recipe>, EngineError> {
        Ok(self.store.load_recipes()?.into_value())
    }

    /// Replaces the recipe with the same name in place, or appends it.
    pub fn upsert_recipe(&mut self, recipe: Recipe) -> Result<(), EngineError> {
        let mut recipes = self.editable_recipes()?;
        let name = recipe.name.clone();
        match recipes.iter_mut().find(|r| r.name == recipe.name) {
            Some(existing) => *existing = recipe,
            None => recipes.push(recipe),
        }
        self.store.save_recipes(&recipes)?;
        info!(recipe = %name, "recipe saved");
        Ok(())
    }

    pub fn delete_recipe(&mut self, name: &str) -> Result<bool, EngineError> {
        let mut recipes = self.editable_recipes()?;
        let before = recipes.len();
        recipes.retain(|r| r.name != name);
        if recipes.len() == before {
            return Ok(false);
        }
        self.store.save_recipes(&recipes)?;
        info!(recipe = name, "recipe deleted");
        Ok(true)
    }

    // ========================================================================
    // Production log
    // ========================================================================

    pub fn production_log(&self) -> Result<ProductionLog, EngineError> {
        Ok(self.store.load_production_log()?.into_value())
    }

    pub fn entries_for(&self, date: NaiveDate) -> Result<Vec<ProductionEntry>, EngineError> {
        let mut log = self.production_log()?;
        Ok(log.remove(&date_key(date)).unwrap_or_default())
    }

    /// Appends `entry` to the day's entries and returns its index.
    pub fn add_entry(&mut self, date: NaiveDate, entry: ProductionEntry) -> Result<usize, EngineError> {
        let key = date_key(date);
        let mut log = self.editable_production_log()?;
        let entries = log.entry(key.clone()).or_default();
        entries.push(entry);
        let index = entries.len() - 1;
        self.store.save_production_log(&log)?;
        info!(date = %key, index, "production entry added");
        Ok(index)
    }

    pub fn update_entry(
        &mut self,
        date: NaiveDate,
        index: usize,
        entry: ProductionEntry,
    ) -> Result<(), EngineError> {
        let key = date_key(date);
        let mut log = self.editable_production_log()?;
        let slot = log
            .get_mut(&key)
            .and_then(|entries| entries.get_mut(index))
            .ok_or_else(|| EngineError::EntryNotFound {
                date: key.clone(),
                index,
            })?;
        *slot = entry;
        self.store.save_production_log(&log)?;
        info!(date = %key, index, "production entry updated");
        Ok(())
    }

    /// Removes and returns the entry. A date left with no entries is dropped
    /// from the log.
    pub fn remove_entry(&mut self, date: NaiveDate, index: usize) -> Result<ProductionEntry, EngineError> {
        let key = date_key(date);
        let mut log = self.editable_production_log()?;
        let not_found = || EngineError::EntryNotFound {
            date: key.clone(),
            index,
        };
        let entries = log.get_mut(&key).ok_or_else(not_found)?;
        if index >= entries.len() {
            return Err(not_found());
        }
        let removed = entries.remove(index);
        if entries.is_empty() {
            log.remove(&key);
        }
        self.store.save_production_log(&log)?;
        info!(date = %key, index, "production entry removed");
        Ok(removed)
    }

    // ========================================================================
    // Analytics
    // ========================================================================

    pub fn cost_entry(&self, entry: &ProductionEntry) -> Result<EntryCost, EngineError> {
        let snap = self.snapshot()?;
        let catalog = Catalog::new(&snap.raw_materials, &snap.recipes);
        Ok(cost::cost_entry(&catalog, entry))
    }

    pub fn day_summary(&self, date: NaiveDate) -> Result<DaySummary, EngineError> {
        let snap = self.snapshot()?;
        let catalog = Catalog::new(&snap.raw_materials, &snap.recipes);
        let entries = snap
            .production_log
            .get(&date_key(date))
            .map(Vec::as_slice)
            .unwrap_or_default();
        Ok(aggregate::summarize_day(&catalog, entries))
    }

    /// Summary over dates starting with `prefix`; empty selects all dates.
    pub fn month_summary(&self, prefix: &str) -> Result<RangeSummary, EngineError> {
        let snap = self.snapshot()?;
        let catalog = Catalog::new(&snap.raw_materials, &snap.recipes);
        Ok(aggregate::summarize_range(&catalog, &snap.production_log, prefix))
    }

    pub fn report_rows(&self, prefix: &str) -> Result<Vec<ReportRow>, EngineError> {
        let snap = self.snapshot()?;
        let catalog = Catalog::new(&snap.raw_materials, &snap.recipes);
        Ok(report::report_rows(&catalog, &snap.production_log, prefix))
    }

    /// Months available for reporting, ascending.
    pub fn report_index(&self) -> Result<Vec<String>, EngineError> {
        Ok(report::report_index(&self.production_log()?))
    }

    pub fn product_breakdown(&self, prefix: &str) -> Result<Vec<ProductCost>, EngineError> {
        let snap = self.snapshot()?;
        let catalog = Catalog::new(&snap.raw_materials, &snap.recipes);
        Ok(report::product_breakdown(&catalog, &snap.production_log, prefix))
    }

    pub fn material_usage(&self, prefix: &str) -> Result<Vec<MaterialUsage>, EngineError> {
        let snap = self.snapshot()?;
        let catalog = Catalog::new(&snap.raw_materials, &snap.recipes);
        Ok(report::material_usage(&catalog, &snap.production_log, prefix))
    }
}
