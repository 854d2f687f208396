use std::path::{Path, PathBuf};

use kitchen_core::{ProductionEntry, RawMaterial, Recipe};
use kitchen_engine::{Kitchen, KitchenConfig};
use kitchen_storage::StoreOptions;
use tempfile::TempDir;

use crate::fixtures;

/// A kitchen backed either by in-memory SQLite or by a file in a private
/// temporary directory that lives as long as the fixture.
pub struct TestKitchen {
    pub kitchen: Kitchen,
    config: KitchenConfig,
    dir: Option<TempDir>,
}

impl TestKitchen {
    /// In-memory store with no sample catalogue.
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        Ok(Self {
            kitchen: Kitchen::open_in_memory(StoreOptions {
                seed_defaults: false,
            })?,
            config: KitchenConfig::default(),
            dir: None,
        })
    }

    /// File-backed store; `seed_defaults` as given.
    pub fn on_disk(seed_defaults: bool) -> Result<Self, Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let mut config = KitchenConfig::default();
        config.storage.path = dir.path().join("kitchen.db").display().to_string();
        config.storage.seed_defaults = seed_defaults;
        Ok(Self {
            kitchen: Kitchen::open(&config)?,
            config,
            dir: Some(dir),
        })
    }

    /// Drops the open handle and opens the same file again.
    pub fn reopen(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        if self.dir.is_none() {
            return Err("in-memory kitchens cannot be reopened".into());
        }
        self.kitchen = Kitchen::open(&self.config)?;
        Ok(())
    }

    pub fn db_path(&self) -> Option<PathBuf> {
        self.dir.as_ref().map(|_| PathBuf::from(&self.config.storage.path))
    }

    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_ref().map(TempDir::path)
    }

    /// Loads the worked catalogue from [`fixtures`]: material `A` at 100/kg
    /// and recipe `X` yielding 2 kg from 3 kg of `A`.
    pub fn with_worked_catalogue(mut self) -> Result<Self, Box<dyn std::error::Error>> {
        for material in fixtures::worked_materials() {
            self.kitchen.upsert_raw_material(material)?;
        }
        for recipe in fixtures::worked_recipes() {
            self.kitchen.upsert_recipe(recipe)?;
        }
        Ok(self)
    }

    pub fn add_material(&mut self, material: RawMaterial) -> Result<(), Box<dyn std::error::Error>> {
        self.kitchen.upsert_raw_material(material)?;
        Ok(())
    }

    pub fn add_recipe(&mut self, recipe: Recipe) -> Result<(), Box<dyn std::error::Error>> {
        self.kitchen.upsert_recipe(recipe)?;
        Ok(())
    }

    /// Records a run on an ISO date string.
    pub fn produce(
        &mut self,
        iso_date: &str,
        product: &str,
        batches: f64,
        output_kg: f64,
    ) -> Result<usize, Box<dyn std::error::Error>> {
        let index = self
            .kitchen
            .add_entry(fixtures::date(iso_date)?, ProductionEntry::new(product, batches, output_kg))?;
        Ok(index)
    }
}
