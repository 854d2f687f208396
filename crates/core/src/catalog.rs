use std::collections::HashMap;

use crate::model::{RawMaterial, Recipe};

/// Borrowed lookup tables over a raw-material and recipe snapshot.
///
/// Duplicate keys resolve to the first record with that key, matching a
/// front-to-back scan of the stored sequence.
#[derive(Debug, Clone)]
pub struct Catalog<'a> {
    materials: HashMap<&'a str, &'a RawMaterial>,
    recipes: HashMap<&'a str, &'a Recipe>,
}

impl<'a> Catalog<'a> {
    pub fn new(materials: &'a [RawMaterial], recipes: &'a [Recipe]) -> Self {
        let mut by_sku = HashMap::with_capacity(materials.len());
        for m in materials {
            by_sku.entry(m.sku.as_str()).or_insert(m);
        }
        let mut by_name = HashMap::with_capacity(recipes.len());
        for r in recipes {
            by_name.entry(r.name.as_str()).or_insert(r);
        }
        Self {
            materials: by_sku,
            recipes: by_name,
        }
    }

    pub fn material(&self, sku: &str) -> Option<&'a RawMaterial> {
        self.materials.get(sku).copied()
    }

    pub fn recipe(&self, name: &str) -> Option<&'a Recipe> {
        self.recipes.get(name).copied()
    }

    /// Cost per kg of `sku`, or zero when the sku does not resolve.
    pub fn cost_per_kg(&self, sku: &str) -> f64 {
        self.material(sku).map_or(0.0, |m| m.cost_per_kg)
    }
}
