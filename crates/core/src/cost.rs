//! Per-entry cost and yield rules.
//!
//! Unresolved references contribute zero: an ingredient whose sku is not in
//! the catalogue adds no cost, and an entry whose product is not a known
//! recipe has no cost and no expected output.

use serde::Serialize;

use crate::catalog::Catalog;
use crate::model::{ProductionEntry, Recipe};

/// Raw-material cost of a single batch of `recipe`.
pub fn per_batch_cost(catalog: &Catalog<'_>, recipe: &Recipe) -> f64 {
    recipe
        .ingredients
        .iter()
        .map(|i| i.qty_per_batch * catalog.cost_per_kg(&i.sku))
        .sum()
}

/// Raw-material cost of `batches` batches of `recipe`.
///
/// Computed as `batches * per_batch_cost` so that the cost is exactly linear
/// in the batch count.
pub fn raw_cost(catalog: &Catalog<'_>, recipe: &Recipe, batches: f64) -> f64 {
    batches * per_batch_cost(catalog, recipe)
}

/// Kilograms of raw material consumed, counting unresolved skus too.
pub fn raw_used_kg(recipe: &Recipe, batches: f64) -> f64 {
    batches * recipe.ingredients.iter().map(|i| i.qty_per_batch).sum::<f64>()
}

pub fn expected_output(recipe: Option<&Recipe>, batches: f64) -> f64 {
    recipe.map_or(0.0, |r| batches * r.yield_kg)
}

/// Actual minus expected. Positive is surplus, negative is shortfall.
pub fn variance(actual_output_kg: f64, expected_output_kg: f64) -> f64 {
    actual_output_kg - expected_output_kg
}

/// `None` unless there was some output to spread the cost over.
pub fn cost_per_kg(raw_cost: f64, actual_output_kg: f64) -> Option<f64> {
    (actual_output_kg > 0.0).then(|| raw_cost / actual_output_kg)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VarianceClass {
    Surplus,
    OnTarget,
    Shortfall,
}

impl VarianceClass {
    pub fn of(variance: f64) -> Self {
        if variance > 0.0 {
            Self::Surplus
        } else if variance < 0.0 {
            Self::Shortfall
        } else {
            Self::OnTarget
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Surplus => "surplus",
            Self::OnTarget => "on_target",
            Self::Shortfall => "shortfall",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryCost {
    pub raw_cost: f64,
    pub raw_used_kg: f64,
    pub expected_kg: f64,
    pub actual_kg: f64,
    pub variance_kg: f64,
    pub cost_per_kg: Option<f64>,
}

impl EntryCost {
    pub fn variance_class(&self) -> VarianceClass {
        VarianceClass::of(self.variance_kg)
    }
}

pub fn cost_entry(catalog: &Catalog<'_>, entry: &ProductionEntry) -> EntryCost {
    let recipe = catalog.recipe(&entry.product);
    let raw_cost = recipe.map_or(0.0, |r| raw_cost(catalog, r, entry.batches));
    let raw_used_kg = recipe.map_or(0.0, |r| raw_used_kg(r, entry.batches));
    let expected_kg = expected_output(recipe, entry.batches);
    EntryCost {
        raw_cost,
        raw_used_kg,
        expected_kg,
        actual_kg: entry.output_kg,
        variance_kg: variance(entry.output_kg, expected_kg),
        cost_per_kg: cost_per_kg(raw_cost, entry.output_kg),
    }
}
