use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::CoreError;
use crate::numeric::{lenient_number, lenient_text};

/// Field lookup over one stored record, however it was written.
///
/// Each field is listed as its canonical key followed by the aliases older
/// rows used. The first of those keys holding a non-null value wins, so a
/// row that carries both spellings still reads. Anything that is not a JSON
/// object reads as a record with every field missing.
struct RecordFields(Map<String, Value>);

impl RecordFields {
    fn read<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::Object(map) => Self(map),
            _ => Self(Map::new()),
        })
    }

    fn pick(&self, keys: &[&str]) -> Option<&Value> {
        keys.iter()
            .filter_map(|k| self.0.get(*k))
            .find(|v| !v.is_null())
    }

    fn number(&self, keys: &[&str]) -> f64 {
        self.pick(keys)
            .and_then(|v| lenient_number(v).ok())
            .unwrap_or(0.0)
    }

    fn text(&self, keys: &[&str]) -> String {
        self.pick(keys)
            .and_then(|v| lenient_text(v).ok())
            .unwrap_or_default()
    }

    /// Array fields read element by element; a lone object is a one-element
    /// list and any other value is empty.
    fn list<T: DeserializeOwned>(&self, keys: &[&str]) -> Vec<T> {
        match self.pick(keys) {
            Some(Value::Array(items)) => items.iter().filter_map(|v| T::deserialize(v).ok()).collect(),
            Some(v) if v.is_object() => T::deserialize(v).ok().into_iter().collect(),
            _ => Vec::new(),
        }
    }
}

/// A purchasable input, identified by `sku`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMaterial {
    pub sku: String,
    pub description: String,
    pub total_cost: f64,
    pub cost_per_kg: f64,
    pub category: String,
}

impl<'de> Deserialize<'de> for RawMaterial {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let f = RecordFields::read(deserializer)?;
        Ok(Self {
            sku: f.text(&["sku"]),
            description: f.text(&["description"]),
            total_cost: f.number(&["totalCost"]),
            cost_per_kg: f.number(&["costPerKg"]),
            category: f.text(&["category"]),
        })
    }
}

impl RawMaterial {
    pub fn new(sku: impl Into<String>, description: impl Into<String>, cost_per_kg: f64) -> Self {
        Self {
            sku: sku.into(),
            description: description.into(),
            total_cost: 0.0,
            cost_per_kg,
            category: String::new(),
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_total_cost(mut self, total_cost: f64) -> Self {
        self.total_cost = total_cost;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    pub sku: String,
    pub qty_per_batch: f64,
}

impl<'de> Deserialize<'de> for Ingredient {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let f = RecordFields::read(deserializer)?;
        Ok(Self {
            sku: f.text(&["sku"]),
            qty_per_batch: f.number(&["qtyPerBatch", "qty", "q"]),
        })
    }
}

impl Ingredient {
    pub fn new(sku: impl Into<String>, qty_per_batch: f64) -> Self {
        Self {
            sku: sku.into(),
            qty_per_batch,
        }
    }
}

/// A bill of materials for one batch of a product, identified by `name`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub name: String,
    pub batch_size: f64,
    pub yield_kg: f64,
    pub ingredients: Vec<Ingredient>,
}

impl<'de> Deserialize<'de> for Recipe {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let f = RecordFields::read(deserializer)?;
        Ok(Self {
            name: f.text(&["name"]),
            batch_size: f.number(&["batchSize"]),
            yield_kg: f.number(&["yieldKg", "yield"]),
            ingredients: f.list(&["ingredients"]),
        })
    }
}

impl Recipe {
    pub fn new(name: impl Into<String>, batch_size: f64, yield_kg: f64) -> Self {
        Self {
            name: name.into(),
            batch_size,
            yield_kg,
            ingredients: Vec::new(),
        }
    }

    pub fn with_ingredient(mut self, sku: impl Into<String>, qty_per_batch: f64) -> Self {
        self.ingredients.push(Ingredient::new(sku, qty_per_batch));
        self
    }
}

/// One product run on a given day. `product` is a recipe name that is
/// allowed to dangle.
///
/// Older rows were written with single-letter keys (`p`, `b`, `o`) or with
/// the labels of the report columns; all of them read into this shape and
/// are written back with the canonical names.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionEntry {
    pub product: String,
    pub batches: f64,
    pub output_kg: f64,
}

impl<'de> Deserialize<'de> for ProductionEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let f = RecordFields::read(deserializer)?;
        Ok(Self {
            product: f.text(&["product", "p", "name"]),
            batches: f.number(&["batches", "b", "orderBatches"]),
            output_kg: f.number(&["outputKg", "o", "output", "actual", "actualKg"]),
        })
    }
}

impl ProductionEntry {
    pub fn new(product: impl Into<String>, batches: f64, output_kg: f64) -> Self {
        Self {
            product: product.into(),
            batches,
            output_kg,
        }
    }
}

/// Production entries keyed by ISO `YYYY-MM-DD` date. Iteration order is
/// ascending, which for ISO dates is chronological.
pub type ProductionLog = BTreeMap<String, Vec<ProductionEntry>>;

/// Reads one day of a stored production log. A day holding a single object
/// is a one-entry day; any other non-array value is an empty day.
pub fn day_entries(value: &Value) -> Vec<ProductionEntry> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(|v| ProductionEntry::deserialize(v).ok())
            .collect(),
        Value::Object(_) => ProductionEntry::deserialize(value).ok().into_iter().collect(),
        _ => Vec::new(),
    }
}

/// Rewrites a `Y-M-D` date key with unpadded month or day (`2024-1-5`) into
/// the zero-padded ISO form. Keys that are not a year, month and day are
/// returned as an error.
pub fn normalize_date_key(key: &str) -> Result<String, CoreError> {
    let invalid = || CoreError::InvalidDate(key.to_string());
    let mut parts = key.trim().split('-');
    let (Some(y), Some(m), Some(d), None) = (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(invalid());
    };
    let digits = |s: &str| !s.is_empty() && s.len() <= 2 && s.bytes().all(|b| b.is_ascii_digit());
    if y.len() != 4 || !y.bytes().all(|b| b.is_ascii_digit()) || !digits(m) || !digits(d) {
        return Err(invalid());
    }
    let month: u32 = m.parse().map_err(|_| invalid())?;
    let day: u32 = d.parse().map_err(|_| invalid())?;
    if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return Err(invalid());
    }
    Ok(format!("{y}-{month:02}-{day:02}"))
}

/// The `YYYY-MM` month a date key belongs to.
pub fn month_of(date_key: &str) -> Option<&str> {
    let month = date_key.get(..7)?;
    let b = month.as_bytes();
    let shaped = b[..4].iter().all(u8::is_ascii_digit)
        && b[4] == b'-'
        && b[5..].iter().all(u8::is_ascii_digit);
    shaped.then_some(month)
}
