use chrono::NaiveDate;

use kitchen_core::{RawMaterial, Recipe};

pub fn date(iso: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(iso, "%Y-%m-%d")
}

pub fn worked_materials() -> Vec<RawMaterial> {
    vec![RawMaterial::new("A", "Dried chili", 100.0).with_category("Spices")]
}

pub fn worked_recipes() -> Vec<Recipe> {
    vec![Recipe::new("X", 10.0, 2.0).with_ingredient("A", 3.0)]
}
