//! Sample catalogue used when nothing has been stored yet.

use crate::model::{RawMaterial, Recipe};

pub fn sample_raw_materials() -> Vec<RawMaterial> {
    vec![
        RawMaterial::new("RM-001", "Dried red chili", 420.0)
            .with_category("Spices")
            .with_total_cost(21_000.0),
        RawMaterial::new("RM-002", "Garlic, peeled", 180.0)
            .with_category("Produce")
            .with_total_cost(9_000.0),
        RawMaterial::new("RM-003", "Sunflower oil", 150.0)
            .with_category("Oils")
            .with_total_cost(30_000.0),
        RawMaterial::new("RM-004", "Salt", 20.0)
            .with_category("Spices")
            .with_total_cost(1_000.0),
        RawMaterial::new("RM-005", "Sugar", 90.0)
            .with_category("Dry goods")
            .with_total_cost(4_500.0),
    ]
}

pub fn sample_recipes() -> Vec<Recipe> {
    vec![
        Recipe::new("Chili Paste", 10.0, 9.5)
            .with_ingredient("RM-001", 4.0)
            .with_ingredient("RM-002", 2.0)
            .with_ingredient("RM-003", 3.5)
            .with_ingredient("RM-004", 0.5),
        Recipe::new("Garlic Oil", 8.0, 7.6)
            .with_ingredient("RM-002", 3.0)
            .with_ingredient("RM-003", 5.0),
        Recipe::new("Sweet Chili Sauce", 12.0, 11.0)
            .with_ingredient("RM-001", 2.0)
            .with_ingredient("RM-005", 4.0)
            .with_ingredient("RM-004", 0.3),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    #[test]
    fn sample_recipes_only_reference_sample_materials() {
        let materials = sample_raw_materials();
        let recipes = sample_recipes();
        let catalog = Catalog::new(&materials, &recipes);
        for recipe in &recipes {
            for ingredient in &recipe.ingredients {
                assert!(
                    catalog.material(&ingredient.sku).is_some(),
                    "{} references unknown {}",
                    recipe.name,
                    ingredient.sku
                );
            }
        }
    }
}
