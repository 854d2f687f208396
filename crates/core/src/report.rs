//! Row-level reporting over a production log.
//!
//! Every figure here comes from the recipe-driven cost rules in
//! [`crate::cost`]; there is no flat per-kg rate anywhere in reporting.

use serde::Serialize;

use crate::aggregate::dates_in_range;
use crate::catalog::Catalog;
use crate::cost::{EntryCost, cost_entry, cost_per_kg};
use crate::model::{ProductionLog, month_of};

/// One exported line per production entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRow {
    pub date: String,
    pub product: String,
    pub order_batches: f64,
    pub expected_kg: f64,
    pub actual_kg: f64,
    pub raw_used_kg: f64,
    pub raw_cost: f64,
    pub variance_kg: f64,
    pub cost_per_kg: Option<f64>,
}

impl ReportRow {
    /// Column headings in export order.
    pub const COLUMNS: [&'static str; 8] = [
        "Date",
        "Product",
        "Order Batches",
        "Expected Kg",
        "Actual Kg",
        "Raw Used Kg",
        "Raw Cost",
        "Variance Kg",
    ];

    fn from_cost(date: &str, product: &str, batches: f64, cost: EntryCost) -> Self {
        Self {
            date: date.to_string(),
            product: product.to_string(),
            order_batches: batches,
            expected_kg: cost.expected_kg,
            actual_kg: cost.actual_kg,
            raw_used_kg: cost.raw_used_kg,
            raw_cost: cost.raw_cost,
            variance_kg: cost.variance_kg,
            cost_per_kg: cost.cost_per_kg,
        }
    }
}

pub fn report_rows(catalog: &Catalog<'_>, log: &ProductionLog, month_prefix: &str) -> Vec<ReportRow> {
    dates_in_range(log, month_prefix)
        .flat_map(|(date, entries)| {
            entries.iter().map(move |entry| {
                ReportRow::from_cost(date, &entry.product, entry.batches, cost_entry(catalog, entry))
            })
        })
        .collect()
}

/// Distinct `YYYY-MM` months that have at least one entry, ascending.
pub fn report_index(log: &ProductionLog) -> Vec<String> {
    let mut months: Vec<String> = Vec::new();
    for (date, entries) in log {
        if entries.is_empty() {
            continue;
        }
        let Some(month) = month_of(date) else {
            continue;
        };
        if months.last().map(String::as_str) != Some(month) {
            months.push(month.to_string());
        }
    }
    months
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCost {
    pub product: String,
    pub batches: f64,
    pub expected_kg: f64,
    pub actual_kg: f64,
    pub raw_cost: f64,
    pub variance_kg: f64,
    pub cost_per_kg: Option<f64>,
}

/// Per-product totals in the order products first appear.
pub fn product_breakdown(
    catalog: &Catalog<'_>,
    log: &ProductionLog,
    month_prefix: &str,
) -> Vec<ProductCost> {
    let mut out: Vec<ProductCost> = Vec::new();
    for (_, entries) in dates_in_range(log, month_prefix) {
        for entry in entries {
            let cost = cost_entry(catalog, entry);
            let idx = match out.iter().position(|p| p.product == entry.product) {
                Some(idx) => idx,
                None => {
                    out.push(ProductCost {
                        product: entry.product.clone(),
                        batches: 0.0,
                        expected_kg: 0.0,
                        actual_kg: 0.0,
                        raw_cost: 0.0,
                        variance_kg: 0.0,
                        cost_per_kg: None,
                    });
                    out.len() - 1
                }
            };
            let row = &mut out[idx];
            row.batches += entry.batches;
            row.expected_kg += cost.expected_kg;
            row.actual_kg += cost.actual_kg;
            row.raw_cost += cost.raw_cost;
            row.variance_kg += cost.variance_kg;
        }
    }
    for row in &mut out {
        row.cost_per_kg = cost_per_kg(row.raw_cost, row.actual_kg);
    }
    out
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialUsage {
    pub sku: String,
    pub used_kg: f64,
    /// Zero for skus missing from the catalogue.
    pub cost: f64,
}

/// Kilograms and cost of each raw material consumed by resolved recipes,
/// in the order skus are first used.
pub fn material_usage(
    catalog: &Catalog<'_>,
    log: &ProductionLog,
    month_prefix: &str,
) -> Vec<MaterialUsage> {
    let mut out: Vec<MaterialUsage> = Vec::new();
    for (_, entries) in dates_in_range(log, month_prefix) {
        for entry in entries {
            let Some(recipe) = catalog.recipe(&entry.product) else {
                continue;
            };
            for ingredient in &recipe.ingredients {
                let kg = ingredient.qty_per_batch * entry.batches;
                let cost = kg * catalog.cost_per_kg(&ingredient.sku);
                match out.iter_mut().find(|u| u.sku == ingredient.sku) {
                    Some(usage) => {
                        usage.used_kg += kg;
                        usage.cost += cost;
                    }
                    None => out.push(MaterialUsage {
                        sku: ingredient.sku.clone(),
                        used_kg: kg,
                        cost,
                    }),
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ProductionEntry, RawMaterial, Recipe};

    fn parts() -> (Vec<RawMaterial>, Vec<Recipe>, ProductionLog) {
        let materials = vec![
            RawMaterial::new("A", "chili", 100.0),
            RawMaterial::new("B", "oil", 10.0),
        ];
        let recipes = vec![
            Recipe::new("X", 10.0, 2.0).with_ingredient("A", 3.0),
            Recipe::new("Y", 10.0, 1.0)
                .with_ingredient("A", 1.0)
                .with_ingredient("B", 2.0),
        ];
        let mut log = ProductionLog::new();
        log.insert(
            "2024-01-05".into(),
            vec![
                ProductionEntry::new("X", 2.0, 3.5),
                ProductionEntry::new("Ghost", 1.0, 0.0),
            ],
        );
        log.insert("2024-01-20".into(), vec![ProductionEntry::new("Y", 1.0, 1.5)]);
        log.insert("2024-02-10".into(), vec![ProductionEntry::new("X", 1.0, 2.0)]);
        log.insert("2024-03-01".into(), Vec::new());
        (materials, recipes, log)
    }

    #[test]
    fn one_row_per_entry_in_date_order() {
        let (m, r, log) = parts();
        let catalog = Catalog::new(&m, &r);
        let rows = report_rows(&catalog, &log, "2024-01");
        assert_eq!(rows.len(), 3);
        assert_eq!(ReportRow::COLUMNS[7], "Variance Kg");
        assert_eq!(
            rows[0],
            ReportRow {
                date: "2024-01-05".into(),
                product: "X".into(),
                order_batches: 2.0,
                expected_kg: 4.0,
                actual_kg: 3.5,
                raw_used_kg: 6.0,
                raw_cost: 600.0,
                variance_kg: -0.5,
                cost_per_kg: Some(600.0 / 3.5),
            }
        );
        assert_eq!(rows[1].product, "Ghost");
        assert_eq!(rows[1].raw_cost, 0.0);
        assert_eq!(rows[1].cost_per_kg, None);
        assert_eq!(rows[2].date, "2024-01-20");

        assert_eq!(report_rows(&catalog, &log, "").len(), 4);
    }

    #[test]
    fn rows_serialize_with_stored_naming() {
        let (m, r, log) = parts();
        let catalog = Catalog::new(&m, &r);
        let rows = report_rows(&catalog, &log, "2024-02");
        let json = serde_json::to_value(&rows[0]).unwrap();
        assert_eq!(json["orderBatches"], 1.0);
        assert_eq!(json["rawUsedKg"], 3.0);
        assert_eq!(json["varianceKg"], 0.0);
        assert!(json.get("order_batches").is_none());

        let usage = serde_json::to_value(material_usage(&catalog, &log, "2024-02")).unwrap();
        assert_eq!(usage[0]["usedKg"], 3.0);
    }

    #[test]
    fn index_lists_months_with_entries() {
        let (_, _, log) = parts();
        assert_eq!(report_index(&log), vec!["2024-01", "2024-02"]);
        assert!(report_index(&ProductionLog::new()).is_empty());
    }

    #[test]
    fn breakdown_groups_by_product() {
        let (m, r, log) = parts();
        let catalog = Catalog::new(&m, &r);
        let rows = product_breakdown(&catalog, &log, "");
        let names: Vec<&str> = rows.iter().map(|p| p.product.as_str()).collect();
        assert_eq!(names, vec!["X", "Ghost", "Y"]);

        let x = &rows[0];
        assert_eq!(x.batches, 3.0);
        assert_eq!(x.raw_cost, 900.0);
        assert_eq!(x.actual_kg, 5.5);
        assert_eq!(x.expected_kg, 6.0);
        assert_eq!(x.variance_kg, -0.5);
        assert!((x.cost_per_kg.unwrap() - 900.0 / 5.5).abs() < 1e-9);

        assert_eq!(rows[1].cost_per_kg, None);
    }

    #[test]
    fn usage_accumulates_per_sku() {
        let (m, r, log) = parts();
        let catalog = Catalog::new(&m, &r);
        let usage = material_usage(&catalog, &log, "2024-01");
        assert_eq!(
            usage,
            vec![
                MaterialUsage { sku: "A".into(), used_kg: 7.0, cost: 700.0 },
                MaterialUsage { sku: "B".into(), used_kg: 2.0, cost: 20.0 },
            ]
        );
    }
}
