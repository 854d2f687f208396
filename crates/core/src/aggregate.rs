use serde::Serialize;

use crate::catalog::Catalog;
use crate::cost::{cost_entry, cost_per_kg};
use crate::model::{ProductionEntry, ProductionLog};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySummary {
    pub batch_count: f64,
    pub total_output_kg: f64,
    pub total_cost: f64,
    pub net_variance: f64,
    pub top_product: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeSummary {
    pub day_count: usize,
    pub total_output_kg: f64,
    pub total_cost: f64,
    /// Zero when nothing was produced in the range.
    pub avg_cost_per_kg: f64,
}

/// Totals for the entries of a single day.
///
/// The top product is the one with the most batches summed across the day.
/// Ties go to whichever product appeared first. Only a day with no entries
/// has no top product.
pub fn summarize_day(catalog: &Catalog<'_>, entries: &[ProductionEntry]) -> DaySummary {
    let mut summary = DaySummary::default();
    // (product, cumulative batches) in first-seen order
    let mut per_product: Vec<(&str, f64)> = Vec::new();

    for entry in entries {
        let cost = cost_entry(catalog, entry);
        summary.batch_count += entry.batches;
        summary.total_output_kg += entry.output_kg;
        summary.total_cost += cost.raw_cost;
        summary.net_variance += cost.variance_kg;

        match per_product.iter_mut().find(|(p, _)| *p == entry.product.as_str()) {
            Some((_, batches)) => *batches += entry.batches,
            None => per_product.push((entry.product.as_str(), entry.batches)),
        }
    }

    let mut best = 0.0;
    for (product, batches) in per_product {
        if summary.top_product.is_none() || batches > best {
            best = batches;
            summary.top_product = Some(product.to_string());
        }
    }
    summary
}

/// Date keys of `log` that start with `month_prefix`, in ascending order.
/// An empty prefix selects every date.
pub fn dates_in_range<'l>(
    log: &'l ProductionLog,
    month_prefix: &'l str,
) -> impl Iterator<Item = (&'l String, &'l Vec<ProductionEntry>)> + 'l {
    log.iter().filter(move |(date, _)| date.starts_with(month_prefix))
}

pub fn summarize_range(
    catalog: &Catalog<'_>,
    log: &ProductionLog,
    month_prefix: &str,
) -> RangeSummary {
    let mut summary = RangeSummary::default();
    for (_, entries) in dates_in_range(log, month_prefix) {
        if entries.is_empty() {
            continue;
        }
        summary.day_count += 1;
        for entry in entries {
            summary.total_output_kg += entry.output_kg;
            summary.total_cost += cost_entry(catalog, entry).raw_cost;
        }
    }
    summary.avg_cost_per_kg =
        cost_per_kg(summary.total_cost, summary.total_output_kg).unwrap_or(0.0);
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{RawMaterial, Recipe};

    fn catalog_parts() -> (Vec<RawMaterial>, Vec<Recipe>) {
        (
            vec![RawMaterial::new("A", "chili", 100.0)],
            vec![
                Recipe::new("X", 10.0, 2.0).with_ingredient("A", 3.0),
                Recipe::new("Y", 10.0, 1.0).with_ingredient("A", 1.0),
            ],
        )
    }

    #[test]
    fn empty_day_is_all_zero() {
        let (m, r) = catalog_parts();
        let catalog = Catalog::new(&m, &r);
        let summary = summarize_day(&catalog, &[]);
        assert_eq!(summary, DaySummary::default());
        assert!(summary.top_product.is_none());
    }

    #[test]
    fn day_totals_and_top_product() {
        let (m, r) = catalog_parts();
        let catalog = Catalog::new(&m, &r);
        let entries = vec![
            ProductionEntry::new("X", 2.0, 3.5),
            ProductionEntry::new("Y", 3.0, 3.0),
            ProductionEntry::new("X", 2.0, 4.0),
            ProductionEntry::new("Ghost", 1.0, 1.0),
        ];
        let summary = summarize_day(&catalog, &entries);
        assert_eq!(summary.batch_count, 8.0);
        assert_eq!(summary.total_output_kg, 11.5);
        // X: 600 + 600, Y: 300, Ghost: 0
        assert_eq!(summary.total_cost, 1500.0);
        // X: -0.5 + 0.0, Y: 0.0, Ghost: +1.0
        assert_eq!(summary.net_variance, 0.5);
        assert_eq!(summary.top_product.as_deref(), Some("X"));
    }

    #[test]
    fn top_product_tie_goes_to_first_seen() {
        let (m, r) = catalog_parts();
        let catalog = Catalog::new(&m, &r);
        let entries = vec![
            ProductionEntry::new("Y", 1.0, 1.0),
            ProductionEntry::new("X", 2.0, 4.0),
            ProductionEntry::new("Y", 1.0, 1.0),
        ];
        let summary = summarize_day(&catalog, &entries);
        assert_eq!(summary.top_product.as_deref(), Some("Y"));
    }

    #[test]
    fn zero_batch_day_tops_first_product() {
        let (m, r) = catalog_parts();
        let catalog = Catalog::new(&m, &r);
        let entries = vec![
            ProductionEntry::new("Y", 0.0, 1.0),
            ProductionEntry::new("X", 0.0, 1.0),
        ];
        let summary = summarize_day(&catalog, &entries);
        assert_eq!(summary.top_product.as_deref(), Some("Y"));
        assert_eq!(summary.total_output_kg, 2.0);
    }

    #[test]
    fn summaries_serialize_camel_case() {
        let json = serde_json::to_value(DaySummary::default()).unwrap();
        assert!(json.get("batchCount").is_some());
        assert!(json.get("netVariance").is_some());
        assert!(json.get("topProduct").is_some());

        let json = serde_json::to_value(RangeSummary::default()).unwrap();
        assert!(json.get("dayCount").is_some());
        assert!(json.get("avgCostPerKg").is_some());
        assert!(json.get("avg_cost_per_kg").is_none());
    }

    #[test]
    fn range_filters_by_month_prefix() {
        let (m, r) = catalog_parts();
        let catalog = Catalog::new(&m, &r);
        let mut log = ProductionLog::new();
        log.insert("2024-01-05".into(), vec![ProductionEntry::new("X", 2.0, 3.5)]);
        log.insert("2024-02-10".into(), vec![ProductionEntry::new("Y", 1.0, 1.0)]);

        let jan = summarize_range(&catalog, &log, "2024-01");
        assert_eq!(jan.day_count, 1);
        assert_eq!(jan.total_output_kg, 3.5);
        assert_eq!(jan.total_cost, 600.0);
        assert!((jan.avg_cost_per_kg - 600.0 / 3.5).abs() < 1e-9);

        let all = summarize_range(&catalog, &log, "");
        assert_eq!(all.day_count, 2);
        assert_eq!(all.total_cost, 700.0);
    }

    #[test]
    fn range_skips_empty_days_and_defaults_average() {
        let (m, r) = catalog_parts();
        let catalog = Catalog::new(&m, &r);
        let mut log = ProductionLog::new();
        log.insert("2024-03-01".into(), Vec::new());
        log.insert("2024-03-02".into(), vec![ProductionEntry::new("X", 1.0, 0.0)]);

        let summary = summarize_range(&catalog, &log, "2024-03");
        assert_eq!(summary.day_count, 1);
        assert_eq!(summary.total_cost, 300.0);
        assert_eq!(summary.avg_cost_per_kg, 0.0);
    }
}
