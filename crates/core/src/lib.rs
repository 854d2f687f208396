pub mod aggregate;
pub mod catalog;
pub mod cost;
pub mod error;
pub mod model;
pub mod numeric;
pub mod report;
pub mod seed;

pub use aggregate::{DaySummary, RangeSummary, summarize_day, summarize_range};
pub use catalog::Catalog;
pub use cost::{EntryCost, VarianceClass, cost_entry};
pub use error::CoreError;
pub use model::{Ingredient, ProductionEntry, ProductionLog, RawMaterial, Recipe};
pub use numeric::coerce_number;
pub use report::{MaterialUsage, ProductCost, ReportRow};
