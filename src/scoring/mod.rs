pub mod catalog;
pub mod config;
pub mod curve;
pub mod engine;
pub mod metric;
pub mod validation;

pub use catalog::{build_catalog, build_metric};
pub use config::*;
pub use curve::{Curve, RangeOp};
pub use engine::{
    aggregate_score, cell_indicator, compare_values, score_metric, sort_entities, Indicator,
    MetricScore, SortDirection, SortKey,
};
pub use metric::{Category, MetricCatalog, MetricDefinition};
pub use validation::validate_scoring;
