use serde::{Deserialize, Serialize};

use super::metric::Category;
use crate::portfolio::ProjectField;

/// Main scoring configuration.
///
/// Lists the metrics a comparison can use, in display order. Every metric
/// reads one numeric project field and maps it to 0-100 with either a curve
/// string or a bucket list.
///
/// Example YAML:
/// ```yaml
/// scoring:
///   metrics:
///     - id: runway
///       category: financial
///       field: runway_months
///       curve: "linear 0..24"
///       format: months
///     - id: team-size
///       category: team
///       field: team_size
///       buckets:
///         - { range: "<5", score: 40 }
///         - { range: "5-15", score: 70 }
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScoringConfig {
    #[serde(default)]
    pub metrics: Vec<MetricConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct MetricConfig {
    /// Stable id used for selection and sorting (e.g. "burn-rate")
    pub id: String,

    /// Column header; defaults to the id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(default)]
    pub category: Category,

    /// Project field the raw value is read from
    pub field: ProjectField,

    /// "linear A..B" or "inverse A..B"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub curve: Option<String>,

    /// Range buckets, first match wins (alternative to `curve`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buckets: Option<Vec<ScoreBucket>>,

    /// Polarity for sorting (default: true)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub higher_is_better: Option<bool>,

    #[serde(default)]
    pub format: ValueFormat,
}

/// Score bucket.
/// Range format: "<N", "<=N", ">N", ">=N", "N-M" (inclusive range), "N"
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScoreBucket {
    pub range: String,
    pub score: f64,
}

/// How a raw value is rendered in tables.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ValueFormat {
    Percent,
    Currency,
    Months,
    Count,
    Score,
    Billions,
    #[default]
    Plain,
}

impl ValueFormat {
    pub fn render(self, value: f64) -> String {
        match self {
            ValueFormat::Percent => format!("{:.0}%", value),
            ValueFormat::Currency => format_currency(value),
            ValueFormat::Months => format!("{:.0} mo", value),
            ValueFormat::Count => format!("{:.0}", value),
            ValueFormat::Score => format!("{:.1}/10", value),
            ValueFormat::Billions => format!("${:.1}B", value),
            ValueFormat::Plain => value.to_string(),
        }
    }
}

/// Compact dollar notation ($850, $80k, $1.2M)
fn format_currency(value: f64) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    let abs = value.abs();
    let formatted = if abs >= 1_000_000.0 {
        format!("{:.1}M", abs / 1_000_000.0)
    } else if abs >= 1_000.0 {
        format!("{:.0}k", abs / 1_000.0)
    } else {
        format!("{:.0}", abs)
    };
    format!("{}${}", sign, formatted.replace(".0M", "M"))
}

impl MetricConfig {
    fn curve(
        id: &str,
        label: &str,
        category: Category,
        field: ProjectField,
        curve: &str,
        format: ValueFormat,
    ) -> Self {
        Self {
            id: id.to_string(),
            label: Some(label.to_string()),
            category,
            field,
            curve: Some(curve.to_string()),
            buckets: None,
            higher_is_better: None,
            format,
        }
    }

    fn lower_is_better(mut self) -> Self {
        self.higher_is_better = Some(false);
        self
    }

    pub fn higher_is_better(&self) -> bool {
        self.higher_is_better.unwrap_or(true)
    }

    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.id)
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        let team_size = MetricConfig {
            id: "team-size".to_string(),
            label: Some("Team Size".to_string()),
            category: Category::Team,
            field: ProjectField::TeamSize,
            curve: None,
            buckets: Some(vec![
                ScoreBucket { range: "<5".to_string(), score: 40.0 },
                ScoreBucket { range: "5-15".to_string(), score: 70.0 },
                ScoreBucket { range: "15-50".to_string(), score: 100.0 },
                ScoreBucket { range: "50-100".to_string(), score: 80.0 },
                ScoreBucket { range: ">100".to_string(), score: 60.0 },
            ]),
            higher_is_better: None,
            format: ValueFormat::Count,
        };

        Self {
            metrics: vec![
                MetricConfig::curve(
                    "revenue-growth",
                    "Revenue Growth",
                    Category::Financial,
                    ProjectField::RevenueGrowth,
                    "linear 0..200",
                    ValueFormat::Percent,
                ),
                MetricConfig::curve(
                    "burn-rate",
                    "Burn Rate",
                    Category::Financial,
                    ProjectField::BurnRate,
                    "inverse 0..1000000",
                    ValueFormat::Currency,
                )
                .lower_is_better(),
                MetricConfig::curve(
                    "runway",
                    "Runway",
                    Category::Financial,
                    ProjectField::RunwayMonths,
                    "linear 0..24",
                    ValueFormat::Months,
                ),
                team_size,
                MetricConfig::curve(
                    "market-size",
                    "Market Size",
                    Category::Market,
                    ProjectField::MarketSize,
                    "linear 0..50",
                    ValueFormat::Billions,
                ),
                MetricConfig::curve(
                    "market-growth",
                    "Market Growth",
                    Category::Market,
                    ProjectField::MarketGrowth,
                    "linear 0..40",
                    ValueFormat::Percent,
                ),
                MetricConfig::curve(
                    "tech-innovation",
                    "Tech Innovation",
                    Category::Product,
                    ProjectField::InnovationScore,
                    "linear 0..10",
                    ValueFormat::Score,
                ),
                MetricConfig::curve(
                    "competitors",
                    "Competitors",
                    Category::Market,
                    ProjectField::CompetitorCount,
                    "inverse 0..20",
                    ValueFormat::Count,
                )
                .lower_is_better(),
            ],
        }
    }
}
