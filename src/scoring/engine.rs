use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

use super::metric::{MetricCatalog, MetricDefinition};

pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 100.0;

/// One entity measured on one metric.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricScore {
    pub metric_id: String,
    pub raw_value: f64,
    pub display_value: String,
    pub score: f64,
}

/// Qualitative bucket for a normalized score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Indicator {
    Excellent,
    Good,
    Warning,
    Poor,
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Indicator::Excellent => "excellent",
            Indicator::Good => "good",
            Indicator::Warning => "warning",
            Indicator::Poor => "poor",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SortKey {
    Overall,
    Metric(String),
}

impl SortKey {
    /// Parse a CLI/config sort key; `overall` is reserved.
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "overall" => SortKey::Overall,
            other => SortKey::Metric(other.to_string()),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortKey::Overall => f.write_str("overall"),
            SortKey::Metric(id) => f.write_str(id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

impl SortDirection {
    pub fn flip(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    fn sign(self) -> i8 {
        match self {
            SortDirection::Ascending => 1,
            SortDirection::Descending => -1,
        }
    }
}

/// Measure `entity` on `metric`.
///
/// The score is clamped to 0-100 whatever the scorer returns. Accessor errors
/// propagate; a NaN raw value or NaN score is reported as an error because
/// it cannot be ordered or averaged.
pub fn score_metric<E>(entity: &E, metric: &MetricDefinition<E>) -> Result<MetricScore> {
    let raw_value = metric
        .raw_value(entity)
        .with_context(|| format!("Failed to read metric '{}'", metric.id))?;
    if raw_value.is_nan() {
        bail!("Metric '{}' produced a non-numeric value", metric.id);
    }

    let score = metric.raw_score(raw_value);
    if score.is_nan() {
        bail!("Metric '{}' scored {} as NaN", metric.id, raw_value);
    }

    Ok(MetricScore {
        metric_id: metric.id.clone(),
        raw_value,
        display_value: metric.format(raw_value),
        score: score.clamp(MIN_SCORE, MAX_SCORE),
    })
}

/// Unweighted mean of the metric scores, rounded to the nearest integer.
/// An empty metric set scores 0.
pub fn aggregate_score<E>(entity: &E, metrics: &[&MetricDefinition<E>]) -> Result<u32> {
    if metrics.is_empty() {
        return Ok(0);
    }

    let mut total = 0.0;
    for metric in metrics {
        total += score_metric(entity, metric)?.score;
    }
    Ok(mean_to_score(total, metrics.len()))
}

pub(crate) fn mean_to_score(total: f64, count: usize) -> u32 {
    if count == 0 {
        return 0;
    }
    (total / count as f64).round().clamp(MIN_SCORE, MAX_SCORE) as u32
}

/// Map a normalized score to its display bucket.
pub fn cell_indicator(score: f64) -> Indicator {
    if score >= 75.0 {
        Indicator::Excellent
    } else if score >= 50.0 {
        Indicator::Good
    } else if score >= 30.0 {
        Indicator::Warning
    } else {
        Indicator::Poor
    }
}

/// Compare two sort keys honoring direction and polarity.
///
/// Descending means "best first": for a lower-is-better metric the smaller
/// raw value comes first.
pub fn compare_values(a: f64, b: f64, direction: SortDirection, higher_is_better: bool) -> Ordering {
    let mut sign = direction.sign();
    if !higher_is_better {
        sign = -sign;
    }
    let ordering = a.partial_cmp(&b).unwrap_or(Ordering::Equal);
    if sign < 0 {
        ordering.reverse()
    } else {
        ordering
    }
}

/// Order `entities` by a metric's raw value or by the overall score.
///
/// The sort is stable, so entities with equal keys keep their input order in
/// both directions. With no sort key the input order is returned. Overall
/// scores are aggregated over `selected`; a metric key is looked up in the
/// full catalog and compared on raw values.
pub fn sort_entities<'a, E, I>(
    entities: I,
    catalog: &MetricCatalog<E>,
    selected: &[&MetricDefinition<E>],
    sort_key: Option<&SortKey>,
    direction: SortDirection,
) -> Result<Vec<&'a E>>
where
    E: 'a,
    I: IntoIterator<Item = &'a E>,
{
    let Some(key) = sort_key else {
        return Ok(entities.into_iter().collect());
    };

    let (mut keyed, higher_is_better) = match key {
        SortKey::Overall => {
            let mut keyed = Vec::new();
            for entity in entities {
                keyed.push((entity, aggregate_score(entity, selected)? as f64));
            }
            (keyed, true)
        }
        SortKey::Metric(id) => {
            let Some(metric) = catalog.get(id) else {
                bail!("Unknown sort metric '{}'", id);
            };
            let mut keyed = Vec::new();
            for entity in entities {
                keyed.push((entity, score_metric(entity, metric)?.raw_value));
            }
            (keyed, metric.higher_is_better)
        }
    };

    // slice::sort_by is stable
    keyed.sort_by(|a, b| compare_values(a.1, b.1, direction, higher_is_better));
    Ok(keyed.into_iter().map(|(entity, _)| entity).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::Category;

    #[derive(Debug, PartialEq)]
    struct Deal {
        name: &'static str,
        runway: f64,
        burn: f64,
    }

    fn deal(name: &'static str, runway: f64, burn: f64) -> Deal {
        Deal { name, runway, burn }
    }

    fn runway() -> MetricDefinition<Deal> {
        MetricDefinition::new(
            "runway",
            Category::Financial,
            |d: &Deal| Ok(d.runway),
            |v| (v / 24.0 * 100.0).min(100.0),
        )
        .with_formatter(|v| format!("{} mo", v))
    }

    fn burn() -> MetricDefinition<Deal> {
        MetricDefinition::new(
            "burn-rate",
            Category::Financial,
            |d: &Deal| Ok(d.burn),
            |v| (100.0 - v / 10_000.0).max(0.0),
        )
        .lower_is_better()
    }

    fn catalog() -> MetricCatalog<Deal> {
        MetricCatalog::new(vec![runway(), burn()]).unwrap()
    }

    fn names(sorted: &[&Deal]) -> Vec<&'static str> {
        sorted.iter().map(|d| d.name).collect()
    }

    #[test]
    fn test_runway_scores() {
        let m = runway();
        assert_eq!(score_metric(&deal("a", 12.0, 0.0), &m).unwrap().score, 50.0);
        assert_eq!(score_metric(&deal("b", 30.0, 0.0), &m).unwrap().score, 100.0);
        assert_eq!(
            score_metric(&deal("a", 12.0, 0.0), &m).unwrap().display_value,
            "12 mo"
        );
    }

    #[test]
    fn test_burn_scores() {
        let m = burn();
        assert_eq!(score_metric(&deal("a", 0.0, 80_000.0), &m).unwrap().score, 92.0);
        assert_eq!(score_metric(&deal("b", 0.0, 600_000.0), &m).unwrap().score, 40.0);
    }

    #[test]
    fn test_default_display_without_formatter() {
        let result = score_metric(&deal("a", 0.0, 80_000.0), &burn()).unwrap();
        assert_eq!(result.display_value, "80000");
    }

    #[test]
    fn test_out_of_range_scorer_is_clamped() {
        let wild: MetricDefinition<Deal> =
            MetricDefinition::new("wild", Category::Other, |d: &Deal| Ok(d.runway), |v| v * 1000.0 - 500.0);
        assert_eq!(score_metric(&deal("a", 10.0, 0.0), &wild).unwrap().score, 100.0);
        assert_eq!(score_metric(&deal("a", 0.0, 0.0), &wild).unwrap().score, 0.0);

        let infinite: MetricDefinition<Deal> =
            MetricDefinition::new("inf", Category::Other, |_: &Deal| Ok(1.0), |_| f64::INFINITY);
        assert_eq!(score_metric(&deal("a", 0.0, 0.0), &infinite).unwrap().score, 100.0);
    }

    #[test]
    fn test_accessor_error_propagates() {
        let broken: MetricDefinition<Deal> = MetricDefinition::new(
            "broken",
            Category::Other,
            |_: &Deal| Err(anyhow::anyhow!("field missing")),
            |v| v,
        );
        let err = score_metric(&deal("a", 0.0, 0.0), &broken).unwrap_err();
        assert!(err.to_string().contains("broken"));
        assert!(format!("{:#}", err).contains("field missing"));
    }

    #[test]
    fn test_nan_values_are_errors() {
        let nan_raw: MetricDefinition<Deal> =
            MetricDefinition::new("nan-raw", Category::Other, |_: &Deal| Ok(f64::NAN), |v| v);
        assert!(score_metric(&deal("a", 0.0, 0.0), &nan_raw).is_err());

        let nan_score: MetricDefinition<Deal> =
            MetricDefinition::new("nan-score", Category::Other, |_: &Deal| Ok(1.0), |_| f64::NAN);
        assert!(score_metric(&deal("a", 0.0, 0.0), &nan_score).is_err());
    }

    #[test]
    fn test_score_metric_is_idempotent() {
        let m = runway();
        let d = deal("a", 17.0, 0.0);
        assert_eq!(score_metric(&d, &m).unwrap(), score_metric(&d, &m).unwrap());
    }

    #[test]
    fn test_aggregate_of_runway_and_burn() {
        let catalog = catalog();
        let metrics = catalog.select(|_| true);
        assert_eq!(aggregate_score(&deal("a", 12.0, 80_000.0), &metrics).unwrap(), 71);
    }

    #[test]
    fn test_aggregate_empty_is_zero() {
        assert_eq!(aggregate_score(&deal("a", 12.0, 80_000.0), &[]).unwrap(), 0);
    }

    #[test]
    fn test_aggregate_rounds_half_up() {
        assert_eq!(mean_to_score(101.0, 2), 51);
        assert_eq!(mean_to_score(100.8, 2), 50);
    }

    #[test]
    fn test_cell_indicator_buckets() {
        assert_eq!(cell_indicator(100.0), Indicator::Excellent);
        assert_eq!(cell_indicator(75.0), Indicator::Excellent);
        assert_eq!(cell_indicator(74.9), Indicator::Good);
        assert_eq!(cell_indicator(50.0), Indicator::Good);
        assert_eq!(cell_indicator(49.9), Indicator::Warning);
        assert_eq!(cell_indicator(30.0), Indicator::Warning);
        assert_eq!(cell_indicator(29.9), Indicator::Poor);
        assert_eq!(cell_indicator(0.0), Indicator::Poor);
    }

    #[test]
    fn test_sort_descending_by_runway() {
        let catalog = catalog();
        let deals = vec![deal("short", 12.0, 0.0), deal("long", 30.0, 0.0)];
        let key = SortKey::Metric("runway".to_string());
        let sorted = sort_entities(&deals, &catalog, &[], Some(&key), SortDirection::Descending).unwrap();
        assert_eq!(names(&sorted), vec!["long", "short"]);
    }

    #[test]
    fn test_sort_lower_burn_first_when_descending() {
        let catalog = catalog();
        let deals = vec![deal("hot", 0.0, 500_000.0), deal("lean", 0.0, 100_000.0)];
        let key = SortKey::Metric("burn-rate".to_string());

        let desc = sort_entities(&deals, &catalog, &[], Some(&key), SortDirection::Descending).unwrap();
        assert_eq!(names(&desc), vec!["lean", "hot"]);

        let asc = sort_entities(&deals, &catalog, &[], Some(&key), SortDirection::Ascending).unwrap();
        assert_eq!(names(&asc), vec!["hot", "lean"]);
    }

    #[test]
    fn test_sort_is_stable_for_ties() {
        let catalog = catalog();
        let deals = vec![deal("A", 10.0, 0.0), deal("B", 20.0, 0.0), deal("C", 10.0, 0.0)];
        let key = SortKey::Metric("runway".to_string());

        let desc = sort_entities(&deals, &catalog, &[], Some(&key), SortDirection::Descending).unwrap();
        assert_eq!(names(&desc), vec!["B", "A", "C"]);

        let asc = sort_entities(&deals, &catalog, &[], Some(&key), SortDirection::Ascending).unwrap();
        assert_eq!(names(&asc), vec!["A", "C", "B"]);
    }

    #[test]
    fn test_sort_by_overall() {
        let catalog = catalog();
        let selected = catalog.select(|_| true);
        let deals = vec![
            deal("weak", 2.0, 900_000.0),
            deal("strong", 24.0, 50_000.0),
            deal("middle", 12.0, 300_000.0),
        ];
        let sorted =
            sort_entities(&deals, &catalog, &selected, Some(&SortKey::Overall), SortDirection::Descending)
                .unwrap();
        assert_eq!(names(&sorted), vec!["strong", "middle", "weak"]);
    }

    #[test]
    fn test_sort_without_key_keeps_input_order() {
        let catalog = catalog();
        let deals = vec![deal("z", 1.0, 0.0), deal("a", 99.0, 0.0)];
        let sorted = sort_entities(&deals, &catalog, &[], None, SortDirection::Descending).unwrap();
        assert_eq!(names(&sorted), vec!["z", "a"]);
    }

    #[test]
    fn test_sort_empty_entities() {
        let catalog = catalog();
        let deals: Vec<Deal> = Vec::new();
        let sorted =
            sort_entities(&deals, &catalog, &[], Some(&SortKey::Overall), SortDirection::Ascending).unwrap();
        assert!(sorted.is_empty());
    }

    #[test]
    fn test_sort_unknown_metric_fails() {
        let catalog = catalog();
        let deals = vec![deal("a", 1.0, 0.0)];
        let key = SortKey::Metric("arr".to_string());
        assert!(sort_entities(&deals, &catalog, &[], Some(&key), SortDirection::Descending).is_err());
    }

    #[test]
    fn test_sort_key_parse() {
        assert_eq!(SortKey::parse("overall"), SortKey::Overall);
        assert_eq!(SortKey::parse(" runway "), SortKey::Metric("runway".to_string()));
        assert_eq!(SortKey::Metric("runway".to_string()).to_string(), "runway");
    }
}
