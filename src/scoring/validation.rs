use super::config::ScoringConfig;
use super::curve::{Curve, RangeOp};
use std::collections::HashSet;

/// Validate scoring configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_scoring(config: &ScoringConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for (i, metric) in config.metrics.iter().enumerate() {
        let path = format!("scoring.metrics[{}]", i);

        if metric.id.trim().is_empty() {
            errors.push(format!("{}.id: must not be empty", path));
        } else if metric.id == "overall" {
            errors.push(format!("{}.id: 'overall' is reserved for the aggregate score", path));
        } else if !seen.insert(metric.id.as_str()) {
            errors.push(format!("{}.id: duplicate id '{}'", path, metric.id));
        }

        match (&metric.curve, &metric.buckets) {
            (Some(curve), None) => {
                if let Err(e) = Curve::parse(curve) {
                    errors.push(format!("{}.curve: invalid '{}' - {}", path, curve, e));
                }
            }
            (None, Some(buckets)) => {
                if buckets.is_empty() {
                    errors.push(format!("{}.buckets: must not be empty", path));
                }
                for (j, bucket) in buckets.iter().enumerate() {
                    if let Err(e) = RangeOp::parse(&bucket.range) {
                        errors.push(format!(
                            "{}.buckets[{}].range: invalid '{}' - {}",
                            path, j, bucket.range, e
                        ));
                    }
                    if !bucket.score.is_finite() {
                        errors.push(format!("{}.buckets[{}].score: must be a finite number", path, j));
                    }
                }
            }
            (Some(_), Some(_)) => {
                errors.push(format!("{}: set either curve or buckets, not both", path));
            }
            (None, None) => {
                errors.push(format!("{}: needs a curve or buckets", path));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portfolio::ProjectField;
    use crate::scoring::{Category, MetricConfig, ScoreBucket, ValueFormat};

    fn metric(id: &str, curve: Option<&str>, buckets: Option<Vec<ScoreBucket>>) -> MetricConfig {
        MetricConfig {
            id: id.to_string(),
            label: None,
            category: Category::Financial,
            field: ProjectField::RunwayMonths,
            curve: curve.map(str::to_string),
            buckets,
            higher_is_better: None,
            format: ValueFormat::Plain,
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_scoring(&ScoringConfig::default()).is_ok());
    }

    #[test]
    fn test_empty_config() {
        let config = ScoringConfig { metrics: vec![] };
        assert!(validate_scoring(&config).is_ok());
    }

    #[test]
    fn test_invalid_curve() {
        let config = ScoringConfig {
            metrics: vec![metric("runway", Some("steep 0..24"), None)],
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert!(errors[0].contains("scoring.metrics[0].curve"));
    }

    #[test]
    fn test_invalid_bucket_range() {
        let config = ScoringConfig {
            metrics: vec![metric(
                "team",
                None,
                Some(vec![ScoreBucket { range: "lots".to_string(), score: 50.0 }]),
            )],
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert!(errors[0].contains("scoring.metrics[0].buckets[0].range"));
    }

    #[test]
    fn test_reserved_and_duplicate_ids() {
        let config = ScoringConfig {
            metrics: vec![
                metric("overall", Some("linear 0..1"), None),
                metric("runway", Some("linear 0..24"), None),
                metric("runway", Some("linear 0..12"), None),
            ],
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("reserved"));
        assert!(errors[1].contains("scoring.metrics[2].id"));
    }

    #[test]
    fn test_collects_all_errors() {
        let config = ScoringConfig {
            metrics: vec![
                metric("", None, None),
                metric("burn", Some("inverse 0..1"), Some(vec![])),
            ],
        };
        let errors = validate_scoring(&config).unwrap_err();
        // empty id, missing curve, both curve and buckets
        assert_eq!(errors.len(), 3);
    }
}
