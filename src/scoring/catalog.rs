use anyhow::{bail, Context, Result};

use super::config::{MetricConfig, ScoringConfig};
use super::curve::Curve;
use super::metric::{MetricCatalog, MetricDefinition};
use crate::portfolio::Project;

/// Turn one metric config entry into a project metric definition.
pub fn build_metric(config: &MetricConfig) -> Result<MetricDefinition<Project>> {
    let curve = match (&config.curve, &config.buckets) {
        (Some(curve), None) => Curve::parse(curve)?,
        (None, Some(buckets)) => {
            Curve::buckets(buckets.iter().map(|b| (b.range.as_str(), b.score)))?
        }
        (Some(_), Some(_)) => bail!("Metric '{}' sets both curve and buckets", config.id),
        (None, None) => bail!("Metric '{}' needs a curve or buckets", config.id),
    };

    let field = config.field;
    let format = config.format;
    let mut metric = MetricDefinition::new(
        config.id.clone(),
        config.category,
        move |project: &Project| Ok(project.field(field)),
        move |value| curve.score(value),
    )
    .with_label(config.display_label())
    .with_formatter(move |value| format.render(value));

    if !config.higher_is_better() {
        metric = metric.lower_is_better();
    }
    Ok(metric)
}

/// Build the project metric catalog in config order.
pub fn build_catalog(config: &ScoringConfig) -> Result<MetricCatalog<Project>> {
    let metrics = config
        .metrics
        .iter()
        .map(|m| build_metric(m).with_context(|| format!("Invalid metric '{}'", m.id)))
        .collect::<Result<Vec<_>>>()?;
    MetricCatalog::new(metrics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portfolio::generate_portfolio;
    use crate::scoring::{aggregate_score, score_metric, ScoreBucket, ValueFormat};

    fn project_with(runway: f64, burn: f64) -> Project {
        let mut project = generate_portfolio(1, 9).projects.remove(0);
        project.runway_months = runway;
        project.burn_rate = burn;
        project
    }

    #[test]
    fn test_default_catalog_builds() {
        let catalog = build_catalog(&ScoringConfig::default()).unwrap();
        assert_eq!(catalog.len(), 8);
        assert!(!catalog.get("burn-rate").unwrap().higher_is_better);
        assert!(!catalog.get("competitors").unwrap().higher_is_better);
        assert_eq!(catalog.get("runway").unwrap().label, "Runway");
    }

    #[test]
    fn test_default_runway_and_burn_scores() {
        let catalog = build_catalog(&ScoringConfig::default()).unwrap();
        let runway = catalog.get("runway").unwrap();
        let burn = catalog.get("burn-rate").unwrap();

        let short = project_with(12.0, 80_000.0);
        let long = project_with(30.0, 600_000.0);

        assert_eq!(score_metric(&short, runway).unwrap().score, 50.0);
        assert_eq!(score_metric(&long, runway).unwrap().score, 100.0);
        assert!((score_metric(&short, burn).unwrap().score - 92.0).abs() < 1e-9);
        assert!((score_metric(&long, burn).unwrap().score - 40.0).abs() < 1e-9);

        assert_eq!(aggregate_score(&short, &[runway, burn]).unwrap(), 71);
    }

    #[test]
    fn test_formatter_follows_config() {
        let catalog = build_catalog(&ScoringConfig::default()).unwrap();
        let burn = catalog.get("burn-rate").unwrap();
        let result = score_metric(&project_with(12.0, 80_000.0), burn).unwrap();
        assert_eq!(result.display_value, "$80k");
    }

    #[test]
    fn test_team_size_buckets() {
        let catalog = build_catalog(&ScoringConfig::default()).unwrap();
        let team = catalog.get("team-size").unwrap();
        let mut project = project_with(12.0, 0.0);

        for (size, expected) in [(3, 40.0), (10, 70.0), (30, 100.0), (80, 80.0), (250, 60.0)] {
            project.team_size = size;
            assert_eq!(score_metric(&project, team).unwrap().score, expected, "team of {}", size);
        }
    }

    #[test]
    fn test_rejects_curve_and_buckets_together() {
        let mut config = ScoringConfig::default().metrics.remove(0);
        config.buckets = Some(vec![ScoreBucket {
            range: "<5".to_string(),
            score: 10.0,
        }]);
        assert!(build_metric(&config).is_err());

        config.curve = None;
        config.buckets = None;
        assert!(build_metric(&config).is_err());
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let mut config = ScoringConfig::default();
        let dup = config.metrics[0].clone();
        config.metrics.push(dup);
        assert!(build_catalog(&config).is_err());
    }

    #[test]
    fn test_plain_format_without_label() {
        let mut config = ScoringConfig::default().metrics.remove(2);
        config.label = None;
        config.format = ValueFormat::Plain;
        let metric = build_metric(&config).unwrap();
        assert_eq!(metric.label, "runway");
        assert_eq!(metric.format(12.0), "12");
    }
}
