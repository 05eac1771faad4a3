use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Presentation grouping for metrics. Has no effect on scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Financial,
    Team,
    Market,
    Product,
    #[default]
    Other,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Financial => "financial",
            Category::Team => "team",
            Category::Market => "market",
            Category::Product => "product",
            Category::Other => "other",
        };
        f.write_str(name)
    }
}

pub type Accessor<E> = Box<dyn Fn(&E) -> Result<f64> + Send + Sync>;
pub type Formatter = Box<dyn Fn(f64) -> String + Send + Sync>;
pub type Scorer = Box<dyn Fn(f64) -> f64 + Send + Sync>;

/// One comparison dimension: how to read a raw value from an entity, how to
/// display it, and how to map it onto the common 0-100 scale.
pub struct MetricDefinition<E> {
    pub id: String,
    pub label: String,
    pub category: Category,
    pub higher_is_better: bool,
    accessor: Accessor<E>,
    formatter: Option<Formatter>,
    scorer: Scorer,
}

impl<E> MetricDefinition<E> {
    pub fn new<A, S>(id: impl Into<String>, category: Category, accessor: A, scorer: S) -> Self
    where
        A: Fn(&E) -> Result<f64> + Send + Sync + 'static,
        S: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        let id = id.into();
        Self {
            label: id.clone(),
            id,
            category,
            higher_is_better: true,
            accessor: Box::new(accessor),
            formatter: None,
            scorer: Box::new(scorer),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_formatter<F>(mut self, formatter: F) -> Self
    where
        F: Fn(f64) -> String + Send + Sync + 'static,
    {
        self.formatter = Some(Box::new(formatter));
        self
    }

    pub fn lower_is_better(mut self) -> Self {
        self.higher_is_better = false;
        self
    }

    pub fn raw_value(&self, entity: &E) -> Result<f64> {
        (self.accessor)(entity)
    }

    pub fn format(&self, value: f64) -> String {
        match &self.formatter {
            Some(formatter) => formatter(value),
            None => value.to_string(),
        }
    }

    pub fn raw_score(&self, value: f64) -> f64 {
        (self.scorer)(value)
    }
}

impl<E> fmt::Debug for MetricDefinition<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetricDefinition")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("category", &self.category)
            .field("higher_is_better", &self.higher_is_better)
            .finish_non_exhaustive()
    }
}

/// Ordered set of metric definitions with unique ids.
///
/// Catalog order is the display order of metric columns.
pub struct MetricCatalog<E> {
    metrics: Vec<MetricDefinition<E>>,
}

impl<E> MetricCatalog<E> {
    pub fn new(metrics: Vec<MetricDefinition<E>>) -> Result<Self> {
        for (i, metric) in metrics.iter().enumerate() {
            if metrics[..i].iter().any(|m| m.id == metric.id) {
                bail!("Duplicate metric id '{}'", metric.id);
            }
        }
        Ok(Self { metrics })
    }

    pub fn get(&self, id: &str) -> Option<&MetricDefinition<E>> {
        self.metrics.iter().find(|m| m.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MetricDefinition<E>> {
        self.metrics.iter()
    }

    pub fn ids(&self) -> Vec<String> {
        self.metrics.iter().map(|m| m.id.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }

    /// Metrics whose id passes `keep`, in catalog order.
    pub fn select<F>(&self, keep: F) -> Vec<&MetricDefinition<E>>
    where
        F: Fn(&str) -> bool,
    {
        self.metrics.iter().filter(|m| keep(&m.id)).collect()
    }
}

impl<E> fmt::Debug for MetricCatalog<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.metrics.iter()).finish()
    }
}
