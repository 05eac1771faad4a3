use anyhow::Result;

use super::selection::SelectionState;
use crate::portfolio::Project;
use crate::scoring::{aggregate_score, score_metric, sort_entities, MetricCatalog, MetricScore};

/// Anything that can take part in a comparison needs a stable id.
pub trait Entity {
    fn entity_id(&self) -> &str;
}

impl Entity for Project {
    fn entity_id(&self) -> &str {
        &self.id
    }
}

/// One displayed row: cells follow catalog order of the selected metrics.
#[derive(Debug)]
pub struct MatrixRow<'a, E> {
    pub entity: &'a E,
    pub cells: Vec<MetricScore>,
    pub overall: u32,
}

/// Snapshot of a comparison for rendering.
///
/// Built from scratch on every selection change. Each (entity, metric) pair
/// is scored once per build; renderers read from the snapshot.
#[derive(Debug)]
pub struct ComparisonMatrix<'a, E> {
    pub metric_ids: Vec<String>,
    pub metric_labels: Vec<String>,
    pub rows: Vec<MatrixRow<'a, E>>,
}

impl<'a, E: Entity> ComparisonMatrix<'a, E> {
    pub fn build(
        entities: &'a [E],
        catalog: &MetricCatalog<E>,
        selection: &SelectionState,
    ) -> Result<Self> {
        let metrics = catalog.select(|id| selection.is_metric_selected(id));
        let included = entities
            .iter()
            .filter(|e| selection.is_entity_selected(e.entity_id()));

        let ordered = sort_entities(
            included,
            catalog,
            &metrics,
            selection.sort_key(),
            selection.sort_direction(),
        )?;

        let mut rows = Vec::with_capacity(ordered.len());
        for entity in ordered {
            let cells = metrics
                .iter()
                .map(|m| score_metric(entity, m))
                .collect::<Result<Vec<_>>>()?;
            let overall = aggregate_score(entity, &metrics)?;
            rows.push(MatrixRow {
                entity,
                cells,
                overall,
            });
        }

        Ok(Self {
            metric_ids: metrics.iter().map(|m| m.id.clone()).collect(),
            metric_labels: metrics.iter().map(|m| m.label.clone()).collect(),
            rows,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a metric column, if it is displayed
    pub fn column_of(&self, metric_id: &str) -> Option<usize> {
        self.metric_ids.iter().position(|id| id == metric_id)
    }
}
