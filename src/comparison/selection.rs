use std::collections::BTreeSet;

use crate::scoring::{SortDirection, SortKey};

/// What a comparison session currently shows.
///
/// Owned by the host (CLI run or TUI app) and changed only through the
/// methods below; scoring functions read it as a snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionState {
    selected_entity_ids: BTreeSet<String>,
    selected_metric_ids: BTreeSet<String>,
    sort_key: Option<SortKey>,
    sort_direction: SortDirection,
}

impl SelectionState {
    /// Empty selection, no sort
    pub fn new() -> Self {
        Self::default()
    }

    /// Initial selection for a new comparison: the first `entity_count`
    /// entities and the first `metric_count` metrics.
    pub fn with_defaults(
        entity_ids: &[String],
        metric_ids: &[String],
        entity_count: usize,
        metric_count: usize,
    ) -> Self {
        Self {
            selected_entity_ids: entity_ids.iter().take(entity_count).cloned().collect(),
            selected_metric_ids: metric_ids.iter().take(metric_count).cloned().collect(),
            sort_key: None,
            sort_direction: SortDirection::Descending,
        }
    }

    pub fn is_entity_selected(&self, id: &str) -> bool {
        self.selected_entity_ids.contains(id)
    }

    pub fn is_metric_selected(&self, id: &str) -> bool {
        self.selected_metric_ids.contains(id)
    }

    pub fn selected_entity_ids(&self) -> &BTreeSet<String> {
        &self.selected_entity_ids
    }

    pub fn selected_metric_ids(&self) -> &BTreeSet<String> {
        &self.selected_metric_ids
    }

    pub fn sort_key(&self) -> Option<&SortKey> {
        self.sort_key.as_ref()
    }

    pub fn sort_direction(&self) -> SortDirection {
        self.sort_direction
    }

    /// Add or remove an entity. Returns whether it is selected afterwards.
    pub fn toggle_entity(&mut self, id: &str) -> bool {
        if self.selected_entity_ids.remove(id) {
            false
        } else {
            self.selected_entity_ids.insert(id.to_string());
            true
        }
    }

    /// Add or remove a metric. Returns whether it is selected afterwards.
    ///
    /// Deselecting the metric the view is sorted by clears the sort.
    pub fn toggle_metric(&mut self, id: &str) -> bool {
        if self.selected_metric_ids.remove(id) {
            if matches!(&self.sort_key, Some(SortKey::Metric(key)) if key == id) {
                self.sort_key = None;
                self.sort_direction = SortDirection::Descending;
            }
            false
        } else {
            self.selected_metric_ids.insert(id.to_string());
            true
        }
    }

    /// Replace the entity selection
    pub fn select_entities<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected_entity_ids = ids.into_iter().map(Into::into).collect();
    }

    /// Replace the metric selection, dropping a sort on a removed metric
    pub fn select_metrics<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected_metric_ids = ids.into_iter().map(Into::into).collect();
        if let Some(SortKey::Metric(key)) = &self.sort_key {
            if !self.selected_metric_ids.contains(key) {
                self.clear_sort();
            }
        }
    }

    /// Column-header click: the active key flips direction, a new key starts
    /// descending. A metric that is not selected cannot become the sort key;
    /// returns false and leaves the state unchanged in that case.
    pub fn click_sort(&mut self, key: SortKey) -> bool {
        if let SortKey::Metric(id) = &key {
            if !self.selected_metric_ids.contains(id) {
                return false;
            }
        }

        if self.sort_key.as_ref() == Some(&key) {
            self.sort_direction = self.sort_direction.flip();
        } else {
            self.sort_key = Some(key);
            self.sort_direction = SortDirection::Descending;
        }
        true
    }

    /// Set key and direction directly (CLI flags). Same selection rule as
    /// `click_sort`.
    pub fn set_sort(&mut self, key: SortKey, direction: SortDirection) -> bool {
        if let SortKey::Metric(id) = &key {
            if !self.selected_metric_ids.contains(id) {
                return false;
            }
        }
        self.sort_key = Some(key);
        self.sort_direction = direction;
        true
    }

    pub fn clear_sort(&mut self) {
        self.sort_key = None;
        self.sort_direction = SortDirection::Descending;
    }
}
