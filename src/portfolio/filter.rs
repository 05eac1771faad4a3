use super::types::{Project, Stage};
use std::collections::BTreeSet;

/// Stage and sector filters applied to the portfolio before a comparison.
/// An empty set does not filter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PortfolioFilter {
    pub stages: BTreeSet<Stage>,
    pub sectors: BTreeSet<String>,
}

impl PortfolioFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the stage if absent, remove it if present
    pub fn toggle_stage(&mut self, stage: Stage) {
        if !self.stages.remove(&stage) {
            self.stages.insert(stage);
        }
    }

    pub fn toggle_sector(&mut self, sector: &str) {
        let sector = sector.trim().to_lowercase();
        if !self.sectors.remove(&sector) {
            self.sectors.insert(sector);
        }
    }

    pub fn clear(&mut self) {
        self.stages.clear();
        self.sectors.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty() && self.sectors.is_empty()
    }

    pub fn matches(&self, project: &Project) -> bool {
        let stage_ok = self.stages.is_empty() || self.stages.contains(&project.stage);
        let sector_ok = self.sectors.is_empty()
            || self
                .sectors
                .iter()
                .any(|s| s.eq_ignore_ascii_case(&project.sector));
        stage_ok && sector_ok
    }
}

/// Keep only projects that pass the filter, preserving source order
pub fn filter_projects(projects: Vec<Project>, filter: &PortfolioFilter) -> Vec<Project> {
    projects.into_iter().filter(|p| filter.matches(p)).collect()
}
