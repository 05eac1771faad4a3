use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const PORTFOLIO_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    PreSeed,
    Seed,
    SeriesA,
    SeriesB,
    SeriesC,
    Growth,
}

impl Stage {
    pub const ALL: [Stage; 6] = [
        Stage::PreSeed,
        Stage::Seed,
        Stage::SeriesA,
        Stage::SeriesB,
        Stage::SeriesC,
        Stage::Growth,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::PreSeed => "pre-seed",
            Stage::Seed => "seed",
            Stage::SeriesA => "series-a",
            Stage::SeriesB => "series-b",
            Stage::SeriesC => "series-c",
            Stage::Growth => "growth",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Stage::ALL
            .into_iter()
            .find(|stage| stage.as_str().eq_ignore_ascii_case(s))
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub sector: String,
    pub stage: Stage,
    pub revenue_growth: f64,   // Year-over-year, percent
    pub burn_rate: f64,        // USD per month
    pub runway_months: f64,
    pub team_size: u32,
    pub market_size: f64,      // TAM, USD billions
    pub market_growth: f64,    // Percent per year
    pub innovation_score: f64, // 0-10 analyst rating
    pub competitor_count: u32,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Time since the record was last updated
    pub fn staleness(&self) -> chrono::Duration {
        Utc::now() - self.updated_at
    }

    pub fn field(&self, field: ProjectField) -> f64 {
        match field {
            ProjectField::RevenueGrowth => self.revenue_growth,
            ProjectField::BurnRate => self.burn_rate,
            ProjectField::RunwayMonths => self.runway_months,
            ProjectField::TeamSize => self.team_size as f64,
            ProjectField::MarketSize => self.market_size,
            ProjectField::MarketGrowth => self.market_growth,
            ProjectField::InnovationScore => self.innovation_score,
            ProjectField::CompetitorCount => self.competitor_count as f64,
        }
    }
}

/// Numeric project fields a metric can read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectField {
    RevenueGrowth,
    BurnRate,
    RunwayMonths,
    TeamSize,
    MarketSize,
    MarketGrowth,
    InnovationScore,
    CompetitorCount,
}

/// Versioned on-disk portfolio document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Portfolio {
    pub version: u32,
    #[serde(default)]
    pub projects: Vec<Project>,
}

impl Portfolio {
    pub fn new(projects: Vec<Project>) -> Self {
        Self {
            version: PORTFOLIO_VERSION,
            projects,
        }
    }

    pub fn get(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    pub fn ids(&self) -> Vec<String> {
        self.projects.iter().map(|p| p.id.clone()).collect()
    }
}
