use chrono::{DateTime, Duration, TimeZone, Utc};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::types::{Portfolio, Project, Stage};

const NAME_PREFIXES: [&str; 12] = [
    "Quantum", "Nimbus", "Vector", "Helix", "Lumen", "Orbit", "Cobalt", "Aster", "Ferro",
    "Kepler", "Tidal", "Vertex",
];
const NAME_SUFFIXES: [&str; 8] = ["Labs", "AI", "Health", "Pay", "Grid", "Bio", "Works", "Cloud"];
const SECTORS: [&str; 6] = ["fintech", "healthtech", "climate", "devtools", "ai", "logistics"];

/// Fixed reference point so a seed always yields identical timestamps
fn reference_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

/// Build a mock portfolio of `count` projects.
///
/// All randomness is drawn here, once, from a ChaCha RNG seeded with `seed`.
/// Metric accessors only ever read the resulting fields, so the same seed
/// always produces the same scores.
pub fn generate_portfolio(count: usize, seed: u64) -> Portfolio {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let base = reference_time();

    let projects = (0..count)
        .map(|i| {
            let prefix = NAME_PREFIXES[rng.gen_range(0..NAME_PREFIXES.len())];
            let suffix = NAME_SUFFIXES[rng.gen_range(0..NAME_SUFFIXES.len())];
            let stage = Stage::ALL[rng.gen_range(0..Stage::ALL.len())];
            let sector = SECTORS[rng.gen_range(0..SECTORS.len())];

            // Later stages carry bigger teams and burn
            let stage_factor = (stage as u32 + 1) as f64;
            let team_size = rng.gen_range(2..=20) * (stage as u32 + 1);
            let burn_rate = (rng.gen_range(20_000.0_f64..120_000.0) * stage_factor / 1_000.0).round() * 1_000.0;

            Project {
                id: format!("p{}", i + 1),
                name: format!("{} {}", prefix, suffix),
                sector: sector.to_string(),
                stage,
                revenue_growth: rng.gen_range(-20.0_f64..250.0).round(),
                burn_rate,
                runway_months: rng.gen_range(3.0_f64..36.0).round(),
                team_size,
                market_size: (rng.gen_range(0.5_f64..80.0) * 10.0).round() / 10.0,
                market_growth: rng.gen_range(2.0_f64..45.0).round(),
                innovation_score: (rng.gen_range(3.0_f64..10.0) * 10.0).round() / 10.0,
                competitor_count: rng.gen_range(0..25),
                updated_at: base - Duration::hours(rng.gen_range(0..24 * 90)),
            }
        })
        .collect();

    Portfolio::new(projects)
}
