use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::io::Write;
use std::path::Path;

use super::schema::{ComparisonConfig, Config};
use crate::scoring::ScoringConfig;

const HEADER: &str = "\
# DealLens configuration
#
# scoring.metrics lists the comparison metrics in column order. Each metric
# reads one project field and maps it to 0-100 with either
#   curve: \"linear A..B\"   (A scores 0, B scores 100)
#   curve: \"inverse A..B\"  (A scores 100, B scores 0)
# or a buckets list of { range, score } (first match wins).
# The overall score is the plain average of the selected metric scores.

";

/// Write the built-in configuration to `path`.
///
/// Refuses to replace an existing file unless `force` is set. Returns false
/// when the file was left alone.
pub fn write_default_config(path: &Path, force: bool) -> Result<bool> {
    if path.exists() && !force {
        return Ok(false);
    }

    let config = Config {
        portfolio: None,
        scoring: Some(ScoringConfig::default()),
        comparison: ComparisonConfig::default(),
    };

    let yaml = serde_saphyr::to_string(&config)
        .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    file.write_all(HEADER.as_bytes())
        .with_context(|| format!("Failed to write config to {}", path.display()))?;
    file.write_all(yaml.as_bytes())
        .with_context(|| format!("Failed to write config to {}", path.display()))?;
    file.commit()
        .with_context(|| format!("Failed to save config to {}", path.display()))?;

    Ok(true)
}
