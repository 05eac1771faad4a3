use super::types::{Portfolio, PORTFOLIO_VERSION};
use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Get the default portfolio file path (~/.config/deal-lens/portfolio.json)
pub fn get_portfolio_path() -> PathBuf {
    crate::config::get_config_dir().join("portfolio.json")
}

/// Load a portfolio from a JSON file.
///
/// Unlike config loading, a missing file is an error here: callers decide
/// whether to fall back to a generated portfolio.
pub fn load_portfolio(path: &Path) -> Result<Portfolio> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open portfolio file at {}", path.display()))?;

    let portfolio: Portfolio = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse portfolio in {}", path.display()))?;

    if portfolio.version != PORTFOLIO_VERSION {
        anyhow::bail!("Unsupported portfolio version: {}", portfolio.version);
    }

    for (i, project) in portfolio.projects.iter().enumerate() {
        if portfolio.projects[..i].iter().any(|p| p.id == project.id) {
            anyhow::bail!("Duplicate project id '{}' in {}", project.id, path.display());
        }
    }

    Ok(portfolio)
}

/// Save a portfolio to a JSON file atomically, creating parent directories.
pub fn save_portfolio(path: &Path, portfolio: &Portfolio) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, portfolio).context("Failed to serialize portfolio")?;

    file.commit().context("Failed to save portfolio")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portfolio::generate_portfolio;
    use std::env;

    #[test]
    fn test_load_missing_file_fails() {
        let temp_path = env::temp_dir().join("deal_lens_test_missing_portfolio.json");
        let _ = std::fs::remove_file(&temp_path);

        assert!(load_portfolio(&temp_path).is_err());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp_path = env::temp_dir()
            .join("deal_lens_test_nested")
            .join("portfolio.json");
        let _ = std::fs::remove_file(&temp_path);

        let portfolio = generate_portfolio(4, 11);
        save_portfolio(&temp_path, &portfolio).unwrap();

        let loaded = load_portfolio(&temp_path).unwrap();
        assert_eq!(loaded, portfolio);

        let _ = std::fs::remove_file(&temp_path);
    }

    #[test]
    fn test_rejects_unknown_version() {
        let temp_path = env::temp_dir().join("deal_lens_test_version.json");
        std::fs::write(&temp_path, r#"{"version": 2, "projects": []}"#).unwrap();

        let err = load_portfolio(&temp_path).unwrap_err();
        assert!(err.to_string().contains("Unsupported portfolio version"));

        let _ = std::fs::remove_file(&temp_path);
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let temp_path = env::temp_dir().join("deal_lens_test_duplicates.json");
        let mut portfolio = generate_portfolio(2, 3);
        portfolio.projects[1].id = portfolio.projects[0].id.clone();
        save_portfolio(&temp_path, &portfolio).unwrap();

        assert!(load_portfolio(&temp_path).is_err());

        let _ = std::fs::remove_file(&temp_path);
    }
}
