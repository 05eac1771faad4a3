use deal_lens::comparison::{ComparisonMatrix, SelectionState};
use deal_lens::portfolio::{generate_portfolio, load_portfolio, save_portfolio, Project};
use deal_lens::scoring::{build_catalog, ScoringConfig, SortDirection, SortKey};

fn projects() -> Vec<Project> {
    let mut projects = generate_portfolio(3, 1).projects;
    // p1: 12 months runway, $80k burn
    projects[0].runway_months = 12.0;
    projects[0].burn_rate = 80_000.0;
    // p2: long runway, heavy burn
    projects[1].runway_months = 30.0;
    projects[1].burn_rate = 600_000.0;
    // p3: short runway, low burn
    projects[2].runway_months = 6.0;
    projects[2].burn_rate = 40_000.0;
    projects
}

fn ids<'a>(matrix: &ComparisonMatrix<'a, Project>) -> Vec<&'a str> {
    matrix.rows.iter().map(|r| r.entity.id.as_str()).collect()
}

#[test]
fn default_selection_shows_first_projects_unsorted() {
    let projects = projects();
    let catalog = build_catalog(&ScoringConfig::default()).unwrap();
    let project_ids: Vec<String> = projects.iter().map(|p| p.id.clone()).collect();
    let selection = SelectionState::with_defaults(&project_ids, &catalog.ids(), 2, 8);

    let matrix = ComparisonMatrix::build(&projects, &catalog, &selection).unwrap();
    assert_eq!(ids(&matrix), vec!["p1", "p2"]);
    assert_eq!(matrix.metric_ids.len(), 8);
    for row in &matrix.rows {
        assert_eq!(row.cells.len(), 8);
        assert!(row.overall <= 100);
    }
}

#[test]
fn runway_and_burn_scenario() {
    let projects = projects();
    let catalog = build_catalog(&ScoringConfig::default()).unwrap();
    let mut selection = SelectionState::new();
    selection.select_entities(["p1", "p2", "p3"]);
    selection.select_metrics(["runway", "burn-rate"]);

    let matrix = ComparisonMatrix::build(&projects, &catalog, &selection).unwrap();
    let p1 = &matrix.rows[0];
    assert_eq!(p1.cells[0].metric_id, "burn-rate");
    assert_eq!(p1.cells[0].display_value, "$80k");
    assert_eq!(p1.cells[0].score.round(), 92.0);
    assert_eq!(p1.cells[1].display_value, "12 mo");
    assert_eq!(p1.cells[1].score, 50.0);
    assert_eq!(p1.overall, 71);

    // p2's runway is past the curve and clamps
    assert_eq!(matrix.rows[1].cells[1].score, 100.0);
}

#[test]
fn header_clicks_toggle_direction_and_reorder() {
    let projects = projects();
    let catalog = build_catalog(&ScoringConfig::default()).unwrap();
    let mut selection = SelectionState::new();
    selection.select_entities(["p1", "p2", "p3"]);
    selection.select_metrics(["runway", "burn-rate"]);

    assert!(selection.click_sort(SortKey::Metric("runway".to_string())));
    let matrix = ComparisonMatrix::build(&projects, &catalog, &selection).unwrap();
    assert_eq!(ids(&matrix), vec!["p2", "p1", "p3"]);

    assert!(selection.click_sort(SortKey::Metric("runway".to_string())));
    assert_eq!(selection.sort_direction(), SortDirection::Ascending);
    let matrix = ComparisonMatrix::build(&projects, &catalog, &selection).unwrap();
    assert_eq!(ids(&matrix), vec!["p3", "p1", "p2"]);

    // Lower burn is better, so "best first" puts the smallest burn on top
    assert!(selection.click_sort(SortKey::Metric("burn-rate".to_string())));
    assert_eq!(selection.sort_direction(), SortDirection::Descending);
    let matrix = ComparisonMatrix::build(&projects, &catalog, &selection).unwrap();
    assert_eq!(ids(&matrix), vec!["p3", "p1", "p2"]);
}

#[test]
fn deselecting_sort_metric_falls_back_to_source_order() {
    let projects = projects();
    let catalog = build_catalog(&ScoringConfig::default()).unwrap();
    let mut selection = SelectionState::new();
    selection.select_entities(["p1", "p2", "p3"]);
    selection.select_metrics(["runway", "burn-rate"]);
    selection.click_sort(SortKey::Metric("runway".to_string()));

    assert!(!selection.toggle_metric("runway"));
    assert!(selection.sort_key().is_none());

    let matrix = ComparisonMatrix::build(&projects, &catalog, &selection).unwrap();
    assert_eq!(ids(&matrix), vec!["p1", "p2", "p3"]);
    assert_eq!(matrix.metric_ids, vec!["burn-rate"]);
}

#[test]
fn no_metrics_selected_gives_zero_overall() {
    let projects = projects();
    let catalog = build_catalog(&ScoringConfig::default()).unwrap();
    let mut selection = SelectionState::new();
    selection.select_entities(["p1"]);

    let matrix = ComparisonMatrix::build(&projects, &catalog, &selection).unwrap();
    assert!(matrix.rows[0].cells.is_empty());
    assert_eq!(matrix.rows[0].overall, 0);
}

#[test]
fn saved_portfolio_compares_identically() {
    let path = std::env::temp_dir()
        .join("deal_lens_it")
        .join("portfolio.json");
    let portfolio = generate_portfolio(5, 99);
    save_portfolio(&path, &portfolio).unwrap();
    let loaded = load_portfolio(&path).unwrap();

    let catalog = build_catalog(&ScoringConfig::default()).unwrap();
    let mut selection = SelectionState::with_defaults(&portfolio.ids(), &catalog.ids(), 5, 8);
    selection.click_sort(SortKey::Overall);

    let before = ComparisonMatrix::build(&portfolio.projects, &catalog, &selection).unwrap();
    let after = ComparisonMatrix::build(&loaded.projects, &catalog, &selection).unwrap();
    assert_eq!(ids(&before), ids(&after));
    let overall = |m: &ComparisonMatrix<Project>| m.rows.iter().map(|r| r.overall).collect::<Vec<_>>();
    assert_eq!(overall(&before), overall(&after));

    let _ = std::fs::remove_file(&path);
}
