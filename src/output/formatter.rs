use chrono::Duration;
use owo_colors::OwoColorize;
use serde::Serialize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::comparison::{ComparisonMatrix, SelectionState};
use crate::portfolio::Project;
use crate::scoring::{cell_indicator, Indicator, MetricCatalog, MetricScore, SortDirection, SortKey};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Format a normalized score for display ("92", "50")
pub fn format_score(score: f64) -> String {
    format!("{:.0}", score)
}

/// Color text by the indicator bucket of `score`
fn paint(text: &str, score: f64, use_colors: bool) -> String {
    if !use_colors {
        return text.to_string();
    }
    match cell_indicator(score) {
        Indicator::Excellent => text.green().bold().to_string(),
        Indicator::Good => text.cyan().to_string(),
        Indicator::Warning => text.yellow().to_string(),
        Indicator::Poor => text.red().to_string(),
    }
}

/// Truncate text to fit available width, accounting for Unicode
pub fn truncate(text: &str, max_width: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_width {
        text.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

fn pad_right(text: &str, width: usize) -> String {
    let len = text.chars().count();
    format!("{}{}", text, " ".repeat(width.saturating_sub(len)))
}

fn sort_marker(selection: &SelectionState, key: &SortKey) -> &'static str {
    if selection.sort_key() != Some(key) {
        return "";
    }
    match selection.sort_direction() {
        SortDirection::Descending => " v",
        SortDirection::Ascending => " ^",
    }
}

fn cell_text(cell: &MetricScore) -> String {
    format!("{} ({})", cell.display_value, format_score(cell.score))
}

/// Format the comparison as an aligned table.
///
/// Columns: index, project name, one column per selected metric showing
/// "display (score)", and the overall score. The sorted column carries a
/// "v" (descending) or "^" (ascending) marker.
pub fn format_matrix(
    matrix: &ComparisonMatrix<Project>,
    selection: &SelectionState,
    use_colors: bool,
) -> String {
    if matrix.is_empty() {
        return "No projects selected.".to_string();
    }

    let separator = "  ";
    let index_width = 3;

    let headers: Vec<String> = matrix
        .metric_ids
        .iter()
        .zip(&matrix.metric_labels)
        .map(|(id, label)| format!("{}{}", label, sort_marker(selection, &SortKey::Metric(id.clone()))))
        .collect();
    let overall_header = format!("Overall{}", sort_marker(selection, &SortKey::Overall));

    let texts: Vec<Vec<String>> = matrix
        .rows
        .iter()
        .map(|row| row.cells.iter().map(cell_text).collect())
        .collect();

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(col, header)| {
            texts
                .iter()
                .map(|row| row[col].chars().count())
                .chain(std::iter::once(header.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();
    let overall_width = overall_header.len();

    let fixed_width = index_width
        + 1
        + widths.iter().map(|w| w + separator.len()).sum::<usize>()
        + separator.len()
        + overall_width;
    let longest_name = matrix
        .rows
        .iter()
        .map(|r| r.entity.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("Project".len());
    let name_width = match get_terminal_width() {
        Some(width) if width > fixed_width + 10 => longest_name.min(width - fixed_width),
        Some(_) => longest_name.min(20),
        None => longest_name,
    };

    let mut lines = Vec::with_capacity(matrix.rows.len() + 1);

    let mut header = format!("{:>width$} {}", "#", pad_right("Project", name_width), width = index_width);
    for (text, width) in headers.iter().zip(&widths) {
        header.push_str(separator);
        header.push_str(&pad_right(text, *width));
    }
    header.push_str(separator);
    header.push_str(&overall_header);
    lines.push(if use_colors {
        header.bold().to_string()
    } else {
        header
    });

    for (idx, (row, row_texts)) in matrix.rows.iter().zip(&texts).enumerate() {
        let index_str = format!("{:>2}.", idx + 1);
        let name = pad_right(&truncate(&row.entity.name, name_width), name_width);

        let mut line = if use_colors {
            format!("{} {}", index_str.dimmed(), name)
        } else {
            format!("{} {}", index_str, name)
        };
        for ((cell, text), width) in row.cells.iter().zip(row_texts).zip(&widths) {
            line.push_str(separator);
            line.push_str(&paint(&pad_right(text, *width), cell.score, use_colors));
        }
        line.push_str(separator);
        let overall = format!("{:>width$}", row.overall, width = overall_width);
        line.push_str(&paint(&overall, row.overall as f64, use_colors));
        lines.push(line);
    }

    lines.join("\n")
}

/// Format the comparison as tab-separated values for scripting.
/// Header row, then: id, name, one score per metric, overall (no colors).
pub fn format_tsv(matrix: &ComparisonMatrix<Project>) -> String {
    let mut header = vec!["id".to_string(), "name".to_string()];
    header.extend(matrix.metric_ids.iter().cloned());
    header.push("overall".to_string());

    let mut lines = vec![header.join("\t")];
    for row in &matrix.rows {
        let mut fields = vec![row.entity.id.clone(), row.entity.name.clone()];
        fields.extend(row.cells.iter().map(|c| format_score(c.score)));
        fields.push(row.overall.to_string());
        lines.push(fields.join("\t"));
    }
    lines.join("\n")
}

#[derive(Serialize)]
struct JsonCell<'a> {
    metric: &'a str,
    raw: f64,
    display: &'a str,
    score: f64,
    indicator: Indicator,
}

#[derive(Serialize)]
struct JsonRow<'a> {
    id: &'a str,
    name: &'a str,
    overall: u32,
    cells: Vec<JsonCell<'a>>,
}

/// Format the comparison as pretty JSON.
pub fn format_json(matrix: &ComparisonMatrix<Project>) -> anyhow::Result<String> {
    let rows: Vec<JsonRow> = matrix
        .rows
        .iter()
        .map(|row| JsonRow {
            id: &row.entity.id,
            name: &row.entity.name,
            overall: row.overall,
            cells: row
                .cells
                .iter()
                .map(|c| JsonCell {
                    metric: &c.metric_id,
                    raw: c.raw_value,
                    display: &c.display_value,
                    score: c.score,
                    indicator: cell_indicator(c.score),
                })
                .collect(),
        })
        .collect();
    Ok(serde_json::to_string_pretty(&rows)?)
}

/// Per-metric breakdown of one project (for `show` and verbose output)
pub fn format_scorecard(
    project: &Project,
    cells: &[MetricScore],
    overall: u32,
    catalog: &MetricCatalog<Project>,
    use_colors: bool,
) -> String {
    let title = if use_colors {
        project.name.bold().to_string()
    } else {
        project.name.clone()
    };
    let mut lines = vec![
        title,
        format!("  Id: {}", project.id),
        format!("  Stage: {}  Sector: {}", project.stage, project.sector),
        format!("  Updated: {} ago", format_age(project.staleness())),
        String::new(),
    ];

    let label_width = cells
        .iter()
        .filter_map(|c| catalog.get(&c.metric_id))
        .map(|m| m.label.chars().count())
        .max()
        .unwrap_or(0);

    for cell in cells {
        let (label, polarity) = match catalog.get(&cell.metric_id) {
            Some(metric) => (
                metric.label.as_str(),
                if metric.higher_is_better { "" } else { " (lower is better)" },
            ),
            None => (cell.metric_id.as_str(), ""),
        };
        let score = format!("{:>3}", format_score(cell.score));
        lines.push(format!(
            "  {}  {}  {}{}",
            pad_right(label, label_width),
            paint(&score, cell.score, use_colors),
            pad_right(&cell.display_value, 10),
            polarity
        ));
    }

    lines.push(String::new());
    let overall_text = format!("{} ({})", overall, cell_indicator(overall as f64));
    lines.push(format!("  Overall: {}", paint(&overall_text, overall as f64, use_colors)));
    lines.join("\n")
}

/// List the metric catalog: id, label, category, polarity
pub fn format_metric_list(catalog: &MetricCatalog<Project>) -> String {
    let id_width = catalog.iter().map(|m| m.id.len()).max().unwrap_or(0);
    let label_width = catalog.iter().map(|m| m.label.chars().count()).max().unwrap_or(0);
    catalog
        .iter()
        .map(|m| {
            format!(
                "{}  {}  {:<9}  {}",
                pad_right(&m.id, id_width),
                pad_right(&m.label, label_width),
                m.category.to_string(),
                if m.higher_is_better { "higher is better" } else { "lower is better" }
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format a duration into a human-readable age string
/// "2h" for hours, "3d" for days, "1w" for weeks
pub fn format_age(duration: Duration) -> String {
    let hours = duration.num_hours();
    let days = duration.num_days();
    let weeks = days / 7;

    if weeks >= 1 {
        format!("{}w", weeks)
    } else if days >= 1 {
        format!("{}d", days)
    } else if hours >= 1 {
        format!("{}h", hours)
    } else {
        let minutes = duration.num_minutes();
        if minutes >= 1 {
            format!("{}m", minutes)
        } else {
            "now".to_string()
        }
    }
}
