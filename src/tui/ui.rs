use ratatui::prelude::*;
use ratatui::widgets::{Block, Cell, Clear, Paragraph, Row, Table};

use crate::comparison::ComparisonMatrix;
use crate::output::{format_age, format_score, truncate};
use crate::portfolio::Project;
use crate::scoring::{cell_indicator, score_metric, SortDirection, SortKey};
use crate::tui::app::{App, InputMode};

pub fn draw(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    if area.height < 6 || area.width < 30 {
        let msg = Paragraph::new("Terminal too small").alignment(Alignment::Center);
        frame.render_widget(msg, area);
        return;
    }

    // Title(1) + Table(fill) + Status(1)
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .split(area);

    render_title(frame, chunks[0], app);
    render_matrix(frame, chunks[1], app);
    render_status_bar(frame, chunks[2], app);

    match app.input_mode {
        InputMode::Help => render_help_popup(frame, app),
        InputMode::Scorecard => render_scorecard_popup(frame, app),
        InputMode::ProjectPicker | InputMode::MetricPicker => render_picker_popup(frame, app),
        InputMode::Normal => {}
    }
}

fn render_title(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![Span::styled(
        "DealLens",
        Style::default().fg(app.theme.title_color).bold(),
    )];

    let sort_text = match app.selection.sort_key() {
        Some(key) => format!(
            "sorted by {} {}",
            app.key_label(key),
            direction_arrow(app.selection.sort_direction())
        ),
        None => "unsorted".to_string(),
    };
    let padding = (area.width as usize).saturating_sub("DealLens".len() + sort_text.chars().count());
    spans.push(Span::raw(" ".repeat(padding)));
    spans.push(Span::styled(sort_text, Style::default().fg(app.theme.muted)));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn direction_arrow(direction: SortDirection) -> &'static str {
    match direction {
        SortDirection::Descending => "▼",
        SortDirection::Ascending => "▲",
    }
}

fn render_matrix(frame: &mut Frame, area: Rect, app: &mut App) {
    let matrix = match app.matrix() {
        Ok(matrix) => matrix,
        Err(e) => {
            let msg = Paragraph::new(format!("Scoring failed: {:#}", e))
                .style(Style::default().fg(app.theme.flash_error))
                .alignment(Alignment::Center);
            frame.render_widget(msg, area);
            return;
        }
    };

    if matrix.is_empty() {
        let empty_msg = Paragraph::new("No projects selected (p to pick)")
            .alignment(Alignment::Center)
            .block(Block::default());
        frame.render_widget(empty_msg, area);
        return;
    }

    let theme = &app.theme;
    let header = build_header(app, &matrix);

    let rows: Vec<Row> = matrix
        .rows
        .iter()
        .enumerate()
        .map(|(idx, row)| {
            let mut cells = vec![
                Cell::from(format!("{}.", idx + 1)).style(Style::default().fg(theme.index_color)),
                Cell::from(truncate(&row.entity.name, 24)),
            ];
            cells.extend(row.cells.iter().map(|cell| {
                Cell::from(Line::from(vec![
                    Span::raw(format!("{} ", cell.display_value)),
                    Span::styled(
                        format_score(cell.score),
                        Style::default().fg(theme.score_color(cell.score)),
                    ),
                ]))
            }));
            cells.push(
                Cell::from(row.overall.to_string())
                    .style(Style::default().fg(theme.score_color(row.overall as f64)).bold()),
            );

            let row_style = if idx % 2 == 1 {
                Style::default().bg(theme.row_alt_bg)
            } else {
                Style::default()
            };
            Row::new(cells).style(row_style)
        })
        .collect();

    let mut widths = vec![Constraint::Length(4), Constraint::Fill(1)];
    widths.extend(matrix.metric_ids.iter().map(|_| Constraint::Length(14)));
    widths.push(Constraint::Length(9));

    let table = Table::new(rows, widths)
        .header(header.bottom_margin(1))
        .row_highlight_style(theme.row_selected);

    // The matrix borrows the app; render into a copy of the table state.
    let mut state = app.table_state.clone();
    frame.render_stateful_widget(table, area, &mut state);
    drop(matrix);
    app.table_state = state;
}

fn build_header(app: &App, matrix: &ComparisonMatrix<Project>) -> Row<'static> {
    let theme = &app.theme;
    let sort_key = app.selection.sort_key();
    let arrow = direction_arrow(app.selection.sort_direction());

    let mut cells = vec![Cell::from("#"), Cell::from("Project")];
    let keys = matrix
        .metric_ids
        .iter()
        .map(|id| SortKey::Metric(id.clone()))
        .chain(std::iter::once(SortKey::Overall));
    let labels = matrix
        .metric_labels
        .iter()
        .cloned()
        .chain(std::iter::once("Overall".to_string()));

    for (col, (key, label)) in keys.zip(labels).enumerate() {
        let text = if sort_key == Some(&key) {
            format!("{} {}", label, arrow)
        } else {
            label
        };
        let style = if col == app.column {
            theme.column_focus
        } else {
            theme.header_style
        };
        cells.push(Cell::from(text).style(style));
    }

    Row::new(cells).style(theme.header_style)
}

fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let text = if let Some((ref msg, _)) = app.flash_message {
        let color = if msg.starts_with("Error") || msg.starts_with("Failed") {
            theme.flash_error
        } else {
            theme.flash_success
        };
        Line::from(Span::styled(msg.clone(), Style::default().fg(color)))
    } else {
        let counts = format!(
            "{}/{} projects  {}/{} metrics",
            app.row_count(),
            app.projects.len(),
            app.visible_metric_ids().len(),
            app.catalog.len()
        );

        let hints = [
            ("j/k", ":row "),
            ("h/l", ":column "),
            ("s", ":sort "),
            ("o", ":overall "),
            ("p", ":projects "),
            ("m", ":metrics "),
            ("?", ":help "),
            ("q", ":quit"),
        ];

        let mut spans = vec![
            Span::styled(counts, Style::default().fg(theme.muted)),
            Span::raw("  "),
        ];
        for (i, (key, label)) in hints.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw(" "));
            }
            spans.push(Span::styled(*key, Style::default().fg(theme.status_key_color)));
            spans.push(Span::raw(*label));
        }
        Line::from(spans)
    };

    frame.render_widget(
        Paragraph::new(text).style(Style::default().bg(theme.status_bar_bg)),
        area,
    );
}

/// Create a centered rectangle with fixed width and height
fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);

    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;

    Rect {
        x,
        y,
        width,
        height,
    }
}

fn popup_block(app: &App, title: String) -> Block<'static> {
    Block::bordered()
        .title(Span::styled(title, app.theme.popup_title))
        .border_style(Style::default().fg(app.theme.popup_border))
}

fn render_picker_popup(frame: &mut Frame, app: &App) {
    let (title, items): (&str, Vec<(String, bool)>) = match app.input_mode {
        InputMode::ProjectPicker => (
            " Projects ",
            app.projects
                .iter()
                .map(|p| {
                    (
                        format!("{} ({}, {})", p.name, p.stage, p.sector),
                        app.selection.is_entity_selected(&p.id),
                    )
                })
                .collect(),
        ),
        _ => (
            " Metrics ",
            app.catalog
                .iter()
                .map(|m| {
                    (
                        format!("{} [{}]", m.label, m.category),
                        app.selection.is_metric_selected(&m.id),
                    )
                })
                .collect(),
        ),
    };

    let height = (items.len() as u16).saturating_add(4);
    let popup_area = centered_rect_fixed(56, height, frame.area());
    frame.render_widget(Clear, popup_area);
    let block = popup_block(app, title.to_string());
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let mut lines: Vec<Line> = items
        .into_iter()
        .enumerate()
        .map(|(i, (text, checked))| {
            let mark = if checked { "[x] " } else { "[ ] " };
            let line = Line::from(format!("{}{}", mark, text));
            if i == app.picker_cursor {
                line.style(app.theme.row_selected)
            } else {
                line
            }
        })
        .collect();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Space: toggle | Esc: close",
        Style::default().fg(app.theme.muted),
    )));

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_scorecard_popup(frame: &mut Frame, app: &App) {
    let Some(project) = app.selected_project() else {
        return;
    };
    let metrics = app.catalog.select(|id| app.selection.is_metric_selected(id));

    let popup_area = centered_rect_fixed(60, (metrics.len() as u16).saturating_add(8), frame.area());
    frame.render_widget(Clear, popup_area);
    let block = popup_block(app, format!(" {} ", project.name));
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let mut lines = vec![
        Line::from(Span::styled(
            format!(
                "{} | {} | updated {} ago",
                project.stage,
                project.sector,
                format_age(project.staleness())
            ),
            Style::default().fg(app.theme.muted),
        )),
        Line::from(""),
    ];

    let mut total = 0.0;
    for metric in &metrics {
        match score_metric(project, metric) {
            Ok(cell) => {
                total += cell.score;
                lines.push(Line::from(vec![
                    Span::raw(format!("{:<22}", truncate(&metric.label, 22))),
                    Span::styled(
                        format!("{:>4}  ", format_score(cell.score)),
                        Style::default().fg(app.theme.score_color(cell.score)),
                    ),
                    Span::raw(cell.display_value),
                ]));
            }
            Err(e) => lines.push(Line::from(Span::styled(
                format!("{:<22}error: {}", metric.label, e),
                Style::default().fg(app.theme.flash_error),
            ))),
        }
    }

    if !metrics.is_empty() {
        let average = total / metrics.len() as f64;
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::raw(format!("{:<22}", "Average")),
            Span::styled(
                format!("{:>4}  {}", format_score(average), cell_indicator(average)),
                Style::default().fg(app.theme.score_color(average)).bold(),
            ),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Esc/b: close | j/k: previous/next project",
        Style::default().fg(app.theme.muted),
    )));

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_help_popup(frame: &mut Frame, app: &App) {
    let popup_area = centered_rect_fixed(50, 17, frame.area());
    frame.render_widget(Clear, popup_area);
    let block = popup_block(app, " Keyboard Shortcuts ".to_string());
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let bindings = [
        ("j / Down", "Next project"),
        ("k / Up", "Previous project"),
        ("h / Left", "Previous column"),
        ("l / Right", "Next column"),
        ("Enter / s", "Sort by focused column"),
        ("o", "Sort by overall score"),
        ("c", "Clear sort"),
        ("p", "Pick projects"),
        ("m", "Pick metrics"),
        ("b", "Scorecard of selected project"),
        ("?", "Show/hide this help"),
        ("q / Ctrl-c", "Quit"),
    ];

    let mut help_lines: Vec<Line> = bindings
        .iter()
        .map(|(key, action)| {
            Line::from(vec![
                Span::styled(format!("{:<14}", key), app.theme.popup_key),
                Span::raw(*action),
            ])
        })
        .collect();
    help_lines.push(Line::from(""));
    help_lines.push(Line::from(Span::styled(
        "Sorting the same column again flips direction",
        Style::default().fg(app.theme.muted),
    )));
    help_lines.push(Line::from(Span::styled(
        "Press any key to close",
        Style::default().fg(app.theme.muted),
    )));

    frame.render_widget(Paragraph::new(help_lines), inner);
}
