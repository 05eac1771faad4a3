use anyhow::Result;
use ratatui::widgets::TableState;
use std::time::Instant;

use crate::comparison::{ComparisonMatrix, SelectionState};
use crate::portfolio::Project;
use crate::scoring::{MetricCatalog, SortDirection, SortKey};
use crate::tui::theme::ThemeColors;

const FLASH_SECS: u64 = 3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputMode {
    Normal,
    Help,
    Scorecard,
    ProjectPicker,
    MetricPicker,
}

pub struct App {
    pub projects: Vec<Project>,
    pub catalog: MetricCatalog<Project>,
    pub selection: SelectionState,
    pub table_state: TableState,
    /// Focused column: `0..metric_count` are metrics, `metric_count` is Overall
    pub column: usize,
    pub picker_cursor: usize,
    pub input_mode: InputMode,
    pub flash_message: Option<(String, Instant)>,
    pub theme: ThemeColors,
    pub should_quit: bool,
}

impl App {
    pub fn new(
        projects: Vec<Project>,
        catalog: MetricCatalog<Project>,
        selection: SelectionState,
        theme: ThemeColors,
    ) -> Self {
        let mut app = Self {
            projects,
            catalog,
            selection,
            table_state: TableState::default(),
            column: 0,
            picker_cursor: 0,
            input_mode: InputMode::Normal,
            flash_message: None,
            theme,
            should_quit: false,
        };
        app.clamp_cursors();
        app
    }

    /// Current comparison snapshot, rebuilt from the selection.
    pub fn matrix(&self) -> Result<ComparisonMatrix<'_, Project>> {
        ComparisonMatrix::build(&self.projects, &self.catalog, &self.selection)
    }

    /// Ids of the displayed metric columns, catalog order
    pub fn visible_metric_ids(&self) -> Vec<String> {
        self.catalog
            .select(|id| self.selection.is_metric_selected(id))
            .iter()
            .map(|m| m.id.clone())
            .collect()
    }

    pub fn row_count(&self) -> usize {
        self.projects
            .iter()
            .filter(|p| self.selection.is_entity_selected(&p.id))
            .count()
    }

    pub fn next_row(&mut self) {
        let len = self.row_count();
        if len == 0 {
            return;
        }
        let i = match self.table_state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.table_state.select(Some(i));
    }

    pub fn previous_row(&mut self) {
        let len = self.row_count();
        if len == 0 {
            return;
        }
        let i = match self.table_state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.table_state.select(Some(i));
    }

    pub fn next_column(&mut self) {
        let columns = self.visible_metric_ids().len() + 1;
        self.column = (self.column + 1) % columns;
    }

    pub fn previous_column(&mut self) {
        let columns = self.visible_metric_ids().len() + 1;
        self.column = (self.column + columns - 1) % columns;
    }

    /// Sort key of the focused column
    pub fn focused_key(&self) -> SortKey {
        match self.visible_metric_ids().into_iter().nth(self.column) {
            Some(id) => SortKey::Metric(id),
            None => SortKey::Overall,
        }
    }

    /// Click the header of the focused column
    pub fn sort_focused(&mut self) {
        let key = self.focused_key();
        self.apply_sort(key);
    }

    pub fn sort_overall(&mut self) {
        self.apply_sort(SortKey::Overall);
    }

    fn apply_sort(&mut self, key: SortKey) {
        let label = self.key_label(&key);
        if self.selection.click_sort(key) {
            let direction = match self.selection.sort_direction() {
                SortDirection::Descending => "descending",
                SortDirection::Ascending => "ascending",
            };
            self.show_flash(format!("Sorted by {} ({})", label, direction));
        } else {
            self.show_flash(format!("Error: {} is not selected", label));
        }
    }

    pub fn clear_sort(&mut self) {
        self.selection.clear_sort();
        self.show_flash("Sort cleared".to_string());
    }

    /// Display label for a sort key
    pub fn key_label(&self, key: &SortKey) -> String {
        match key {
            SortKey::Overall => "Overall".to_string(),
            SortKey::Metric(id) => self
                .catalog
                .get(id)
                .map(|m| m.label.clone())
                .unwrap_or_else(|| id.clone()),
        }
    }

    /// Project on the highlighted row, in displayed order
    pub fn selected_project(&self) -> Option<&Project> {
        let index = self.table_state.selected()?;
        let matrix = self.matrix().ok()?;
        matrix.rows.get(index).map(|row| row.entity)
    }

    pub fn open_picker(&mut self, mode: InputMode) {
        self.picker_cursor = 0;
        self.input_mode = mode;
    }

    fn picker_len(&self) -> usize {
        match self.input_mode {
            InputMode::ProjectPicker => self.projects.len(),
            InputMode::MetricPicker => self.catalog.len(),
            _ => 0,
        }
    }

    pub fn picker_next(&mut self) {
        let len = self.picker_len();
        if len > 0 {
            self.picker_cursor = (self.picker_cursor + 1) % len;
        }
    }

    pub fn picker_previous(&mut self) {
        let len = self.picker_len();
        if len > 0 {
            self.picker_cursor = (self.picker_cursor + len - 1) % len;
        }
    }

    /// Toggle the project or metric under the picker cursor
    pub fn picker_toggle(&mut self) {
        match self.input_mode {
            InputMode::ProjectPicker => {
                if let Some(project) = self.projects.get(self.picker_cursor) {
                    let id = project.id.clone();
                    self.selection.toggle_entity(&id);
                }
            }
            InputMode::MetricPicker => {
                let sorted_before = self.selection.sort_key().is_some();
                if let Some(id) = self.catalog.ids().into_iter().nth(self.picker_cursor) {
                    self.selection.toggle_metric(&id);
                }
                if sorted_before && self.selection.sort_key().is_none() {
                    self.show_flash("Sort cleared (metric deselected)".to_string());
                }
            }
            _ => {}
        }
        self.clamp_cursors();
    }

    pub fn close_popup(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn show_help(&mut self) {
        self.input_mode = InputMode::Help;
    }

    pub fn show_scorecard(&mut self) {
        if self.selected_project().is_some() {
            self.input_mode = InputMode::Scorecard;
        }
    }

    pub fn show_flash(&mut self, msg: String) {
        self.flash_message = Some((msg, Instant::now()));
    }

    pub fn update_flash(&mut self) {
        if let Some((_, timestamp)) = self.flash_message {
            if timestamp.elapsed().as_secs() >= FLASH_SECS {
                self.flash_message = None;
            }
        }
    }

    /// Keep row and column cursors inside the current selection
    fn clamp_cursors(&mut self) {
        let rows = self.row_count();
        match self.table_state.selected() {
            _ if rows == 0 => self.table_state.select(None),
            Some(i) if i >= rows => self.table_state.select(Some(rows - 1)),
            None => self.table_state.select(Some(0)),
            Some(_) => {}
        }
        let columns = self.visible_metric_ids().len() + 1;
        if self.column >= columns {
            self.column = columns - 1;
        }
    }
}
