pub mod app;
pub mod event;
pub mod theme;
pub mod ui;

pub use app::App;
pub use theme::{resolve_theme, Theme, ThemeColors};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use event::{Event, EventHandler};

use app::InputMode;

pub async fn run_tui(mut app: App) -> anyhow::Result<()> {
    // Queue diagnostics while the TUI owns the terminal
    crate::diagnostics::hold();

    // Sets up panic hooks that restore the terminal
    let mut terminal = ratatui::init();
    let mut events = EventHandler::new(250);

    let result = loop {
        if let Err(e) = terminal.draw(|frame| ui::draw(frame, &mut app)) {
            break Err(e.into());
        }

        match events.next().await {
            Event::Key(key) => handle_key_event(&mut app, key),
            Event::Tick => app.update_flash(),
        }

        if app.should_quit {
            break Ok(());
        }
    };

    ratatui::restore();

    for msg in crate::diagnostics::release() {
        eprintln!("{}", msg);
    }

    result
}

fn handle_key_event(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    match app.input_mode {
        InputMode::Normal => match key.code {
            KeyCode::Char('q') => app.should_quit = true,

            KeyCode::Char('j') | KeyCode::Down => app.next_row(),
            KeyCode::Char('k') | KeyCode::Up => app.previous_row(),
            KeyCode::Char('l') | KeyCode::Right | KeyCode::Tab => app.next_column(),
            KeyCode::Char('h') | KeyCode::Left | KeyCode::BackTab => app.previous_column(),

            KeyCode::Enter | KeyCode::Char('s') => app.sort_focused(),
            KeyCode::Char('o') => app.sort_overall(),
            KeyCode::Char('c') => app.clear_sort(),

            KeyCode::Char('p') => app.open_picker(InputMode::ProjectPicker),
            KeyCode::Char('m') => app.open_picker(InputMode::MetricPicker),

            KeyCode::Char('b') => app.show_scorecard(),
            KeyCode::Char('?') => app.show_help(),
            _ => {}
        },
        InputMode::ProjectPicker | InputMode::MetricPicker => match key.code {
            KeyCode::Char('j') | KeyCode::Down => app.picker_next(),
            KeyCode::Char('k') | KeyCode::Up => app.picker_previous(),
            KeyCode::Char(' ') | KeyCode::Enter => app.picker_toggle(),
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('p') | KeyCode::Char('m') => {
                app.close_popup()
            }
            _ => {}
        },
        InputMode::Scorecard => match key.code {
            KeyCode::Esc | KeyCode::Char('b') | KeyCode::Char('q') => app.close_popup(),
            KeyCode::Char('j') | KeyCode::Down => app.next_row(),
            KeyCode::Char('k') | KeyCode::Up => app.previous_row(),
            _ => {}
        },
        // Any key closes help
        InputMode::Help => app.close_popup(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparison::SelectionState;
    use crate::portfolio::generate_portfolio;
    use crate::scoring::{build_catalog, ScoringConfig, SortDirection, SortKey};

    fn app() -> App {
        let portfolio = generate_portfolio(3, 5);
        let catalog = build_catalog(&ScoringConfig::default()).unwrap();
        let selection = SelectionState::with_defaults(&portfolio.ids(), &catalog.ids(), 3, 8);
        App::new(portfolio.projects, catalog, selection, ThemeColors::dark())
    }

    fn press(app: &mut App, code: KeyCode) {
        handle_key_event(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn test_sort_keys() {
        let mut app = app();
        press(&mut app, KeyCode::Char('l'));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.selection.sort_key(), Some(&SortKey::Metric("burn-rate".to_string())));
        press(&mut app, KeyCode::Char('s'));
        assert_eq!(app.selection.sort_direction(), SortDirection::Ascending);
        press(&mut app, KeyCode::Char('o'));
        assert_eq!(app.selection.sort_key(), Some(&SortKey::Overall));
        press(&mut app, KeyCode::Char('c'));
        assert!(app.selection.sort_key().is_none());
    }

    #[test]
    fn test_metric_picker_space_toggles() {
        let mut app = app();
        press(&mut app, KeyCode::Char('m'));
        assert_eq!(app.input_mode, InputMode::MetricPicker);
        press(&mut app, KeyCode::Char(' '));
        assert!(!app.selection.is_metric_selected("revenue-growth"));
        // 'q' closes the picker instead of quitting
        press(&mut app, KeyCode::Char('q'));
        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(!app.should_quit);
    }

    #[test]
    fn test_help_closes_on_any_key() {
        let mut app = app();
        press(&mut app, KeyCode::Char('?'));
        assert_eq!(app.input_mode, InputMode::Help);
        press(&mut app, KeyCode::Char('x'));
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn test_quit() {
        let mut app = app();
        handle_key_event(&mut app, KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }
}
