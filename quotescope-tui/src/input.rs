//! Keyboard input dispatch: global keys → focused field.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{AppState, Field};

/// Handle a key event. Clears `app.running` on quit.
pub fn handle_key(app: &mut AppState, key: KeyEvent) {
    // Only handle key press events (Windows sends both Press and Release).
    if key.kind != KeyEventKind::Press {
        return;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    // 1. Global keys (always available, even while typing).
    match key.code {
        KeyCode::Esc => {
            app.running = false;
            return;
        }
        KeyCode::Char('c') if ctrl => {
            app.running = false;
            return;
        }
        KeyCode::Char('s') if ctrl => {
            app.download();
            return;
        }
        KeyCode::Enter => {
            app.trigger();
            return;
        }
        KeyCode::Tab => {
            app.form.focus = if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.form.focus.prev()
            } else {
                app.form.focus.next()
            };
            return;
        }
        KeyCode::BackTab => {
            app.form.focus = app.form.focus.prev();
            return;
        }
        KeyCode::PageDown => {
            let rows = app
                .report
                .as_ref()
                .and_then(|r| r.dividend_table.as_ref())
                .map_or(0, |t| t.len());
            if app.dividend_scroll + 1 < rows {
                app.dividend_scroll += 1;
            }
            return;
        }
        KeyCode::PageUp => {
            app.dividend_scroll = app.dividend_scroll.saturating_sub(1);
            return;
        }
        _ => {}
    }

    // 2. Field-specific keys.
    match app.form.focus {
        Field::Identifier => handle_identifier_key(app, key),
        Field::Frequency => handle_frequency_key(app, key),
        Field::Span => handle_span_key(app, key),
        Field::Fetch => handle_fetch_key(app, key),
    }
}

fn handle_identifier_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Backspace => {
            app.form.identifier.pop();
        }
        KeyCode::Down => app.form.focus = Field::Frequency,
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.form.identifier.push(c);
        }
        _ => {}
    }
}

fn handle_frequency_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Right | KeyCode::Char('l') => app.form.frequency = app.form.frequency.next(),
        KeyCode::Left | KeyCode::Char('h') => app.form.frequency = app.form.frequency.prev(),
        KeyCode::Up | KeyCode::Char('k') => app.form.focus = Field::Identifier,
        KeyCode::Down | KeyCode::Char('j') => app.form.focus = Field::Span,
        _ => {}
    }
}

fn handle_span_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Right | KeyCode::Char('l') => app.form.span = app.form.span.next(),
        KeyCode::Left | KeyCode::Char('h') => app.form.span = app.form.span.prev(),
        KeyCode::Up | KeyCode::Char('k') => app.form.focus = Field::Frequency,
        KeyCode::Down | KeyCode::Char('j') => app.form.focus = Field::Fetch,
        _ => {}
    }
}

fn handle_fetch_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Char(' ') => app.trigger(),
        KeyCode::Char('d') => app.download(),
        KeyCode::Up | KeyCode::Char('k') => app.form.focus = Field::Span,
        KeyCode::Char('q') => app.running = false,
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;
    use quotescope_core::{
        Frequency, InputSelection, Locale, Span, SpreadsheetExporter, StaticProvider,
    };

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app(dir: &std::path::Path) -> AppState {
        AppState::new(
            Box::new(StaticProvider::demo()),
            SpreadsheetExporter::new(dir, Locale::English),
            Locale::English,
            &InputSelection::default(),
            dir.join("downloads"),
            dir.join("state.json"),
        )
    }

    #[test]
    fn typing_edits_identifier() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path());
        for _ in 0..4 {
            handle_key(&mut app, press(KeyCode::Backspace));
        }
        for c in "btc-usd".chars() {
            handle_key(&mut app, press(KeyCode::Char(c)));
        }
        assert_eq!(app.form.identifier, "btc-usd");
    }

    #[test]
    fn q_types_into_identifier_instead_of_quitting() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path());
        handle_key(&mut app, press(KeyCode::Char('q')));
        assert!(app.running);
        assert_eq!(app.form.identifier, "AAPLq");
    }

    #[test]
    fn selectors_cycle_with_arrows() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path());
        handle_key(&mut app, press(KeyCode::Tab));
        handle_key(&mut app, press(KeyCode::Right));
        assert_eq!(app.form.frequency, Frequency::Weekly);
        handle_key(&mut app, press(KeyCode::Tab));
        handle_key(&mut app, press(KeyCode::Left));
        assert_eq!(app.form.span, Span::Max);
    }

    #[test]
    fn enter_triggers_and_page_keys_scroll_dividends() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path());
        handle_key(&mut app, press(KeyCode::Enter));
        assert!(app.report.is_some());
        for _ in 0..10 {
            handle_key(&mut app, press(KeyCode::PageDown));
        }
        assert_eq!(app.dividend_scroll, 3);
        handle_key(&mut app, press(KeyCode::PageUp));
        assert_eq!(app.dividend_scroll, 2);
    }

    #[test]
    fn ctrl_c_and_esc_quit() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path());
        handle_key(
            &mut app,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        );
        assert!(!app.running);

        let mut app2 = self::app(dir.path());
        handle_key(&mut app2, press(KeyCode::Esc));
        assert!(!app2.running);
    }

    #[test]
    fn release_events_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path());
        let mut key = press(KeyCode::Esc);
        key.kind = KeyEventKind::Release;
        key.state = KeyEventState::NONE;
        handle_key(&mut app, key);
        assert!(app.running);
    }
}
