//! Bottom status bar: key hints and the last status message.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::{AppState, StatusLevel};
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let labels = app.locale.labels();
    let mut spans: Vec<Span> = Vec::new();

    spans.push(Span::styled(format!(" {}", labels.key_hints), theme::muted()));
    if app.report.as_ref().is_some_and(|r| r.export.is_some()) {
        spans.push(Span::styled(
            format!(" Ctrl+S:{}", labels.download_action),
            theme::positive(),
        ));
    }
    spans.push(Span::styled(format!(" {}", labels.quit_hint), theme::muted()));

    spans.push(Span::raw(" | "));

    if let Some((msg, level)) = &app.status_message {
        let style = match level {
            StatusLevel::Info => theme::accent(),
            StatusLevel::Warning => theme::warning(),
            StatusLevel::Error => theme::negative(),
        };
        spans.push(Span::styled(msg.as_str(), style));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
