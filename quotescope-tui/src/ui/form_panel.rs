//! The query form: identifier input, two selectors and the fetch action.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::{AppState, Field};
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let labels = app.locale.labels();
    let form = &app.form;
    let focused = |field: Field| form.focus == field;

    let cursor = if focused(Field::Identifier) { "_" } else { "" };
    let lines = vec![
        row(
            labels.identifier_prompt,
            format!(" {}{cursor} ", form.identifier),
            focused(Field::Identifier),
        ),
        row(
            labels.frequency_prompt,
            format!(" ◂ {} ▸ ", form.frequency.label(app.locale)),
            focused(Field::Frequency),
        ),
        row(
            labels.span_prompt,
            format!(" ◂ {} ▸ ", form.span.label(app.locale)),
            focused(Field::Span),
        ),
        Line::from(vec![
            Span::raw(format!("{:>24}", "")),
            Span::styled(
                format!("[ {} ]", labels.fetch_action),
                theme::field(focused(Field::Fetch)),
            ),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(true))
        .title(format!(" {} ", app.provider_name()))
        .title_style(theme::panel_title(true));
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn row(prompt: &str, value: String, focused: bool) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{prompt:>22}: "), theme::muted()),
        Span::styled(value, theme::field(focused)),
    ])
}
