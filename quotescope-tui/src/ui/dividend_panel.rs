//! Dividend table, scrolled with PageUp/PageDown.

use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::Modifier;
use ratatui::widgets::{Cell, Row, Table};

use quotescope_core::export::dividend_table;
use quotescope_core::DividendSeries;

use crate::app::AppState;
use crate::theme;
use crate::ui::panel_block;

pub fn render(f: &mut Frame, area: Rect, dividends: &DividendSeries, app: &AppState) {
    let labels = app.locale.labels();

    let header = Row::new(vec![
        Cell::from(labels.date_column),
        Cell::from(labels.dividend_column),
    ])
    .style(theme::accent().add_modifier(Modifier::BOLD));

    // Newest first, as a reader scans a payment history.
    let rows: Vec<Row> = dividend_table(dividends)
        .into_iter()
        .rev()
        .skip(app.dividend_scroll)
        .map(|r| {
            Row::new(vec![
                Cell::from(r.date).style(theme::text()),
                Cell::from(format!("{:.4}", r.amount)).style(theme::positive()),
            ])
        })
        .collect();

    let title = format!("{} ({})", labels.dividends_title, dividends.len());
    let table = Table::new(rows, [Constraint::Length(12), Constraint::Min(10)])
        .header(header)
        .block(panel_block(&title));
    f.render_widget(table, area);
}
