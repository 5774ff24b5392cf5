//! Top-level UI layout: header, form, results area and status bar.

pub mod chart_panel;
pub mod dividend_panel;
pub mod form_panel;
pub mod notice_panel;
pub mod status_bar;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::app::AppState;
use crate::theme;

/// Draw the entire UI.
pub fn draw(f: &mut Frame, app: &AppState) {
    f.render_widget(
        Block::default().style(Style::default().bg(theme::BACKGROUND)),
        f.area(),
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(6),
            Constraint::Min(6),
            Constraint::Length(1),
        ])
        .split(f.area());

    draw_header(f, chunks[0], app);
    form_panel::render(f, chunks[1], app);
    draw_results(f, chunks[2], app);
    status_bar::render(f, chunks[3], app);
}

fn draw_header(f: &mut Frame, area: Rect, app: &AppState) {
    let labels = app.locale.labels();
    let lines = vec![
        Line::from(Span::styled(labels.title, theme::panel_title(true))),
        Line::from(Span::styled(labels.subtitle, theme::muted())),
    ];
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), area);
}

/// Charts on the left; notices and the dividend table on the right.
fn draw_results(f: &mut Frame, area: Rect, app: &AppState) {
    let Some(report) = &app.report else {
        render_placeholder(f, area, app);
        return;
    };

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(area);

    chart_panel::render(f, columns[0], report, app.locale);

    let right = match &report.dividend_table {
        Some(_) => Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(notice_height(report)), Constraint::Min(4)])
            .split(columns[1]),
        None => Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3)])
            .split(columns[1]),
    };
    notice_panel::render(f, right[0], report);
    if let Some(table) = &report.dividend_table {
        dividend_panel::render(f, right[1], table, app);
    }
}

fn notice_height(report: &quotescope_core::QueryReport) -> u16 {
    // Borders plus one line per notice, with room for a wrapped line or two.
    (report.notices.len() as u16 * 2 + 2).min(10)
}

fn render_placeholder(f: &mut Frame, area: Rect, app: &AppState) {
    let labels = app.locale.labels();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(false));
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("Enter: {}", labels.fetch_action),
            theme::muted(),
        )),
    ];
    f.render_widget(Paragraph::new(lines).block(block), area);
}

/// Titled, bordered block shared by the result panels.
pub fn panel_block(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(false))
        .title(format!(" {title} "))
        .title_style(theme::panel_title(false))
}
