//! Closing price line chart and, when anything traded, a volume bar chart.

use chrono::NaiveDateTime;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::symbols;
use ratatui::text::Span;
use ratatui::widgets::{Axis, Chart, Dataset, GraphType};

use quotescope_core::{Locale, QueryReport};

use crate::theme;
use crate::ui::panel_block;

pub fn render(f: &mut Frame, area: Rect, report: &QueryReport, locale: Locale) {
    let labels = locale.labels();
    let Some(closes) = &report.price_chart else {
        return;
    };

    match &report.volume_chart {
        Some(volumes) => {
            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
                .split(area);
            render_line(f, rows[0], labels.price_chart_title, closes);
            let bars: Vec<(NaiveDateTime, f64)> =
                volumes.iter().map(|(ts, v)| (*ts, *v as f64)).collect();
            render_bars(f, rows[1], labels.volume_chart_title, &bars);
        }
        None => render_line(f, area, labels.price_chart_title, closes),
    }
}

fn render_line(f: &mut Frame, area: Rect, title: &str, points: &[(NaiveDateTime, f64)]) {
    let data = to_xy(points);
    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .style(Style::default().fg(theme::ACCENT))
        .graph_type(GraphType::Line)
        .data(&data);
    render_chart(f, area, title, dataset, points, 2);
}

fn render_bars(f: &mut Frame, area: Rect, title: &str, points: &[(NaiveDateTime, f64)]) {
    let data = to_xy(points);
    let dataset = Dataset::default()
        .marker(symbols::Marker::HalfBlock)
        .style(Style::default().fg(theme::NEUTRAL))
        .graph_type(GraphType::Bar)
        .data(&data);
    render_chart(f, area, title, dataset, points, 0);
}

fn render_chart(
    f: &mut Frame,
    area: Rect,
    title: &str,
    dataset: Dataset<'_>,
    points: &[(NaiveDateTime, f64)],
    precision: usize,
) {
    let [x_min, x_max] = x_bounds(points);
    let [y_min, y_max] = y_bounds(points.iter().map(|(_, v)| *v), precision == 0);
    let (first, last) = time_labels(points);

    let chart = Chart::new(vec![dataset])
        .block(panel_block(title))
        .x_axis(
            Axis::default()
                .style(theme::muted())
                .bounds([x_min, x_max])
                .labels(vec![
                    Span::styled(first, theme::muted()),
                    Span::styled(last, theme::muted()),
                ]),
        )
        .y_axis(
            Axis::default()
                .style(theme::muted())
                .bounds([y_min, y_max])
                .labels(vec![
                    Span::styled(format!("{y_min:.precision$}"), theme::muted()),
                    Span::styled(format!("{y_max:.precision$}"), theme::muted()),
                ]),
        );
    f.render_widget(chart, area);
}

/// Points on a time-proportional x axis (seconds since the epoch, wall clock).
pub fn to_xy(points: &[(NaiveDateTime, f64)]) -> Vec<(f64, f64)> {
    points
        .iter()
        .map(|(ts, v)| (ts.and_utc().timestamp() as f64, *v))
        .collect()
}

pub fn x_bounds(points: &[(NaiveDateTime, f64)]) -> [f64; 2] {
    let xs = to_xy(points);
    match (xs.first(), xs.last()) {
        (Some(a), Some(b)) if b.0 > a.0 => [a.0, b.0],
        (Some(a), _) => [a.0 - 1.0, a.0 + 1.0],
        _ => [0.0, 1.0],
    }
}

/// Value range padded by 5%. Bar charts start at zero.
pub fn y_bounds(values: impl Iterator<Item = f64>, from_zero: bool) -> [f64; 2] {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !min.is_finite() || !max.is_finite() {
        return [0.0, 1.0];
    }
    let padding = match (max - min).abs() * 0.05 {
        p if p > 0.0 => p,
        _ => max.abs().max(1.0) * 0.05,
    };
    if from_zero {
        [0.0, max + padding]
    } else {
        [min - padding, max + padding]
    }
}

/// First and last axis labels: clock time within a single day, dates otherwise.
pub fn time_labels(points: &[(NaiveDateTime, f64)]) -> (String, String) {
    let (Some((first, _)), Some((last, _))) = (points.first(), points.last()) else {
        return (String::new(), String::new());
    };
    let fmt = if first.date() == last.date() {
        "%H:%M"
    } else {
        "%d/%m/%Y"
    };
    (first.format(fmt).to_string(), last.format(fmt).to_string())
}
