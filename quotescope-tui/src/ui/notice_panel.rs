use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};

use quotescope_core::QueryReport;

use crate::theme;
use crate::ui::panel_block;

pub fn render(f: &mut Frame, area: Rect, report: &QueryReport) {
    let lines: Vec<Line> = report
        .notices
        .iter()
        .map(|n| Line::from(Span::styled(n.message.as_str(), theme::notice(n.level))))
        .collect();
    let para = Paragraph::new(lines)
        .block(panel_block(&report.selection.identifier))
        .wrap(Wrap { trim: true });
    f.render_widget(para, area);
}
