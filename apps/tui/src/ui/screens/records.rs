use crate::app::App;
use crate::ui::widgets::tables::render_table_model;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;
use worklog_admin::domain::WorkRecordGroup;
use worklog_admin::view::{format_rate, TableKind};

pub fn render_records(app: &App, f: &mut Frame<'_>, area: Rect) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(7)])
        .split(area);

    let title = app
        .controller
        .record_filter()
        .describe()
        .map_or_else(|| "Work records".to_string(), |filter| format!("Work records {filter}"));

    render_table_model(
        f,
        layout[0],
        &title,
        app.table(TableKind::Records),
        app.selected_record_index,
    );

    let displayed = app.controller.displayed_records();
    render_entry_details(displayed.get(app.selected_record_index), f, layout[1]);
}

/// Per-entry breakdown of the selected group, remarks included.
fn render_entry_details(group: Option<&WorkRecordGroup>, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title(" Entries ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));

    let lines: Vec<TextLine<'_>> = group.map_or_else(Vec::new, |group| {
        group
            .entries
            .iter()
            .map(|entry| {
                let mut spans = vec![
                    Span::styled(
                        entry.work_content.as_str(),
                        Style::default().fg(Color::Cyan),
                    ),
                    Span::raw(format!(
                        "  {}/{} ok, {} failed, {}",
                        entry.success_count,
                        entry.data_count,
                        entry.fail_count,
                        format_rate(entry.success_rate)
                    )),
                ];
                if let Some(remark) = &entry.remark {
                    spans.push(Span::styled(
                        format!("  ({remark})"),
                        Style::default().fg(Color::Gray),
                    ));
                }
                TextLine::from(spans)
            })
            .collect()
    });

    f.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        area,
    );
}
