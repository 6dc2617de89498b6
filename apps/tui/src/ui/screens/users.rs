use crate::app::App;
use crate::ui::widgets::tables::render_table_model;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;
use worklog_admin::view::{TableKind, UserDetail};

pub fn render_users(app: &App, f: &mut Frame<'_>, area: Rect) {
    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
        .split(area);

    let mut title = String::from("Users");
    if !app.controller.user_filter().is_empty() {
        title.push_str(&format!(" matching \"{}\"", app.controller.user_filter()));
    }
    if let Some(key) = app.controller.user_sort() {
        title.push_str(&format!(", by {}", key.label().to_lowercase()));
    }

    render_table_model(
        f,
        layout[0],
        &title,
        app.table(TableKind::Users),
        app.selected_user_index,
    );

    let detail = app
        .selected_user_name()
        .and_then(|name| app.controller.user_detail(&name));
    render_user_detail(detail.as_ref(), f, layout[1]);
}

fn render_user_detail(detail: Option<&UserDetail>, f: &mut Frame<'_>, area: Rect) {
    let title = detail.map_or_else(|| " Details ".to_string(), |detail| format!(" {} ", detail.name));
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));

    let Some(detail) = detail else {
        f.render_widget(Paragraph::new("No user selected").block(block), area);
        return;
    };

    let mut lines: Vec<TextLine<'_>> = detail
        .fields
        .iter()
        .map(|(label, value)| {
            TextLine::from(vec![
                Span::styled(format!("{label}: "), Style::default().fg(Color::Gray)),
                Span::raw(value.as_str()),
            ])
        })
        .collect();

    lines.push(TextLine::from(""));
    lines.push(TextLine::from(Span::styled(
        "Recent work",
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    )));
    if detail.recent_work.is_empty() {
        lines.push(TextLine::from(Span::styled(
            "No records",
            Style::default().fg(Color::DarkGray),
        )));
    } else {
        lines.extend(detail.recent_work.iter().map(|line| TextLine::from(line.as_str())));
    }

    f.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        area,
    );
}
