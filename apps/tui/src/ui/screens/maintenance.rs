use crate::app::state::MAINTENANCE_MENU;
use crate::app::App;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

pub fn render_maintenance(app: &App, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title(" Data management ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta));

    let mut lines = Vec::new();
    for (index, operation) in MAINTENANCE_MENU.iter().enumerate() {
        let selected = index == app.maintenance_index;
        let marker = if selected { "> " } else { "  " };
        let title_style = if selected {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };

        let mut title = vec![Span::styled(
            format!("{marker}{}", operation.title()),
            title_style,
        )];
        if operation.is_destructive() {
            title.push(Span::styled(
                "  (asks for confirmation)",
                Style::default().fg(Color::Red),
            ));
        }

        lines.push(TextLine::from(title));
        lines.push(TextLine::from(Span::styled(
            format!("    {}", operation.description()),
            Style::default().fg(Color::Gray),
        )));
        lines.push(TextLine::from(""));
    }

    lines.push(TextLine::from(Span::styled(
        "Delete a single user from the Users screen with d.",
        Style::default().fg(Color::Gray),
    )));

    f.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        area,
    );
}
