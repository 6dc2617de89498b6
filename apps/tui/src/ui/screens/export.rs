use crate::app::App;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;
use worklog_admin::domain::{ExportFormat, ExportSelection};

pub fn render_export(app: &App, f: &mut Frame<'_>, area: Rect) {
    let (selection, format) = app.export_choice();

    let block = Block::default()
        .title(" Export ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));

    let mut lines = vec![TextLine::from(Span::styled(
        "What to export",
        Style::default().add_modifier(Modifier::BOLD),
    ))];

    for option in ExportSelection::ALL {
        let chosen = option == selection;
        let style = if chosen {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        lines.push(TextLine::from(Span::styled(
            format!("{} {}", if chosen { "(*)" } else { "( )" }, option.label()),
            style,
        )));
    }

    lines.push(TextLine::from(""));
    let mut format_line = vec![Span::styled(
        "Format: ",
        Style::default().add_modifier(Modifier::BOLD),
    )];
    for option in ExportFormat::ALL {
        let style = if option == format {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        format_line.push(Span::styled(format!(" {} ", option.label()), style));
        format_line.push(Span::raw(" "));
    }
    lines.push(TextLine::from(format_line));

    lines.push(TextLine::from(""));
    lines.push(TextLine::from(Span::styled(
        "The export runs in the background; the dashboard stays usable.",
        Style::default().fg(Color::Gray),
    )));

    f.render_widget(Paragraph::new(lines).block(block), area);
}
