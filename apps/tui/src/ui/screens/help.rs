use crate::ui::widgets::popup::{centered_rect, ClearWidget};
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

const SHORTCUTS: [(&str, &str); 14] = [
    ("1-5 / Tab", "Switch screen"),
    ("r", "Reload every panel"),
    ("c", "Overview: switch chart"),
    ("/", "Users and records: filter by text"),
    ("s", "Users: cycle sort (rate, records, name, stored)"),
    ("d", "Users: delete the selected user"),
    ("t", "Records: show one date"),
    ("f", "Records: filter by status"),
    ("x", "Clear the current filter"),
    ("↑/↓ PgUp/PgDn", "Move the selection"),
    ("Enter", "Run the selected action"),
    ("y / n", "Answer a confirmation"),
    ("? / F1", "Toggle this help"),
    ("q", "Quit"),
];

pub fn render_help_popup(f: &mut Frame<'_>, area: Rect) {
    let popup_area = centered_rect(70, 80, area);
    f.render_widget(ClearWidget, popup_area);

    let help_block = Block::default()
        .title("== Help & Keyboard Shortcuts ==")
        .title_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let mut lines = vec![
        TextLine::from(Span::styled(
            "Work Record Admin",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        TextLine::from(
            "Panels that cannot reach the API show sample data, marked [sample] on the overview.",
        ),
        TextLine::from(""),
    ];

    for (key, action) in SHORTCUTS {
        lines.push(TextLine::from(vec![
            Span::styled(
                format!("  {key:<16}"),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(action),
        ]));
    }

    f.render_widget(
        Paragraph::new(Text::from(lines))
            .block(help_block)
            .wrap(Wrap { trim: false }),
        popup_area,
    );

    let hint = Paragraph::new(Span::styled(
        "Press ? or Esc to close",
        Style::default().fg(Color::Gray),
    ))
    .alignment(Alignment::Center);

    let hint_area = Rect {
        x: popup_area.x,
        y: popup_area.y + popup_area.height.saturating_sub(2),
        width: popup_area.width,
        height: 1,
    };

    f.render_widget(hint, hint_area);
}
