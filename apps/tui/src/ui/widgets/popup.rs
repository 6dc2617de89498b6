use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::Buffer;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Widget, Wrap};
use ratatui::Frame;
use worklog_admin::view::{Modal, ModalKind};

pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1]);

    horizontal_layout[1]
}

pub struct ClearWidget;

impl Widget for ClearWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        ratatui::widgets::Clear.render(area, buf);
    }
}

const fn modal_color(kind: ModalKind) -> Color {
    match kind {
        ModalKind::Confirm => Color::Yellow,
        ModalKind::Info => Color::Green,
        ModalKind::Error => Color::Red,
    }
}

const fn modal_hint(kind: ModalKind) -> &'static str {
    match kind {
        ModalKind::Confirm => "y / Enter: confirm    n / Esc: cancel",
        ModalKind::Info | ModalKind::Error => "Enter / Esc: close",
    }
}

pub fn render_modal(modal: &Modal, f: &mut Frame<'_>, area: Rect) {
    let popup_area = centered_rect(60, 35, area);
    f.render_widget(ClearWidget, popup_area);

    let color = modal_color(modal.kind);
    let block = Block::default()
        .title(format!(" {} ", modal.title))
        .title_style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color));

    let text = Text::from(vec![
        TextLine::from(modal.body.as_str()),
        TextLine::from(""),
        TextLine::from(Span::styled(
            modal_hint(modal.kind),
            Style::default().fg(Color::Gray),
        )),
    ]);

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    f.render_widget(paragraph, popup_area);
}
