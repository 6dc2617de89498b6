use crate::app::App;
use crate::ui::widgets::charts::{rate_color, render_chart_panel, render_chart_tabs};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;
use worklog_admin::domain::{EntityKind, Origin};

pub fn render_dashboard(app: &App, f: &mut Frame<'_>, area: Rect) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Stat cards
            Constraint::Length(1), // Data origins
            Constraint::Length(1), // Chart tabs
            Constraint::Min(6),    // Chart + activity
        ])
        .split(area);

    let lower = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(layout[3]);

    render_stat_cards(app, f, layout[0]);
    render_origins(app, f, layout[1]);
    render_chart_tabs(app.chart_tab_index, f, layout[2]);
    render_chart_panel(&app.view().charts, app.chart_tab_index, f, lower[0]);
    render_recent_activity(app, f, lower[1]);
}

fn render_recent_activity(app: &App, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title(" Recent activity ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));

    let visible = usize::from(area.height.saturating_sub(2));
    let lines: Vec<TextLine<'_>> = app
        .view()
        .activity
        .iter()
        .take(visible)
        .map(|item| {
            let color = if item.failed { Color::Red } else { Color::White };
            TextLine::from(vec![
                Span::styled(format!("{} ", item.time), Style::default().fg(Color::DarkGray)),
                Span::styled(format!("{:<6} ", item.kind), Style::default().fg(Color::Cyan)),
                Span::styled(item.message.as_str(), Style::default().fg(color)),
            ])
        })
        .collect();

    if lines.is_empty() {
        f.render_widget(
            Paragraph::new("Nothing yet").block(block).alignment(Alignment::Center),
            area,
        );
    } else {
        f.render_widget(Paragraph::new(lines).block(block), area);
    }
}

fn render_stat_cards(app: &App, f: &mut Frame<'_>, area: Rect) {
    let cards = &app.view().stats;
    if cards.is_empty() {
        let paragraph = Paragraph::new("Waiting for data...")
            .block(Block::default().borders(Borders::ALL))
            .alignment(Alignment::Center);
        f.render_widget(paragraph, area);
        return;
    }

    let count = u32::try_from(cards.len()).unwrap_or(1);
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(cards.iter().map(|_| Constraint::Ratio(1, count)))
        .split(area);

    for (card, column) in cards.iter().zip(columns.iter()) {
        let value_style = if card.label == "Success rate" {
            let rate = card.value.trim_end_matches('%').parse().unwrap_or(0.0);
            Style::default().fg(rate_color(rate))
        } else {
            Style::default().fg(Color::White)
        };

        let text = Text::from(vec![
            TextLine::from(Span::styled(
                card.value.as_str(),
                value_style.add_modifier(Modifier::BOLD),
            )),
            TextLine::from(Span::styled(card.label, Style::default().fg(Color::Gray))),
        ]);

        let paragraph = Paragraph::new(text)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .alignment(Alignment::Center);
        f.render_widget(paragraph, *column);
    }
}

fn render_origins(app: &App, f: &mut Frame<'_>, area: Rect) {
    let origins = app.controller.origins();
    let mut spans = vec![Span::styled("Data: ", Style::default().fg(Color::Gray))];

    for kind in EntityKind::ALL {
        let origin = origins.get(kind);
        let color = match origin {
            Origin::Live => Color::Green,
            Origin::Fallback => Color::Yellow,
        };
        spans.push(Span::raw(format!("{} ", kind.label())));
        spans.push(Span::styled(
            format!("[{}]  ", origin.as_str()),
            Style::default().fg(color),
        ));
    }

    f.render_widget(Paragraph::new(TextLine::from(spans)), area);
}
