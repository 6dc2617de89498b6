// Draws the App: shared chrome here, one module per screen body.

pub mod screens;
pub mod widgets;

use crate::app::state::AppScreen;
use crate::app::{App, InputMode};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Tabs, Wrap};
use ratatui::Frame;
use throbber_widgets_tui::{Throbber, BRAILLE_SIX};
use widgets::popup::render_modal;

pub fn ui(app: &App, f: &mut Frame<'_>) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tabs and data source
            Constraint::Min(8),    // Screen body
            Constraint::Length(3), // Status or input prompt
            Constraint::Length(1), // Shortcuts hint
        ])
        .split(f.area().inner(Margin::new(1, 0)));

    render_header(app, f, layout[0]);

    match app.screen {
        AppScreen::Dashboard => screens::dashboard::render_dashboard(app, f, layout[1]),
        AppScreen::Users => screens::users::render_users(app, f, layout[1]),
        AppScreen::Records => screens::records::render_records(app, f, layout[1]),
        AppScreen::Maintenance => screens::maintenance::render_maintenance(app, f, layout[1]),
        AppScreen::Export => screens::export::render_export(app, f, layout[1]),
    }

    if app.input_mode == InputMode::Normal {
        render_status(app, f, layout[2]);
    } else {
        render_input_prompt(app, f, layout[2]);
    }
    render_shortcuts(app, f, layout[3]);

    let full_area = f.area();
    if let Some(modal) = &app.view().modal {
        render_modal(modal, f, full_area);
    }

    if app.show_help {
        screens::help::render_help_popup(f, full_area);
    }
}

fn render_header(app: &App, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title(" Work Record Admin ")
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    f.render_widget(block, area);

    let inner = area.inner(Margin::new(1, 1));
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(40), Constraint::Length(36)])
        .split(inner);

    let titles = AppScreen::ALL
        .iter()
        .enumerate()
        .map(|(index, screen)| TextLine::from(format!("{} {}", index + 1, screen.title())))
        .collect::<Vec<_>>();
    let tabs = Tabs::new(titles)
        .select(app.screen.index())
        .style(Style::default().fg(Color::Gray))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .divider(Span::raw("|"));
    f.render_widget(tabs, columns[0]);

    if app.is_loading() {
        let label = app.busy.clone().unwrap_or_else(|| "Loading".to_string());
        let throbber = Throbber::default()
            .label(label)
            .style(Style::default().fg(Color::Yellow))
            .throbber_set(BRAILLE_SIX);
        let mut state = app.throbber.clone();
        f.render_stateful_widget(throbber, columns[1], &mut state);
    } else {
        let source = Paragraph::new(Span::styled(
            app.source_label.as_str(),
            Style::default().fg(Color::Gray),
        ))
        .alignment(Alignment::Right);
        f.render_widget(source, columns[1]);
    }
}

fn render_status(app: &App, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title(" Status ")
        .title_style(Style::default().fg(Color::Yellow))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let (message, is_error) = app.status_line();

    let style = if is_error {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::Green)
    };

    let paragraph = Paragraph::new(Span::styled(message, style))
        .block(block)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn render_input_prompt(app: &App, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title(format!(" {} ", app.input_mode.prompt()))
        .title_style(Style::default().fg(Color::Green))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));

    let line = TextLine::from(vec![
        Span::styled("> ", Style::default().fg(Color::Green)),
        Span::raw(app.current_input.as_str()),
        Span::styled("_", Style::default().fg(Color::Green)),
    ]);
    f.render_widget(Paragraph::new(line).block(block), area);
}

fn key_span(key: &'static str) -> Span<'static> {
    Span::styled(
        key,
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    )
}

fn render_shortcuts(app: &App, f: &mut Frame<'_>, area: Rect) {
    let screen_keys: &[(&'static str, &'static str)] = match app.screen {
        AppScreen::Dashboard => &[("c", ": Chart   ")],
        AppScreen::Users => &[
            ("/", ": Filter   "),
            ("s", ": Sort   "),
            ("x", ": Clear   "),
            ("d", ": Delete   "),
        ],
        AppScreen::Records => &[
            ("/", ": Search   "),
            ("t", ": Date   "),
            ("f", ": Status   "),
            ("x", ": Clear   "),
        ],
        AppScreen::Maintenance => &[("Enter", ": Run   ")],
        AppScreen::Export => &[("←/→", ": Format   "), ("Enter", ": Export   ")],
    };

    let mut spans = Vec::new();
    for (key, text) in screen_keys {
        spans.push(key_span(key));
        spans.push(Span::raw(*text));
    }
    for (key, text) in [
        ("Tab", ": Screen   "),
        ("r", ": Reload   "),
        ("?", ": Help   "),
        ("q", ": Quit"),
    ] {
        spans.push(key_span(key));
        spans.push(Span::raw(text));
    }

    f.render_widget(
        Paragraph::new(TextLine::from(spans)).alignment(Alignment::Center),
        area,
    );
}
