use std::cell::RefCell;
use std::io;
use std::rc::Rc;

use ratzilla::ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Margin, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line as TextLine, Span, Text},
    widgets::{
        Axis, Bar, BarChart, BarGroup, Block, Borders, Cell, Chart, Dataset, GraphType,
        Paragraph, Row, Scrollbar, ScrollbarOrientation, ScrollbarState, Table, Tabs,
    },
    Frame, Terminal,
};
use ratzilla::{DomBackend, WebRenderer};
use worklog_core::{daily_success_rates, format_rate, DashboardSnapshot, RateBand};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Request, RequestInit, RequestMode, Response};

const SNAPSHOT_FILE: &str = "dashboard.json";
const TABLE_TABS: [&str; 2] = ["Users", "Work records"];

enum LoadState {
    Loading,
    Loaded(DashboardSnapshot),
    Failed(String),
}

fn main() -> io::Result<()> {
    let data = Rc::new(RefCell::new(LoadState::Loading));
    let tab_index = Rc::new(RefCell::new(0_usize));
    let row_offset = Rc::new(RefCell::new(0_usize));

    spawn_local(fetch_snapshot(data.clone()));

    let backend = DomBackend::new()?;
    let mut terminal = Terminal::new(backend)?;

    terminal.on_key_event({
        let tab_index = tab_index.clone();
        let row_offset = row_offset.clone();
        move |event| match event.code {
            ratzilla::event::KeyCode::Left | ratzilla::event::KeyCode::Right => {
                let mut index = tab_index.borrow_mut();
                *index = (*index + 1) % TABLE_TABS.len();
                *row_offset.borrow_mut() = 0;
            }
            ratzilla::event::KeyCode::Up => {
                let mut offset = row_offset.borrow_mut();
                *offset = offset.saturating_sub(1);
            }
            ratzilla::event::KeyCode::Down => {
                let mut offset = row_offset.borrow_mut();
                *offset = (*offset + 1).min(2000);
            }
            ratzilla::event::KeyCode::Char('1') => {
                *tab_index.borrow_mut() = 0;
                *row_offset.borrow_mut() = 0;
            }
            ratzilla::event::KeyCode::Char('2') => {
                *tab_index.borrow_mut() = 1;
                *row_offset.borrow_mut() = 0;
            }
            _ => {}
        }
    });

    terminal.draw_web(move |f| {
        let area = f.area();
        let block = Block::default()
            .title("Work Record Admin")
            .title_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Gray));
        let inner = block.inner(area).inner(Margin::new(1, 1));
        f.render_widget(block, area);

        match &*data.borrow() {
            LoadState::Loaded(snapshot) => {
                render_dashboard(snapshot, *tab_index.borrow(), *row_offset.borrow(), f, inner);
            }
            LoadState::Loading => {
                let paragraph = Paragraph::new(format!("Loading {SNAPSHOT_FILE}..."))
                    .alignment(Alignment::Center);
                f.render_widget(paragraph, inner);
            }
            LoadState::Failed(reason) => {
                let paragraph = Paragraph::new(Text::from(vec![
                    TextLine::from(Span::styled(
                        format!("Could not load {SNAPSHOT_FILE}"),
                        Style::default().fg(Color::Red),
                    )),
                    TextLine::from(reason.as_str()),
                    TextLine::from("Generate it with: worklog-admin --json > dashboard.json"),
                ]))
                .alignment(Alignment::Center);
                f.render_widget(paragraph, inner);
            }
        }
    });

    Ok(())
}

fn render_dashboard(
    snapshot: &DashboardSnapshot,
    tab_index: usize,
    row_offset: usize,
    f: &mut Frame<'_>,
    area: Rect,
) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Percentage(40),
            Constraint::Length(1),
            Constraint::Min(6),
        ])
        .split(area);

    let charts = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(layout[1]);

    render_header(snapshot, f, layout[0]);
    render_user_rates(snapshot, f, charts[0]);
    render_daily_trend(snapshot, f, charts[1]);

    let tabs = Tabs::new(TABLE_TABS.iter().map(|title| TextLine::from(*title)))
        .select(tab_index)
        .style(Style::default().fg(Color::Gray))
        .highlight_style(
            Style::default()
                .fg(Color::White)
                .bg(Color::Rgb(0, 0, 238))
                .add_modifier(Modifier::BOLD),
        )
        .divider(Span::raw("|"));
    f.render_widget(tabs, layout[2]);

    if tab_index == 0 {
        render_users(snapshot, row_offset, f, layout[3]);
    } else {
        render_records(snapshot, row_offset, f, layout[3]);
    }
}

fn render_header(snapshot: &DashboardSnapshot, f: &mut Frame<'_>, area: Rect) {
    let stats = &snapshot.stats;
    let mut spans = vec![Span::styled(
        format!(
            "Users: {}  Active (est.): {}  Records: {}  Successful: {}  Rate: {}",
            stats.total_users,
            stats.active_users(),
            stats.total_records,
            stats.total_success,
            format_rate(stats.success_rate)
        ),
        Style::default().fg(Color::White),
    )];
    if snapshot.origins.any_sample() {
        spans.push(Span::styled(
            "  [includes sample data]",
            Style::default().fg(Color::Yellow),
        ));
    }

    let paragraph = Paragraph::new(TextLine::from(spans)).block(
        Block::default()
            .title("Overview")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(paragraph, area);
}

fn rate_color(rate: f64) -> Color {
    match RateBand::of(rate) {
        RateBand::Good => Color::Green,
        RateBand::Fair => Color::Yellow,
        RateBand::Poor => Color::Red,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn render_user_rates(snapshot: &DashboardSnapshot, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title("Success rate by user")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));

    if snapshot.users.is_empty() {
        let paragraph = Paragraph::new("No users available")
            .block(block)
            .alignment(Alignment::Center);
        f.render_widget(paragraph, area);
        return;
    }

    let bars: Vec<Bar<'_>> = snapshot
        .users
        .iter()
        .map(|user| {
            Bar::default()
                .value(user.success_rate.round().clamp(0.0, 100.0) as u64)
                .label(TextLine::from(user.name.as_str()))
                .style(Style::default().fg(rate_color(user.success_rate)))
                .value_style(Style::default().fg(Color::Black).add_modifier(Modifier::BOLD))
        })
        .collect();

    let chart = BarChart::default()
        .block(block)
        .data(BarGroup::default().bars(&bars))
        .max(100)
        .bar_gap(1)
        .bar_width(6);
    f.render_widget(chart, area);
}

/// Chart points for the daily trend (day index, rate) plus the first and
/// last day as axis labels.
#[allow(clippy::cast_precision_loss)]
fn trend_points(snapshot: &DashboardSnapshot) -> (Vec<(f64, f64)>, Vec<String>) {
    let rates = daily_success_rates(&snapshot.records);
    let points = rates
        .iter()
        .enumerate()
        .map(|(index, (_, rate))| (index as f64, *rate))
        .collect();

    let labels = match (rates.first(), rates.last()) {
        (Some((first, _)), Some((last, _))) if first != last => vec![
            first.format("%m-%d").to_string(),
            last.format("%m-%d").to_string(),
        ],
        (Some((only, _)), _) => vec![only.format("%m-%d").to_string()],
        _ => Vec::new(),
    };
    (points, labels)
}

#[allow(clippy::cast_precision_loss)]
fn render_daily_trend(snapshot: &DashboardSnapshot, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title("Daily success rate")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));

    let (points, labels) = trend_points(snapshot);
    if points.is_empty() {
        let paragraph = Paragraph::new("No records available")
            .block(block)
            .alignment(Alignment::Center);
        f.render_widget(paragraph, area);
        return;
    }

    let x_max = (points.len().saturating_sub(1) as f64).max(1.0);
    let datasets = vec![Dataset::default()
        .name("success %")
        .marker(Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Green))
        .data(&points)];

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, x_max])
                .labels(labels.into_iter().map(Span::raw).collect::<Vec<_>>()),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, 100.0])
                .labels(vec![Span::raw("0"), Span::raw("50"), Span::raw("100")]),
        );
    f.render_widget(chart, area);
}

fn header_row(columns: &[&'static str]) -> Row<'static> {
    Row::new(columns.iter().map(|column| Cell::from(*column))).style(
        Style::default()
            .fg(Color::Rgb(0, 0, 238))
            .bg(Color::Rgb(200, 200, 200))
            .add_modifier(Modifier::BOLD),
    )
}

fn render_scrollbar(total: usize, row_offset: usize, f: &mut Frame<'_>, area: Rect) {
    let mut scrollbar_state = ScrollbarState::new(total)
        .position(row_offset)
        .viewport_content_length(area.height.saturating_sub(1) as usize);
    let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
        .thumb_style(Style::default().fg(Color::Rgb(0, 0, 238)));
    let scroll_area = Rect {
        x: area.x,
        y: area.y.saturating_add(1),
        width: area.width,
        height: area.height.saturating_sub(1),
    };
    f.render_stateful_widget(scrollbar, scroll_area, &mut scrollbar_state);
}

fn render_users(snapshot: &DashboardSnapshot, row_offset: usize, f: &mut Frame<'_>, area: Rect) {
    let visible = area.height.saturating_sub(1) as usize;
    let rows = snapshot
        .users
        .iter()
        .skip(row_offset)
        .take(visible)
        .map(|user| {
            Row::new(vec![
                Cell::from(user.name.clone()),
                Cell::from(user.total_records.to_string()),
                Cell::from(user.success_count.to_string()),
                Cell::from(user.fail_count.to_string()),
                Cell::from(format_rate(user.success_rate)),
                Cell::from(user.last_active.map_or_else(|| "-".to_string(), |day| day.to_string())),
            ])
            .style(Style::default().fg(Color::White))
        });

    let table = Table::new(
        rows,
        [
            Constraint::Length(14),
            Constraint::Length(8),
            Constraint::Length(8),
            Constraint::Length(6),
            Constraint::Length(7),
            Constraint::Length(12),
        ],
    )
    .header(header_row(&["Name", "Records", "Success", "Fail", "Rate", "Last active"]))
    .column_spacing(1);

    f.render_widget(table, area);
    render_scrollbar(snapshot.users.len(), row_offset, f, area);
}

fn render_records(snapshot: &DashboardSnapshot, row_offset: usize, f: &mut Frame<'_>, area: Rect) {
    let visible = area.height.saturating_sub(1) as usize;
    let rows = snapshot
        .records
        .iter()
        .skip(row_offset)
        .take(visible)
        .map(|group| {
            let work = group
                .entries
                .iter()
                .map(|entry| entry.work_content.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            Row::new(vec![
                Cell::from(group.date.to_string()),
                Cell::from(group.owner.clone()),
                Cell::from(work),
                Cell::from(group.data_count().to_string()),
                Cell::from(
                    group
                        .success_rate()
                        .map_or_else(|| "-".to_string(), format_rate),
                ),
            ])
            .style(Style::default().fg(Color::White))
        });

    let table = Table::new(
        rows,
        [
            Constraint::Length(12),
            Constraint::Length(14),
            Constraint::Min(20),
            Constraint::Length(8),
            Constraint::Length(7),
        ],
    )
    .header(header_row(&["Date", "User", "Work", "Records", "Rate"]))
    .column_spacing(1);

    f.render_widget(table, area);
    render_scrollbar(snapshot.records.len(), row_offset, f, area);
}

async fn fetch_snapshot(store: Rc<RefCell<LoadState>>) {
    let result = load_snapshot().await;
    if let Err(reason) = &result {
        web_sys::console::error_1(&reason.as_str().into());
    }
    *store.borrow_mut() = match result {
        Ok(snapshot) => LoadState::Loaded(snapshot),
        Err(reason) => LoadState::Failed(reason),
    };
}

async fn load_snapshot() -> Result<DashboardSnapshot, String> {
    let window = web_sys::window().ok_or("no browser window")?;

    let opts = RequestInit::new();
    opts.set_method("GET");
    opts.set_mode(RequestMode::SameOrigin);

    let request = Request::new_with_str_and_init(SNAPSHOT_FILE, &opts)
        .map_err(|_| format!("could not build request for {SNAPSHOT_FILE}"))?;

    let response_value = wasm_bindgen_futures::JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|_| format!("request for {SNAPSHOT_FILE} failed"))?;

    let response = response_value
        .dyn_into::<Response>()
        .map_err(|_| "failed to read response".to_string())?;
    if !response.ok() {
        return Err(format!("server answered HTTP {}", response.status()));
    }

    let body = response
        .json()
        .map_err(|_| format!("{SNAPSHOT_FILE} is not JSON"))?;
    let json = wasm_bindgen_futures::JsFuture::from(body)
        .await
        .map_err(|_| format!("failed to read {SNAPSHOT_FILE} body"))?;

    serde_wasm_bindgen::from_value::<DashboardSnapshot>(json)
        .map_err(|error| format!("failed to parse {SNAPSHOT_FILE}: {error}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use worklog_core::domain::{Statistics, WorkRecordEntry, WorkRecordGroup};
    use worklog_core::Origins;

    fn group(date: &str, data: u64, success: u64) -> WorkRecordGroup {
        WorkRecordGroup {
            owner: "张三".to_string(),
            date: date.parse().unwrap_or_default(),
            entries: vec![WorkRecordEntry {
                work_content: "入户调查".to_string(),
                data_count: data,
                success_count: success,
                fail_count: data - success,
                success_rate: 0.0,
                remark: None,
                status: None,
            }],
        }
    }

    fn snapshot(records: Vec<WorkRecordGroup>) -> DashboardSnapshot {
        DashboardSnapshot {
            stats: Statistics::default(),
            users: Vec::new(),
            records,
            origins: Origins::default(),
        }
    }

    #[test]
    fn trend_runs_oldest_day_first() {
        let (points, labels) = trend_points(&snapshot(vec![
            group("2024-07-11", 4, 4),
            group("2024-07-10", 4, 2),
        ]));
        assert_eq!(points, vec![(0.0, 50.0), (1.0, 100.0)]);
        assert_eq!(labels, vec!["07-10", "07-11"]);
    }

    #[test]
    fn single_day_gets_one_label() {
        let (points, labels) = trend_points(&snapshot(vec![group("2024-07-10", 2, 1)]));
        assert_eq!(points.len(), 1);
        assert_eq!(labels, vec!["07-10"]);
    }
}
