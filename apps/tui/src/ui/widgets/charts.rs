use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{
    Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset, GraphType, Paragraph, Tabs,
};
use ratatui::Frame;
use worklog_admin::view::ChartModel;
use worklog_core::RateBand;

pub const CHART_TABS: [&str; 2] = ["User success rate", "Daily trend"];

pub fn rate_color(rate: f64) -> Color {
    match RateBand::of(rate) {
        RateBand::Good => Color::Green,
        RateBand::Fair => Color::Yellow,
        RateBand::Poor => Color::Red,
    }
}

fn empty_chart(f: &mut Frame<'_>, area: Rect, title: &str) {
    let block = Block::default()
        .title(title.to_string())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let paragraph = Paragraph::new("No data available")
        .block(block)
        .alignment(Alignment::Center);
    f.render_widget(paragraph, area);
}

pub fn render_chart_tabs(selected: usize, f: &mut Frame<'_>, area: Rect) {
    let titles = CHART_TABS
        .iter()
        .map(|title| TextLine::from(*title))
        .collect::<Vec<_>>();

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(Style::default().fg(Color::Gray))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .divider(Span::raw("|"));

    f.render_widget(tabs, area);
}

pub fn render_chart_panel(charts: &ChartModel, selected: usize, f: &mut Frame<'_>, area: Rect) {
    if selected == 0 {
        render_user_rate_bars(charts, f, area);
    } else {
        render_daily_trend(charts, f, area);
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn render_user_rate_bars(charts: &ChartModel, f: &mut Frame<'_>, area: Rect) {
    const TITLE: &str = "Success rate by user";

    if charts.user_rates.is_empty() {
        empty_chart(f, area, TITLE);
        return;
    }

    let bars: Vec<Bar<'_>> = charts
        .user_rates
        .iter()
        .map(|(name, rate)| {
            Bar::default()
                .value(rate.round().clamp(0.0, 100.0) as u64)
                .label(TextLine::from(name.as_str()))
                .style(Style::default().fg(rate_color(*rate)))
                .value_style(Style::default().fg(Color::Black).add_modifier(Modifier::BOLD))
        })
        .collect();

    let chart = BarChart::default()
        .block(
            Block::default()
                .title(TITLE)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .data(BarGroup::default().bars(&bars))
        .max(100)
        .bar_gap(1)
        .bar_width(6);

    f.render_widget(chart, area);
}

#[allow(clippy::cast_precision_loss)]
pub fn render_daily_trend(charts: &ChartModel, f: &mut Frame<'_>, area: Rect) {
    const TITLE: &str = "Daily success rate";

    if charts.daily_rates.is_empty() {
        empty_chart(f, area, TITLE);
        return;
    }

    let points: Vec<(f64, f64)> = charts
        .daily_rates
        .iter()
        .enumerate()
        .map(|(index, (_, rate))| (index as f64, *rate))
        .collect();

    let x_labels: Vec<Span<'_>> = match (charts.daily_rates.first(), charts.daily_rates.last()) {
        (Some((first, _)), Some((last, _))) if first != last => vec![
            Span::raw(first.format("%m-%d").to_string()),
            Span::raw(last.format("%m-%d").to_string()),
        ],
        (Some((only, _)), _) => vec![Span::raw(only.format("%m-%d").to_string())],
        _ => Vec::new(),
    };
    let x_max = (points.len().saturating_sub(1) as f64).max(1.0);

    let datasets = vec![Dataset::default()
        .name("success %")
        .marker(Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Green))
        .data(&points)];

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .title(TITLE)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .x_axis(
            Axis::default()
                .title("Day")
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, x_max])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .title("%")
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, 100.0])
                .labels(vec![Span::raw("0"), Span::raw("50"), Span::raw("100")]),
        );

    f.render_widget(chart, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_colors_by_threshold() {
        assert_eq!(rate_color(88.0), Color::Green);
        assert_eq!(rate_color(80.0), Color::Yellow);
        assert_eq!(rate_color(40.0), Color::Red);
    }
}
