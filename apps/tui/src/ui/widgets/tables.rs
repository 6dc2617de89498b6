use ratatui::layout::{Alignment, Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};
use ratatui::Frame;
use worklog_admin::view::TableModel;

pub const fn scroll_offset(
    total_rows: usize,
    max_visible_rows: usize,
    selected_index: usize,
) -> usize {
    if total_rows <= max_visible_rows {
        return 0;
    }

    if selected_index >= max_visible_rows {
        return selected_index.saturating_sub(max_visible_rows) + 1;
    }

    0
}

/// Column widths for a table model: fixed for numbers, flexible for text.
fn widths(model: &TableModel) -> Vec<Constraint> {
    model
        .columns
        .iter()
        .map(|column| match *column {
            "Name" | "User" => Constraint::Length(14),
            "Work" => Constraint::Min(20),
            "Date" | "Last active" => Constraint::Length(12),
            "Rate" => Constraint::Length(7),
            _ => Constraint::Length(8),
        })
        .collect()
}

pub fn render_table_model(
    f: &mut Frame<'_>,
    area: Rect,
    title: &str,
    model: &TableModel,
    selected_index: usize,
) {
    if model.is_empty() {
        let block = Block::default()
            .title(title.to_string())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow));
        let paragraph = Paragraph::new("Nothing to show.")
            .block(block)
            .alignment(Alignment::Center);
        f.render_widget(paragraph, area);
        return;
    }

    let header = Row::new(model.columns.iter().map(|column| Cell::from(*column))).style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    );

    let total_rows = model.len();
    let max_visible_rows = area.height.saturating_sub(3) as usize;
    let offset = scroll_offset(total_rows, max_visible_rows, selected_index);

    let rows = model
        .rows
        .iter()
        .enumerate()
        .skip(offset)
        .take(max_visible_rows)
        .map(|(index, row)| {
            let style = if index == selected_index {
                Style::default()
                    .bg(Color::Rgb(0, 0, 238))
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            Row::new(row.cells.iter().map(|cell| Cell::from(cell.as_str()))).style(style)
        });

    let table = Table::new(rows, widths(model))
        .header(header)
        .block(
            Block::default()
                .title(format!(
                    "{title} ({} of {total_rows})",
                    selected_index.min(total_rows - 1) + 1
                ))
                .borders(Borders::ALL),
        )
        .column_spacing(1);

    f.render_widget(table, area);
}
