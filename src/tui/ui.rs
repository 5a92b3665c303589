//! UI rendering

use super::app::{App, Mode, Picker};
use super::help::{get_about_help, get_commands_help, get_help_text};
use splitbill_core::storage::{REMAINING_HEADER, TOTAL_LABEL};
use splitbill_engine::engine::{SUBTOTAL_KEY, column_key, is_member_column};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap},
};

pub(crate) const CELL_BAR_HEIGHT: u16 = 3;
pub(crate) const TABLE_MIN_HEIGHT: u16 = 6;
pub(crate) const STATUS_BAR_HEIGHT: u16 = 1;
pub(crate) const ROW_HEADER_WIDTH: u16 = 4;
pub(crate) const GRID_COLUMN_SPACING: u16 = 1;
pub(crate) const REMAINING_WIDTH: u16 = 16;

pub(crate) fn split_main_chunks(area: Rect) -> [Rect; 3] {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(CELL_BAR_HEIGHT),
            Constraint::Min(TABLE_MIN_HEIGHT),
            Constraint::Length(STATUS_BAR_HEIGHT),
        ])
        .split(area);
    [chunks[0], chunks[1], chunks[2]]
}

/// How many bill columns fit next to the row header and the remainder column,
/// starting at the viewport.
fn fitting_columns(app: &App, table_width: u16) -> usize {
    let inner = table_width.saturating_sub(2);
    let fixed = ROW_HEADER_WIDTH + GRID_COLUMN_SPACING + REMAINING_WIDTH + GRID_COLUMN_SPACING;
    let mut available = inner.saturating_sub(fixed) as usize;
    let mut count = 0;
    for col in app.viewport_col..app.col_count() {
        let needed = app.get_column_width(col) + GRID_COLUMN_SPACING as usize;
        if needed > available {
            break;
        }
        available -= needed;
        count += 1;
    }
    count.max(1)
}

/// Map a mouse position to the `(column, row)` of an editable table cell.
pub(crate) fn grid_cell_at(
    app: &App,
    table_area: Rect,
    mouse_col: u16,
    mouse_row: u16,
) -> Option<(usize, usize)> {
    if table_area.width < 3 || table_area.height < 4 {
        return None;
    }

    let inner_x = table_area.x.saturating_add(1);
    let inner_y = table_area.y.saturating_add(1);
    let inner_right = inner_x.saturating_add(table_area.width.saturating_sub(2));
    let inner_bottom = inner_y.saturating_add(table_area.height.saturating_sub(2));
    if mouse_col < inner_x || mouse_col >= inner_right || mouse_row < inner_y || mouse_row >= inner_bottom {
        return None;
    }

    // Header row holds column names, not data cells.
    if mouse_row == inner_y {
        return None;
    }

    let rel_row = mouse_row.saturating_sub(inner_y.saturating_add(1)) as usize;
    if rel_row >= app.visible_rows {
        return None;
    }
    let row = app.viewport_row.saturating_add(rel_row);
    if row >= app.row_count() {
        return None;
    }

    let mut x = inner_x.saturating_add(ROW_HEADER_WIDTH);
    if mouse_col < x.saturating_add(GRID_COLUMN_SPACING) {
        return None;
    }
    x = x.saturating_add(GRID_COLUMN_SPACING);

    for col in app.viewport_col..(app.viewport_col + app.visible_cols).min(app.col_count()) {
        let cell_end = x.saturating_add(app.get_column_width(col) as u16);
        if mouse_col >= x && mouse_col < cell_end {
            return Some((col, row));
        }
        x = cell_end.saturating_add(GRID_COLUMN_SPACING);
        if mouse_col < x || x >= inner_right {
            return None;
        }
    }

    None
}

/// Draw the application UI
pub fn draw(f: &mut Frame, app: &mut App) {
    let chunks = split_main_chunks(f.area());

    // header + footer + borders
    let table_area = chunks[1];
    app.visible_rows = (table_area.height.saturating_sub(4) as usize).max(1);
    app.visible_cols = fitting_columns(app, table_area.width);
    app.update_viewport();
    app.visible_cols = fitting_columns(app, table_area.width);

    draw_cell_bar(f, app, chunks[0]);
    draw_table(f, app, chunks[1]);
    draw_status_bar(f, app, chunks[2]);

    if let Some(picker) = app.picker.as_ref() {
        draw_picker(f, picker);
    }

    if app.confirm_clear {
        draw_confirm_modal(f);
    }

    if app.help_modal {
        draw_help_modal(f, app);
    }
}

fn with_cursor(buffer: &str, cursor: usize) -> String {
    let (before, after) = buffer.split_at(cursor.min(buffer.len()));
    format!("{}│{}", before, after)
}

fn draw_cell_bar(f: &mut Frame, app: &App, area: Rect) {
    let column = app.current_column().unwrap_or("");
    let cell_name = format!("#{} {}", app.cursor_row + 1, column);

    let content = match app.mode {
        Mode::Edit => format!("{}: {}", cell_name, with_cursor(&app.edit_buffer, app.edit_cursor)),
        Mode::Command => format!(":{}", with_cursor(&app.command_buffer, app.command_cursor)),
        Mode::Prompt(kind) => format!(
            "{}: {}",
            kind.label(),
            with_cursor(&app.edit_buffer, app.edit_cursor)
        ),
        Mode::Normal => match app.current_row() {
            Some(row) if column_key(column) == SUBTOTAL_KEY => {
                format!("{}: {} {} (calculated)", cell_name, app.currency, app.bill.calculate_subtotal(row))
            }
            Some(row) if row.value(column).is_empty() => format!("{}: (empty)", cell_name),
            Some(row) => format!("{}: {}", cell_name, row.value(column)),
            None => "No items".to_string(),
        },
    };

    let title = match app.mode {
        Mode::Edit => " Edit ",
        Mode::Command => " Command ",
        Mode::Prompt(_) => " Prompt ",
        Mode::Normal => " Cell ",
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(match app.mode {
            Mode::Edit => Color::Yellow,
            Mode::Command => Color::Cyan,
            Mode::Prompt(_) => Color::Magenta,
            Mode::Normal => Color::White,
        }));

    let paragraph = Paragraph::new(content).block(block);
    f.render_widget(paragraph, area);
}

fn header_style(active: bool) -> Style {
    if active {
        Style::default()
            .fg(Color::Black)
            .bg(Color::White)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

fn draw_table(f: &mut Frame, app: &App, area: Rect) {
    let columns = app.bill.columns();
    let visible = app.viewport_col..(app.viewport_col + app.visible_cols).min(columns.len());

    let mut header_cells = vec![Cell::from("#")];
    for col in visible.clone() {
        header_cells.push(Cell::from(columns[col].as_str()).style(header_style(col == app.cursor_col)));
    }
    header_cells.push(Cell::from(REMAINING_HEADER).style(header_style(false)));
    let header = Row::new(header_cells).height(1);

    let mut rows = Vec::new();
    let last_row = (app.viewport_row + app.visible_rows).min(app.row_count());
    for row_idx in app.viewport_row..last_row {
        let Some(row) = app.bill.row_at(row_idx) else {
            break;
        };
        let mut cells = vec![
            Cell::from(format!("{}", row_idx + 1)).style(header_style(row_idx == app.cursor_row)),
        ];

        for col in visible.clone() {
            let name = columns[col].as_str();
            let display = app.cell_display(row, name);
            let style = if row_idx == app.cursor_row && col == app.cursor_col {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else if column_key(name) == SUBTOTAL_KEY {
                Style::default().fg(Color::Green)
            } else if is_member_column(name) {
                Style::default().fg(Color::LightBlue)
            } else {
                Style::default()
            };
            cells.push(Cell::from(display).style(style));
        }

        let remaining = app.bill.calculate_amount_remaining(row);
        let style = if remaining.starts_with('-') {
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        cells.push(Cell::from(remaining).style(style));
        rows.push(Row::new(cells));
    }

    let total_style = Style::default().add_modifier(Modifier::BOLD);
    let mut footer_cells = vec![Cell::from("")];
    for col in visible.clone() {
        let name = columns[col].as_str();
        let text = if column_key(name) == SUBTOTAL_KEY {
            app.bill.calculate_total()
        } else if is_member_column(name) {
            app.bill.calculate_member_total(name)
        } else if col == 0 {
            TOTAL_LABEL.to_string()
        } else {
            String::new()
        };
        footer_cells.push(Cell::from(text).style(total_style));
    }
    footer_cells.push(Cell::from(""));
    let footer = Row::new(footer_cells).height(1);

    let mut widths = vec![Constraint::Length(ROW_HEADER_WIDTH)];
    for col in visible {
        widths.push(Constraint::Length(app.get_column_width(col) as u16));
    }
    widths.push(Constraint::Length(REMAINING_WIDTH));

    let title = format!(
        " Bill  |  Total {} {}  |  shares: {} ",
        app.currency,
        app.bill.calculate_total(),
        app.share_mode
    );
    let table = Table::new(rows, widths)
        .header(header)
        .footer(footer)
        .block(Block::default().borders(Borders::ALL).title(title))
        .column_spacing(GRID_COLUMN_SPACING);

    f.render_widget(table, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Fixed-size rectangle centered in `area`, shrunk to fit.
fn centered_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

fn draw_picker(f: &mut Frame, picker: &Picker) {
    let widest = picker
        .options
        .iter()
        .map(|(label, _)| label.chars().count())
        .max()
        .unwrap_or(0)
        .max(picker.title.chars().count() + 2);
    let width = u16::try_from(widest.saturating_add(8)).unwrap_or(u16::MAX);
    let height = u16::try_from(picker.options.len().saturating_add(2)).unwrap_or(u16::MAX);
    let area = centered_fixed(width, height, f.area());

    let lines: Vec<Line> = picker
        .options
        .iter()
        .enumerate()
        .map(|(idx, (label, _))| {
            if idx == picker.selected {
                Line::from(Span::styled(
                    format!("> {}", label),
                    Style::default()
                        .fg(Color::Black)
                        .bg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ))
            } else {
                Line::from(format!("  {}", label))
            }
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", picker.title))
        .border_style(Style::default().fg(Color::Cyan));
    f.render_widget(Clear, area);
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_confirm_modal(f: &mut Frame) {
    let area = centered_fixed(44, 5, f.area());
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Clear all data ")
        .border_style(Style::default().fg(Color::Red));
    let text = vec![
        Line::from("Remove every item and member?"),
        Line::from(""),
        Line::from(Span::styled(
            "y: clear    any other key: cancel",
            Style::default().fg(Color::Yellow),
        )),
    ];
    f.render_widget(Clear, area);
    f.render_widget(Paragraph::new(text).block(block), area);
}

fn draw_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let store_info = match app.persistence.as_ref() {
        Some(p) if app.bill.modified => format!("[{}] [+]", p.key()),
        Some(p) => format!("[{}]", p.key()),
        None => "[not saved]".to_string(),
    };

    let status = if !app.status_message.is_empty() {
        app.status_message.clone()
    } else {
        format!(
            "{}  |  [{}]  |  {}",
            store_info,
            app.keymap.name(),
            app.keymap.status_hint()
        )
    };

    let style = if app.status_message.starts_with("Error") {
        Style::default().fg(Color::Red)
    } else if !app.status_message.is_empty() {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let paragraph = Paragraph::new(Line::from(vec![Span::styled(status, style)]));
    f.render_widget(paragraph, area);
}

fn section_style(text: &str, title: &str) -> Style {
    if text == title {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else if text.starts_with("  ") || text.is_empty() {
        Style::default().fg(Color::White)
    } else {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    }
}

fn draw_help_modal(f: &mut Frame, app: &mut App) {
    let area = centered_rect(88, 88, f.area());

    let modal_style = Style::default().fg(Color::White).bg(Color::Black);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .border_style(Style::default().fg(Color::Green))
        .style(modal_style);

    let mut lines: Vec<Line> = Vec::new();
    for text in get_about_help() {
        let style = section_style(&text, "About splitbill");
        lines.push(Line::from(Span::styled(text, style)));
    }
    lines.push(Line::from(""));
    for text in get_help_text(&app.keymap) {
        let style = section_style(&text, "");
        lines.push(Line::from(Span::styled(text, style)));
    }
    lines.push(Line::from(""));
    for text in get_commands_help() {
        let style = section_style(&text, "Commands");
        lines.push(Line::from(Span::styled(text, style)));
    }

    let viewport_height = area.height.saturating_sub(2) as usize;
    let max_scroll = lines.len().saturating_sub(viewport_height);
    app.help_scroll = app.help_scroll.min(max_scroll);
    let scroll_y = u16::try_from(app.help_scroll).unwrap_or(u16::MAX);

    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(modal_style)
        .scroll((scroll_y, 0))
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, area);
    f.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{Terminal, backend::TestBackend};

    fn first_body_cell_point(table_area: Rect) -> (u16, u16) {
        (
            table_area.x + 1 + ROW_HEADER_WIDTH + GRID_COLUMN_SPACING,
            table_area.y + 2,
        )
    }

    fn app_with_rows(n: usize) -> App {
        let mut app = App::new();
        for _ in 0..n {
            app.add_item();
        }
        app
    }

    fn render(app: &mut App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn grid_cell_at_maps_first_visible_cell_to_viewport_origin() {
        let mut app = app_with_rows(10);
        app.viewport_col = 2;
        app.viewport_row = 3;
        app.visible_cols = 3;
        app.visible_rows = 4;

        let table_area = Rect::new(0, 0, 100, 20);
        let (x, y) = first_body_cell_point(table_area);
        assert_eq!(grid_cell_at(&app, table_area, x, y), Some((2, 3)));
    }

    #[test]
    fn grid_cell_at_maps_second_column_with_custom_width() {
        let mut app = app_with_rows(1);
        app.visible_cols = 3;
        app.cursor_col = 0;
        app.set_column_width(20);

        let table_area = Rect::new(0, 0, 100, 20);
        let (first_x, y) = first_body_cell_point(table_area);
        let second_col_start = first_x + 20 + GRID_COLUMN_SPACING;
        assert_eq!(
            grid_cell_at(&app, table_area, second_col_start + 1, y),
            Some((1, 0))
        );
        assert_eq!(grid_cell_at(&app, table_area, second_col_start - 1, y), None);
    }

    #[test]
    fn grid_cell_at_ignores_headers_and_missing_rows() {
        let app = app_with_rows(1);
        let table_area = Rect::new(0, 0, 100, 20);
        let (x, y) = first_body_cell_point(table_area);

        assert_eq!(grid_cell_at(&app, table_area, table_area.x + 2, y), None);
        assert_eq!(grid_cell_at(&app, table_area, x, table_area.y + 1), None);
        assert_eq!(grid_cell_at(&app, table_area, x, y + 1), None);
        assert_eq!(grid_cell_at(&app, table_area, 0, 0), None);
    }

    #[test]
    fn fitting_columns_reserves_remainder_column() {
        let app = app_with_rows(0);
        // 2 borders + 4 header + 1 + 16 remaining + 1 = 24; each column needs 13
        assert_eq!(fitting_columns(&app, 24 + 13 * 3), 3);
        assert_eq!(fitting_columns(&app, 10), 1);
    }

    #[test]
    fn draw_shows_totals_and_remainder() {
        let mut app = app_with_rows(1);
        app.add_member("Al");
        let id = app.current_row().unwrap().id.clone();
        app.bill.update_row(&id, "Item", "Cake");
        app.bill.update_row(&id, "Quantity", "1");
        app.bill.update_row(&id, "Price", "8");
        app.bill.update_row(&id, "Al", "150");

        let screen = render(&mut app, 160, 20);
        assert!(screen.contains("Cake"));
        assert!(screen.contains("Total $ 8.00"));
        assert!(screen.contains("150% 12.00"));
        assert!(screen.contains("-4.00"));
        assert!(screen.contains(REMAINING_HEADER));
    }

    #[test]
    fn draw_fits_picker_with_very_long_title() {
        let mut app = app_with_rows(1);
        let name = "N".repeat(70_000);
        app.bill.add_column(&name);
        app.share_mode = splitbill_core::ShareInputMode::Fraction;
        app.cursor_col = app.col_count() - 1;
        app.enter_edit_mode();
        assert!(app.picker.is_some());

        let screen = render(&mut app, 80, 24);
        assert!(screen.contains("1/2"));
    }

    #[test]
    fn draw_clamps_help_scroll() {
        let mut app = app_with_rows(0);
        app.open_help();
        app.scroll_help_to_end();
        render(&mut app, 80, 24);
        assert!(app.help_scroll < usize::MAX);
        assert!(app.help_scroll > 0);
    }
}
