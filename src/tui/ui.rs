use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table},
    Frame,
};

use super::app::{App, DisplayItem, InputField, InputMode, ViewMode};

pub fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Table
            Constraint::Length(3), // Help
        ])
        .split(f.area());

    let title = match app.view_mode {
        ViewMode::Today => "Frontmind - Today's Focus",
        ViewMode::Projects => "Frontmind - Projects",
        ViewMode::AllTasks => "Frontmind - All Tasks",
    };

    let rows: Vec<Row> = app.display_items.iter().map(display_row).collect();

    let widths = [
        Constraint::Min(30),
        Constraint::Length(20),
        Constraint::Length(14),
        Constraint::Length(7),
        Constraint::Length(8),
    ];

    let table = Table::new(rows, widths)
        .header(
            Row::new(vec!["Task", "Project", "Assignee", "Today", "Status"])
                .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
                .bottom_margin(1),
        )
        .block(Block::default().borders(Borders::ALL).title(title))
        .row_highlight_style(Style::default().add_modifier(Modifier::BOLD).bg(Color::DarkGray))
        .highlight_symbol(">> ");

    f.render_stateful_widget(table, chunks[0], &mut app.state);

    let help_text = match app.input_mode {
        InputMode::Normal => match app.view_mode {
            ViewMode::Today => {
                "q: Quit | v: View | j/k: Select | J/K/g/G: Reorder | Space: Done | t: Un-Today | n: Text | s: Assignee | d: Del | c: Toggle Done"
            }
            ViewMode::Projects => {
                "q: Quit | v: View | Enter: Expand | a: Add | N: New Proj | r: Rename | *: North Star | J/K/g/G: Move | Space: Done | t: Today | d: Del | D: Del Proj"
            }
            ViewMode::AllTasks => {
                "q: Quit | v: View | j/k: Select | Space: Done | t: Today | n: Text | s: Assignee | d: Del | c: Toggle Done"
            }
        },
        InputMode::Editing => "Enter: Save | Esc: Cancel",
        InputMode::Adding => "Enter: Create | Esc: Cancel",
    };

    let help = Paragraph::new(help_text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(help, chunks[1]);

    // Render Input Box if needed
    match app.input_mode {
        InputMode::Editing | InputMode::Adding => {
            let area = centered_rect(60, 3, f.area());
            f.render_widget(Clear, area); // Clear the area first

            let title = match app.input_field {
                InputField::Text => "Edit Task Text",
                InputField::Assignee => "Edit Assignee",
                InputField::ProjectName => "Rename Project",
                InputField::NewProjectName => "New Project: Enter Name",
                InputField::None => "Edit",
            };

            let input = Paragraph::new(app.input_buffer.as_str())
                .style(Style::default().fg(Color::Yellow))
                .block(Block::default().borders(Borders::ALL).title(title));

            f.render_widget(input, area);
        }
        _ => {}
    }
}

fn display_row(item: &DisplayItem) -> Row<'static> {
    match item {
        DisplayItem::ProjectHeader {
            name,
            is_north_star,
            completed,
            total,
            expanded,
            ..
        } => {
            let chevron = if *expanded { "▼" } else { "▶" };
            let star = if *is_north_star { " ★" } else { "" };
            Row::new(vec![
                Cell::from(format!("{} {}{}", chevron, name, star)),
                Cell::from(""),
                Cell::from(""),
                Cell::from(""),
                Cell::from(format!("{}/{}", completed, total)),
            ])
            .style(if *is_north_star {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default().add_modifier(Modifier::BOLD)
            })
        }
        DisplayItem::Task { flat, depth } => {
            let t = &flat.task;
            let marker = if t.completed { "[x]" } else { "[ ]" };
            let text = if t.text.is_empty() { "Empty task" } else { t.text.as_str() };
            let children = if t.subtasks.is_empty() {
                String::new()
            } else {
                format!(
                    "  ({}/{} subtasks)",
                    t.subtasks.iter().filter(|s| s.completed).count(),
                    t.subtasks.len()
                )
            };
            let style = if t.completed {
                Style::default().fg(Color::DarkGray).add_modifier(Modifier::CROSSED_OUT)
            } else {
                Style::default()
            };
            Row::new(vec![
                Cell::from(format!("{}{} {}{}", "  ".repeat(*depth), marker, text, children)),
                Cell::from(flat.project_name.clone()),
                Cell::from(t.assignee.clone()),
                Cell::from(if t.is_today { "★" } else { "" })
                    .style(Style::default().fg(Color::Yellow)),
                Cell::from(if t.completed { "Done" } else { "Pending" }),
            ])
            .style(style)
        }
    }
}

fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((r.height - height) / 2),
            Constraint::Length(height),
            Constraint::Length((r.height - height) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
