pub mod app;
pub mod ui;

use std::{error::Error, io};

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use crate::models::Direction;
use app::{App, InputField, InputMode, ViewMode};
use ui::ui;

pub fn run_tui() -> Result<(), Box<dyn Error>> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app state
    let mut app = App::new();

    // Run loop
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{:?}", err)
    }

    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            match app.input_mode {
                InputMode::Normal => match key.code {
                    KeyCode::Char('q') => return Ok(()),
                    KeyCode::Down | KeyCode::Char('j') => app.next(),
                    KeyCode::Up | KeyCode::Char('k') => app.previous(),
                    KeyCode::Char('v') | KeyCode::Tab => app.cycle_view(),
                    KeyCode::Char('c') => app.toggle_completed_visibility(),
                    KeyCode::Char(' ') => app.complete_selected(),
                    KeyCode::Char('t') => app.today_selected(),
                    KeyCode::Char('d') | KeyCode::Delete => app.delete_selected(),
                    KeyCode::Char('a') => app.add_task_at_selection(),
                    KeyCode::Char('n') => app.start_edit(InputField::Text),
                    KeyCode::Char('s') => app.start_edit(InputField::Assignee),
                    KeyCode::Char('J') => app.move_selected(Direction::Down),
                    KeyCode::Char('K') => app.move_selected(Direction::Up),
                    KeyCode::Char('g') => app.move_selected(Direction::Top),
                    KeyCode::Char('G') => app.move_selected(Direction::Bottom),
                    KeyCode::Enter => app.toggle_expansion(),
                    KeyCode::Char('N') => {
                        if let ViewMode::Projects = app.view_mode {
                            app.start_new_project();
                        }
                    }
                    KeyCode::Char('r') => app.start_rename_project(),
                    KeyCode::Char('*') => app.star_selected_project(),
                    KeyCode::Char('D') => app.delete_selected_project(),
                    _ => {}
                },
                InputMode::Editing | InputMode::Adding => match key.code {
                    KeyCode::Enter => app.handle_input(),
                    KeyCode::Esc => {
                        app.input_mode = InputMode::Normal;
                        app.input_buffer.clear();
                    }
                    KeyCode::Char(c) => {
                        app.input_buffer.push(c);
                    }
                    KeyCode::Backspace => {
                        app.input_buffer.pop();
                    }
                    _ => {}
                },
            }
        }
    }
}
