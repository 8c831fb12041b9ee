use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyModifiers};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;

use crate::config::Config;
use crate::routes::Route;
use crate::snapshot::Dataset;
use crate::ui::app::{App, InputMode, Screen};
use crate::ui::commands::{self, switch_screen};
use crate::ui::util::{scroll_down, scroll_to_bottom, scroll_to_top, scroll_up};

/// How long to wait for a key before checking on background loads.
const TICK: Duration = Duration::from_millis(100);

pub(crate) fn as_tui(config: Config, route: &Route) -> Result<()> {
    let mut app = App::new(config);
    app.reload_all();
    app.navigate(route);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);
    app.loader.cancel_all();

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        tracing::error!("TUI exited with error: {e:?}");
        eprintln!("Error: {e:?}");
    }

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    while app.running {
        app.drain_loads();

        terminal.draw(|f| {
            let content_height = f.area().height.saturating_sub(3) as usize;
            app.visible_rows = content_height.max(1);
            crate::ui::render::render(f, app);
        })?;

        if !event::poll(TICK)? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if key.kind != event::KeyEventKind::Press {
                continue;
            }
            if app.show_help {
                app.show_help = false;
                continue;
            }
            match app.input_mode {
                InputMode::Normal => handle_normal_input(key, app)?,
                InputMode::Command => handle_command_input(key, app)?,
                InputMode::Search => handle_search_input(key, app),
            }
        }
    }
    Ok(())
}

// ── Input handlers ───────────────────────────────────────────

fn handle_normal_input(key: event::KeyEvent, app: &mut App) -> Result<()> {
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('c')
            if key.modifiers.contains(KeyModifiers::CONTROL) =>
        {
            commands::handle_command("quit", app)?;
        }
        KeyCode::Char(':') => {
            app.input_mode = InputMode::Command;
            app.command_input.clear();
        }
        KeyCode::Char('/') => {
            let dataset = app.screen.listing_dataset().unwrap_or(Dataset::PublicWorks);
            if app.screen.listing_dataset().is_none() {
                switch_screen(app, Screen::PublicWorks);
            }
            app.input_mode = InputMode::Search;
            app.search_input = app.view(dataset).listing.query.clone();
        }
        KeyCode::Char('?') => {
            app.show_help = true;
        }
        KeyCode::Char('R') => commands::handle_command("reload", app)?,
        KeyCode::Char('1') => switch_screen(app, Screen::Overview),
        KeyCode::Char('2') => switch_screen(app, Screen::Projects),
        KeyCode::Char('3') => switch_screen(app, Screen::PublicWorks),
        KeyCode::Char('4') => switch_screen(app, Screen::Map),
        KeyCode::Char('5') => switch_screen(app, Screen::Reports),
        KeyCode::Tab => {
            let screens = Screen::all();
            let idx = screens.iter().position(|s| *s == app.screen).unwrap_or(0);
            let next = (idx + 1) % screens.len();
            switch_screen(app, screens[next]);
        }
        KeyCode::BackTab => {
            let screens = Screen::all();
            let idx = screens.iter().position(|s| *s == app.screen).unwrap_or(0);
            let prev = if idx == 0 { screens.len() - 1 } else { idx - 1 };
            switch_screen(app, screens[prev]);
        }
        KeyCode::Esc => handle_escape(app),
        _ => match app.screen {
            Screen::Projects | Screen::PublicWorks => handle_listing_key(key, app)?,
            Screen::Map => handle_map_key(key, app),
            Screen::Reports => handle_reports_key(key, app),
            Screen::Overview | Screen::NotFound => {}
        },
    }
    Ok(())
}

fn handle_command_input(key: event::KeyEvent, app: &mut App) -> Result<()> {
    match key.code {
        KeyCode::Enter => {
            let input = app.command_input.clone();
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
            commands::handle_command(&input, app)?;
        }
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
        }
        KeyCode::Backspace => {
            app.command_input.pop();
            if app.command_input.is_empty() {
                app.input_mode = InputMode::Normal;
            }
        }
        KeyCode::Char(c) => {
            app.command_input.push(c);
        }
        _ => {}
    }
    Ok(())
}

fn handle_search_input(key: event::KeyEvent, app: &mut App) {
    let Some(dataset) = app.screen.listing_dataset() else {
        app.input_mode = InputMode::Normal;
        return;
    };
    match key.code {
        KeyCode::Enter => {
            app.input_mode = InputMode::Normal;
            let count = app.filtered_len(dataset);
            app.set_status(format!("{count} matching projects"));
        }
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.search_input.clear();
            app.view_mut(dataset).listing.set_query("");
        }
        KeyCode::Backspace => {
            app.search_input.pop();
            // Live search: filter as you type
            let query = app.search_input.clone();
            app.view_mut(dataset).listing.set_query(&query);
        }
        KeyCode::Char(c) => {
            app.search_input.push(c);
            let query = app.search_input.clone();
            app.view_mut(dataset).listing.set_query(&query);
        }
        _ => {}
    }
}

fn handle_escape(app: &mut App) {
    if let Some(dataset) = app.screen.listing_dataset() {
        if !app.view(dataset).listing.query.is_empty() {
            app.view_mut(dataset).listing.set_query("");
            app.search_input.clear();
        }
    }
    app.status_message.clear();
}

// ── Screen keys ──────────────────────────────────────────────

fn handle_listing_key(key: event::KeyEvent, app: &mut App) -> Result<()> {
    let Some(dataset) = app.screen.listing_dataset() else {
        return Ok(());
    };
    let rows = app.page_len(dataset);
    let total = app.filtered_len(dataset);
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.view_mut(dataset).listing.cursor_down(rows),
        KeyCode::Char('k') | KeyCode::Up => app.view_mut(dataset).listing.cursor_up(),
        KeyCode::Char('g') => app.view_mut(dataset).listing.cursor = 0,
        KeyCode::Char('G') => app.view_mut(dataset).listing.cursor_to_bottom(rows),
        KeyCode::Char(']') | KeyCode::Right | KeyCode::PageDown => {
            app.view_mut(dataset).listing.next_page(total);
        }
        KeyCode::Char('[') | KeyCode::Left | KeyCode::PageUp => {
            app.view_mut(dataset).listing.prev_page();
        }
        KeyCode::Char('f') => {
            let listing = &mut app.view_mut(dataset).listing;
            let next = listing.filter.next();
            listing.set_filter(next);
        }
        KeyCode::Enter | KeyCode::Char(' ') => {
            if let Some(id) = app.selected_project(dataset).map(|p| p.id.clone()) {
                app.view_mut(dataset).listing.toggle_expanded(&id);
            }
        }
        KeyCode::Char('m') => {
            let selected = app
                .selected_project(dataset)
                .map(|p| (p.id.clone(), p.has_location()));
            match selected {
                Some((id, true)) => {
                    if !app.focus_project_in(dataset, &id) {
                        app.set_status(format!("No mapped project with id {id}"));
                    } else {
                        switch_screen(app, Screen::Map);
                    }
                }
                Some((id, false)) => app.set_status(format!("Project {id} has no coordinates")),
                None => {}
            }
        }
        _ => {}
    }
    Ok(())
}

fn handle_map_key(key: event::KeyEvent, app: &mut App) {
    let len = app.map_entries().len();
    let page = app.visible_rows.saturating_sub(9).max(1);
    match key.code {
        KeyCode::Char('j') => scroll_down(&mut app.map.selected, &mut app.map.scroll, len, page),
        KeyCode::Char('k') => scroll_up(&mut app.map.selected, &mut app.map.scroll),
        KeyCode::Char('g') => scroll_to_top(&mut app.map.selected, &mut app.map.scroll),
        KeyCode::Char('G') => {
            scroll_to_bottom(&mut app.map.selected, &mut app.map.scroll, len, page);
        }
        KeyCode::Up => app.map.pan(0, 1),
        KeyCode::Down => app.map.pan(0, -1),
        KeyCode::Left => app.map.pan(-1, 0),
        KeyCode::Right => app.map.pan(1, 0),
        KeyCode::Char('+') | KeyCode::Char('=') => app.map.zoom_in(),
        KeyCode::Char('-') => app.map.zoom_out(),
        KeyCode::Char('0') => app.map.reset(),
        KeyCode::Enter => {
            let selected = app
                .map_entries()
                .get(app.map.selected)
                .map(|(d, p)| (*d, p.id.clone()));
            if let Some((dataset, id)) = selected {
                app.focus_project_in(dataset, &id);
            }
        }
        _ => {}
    }
}

fn handle_reports_key(key: event::KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Char('l') | KeyCode::Right => app.report_tab = app.report_tab.next(),
        KeyCode::Char('h') | KeyCode::Left => app.report_tab = app.report_tab.prev(),
        KeyCode::Char('d') => {
            app.report_dataset = match app.report_dataset {
                Dataset::Ledger => Dataset::PublicWorks,
                Dataset::PublicWorks => Dataset::Ledger,
            };
        }
        _ => {}
    }
}
