use std::collections::HashMap;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs},
    Frame,
};

use super::app::{App, InputMode, LoadState, Screen};
use super::commands;
use super::theme;
use super::util::centered_rect;
use crate::snapshot::Dataset;

pub(crate) fn render(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Tab bar
            Constraint::Min(5),    // Main content
            Constraint::Length(1), // Status bar
            Constraint::Length(1), // Command bar
        ])
        .split(f.area());

    render_tab_bar(f, chunks[0], app);
    render_screen(f, chunks[1], app);
    render_status_bar(f, chunks[2], app);
    render_command_bar(f, chunks[3], app);

    if app.show_help {
        render_help_overlay(f, f.area());
    }
}

fn render_tab_bar(f: &mut Frame, area: Rect, app: &App) {
    let screens = Screen::all();
    let titles: Vec<String> = screens
        .iter()
        .zip(1..)
        .map(|(screen, key)| format!("{key}:{screen}"))
        .collect();

    let selected = screens.iter().position(|s| *s == app.screen).unwrap_or(0);
    let tabs = Tabs::new(titles)
        .select(selected)
        .style(Style::default().fg(theme::TEXT_DIM).bg(theme::HEADER_BG))
        .highlight_style(theme::active_tab_style())
        .divider(Span::styled("|", Style::default().fg(theme::OVERLAY)));

    f.render_widget(tabs, area);
}

fn render_screen(f: &mut Frame, area: Rect, app: &App) {
    match app.screen {
        Screen::Overview => super::screens::overview::render(f, area, app),
        Screen::Projects => super::screens::projects::render(f, area, app, Dataset::Ledger),
        Screen::PublicWorks => {
            super::screens::projects::render(f, area, app, Dataset::PublicWorks)
        }
        Screen::Map => super::screens::map::render(f, area, app),
        Screen::Reports => super::screens::reports::render(f, area, app),
        Screen::NotFound => super::screens::not_found::render(f, area, app),
    }
}

fn load_badge(state: &LoadState) -> &'static str {
    match state {
        LoadState::NotLoaded => "-",
        LoadState::Loading => "loading",
        LoadState::Ready => "ok",
        LoadState::Failed(_) => "failed",
    }
}

fn mode_badge(mode: InputMode) -> Span<'static> {
    let color = match mode {
        InputMode::Normal => theme::ACCENT,
        InputMode::Command => theme::GREEN,
        InputMode::Search => theme::YELLOW,
    };
    Span::styled(format!(" {mode} "), theme::badge_style(color))
}

fn load_span(label: &str, state: &LoadState) -> Span<'static> {
    let color = match state {
        LoadState::NotLoaded => theme::TEXT_DIM,
        LoadState::Loading => theme::YELLOW,
        LoadState::Ready => theme::GREEN,
        LoadState::Failed(_) => theme::RED,
    };
    Span::styled(
        format!(" {label}: {} ", load_badge(state)),
        theme::status_bar_style().fg(color),
    )
}

fn screen_hints(screen: Screen) -> &'static str {
    match screen {
        Screen::Overview => " R reload | :year | ? help ",
        Screen::Projects | Screen::PublicWorks => {
            " [/] page | f tab | Enter expand | m map | ? help "
        }
        Screen::Map => " arrows pan | +/- zoom | Enter focus | 0 reset ",
        Screen::Reports => " h/l tab | d dataset | ? help ",
        Screen::NotFound => " 1 overview | :go <path> ",
    }
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![
        mode_badge(app.input_mode),
        Span::styled(
            format!(" {} | FY {} |", app.route(), app.fiscal_year),
            theme::status_bar_style(),
        ),
        load_span("ledger", &app.ledger.state),
        load_span("public works", &app.public_works.state),
    ];

    let hints = screen_hints(app.screen);
    let used: usize = spans.iter().map(|s| s.content.chars().count()).sum();
    let pad = (area.width as usize).saturating_sub(used + hints.len());
    spans.push(Span::styled(" ".repeat(pad), theme::status_bar_style()));
    spans.push(Span::styled(hints, theme::status_bar_style()));

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// `prefix` in `color`, then the text being typed, then an optional note.
fn prompt_line<'a>(prefix: &'static str, color: Color, input: &'a str, note: String) -> Line<'a> {
    Line::from(vec![
        Span::styled(prefix, Style::default().fg(color)),
        Span::styled(input, theme::command_bar_style()),
        Span::styled(note, theme::dim_style()),
    ])
}

fn render_command_bar(f: &mut Frame, area: Rect, app: &App) {
    let typed = match app.input_mode {
        InputMode::Command => Some((
            prompt_line(":", theme::ACCENT, &app.command_input, String::new()),
            app.command_input.chars().count(),
        )),
        InputMode::Search => {
            let dataset = app
                .screen
                .listing_dataset()
                .unwrap_or(Dataset::PublicWorks);
            let note = if app.search_input.is_empty() {
                String::new()
            } else {
                format!("  ({} matches)", app.filtered_len(dataset))
            };
            Some((
                prompt_line("/", theme::YELLOW, &app.search_input, note),
                app.search_input.chars().count(),
            ))
        }
        InputMode::Normal => None,
    };

    let content = match &typed {
        Some((line, _)) => line.clone(),
        None if app.status_message.is_empty() => Line::from(Span::styled(
            " Press : for commands, / to search, ? for help",
            theme::dim_style(),
        )),
        None => Line::from(Span::styled(
            app.status_message.as_str(),
            theme::command_bar_style(),
        )),
    };
    f.render_widget(
        Paragraph::new(content).style(Style::default().bg(theme::COMMAND_BG)),
        area,
    );

    if let Some((_, typed_len)) = typed {
        let offset = u16::try_from(typed_len + 1).unwrap_or(u16::MAX);
        f.set_cursor_position((area.x.saturating_add(offset), area.y));
    }
}

fn help_line(text: &str) -> Line<'static> {
    Line::from(Span::styled(text.to_string(), theme::normal_style()))
}

fn render_help_overlay(f: &mut Frame, area: Rect) {
    let mut help_text = vec![
        Line::from(Span::styled(
            " budgetdash Help ",
            theme::active_tab_style(),
        )),
        Line::from(""),
        Line::from(Span::styled(" Navigation", theme::section_style())),
        help_line("  j/k or Up/Down   Move cursor           1-5        Switch screens"),
        help_line("  Tab/Shift-Tab    Cycle screens         g/G        Top/Bottom"),
        help_line("  [ ] or Left/Right  Prev/Next page      Ctrl-q     Quit"),
        Line::from(""),
        Line::from(Span::styled(" Projects", theme::section_style())),
        help_line("  /               Search (live)          f          Cycle status tab"),
        help_line("  Enter           Expand row             m          Show on map"),
        Line::from(""),
        Line::from(Span::styled(" Map", theme::section_style())),
        help_line("  Arrow keys      Pan                    +/-        Zoom in/out"),
        help_line("  j/k             Select project         g/G        First/Last"),
        help_line("  Enter           Focus selected         0          Reset view"),
        Line::from(""),
        Line::from(Span::styled(" Reports", theme::section_style())),
        help_line("  h/l             Switch tab             d          Switch dataset"),
        Line::from(""),
        Line::from(Span::styled(" Commands", theme::section_style())),
    ];

    help_text.extend(command_lines());
    help_text.push(Line::from(""));
    help_text.push(Line::from(Span::styled(
        " Press any key to close ",
        theme::dim_style(),
    )));

    let height = u16::try_from(help_text.len()).unwrap_or(u16::MAX).saturating_add(2);
    let popup_area = centered_rect(area, 76, height);

    f.render_widget(Clear, popup_area);
    let help = Paragraph::new(help_text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::ACCENT))
            .style(Style::default().bg(theme::HEADER_BG)),
    );
    f.render_widget(help, popup_area);
}

/// One line per registered command, under its longest alias.
fn command_lines() -> Vec<Line<'static>> {
    let mut longest: HashMap<&'static str, &'static str> = HashMap::new();
    for (name, cmd) in commands::COMMANDS.iter() {
        let entry = longest.entry(cmd.description).or_insert(*name);
        if name.len() > entry.len() {
            *entry = *name;
        }
    }
    let mut lines: Vec<(&str, &str)> = longest.into_iter().map(|(desc, name)| (name, desc)).collect();
    lines.sort_unstable();
    lines
        .into_iter()
        .map(|(name, desc)| help_line(&format!("  :{name:<12} {desc}")))
        .collect()
}
