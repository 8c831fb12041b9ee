use std::collections::HashMap;
use std::sync::LazyLock;

use super::app::{App, InputMode, Screen};
use super::listing::StatusFilter;
use crate::routes::Route;
use crate::snapshot::Dataset;

pub(crate) struct Command {
    pub(crate) description: &'static str,
    pub(crate) run: fn(&str, &mut App) -> anyhow::Result<()>,
}

macro_rules! register_command {
    ($name:expr, $desc:expr, $func:expr, $registry:expr) => {{
        $registry.insert(
            $name,
            Command {
                description: $desc,
                run: $func,
            },
        );
    }};
}

pub(crate) static COMMANDS: LazyLock<HashMap<&str, Command>> = LazyLock::new(|| {
    let mut r: HashMap<&str, Command> = HashMap::new();

    register_command!("q", "Quit", cmd_quit, r);
    register_command!("quit", "Quit", cmd_quit, r);
    register_command!("o", "Go to Overview", cmd_overview, r);
    register_command!("overview", "Go to Overview", cmd_overview, r);
    register_command!("p", "Go to ledger Projects", cmd_projects, r);
    register_command!("projects", "Go to ledger Projects", cmd_projects, r);
    register_command!("pw", "Go to Public Works", cmd_public_works, r);
    register_command!("public", "Go to Public Works", cmd_public_works, r);
    register_command!("m", "Go to Map", cmd_map, r);
    register_command!("map", "Go to Map", cmd_map, r);
    register_command!("r", "Go to Reports", cmd_reports, r);
    register_command!("reports", "Go to Reports", cmd_reports, r);
    register_command!("go", "Open a route (e.g. :go /map?project=12)", cmd_go, r);
    register_command!(
        "focus",
        "Center the map on a project (e.g. :focus 12)",
        cmd_focus,
        r
    );
    register_command!("reload", "Reload both snapshots", cmd_reload, r);
    register_command!(
        "year",
        "Set fiscal year label (e.g. :year 2568)",
        cmd_year,
        r
    );
    register_command!(
        "search",
        "Search projects (e.g. :search school)",
        cmd_search,
        r
    );
    register_command!("s", "Search projects (e.g. :s school)", cmd_search, r);
    register_command!(
        "filter",
        "Project tab: all, completed or outstanding",
        cmd_filter,
        r
    );
    register_command!("page", "Jump to page (e.g. :page 3)", cmd_page, r);
    register_command!("help", "Show available commands", cmd_help, r);
    register_command!("h", "Show available commands", cmd_help, r);

    r
});

pub(crate) fn handle_command(input: &str, app: &mut App) -> anyhow::Result<()> {
    let trimmed = input.trim();
    let mut parts = trimmed.splitn(2, ' ');
    let cmd_name = parts.next().unwrap_or("");
    let args = parts.next().unwrap_or("").trim();

    if let Some(cmd) = COMMANDS.get(cmd_name) {
        (cmd.run)(args, app)?;
    } else {
        let suggestion = find_closest(cmd_name);
        app.set_status(format!(
            "Unknown command: :{cmd_name}. Did you mean :{suggestion}?"
        ));
    }

    Ok(())
}

pub(crate) fn find_closest(input: &str) -> String {
    let mut names: Vec<&&str> = COMMANDS.keys().filter(|k| k.len() > 1).collect();
    // HashMap order is random; sort so ties resolve the same way every time
    names.sort();
    names
        .into_iter()
        .min_by_key(|k| levenshtein(input, k))
        .map_or("help", |k| *k)
        .to_string()
}

fn levenshtein(a: &str, b: &str) -> usize {
    let (a, b): (Vec<char>, Vec<char>) = (a.chars().collect(), b.chars().collect());
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Project table the command applies to: the one on screen, otherwise the
/// public-works table.
fn listing_target(app: &App) -> Dataset {
    app.screen.listing_dataset().unwrap_or(Dataset::PublicWorks)
}

// ── Command implementations ──────────────────────────────────

fn cmd_quit(_args: &str, app: &mut App) -> anyhow::Result<()> {
    app.loader.cancel_all();
    app.running = false;
    Ok(())
}

fn cmd_overview(_args: &str, app: &mut App) -> anyhow::Result<()> {
    app.navigate(&Route::Overview);
    Ok(())
}

fn cmd_projects(_args: &str, app: &mut App) -> anyhow::Result<()> {
    app.navigate(&Route::Projects(Dataset::Ledger));
    Ok(())
}

fn cmd_public_works(_args: &str, app: &mut App) -> anyhow::Result<()> {
    app.navigate(&Route::Projects(Dataset::PublicWorks));
    Ok(())
}

fn cmd_map(_args: &str, app: &mut App) -> anyhow::Result<()> {
    app.navigate(&Route::Map { project: None });
    Ok(())
}

fn cmd_reports(_args: &str, app: &mut App) -> anyhow::Result<()> {
    app.navigate(&Route::Reports);
    Ok(())
}

fn cmd_go(args: &str, app: &mut App) -> anyhow::Result<()> {
    if args.is_empty() {
        app.set_status(format!("Usage: :go <path>  ({})", Route::known().join(", ")));
        return Ok(());
    }
    app.navigate(&Route::parse(args));
    Ok(())
}

fn cmd_focus(args: &str, app: &mut App) -> anyhow::Result<()> {
    if args.is_empty() {
        app.set_status("Usage: :focus <project id>");
        return Ok(());
    }
    app.navigate(&Route::Map {
        project: Some(args.to_string()),
    });
    Ok(())
}

fn cmd_reload(_args: &str, app: &mut App) -> anyhow::Result<()> {
    app.reload_all();
    app.set_status("Reloading snapshots...");
    Ok(())
}

fn cmd_year(args: &str, app: &mut App) -> anyhow::Result<()> {
    if args.is_empty() {
        // Cycle through the configured labels
        let years = &app.config.fiscal_years;
        let next = years
            .iter()
            .position(|y| *y == app.fiscal_year)
            .map_or(0, |i| (i + 1) % years.len().max(1));
        if let Some(year) = years.get(next).cloned() {
            app.fiscal_year = year;
        }
    } else {
        app.fiscal_year = args.to_string();
    }
    app.set_status(format!("Fiscal year: {}", app.fiscal_year));
    Ok(())
}

fn cmd_search(args: &str, app: &mut App) -> anyhow::Result<()> {
    let dataset = listing_target(app);
    if app.screen.listing_dataset().is_none() {
        app.navigate(&Route::Projects(dataset));
    }
    app.search_input = args.to_string();
    app.view_mut(dataset).listing.set_query(args);
    let count = app.filtered_len(dataset);
    app.set_status(format!("{count} matching projects"));
    Ok(())
}

fn cmd_filter(args: &str, app: &mut App) -> anyhow::Result<()> {
    let Some(filter) = StatusFilter::parse(args) else {
        app.set_status("Usage: :filter all|completed|outstanding");
        return Ok(());
    };
    let dataset = listing_target(app);
    app.view_mut(dataset).listing.set_filter(filter);
    app.set_status(format!("Showing {filter} projects"));
    Ok(())
}

fn cmd_page(args: &str, app: &mut App) -> anyhow::Result<()> {
    let Ok(page) = args.parse::<usize>() else {
        app.set_status("Usage: :page <number>");
        return Ok(());
    };
    let dataset = listing_target(app);
    let total = app.filtered_len(dataset);
    let listing = &mut app.view_mut(dataset).listing;
    listing.go_to_page(page, total);
    let shown = listing.page + 1;
    let count = listing.page_count(total);
    app.set_status(format!("Page {shown} of {count}"));
    Ok(())
}

fn cmd_help(_args: &str, app: &mut App) -> anyhow::Result<()> {
    app.show_help = true;
    app.input_mode = InputMode::Normal;
    Ok(())
}

/// Screen switch shared by the number keys, Tab and the commands.
pub(crate) fn switch_screen(app: &mut App, screen: Screen) {
    let route = match screen {
        Screen::Overview => Route::Overview,
        Screen::Projects => Route::Projects(Dataset::Ledger),
        Screen::PublicWorks => Route::Projects(Dataset::PublicWorks),
        Screen::Map => Route::Map { project: None },
        Screen::Reports => Route::Reports,
        Screen::NotFound => Route::NotFound(app.not_found_path.clone()),
    };
    app.navigate(&route);
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod commands_tests;
