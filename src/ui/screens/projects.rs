use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span, Text},
    widgets::{Cell, Paragraph, Row, Table, Tabs},
    Frame,
};

use crate::models::NormalizedProject;
use crate::snapshot::Dataset;
use crate::ui::app::{App, LoadState};
use crate::ui::listing::{ProjectListing, StatusFilter};
use crate::ui::theme;
use crate::ui::util::{format_count, format_currency, format_percentage, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App, dataset: Dataset) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Status tabs
            Constraint::Min(5),    // Table
            Constraint::Length(1), // Pagination
        ])
        .split(area);

    let view = app.view(dataset);
    let projects = &view.snapshot.projects;
    let listing = &view.listing;
    let filtered = listing.filtered(projects);

    render_status_tabs(f, chunks[0], listing, projects);

    if filtered.is_empty() {
        render_empty(f, chunks[1], app, dataset);
    } else {
        render_table(f, chunks[1], app, dataset, &filtered);
    }

    render_pagination(f, chunks[2], listing, filtered.len());
}

fn render_status_tabs(f: &mut Frame, area: Rect, listing: &ProjectListing, projects: &[NormalizedProject]) {
    let (all, completed, outstanding) = ProjectListing::counts(projects);
    let titles: Vec<Line> = StatusFilter::all()
        .iter()
        .map(|filter| {
            let count = match filter {
                StatusFilter::All => all,
                StatusFilter::Completed => completed,
                StatusFilter::Outstanding => outstanding,
            };
            Line::from(format!("{filter} ({})", format_count(count)))
        })
        .collect();
    let selected = StatusFilter::all()
        .iter()
        .position(|s| *s == listing.filter)
        .unwrap_or(0);

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(theme::dim_style())
        .highlight_style(theme::active_tab_style())
        .divider(Span::styled(" | ", Style::default().fg(theme::OVERLAY)));

    f.render_widget(tabs, area);
}

fn render_empty(f: &mut Frame, area: Rect, app: &App, dataset: Dataset) {
    let view = app.view(dataset);
    let msg = match &view.state {
        LoadState::Loading => format!("Loading {dataset}..."),
        LoadState::Failed(e) => format!("Could not load {dataset}: {e}"),
        _ if !view.listing.query.is_empty() => {
            format!("No projects matching '{}'", view.listing.query)
        }
        _ => "No projects".to_string(),
    };
    let hint = if view.listing.query.is_empty() {
        "Press R to reload"
    } else {
        "Press Esc to clear the search"
    };
    let para = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(msg, theme::dim_style())),
        Line::from(""),
        Line::from(Span::styled(hint, theme::dim_style())),
    ])
    .centered()
    .block(theme::panel_block(&title(app, dataset, 0)));
    f.render_widget(para, area);
}

fn title(app: &App, dataset: Dataset, shown: usize) -> String {
    let query = &app.view(dataset).listing.query;
    let heading = match dataset {
        Dataset::Ledger => "Budget Projects",
        Dataset::PublicWorks => "Public Works",
    };
    if query.is_empty() {
        format!("{heading} ({shown})")
    } else {
        format!("{heading} ({shown}) search: '{query}'")
    }
}

fn render_table(f: &mut Frame, area: Rect, app: &App, dataset: Dataset, filtered: &[&NormalizedProject]) {
    let listing = &app.view(dataset).listing;
    let symbol = &app.config.currency_symbol;
    let page = listing.page_rows(filtered);

    let header_cells = ["#", "Project", "Category", "Location", "Budget", "Disbursed", "%", "Status"]
        .iter()
        .map(|h| Cell::from(*h).style(theme::header_style()));
    let header = Row::new(header_cells).height(1);

    let mut rows: Vec<Row> = Vec::with_capacity(page.len());
    for (i, project) in page.iter().enumerate() {
        let is_cursor = i == listing.cursor;
        let expanded = listing.is_expanded(&project.id);
        let style = if is_cursor {
            theme::selected_style()
        } else if i % 2 == 1 {
            theme::alt_row_style()
        } else {
            theme::normal_style()
        };
        let marker = if expanded { "▾" } else { "▸" };
        let status = if is_cursor {
            Cell::from(project.status.label())
        } else {
            Cell::from(Span::styled(
                project.status.label(),
                theme::status_style(project.status),
            ))
        };

        rows.push(
            Row::new(vec![
                Cell::from(format!("{marker} {}", project.id)),
                Cell::from(truncate(&project.name, 48)),
                Cell::from(truncate(&project.category, 24)),
                Cell::from(truncate(project.location_label(), 20)),
                Cell::from(format_currency(project.budget, symbol)),
                Cell::from(format_currency(project.disbursed, symbol)),
                Cell::from(format_percentage(Some(project.disbursed), Some(project.budget))),
                status,
            ])
            .style(style),
        );

        if expanded {
            rows.push(detail_row(project, symbol));
        }
    }

    let widths = [
        Constraint::Length(8),
        Constraint::Min(20),
        Constraint::Length(24),
        Constraint::Length(20),
        Constraint::Length(18),
        Constraint::Length(18),
        Constraint::Length(8),
        Constraint::Length(12),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(theme::panel_block(&title(app, dataset, filtered.len())));

    f.render_widget(table, area);
}

/// Extra lines under an expanded row: labels under the project name, figures
/// under the budget column.
fn detail_row(project: &NormalizedProject, symbol: &str) -> Row<'static> {
    let figures = [
        ("Increase", "+", project.increase),
        ("Decrease", "-", project.decrease),
        ("Committed", "", project.committed),
        ("Remaining", "", project.remaining),
    ];
    let labels: Vec<Line> = figures
        .iter()
        .map(|(label, _, _)| Line::from(Span::styled(format!("  {label}"), theme::dim_style())))
        .collect();
    let values: Vec<Line> = figures
        .iter()
        .map(|(_, sign, amount)| Line::from(format!("{sign}{}", format_currency(*amount, symbol))))
        .collect();
    let map_hint = if project.has_location() {
        "m: show on map"
    } else {
        "no coordinates"
    };

    Row::new(vec![
        Cell::from(""),
        Cell::from(Text::from(labels)),
        Cell::from(""),
        Cell::from(Span::styled(map_hint, theme::dim_style())),
        Cell::from(Text::from(values)),
    ])
    .height(figures.len() as u16)
    .style(Style::default().fg(theme::TEXT).bg(theme::COMMAND_BG))
}

fn render_pagination(f: &mut Frame, area: Rect, listing: &ProjectListing, total: usize) {
    let pages = listing.page_count(total);
    let first = if total == 0 { 0 } else { listing.page * listing.page_size + 1 };
    let last = (listing.page * listing.page_size + listing.page_size).min(total);
    let line = Line::from(vec![
        Span::styled(
            format!(" Page {} of {}", listing.page + 1, pages),
            Style::default().fg(theme::ACCENT),
        ),
        Span::styled(
            format!("  showing {first}-{last} of {}", format_count(total)),
            theme::dim_style(),
        ),
    ]);
    f.render_widget(Paragraph::new(line), area);
}
