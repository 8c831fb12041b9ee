use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Cell, Gauge, Row, Table, Tabs},
    Frame,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::models::ProjectStatus;
use crate::snapshot::Snapshot;
use crate::summary::{count_by_location, status_counts, CategorySummary};
use crate::ui::app::{App, ReportTab};
use crate::ui::theme;
use crate::ui::util::{format_count, format_currency, format_percentage, ratio, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(5)])
        .split(area);

    render_tabs(f, chunks[0], app);

    let snapshot = app.snapshot(app.report_dataset);
    match app.report_tab {
        ReportTab::Budget => render_budget(f, chunks[1], app, snapshot),
        ReportTab::Projects => render_projects(f, chunks[1], snapshot),
        ReportTab::Location => render_locations(f, chunks[1], snapshot),
    }
}

fn render_tabs(f: &mut Frame, area: Rect, app: &App) {
    let mut titles: Vec<Line> = ReportTab::all()
        .iter()
        .map(|t| Line::from(format!("{t}")))
        .collect();
    titles.push(Line::from(Span::styled(
        format!("dataset: {}", app.report_dataset),
        theme::dim_style(),
    )));
    let selected = ReportTab::all()
        .iter()
        .position(|t| *t == app.report_tab)
        .unwrap_or(0);

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(theme::dim_style())
        .highlight_style(theme::active_tab_style())
        .divider(Span::styled(" | ", Style::default().fg(theme::OVERLAY)));
    f.render_widget(tabs, area);
}

// ── Budget ───────────────────────────────────────────────────

fn render_budget(f: &mut Frame, area: Rect, app: &App, snapshot: &Snapshot) {
    let summary = &snapshot.summary;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let symbol = &app.config.currency_symbol;
    let total = summary.totals.approved;
    render_group_table(
        f,
        chunks[0],
        "Budget by Category",
        &summary.categories_by_approved(),
        total,
        symbol,
    );
    render_group_table(
        f,
        chunks[1],
        "Budget by Type",
        &summary.types_by_approved(),
        total,
        symbol,
    );
}

fn render_group_table(
    f: &mut Frame,
    area: Rect,
    title: &str,
    groups: &[(&str, &CategorySummary)],
    total: Decimal,
    symbol: &str,
) {
    let header = Row::new(["Name", "Projects", "Approved", "Disbursed", "Remaining", "Share"])
        .style(theme::header_style());
    let rows: Vec<Row> = groups
        .iter()
        .enumerate()
        .map(|(i, (name, group))| {
            let a = &group.amounts;
            let style = if i % 2 == 1 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            };
            Row::new(vec![
                Cell::from(truncate(name, 40)),
                Cell::from(format_count(group.count)),
                Cell::from(format_currency(a.approved, symbol)),
                Cell::from(format_currency(a.disbursed, symbol)),
                Cell::from(format_currency(a.remaining, symbol)),
                Cell::from(format_percentage(Some(a.approved), Some(total))),
            ])
            .style(style)
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Min(20),
            Constraint::Length(9),
            Constraint::Length(20),
            Constraint::Length(20),
            Constraint::Length(20),
            Constraint::Length(9),
        ],
    )
    .header(header)
    .block(theme::panel_block(&format!("{title} ({})", groups.len())));
    f.render_widget(table, area);
}

// ── Projects ─────────────────────────────────────────────────

fn render_projects(f: &mut Frame, area: Rect, snapshot: &Snapshot) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(area);

    let counts = status_counts(&snapshot.projects);
    let all = Decimal::from(counts.total());
    let rows: Vec<Row> = ProjectStatus::all()
        .iter()
        .map(|status| {
            let n = counts.get(*status);
            Row::new(vec![
                Cell::from(Span::styled(status.label(), theme::status_style(*status))),
                Cell::from(format_count(n)),
                Cell::from(format_percentage(Some(Decimal::from(n)), Some(all))),
            ])
        })
        .collect();
    let table = Table::new(
        rows,
        [
            Constraint::Length(14),
            Constraint::Length(10),
            Constraint::Length(10),
        ],
    )
    .header(Row::new(["Status", "Projects", "Share"]).style(theme::header_style()))
    .block(theme::panel_block(&format!(
        "Project Status ({})",
        format_count(counts.total())
    )));
    f.render_widget(table, chunks[0]);

    let completed = Decimal::from(counts.completed);
    render_gauge(
        f,
        chunks[1],
        "Completed Projects",
        ratio(Some(completed), Some(all)),
        theme::GREEN,
    );
    let totals = &snapshot.summary.totals;
    render_gauge(
        f,
        chunks[2],
        "Budget Disbursed",
        ratio(Some(totals.disbursed), Some(totals.approved)),
        theme::ACCENT,
    );
}

fn render_gauge(f: &mut Frame, area: Rect, title: &str, share: Option<Decimal>, color: Color) {
    let value = share.and_then(|r| r.to_f64()).unwrap_or(0.0).clamp(0.0, 1.0);
    let label = format_percentage(share, Some(Decimal::ONE));
    let gauge = Gauge::default()
        .block(theme::panel_block(title))
        .gauge_style(Style::default().fg(color).bg(theme::SURFACE))
        .ratio(value)
        .label(label);
    f.render_widget(gauge, area);
}

// ── Location ─────────────────────────────────────────────────

fn render_locations(f: &mut Frame, area: Rect, snapshot: &Snapshot) {
    let counts = count_by_location(&snapshot.projects);
    let largest = counts.first().map_or(1, |(_, n)| (*n).max(1));
    let bar_width = area.width.saturating_sub(50).max(10) as usize;

    let rows: Vec<Row> = counts
        .iter()
        .enumerate()
        .map(|(i, (location, n))| {
            let filled = (n * bar_width).div_ceil(largest);
            let style = if i % 2 == 1 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            };
            Row::new(vec![
                Cell::from(truncate(location, 30)),
                Cell::from(format_count(*n)),
                Cell::from(Span::styled("█".repeat(filled), Style::default().fg(theme::ACCENT))),
            ])
            .style(style)
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(30),
            Constraint::Length(10),
            Constraint::Min(10),
        ],
    )
    .header(Row::new(["Location", "Projects", ""]).style(theme::header_style()))
    .block(theme::panel_block(&format!("Projects by Location ({})", counts.len())));
    f.render_widget(table, area);
}
