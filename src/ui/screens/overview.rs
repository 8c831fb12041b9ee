use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Cell, Paragraph, Row, Table},
    Frame,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::snapshot::{Dataset, Snapshot};
use crate::summary::top_n;
use crate::ui::app::{App, LoadState};
use crate::ui::theme;
use crate::ui::util::{format_count, format_currency, format_millions, format_percentage, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let top_rows = app.config.top_projects as u16 + 3;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),        // Summary cards
            Constraint::Min(8),           // Charts
            Constraint::Length(top_rows), // Featured projects
        ])
        .split(area);

    let snapshot = app.snapshot(Dataset::Ledger);
    render_summary_cards(f, chunks[0], app, snapshot);

    let charts = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[1]);
    render_allocation_chart(f, charts[0], app, snapshot);
    render_progress_chart(f, charts[1], snapshot);
    render_featured(f, chunks[2], app, snapshot);
}

fn render_summary_cards(f: &mut Frame, area: Rect, app: &App, snapshot: &Snapshot) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(area);

    let summary = &snapshot.summary;
    let symbol = &app.config.currency_symbol;
    let total = Some(summary.totals.approved);
    let count = Decimal::from(summary.record_count);
    let completed = Decimal::from(summary.completed_count);

    render_card(
        f,
        cards[0],
        "Total Budget",
        format_currency(summary.totals.approved, symbol),
        theme::ACCENT,
        format!("FY {}", app.fiscal_year),
    );
    render_card(
        f,
        cards[1],
        "Disbursed",
        format_currency(summary.totals.disbursed, symbol),
        theme::GREEN,
        format!(
            "{} of total",
            format_percentage(Some(summary.totals.disbursed), total)
        ),
    );
    render_card(
        f,
        cards[2],
        "Projects",
        format_count(summary.record_count),
        theme::TEXT,
        format!(
            "{} of {} completed",
            format_count(summary.completed_count),
            format_count(summary.record_count)
        ),
    );
    render_card(
        f,
        cards[3],
        "Completed",
        format_count(summary.completed_count),
        theme::YELLOW,
        format!(
            "{} of all, {} outstanding",
            format_percentage(Some(completed), Some(count)),
            format_count(summary.in_progress_count())
        ),
    );
}

fn render_card(f: &mut Frame, area: Rect, title: &str, display: String, color: Color, subtitle: String) {
    let text = Paragraph::new(vec![
        Line::from(Span::styled(
            display,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(subtitle, theme::dim_style())),
    ])
    .centered()
    .block(theme::panel_block(title));

    f.render_widget(text, area);
}

fn empty_panel(f: &mut Frame, area: Rect, app: &App, title: &str) {
    let msg = match &app.ledger.state {
        LoadState::Loading => "Loading budget ledger...".to_string(),
        LoadState::Failed(e) => format!("Could not load budget ledger: {e}"),
        _ => "No budget records in this snapshot".to_string(),
    };
    let para = Paragraph::new(Line::from(Span::styled(msg, theme::dim_style())))
        .centered()
        .block(theme::panel_block(title));
    f.render_widget(para, area);
}

fn bar(label: &str, value: Decimal, color: Color) -> Bar<'static> {
    Bar::default()
        .value(value.max(Decimal::ZERO).to_u64().unwrap_or(0))
        .text_value(format_millions(value))
        .label(Line::from(label.to_string()))
        .style(Style::default().fg(color))
        .value_style(
            Style::default()
                .fg(theme::HEADER_BG)
                .bg(color)
                .add_modifier(Modifier::BOLD),
        )
}

fn render_allocation_chart(f: &mut Frame, area: Rect, app: &App, snapshot: &Snapshot) {
    let title = "Budget Allocation by Category";
    let categories = snapshot.summary.categories_by_approved();
    if categories.is_empty() {
        empty_panel(f, area, app, title);
        return;
    }

    let label_width = (area.width / 3).clamp(8, 28) as usize;
    let bars: Vec<Bar> = categories
        .iter()
        .map(|(name, group)| bar(&truncate(name, label_width), group.amounts.approved, theme::ACCENT))
        .collect();

    let chart = BarChart::default()
        .block(theme::panel_block(title))
        .direction(Direction::Horizontal)
        .data(BarGroup::default().bars(&bars))
        .bar_width(1)
        .bar_gap(0);

    f.render_widget(chart, area);
}

fn render_progress_chart(f: &mut Frame, area: Rect, snapshot: &Snapshot) {
    let totals = &snapshot.summary.totals;
    let bars = [
        bar("Disbursed", totals.disbursed, theme::GREEN),
        bar("Committed", totals.committed, theme::YELLOW),
        bar("Remaining", totals.remaining, theme::RED),
    ];

    let chart = BarChart::default()
        .block(theme::panel_block("Budget Progress"))
        .direction(Direction::Horizontal)
        .data(BarGroup::default().bars(&bars))
        .bar_width(1)
        .bar_gap(1);

    f.render_widget(chart, area);
}

fn render_featured(f: &mut Frame, area: Rect, app: &App, snapshot: &Snapshot) {
    let category = &app.config.featured_category;
    let symbol = &app.config.currency_symbol;
    let top = top_n(&snapshot.projects, category, app.config.top_projects);

    let title = format!("Top {} in {}", app.config.top_projects, category);
    if top.is_empty() {
        let para = Paragraph::new(Line::from(Span::styled(
            "No projects in this category",
            theme::dim_style(),
        )))
        .centered()
        .block(theme::panel_block(&title));
        f.render_widget(para, area);
        return;
    }

    let header = Row::new(["#", "Project", "Budget", "Disbursed", "Disbursed %", "Status"])
        .style(theme::header_style());
    let rows: Vec<Row> = top
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let style = if i % 2 == 1 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            };
            Row::new(vec![
                Cell::from(format!("{}", i + 1)),
                Cell::from(p.name.clone()),
                Cell::from(format_currency(p.budget, symbol)),
                Cell::from(format_currency(p.disbursed, symbol)),
                Cell::from(format_percentage(Some(p.disbursed), Some(p.budget))),
                Cell::from(Span::styled(p.status.label(), theme::status_style(p.status))),
            ])
            .style(style)
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(3),
            Constraint::Min(20),
            Constraint::Length(18),
            Constraint::Length(18),
            Constraint::Length(12),
            Constraint::Length(12),
        ],
    )
    .header(header)
    .block(theme::panel_block(&title));

    f.render_widget(table, area);
}
