use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Map, MapResolution, Points},
        List, ListItem, Paragraph,
    },
    Frame,
};

use crate::models::{NormalizedProject, ProjectStatus};
use crate::snapshot::Dataset;
use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_currency, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(68), Constraint::Percentage(32)])
        .split(area);

    let entries = app.map_entries();
    render_canvas(f, chunks[0], app, &entries);

    let side = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(7)])
        .split(chunks[1]);
    render_entry_list(f, side[0], app, &entries);
    render_selected(f, side[1], app, &entries);
}

fn render_canvas(f: &mut Frame, area: Rect, app: &App, entries: &[(Dataset, &NormalizedProject)]) {
    let inner_cols = area.width.saturating_sub(2);
    let inner_rows = area.height.saturating_sub(2);
    let (x_bounds, y_bounds) = app.map.viewport(inner_cols, inner_rows);

    // One point layer per status so each gets its own color
    let layers: Vec<(ProjectStatus, Vec<(f64, f64)>)> = ProjectStatus::all()
        .iter()
        .map(|status| {
            let coords = entries
                .iter()
                .filter(|(_, p)| p.status == *status)
                .filter_map(|(_, p)| p.coordinate.map(|c| (c.lng, c.lat)))
                .collect();
            (*status, coords)
        })
        .collect();

    let selected = entries.get(app.map.selected).and_then(|(_, p)| {
        p.coordinate
            .map(|c| (c.lng, c.lat, truncate(&p.name, 30)))
    });

    let title = format!(
        "Map  zoom {}  {:.4}, {:.4}",
        app.map.zoom, app.map.center_lat, app.map.center_lng
    );

    let canvas = Canvas::default()
        .block(theme::panel_block(&title))
        .marker(Marker::Braille)
        .x_bounds(x_bounds)
        .y_bounds(y_bounds)
        .paint(|ctx| {
            ctx.draw(&Map {
                color: theme::OVERLAY,
                resolution: MapResolution::High,
            });
            ctx.layer();
            for (status, coords) in &layers {
                ctx.draw(&Points {
                    coords: coords.as_slice(),
                    color: theme::status_color(*status),
                });
            }
            if let Some((x, y, name)) = &selected {
                ctx.draw(&Points {
                    coords: &[(*x, *y)],
                    color: theme::ACCENT,
                });
                ctx.print(
                    *x,
                    *y,
                    Line::from(Span::styled(
                        format!(" ◉ {name}"),
                        Style::default()
                            .fg(theme::ACCENT)
                            .add_modifier(Modifier::BOLD),
                    )),
                );
            }
        });

    f.render_widget(canvas, area);
}

fn render_entry_list(f: &mut Frame, area: Rect, app: &App, entries: &[(Dataset, &NormalizedProject)]) {
    let title = format!("Mapped Projects ({})", entries.len());
    if entries.is_empty() {
        let msg = if app.any_loading() {
            "Loading snapshots..."
        } else {
            "No project has coordinates"
        };
        let para = Paragraph::new(Line::from(Span::styled(msg, theme::dim_style())))
            .centered()
            .block(theme::panel_block(&title));
        f.render_widget(para, area);
        return;
    }

    // Keep the cursor inside the window even when focus moved it
    let rows = area.height.saturating_sub(2) as usize;
    let mut start = app.map.scroll;
    if app.map.selected < start {
        start = app.map.selected;
    } else if rows > 0 && app.map.selected >= start + rows {
        start = app.map.selected + 1 - rows;
    }

    let width = area.width.saturating_sub(6) as usize;
    let items: Vec<ListItem> = entries
        .iter()
        .enumerate()
        .skip(start)
        .take(rows)
        .map(|(i, (dataset, p))| {
            let focused = app.map.is_focused(*dataset, &p.id);
            let dot = Span::styled("● ", theme::status_style(p.status));
            let name = truncate(&p.name, width);
            let style = if i == app.map.selected {
                theme::selected_style()
            } else if focused {
                Style::default().fg(theme::ACCENT)
            } else {
                theme::normal_style()
            };
            ListItem::new(Line::from(vec![dot, Span::styled(name, style)]))
        })
        .collect();

    f.render_widget(List::new(items).block(theme::panel_block(&title)), area);
}

fn render_selected(f: &mut Frame, area: Rect, app: &App, entries: &[(Dataset, &NormalizedProject)]) {
    let Some((dataset, p)) = entries.get(app.map.selected) else {
        f.render_widget(Paragraph::new("").block(theme::panel_block("Selected")), area);
        return;
    };
    let symbol = &app.config.currency_symbol;
    let lines = vec![
        Line::from(Span::styled(
            p.name.clone(),
            Style::default().fg(theme::TEXT).add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled(format!("{dataset} #{}  ", p.id), theme::dim_style()),
            Span::styled(p.status.label(), theme::status_style(p.status)),
        ]),
        Line::from(Span::styled(p.location_label().to_string(), theme::dim_style())),
        Line::from(format!(
            "{} / {}",
            format_currency(p.disbursed, symbol),
            format_currency(p.budget, symbol)
        )),
    ];
    f.render_widget(
        Paragraph::new(lines).block(theme::panel_block("Selected")),
        area,
    );
}
