use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::routes::Route;
use crate::ui::app::App;
use crate::ui::theme;

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "404",
            Style::default().fg(theme::RED).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("No page at '{}'", app.not_found_path),
            theme::normal_style(),
        )),
        Line::from(""),
        Line::from(Span::styled("Known pages:", theme::dim_style())),
    ];
    for path in Route::known() {
        lines.push(Line::from(Span::styled(format!("  {path}"), theme::dim_style())));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Press 1 for the overview or :go <path>",
        theme::dim_style(),
    )));

    f.render_widget(
        Paragraph::new(lines)
            .centered()
            .block(theme::panel_block("Not Found")),
        area,
    );
}
