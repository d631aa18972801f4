use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use wedplan_core::storage::DOCUMENT_KEY;
use wedplan_core::utils::{format_date, format_money};

use crate::app::App;
use crate::ui::styles;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    render_wedding(frame, app, chunks[0]);
    render_storage(frame, app, chunks[1]);
}

fn field_line(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<16}", label), styles::muted_style()),
        Span::styled(value, styles::list_item_style()),
    ])
}

fn or_unset(value: &str) -> String {
    if value.trim().is_empty() {
        "Not set".to_string()
    } else {
        value.to_string()
    }
}

fn render_wedding(frame: &mut Frame, app: &App, area: Rect) {
    let settings = app.planner.settings();
    let symbol = &app.config.currency_symbol;

    let lines = vec![
        Line::from(""),
        field_line("Groom", or_unset(&settings.groom_name)),
        field_line("Bride", or_unset(&settings.bride_name)),
        field_line("Wedding date", format_date(settings.wedding_date)),
        field_line("Total budget", format_money(settings.total_budget, symbol)),
        field_line("Guest estimate", settings.guest_estimate.to_string()),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Press ", styles::muted_style()),
            Span::styled("[e]", styles::help_key_style()),
            Span::styled(" to edit", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .title(" Wedding ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_storage(frame: &mut Frame, app: &App, area: Rect) {
    let location = match &app.data_dir {
        Some(dir) => dir.join(format!("{}.json", DOCUMENT_KEY)).display().to_string(),
        None => "memory only".to_string(),
    };

    let (state, state_style) = if app.planner.is_load_failed() {
        ("Saved data unreadable, not overwriting it", styles::error_style())
    } else if app.planner.is_degraded() || app.data_dir.is_none() {
        ("Not saving, changes are kept in memory", styles::error_style())
    } else {
        ("Saving after every change", styles::success_style())
    };

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled("  Stored at", styles::muted_style())),
        Line::from(Span::styled(format!("  {}", location), styles::list_item_style())),
        Line::from(""),
        Line::from(Span::styled(format!("  {}", state), state_style)),
        Line::from(Span::styled(format!("  {}", app.save_status()), styles::muted_style())),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Press ", styles::muted_style()),
            Span::styled("[R]", styles::help_key_style()),
            Span::styled(" to erase everything", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .title(" Storage ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
