use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{App, AppState, Confirm, Tab};
use crate::form::Form;

use super::styles;
use super::tabs::{dashboard, expenses, guests, settings, tasks};

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Length(3), // Tabs
            Constraint::Min(10),   // Main content
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    render_tabs(frame, app, chunks[1]);
    render_main_content(frame, app, chunks[2]);
    render_status_bar(frame, app, chunks[3]);

    // Render overlays
    match app.state {
        AppState::ShowingHelp => render_help_overlay(frame),
        AppState::Confirming(confirm) => render_confirm_overlay(frame, app, confirm),
        AppState::Editing => {
            if let Some(form) = &app.form {
                render_form_overlay(frame, form);
            }
        }
        AppState::Normal | AppState::Searching | AppState::Quitting => {}
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = match app.planner.settings().couple_display() {
        Some(couple) => format!("  wedplan · {}", couple),
        None => "  wedplan".to_string(),
    };
    let help_hint = "[?] Help";
    let title_len = title.chars().count();

    let title_line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::raw(" ".repeat(
            area.width
                .saturating_sub(title_len as u16 + help_hint.len() as u16 + 4)
                as usize,
        )),
        Span::styled(help_hint, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    let paragraph = Paragraph::new(title_line).block(block);
    frame.render_widget(paragraph, area);
}

fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::raw(" ")];
    for (i, tab) in Tab::ALL.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", styles::muted_style()));
        }
        let label = format!("[{}] {}", i + 1, tab.title());
        if *tab == app.current_tab {
            spans.push(Span::styled(label, styles::tab_style(true)));
        } else {
            spans.push(Span::styled(label, styles::muted_style()));
        }
    }

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    let paragraph = Paragraph::new(Line::from(spans)).block(block);
    frame.render_widget(paragraph, area);
}

fn render_main_content(frame: &mut Frame, app: &App, area: Rect) {
    match app.current_tab {
        Tab::Dashboard => dashboard::render(frame, app, area),
        Tab::Expenses => expenses::render(frame, app, area),
        Tab::Guests => guests::render(frame, app, area),
        Tab::Tasks => tasks::render(frame, app, area),
        Tab::Settings => settings::render(frame, app, area),
    }
}

fn shortcuts(app: &App) -> &'static str {
    match app.state {
        AppState::Searching => "[Enter] done | [Esc] clear",
        AppState::Editing => "[Tab] next | [Enter] save | [Esc] cancel",
        _ => match app.current_tab {
            Tab::Dashboard => "[e]dit settings | [q]uit",
            Tab::Expenses => "[a]dd | [d]elete | [f]ilter | [q]uit",
            Tab::Guests => "[a]dd | [d]elete | [s]tatus | [f]ilter | [/] search | [q]uit",
            Tab::Tasks => "[a]dd | [d]elete | [space] done | [f]ilter | [q]uit",
            Tab::Settings => "[e]dit | [R]eset | [q]uit",
        },
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let (left_text, left_style) = match &app.notice {
        Some(active) => (
            format!(" {} ", active.notice.message),
            styles::notice_style(active.notice.level),
        ),
        None if app.planner.is_degraded() => (
            format!(" {} ", app.save_status()),
            styles::error_style(),
        ),
        None => (format!(" {} ", app.save_status()), styles::muted_style()),
    };
    let right_text = format!(" {} ", shortcuts(app));

    let width = area.width as usize;
    let padding_len = width
        .saturating_sub(left_text.chars().count())
        .saturating_sub(right_text.chars().count());

    let status_line = Line::from(vec![
        Span::styled(left_text, left_style),
        Span::raw(" ".repeat(padding_len)),
        Span::styled(right_text, styles::muted_style()),
    ]);
    let paragraph = Paragraph::new(status_line).style(styles::status_bar_style());
    frame.render_widget(paragraph, area);
}

fn help_line(key: &'static str, desc: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<10}", key), styles::help_key_style()),
        Span::styled(desc, styles::help_desc_style()),
    ])
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(52, 26, frame.area());
    frame.render_widget(Clear, area);

    let version = env!("CARGO_PKG_VERSION");

    let help_text = vec![
        Line::from(Span::styled("  wedplan", styles::title_style())),
        Line::from(Span::styled(
            format!("  version {}", version),
            styles::muted_style(),
        )),
        Line::from(""),
        Line::from(Span::styled(" Navigation", styles::highlight_style())),
        help_line("1-5", "Switch tabs"),
        help_line("←/→", "Prev/next tab"),
        help_line("↑/↓ j/k", "Move selection"),
        help_line("PgUp/PgDn", "Move by a page"),
        Line::from(""),
        Line::from(Span::styled(" Lists", styles::highlight_style())),
        help_line("a", "Add"),
        help_line("d", "Delete selected"),
        help_line("f", "Cycle filter"),
        help_line("/", "Search guests by name"),
        help_line("s", "Cycle guest RSVP"),
        help_line("space", "Mark task done/open"),
        Line::from(""),
        Line::from(Span::styled(" Settings", styles::highlight_style())),
        help_line("e", "Edit names, date and budget"),
        help_line("R", "Erase all data"),
        help_line("q", "Quit"),
        Line::from(""),
        Line::from(vec![
            Span::styled("       Press ", styles::muted_style()),
            Span::styled("?", styles::help_key_style()),
            Span::styled(" or ", styles::muted_style()),
            Span::styled("Esc", styles::help_key_style()),
            Span::styled(" to close", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(help_text).block(block), area);
}

/// The question shown for a pending confirmation.
fn confirm_prompt(app: &App, confirm: Confirm) -> String {
    let document = app.planner.document();
    match confirm {
        Confirm::DeleteExpense(index) => match document.expenses.get(index) {
            Some(e) => format!("Delete expense \"{}\"?", e.title),
            None => "Delete this expense?".to_string(),
        },
        Confirm::DeleteGuest(index) => match document.guests.get(index) {
            Some(g) => format!("Remove {} from the guest list?", g.name),
            None => "Remove this guest?".to_string(),
        },
        Confirm::DeleteTask(index) => match document.tasks.get(index) {
            Some(t) => format!("Delete task \"{}\"?", t.title),
            None => "Delete this task?".to_string(),
        },
        Confirm::ResetAll => "Erase ALL data and start over?".to_string(),
        Confirm::Quit => "Are you sure you want to quit?".to_string(),
    }
}

fn render_confirm_overlay(frame: &mut Frame, app: &App, confirm: Confirm) {
    let area = centered_rect_fixed(50, 7, frame.area());
    frame.render_widget(Clear, area);

    let prompt_style = if matches!(confirm, Confirm::ResetAll) {
        styles::error_style()
    } else {
        styles::highlight_style()
    };

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("  {}", wedplan_core::utils::truncate(&confirm_prompt(app, confirm), 44)),
            prompt_style,
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Press ", styles::muted_style()),
            Span::styled("[Y]", styles::help_key_style()),
            Span::styled(" to confirm, ", styles::muted_style()),
            Span::styled("[N]", styles::help_key_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_form_overlay(frame: &mut Frame, form: &Form) {
    let height = form.fields.len() as u16 * 2 + if form.error.is_some() { 6 } else { 4 };
    let area = centered_rect_fixed(56, height, frame.area());
    frame.render_widget(Clear, area);

    let mut lines = vec![Line::from("")];
    for (i, field) in form.fields.iter().enumerate() {
        let focused = i == form.focus;
        let value_style = if form.is_error_field(i) {
            styles::error_style()
        } else if focused {
            styles::selected_style()
        } else {
            styles::list_item_style()
        };
        let label_style = if focused {
            styles::highlight_style()
        } else {
            styles::muted_style()
        };

        let value = if field.is_choice() {
            format!("◀ {} ▶", field.display())
        } else if focused {
            format!("{}▌", field.display())
        } else {
            field.display().to_string()
        };

        lines.push(Line::from(vec![
            Span::styled(format!("  {:>10}: ", field.label), label_style),
            Span::styled(value, value_style),
        ]));
        match field.hint {
            Some(hint) if focused => lines.push(Line::from(Span::styled(
                format!("              {}", hint),
                styles::muted_style(),
            ))),
            _ => lines.push(Line::from("")),
        }
    }

    if let Some(error) = &form.error {
        lines.push(Line::from(Span::styled(
            format!("  {}", error),
            styles::error_style(),
        )));
    }

    let block = Block::default()
        .title(format!(" {} ", form.kind.title()))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Create a centered rectangle with fixed dimensions
pub fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}
