use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};
use wedplan_core::utils::{format_money, truncate};

use crate::app::{App, AppState};
use crate::ui::styles;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5)])
        .split(area);

    render_search(frame, app, chunks[0]);
    render_table(frame, app, chunks[1]);
}

fn render_search(frame: &mut Frame, app: &App, area: Rect) {
    let searching = matches!(app.state, AppState::Searching);

    let line = if searching {
        Line::from(vec![
            Span::styled(" / ", styles::search_style()),
            Span::styled(format!("{}▌", app.search_input), styles::search_style()),
        ])
    } else if app.guest_filter.search.is_empty() {
        Line::from(Span::styled(" Press [/] to search by name", styles::muted_style()))
    } else {
        Line::from(vec![
            Span::styled(" Search: ", styles::muted_style()),
            Span::styled(app.guest_filter.search.clone(), styles::search_style()),
            Span::styled("  [Esc] clear", styles::muted_style()),
        ])
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(searching));

    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn render_table(frame: &mut Frame, app: &App, area: Rect) {
    let symbol = &app.config.currency_symbol;
    let guests = app.guest_rows();
    let people: u32 = guests.iter().map(|g| g.count).sum();

    let header = Row::new([
        Cell::from("Name"),
        Cell::from("Side"),
        Cell::from("Party"),
        Cell::from("RSVP"),
        Cell::from("Gift"),
    ])
    .style(styles::title_style())
    .height(1);

    let rows: Vec<Row> = if guests.is_empty() {
        let message = if app.planner.document().guests.is_empty() {
            "No guests. Press [a] to add one."
        } else {
            "No guests match the filter"
        };
        vec![Row::new(vec![Cell::from(Span::styled(
            message,
            styles::muted_style(),
        ))])]
    } else {
        guests
            .iter()
            .map(|g| {
                Row::new(vec![
                    Cell::from(truncate(&g.name, 32)),
                    Cell::from(Span::styled(g.side.to_string(), styles::muted_style())),
                    Cell::from(format!("{:>5}", g.count)),
                    Cell::from(Span::styled(
                        g.status.to_string(),
                        styles::guest_status_style(g.status),
                    )),
                    Cell::from(if g.gift > 0.0 {
                        format_money(g.gift, symbol)
                    } else {
                        String::new()
                    }),
                ])
                .style(styles::list_item_style())
            })
            .collect()
    };

    let widths = [
        Constraint::Fill(3),
        Constraint::Length(8),
        Constraint::Length(7),
        Constraint::Length(11),
        Constraint::Fill(1),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(format!(
                    " Guests ({} entries, {} people) · {} ",
                    guests.len(),
                    people,
                    app.guest_filter.status_label()
                ))
                .title_style(styles::title_style())
                .borders(Borders::ALL)
                .border_style(styles::border_style(!matches!(app.state, AppState::Searching))),
        )
        .row_highlight_style(styles::selected_style());

    let mut state = TableState::default();
    if !guests.is_empty() {
        state.select(Some(app.guest_selection));
    }

    frame.render_stateful_widget(table, area, &mut state);
}
