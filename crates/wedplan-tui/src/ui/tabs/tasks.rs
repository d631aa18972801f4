use ratatui::{
    layout::{Constraint, Rect},
    text::Span,
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};
use wedplan_core::utils::truncate;

use crate::app::App;
use crate::ui::styles;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let tasks = app.task_rows();
    let summary = app.planner.summary();

    let header = Row::new([
        Cell::from(""),
        Cell::from("Task"),
        Cell::from("Category"),
        Cell::from(""),
    ])
    .style(styles::title_style())
    .height(1);

    let rows: Vec<Row> = if tasks.is_empty() {
        vec![Row::new(vec![
            Cell::from(""),
            Cell::from(Span::styled("No tasks here", styles::muted_style())),
        ])]
    } else {
        tasks
            .iter()
            .map(|t| {
                let (check, style) = if t.done {
                    ("[x]", styles::muted_style())
                } else {
                    ("[ ]", styles::list_item_style())
                };
                let urgent = if t.urgent && !t.done { "urgent" } else { "" };
                Row::new(vec![
                    Cell::from(check),
                    Cell::from(truncate(&t.title, 48)),
                    Cell::from(Span::styled(truncate(&t.category, 20), styles::muted_style())),
                    Cell::from(Span::styled(urgent, styles::error_style())),
                ])
                .style(style)
            })
            .collect()
    };

    let widths = [
        Constraint::Length(4),
        Constraint::Fill(3),
        Constraint::Fill(1),
        Constraint::Length(7),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(format!(
                    " Tasks ({} of {} done) · {} ",
                    summary.tasks_done,
                    summary.tasks_total,
                    app.task_filter.label()
                ))
                .title_style(styles::title_style())
                .borders(Borders::ALL)
                .border_style(styles::border_style(true)),
        )
        .row_highlight_style(styles::selected_style());

    let mut state = TableState::default();
    if !tasks.is_empty() {
        state.select(Some(app.task_selection));
    }

    frame.render_stateful_widget(table, area, &mut state);
}
