use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};
use wedplan_core::utils::{format_money, truncate};

use crate::app::App;
use crate::ui::styles;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(3)])
        .split(area);

    render_table(frame, app, chunks[0]);
    render_totals(frame, app, chunks[1]);
}

fn render_table(frame: &mut Frame, app: &App, area: Rect) {
    let symbol = &app.config.currency_symbol;
    let expenses = app.expense_rows();

    let header = Row::new([
        Cell::from("Title"),
        Cell::from("Category"),
        Cell::from("Cost"),
        Cell::from("Paid"),
        Cell::from("Balance"),
        Cell::from("Note"),
    ])
    .style(styles::title_style())
    .height(1);

    let rows: Vec<Row> = if expenses.is_empty() {
        vec![Row::new(vec![Cell::from(Span::styled(
            "No expenses. Press [a] to add one.",
            styles::muted_style(),
        ))])]
    } else {
        expenses
            .iter()
            .map(|e| {
                let paid_style = if e.fully_paid {
                    styles::success_style()
                } else {
                    styles::list_item_style()
                };
                Row::new(vec![
                    Cell::from(truncate(&e.title, 28)),
                    Cell::from(Span::styled(truncate(&e.category, 22), styles::muted_style())),
                    Cell::from(format_money(e.cost, symbol)),
                    Cell::from(Span::styled(format_money(e.paid, symbol), paid_style)),
                    Cell::from(Span::styled(
                        format_money(e.balance, symbol),
                        styles::amount_style(e.balance),
                    )),
                    Cell::from(Span::styled(truncate(&e.note, 30), styles::muted_style())),
                ])
                .style(styles::list_item_style())
            })
            .collect()
    };

    let widths = [
        Constraint::Fill(3),
        Constraint::Fill(2),
        Constraint::Length(12),
        Constraint::Length(12),
        Constraint::Length(12),
        Constraint::Fill(2),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(format!(
                    " Expenses ({}) · {} ",
                    expenses.len(),
                    app.expense_filter.label()
                ))
                .title_style(styles::title_style())
                .borders(Borders::ALL)
                .border_style(styles::border_style(true)),
        )
        .row_highlight_style(styles::selected_style());

    let mut state = TableState::default();
    if !expenses.is_empty() {
        state.select(Some(app.expense_selection));
    }

    frame.render_stateful_widget(table, area, &mut state);
}

/// Totals for the rows currently shown.
fn render_totals(frame: &mut Frame, app: &App, area: Rect) {
    let symbol = &app.config.currency_symbol;
    let expenses = app.expense_rows();
    let cost: f64 = expenses.iter().map(|e| e.cost).sum();
    let paid: f64 = expenses.iter().map(|e| e.paid).sum();

    let line = Line::from(vec![
        Span::styled(" Quoted ", styles::muted_style()),
        Span::styled(format_money(cost, symbol), styles::list_item_style()),
        Span::styled("   Paid ", styles::muted_style()),
        Span::styled(format_money(paid, symbol), styles::success_style()),
        Span::styled("   Left to pay ", styles::muted_style()),
        Span::styled(format_money(cost - paid, symbol), styles::amount_style(cost - paid)),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    frame.render_widget(Paragraph::new(line).block(block), area);
}
