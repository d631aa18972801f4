use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Gauge, Paragraph, Row, Table},
    Frame,
};
use wedplan_core::utils::{format_date, format_money};
use wedplan_core::views::{self, Stat};
use wedplan_core::Summary;

use crate::app::App;
use crate::ui::styles;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let summary = app.planner.summary();

    // 1. Countdown (full width)
    // 2. Progress gauges
    // 3. Budget | Guests | Tasks
    // 4. Spending by category
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(5),
            Constraint::Length(9),
            Constraint::Min(4),
        ])
        .split(area);

    render_countdown(frame, app, chunks[0]);
    render_gauges(frame, summary, chunks[1]);

    let stat_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(34),
            Constraint::Percentage(33),
            Constraint::Percentage(33),
        ])
        .split(chunks[2]);

    let symbol = &app.config.currency_symbol;
    let estimate = app.planner.settings().guest_estimate;
    render_stats(frame, " Budget ", &views::budget_stats(summary, symbol), stat_chunks[0]);
    render_stats(frame, " Guests ", &views::guest_stats(summary, estimate, symbol), stat_chunks[1]);
    render_stats(frame, " Tasks ", &views::task_stats(summary), stat_chunks[2]);

    render_categories(frame, summary, symbol, chunks[3]);
}

fn render_countdown(frame: &mut Frame, app: &App, area: Rect) {
    let settings = app.planner.settings();
    let lines = vec![
        Line::from(vec![
            Span::styled("Wedding day: ", styles::muted_style()),
            Span::styled(format_date(settings.wedding_date), styles::highlight_style()),
        ]),
        Line::from(Span::styled(
            views::countdown_label(app.countdown()),
            styles::title_style(),
        )),
    ];

    let block = Block::default()
        .title(" Countdown ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_gauges(frame: &mut Frame, summary: &Summary, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1); 3])
        .margin(1)
        .split(area);

    let rsvp_fraction = if summary.total_guests > 0 {
        summary.confirmed as f64 / summary.total_guests as f64
    } else {
        0.0
    };

    let gauges = [
        ("Budget paid", summary.paid_fraction),
        ("Confirmed", rsvp_fraction),
        ("Overall", f64::from(summary.progress_percent) / 100.0),
    ];

    let block = Block::default()
        .title(" Progress ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));
    frame.render_widget(block, area);

    for ((label, ratio), row) in gauges.iter().zip(rows.iter()) {
        let gauge = Gauge::default()
            .gauge_style(styles::gauge_style())
            .ratio(ratio.clamp(0.0, 1.0))
            .label(format!("{} {:.0}%", label, ratio * 100.0));
        frame.render_widget(gauge, *row);
    }
}

fn render_stats(frame: &mut Frame, title: &str, stats: &[Stat], area: Rect) {
    let lines: Vec<Line> = stats
        .iter()
        .map(|stat| {
            Line::from(vec![
                Span::styled(format!("{:<22}", stat.label), styles::muted_style()),
                Span::styled(stat.value.clone(), styles::list_item_style()),
            ])
        })
        .collect();

    let block = Block::default()
        .title(title.to_string())
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_categories(frame: &mut Frame, summary: &Summary, symbol: &str, area: Rect) {
    let header = Row::new([
        Cell::from("Category"),
        Cell::from("Items"),
        Cell::from("Quoted"),
        Cell::from("Paid"),
    ])
    .style(styles::title_style())
    .height(1);

    let rows: Vec<Row> = if summary.categories.is_empty() {
        vec![Row::new(vec![Cell::from(Span::styled(
            "No expenses yet",
            styles::muted_style(),
        ))])]
    } else {
        summary
            .categories
            .iter()
            .map(|c| {
                Row::new(vec![
                    Cell::from(c.category.clone()),
                    Cell::from(format!("{:>5}", c.items)),
                    Cell::from(format_money(c.cost, symbol)),
                    Cell::from(format_money(c.paid, symbol)),
                ])
                .style(styles::list_item_style())
            })
            .collect()
    };

    let widths = [
        Constraint::Fill(3),
        Constraint::Length(6),
        Constraint::Fill(1),
        Constraint::Fill(1),
    ];

    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .title(" Spending by Category ")
            .title_style(styles::title_style())
            .borders(Borders::ALL)
            .border_style(styles::border_style(false)),
    );

    frame.render_widget(table, area);
}
