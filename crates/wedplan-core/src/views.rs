//! Pure view models: entity lists plus transient filter state in, display rows
//! out. Rows remember their index in the document so actions on a filtered
//! list still address the right entity.

use crate::models::{Document, GuestStatus, Side, EXPENSE_CATEGORIES};
use crate::summary::{Countdown, Summary};
use crate::utils::{contains_ignore_case, format_money, format_percent};

// ============================================================================
// Expenses
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpenseFilter {
    /// `None` shows every category.
    pub category: Option<String>,
}

impl ExpenseFilter {
    /// Step to the next category in `options`, wrapping back to "all".
    pub fn cycle(&mut self, options: &[String]) {
        self.category = match &self.category {
            None => options.first().cloned(),
            Some(current) => {
                let next = options.iter().position(|c| c == current).map(|i| i + 1);
                next.and_then(|i| options.get(i)).cloned()
            }
        };
    }

    pub fn label(&self) -> &str {
        self.category.as_deref().unwrap_or("All")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseRow {
    pub index: usize,
    pub id: String,
    pub title: String,
    pub category: String,
    pub cost: f64,
    pub paid: f64,
    pub balance: f64,
    pub fully_paid: bool,
    pub note: String,
}

pub fn expense_rows(document: &Document, filter: &ExpenseFilter) -> Vec<ExpenseRow> {
    document
        .expenses
        .iter()
        .enumerate()
        .filter(|(_, e)| match &filter.category {
            Some(category) => e.category_or_default() == category,
            None => true,
        })
        .map(|(index, e)| ExpenseRow {
            index,
            id: e.id.clone(),
            title: e.title.clone(),
            category: e.category_or_default().to_string(),
            cost: e.cost,
            paid: e.paid,
            balance: e.balance(),
            fully_paid: e.is_fully_paid(),
            note: e.note.clone(),
        })
        .collect()
}

/// Suggested categories followed by any other category in use.
pub fn category_options(document: &Document) -> Vec<String> {
    let mut options: Vec<String> = EXPENSE_CATEGORIES.iter().map(|c| c.to_string()).collect();
    for expense in &document.expenses {
        let category = expense.category_or_default();
        if !options.iter().any(|c| c == category) {
            options.push(category.to_string());
        }
    }
    options
}

// ============================================================================
// Guests
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuestFilter {
    pub status: Option<GuestStatus>,
    /// Applied search text. Matches names case-insensitively.
    pub search: String,
}

impl GuestFilter {
    /// All -> confirmed -> pending -> declined -> all.
    pub fn cycle_status(&mut self) {
        self.status = match self.status {
            None => Some(GuestStatus::Confirmed),
            Some(GuestStatus::Confirmed) => Some(GuestStatus::Pending),
            Some(GuestStatus::Pending) => Some(GuestStatus::Declined),
            Some(GuestStatus::Declined) => None,
        };
    }

    pub fn status_label(&self) -> &'static str {
        match self.status {
            None => "All",
            Some(GuestStatus::Confirmed) => "Confirmed",
            Some(GuestStatus::Pending) => "Pending",
            Some(GuestStatus::Declined) => "Declined",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GuestRow {
    pub index: usize,
    pub id: String,
    pub name: String,
    pub side: Side,
    pub count: u32,
    pub status: GuestStatus,
    pub gift: f64,
}

pub fn guest_rows(document: &Document, filter: &GuestFilter) -> Vec<GuestRow> {
    let search = filter.search.trim();
    document
        .guests
        .iter()
        .enumerate()
        .filter(|(_, g)| filter.status.map_or(true, |s| g.status == s))
        .filter(|(_, g)| contains_ignore_case(&g.name, search))
        .map(|(index, g)| GuestRow {
            index,
            id: g.id.clone(),
            name: g.name.clone(),
            side: g.side,
            count: g.count,
            status: g.status,
            gift: g.gift,
        })
        .collect()
}

// ============================================================================
// Tasks
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskFilter {
    #[default]
    All,
    Open,
    Done,
}

impl TaskFilter {
    pub fn next(self) -> Self {
        match self {
            TaskFilter::All => TaskFilter::Open,
            TaskFilter::Open => TaskFilter::Done,
            TaskFilter::Done => TaskFilter::All,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TaskFilter::All => "All",
            TaskFilter::Open => "Open",
            TaskFilter::Done => "Done",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRow {
    pub index: usize,
    pub id: String,
    pub title: String,
    pub category: String,
    pub done: bool,
    pub urgent: bool,
}

pub fn task_rows(document: &Document, filter: TaskFilter) -> Vec<TaskRow> {
    document
        .tasks
        .iter()
        .enumerate()
        .filter(|(_, t)| match filter {
            TaskFilter::All => true,
            TaskFilter::Open => !t.done,
            TaskFilter::Done => t.done,
        })
        .map(|(index, t)| TaskRow {
            index,
            id: t.id.clone(),
            title: t.title.clone(),
            category: t.category.clone(),
            done: t.done,
            urgent: t.urgent,
        })
        .collect()
}

// ============================================================================
// Dashboard
// ============================================================================

/// One labelled figure on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stat {
    pub label: &'static str,
    pub value: String,
}

impl Stat {
    fn new(label: &'static str, value: String) -> Self {
        Self { label, value }
    }
}

pub fn budget_stats(summary: &Summary, symbol: &str) -> Vec<Stat> {
    vec![
        Stat::new("Budget", format_money(summary.total_budget, symbol)),
        Stat::new("Quoted", format_money(summary.total_cost, symbol)),
        Stat::new("Paid", format_money(summary.total_paid, symbol)),
        Stat::new("Left to pay", format_money(summary.unpaid, symbol)),
        Stat::new("Budget left", format_money(summary.remaining, symbol)),
        Stat::new("Paid of budget", format_percent(summary.paid_fraction)),
    ]
}

pub fn guest_stats(summary: &Summary, guest_estimate: u32, symbol: &str) -> Vec<Stat> {
    vec![
        Stat::new(
            "Invited",
            format!("{} of ~{}", summary.total_guests, guest_estimate),
        ),
        Stat::new("Confirmed", summary.confirmed.to_string()),
        Stat::new("Pending", summary.pending.to_string()),
        Stat::new("Declined", summary.declined.to_string()),
        Stat::new(
            "Groom / Bride / Both",
            format!(
                "{} / {} / {}",
                summary.guests_by_side.groom, summary.guests_by_side.bride, summary.guests_by_side.both
            ),
        ),
        Stat::new("Gifts", format_money(summary.total_gifts, symbol)),
    ]
}

pub fn task_stats(summary: &Summary) -> Vec<Stat> {
    vec![
        Stat::new(
            "Done",
            format!("{} of {}", summary.tasks_done, summary.tasks_total),
        ),
        Stat::new("Urgent open", summary.urgent_open.to_string()),
        Stat::new("Progress", format!("{}%", summary.progress_percent)),
    ]
}

/// "42 days 03:12:09", or a day-of message once the date arrives.
pub fn countdown_label(countdown: Option<Countdown>) -> String {
    match countdown {
        None => "Set a wedding date in Settings".to_string(),
        Some(c) if c.is_past() => format!(
            "Married {} {} ago",
            c.days_since,
            if c.days_since == 1 { "day" } else { "days" }
        ),
        Some(c) if c.is_today_or_past() => "Mazal tov! The day is here".to_string(),
        Some(c) => format!(
            "{} {} {:02}:{:02}:{:02}",
            c.days,
            if c.days == 1 { "day" } else { "days" },
            c.hours,
            c.minutes,
            c.seconds
        ),
    }
}
