//! Derived totals for the dashboard.
//!
//! `summarize` folds a document into a `Summary`. `SummaryCache` memoizes the
//! result until the next mutation invalidates it.

use std::cell::{Cell, OnceCell};

use chrono::{DateTime, Local, NaiveDate, TimeZone};

use crate::models::{Document, GuestStatus, Side};

/// Totals for one expense category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    pub category: String,
    pub cost: f64,
    pub paid: f64,
    pub items: usize,
}

/// Head counts per family side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SideCounts {
    pub groom: u32,
    pub bride: u32,
    pub both: u32,
}

/// A derived-values snapshot of a document.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Summary {
    pub total_budget: f64,
    pub total_cost: f64,
    pub total_paid: f64,
    /// Cost not yet paid. Negative when payments exceed quotes.
    pub unpaid: f64,
    /// Configured budget minus what has been paid.
    pub remaining: f64,
    /// `total_paid / total_budget` clamped to `[0, 1]`.
    pub paid_fraction: f64,

    pub total_guests: u32,
    pub confirmed: u32,
    pub pending: u32,
    pub declined: u32,
    pub guests_by_side: SideCounts,
    pub total_gifts: f64,

    pub tasks_done: usize,
    pub tasks_total: usize,
    pub urgent_open: usize,
    pub task_fraction: f64,

    /// Overall planning progress, 0..=100.
    pub progress_percent: u8,

    pub categories: Vec<CategoryTotal>,
}

/// `numerator / denominator`, or 0 when the denominator is not positive.
fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        let value = numerator / denominator;
        if value.is_finite() {
            value
        } else {
            0.0
        }
    } else {
        0.0
    }
}

pub fn summarize(document: &Document) -> Summary {
    let mut summary = Summary {
        total_budget: document.settings.total_budget,
        ..Default::default()
    };

    for expense in &document.expenses {
        summary.total_cost += expense.cost;
        summary.total_paid += expense.paid;

        let category = expense.category_or_default();
        match summary
            .categories
            .iter_mut()
            .find(|c| c.category == category)
        {
            Some(total) => {
                total.cost += expense.cost;
                total.paid += expense.paid;
                total.items += 1;
            }
            None => summary.categories.push(CategoryTotal {
                category: category.to_string(),
                cost: expense.cost,
                paid: expense.paid,
                items: 1,
            }),
        }
    }
    summary.unpaid = summary.total_cost - summary.total_paid;
    summary.remaining = summary.total_budget - summary.total_paid;
    summary.paid_fraction = ratio(summary.total_paid, summary.total_budget).clamp(0.0, 1.0);

    for guest in &document.guests {
        let count = guest.count;
        summary.total_guests = summary.total_guests.saturating_add(count);
        let by_status = match guest.status {
            GuestStatus::Confirmed => &mut summary.confirmed,
            GuestStatus::Pending => &mut summary.pending,
            GuestStatus::Declined => &mut summary.declined,
        };
        *by_status = by_status.saturating_add(count);
        let by_side = match guest.side {
            Side::Groom => &mut summary.guests_by_side.groom,
            Side::Bride => &mut summary.guests_by_side.bride,
            Side::Both => &mut summary.guests_by_side.both,
        };
        *by_side = by_side.saturating_add(count);
        summary.total_gifts += guest.gift;
    }

    summary.tasks_total = document.tasks.len();
    summary.tasks_done = document.tasks.iter().filter(|t| t.done).count();
    summary.urgent_open = document.tasks.iter().filter(|t| t.is_urgent_open()).count();
    summary.task_fraction = ratio(summary.tasks_done as f64, summary.tasks_total as f64);

    // Having any expense and any guest each count as one completed step.
    let steps_done = summary.tasks_done
        + usize::from(!document.expenses.is_empty())
        + usize::from(!document.guests.is_empty());
    let steps_total = summary.tasks_total + 2;
    let percent = (ratio(steps_done as f64, steps_total as f64) * 100.0).round();
    summary.progress_percent = percent.clamp(0.0, 100.0) as u8;

    summary
}

/// Memoized summary; computed at most once per invalidation.
///
/// Reads take `&self` so render code holding a shared reference can still
/// fill the cache.
#[derive(Debug, Default)]
pub struct SummaryCache {
    snapshot: OnceCell<Summary>,
    computations: Cell<u64>,
}

impl SummaryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, document: &Document) -> &Summary {
        self.snapshot.get_or_init(|| {
            self.computations.set(self.computations.get() + 1);
            summarize(document)
        })
    }

    pub fn invalidate(&mut self) {
        self.snapshot.take();
    }

    pub fn is_valid(&self) -> bool {
        self.snapshot.get().is_some()
    }

    /// How many times the snapshot has been computed.
    pub fn computations(&self) -> u64 {
        self.computations.get()
    }
}

/// Time left until the wedding day starts (local midnight).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
    /// Whole days since the wedding day ended; 0 until then.
    pub days_since: i64,
}

impl Countdown {
    pub fn is_today_or_past(&self) -> bool {
        self.days == 0 && self.hours == 0 && self.minutes == 0 && self.seconds == 0
    }

    /// True once the wedding day is over.
    pub fn is_past(&self) -> bool {
        self.days_since > 0
    }
}

/// Countdown to `date`, clamped at zero once the day has arrived.
/// `None` when no date is set.
pub fn countdown<Tz: TimeZone>(date: Option<NaiveDate>, now: DateTime<Tz>) -> Option<Countdown> {
    let date = date?;
    let midnight = date.and_hms_opt(0, 0, 0)?;
    let target = Local
        .from_local_datetime(&midnight)
        .earliest()
        .map(|t| t.naive_utc())
        .unwrap_or(midnight);
    let delta = (target - now.naive_utc()).num_seconds();
    let total = delta.max(0);
    Some(Countdown {
        days: total / 86_400,
        hours: (total % 86_400) / 3_600,
        minutes: (total % 3_600) / 60,
        seconds: total % 60,
        days_since: (-delta).max(0) / 86_400,
    })
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;
    use crate::models::{Expense, Guest, Task};

    fn expense(cost: f64, paid: f64, category: &str) -> Expense {
        Expense {
            id: format!("e{}{}", cost, paid),
            title: "x".to_string(),
            category: category.to_string(),
            cost,
            paid,
            note: String::new(),
            created_at: Utc::now(),
        }
    }

    fn guest(count: u32, status: GuestStatus, side: Side) -> Guest {
        Guest {
            id: format!("g{}{}", count, status),
            name: "x".to_string(),
            side,
            count,
            status,
            gift: 100.0,
            created_at: Utc::now(),
        }
    }

    fn task(done: bool, urgent: bool) -> Task {
        Task {
            id: format!("t{}{}", done, urgent),
            title: "x".to_string(),
            category: String::new(),
            done,
            urgent,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_budget_example() {
        let mut document = Document::default();
        document.settings.total_budget = 100_000.0;
        document.expenses.push(expense(50_000.0, 20_000.0, "Venue"));

        let summary = summarize(&document);
        assert_eq!(summary.total_cost, 50_000.0);
        assert_eq!(summary.total_paid, 20_000.0);
        assert_eq!(summary.remaining, 80_000.0);
        assert_eq!(summary.unpaid, 30_000.0);
        assert!((summary.paid_fraction - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_guest_partition_example() {
        let mut document = Document::default();
        document.guests.push(guest(2, GuestStatus::Confirmed, Side::Groom));
        document.guests.push(guest(1, GuestStatus::Pending, Side::Bride));
        document.guests.push(guest(3, GuestStatus::Declined, Side::Both));

        let summary = summarize(&document);
        assert_eq!(summary.total_guests, 6);
        assert_eq!(summary.confirmed, 2);
        assert_eq!(summary.pending, 1);
        assert_eq!(summary.declined, 3);
        assert_eq!(
            summary.confirmed + summary.pending + summary.declined,
            summary.total_guests
        );
        assert_eq!(summary.guests_by_side, SideCounts { groom: 2, bride: 1, both: 3 });
        assert_eq!(summary.total_gifts, 300.0);
    }

    #[test]
    fn test_zero_budget_and_no_tasks_are_zero_fractions() {
        let mut document = Document::default();
        document.settings.total_budget = 0.0;
        document.expenses.push(expense(10.0, 10.0, ""));

        let summary = summarize(&document);
        assert_eq!(summary.paid_fraction, 0.0);
        assert_eq!(summary.task_fraction, 0.0);
        assert_eq!(summary.remaining, -10.0);
    }

    #[test]
    fn test_paid_fraction_clamped() {
        let mut document = Document::default();
        document.settings.total_budget = 1_000.0;
        document.expenses.push(expense(5_000.0, 5_000.0, ""));
        assert_eq!(summarize(&document).paid_fraction, 1.0);
    }

    #[test]
    fn test_progress_percent() {
        let mut document = Document::default();
        assert_eq!(summarize(&document).progress_percent, 0);

        document.expenses.push(expense(1.0, 0.0, ""));
        document.guests.push(guest(1, GuestStatus::Pending, Side::Both));
        assert_eq!(summarize(&document).progress_percent, 100);

        // 1 done + 2 bonus points out of 3 tasks + 2 = 60%
        document.tasks.push(task(true, false));
        document.tasks.push(task(false, true));
        document.tasks.push(task(false, false));
        let summary = summarize(&document);
        assert_eq!(summary.progress_percent, 60);
        assert_eq!(summary.tasks_done, 1);
        assert_eq!(summary.urgent_open, 1);
        assert!((summary.task_fraction - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_progress_rounds() {
        let mut document = Document::default();
        document.tasks.push(task(true, false));
        // 1 / 3 = 33.3%
        assert_eq!(summarize(&document).progress_percent, 33);
        document.tasks.push(task(true, false));
        // 2 / 4 = 50%
        assert_eq!(summarize(&document).progress_percent, 50);
    }

    #[test]
    fn test_categories_in_first_seen_order() {
        let mut document = Document::default();
        document.expenses.push(expense(100.0, 50.0, "Venue"));
        document.expenses.push(expense(30.0, 0.0, ""));
        document.expenses.push(expense(20.0, 20.0, "Venue"));

        let summary = summarize(&document);
        assert_eq!(summary.categories.len(), 2);
        assert_eq!(summary.categories[0].category, "Venue");
        assert_eq!(summary.categories[0].cost, 120.0);
        assert_eq!(summary.categories[0].paid, 70.0);
        assert_eq!(summary.categories[0].items, 2);
        assert_eq!(summary.categories[1].category, "Other");
    }

    #[test]
    fn test_cache_computes_once_until_invalidated() {
        let document = Document::default();
        let mut cache = SummaryCache::new();
        cache.get(&document);
        cache.get(&document);
        assert_eq!(cache.computations(), 1);

        cache.invalidate();
        assert!(!cache.is_valid());
        cache.get(&document);
        assert_eq!(cache.computations(), 2);
    }

    #[test]
    fn test_guest_totals_saturate_instead_of_overflowing() {
        let mut document = Document::default();
        document.guests.push(guest(u32::MAX, GuestStatus::Confirmed, Side::Bride));
        document.guests.push(guest(7, GuestStatus::Pending, Side::Bride));

        let summary = summarize(&document);
        assert_eq!(summary.total_guests, u32::MAX);
        assert_eq!(summary.confirmed, u32::MAX);
        assert_eq!(summary.pending, 7);
        assert_eq!(summary.guests_by_side.bride, u32::MAX);
    }

    #[test]
    fn test_countdown() {
        let now = Utc::now();
        assert_eq!(countdown(None, now), None);

        let yesterday = (Local::now() - Duration::days(1)).date_naive();
        let past = countdown(Some(yesterday), now).unwrap();
        assert!(past.is_today_or_past());
        assert!(past.is_past());
        assert_eq!(past.days_since, 1);

        let long_ago = (Local::now() - Duration::days(400)).date_naive();
        assert!(countdown(Some(long_ago), now).unwrap().days_since >= 399);

        let later = (Local::now() + Duration::days(10)).date_naive();
        let upcoming = countdown(Some(later), now).unwrap();
        assert!(upcoming.days >= 9 && upcoming.days <= 10);
        assert!(upcoming.hours < 24);
        assert!(!upcoming.is_past());
    }
}
