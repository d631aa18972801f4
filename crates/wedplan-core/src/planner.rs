//! The planner controller: owns the document and applies every mutation.
//!
//! Each successful mutation runs the same sequence synchronously: change the
//! document, persist it, invalidate the summary and schedule a redraw.
//! Storage failures never undo a mutation; the planner switches to degraded
//! (unpersisted) mode and raises a notice instead. When the stored document
//! could not be read at all, nothing is written back over it until the user
//! resets the data.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::error::{Field, ValidationError};
use crate::models::coerce::{parse_amount, parse_date, party_size, sanitize_amount};
use crate::models::{
    unique_id, Document, Expense, Guest, GuestStatus, Settings, Side, Task,
    DEFAULT_EXPENSE_CATEGORY, DEFAULT_GUEST_ESTIMATE, DEFAULT_TOTAL_BUDGET,
};
use crate::schedule::RedrawScheduler;
use crate::storage::{DocumentStorage, KeyValueStore};
use crate::summary::{Summary, SummaryCache};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
}

/// A transient, non-blocking message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }
}

/// Raw add-expense form input.
#[derive(Debug, Clone, Default)]
pub struct ExpenseDraft {
    pub title: String,
    pub category: String,
    pub cost: String,
    pub paid: String,
    pub note: String,
}

/// Raw add-guest form input.
#[derive(Debug, Clone, Default)]
pub struct GuestDraft {
    pub name: String,
    pub side: Side,
    pub count: String,
    pub status: GuestStatus,
    pub gift: String,
}

/// Raw add-task form input.
#[derive(Debug, Clone, Default)]
pub struct TaskDraft {
    pub title: String,
    pub category: String,
    pub urgent: bool,
}

/// Raw settings form input.
#[derive(Debug, Clone, Default)]
pub struct SettingsDraft {
    pub groom_name: String,
    pub bride_name: String,
    pub wedding_date: String,
    pub total_budget: String,
    pub guest_estimate: String,
}

impl SettingsDraft {
    /// Prefill a form from the current settings.
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            groom_name: settings.groom_name.clone(),
            bride_name: settings.bride_name.clone(),
            wedding_date: settings
                .wedding_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            total_budget: format!("{}", settings.total_budget),
            guest_estimate: settings.guest_estimate.to_string(),
        }
    }
}

/// What a settings change means for timers owned by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SettingsUpdate {
    pub wedding_date_changed: bool,
}

fn required(value: &str, field: Field) -> Result<&str, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError::Required(field))
    } else {
        Ok(trimmed)
    }
}

/// Blank or unparseable optional amounts count as zero.
fn optional_amount(value: &str) -> f64 {
    parse_amount(value).map(sanitize_amount).unwrap_or(0.0)
}

/// A non-negative amount, or `None` for blank, unparseable or negative input.
fn non_negative_amount(value: &str) -> Option<f64> {
    parse_amount(value).filter(|v| *v >= 0.0)
}

pub struct Planner<S> {
    storage: DocumentStorage<S>,
    document: Document,
    summary: SummaryCache,
    redraw: RedrawScheduler,
    degraded: bool,
    /// The stored document exists but could not be read; saving is held back
    /// so it is never overwritten.
    load_failed: bool,
    last_saved: Option<DateTime<Utc>>,
    notice: Option<Notice>,
}

impl<S: KeyValueStore> Planner<S> {
    /// Load the stored document, falling back to defaults on any failure.
    pub fn open(store: S) -> Self {
        let storage = DocumentStorage::new(store);
        let mut notice = None;
        let mut load_failed = false;

        let document = match storage.load() {
            Ok(decoded) => {
                if !decoded.recovered.is_empty() {
                    let sections: Vec<&str> = decoded.recovered.iter().map(|s| s.key()).collect();
                    notice = Some(Notice::warning(format!(
                        "Some saved data was unreadable, reset: {}",
                        sections.join(", ")
                    )));
                }
                decoded.document
            }
            Err(e) => {
                warn!(error = %e, "Failed to read stored document, not saving until reset");
                load_failed = true;
                notice = Some(Notice::warning(format!(
                    "Could not read saved data ({}). Working in memory, saved data is left \
                     untouched until you reset in Settings",
                    e.notice_text()
                )));
                Document::default()
            }
        };

        info!(
            expenses = document.expenses.len(),
            guests = document.guests.len(),
            tasks = document.tasks.len(),
            "Planner opened"
        );

        Self {
            storage,
            document,
            summary: SummaryCache::new(),
            redraw: RedrawScheduler::new(),
            degraded: load_failed,
            load_failed,
            last_saved: None,
            notice,
        }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn settings(&self) -> &Settings {
        &self.document.settings
    }

    /// Memoized derived totals.
    pub fn summary(&self) -> &Summary {
        self.summary.get(&self.document)
    }

    pub fn summary_cache(&self) -> &SummaryCache {
        &self.summary
    }

    /// True while saves are failing and changes live only in memory.
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    /// True while unreadable stored data is being protected from overwrites.
    pub fn is_load_failed(&self) -> bool {
        self.load_failed
    }

    pub fn last_saved(&self) -> Option<DateTime<Utc>> {
        self.last_saved
    }

    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    pub fn storage(&self) -> &DocumentStorage<S> {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut DocumentStorage<S> {
        &mut self.storage
    }

    pub fn position_of_expense(&self, id: &str) -> Option<usize> {
        self.document.expenses.iter().position(|e| e.id == id)
    }

    pub fn position_of_guest(&self, id: &str) -> Option<usize> {
        self.document.guests.iter().position(|g| g.id == id)
    }

    pub fn position_of_task(&self, id: &str) -> Option<usize> {
        self.document.tasks.iter().position(|t| t.id == id)
    }

    // =========================================================================
    // Redraw scheduling
    // =========================================================================

    /// Request a redraw for a UI-only change (selection, filters, overlays).
    pub fn request_redraw(&mut self) -> bool {
        self.redraw.schedule()
    }

    /// Returns true if a frame should be drawn now; see [`RedrawScheduler`].
    pub fn begin_frame(&mut self) -> bool {
        self.redraw.begin_frame()
    }

    pub fn redraw(&self) -> &RedrawScheduler {
        &self.redraw
    }

    // =========================================================================
    // Expenses
    // =========================================================================

    pub fn add_expense(&mut self, draft: ExpenseDraft) -> Result<&Expense, ValidationError> {
        let title = required(&draft.title, Field::Title)?.to_string();
        let cost = required(&draft.cost, Field::Cost)?;
        let cost = parse_amount(cost).ok_or(ValidationError::NotANumber(Field::Cost))?;
        let category = match draft.category.trim() {
            "" => DEFAULT_EXPENSE_CATEGORY.to_string(),
            other => other.to_string(),
        };

        let created_at = Utc::now();
        let id = unique_id(created_at, self.document.expenses.iter().map(|e| e.id.as_str()));
        debug!(%id, %title, cost, "Adding expense");
        self.document.expenses.push(Expense {
            id,
            title,
            category,
            cost: sanitize_amount(cost),
            paid: optional_amount(&draft.paid),
            note: draft.note.trim().to_string(),
            created_at,
        });
        let index = self.document.expenses.len() - 1;
        self.commit();
        Ok(&self.document.expenses[index])
    }

    /// Remove the expense at `index`. Out-of-range indexes change nothing.
    pub fn delete_expense(&mut self, index: usize) -> Option<Expense> {
        if index >= self.document.expenses.len() {
            debug!(index, "Ignoring delete of missing expense");
            return None;
        }
        let removed = self.document.expenses.remove(index);
        debug!(id = %removed.id, "Deleted expense");
        self.commit();
        Some(removed)
    }

    // =========================================================================
    // Guests
    // =========================================================================

    pub fn add_guest(&mut self, draft: GuestDraft) -> Result<&Guest, ValidationError> {
        let name = required(&draft.name, Field::Name)?.to_string();
        let count = parse_amount(&draft.count).map(party_size).unwrap_or(1);

        let created_at = Utc::now();
        let id = unique_id(created_at, self.document.guests.iter().map(|g| g.id.as_str()));
        debug!(%id, %name, count, "Adding guest");
        self.document.guests.push(Guest {
            id,
            name,
            side: draft.side,
            count,
            status: draft.status,
            gift: optional_amount(&draft.gift),
            created_at,
        });
        let index = self.document.guests.len() - 1;
        self.commit();
        Ok(&self.document.guests[index])
    }

    pub fn delete_guest(&mut self, index: usize) -> Option<Guest> {
        if index >= self.document.guests.len() {
            debug!(index, "Ignoring delete of missing guest");
            return None;
        }
        let removed = self.document.guests.remove(index);
        debug!(id = %removed.id, "Deleted guest");
        self.commit();
        Some(removed)
    }

    /// Record an RSVP answer for the guest at `index`.
    pub fn set_guest_status(&mut self, index: usize, status: GuestStatus) -> Option<GuestStatus> {
        let guest = self.document.guests.get_mut(index)?;
        let previous = guest.status;
        if previous == status {
            return Some(previous);
        }
        guest.status = status;
        self.commit();
        Some(previous)
    }

    // =========================================================================
    // Tasks
    // =========================================================================

    pub fn add_task(&mut self, draft: TaskDraft) -> Result<&Task, ValidationError> {
        let title = required(&draft.title, Field::Title)?.to_string();

        let created_at = Utc::now();
        let id = unique_id(created_at, self.document.tasks.iter().map(|t| t.id.as_str()));
        debug!(%id, %title, urgent = draft.urgent, "Adding task");
        self.document.tasks.push(Task {
            id,
            title,
            category: draft.category.trim().to_string(),
            done: false,
            urgent: draft.urgent,
            created_at,
        });
        let index = self.document.tasks.len() - 1;
        self.commit();
        Ok(&self.document.tasks[index])
    }

    pub fn delete_task(&mut self, index: usize) -> Option<Task> {
        if index >= self.document.tasks.len() {
            debug!(index, "Ignoring delete of missing task");
            return None;
        }
        let removed = self.document.tasks.remove(index);
        debug!(id = %removed.id, "Deleted task");
        self.commit();
        Some(removed)
    }

    /// Flip the done flag of the task at `index`, returning the new value.
    pub fn toggle_task(&mut self, index: usize) -> Option<bool> {
        let task = self.document.tasks.get_mut(index)?;
        task.done = !task.done;
        let done = task.done;
        self.commit();
        Some(done)
    }

    // =========================================================================
    // Settings
    // =========================================================================

    /// Replace all settings fields.
    ///
    /// Budget and guest estimate fall back to their defaults when blank,
    /// unparseable or negative. A non-empty date must parse; an empty one
    /// clears it.
    pub fn update_settings(
        &mut self,
        draft: SettingsDraft,
    ) -> Result<SettingsUpdate, ValidationError> {
        let wedding_date = match draft.wedding_date.trim() {
            "" => None,
            text => Some(parse_date(text).ok_or(ValidationError::InvalidDate(Field::WeddingDate))?),
        };
        let total_budget =
            non_negative_amount(&draft.total_budget).unwrap_or(DEFAULT_TOTAL_BUDGET);
        let guest_estimate = non_negative_amount(&draft.guest_estimate)
            .map(|n| n.min(u32::MAX as f64) as u32)
            .unwrap_or(DEFAULT_GUEST_ESTIMATE);

        let settings = Settings {
            groom_name: draft.groom_name.trim().to_string(),
            bride_name: draft.bride_name.trim().to_string(),
            wedding_date,
            total_budget,
            guest_estimate,
        };
        let update = SettingsUpdate {
            wedding_date_changed: settings.wedding_date != self.document.settings.wedding_date,
        };
        debug!(?update, "Updating settings");
        self.document.settings = settings;
        self.commit();
        Ok(update)
    }

    /// Clear persisted storage and return to the default document.
    pub fn reset_all(&mut self) -> SettingsUpdate {
        let update = SettingsUpdate {
            wedding_date_changed: self.document.settings.wedding_date.is_some(),
        };

        match self.storage.clear() {
            Ok(()) => {
                info!("Cleared stored document");
                self.degraded = false;
                self.load_failed = false;
                self.notice = Some(Notice::info("All data cleared"));
            }
            Err(e) => {
                warn!(error = %e, "Failed to clear stored document");
                self.notice = Some(Notice::warning(format!(
                    "Could not clear saved data: {}",
                    e.notice_text()
                )));
            }
        }

        self.document = Document::default();
        self.last_saved = None;
        self.summary.invalidate();
        self.redraw.schedule();
        update
    }

    // =========================================================================
    // Commit
    // =========================================================================

    fn commit(&mut self) {
        self.persist();
        self.summary.invalidate();
        self.redraw.schedule();
    }

    fn persist(&mut self) {
        if self.load_failed {
            debug!("Stored document unreadable, keeping changes in memory");
            self.degraded = true;
            return;
        }
        match self.storage.save(&self.document) {
            Ok(()) => {
                self.last_saved = Some(Utc::now());
                if self.degraded {
                    info!("Storage recovered, document saved");
                    self.degraded = false;
                    self.notice = Some(Notice::info("Saved again, all changes are stored"));
                }
            }
            Err(e) => {
                warn!(error = %e, "Failed to persist document, keeping changes in memory");
                self.degraded = true;
                self.notice = Some(Notice::warning(format!(
                    "Changes not saved ({}), working in memory",
                    e.notice_text()
                )));
            }
        }
    }
}
