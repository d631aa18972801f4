//! Application state management for wedplan.
//!
//! `App` owns the `Planner` (and through it the document), all transient UI
//! state such as tabs, selections, filters and overlays, and the timers for
//! the debounced guest search and the wedding countdown.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use chrono::{Local, Utc};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use wedplan_core::summary::countdown;
use wedplan_core::views::{
    self, category_options, ExpenseFilter, ExpenseRow, GuestFilter, GuestRow, TaskFilter, TaskRow,
};
use wedplan_core::{
    Countdown, Debouncer, FileStore, GuestStatus, KeyValueStore, MemoryStore, Notice, Planner,
    SettingsDraft, SettingsUpdate, Ticker,
};

use crate::config::Config;
use crate::form::{Form, FormKind};

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the timer event channel.
const CHANNEL_BUFFER_SIZE: usize = 32;

/// Maximum length for any text input.
const MAX_INPUT_LENGTH: usize = 80;

/// Number of rows to move on page up/down.
pub const PAGE_SCROLL_SIZE: usize = 10;

// ============================================================================
// UI State Types
// ============================================================================

/// Main navigation tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Dashboard,
    Expenses,
    Guests,
    Tasks,
    Settings,
}

impl Tab {
    pub const ALL: [Tab; 5] = [
        Tab::Dashboard,
        Tab::Expenses,
        Tab::Guests,
        Tab::Tasks,
        Tab::Settings,
    ];

    /// Get the display title for this tab.
    pub fn title(&self) -> &'static str {
        match self {
            Tab::Dashboard => "Dashboard",
            Tab::Expenses => "Expenses",
            Tab::Guests => "Guests",
            Tab::Tasks => "Tasks",
            Tab::Settings => "Settings",
        }
    }

    /// Get the next tab (wrapping around)
    pub fn next(&self) -> Self {
        match self {
            Tab::Dashboard => Tab::Expenses,
            Tab::Expenses => Tab::Guests,
            Tab::Guests => Tab::Tasks,
            Tab::Tasks => Tab::Settings,
            Tab::Settings => Tab::Dashboard,
        }
    }

    /// Get the previous tab (wrapping around)
    pub fn prev(&self) -> Self {
        match self {
            Tab::Dashboard => Tab::Settings,
            Tab::Expenses => Tab::Dashboard,
            Tab::Guests => Tab::Expenses,
            Tab::Tasks => Tab::Guests,
            Tab::Settings => Tab::Tasks,
        }
    }
}

/// A destructive action waiting for a yes/no answer. Delete variants carry
/// the document index of the entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirm {
    DeleteExpense(usize),
    DeleteGuest(usize),
    DeleteTask(usize),
    ResetAll,
    Quit,
}

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    Searching,
    Editing,
    ShowingHelp,
    Confirming(Confirm),
    Quitting,
}

/// Events delivered by timer tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// The guest search input has been idle for the debounce delay.
    SearchSettled,
    /// One countdown period elapsed.
    CountdownTick,
}

/// A notice on screen, with the time it disappears.
#[derive(Debug, Clone)]
pub struct ActiveNotice {
    pub notice: Notice,
    pub expires_at: Instant,
}

// ============================================================================
// Main Application Struct
// ============================================================================

pub struct App {
    pub config: Config,
    pub planner: Planner<Box<dyn KeyValueStore>>,
    /// Where the document is stored; `None` when running in memory only.
    pub data_dir: Option<PathBuf>,

    // UI State
    pub state: AppState,
    pub current_tab: Tab,
    pub form: Option<Form>,
    pub notice: Option<ActiveNotice>,

    // Filters
    pub expense_filter: ExpenseFilter,
    pub guest_filter: GuestFilter,
    pub task_filter: TaskFilter,
    /// Search text as typed; copied into `guest_filter` once input settles.
    pub search_input: String,

    // Selection indices (into the filtered rows)
    pub expense_selection: usize,
    pub guest_selection: usize,
    pub task_selection: usize,

    // Timers
    timer_rx: mpsc::Receiver<TimerEvent>,
    search_debounce: Debouncer<TimerEvent>,
    countdown_ticker: Ticker<TimerEvent>,
}

impl App {
    /// Create the application with the configured file store. Falls back to
    /// an in-memory store when the data directory is unusable.
    pub fn new() -> Result<Self> {
        let config = match Config::load() {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "Failed to load config, using defaults");
                Config::default()
            }
        };

        let file_store = config.data_dir().and_then(|dir| {
            let store = FileStore::new(dir)?.with_quota(config.storage_quota_bytes);
            Ok(store)
        });

        match file_store {
            Ok(store) => {
                debug!(dir = ?store.dir(), "Using file store");
                let dir = store.dir().to_path_buf();
                let mut app = Self::with_store(config, Box::new(store));
                app.data_dir = Some(dir);
                Ok(app)
            }
            Err(e) => {
                warn!(error = %e, "No usable data directory, keeping data in memory");
                let mut app = Self::with_store(config, Box::new(MemoryStore::new()));
                app.show_notice(Notice::warning(
                    "No data directory, changes will not be saved",
                ));
                Ok(app)
            }
        }
    }

    /// Create the application around an already opened store.
    ///
    /// Must be called inside a tokio runtime; timers are spawned as tasks.
    pub fn with_store(config: Config, store: Box<dyn KeyValueStore>) -> Self {
        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);
        let search_debounce = Debouncer::new(config.search_debounce(), tx.clone());
        let countdown_ticker =
            Ticker::new(config.countdown_interval(), TimerEvent::CountdownTick, tx);

        let planner = Planner::open(store);

        let mut app = Self {
            config,
            planner,
            data_dir: None,

            state: AppState::Normal,
            current_tab: Tab::Dashboard,
            form: None,
            notice: None,

            expense_filter: ExpenseFilter::default(),
            guest_filter: GuestFilter::default(),
            task_filter: TaskFilter::default(),
            search_input: String::new(),

            expense_selection: 0,
            guest_selection: 0,
            task_selection: 0,

            timer_rx: rx,
            search_debounce,
            countdown_ticker,
        };
        app.restart_countdown();
        app.pull_planner_notice();
        app
    }

    // =========================================================================
    // Redraw and timers
    // =========================================================================

    pub fn request_redraw(&mut self) {
        self.planner.request_redraw();
    }

    /// True when a frame should be drawn now.
    pub fn begin_frame(&mut self) -> bool {
        self.planner.begin_frame()
    }

    /// Drain timer events and expire notices. Called once per loop pass.
    pub fn check_timers(&mut self) {
        let mut events = Vec::new();
        while let Ok(event) = self.timer_rx.try_recv() {
            events.push(event);
        }

        for event in events {
            match event {
                TimerEvent::SearchSettled => self.apply_search(),
                TimerEvent::CountdownTick => self.request_redraw(),
            }
        }

        if self
            .notice
            .as_ref()
            .is_some_and(|n| Instant::now() >= n.expires_at)
        {
            self.notice = None;
            self.request_redraw();
        }
    }

    /// Start or stop the countdown ticker to match the wedding date.
    pub fn restart_countdown(&mut self) {
        if self.planner.settings().wedding_date.is_some() {
            self.countdown_ticker.start();
        } else {
            self.countdown_ticker.stop();
        }
    }

    pub fn is_countdown_running(&self) -> bool {
        self.countdown_ticker.is_running()
    }

    /// Time left until the wedding, computed fresh for each frame.
    pub fn countdown(&self) -> Option<Countdown> {
        countdown(self.planner.settings().wedding_date, Local::now())
    }

    // =========================================================================
    // Notices
    // =========================================================================

    pub fn show_notice(&mut self, notice: Notice) {
        debug!(message = %notice.message, "Notice");
        self.notice = Some(ActiveNotice {
            notice,
            expires_at: Instant::now() + self.config.notice_duration(),
        });
        self.request_redraw();
    }

    fn pull_planner_notice(&mut self) {
        if let Some(notice) = self.planner.take_notice() {
            self.show_notice(notice);
        }
    }

    /// Status text for the save state, e.g. "Saved 5m ago".
    pub fn save_status(&self) -> String {
        if self.planner.is_degraded() || self.data_dir.is_none() {
            "Not saved (memory only)".to_string()
        } else {
            match self.planner.last_saved() {
                Some(at) => format!("Saved {}", wedplan_core::utils::age_display(at, Utc::now())),
                None => "All changes saved".to_string(),
            }
        }
    }

    // =========================================================================
    // Tabs and selection
    // =========================================================================

    pub fn select_tab(&mut self, tab: Tab) {
        self.current_tab = tab;
    }

    pub fn expense_rows(&self) -> Vec<ExpenseRow> {
        views::expense_rows(self.planner.document(), &self.expense_filter)
    }

    pub fn guest_rows(&self) -> Vec<GuestRow> {
        views::guest_rows(self.planner.document(), &self.guest_filter)
    }

    pub fn task_rows(&self) -> Vec<TaskRow> {
        views::task_rows(self.planner.document(), self.task_filter)
    }

    fn current_row_count(&self) -> usize {
        match self.current_tab {
            Tab::Expenses => self.expense_rows().len(),
            Tab::Guests => self.guest_rows().len(),
            Tab::Tasks => self.task_rows().len(),
            Tab::Dashboard | Tab::Settings => 0,
        }
    }

    fn current_selection_mut(&mut self) -> Option<&mut usize> {
        match self.current_tab {
            Tab::Expenses => Some(&mut self.expense_selection),
            Tab::Guests => Some(&mut self.guest_selection),
            Tab::Tasks => Some(&mut self.task_selection),
            Tab::Dashboard | Tab::Settings => None,
        }
    }

    /// Move the selection on the current list by `delta` rows, clamped.
    pub fn move_selection(&mut self, delta: isize) {
        let len = self.current_row_count();
        if let Some(selection) = self.current_selection_mut() {
            let max = len.saturating_sub(1) as isize;
            *selection = (*selection as isize + delta).clamp(0, max) as usize;
        }
    }

    pub fn select_first(&mut self) {
        if let Some(selection) = self.current_selection_mut() {
            *selection = 0;
        }
    }

    pub fn select_last(&mut self) {
        let len = self.current_row_count();
        if let Some(selection) = self.current_selection_mut() {
            *selection = len.saturating_sub(1);
        }
    }

    /// Keep every selection inside its (possibly shrunk) list.
    fn clamp_selections(&mut self) {
        let expenses = self.expense_rows().len();
        let guests = self.guest_rows().len();
        let tasks = self.task_rows().len();
        self.expense_selection = self.expense_selection.min(expenses.saturating_sub(1));
        self.guest_selection = self.guest_selection.min(guests.saturating_sub(1));
        self.task_selection = self.task_selection.min(tasks.saturating_sub(1));
    }

    pub fn selected_expense(&self) -> Option<ExpenseRow> {
        self.expense_rows().into_iter().nth(self.expense_selection)
    }

    pub fn selected_guest(&self) -> Option<GuestRow> {
        self.guest_rows().into_iter().nth(self.guest_selection)
    }

    pub fn selected_task(&self) -> Option<TaskRow> {
        self.task_rows().into_iter().nth(self.task_selection)
    }

    // =========================================================================
    // Filters and search
    // =========================================================================

    pub fn cycle_filter(&mut self) {
        match self.current_tab {
            Tab::Expenses => {
                let options = category_options(self.planner.document());
                self.expense_filter.cycle(&options);
                self.expense_selection = 0;
            }
            Tab::Guests => {
                self.guest_filter.cycle_status();
                self.guest_selection = 0;
            }
            Tab::Tasks => {
                self.task_filter = self.task_filter.next();
                self.task_selection = 0;
            }
            Tab::Dashboard | Tab::Settings => {}
        }
    }

    pub fn start_search(&mut self) {
        self.search_input = self.guest_filter.search.clone();
        self.state = AppState::Searching;
    }

    /// Edit the search text; the list filter follows after the input settles.
    pub fn push_search_char(&mut self, c: char) {
        if can_add_input_char(self.search_input.chars().count(), c) {
            self.search_input.push(c);
            self.search_debounce.trigger(TimerEvent::SearchSettled);
        }
    }

    pub fn pop_search_char(&mut self) {
        if self.search_input.pop().is_some() {
            self.search_debounce.trigger(TimerEvent::SearchSettled);
        }
    }

    /// Leave search mode, applying the text right away.
    pub fn finish_search(&mut self) {
        self.search_debounce.cancel();
        self.apply_search();
        self.state = AppState::Normal;
    }

    /// Leave search mode and clear the search.
    pub fn clear_search(&mut self) {
        self.search_debounce.cancel();
        self.search_input.clear();
        self.apply_search();
        self.state = AppState::Normal;
    }

    pub fn is_search_pending(&self) -> bool {
        self.search_debounce.is_pending()
    }

    fn apply_search(&mut self) {
        if self.guest_filter.search != self.search_input {
            debug!(search = %self.search_input, "Applying guest search");
            self.guest_filter.search = self.search_input.clone();
            self.guest_selection = 0;
        }
        self.request_redraw();
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    pub fn open_form(&mut self, kind: FormKind) {
        let form = match kind {
            FormKind::Expense => Form::expense(category_options(self.planner.document())),
            FormKind::Guest => Form::guest(),
            FormKind::Task => Form::task(),
            FormKind::Settings => Form::settings(SettingsDraft::from_settings(self.planner.settings())),
        };
        self.form = Some(form);
        self.state = AppState::Editing;
    }

    pub fn close_form(&mut self) {
        self.form = None;
        self.state = AppState::Normal;
    }

    /// Submit the open form. On a validation error the form stays open with
    /// the failing field focused.
    pub fn submit_form(&mut self) {
        let Some(mut form) = self.form.take() else {
            return;
        };

        let result = match form.kind {
            FormKind::Expense => self
                .planner
                .add_expense(form.expense_draft())
                .map(|e| format!("Added expense \"{}\"", e.title)),
            FormKind::Guest => self
                .planner
                .add_guest(form.guest_draft())
                .map(|g| format!("Added {} ({})", g.name, g.count)),
            FormKind::Task => self
                .planner
                .add_task(form.task_draft())
                .map(|t| format!("Added task \"{}\"", t.title)),
            FormKind::Settings => self.planner.update_settings(form.settings_draft()).map(|update| {
                self.after_settings_update(update);
                "Settings saved".to_string()
            }),
        };

        match result {
            Ok(message) => {
                info!(kind = ?form.kind, "Form submitted");
                self.state = AppState::Normal;
                self.clamp_selections();
                self.show_notice(Notice::info(message));
                self.pull_planner_notice();
            }
            Err(e) => {
                debug!(error = %e, "Form rejected");
                form.set_error(e);
                self.form = Some(form);
            }
        }
    }

    fn after_settings_update(&mut self, update: SettingsUpdate) {
        if update.wedding_date_changed {
            self.restart_countdown();
        }
    }

    /// Ask to delete the selected row on the current tab.
    pub fn request_delete(&mut self) {
        let confirm = match self.current_tab {
            Tab::Expenses => self.selected_expense().map(|r| Confirm::DeleteExpense(r.index)),
            Tab::Guests => self.selected_guest().map(|r| Confirm::DeleteGuest(r.index)),
            Tab::Tasks => self.selected_task().map(|r| Confirm::DeleteTask(r.index)),
            Tab::Dashboard | Tab::Settings => None,
        };
        if let Some(confirm) = confirm {
            self.state = AppState::Confirming(confirm);
        }
    }

    /// Carry out the pending confirmation. Returns true when the app should quit.
    pub fn confirm(&mut self) -> bool {
        let AppState::Confirming(confirm) = self.state else {
            return false;
        };
        self.state = AppState::Normal;

        match confirm {
            Confirm::DeleteExpense(index) => {
                if let Some(expense) = self.planner.delete_expense(index) {
                    self.show_notice(Notice::info(format!("Deleted \"{}\"", expense.title)));
                }
            }
            Confirm::DeleteGuest(index) => {
                if let Some(guest) = self.planner.delete_guest(index) {
                    self.show_notice(Notice::info(format!("Removed {}", guest.name)));
                }
            }
            Confirm::DeleteTask(index) => {
                if let Some(task) = self.planner.delete_task(index) {
                    self.show_notice(Notice::info(format!("Deleted \"{}\"", task.title)));
                }
            }
            Confirm::ResetAll => self.reset_all(),
            Confirm::Quit => {
                self.state = AppState::Quitting;
                return true;
            }
        }

        self.clamp_selections();
        self.pull_planner_notice();
        false
    }

    pub fn decline(&mut self) {
        self.state = AppState::Normal;
    }

    pub fn toggle_selected_task(&mut self) {
        if let Some(row) = self.selected_task() {
            self.planner.toggle_task(row.index);
            self.clamp_selections();
            self.pull_planner_notice();
        }
    }

    /// Step the selected guest's RSVP: pending -> confirmed -> declined.
    pub fn cycle_selected_guest_status(&mut self) {
        if let Some(row) = self.selected_guest() {
            let next = match row.status {
                GuestStatus::Pending => GuestStatus::Confirmed,
                GuestStatus::Confirmed => GuestStatus::Declined,
                GuestStatus::Declined => GuestStatus::Pending,
            };
            self.planner.set_guest_status(row.index, next);
            self.clamp_selections();
            self.pull_planner_notice();
        }
    }

    fn reset_all(&mut self) {
        let update = self.planner.reset_all();
        self.expense_filter = ExpenseFilter::default();
        self.guest_filter = GuestFilter::default();
        self.task_filter = TaskFilter::default();
        self.search_input.clear();
        self.expense_selection = 0;
        self.guest_selection = 0;
        self.task_selection = 0;
        self.after_settings_update(update);
        self.pull_planner_notice();
    }
}

// ============================================================================
// Input validation helpers
// ============================================================================

/// Check if a character is valid for input (no control characters)
fn is_valid_input_char(c: char) -> bool {
    !c.is_control()
}

/// Check if a character should be accepted into a text input
pub fn can_add_input_char(current_len: usize, c: char) -> bool {
    current_len < MAX_INPUT_LENGTH && is_valid_input_char(c)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use wedplan_core::NoticeLevel;

    fn app() -> App {
        let config = Config {
            search_debounce_ms: 200,
            ..Default::default()
        };
        let mut app = App::with_store(config, Box::new(MemoryStore::new()));
        app.data_dir = Some(PathBuf::from("/tmp"));
        app
    }

    fn add_guest(app: &mut App, name: &str) {
        app.open_form(FormKind::Guest);
        for c in name.chars() {
            app.form.as_mut().unwrap().insert_char(c);
        }
        app.submit_form();
    }

    // -------------------------------------------------------------------------
    // Tab Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_tab_next() {
        assert_eq!(Tab::Dashboard.next(), Tab::Expenses);
        assert_eq!(Tab::Expenses.next(), Tab::Guests);
        assert_eq!(Tab::Guests.next(), Tab::Tasks);
        assert_eq!(Tab::Tasks.next(), Tab::Settings);
        assert_eq!(Tab::Settings.next(), Tab::Dashboard); // Wraps around
    }

    #[test]
    fn test_tab_prev() {
        assert_eq!(Tab::Dashboard.prev(), Tab::Settings); // Wraps around
        assert_eq!(Tab::Settings.prev(), Tab::Tasks);
        assert_eq!(Tab::Tasks.prev(), Tab::Guests);
        assert_eq!(Tab::Guests.prev(), Tab::Expenses);
        assert_eq!(Tab::Expenses.prev(), Tab::Dashboard);
    }

    // -------------------------------------------------------------------------
    // Input Validation Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_can_add_input_char() {
        assert!(can_add_input_char(0, 'a'));
        assert!(can_add_input_char(79, 'ש'));
        assert!(!can_add_input_char(80, 'a'));
        assert!(!can_add_input_char(0, '\x00'));
        assert!(!can_add_input_char(0, '\n'));
    }

    // -------------------------------------------------------------------------
    // App Tests
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_invalid_form_stays_open() {
        let mut app = app();
        app.open_form(FormKind::Expense);
        app.submit_form();

        assert_eq!(app.state, AppState::Editing);
        let form = app.form.as_ref().unwrap();
        assert!(form.error.is_some());
        assert_eq!(form.focus, 0);
        assert!(app.planner.document().expenses.is_empty());
    }

    #[tokio::test]
    async fn test_delete_requires_confirmation() {
        let mut app = app();
        add_guest(&mut app, "Dana");
        add_guest(&mut app, "Avi");
        app.select_tab(Tab::Guests);
        app.move_selection(1);

        app.request_delete();
        assert_eq!(app.state, AppState::Confirming(Confirm::DeleteGuest(1)));
        app.decline();
        assert_eq!(app.planner.document().guests.len(), 2);

        app.request_delete();
        assert!(!app.confirm());
        assert_eq!(app.planner.document().guests.len(), 1);
        assert_eq!(app.planner.document().guests[0].name, "Dana");
        assert_eq!(app.guest_selection, 0);
        assert_eq!(app.notice.as_ref().unwrap().notice.level, NoticeLevel::Info);
    }

    #[tokio::test]
    async fn test_quit_confirmation() {
        let mut app = app();
        app.state = AppState::Confirming(Confirm::Quit);
        assert!(app.confirm());
        assert_eq!(app.state, AppState::Quitting);
    }

    #[tokio::test(start_paused = true)]
    async fn test_search_applies_after_debounce() {
        let mut app = app();
        add_guest(&mut app, "Dana");
        add_guest(&mut app, "Avi");
        app.select_tab(Tab::Guests);

        app.start_search();
        app.push_search_char('d');
        app.push_search_char('a');
        app.check_timers();
        assert_eq!(app.guest_rows().len(), 2);
        assert!(app.is_search_pending());

        tokio::time::sleep(Duration::from_millis(250)).await;
        app.check_timers();
        assert_eq!(app.guest_filter.search, "da");
        assert_eq!(app.guest_rows().len(), 1);

        app.clear_search();
        assert_eq!(app.state, AppState::Normal);
        assert_eq!(app.guest_rows().len(), 2);
    }

    #[tokio::test]
    async fn test_countdown_follows_wedding_date() {
        let mut app = app();
        assert!(!app.is_countdown_running());
        assert!(app.countdown().is_none());

        app.open_form(FormKind::Settings);
        let form = app.form.as_mut().unwrap();
        form.focus = 2;
        for c in "2030-06-01".chars() {
            form.insert_char(c);
        }
        app.submit_form();
        assert_eq!(app.state, AppState::Normal);
        assert!(app.is_countdown_running());
        assert!(app.countdown().is_some());

        app.state = AppState::Confirming(Confirm::ResetAll);
        app.confirm();
        assert!(!app.is_countdown_running());
        assert!(app.planner.document().guests.is_empty());
    }

    #[tokio::test]
    async fn test_toggle_selected_task_respects_filter() {
        let mut app = app();
        for title in ["Venue", "Band"] {
            app.open_form(FormKind::Task);
            for c in title.chars() {
                app.form.as_mut().unwrap().insert_char(c);
            }
            app.submit_form();
        }
        app.select_tab(Tab::Tasks);
        app.cycle_filter(); // Open
        app.move_selection(1);
        app.toggle_selected_task();

        assert!(app.planner.document().tasks[1].done);
        assert_eq!(app.task_rows().len(), 1);
        assert_eq!(app.task_selection, 0);
    }

    #[tokio::test]
    async fn test_save_status() {
        let mut app = app();
        assert_eq!(app.save_status(), "All changes saved");
        add_guest(&mut app, "Dana");
        assert_eq!(app.save_status(), "Saved just now");
        app.data_dir = None;
        assert_eq!(app.save_status(), "Not saved (memory only)");
    }
}
