//! Core library for wedplan.
//!
//! Holds the planner document model, local storage, derived summaries, the
//! mutation API and the scheduling primitives used by the terminal UI.

pub mod error;
pub mod models;
pub mod planner;
pub mod schedule;
pub mod storage;
pub mod summary;
pub mod utils;
pub mod views;

pub use error::{Field, ValidationError};
pub use models::{Document, Expense, Guest, GuestStatus, Settings, Side, Task};
pub use planner::{
    ExpenseDraft, GuestDraft, Notice, NoticeLevel, Planner, SettingsDraft, SettingsUpdate,
    TaskDraft,
};
pub use schedule::{Debouncer, RedrawScheduler, Ticker, TimerHandle};
pub use storage::{DocumentStorage, FileStore, KeyValueStore, MemoryStore, StorageError};
pub use summary::{countdown, summarize, Countdown, Summary, SummaryCache};
