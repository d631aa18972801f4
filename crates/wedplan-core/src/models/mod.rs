//! Data models for the planner document.
//!
//! - `Document`: the whole persisted state
//! - `Settings`: couple names, date, budget and guest estimate
//! - `Expense`, `Guest`, `Task`: the entity lists
//!
//! Decoding is lenient: numeric fields coerce bad input to zero and unknown
//! enum strings fall back to a default, so one bad field never loses a record.

pub mod coerce;
pub mod document;
pub mod expense;
pub mod guest;
pub mod id;
pub mod settings;
pub mod task;

pub use document::{Decoded, Document, Section};
pub use expense::{Expense, DEFAULT_EXPENSE_CATEGORY, EXPENSE_CATEGORIES};
pub use guest::{Guest, GuestStatus, Side, MAX_PARTY_SIZE};
pub use id::{generate_id, unique_id};
pub use settings::{Settings, DEFAULT_GUEST_ESTIMATE, DEFAULT_TOTAL_BUDGET};
pub use task::Task;
