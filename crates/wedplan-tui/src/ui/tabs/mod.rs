//! Tab-specific content rendering.

pub mod dashboard;
pub mod expenses;
pub mod guests;
pub mod settings;
pub mod tasks;
