//! Utility functions for display formatting.

pub mod format;

pub use format::{
    age_display, contains_ignore_case, format_date, format_money, format_percent, truncate,
};
