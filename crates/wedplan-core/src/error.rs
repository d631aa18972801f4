use std::fmt;

use thiserror::Error;

/// Input fields that can fail validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Cost,
    Name,
    WeddingDate,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Field::Title => "Title",
            Field::Cost => "Cost",
            Field::Name => "Name",
            Field::WeddingDate => "Wedding date",
        };
        f.write_str(label)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(Field),

    #[error("{0} must be a number")]
    NotANumber(Field),

    #[error("{0} must be a date like 2026-08-15")]
    InvalidDate(Field),
}

impl ValidationError {
    /// The field to highlight.
    pub fn field(&self) -> Field {
        match self {
            ValidationError::Required(field)
            | ValidationError::NotANumber(field)
            | ValidationError::InvalidDate(field) => *field,
        }
    }
}
