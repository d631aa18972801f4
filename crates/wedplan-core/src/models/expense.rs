use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::coerce;

/// Suggested expense categories offered by the add-expense form.
/// Categories are free text, so stored expenses may use others.
pub const EXPENSE_CATEGORIES: &[&str] = &[
    "Venue & Catering",
    "Photo & Video",
    "Music & Entertainment",
    "Flowers & Design",
    "Attire & Beauty",
    "Rings & Jewelry",
    "Invitations",
    "Other",
];

/// Category assigned when the input leaves it blank.
pub const DEFAULT_EXPENSE_CATEGORY: &str = "Other";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    #[serde(default, deserialize_with = "coerce::lenient_string")]
    pub id: String,
    #[serde(default, deserialize_with = "coerce::lenient_string")]
    pub title: String,
    #[serde(default, deserialize_with = "coerce::lenient_string")]
    pub category: String,
    #[serde(default, deserialize_with = "coerce::lenient_amount")]
    pub cost: f64,
    /// Amount already paid. Deposits can exceed the quoted cost.
    #[serde(default, deserialize_with = "coerce::lenient_amount")]
    pub paid: f64,
    #[serde(default, deserialize_with = "coerce::lenient_string")]
    pub note: String,
    #[serde(default = "Utc::now", deserialize_with = "coerce::lenient_timestamp")]
    pub created_at: DateTime<Utc>,
}

impl Expense {
    /// Cost still to be paid; negative when overpaid.
    pub fn balance(&self) -> f64 {
        self.cost - self.paid
    }

    pub fn is_fully_paid(&self) -> bool {
        self.paid >= self.cost
    }

    /// Category for grouping; blank categories count as the default one.
    pub fn category_or_default(&self) -> &str {
        let trimmed = self.category.trim();
        if trimmed.is_empty() {
            DEFAULT_EXPENSE_CATEGORY
        } else {
            trimmed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expense_lenient_fields() {
        let expense: Expense = serde_json::from_str(
            r#"{"id": 7, "title": "Hall", "cost": "90,000", "paid": null, "created_at": 1700000000000}"#,
        )
        .unwrap();
        assert_eq!(expense.id, "7");
        assert_eq!(expense.cost, 90000.0);
        assert_eq!(expense.paid, 0.0);
        assert_eq!(expense.category_or_default(), "Other");
        assert_eq!(expense.created_at.timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_expense_balance() {
        let expense = Expense {
            id: "a".to_string(),
            title: "Band".to_string(),
            category: "Music & Entertainment".to_string(),
            cost: 12000.0,
            paid: 15000.0,
            note: String::new(),
            created_at: Utc::now(),
        };
        assert_eq!(expense.balance(), -3000.0);
        assert!(expense.is_fully_paid());
    }
}
