use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::coerce;

/// Budget used when none is configured or the input is unusable.
pub const DEFAULT_TOTAL_BUDGET: f64 = 150_000.0;

/// Expected head count used when none is configured.
pub const DEFAULT_GUEST_ESTIMATE: u32 = 300;

fn default_total_budget() -> f64 {
    DEFAULT_TOTAL_BUDGET
}

fn default_guest_estimate() -> u32 {
    DEFAULT_GUEST_ESTIMATE
}

/// Couple and wedding-level settings.
///
/// Every field has its own default so a partially stored settings object is
/// merged over the defaults instead of being discarded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default, deserialize_with = "coerce::lenient_string")]
    pub groom_name: String,
    #[serde(default, deserialize_with = "coerce::lenient_string")]
    pub bride_name: String,
    #[serde(default, deserialize_with = "coerce::lenient_date")]
    pub wedding_date: Option<NaiveDate>,
    #[serde(default = "default_total_budget", deserialize_with = "coerce::lenient_amount")]
    pub total_budget: f64,
    #[serde(default = "default_guest_estimate", deserialize_with = "lenient_guest_estimate")]
    pub guest_estimate: u32,
}

fn lenient_guest_estimate<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(coerce::count_from_value(&value))
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            groom_name: String::new(),
            bride_name: String::new(),
            wedding_date: None,
            total_budget: DEFAULT_TOTAL_BUDGET,
            guest_estimate: DEFAULT_GUEST_ESTIMATE,
        }
    }
}

impl Settings {
    /// "Groom & Bride", or whichever name is set.
    pub fn couple_display(&self) -> Option<String> {
        let groom = self.groom_name.trim();
        let bride = self.bride_name.trim();
        match (groom.is_empty(), bride.is_empty()) {
            (false, false) => Some(format!("{} & {}", groom, bride)),
            (false, true) => Some(groom.to_string()),
            (true, false) => Some(bride.to_string()),
            (true, true) => None,
        }
    }
}
