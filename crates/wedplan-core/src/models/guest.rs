use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::coerce;

/// Largest party a single guest entry can stand for.
pub const MAX_PARTY_SIZE: u32 = 1_000;

/// Which side of the family a guest belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Groom,
    Bride,
    #[default]
    Both,
}

impl Side {
    pub const ALL: [Side; 3] = [Side::Groom, Side::Bride, Side::Both];

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Groom => "groom",
            Side::Bride => "bride",
            Side::Both => "both",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Groom => write!(f, "Groom"),
            Side::Bride => write!(f, "Bride"),
            Side::Both => write!(f, "Both"),
        }
    }
}

impl FromStr for Side {
    type Err = std::convert::Infallible;

    /// Unknown values fall back to `Both`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Ok(match lower.as_str() {
            "groom" => Side::Groom,
            "bride" => Side::Bride,
            _ => Side::Both,
        })
    }
}

impl<'de> Deserialize<'de> for Side {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = coerce::lenient_string(deserializer)?;
        Ok(raw.parse().unwrap_or_default())
    }
}

/// RSVP state of a guest entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GuestStatus {
    Confirmed,
    #[default]
    Pending,
    Declined,
}

impl GuestStatus {
    pub const ALL: [GuestStatus; 3] = [
        GuestStatus::Confirmed,
        GuestStatus::Pending,
        GuestStatus::Declined,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GuestStatus::Confirmed => "confirmed",
            GuestStatus::Pending => "pending",
            GuestStatus::Declined => "declined",
        }
    }
}

impl fmt::Display for GuestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GuestStatus::Confirmed => write!(f, "Confirmed"),
            GuestStatus::Pending => write!(f, "Pending"),
            GuestStatus::Declined => write!(f, "Declined"),
        }
    }
}

impl FromStr for GuestStatus {
    type Err = std::convert::Infallible;

    /// Accepts the RSVP spellings seen in stored data; anything else is pending.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Ok(match lower.as_str() {
            "confirmed" | "yes" | "going" | "attending" => GuestStatus::Confirmed,
            "declined" | "no" | "not going" | "not_going" => GuestStatus::Declined,
            _ => GuestStatus::Pending,
        })
    }
}

impl<'de> Deserialize<'de> for GuestStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = coerce::lenient_string(deserializer)?;
        Ok(raw.parse().unwrap_or_default())
    }
}

fn default_party_size() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Guest {
    #[serde(default, deserialize_with = "coerce::lenient_string")]
    pub id: String,
    #[serde(default, deserialize_with = "coerce::lenient_string")]
    pub name: String,
    #[serde(default)]
    pub side: Side,
    /// Number of people this entry stands for (a couple is one entry of 2).
    #[serde(default = "default_party_size", deserialize_with = "coerce::lenient_party_size")]
    pub count: u32,
    #[serde(default)]
    pub status: GuestStatus,
    #[serde(default, deserialize_with = "coerce::lenient_amount")]
    pub gift: f64,
    #[serde(default = "Utc::now", deserialize_with = "coerce::lenient_timestamp")]
    pub created_at: DateTime<Utc>,
}
