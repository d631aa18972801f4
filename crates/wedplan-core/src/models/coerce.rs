//! Lenient field decoding for persisted documents.
//!
//! Stored documents may have been written by older versions or edited by hand,
//! so numeric fields accept numbers, numeric strings, `null` or nothing at all.
//! Anything that is not a usable non-negative number becomes `0`.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::guest::MAX_PARTY_SIZE;

/// Coerce a JSON value into a finite, non-negative amount.
pub fn amount_from_value(value: &Value) -> f64 {
    let raw = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => parse_amount(s).unwrap_or(0.0),
        Value::Bool(_) | Value::Null | Value::Array(_) | Value::Object(_) => 0.0,
    };
    sanitize_amount(raw)
}

/// Parse user or stored text as an amount. Surrounding whitespace, a leading
/// currency sign and thousands separators are tolerated: "₪12,500",
/// "-₪30,000" and " 12500 " all parse. Anything else, such as units or
/// suffixes ("1.5k", "5 people"), is rejected.
pub fn parse_amount(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    let (negative, rest) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest.trim_start()),
        None => (false, trimmed),
    };
    let rest = rest.strip_prefix(is_currency_sign).unwrap_or(rest).trim_start();
    let (negative, rest) = match rest.strip_prefix('-') {
        Some(inner) if !negative => (true, inner),
        _ => (negative, rest),
    };

    let digits: String = rest.chars().filter(|c| *c != ',').collect();
    if digits.is_empty()
        || !digits.chars().any(|c| c.is_ascii_digit())
        || !digits.chars().all(|c| c.is_ascii_digit() || c == '.')
    {
        return None;
    }
    let value = digits.parse::<f64>().ok().filter(|v| v.is_finite())?;
    Some(if negative { -value } else { value })
}

fn is_currency_sign(c: char) -> bool {
    matches!(c, '₪' | '$' | '€' | '£' | '¥')
}

/// Clamp negative and non-finite values to zero.
pub fn sanitize_amount(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Coerce a JSON value into a whole count (fractions are truncated).
pub fn count_from_value(value: &Value) -> u32 {
    let amount = amount_from_value(value);
    if amount >= u32::MAX as f64 {
        u32::MAX
    } else {
        amount as u32
    }
}

/// A party size between 1 and `MAX_PARTY_SIZE`; fractions are truncated.
pub fn party_size(amount: f64) -> u32 {
    let amount = sanitize_amount(amount);
    if amount >= MAX_PARTY_SIZE as f64 {
        MAX_PARTY_SIZE
    } else {
        (amount as u32).max(1)
    }
}

pub fn lenient_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(amount_from_value(&value))
}

/// Party sizes are at least one person.
pub fn lenient_party_size<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(party_size(amount_from_value(&value)))
}

pub fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Bool(b) => b,
        Value::Number(n) => n.as_f64().map(|v| v != 0.0).unwrap_or(false),
        Value::String(s) => matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes"),
        _ => false,
    })
}

/// Any JSON scalar as a string; `null` and structures become empty.
pub fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    })
}

/// Accepts RFC 3339 strings or epoch milliseconds. Anything else is treated
/// as "created now" rather than rejecting the whole record.
pub fn lenient_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(timestamp_from_value(&value).unwrap_or_else(Utc::now))
}

fn timestamp_from_value(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => DateTime::parse_from_rfc3339(s.trim())
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
            .or_else(|| s.trim().parse::<i64>().ok().and_then(millis_to_utc)),
        Value::Number(n) => n.as_i64().and_then(millis_to_utc),
        _ => None,
    }
}

fn millis_to_utc(millis: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(millis).single()
}

/// Dates are stored as `YYYY-MM-DD`; full timestamps are cut to their date.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(trimmed)
                .ok()
                .map(|dt| dt.date_naive())
        })
}

pub fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => parse_date(&s),
        _ => None,
    })
}
