use chrono::{DateTime, NaiveDate, Utc};

/// Format an amount with thousands separators and a currency symbol, e.g.
/// `₪12,500`. Fractions are shown only when the amount has cents.
pub fn format_money(amount: f64, symbol: &str) -> String {
    let negative = amount < 0.0;
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = cents / 100;
    let frac = cents % 100;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if negative && cents > 0 { "-" } else { "" };
    if frac == 0 {
        format!("{}{}{}", sign, symbol, grouped)
    } else {
        format!("{}{}{}.{:02}", sign, symbol, grouped, frac)
    }
}

/// Format a `[0, 1]` fraction as a whole percentage.
pub fn format_percent(fraction: f64) -> String {
    let percent = if fraction.is_finite() {
        (fraction * 100.0).round()
    } else {
        0.0
    };
    format!("{}%", percent as i64)
}

pub fn format_date(date: Option<NaiveDate>) -> String {
    match date {
        Some(d) => d.format("%b %d, %Y").to_string(),
        None => "Not set".to_string(),
    }
}

/// Relative age of a timestamp, e.g. "just now", "5m ago", "2h ago".
pub fn age_display(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = (now - at).num_minutes();
    if minutes < 1 {
        // Includes clock skew
        "just now".to_string()
    } else if minutes < 60 {
        format!("{}m ago", minutes)
    } else if minutes < 1440 {
        let hours = minutes / 60;
        if minutes % 60 >= 30 {
            format!("{}h ago", hours + 1)
        } else {
            format!("{}h ago", hours)
        }
    } else {
        let days = minutes / 1440;
        if (minutes % 1440) / 60 >= 12 {
            format!("{}d ago", days + 1)
        } else {
            format!("{}d ago", days)
        }
    }
}

/// Truncate to `max_len` characters, ending with an ellipsis when cut.
pub fn truncate(s: &str, max_len: usize) -> String {
    let cleaned = s.replace('\t', " ");
    let cleaned = cleaned.trim();
    if cleaned.chars().count() <= max_len {
        cleaned.to_string()
    } else {
        let kept: String = cleaned.chars().take(max_len.saturating_sub(1)).collect();
        format!("{}…", kept)
    }
}

pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.to_lowercase().contains(&needle.to_lowercase())
}
