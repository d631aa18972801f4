use chrono::{DateTime, Utc};
use rand::Rng;

/// Generate an entity id derived from its creation time.
///
/// Format: hex epoch milliseconds, a dash, and a random 16-bit suffix, e.g.
/// `18c1e5a2b40-3f9a`. The suffix keeps ids created within the same
/// millisecond apart.
pub fn generate_id(created_at: DateTime<Utc>) -> String {
    let millis = created_at.timestamp_millis().max(0);
    let suffix: u16 = rand::thread_rng().gen();
    format!("{:x}-{:04x}", millis, suffix)
}

/// Generate an id that is not already used by `existing`.
pub fn unique_id<'a, I>(created_at: DateTime<Utc>, existing: I) -> String
where
    I: IntoIterator<Item = &'a str> + Clone,
{
    loop {
        let id = generate_id(created_at);
        if !existing.clone().into_iter().any(|e| e == id) {
            return id;
        }
    }
}
