use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::coerce;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    #[serde(default, deserialize_with = "coerce::lenient_string")]
    pub id: String,
    #[serde(default, deserialize_with = "coerce::lenient_string")]
    pub title: String,
    #[serde(default, deserialize_with = "coerce::lenient_string")]
    pub category: String,
    #[serde(default, deserialize_with = "coerce::lenient_bool")]
    pub done: bool,
    /// Urgent open tasks are counted separately on the dashboard.
    #[serde(default, deserialize_with = "coerce::lenient_bool")]
    pub urgent: bool,
    #[serde(default = "Utc::now", deserialize_with = "coerce::lenient_timestamp")]
    pub created_at: DateTime<Utc>,
}

impl Task {
    pub fn is_urgent_open(&self) -> bool {
        self.urgent && !self.done
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_lenient_flags() {
        let task: Task =
            serde_json::from_str(r#"{"title": "Book venue", "done": 1, "urgent": "yes"}"#).unwrap();
        assert!(task.done);
        assert!(task.urgent);
        assert!(!task.is_urgent_open());
    }
}
