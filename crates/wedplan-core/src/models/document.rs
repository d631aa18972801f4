use std::collections::HashSet;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use super::id::unique_id;
use super::{Expense, Guest, Settings, Task};

/// The complete persisted planner state.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub expenses: Vec<Expense>,
    #[serde(default)]
    pub guests: Vec<Guest>,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

/// Top-level sections of a document, recovered independently on load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Settings,
    Expenses,
    Guests,
    Tasks,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::Settings,
        Section::Expenses,
        Section::Guests,
        Section::Tasks,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Section::Settings => "settings",
            Section::Expenses => "expenses",
            Section::Guests => "guests",
            Section::Tasks => "tasks",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Result of decoding a stored document leniently.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Decoded {
    pub document: Document,
    /// Sections that were present but unreadable and were reset to defaults.
    pub recovered: Vec<Section>,
}

impl Document {
    /// Decode stored JSON, merging defaults per top-level section.
    ///
    /// Text that is not a JSON object yields the default document with every
    /// section reported as recovered. Inside an object, a section that fails
    /// to decode falls back to its default while the others are kept. Missing
    /// sections are simply defaulted and not reported.
    pub fn decode_lenient(text: &str) -> Decoded {
        let value: Value = match serde_json::from_str(text) {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "Stored document is not valid JSON, using defaults");
                return Decoded {
                    document: Document::default(),
                    recovered: Section::ALL.to_vec(),
                };
            }
        };

        let Value::Object(mut map) = value else {
            warn!("Stored document is not an object, using defaults");
            return Decoded {
                document: Document::default(),
                recovered: Section::ALL.to_vec(),
            };
        };

        let mut recovered = Vec::new();
        let mut document = Document {
            settings: take_section(&mut map, Section::Settings, &mut recovered),
            expenses: take_section(&mut map, Section::Expenses, &mut recovered),
            guests: take_section(&mut map, Section::Guests, &mut recovered),
            tasks: take_section(&mut map, Section::Tasks, &mut recovered),
        };
        document.repair_ids();

        Decoded {
            document,
            recovered,
        }
    }

    /// Give every entity a unique id within its list.
    ///
    /// Entries with an empty id or a duplicate of an earlier entry get a
    /// freshly generated one. Returns how many ids were replaced.
    pub fn repair_ids(&mut self) -> usize {
        let mut repaired = 0;
        repaired += repair_list(&mut self.expenses, |e| &mut e.id, |e| e.created_at);
        repaired += repair_list(&mut self.guests, |g| &mut g.id, |g| g.created_at);
        repaired += repair_list(&mut self.tasks, |t| &mut t.id, |t| t.created_at);
        if repaired > 0 {
            debug!(repaired, "Repaired missing or duplicate entity ids");
        }
        repaired
    }

    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty() && self.guests.is_empty() && self.tasks.is_empty()
    }
}

fn take_section<T: DeserializeOwned + Default>(
    map: &mut serde_json::Map<String, Value>,
    section: Section,
    recovered: &mut Vec<Section>,
) -> T {
    match map.remove(section.key()) {
        None | Some(Value::Null) => T::default(),
        Some(value) => match serde_json::from_value(value) {
            Ok(decoded) => decoded,
            Err(e) => {
                warn!(section = %section, error = %e, "Unreadable section, using defaults");
                recovered.push(section);
                T::default()
            }
        },
    }
}

fn repair_list<T>(
    items: &mut [T],
    id_of: impl Fn(&mut T) -> &mut String,
    created_of: impl Fn(&T) -> chrono::DateTime<chrono::Utc>,
) -> usize {
    let mut seen: HashSet<String> = HashSet::new();
    let mut pending = Vec::new();
    for (i, item) in items.iter_mut().enumerate() {
        let id = id_of(item);
        if id.trim().is_empty() || !seen.insert(id.clone()) {
            pending.push(i);
        }
    }
    for &i in &pending {
        let created_at = created_of(&items[i]);
        let fresh = unique_id(created_at, seen.iter().map(String::as_str));
        seen.insert(fresh.clone());
        *id_of(&mut items[i]) = fresh;
    }
    pending.len()
}
