use std::io;

use chrono::NaiveDate;
use wedplan_core::models::{
    Document, GuestStatus, Side, DEFAULT_GUEST_ESTIMATE, DEFAULT_TOTAL_BUDGET, MAX_PARTY_SIZE,
};
use wedplan_core::storage::{FileStore, KeyValueStore, MemoryStore, StorageError, DOCUMENT_KEY};
use wedplan_core::{
    ExpenseDraft, Field, GuestDraft, NoticeLevel, Planner, SettingsDraft, TaskDraft,
    ValidationError,
};

/// A planner whose initial frame has already been drawn.
fn planner() -> Planner<MemoryStore> {
    let mut planner = Planner::open(MemoryStore::new());
    assert!(planner.begin_frame());
    planner
}

fn expense(title: &str, cost: &str, paid: &str) -> ExpenseDraft {
    ExpenseDraft {
        title: title.to_string(),
        category: "Venue & Catering".to_string(),
        cost: cost.to_string(),
        paid: paid.to_string(),
        note: String::new(),
    }
}

fn guest(name: &str, count: &str, status: GuestStatus) -> GuestDraft {
    GuestDraft {
        name: name.to_string(),
        side: Side::Bride,
        count: count.to_string(),
        status,
        gift: String::new(),
    }
}

fn task(title: &str) -> TaskDraft {
    TaskDraft {
        title: title.to_string(),
        category: String::new(),
        urgent: false,
    }
}

/// A store whose reads always fail, recording every write attempt.
#[derive(Default)]
struct UnreadableStore {
    writes: usize,
}

impl KeyValueStore for UnreadableStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Read {
            key: key.to_string(),
            source: io::Error::new(io::ErrorKind::InvalidData, "corrupt"),
        })
    }

    fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
        self.writes += 1;
        Ok(())
    }

    fn remove(&mut self, _key: &str) -> Result<(), StorageError> {
        Ok(())
    }
}

fn stored_document(planner: &Planner<MemoryStore>) -> Option<Document> {
    planner
        .storage()
        .store()
        .get(DOCUMENT_KEY)
        .unwrap()
        .map(|text| Document::decode_lenient(&text).document)
}

#[test]
fn test_open_empty_store_gives_default_document() {
    let mut planner = Planner::open(MemoryStore::new());
    assert_eq!(planner.document(), &Document::default());
    assert_eq!(planner.settings().total_budget, DEFAULT_TOTAL_BUDGET);
    assert!(planner.take_notice().is_none());
    assert!(!planner.is_degraded());
}

#[test]
fn test_budget_example_through_planner() {
    let mut planner = planner();
    planner
        .update_settings(SettingsDraft {
            total_budget: "100000".to_string(),
            ..Default::default()
        })
        .unwrap();
    planner.add_expense(expense("Hall", "50000", "20000")).unwrap();

    let summary = planner.summary();
    assert_eq!(summary.total_cost, 50_000.0);
    assert_eq!(summary.total_paid, 20_000.0);
    assert_eq!(summary.remaining, 80_000.0);
    assert!((summary.paid_fraction - 0.2).abs() < 1e-12);
}

#[test]
fn test_add_then_delete_restores_snapshot() {
    let mut planner = planner();
    planner.add_expense(expense("Hall", "90000", "10000")).unwrap();
    planner.add_guest(guest("Dana", "2", GuestStatus::Confirmed)).unwrap();
    let before = planner.summary().clone();
    let document_before = planner.document().clone();

    let index = planner.document().expenses.len();
    planner.add_expense(expense("DJ", "8000", "")).unwrap();
    assert_ne!(planner.summary(), &before);
    planner.delete_expense(index).unwrap();
    assert_eq!(planner.summary(), &before);

    let index = planner.document().guests.len();
    planner.add_guest(guest("Avi", "3", GuestStatus::Pending)).unwrap();
    planner.delete_guest(index).unwrap();

    let index = planner.document().tasks.len();
    planner.add_task(task("Book band")).unwrap();
    planner.delete_task(index).unwrap();

    assert_eq!(planner.summary(), &before);
    assert_eq!(planner.document(), &document_before);
}

#[test]
fn test_toggle_twice_restores_done() {
    let mut planner = planner();
    planner.add_task(task("Send invitations")).unwrap();
    assert!(!planner.document().tasks[0].done);

    assert_eq!(planner.toggle_task(0), Some(true));
    assert_eq!(planner.summary().tasks_done, 1);
    assert_eq!(planner.toggle_task(0), Some(false));
    assert!(!planner.document().tasks[0].done);
    assert_eq!(planner.summary().tasks_done, 0);
    assert_eq!(planner.toggle_task(5), None);
}

#[test]
fn test_two_mutations_in_one_frame_redraw_once() {
    let mut planner = planner();
    planner.add_expense(expense("Hall", "1000", "")).unwrap();
    planner.add_guest(guest("Dana", "1", GuestStatus::Pending)).unwrap();

    assert!(planner.begin_frame());
    assert!(!planner.begin_frame());
    assert_eq!(planner.redraw().frames(), 2);
}

#[test]
fn test_summary_computed_once_per_batch() {
    let mut planner = planner();
    planner.summary();
    planner.summary();
    assert_eq!(planner.summary_cache().computations(), 1);

    planner.add_task(task("Pick rings")).unwrap();
    assert!(!planner.summary_cache().is_valid());
    planner.summary();
    planner.summary();
    assert_eq!(planner.summary_cache().computations(), 2);
}

#[test]
fn test_out_of_range_delete_is_noop() {
    let mut planner = planner();
    planner.add_task(task("Florist")).unwrap();
    planner.begin_frame();
    planner.summary();
    let saved = planner.last_saved();

    assert!(planner.delete_expense(0).is_none());
    assert!(planner.delete_guest(3).is_none());
    assert!(planner.delete_task(1).is_none());

    assert!(!planner.redraw().is_pending());
    assert!(planner.summary_cache().is_valid());
    assert_eq!(planner.last_saved(), saved);
    assert_eq!(planner.document().tasks.len(), 1);
}

#[test]
fn test_validation_failure_writes_nothing() {
    let mut planner = planner();

    let err = planner.add_expense(expense("  ", "100", "")).unwrap_err();
    assert_eq!(err, ValidationError::Required(Field::Title));
    let err = planner.add_expense(expense("Hall", "", "")).unwrap_err();
    assert_eq!(err, ValidationError::Required(Field::Cost));
    let err = planner.add_expense(expense("Hall", "a lot", "")).unwrap_err();
    assert_eq!(err, ValidationError::NotANumber(Field::Cost));
    let err = planner.add_guest(guest("", "2", GuestStatus::Pending)).unwrap_err();
    assert_eq!(err.field(), Field::Name);
    let err = planner.add_task(task("")).unwrap_err();
    assert_eq!(err.field(), Field::Title);
    let err = planner
        .update_settings(SettingsDraft {
            wedding_date: "next june".to_string(),
            ..Default::default()
        })
        .unwrap_err();
    assert_eq!(err, ValidationError::InvalidDate(Field::WeddingDate));

    assert!(stored_document(&planner).is_none());
    assert!(!planner.redraw().is_pending());
    assert_eq!(planner.document(), &Document::default());
}

#[test]
fn test_mutations_persist_full_document() {
    let mut planner = planner();
    planner.add_expense(expense("Hall", "90,000", "5000")).unwrap();
    planner.add_guest(guest("Dana", "2", GuestStatus::Confirmed)).unwrap();
    planner.add_task(task("Book photographer")).unwrap();
    planner.set_guest_status(0, GuestStatus::Declined).unwrap();

    assert_eq!(stored_document(&planner).as_ref(), Some(planner.document()));
    assert!(planner.last_saved().is_some());
}

#[test]
fn test_settings_fallbacks_and_date_change() {
    let mut planner = planner();
    let update = planner
        .update_settings(SettingsDraft {
            groom_name: " Yossi ".to_string(),
            bride_name: "Chen".to_string(),
            wedding_date: "2027-05-20".to_string(),
            total_budget: "plenty".to_string(),
            guest_estimate: String::new(),
        })
        .unwrap();
    assert!(update.wedding_date_changed);

    let settings = planner.settings();
    assert_eq!(settings.groom_name, "Yossi");
    assert_eq!(settings.wedding_date, NaiveDate::from_ymd_opt(2027, 5, 20));
    assert_eq!(settings.total_budget, DEFAULT_TOTAL_BUDGET);
    assert_eq!(settings.guest_estimate, DEFAULT_GUEST_ESTIMATE);

    let update = planner
        .update_settings(SettingsDraft {
            wedding_date: String::new(),
            total_budget: "120000".to_string(),
            ..Default::default()
        })
        .unwrap();
    assert!(update.wedding_date_changed);
    assert_eq!(planner.settings().wedding_date, None);
    assert_eq!(planner.settings().total_budget, 120_000.0);
}

#[test]
fn test_reset_all_clears_storage() {
    let mut planner = planner();
    planner
        .update_settings(SettingsDraft {
            wedding_date: "2027-05-20".to_string(),
            ..Default::default()
        })
        .unwrap();
    planner.add_guest(guest("Dana", "2", GuestStatus::Confirmed)).unwrap();
    planner.begin_frame();

    let update = planner.reset_all();
    assert!(update.wedding_date_changed);
    assert_eq!(planner.document(), &Document::default());
    assert!(stored_document(&planner).is_none());
    assert!(planner.redraw().is_pending());
    assert_eq!(planner.summary().total_guests, 0);
    let notice = planner.take_notice().unwrap();
    assert_eq!(notice.level, NoticeLevel::Info);
}

#[test]
fn test_quota_exceeded_enters_degraded_mode() {
    let mut planner = Planner::open(MemoryStore::new().with_quota(Some(16)));
    planner.begin_frame();

    planner.add_guest(guest("Dana", "2", GuestStatus::Confirmed)).unwrap();
    assert!(planner.is_degraded());
    assert_eq!(planner.document().guests.len(), 1);
    assert_eq!(planner.summary().confirmed, 2);
    assert!(planner.redraw().is_pending());
    assert!(planner.last_saved().is_none());
    let notice = planner.take_notice().unwrap();
    assert_eq!(notice.level, NoticeLevel::Warning);
    assert!(notice.message.contains("storage is full"));

    // Room again: the next mutation saves everything kept in memory.
    *planner.storage_mut().store_mut() = MemoryStore::new();
    planner.add_task(task("Tasting")).unwrap();
    assert!(!planner.is_degraded());
    assert_eq!(planner.take_notice().unwrap().level, NoticeLevel::Info);
    let stored = stored_document(&planner).unwrap();
    assert_eq!(stored.guests.len(), 1);
    assert_eq!(stored.tasks.len(), 1);
}

#[test]
fn test_malformed_section_is_recovered_with_notice() {
    let mut store = MemoryStore::new();
    store.insert_raw(
        DOCUMENT_KEY,
        r#"{"expenses": [{"id": "a", "title": "Hall", "cost": 100}], "guests": "oops"}"#,
    );
    let mut planner = Planner::open(store);

    assert_eq!(planner.document().expenses.len(), 1);
    assert!(planner.document().guests.is_empty());
    let notice = planner.take_notice().unwrap();
    assert_eq!(notice.level, NoticeLevel::Warning);
    assert!(notice.message.contains("guests"));
}

#[test]
fn test_position_lookups() {
    let mut planner = planner();
    let id = planner.add_task(task("A")).unwrap().id.clone();
    planner.add_task(task("B")).unwrap();
    assert_eq!(planner.position_of_task(&id), Some(0));
    assert_eq!(planner.position_of_expense(&id), None);
    assert_eq!(planner.position_of_guest("missing"), None);
}

#[test]
fn test_file_store_reload_gives_equal_document() {
    let dir = tempfile::tempdir().unwrap();
    let document = {
        let mut planner = Planner::open(FileStore::new(dir.path().to_path_buf()).unwrap());
        planner.add_expense(expense("Hall", "90000", "10000")).unwrap();
        planner.add_guest(guest("Dana", "2", GuestStatus::Confirmed)).unwrap();
        planner.add_task(task("Book band")).unwrap();
        planner.toggle_task(0);
        planner.document().clone()
    };

    let reopened = Planner::open(FileStore::new(dir.path().to_path_buf()).unwrap());
    assert_eq!(reopened.document(), &document);
}

#[test]
fn test_read_failure_keeps_stored_data_untouched() {
    let mut planner = Planner::open(UnreadableStore::default());
    assert!(planner.is_degraded());
    assert!(planner.is_load_failed());
    assert_eq!(planner.document(), &Document::default());
    let notice = planner.take_notice().unwrap();
    assert_eq!(notice.level, NoticeLevel::Warning);
    assert!(notice.message.contains("corrupt"));

    // Mutations still apply in memory but never reach the store.
    planner.add_task(task("Tasting")).unwrap();
    planner.add_guest(guest("Dana", "2", GuestStatus::Confirmed)).unwrap();
    assert_eq!(planner.storage().store().writes, 0);
    assert!(planner.is_degraded());
    assert!(planner.last_saved().is_none());
    assert_eq!(planner.summary().total_guests, 2);

    // Resetting acknowledges the loss and re-enables saving.
    planner.reset_all();
    assert!(!planner.is_load_failed());
    assert!(!planner.is_degraded());
    planner.add_task(task("Rings")).unwrap();
    assert_eq!(planner.storage().store().writes, 1);
}

#[test]
fn test_unreadable_file_is_not_overwritten() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(format!("{}.json", DOCUMENT_KEY));
    let mut bytes = br#"{"guests": [{"name": "Dana"}], "expenses": [{"title": "Hall", "cost": 1}]}"#.to_vec();
    bytes.push(0xFF);
    std::fs::write(&path, &bytes).unwrap();

    let mut planner = Planner::open(FileStore::new(dir.path().to_path_buf()).unwrap());
    assert!(planner.is_degraded());
    planner.add_task(task("x")).unwrap();

    assert_eq!(std::fs::read(&path).unwrap(), bytes);
}

#[test]
fn test_huge_party_sizes_are_capped() {
    let mut planner = planner();
    planner.add_guest(guest("Dana", "3000000000", GuestStatus::Confirmed)).unwrap();
    planner.add_guest(guest("Avi", "3000000000", GuestStatus::Pending)).unwrap();
    assert_eq!(planner.document().guests[0].count, MAX_PARTY_SIZE);

    let summary = planner.summary();
    assert_eq!(summary.total_guests, 2 * MAX_PARTY_SIZE);
    assert_eq!(
        summary.confirmed + summary.pending + summary.declined,
        summary.total_guests
    );
}

#[test]
fn test_stored_huge_counts_do_not_overflow() {
    let mut store = MemoryStore::new();
    store.insert_raw(
        DOCUMENT_KEY,
        r#"{"guests": [{"name": "A", "count": 4294967295}, {"name": "B", "count": 1}]}"#,
    );
    let planner = Planner::open(store);
    assert_eq!(planner.document().guests[0].count, MAX_PARTY_SIZE);
    assert_eq!(planner.summary().total_guests, MAX_PARTY_SIZE + 1);
}

#[test]
fn test_free_text_numbers_are_not_guessed() {
    let mut planner = planner();

    let err = planner.add_expense(expense("Band", "1.5k", "")).unwrap_err();
    assert_eq!(err, ValidationError::NotANumber(Field::Cost));

    planner.add_guest(guest("Dana", "5 people", GuestStatus::Pending)).unwrap();
    planner.add_guest(guest("Avi", "4 kids", GuestStatus::Pending)).unwrap();
    assert_eq!(planner.document().guests[0].count, 1);
    assert_eq!(planner.document().guests[1].count, 1);

    planner
        .update_settings(SettingsDraft {
            total_budget: "-5000".to_string(),
            guest_estimate: "-20".to_string(),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(planner.settings().total_budget, DEFAULT_TOTAL_BUDGET);
    assert_eq!(planner.settings().guest_estimate, DEFAULT_GUEST_ESTIMATE);

    planner
        .update_settings(SettingsDraft {
            total_budget: "₪120,000".to_string(),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(planner.settings().total_budget, 120_000.0);
}
