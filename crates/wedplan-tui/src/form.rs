//! Add/edit forms shown as overlays.
//!
//! A form is a list of fields in display order. Text fields collect raw input
//! which the planner validates; choice fields cycle through fixed options.

use wedplan_core::{
    ExpenseDraft, Field, GuestDraft, GuestStatus, SettingsDraft, Side, TaskDraft, ValidationError,
};

use crate::app::can_add_input_char;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    Expense,
    Guest,
    Task,
    Settings,
}

impl FormKind {
    pub fn title(&self) -> &'static str {
        match self {
            FormKind::Expense => "New Expense",
            FormKind::Guest => "New Guest",
            FormKind::Task => "New Task",
            FormKind::Settings => "Wedding Settings",
        }
    }
}

/// Identifies a field within a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKey {
    Title,
    Category,
    Cost,
    Paid,
    Note,
    Name,
    Side,
    Count,
    Status,
    Gift,
    Urgent,
    GroomName,
    BrideName,
    WeddingDate,
    TotalBudget,
    GuestEstimate,
}

impl FormKey {
    /// The validated field this input feeds, if any.
    fn validates(&self) -> Option<Field> {
        match self {
            FormKey::Title => Some(Field::Title),
            FormKey::Cost => Some(Field::Cost),
            FormKey::Name => Some(Field::Name),
            FormKey::WeddingDate => Some(Field::WeddingDate),
            FormKey::Category
            | FormKey::Paid
            | FormKey::Count
            | FormKey::Gift
            | FormKey::TotalBudget
            | FormKey::GuestEstimate
            | FormKey::Note
            | FormKey::Side
            | FormKey::Status
            | FormKey::Urgent
            | FormKey::GroomName
            | FormKey::BrideName => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Choice { options: Vec<String>, selected: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub key: FormKey,
    pub label: &'static str,
    pub value: FieldValue,
    pub hint: Option<&'static str>,
}

impl FormField {
    fn text(key: FormKey, label: &'static str, initial: &str) -> Self {
        Self {
            key,
            label,
            value: FieldValue::Text(initial.to_string()),
            hint: None,
        }
    }

    fn choice(key: FormKey, label: &'static str, options: Vec<String>, selected: usize) -> Self {
        Self {
            key,
            label,
            value: FieldValue::Choice { options, selected },
            hint: None,
        }
    }

    fn with_hint(mut self, hint: &'static str) -> Self {
        self.hint = Some(hint);
        self
    }

    /// Text content, or the selected option of a choice.
    pub fn display(&self) -> &str {
        match &self.value {
            FieldValue::Text(text) => text,
            FieldValue::Choice { options, selected } => {
                options.get(*selected).map(String::as_str).unwrap_or("")
            }
        }
    }

    pub fn is_choice(&self) -> bool {
        matches!(self.value, FieldValue::Choice { .. })
    }
}

#[derive(Debug, Clone)]
pub struct Form {
    pub kind: FormKind,
    pub fields: Vec<FormField>,
    pub focus: usize,
    pub error: Option<ValidationError>,
}

fn yes_no() -> Vec<String> {
    vec!["No".to_string(), "Yes".to_string()]
}

impl Form {
    fn new(kind: FormKind, fields: Vec<FormField>) -> Self {
        Self {
            kind,
            fields,
            focus: 0,
            error: None,
        }
    }

    pub fn expense(categories: Vec<String>) -> Self {
        Self::new(
            FormKind::Expense,
            vec![
                FormField::text(FormKey::Title, "Title", ""),
                FormField::choice(FormKey::Category, "Category", categories, 0),
                FormField::text(FormKey::Cost, "Cost", "").with_hint("required"),
                FormField::text(FormKey::Paid, "Paid", ""),
                FormField::text(FormKey::Note, "Note", ""),
            ],
        )
    }

    pub fn guest() -> Self {
        let sides = Side::ALL.iter().map(|s| s.to_string()).collect();
        let statuses = GuestStatus::ALL.iter().map(|s| s.to_string()).collect();
        let default_side = Side::ALL.iter().position(|s| *s == Side::default()).unwrap_or(0);
        let default_status = GuestStatus::ALL
            .iter()
            .position(|s| *s == GuestStatus::default())
            .unwrap_or(0);
        Self::new(
            FormKind::Guest,
            vec![
                FormField::text(FormKey::Name, "Name", ""),
                FormField::choice(FormKey::Side, "Side", sides, default_side),
                FormField::text(FormKey::Count, "Party size", "1"),
                FormField::choice(FormKey::Status, "RSVP", statuses, default_status),
                FormField::text(FormKey::Gift, "Gift", ""),
            ],
        )
    }

    pub fn task() -> Self {
        Self::new(
            FormKind::Task,
            vec![
                FormField::text(FormKey::Title, "Title", ""),
                FormField::text(FormKey::Category, "Category", ""),
                FormField::choice(FormKey::Urgent, "Urgent", yes_no(), 0),
            ],
        )
    }

    pub fn settings(draft: SettingsDraft) -> Self {
        Self::new(
            FormKind::Settings,
            vec![
                FormField::text(FormKey::GroomName, "Groom", &draft.groom_name),
                FormField::text(FormKey::BrideName, "Bride", &draft.bride_name),
                FormField::text(FormKey::WeddingDate, "Date", &draft.wedding_date)
                    .with_hint("YYYY-MM-DD, empty to clear"),
                FormField::text(FormKey::TotalBudget, "Budget", &draft.total_budget),
                FormField::text(FormKey::GuestEstimate, "Guests", &draft.guest_estimate),
            ],
        )
    }

    // =========================================================================
    // Editing
    // =========================================================================

    pub fn focused(&self) -> Option<&FormField> {
        self.fields.get(self.focus)
    }

    pub fn next_field(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + 1) % self.fields.len();
        }
    }

    pub fn prev_field(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
        }
    }

    /// Type into the focused text field. Choice fields ignore characters.
    pub fn insert_char(&mut self, c: char) {
        if let Some(FormField {
            value: FieldValue::Text(text),
            ..
        }) = self.fields.get_mut(self.focus)
        {
            if can_add_input_char(text.chars().count(), c) {
                text.push(c);
            }
        }
    }

    pub fn backspace(&mut self) {
        if let Some(FormField {
            value: FieldValue::Text(text),
            ..
        }) = self.fields.get_mut(self.focus)
        {
            text.pop();
        }
    }

    /// Step the focused choice field forward or back, wrapping.
    pub fn cycle_choice(&mut self, forward: bool) {
        if let Some(FormField {
            value: FieldValue::Choice { options, selected },
            ..
        }) = self.fields.get_mut(self.focus)
        {
            if options.is_empty() {
                return;
            }
            *selected = if forward {
                (*selected + 1) % options.len()
            } else {
                (*selected + options.len() - 1) % options.len()
            };
        }
    }

    /// Record a validation failure and move focus to the offending field.
    pub fn set_error(&mut self, error: ValidationError) {
        if let Some(index) = self
            .fields
            .iter()
            .position(|f| f.key.validates() == Some(error.field()))
        {
            self.focus = index;
        }
        self.error = Some(error);
    }

    /// True when `index` is the field the current error refers to.
    pub fn is_error_field(&self, index: usize) -> bool {
        match (&self.error, self.fields.get(index)) {
            (Some(error), Some(field)) => field.key.validates() == Some(error.field()),
            _ => false,
        }
    }

    // =========================================================================
    // Drafts
    // =========================================================================

    fn value(&self, key: FormKey) -> String {
        self.fields
            .iter()
            .find(|f| f.key == key)
            .map(|f| f.display().to_string())
            .unwrap_or_default()
    }

    pub fn expense_draft(&self) -> ExpenseDraft {
        ExpenseDraft {
            title: self.value(FormKey::Title),
            category: self.value(FormKey::Category),
            cost: self.value(FormKey::Cost),
            paid: self.value(FormKey::Paid),
            note: self.value(FormKey::Note),
        }
    }

    pub fn guest_draft(&self) -> GuestDraft {
        GuestDraft {
            name: self.value(FormKey::Name),
            side: self.value(FormKey::Side).parse().unwrap_or_default(),
            count: self.value(FormKey::Count),
            status: self.value(FormKey::Status).parse().unwrap_or_default(),
            gift: self.value(FormKey::Gift),
        }
    }

    pub fn task_draft(&self) -> TaskDraft {
        TaskDraft {
            title: self.value(FormKey::Title),
            category: self.value(FormKey::Category),
            urgent: self.value(FormKey::Urgent) == "Yes",
        }
    }

    pub fn settings_draft(&self) -> SettingsDraft {
        SettingsDraft {
            groom_name: self.value(FormKey::GroomName),
            bride_name: self.value(FormKey::BrideName),
            wedding_date: self.value(FormKey::WeddingDate),
            total_budget: self.value(FormKey::TotalBudget),
            guest_estimate: self.value(FormKey::GuestEstimate),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_text(form: &mut Form, text: &str) {
        for c in text.chars() {
            form.insert_char(c);
        }
    }

    #[test]
    fn test_expense_form_builds_draft() {
        let mut form = Form::expense(vec!["Venue".to_string(), "Music".to_string()]);
        type_text(&mut form, "Hall");
        form.next_field();
        form.cycle_choice(true);
        // Characters are ignored on choice fields
        form.insert_char('x');
        form.next_field();
        type_text(&mut form, "90000");
        form.backspace();

        let draft = form.expense_draft();
        assert_eq!(draft.title, "Hall");
        assert_eq!(draft.category, "Music");
        assert_eq!(draft.cost, "9000");
        assert_eq!(draft.paid, "");
    }

    #[test]
    fn test_guest_form_defaults() {
        let form = Form::guest();
        let draft = form.guest_draft();
        assert_eq!(draft.side, Side::Both);
        assert_eq!(draft.status, GuestStatus::Pending);
        assert_eq!(draft.count, "1");
    }

    #[test]
    fn test_guest_form_cycles_status() {
        let mut form = Form::guest();
        form.focus = 3;
        form.cycle_choice(false);
        let status = form.guest_draft().status;
        assert_ne!(status, GuestStatus::Pending);
    }

    #[test]
    fn test_task_form_urgent_toggle() {
        let mut form = Form::task();
        type_text(&mut form, "Book DJ");
        form.prev_field();
        assert_eq!(form.focus, 2);
        form.cycle_choice(true);
        let draft = form.task_draft();
        assert!(draft.urgent);
        assert_eq!(draft.title, "Book DJ");
    }

    #[test]
    fn test_set_error_focuses_field() {
        let mut form = Form::expense(vec!["Venue".to_string()]);
        form.set_error(ValidationError::NotANumber(Field::Cost));
        assert_eq!(form.focus, 2);
        assert!(form.is_error_field(2));
        assert!(!form.is_error_field(0));
    }

    #[test]
    fn test_settings_form_prefilled() {
        let form = Form::settings(SettingsDraft {
            groom_name: "Yossi".to_string(),
            wedding_date: "2027-05-20".to_string(),
            ..Default::default()
        });
        let draft = form.settings_draft();
        assert_eq!(draft.groom_name, "Yossi");
        assert_eq!(draft.wedding_date, "2027-05-20");
        assert_eq!(form.kind.title(), "Wedding Settings");
    }
}
