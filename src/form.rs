use ratatui::crossterm::event::{Event, KeyCode, KeyEvent};
use thiserror::Error;
use tui_input::Input;
use tui_input::backend::crossterm::EventHandler;

use crate::models::{Registration, RegistrationId, Status};
use crate::view::parse_date;

/// What submitting the form does
/// Mode and field values only change together, through [`FormState`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FormMode {
    /// Submit creates a new registration
    #[default]
    Create,
    /// Submit replaces the registration with this id
    Edit(RegistrationId),
}

/// Validated form contents, tagged with the mode they were submitted in
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Create(Registration),
    Update(RegistrationId, Registration),
}

/// Reasons a submit is rejected before any request is made
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("{0} is required")]
    Required(&'static str),

    #[error("Date must be YYYY-MM-DD or an RFC 3339 timestamp (got '{0}')")]
    InvalidDate(String),
}

/// Check a record the way the form does before sending it
pub fn validate(record: &Registration) -> Result<(), FormError> {
    if record.event_name.trim().is_empty() {
        return Err(FormError::Required(FormField::EventName.label()));
    }
    if record.category.trim().is_empty() {
        return Err(FormError::Required(FormField::Category.label()));
    }
    if record.date.trim().is_empty() {
        return Err(FormError::Required(FormField::Date.label()));
    }
    if parse_date(&record.date).is_none() {
        return Err(FormError::InvalidDate(record.date.clone()));
    }
    Ok(())
}

/// Form fields in focus order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormField {
    #[default]
    EventName,
    Category,
    Date,
    Status,
}

impl FormField {
    pub const ALL: [FormField; 4] = [
        FormField::EventName,
        FormField::Category,
        FormField::Date,
        FormField::Status,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FormField::EventName => "Event Name",
            FormField::Category => "Category",
            FormField::Date => "Date",
            FormField::Status => "Status",
        }
    }

    fn next(self) -> Self {
        match self {
            FormField::EventName => FormField::Category,
            FormField::Category => FormField::Date,
            FormField::Date => FormField::Status,
            FormField::Status => FormField::EventName,
        }
    }

    fn previous(self) -> Self {
        match self {
            FormField::EventName => FormField::Status,
            FormField::Category => FormField::EventName,
            FormField::Date => FormField::Category,
            FormField::Status => FormField::Date,
        }
    }
}

/// The registration form: current mode plus field contents
#[derive(Debug, Clone, Default)]
pub struct FormState {
    mode: FormMode,
    pub event_name: Input,
    pub category: Input,
    pub date: Input,
    pub status: Status,
    pub focus: FormField,
    /// Validation message from the last rejected submit
    pub error: Option<FormError>,
}

impl FormState {
    /// Empty form in Create mode
    pub fn new() -> Self {
        FormState {
            status: Status::Registered,
            ..FormState::default()
        }
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.mode, FormMode::Edit(_))
    }

    pub fn title(&self) -> &'static str {
        match self.mode {
            FormMode::Create => "Add New Registration",
            FormMode::Edit(_) => "Update Registration",
        }
    }

    pub fn submit_label(&self) -> &'static str {
        match self.mode {
            FormMode::Create => "Add Registration",
            FormMode::Edit(_) => "Update Registration",
        }
    }

    /// Switch to Edit mode for `record`, loading its stored values verbatim
    pub fn begin_edit(&mut self, id: RegistrationId, record: &Registration) {
        *self = FormState {
            mode: FormMode::Edit(id),
            event_name: Input::new(record.event_name.clone()),
            category: Input::new(record.category.clone()),
            date: Input::new(record.date.clone()),
            status: record.status.clone(),
            focus: FormField::EventName,
            error: None,
        };
    }

    /// Clear all fields and return to Create mode
    pub fn reset(&mut self) {
        *self = FormState::new();
    }

    /// Current field values as an unsaved record
    pub fn values(&self) -> Registration {
        Registration::new(
            self.event_name.value(),
            self.category.value(),
            self.date.value(),
            self.status.clone(),
        )
    }

    /// Validate the fields and produce the request for the current mode
    pub fn submission(&self) -> Result<Submission, FormError> {
        let record = self.values();
        validate(&record)?;

        Ok(match &self.mode {
            FormMode::Create => Submission::Create(record),
            FormMode::Edit(id) => Submission::Update(id.clone(), record),
        })
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_previous(&mut self) {
        self.focus = self.focus.previous();
    }

    /// Text input for a field (None for the status select)
    pub fn input(&self, field: FormField) -> Option<&Input> {
        match field {
            FormField::EventName => Some(&self.event_name),
            FormField::Category => Some(&self.category),
            FormField::Date => Some(&self.date),
            FormField::Status => None,
        }
    }

    /// Apply an editing key to the focused field
    /// Returns true if the key changed anything
    pub fn handle_edit_key(&mut self, key: KeyEvent) -> bool {
        let changed = match self.focus {
            FormField::Status => match key.code {
                KeyCode::Right | KeyCode::Char(' ') => {
                    self.status = self.status.next();
                    true
                }
                KeyCode::Left => {
                    self.status = self.status.previous();
                    true
                }
                _ => false,
            },
            field => {
                let input = match field {
                    FormField::EventName => &mut self.event_name,
                    FormField::Category => &mut self.category,
                    _ => &mut self.date,
                };
                input.handle_event(&Event::Key(key)).is_some()
            }
        };

        if changed {
            self.error = None;
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::crossterm::event::KeyModifiers;

    fn type_text(form: &mut FormState, text: &str) {
        for c in text.chars() {
            form.handle_edit_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
        }
    }

    fn fill(form: &mut FormState) {
        type_text(form, "Demo");
        form.focus_next();
        type_text(form, "Workshop");
        form.focus_next();
        type_text(form, "2024-05-01");
    }

    #[test]
    fn test_initial_state_is_create() {
        let form = FormState::new();
        assert_eq!(form.mode(), &FormMode::Create);
        assert_eq!(form.submit_label(), "Add Registration");
        assert_eq!(form.title(), "Add New Registration");
        assert_eq!(form.values().event_name, "");
        assert_eq!(form.status, Status::Registered);
    }

    #[test]
    fn test_create_submission() {
        let mut form = FormState::new();
        fill(&mut form);

        assert_eq!(
            form.submission().unwrap(),
            Submission::Create(Registration::new(
                "Demo",
                "Workshop",
                "2024-05-01",
                Status::Registered
            ))
        );
    }

    #[test]
    fn test_begin_edit_prefills_exact_values() {
        let stored = Registration::new("RustConf", "Conference", "2024-09-10", Status::Attended)
            .with_id(7u64);
        let mut form = FormState::new();
        form.begin_edit(RegistrationId::Number(7), &stored);

        assert_eq!(form.mode(), &FormMode::Edit(RegistrationId::Number(7)));
        assert_eq!(form.submit_label(), "Update Registration");
        assert_eq!(form.values(), stored.without_id());
        assert_eq!(
            form.submission().unwrap(),
            Submission::Update(RegistrationId::Number(7), stored.without_id())
        );
    }

    #[test]
    fn test_unknown_status_survives_prefill() {
        let stored = Registration::new("A", "B", "2024-01-01", Status::Other("Waitlisted".into()));
        let mut form = FormState::new();
        form.begin_edit(RegistrationId::Number(1), &stored);
        assert_eq!(form.values().status, Status::Other("Waitlisted".into()));
    }

    #[test]
    fn test_reset_returns_to_create_and_clears_fields() {
        let stored = Registration::new("A", "B", "2024-01-01", Status::Cancelled);
        let mut form = FormState::new();
        form.begin_edit(RegistrationId::Number(1), &stored);
        form.reset();

        assert!(!form.is_editing());
        assert_eq!(form.values(), Registration::new("", "", "", Status::Registered));
        assert_eq!(form.submit_label(), "Add Registration");
    }

    #[test]
    fn test_validation() {
        let mut form = FormState::new();
        assert_eq!(form.submission(), Err(FormError::Required("Event Name")));

        type_text(&mut form, "Demo");
        assert_eq!(form.submission(), Err(FormError::Required("Category")));

        form.focus_next();
        type_text(&mut form, "Workshop");
        form.focus_next();
        type_text(&mut form, "05/01/2024");
        assert_eq!(
            form.submission(),
            Err(FormError::InvalidDate("05/01/2024".to_string()))
        );
    }

    #[test]
    fn test_stored_timestamp_date_resubmits() {
        let stored = Registration::new("A", "B", "2024-05-01T09:00:00Z", Status::Registered)
            .with_id(4u64);
        let mut form = FormState::new();
        form.begin_edit(RegistrationId::Number(4), &stored);

        assert_eq!(form.date.value(), "2024-05-01T09:00:00Z");
        assert_eq!(
            form.submission(),
            Ok(Submission::Update(
                RegistrationId::Number(4),
                Registration::new("A", "B", "2024-05-01T09:00:00Z", Status::Registered)
            ))
        );
    }

    #[test]
    fn test_status_select_cycles() {
        let mut form = FormState::new();
        form.focus = FormField::Status;
        form.handle_edit_key(KeyEvent::new(KeyCode::Right, KeyModifiers::NONE));
        assert_eq!(form.status, Status::Attended);
        form.handle_edit_key(KeyEvent::new(KeyCode::Left, KeyModifiers::NONE));
        form.handle_edit_key(KeyEvent::new(KeyCode::Left, KeyModifiers::NONE));
        assert_eq!(form.status, Status::Cancelled);
        // Typing into the select does nothing
        assert!(!form.handle_edit_key(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE)));
    }

    #[test]
    fn test_focus_wraps() {
        let mut form = FormState::new();
        form.focus_previous();
        assert_eq!(form.focus, FormField::Status);
        form.focus_next();
        assert_eq!(form.focus, FormField::EventName);
    }
}
