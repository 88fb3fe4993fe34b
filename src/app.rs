use anyhow::Result;
use ratatui::Frame;
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::mpsc::Receiver;
use std::time::Instant;

use crate::api::{ApiError, Operation, RegistrationApi};
use crate::config::Config;
use crate::form::{FormState, Submission};
use crate::logging::FlashMessage;
use crate::models::{Registration, RegistrationId};
use crate::report::ErrorReporter;
use crate::ui;
use crate::ui::{TableRenderContext, Theme};
use crate::view;
use crate::worker::{ApiOutcome, ApiRequest, Worker};

/// Application mode determines which keybindings are active
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub enum AppMode {
    /// Table has focus, row actions available
    #[default]
    Browse,
    /// Form panel has focus
    Form,
    /// Waiting for the user to confirm deleting a registration
    ConfirmDelete(RegistrationId),
    /// Help overlay (activated with '?')
    Help,
}

/// Main application state
pub struct App {
    /// Current interaction mode
    pub mode: AppMode,

    /// Records from the last successful list, in server order
    pub records: Vec<Registration>,

    /// Create/edit form, mode and fields together
    pub form: FormState,

    /// Currently selected table row
    pub selected_index: usize,

    /// Application configuration
    pub config: Config,

    /// Theme (loaded from config)
    theme: Theme,

    /// Background thread that owns the API client
    worker: Worker,

    /// Where failed requests go
    reporter: Box<dyn ErrorReporter>,

    /// Collection endpoint shown in the header
    endpoint: String,

    /// List requests not yet answered
    pending_lists: usize,

    /// Error message shown in modal, dismissible with any key
    pub error_modal: Option<String>,

    /// Flag to request application exit
    pub should_quit: bool,

    /// Flash messages displayed above the keyboard hints
    pub flash_messages: Vec<FlashMessage>,

    /// Receiver for flash messages from logger
    flash_rx: Option<Receiver<FlashMessage>>,
}

impl App {
    /// Create the app and request the initial list
    pub fn new(
        api: Box<dyn RegistrationApi>,
        config: Config,
        reporter: Box<dyn ErrorReporter>,
        flash_rx: Option<Receiver<FlashMessage>>,
    ) -> Self {
        let (theme, error_modal) = match Theme::load(&config.general.theme) {
            Ok(t) => (t, None),
            Err(e) => {
                log::error!("Failed to load theme '{}': {}", config.general.theme, e);
                (Theme::default(), Some(e.to_string()))
            }
        };

        let endpoint = api.endpoint();
        let worker = Worker::spawn(api);

        let mut app = App {
            mode: AppMode::default(),
            records: Vec::new(),
            form: FormState::new(),
            selected_index: 0,
            config,
            theme,
            worker,
            reporter,
            endpoint,
            pending_lists: 0,
            error_modal,
            should_quit: false,
            flash_messages: Vec::new(),
            flash_rx,
        };

        app.refresh();
        app
    }

    /// Request a full re-fetch of the collection
    pub fn refresh(&mut self) {
        self.pending_lists += 1;
        self.worker.submit(ApiRequest::ListAll);
    }

    /// Whether a list request is still outstanding
    pub fn is_loading(&self) -> bool {
        self.pending_lists > 0
    }

    /// Apply every outcome the worker has finished, without blocking
    pub fn poll_responses(&mut self) {
        while let Some(outcome) = self.worker.try_next() {
            self.apply_outcome(outcome);
        }
    }

    /// Block until no requests are in flight, applying outcomes as they
    /// arrive (including the re-fetches they trigger)
    pub fn settle(&mut self) {
        while let Some(outcome) = self.worker.next_blocking() {
            self.apply_outcome(outcome);
        }
    }

    fn apply_outcome(&mut self, outcome: ApiOutcome) {
        match outcome {
            ApiOutcome::Listed(result) => {
                self.pending_lists = self.pending_lists.saturating_sub(1);
                match result {
                    Ok(records) => {
                        log::debug!("Loaded {} registrations", records.len());
                        self.records = records;
                        self.clamp_selection();
                    }
                    Err(e) => self.report_failure(Operation::List, &e),
                }
            }
            ApiOutcome::Fetched(id, result) => match result {
                Ok(record) => {
                    log::debug!("Editing registration {}", id);
                    self.form.begin_edit(id, &record);
                    self.mode = AppMode::Form;
                }
                Err(e) => self.report_failure(Operation::Get, &e),
            },
            ApiOutcome::Created(result) => match result {
                Ok(()) => {
                    log::info!("Registration created");
                    self.form.reset();
                    self.refresh();
                }
                Err(e) => self.report_failure(Operation::Create, &e),
            },
            ApiOutcome::Updated(id, result) => match result {
                Ok(()) => {
                    log::info!("Registration {} updated", id);
                    self.form.reset();
                    self.refresh();
                }
                Err(e) => self.report_failure(Operation::Update, &e),
            },
            ApiOutcome::Deleted(id, result) => match result {
                Ok(()) => {
                    log::info!("Registration {} deleted", id);
                    self.refresh();
                }
                Err(e) => self.report_failure(Operation::Delete, &e),
            },
        }
    }

    fn report_failure(&mut self, operation: Operation, error: &ApiError) {
        if let Some(message) = self.reporter.report(operation, error) {
            self.error_modal = Some(message);
        }
    }

    fn clamp_selection(&mut self) {
        if self.records.is_empty() {
            self.selected_index = 0;
        } else if self.selected_index >= self.records.len() {
            self.selected_index = self.records.len() - 1;
        }
    }

    /// Registration on the selected table row
    pub fn selected_registration(&self) -> Option<&Registration> {
        self.records.get(self.selected_index)
    }

    fn selected_id(&self) -> Option<RegistrationId> {
        let record = self.selected_registration()?;
        if record.id.is_none() {
            log::warn!("Selected registration '{}' has no id", record.event_name);
        }
        record.id.clone()
    }

    /// Fetch the selected registration; the form switches to edit once it arrives
    pub fn edit_selected(&mut self) {
        if let Some(id) = self.selected_id() {
            self.worker.submit(ApiRequest::GetOne(id));
        }
    }

    /// Ask for confirmation before deleting the selected registration
    pub fn request_delete_selected(&mut self) {
        if let Some(id) = self.selected_id() {
            self.mode = AppMode::ConfirmDelete(id);
        }
    }

    /// Delete the registration awaiting confirmation
    pub fn confirm_delete(&mut self) {
        if let AppMode::ConfirmDelete(id) = std::mem::take(&mut self.mode) {
            self.worker.submit(ApiRequest::Delete(id));
        }
    }

    /// Decline the pending delete, leaving everything as it was
    pub fn cancel_confirm(&mut self) {
        self.mode = AppMode::Browse;
    }

    /// Validate the form and send a create or update
    /// An invalid form keeps its fields and shows the error inline
    pub fn submit_form(&mut self) {
        match self.form.submission() {
            Ok(Submission::Create(record)) => {
                self.worker.submit(ApiRequest::Create(record));
            }
            Ok(Submission::Update(id, record)) => {
                self.worker.submit(ApiRequest::Update(id, record));
            }
            Err(e) => {
                log::debug!("Form rejected: {}", e);
                self.form.error = Some(e);
            }
        }
    }

    /// Leave edit mode without saving
    pub fn cancel_edit(&mut self) {
        if self.form.is_editing() {
            log::debug!("Edit cancelled");
        }
        self.form.reset();
    }

    /// Poll flash message receiver and add to queue
    pub fn poll_flash_messages(&mut self) {
        if let Some(rx) = &self.flash_rx {
            while let Ok(msg) = rx.try_recv() {
                self.flash_messages.push(msg);
            }
        }
    }

    /// Remove expired flash messages (based on config duration)
    pub fn prune_flash_messages(&mut self) {
        if self.flash_messages.is_empty() {
            return;
        }

        let now = Instant::now();
        let duration_ms = self.config.general.flash_message_duration_ms;
        self.flash_messages
            .retain(|msg| now.duration_since(msg.timestamp).as_millis() < duration_ms as u128);
    }

    /// Clear all flash messages
    pub fn clear_flash_messages(&mut self) {
        self.flash_messages.clear();
    }

    pub fn move_up(&mut self, n: usize) {
        self.selected_index = self.selected_index.saturating_sub(n);
    }

    pub fn move_down(&mut self, n: usize) {
        if !self.records.is_empty() {
            self.selected_index = (self.selected_index + n).min(self.records.len() - 1);
        }
    }

    pub fn jump_to_top(&mut self) {
        self.selected_index = 0;
    }

    pub fn jump_to_bottom(&mut self) {
        self.selected_index = self.records.len().saturating_sub(1);
    }

    /// Toggle help overlay
    pub fn toggle_help(&mut self) {
        self.mode = match self.mode {
            AppMode::Help => AppMode::Browse,
            _ => AppMode::Help,
        };
    }

    /// Request application exit
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Handle keyboard event based on current mode
    pub fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        // Any key dismisses the error modal
        if self.error_modal.is_some() {
            self.error_modal = None;
            return Ok(());
        }

        match self.mode {
            AppMode::Browse => self.handle_browse_key(key),
            AppMode::Form => self.handle_form_key(key),
            AppMode::ConfirmDelete(_) => self.handle_confirm_key(key),
            AppMode::Help => self.handle_help_key(key),
        }
        Ok(())
    }

    fn handle_browse_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.move_down(1),
            KeyCode::Char('k') | KeyCode::Up => self.move_up(1),
            KeyCode::Home => self.jump_to_top(),
            KeyCode::End => self.jump_to_bottom(),
            KeyCode::Char('e') | KeyCode::Enter => self.edit_selected(),
            KeyCode::Char('d') => self.request_delete_selected(),
            KeyCode::Char('n') | KeyCode::Char('a') | KeyCode::Tab => {
                self.mode = AppMode::Form;
            }
            KeyCode::Char('r') => self.refresh(),
            KeyCode::Char('c') => self.clear_flash_messages(),
            KeyCode::Char('?') => self.toggle_help(),
            KeyCode::Char('q') | KeyCode::Esc => self.quit(),
            _ => {}
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => self.mode = AppMode::Browse,
            KeyCode::Enter => self.submit_form(),
            KeyCode::Char('s') if ctrl => self.submit_form(),
            KeyCode::Char('x') if ctrl => self.cancel_edit(),
            KeyCode::Tab | KeyCode::Down => self.form.focus_next(),
            KeyCode::BackTab | KeyCode::Up => self.form.focus_previous(),
            _ => {
                self.form.handle_edit_key(key);
            }
        }
    }

    fn handle_confirm_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => self.confirm_delete(),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => self.cancel_confirm(),
            _ => {}
        }
    }

    fn handle_help_key(&mut self, _key: KeyEvent) {
        self.mode = AppMode::Browse;
    }

    /// Render the TUI
    pub fn draw(&self, frame: &mut Frame) {
        let size = frame.area();

        // Set themed background for entire frame
        frame.render_widget(
            ratatui::widgets::Block::default().style(
                ratatui::prelude::Style::default()
                    .bg(self.theme.default_bg)
                    .fg(self.theme.default_fg),
            ),
            size,
        );

        let rows = view::table_rows(&self.records);
        let cards = view::gallery_cards(&self.records);

        // Gallery height depends on the column count, which depends on the
        // width left over by the form panel
        let provisional = ui::create_main_layout(size, 0);
        let layout = ui::create_main_layout(size, ui::gallery_height(cards.len(), provisional.table.width));

        ui::render_header(frame, layout.header, &self.endpoint, &self.theme);
        ui::render_form(
            frame,
            layout.form,
            &self.form,
            self.mode == AppMode::Form,
            &self.theme,
        );
        ui::render_registration_table(
            frame,
            layout.table,
            &rows,
            TableRenderContext {
                selected: self.selected_index,
                focused: self.mode == AppMode::Browse,
                loading: self.is_loading(),
                theme: &self.theme,
            },
        );
        ui::render_gallery(frame, layout.gallery, &cards, &self.theme);
        ui::render_flash_line(frame, layout.flash, &self.flash_messages, &self.theme);
        ui::render_keyboard_hints(frame, layout.hints, &self.mode, &self.theme);

        match &self.mode {
            AppMode::Help => ui::render_help_overlay(frame, size, &self.theme),
            AppMode::ConfirmDelete(id) => {
                let event_name = self
                    .records
                    .iter()
                    .find(|r| r.id.as_ref() == Some(id))
                    .map(|r| r.event_name.as_str())
                    .unwrap_or_default();
                ui::render_confirm_overlay(frame, size, event_name, &self.theme);
            }
            _ => {}
        }

        // Error modal takes precedence over other overlays
        if let Some(ref error_msg) = self.error_modal {
            ui::render_error_modal(frame, size, error_msg, &self.theme);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::memory::Call;
    use crate::api::{FailureKind, InMemoryApi};
    use crate::form::FormMode;
    use crate::models::Status;
    use crate::report::SurfaceReporter;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use std::sync::{Arc, Mutex};

    type Failures = Arc<Mutex<Vec<(Operation, FailureKind)>>>;

    struct RecordingReporter {
        failures: Failures,
    }

    impl ErrorReporter for RecordingReporter {
        fn report(&self, operation: Operation, error: &ApiError) -> Option<String> {
            self.failures
                .lock()
                .unwrap()
                .push((operation, error.kind()));
            None
        }
    }

    fn sample_records() -> Vec<Registration> {
        vec![
            Registration::new("RustConf", "Conference", "2024-09-10", Status::Registered)
                .with_id(3u64),
            Registration::new("Meetup", "Social", "2024-02-01", Status::Attended).with_id(5u64),
            Registration::new("Workshop Day", "Workshop", "2024-06-15", Status::Cancelled)
                .with_id(7u64),
        ]
    }

    fn app_with(records: Vec<Registration>) -> (App, InMemoryApi, Failures) {
        let api = InMemoryApi::with_records(records);
        let failures = Failures::default();
        let reporter = RecordingReporter {
            failures: failures.clone(),
        };
        let mut app = App::new(
            Box::new(api.clone()),
            Config::default(),
            Box::new(reporter),
            None,
        );
        app.settle();
        (app, api, failures)
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
            .unwrap();
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn fill_demo(app: &mut App) {
        press(app, KeyCode::Char('n'));
        type_text(app, "Demo");
        press(app, KeyCode::Tab);
        type_text(app, "Workshop");
        press(app, KeyCode::Tab);
        type_text(app, "2024-05-01");
    }

    fn select_id(app: &mut App, id: u64) {
        let wanted = RegistrationId::Number(id);
        app.selected_index = app
            .records
            .iter()
            .position(|r| r.id.as_ref() == Some(&wanted))
            .unwrap();
    }

    #[test]
    fn test_initial_list_is_loaded() {
        let (app, api, _) = app_with(sample_records());

        assert_eq!(app.records, sample_records());
        assert!(!app.is_loading());
        assert_eq!(api.calls(), vec![Call::List]);
    }

    #[test]
    fn test_create_then_list_shows_new_entry() {
        let (mut app, api, failures) = app_with(Vec::new());

        fill_demo(&mut app);
        press(&mut app, KeyCode::Enter);
        app.settle();

        assert_eq!(app.records.len(), 1);
        let created = &app.records[0];
        assert!(created.id.is_some());
        assert_eq!(created.event_name, "Demo");
        assert_eq!(created.category, "Workshop");
        assert_eq!(created.date, "2024-05-01");
        assert_eq!(created.status, Status::Registered);

        // Form went back to an empty create form
        assert_eq!(app.form.mode(), &FormMode::Create);
        assert_eq!(app.form.event_name.value(), "");

        let calls = api.calls();
        assert_eq!(calls.len(), 3);
        assert!(matches!(calls[1], Call::Create(ref r) if r.id.is_none()));
        assert_eq!(calls[2], Call::List);
        assert!(failures.lock().unwrap().is_empty());
    }

    #[test]
    fn test_edit_prefills_and_submits_update() {
        let (mut app, api, _) = app_with(sample_records());
        select_id(&mut app, 7);

        press(&mut app, KeyCode::Char('e'));
        app.settle();

        assert_eq!(app.mode, AppMode::Form);
        assert_eq!(app.form.mode(), &FormMode::Edit(RegistrationId::Number(7)));
        assert_eq!(app.form.title(), "Update Registration");
        assert_eq!(app.form.event_name.value(), "Workshop Day");
        assert_eq!(app.form.category.value(), "Workshop");
        assert_eq!(app.form.date.value(), "2024-06-15");
        assert_eq!(app.form.status, Status::Cancelled);

        press(&mut app, KeyCode::Enter);
        app.settle();

        let calls = api.calls();
        assert!(calls.contains(&Call::Update(
            RegistrationId::Number(7),
            Registration::new("Workshop Day", "Workshop", "2024-06-15", Status::Cancelled),
        )));
        assert!(!calls.iter().any(|c| matches!(c, Call::Create(_))));
        assert_eq!(app.form.mode(), &FormMode::Create);
        assert_eq!(app.records.len(), 3);
    }

    #[test]
    fn test_cancel_edit_returns_to_create() {
        let (mut app, api, _) = app_with(sample_records());
        select_id(&mut app, 5);
        press(&mut app, KeyCode::Enter);
        app.settle();
        assert!(app.form.is_editing());

        app.handle_key(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::CONTROL))
            .unwrap();

        assert_eq!(app.form.mode(), &FormMode::Create);
        assert_eq!(app.form.event_name.value(), "");
        assert!(!api.calls().iter().any(|c| matches!(c, Call::Update(..))));
    }

    #[test]
    fn test_delete_declined_leaves_collection() {
        let (mut app, api, _) = app_with(sample_records());
        select_id(&mut app, 3);

        press(&mut app, KeyCode::Char('d'));
        assert_eq!(app.mode, AppMode::ConfirmDelete(RegistrationId::Number(3)));

        press(&mut app, KeyCode::Char('n'));
        app.settle();

        assert_eq!(app.mode, AppMode::Browse);
        assert_eq!(api.records(), sample_records());
        assert_eq!(app.records, sample_records());
        assert_eq!(api.calls(), vec![Call::List]);
    }

    #[test]
    fn test_delete_accepted_removes_from_next_list() {
        let (mut app, api, _) = app_with(sample_records());
        select_id(&mut app, 3);

        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('y'));
        app.settle();

        assert_eq!(app.mode, AppMode::Browse);
        assert_eq!(app.records.len(), 2);
        assert!(
            !app.records
                .iter()
                .any(|r| r.id == Some(RegistrationId::Number(3)))
        );
        assert_eq!(
            api.calls(),
            vec![
                Call::List,
                Call::Delete(RegistrationId::Number(3)),
                Call::List
            ]
        );
    }

    #[test]
    fn test_failed_create_keeps_form_and_table() {
        let (mut app, api, failures) = app_with(sample_records());
        api.fail_next(Operation::Create);

        fill_demo(&mut app);
        press(&mut app, KeyCode::Enter);
        app.settle();

        assert_eq!(app.form.event_name.value(), "Demo");
        assert_eq!(app.form.category.value(), "Workshop");
        assert_eq!(app.form.date.value(), "2024-05-01");
        assert_eq!(app.records, sample_records());
        assert_eq!(
            *failures.lock().unwrap(),
            vec![(Operation::Create, FailureKind::Transport)]
        );
        // No re-fetch after a failure
        let calls = api.calls();
        assert_eq!(calls.len(), 2);
        assert!(matches!(calls[1], Call::Create(_)));
        assert!(app.error_modal.is_none());
    }

    #[test]
    fn test_invalid_form_sends_nothing() {
        let (mut app, api, _) = app_with(Vec::new());

        press(&mut app, KeyCode::Char('n'));
        type_text(&mut app, "Demo");
        press(&mut app, KeyCode::Enter);
        app.settle();

        assert!(app.form.error.is_some());
        assert_eq!(api.calls(), vec![Call::List]);
    }

    #[test]
    fn test_surface_policy_shows_modal() {
        let api = InMemoryApi::with_records(sample_records());
        api.fail_next(Operation::List);
        let mut app = App::new(
            Box::new(api.clone()),
            Config::default(),
            Box::new(SurfaceReporter),
            None,
        );
        app.settle();

        let message = app.error_modal.clone().unwrap();
        assert!(message.starts_with("Error fetching registrations"));
        assert!(app.records.is_empty());

        // Any key dismisses the modal without acting on it
        press(&mut app, KeyCode::Char('q'));
        assert!(app.error_modal.is_none());
        assert!(!app.should_quit);
    }

    #[test]
    fn test_failed_get_stays_in_create_mode() {
        let (mut app, api, failures) = app_with(sample_records());
        api.fail_next(Operation::Get);

        press(&mut app, KeyCode::Char('e'));
        app.settle();

        assert_eq!(app.form.mode(), &FormMode::Create);
        assert_eq!(app.mode, AppMode::Browse);
        assert_eq!(
            *failures.lock().unwrap(),
            vec![(Operation::Get, FailureKind::Transport)]
        );
    }

    #[test]
    fn test_navigation_is_clamped() {
        let (mut app, _, _) = app_with(sample_records());

        press(&mut app, KeyCode::Char('k'));
        assert_eq!(app.selected_index, 0);
        press(&mut app, KeyCode::End);
        assert_eq!(app.selected_index, 2);
        press(&mut app, KeyCode::Char('j'));
        assert_eq!(app.selected_index, 2);
        press(&mut app, KeyCode::Home);
        assert_eq!(app.selected_index, 0);
    }

    #[test]
    fn test_selection_clamped_after_shorter_list() {
        let (mut app, api, _) = app_with(sample_records());
        app.selected_index = 2;

        // Remove directly on the server, then refresh
        api.delete(&RegistrationId::Number(7)).unwrap();
        press(&mut app, KeyCode::Char('r'));
        app.settle();

        assert_eq!(app.records.len(), 2);
        assert_eq!(app.selected_index, 1);
    }

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_draw_renders_form_table_and_gallery() {
        let (mut app, _, _) = app_with(sample_records());
        let mut terminal = Terminal::new(TestBackend::new(140, 50)).unwrap();

        terminal.draw(|frame| app.draw(frame)).unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("Add New Registration"));
        assert!(text.contains("RustConf"));
        assert!(text.contains("Sep 10, 2024"));

        press(&mut app, KeyCode::Char('d'));
        terminal.draw(|frame| app.draw(frame)).unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("Are you sure you want to delete this registration?"));
    }
}
