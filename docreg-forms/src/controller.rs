//! Form controller

use std::future::Future;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;

use chrono::Local;
use chrono::NaiveDate;
use tokio::sync::watch;

use crate::FormSnapshot;
use crate::address;
use crate::address::AddressFields;
use crate::announce::Announcement;
use crate::announce::announce;
use crate::error::SubmitError;
use crate::error::TransportError;
use crate::registry::ErrorRegistry;
use crate::response::Response;
use crate::submission::SubmissionEvent;
use crate::submission::SubmissionMachine;
use crate::submission::SubmissionState;
use crate::validation::FieldError;
use crate::validation::FieldSpec;
use crate::validation::ValidationResult;

/// Validation and submission state for one form instance.
///
/// The controller owns the field specs, current values, error registry, and
/// submission state. UI bindings call [`set_value`](Self::set_value),
/// [`blur`](Self::blur), and [`submit`](Self::submit) from their event
/// handlers and read everything back through accessors; the controller never
/// renders anything itself.
///
/// Cloning is cheap and clones share the same form (uses `Arc` internally),
/// so an event handler can hold one clone while a submit is in flight on
/// another.
///
/// # Example
///
/// ```
/// use docreg_forms::{FormController, FormSnapshot, Response, SubmissionState};
/// use docreg_forms::validation::FieldSpec;
///
/// # tokio_test_block(async {
/// let form = FormController::new("login");
/// form.register_field(FieldSpec::new("email").required("Email é obrigatório"));
///
/// let state = form
///     .submit(
///         || FormSnapshot::new().with("email", "ana@example.com"),
///         |_payload| async { Ok(Response::new(200, r#"{"token":"t"}"#)) },
///     )
///     .await;
///
/// assert_eq!(state, SubmissionState::Success);
/// # });
/// # fn tokio_test_block<F: std::future::Future>(f: F) {
/// #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f);
/// # }
/// ```
#[derive(Clone)]
pub struct FormController {
    inner: Arc<Mutex<ControllerInner>>,
    state_tx: Arc<watch::Sender<SubmissionState>>,
}

struct ControllerInner {
    name: String,
    fields: Vec<FieldSpec>,
    values: FormSnapshot,
    registry: ErrorRegistry,
    machine: SubmissionMachine,
    generation: u64,
    last_failure: Option<SubmitError>,
    today: Option<NaiveDate>,
}

impl FormController {
    /// Creates an empty form. `name` only appears in log output.
    pub fn new(name: impl Into<String>) -> Self {
        let (state_tx, _) = watch::channel(SubmissionState::Idle);
        Self {
            inner: Arc::new(Mutex::new(ControllerInner {
                name: name.into(),
                fields: Vec::new(),
                values: FormSnapshot::new(),
                registry: ErrorRegistry::new(),
                machine: SubmissionMachine::new(),
                generation: 0,
                last_failure: None,
                today: None,
            })),
            state_tx: Arc::new(state_tx),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ControllerInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // =========================================================================
    // Definition
    // =========================================================================

    /// Registers a field.
    ///
    /// Re-registering an id replaces its spec but keeps its position in
    /// validation order.
    pub fn register_field(&self, spec: FieldSpec) {
        let mut inner = self.lock();
        match inner.fields.iter_mut().find(|f| f.id() == spec.id()) {
            Some(existing) => *existing = spec,
            None => inner.fields.push(spec),
        }
    }

    /// Builder-style [`register_field`](Self::register_field).
    pub fn with_field(self, spec: FieldSpec) -> Self {
        self.register_field(spec);
        self
    }

    /// Removes a field along with its value and any error.
    pub fn unregister_field(&self, field_id: &str) {
        let mut inner = self.lock();
        inner.fields.retain(|f| f.id() != field_id);
        inner.values.remove(field_id);
        inner.registry.clear_error(field_id);
    }

    /// Ids of every registered field, in registration order.
    pub fn field_ids(&self) -> Vec<String> {
        self.lock()
            .fields
            .iter()
            .map(|f| f.id().to_string())
            .collect()
    }

    pub fn label(&self, field_id: &str) -> Option<String> {
        self.lock()
            .field(field_id)
            .map(|f| f.label_text().to_string())
    }

    /// Pins the date used as "today" by date rules.
    pub fn pin_today(&self, today: NaiveDate) {
        self.lock().today = Some(today);
    }

    // =========================================================================
    // Values
    // =========================================================================

    /// Updates a field value.
    ///
    /// If that field, or a field depending on it, currently shows an error, it
    /// is revalidated right away so fixed errors disappear while typing.
    /// Fields without errors are left alone until blur or submit.
    pub fn set_value(&self, field_id: &str, value: impl Into<String>) {
        let mut inner = self.lock();
        inner.values.insert(field_id, value);

        let mut to_check = vec![field_id.to_string()];
        to_check.extend(
            inner
                .fields
                .iter()
                .filter(|f| f.depends_on().contains(field_id))
                .map(|f| f.id().to_string()),
        );

        for id in to_check {
            if inner.registry.has_error(&id) {
                inner.validate_field(&id);
            }
        }
    }

    pub fn value(&self, field_id: &str) -> Option<String> {
        self.lock().values.get(field_id).map(str::to_string)
    }

    /// Copy of the current values.
    pub fn snapshot(&self) -> FormSnapshot {
        self.lock().values.clone()
    }

    /// Fills address fields from a postal-code lookup.
    pub fn apply_address(&self, fields: &AddressFields) {
        let mut inner = self.lock();
        address::apply_address(&mut inner.values, fields);
        for id in [address::STREET, address::NEIGHBORHOOD, address::CITY] {
            if inner.registry.has_error(id) {
                inner.validate_field(id);
            }
        }
    }

    /// Blanks address fields that came from a lookup.
    pub fn clear_address(&self) {
        address::clear_address(&mut self.lock().values);
    }

    // =========================================================================
    // Validation
    // =========================================================================

    /// Runs one field's rules in order and records the outcome in the registry.
    ///
    /// The first failing rule's message wins. An unknown id yields an invalid
    /// result and leaves the registry untouched.
    pub fn validate_field(&self, field_id: &str) -> ValidationResult {
        self.lock().validate_field(field_id)
    }

    /// Validates a field after it loses focus.
    pub fn blur(&self, field_id: &str) -> ValidationResult {
        self.validate_field(field_id)
    }

    /// Revalidates every field in registration order, rebuilding the registry.
    ///
    /// Returns `true` iff no errors remain.
    pub fn validate_all(&self) -> bool {
        self.lock().validate_all()
    }

    // =========================================================================
    // Submission
    // =========================================================================

    /// Validates and sends the form.
    ///
    /// `collect_values` supplies the values to validate and send; it runs
    /// while the controller is unlocked, so it may read from the controller
    /// (e.g. `|| form.snapshot()`). `send` performs the request.
    ///
    /// - While a submit is already in flight the call is a no-op and returns
    ///   the current state; neither `collect_values` nor `send` is called.
    /// - From `Success` the call is also a no-op until [`reset`](Self::reset).
    /// - From `Failed` the previous errors are cleared before validating.
    /// - If any field fails, the state returns to `Idle` with the registry
    ///   populated and `send` is not called.
    /// - A non-2xx response or transport error ends in `Failed(reason)`; see
    ///   [`last_failure`](Self::last_failure) for the typed error.
    /// - If [`reset`](Self::reset) or [`detach`](Self::detach) happens while
    ///   the request is in flight, its result is discarded.
    pub async fn submit<C, S, Fut>(&self, collect_values: C, send: S) -> SubmissionState
    where
        C: FnOnce() -> FormSnapshot,
        S: FnOnce(FormSnapshot) -> Fut,
        Fut: Future<Output = Result<Response, TransportError>>,
    {
        let rejected = self.lock().rejected_submit();
        if let Some(current) = rejected {
            return current;
        }
        let values = collect_values();

        let (generation, payload) = {
            let mut inner = self.lock();
            if let Some(current) = inner.rejected_submit() {
                return current;
            }
            if matches!(inner.machine.state(), SubmissionState::Failed(_)) {
                inner.registry.clear_all();
                inner.last_failure = None;
            }

            inner.transition(SubmissionEvent::Submit, &self.state_tx);
            inner.values = values;

            if !inner.validate_all() {
                if let Some(first) = inner.registry.first() {
                    log::debug!(
                        "[form:{}] validation failed ({} errors), focus {}",
                        inner.name,
                        inner.registry.len(),
                        first.field_id
                    );
                }
                inner.transition(SubmissionEvent::ValidationFailed, &self.state_tx);
                return inner.machine.state().clone();
            }

            inner.transition(SubmissionEvent::ValidationPassed, &self.state_tx);
            (inner.generation, inner.values.clone())
        };

        let outcome = send(payload).await;

        let mut inner = self.lock();
        if inner.generation != generation {
            log::warn!(
                "[form:{}] discarding response for stale submission (generation {} != {})",
                inner.name,
                generation,
                inner.generation
            );
            return inner.machine.state().clone();
        }

        let result = outcome
            .map_err(SubmitError::from)
            .and_then(|response| response.error_for_status().map_err(SubmitError::from));

        let event = match result {
            Ok(response) => {
                log::info!("[form:{}] submitted (HTTP {})", inner.name, response.status);
                SubmissionEvent::Succeeded
            }
            Err(err) => {
                log::info!("[form:{}] submission failed: {}", inner.name, err);
                let reason = err.reason();
                inner.last_failure = Some(err);
                SubmissionEvent::Failed(reason)
            }
        };
        inner.transition(event, &self.state_tx);
        inner.machine.state().clone()
    }

    /// Clears all errors and values and returns to `Idle`.
    ///
    /// Any request still in flight is orphaned: its response will be ignored.
    pub fn reset(&self) {
        let mut inner = self.lock();
        inner.generation += 1;
        inner.registry.clear_all();
        inner.values = FormSnapshot::new();
        inner.last_failure = None;
        inner.transition(SubmissionEvent::Reset, &self.state_tx);
    }

    /// Marks the form as unmounted so an in-flight response is ignored.
    ///
    /// Unlike [`reset`](Self::reset) nothing else changes.
    pub fn detach(&self) {
        let mut inner = self.lock();
        inner.generation += 1;
        log::debug!("[form:{}] detached at generation {}", inner.name, inner.generation);
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn state(&self) -> SubmissionState {
        self.lock().machine.state().clone()
    }

    /// Receiver that observes every state change.
    pub fn subscribe(&self) -> watch::Receiver<SubmissionState> {
        self.state_tx.subscribe()
    }

    /// Active errors in insertion order.
    pub fn errors(&self) -> Vec<FieldError> {
        self.lock().registry.all_errors().to_vec()
    }

    pub fn error(&self, field_id: &str) -> Option<String> {
        self.lock().registry.error(field_id).map(str::to_string)
    }

    pub fn has_error(&self, field_id: &str) -> bool {
        self.lock().registry.has_error(field_id)
    }

    pub fn has_errors(&self) -> bool {
        !self.lock().registry.is_empty()
    }

    /// The field that should receive focus after a failed validation.
    pub fn first_invalid_field(&self) -> Option<String> {
        self.lock().registry.first().map(|e| e.field_id.clone())
    }

    /// Typed cause of the current `Failed` state.
    pub fn last_failure(&self) -> Option<SubmitError> {
        self.lock().last_failure.clone()
    }

    /// Incremented by every [`reset`](Self::reset) and [`detach`](Self::detach).
    pub fn generation(&self) -> u64 {
        self.lock().generation
    }

    /// Live-region message describing the current state.
    pub fn announcement(&self) -> Option<Announcement> {
        let inner = self.lock();
        announce(
            inner.machine.state(),
            inner.registry.all_errors(),
            |id| inner.field(id).map(FieldSpec::label_text),
        )
    }
}

impl ControllerInner {
    fn field(&self, field_id: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.id() == field_id)
    }

    fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    fn validate_field(&mut self, field_id: &str) -> ValidationResult {
        let today = self.today();
        let result = match self.fields.iter().find(|f| f.id() == field_id) {
            Some(spec) => spec.validate_on(&self.values, today),
            None => {
                log::warn!("[form:{}] validate on unknown field {}", self.name, field_id);
                return ValidationResult::invalid(format!("Campo desconhecido: '{field_id}'"));
            }
        };

        match &result.message {
            Some(message) if result.is_invalid() => {
                log::trace!("[form:{}] {}: {}", self.name, field_id, message);
                self.registry.set_error(field_id, message.clone());
            }
            _ => {
                self.registry.clear_error(field_id);
            }
        }
        result
    }

    fn validate_all(&mut self) -> bool {
        self.registry.clear_all();
        let ids: Vec<String> = self.fields.iter().map(|f| f.id().to_string()).collect();
        for id in &ids {
            self.validate_field(id);
        }
        self.registry.is_empty()
    }

    /// The state to hand back when a submit must not start.
    fn rejected_submit(&self) -> Option<SubmissionState> {
        let current = self.machine.state();
        if current.is_busy() {
            log::warn!("[form:{}] submit ignored while {}", self.name, current);
            Some(current.clone())
        } else if *current == SubmissionState::Success {
            log::debug!("[form:{}] submit ignored after success", self.name);
            Some(SubmissionState::Success)
        } else {
            None
        }
    }

    fn transition(&mut self, event: SubmissionEvent, tx: &watch::Sender<SubmissionState>) {
        match self.machine.apply(event) {
            Ok(state) => {
                tx.send_replace(state.clone());
            }
            Err(err) => log::warn!("[form:{}] {}", self.name, err),
        }
    }
}
