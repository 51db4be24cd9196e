//! Field error registry

use crate::validation::FieldError;

/// Active validation errors, at most one per field, in insertion order.
///
/// The order is what screen readers announce and what decides which field
/// gets focus, so it has to be deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorRegistry {
    entries: Vec<FieldError>,
}

impl ErrorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the error for `field_id`, replacing any existing message in place.
    pub fn set_error(&mut self, field_id: &str, message: impl Into<String>) {
        let message = message.into();
        match self.entries.iter_mut().find(|e| e.field_id == field_id) {
            Some(existing) => existing.message = message,
            None => self.entries.push(FieldError::new(field_id, message)),
        }
    }

    /// Removes the error for `field_id`, returning `true` if there was one.
    pub fn clear_error(&mut self, field_id: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.field_id != field_id);
        self.entries.len() != before
    }

    pub fn has_error(&self, field_id: &str) -> bool {
        self.entries.iter().any(|e| e.field_id == field_id)
    }

    pub fn error(&self, field_id: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.field_id == field_id)
            .map(|e| e.message.as_str())
    }

    pub fn all_errors(&self) -> &[FieldError] {
        &self.entries
    }

    /// The earliest-inserted error, i.e. the field that should receive focus.
    pub fn first(&self) -> Option<&FieldError> {
        self.entries.first()
    }

    pub fn clear_all(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
