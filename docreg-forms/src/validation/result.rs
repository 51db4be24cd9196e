/// Outcome of checking a value against one rule or a field's whole rule chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub valid: bool,
    /// Message of the failing rule. Always `None` when `valid` is `true`.
    pub message: Option<String>,
}

impl ValidationResult {
    /// A passing result.
    pub fn ok() -> Self {
        Self {
            valid: true,
            message: None,
        }
    }

    /// A failing result carrying `message`.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            message: Some(message.into()),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn is_invalid(&self) -> bool {
        !self.valid
    }
}

/// An active error for a single field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field_id}: {message}")]
pub struct FieldError {
    /// Field id (from [`FieldSpec::new`](super::FieldSpec::new)).
    pub field_id: String,
    /// Message of the first failing rule.
    pub message: String,
}

impl FieldError {
    pub fn new(field_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field_id: field_id.into(),
            message: message.into(),
        }
    }
}
