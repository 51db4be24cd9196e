//! FieldSpec builder.

use std::collections::BTreeSet;

use chrono::Local;
use chrono::NaiveDate;

use super::Rule;
use super::ValidationResult;
use crate::FormSnapshot;
use crate::error::RuleError;

/// Definition of a single form field: its id, label, and ordered rules.
///
/// Built once when the form is defined. `must_equal` rules register their
/// target in [`depends_on`](Self::depends_on) automatically.
///
/// # Example
///
/// ```
/// use docreg_forms::validation::FieldSpec;
///
/// let confirm = FieldSpec::new("confirm_password")
///     .label("Confirmar senha")
///     .required("Confirmação de senha é obrigatória")
///     .must_equal("password", "Senhas não coincidem");
///
/// assert!(confirm.depends_on().contains("password"));
/// ```
#[derive(Debug, Clone)]
pub struct FieldSpec {
    id: String,
    label: String,
    rules: Vec<Rule>,
    depends_on: BTreeSet<String>,
}

impl FieldSpec {
    /// Creates a field with no rules. The label defaults to the id.
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            label: id.clone(),
            id,
            rules: Vec::new(),
            depends_on: BTreeSet::new(),
        }
    }

    /// Sets the human-readable label used in announcements.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Appends a rule.
    pub fn rule(mut self, rule: Rule) -> Self {
        if let Some(other) = rule.depends_on() {
            self.depends_on.insert(other.to_string());
        }
        self.rules.push(rule);
        self
    }

    pub fn required(self, msg: impl Into<String>) -> Self {
        self.rule(Rule::required(msg))
    }

    pub fn min_length(self, min: usize, msg: impl Into<String>) -> Self {
        self.rule(Rule::min_length(min, msg))
    }

    pub fn max_length(self, max: usize, msg: impl Into<String>) -> Self {
        self.rule(Rule::max_length(max, msg))
    }

    pub fn email(self, msg: impl Into<String>) -> Self {
        self.rule(Rule::email(msg))
    }

    pub fn pattern(self, pattern: &str, msg: impl Into<String>) -> Result<Self, RuleError> {
        Ok(self.rule(Rule::pattern(pattern, msg)?))
    }

    pub fn cpf(self, msg: impl Into<String>) -> Self {
        self.rule(Rule::cpf(msg))
    }

    pub fn cep(self, msg: impl Into<String>) -> Self {
        self.rule(Rule::cep(msg))
    }

    pub fn date_not_in_past(self, msg: impl Into<String>) -> Self {
        self.rule(Rule::date_not_in_past(msg))
    }

    pub fn must_equal(self, other: impl Into<String>, msg: impl Into<String>) -> Self {
        self.rule(Rule::must_equal(other, msg))
    }

    pub fn checked(self, msg: impl Into<String>) -> Self {
        self.rule(Rule::checked(msg))
    }

    pub fn password_strength(self, msg: impl Into<String>) -> Self {
        self.rule(Rule::password_strength(msg))
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn label_text(&self) -> &str {
        &self.label
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn depends_on(&self) -> &BTreeSet<String> {
        &self.depends_on
    }

    /// Runs the rules against this field's value in `snapshot`.
    pub fn validate(&self, snapshot: &FormSnapshot) -> ValidationResult {
        self.validate_on(snapshot, Local::now().date_naive())
    }

    /// Runs the rules in declared order and stops at the first failure.
    ///
    /// A field missing from the snapshot is validated as an empty value.
    pub fn validate_on(&self, snapshot: &FormSnapshot, today: NaiveDate) -> ValidationResult {
        let value = snapshot.get(&self.id).unwrap_or("");
        self.rules
            .iter()
            .map(|rule| rule.validate_on(value, snapshot, today))
            .find(ValidationResult::is_invalid)
            .unwrap_or_else(ValidationResult::ok)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    #[test]
    fn test_first_failing_rule_wins() {
        let field = FieldSpec::new("name")
            .required("Nome é obrigatório")
            .min_length(2, "Nome deve ter pelo menos 2 caracteres");

        let empty = field.validate_on(&FormSnapshot::new(), today());
        assert_eq!(empty.message.as_deref(), Some("Nome é obrigatório"));

        let short = field.validate_on(&FormSnapshot::new().with("name", "A"), today());
        assert_eq!(
            short.message.as_deref(),
            Some("Nome deve ter pelo menos 2 caracteres")
        );

        let ok = field.validate_on(&FormSnapshot::new().with("name", "Ana"), today());
        assert!(ok.is_valid());
    }

    #[test]
    fn test_must_equal_registers_dependency() {
        let field = FieldSpec::new("confirm_password").must_equal("password", "x");
        assert_eq!(
            field.depends_on().iter().collect::<Vec<_>>(),
            vec!["password"]
        );
    }

    #[test]
    fn test_label_defaults_to_id() {
        assert_eq!(FieldSpec::new("cpf").label_text(), "cpf");
        assert_eq!(FieldSpec::new("cpf").label("CPF").label_text(), "CPF");
    }
}
