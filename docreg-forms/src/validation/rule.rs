//! Field rules.

use std::fmt;
use std::sync::Arc;

use chrono::Local;
use chrono::NaiveDate;
use regex::Regex;

use super::ValidationResult;
use super::cep::is_valid_cep;
use super::cpf::validate_cpf;
use super::password::StrengthLevel;
use super::password::password_strength;
use crate::FormSnapshot;
use crate::error::RuleError;

/// Type alias for caller-supplied rule predicates.
type Predicate = Arc<dyn Fn(&str, &FormSnapshot) -> bool + Send + Sync>;

/// What a [`Rule`] checks.
#[derive(Clone)]
pub enum RuleKind {
    /// Non-blank after trimming.
    Required,
    /// At least this many characters after trimming.
    MinLength(usize),
    /// At most this many characters after trimming.
    MaxLength(usize),
    Email,
    Pattern(Regex),
    /// CPF check digits (see [`validate_cpf`]).
    Cpf,
    /// 8-digit CEP.
    Cep,
    /// A calendar date that is today or later.
    DateNotInPast,
    /// Same value as another field in the snapshot.
    MustEqual(String),
    /// Checkbox-style value (`true`, `on`, `1`, `yes`).
    Checked,
    /// Anything but a weak password.
    PasswordStrength,
    Custom(Predicate),
}

impl fmt::Debug for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required => write!(f, "Required"),
            Self::MinLength(n) => write!(f, "MinLength({n})"),
            Self::MaxLength(n) => write!(f, "MaxLength({n})"),
            Self::Email => write!(f, "Email"),
            Self::Pattern(re) => write!(f, "Pattern({})", re.as_str()),
            Self::Cpf => write!(f, "Cpf"),
            Self::Cep => write!(f, "Cep"),
            Self::DateNotInPast => write!(f, "DateNotInPast"),
            Self::MustEqual(other) => write!(f, "MustEqual({other})"),
            Self::Checked => write!(f, "Checked"),
            Self::PasswordStrength => write!(f, "PasswordStrength"),
            Self::Custom(_) => write!(f, "Custom"),
        }
    }
}

/// A single check on a field value, paired with the message shown when it fails.
///
/// Rules are total: they never panic, and an unmet precondition (comparing
/// against a field that is not in the snapshot, an unparseable date) yields
/// an invalid result with a descriptive message.
///
/// Every format rule accepts a blank value; pair it with
/// [`Rule::required`] to reject empty input.
///
/// # Example
///
/// ```
/// use docreg_forms::FormSnapshot;
/// use docreg_forms::validation::Rule;
///
/// let rule = Rule::cpf("CPF inválido");
/// let snapshot = FormSnapshot::new();
///
/// assert!(rule.validate("111.444.777-35", &snapshot).is_valid());
/// assert_eq!(
///     rule.validate("111.444.777-36", &snapshot).message.as_deref(),
///     Some("CPF inválido")
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Rule {
    kind: RuleKind,
    message: String,
}

impl Rule {
    pub fn new(kind: RuleKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn required(message: impl Into<String>) -> Self {
        Self::new(RuleKind::Required, message)
    }

    pub fn min_length(min: usize, message: impl Into<String>) -> Self {
        Self::new(RuleKind::MinLength(min), message)
    }

    pub fn max_length(max: usize, message: impl Into<String>) -> Self {
        Self::new(RuleKind::MaxLength(max), message)
    }

    pub fn email(message: impl Into<String>) -> Self {
        Self::new(RuleKind::Email, message)
    }

    /// Requires the value to match `pattern`.
    pub fn pattern(pattern: &str, message: impl Into<String>) -> Result<Self, RuleError> {
        let re = Regex::new(pattern).map_err(|source| RuleError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self::new(RuleKind::Pattern(re), message))
    }

    pub fn cpf(message: impl Into<String>) -> Self {
        Self::new(RuleKind::Cpf, message)
    }

    pub fn cep(message: impl Into<String>) -> Self {
        Self::new(RuleKind::Cep, message)
    }

    pub fn date_not_in_past(message: impl Into<String>) -> Self {
        Self::new(RuleKind::DateNotInPast, message)
    }

    pub fn must_equal(other: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(RuleKind::MustEqual(other.into()), message)
    }

    pub fn checked(message: impl Into<String>) -> Self {
        Self::new(RuleKind::Checked, message)
    }

    pub fn password_strength(message: impl Into<String>) -> Self {
        Self::new(RuleKind::PasswordStrength, message)
    }

    /// Wraps a caller-supplied predicate.
    pub fn custom<F>(predicate: F, message: impl Into<String>) -> Self
    where
        F: Fn(&str, &FormSnapshot) -> bool + Send + Sync + 'static,
    {
        Self::new(RuleKind::Custom(Arc::new(predicate)), message)
    }

    pub fn kind(&self) -> &RuleKind {
        &self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// The other field this rule reads, if it is a cross-field rule.
    pub fn depends_on(&self) -> Option<&str> {
        match &self.kind {
            RuleKind::MustEqual(other) => Some(other),
            _ => None,
        }
    }

    /// Checks `value` using the local calendar date as "today".
    pub fn validate(&self, value: &str, snapshot: &FormSnapshot) -> ValidationResult {
        self.validate_on(value, snapshot, Local::now().date_naive())
    }

    /// Checks `value` with an explicit "today" for date rules.
    pub fn validate_on(
        &self,
        value: &str,
        snapshot: &FormSnapshot,
        today: NaiveDate,
    ) -> ValidationResult {
        let trimmed = value.trim();
        let blank = trimmed.is_empty();

        let passed = match &self.kind {
            RuleKind::Required => !blank,
            RuleKind::MinLength(min) => blank || trimmed.chars().count() >= *min,
            RuleKind::MaxLength(max) => trimmed.chars().count() <= *max,
            RuleKind::Email => blank || email_address::EmailAddress::is_valid(trimmed),
            RuleKind::Pattern(re) => blank || re.is_match(value),
            RuleKind::Cpf => blank || validate_cpf(trimmed),
            RuleKind::Cep => blank || is_valid_cep(trimmed),
            RuleKind::DateNotInPast => {
                if blank {
                    true
                } else {
                    match parse_date(trimmed) {
                        Some(date) => date >= today,
                        None => {
                            return ValidationResult::invalid(format!(
                                "Data inválida: '{trimmed}'"
                            ));
                        }
                    }
                }
            }
            RuleKind::MustEqual(other) => match snapshot.get(other) {
                Some(expected) => value == expected,
                None => {
                    return ValidationResult::invalid(format!(
                        "Campo '{other}' ausente; não é possível comparar"
                    ));
                }
            },
            RuleKind::Checked => is_checked(trimmed),
            RuleKind::PasswordStrength => {
                blank || password_strength(value).level != StrengthLevel::Weak
            }
            RuleKind::Custom(predicate) => predicate(value, snapshot),
        };

        if passed {
            ValidationResult::ok()
        } else {
            ValidationResult::invalid(self.message.clone())
        }
    }
}

/// Parses `YYYY-MM-DD` (HTML date inputs) or `DD/MM/YYYY`.
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    let input = input.trim();
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(input, "%d/%m/%Y"))
        .ok()
}

fn is_checked(value: &str) -> bool {
    matches!(
        value.to_ascii_lowercase().as_str(),
        "true" | "on" | "1" | "yes"
    )
}
