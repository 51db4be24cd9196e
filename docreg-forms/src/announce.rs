//! Screen-reader announcements

use crate::submission::SubmissionState;
use crate::validation::FieldError;

/// Urgency of an announcement, mapped to `aria-live` by DOM bindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    Polite,
    Assertive,
}

impl Priority {
    pub fn as_aria_live(&self) -> &'static str {
        match self {
            Self::Polite => "polite",
            Self::Assertive => "assertive",
        }
    }
}

/// A message for assistive technology.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Announcement {
    pub message: String,
    pub priority: Priority,
}

impl Announcement {
    pub fn polite(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            priority: Priority::Polite,
        }
    }

    pub fn assertive(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            priority: Priority::Assertive,
        }
    }

    /// Announcement for one field failing validation.
    pub fn field_error(label: &str, message: &str) -> Self {
        Self::assertive(format!("Erro no campo {label}: {message}"))
    }
}

/// Summarizes the form for a live region.
///
/// `label_of` maps a field id to its label. Returns `None` when there is
/// nothing worth announcing.
pub(crate) fn announce<'a>(
    state: &SubmissionState,
    errors: &[FieldError],
    label_of: impl Fn(&str) -> Option<&'a str>,
) -> Option<Announcement> {
    match state {
        SubmissionState::Idle => errors.first().map(|first| {
            let label = label_of(&first.field_id)
                .map(str::to_string)
                .unwrap_or_else(|| first.field_id.clone());
            Announcement::assertive(format!("Formulário contém erros. Corrija o campo {label}"))
        }),
        SubmissionState::Validating => None,
        SubmissionState::Submitting => Some(Announcement::polite("Enviando formulário...")),
        SubmissionState::Success => Some(Announcement::polite("Formulário enviado com sucesso!")),
        SubmissionState::Failed(reason) => Some(Announcement::assertive(format!("Erro: {reason}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_with_errors_names_first_field() {
        let errors = vec![
            FieldError::new("employee_name", "Nome do funcionário é obrigatório"),
            FieldError::new("company_name", "Nome da empresa é obrigatório"),
        ];
        let announcement = announce(&SubmissionState::Idle, &errors, |id| {
            (id == "employee_name").then_some("Nome do funcionário")
        })
        .unwrap();
        assert_eq!(
            announcement.message,
            "Formulário contém erros. Corrija o campo Nome do funcionário"
        );
        assert_eq!(announcement.priority, Priority::Assertive);
    }

    #[test]
    fn test_idle_without_errors_is_silent() {
        assert!(announce(&SubmissionState::Idle, &[], |_| None).is_none());
    }

    #[test]
    fn test_failed_is_assertive() {
        let announcement =
            announce(&SubmissionState::Failed("CPF já cadastrado".into()), &[], |_| None).unwrap();
        assert_eq!(announcement.message, "Erro: CPF já cadastrado");
        assert_eq!(announcement.priority.as_aria_live(), "assertive");
    }

    #[test]
    fn test_field_error() {
        assert_eq!(
            Announcement::field_error("Email", "Email é obrigatório").message,
            "Erro no campo Email: Email é obrigatório"
        );
    }
}
