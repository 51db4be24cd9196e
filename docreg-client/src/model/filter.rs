//! Client-side filtering of the employee listing

use docreg_forms::validation::digits_only;

use super::DocumentStatus;
use super::EmployeeSummary;

/// Search box and status dropdown of the listing page.
///
/// Text matches employee name or company case-insensitively, or the CPF by
/// digits, so `111.444` and `111444` find the same rows. Empty criteria
/// match everything.
///
/// # Example
///
/// ```
/// use docreg_client::model::{DocumentStatus, EmployeeFilter};
///
/// let filter = EmployeeFilter::new().text("acme").status(DocumentStatus::Expired);
/// assert!(!filter.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeeFilter {
    pub text: String,
    pub status: Option<DocumentStatus>,
}

impl EmployeeFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn status(mut self, status: DocumentStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty() && self.status.is_none()
    }

    pub fn matches(&self, employee: &EmployeeSummary) -> bool {
        if self.status.is_some_and(|status| status != employee.status) {
            return false;
        }

        let needle = self.text.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }

        if employee.employee_name.to_lowercase().contains(&needle)
            || employee.company_name.to_lowercase().contains(&needle)
        {
            return true;
        }

        let digits = digits_only(&needle);
        !digits.is_empty() && digits_only(&employee.cpf).contains(&digits)
    }

    /// Rows that match, in their original order.
    pub fn apply<'a>(&self, employees: &'a [EmployeeSummary]) -> Vec<&'a EmployeeSummary> {
        employees.iter().filter(|e| self.matches(e)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn employee(name: &str, company: &str, cpf: &str, status: DocumentStatus) -> EmployeeSummary {
        EmployeeSummary {
            id: name.to_lowercase(),
            employee_name: name.to_string(),
            cpf: cpf.to_string(),
            company_name: company.to_string(),
            status,
        }
    }

    fn rows() -> Vec<EmployeeSummary> {
        vec![
            employee("Ana Souza", "ACME Ltda", "11144477735", DocumentStatus::Valid),
            employee("Bruno Lima", "Obras SA", "529.982.247-25", DocumentStatus::Expired),
            employee("Carla Dias", "Acme Ltda", "39053344705", DocumentStatus::Expiring),
        ]
    }

    fn names(rows: Vec<&EmployeeSummary>) -> Vec<&str> {
        rows.into_iter().map(|e| e.employee_name.as_str()).collect()
    }

    #[test]
    fn test_empty_filter_matches_all() {
        let rows = rows();
        assert_eq!(EmployeeFilter::new().apply(&rows).len(), 3);
    }

    #[test]
    fn test_text_is_case_insensitive() {
        let rows = rows();
        let filter = EmployeeFilter::new().text("ACME");
        assert_eq!(names(filter.apply(&rows)), vec!["Ana Souza", "Carla Dias"]);

        let filter = EmployeeFilter::new().text("bruno");
        assert_eq!(names(filter.apply(&rows)), vec!["Bruno Lima"]);
    }

    #[test]
    fn test_cpf_matches_by_digits() {
        let rows = rows();
        assert_eq!(
            names(EmployeeFilter::new().text("529982").apply(&rows)),
            vec!["Bruno Lima"]
        );
        assert_eq!(
            names(EmployeeFilter::new().text("111.444").apply(&rows)),
            vec!["Ana Souza"]
        );
    }

    #[test]
    fn test_status_and_text_combine() {
        let rows = rows();
        let filter = EmployeeFilter::new()
            .text("acme")
            .status(DocumentStatus::Expiring);
        assert_eq!(names(filter.apply(&rows)), vec!["Carla Dias"]);
    }

    #[test]
    fn test_text_without_match() {
        let rows = rows();
        assert!(EmployeeFilter::new().text("zzz").apply(&rows).is_empty());
    }
}
