//! Ready-made registry forms.
//!
//! Each constructor returns a [`FormController`] with the fields and rules of
//! one page: login, user registration, CPF availability check, and employee
//! registration/editing.

use crate::FormController;
use crate::FormSnapshot;
use crate::address;
use crate::validation::FieldSpec;
use crate::validation::Rule;

/// Field id of the synthetic "at least N documents" check.
pub const DOCUMENTS: &str = "documents";

/// Whether the employee form insists on a full address.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AddressPolicy {
    /// Only a well-formed CEP is checked, and only if one is typed.
    #[default]
    Optional,
    /// CEP, street, number, neighborhood, and city are mandatory.
    Required,
}

/// Options for [`employee_form`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmployeeFormOptions {
    /// Number of document rows currently on the page.
    pub documents: usize,
    /// Minimum number of documents required to submit.
    pub min_documents: usize,
    pub address: AddressPolicy,
}

impl EmployeeFormOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn documents(mut self, n: usize) -> Self {
        self.documents = n;
        self
    }

    pub fn min_documents(mut self, n: usize) -> Self {
        self.min_documents = n;
        self
    }

    pub fn address(mut self, policy: AddressPolicy) -> Self {
        self.address = policy;
        self
    }
}

/// Field id for one property of document row `index`, e.g. `documents[0].name`.
pub fn document_field(index: usize, property: &str) -> String {
    format!("{DOCUMENTS}[{index}].{property}")
}

/// Number of document rows present in `snapshot`, counted by their name fields.
pub fn document_count(snapshot: &FormSnapshot) -> usize {
    snapshot
        .iter()
        .filter(|(id, _)| id.starts_with("documents[") && id.ends_with("].name"))
        .count()
}

/// Login page: email and password.
pub fn login_form() -> FormController {
    FormController::new("login")
        .with_field(
            FieldSpec::new("email")
                .label("Email")
                .required("Email é obrigatório")
                .email("Email deve ter um formato válido"),
        )
        .with_field(
            FieldSpec::new("password")
                .label("Senha")
                .required("Senha é obrigatória"),
        )
}

/// User sign-up page.
pub fn user_registration_form() -> FormController {
    FormController::new("user_registration")
        .with_field(
            FieldSpec::new("name")
                .label("Nome")
                .required("Nome é obrigatório")
                .min_length(2, "Nome deve ter pelo menos 2 caracteres"),
        )
        .with_field(
            FieldSpec::new("email")
                .label("Email")
                .required("Email é obrigatório")
                .email("Digite um email válido"),
        )
        .with_field(
            FieldSpec::new("password")
                .label("Senha")
                .required("Senha é obrigatória")
                .password_strength(
                    "Senha muito fraca. Use pelo menos 8 caracteres com maiúsculas, minúsculas, números e símbolos",
                ),
        )
        .with_field(
            FieldSpec::new("confirm_password")
                .label("Confirmar senha")
                .required("Confirmação de senha é obrigatória")
                .must_equal("password", "Senhas não coincidem"),
        )
        .with_field(
            FieldSpec::new("terms")
                .label("Termos de uso")
                .checked("Você deve aceitar os termos de uso"),
        )
}

/// CPF availability check page.
pub fn cpf_check_form() -> FormController {
    FormController::new("cpf_check").with_field(cpf_field())
}

fn cpf_field() -> FieldSpec {
    FieldSpec::new("cpf")
        .label("CPF")
        .required("CPF é obrigatório")
        .cpf("CPF inválido")
}

/// Employee registration and detail pages.
///
/// Adds the employee fields, `options.documents` document rows, the address
/// fields according to `options.address`, and, when `min_documents > 0`, a
/// [`DOCUMENTS`] field that fails while too few rows are filled in.
pub fn employee_form(options: EmployeeFormOptions) -> FormController {
    let form = FormController::new("employee")
        .with_field(cpf_field())
        .with_field(
            FieldSpec::new("employee_name")
                .label("Nome do funcionário")
                .required("Nome do funcionário é obrigatório"),
        )
        .with_field(
            FieldSpec::new("company_name")
                .label("Nome da empresa")
                .required("Nome da empresa é obrigatório"),
        );

    register_address_fields(&form, options.address);

    if options.min_documents > 0 {
        let min = options.min_documents;
        form.register_field(FieldSpec::new(DOCUMENTS).label("Documentos").rule(
            Rule::custom(
                move |_, snapshot| document_count(snapshot) >= min,
                format!("Adicione pelo menos {min} documento(s)"),
            ),
        ));
    }

    for index in 0..options.documents {
        add_document_fields(&form, index);
    }

    form
}

/// Registers the fields for document row `index` on an employee form.
pub fn add_document_fields(form: &FormController, index: usize) {
    let number = index + 1;
    form.register_field(
        FieldSpec::new(document_field(index, "name"))
            .label(format!("Nome do documento {number}"))
            .required("Nome do documento é obrigatório"),
    );
    form.register_field(
        FieldSpec::new(document_field(index, "expiration_date"))
            .label(format!("Data de vencimento {number}"))
            .required("Data de vencimento é obrigatória")
            .date_not_in_past("Data de vencimento não pode ser anterior a hoje"),
    );
}

/// Unregisters the fields for document row `index` and drops the row's
/// values, including a stored document `id`.
pub fn remove_document_fields(form: &FormController, index: usize) {
    for property in ["id", "name", "expiration_date"] {
        form.unregister_field(&document_field(index, property));
    }
}

fn register_address_fields(form: &FormController, policy: AddressPolicy) {
    let zip = FieldSpec::new(address::ZIP_CODE).label("CEP");
    match policy {
        AddressPolicy::Optional => {
            form.register_field(zip.cep("CEP deve ter 8 dígitos"));
        }
        AddressPolicy::Required => {
            form.register_field(
                zip.required("CEP é obrigatório")
                    .cep("CEP deve ter 8 dígitos"),
            );
            for (id, label, message) in [
                (address::STREET, "Logradouro", "Logradouro é obrigatório"),
                (address::NUMBER, "Número", "Número é obrigatório"),
                (address::NEIGHBORHOOD, "Bairro", "Bairro é obrigatório"),
                (address::CITY, "Cidade", "Cidade é obrigatória"),
            ] {
                form.register_field(FieldSpec::new(id).label(label).required(message));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_form_fields() {
        assert_eq!(login_form().field_ids(), vec!["email", "password"]);
    }

    #[test]
    fn test_employee_form_optional_address() {
        let form = employee_form(EmployeeFormOptions::new().documents(1));
        assert_eq!(
            form.field_ids(),
            vec![
                "cpf",
                "employee_name",
                "company_name",
                "zip_code",
                "documents[0].name",
                "documents[0].expiration_date",
            ]
        );
    }

    #[test]
    fn test_employee_form_required_address() {
        let form = employee_form(EmployeeFormOptions::new().address(AddressPolicy::Required));
        let ids = form.field_ids();
        for id in ["zip_code", "street", "number", "neighborhood", "city"] {
            assert!(ids.iter().any(|i| i == id), "missing {id}");
        }
        assert!(!ids.iter().any(|i| i == "complement"));
    }

    #[test]
    fn test_document_count() {
        let snapshot = FormSnapshot::new()
            .with(document_field(0, "name"), "ASO")
            .with(document_field(0, "expiration_date"), "2030-01-01")
            .with(document_field(1, "name"), "NR-35");
        assert_eq!(document_count(&snapshot), 2);
    }

    #[test]
    fn test_min_documents_rule() {
        let form = employee_form(EmployeeFormOptions::new().min_documents(1));
        form.set_value("cpf", "111.444.777-35");
        form.set_value("employee_name", "Ana");
        form.set_value("company_name", "ACME");
        assert!(!form.validate_all());
        assert_eq!(
            form.error(DOCUMENTS).as_deref(),
            Some("Adicione pelo menos 1 documento(s)")
        );

        add_document_fields(&form, 0);
        form.set_value(&document_field(0, "name"), "ASO");
        form.set_value(&document_field(0, "expiration_date"), "2999-12-31");
        assert!(form.validate_all());
    }

    #[test]
    fn test_remove_document_fields() {
        let form = employee_form(EmployeeFormOptions::new().documents(2));
        form.set_value(&document_field(0, "id"), "d1");
        form.set_value(&document_field(0, "name"), "ASO");
        remove_document_fields(&form, 0);
        let ids = form.field_ids();
        assert!(!ids.iter().any(|i| i == "documents[0].name"));
        assert!(ids.iter().any(|i| i == "documents[1].name"));
        assert_eq!(form.value(&document_field(0, "id")), None);
        assert_eq!(document_count(&form.snapshot()), 0);
    }
}
