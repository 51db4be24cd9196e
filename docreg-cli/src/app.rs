//! Menu loop and pages

use std::future::Future;
use std::io::BufRead;
use std::io::Write;

use docreg_client::ClientConfig;
use docreg_client::FormEndpoint;
use docreg_client::RegistryClient;
use docreg_client::address::AddressLookup;
use docreg_client::address::ViaCepClient;
use docreg_client::auth::MemoryTokenStore;
use docreg_client::auth::TokenStore;
use docreg_client::error::Error as ClientError;
use chrono::Local;
use docreg_client::model::DEFAULT_WARN_DAYS;
use docreg_client::model::DocumentStatus;
use docreg_client::model::EmployeeFilter;
use docreg_forms::FormController;
use docreg_forms::FormSnapshot;
use docreg_forms::Response;
use docreg_forms::SubmissionState;
use docreg_forms::TransportError;
use docreg_forms::address;
use docreg_forms::catalog;
use docreg_forms::catalog::EmployeeFormOptions;
use docreg_forms::validation::digits_only;
use docreg_forms::validation::is_valid_cep;
use docreg_forms::validation::password_strength;

use crate::console::Console;
use crate::error::CliError;
use crate::render;

/// Address fields typed by hand after the CEP lookup.
const ADDRESS_DETAILS: [&str; 5] = [
    address::STREET,
    address::NUMBER,
    address::COMPLEMENT,
    address::NEIGHBORHOOD,
    address::CITY,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Login,
    SignUp,
    List,
    CheckCpf,
    CreateEmployee,
    EditEmployee,
    DeleteEmployee,
    Logout,
    Quit,
}

impl Action {
    fn label(&self) -> &'static str {
        match self {
            Self::Login => "Entrar",
            Self::SignUp => "Criar conta",
            Self::List => "Consultar funcionários",
            Self::CheckCpf => "Verificar CPF",
            Self::CreateEmployee => "Cadastrar funcionário",
            Self::EditEmployee => "Detalhes / editar funcionário",
            Self::DeleteEmployee => "Excluir funcionário",
            Self::Logout => "Sair da conta",
            Self::Quit => "Encerrar",
        }
    }
}

pub struct App<R, W> {
    console: Console<R, W>,
    client: RegistryClient,
    store: MemoryTokenStore,
    viacep: ViaCepClient,
}

impl<R: BufRead, W: Write> App<R, W> {
    pub fn new(console: Console<R, W>, config: &ClientConfig) -> Self {
        let store = MemoryTokenStore::new();
        let client = RegistryClient::from_config(config)
            .token_provider(store.clone())
            .build();
        Self {
            console,
            client,
            store,
            viacep: ViaCepClient::from_config(config),
        }
    }

    pub async fn run(&mut self) -> Result<(), CliError> {
        loop {
            let actions: &[Action] = if self.store.load().is_some() {
                &[
                    Action::List,
                    Action::CheckCpf,
                    Action::CreateEmployee,
                    Action::EditEmployee,
                    Action::DeleteEmployee,
                    Action::Logout,
                    Action::Quit,
                ]
            } else {
                &[Action::Login, Action::SignUp, Action::Quit]
            };
            let labels: Vec<&str> = actions.iter().map(Action::label).collect();

            let Some(index) = self.console.choose("docreg", &labels)? else {
                return Ok(());
            };
            let action = actions[index];
            log::debug!("[cli] {:?}", action);

            match action {
                Action::Login => self.login().await?,
                Action::SignUp => self.sign_up().await?,
                Action::List => self.list().await?,
                Action::CheckCpf => self.check_cpf().await?,
                Action::CreateEmployee => self.create_employee().await?,
                Action::EditEmployee => self.edit_employee().await?,
                Action::DeleteEmployee => self.delete_employee().await?,
                Action::Logout => {
                    self.store.clear();
                    self.console.line("Sessão encerrada.")?;
                }
                Action::Quit => return Ok(()),
            }
        }
    }

    // =========================================================================
    // Pages
    // =========================================================================

    async fn login(&mut self) -> Result<(), CliError> {
        let form = catalog::login_form();
        if !self.fill(&form, &form.field_ids()).await? {
            return Ok(());
        }
        let client = self.client.clone();
        let store = self.store.clone();
        self.submit(&form, || client.login_sender(store.clone())).await?;
        Ok(())
    }

    async fn sign_up(&mut self) -> Result<(), CliError> {
        let form = catalog::user_registration_form();
        if !self.fill(&form, &form.field_ids()).await? {
            return Ok(());
        }
        let client = self.client.clone();
        let state = self
            .submit(&form, || client.sender(FormEndpoint::RegisterUser))
            .await?;
        if state == SubmissionState::Success {
            self.console.line("Conta criada. Faça login para continuar.")?;
        }
        Ok(())
    }

    async fn check_cpf(&mut self) -> Result<(), CliError> {
        let form = catalog::cpf_check_form();
        if !self.fill(&form, &form.field_ids()).await? {
            return Ok(());
        }
        let client = self.client.clone();
        let state = self
            .submit(&form, || client.sender(FormEndpoint::CheckRegistration))
            .await?;
        if state == SubmissionState::Success {
            self.console.line("CPF disponível para cadastro.")?;
        }
        Ok(())
    }

    async fn create_employee(&mut self) -> Result<(), CliError> {
        let Some(documents) = self.ask_count("Quantidade de documentos", 1)? else {
            return Ok(());
        };
        let form = catalog::employee_form(EmployeeFormOptions::new().documents(documents));
        if !self.fill(&form, &form.field_ids()).await? {
            return Ok(());
        }
        let client = self.client.clone();
        self.submit(&form, || client.sender(FormEndpoint::CreateEmployee))
            .await?;
        Ok(())
    }

    async fn list(&mut self) -> Result<(), CliError> {
        let Some(text) = self.console.prompt("Buscar (nome, empresa ou CPF)", None)? else {
            return Ok(());
        };
        let Some(status) = self
            .console
            .prompt("Status (valid, expiring, expired ou vazio)", None)?
        else {
            return Ok(());
        };

        let mut filter = EmployeeFilter::new().text(text);
        if !status.trim().is_empty() {
            match status.parse::<DocumentStatus>() {
                Ok(status) => filter = filter.status(status),
                Err(message) => {
                    self.console.line(message)?;
                    return Ok(());
                }
            }
        }

        match self.client.search_employees(&filter).await {
            Ok(employees) => {
                for line in render::employee_table(&employees) {
                    self.console.line(line)?;
                }
            }
            Err(err) => self.report_client_error(&err)?,
        }
        Ok(())
    }

    async fn edit_employee(&mut self) -> Result<(), CliError> {
        let Some(id) = self.pick_employee().await? else {
            return Ok(());
        };
        let detail = match self.client.get_employee(&id).await {
            Ok(detail) => detail,
            Err(err) => return self.report_client_error(&err),
        };

        let form = catalog::employee_form(
            EmployeeFormOptions::new().documents(detail.documents.len()),
        );
        for (field, value) in detail.to_snapshot().iter() {
            form.set_value(field, value);
        }

        let today = Local::now().date_naive();
        self.console.line(format!(
            "{} ({}) - {}",
            detail.employee_name,
            detail.company_name,
            detail.overall_status(today, DEFAULT_WARN_DAYS).label()
        ))?;
        for doc in &detail.documents {
            self.console.line(format!(
                "  {} vence em {} ({})",
                doc.name,
                doc.expiration_date.format("%d/%m/%Y"),
                doc.status(today, DEFAULT_WARN_DAYS).label()
            ))?;
        }

        if !self.console.confirm("Editar?")? {
            return Ok(());
        }
        if !self.edit_documents(&form)? {
            return Ok(());
        }
        if !self.fill(&form, &form.field_ids()).await? {
            return Ok(());
        }
        let client = self.client.clone();
        self.submit(&form, || client.sender(FormEndpoint::UpdateEmployee(id.clone())))
            .await?;
        Ok(())
    }

    async fn delete_employee(&mut self) -> Result<(), CliError> {
        let Some(id) = self.pick_employee().await? else {
            return Ok(());
        };
        if !self.console.confirm("Confirma a exclusão?")? {
            return Ok(());
        }
        match self.client.delete_employee(&id).await {
            Ok(()) => self.console.line("Funcionário excluído.")?,
            Err(err) => self.report_client_error(&err)?,
        }
        Ok(())
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    /// Prompts for each field in `ids`, validating on blur.
    ///
    /// Returns `false` if input ended before all fields were filled.
    async fn fill(&mut self, form: &FormController, ids: &[String]) -> Result<bool, CliError> {
        for id in ids.iter().filter(|id| id.as_str() != catalog::DOCUMENTS) {
            let label = form.label(id).unwrap_or_else(|| id.clone());

            let value = if id == "terms" {
                let accepted = self.console.confirm(&label)?;
                Some(accepted.to_string())
            } else {
                let current = form.value(id);
                self.console.prompt(&label, current.as_deref())?
            };
            let Some(value) = value else {
                return Ok(false);
            };
            form.set_value(id, value.as_str());

            if id == "password" && form.field_ids().iter().any(|f| f == "confirm_password") {
                self.console.line(render::password(&password_strength(&value)))?;
            }

            if let Some(message) = form.blur(id).message.filter(|_| form.has_error(id)) {
                self.console.line(format!("  ✗ {message}"))?;
            }

            if id == address::ZIP_CODE && !value.trim().is_empty() {
                self.lookup_address(form).await?;
                if !self.fill_address_details(form)? {
                    return Ok(false);
                }
            }
        }
        Ok(true)
    }

    async fn lookup_address(&mut self, form: &FormController) -> Result<(), CliError> {
        let zip = form.value(address::ZIP_CODE).unwrap_or_default();
        if !is_valid_cep(&digits_only(&zip)) {
            return Ok(());
        }
        match self.viacep.lookup(&zip).await {
            Ok(Some(fields)) => {
                form.apply_address(&fields);
                self.console.line(format!(
                    "  Endereço: {}, {} - {}/{}",
                    fields.street, fields.neighborhood, fields.city, fields.state
                ))?;
            }
            Ok(None) => {
                form.clear_address();
                self.console.line("  CEP não encontrado.")?;
            }
            Err(err) => {
                log::warn!("[cli] CEP lookup failed: {}", err);
                self.console
                    .line(format!("  Não foi possível consultar o CEP: {err}"))?;
            }
        }
        Ok(())
    }

    /// Address fields that are not validated but still travel with the form.
    fn fill_address_details(&mut self, form: &FormController) -> Result<bool, CliError> {
        let registered = form.field_ids();
        for id in ADDRESS_DETAILS {
            if registered.iter().any(|f| f == id) {
                continue;
            }
            let label = detail_label(id);
            let current = form.value(id);
            let Some(value) = self.console.prompt(label, current.as_deref())? else {
                return Ok(false);
            };
            form.set_value(id, value);
        }
        Ok(true)
    }

    /// Submits until the form is sent, the user gives up, or input ends.
    ///
    /// Validation errors re-prompt only the invalid fields; a retryable
    /// failure asks before sending again.
    async fn submit<S, Fut>(
        &mut self,
        form: &FormController,
        mut make_send: impl FnMut() -> S,
    ) -> Result<SubmissionState, CliError>
    where
        S: FnOnce(FormSnapshot) -> Fut,
        Fut: Future<Output = Result<Response, TransportError>>,
    {
        loop {
            let state = form.submit(|| form.snapshot(), make_send()).await;
            self.report(form)?;

            match &state {
                SubmissionState::Idle if form.has_errors() => {
                    let invalid: Vec<String> = form
                        .errors()
                        .into_iter()
                        .map(|e| e.field_id)
                        .filter(|id| id != catalog::DOCUMENTS)
                        .collect();
                    if invalid.is_empty() || !self.fill(form, &invalid).await? {
                        return Ok(state);
                    }
                }
                SubmissionState::Failed(_)
                    if form.last_failure().is_some_and(|e| e.is_retryable()) =>
                {
                    if !self.console.confirm("Tentar novamente?")? {
                        return Ok(state);
                    }
                }
                _ => return Ok(state),
            }
        }
    }

    fn report(&mut self, form: &FormController) -> Result<(), CliError> {
        if let Some(announcement) = form.announcement() {
            self.console.line(render::announcement(&announcement))?;
        }
        for line in render::errors(form) {
            self.console.line(line)?;
        }
        log::debug!("[cli] form state: {}", render::state(&form.state()));
        Ok(())
    }

    fn report_client_error(&mut self, err: &ClientError) -> Result<(), CliError> {
        log::warn!("[cli] {}", err);
        if err.status_code() == Some(401) || matches!(err, ClientError::Auth(_)) {
            self.store.clear();
            self.console.line("Sessão expirada. Faça login novamente.")?;
            return Ok(());
        }
        self.console.line(format!("Erro: {}", err.user_message()))?;
        Ok(())
    }

    async fn pick_employee(&mut self) -> Result<Option<String>, CliError> {
        let employees = match self.client.list_employees().await {
            Ok(employees) => employees,
            Err(err) => {
                self.report_client_error(&err)?;
                return Ok(None);
            }
        };
        if employees.is_empty() {
            self.console.line("Nenhum funcionário cadastrado.")?;
            return Ok(None);
        }

        let labels: Vec<String> = employees
            .iter()
            .map(|e| format!("{} - {}", e.employee_name, e.company_name))
            .collect();
        let labels: Vec<&str> = labels.iter().map(String::as_str).collect();
        let choice = self.console.choose("Funcionário", &labels)?;
        Ok(choice.map(|index| employees[index].id.clone()))
    }

    /// Lets the user add or remove document rows before the fields are
    /// edited. Returns `false` if input ended.
    fn edit_documents(&mut self, form: &FormController) -> Result<bool, CliError> {
        loop {
            let rows = document_rows(form);
            let mut labels = vec![
                "Continuar".to_string(),
                "Adicionar documento".to_string(),
            ];
            labels.extend(rows.iter().map(|&index| {
                let name = form
                    .value(&catalog::document_field(index, "name"))
                    .unwrap_or_default();
                format!("Remover documento {} ({name})", index + 1)
            }));
            let labels: Vec<&str> = labels.iter().map(String::as_str).collect();

            match self.console.choose("Documentos", &labels)? {
                None => return Ok(false),
                Some(0) => return Ok(true),
                Some(1) => {
                    let next = rows.last().map_or(0, |last| last + 1);
                    catalog::add_document_fields(form, next);
                    log::debug!("[cli] added document row {}", next);
                }
                Some(choice) => {
                    let index = rows[choice - 2];
                    catalog::remove_document_fields(form, index);
                    log::debug!("[cli] removed document row {}", index);
                }
            }
        }
    }

    fn ask_count(&mut self, label: &str, default: usize) -> Result<Option<usize>, CliError> {
        loop {
            let Some(answer) = self.console.prompt(label, Some(&default.to_string()))? else {
                return Ok(None);
            };
            match answer.trim().parse() {
                Ok(n) => return Ok(Some(n)),
                Err(_) => self.console.line("Digite um número.")?,
            }
        }
    }
}

/// Indices of the document rows registered on `form`, ascending.
fn document_rows(form: &FormController) -> Vec<usize> {
    let mut rows: Vec<usize> = form
        .field_ids()
        .iter()
        .filter_map(|id| id.strip_prefix("documents[")?.strip_suffix("].name")?.parse::<usize>().ok())
        .collect();
    rows.sort_unstable();
    rows
}

fn detail_label(id: &str) -> &'static str {
    match id {
        address::STREET => "Logradouro",
        address::NUMBER => "Número",
        address::COMPLEMENT => "Complemento",
        address::NEIGHBORHOOD => "Bairro",
        _ => "Cidade",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn app(input: &str) -> App<Cursor<Vec<u8>>, Vec<u8>> {
        App::new(
            Console::new(Cursor::new(input.as_bytes().to_vec()), Vec::new()),
            &ClientConfig::default(),
        )
    }

    fn output(app: App<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(app.console.into_output()).unwrap()
    }

    #[tokio::test]
    async fn test_fill_validates_each_field_on_blur() {
        let mut app = app("ana\nsegredo\n");
        let form = catalog::login_form();

        assert!(app.fill(&form, &form.field_ids()).await.unwrap());
        assert_eq!(form.value("password").as_deref(), Some("segredo"));
        assert!(form.has_error("email"));
        assert!(!form.has_error("password"));
        assert!(output(app).contains("  ✗ Email deve ter um formato válido"));
    }

    #[test]
    fn test_edit_documents_adds_and_removes_rows() {
        // Remove the first row, add one, then continue.
        let mut app = app("3\n2\n1\n");
        let form = catalog::employee_form(EmployeeFormOptions::new().documents(2));
        form.set_value("documents[0].id", "d1");
        form.set_value("documents[0].name", "ASO");
        form.set_value("documents[1].name", "NR-35");

        assert!(app.edit_documents(&form).unwrap());
        assert_eq!(document_rows(&form), vec![1, 2]);
        assert_eq!(form.value("documents[0].id"), None);
        assert_eq!(form.value("documents[1].name").as_deref(), Some("NR-35"));
        assert!(output(app).contains("Remover documento 1 (ASO)"));
    }

    #[test]
    fn test_edit_documents_stops_at_end_of_input() {
        let mut app = app("");
        let form = catalog::employee_form(EmployeeFormOptions::new().documents(1));
        assert!(!app.edit_documents(&form).unwrap());
        assert_eq!(document_rows(&form), vec![0]);
    }

    #[tokio::test]
    async fn test_fill_stops_at_end_of_input() {
        let mut app = app("ana@example.com\n");
        let form = catalog::login_form();
        assert!(!app.fill(&form, &form.field_ids()).await.unwrap());
    }

    #[tokio::test]
    async fn test_terms_use_confirmation() {
        let mut app = app("s\n");
        let form = catalog::user_registration_form();
        assert!(app.fill(&form, &["terms".to_string()]).await.unwrap());
        assert_eq!(form.value("terms").as_deref(), Some("true"));
        assert!(!form.has_error("terms"));
    }

    #[tokio::test]
    async fn test_password_meter_on_sign_up() {
        let mut app = app("abc\n");
        let form = catalog::user_registration_form();
        assert!(app.fill(&form, &["password".to_string()]).await.unwrap());
        assert!(output(app).contains("[#    ] fraca"));
    }

    #[tokio::test]
    async fn test_invalid_zip_skips_lookup_but_asks_details() {
        let mut app = app("123\nRua A\n10\n\nCentro\nSantos\n");
        let form = catalog::employee_form(EmployeeFormOptions::new());
        let ids = vec![address::ZIP_CODE.to_string()];

        assert!(app.fill(&form, &ids).await.unwrap());
        assert!(form.has_error(address::ZIP_CODE));
        assert_eq!(form.value(address::STREET).as_deref(), Some("Rua A"));
        assert_eq!(form.value(address::CITY).as_deref(), Some("Santos"));
        assert!(!output(app).contains("Endereço:"));
    }
}
