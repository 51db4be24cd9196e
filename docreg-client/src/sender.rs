//! Adapter from RegistryClient to the form controller's `send`

use docreg_forms::FormSnapshot;
use docreg_forms::Response;
use docreg_forms::TransportError;
use docreg_forms::validation::digits_only;
use futures::future::BoxFuture;
use reqwest::Method;

use crate::RegistryClient;
use crate::auth::AccessToken;
use crate::auth::TokenStore;
use crate::client::to_json;
use crate::error::ApiError;
use crate::error::AuthError;
use crate::error::Error;
use crate::model::Credentials;
use crate::model::EmployeePayload;
use crate::model::LoginResponse;
use crate::model::NewUser;

/// Message used when an authenticated form is sent without a usable token.
const SESSION_EXPIRED: &str = "Sessão expirada. Faça login novamente.";

/// Which backend call a form submits to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEndpoint {
    /// `POST /auth/login` with the login form.
    Login,
    /// `POST /auth/register` with the user registration form.
    RegisterUser,
    /// `GET /employee/check_register/{cpf}` with the CPF check form.
    CheckRegistration,
    /// `POST /employee/register_employee` with the employee form.
    CreateEmployee,
    /// `PUT /employee/{id}` with the employee form.
    UpdateEmployee(String),
}

impl RegistryClient {
    /// Sends form values to `endpoint` and hands back the raw response.
    ///
    /// Any HTTP status is a successful send; the controller decides what
    /// non-2xx means. Only failures to get a response at all become
    /// [`TransportError`]s. A missing or expired token is reported as a 401
    /// response, the same answer the backend gives an unauthenticated call.
    pub async fn submit_form(
        &self,
        endpoint: &FormEndpoint,
        values: FormSnapshot,
    ) -> Result<Response, TransportError> {
        let result = match endpoint {
            FormEndpoint::Login => {
                self.send_json(&["auth", "login"], Method::POST, &Credentials::from_snapshot(&values), false)
                    .await
            }
            FormEndpoint::RegisterUser => {
                self.send_json(&["auth", "register"], Method::POST, &NewUser::from_snapshot(&values), false)
                    .await
            }
            FormEndpoint::CheckRegistration => {
                let cpf = digits_only(values.trimmed("cpf"));
                self.execute(Method::GET, &["employee", "check_register", cpf.as_str()], None, true)
                    .await
            }
            FormEndpoint::CreateEmployee => {
                self.send_json(
                    &["employee", "register_employee"],
                    Method::POST,
                    &EmployeePayload::from_snapshot(&values),
                    true,
                )
                .await
            }
            FormEndpoint::UpdateEmployee(id) => {
                self.send_json(
                    &["employee", id.as_str()],
                    Method::PUT,
                    &EmployeePayload::from_snapshot(&values),
                    true,
                )
                .await
            }
        };

        result.or_else(into_transport)
    }

    /// A `send` function for [`FormController::submit`](docreg_forms::FormController::submit).
    ///
    /// ```ignore
    /// let state = form
    ///     .submit(|| form.snapshot(), client.sender(FormEndpoint::CreateEmployee))
    ///     .await;
    /// ```
    pub fn sender(
        &self,
        endpoint: FormEndpoint,
    ) -> impl FnOnce(FormSnapshot) -> BoxFuture<'static, Result<Response, TransportError>> + use<> {
        let client = self.clone();
        move |values| Box::pin(async move { client.submit_form(&endpoint, values).await })
    }

    /// Like [`sender`](Self::sender) for [`FormEndpoint::Login`], and saves
    /// the returned token into `store` when the login succeeds.
    pub fn login_sender<S>(
        &self,
        store: S,
    ) -> impl FnOnce(FormSnapshot) -> BoxFuture<'static, Result<Response, TransportError>> + use<S>
    where
        S: TokenStore + 'static,
    {
        let client = self.clone();
        move |values| {
            Box::pin(async move {
                let response = client.submit_form(&FormEndpoint::Login, values).await?;
                if response.is_success() {
                    let login: LoginResponse = response.json()?;
                    store.save(AccessToken::new(login.token));
                    log::info!("[api] logged in");
                }
                Ok(response)
            })
        }
    }

    async fn send_json<T: serde::Serialize>(
        &self,
        segments: &[&str],
        method: Method,
        body: &T,
        authenticated: bool,
    ) -> Result<Response, Error> {
        let body = to_json(body)?;
        self.execute(method, segments, Some(body), authenticated).await
    }
}

fn into_transport(err: Error) -> Result<Response, TransportError> {
    match err {
        Error::Auth(AuthError::MissingToken | AuthError::TokenExpired { .. }) => {
            log::warn!("[api] form sent without a valid token");
            Ok(Response::json_body(
                401,
                &serde_json::json!({ "message": SESSION_EXPIRED }),
            ))
        }
        Error::Api(ApiError::Timeout(after)) => Err(TransportError::Timeout(after)),
        Error::Api(ApiError::Network(err)) => Err(TransportError::network(err.to_string())),
        Error::Api(ApiError::Parse { message, .. }) => Err(TransportError::malformed(message)),
        other => Err(TransportError::network(other.to_string())),
    }
}
