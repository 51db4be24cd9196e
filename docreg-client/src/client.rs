//! Main RegistryClient

use std::sync::Arc;
use std::time::Duration;

use docreg_forms::Response;
use docreg_forms::validation::digits_only;
use reqwest::Client;
use reqwest::Method;
use serde::Deserialize;
use serde::Serialize;
use url::Url;

use crate::ClientConfig;
use crate::auth::AccessToken;
use crate::auth::TokenProvider;
use crate::error::ApiError;
use crate::error::AuthError;
use crate::error::Error;
use crate::model::Credentials;
use crate::model::EmployeeDetail;
use crate::model::EmployeeFilter;
use crate::model::EmployeePayload;
use crate::model::EmployeeSummary;
use crate::model::LoginResponse;
use crate::model::NewUser;

/// Client for the employee-document registry backend.
///
/// This client is cheap to clone (uses `Arc` internally) and can be shared
/// across tasks.
///
/// # Example
///
/// ```ignore
/// use docreg_client::{RegistryClient, auth::MemoryTokenStore, auth::TokenStore};
/// use docreg_client::model::Credentials;
///
/// let store = MemoryTokenStore::new();
/// let client = RegistryClient::builder()
///     .url("http://localhost:5000")
///     .token_provider(store.clone())
///     .build();
///
/// let token = client.login(&Credentials::new("ana@example.com", "Segura#2024")).await?;
/// store.save(token);
/// let employees = client.list_employees().await?;
/// ```
#[derive(Clone)]
pub struct RegistryClient {
    inner: Arc<RegistryClientInner>,
}

struct RegistryClientInner {
    base_url: String,
    token_provider: Arc<dyn TokenProvider>,
    http_client: Client,
    timeout: Option<Duration>,
}

/// Answer of the CPF availability check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpfAvailability {
    Available,
    AlreadyRegistered,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreatedEmployee {
    #[serde(alias = "employee_id")]
    employee_id: String,
}

impl RegistryClient {
    /// Creates a new builder for constructing a client.
    pub fn builder() -> RegistryClientBuilder<Missing, Missing> {
        RegistryClientBuilder::new()
    }

    /// Builder preloaded with the URL and timeout from `config`.
    pub fn from_config(config: &ClientConfig) -> RegistryClientBuilder<Set<String>, Missing> {
        RegistryClientBuilder::new()
            .url(config.api_url.clone())
            .timeout(config.timeout)
    }

    /// Returns the backend base URL.
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.inner.timeout
    }

    /// Absolute URL for `segments` below the base URL. Segments are
    /// percent-encoded, so ids and CPFs can be passed as typed.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = Url::parse(&self.inner.base_url)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", self.inner.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.inner.base_url.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Sends one request and returns the raw status and body, whatever the
    /// status. Authenticated requests carry the provider's bearer token.
    pub(crate) async fn execute(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<serde_json::Value>,
        authenticated: bool,
    ) -> Result<Response, Error> {
        let url = self.endpoint(segments)?;
        log::debug!("[api] {} {}", method, url);

        let mut request = self.inner.http_client.request(method, url);

        if authenticated {
            let token: AccessToken = self.inner.token_provider.get_token().await?;
            request = request.bearer_auth(&token.access_token);
        }

        if let Some(timeout) = self.inner.timeout {
            request = request.timeout(timeout);
        }

        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| request_error(e, self.inner.timeout))?;
        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| request_error(e, self.inner.timeout))?;

        log::debug!("[api] -> HTTP {}", status);
        Ok(Response::new(status, text))
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    /// Exchanges credentials for a bearer token.
    ///
    /// The token is returned, not stored; hand it to a
    /// [`TokenStore`](crate::auth::TokenStore).
    pub async fn login(&self, credentials: &Credentials) -> Result<AccessToken, Error> {
        let response = self
            .execute(
                Method::POST,
                &["auth", "login"],
                Some(to_json(credentials)?),
                false,
            )
            .await?;

        if response.status == 401 {
            return Err(AuthError::InvalidCredentials.into());
        }
        let login: LoginResponse = success_json(response)?;
        Ok(AccessToken::new(login.token))
    }

    pub async fn register_user(&self, user: &NewUser) -> Result<(), Error> {
        let response = self
            .execute(Method::POST, &["auth", "register"], Some(to_json(user)?), false)
            .await?;
        ensure_success(response)?;
        Ok(())
    }

    // =========================================================================
    // Employees
    // =========================================================================

    /// Asks whether an employee with this CPF already exists.
    pub async fn check_registration(&self, cpf: &str) -> Result<CpfAvailability, Error> {
        let cpf = digits_only(cpf);
        let response = self
            .execute(Method::GET, &["employee", "check_register", cpf.as_str()], None, true)
            .await?;

        match response.status {
            409 => Ok(CpfAvailability::AlreadyRegistered),
            _ => {
                ensure_success(response)?;
                Ok(CpfAvailability::Available)
            }
        }
    }

    /// Registers an employee and returns the new id.
    pub async fn create_employee(&self, payload: &EmployeePayload) -> Result<String, Error> {
        let response = self
            .execute(
                Method::POST,
                &["employee", "register_employee"],
                Some(to_json(payload)?),
                true,
            )
            .await?;
        let created: CreatedEmployee = success_json(response)?;
        log::info!("[api] created employee {}", created.employee_id);
        Ok(created.employee_id)
    }

    pub async fn list_employees(&self) -> Result<Vec<EmployeeSummary>, Error> {
        let response = self
            .execute(Method::GET, &["employee", "list"], None, true)
            .await?;
        Ok(success_json(response)?)
    }

    /// Lists employees and keeps those matching `filter`.
    pub async fn search_employees(
        &self,
        filter: &EmployeeFilter,
    ) -> Result<Vec<EmployeeSummary>, Error> {
        let mut employees = self.list_employees().await?;
        employees.retain(|e| filter.matches(e));
        Ok(employees)
    }

    pub async fn get_employee(&self, id: &str) -> Result<EmployeeDetail, Error> {
        let response = self
            .execute(Method::GET, &["employee", id], None, true)
            .await?;
        Ok(success_json(response)?)
    }

    pub async fn update_employee(&self, id: &str, payload: &EmployeePayload) -> Result<(), Error> {
        let response = self
            .execute(Method::PUT, &["employee", id], Some(to_json(payload)?), true)
            .await?;
        ensure_success(response)?;
        Ok(())
    }

    pub async fn delete_employee(&self, id: &str) -> Result<(), Error> {
        let response = self
            .execute(Method::DELETE, &["employee", id], None, true)
            .await?;
        ensure_success(response)?;
        log::info!("[api] deleted employee {}", id);
        Ok(())
    }
}

pub(crate) fn to_json<T: Serialize>(value: &T) -> Result<serde_json::Value, ApiError> {
    serde_json::to_value(value).map_err(|e| ApiError::parse(e.to_string()))
}

/// Maps a reqwest failure, telling timeouts apart from other network errors.
pub(crate) fn request_error(err: reqwest::Error, timeout: Option<Duration>) -> ApiError {
    if err.is_timeout() {
        ApiError::Timeout(timeout.unwrap_or_default())
    } else {
        ApiError::Network(err)
    }
}

fn ensure_success(response: Response) -> Result<Response, ApiError> {
    if response.is_success() {
        Ok(response)
    } else {
        Err(ApiError::from_response(response.status, &response.body))
    }
}

fn success_json<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let response = ensure_success(response)?;
    serde_json::from_str(&response.body)
        .map_err(|e| ApiError::parse_with_body(e.to_string(), response.body.clone()))
}

// =============================================================================
// Typestate Builder
// =============================================================================

/// Marker type for missing required builder fields.
pub struct Missing;

/// Marker type for set builder fields.
pub struct Set<T>(T);

/// Builder for constructing a [`RegistryClient`].
///
/// `url` and `token_provider` must both be set before `build` is available.
pub struct RegistryClientBuilder<U, P> {
    url: U,
    token_provider: P,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    http_client: Option<Client>,
}

impl RegistryClientBuilder<Missing, Missing> {
    pub fn new() -> Self {
        Self {
            url: Missing,
            token_provider: Missing,
            timeout: None,
            connect_timeout: None,
            http_client: None,
        }
    }
}

impl Default for RegistryClientBuilder<Missing, Missing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> RegistryClientBuilder<Missing, P> {
    /// Sets the backend base URL, e.g. `http://localhost:5000`.
    pub fn url(self, url: impl Into<String>) -> RegistryClientBuilder<Set<String>, P> {
        RegistryClientBuilder {
            url: Set(url.into()),
            token_provider: self.token_provider,
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            http_client: self.http_client,
        }
    }
}

impl<U> RegistryClientBuilder<U, Missing> {
    /// Sets the token provider for authenticated calls.
    pub fn token_provider<T: TokenProvider + 'static>(
        self,
        provider: T,
    ) -> RegistryClientBuilder<U, Set<Arc<dyn TokenProvider>>> {
        RegistryClientBuilder {
            url: self.url,
            token_provider: Set(Arc::new(provider) as Arc<dyn TokenProvider>),
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            http_client: self.http_client,
        }
    }
}

impl<U, P> RegistryClientBuilder<U, P> {
    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connection timeout, applied when building the HTTP client.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Sets a custom HTTP client.
    pub fn http_client(mut self, client: Client) -> Self {
        self.http_client = Some(client);
        self
    }
}

impl RegistryClientBuilder<Set<String>, Set<Arc<dyn TokenProvider>>> {
    /// Builds the [`RegistryClient`].
    pub fn build(self) -> RegistryClient {
        let http_client = self.http_client.unwrap_or_else(|| {
            let mut builder = Client::builder();
            if let Some(timeout) = self.connect_timeout {
                builder = builder.connect_timeout(timeout);
            }
            builder.build().unwrap_or_else(|e| {
                log::warn!("[api] custom HTTP client failed ({}), using defaults", e);
                Client::new()
            })
        });

        RegistryClient {
            inner: Arc::new(RegistryClientInner {
                base_url: self.url.0,
                token_provider: self.token_provider.0,
                http_client,
                timeout: self.timeout,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::StaticTokenProvider;

    fn client(url: &str) -> RegistryClient {
        RegistryClient::builder()
            .url(url)
            .token_provider(StaticTokenProvider::new("t"))
            .build()
    }

    #[test]
    fn test_endpoint_joins_segments() {
        let url = client("http://localhost:5000")
            .endpoint(&["employee", "check_register", "11144477735"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:5000/employee/check_register/11144477735"
        );
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let url = client("https://example.com/api/").endpoint(&["auth", "login"]).unwrap();
        assert_eq!(url.as_str(), "https://example.com/api/auth/login");
    }

    #[test]
    fn test_endpoint_encodes_segments() {
        let url = client("http://localhost").endpoint(&["employee", "a b/c"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost/employee/a%20b%2Fc");
    }

    #[test]
    fn test_invalid_base_url() {
        let err = client("not a url").endpoint(&["employee", "list"]).unwrap_err();
        assert!(matches!(err, ApiError::InvalidUrl(_)));
    }

    #[test]
    fn test_from_config() {
        let config = ClientConfig::default().with_timeout(Duration::from_secs(3));
        let client = RegistryClient::from_config(&config)
            .token_provider(StaticTokenProvider::new("t"))
            .build();
        assert_eq!(client.base_url(), "http://localhost:5000");
        assert_eq!(client.timeout(), Some(Duration::from_secs(3)));
    }

    #[test]
    fn test_created_employee_accepts_both_spellings() {
        let a: CreatedEmployee = serde_json::from_str(r#"{"employeeId":"e1"}"#).unwrap();
        let b: CreatedEmployee = serde_json::from_str(r#"{"employee_id":"e2"}"#).unwrap();
        assert_eq!((a.employee_id.as_str(), b.employee_id.as_str()), ("e1", "e2"));
    }
}
