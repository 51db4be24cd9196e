//! Login and sign-up payloads

use docreg_forms::FormSnapshot;
use serde::Deserialize;
use serde::Serialize;

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Reads `email` and `password` from a login form. The email is trimmed,
    /// the password is sent as typed.
    pub fn from_snapshot(snapshot: &FormSnapshot) -> Self {
        Self::new(
            snapshot.trimmed("email"),
            snapshot.get("password").unwrap_or_default(),
        )
    }
}

/// Body of `POST /auth/register`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewUser {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub email: String,
    pub password: String,
}

impl NewUser {
    pub fn from_snapshot(snapshot: &FormSnapshot) -> Self {
        let name = snapshot.trimmed("name");
        Self {
            name: (!name.is_empty()).then(|| name.to_string()),
            email: snapshot.trimmed("email").to_string(),
            password: snapshot.get("password").unwrap_or_default().to_string(),
        }
    }
}

/// Successful login response.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_omits_blank_name() {
        let snapshot = FormSnapshot::new()
            .with("name", "  ")
            .with("email", " ana@example.com ")
            .with("password", " Segura#2024");
        let user = NewUser::from_snapshot(&snapshot);
        assert_eq!(user.name, None);
        assert_eq!(user.email, "ana@example.com");
        assert_eq!(user.password, " Segura#2024");
        assert_eq!(
            serde_json::to_value(&user).unwrap(),
            serde_json::json!({"email": "ana@example.com", "password": " Segura#2024"})
        );
    }
}
