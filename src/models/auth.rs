//! Authentication-related data models.

use paperclip::actix::Apiv2Schema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::api::or_default;

/// Identity returned by the backend's token verification.
///
/// Opaque apart from an email-like field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(pub Map<String, Value>);

impl Identity {
    /// The `email` field, when present and a string
    pub fn email(&self) -> Option<&str> {
        self.0.get("email").and_then(Value::as_str)
    }

    /// An empty verification payload does not identify anyone
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Request-scoped authentication context produced by the auth gate
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub identity: Identity,
    /// Raw bearer token, forwarded on backend calls
    pub token: String,
}

/// Request model for `POST /auth/login`
#[derive(Debug, Default, Serialize, Deserialize, Apiv2Schema)]
pub struct LoginRequest {
    #[serde(default, deserialize_with = "or_default")]
    pub email: String,
    #[serde(default, deserialize_with = "or_default")]
    pub password: String,
}

/// Request model for `POST /auth/signup`
#[derive(Debug, Default, Serialize, Deserialize, Apiv2Schema)]
pub struct SignupRequest {
    #[serde(default, deserialize_with = "or_default")]
    pub email: String,
    #[serde(default, deserialize_with = "or_default")]
    pub password: String,
    #[serde(default, deserialize_with = "or_default")]
    pub name: String,
}

/// Acknowledgement for auth calls whose backend body is not passed on
#[derive(Debug, Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct MessageResponse {
    pub message: String,
}

/// Request model for `POST /auth/refresh-token`
#[derive(Debug, Default, Serialize, Deserialize, Apiv2Schema)]
pub struct RefreshTokenRequest {
    #[serde(rename = "refreshToken", default, deserialize_with = "or_default")]
    pub refresh_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_identity_email() {
        let identity: Identity =
            serde_json::from_value(json!({"email": "ana@uninorte.edu.co", "role": "admin"})).unwrap();
        assert_eq!(identity.email(), Some("ana@uninorte.edu.co"));

        let anonymous: Identity = serde_json::from_value(json!({"sub": "1"})).unwrap();
        assert_eq!(anonymous.email(), None);
    }

    #[test]
    fn test_empty_identity() {
        let identity: Identity = serde_json::from_value(json!({})).unwrap();
        assert!(identity.is_empty());
    }

    #[test]
    fn test_credentials_tolerate_null() {
        let req: LoginRequest =
            serde_json::from_value(json!({"email": null, "password": 42})).unwrap();
        assert!(req.email.is_empty());
        assert!(req.password.is_empty());
    }

    #[test]
    fn test_identity_rejects_non_object() {
        assert!(serde_json::from_value::<Identity>(json!(true)).is_err());
    }
}
