use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use uuid::Uuid;

use crate::coerce;

/// Identification sent with every provider request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIdentity {
    pub client_id: String,
    pub app_name: String,
}

impl ClientIdentity {
    pub fn new(client_id: impl Into<String>, app_name: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            app_name: app_name.into(),
        }
    }

    /// Creates an identity with a fresh client identifier. The caller should
    /// store the identifier and reuse it for the lifetime of the installation.
    pub fn generate(app_name: impl Into<String>) -> Self {
        Self::new(generate_client_id(), app_name)
    }
}

pub fn generate_client_id() -> String {
    Uuid::new_v4().to_string()
}

/// A PIN issued by the provider. Fields missing from the response are `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinRequest {
    pub id: Option<u64>,
    pub code: Option<String>,
    pub trusted: bool,
    pub expires_in: Option<u64>,
}

impl PinRequest {
    pub(crate) fn from_json(json: &Value) -> Self {
        Self {
            id: coerce::json_u64(json.get("id")),
            code: coerce::json_string(json.get("code")),
            trusted: coerce::json_flag(json.get("trusted")),
            expires_in: coerce::json_u64(json.get("expiresIn")),
        }
    }
}

/// Long-lived user access token. Redacted in `Debug` output.
#[derive(Debug)]
pub struct AccessToken(SecretString);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::from(token.into()))
    }

    pub fn expose_secret(&self) -> &str {
        self.0.expose_secret()
    }
}

impl Clone for AccessToken {
    fn clone(&self) -> Self {
        Self::new(self.expose_secret())
    }
}

impl From<String> for AccessToken {
    fn from(token: String) -> Self {
        Self::new(token)
    }
}

#[derive(Debug, Clone)]
pub enum PinStatus {
    Verified(AccessToken),
    /// The user has not finished signing in yet.
    Pending,
}

impl PinStatus {
    pub(crate) fn from_json(json: &Value) -> Self {
        match coerce::json_string(json.get("authToken")) {
            Some(token) if !token.is_empty() => Self::Verified(AccessToken::new(token)),
            _ => Self::Pending,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    pub fn token(self) -> Option<AccessToken> {
        match self {
            Self::Verified(token) => Some(token),
            Self::Pending => None,
        }
    }
}
