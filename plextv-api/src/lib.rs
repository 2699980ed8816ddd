pub mod auth;
pub mod coerce;
pub mod envelope;
mod error;
pub mod transport;
pub mod users;

pub use crate::auth::{AccessToken, ClientIdentity, PinRequest, PinStatus};
pub use crate::error::PlexTvError;
pub use crate::transport::{HttpTransport, Transport};
pub use crate::users::{ServerRecord, UserRecord};

use auth::{INTERACTIVE_AUTH_URL, encode};
use url::Url;

const BASE_URL: &str = "https://plex.tv";

/// Entry point for every provider call. Holds no per-call state, so one
/// client can serve concurrent callers.
pub struct Client<T = HttpTransport> {
    transport: T,
    identity: ClientIdentity,
    api_base: String,
    auth_app_url: String,
}

impl Client<HttpTransport> {
    pub fn new(identity: ClientIdentity) -> Result<Self, PlexTvError> {
        Ok(Self::with_transport(identity, HttpTransport::new()?))
    }
}

impl<T: Transport> Client<T> {
    pub fn with_transport(identity: ClientIdentity, transport: T) -> Self {
        Self {
            transport,
            identity,
            api_base: BASE_URL.to_string(),
            auth_app_url: INTERACTIVE_AUTH_URL.to_string(),
        }
    }

    /// Points provider API calls at a different host, e.g. a local mock.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    /// Replaces the browser sign-in page used by `interactive_url`.
    pub fn with_auth_app_url(mut self, auth_app_url: impl Into<String>) -> Self {
        self.auth_app_url = auth_app_url.into();
        self
    }

    pub fn identity(&self) -> &ClientIdentity {
        &self.identity
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn api_url(&self, path: &str, params: &[(&str, &str)]) -> Result<Url, PlexTvError> {
        let mut url = Url::parse(&format!("{}{}", self.api_base, path))?;
        // Spaces go out as %20, not the form-style `+`
        let query = params
            .iter()
            .map(|(name, value)| format!("{}={}", encode(name), encode(value)))
            .collect::<Vec<_>>()
            .join("&");
        if !query.is_empty() {
            url.set_query(Some(&query));
        }
        Ok(url)
    }
}
