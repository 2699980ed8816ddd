mod models;

pub use models::{AccessToken, ClientIdentity, PinRequest, PinStatus, generate_client_id};

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde_json::Value;

use crate::Client;
use crate::envelope::{self, ExpectedFormat};
use crate::error::PlexTvError;
use crate::transport::{Transport, TransportRequest};

const PINS_PATH: &str = "/api/v2/pins";
const USER_PATH: &str = "/api/v2/user";

// RFC 3986 unreserved characters pass through untouched
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

pub(crate) fn encode(value: &str) -> String {
    utf8_percent_encode(value, COMPONENT).to_string()
}

pub const INTERACTIVE_AUTH_URL: &str = "https://app.plex.tv/auth#";

/// Builds the link an end user opens to approve `pin_code` in their browser.
pub fn interactive_url(client_id: &str, pin_code: &str, forward_url: &str, app_name: &str) -> String {
    interactive_url_with_base(INTERACTIVE_AUTH_URL, client_id, pin_code, forward_url, app_name)
}

pub(crate) fn interactive_url_with_base(
    base: &str,
    client_id: &str,
    pin_code: &str,
    forward_url: &str,
    app_name: &str,
) -> String {
    format!(
        "{}?clientID={}&code={}&forwardUrl={}&context%5Bdevice%5D%5Bproduct%5D={}",
        base,
        encode(client_id),
        encode(pin_code),
        encode(forward_url),
        encode(app_name)
    )
}

impl<T: Transport> Client<T> {
    /// Requests a new strong PIN from the provider.
    pub async fn issue_pin(&self) -> Result<PinRequest, PlexTvError> {
        let url = self.api_url(
            PINS_PATH,
            &[
                ("strong", "true"),
                ("X-Plex-Product", self.identity.app_name.as_str()),
                ("X-Plex-Client-Identifier", self.identity.client_id.as_str()),
            ],
        )?;

        let response = self.transport.execute(TransportRequest::post(url)).await?;
        let json: Value = envelope::validate(&response, ExpectedFormat::Json)?.json()?;
        let pin = PinRequest::from_json(&json);

        tracing::debug!(pin_id = ?pin.id, "Issued PIN");

        Ok(pin)
    }

    /// Link for the end user to approve `pin_code`. `forward_url` is where the
    /// provider sends their browser afterwards.
    pub fn interactive_url(&self, pin_code: &str, forward_url: &str) -> String {
        interactive_url_with_base(
            &self.auth_app_url,
            &self.identity.client_id,
            pin_code,
            forward_url,
            &self.identity.app_name,
        )
    }

    /// Checks whether the user has approved the PIN yet. Callers poll this
    /// until `PinStatus::Verified` or until they give up.
    pub async fn verify_pin(&self, pin_id: u64, pin_code: &str) -> Result<PinStatus, PlexTvError> {
        let url = self.api_url(
            &format!("{}/{}", PINS_PATH, pin_id),
            &[
                ("code", pin_code),
                ("X-Plex-Client-Identifier", self.identity.client_id.as_str()),
            ],
        )?;

        let response = self.transport.execute(TransportRequest::get(url)).await?;
        let json: Value = envelope::validate(&response, ExpectedFormat::Json)?.json()?;
        let status = PinStatus::from_json(&json);

        tracing::debug!(pin_id, pending = status.is_pending(), "Checked PIN");

        Ok(status)
    }

    /// Returns `false` when the provider rejects the token with 401.
    pub async fn check_token(&self, token: &AccessToken) -> Result<bool, PlexTvError> {
        let url = self.api_url(
            USER_PATH,
            &[
                ("X-Plex-Product", self.identity.app_name.as_str()),
                ("X-Plex-Client-Identifier", self.identity.client_id.as_str()),
                ("X-Plex-Token", token.expose_secret()),
            ],
        )?;

        let response = self.transport.execute(TransportRequest::get(url)).await?;
        match response.status {
            200 => Ok(true),
            401 => Ok(false),
            status => Err(PlexTvError::UnexpectedStatus(status)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    fn query_pairs(link: &str) -> Vec<(String, String)> {
        let query = link.split_once("#?").unwrap().1;
        url::form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect()
    }

    #[test]
    fn test_interactive_url_template() {
        let link = interactive_url("abc", "WXYZ", "http://localhost/plex/auth", "my app");
        assert_eq!(
            link,
            "https://app.plex.tv/auth#?clientID=abc&code=WXYZ&forwardUrl=http%3A%2F%2Flocalhost%2Fplex%2Fauth&context%5Bdevice%5D%5Bproduct%5D=my%20app"
        );
    }

    #[test]
    fn test_interactive_url_reserved_characters() {
        let link = interactive_url("a&b=c", "x y", "http://h/p?q=1&r=2", "app=&name");
        let pairs = query_pairs(&link);
        assert_eq!(pairs.len(), 4);
        assert_eq!(pairs[0], ("clientID".to_string(), "a&b=c".to_string()));
        assert_eq!(pairs[1], ("code".to_string(), "x y".to_string()));
        assert_eq!(pairs[2], ("forwardUrl".to_string(), "http://h/p?q=1&r=2".to_string()));
        assert_eq!(
            pairs[3],
            ("context[device][product]".to_string(), "app=&name".to_string())
        );
    }

    #[test]
    fn test_interactive_url_is_a_valid_url() {
        let link = interactive_url("id", "code", "https://example.com/cb", "app");
        assert!(Url::parse(&link).is_ok());
    }

    #[test]
    fn test_pin_from_json_missing_fields() {
        let pin = PinRequest::from_json(&serde_json::json!({ "code": "ABCD" }));
        assert_eq!(pin.id, None);
        assert_eq!(pin.code.as_deref(), Some("ABCD"));
        assert!(!pin.trusted);
    }

    #[test]
    fn test_pin_status_from_json() {
        let verified = PinStatus::from_json(&serde_json::json!({ "authToken": "tok" }));
        assert_eq!(verified.token().unwrap().expose_secret(), "tok");

        assert!(PinStatus::from_json(&serde_json::json!({ "authToken": "" })).is_pending());
        assert!(PinStatus::from_json(&serde_json::json!({ "authToken": null })).is_pending());
        assert!(PinStatus::from_json(&serde_json::json!({ "id": 1 })).is_pending());
    }
}
