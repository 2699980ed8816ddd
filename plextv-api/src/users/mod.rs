mod feed;
mod models;

pub use feed::parse_users;
pub use models::{Attributes, ServerRecord, UserRecord};

use crate::Client;
use crate::auth::AccessToken;
use crate::envelope::{self, ExpectedFormat};
use crate::error::PlexTvError;
use crate::transport::{Transport, TransportRequest};

const USERS_PATH: &str = "/api/users";

impl<T: Transport> Client<T> {
    /// Fetches the users the token's owner has shared servers with.
    pub async fn users(&self, token: &AccessToken) -> Result<Vec<UserRecord>, PlexTvError> {
        let url = self.api_url(
            USERS_PATH,
            &[
                ("X-Plex-Token", token.expose_secret()),
                ("X-Plex-Language", "en"),
            ],
        )?;

        let response = self.transport.execute(TransportRequest::get(url)).await?;
        if response.status == 401 {
            tracing::warn!("Sharing feed request unauthorized");
            return Err(PlexTvError::Unauthorized);
        }

        let body = envelope::validate(&response, ExpectedFormat::Xml)?;
        parse_users(&body.text()?)
    }
}
