use chrono::{DateTime, Utc, serde::ts_seconds};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::coerce;

/// Raw attributes of one XML element, keyed by attribute name.
pub type Attributes = HashMap<String, String>;

fn attr<'a>(attributes: &'a Attributes, name: &str) -> Option<&'a str> {
    attributes.get(name).map(String::as_str)
}

/// A user who has been granted access to one or more servers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: u64,
    pub title: String,
    pub username: Option<String>,
    pub email: Option<String>,
    /// Avatar URL
    pub thumb: String,
    pub allow_camera_upload: bool,
    pub allow_channels: bool,
    pub allow_subtitle_admin: bool,
    pub allow_sync: bool,
    pub allow_tuners: bool,
    /// Library filters; an empty string means no restriction.
    pub filter_all: String,
    pub filter_movies: String,
    pub filter_music: String,
    pub filter_photos: String,
    pub filter_television: String,
    /// Member of the owner's Plex Home
    pub home: bool,
    /// Protected by a PIN
    pub protected: bool,
    /// Restricted by parental controls
    pub restricted: bool,
    pub recommendations_playlist_id: Option<u64>,
    pub servers: Vec<ServerRecord>,
}

impl UserRecord {
    pub fn from_attributes(attributes: &Attributes, servers: Vec<ServerRecord>) -> Self {
        Self {
            id: coerce::number(attr(attributes, "id")),
            title: coerce::string(attr(attributes, "title")),
            username: coerce::optional_string(attr(attributes, "username")),
            email: coerce::optional_string(attr(attributes, "email")),
            thumb: coerce::string(attr(attributes, "thumb")),
            allow_camera_upload: coerce::flag(attr(attributes, "allowCameraUpload")),
            allow_channels: coerce::flag(attr(attributes, "allowChannels")),
            allow_subtitle_admin: coerce::flag(attr(attributes, "allowSubtitleAdmin")),
            allow_sync: coerce::flag(attr(attributes, "allowSync")),
            allow_tuners: coerce::flag(attr(attributes, "allowTuners")),
            filter_all: coerce::string(attr(attributes, "filterAll")),
            filter_movies: coerce::string(attr(attributes, "filterMovies")),
            filter_music: coerce::string(attr(attributes, "filterMusic")),
            filter_photos: coerce::string(attr(attributes, "filterPhotos")),
            filter_television: coerce::string(attr(attributes, "filterTelevision")),
            home: coerce::flag(attr(attributes, "home")),
            protected: coerce::flag(attr(attributes, "protected")),
            restricted: coerce::flag(attr(attributes, "restricted")),
            recommendations_playlist_id: coerce::optional_number(attr(
                attributes,
                "recommendationsPlaylistId",
            )),
            servers,
        }
    }
}

/// A server shared with a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerRecord {
    pub id: u64,
    pub server_id: u64,
    pub machine_identifier: String,
    pub name: String,
    pub owned: bool,
    pub pending: bool,
    pub all_libraries: bool,
    pub num_libraries: u32,
    #[serde(with = "ts_seconds")]
    pub last_seen_at: DateTime<Utc>,
}

impl ServerRecord {
    pub fn from_attributes(attributes: &Attributes) -> Self {
        let last_seen: i64 = coerce::number(attr(attributes, "lastSeenAt"));

        Self {
            id: coerce::number(attr(attributes, "id")),
            server_id: coerce::number(attr(attributes, "serverId")),
            machine_identifier: coerce::string(attr(attributes, "machineIdentifier")),
            name: coerce::string(attr(attributes, "name")),
            owned: coerce::flag(attr(attributes, "owned")),
            pending: coerce::flag(attr(attributes, "pending")),
            all_libraries: coerce::flag(attr(attributes, "allLibraries")),
            num_libraries: coerce::number(attr(attributes, "numLibraries")),
            last_seen_at: DateTime::from_timestamp(last_seen, 0).unwrap_or_default(),
        }
    }
}
