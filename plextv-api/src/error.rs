use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlexTvError {
    #[error("unexpected HTTP response code: {0}")]
    UnexpectedStatus(u16),

    #[error("empty HTTP response")]
    EmptyBody,

    #[error("cannot parse Content-Type header returned: {0}")]
    UnparseableContentType(String),

    #[error("unexpected MIME-type returned: {0}")]
    UnexpectedContentType(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("XML error: {0}")]
    Xml(String),

    #[error("unsupported charset: {0}")]
    UnsupportedCharset(String),

    #[error("access unauthorized, check plex token")]
    Unauthorized,

    #[error("stopped after {0} redirects")]
    TooManyRedirects(usize),

    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl PlexTvError {
    /// True for failures to decode a response body (JSON, XML or charset).
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            Self::Json(_) | Self::Xml(_) | Self::UnsupportedCharset(_)
        )
    }
}

impl From<quick_xml::Error> for PlexTvError {
    fn from(err: quick_xml::Error) -> Self {
        PlexTvError::Xml(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for PlexTvError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        PlexTvError::Xml(err.to_string())
    }
}
