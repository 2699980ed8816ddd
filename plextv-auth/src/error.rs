use plextv_api::PlexTvError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Client id storage error: {0}")]
    ClientIdStorage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Plex API error: {0}")]
    Api(#[from] PlexTvError),

    #[error("PIN response is missing its {0}")]
    MissingPin(&'static str),

    #[error("Authentication timed out after {0} seconds")]
    Timeout(u64),
}

impl From<config::ConfigError> for AuthError {
    fn from(err: config::ConfigError) -> Self {
        AuthError::Configuration(err.to_string())
    }
}
