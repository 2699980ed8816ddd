// Caller-side pieces around the core API: configuration, client identifier
// persistence and the interactive PIN login.
mod client_id;
mod error;
mod login;
mod settings;

pub use client_id::ClientIdStore;
pub use error::AuthError;
pub use login::{authenticate, build_client, login, poll_pin};
pub use settings::{ForwardSettings, PollSettings, Settings};
