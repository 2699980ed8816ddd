use plextv_api::{AccessToken, Client, ClientIdentity, HttpTransport, PinStatus, Transport};
use std::time::{Duration, Instant};

use crate::client_id::ClientIdStore;
use crate::error::AuthError;
use crate::settings::{PollSettings, Settings};

/// Builds an API client from settings, loading or creating the stored client id.
pub fn build_client(settings: &Settings) -> Result<Client, AuthError> {
    let client_id = match &settings.client_id {
        Some(client_id) => client_id.clone(),
        None => ClientIdStore::new()?.load_or_create()?,
    };

    let identity = ClientIdentity::new(client_id, settings.app_name.clone());
    let transport = HttpTransport::with_user_agent(&settings.user_agent)?;

    Ok(Client::with_transport(identity, transport))
}

/// Returns a usable token: the configured one if the provider still accepts
/// it, otherwise one obtained through an interactive PIN login.
pub async fn authenticate<T: Transport>(
    client: &Client<T>,
    settings: &Settings,
) -> Result<AccessToken, AuthError> {
    if let Some(token) = &settings.token {
        let token = AccessToken::new(token.clone());
        if client.check_token(&token).await? {
            tracing::info!("Configured token is valid");
            return Ok(token);
        }
        eprintln!("Configured token was rejected, starting a new login");
    }

    println!("\n=== Plex Authentication Required ===\n");
    println!("This will open your browser to sign in to Plex.");
    println!("After signing in, please wait while we complete the process.\n");

    login(client, &settings.forward.url(), &settings.poll).await
}

/// Issues a PIN, sends the user to approve it and waits for the token.
pub async fn login<T: Transport>(
    client: &Client<T>,
    forward_url: &str,
    poll: &PollSettings,
) -> Result<AccessToken, AuthError> {
    let pin = client.issue_pin().await?;
    let pin_id = pin.id.ok_or(AuthError::MissingPin("id"))?;
    let pin_code = pin.code.ok_or(AuthError::MissingPin("code"))?;

    let auth_url = client.interactive_url(&pin_code, forward_url);

    // Open browser
    if let Err(e) = open::that(&auth_url) {
        eprintln!("Failed to open browser automatically: {}", e);
        eprintln!("\nPlease open this URL in your browser:");
        eprintln!("{}\n", auth_url);
    } else {
        println!("Browser opened. Please sign in to Plex...");
        println!("\nYou can also open this URL directly in your browser:");
        println!("{}\n", auth_url);
    }

    println!("Waiting for authorization...");
    let token = poll_pin(client, pin_id, &pin_code, poll).await?;
    println!("✓ Authentication successful!\n");

    Ok(token)
}

/// Polls the PIN until the user approves it or the timeout elapses.
pub async fn poll_pin<T: Transport>(
    client: &Client<T>,
    pin_id: u64,
    pin_code: &str,
    poll: &PollSettings,
) -> Result<AccessToken, AuthError> {
    let start = Instant::now();
    let timeout = Duration::from_secs(poll.timeout_secs);
    let interval = Duration::from_millis(poll.interval_ms);

    loop {
        if start.elapsed() > timeout {
            tracing::warn!(pin_id, "Gave up waiting for PIN approval");
            return Err(AuthError::Timeout(poll.timeout_secs));
        }

        match client.verify_pin(pin_id, pin_code).await? {
            PinStatus::Verified(token) => {
                tracing::info!(pin_id, "PIN approved");
                return Ok(token);
            }
            PinStatus::Pending => {
                tokio::time::sleep(interval).await;
            }
        }
    }
}
