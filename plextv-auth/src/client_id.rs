use plextv_api::auth::generate_client_id;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::AuthError;

/// Keeps the client identifier stable across runs.
pub struct ClientIdStore {
    client_id_path: PathBuf,
}

impl ClientIdStore {
    pub fn new() -> Result<Self, AuthError> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| AuthError::Configuration("Could not find cache directory".to_string()))?
            .join("plextv");

        Self::at(&cache_dir)
    }

    pub fn at(dir: &Path) -> Result<Self, AuthError> {
        if !dir.exists() {
            fs::create_dir_all(dir).map_err(|e| {
                AuthError::ClientIdStorage(format!("Failed to create cache directory: {}", e))
            })?;
        }

        Ok(Self {
            client_id_path: dir.join("client_id"),
        })
    }

    pub fn load_or_create(&self) -> Result<String, AuthError> {
        if self.client_id_path.exists() {
            let client_id = fs::read_to_string(&self.client_id_path)?.trim().to_string();
            if !client_id.is_empty() {
                return Ok(client_id);
            }
            tracing::warn!("Stored client id is empty, generating a new one");
        }

        let client_id = generate_client_id();
        fs::write(&self.client_id_path, &client_id).map_err(|e| {
            AuthError::ClientIdStorage(format!("Failed to save client id: {}", e))
        })?;

        // Owner read/write only
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(&self.client_id_path)?.permissions();
            perms.set_mode(0o600);
            fs::set_permissions(&self.client_id_path, perms)?;
        }

        tracing::info!("Generated new client id");

        Ok(client_id)
    }
}
