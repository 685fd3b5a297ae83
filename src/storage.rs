use crate::errors::ClientError;
use crate::models::User;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, warn};

/// The two keys the front-end keeps on the device. Values are stored as
/// strings, the way a browser's local storage holds them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredSession {
    #[serde(rename = "isLoggedIn", default, skip_serializing_if = "Option::is_none")]
    pub is_logged_in: Option<String>,
    #[serde(rename = "currentUser", default, skip_serializing_if = "Option::is_none")]
    pub current_user: Option<String>,
}

impl StoredSession {
    pub fn logged_in(user: &User) -> Result<Self, ClientError> {
        Ok(Self {
            is_logged_in: Some("true".to_string()),
            current_user: Some(serde_json::to_string(user)?),
        })
    }

    /// Both keys must be present for a stored session to count.
    pub fn has_session(&self) -> bool {
        self.is_logged_in.as_deref().is_some_and(|flag| !flag.is_empty())
            && self.current_user.as_deref().is_some_and(|user| !user.is_empty())
    }

    pub fn user(&self) -> Option<User> {
        let raw = self.current_user.as_deref()?;
        match serde_json::from_str(raw) {
            Ok(user) => Some(user),
            Err(err) => {
                warn!("stored user record is unreadable: {err}");
                None
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct SessionStorage {
    path: PathBuf,
}

impl SessionStorage {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn load(&self) -> StoredSession {
        match fs::read(&self.path).await {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(data) => data,
                Err(err) => {
                    error!("failed to parse session file: {err}");
                    StoredSession::default()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => StoredSession::default(),
            Err(err) => {
                error!("failed to read session file: {err}");
                StoredSession::default()
            }
        }
    }

    pub async fn persist(&self, data: &StoredSession) -> Result<(), ClientError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        let payload = serde_json::to_vec_pretty(data)?;
        fs::write(&self.path, payload).await?;
        Ok(())
    }

    pub async fn clear(&self) -> Result<(), ClientError> {
        self.persist(&StoredSession::default()).await
    }
}
