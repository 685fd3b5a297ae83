use crate::errors::ClientError;
use crate::models::User;
use crate::storage::{SessionStorage, StoredSession};
use tokio::sync::Mutex;
use tracing::debug;

/// In-memory identity. The logged-in flag is derived from the user, so
/// one cannot exist without the other.
#[derive(Debug, Clone, Default)]
pub struct Session {
    user: Option<User>,
}

impl Session {
    pub fn is_logged_in(&self) -> bool {
        self.user.is_some()
    }
}

/// Session state plus its persisted mirror. Every transition writes
/// storage before the in-memory state changes, under the same lock.
pub struct SessionStore {
    state: Mutex<Session>,
    storage: SessionStorage,
}

impl SessionStore {
    pub fn new(storage: SessionStorage) -> Self {
        Self {
            state: Mutex::new(Session::default()),
            storage,
        }
    }

    pub async fn establish(&self, user: User) -> Result<(), ClientError> {
        let mut state = self.state.lock().await;
        self.storage.persist(&StoredSession::logged_in(&user)?).await?;
        debug!(username = %user.username, "session established");
        state.user = Some(user);
        Ok(())
    }

    /// Replaces the user of a live session. Returns `false`, and writes
    /// nothing, when nobody is logged in.
    pub async fn update(&self, user: User) -> Result<bool, ClientError> {
        let mut state = self.state.lock().await;
        if !state.is_logged_in() {
            return Ok(false);
        }
        self.storage.persist(&StoredSession::logged_in(&user)?).await?;
        state.user = Some(user);
        Ok(true)
    }

    /// Drops the identity. Memory is cleared even when storage fails.
    pub async fn clear(&self) -> Result<(), ClientError> {
        let mut state = self.state.lock().await;
        state.user = None;
        self.storage.clear().await
    }

    pub async fn user(&self) -> Option<User> {
        self.state.lock().await.user.clone()
    }

    pub async fn is_logged_in(&self) -> bool {
        self.state.lock().await.is_logged_in()
    }

    /// What the device has on disk, independent of memory.
    pub async fn persisted(&self) -> StoredSession {
        self.storage.load().await
    }
}
