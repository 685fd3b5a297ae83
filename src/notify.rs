use serde::Serialize;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::time::Instant;

pub const ERROR_TTL: Duration = Duration::from_millis(5000);
pub const SUCCESS_TTL: Duration = Duration::from_millis(4000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    Loading,
    Error,
    Success,
}

#[derive(Debug, Clone, Serialize)]
pub struct Notice {
    pub id: u64,
    pub kind: NoticeKind,
    pub message: String,
    #[serde(skip)]
    expires_at: Option<Instant>,
}

impl Notice {
    fn expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|deadline| now >= deadline)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modal {
    Login,
    Register,
    Booking { service_type: Option<String> },
    ClientPanel,
    Report(u64),
    ConfirmCancel(u64),
}

#[derive(Debug, Default)]
struct Overlay {
    notices: Vec<Notice>,
    next_id: u64,
    modal: Option<Modal>,
}

impl Overlay {
    fn prune(&mut self, now: Instant) {
        self.notices.retain(|notice| !notice.expired(now));
    }

    fn push(&mut self, kind: NoticeKind, message: String, ttl: Option<Duration>) -> u64 {
        let now = Instant::now();
        self.prune(now);
        self.next_id += 1;
        let id = self.next_id;
        self.notices.push(Notice {
            id,
            kind,
            message,
            expires_at: ttl.map(|ttl| now + ttl),
        });
        id
    }
}

/// Transient overlays: timed notices, the loading indicator and the
/// single open modal. Cheap to clone; all clones share one overlay.
#[derive(Debug, Clone, Default)]
pub struct NoticeBoard {
    inner: Arc<Mutex<Overlay>>,
}

impl NoticeBoard {
    fn with<T>(&self, f: impl FnOnce(&mut Overlay) -> T) -> T {
        let mut overlay = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut overlay)
    }

    pub fn error(&self, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!(%message, "error notice");
        self.with(|overlay| overlay.push(NoticeKind::Error, message, Some(ERROR_TTL)));
    }

    pub fn success(&self, message: impl Into<String>) {
        let message = message.into();
        self.with(|overlay| overlay.push(NoticeKind::Success, message, Some(SUCCESS_TTL)));
    }

    /// Shows the loading indicator until the returned guard is dropped.
    pub fn loading(&self, message: impl Into<String>) -> LoadingGuard {
        let id = self.with(|overlay| overlay.push(NoticeKind::Loading, message.into(), None));
        LoadingGuard {
            board: self.clone(),
            id,
        }
    }

    /// Notices still on screen at `now`; expired ones are dropped.
    pub fn visible_at(&self, now: Instant) -> Vec<Notice> {
        self.with(|overlay| {
            overlay.prune(now);
            overlay.notices.clone()
        })
    }

    pub fn visible(&self) -> Vec<Notice> {
        self.visible_at(Instant::now())
    }

    /// Opening a modal replaces whichever one was open.
    pub fn show_modal(&self, modal: Modal) {
        self.with(|overlay| overlay.modal = Some(modal));
    }

    pub fn close_modal(&self) {
        self.with(|overlay| overlay.modal = None);
    }

    pub fn modal(&self) -> Option<Modal> {
        self.with(|overlay| overlay.modal.clone())
    }
}

pub struct LoadingGuard {
    board: NoticeBoard,
    id: u64,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        let id = self.id;
        self.board
            .with(|overlay| overlay.notices.retain(|notice| notice.id != id));
    }
}
