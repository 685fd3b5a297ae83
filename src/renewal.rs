use std::future::Future;
use std::sync::{
    Arc, Mutex, PoisonError,
    atomic::{AtomicU64, AtomicUsize, Ordering},
};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{debug, info, warn};

/// What the loop drives on each tick.
pub trait Renewal: Send + Sync + 'static {
    /// Re-validates the session; `false` means it is gone.
    fn renew(&self) -> impl Future<Output = bool> + Send;

    /// Called once after a failed renewal.
    fn expire(&self) -> impl Future<Output = ()> + Send;
}

struct Running {
    id: u64,
    handle: JoinHandle<()>,
}

/// Periodic session re-validation. At most one loop runs at a time.
#[derive(Default)]
pub struct RenewalLoop {
    current: Arc<Mutex<Option<Running>>>,
    next_id: AtomicU64,
    live: Arc<AtomicUsize>,
}

/// Counts a spawned loop until its future is dropped, aborted or not.
struct LiveGuard(Arc<AtomicUsize>);

impl LiveGuard {
    fn new(live: &Arc<AtomicUsize>) -> Self {
        live.fetch_add(1, Ordering::SeqCst);
        Self(Arc::clone(live))
    }
}

impl Drop for LiveGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl RenewalLoop {
    /// Starts ticking every `period`, first tick one period from now.
    /// A loop that is already running is aborted first.
    pub fn start<R: Renewal>(&self, period: Duration, renewal: R) {
        if period.is_zero() {
            warn!("session renewal needs a non-zero period, not starting");
            self.stop();
            return;
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let slot = Arc::clone(&self.current);
        let guard = LiveGuard::new(&self.live);

        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = current.take() {
            debug!(id = previous.id, "replacing session renewal loop");
            previous.handle.abort();
        }

        let handle = tokio::spawn(async move {
            let _guard = guard;
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if renewal.renew().await {
                    debug!(id, "session renewed");
                    continue;
                }

                warn!(id, "session renewal failed, logging out");
                detach(&slot, id);
                renewal.expire().await;
                break;
            }
        });

        info!(id, period_ms = period.as_millis() as u64, "session renewal started");
        *current = Some(Running { id, handle });
    }

    pub fn stop(&self) {
        let previous = self
            .current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(previous) = previous {
            previous.handle.abort();
            info!(id = previous.id, "session renewal stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Loop tasks whose futures are still alive.
    pub fn active(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }
}

impl Drop for RenewalLoop {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Forgets the loop `id` without aborting it, so the loop can finish its
/// own expiry even though that expiry stops the loop.
fn detach(slot: &Mutex<Option<Running>>, id: u64) {
    let mut current = slot.lock().unwrap_or_else(PoisonError::into_inner);
    if current.as_ref().is_some_and(|running| running.id == id) {
        *current = None;
    }
}
