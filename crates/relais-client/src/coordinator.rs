//! Single-slot coordination of credential renewal.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures_util::FutureExt;
use futures_util::future::{BoxFuture, Shared};
use tracing::debug;

type SharedRenewal = Shared<BoxFuture<'static, bool>>;

/// Coordinates credential renewal so that at most one exchange is in
/// flight process-wide.
///
/// The first caller installs its renewal future in the slot; every caller
/// arriving while the slot is occupied awaits the same shared outcome
/// instead of starting a new exchange. The slot is cleared a fixed linger
/// interval after the renewal settles, so a burst of near-simultaneous
/// authorization failures observes one result; callers arriving after the
/// interval start a fresh renewal.
pub struct RenewalCoordinator {
    in_flight: Mutex<Option<SharedRenewal>>,
    linger: Duration,
}

impl RenewalCoordinator {
    /// Default interval between renewal settlement and slot clearing,
    /// chosen to outlast the typical burst of concurrent failures.
    pub const DEFAULT_LINGER: Duration = Duration::from_secs(1);

    /// Create a coordinator with the given post-settlement linger.
    pub fn new(linger: Duration) -> Self {
        Self {
            in_flight: Mutex::new(None),
            linger,
        }
    }

    /// Run `renew` unless a renewal is already in flight, in which case the
    /// shared outcome of the in-flight exchange is awaited instead.
    ///
    /// All callers that observe an occupied slot receive the exact same
    /// resolved outcome.
    pub async fn run<F>(self: &Arc<Self>, renew: F) -> bool
    where
        F: FnOnce() -> BoxFuture<'static, bool>,
    {
        let shared = {
            // The lock is never held across an await; check-and-set of the
            // slot is atomic with respect to other callers.
            let mut slot = self.in_flight.lock().unwrap();
            match slot.as_ref() {
                Some(existing) => {
                    debug!("renewal already in flight, awaiting shared outcome");
                    existing.clone()
                }
                None => {
                    let shared = renew().shared();
                    *slot = Some(shared.clone());
                    self.schedule_clear(shared.clone());
                    shared
                }
            }
        };

        shared.await
    }

    /// Clear the slot a fixed interval after the renewal settles, success
    /// or failure alike.
    fn schedule_clear(self: &Arc<Self>, renewal: SharedRenewal) {
        let coordinator = Arc::clone(self);
        tokio::spawn(async move {
            let _ = renewal.await;
            tokio::time::sleep(coordinator.linger).await;
            coordinator.in_flight.lock().unwrap().take();
            debug!("renewal slot cleared");
        });
    }
}

impl std::fmt::Debug for RenewalCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let occupied = self.in_flight.lock().unwrap().is_some();
        f.debug_struct("RenewalCoordinator")
            .field("in_flight", &occupied)
            .field("linger", &self.linger)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_renewal(
        calls: &Arc<AtomicUsize>,
        outcome: bool,
        delay: Duration,
    ) -> impl FnOnce() -> BoxFuture<'static, bool> {
        let calls = Arc::clone(calls);
        move || {
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(delay).await;
                outcome
            }
            .boxed()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_callers_share_one_exchange() {
        let coordinator = Arc::new(RenewalCoordinator::new(Duration::from_secs(1)));
        let calls = Arc::new(AtomicUsize::new(0));

        let (a, b, c) = tokio::join!(
            coordinator.run(counting_renewal(&calls, true, Duration::from_millis(50))),
            coordinator.run(counting_renewal(&calls, true, Duration::from_millis(50))),
            coordinator.run(counting_renewal(&calls, true, Duration::from_millis(50))),
        );

        assert!(a && b && c);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn caller_within_linger_observes_settled_outcome() {
        let coordinator = Arc::new(RenewalCoordinator::new(Duration::from_secs(1)));
        let calls = Arc::new(AtomicUsize::new(0));

        let first = coordinator
            .run(counting_renewal(&calls, false, Duration::ZERO))
            .await;
        assert!(!first);

        // Still inside the linger window: the settled outcome is reused.
        tokio::time::sleep(Duration::from_millis(500)).await;
        let second = coordinator
            .run(counting_renewal(&calls, true, Duration::ZERO))
            .await;

        assert!(!second);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn slot_clears_after_linger() {
        let coordinator = Arc::new(RenewalCoordinator::new(Duration::from_secs(1)));
        let calls = Arc::new(AtomicUsize::new(0));

        coordinator
            .run(counting_renewal(&calls, true, Duration::ZERO))
            .await;

        // Past the linger window: a fresh renewal starts.
        tokio::time::sleep(Duration::from_secs(2)).await;
        let again = coordinator
            .run(counting_renewal(&calls, true, Duration::ZERO))
            .await;

        assert!(again);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
