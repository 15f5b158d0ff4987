//! Debounced trigger coalescing for the staging editor's resize requests.
//!
//! This module exposes [`Debouncer`], a lightweight handle the widget holds to
//! request that its resize routine run "soon". Repeated calls within the
//! quiescence window collapse into a single invocation of the underlying
//! callback, and a pending batch is never delayed past the max-wait bound even
//! under continuous triggering.
//!
//! Internally it spawns a [`DebounceWorker`] task that owns both deadlines and
//! invokes the callback, following the actor-style design from
//! [“Actors with Tokio”](https://ryhl.io/blog/actors-with-tokio/): a dedicated
//! worker task and cheap clonable request handles.
//!
//! # Timing Model
//!
//! Two deadlines govern a pending batch:
//!
//! - the *quiescence* deadline moves forward with every trigger; the callback
//!   runs once no trigger has arrived for the `quiet` window.
//! - the *hard* deadline is pinned by the first trigger of the batch; the
//!   callback runs no later than `max_wait` after that trigger, regardless of
//!   how many triggers keep arriving.
//!
//! Whichever deadline is reached first fires the callback exactly once and
//! clears both. A new trigger after a fire starts a fresh batch. There is no
//! explicit cancellation API beyond this coalescing; dropping every handle
//! stops the worker.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::Instant;

/// Handle for triggering a debounced callback.
///
/// Clones share one worker, so a widget can hand copies to whatever code paths
/// need to request the coalesced routine.
#[derive(Clone, Debug)]
pub struct Debouncer {
    trigger_tx: mpsc::UnboundedSender<()>,
}

impl Debouncer {
    /// Spawn the worker task for `callback` and return its trigger handle.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(
        quiet: Duration,
        max_wait: Duration,
        callback: impl FnMut() + Send + 'static,
    ) -> Self {
        let (trigger_tx, trigger_rx) = mpsc::unbounded_channel();
        let worker = DebounceWorker {
            trigger_rx,
            quiet,
            max_wait,
            callback,
        };
        tokio::spawn(worker.run());
        Self { trigger_tx }
    }

    /// Request one eventual invocation of the callback.
    pub fn call(&self) {
        let _ = self.trigger_tx.send(());
    }
}

#[cfg(test)]
impl Debouncer {
    /// A handle with no worker behind it, for tests that never let time pass.
    pub(crate) fn test_dummy() -> Self {
        let (trigger_tx, _rx) = mpsc::unbounded_channel();
        Self { trigger_tx }
    }
}

/// Worker task owning the deadlines for one [`Debouncer`].
///
/// Triggers are stamped here, on receipt, so the debounce arithmetic and
/// `sleep_until` share the tokio clock.
struct DebounceWorker<F> {
    trigger_rx: mpsc::UnboundedReceiver<()>,
    quiet: Duration,
    max_wait: Duration,
    callback: F,
}

impl<F: FnMut()> DebounceWorker<F> {
    async fn run(mut self) {
        const ONE_YEAR: Duration = Duration::from_secs(60 * 60 * 24 * 365);
        let mut quiet_deadline: Option<Instant> = None;
        let mut hard_deadline: Option<Instant> = None;
        loop {
            let target = match (quiet_deadline, hard_deadline) {
                (Some(quiet), Some(hard)) => quiet.min(hard),
                _ => Instant::now() + ONE_YEAR,
            };
            let deadline = tokio::time::sleep_until(target);
            tokio::pin!(deadline);

            tokio::select! {
                trigger = self.trigger_rx.recv() => {
                    if trigger.is_none() {
                        // All handles dropped; exit the worker.
                        break;
                    }
                    let now = Instant::now();
                    quiet_deadline = Some(now + self.quiet);
                    hard_deadline.get_or_insert(now + self.max_wait);
                }
                _ = &mut deadline => {
                    if quiet_deadline.is_some() {
                        quiet_deadline = None;
                        hard_deadline = None;
                        (self.callback)();
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use std::sync::atomic::AtomicUsize;
    use std::sync::atomic::Ordering;
    use tokio::time;

    fn counting_debouncer(quiet: Duration, max_wait: Duration) -> (Debouncer, Arc<AtomicUsize>) {
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = fired.clone();
        let debouncer = Debouncer::spawn(quiet, max_wait, move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        (debouncer, fired)
    }

    /// Let the worker observe queued triggers at the current (paused) instant
    /// before the clock moves again.
    async fn settle() {
        tokio::task::yield_now().await;
        tokio::task::yield_now().await;
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn single_trigger_fires_once_after_quiet_window() {
        let (debouncer, fired) = counting_debouncer(ms(200), ms(400));

        debouncer.call();
        settle().await;

        time::advance(ms(199)).await;
        settle().await;
        assert_eq!(fired.load(Ordering::SeqCst), 0, "fired before quiescence");

        time::advance(ms(2)).await;
        settle().await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);

        // Nothing further is pending.
        time::advance(ms(1000)).await;
        settle().await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn rapid_triggers_coalesce_into_one_fire() {
        let (debouncer, fired) = counting_debouncer(ms(200), ms(400));

        // Ten triggers in quick succession, 5ms apart.
        for _ in 0..10 {
            debouncer.call();
            settle().await;
            time::advance(ms(5)).await;
        }
        assert_eq!(fired.load(Ordering::SeqCst), 0, "fired during the burst");

        // The quiescence window counts from the last trigger.
        time::advance(ms(150)).await;
        settle().await;
        assert_eq!(fired.load(Ordering::SeqCst), 0, "fired before quiescence");

        time::advance(ms(60)).await;
        settle().await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn each_trigger_resets_the_quiescence_window() {
        let (debouncer, fired) = counting_debouncer(ms(200), ms(1000));

        debouncer.call();
        settle().await;
        time::advance(ms(150)).await;

        debouncer.call();
        settle().await;
        time::advance(ms(150)).await;
        settle().await;
        assert_eq!(
            fired.load(Ordering::SeqCst),
            0,
            "window should restart on the second trigger"
        );

        time::advance(ms(60)).await;
        settle().await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    /// Continuous triggering must not starve the callback: the hard deadline
    /// bounds the delay to `max_wait` from the first trigger of a batch.
    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn continuous_triggers_fire_at_least_per_max_wait() {
        let (debouncer, fired) = counting_debouncer(ms(200), ms(400));

        // Triggers every 50ms for 1000ms.
        for _ in 0..21 {
            debouncer.call();
            settle().await;
            time::advance(ms(50)).await;
        }
        let during_burst = fired.load(Ordering::SeqCst);
        assert!(
            during_burst >= 2,
            "expected at least two fires under continuous input, saw {during_burst}"
        );

        // Once triggers stop, the trailing batch drains.
        time::advance(ms(300)).await;
        settle().await;
        assert!(fired.load(Ordering::SeqCst) >= during_burst);
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn no_trigger_means_no_fire() {
        let (_debouncer, fired) = counting_debouncer(ms(200), ms(400));

        time::advance(Duration::from_secs(10)).await;
        settle().await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }
}
