//! [`Debounce`] definitions.

use std::time::Duration;

use tokio::{task, time};

/// Deferred action fired only once no newer one was scheduled within a
/// quiet window.
///
/// Actions are spawned onto the current [`task::LocalSet`], so they may hold
/// non-[`Send`] state. Dropping the [`Debounce`] cancels the pending action.
#[derive(Debug)]
pub struct Debounce {
    /// Quiet window an action waits for before firing.
    window: Duration,

    /// Handle of the pending action, if any.
    pending: Option<task::JoinHandle<()>>,
}

impl Debounce {
    /// Creates a new [`Debounce`] with the provided quiet `window`.
    #[must_use]
    pub const fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    /// Returns the quiet window of this [`Debounce`].
    #[must_use]
    pub const fn window(&self) -> Duration {
        self.window
    }

    /// Schedules the provided `action`, cancelling the pending one.
    ///
    /// # Panics
    ///
    /// If called outside of a [`task::LocalSet`].
    pub fn schedule<F>(&mut self, action: F)
    where
        F: FnOnce() + 'static,
    {
        _ = self.cancel();
        let window = self.window;
        self.pending = Some(task::spawn_local(async move {
            time::sleep(window).await;
            action();
        }));
    }

    /// Cancels the pending action, if any.
    ///
    /// Returns `true` if an action was still waiting to fire.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some_and(|h| {
            let waiting = !h.is_finished();
            h.abort();
            waiting
        })
    }

    /// Indicates whether an action is still waiting to fire.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for Debounce {
    fn drop(&mut self) {
        _ = self.cancel();
    }
}

#[cfg(test)]
mod spec {
    use std::{cell::RefCell, rc::Rc, time::Duration};

    use tokio::{task::LocalSet, time};

    use super::Debounce;

    #[tokio::test(start_paused = true)]
    async fn fires_only_last_action() {
        LocalSet::new()
            .run_until(async {
                let fired = Rc::new(RefCell::new(vec![]));
                let mut debounce = Debounce::new(Duration::from_millis(300));

                for q in ["a", "al", "ali"] {
                    let fired = Rc::clone(&fired);
                    debounce.schedule(move || fired.borrow_mut().push(q));
                    time::sleep(Duration::from_millis(100)).await;
                }
                assert!(fired.borrow().is_empty());
                assert!(debounce.is_pending());

                time::sleep(Duration::from_millis(250)).await;
                assert_eq!(*fired.borrow(), ["ali"]);
                assert!(!debounce.is_pending());
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_action_never_fires() {
        LocalSet::new()
            .run_until(async {
                let fired = Rc::new(RefCell::new(false));
                let mut debounce = Debounce::new(Duration::from_millis(300));

                let flag = Rc::clone(&fired);
                debounce.schedule(move || *flag.borrow_mut() = true);
                assert!(debounce.cancel());
                assert!(!debounce.cancel());

                time::sleep(Duration::from_secs(1)).await;
                assert!(!*fired.borrow());
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_cancels_pending_action() {
        LocalSet::new()
            .run_until(async {
                let fired = Rc::new(RefCell::new(false));
                let mut debounce = Debounce::new(Duration::from_millis(300));

                let flag = Rc::clone(&fired);
                debounce.schedule(move || *flag.borrow_mut() = true);
                drop(debounce);

                time::sleep(Duration::from_secs(1)).await;
                assert!(!*fired.borrow());
            })
            .await;
    }
}
