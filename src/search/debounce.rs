use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;

/// Single-slot debounce timer.
///
/// `schedule` arms the timer with an action; arming again before it fires
/// cancels the previous action. Once the timer fires the action runs as a
/// detached task, so cancelling afterwards never interrupts work already
/// under way.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Run `action` after a quiet period, replacing any pending action.
    pub fn schedule<F>(&mut self, action: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        // The quiet period runs from now, not from the task's first poll.
        let deadline = tokio::time::Instant::now() + self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            // No await between the wakeup and the spawn: a cancel either
            // lands before the timer fires or not at all.
            tokio::spawn(action);
        }));
    }

    /// Disarm the timer. Returns whether an action was still waiting.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                true
            }
            _ => false,
        }
    }

    /// Whether an action is armed and has not fired yet.
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
